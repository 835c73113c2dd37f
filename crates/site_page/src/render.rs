//! Markup builders for the navigation bar, the signup modal and inline messages.
//!
//! Every config-supplied string goes through [`escape_html`] before it reaches
//! markup; the output is parsed into the document by the page.

use dom::escape_html;
use site_config::{FieldKind, FieldSpec, FormConfig, SiteConfig};

use crate::paths::{current_route, join_base, normalize_path};

pub const NAV_ID: &str = "nav";
pub const MODAL_BACKDROP_ID: &str = "modalBackdrop";
pub const MODAL_TITLE_ID: &str = "modalTitle";
pub const FORM_ID: &str = "signupForm";
pub const TOAST_ID: &str = "siteToast";

/// A navigation link after base-path resolution and active matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEntry {
    pub href: String,
    pub label: String,
    pub active: bool,
}

/// Resolve the configured (or fallback) links for the page at `location_path`.
pub fn nav_entries(config: &SiteConfig, location_path: &str) -> Vec<NavEntry> {
    let here = current_route(&config.base_path, location_path);
    config
        .effective_nav_links()
        .into_iter()
        .map(|link| NavEntry {
            active: normalize_path(&link.href) == here,
            href: join_base(&config.base_path, &link.href),
            label: link.label,
        })
        .collect()
}

pub fn nav_markup(entries: &[NavEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let class = if entry.active { "pill active" } else { "pill" };
            format!(
                r#"<a class="{class}" href="{}">{}</a>"#,
                escape_html(&entry.href),
                escape_html(&entry.label)
            )
        })
        .collect()
}

/// Label plus control for one field.
pub fn field_markup(field: &FieldSpec) -> String {
    let key = escape_html(&field.key);
    let required = if field.required { " required" } else { "" };
    let required_label = if field.required {
        r#"<span aria-label="required"> *</span>"#
    } else {
        ""
    };
    let label = format!(
        r#"<label for="{key}">{}{required_label}</label>"#,
        escape_html(&field.label)
    );
    let placeholder = escape_html(&field.placeholder);
    let control = match field.kind {
        FieldKind::Textarea => format!(
            r#"<textarea id="{key}" name="{key}" placeholder="{placeholder}"{required} aria-describedby="{key}-help"></textarea>"#
        ),
        FieldKind::Select => {
            let prompt = if field.placeholder.is_empty() {
                String::from("Select...")
            } else {
                placeholder
            };
            let choices: String = field
                .options
                .iter()
                .map(|option| {
                    let escaped = escape_html(option);
                    format!(r#"<option value="{escaped}">{escaped}</option>"#)
                })
                .collect();
            let options = format!(r#"<option value="">{prompt}</option>{choices}"#);
            format!(
                r#"<select id="{key}" name="{key}"{required} aria-describedby="{key}-help">{options}</select>"#
            )
        }
        FieldKind::Text | FieldKind::Email => format!(
            r#"<input id="{key}" name="{key}" type="{}" placeholder="{placeholder}"{required} aria-describedby="{key}-help">"#,
            field.kind.as_str()
        ),
    };
    let classes = if field.kind == FieldKind::Textarea { "field span2" } else { "field" };
    format!(r#"<div class="{classes}">{label}{control}</div>"#)
}

/// The whole modal: backdrop, dialog header, form and submit-mode footer.
pub fn modal_markup(form: &FormConfig) -> String {
    let fields: String = form.fields.iter().map(field_markup).collect();
    format!(
        concat!(
            r#"<div id="{backdrop}" class="modal-backdrop">"#,
            r#"<div class="modal" role="dialog" aria-modal="true" aria-labelledby="{title_id}" aria-label="Signup form">"#,
            r#"<div class="modal-header"><div>"#,
            r#"<h2 id="{title_id}">{title}</h2>"#,
            r#"<p class="mini">{blurb}</p>"#,
            r#"</div>"#,
            r#"<button class="btn secondary" type="button" data-action="closeModal" aria-label="Close dialog">×</button>"#,
            r#"</div>"#,
            r#"<form id="{form_id}">"#,
            r#"<div class="form-grid">{fields}</div>"#,
            r#"<div class="ctaRow">"#,
            r#"<button class="btn" type="submit">Submit</button>"#,
            r#"<button class="btn secondary" type="button" data-action="closeModal">Cancel</button>"#,
            r#"</div>"#,
            r#"<div class="hr"></div>"#,
            r#"<p class="mini">Submit mode: <b>{mode}</b>.</p>"#,
            r#"</form></div></div>"#
        ),
        backdrop = MODAL_BACKDROP_ID,
        title_id = MODAL_TITLE_ID,
        form_id = FORM_ID,
        title = escape_html(form.title()),
        blurb = escape_html(&form.blurb),
        fields = fields,
        mode = form.submit_mode.as_str(),
    )
}

/// Replacement body for the form after a successful submission.
pub fn success_markup(message: &str) -> String {
    format!(
        r#"<div class="card"><p>{}</p><div class="ctaRow"><button class="btn" type="button" data-action="closeModal">Close</button></div></div>"#,
        escape_html(message)
    )
}

/// Replacement body showing the payload for manual copying.
pub fn manual_copy_markup(payload: &str) -> String {
    format!(
        r#"<div class="card"><p>Copy this:</p><textarea class="manual-copy" readonly>{}</textarea><div class="ctaRow"><button class="btn" type="button" data-action="closeModal">Close</button></div></div>"#,
        escape_html(payload)
    )
}
