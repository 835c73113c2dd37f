//! The page controller: owns the document, the modal, the toast and the host platform.

use core::time::Duration;

use anyhow::{Context as _, Error, anyhow};
use dom::{DOM, NodeId};
use log::{debug, info, warn};
use site_config::SiteConfig;
use tokio::time::Instant;
use tracing::info_span;

use crate::config::{ClipboardFallback, PageConfig};
use crate::events::{Action, EventOutcome, Key, KeyEvent};
use crate::focus;
use crate::modal::{ModalController, ModalState};
use crate::platform::Platform;
use crate::render::{NAV_ID, NavEntry, manual_copy_markup, nav_entries, nav_markup, success_markup};
use crate::submit::{
    self, Delivery, MSG_COPIED, MSG_COPIED_PROMPT, MSG_COPY_FAILED, MSG_MAILTO_OPENED, MSG_NETWORK_ERROR,
    MSG_NO_ENDPOINT, MSG_POST_OK, MSG_POST_REJECTED, PROMPT_MESSAGE,
};
use crate::toast::Toast;
use crate::transport::{HttpTransport, TransportError};

const FORM_ERROR_CLASS: &str = "form-error";

/// How a submission ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitReport {
    /// No modal was mounted, so there was no form to submit.
    NotOpen,
    /// The window was pointed at a `mailto:` URI.
    Navigated,
    /// postJson answered with a 2xx status.
    Posted { status: u16 },
    /// postJson answered with a non-2xx status.
    Rejected { status: u16 },
    /// postJson never got a status.
    NetworkError,
    /// postJson is configured without an endpoint; nothing was sent.
    MissingEndpoint,
    Copied,
    CopiedViaPrompt,
    /// The payload was placed in the modal for manual copying.
    ShownInline,
    CopyFailed,
    /// The modal that started the request was closed before it finished.
    Discarded,
}

/// A postJson request waiting to be sent, tagged with the modal mount that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingPost {
    generation: u64,
    endpoint: String,
    body: String,
}

impl PendingPost {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Perform the request.
    ///
    /// # Errors
    /// Returns the transport's error when no status was received.
    pub async fn send<T: HttpTransport>(&self, transport: &T) -> Result<u16, TransportError> {
        transport.post_json(&self.endpoint, &self.body).await
    }
}

/// Result of the synchronous half of a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Complete(SubmitReport),
    Pending(PendingPost),
}

impl Submission {
    pub fn pending(self) -> Option<PendingPost> {
        match self {
            Self::Pending(post) => Some(post),
            Self::Complete(_) => None,
        }
    }
}

pub struct SitePage<P: Platform> {
    dom: DOM,
    site: SiteConfig,
    config: PageConfig,
    location_path: String,
    modal: ModalController,
    toast: Toast,
    platform: P,
}

impl<P: Platform> SitePage<P> {
    /// Parse the host body markup and inject navigation into its `#nav` container.
    ///
    /// # Errors
    /// Returns an error if the site config fails validation, or if the host
    /// markup or the navigation cannot be mounted.
    pub fn new(
        site: SiteConfig,
        config: PageConfig,
        platform: P,
        host_markup: &str,
        location_path: &str,
    ) -> Result<Self, Error> {
        site.validate().context("validating site config")?;
        let dom = DOM::from_body_html(host_markup).context("parsing host page")?;
        let mut page = Self {
            dom,
            site,
            config,
            location_path: location_path.to_owned(),
            modal: ModalController::new(),
            toast: Toast::new(),
            platform,
        };
        page.render_nav()?;
        info!(
            "site page ready for {} at {}",
            page.site.product_name(),
            page.location_path
        );
        Ok(page)
    }

    fn render_nav(&mut self) -> Result<(), Error> {
        let Some(nav) = self.dom.get_element_by_id(NAV_ID) else {
            debug!("host page has no #{NAV_ID}; navigation not rendered");
            return Ok(());
        };
        let markup = nav_markup(&self.nav_entries());
        self.dom.set_inner_html(nav, &markup).context("rendering navigation")?;
        Ok(())
    }

    pub fn nav_entries(&self) -> Vec<NavEntry> {
        nav_entries(&self.site, &self.location_path)
    }

    pub const fn dom(&self) -> &DOM {
        &self.dom
    }

    pub const fn dom_mut(&mut self) -> &mut DOM {
        &mut self.dom
    }

    pub const fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    pub const fn platform(&self) -> &P {
        &self.platform
    }

    pub const fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub const fn is_modal_open(&self) -> bool {
        self.modal.is_open()
    }

    pub const fn modal_state(&self) -> Option<&ModalState> {
        self.modal.state()
    }

    // -----------------------
    // Modal and input
    // -----------------------

    /// Open the signup modal. Returns `false` when it was already open.
    ///
    /// # Errors
    /// Returns an error if the modal markup cannot be mounted.
    pub fn open_signup(&mut self, trigger: Option<NodeId>) -> Result<bool, Error> {
        self.modal.open(&mut self.dom, &self.site.signup_form, trigger)
    }

    /// Close the signup modal. Returns `false` when nothing was open.
    pub fn close_modal(&mut self) -> bool {
        self.modal.close(&mut self.dom)
    }

    /// Single click entry point: backdrop clicks close, `data-action` elements act.
    ///
    /// # Errors
    /// Returns an error if opening the modal fails.
    pub fn click(&mut self, target: NodeId) -> Result<EventOutcome, Error> {
        if self.modal.is_backdrop(target) {
            self.close_modal();
            return Ok(EventOutcome::Handled);
        }
        let Some(actor) = self
            .dom
            .closest(target, |dom, node| dom.attr(node, Action::ATTRIBUTE).is_some())
        else {
            return Ok(EventOutcome::PassThrough);
        };
        match self.dom.attr(actor, Action::ATTRIBUTE).and_then(Action::parse) {
            Some(Action::OpenSignup) => {
                self.open_signup(Some(actor))?;
                Ok(EventOutcome::Handled)
            }
            Some(Action::CloseModal) => {
                self.close_modal();
                Ok(EventOutcome::Handled)
            }
            None => Ok(EventOutcome::PassThrough),
        }
    }

    /// Route a key to the modal. `Handled` means default handling was prevented.
    pub fn key_down(&mut self, event: &KeyEvent) -> EventOutcome {
        self.modal.handle_key(&mut self.dom, event)
    }

    /// Like [`Self::key_down`], then performs default Tab traversal if nothing handled the key.
    pub fn press_key(&mut self, event: &KeyEvent) -> EventOutcome {
        let outcome = self.key_down(event);
        if outcome.is_handled() || event.key != Key::Tab || event.mods.ctrl || event.mods.alt {
            return outcome;
        }
        let body = self.dom.body();
        let current = self.dom.active_element();
        let target = if event.mods.shift {
            focus::prev(&self.dom, body, current)
        } else {
            focus::next(&self.dom, body, current)
        };
        if let Some(node) = target {
            self.dom.focus(node);
        }
        outcome
    }

    /// Control for field `key` inside the mounted form.
    pub fn field(&self, key: &str) -> Option<NodeId> {
        let form = self.modal.form()?;
        self.dom.find_first(form, |dom, node| {
            dom.attr(node, "name") == Some(key)
                && dom.tag(node).is_some_and(|tag| matches!(tag, "input" | "textarea" | "select"))
        })
    }

    /// Type into field `key`. Returns `false` when the modal or the field is missing.
    pub fn set_field_value(&mut self, key: &str, value: &str) -> bool {
        let Some(node) = self.field(key) else {
            return false;
        };
        self.dom.set_value(node, value);
        true
    }

    /// Text of the inline `.form-error`, if one is showing.
    pub fn form_error(&self) -> Option<String> {
        let form = self.modal.form()?;
        self.dom
            .find_first(form, |dom, node| dom.has_class(node, FORM_ERROR_CLASS))
            .map(|node| self.dom.text_content(node))
    }

    // -----------------------
    // Submission
    // -----------------------

    /// Run the synchronous half of a submission. postJson comes back as
    /// [`Submission::Pending`]; every other mode completes here.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be serialised or the DOM update fails.
    pub fn begin_submit(&mut self) -> Result<Submission, Error> {
        let (Some(form_node), Some(generation)) = (self.modal.form(), self.modal.generation()) else {
            return Ok(Submission::Complete(SubmitReport::NotOpen));
        };
        let mode = self.site.signup_form.submit_mode;
        let _span = info_span!("page.submit", mode = mode.as_str()).entered();
        let data = submit::collect_values(&self.dom, form_node, &self.site.signup_form);
        let delivery = submit::plan(&self.site, &data).context("building submission payload")?;
        info!("submitting signup form via {}", mode.as_str());
        let report = match delivery {
            Delivery::Mailto { uri } => {
                self.platform.navigate(&uri);
                self.show_success(MSG_MAILTO_OPENED)?;
                SubmitReport::Navigated
            }
            Delivery::MissingEndpoint => {
                warn!("postJson selected but no endpoint is configured");
                self.toast(MSG_NO_ENDPOINT)?;
                SubmitReport::MissingEndpoint
            }
            Delivery::PostJson { endpoint, body } => {
                return Ok(Submission::Pending(PendingPost {
                    generation,
                    endpoint,
                    body,
                }));
            }
            Delivery::Clipboard { text } => self.deliver_clipboard(&text)?,
        };
        Ok(Submission::Complete(report))
    }

    fn deliver_clipboard(&mut self, text: &str) -> Result<SubmitReport, Error> {
        let Err(err) = self.platform.write_clipboard(text) else {
            self.show_success(MSG_COPIED)?;
            return Ok(SubmitReport::Copied);
        };
        debug!("clipboard write failed ({err}), falling back");
        match self.config.clipboard_fallback {
            ClipboardFallback::Prompt => match self.platform.prompt(PROMPT_MESSAGE, text) {
                Ok(()) => {
                    self.show_success(MSG_COPIED_PROMPT)?;
                    Ok(SubmitReport::CopiedViaPrompt)
                }
                Err(prompt_err) => {
                    warn!("prompt fallback failed: {prompt_err}");
                    self.toast(MSG_COPY_FAILED)?;
                    Ok(SubmitReport::CopyFailed)
                }
            },
            ClipboardFallback::InlineText => {
                let form = self.modal.form().ok_or_else(|| anyhow!("signup form is not mounted"))?;
                let mounted = self.dom.set_inner_html(form, &manual_copy_markup(text))?;
                if let Some(area) = mounted
                    .iter()
                    .find_map(|node| self.dom.find_first(*node, |dom, id| dom.tag(id) == Some("textarea")))
                {
                    self.dom.focus(area);
                }
                Ok(SubmitReport::ShownInline)
            }
        }
    }

    /// Apply the outcome of a postJson request. Outcomes for a modal that has
    /// since closed (or been reopened) are dropped.
    ///
    /// # Errors
    /// Returns an error if the DOM update fails.
    pub fn finish_submit(
        &mut self,
        pending: &PendingPost,
        result: Result<u16, TransportError>,
    ) -> Result<SubmitReport, Error> {
        if self.modal.generation() != Some(pending.generation) {
            info!(
                "discarding postJson outcome for closed modal (generation {})",
                pending.generation
            );
            return Ok(SubmitReport::Discarded);
        }
        match result {
            Ok(status) if (200..300).contains(&status) => {
                self.show_success(MSG_POST_OK)?;
                Ok(SubmitReport::Posted { status })
            }
            Ok(status) => {
                warn!("postJson to {} rejected with {status}", pending.endpoint);
                self.show_inline_error(MSG_POST_REJECTED)?;
                Ok(SubmitReport::Rejected { status })
            }
            Err(err) => {
                warn!("postJson to {} failed: {err}", pending.endpoint);
                self.show_inline_error(MSG_NETWORK_ERROR)?;
                Ok(SubmitReport::NetworkError)
            }
        }
    }

    /// Submit and, for postJson, wait for the request and apply its outcome.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be serialised or the DOM update fails.
    pub async fn submit<T: HttpTransport>(&mut self, transport: &T) -> Result<SubmitReport, Error> {
        match self.begin_submit()? {
            Submission::Complete(report) => Ok(report),
            Submission::Pending(pending) => {
                let result = pending.send(transport).await;
                self.finish_submit(&pending, result)
            }
        }
    }

    fn show_success(&mut self, message: &str) -> Result<(), Error> {
        let Some(form) = self.modal.form() else {
            return Ok(());
        };
        self.dom.set_inner_html(form, &success_markup(message))?;
        Ok(())
    }

    fn show_inline_error(&mut self, message: &str) -> Result<(), Error> {
        let Some(form) = self.modal.form() else {
            return Ok(());
        };
        let node = if let Some(existing) = self.dom.find_first(form, |dom, node| dom.has_class(node, FORM_ERROR_CLASS)) {
            existing
        } else {
            let created = self.dom.create_element("div");
            self.dom.set_attr(created, "class", FORM_ERROR_CLASS);
            self.dom.prepend_child(form, created)?;
            created
        };
        self.dom.set_text_content(node, message)
    }

    // -----------------------
    // Toast
    // -----------------------

    /// Show a toast for the configured default duration.
    ///
    /// # Errors
    /// Returns an error if the toast element cannot be attached.
    pub fn toast(&mut self, message: &str) -> Result<(), Error> {
        self.toast_for(message, self.config.toast_duration())
    }

    /// Show a toast for `duration`, replacing any pending hide.
    ///
    /// # Errors
    /// Returns an error if the toast element cannot be attached.
    pub fn toast_for(&mut self, message: &str, duration: Duration) -> Result<(), Error> {
        self.toast.show(&mut self.dom, message, duration, Instant::now())
    }

    /// Apply a due toast hide. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        self.toast.tick_at(&mut self.dom, now)
    }

    /// When the next timer fires, for an event loop that wants to sleep until then.
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.toast.next_deadline()
    }

    pub fn toast_visible(&self) -> bool {
        Toast::is_visible(&self.dom)
    }

    pub fn toast_text(&self) -> Option<String> {
        Toast::text(&self.dom)
    }
}
