//! Submission payloads and the per-mode delivery plan.
//!
//! Reading the form and deciding what to deliver is synchronous; the page runs
//! the plan against its [`crate::Platform`] or [`crate::HttpTransport`].

use dom::{DOM, NodeId};
use serde::ser::{Serialize, SerializeMap as _, Serializer};
use site_config::{FormConfig, SiteConfig, SubmitMode};

pub const MSG_MAILTO_OPENED: &str = "Opened email client.";
pub const MSG_POST_OK: &str = "Submitted. Thank you!";
pub const MSG_POST_REJECTED: &str = "Submission failed. Please try again later.";
pub const MSG_NETWORK_ERROR: &str = "Network error. Please try again later.";
pub const MSG_COPIED: &str = "Copied to clipboard. Paste into your tracker / email draft.";
pub const MSG_COPIED_PROMPT: &str = "Copied (prompt)";
pub const MSG_COPY_FAILED: &str = "Could not copy.";
pub const MSG_NO_ENDPOINT: &str = "No endpoint configured for postJson.";
pub const PROMPT_MESSAGE: &str = "Copy this:";

/// Field values keyed by field key, serialised as a JSON object in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldData(pub Vec<(String, String)>);

impl FieldData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for FieldData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// JSON body of a postJson submission.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SubmissionPayload {
    pub project: String,
    pub data: FieldData,
}

impl SubmissionPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Trimmed value of every configured field; a missing control reads as empty.
pub fn collect_values(dom: &DOM, form_node: NodeId, form: &FormConfig) -> FieldData {
    let values = form
        .fields
        .iter()
        .map(|field| {
            let control = dom.find_first(form_node, |dom, node| {
                dom.attr(node, "name") == Some(field.key.as_str())
                    && dom.tag(node).is_some_and(|tag| matches!(tag, "input" | "textarea" | "select"))
            });
            let value = control.map(|node| dom.value(node)).unwrap_or_default();
            (field.key.clone(), value.trim().to_owned())
        })
        .collect();
    FieldData(values)
}

/// `Project: <product>` followed by one `label: value` line per field.
pub fn payload_text(product_name: &str, form: &FormConfig, data: &FieldData) -> String {
    let mut lines = Vec::with_capacity(form.fields.len() + 1);
    lines.push(format!("Project: {product_name}"));
    for field in &form.fields {
        let value = data.get(&field.key).unwrap_or_default();
        lines.push(format!("{}: {value}", field.display_label()));
    }
    lines.join("\n")
}

pub fn mailto_uri(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{to}?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

/// What a submission will do, decided before any side effect runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Mailto { uri: String },
    PostJson { endpoint: String, body: String },
    MissingEndpoint,
    Clipboard { text: String },
}

/// Build the delivery for the current form values.
///
/// # Errors
/// Returns an error if the JSON body cannot be serialised.
pub fn plan(config: &SiteConfig, data: &FieldData) -> Result<Delivery, serde_json::Error> {
    let form = &config.signup_form;
    let product = config.product_name();
    Ok(match form.submit_mode {
        SubmitMode::Mailto => {
            let text = payload_text(product, form, data);
            Delivery::Mailto {
                uri: mailto_uri(form.recipient(), &form.subject_for(product), &text),
            }
        }
        SubmitMode::PostJson => match form.endpoint() {
            None => Delivery::MissingEndpoint,
            Some(endpoint) => Delivery::PostJson {
                endpoint: endpoint.to_owned(),
                body: SubmissionPayload {
                    project: product.to_owned(),
                    data: data.clone(),
                }
                .to_json()?,
            },
        },
        SubmitMode::Clipboard => Delivery::Clipboard {
            text: payload_text(product, form, data),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Error, anyhow};
    use site_config::{FieldKind, FieldSpec};

    fn ava() -> FieldData {
        FieldData(vec![
            (String::from("name"), String::from("Ava")),
            (String::from("email"), String::from("a@x.com")),
        ])
    }

    #[test]
    fn json_body_keeps_field_order() -> Result<(), Error> {
        let payload = SubmissionPayload {
            project: String::from("Faulty Link"),
            data: ava(),
        };
        assert_eq!(
            payload.to_json()?,
            r#"{"project":"Faulty Link","data":{"name":"Ava","email":"a@x.com"}}"#
        );
        Ok(())
    }

    #[test]
    fn payload_lines_use_label_or_key() {
        let mut form = FormConfig::early_access();
        form.fields.push(FieldSpec::new("notes", "", FieldKind::Textarea, false));
        let text = payload_text("Faulty Link", &form, &ava());
        assert_eq!(text, "Project: Faulty Link\nName: Ava\nEmail: a@x.com\nnotes: ");
    }

    #[test]
    fn values_are_trimmed_and_missing_controls_read_empty() -> Result<(), Error> {
        let mut dom = DOM::from_body_html(r#"<form id="f"><input name="name"></form>"#)?;
        let form_node = dom.get_element_by_id("f").ok_or_else(|| anyhow!("form missing"))?;
        let input = dom
            .find_first(form_node, |dom, node| dom.tag(node) == Some("input"))
            .ok_or_else(|| anyhow!("input missing"))?;
        dom.set_value(input, "  Ava \n");
        let data = collect_values(&dom, form_node, &FormConfig::early_access());
        assert_eq!(data.get("name"), Some("Ava"));
        assert_eq!(data.get("email"), Some(""));
        Ok(())
    }

    #[test]
    fn mailto_encodes_subject_and_body() {
        let uri = mailto_uri("info@iamfaulty.com", "Hi there", "Project: Faulty Link\nName: Ava");
        assert_eq!(
            uri,
            "mailto:info@iamfaulty.com?subject=Hi%20there&body=Project%3A%20Faulty%20Link%0AName%3A%20Ava"
        );
    }

    #[test]
    fn post_without_endpoint_plans_nothing() -> Result<(), Error> {
        let mut config = SiteConfig::default();
        config.signup_form.submit_mode = SubmitMode::PostJson;
        config.signup_form.endpoint = Some(String::from("   "));
        assert_eq!(plan(&config, &ava())?, Delivery::MissingEndpoint);
        Ok(())
    }
}
