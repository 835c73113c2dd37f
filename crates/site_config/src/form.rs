//! Signup form schema: the fields the modal renders and how a submission is delivered.

use serde::{Deserialize, Serialize};

/// Recipient used by mailto submissions when the form does not name one.
pub const DEFAULT_RECIPIENT: &str = "info@iamfaulty.com";
/// Modal heading used when the form title is empty.
pub const DEFAULT_TITLE: &str = "Join Early Access";

/// How a completed form is delivered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmitMode {
    /// Copy the payload text to the system clipboard.
    #[default]
    Clipboard,
    /// Open the user's mail client with a prefilled message.
    Mailto,
    /// POST the payload as JSON to the configured endpoint.
    PostJson,
}

impl SubmitMode {
    /// Name used in configuration documents and in the modal footer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::Mailto => "mailto",
            Self::PostJson => "postJson",
        }
    }
}

impl From<String> for SubmitMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "mailto" => Self::Mailto,
            "postJson" => Self::PostJson,
            "clipboard" => Self::Clipboard,
            other => {
                log::warn!("unknown submit mode {other:?}, falling back to clipboard");
                Self::Clipboard
            }
        }
    }
}

impl From<SubmitMode> for String {
    fn from(mode: SubmitMode) -> Self {
        mode.as_str().to_owned()
    }
}

/// Control rendered for a form field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Textarea,
    Select,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Textarea => "textarea",
            Self::Select => "select",
        }
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "email" => Self::Email,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            _ => Self::Text,
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// One input of the signup form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSpec {
    /// Element id, control name and payload key. Unique within the form.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub placeholder: String,
    pub required: bool,
    /// Choices for `select` fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSpec {
    /// Build a field with an empty placeholder and no options.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            placeholder: String::new(),
            required,
            options: Vec::new(),
        }
    }

    /// Label shown in payload text; the key stands in for a blank label.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() { &self.key } else { &self.label }
    }
}

/// Signup form schema and delivery settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    pub title: String,
    pub blurb: String,
    pub fields: Vec<FieldSpec>,
    pub submit_mode: SubmitMode,
    /// Mailto recipient.
    pub to: String,
    /// Mailto subject; blank means `<product> — Early Access`.
    pub subject: String,
    /// Target of postJson submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            blurb: String::new(),
            fields: Vec::new(),
            submit_mode: SubmitMode::Clipboard,
            to: DEFAULT_RECIPIENT.to_owned(),
            subject: String::new(),
            endpoint: None,
        }
    }
}

impl FormConfig {
    /// The pilot-list form the site ships with: name and email, delivered by mail.
    pub fn early_access() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            blurb: String::from("Pilot list"),
            fields: vec![
                FieldSpec::new("name", "Name", FieldKind::Text, true),
                FieldSpec::new("email", "Email", FieldKind::Email, true),
            ],
            submit_mode: SubmitMode::Mailto,
            to: DEFAULT_RECIPIENT.to_owned(),
            subject: String::from("Im ready to get linked"),
            endpoint: None,
        }
    }

    pub fn title(&self) -> &str {
        if self.title.is_empty() { DEFAULT_TITLE } else { &self.title }
    }

    pub fn recipient(&self) -> &str {
        if self.to.is_empty() { DEFAULT_RECIPIENT } else { &self.to }
    }

    pub fn subject_for(&self, product_name: &str) -> String {
        if self.subject.is_empty() {
            format!("{product_name} — Early Access")
        } else {
            self.subject.clone()
        }
    }

    /// Configured endpoint, treating a blank string as unset.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_submit_mode_falls_back_to_clipboard() -> anyhow::Result<()> {
        let form: FormConfig =
            serde_json::from_str(r#"{"submitMode":"carrier-pigeon","to":"a@b.c"}"#)?;
        assert_eq!(form.submit_mode, SubmitMode::Clipboard);
        assert_eq!(form.recipient(), "a@b.c");
        let form: FormConfig = serde_json::from_str(r#"{"submitMode":"postJson"}"#)?;
        assert_eq!(form.submit_mode, SubmitMode::PostJson);
        Ok(())
    }

    #[test]
    fn missing_submit_mode_is_clipboard() -> anyhow::Result<()> {
        let form: FormConfig = serde_json::from_str("{}")?;
        assert_eq!(form.submit_mode, SubmitMode::Clipboard);
        assert_eq!(form.recipient(), DEFAULT_RECIPIENT);
        assert_eq!(form.title(), DEFAULT_TITLE);
        Ok(())
    }

    #[test]
    fn field_type_key_is_renamed() -> anyhow::Result<()> {
        let field: FieldSpec =
            serde_json::from_str(r#"{"key":"msg","label":"Message","type":"textarea"}"#)?;
        assert_eq!(field.kind, FieldKind::Textarea);
        assert!(!field.required);
        let json = serde_json::to_value(&field)?;
        assert_eq!(json["type"], "textarea");
        Ok(())
    }

    #[test]
    fn blank_endpoint_counts_as_unset() {
        let mut form = FormConfig::default();
        form.endpoint = Some(String::from("  "));
        assert_eq!(form.endpoint(), None);
        form.endpoint = Some(String::from("https://example.com/hook"));
        assert_eq!(form.endpoint(), Some("https://example.com/hook"));
    }

    #[test]
    fn subject_defaults_to_product_name() {
        let form = FormConfig::default();
        assert_eq!(form.subject_for("Faulty Link"), "Faulty Link — Early Access");
        assert_eq!(FormConfig::early_access().subject_for("x"), "Im ready to get linked");
    }
}
