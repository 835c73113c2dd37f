//! Declarative site configuration: product identity, navigation links and the
//! signup form schema. Loaded once per page and never mutated afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

mod error;
mod form;

pub use error::ConfigError;
pub use form::{DEFAULT_RECIPIENT, DEFAULT_TITLE, FieldKind, FieldSpec, FormConfig, SubmitMode};

/// Product name used when the configuration leaves it blank.
pub const DEFAULT_PRODUCT_NAME: &str = "Faulty Link";

/// A single navigation entry. `href` is site-relative; the base path is applied at render time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

impl NavLink {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// Whole-site configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub product_name: String,
    pub chapter_name: String,
    pub chapter_city_label: String,
    /// Prefix for project-site hosting (e.g. `/repo-name`); empty at a domain root.
    pub base_path: String,
    pub nav_links: Vec<NavLink>,
    pub signup_form: FormConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_owned(),
            chapter_name: String::from("Den"),
            chapter_city_label: String::from("Denver"),
            base_path: String::new(),
            nav_links: vec![
                NavLink::new("/", "Home"),
                NavLink::new("/start/", "Start"),
                NavLink::new("/den/", "Den (Denver)"),
                NavLink::new("/den/events/", "Events"),
                NavLink::new("/den/eiber/", "Eiber"),
            ],
            signup_form: FormConfig::early_access(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        debug!(
            "loaded site config for {:?}: {} nav links, {} form fields, mode {}",
            config.product_name(),
            config.nav_links.len(),
            config.signup_form.fields.len(),
            config.signup_form.submit_mode.as_str()
        );
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, does not parse, or fails validation.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    /// Check the form field keys: non-empty, usable as element ids, unique.
    ///
    /// # Errors
    /// Returns the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, field) in self.signup_form.fields.iter().enumerate() {
            let key = field.key.as_str();
            if key.is_empty() {
                return Err(ConfigError::EmptyFieldKey { index });
            }
            if key
                .chars()
                .any(|ch| ch.is_whitespace() || matches!(ch, '"' | '\'' | '<' | '>' | '&'))
            {
                return Err(ConfigError::InvalidFieldKey(key.to_owned()));
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateFieldKey(key.to_owned()));
            }
        }
        Ok(())
    }

    pub fn product_name(&self) -> &str {
        if self.product_name.is_empty() {
            DEFAULT_PRODUCT_NAME
        } else {
            &self.product_name
        }
    }

    /// Configured navigation, or the stock link set when none is configured.
    pub fn effective_nav_links(&self) -> Vec<NavLink> {
        if !self.nav_links.is_empty() {
            return self.nav_links.clone();
        }
        vec![
            NavLink::new("/", "Home"),
            NavLink::new("/start/", "Start"),
            NavLink::new(
                "/den/",
                format!("{} ({})", self.chapter_name, self.chapter_city_label),
            ),
            NavLink::new("/den/events/", "Events"),
            NavLink::new("/den/eiber/", "Eiber"),
        ]
    }
}
