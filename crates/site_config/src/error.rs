use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::PathBuf;

/// Errors produced while loading or validating a site configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The document is not valid JSON or does not match the expected shape.
    Parse(serde_json::Error),
    /// A form field has an empty key.
    EmptyFieldKey { index: usize },
    /// A form field key cannot be used as an element id.
    InvalidFieldKey(String),
    /// Two form fields share the same key.
    DuplicateFieldKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::EmptyFieldKey { index } => write!(f, "form field #{index} has an empty key"),
            Self::InvalidFieldKey(key) => {
                write!(f, "form field key {key:?} is not usable as an element id")
            }
            Self::DuplicateFieldKey(key) => write!(f, "form field key {key:?} is used twice"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
