//! Host window facilities: navigation, clipboard and prompt.

use core::error::Error;
use core::fmt;

/// Why a platform call did not happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformError {
    /// The host refused the operation (permission denied, no user gesture).
    Denied(String),
    /// The host has no such facility.
    Unavailable,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied(reason) => write!(f, "denied: {reason}"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

impl Error for PlatformError {}

/// Window-level side effects the page asks its host for.
pub trait Platform {
    /// Point the window at `uri` (used for `mailto:` links).
    fn navigate(&mut self, uri: &str);

    /// Put `text` on the system clipboard.
    ///
    /// # Errors
    /// Returns an error when the clipboard write is refused.
    fn write_clipboard(&mut self, text: &str) -> Result<(), PlatformError>;

    /// Show a blocking prompt with `message` and `default_text` preselected.
    ///
    /// # Errors
    /// Returns an error when the host cannot show a prompt.
    fn prompt(&mut self, message: &str, default_text: &str) -> Result<(), PlatformError>;
}
