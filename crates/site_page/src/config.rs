//! Runtime settings for a page instance.
//!
//! These complement the founder-editable [`site_config::SiteConfig`]: the site
//! config says what the page contains, `PageConfig` says how the runtime
//! behaves (toast timing, request timeout, clipboard fallback). Everything is
//! constructed programmatically; nothing is read from the environment.

use core::time::Duration;

/// Toast visibility when the caller does not pass a duration.
pub const DEFAULT_TOAST_MS: u64 = 3000;

/// What to do when the clipboard write is refused.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClipboardFallback {
    /// Ask the platform to show a blocking prompt holding the payload.
    #[default]
    Prompt,
    /// Show the payload in a read-only textarea inside the modal.
    InlineText,
}

/// Runtime configuration for a [`crate::SitePage`].
#[derive(Clone, Debug)]
pub struct PageConfig {
    /// How long a toast stays visible, in milliseconds
    pub toast_duration_ms: u64,
    /// Optional upper bound on a postJson request, in milliseconds
    pub request_timeout_ms: Option<u64>,
    /// Behaviour when the clipboard refuses a write
    pub clipboard_fallback: ClipboardFallback,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_MS, None, ClipboardFallback::Prompt)
    }
}

impl PageConfig {
    /// Construct a new `PageConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `toast_duration_ms` - Toast visibility in milliseconds (minimum 1ms)
    /// * `request_timeout_ms` - Optional request timeout; zero means no timeout
    /// * `clipboard_fallback` - Behaviour when the clipboard write fails
    #[must_use]
    pub const fn new(
        toast_duration_ms: u64,
        request_timeout_ms: Option<u64>,
        clipboard_fallback: ClipboardFallback,
    ) -> Self {
        let toast = if toast_duration_ms < 1 { 1 } else { toast_duration_ms };
        let timeout = match request_timeout_ms {
            Some(0) => None,
            other => other,
        };
        Self {
            toast_duration_ms: toast,
            request_timeout_ms: timeout,
            clipboard_fallback,
        }
    }

    #[must_use]
    pub const fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        if let Some(millis) = self.request_timeout_ms {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_are_clamped() {
        let config = PageConfig::new(0, Some(0), ClipboardFallback::InlineText);
        assert_eq!(config.toast_duration(), Duration::from_millis(1));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.clipboard_fallback, ClipboardFallback::InlineText);
    }

    #[test]
    fn defaults_match_stock_behaviour() {
        let config = PageConfig::default();
        assert_eq!(config.toast_duration(), Duration::from_millis(3000));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.clipboard_fallback, ClipboardFallback::Prompt);
    }
}
