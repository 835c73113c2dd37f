//! Signup page runtime.
//!
//! [`SitePage`] owns a headless [`dom::DOM`] built from the host page, renders
//! the configured navigation into it and drives the signup modal: opening and
//! closing, focus trapping, and delivering submissions by clipboard, `mailto:`
//! or a JSON POST. Host side effects go through [`Platform`] and
//! [`HttpTransport`].
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod config;
pub mod events;
pub mod focus;
pub mod modal;
pub mod page;
pub mod paths;
pub mod platform;
pub mod render;
pub mod submit;
pub mod toast;
pub mod transport;

pub use config::{ClipboardFallback, DEFAULT_TOAST_MS, PageConfig};
pub use events::{Action, EventOutcome, Key, KeyEvent, KeyMods};
pub use modal::ModalState;
pub use page::{PendingPost, SitePage, Submission, SubmitReport};
pub use platform::{Platform, PlatformError};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
