//! Host input types: keys, modifiers and the click actions the page understands.

/// Keyboard modifier flags for key events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMods {
    /// Whether the Control (Ctrl) key is pressed.
    pub ctrl: bool,
    /// Whether the Alt key is pressed.
    pub alt: bool,
    /// Whether the Shift key is pressed.
    pub shift: bool,
}

/// Keys the page reacts to. Everything else is carried as `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: KeyMods,
}

impl KeyEvent {
    pub const fn new(key: Key, mods: KeyMods) -> Self {
        Self { key, mods }
    }

    pub const fn tab() -> Self {
        Self::new(Key::Tab, KeyMods { ctrl: false, alt: false, shift: false })
    }

    pub const fn shift_tab() -> Self {
        Self::new(Key::Tab, KeyMods { ctrl: false, alt: false, shift: true })
    }

    pub const fn escape() -> Self {
        Self::new(Key::Escape, KeyMods { ctrl: false, alt: false, shift: false })
    }
}

/// Whether a handler consumed the event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Default handling was prevented.
    Handled,
    /// The host should apply its default behaviour.
    PassThrough,
}

impl EventOutcome {
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Value of a `data-action` attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenSignup,
    CloseModal,
}

impl Action {
    pub const ATTRIBUTE: &'static str = "data-action";

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "openSignup" => Some(Self::OpenSignup),
            "closeModal" => Some(Self::CloseModal),
            _ => None,
        }
    }
}
