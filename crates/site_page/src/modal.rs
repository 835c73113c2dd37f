//! Signup modal lifecycle: mount, focus trap, Escape handling and teardown.

use anyhow::{Error, anyhow};
use dom::{DOM, NodeId};
use log::{debug, trace};
use site_config::FormConfig;

use crate::events::{EventOutcome, Key, KeyEvent};
use crate::focus;
use crate::render::{FORM_ID, MODAL_BACKDROP_ID, modal_markup};

/// Body class that locks background scrolling while the modal is up.
pub const SCROLL_LOCK_CLASS: &str = "modal-open";

/// Everything the controller knows about the mounted modal.
#[derive(Clone, Debug)]
pub struct ModalState {
    /// Increments on every mount; async continuations compare against it.
    pub generation: u64,
    /// Element focus returns to on close.
    pub trigger: Option<NodeId>,
    pub backdrop: NodeId,
    pub dialog: NodeId,
    pub form: NodeId,
}

#[derive(Debug, Default)]
pub struct ModalController {
    state: Option<ModalState>,
    mounts: u64,
    /// Document-level Escape listener; installed on open, removed on close.
    escape_listener: bool,
}

impl ModalController {
    pub const fn new() -> Self {
        Self {
            state: None,
            mounts: 0,
            escape_listener: false,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub const fn state(&self) -> Option<&ModalState> {
        self.state.as_ref()
    }

    /// Generation of the mounted modal, if any.
    pub fn generation(&self) -> Option<u64> {
        self.state.as_ref().map(|state| state.generation)
    }

    pub fn form(&self) -> Option<NodeId> {
        self.state.as_ref().map(|state| state.form)
    }

    pub const fn escape_listener_installed(&self) -> bool {
        self.escape_listener
    }

    /// Whether `node` is exactly the mounted backdrop.
    pub fn is_backdrop(&self, node: NodeId) -> bool {
        self.state.as_ref().is_some_and(|state| state.backdrop == node)
    }

    /// Mount the modal at the end of `<body>`. Returns `false` when it is already open.
    ///
    /// `trigger` defaults to the element focused at the time of the call.
    ///
    /// # Errors
    /// Returns an error if the rendered markup cannot be mounted.
    pub fn open(&mut self, dom: &mut DOM, form: &FormConfig, trigger: Option<NodeId>) -> Result<bool, Error> {
        if self.state.is_some() {
            trace!("modal already open");
            return Ok(false);
        }
        let trigger = trigger.or_else(|| dom.active_element());
        let body = dom.body();
        let mounted = dom.insert_html(body, &modal_markup(form))?;
        let backdrop = mounted
            .iter()
            .copied()
            .find(|node| dom.attr(*node, "id") == Some(MODAL_BACKDROP_ID));
        let dialog = backdrop.and_then(|root| dom.find_first(root, |dom, node| dom.has_class(node, "modal")));
        let form_node = backdrop.and_then(|root| dom.find_first(root, |dom, node| dom.attr(node, "id") == Some(FORM_ID)));
        let (Some(backdrop), Some(dialog), Some(form_node)) = (backdrop, dialog, form_node) else {
            for node in mounted {
                dom.remove(node);
            }
            return Err(anyhow!("modal markup did not produce backdrop, dialog and form"));
        };

        dom.add_class(body, SCROLL_LOCK_CLASS);
        if let Some(first) = focus::initial_focus(dom, dialog) {
            dom.focus(first);
        }
        self.mounts += 1;
        self.state = Some(ModalState {
            generation: self.mounts,
            trigger,
            backdrop,
            dialog,
            form: form_node,
        });
        self.escape_listener = true;
        debug!("signup modal opened (generation {})", self.mounts);
        Ok(true)
    }

    /// Unmount the modal and restore focus. Returns `false` when nothing was open.
    pub fn close(&mut self, dom: &mut DOM) -> bool {
        let Some(state) = self.state.take() else {
            return false;
        };
        self.escape_listener = false;
        dom.remove(state.backdrop);
        let body = dom.body();
        dom.remove_class(body, SCROLL_LOCK_CLASS);
        if let Some(trigger) = state.trigger
            && !dom.focus(trigger)
        {
            trace!("trigger {trigger:?} no longer focusable, focus not restored");
        }
        debug!("signup modal closed (generation {})", state.generation);
        true
    }

    /// Escape closes; Tab and Shift+Tab wrap at the edges of the dialog.
    pub fn handle_key(&mut self, dom: &mut DOM, event: &KeyEvent) -> EventOutcome {
        let Some(state) = self.state.as_ref() else {
            return EventOutcome::PassThrough;
        };
        match event.key {
            Key::Escape if self.escape_listener => {
                self.close(dom);
                EventOutcome::Handled
            }
            Key::Tab => {
                let order = focus::focusables(dom, state.dialog);
                let (Some(first), Some(last)) = (order.first().copied(), order.last().copied()) else {
                    return EventOutcome::PassThrough;
                };
                let active = dom.active_element();
                if event.mods.shift && active == Some(first) {
                    dom.focus(last);
                    EventOutcome::Handled
                } else if !event.mods.shift && active == Some(last) {
                    dom.focus(first);
                    EventOutcome::Handled
                } else {
                    EventOutcome::PassThrough
                }
            }
            _ => EventOutcome::PassThrough,
        }
    }
}
