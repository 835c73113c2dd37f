//! Transient status toast. One element, one pending hide; the latest call wins.

use core::time::Duration;

use anyhow::Error;
use dom::{DOM, NodeId};
use log::trace;
use tokio::time::Instant;

use crate::render::TOAST_ID;

pub const VISIBLE_CLASS: &str = "visible";

#[derive(Debug, Default)]
pub struct Toast {
    hide_at: Option<Instant>,
}

impl Toast {
    pub const fn new() -> Self {
        Self { hide_at: None }
    }

    /// The `#siteToast` element, created at the end of body when absent.
    fn element(dom: &mut DOM) -> Result<NodeId, Error> {
        if let Some(existing) = dom.get_element_by_id(TOAST_ID) {
            return Ok(existing);
        }
        let node = dom.create_element("div");
        dom.set_attr(node, "id", TOAST_ID);
        dom.set_attr(node, "role", "status");
        dom.set_attr(node, "class", "site-toast");
        let body = dom.body();
        dom.append_child(body, node)?;
        Ok(node)
    }

    /// Show `message` and schedule the hide for `now + duration`, replacing any earlier one.
    ///
    /// # Errors
    /// Returns an error if the toast element cannot be attached.
    pub fn show(&mut self, dom: &mut DOM, message: &str, duration: Duration, now: Instant) -> Result<(), Error> {
        let node = Self::element(dom)?;
        dom.set_text_content(node, message)?;
        dom.add_class(node, VISIBLE_CLASS);
        self.hide_at = Some(now + duration);
        trace!("toast shown for {duration:?}: {message}");
        Ok(())
    }

    /// Apply the pending hide if it is due. Returns whether the toast was hidden.
    pub fn tick_at(&mut self, dom: &mut DOM, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if deadline <= now => {
                self.hide_at = None;
                if let Some(node) = dom.get_element_by_id(TOAST_ID) {
                    dom.remove_class(node, VISIBLE_CLASS);
                }
                true
            }
            _ => false,
        }
    }

    pub const fn next_deadline(&self) -> Option<Instant> {
        self.hide_at
    }

    pub fn is_visible(dom: &DOM) -> bool {
        dom.get_element_by_id(TOAST_ID)
            .is_some_and(|node| dom.has_class(node, VISIBLE_CLASS))
    }

    pub fn text(dom: &DOM) -> Option<String> {
        dom.get_element_by_id(TOAST_ID).map(|node| dom.text_content(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_call_replaces_deadline_and_text() -> Result<(), Error> {
        let mut dom = DOM::new();
        let mut toast = Toast::new();
        let start = Instant::now();
        toast.show(&mut dom, "first", Duration::from_millis(3000), start)?;
        toast.show(&mut dom, "second", Duration::from_millis(3000), start + Duration::from_millis(2000))?;
        let toasts = dom.find_all(dom.root(), |dom, node| dom.attr(node, "id") == Some(TOAST_ID));
        assert_eq!(toasts.len(), 1);
        assert_eq!(Toast::text(&dom).as_deref(), Some("second"));

        assert!(!toast.tick_at(&mut dom, start + Duration::from_millis(3000)));
        assert!(Toast::is_visible(&dom));
        assert!(toast.tick_at(&mut dom, start + Duration::from_millis(5000)));
        assert!(!Toast::is_visible(&dom));
        assert_eq!(toast.next_deadline(), None);
        Ok(())
    }

    #[test]
    fn element_carries_status_role() -> Result<(), Error> {
        let mut dom = DOM::new();
        Toast::new().show(&mut dom, "hi", Duration::from_millis(10), Instant::now())?;
        let node = dom
            .get_element_by_id(TOAST_ID)
            .ok_or_else(|| anyhow::anyhow!("toast missing"))?;
        assert_eq!(dom.attr(node, "role"), Some("status"));
        assert!(dom.has_class(node, "site-toast"));
        assert_eq!(dom.parent(node), Some(dom.body()));
        Ok(())
    }
}
