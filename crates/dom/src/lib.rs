//! Headless document model for the site runtime.
//!
//! The tree lives in an `indextree` arena owned by [`DOM`]. Markup is parsed
//! with html5ever and grafted under an existing node, which is how the page
//! mounts rendered navigation, the signup modal and inline messages. Besides
//! structure and attributes the document tracks the focused element and the
//! live value of form controls.
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

mod escape;
mod parser;
mod printing;

use anyhow::{Error, anyhow};
use indextree::Arena;
use log::trace;
use smallvec::SmallVec;

pub use escape::escape_html;
pub use indextree::NodeId;

/// Tags that take focus without a `tabindex`.
const NATURALLY_FOCUSABLE: [&str; 5] = ["a", "button", "input", "select", "textarea"];

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element { tag: String },
    Text { text: String },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
    /// Live value of a form control, once something has written it.
    pub value: Option<String>,
}

impl DOMNode {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            ..Self::default()
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            ..Self::default()
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The document: `#document > html > body`, plus focus state.
pub struct DOM {
    dom: Arena<DOMNode>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for DOM {
    fn default() -> Self {
        Self::new()
    }
}

impl DOM {
    /// Create an empty document with `html` and `body` elements.
    pub fn new() -> Self {
        let mut dom = Arena::new();
        let root = dom.new_node(DOMNode::default());
        let html = dom.new_node(DOMNode::element("html"));
        let body = dom.new_node(DOMNode::element("body"));
        root.append(html, &mut dom);
        html.append(body, &mut dom);
        Self {
            dom,
            root,
            body,
            focused: None,
        }
    }

    /// Create a document whose body holds the given markup.
    ///
    /// # Errors
    /// Returns an error if the parsed nodes cannot be attached.
    pub fn from_body_html(markup: &str) -> Result<Self, Error> {
        let mut dom = Self::new();
        let body = dom.body;
        dom.insert_html(body, markup)?;
        Ok(dom)
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Node data, if the node exists and has not been removed.
    pub fn node(&self, node: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(node)
            .filter(|entry| !entry.is_removed())
            .map(indextree::Node::get)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut DOMNode> {
        self.dom
            .get_mut(node)
            .filter(|entry| !entry.is_removed())
            .map(indextree::Node::get_mut)
    }

    /// Whether the node is still connected to the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).is_some() && node.ancestors(&self.dom).any(|ancestor| ancestor == self.root)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(DOMNode::tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.get(node).and_then(indextree::Node::parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.dom).collect()
    }

    // -----------------------
    // Structure
    // -----------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.dom.new_node(DOMNode::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.dom.new_node(DOMNode::text(text))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Returns an error if either node was removed or the append would form a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        parent
            .checked_append(child, &mut self.dom)
            .map_err(|err| anyhow!("cannot append {child:?} to {parent:?}: {err:?}"))
    }

    /// Insert `child` as the first child of `parent`.
    ///
    /// # Errors
    /// Returns an error if either node was removed or the insert would form a cycle.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        parent
            .checked_prepend(child, &mut self.dom)
            .map_err(|err| anyhow!("cannot prepend {child:?} to {parent:?}: {err:?}"))
    }

    /// Detach and drop a node with its whole subtree. Focus inside the subtree is lost.
    pub fn remove(&mut self, node: NodeId) {
        if self.node(node).is_none() || node == self.root {
            return;
        }
        if self.focused.is_some_and(|focused| self.contains(node, focused)) {
            trace!("focused node {node:?} removed, focus returns to body");
            self.focused = None;
        }
        node.remove_subtree(&mut self.dom);
    }

    pub fn remove_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.remove(child);
        }
    }

    /// Parse `markup` and append the resulting nodes to `parent`, returning the top-level nodes.
    ///
    /// # Errors
    /// Returns an error if `parent` is not a live node.
    pub fn insert_html(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, Error> {
        if self.node(parent).is_none() {
            return Err(anyhow!("cannot insert markup under removed node {parent:?}"));
        }
        parser::insert_markup(self, parent, markup)
    }

    /// Replace all children of `node` with parsed `markup`.
    ///
    /// # Errors
    /// Returns an error if `node` is not a live node.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<Vec<NodeId>, Error> {
        self.remove_children(node);
        self.insert_html(node, markup)
    }

    // -----------------------
    // Attributes and text
    // -----------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).and_then(|data| data.attr(name))
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        if let Some(slot) = data.attrs.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut slot.1);
        } else {
            data.attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|list| list.split_whitespace().any(|token| token == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let list = match self.attr(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_owned(),
        };
        self.set_attr(node, "class", &list);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(existing) = self.attr(node, "class") else {
            return;
        };
        let list: Vec<&str> = existing
            .split_whitespace()
            .filter(|token| *token != class)
            .collect();
        let joined = list.join(" ");
        self.set_attr(node, "class", &joined);
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for id in node.descendants(&self.dom) {
            if let Some(DOMNode {
                kind: NodeKind::Text { text },
                ..
            }) = self.node(id)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the children of `node` with a single text node.
    ///
    /// # Errors
    /// Returns an error if `node` is not a live node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), Error> {
        self.remove_children(node);
        if text.is_empty() {
            return Ok(());
        }
        let text_node = self.create_text(text);
        self.append_child(node, text_node)
    }

    // -----------------------
    // Form controls
    // -----------------------

    /// Current value of a form control. Falls back to the `value` attribute, then the
    /// text of a textarea, then the empty string.
    pub fn value(&self, node: NodeId) -> String {
        let Some(data) = self.node(node) else {
            return String::new();
        };
        if let Some(value) = &data.value {
            return value.clone();
        }
        if let Some(value) = data.attr("value") {
            return value.to_owned();
        }
        if data.tag() == Some("textarea") {
            return self.text_content(node);
        }
        String::new()
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(data) = self.node_mut(node) {
            data.value = Some(value.to_owned());
        }
    }

    // -----------------------
    // Lookup
    // -----------------------

    /// Elements strictly below `scope`, in document order.
    pub fn descendant_elements(&self, scope: NodeId) -> Vec<NodeId> {
        scope
            .descendants(&self.dom)
            .skip(1)
            .filter(|id| self.tag(*id).is_some())
            .collect()
    }

    pub fn find_first<P>(&self, scope: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Self, NodeId) -> bool,
    {
        self.descendant_elements(scope)
            .into_iter()
            .find(|id| predicate(self, *id))
    }

    pub fn find_all<P>(&self, scope: NodeId, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&Self, NodeId) -> bool,
    {
        self.descendant_elements(scope)
            .into_iter()
            .filter(|id| predicate(self, *id))
            .collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_first(self.root, |dom, node| dom.attr(node, "id") == Some(id))
    }

    /// Nearest ancestor-or-self element matching `predicate`.
    pub fn closest<P>(&self, node: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Self, NodeId) -> bool,
    {
        if self.node(node).is_none() {
            return None;
        }
        node.ancestors(&self.dom)
            .filter(|id| self.tag(*id).is_some())
            .find(|id| predicate(self, *id))
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.node(node).is_some() && node.ancestors(&self.dom).any(|id| id == ancestor)
    }

    // -----------------------
    // Focus
    // -----------------------

    /// Attached, enabled element that is either a native control (links need an
    /// `href`) or carries a `tabindex`.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        if !self.is_attached(node) || self.attr(node, "disabled").is_some() {
            return false;
        }
        if self.attr(node, "tabindex").is_some() {
            return true;
        }
        match tag {
            "a" => self.attr(node, "href").is_some(),
            _ => NATURALLY_FOCUSABLE.contains(&tag),
        }
    }

    /// Move focus to `node`. Returns false and leaves focus unchanged if it cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) {
            return false;
        }
        self.focused = Some(node);
        true
    }

    /// The focused element, if it is still attached.
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused.filter(|node| self.is_attached(*node))
    }
}
