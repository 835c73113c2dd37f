//! Tab order and focus traversal inside a subtree.

use dom::{DOM, NodeId};

/// Controls a dialog focuses on open, in preference order before the submit button.
const FORM_CONTROLS: [&str; 3] = ["input", "textarea", "select"];

/// Tab-reachable elements under `scope` in document order: native controls,
/// links with an `href`, and anything with a `tabindex` other than `-1`.
pub fn focusables(dom: &DOM, scope: NodeId) -> Vec<NodeId> {
    dom.find_all(scope, |dom, node| {
        dom.attr(node, "tabindex").map_or_else(
            || dom.is_focusable(node),
            |tabindex| tabindex.trim() != "-1" && dom.is_focusable(node),
        )
    })
}

/// Element to focus when a dialog opens: the first form control, else the submit button.
pub fn initial_focus(dom: &DOM, scope: NodeId) -> Option<NodeId> {
    let candidates = focusables(dom, scope);
    candidates
        .iter()
        .copied()
        .find(|node| dom.tag(*node).is_some_and(|tag| FORM_CONTROLS.contains(&tag)))
        .or_else(|| {
            candidates.into_iter().find(|node| {
                dom.tag(*node) == Some("button") && dom.attr(*node, "type") == Some("submit")
            })
        })
}

/// Next element in tab order after `current`, wrapping to the first.
pub fn next(dom: &DOM, scope: NodeId, current: Option<NodeId>) -> Option<NodeId> {
    let order = focusables(dom, scope);
    let first = *order.first()?;
    Some(match current.and_then(|cur| order.iter().position(|node| *node == cur)) {
        Some(pos) if pos + 1 < order.len() => order[pos + 1],
        _ => first,
    })
}

/// Previous element in tab order before `current`, wrapping to the last.
pub fn prev(dom: &DOM, scope: NodeId, current: Option<NodeId>) -> Option<NodeId> {
    let order = focusables(dom, scope);
    let last = *order.last()?;
    Some(match current.and_then(|cur| order.iter().position(|node| *node == cur)) {
        Some(pos) if pos > 0 => order[pos - 1],
        _ => last,
    })
}
