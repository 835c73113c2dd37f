use core::fmt;

use super::{DOM, DOMNode, NodeKind};
use crate::escape::escape_html;
use indextree::NodeId;

use serde_json::{Map, Value, json};

/// Elements serialised without a closing tag.
const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

// -----------------------
// Module-scope helpers
// -----------------------

fn sorted_attrs(data: &DOMNode) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = data.attrs.iter().cloned().collect();
    pairs.sort_by(|left, right| left.0.cmp(&right.0));
    pairs
}

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

fn coalesce_children(dom: &DOM, id: NodeId) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in id.children(&dom.dom) {
        if let Some(DOMNode {
            kind: NodeKind::Text { text },
            ..
        }) = dom.node(child)
        {
            text_buf.push_str(text);
            continue;
        }
        flush_text(&mut children, &mut text_buf);
        let value = node_to_json(dom, child);
        if !value.is_null() {
            children.push(value);
        }
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn node_to_json(dom: &DOM, id: NodeId) -> Value {
    let Some(data) = dom.node(id) else {
        return Value::Null;
    };
    match &data.kind {
        NodeKind::Document => json!({ "type": "document", "children": coalesce_children(dom, id) }),
        NodeKind::Element { tag } => {
            let mut attrs_obj = Map::new();
            for (key, value) in sorted_attrs(data) {
                attrs_obj.insert(key, Value::String(value));
            }
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(dom, id),
            })
        }
        NodeKind::Text { text } => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                json!({ "type": "text", "text": text })
            }
        }
    }
}

fn write_markup(dom: &DOM, id: NodeId, out: &mut String) {
    let Some(data) = dom.node(id) else {
        return;
    };
    match &data.kind {
        NodeKind::Document => {
            for child in id.children(&dom.dom) {
                write_markup(dom, child, out);
            }
        }
        NodeKind::Text { text } => out.push_str(&escape_html(text)),
        NodeKind::Element { tag } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in data.attrs.iter() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_html(value));
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }
            for child in id.children(&dom.dom) {
                write_markup(dom, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

impl fmt::Debug for DOM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            Ok(())
        }

        fn escape_text(text: &str) -> String {
            let mut out = String::with_capacity(text.len());
            for ch in text.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '"' => out.push_str("\\\""),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    _ => out.push(ch),
                }
            }
            out
        }

        fn fmt_node(dom: &DOM, id: NodeId, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
            let Some(data) = dom.node(id) else {
                return Ok(());
            };
            match &data.kind {
                NodeKind::Document => {
                    write_indent(f, depth)?;
                    writeln!(f, "#document")?;
                }
                NodeKind::Element { tag } => {
                    write_indent(f, depth)?;
                    write!(f, "<{tag}")?;
                    for (key, value) in sorted_attrs(data) {
                        write!(f, " {key}=\"{}\"", escape_text(&value))?;
                    }
                    writeln!(f, ">")?;
                }
                NodeKind::Text { text } => {
                    if text.chars().all(char::is_whitespace) {
                        return Ok(());
                    }
                    write_indent(f, depth)?;
                    writeln!(f, "\"{}\"", escape_text(text))?;
                    return Ok(());
                }
            }
            for child in id.children(&dom.dom) {
                fmt_node(dom, child, f, depth + 1)?;
            }
            if let NodeKind::Element { tag } = &data.kind {
                write_indent(f, depth)?;
                writeln!(f, "</{tag}>")?;
            }
            Ok(())
        }

        writeln!(f, "DOM")?;
        fmt_node(self, self.root, f, 0)
    }
}

impl DOM {
    /// Build a deterministic JSON representation of the subtree at `node`.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ] }
    /// - Text: { "type":"text", "text":"..." }
    pub fn to_json_value(&self, node: NodeId) -> Value {
        node_to_json(self, node)
    }

    /// Pretty JSON string of the whole document for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value(self.root)).unwrap_or_else(|_| String::from("{}"))
    }

    /// Markup for the node itself and everything below it, attributes in insertion order.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        write_markup(self, node, &mut out);
        out
    }

    /// Markup for the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in node.children(&self.dom) {
            write_markup(self, child, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::DOM;
    use anyhow::{Error, anyhow};

    #[test]
    fn serialised_markup_reescapes_text_and_attributes() -> Result<(), Error> {
        let dom = DOM::from_body_html(
            r#"<div id="card" title="a &quot;quoted&quot; title"><p>1 &lt; 2</p><input name="x"></div>"#,
        )?;
        let Some(card) = dom.get_element_by_id("card") else {
            return Err(anyhow!("card missing"));
        };
        assert_eq!(
            dom.outer_html(card),
            r#"<div id="card" title="a &quot;quoted&quot; title"><p>1 &lt; 2</p><input name="x"></div>"#
        );
        Ok(())
    }

    #[test]
    fn json_snapshot_sorts_attributes() -> Result<(), Error> {
        let dom = DOM::from_body_html(r#"<a id="x" class="pill" href="/">Home</a>"#)?;
        let Some(link) = dom.get_element_by_id("x") else {
            return Err(anyhow!("link missing"));
        };
        let snapshot = dom.to_json_value(link);
        let keys: Vec<&String> = snapshot["attrs"]
            .as_object()
            .map(|attrs| attrs.keys().collect())
            .unwrap_or_default();
        assert_eq!(keys, ["class", "href", "id"]);
        assert_eq!(snapshot["children"][0]["text"], "Home");
        Ok(())
    }

    #[test]
    fn debug_print_skips_whitespace_text() -> Result<(), Error> {
        let dom = DOM::from_body_html("<ul>\n  <li>one</li>\n</ul>")?;
        let printed = format!("{dom:?}");
        assert!(printed.starts_with("DOM\n#document\n"));
        assert!(printed.contains("        <li>\n          \"one\"\n        </li>"), "{printed}");
        Ok(())
    }
}
