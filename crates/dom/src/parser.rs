use crate::{DOM, NodeId};
use anyhow::Error;
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use log::trace;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse `markup` as body content and graft the resulting nodes under `parent`.
///
/// html5ever always builds a full document, so the fragment is taken from the
/// children of the synthesized `<body>`. Whitespace-only text, comments and
/// doctypes are dropped.
pub fn insert_markup(dom: &mut DOM, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, Error> {
    let parsed: RcDom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    let Some(body) = find_body(&parsed.document) else {
        return Ok(Vec::new());
    };
    let mut inserted = Vec::new();
    for child in body.children.borrow().iter() {
        if let Some(node) = convert_node(dom, child, parent)? {
            inserted.push(node);
        }
    }
    trace!("inserted {} top-level nodes under {parent:?}", inserted.len());
    Ok(inserted)
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data
        && &*name.local == "body"
    {
        return Some(Handle::clone(handle));
    }
    handle.children.borrow().iter().find_map(find_body)
}

fn convert_node(dom: &mut DOM, handle: &Handle, parent: NodeId) -> Result<Option<NodeId>, Error> {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                return Ok(None);
            }
            let node = dom.create_text(&text);
            dom.append_child(parent, node)?;
            Ok(Some(node))
        }
        NodeData::Element { name, attrs, .. } => {
            let node = dom.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                dom.set_attr(node, &attr.name.local, &attr.value);
            }
            dom.append_child(parent, node)?;
            for child in handle.children.borrow().iter() {
                convert_node(dom, child, node)?;
            }
            Ok(Some(node))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::DOM;
    use anyhow::{Error, anyhow};

    #[test]
    fn nested_markup_keeps_order_and_attributes() -> Result<(), Error> {
        let mut dom = DOM::new();
        let body = dom.body();
        let top = dom.insert_html(
            body,
            r#"<div id="outer" class="a b"><span>one</span> <span>two</span></div><p>after</p>"#,
        )?;
        assert_eq!(top.len(), 2);
        let Some(outer) = dom.get_element_by_id("outer") else {
            return Err(anyhow!("outer missing"));
        };
        assert_eq!(dom.attr(outer, "class"), Some("a b"));
        let spans = dom.find_all(outer, |dom, node| dom.tag(node) == Some("span"));
        let texts: Vec<String> = spans.iter().map(|node| dom.text_content(*node)).collect();
        assert_eq!(texts, ["one", "two"]);
        Ok(())
    }

    #[test]
    fn escaped_entities_become_plain_text() -> Result<(), Error> {
        let dom = DOM::from_body_html("<p id=\"msg\">&lt;script&gt;alert(1)&lt;/script&gt;</p>")?;
        let Some(msg) = dom.get_element_by_id("msg") else {
            return Err(anyhow!("msg missing"));
        };
        assert_eq!(dom.text_content(msg), "<script>alert(1)</script>");
        assert!(dom.find_first(dom.root(), |dom, node| dom.tag(node) == Some("script")).is_none());
        Ok(())
    }
}
