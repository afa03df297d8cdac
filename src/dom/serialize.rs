//! HTML serialization of arena nodes.

use super::{Dom, NodeData, NodeId};
use crate::util::{escape_attr, escape_text};

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl Dom {
    /// Serialize a node including its own tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_children(id, &mut out);
        out
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        let raw = self
            .local_name(id)
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
        for child in self.children(id) {
            match self.text(child) {
                Some(text) if raw => out.push_str(text),
                _ => self.write_node(child, out),
            }
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Document | NodeData::Fragment => self.write_children(id, out),
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref();
                out.push('<');
                out.push_str(tag);
                for attr in attrs {
                    out.push(' ');
                    if let Some(prefix) = &attr.name.prefix {
                        out.push_str(prefix.as_ref());
                        out.push(':');
                    }
                    out.push_str(attr.name.local.as_ref());
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                self.write_children(id, out);

                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_roundtrip_simple_markup() {
        let html = r#"<div class="a" data-x="1"><p>Hi <b>there</b></p><br><img src="x.png"></div>"#;
        let dom = parse_html(html);
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(dom.outer_html(div), html);
    }

    #[test]
    fn test_escaping() {
        let dom = parse_html(r#"<p title="a&quot;b">1 &lt; 2 &amp; 3</p>"#);
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.outer_html(p), r#"<p title="a&quot;b">1 &lt; 2 &amp; 3</p>"#);
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let dom = parse_html("<script>if (a < b) {}</script>");
        let script = dom.find_by_tag("script").unwrap();
        assert_eq!(dom.inner_html(script), "if (a < b) {}");
        assert_eq!(dom.outer_html(script), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_doctype_and_comment() {
        let dom = parse_html("<!DOCTYPE html><!-- note --><p></p>");
        let html = dom.outer_html(dom.document());
        assert!(html.starts_with("<!DOCTYPE html><!-- note -->"));
    }
}
