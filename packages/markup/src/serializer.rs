use crate::parser::is_void_element;
use crate::tree::{Document, NodeData, NodeId};

/// Serializer converts a markup tree back to text
///
/// Output is compact and stable: no whitespace is added or removed, text and
/// comments are written verbatim, tag and attribute names come out
/// lower-cased and attribute values are always double-quoted. Serializing a
/// re-parsed serialization yields the same bytes.
pub struct Serializer {
    buffer: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Serialize the children of `parent`, excluding `parent` itself
    pub fn serialize_children(mut self, doc: &Document, parent: NodeId) -> String {
        for &child in doc.children(parent) {
            self.write_node(doc, child);
        }
        self.buffer
    }

    fn write_node(&mut self, doc: &Document, id: NodeId) {
        match doc.data(id) {
            NodeData::Document => {
                for &child in doc.children(id) {
                    self.write_node(doc, child);
                }
            }
            NodeData::Text(text) => self.buffer.push_str(text),
            NodeData::Comment(text) => {
                self.buffer.push_str("<!--");
                self.buffer.push_str(text);
                self.buffer.push_str("-->");
            }
            NodeData::Declaration(text) => self.buffer.push_str(text),
            NodeData::Element(element) => {
                self.buffer.push('<');
                self.buffer.push_str(&element.tag);
                for attr in &element.attributes {
                    self.buffer.push(' ');
                    self.buffer.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        self.buffer.push_str("=\"");
                        self.buffer.push_str(&escape_attribute(value));
                        self.buffer.push('"');
                    }
                }
                self.buffer.push('>');

                if is_void_element(&element.tag) {
                    return;
                }

                for &child in doc.children(id) {
                    self.write_node(doc, child);
                }

                self.buffer.push_str("</");
                self.buffer.push_str(&element.tag);
                self.buffer.push('>');
            }
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Values are stored as written, so existing entities pass through; a
/// literal `"` (from a single-quoted source value) or a bare `&` is escaped.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' if !starts_entity(&value[i + 1..]) => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// `name;`, `#123;` or `#x1F;` following an ampersand
fn starts_entity(rest: &str) -> bool {
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[..end];
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(dec) = body.strip_prefix('#') {
        return !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit());
    }
    !body.is_empty() && body.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Serialize every top-level node of a document
pub fn serialize(doc: &Document) -> String {
    Serializer::new().serialize_children(doc, doc.root())
}

/// Serialize only the children of `parent`
pub fn serialize_children(doc: &Document, parent: NodeId) -> String {
    Serializer::new().serialize_children(doc, parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(source: &str) -> String {
        serialize(&parse(source))
    }

    #[test]
    fn test_compact_markup_unchanged() {
        let source = r#"<div class="a"><p>one</p> <p>two &amp; three</p></div>"#;
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_normalizes_case_and_quotes() {
        assert_eq!(
            roundtrip("<DIV ID=main Title='say \"hi\"'>x</DIV>"),
            r#"<div id="main" title="say &quot;hi&quot;">x</div>"#
        );
    }

    #[test]
    fn test_void_and_self_closing() {
        assert_eq!(roundtrip("<p>a<br/>b</p><div/>"), "<p>a<br>b</p><div></div>");
    }

    #[test]
    fn test_ampersands_escaped_once() {
        assert_eq!(
            roundtrip(r#"<a href="?a=1&b=2&amp;c=3&#38;d">x</a>"#),
            r#"<a href="?a=1&amp;b=2&amp;c=3&#38;d">x</a>"#
        );
    }

    #[test]
    fn test_boolean_attribute_has_no_value() {
        assert_eq!(roundtrip("<input disabled>"), "<input disabled>");
    }

    #[test]
    fn test_whitespace_preserved() {
        let source = "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_serialization_is_stable_after_recovery() {
        let once = roundtrip("<div><p>unclosed</div><!-- c --><span x='\"'>");
        let twice = roundtrip(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(roundtrip(""), "");
    }

    #[test]
    fn test_serialize_children_excludes_parent() {
        let doc = parse("<main><a></a><b></b></main>");
        let main = doc.find_element(|e| e.is("main")).unwrap();
        assert_eq!(serialize_children(&doc, main), "<a></a><b></b>");
    }

    #[test]
    fn test_raw_text_roundtrip() {
        let source = "<style>a > b { color: red }</style>";
        assert_eq!(roundtrip(source), source);
    }
}
