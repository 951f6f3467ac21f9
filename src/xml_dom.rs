//! A minimal, owned DOM over `quick-xml`'s pull parser.
//!
//! The SDN Advanced document is a cross-referenced graph of elements keyed
//! by numeric IDs; resolving those references cleanly needs a tree to walk
//! more than once, so we build one up front instead of streaming the whole
//! document in a single pass. Namespace prefixes are stripped to local
//! names at parse time — callers never see them.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml syntax error at position {position}: {source}")]
    Syntax {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed attribute at position {position}")]
    Attribute { position: usize },
    #[error("document has no root element")]
    NoRoot,
}

/// One node of the parsed DOM. `tag` and attribute keys are local names
/// only — any `prefix:` namespace qualifier has already been stripped.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    fn new(tag: String) -> Self {
        Element {
            tag,
            attrs: HashMap::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// First direct child with the given local tag name.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given local tag name, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Own text content, trimmed. Empty when the element has no text.
    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Parse a complete XML document into an owned DOM rooted at its single
/// top-level element.
pub fn parse(bytes: &[u8]) -> Result<Element, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = local_name(e.name().as_ref());
                let mut elem = Element::new(tag);
                for attr in e.attributes() {
                    let attr = attr.map_err(|_| XmlError::Attribute { position })?;
                    let key = local_name(attr.key.as_ref());
                    let value = attr
                        .unescape_value()
                        .map_err(|source| XmlError::Syntax { position, source })?
                        .into_owned();
                    elem.attrs.insert(key, value);
                }
                stack.push(elem);
            }
            Ok(Event::Empty(e)) => {
                let tag = local_name(e.name().as_ref());
                let mut elem = Element::new(tag);
                for attr in e.attributes() {
                    let attr = attr.map_err(|_| XmlError::Attribute { position })?;
                    let key = local_name(attr.key.as_ref());
                    let value = attr
                        .unescape_value()
                        .map_err(|source| XmlError::Syntax { position, source })?
                        .into_owned();
                    elem.attrs.insert(key, value);
                }
                push_finished(&mut stack, &mut root, elem);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|source| XmlError::Syntax { position, source })?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if let Some(elem) = stack.pop() {
                    push_finished(&mut stack, &mut root, elem);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(source) => return Err(XmlError::Syntax { position, source }),
        }
        buf.clear();
    }

    root.ok_or(XmlError::NoRoot)
}

/// Attach a finished element to its parent, or set it as the document root
/// if the stack is empty.
fn push_finished(stack: &mut Vec<Element>, root: &mut Option<Element>, elem: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => *root = Some(elem),
    }
}

/// Strip a `prefix:` namespace qualifier, returning the local name only.
fn local_name(raw: &[u8]) -> String {
    let s = String::from_utf8_lossy(raw);
    match s.rfind(':') {
        Some(idx) => s[idx + 1..].to_string(),
        None => s.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attrs() {
        let xml = br#"<Root><Child id="1">hello</Child><Child id="2"/></Root>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.tag, "Root");
        let children: Vec<_> = root.children_named("Child").collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attr("id"), Some("1"));
        assert_eq!(children[0].text_trimmed(), "hello");
        assert_eq!(children[1].attr("id"), Some("2"));
        assert_eq!(children[1].text_trimmed(), "");
    }

    #[test]
    fn strips_namespace_prefixes() {
        let xml = br#"<ns:Root xmlns:ns="urn:example"><ns:Leaf>x</ns:Leaf></ns:Root>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.tag, "Root");
        assert_eq!(root.child("Leaf").unwrap().text_trimmed(), "x");
    }

    #[test]
    fn decodes_entities_in_text_and_attrs() {
        let xml = br#"<Root name="A &amp; B">Tom &amp; Jerry</Root>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.attr("name"), Some("A & B"));
        assert_eq!(root.text_trimmed(), "Tom & Jerry");
    }

    #[test]
    fn rejects_malformed_xml() {
        let xml = b"<Root><Unclosed></Root>";
        assert!(parse(xml).is_err());
    }
}
