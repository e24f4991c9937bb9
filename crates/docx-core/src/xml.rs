//! Owned XML tree for package parts
//!
//! Parts are parsed into plain `Element`/`Node` values so the document can be
//! cloned and mutated freely, then written back. Qualified names are kept as
//! they appear in the part (`w:p`, `w:t`, ...).

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DocxError;

pub const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Child elements, skipping text nodes
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.is(name))
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.is(name))
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Position in `children` of the n-th child element named `name`
    pub fn child_position(&self, name: &str, nth: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, Node::Element(el) if el.is(name)))
            .nth(nth)
            .map(|(pos, _)| pos)
    }

    pub fn remove_children_named(&mut self, names: &[&str]) {
        self.children
            .retain(|node| !matches!(node, Node::Element(el) if names.contains(&el.name.as_str())));
    }

    /// True if any descendant element has this name
    pub fn contains_descendant(&self, name: &str) -> bool {
        self.elements()
            .any(|el| el.is(name) || el.contains_descendant(name))
    }

    /// Element reached by following child positions
    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &pos in path {
            current = match current.children.get(pos)? {
                Node::Element(el) => el,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &pos in path {
            current = match current.children.get_mut(pos)? {
                Node::Element(el) => el,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }
}

/// Parse a complete XML part into its root element
pub fn parse(xml: &str) -> Result<Element, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(DocxError::XmlError(format!(
                    "{} at byte {}",
                    e,
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DocxError::XmlError("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| DocxError::XmlError(e.to_string()))?;
                push_text(&mut stack, text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, Cow::Owned(text));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // are not carried through.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DocxError::XmlError(format!(
            "unclosed element <{}>",
            stack.last().map(|el| el.name.as_str()).unwrap_or_default()
        )));
    }
    root.ok_or_else(|| DocxError::XmlError("part has no root element".to_string()))
}

/// Serialize a root element as a standalone part
pub fn to_xml_string(root: &Element) -> String {
    let mut out = String::from(XML_DECLARATION);
    write_element(root, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(el) => write_element(el, out),
            Node::Text(text) => out.push_str(&escape(text.as_str())),
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, DocxError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocxError::XmlError(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DocxError::XmlError(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DocxError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(DocxError::XmlError(
            "more than one root element".to_string(),
        )),
    }
}

fn push_text(stack: &mut [Element], text: Cow<'_, str>) {
    if text.is_empty() {
        return;
    }
    // Text outside the root element is whitespace between prolog items.
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Text(text.into_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested_elements() {
        let xml = r#"<?xml version="1.0"?><w:p a="1"><w:r><w:t xml:space="preserve"> A &amp; B </w:t></w:r><w:r/></w:p>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.name, "w:p");
        assert_eq!(root.attr("a"), Some("1"));
        assert_eq!(root.elements().count(), 2);
        let t = root.child("w:r").unwrap().child("w:t").unwrap();
        assert_eq!(t.text(), " A & B ");
        assert_eq!(t.attr("xml:space"), Some("preserve"));
    }

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let el = Element::new("w:t")
            .with_attr("title", "a \"quoted\" <value>")
            .with_text("1 < 2 & 3");
        let xml = to_xml_string(&el);
        assert!(xml.starts_with(XML_DECLARATION));
        let reparsed = parse(&xml).unwrap();
        assert_eq!(reparsed, el);
    }

    #[test]
    fn test_empty_elements_self_close() {
        let xml = to_xml_string(&Element::new("w:br"));
        assert!(xml.ends_with("<w:br/>"));
    }

    #[test]
    fn test_unbalanced_xml_is_an_error() {
        assert!(parse("<w:p><w:r></w:p>").is_err());
        assert!(parse("<w:p>").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_paths_and_positions() {
        let root = Element::new("w:p")
            .with_child(Element::new("w:pPr"))
            .with_child(Element::new("w:r").with_child(Element::new("w:t").with_text("x")))
            .with_child(Element::new("w:r"));
        assert_eq!(root.child_position("w:r", 1), Some(2));
        assert_eq!(root.at_path(&[1, 0]).unwrap().text(), "x");
        assert!(root.at_path(&[1, 0, 0]).is_none());
        assert!(root.contains_descendant("w:t"));
    }

    #[test]
    fn test_remove_children_named() {
        let mut root = Element::new("w:r")
            .with_child(Element::new("w:rPr"))
            .with_child(Element::new("w:t"))
            .with_child(Element::new("w:tab"));
        root.remove_children_named(&["w:t", "w:tab"]);
        assert_eq!(root.elements().count(), 1);
        assert!(root.child("w:rPr").is_some());
    }
}
