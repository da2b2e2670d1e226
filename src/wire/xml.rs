//! XML parse/build primitives for Wire Trees.
//!
//! [`parse`] returns a document element whose single child is the root element, so a
//! response `<messages>...</messages>` is reached as `tree.get("messages")`. [`build`]
//! expects the same shape.

use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{Element, WireNode};

/// Errors raised while reading or writing carrier XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Text or names that could not be decoded.
    #[error("failed to decode XML content: {0}")]
    Decode(String),

    /// The document ended inside an open element.
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// A tree that cannot be written as a document.
    #[error("invalid XML document: {0}")]
    InvalidDocument(String),
}

struct OpenElement {
    name: String,
    element: Element,
    text: String,
}

impl OpenElement {
    fn open(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| XmlError::Decode(e.to_string()))?
            .to_string();

        let mut element = Element::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| XmlError::Decode(e.to_string()))?
                .to_string();
            let value = attribute
                .decode_and_unescape_value(reader.decoder())
                .map_err(|e| XmlError::Decode(e.to_string()))?;
            element.set_attribute(key, value.into_owned());
        }

        Ok(Self {
            name,
            element,
            text: String::new(),
        })
    }

    fn finish(self) -> (String, WireNode) {
        let OpenElement {
            name,
            mut element,
            text,
        } = self;

        let blank = text.trim().is_empty();
        if element.children.is_empty() && element.attributes.is_empty() {
            let text = if blank { String::new() } else { text };
            return (name, WireNode::Text(text));
        }

        if !blank {
            element.text = Some(if element.children.is_empty() {
                text
            } else {
                text.trim().to_string()
            });
        }
        (name, WireNode::Element(element))
    }
}

/// Parse an XML document into a Wire Tree.
///
/// A blank body yields an empty document element.
pub fn parse(text: &str) -> Result<WireNode, XmlError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut document = Element::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(OpenElement::open(&start, &reader)?);
            }
            Event::Empty(start) => {
                let (name, node) = OpenElement::open(&start, &reader)?.finish();
                match stack.last_mut() {
                    Some(parent) => parent.element.append_child(name, node),
                    None => document.append_child(name, node),
                }
            }
            Event::Text(content) => {
                if let Some(open) = stack.last_mut() {
                    let decoded = content
                        .decode()
                        .map_err(|e| XmlError::Decode(e.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|e| XmlError::Decode(e.to_string()))?;
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(content) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(open) = stack.last_mut() {
                    let resolved = reference
                        .resolve_char_ref()
                        .map_err(|e| XmlError::Decode(e.to_string()))?;
                    if let Some(c) = resolved {
                        open.text.push(c);
                    } else {
                        let name = reference
                            .decode()
                            .map_err(|e| XmlError::Decode(e.to_string()))?;
                        match quick_xml::escape::resolve_predefined_entity(&name) {
                            Some(resolved) => open.text.push_str(resolved),
                            None => {
                                return Err(XmlError::Decode(format!(
                                    "unknown entity reference &{name};"
                                )))
                            }
                        }
                    }
                }
            }
            Event::End(_) => {
                if let Some(open) = stack.pop() {
                    let (name, node) = open.finish();
                    match stack.last_mut() {
                        Some(parent) => parent.element.append_child(name, node),
                        None => document.append_child(name, node),
                    }
                }
            }
            Event::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnexpectedEof(open.name));
    }
    Ok(WireNode::Element(document))
}

/// Serialize a document element into XML text with a UTF-8 declaration.
pub fn build(document: &WireNode) -> Result<String, XmlError> {
    let element = document.as_element().ok_or_else(|| {
        XmlError::InvalidDocument("document must be an element holding the root".to_string())
    })?;
    if element.children.is_empty() {
        return Err(XmlError::InvalidDocument("document has no root element".to_string()));
    }

    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    for (name, node) in &element.children {
        check_names(name, node)?;
        write_node(&mut writer, name, node)?;
    }

    String::from_utf8(buf).map_err(|e| XmlError::Decode(e.to_string()))
}

/// Reject element and attribute names that would serialize as `<>` or `=""`.
fn check_names(name: &str, node: &WireNode) -> Result<(), XmlError> {
    if name.is_empty() {
        return Err(XmlError::InvalidDocument("empty element name".to_string()));
    }
    match node {
        WireNode::Text(_) => Ok(()),
        WireNode::List(items) => items.iter().try_for_each(|item| check_names(name, item)),
        WireNode::Element(element) => {
            if let Some((_, value)) = element.attributes.iter().find(|(key, _)| key.is_empty()) {
                return Err(XmlError::InvalidDocument(format!(
                    "empty attribute name on <{name}> (value {value:?})"
                )));
            }
            element
                .children
                .iter()
                .try_for_each(|(child_name, child)| check_names(child_name, child))
        }
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, name: &str, node: &WireNode) -> io::Result<()> {
    match node {
        WireNode::Text(text) if text.is_empty() => {
            writer.create_element(name).write_empty()?;
        }
        WireNode::Text(text) => {
            writer
                .create_element(name)
                .write_text_content(BytesText::new(text))?;
        }
        WireNode::List(items) => {
            for item in items {
                write_node(writer, name, item)?;
            }
        }
        WireNode::Element(element) => {
            let start = writer.create_element(name).with_attributes(
                element
                    .attributes
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
            if element.children.is_empty() && element.text.is_none() {
                start.write_empty()?;
            } else {
                start.write_inner_content(|w| -> io::Result<()> {
                    if let Some(text) = &element.text {
                        w.write_event(Event::Text(BytesText::new(text)))?;
                    }
                    for (child_name, child) in &element.children {
                        write_node(w, child_name, child)?;
                    }
                    Ok(())
                })?;
            }
        }
    }
    Ok(())
}
