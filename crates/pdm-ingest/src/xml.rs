//! In-memory XML element tree for PDM documents.
//!
//! PowerDesigner writes every element under one of three namespace prefixes
//! (`o:` objects, `c:` collections, `a:` attributes). Lookups here work on
//! local names only, so `c:Tables` is addressed as `Tables`.
//!
//! The tree is built in a single pass with the `quick-xml` pull reader and
//! holds no references into the source text.

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::{IngestError, Result};

/// An element with its attributes, child elements and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local element name (namespace prefix removed).
    pub name: String,
    /// Attributes by local name, in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Trimmed text content directly inside this element.
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// All child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter()
    }

    /// Text of the first child with the given name.
    ///
    /// `None` when the child is absent; an empty child yields `Some("")`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    /// First descendant (excluding `self`) with the given name, searched
    /// depth-first in document order.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }
}

/// Parse a complete XML document and return its root element.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| xml_error(&reader, err))?;
        match event {
            Event::Start(start) => {
                stack.push(open_element(&reader, &start)?);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, &start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, finish(element));
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = stack.last_mut() {
                    let resolved = resolve_reference(&reader, &reference)?;
                    current.text.push_str(&resolved);
                }
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(xml_error(
                        &reader,
                        format!("unexpected end of document inside <{}>", open.name),
                    ));
                }
                break;
            }
            // Declarations, processing instructions, comments and doctypes
            _ => {}
        }
    }

    root.ok_or(IngestError::EmptyDocument)
}

fn open_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|err| xml_error(reader, err))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| xml_error(reader, err))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn resolve_reference(
    reader: &Reader<&[u8]>,
    reference: &quick_xml::events::BytesRef<'_>,
) -> Result<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| xml_error(reader, err))?
    {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|err| xml_error(reader, err))?;
    resolve_xml_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| xml_error(reader, format!("unknown entity &{name};")))
}

/// Text arrives in pieces around entity references and between child
/// elements; trim only the joined result.
fn finish(mut element: XmlElement) -> XmlElement {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }
    element
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> IngestError {
    IngestError::Xml {
        position: reader.buffer_position() as u64,
        message: err.to_string(),
    }
}
