//! Asset loading.
//!
//! An asset is one SVG file. Loading parses it with `quick-xml`, strips
//! namespace prefixes from tag names and namespace declarations from
//! attributes, and splits the document into the root attributes and the
//! serialized markup of the root's child elements.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::AssetError;
use crate::naming::asset_stem_to_identifier;

/// A loaded asset, ready to be embedded into generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Identifier derived from the file stem (`layout-list` -> `LayoutList`).
    pub identifier: String,

    /// Root element attributes in source order.
    pub attributes: Vec<(String, String)>,

    /// Canonical serialization of the root's child elements.
    pub body: String,
}

impl AssetEntry {
    /// The complete inline element: `<svg attrs>body</svg>`.
    pub fn markup(&self) -> String {
        let mut out = String::from("<svg");
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }
}

/// Loaded assets by identifier.
pub type AssetIndex = BTreeMap<String, Arc<AssetEntry>>;

/// Load one asset from its path and text content.
///
/// Only the file stem of `path` is used; the file is not read.
pub fn load_asset(path: &Path, content: &str) -> Result<AssetEntry, AssetError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or(Cow::Borrowed(""));
    let identifier = asset_stem_to_identifier(&stem).map_err(|source| AssetError::InvalidName {
        path: path.to_path_buf(),
        source,
    })?;

    let root = parse_document(path, content)?;

    let mut body = String::new();
    for child in &root.children {
        if let Node::Element(element) = child {
            write_element(&mut body, element);
        }
    }

    Ok(AssetEntry {
        identifier,
        attributes: root.attributes,
        body,
    })
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

fn parse_document(path: &Path, content: &str) -> Result<Element, AssetError> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    let malformed = |reader: &Reader<&[u8]>, message: String| {
        AssetError::malformed(path.to_path_buf(), reader.error_position(), message)
    };
    let outside_root = || AssetError::OutsideRoot {
        path: path.to_path_buf(),
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(&reader, e.to_string()))?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(outside_root());
                }
                let element = open_element(&reader, &start).map_err(|m| malformed(&reader, m))?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, &start).map_err(|m| malformed(&reader, m))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None if root.is_none() => root = Some(element),
                    None => return Err(outside_root()),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(&reader, "unmatched end tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| malformed(&reader, e.to_string()))?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                    None => return Err(outside_root()),
                }
            }
            Event::CData(data) => {
                let data = decode(&reader, &data).map_err(|m| malformed(&reader, m))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(data)),
                    None => return Err(outside_root()),
                }
            }
            Event::Comment(comment) => {
                let comment = decode(&reader, &comment).map_err(|m| malformed(&reader, m))?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(comment));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(malformed(&reader, "unclosed element at end of input".to_string()));
    }

    root.ok_or_else(|| AssetError::NoRoot {
        path: path.to_path_buf(),
    })
}

/// Build an element with its local name and without namespace declarations.
fn open_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, String> {
    let name = decode(reader, start.local_name().as_ref())?;

    let mut attributes = Vec::new();
    for attribute in start.attributes().with_checks(false) {
        let attribute = attribute.map_err(|e| e.to_string())?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = decode(reader, attribute.key.as_ref())?;
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        attributes.push((key, value.into_owned()));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn decode(reader: &Reader<&[u8]>, bytes: &[u8]) -> Result<String, String> {
    reader
        .decoder()
        .decode(bytes)
        .map(Cow::into_owned)
        .map_err(|e| e.to_string())
}

fn write_element(out: &mut String, element: &Element) {
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
            Node::Element(element) => write_element(out, element),
            Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
            Node::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}
