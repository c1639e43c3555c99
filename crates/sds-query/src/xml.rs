//! Namespace-resolved XML element tree.
//!
//! The query service answers with a small Atom document, so the whole body is
//! read into a tree with [`parse_document`] before any entry is mapped. Names
//! are stored as `(namespace URI, local name)` pairs; prefixes are resolved
//! while reading and then forgotten.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::QueryError;

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const DATA_SERVICES_NS: &str = "http://schemas.microsoft.com/ado/2007/08/dataservices";
pub const METADATA_NS: &str = "http://schemas.microsoft.com/ado/2007/08/dataservices/metadata";

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlName {
    pub namespace: Option<String>,
    pub local: String,
}

impl XmlName {
    fn matches(&self, namespace: &str, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == Some(namespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: XmlName,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// True when this element is `local` in `namespace`.
    #[must_use]
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.name.matches(namespace, local)
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// First direct child element named `local` in `namespace`.
    #[must_use]
    pub fn child(&self, namespace: &str, local: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(el) if el.is(namespace, local) => Some(el),
            _ => None,
        })
    }

    #[must_use]
    pub fn first_node(&self) -> Option<&XmlNode> {
        self.children.first()
    }

    /// Every element below this one in document order (pre-order), not
    /// including `self`.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Value of the attribute `local` in `namespace`, if present.
    #[must_use]
    pub fn attribute(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Pre-order iterator returned by [`XmlElement::descendants`].
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XmlNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let siblings = self.stack.last_mut()?;
            match siblings.next() {
                Some(XmlNode::Element(el)) => {
                    self.stack.push(el.children.iter());
                    return Some(el);
                }
                Some(XmlNode::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Parse a complete XML document and return its root element.
///
/// Whitespace-only text between elements is dropped; comments, processing
/// instructions and the prolog are ignored.
///
/// # Errors
///
/// - [`QueryError::Xml`] for token-level failures (mismatched end tags,
///   bad escapes, malformed attributes).
/// - [`QueryError::Document`] when there is no root element, more than one
///   root, an undeclared namespace prefix, stray text outside the root, or
///   the input ends inside an open element.
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement, QueryError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = NsReader::from_reader(bytes);

    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                open.push(start_element(&reader, &e)?);
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e)?;
                close_element(element, &mut open, &mut root)?;
            }
            Event::End(_) => {
                let element = open.pop().ok_or_else(|| {
                    QueryError::Document("end tag without a matching start tag".to_string())
                })?;
                close_element(element, &mut open, &mut root)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&text, &mut open)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                push_text(&text, &mut open)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(QueryError::Document(format!(
            "document ended inside <{}>",
            unclosed.name.local
        )));
    }

    root.ok_or_else(|| QueryError::Document("root element is missing".to_string()))
}

fn start_element(
    reader: &NsReader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<XmlElement, QueryError> {
    let (resolved, local) = reader.resolve_element(e.name());
    let name = XmlName {
        namespace: namespace_uri(resolved)?,
        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
    };

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        attributes.push(XmlAttribute {
            name: XmlName {
                namespace: namespace_uri(resolved)?,
                local: String::from_utf8_lossy(local.as_ref()).into_owned(),
            },
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn namespace_uri(resolved: ResolveResult<'_>) -> Result<Option<String>, QueryError> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.0).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) if prefix == b"xml" => Ok(Some(XML_NS.to_string())),
        ResolveResult::Unknown(prefix) => Err(QueryError::Document(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn close_element(
    element: XmlElement,
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), QueryError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(QueryError::Document(format!(
            "multiple root elements (second is <{}>)",
            element.name.local
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(text: &str, open: &mut [XmlElement]) -> Result<(), QueryError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match open.last_mut() {
        Some(parent) => {
            // Adjacent text and CDATA nodes read as one value.
            if let Some(XmlNode::Text(prev)) = parent.children.last_mut() {
                prev.push_str(text);
            } else {
                parent.children.push(XmlNode::Text(text.to_string()));
            }
            Ok(())
        }
        None => Err(QueryError::Document(
            "text outside the root element".to_string(),
        )),
    }
}
