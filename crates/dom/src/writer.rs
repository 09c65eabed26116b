//! Serialization of documents and subtrees to XML text with `quick-xml`.

use crate::document::{LayoutDocument, Namespace, NodeHandle, NodeKind};
use crate::error::DomError;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io;

/// Writes `handle` and everything below it. A document node writes its children.
///
/// An element written on its own declares every namespace in scope at its
/// position, so the output parses without its ancestors.
pub fn write_node<W: io::Write>(
    doc: &LayoutDocument,
    handle: NodeHandle,
    writer: &mut Writer<W>,
) -> Result<(), DomError> {
    let scope = doc.in_scope_namespaces(handle);
    write_tree(doc, handle, &scope, writer)
}

fn write_tree<W: io::Write>(
    doc: &LayoutDocument,
    handle: NodeHandle,
    namespaces: &[Namespace],
    writer: &mut Writer<W>,
) -> Result<(), DomError> {
    match doc.kind(handle) {
        NodeKind::Document => {
            for &child in doc.children(handle) {
                write_node(doc, child, writer)?;
            }
        }
        NodeKind::Element {
            name, attributes, ..
        } => {
            let mut start = BytesStart::new(name.as_str());
            for ns in namespaces {
                push_attribute(&mut start, &ns.declaration_name(), &ns.uri);
            }
            for attr in attributes {
                push_attribute(&mut start, &attr.name, &attr.value);
            }
            let children = doc.children(handle);
            if children.is_empty() {
                emit(writer, Event::Empty(start))?;
            } else {
                emit(writer, Event::Start(start))?;
                for &child in children {
                    write_tree(doc, child, doc.namespaces(child), writer)?;
                }
                emit(writer, Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
        NodeKind::Text(text) => emit(writer, Event::Text(BytesText::new(text)))?,
        NodeKind::Comment(text) => emit(writer, Event::Comment(BytesText::from_escaped(text)))?,
    }
    Ok(())
}

/// Adds an attribute with whitespace characters written as character references.
///
/// Attribute-value normalisation turns literal tabs and line breaks into
/// spaces on the next parse.
fn push_attribute(start: &mut BytesStart<'_>, name: &str, value: &str) {
    let mut escaped = String::with_capacity(value.len());
    for c in escape(value).chars() {
        match c {
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    start.push_attribute(Attribute {
        key: QName(name.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    });
}

fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), DomError> {
    writer.write_event(event)?;
    Ok(())
}

impl LayoutDocument {
    /// Writes the whole document as XML to `out`.
    pub fn write_xml<W: io::Write>(&self, out: W) -> Result<(), DomError> {
        let mut writer = Writer::new(out);
        write_node(self, NodeHandle::DOCUMENT, &mut writer)
    }

    /// The whole document as an XML string.
    pub fn to_xml_string(&self) -> Result<String, DomError> {
        self.subtree_xml(NodeHandle::DOCUMENT)
    }

    /// The subtree rooted at `handle` as an XML string.
    pub fn subtree_xml(&self, handle: NodeHandle) -> Result<String, DomError> {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        write_node(self, handle, &mut writer)?;
        String::from_utf8(buf)
            .map_err(|e| DomError::Write(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}
