//! Targets that accept exported layout subtrees.

use crate::document::{LayoutDocument, NodeHandle};
use crate::error::{DomError, SinkError};
use crate::writer::write_node;
use quick_xml::Writer;
use std::io;

/// Receives a copy of a subtree during export.
///
/// The source document is only borrowed; a sink must never keep references into
/// it after `append` returns.
pub trait DocumentSink {
    fn append(&mut self, source: &LayoutDocument, node: NodeHandle) -> Result<(), SinkError>;
}

/// Importing into another document: the subtree is deep-copied and becomes the
/// target's document element.
impl DocumentSink for LayoutDocument {
    fn append(&mut self, source: &LayoutDocument, node: NodeHandle) -> Result<(), SinkError> {
        if let Some(existing) = self.document_element() {
            return Err(SinkError::Rejected(format!(
                "target already has root element <{}>",
                self.name(existing).unwrap_or_default()
            )));
        }
        let copy = self.import_node(source, node)?;
        self.append_document_element(copy)
            .map_err(|e| SinkError::Rejected(e.to_string()))
    }
}

/// Streams appended subtrees as XML text.
pub struct XmlWriterSink<W: io::Write> {
    writer: Writer<W>,
}

impl<W: io::Write> XmlWriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: Writer::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: io::Write> DocumentSink for XmlWriterSink<W> {
    fn append(&mut self, source: &LayoutDocument, node: NodeHandle) -> Result<(), SinkError> {
        write_node(source, node, &mut self.writer).map_err(|e| match e {
            DomError::Write(io) => SinkError::Io(io),
            other => SinkError::Serialize(other),
        })
    }
}
