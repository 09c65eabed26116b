//! An owned, read-mostly XML document model for user layouts.
//!
//! Nodes live in an arena addressed by [`NodeHandle`]; parent links are plain
//! indices. Documents are parsed with `roxmltree`, serialized with `quick-xml`,
//! and can be queried with the XPath engine through [`DomNode`].

pub mod document;
pub mod error;
pub mod node;
pub mod sink;
pub mod writer;

pub use document::{Attribute, Descendants, LayoutDocument, Namespace, NodeHandle, NodeKind};
pub use error::{DomError, SinkError};
pub use node::DomNode;
pub use sink::{DocumentSink, XmlWriterSink};
