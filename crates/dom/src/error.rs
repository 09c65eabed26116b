use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("Duplicate node ID '{0}'")]
    DuplicateId(String),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("XML write error: {0}")]
    Write(#[from] std::io::Error),
}

/// Raised by a [`DocumentSink`](crate::DocumentSink) that refuses an appended subtree.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink rejected node: {0}")]
    Rejected(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] DomError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
