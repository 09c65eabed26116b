use thiserror::Error;
use ulayout_dom::{DomError, SinkError};
use ulayout_types::NodeId;
use ulayout_xpath1::XPathError;

/// Errors surfaced by layout queries and exports.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("No layout node with ID '{0}'")]
    NotFound(NodeId),

    #[error("Node '{id}' is a <{tag}>, which is neither a folder nor a channel")]
    UnsupportedNode { id: NodeId, tag: String },

    #[error("Export rejected by sink: {source}")]
    Export {
        #[source]
        source: SinkError,
    },

    #[error("Exception while evaluating XPath expression '{expression}': {source}")]
    XPath {
        expression: String,
        #[source]
        source: XPathError,
    },

    #[error("Invalid layout document: {0}")]
    Dom(#[from] DomError),
}

impl From<SinkError> for LayoutError {
    fn from(source: SinkError) -> Self {
        LayoutError::Export { source }
    }
}
