//! Read-only navigation over a user's folder/channel layout.

use crate::description::{CHANNEL_TAG, FOLDER_TAG, NodeDescription};
use crate::error::LayoutError;
use crate::listener::LayoutEventListener;
use ulayout_dom::document::ID_ATTRIBUTE;
use ulayout_dom::{DocumentSink, DomError, DomNode, LayoutDocument, NodeHandle};
use ulayout_types::{CacheKey, LayoutId, NodeId};
use ulayout_xpath1::{
    EvaluationContext, Expression, XPathError, XPathValue, evaluate, parse_expression,
};

/// Path from the document node to the root folder.
const ROOT_FOLDER_PATH: &str = "/layout/folder";
/// Evaluated against the document element to list top-level nodes.
const TOP_LEVEL_NODES: &str = "*";

/// A user's layout: a tree of folders and channels addressed by node id.
///
/// Lookups by an unknown id return `None` where the answer is optional and
/// `LayoutError::NotFound` where an answer is required.
pub trait UserLayout {
    fn id(&self) -> &LayoutId;

    fn cache_key(&self) -> Option<&CacheKey>;

    fn node_description(&self, node_id: &str) -> Result<NodeDescription, LayoutError>;

    /// The enclosing folder's id. `None` for the root folder and for unknown ids.
    fn parent_id(&self, node_id: &str) -> Result<Option<NodeId>, LayoutError>;

    /// Ids of the node's immediate children in document order. Channels have none.
    fn child_ids(
        &self,
        node_id: &str,
    ) -> Result<Box<dyn Iterator<Item = NodeId> + '_>, LayoutError>;

    fn next_sibling_id(&self, node_id: &str) -> Result<Option<NodeId>, LayoutError>;

    fn previous_sibling_id(&self, node_id: &str) -> Result<Option<NodeId>, LayoutError>;

    /// The first channel in document order whose `fname` matches.
    fn node_id_for_fname(&self, fname: &str) -> Result<Option<NodeId>, LayoutError>;

    /// Evaluates `expression` against the document and returns its string value.
    fn find_node_id(&self, expression: &Expression) -> Result<String, LayoutError>;

    /// Ids of the top-level nodes under the layout wrapper. Traversal failures
    /// are logged and produce an empty sequence.
    fn node_ids(&self) -> Box<dyn Iterator<Item = NodeId> + '_>;

    /// The root folder's id. Traversal failures are logged and produce `None`.
    fn root_id(&self) -> Option<NodeId>;

    /// Appends a deep copy of the whole layout to `sink`.
    fn write_to(&self, sink: &mut dyn DocumentSink) -> Result<(), LayoutError>;

    /// Appends a deep copy of the subtree rooted at `node_id` to `sink`.
    fn write_node_to(
        &self,
        node_id: &str,
        sink: &mut dyn DocumentSink,
    ) -> Result<(), LayoutError>;

    fn add_layout_event_listener(&self, listener: &dyn LayoutEventListener) -> bool;

    fn remove_layout_event_listener(&self, listener: &dyn LayoutEventListener) -> bool;
}

/// A [`UserLayout`] backed by a single parsed layout document.
///
/// The document is never modified, so a `SimpleLayout` can be shared across
/// threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct SimpleLayout {
    layout_id: LayoutId,
    cache_key: Option<CacheKey>,
    document: LayoutDocument,
}

impl SimpleLayout {
    pub fn new(layout_id: impl Into<LayoutId>, document: LayoutDocument) -> Self {
        Self {
            layout_id: layout_id.into(),
            cache_key: None,
            document,
        }
    }

    /// Parses `xml` and wraps the resulting document.
    pub fn from_xml(layout_id: impl Into<LayoutId>, xml: &str) -> Result<Self, LayoutError> {
        let document = LayoutDocument::parse(xml)?;
        Ok(Self::new(layout_id, document))
    }

    pub fn with_cache_key(mut self, cache_key: impl Into<CacheKey>) -> Self {
        self.cache_key = Some(cache_key.into());
        self
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    fn id_of(&self, handle: NodeHandle) -> Option<NodeId> {
        self.document.attribute(handle, ID_ATTRIBUTE).map(NodeId::from)
    }

    fn lookup(&self, node_id: &str) -> Result<NodeHandle, LayoutError> {
        self.document
            .element_by_id(node_id)
            .ok_or_else(|| LayoutError::NotFound(NodeId::from(node_id)))
    }

    fn evaluate_at(
        &self,
        expression: &Expression,
        context: NodeHandle,
    ) -> Result<XPathValue<DomNode<'_>>, XPathError> {
        let e_ctx =
            EvaluationContext::for_node(self.document.node(context), self.document.root_node());
        evaluate(expression, &e_ctx)
    }

    /// Element handles selected by `xpath`, in document order.
    fn select_elements(
        &self,
        xpath: &str,
        context: NodeHandle,
    ) -> Result<Vec<NodeHandle>, XPathError> {
        let expression = parse_expression(xpath)?;
        let nodes = self.evaluate_at(&expression, context)?.into_nodes()?;
        Ok(nodes
            .into_iter()
            .filter_map(|node| node.handle())
            .filter(|&handle| self.document.is_element(handle))
            .collect())
    }

    fn top_level_ids(&self) -> Result<Vec<NodeId>, XPathError> {
        let context = self
            .document
            .document_element()
            .unwrap_or(NodeHandle::DOCUMENT);
        let elements = self.select_elements(TOP_LEVEL_NODES, context)?;
        Ok(elements.into_iter().filter_map(|h| self.id_of(h)).collect())
    }
}

impl UserLayout for SimpleLayout {
    fn id(&self) -> &LayoutId {
        &self.layout_id
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        self.cache_key.as_ref()
    }

    fn node_description(&self, node_id: &str) -> Result<NodeDescription, LayoutError> {
        let handle = self.lookup(node_id)?;
        NodeDescription::from_element(&self.document, handle, &NodeId::from(node_id))
    }

    fn parent_id(&self, node_id: &str) -> Result<Option<NodeId>, LayoutError> {
        Ok(self
            .document
            .element_by_id(node_id)
            .and_then(|handle| self.document.parent(handle))
            .filter(|&parent| self.document.is_element(parent))
            .and_then(|parent| self.id_of(parent)))
    }

    fn child_ids(
        &self,
        node_id: &str,
    ) -> Result<Box<dyn Iterator<Item = NodeId> + '_>, LayoutError> {
        let handle = self.lookup(node_id)?;
        if self.document.name(handle) != Some(FOLDER_TAG) {
            return Ok(Box::new(std::iter::empty()));
        }
        Ok(Box::new(
            self.document
                .element_children(handle)
                .filter_map(move |child| self.id_of(child)),
        ))
    }

    fn next_sibling_id(&self, node_id: &str) -> Result<Option<NodeId>, LayoutError> {
        Ok(self
            .document
            .element_by_id(node_id)
            .and_then(|handle| self.document.next_element_sibling(handle))
            .and_then(|sibling| self.id_of(sibling)))
    }

    fn previous_sibling_id(&self, node_id: &str) -> Result<Option<NodeId>, LayoutError> {
        Ok(self
            .document
            .element_by_id(node_id)
            .and_then(|handle| self.document.previous_element_sibling(handle))
            .and_then(|sibling| self.id_of(sibling)))
    }

    fn node_id_for_fname(&self, fname: &str) -> Result<Option<NodeId>, LayoutError> {
        Ok(self
            .document
            .elements_by_tag_name(CHANNEL_TAG)
            .find(|&channel| self.document.attribute(channel, "fname") == Some(fname))
            .and_then(|channel| self.id_of(channel)))
    }

    fn find_node_id(&self, expression: &Expression) -> Result<String, LayoutError> {
        self.evaluate_at(expression, NodeHandle::DOCUMENT)
            .map(|value| value.to_string())
            .map_err(|source| LayoutError::XPath {
                expression: expression.to_string(),
                source,
            })
    }

    fn node_ids(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match self.top_level_ids() {
            Ok(ids) => Box::new(ids.into_iter()),
            Err(e) => {
                log::error!("Exception getting node ids for layout '{}': {}", self.layout_id, e);
                Box::new(std::iter::empty())
            }
        }
    }

    fn root_id(&self) -> Option<NodeId> {
        match self.select_elements(ROOT_FOLDER_PATH, NodeHandle::DOCUMENT) {
            Ok(folders) => {
                let root = folders.first().and_then(|&folder| self.id_of(folder));
                if root.is_none() {
                    log::error!(
                        "Error getting root id: layout '{}' has no {} with an ID",
                        self.layout_id,
                        ROOT_FOLDER_PATH
                    );
                }
                root
            }
            Err(e) => {
                log::error!("Error getting root id for layout '{}': {}", self.layout_id, e);
                None
            }
        }
    }

    fn write_to(&self, sink: &mut dyn DocumentSink) -> Result<(), LayoutError> {
        let root = self.document.document_element().ok_or_else(|| {
            DomError::HierarchyRequest("layout document has no root element".to_string())
        })?;
        log::debug!("Exporting layout '{}'", self.layout_id);
        sink.append(&self.document, root)?;
        Ok(())
    }

    fn write_node_to(
        &self,
        node_id: &str,
        sink: &mut dyn DocumentSink,
    ) -> Result<(), LayoutError> {
        let handle = self.lookup(node_id)?;
        log::debug!("Exporting node '{}' of layout '{}'", node_id, self.layout_id);
        sink.append(&self.document, handle)?;
        Ok(())
    }

    fn add_layout_event_listener(&self, _listener: &dyn LayoutEventListener) -> bool {
        false
    }

    fn remove_layout_event_listener(&self, _listener: &dyn LayoutEventListener) -> bool {
        false
    }
}
