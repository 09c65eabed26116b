use crate::error::DomError;
use crate::node::DomNode;
use std::collections::HashMap;

/// The attribute that carries a node's external identifier.
pub const ID_ATTRIBUTE: &str = "ID";

/// An index into a document's node arena.
///
/// Handles are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// The synthetic document node every parsed tree hangs from.
    pub const DOCUMENT: NodeHandle = NodeHandle(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A namespace binding declared on an element. `prefix` is `None` for the default namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub uri: String,
}

impl Namespace {
    /// The attribute name that declares this binding (`xmlns` or `xmlns:prefix`).
    pub fn declaration_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        }
    }
}

/// Element and attribute names are stored qualified (`dlm:origin`), as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        name: String,
        attributes: Vec<Attribute>,
        namespaces: Vec<Namespace>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// An owned XML tree stored as an arena.
///
/// Attached nodes are allocated in document order, so comparing handles of
/// attached nodes compares their document position. Imported subtrees stay
/// detached until [`append_document_element`](Self::append_document_element)
/// links them in.
#[derive(Debug, Clone)]
pub struct LayoutDocument {
    nodes: Vec<NodeData>,
    ids: HashMap<String, NodeHandle>,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutDocument {
    /// Creates a document holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            ids: HashMap::new(),
        }
    }

    /// Parses XML text into a new document.
    ///
    /// Processing instructions are dropped. Fails if the text is not well formed
    /// or if two elements share an `ID`.
    pub fn parse(text: &str) -> Result<Self, DomError> {
        let source = roxmltree::Document::parse(text)?;
        let mut doc = Self::new();
        doc.copy_children(source.root(), NodeHandle::DOCUMENT)?;
        log::debug!(
            "Parsed layout document: {} nodes, {} identified elements",
            doc.nodes.len(),
            doc.ids.len()
        );
        Ok(doc)
    }

    fn copy_children(
        &mut self,
        source: roxmltree::Node<'_, '_>,
        parent: NodeHandle,
    ) -> Result<(), DomError> {
        for child in source.children() {
            let kind = if child.is_element() {
                let tag = child.tag_name();
                NodeKind::Element {
                    name: qualified_name(child, tag.namespace(), tag.name(), true),
                    attributes: child
                        .attributes()
                        .map(|a| {
                            Attribute::new(
                                qualified_name(child, a.namespace(), a.name(), false),
                                a.value(),
                            )
                        })
                        .collect(),
                    namespaces: declared_namespaces(child),
                }
            } else if child.is_text() {
                NodeKind::Text(child.text().unwrap_or_default().to_string())
            } else if child.is_comment() {
                NodeKind::Comment(child.text().unwrap_or_default().to_string())
            } else {
                continue;
            };
            let handle = self.push(kind, Some(parent));
            if child.is_element() {
                self.register_id(handle)?;
                self.copy_children(child, handle)?;
            }
        }
        Ok(())
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeHandle>) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(handle);
        }
        handle
    }

    fn register_id(&mut self, handle: NodeHandle) -> Result<(), DomError> {
        let Some(id) = self.attribute(handle, ID_ATTRIBUTE).map(str::to_string) else {
            return Ok(());
        };
        if self.ids.contains_key(&id) {
            return Err(DomError::DuplicateId(id));
        }
        self.ids.insert(id, handle);
        Ok(())
    }

    // --- Navigation ---

    pub fn kind(&self, handle: NodeHandle) -> &NodeKind {
        &self.nodes[handle.0].kind
    }

    pub fn is_element(&self, handle: NodeHandle) -> bool {
        matches!(self.kind(handle), NodeKind::Element { .. })
    }

    /// The tag name of an element, `None` for every other kind.
    pub fn name(&self, handle: NodeHandle) -> Option<&str> {
        match self.kind(handle) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self, handle: NodeHandle) -> &[Attribute] {
        match self.kind(handle) {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Namespace bindings declared on this element itself.
    pub fn namespaces(&self, handle: NodeHandle) -> &[Namespace] {
        match self.kind(handle) {
            NodeKind::Element { namespaces, .. } => namespaces,
            _ => &[],
        }
    }

    /// Every binding visible at `handle`, nearest declaration first.
    pub fn in_scope_namespaces(&self, handle: NodeHandle) -> Vec<Namespace> {
        let mut scope: Vec<Namespace> = Vec::new();
        let mut current = Some(handle);
        while let Some(h) = current {
            for ns in self.namespaces(h) {
                if !scope.iter().any(|seen| seen.prefix == ns.prefix) {
                    scope.push(ns.clone());
                }
            }
            current = self.parent(h);
        }
        scope
    }

    /// Looks up an attribute by its qualified name.
    pub fn attribute(&self, handle: NodeHandle, name: &str) -> Option<&str> {
        self.attributes(handle)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes[handle.0].parent
    }

    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        &self.nodes[handle.0].children
    }

    /// Child elements only, skipping text and comments.
    pub fn element_children(&self, handle: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        self.children(handle)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// The first element child of the document node.
    pub fn document_element(&self) -> Option<NodeHandle> {
        self.element_children(NodeHandle::DOCUMENT).next()
    }

    /// Looks up an attached element by its `ID` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.ids.get(id).copied()
    }

    pub fn next_element_sibling(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let parent = self.parent(handle)?;
        self.children(parent)
            .iter()
            .copied()
            .skip_while(|&c| c != handle)
            .skip(1)
            .find(|&c| self.is_element(c))
    }

    pub fn previous_element_sibling(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let parent = self.parent(handle)?;
        self.children(parent)
            .iter()
            .copied()
            .take_while(|&c| c != handle)
            .filter(|&c| self.is_element(c))
            .last()
    }

    /// Pre-order walk of everything below `handle`, excluding `handle` itself.
    pub fn descendants(&self, handle: NodeHandle) -> Descendants<'_> {
        let mut stack: Vec<NodeHandle> = self.children(handle).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// All attached elements with the given tag name, in document order.
    pub fn elements_by_tag_name<'d>(
        &'d self,
        name: &'d str,
    ) -> impl Iterator<Item = NodeHandle> + 'd {
        self.descendants(NodeHandle::DOCUMENT)
            .filter(move |&h| self.name(h) == Some(name))
    }

    /// The concatenated text of all descendant text nodes.
    pub fn text_content(&self, handle: NodeHandle) -> String {
        match self.kind(handle) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            _ => self
                .descendants(handle)
                .filter_map(|h| match self.kind(h) {
                    NodeKind::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// An XPath-queryable view of a node.
    pub fn node(&self, handle: NodeHandle) -> DomNode<'_> {
        DomNode::Node { doc: self, handle }
    }

    /// The XPath root node (the document node).
    pub fn root_node(&self) -> DomNode<'_> {
        self.node(NodeHandle::DOCUMENT)
    }

    // --- Import ---

    /// Deep-copies `handle` from `source` into this document and returns the copy.
    ///
    /// The copy is detached: it has no parent and is not reachable by id until it
    /// is appended. It shares nothing with `source`.
    pub fn import_node(
        &mut self,
        source: &LayoutDocument,
        handle: NodeHandle,
    ) -> Result<NodeHandle, DomError> {
        if matches!(source.kind(handle), NodeKind::Document) {
            return Err(DomError::HierarchyRequest(
                "a document node cannot be imported".to_string(),
            ));
        }
        let copy = self.import_into(source, handle, None);
        // The copy loses its ancestors, so it carries every binding it relied on.
        if let NodeKind::Element { namespaces, .. } = &mut self.nodes[copy.0].kind {
            *namespaces = source.in_scope_namespaces(handle);
        }
        Ok(copy)
    }

    fn import_into(
        &mut self,
        source: &LayoutDocument,
        handle: NodeHandle,
        parent: Option<NodeHandle>,
    ) -> NodeHandle {
        let copy = self.push(source.kind(handle).clone(), parent);
        for &child in source.children(handle) {
            self.import_into(source, child, Some(copy));
        }
        copy
    }

    /// Attaches a detached element as the document element.
    ///
    /// A document holds at most one root element, so this fails if one is
    /// already present. The subtree's ids become resolvable.
    pub fn append_document_element(&mut self, handle: NodeHandle) -> Result<(), DomError> {
        if let Some(existing) = self.document_element() {
            return Err(DomError::HierarchyRequest(format!(
                "document already has root element <{}>",
                self.name(existing).unwrap_or_default()
            )));
        }
        if !self.is_element(handle) || self.parent(handle).is_some() {
            return Err(DomError::HierarchyRequest(
                "only a detached element can become the document element".to_string(),
            ));
        }

        let subtree: Vec<NodeHandle> = std::iter::once(handle)
            .chain(self.descendants(handle))
            .filter(|&h| self.is_element(h))
            .collect();
        for &element in &subtree {
            if let Some(id) = self.attribute(element, ID_ATTRIBUTE)
                && self.ids.contains_key(id)
            {
                return Err(DomError::DuplicateId(id.to_string()));
            }
        }

        self.nodes[handle.0].parent = Some(NodeHandle::DOCUMENT);
        self.nodes[NodeHandle::DOCUMENT.0].children.push(handle);
        for element in subtree {
            self.register_id(element)?;
        }
        Ok(())
    }

    // --- Comparison ---

    /// Structural equality of two subtrees: same kinds, names, attributes and
    /// child order. Handles and owning documents may differ, and so may the
    /// element a namespace binding is declared on.
    pub fn same_structure(
        &self,
        handle: NodeHandle,
        other: &LayoutDocument,
        other_handle: NodeHandle,
    ) -> bool {
        let same_node = match (self.kind(handle), other.kind(other_handle)) {
            (
                NodeKind::Element {
                    name, attributes, ..
                },
                NodeKind::Element {
                    name: other_name,
                    attributes: other_attributes,
                    ..
                },
            ) => name == other_name && attributes == other_attributes,
            (ours, theirs) => ours == theirs,
        };
        let ours = self.children(handle);
        let theirs = other.children(other_handle);
        same_node
            && ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs)
                .all(|(&a, &b)| self.same_structure(a, other, b))
    }
}

/// Rebuilds the prefixed name of an element or attribute from its expanded name.
///
/// Unqualified attributes never take the default namespace, so only elements
/// may resolve to an unprefixed name inside a namespace.
fn qualified_name(
    node: roxmltree::Node<'_, '_>,
    namespace: Option<&str>,
    local: &str,
    is_element: bool,
) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    if is_element && node.default_namespace() == Some(uri) {
        return local.to_string();
    }
    let prefix = node.lookup_prefix(uri).or_else(|| {
        node.namespaces()
            .filter(|ns| ns.uri() == uri)
            .find_map(|ns| ns.name())
    });
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

/// Bindings introduced by `node`, leaving out those inherited unchanged from its parent.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<Namespace> {
    let inherited: Vec<_> = node
        .parent_element()
        .map(|parent| {
            parent
                .namespaces()
                .map(|ns| (ns.name(), ns.uri()))
                .collect()
        })
        .unwrap_or_default();
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| Namespace {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}

/// Iterator returned by [`LayoutDocument::descendants`].
pub struct Descendants<'d> {
    doc: &'d LayoutDocument,
    stack: Vec<NodeHandle>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<NodeHandle> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"<layout>
  <folder ID="root" name="Root">
    <channel ID="n1" fname="weather"/>
    <!-- tabs -->
    <folder ID="f2"><channel ID="n2" fname="news">Headlines</channel></folder>
  </folder>
</layout>"#;

    fn handle(doc: &LayoutDocument, id: &str) -> NodeHandle {
        doc.element_by_id(id).unwrap()
    }

    #[test]
    fn test_parse_builds_id_index() {
        let doc = LayoutDocument::parse(LAYOUT).unwrap();
        let root = handle(&doc, "root");
        assert_eq!(doc.name(root), Some("folder"));
        assert_eq!(doc.attribute(root, "name"), Some("Root"));
        assert_eq!(doc.name(doc.document_element().unwrap()), Some("layout"));
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = LayoutDocument::parse(r#"<layout><folder ID="a"/><folder ID="a"/></layout>"#)
            .unwrap_err();
        assert!(matches!(err, DomError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_names_keep_their_prefixes() {
        let doc = LayoutDocument::parse(
            r#"<layout xmlns="urn:layout" xmlns:dlm="urn:dlm"><folder ID="root" dlm:origin="frag" origin="user"/></layout>"#,
        )
        .unwrap();
        let root = handle(&doc, "root");
        assert_eq!(doc.name(root), Some("folder"));
        assert_eq!(doc.attribute(root, "dlm:origin"), Some("frag"));
        assert_eq!(doc.attribute(root, "origin"), Some("user"));
        assert!(doc.namespaces(root).is_empty());

        let layout = doc.document_element().unwrap();
        assert_eq!(doc.namespaces(layout).len(), 2);
        let scope = doc.in_scope_namespaces(root);
        assert!(scope.contains(&Namespace {
            prefix: Some("dlm".to_string()),
            uri: "urn:dlm".to_string(),
        }));
        assert!(scope.iter().any(|ns| ns.prefix.is_none() && ns.uri == "urn:layout"));
    }

    #[test]
    fn test_imported_subtree_carries_bindings() {
        let source = LayoutDocument::parse(
            r#"<layout xmlns:dlm="urn:dlm"><folder ID="root"><channel ID="n1" dlm:moveAllowed="false"/></folder></layout>"#,
        )
        .unwrap();
        let mut target = LayoutDocument::new();
        let copy = target.import_node(&source, handle(&source, "n1")).unwrap();
        assert_eq!(target.namespaces(copy), source.in_scope_namespaces(handle(&source, "n1")));
        assert!(target.same_structure(copy, &source, handle(&source, "n1")));
    }

    #[test]
    fn test_malformed_xml_is_reported() {
        let err = LayoutDocument::parse("<layout><folder></layout>").unwrap_err();
        assert!(matches!(err, DomError::XmlParse(_)));
    }

    #[test]
    fn test_element_navigation_skips_text_and_comments() {
        let doc = LayoutDocument::parse(LAYOUT).unwrap();
        let root = handle(&doc, "root");
        let n1 = handle(&doc, "n1");
        let f2 = handle(&doc, "f2");

        assert!(doc.children(root).len() > 2);
        assert_eq!(doc.element_children(root).collect::<Vec<_>>(), vec![n1, f2]);
        assert_eq!(doc.next_element_sibling(n1), Some(f2));
        assert_eq!(doc.previous_element_sibling(f2), Some(n1));
        assert_eq!(doc.previous_element_sibling(n1), None);
        assert_eq!(doc.next_element_sibling(f2), None);
    }

    #[test]
    fn test_elements_by_tag_name_in_document_order() {
        let doc = LayoutDocument::parse(LAYOUT).unwrap();
        let channels: Vec<_> = doc
            .elements_by_tag_name("channel")
            .map(|h| doc.attribute(h, "ID").unwrap())
            .collect();
        assert_eq!(channels, vec!["n1", "n2"]);
    }

    #[test]
    fn test_text_content() {
        let doc = LayoutDocument::parse(LAYOUT).unwrap();
        assert_eq!(doc.text_content(handle(&doc, "n2")), "Headlines");
    }

    #[test]
    fn test_import_is_detached_until_appended() {
        let source = LayoutDocument::parse(LAYOUT).unwrap();
        let mut target = LayoutDocument::new();

        let copy = target.import_node(&source, handle(&source, "f2")).unwrap();
        assert_eq!(target.parent(copy), None);
        assert!(target.element_by_id("f2").is_none());

        target.append_document_element(copy).unwrap();
        assert_eq!(target.document_element(), Some(copy));
        assert_eq!(target.element_by_id("f2"), Some(copy));
        assert!(target.element_by_id("n2").is_some());
        assert!(target.element_by_id("root").is_none());
        assert!(target.same_structure(copy, &source, handle(&source, "f2")));
    }

    #[test]
    fn test_second_document_element_is_rejected() {
        let source = LayoutDocument::parse(LAYOUT).unwrap();
        let mut target = LayoutDocument::new();
        let first = target.import_node(&source, handle(&source, "n1")).unwrap();
        target.append_document_element(first).unwrap();

        let second = target.import_node(&source, handle(&source, "n2")).unwrap();
        let err = target.append_document_element(second).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest(_)));
    }

    #[test]
    fn test_document_node_cannot_be_imported() {
        let source = LayoutDocument::parse(LAYOUT).unwrap();
        let mut target = LayoutDocument::new();
        assert!(target.import_node(&source, NodeHandle::DOCUMENT).is_err());
    }
}
