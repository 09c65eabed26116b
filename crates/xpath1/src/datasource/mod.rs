//! Defines the core abstraction for a navigable, read-only document tree.
use std::hash::Hash;

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

/// The type of a node in the tree, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
}

/// The contract every queryable tree node fulfils.
///
/// The evaluator is written exclusively against this trait, so any read-only
/// tree (the layout arena, a mock in tests) can be queried without copying.
///
/// `Ord` must follow document order: the evaluator sorts node-sets with it.
///
/// `'a` is the lifetime of the underlying document.
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    /// The type of the node (Element, Text, Attribute, etc.).
    fn node_type(&self) -> NodeType;

    /// The qualified name of the node. Returns `None` for text, comment and root nodes.
    fn name(&self) -> Option<QName<'a>>;

    /// The string value of the node, as defined by the XPath 1.0 `string()` function.
    /// - For a text node, this is its content.
    /// - For an element or the root, the concatenation of all descendant text nodes.
    /// - For an attribute, this is its value.
    /// - For a comment, this is its content.
    fn string_value(&self) -> String;

    /// An iterator over the attribute nodes of this node.
    /// The iterator will be empty for non-element nodes.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// An iterator over the child nodes of this node, in document order.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// A reference to the parent node. Returns `None` for the root node.
    /// The parent of an attribute is its owner element.
    fn parent(&self) -> Option<Self>;
}

// Test utilities - publicly available for integration testing in downstream crates
pub mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::hash::Hasher;

    #[derive(Debug, Clone)]
    struct MockNodeData<'a> {
        node_type: NodeType,
        name: Option<QName<'a>>,
        value: String,
        children: Vec<usize>,
        attributes: Vec<usize>,
        parent: Option<usize>,
    }

    /// A flat, index-addressed tree. Indices are assigned in document order.
    #[derive(Debug, Default)]
    pub struct MockTree<'a> {
        nodes: Vec<MockNodeData<'a>>,
    }

    impl<'a> MockTree<'a> {
        fn push(
            &mut self,
            parent: Option<usize>,
            node_type: NodeType,
            name: Option<&'a str>,
            value: &str,
        ) -> usize {
            let id = self.nodes.len();
            self.nodes.push(MockNodeData {
                node_type,
                name: name.map(|local_part| QName {
                    prefix: None,
                    local_part,
                }),
                value: value.to_string(),
                children: vec![],
                attributes: vec![],
                parent,
            });
            if let Some(p) = parent {
                if node_type == NodeType::Attribute {
                    self.nodes[p].attributes.push(id);
                } else {
                    self.nodes[p].children.push(id);
                }
            }
            id
        }

        fn element(&mut self, parent: usize, name: &'a str, attrs: &[(&'a str, &str)]) -> usize {
            let id = self.push(Some(parent), NodeType::Element, Some(name), "");
            for &(attr_name, attr_value) in attrs {
                self.push(Some(id), NodeType::Attribute, Some(attr_name), attr_value);
            }
            id
        }
    }

    /// A lightweight handle pairing an index with its tree.
    #[derive(Debug, Clone, Copy)]
    pub struct MockNode<'a> {
        pub id: usize,
        pub tree: &'a MockTree<'a>,
    }

    impl<'a> PartialEq for MockNode<'a> {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl<'a> Eq for MockNode<'a> {}

    impl<'a> PartialOrd for MockNode<'a> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl<'a> Ord for MockNode<'a> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.id.cmp(&other.id)
        }
    }

    impl<'a> Hash for MockNode<'a> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl<'a> DataSourceNode<'a> for MockNode<'a> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.id].node_type
        }

        fn name(&self) -> Option<QName<'a>> {
            self.tree.nodes[self.id].name
        }

        fn string_value(&self) -> String {
            let data = &self.tree.nodes[self.id];
            match data.node_type {
                NodeType::Root | NodeType::Element => self
                    .children()
                    .map(|c| match c.node_type() {
                        NodeType::Comment => String::new(),
                        _ => c.string_value(),
                    })
                    .collect(),
                _ => data.value.clone(),
            }
        }

        fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .attributes
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .children
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn parent(&self) -> Option<Self> {
            self.tree.nodes[self.id].parent.map(|pid| MockNode {
                id: pid,
                tree: self.tree,
            })
        }
    }

    /// Creates a small layout-shaped mock tree for testing:
    /// ```text
    /// #root                                    id 0
    ///   <layout>                               id 1
    ///     <folder ID="root">                   id 2, @ID 3
    ///       "\n  "                             id 4
    ///       <channel ID="n1" fname="weather"/> id 5, @ID 6, @fname 7
    ///       <!-- spacer -->                    id 8
    ///       <folder ID="f2">                   id 9, @ID 10
    ///         <channel ID="n2" fname="news">   id 11, @ID 12, @fname 13
    ///           "Headlines"                    id 14
    /// ```
    pub fn create_test_tree<'a>() -> MockTree<'a> {
        let mut tree = MockTree::default();
        let root = tree.push(None, NodeType::Root, None, "");
        let layout = tree.element(root, "layout", &[]);
        let folder = tree.element(layout, "folder", &[("ID", "root")]);
        tree.push(Some(folder), NodeType::Text, None, "\n  ");
        tree.element(folder, "channel", &[("ID", "n1"), ("fname", "weather")]);
        tree.push(Some(folder), NodeType::Comment, None, " spacer ");
        let f2 = tree.element(folder, "folder", &[("ID", "f2")]);
        let n2 = tree.element(f2, "channel", &[("ID", "n2"), ("fname", "news")]);
        tree.push(Some(n2), NodeType::Text, None, "Headlines");
        tree
    }
}
