// XPath datasource implementation over the layout arena
use crate::document::{LayoutDocument, NodeHandle, NodeKind};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use ulayout_xpath1::{DataSourceNode, NodeType, QName};

/// Represents either a tree node or an attribute of an element.
/// Attributes are stored as data on their element, so they are addressed by
/// owner and position rather than by their own handle.
#[derive(Clone, Copy)]
pub enum DomNode<'a> {
    Node {
        doc: &'a LayoutDocument,
        handle: NodeHandle,
    },
    Attribute {
        doc: &'a LayoutDocument,
        owner: NodeHandle,
        index: usize,
    },
}

impl<'a> DomNode<'a> {
    /// The arena handle, or `None` for attributes.
    pub fn handle(&self) -> Option<NodeHandle> {
        match self {
            DomNode::Node { handle, .. } => Some(*handle),
            DomNode::Attribute { .. } => None,
        }
    }

    fn doc(&self) -> &'a LayoutDocument {
        match *self {
            DomNode::Node { doc, .. } | DomNode::Attribute { doc, .. } => doc,
        }
    }

    /// Sort key in document order: an element precedes its attributes, which
    /// precede its children (children always have larger handles).
    fn order_key(&self) -> (usize, u8, usize) {
        match self {
            DomNode::Node { handle, .. } => (handle.index(), 0, 0),
            DomNode::Attribute { owner, index, .. } => (owner.index(), 1, *index),
        }
    }
}

impl fmt::Debug for DomNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomNode::Node { handle, .. } => write!(f, "DomNode({})", handle.index()),
            DomNode::Attribute { owner, index, .. } => {
                write!(f, "DomAttribute({}@{})", owner.index(), index)
            }
        }
    }
}

impl PartialEq for DomNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc(), other.doc()) && self.order_key() == other.order_key()
    }
}

impl Eq for DomNode<'_> {}

impl PartialOrd for DomNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DomNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl Hash for DomNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_key().hash(state);
    }
}

impl<'a> DataSourceNode<'a> for DomNode<'a> {
    fn node_type(&self) -> NodeType {
        match *self {
            DomNode::Node { doc, handle } => match doc.kind(handle) {
                NodeKind::Document => NodeType::Root,
                NodeKind::Element { .. } => NodeType::Element,
                NodeKind::Text(_) => NodeType::Text,
                NodeKind::Comment(_) => NodeType::Comment,
            },
            DomNode::Attribute { .. } => NodeType::Attribute,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        let qualified = match *self {
            DomNode::Node { doc, handle } => doc.name(handle)?,
            DomNode::Attribute { doc, owner, index } => {
                doc.attributes(owner).get(index)?.name.as_str()
            }
        };
        Some(match qualified.split_once(':') {
            Some((prefix, local_part)) => QName {
                prefix: Some(prefix),
                local_part,
            },
            None => QName {
                prefix: None,
                local_part: qualified,
            },
        })
    }

    fn string_value(&self) -> String {
        match *self {
            DomNode::Node { doc, handle } => doc.text_content(handle),
            DomNode::Attribute { doc, owner, index } => doc
                .attributes(owner)
                .get(index)
                .map(|a| a.value.clone())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match *self {
            DomNode::Node { doc, handle } => {
                let count = doc.attributes(handle).len();
                Box::new((0..count).map(move |index| DomNode::Attribute {
                    doc,
                    owner: handle,
                    index,
                }))
            }
            DomNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match *self {
            DomNode::Node { doc, handle } => Box::new(
                doc.children(handle)
                    .iter()
                    .map(move |&child| DomNode::Node { doc, handle: child }),
            ),
            DomNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match *self {
            DomNode::Node { doc, handle } => doc
                .parent(handle)
                .map(|parent| DomNode::Node { doc, handle: parent }),
            DomNode::Attribute { doc, owner, .. } => Some(DomNode::Node { doc, handle: owner }),
        }
    }
}
