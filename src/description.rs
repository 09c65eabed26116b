//! Snapshots of a single layout node, detached from the document.

use crate::error::LayoutError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use ulayout_dom::{LayoutDocument, NodeHandle};
use ulayout_types::NodeId;

pub const FOLDER_TAG: &str = "folder";
pub const CHANNEL_TAG: &str = "channel";

/// Whether a node can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A `<folder>`.
    Folder,
    /// A `<channel>`.
    Leaf,
}

impl NodeKind {
    /// Classifies an element by tag name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            FOLDER_TAG => Some(NodeKind::Folder),
            CHANNEL_TAG => Some(NodeKind::Leaf),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Folder => f.write_str(FOLDER_TAG),
            NodeKind::Leaf => f.write_str(CHANNEL_TAG),
        }
    }
}

/// Kind and attributes of one folder or channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescription {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl NodeDescription {
    /// Builds a description of `handle`, which must be an element carrying `id`.
    pub(crate) fn from_element(
        doc: &LayoutDocument,
        handle: NodeHandle,
        id: &NodeId,
    ) -> Result<Self, LayoutError> {
        let tag = doc.name(handle).unwrap_or_default();
        let kind = NodeKind::from_tag(tag).ok_or_else(|| LayoutError::UnsupportedNode {
            id: id.clone(),
            tag: tag.to_string(),
        })?;
        let attributes: BTreeMap<String, String> = doc
            .attributes(handle)
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();

        Ok(Self {
            id: id.clone(),
            kind,
            name: attributes.get("name").cloned(),
            attributes,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Functional name of a channel.
    pub fn fname(&self) -> Option<&str> {
        self.attribute("fname")
    }

    pub fn is_hidden(&self) -> bool {
        self.flag("hidden")
    }

    pub fn is_immutable(&self) -> bool {
        self.flag("immutable")
    }

    pub fn is_unremovable(&self) -> bool {
        self.flag("unremovable")
    }

    /// The folder's `type` attribute, `"regular"` when unset. `None` for channels.
    pub fn folder_type(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Folder => Some(self.attribute("type").unwrap_or("regular")),
            NodeKind::Leaf => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.attribute("title")
    }

    /// The published channel definition a channel refers to (`chanID`).
    pub fn channel_publish_id(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Leaf => self.attribute("chanID"),
            NodeKind::Folder => None,
        }
    }

    fn flag(&self, name: &str) -> bool {
        self.attribute(name) == Some("true")
    }
}

impl fmt::Display for NodeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)?;
        if let Some(name) = &self.name {
            write!(f, " \"{}\"", name)?;
        }
        if let Some(fname) = self.fname() {
            write!(f, " fname={}", fname)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(xml: &str, id: &str) -> Result<NodeDescription, LayoutError> {
        let doc = LayoutDocument::parse(xml).unwrap();
        let handle = doc.element_by_id(id).unwrap();
        NodeDescription::from_element(&doc, handle, &NodeId::from(id))
    }

    #[test]
    fn test_folder_description() {
        let desc = describe(
            r#"<layout><folder ID="s1" name="Home" type="root" hidden="false" immutable="true"/></layout>"#,
            "s1",
        )
        .unwrap();
        assert_eq!(desc.kind, NodeKind::Folder);
        assert_eq!(desc.name.as_deref(), Some("Home"));
        assert_eq!(desc.folder_type(), Some("root"));
        assert!(!desc.is_hidden());
        assert!(desc.is_immutable());
        assert!(!desc.is_unremovable());
        assert_eq!(desc.channel_publish_id(), None);
        assert_eq!(desc.to_string(), "folder s1 \"Home\"");
    }

    #[test]
    fn test_channel_description() {
        let desc = describe(
            r#"<layout><channel ID="n1" fname="weather" chanID="42" unremovable="yes"/></layout>"#,
            "n1",
        )
        .unwrap();
        assert_eq!(desc.kind, NodeKind::Leaf);
        assert_eq!(desc.fname(), Some("weather"));
        assert_eq!(desc.channel_publish_id(), Some("42"));
        assert_eq!(desc.folder_type(), None);
        // Only the literal "true" sets a flag.
        assert!(!desc.is_unremovable());
        assert_eq!(desc.to_string(), "channel n1 fname=weather");
    }

    #[test]
    fn test_folder_type_defaults_to_regular() {
        let desc = describe(r#"<layout><folder ID="f"/></layout>"#, "f").unwrap();
        assert_eq!(desc.folder_type(), Some("regular"));
    }

    #[test]
    fn test_unsupported_tag() {
        let err = describe(r#"<layout><parameter ID="p1"/></layout>"#, "p1").unwrap_err();
        assert!(matches!(err, LayoutError::UnsupportedNode { ref tag, .. } if tag == "parameter"));
    }
}
