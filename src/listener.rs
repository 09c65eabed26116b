//! Change notification hooks for layouts.
//!
//! `SimpleLayout` never changes after construction, so it accepts no
//! listeners and never calls these methods.

use ulayout_types::NodeId;

/// Observer of structural changes to a layout.
pub trait LayoutEventListener {
    fn node_added(&self, _id: &NodeId) {}

    fn node_moved(&self, _id: &NodeId, _old_parent: Option<&NodeId>) {}

    fn node_deleted(&self, _id: &NodeId) {}

    fn layout_loaded(&self) {}

    fn layout_saved(&self) {}
}
