pub mod fixtures;

use ulayout::{NodeId, SimpleLayout, UserLayout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Parse a fixture into a layout with a fixed id.
pub fn layout_from(xml: &str) -> SimpleLayout {
    SimpleLayout::from_xml("test-user", xml).expect("fixture should parse")
}

/// Collect ids as plain strings for easy comparison.
pub fn id_strings(ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
    ids.into_iter().map(|id| id.to_string()).collect()
}

/// Every node id in the layout, depth first from the root folder.
pub fn all_node_ids(layout: &SimpleLayout) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = layout.root_id().into_iter().collect();
    while let Some(id) = stack.pop() {
        let mut children: Vec<NodeId> = layout
            .child_ids(id.as_str())
            .expect("listed ids should resolve")
            .collect();
        children.reverse();
        out.push(id.to_string());
        stack.extend(children);
    }
    out
}
