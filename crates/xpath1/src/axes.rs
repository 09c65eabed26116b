//! Contains pure functions for collecting nodes along each XPath axis.
//!
//! Forward axes yield nodes in document order; reverse axes yield them nearest
//! first, which is the order positional predicates count in.

use crate::datasource::DataSourceNode;
use std::collections::HashSet;

fn add_node<'a, N: DataSourceNode<'a>>(node: N, seen: &mut HashSet<N>, results: &mut Vec<N>) {
    if seen.insert(node) {
        results.push(node);
    }
}

pub fn collect_self_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    add_node(node, seen, results);
}

pub fn collect_child_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    for child in node.children() {
        add_node(child, seen, results);
    }
}

pub fn collect_attribute_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    for attr in node.attributes() {
        add_node(attr, seen, results);
    }
}

/// Pre-order, depth-first walk so descendants come out in document order.
pub fn collect_descendant_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        add_node(current, seen, results);
        let mut children: Vec<N> = current.children().collect();
        children.reverse();
        stack.extend(children);
    }
}

pub fn collect_descendant_or_self_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    add_node(node, seen, results);
    collect_descendant_nodes(node, seen, results);
}

pub fn collect_parent_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    if let Some(parent) = node.parent() {
        add_node(parent, seen, results);
    }
}

pub fn collect_ancestor_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut current = node.parent();
    while let Some(p) = current {
        add_node(p, seen, results);
        current = p.parent();
    }
}

pub fn collect_following_sibling_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    if let Some(parent) = node.parent() {
        let mut found_self = false;
        for sibling in parent.children() {
            if found_self {
                add_node(sibling, seen, results);
            }
            if sibling == node {
                found_self = true;
            }
        }
    }
}

pub fn collect_preceding_sibling_nodes<'a, N: DataSourceNode<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    if let Some(parent) = node.parent() {
        let siblings: Vec<N> = parent.children().take_while(|s| *s != node).collect();
        for sibling in siblings.into_iter().rev() {
            add_node(sibling, seen, results);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::tests::{MockNode, create_test_tree};

    #[test]
    fn test_collect_child() {
        let tree = create_test_tree();
        let folder = MockNode { id: 2, tree: &tree };
        let text = MockNode { id: 4, tree: &tree };
        let n1 = MockNode { id: 5, tree: &tree };
        let comment = MockNode { id: 8, tree: &tree };
        let f2 = MockNode { id: 9, tree: &tree };
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        collect_child_nodes(folder, &mut seen, &mut results);
        assert_eq!(results, vec![text, n1, comment, f2]);
    }

    #[test]
    fn test_collect_ancestor() {
        let tree = create_test_tree();
        let root = MockNode { id: 0, tree: &tree };
        let layout = MockNode { id: 1, tree: &tree };
        let folder = MockNode { id: 2, tree: &tree };
        let f2 = MockNode { id: 9, tree: &tree };
        let n2 = MockNode { id: 11, tree: &tree };
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        collect_ancestor_nodes(n2, &mut seen, &mut results);
        assert_eq!(results, vec![f2, folder, layout, root]);
    }

    #[test]
    fn test_collect_descendant_in_document_order() {
        let tree = create_test_tree();
        let layout = MockNode { id: 1, tree: &tree };
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        collect_descendant_nodes(layout, &mut seen, &mut results);
        let ids: Vec<usize> = results.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 4, 5, 8, 9, 11, 14]);
    }

    #[test]
    fn test_collect_siblings() {
        let tree = create_test_tree();
        let text = MockNode { id: 4, tree: &tree };
        let n1 = MockNode { id: 5, tree: &tree };
        let comment = MockNode { id: 8, tree: &tree };
        let f2 = MockNode { id: 9, tree: &tree };

        let mut seen = HashSet::new();
        let mut following = Vec::new();
        collect_following_sibling_nodes(n1, &mut seen, &mut following);
        assert_eq!(following, vec![comment, f2]);

        seen.clear();
        let mut preceding = Vec::new();
        collect_preceding_sibling_nodes(f2, &mut seen, &mut preceding);
        assert_eq!(preceding, vec![comment, n1, text]);
    }

    #[test]
    fn test_root_has_no_parent_or_siblings() {
        let tree = create_test_tree();
        let root = MockNode { id: 0, tree: &tree };
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        collect_parent_nodes(root, &mut seen, &mut results);
        collect_following_sibling_nodes(root, &mut seen, &mut results);
        collect_preceding_sibling_nodes(root, &mut seen, &mut results);
        assert!(results.is_empty());
    }
}
