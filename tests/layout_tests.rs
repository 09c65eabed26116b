mod common;

use common::fixtures::{PORTAL, PORTAL_IDS, SCENARIO};
use common::{TestResult, all_node_ids, id_strings, layout_from};
use ulayout::{LayoutError, NodeId, NodeKind, UserLayout, parse_expression};

#[test]
fn test_concrete_scenario() -> TestResult {
    let layout = layout_from(SCENARIO);

    assert_eq!(layout.root_id(), Some(NodeId::from("root")));
    assert_eq!(id_strings(layout.child_ids("root")?), vec!["n1", "f2"]);
    assert_eq!(layout.node_id_for_fname("news")?, Some(NodeId::from("n2")));
    assert_eq!(layout.parent_id("n2")?, Some(NodeId::from("f2")));
    assert_eq!(layout.next_sibling_id("n1")?, Some(NodeId::from("f2")));
    assert_eq!(layout.previous_sibling_id("f2")?, Some(NodeId::from("n1")));

    let description = layout.node_description("n1")?;
    assert_eq!(description.kind, NodeKind::Leaf);
    assert_eq!(description.fname(), Some("weather"));
    Ok(())
}

#[test]
fn test_whitespace_and_comments_are_ignored() -> TestResult {
    let layout = layout_from(PORTAL);
    assert_eq!(all_node_ids(&layout), PORTAL_IDS);
    assert_eq!(id_strings(layout.child_ids("s5")?), vec!["n6", "n7"]);
    assert_eq!(layout.next_sibling_id("n9")?, Some(NodeId::from("n10")));
    assert_eq!(layout.previous_sibling_id("n10")?, Some(NodeId::from("n9")));
    Ok(())
}

#[test]
fn test_children_point_back_to_parent() -> TestResult {
    let layout = layout_from(PORTAL);
    for parent in PORTAL_IDS {
        for child in layout.child_ids(parent)? {
            assert_eq!(
                layout.parent_id(child.as_str())?.as_ref().map(NodeId::as_str),
                Some(*parent),
                "parent of {child}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_root_has_no_parent() -> TestResult {
    for xml in [SCENARIO, PORTAL] {
        let layout = layout_from(xml);
        let root = layout.root_id().expect("layout has a root folder");
        assert_eq!(layout.parent_id(root.as_str())?, None);
    }
    Ok(())
}

#[test]
fn test_unknown_id_and_root_both_have_no_parent() -> TestResult {
    // Callers that need to tell these apart check node_description first.
    let layout = layout_from(SCENARIO);
    assert_eq!(layout.parent_id("root")?, None);
    assert_eq!(layout.parent_id("does-not-exist")?, None);
    assert!(layout.node_description("root").is_ok());
    assert!(matches!(
        layout.node_description("does-not-exist"),
        Err(LayoutError::NotFound(_))
    ));
    Ok(())
}

#[test]
fn test_fname_lookup_matches_first_channel_in_document_order() -> TestResult {
    let layout = layout_from(PORTAL);
    for id in PORTAL_IDS {
        let description = layout.node_description(id)?;
        let Some(fname) = description.fname() else {
            continue;
        };
        let first = PORTAL_IDS
            .iter()
            .find(|candidate| {
                layout
                    .node_description(candidate)
                    .map(|d| d.kind == NodeKind::Leaf && d.fname() == Some(fname))
                    .unwrap_or(false)
            })
            .copied();
        assert_eq!(
            layout.node_id_for_fname(fname)?.as_ref().map(NodeId::as_str),
            first
        );
    }
    assert_eq!(layout.node_id_for_fname("weather")?, Some(NodeId::from("n6")));
    assert_eq!(layout.node_id_for_fname("no-such-channel")?, None);
    Ok(())
}

#[test]
fn test_sibling_symmetry() -> TestResult {
    let layout = layout_from(PORTAL);
    for id in PORTAL_IDS {
        if let Some(next) = layout.next_sibling_id(id)? {
            assert_eq!(
                layout.previous_sibling_id(next.as_str())?.as_ref().map(NodeId::as_str),
                Some(*id)
            );
        }
        if let Some(prev) = layout.previous_sibling_id(id)? {
            assert_eq!(
                layout.next_sibling_id(prev.as_str())?.as_ref().map(NodeId::as_str),
                Some(*id)
            );
        }
    }
    Ok(())
}

#[test]
fn test_leaves_have_no_children() -> TestResult {
    let layout = layout_from(PORTAL);
    for id in PORTAL_IDS {
        if layout.node_description(id)?.kind == NodeKind::Leaf {
            assert_eq!(layout.child_ids(id)?.count(), 0, "{id} is a leaf");
        }
    }
    Ok(())
}

#[test]
fn test_queries_are_idempotent() -> TestResult {
    let layout = layout_from(PORTAL);
    for id in PORTAL_IDS {
        assert_eq!(layout.node_description(id)?, layout.node_description(id)?);
        assert_eq!(layout.parent_id(id)?, layout.parent_id(id)?);
        assert_eq!(
            id_strings(layout.child_ids(id)?),
            id_strings(layout.child_ids(id)?)
        );
        assert_eq!(layout.next_sibling_id(id)?, layout.next_sibling_id(id)?);
        assert_eq!(layout.previous_sibling_id(id)?, layout.previous_sibling_id(id)?);
    }
    assert_eq!(layout.root_id(), layout.root_id());
    assert_eq!(id_strings(layout.node_ids()), id_strings(layout.node_ids()));
    Ok(())
}

#[test]
fn test_node_ids_is_shallow() {
    let layout = layout_from(PORTAL);
    assert_eq!(id_strings(layout.node_ids()), vec!["s1"]);
}

#[test]
fn test_descriptions_of_portal_nodes() -> TestResult {
    let layout = layout_from(PORTAL);

    let root = layout.node_description("s1")?;
    assert_eq!(root.folder_type(), Some("root"));
    assert!(root.is_immutable() && root.is_unremovable() && !root.is_hidden());

    let header = layout.node_description("s2")?;
    assert!(header.is_hidden());
    assert_eq!(header.name.as_deref(), Some("Header folder"));

    let news = layout.node_description("n7")?;
    assert_eq!(news.title(), Some("News & Notes"));
    assert_eq!(news.channel_publish_id(), Some("17"));
    Ok(())
}

#[test]
fn test_find_node_id_with_xpath() -> TestResult {
    let layout = layout_from(PORTAL);

    let expr = parse_expression("//channel[@fname='calendar']/@ID")?;
    assert_eq!(layout.find_node_id(&expr)?, "n9");

    let expr = parse_expression("//folder[@type='footer']/channel/@ID")?;
    assert_eq!(layout.find_node_id(&expr)?, "n12");

    let expr = parse_expression("//channel[@ID='n7']/../@ID")?;
    assert_eq!(layout.find_node_id(&expr)?, "s5");

    let expr = parse_expression("//channel[@ID='n10']/preceding-sibling::channel[1]/@ID")?;
    assert_eq!(layout.find_node_id(&expr)?, "n9");

    let expr = parse_expression("count(//channel[@fname='weather'])")?;
    assert_eq!(layout.find_node_id(&expr)?, "2");
    Ok(())
}

#[test]
fn test_shared_across_threads() {
    let layout = std::sync::Arc::new(layout_from(PORTAL));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let layout = layout.clone();
            std::thread::spawn(move || all_node_ids(&layout))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), PORTAL_IDS);
    }
}
