//! Integration tests for outline hierarchy construction.

use std::collections::{HashMap, HashSet};

use docstruct::identifier::{parent_of, segment_count};
use docstruct::{build_toc, HierarchyBuilder, OutlineEntry, TocIndex, TocNode, TocStream};
use proptest::prelude::*;

fn entries(items: &[(i64, &str, i64)]) -> Vec<OutlineEntry> {
    items
        .iter()
        .map(|&(depth, title, page)| OutlineEntry::new(depth, title, page))
        .collect()
}

/// Outline entries with ragged depths. Some have non-positive depths or
/// pages, and some have blank titles.
fn outline_entry() -> impl Strategy<Value = OutlineEntry> {
    (
        -2i64..8,
        prop_oneof![4 => "[A-Za-z][A-Za-z0-9 ]{0,12}", 1 => " {0,3}"],
        -2i64..400,
    )
        .prop_map(|(depth, title, page)| OutlineEntry::new(depth, title, page))
}

fn arb_outline(max_len: usize) -> impl Strategy<Value = Vec<OutlineEntry>> {
    prop::collection::vec(outline_entry(), 0..max_len)
}

fn assert_well_formed(nodes: &[TocNode]) {
    let mut seen = HashSet::new();
    let mut children: HashMap<Option<&str>, Vec<u32>> = HashMap::new();

    for node in nodes {
        assert_eq!(segment_count(&node.section_id) as u32, node.level);
        assert_eq!(node.parent_id.as_deref(), parent_of(&node.section_id));
        if let Some(parent) = &node.parent_id {
            assert!(seen.contains(parent.as_str()), "{} before parent", node.section_id);
        }
        assert!(seen.insert(node.section_id.as_str()), "duplicate {}", node.section_id);

        let last = node.section_id.rsplit('.').next().unwrap().parse().unwrap();
        children
            .entry(node.parent_id.as_deref())
            .or_default()
            .push(last);
    }

    for positions in children.values() {
        let expected: Vec<u32> = (1..=positions.len() as u32).collect();
        assert_eq!(positions, &expected);
    }
}

#[test]
fn test_depth_skip_nests_under_nearest_ancestor() {
    let nodes = build_toc(entries(&[(1, "A", 1), (3, "B", 2)]));

    assert_eq!(nodes[1].section_id, "1.1");
    assert_eq!(nodes[1].parent_id.as_deref(), Some("1"));
    assert!(nodes[1].depth_skipped());
    assert_eq!(nodes.len(), 2);
}

proptest! {
    #[test]
    fn test_ragged_outlines_are_well_formed(outline in arb_outline(300)) {
        let expected = outline.iter().filter(|e| e.is_well_formed()).count();
        let nodes = build_toc(outline);

        prop_assert_eq!(nodes.len(), expected);
        assert_well_formed(&nodes);
        for node in &nodes {
            prop_assert!(node.level <= node.source_depth);
        }
    }

    #[test]
    fn test_every_entry_emitted_or_counted(outline in arb_outline(200)) {
        let mut stream = TocStream::new(outline.clone());
        let emitted = stream.by_ref().count() as u32;
        let stats = stream.into_stats();

        prop_assert_eq!(stats.entries_seen, outline.len() as u32);
        prop_assert_eq!(stats.nodes_emitted, emitted);
        prop_assert_eq!(stats.entries_seen, stats.nodes_emitted + stats.malformed_skipped);
    }

    #[test]
    fn test_incremental_builder_matches_batch(outline in arb_outline(200)) {
        let mut builder = HierarchyBuilder::new();
        let incremental: Vec<TocNode> = outline.iter().filter_map(|e| builder.push(e)).collect();

        prop_assert!(builder.stats().max_level <= 7);
        prop_assert_eq!(incremental, build_toc(outline));
    }

    #[test]
    fn test_index_links_children(outline in arb_outline(300)) {
        let index: TocIndex = build_toc(outline).into_iter().collect();
        prop_assert!(index.is_consistent());

        let counted: usize = index.nodes().iter().map(|n| n.child_ids.len()).sum();
        let non_roots = index.nodes().iter().filter(|n| !n.is_root()).count();
        prop_assert_eq!(counted, non_roots);
    }
}

#[test]
fn test_counter_resets_after_parent_closes() {
    let nodes = build_toc(entries(&[
        (1, "A", 1),
        (2, "A1", 1),
        (2, "A2", 2),
        (1, "B", 3),
        (2, "B1", 3),
        (1, "C", 4),
    ]));
    let ids: Vec<&str> = nodes.iter().map(|n| n.section_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "1.1", "1.2", "2", "2.1", "3"]);
}

#[test]
fn test_shallower_than_first_entry() {
    // A later entry shallower than the first still becomes a root.
    let nodes = build_toc(entries(&[(3, "Deep start", 1), (2, "Shallower", 2), (1, "Top", 3)]));
    let ids: Vec<&str> = nodes.iter().map(|n| n.section_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(nodes.iter().all(TocNode::is_root));
}

#[test]
fn test_malformed_entries_skipped_and_counted() {
    let mut stream = TocStream::new(entries(&[
        (1, "A", 1),
        (0, "zero depth", 1),
        (2, "   ", 1),
        (2, "A1", -4),
        (2, "A2", 2),
    ]));
    let nodes: Vec<TocNode> = stream.by_ref().collect();
    let stats = stream.into_stats();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].section_id, "1.1");
    assert_eq!(nodes[1].title, "A2");
    assert_eq!(stats.malformed_skipped, 3);
    assert_eq!(stats.entries_seen, 5);
}
