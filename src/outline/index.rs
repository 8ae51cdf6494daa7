//! In-memory index of emitted TOC nodes.

use std::collections::{BTreeMap, HashMap};

use crate::identifier;
use crate::model::TocNode;

/// Index of TOC nodes by section id and declared page.
///
/// Nodes keep their arrival order; `child_ids` are filled in as children
/// arrive.
#[derive(Debug, Clone, Default)]
pub struct TocIndex {
    nodes: Vec<TocNode>,
    by_id: HashMap<String, usize>,
    by_page: BTreeMap<u32, Vec<usize>>,
}

impl TocIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node.
    pub fn insert(&mut self, node: TocNode) {
        let idx = self.nodes.len();

        if let Some(parent_idx) = node
            .parent_id
            .as_deref()
            .and_then(|id| self.by_id.get(id).copied())
        {
            self.nodes[parent_idx].child_ids.push(node.section_id.clone());
        }

        self.by_id.insert(node.section_id.clone(), idx);
        self.by_page.entry(node.page).or_default().push(idx);
        self.nodes.push(node);
    }

    /// Look up a node by section id.
    pub fn get(&self, section_id: &str) -> Option<&TocNode> {
        self.by_id.get(section_id).map(|&idx| &self.nodes[idx])
    }

    /// All nodes in arrival order.
    pub fn nodes(&self) -> &[TocNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if any node declares the given page.
    pub fn declares_page(&self, page: u32) -> bool {
        self.by_page.contains_key(&page)
    }

    /// Nodes declaring the given page, in arrival order.
    pub fn nodes_on_page(&self, page: u32) -> impl Iterator<Item = &TocNode> {
        self.by_page
            .get(&page)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.nodes[idx])
    }

    /// Top-level nodes in arrival order.
    pub fn roots(&self) -> impl Iterator<Item = &TocNode> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    /// Node count per effective level.
    pub fn level_counts(&self) -> BTreeMap<u32, u32> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.level).or_insert(0) += 1;
        }
        counts
    }

    /// Best-effort section for content on `page`.
    ///
    /// Picks the node with the greatest declared page not after `page`;
    /// among nodes sharing that page, the latest in outline order.
    pub fn section_for_page(&self, page: u32) -> Option<&TocNode> {
        self.by_page
            .range(..=page)
            .next_back()
            .and_then(|(_, idxs)| idxs.last())
            .map(|&idx| &self.nodes[idx])
    }

    /// Check that every parent id refers to an earlier node and that
    /// segment counts match levels.
    pub fn is_consistent(&self) -> bool {
        self.nodes.iter().enumerate().all(|(idx, node)| {
            let parent_ok = match node.parent_id.as_deref() {
                Some(parent) => self.by_id.get(parent).is_some_and(|&p| p < idx)
                    && identifier::parent_of(&node.section_id) == Some(parent),
                None => identifier::parent_of(&node.section_id).is_none(),
            };
            parent_ok && identifier::segment_count(&node.section_id) == node.level as usize
        })
    }
}

impl FromIterator<TocNode> for TocIndex {
    fn from_iter<T: IntoIterator<Item = TocNode>>(iter: T) -> Self {
        let mut index = TocIndex::new();
        for node in iter {
            index.insert(node);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutlineEntry;
    use crate::outline::build_toc;

    fn sample_index() -> TocIndex {
        build_toc(vec![
            OutlineEntry::new(1, "Intro", 1),
            OutlineEntry::new(2, "Scope", 1),
            OutlineEntry::new(2, "Terms", 4),
            OutlineEntry::new(1, "Power", 10),
        ])
        .into_iter()
        .collect()
    }

    #[test]
    fn test_children_recorded() {
        let index = sample_index();
        let intro = index.get("1").unwrap();
        assert_eq!(intro.child_ids, vec!["1.1".to_string(), "1.2".to_string()]);
        assert!(index.get("2").unwrap().child_ids.is_empty());
        assert_eq!(index.roots().count(), 2);
    }

    #[test]
    fn test_page_lookup() {
        let index = sample_index();
        assert!(index.declares_page(4));
        assert!(!index.declares_page(5));
        assert_eq!(index.nodes_on_page(1).count(), 2);
    }

    #[test]
    fn test_section_for_page() {
        let index = sample_index();
        // Page 1 is declared twice; the later node wins.
        assert_eq!(index.section_for_page(1).unwrap().section_id, "1.1");
        assert_eq!(index.section_for_page(7).unwrap().section_id, "1.2");
        assert_eq!(index.section_for_page(200).unwrap().section_id, "2");
    }

    #[test]
    fn test_section_for_page_before_first_entry() {
        let index: TocIndex = build_toc(vec![OutlineEntry::new(1, "Late", 5)])
            .into_iter()
            .collect();
        assert!(index.section_for_page(2).is_none());
    }

    #[test]
    fn test_level_counts_and_consistency() {
        let index = sample_index();
        let levels = index.level_counts();
        assert_eq!(levels.get(&1), Some(&2));
        assert_eq!(levels.get(&2), Some(&2));
        assert!(index.is_consistent());
    }
}
