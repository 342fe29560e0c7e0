//! The recursive extension engine: the depth-first driver that projects a
//! database under a growing prefix and dispatches new-itemset and
//! same-itemset extensions, in that order, at every level.

use crate::filter::filter;
use crate::item::ItemId;
use crate::neighborhood::Neighborhood;
use crate::pattern::PatternStore;
use crate::project::{project_same, ProjectionMap};
use fnv::FnvHashSet;

/// Parameters and shared state threaded through one mining run's recursion.
pub struct MiningContext<'a> {
    pub neighborhood: &'a Neighborhood,
    pub min_sup: usize,
    pub max_length: usize,
    pub max_gap: usize,
    pub patterns: PatternStore,
}

impl<'a> MiningContext<'a> {
    pub fn new(neighborhood: &'a Neighborhood, min_sup: usize, max_length: usize, max_gap: usize) -> Self {
        MiningContext { neighborhood, min_sup, max_length, max_gap, patterns: PatternStore::new() }
    }

    /// Runs the whole mining process over an already globally-filtered
    /// database.
    pub fn mine(&mut self, database: &[Vec<ItemId>]) {
        if self.max_length == 0 {
            return;
        }
        let root = crate::project::project_first(database);
        self.extend_new_itemset(&root, &[]);
    }

    /// Closes the current itemset (if any) and opens a new one with a
    /// single candidate item, for every candidate surviving support and
    /// spatial pruning.
    fn extend_new_itemset(&mut self, map: &ProjectionMap, prefix: &[ItemId]) {
        for (item, suffixes) in map.iter() {
            if !self.accepts(item, prefix) {
                continue;
            }
            if suffixes.len() < self.min_sup {
                continue;
            }

            let mut candidate = prefix.to_vec();
            if !candidate.is_empty() {
                candidate.push(ItemId::SENTINEL);
            }
            candidate.push(item);
            let mut stored = candidate.clone();
            stored.push(ItemId::SENTINEL);

            if !self.patterns.insert_or_improve(stored, suffixes.len()) {
                continue;
            }

            // `maxLength` bounds the number of itemsets, not the size of
            // the last one: it is enforced inside `project_and_dispatch`
            // (via `remaining_length`), which still must run so that
            // same-itemset extensions of this final itemset are found.
            let itemset_count = candidate.iter().filter(|id| id.is_sentinel()).count() + 1;
            let mut must_keep = FnvHashSet::default();
            must_keep.insert(item);
            let filtered = filter(suffixes, self.min_sup, &must_keep);
            self.project_and_dispatch(&filtered, &candidate, itemset_count);
        }
    }

    /// Appends a candidate item into the last (currently open) itemset of
    /// the prefix, for every candidate surviving support and spatial
    /// pruning.
    fn extend_same_itemset(&mut self, map: &ProjectionMap, prefix: &[ItemId], itemset_count: usize) {
        for (item, suffixes) in map.iter() {
            if !self.accepts(item, prefix) {
                continue;
            }
            if suffixes.len() < self.min_sup {
                continue;
            }

            let mut candidate = prefix.to_vec();
            candidate.push(item);
            let mut stored = candidate.clone();
            stored.push(ItemId::SENTINEL);

            if !self.patterns.insert_or_improve(stored, suffixes.len()) {
                continue;
            }

            let current_itemset_start = prefix
                .iter()
                .rposition(|id| id.is_sentinel())
                .map(|i| i + 1)
                .unwrap_or(0);
            let mut must_keep: FnvHashSet<ItemId> =
                candidate[current_itemset_start..].iter().copied().collect();
            must_keep.insert(item);
            let filtered = filter(suffixes, self.min_sup, &must_keep);
            self.project_and_dispatch(&filtered, &candidate, itemset_count);
        }
    }

    /// Projects `database` under `prefix` (whose current itemset spans the
    /// region since the last sentinel) and dispatches both extension
    /// procedures in the fixed order: new-itemset extensions first, then
    /// same-itemset extensions.
    fn project_and_dispatch(&mut self, database: &[Vec<ItemId>], prefix: &[ItemId], itemset_count: usize) {
        let give = current_itemset_items(prefix);
        let remaining_length = self.max_length.saturating_sub(itemset_count);
        let (new_itemset, same_itemset) = project_same(database, &give, remaining_length, self.max_gap);

        if remaining_length > 0 {
            self.extend_new_itemset(&new_itemset, prefix);
        }
        self.extend_same_itemset(&same_itemset, prefix, itemset_count);
    }

    /// The common candidate-extension gate: `h` must be a known
    /// neighborhood key and every item already present anywhere in the
    /// prefix must be one of `h`'s neighbors.
    fn accepts(&self, item: ItemId, prefix: &[ItemId]) -> bool {
        if !self.neighborhood.contains_key(item) {
            return false;
        }
        let prefix_items = prefix.iter().copied().filter(|id| !id.is_sentinel());
        self.neighborhood.subset_of_neighbors(prefix_items, item)
    }
}

/// The items of the last (currently open) itemset of `prefix`: everything
/// after its last sentinel, or the whole prefix if it has none.
fn current_itemset_items(prefix: &[ItemId]) -> Vec<ItemId> {
    let start = prefix.iter().rposition(|id| id.is_sentinel()).map(|i| i + 1).unwrap_or(0);
    prefix[start..].to_vec()
}
