//! The projection builder.
//!
//! Two routines construct projected databases consumed by the extension
//! engine: [`project_first`] for the root-level, one-projection-per-item
//! pass, and [`project_same`] for the new-itemset/same-itemset maps built
//! under an in-progress prefix. [`find_same_itemset_suffix`] is the
//! standalone same-itemset lookup `project_same` calls once per discovered
//! candidate, kept as its own function rather than inlined so its
//! two-phase search is exercised directly by tests too.

use crate::item::ItemId;
use fnv::{FnvHashMap, FnvHashSet};

/// An ordered map from extension item to the list of suffixes it projects
/// to, in first-occurrence-across-the-database order. Built the same way
/// as [`crate::pattern::PatternStore`]: a key->index map plus parallel
/// vectors, since the corpus has no `indexmap`.
#[derive(Debug, Default)]
pub struct ProjectionMap {
    index: FnvHashMap<ItemId, usize>,
    order: Vec<ItemId>,
    suffixes: Vec<Vec<Vec<ItemId>>>,
}

impl ProjectionMap {
    pub fn new() -> Self {
        ProjectionMap { index: FnvHashMap::default(), order: Vec::new(), suffixes: Vec::new() }
    }

    fn push(&mut self, item: ItemId, suffix: Vec<ItemId>) {
        let i = match self.index.get(&item) {
            Some(&i) => i,
            None => {
                let i = self.order.len();
                self.index.insert(item, i);
                self.order.push(item);
                self.suffixes.push(Vec::new());
                i
            }
        };
        self.suffixes[i].push(suffix);
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates candidate items in first-occurrence order, alongside the
    /// projected database each one gives rise to.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &[Vec<ItemId>])> {
        self.order.iter().copied().zip(self.suffixes.iter().map(|v| v.as_slice()))
    }

    pub fn get(&self, item: ItemId) -> Option<&[Vec<ItemId>]> {
        self.index.get(&item).map(|&i| self.suffixes[i].as_slice())
    }
}

/// Root-level projection: for each sequence and each distinct non-sentinel
/// item, records the suffix after that item's *first* occurrence in the
/// sequence.
pub fn project_first(database: &[Vec<ItemId>]) -> ProjectionMap {
    let mut map = ProjectionMap::new();
    for sequence in database {
        let mut seen: FnvHashSet<ItemId> = FnvHashSet::default();
        for (pos, &item) in sequence.iter().enumerate() {
            if item.is_sentinel() || !seen.insert(item) {
                continue;
            }
            map.push(item, sequence[pos + 1..].to_vec());
        }
    }
    map
}

/// Finds, within one sequence, the suffix following the exact position at
/// which an itemset is found to contain both `candidate` and every item of
/// `give`.
///
/// Phase one checks the leading itemset (positions before the first
/// sentinel) for `candidate` alone: by construction, a sequence handed to
/// this function has already been projected just past the prefix's last
/// match, so its leading itemset is already known to coexist with the
/// rest of `give`. Phase two scans subsequent itemsets item by item,
/// resetting what has matched at each sentinel; as soon as `candidate` and
/// every item of `give` have all been seen since the last reset, the
/// suffix is cut right there, after the item that completed the match,
/// not at that itemset's closing sentinel, so any items still following
/// in the same itemset remain available as further same-itemset
/// candidates.
pub fn find_same_itemset_suffix(sequence: &[ItemId], candidate: ItemId, give: &[ItemId]) -> Option<Vec<ItemId>> {
    let mut pos = 0;
    while pos < sequence.len() && !sequence[pos].is_sentinel() {
        if sequence[pos] == candidate {
            return Some(sequence[pos + 1..].to_vec());
        }
        pos += 1;
    }

    let mut seen: FnvHashSet<ItemId> = FnvHashSet::default();
    let target = 1 + give.len();
    for i in pos + 1..sequence.len() {
        if sequence[i].is_sentinel() {
            seen.clear();
            continue;
        }
        let item = sequence[i];
        if (item == candidate || give.contains(&item)) && seen.insert(item) && seen.len() == target {
            return Some(sequence[i + 1..].to_vec());
        }
    }
    None
}

/// Builds the new-itemset map `Jn` and the same-itemset map `Js` for a
/// database already projected just past the prefix's last matched
/// occurrence.
///
/// `give` is the full item set of the prefix's current (in-progress)
/// itemset, including its last matched item. `remaining_length` is how
/// many more itemsets the pattern may still gain (`maxLength` minus the
/// itemsets already used); when it is zero, no new-itemset candidates are
/// collected. `max_gap` bounds how many itemset boundaries may be crossed
/// since the prefix's last match before a new-itemset candidate is no
/// longer eligible.
pub fn project_same(
    projected: &[Vec<ItemId>],
    give: &[ItemId],
    remaining_length: usize,
    max_gap: usize,
) -> (ProjectionMap, ProjectionMap) {
    let mut new_itemset = ProjectionMap::new();
    let mut same_itemset = ProjectionMap::new();
    let last_item = match give.last() {
        Some(&item) => item,
        None => return (new_itemset, same_itemset),
    };

    // First pass: collect new-itemset candidates directly (suffix is just
    // "everything after this position"), and discover same-itemset
    // candidates without yet computing their suffixes — any item sharing
    // an itemset with `last_item` anywhere in the database, either the
    // leading itemset (known compatible with the rest of `give` by
    // construction) or a later one in which `last_item` reappears.
    let mut same_candidates: Vec<ItemId> = Vec::new();
    let mut seen_candidate: FnvHashSet<ItemId> = FnvHashSet::default();

    for sequence in projected {
        let mut seen_new: FnvHashSet<ItemId> = FnvHashSet::default();

        let mut pos = 0;
        while pos < sequence.len() && !sequence[pos].is_sentinel() {
            if seen_candidate.insert(sequence[pos]) {
                same_candidates.push(sequence[pos]);
            }
            pos += 1;
        }

        let mut gap_count = 0usize;
        let mut current_itemset: Vec<ItemId> = Vec::new();
        let mut i = pos;
        while i < sequence.len() {
            if sequence[i].is_sentinel() {
                gap_count += 1;

                if current_itemset.contains(&last_item) {
                    for &item in &current_itemset {
                        if item != last_item && seen_candidate.insert(item) {
                            same_candidates.push(item);
                        }
                    }
                }

                current_itemset.clear();
                i += 1;
                continue;
            }

            if gap_count <= max_gap && remaining_length > 0 {
                let item = sequence[i];
                if seen_new.insert(item) {
                    new_itemset.push(item, sequence[i + 1..].to_vec());
                }
            }
            current_itemset.push(sequence[i]);
            i += 1;
        }
    }

    // Second pass: for each discovered candidate, search the whole
    // database for the exact position where it coexists with the full
    // `give` set, the same search a direct lookup of one candidate uses.
    for candidate in same_candidates {
        for sequence in projected {
            if let Some(suffix) = find_same_itemset_suffix(sequence, candidate, give) {
                same_itemset.push(candidate, suffix);
            }
        }
    }

    (new_itemset, same_itemset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Interner;
    use typed_arena::Arena;

    fn setup() -> (Arena<String>,) {
        (Arena::new(),)
    }

    #[test]
    fn project_first_records_suffix_after_first_occurrence() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let s = ItemId::SENTINEL;
        let database = vec![vec![a, s, b, s]];
        let map = project_first(&database);
        let a_proj = map.get(a).unwrap();
        assert_eq!(a_proj, &[vec![s, b, s]]);
        let b_proj = map.get(b).unwrap();
        assert_eq!(b_proj, &[vec![s]]);
    }

    #[test]
    fn project_first_only_uses_first_occurrence_per_sequence() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let s = ItemId::SENTINEL;
        let database = vec![vec![a, s, a, s]];
        let map = project_first(&database);
        let a_proj = map.get(a).unwrap();
        assert_eq!(a_proj.len(), 1);
        assert_eq!(a_proj[0], vec![s, a, s]);
    }

    #[test]
    fn find_same_itemset_suffix_matches_leading_itemset() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let s = ItemId::SENTINEL;
        let sequence = vec![b, s];
        let result = find_same_itemset_suffix(&sequence, b, &[a]);
        assert_eq!(result, Some(vec![s]));
    }

    #[test]
    fn find_same_itemset_suffix_scans_forward_for_full_give_set() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let c = interner.intern("c");
        let s = ItemId::SENTINEL;
        // leading itemset has only `a`; next itemset has a, b, c together,
        // followed by one more sentinel-delimited itemset. The match
        // completes at `c`, so the suffix starts right after it, keeping
        // the closing sentinel and the trailing itemset available.
        let sequence = vec![s, a, b, c, s, b, s];
        let result = find_same_itemset_suffix(&sequence, c, &[a, b]);
        assert_eq!(result, Some(vec![s, b, s]));
    }

    #[test]
    fn find_same_itemset_suffix_keeps_trailing_items_of_the_matched_itemset() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let c = interner.intern("c");
        let d = interner.intern("d");
        let s = ItemId::SENTINEL;
        // The matched itemset has an item (`d`) still following `c`; that
        // item must remain in the returned suffix rather than being
        // discarded at the itemset's closing sentinel.
        let sequence = vec![s, a, b, c, d, s];
        let result = find_same_itemset_suffix(&sequence, c, &[a, b]);
        assert_eq!(result, Some(vec![d, s]));
    }

    #[test]
    fn project_same_builds_new_itemset_map_within_gap_and_length() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let s = ItemId::SENTINEL;
        // Positioned right after `a`'s match: "s b s" remains.
        let projected = vec![vec![s, b, s]];
        let (jn, js) = project_same(&projected, &[a], usize::MAX, usize::MAX);
        assert!(js.is_empty());
        let b_proj = jn.get(b).unwrap();
        assert_eq!(b_proj, &[vec![s]]);
    }

    #[test]
    fn project_same_builds_same_itemset_map_from_leading_remainder() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let s = ItemId::SENTINEL;
        // Positioned right after `a`'s match, `b` remains in the same itemset.
        let projected = vec![vec![b, s]];
        let (jn, js) = project_same(&projected, &[a], usize::MAX, usize::MAX);
        assert!(jn.is_empty());
        let b_proj = js.get(b).unwrap();
        assert_eq!(b_proj, &[vec![s]]);
    }

    #[test]
    fn project_same_respects_remaining_length_zero() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let s = ItemId::SENTINEL;
        let projected = vec![vec![s, b, s]];
        let (jn, _js) = project_same(&projected, &[a], 0, usize::MAX);
        assert!(jn.is_empty());
    }

    #[test]
    fn project_same_respects_max_gap() {
        let (arena,) = setup();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let x = interner.intern("x");
        let b = interner.intern("b");
        let s = ItemId::SENTINEL;
        // Two itemset boundaries (gap 2) before `b`.
        let projected = vec![vec![s, x, s, x, s, b, s]];
        let (jn, _js) = project_same(&projected, &[a], usize::MAX, 1);
        assert!(jn.get(b).is_none());
        assert!(jn.get(x).is_some());
    }
}
