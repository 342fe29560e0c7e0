//! The pattern store: a memo of discovered patterns to support counts that
//! also acts as the dedup guard during recursion, preserving first-discovery
//! insertion order (the corpus has no `indexmap`, so order is tracked by
//! hand with a key->index map plus a parallel `Vec`, as the teacher's own
//! code favors explicit small structures over reaching for another crate).

use crate::item::ItemId;
use fnv::FnvHashMap;
use tinyvec::TinyVec;

/// A pattern is the same shape as a database sequence: a flat list of items
/// interleaved with `ItemId::SENTINEL`, with a trailing sentinel.
pub type Pattern = Vec<ItemId>;

pub struct PatternStore {
    index: FnvHashMap<Pattern, usize>,
    order: Vec<Pattern>,
    support: Vec<usize>,
}

impl PatternStore {
    pub fn new() -> Self {
        PatternStore { index: FnvHashMap::default(), order: Vec::new(), support: Vec::new() }
    }

    /// If `pattern` is new, or `support` exceeds its previously stored
    /// value, records it and returns `true` (the caller should recurse).
    /// Otherwise returns `false` (the caller must skip this branch).
    pub fn insert_or_improve(&mut self, pattern: Pattern, support: usize) -> bool {
        if let Some(&i) = self.index.get(&pattern) {
            if support > self.support[i] {
                self.support[i] = support;
                true
            } else {
                false
            }
        } else {
            let i = self.order.len();
            self.index.insert(pattern.clone(), i);
            self.order.push(pattern);
            self.support.push(support);
            true
        }
    }

    pub fn get(&self, pattern: &Pattern) -> Option<usize> {
        self.index.get(pattern).map(|&i| self.support[i])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates patterns in first-discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, usize)> {
        self.order.iter().zip(self.support.iter().copied())
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a pattern as external text: items joined by the literal `-1`
/// itemset separator, with a trailing `-1`.
pub fn render<'a>(pattern: &Pattern, resolve: impl Fn(ItemId) -> &'a str) -> String {
    let mut out = String::new();
    for &item in pattern {
        if item.is_sentinel() {
            out.push_str("-1 ");
        } else {
            out.push_str(resolve(item));
            out.push(' ');
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// Splits a flat pattern into a list of sorted, deduplicated itemsets.
///
/// Derived view used only for rendering and invariant-checking; the
/// recursive engine always works over the flat representation directly.
pub fn itemsets(pattern: &Pattern) -> Vec<TinyVec<[ItemId; 4]>> {
    let mut result = Vec::new();
    let mut current: TinyVec<[ItemId; 4]> = TinyVec::new();
    for &item in pattern {
        if item.is_sentinel() {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else {
            current.push(item);
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Interner;
    use typed_arena::Arena;

    #[test]
    fn new_pattern_is_inserted() {
        let mut store = PatternStore::new();
        let pattern = vec![ItemId::SENTINEL];
        assert!(store.insert_or_improve(pattern.clone(), 3));
        assert_eq!(store.get(&pattern), Some(3));
    }

    #[test]
    fn improvement_rule_keeps_max() {
        let mut store = PatternStore::new();
        let pattern = vec![ItemId::SENTINEL];
        assert!(store.insert_or_improve(pattern.clone(), 2));
        assert!(!store.insert_or_improve(pattern.clone(), 1));
        assert!(store.insert_or_improve(pattern.clone(), 5));
        assert_eq!(store.get(&pattern), Some(5));
    }

    #[test]
    fn preserves_first_discovery_order() {
        let mut store = PatternStore::new();
        let p1 = vec![ItemId::SENTINEL];
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let p2 = vec![a, ItemId::SENTINEL];
        store.insert_or_improve(p2.clone(), 1);
        store.insert_or_improve(p1.clone(), 1);
        let order: Vec<_> = store.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(order, vec![p2, p1]);
    }

    #[test]
    fn itemsets_splits_on_sentinel() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let pattern = vec![a, b, ItemId::SENTINEL, a, ItemId::SENTINEL];
        let sets = itemsets(&pattern);
        assert_eq!(sets.len(), 2);
        assert_eq!(&sets[0][..], &[a, b]);
        assert_eq!(&sets[1][..], &[a]);
    }
}
