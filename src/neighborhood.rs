//! The item neighborhood relation that drives the spatial constraint.

use crate::item::ItemId;
use fnv::FnvHashMap;
use fnv::FnvHashSet;

/// `N: Item -> Set<Item>`. An item absent from the map has no neighbors and
/// so cannot extend any pattern.
#[derive(Debug, Default)]
pub struct Neighborhood {
    adjacency: FnvHashMap<ItemId, FnvHashSet<ItemId>>,
}

impl Neighborhood {
    pub fn new() -> Self {
        Neighborhood { adjacency: FnvHashMap::default() }
    }

    /// Adds `neighbor` to `item`'s neighbor set, creating the entry if
    /// needed. The relation is stored exactly as supplied; it is not
    /// symmetrized.
    pub fn add(&mut self, item: ItemId, neighbor: ItemId) {
        self.adjacency.entry(item).or_default().insert(neighbor);
    }

    pub fn contains_key(&self, item: ItemId) -> bool {
        self.adjacency.contains_key(&item)
    }

    pub fn neighbors(&self, item: ItemId) -> Option<&FnvHashSet<ItemId>> {
        self.adjacency.get(&item)
    }

    pub fn is_neighbor(&self, item: ItemId, of: ItemId) -> bool {
        self.adjacency.get(&item).map_or(false, |set| set.contains(&of))
    }

    /// True iff every item of `items` is a neighbor of `candidate`, i.e.
    /// `items ⊆ N(candidate)`.
    pub fn subset_of_neighbors(&self, items: impl IntoIterator<Item = ItemId>, candidate: ItemId) -> bool {
        match self.adjacency.get(&candidate) {
            Some(set) => items.into_iter().all(|item| set.contains(&item)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Interner;
    use typed_arena::Arena;

    #[test]
    fn unknown_item_has_no_neighbors() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let n = Neighborhood::new();
        assert!(!n.contains_key(a));
        assert!(!n.subset_of_neighbors([a], b));
    }

    #[test]
    fn subset_check_respects_direction() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut n = Neighborhood::new();
        n.add(a, b);
        assert!(n.subset_of_neighbors([b], a));
        assert!(!n.subset_of_neighbors([a], b));
    }
}
