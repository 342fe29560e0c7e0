//! Item interning.
//!
//! External item tokens (strings) are interned once into small `Copy`
//! identifiers so the rest of the engine never clones or borrows strings in
//! its hot recursive path. The interner borrows an arena owned by its
//! caller, rather than owning one itself, so no part of the engine is
//! self-referential.

use fnv::FnvHashMap;
use typed_arena::Arena;

/// A small, `Copy` item identifier.
///
/// `ItemId::SENTINEL` is a reserved value that can never be produced by
/// interning a real token; it plays the role of the in-band `-1` itemset
/// separator used throughout the flat sequence representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemId(u32);

impl ItemId {
    pub const SENTINEL: ItemId = ItemId(u32::MAX);

    pub fn is_sentinel(self) -> bool {
        self == ItemId::SENTINEL
    }
}

/// Interns item tokens into `ItemId`s, backed by an externally-owned arena.
///
/// First-seen order determines numeric order of the assigned ids; this is
/// only used to make ascending-sort-within-an-itemset deterministic, never
/// for anything semantic.
pub struct Interner<'a> {
    arena: &'a Arena<String>,
    by_name: FnvHashMap<&'a str, ItemId>,
    by_id: Vec<&'a str>,
}

impl<'a> Interner<'a> {
    pub fn new(arena: &'a Arena<String>) -> Self {
        Interner { arena, by_name: FnvHashMap::default(), by_id: Vec::new() }
    }

    /// Interns `name`, returning its stable `ItemId`.
    pub fn intern(&mut self, name: &str) -> ItemId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let owned: &'a str = self.arena.alloc(name.to_owned());
        let id = ItemId(self.by_id.len() as u32);
        self.by_id.push(owned);
        self.by_name.insert(owned, id);
        id
    }

    /// Looks up an already-interned token without inserting.
    pub fn get(&self, name: &str) -> Option<ItemId> {
        self.by_name.get(name).copied()
    }

    /// Renders an `ItemId` back to its original text.
    ///
    /// Panics if handed `ItemId::SENTINEL` or an id from a different
    /// interner; both are programmer errors in this crate.
    pub fn resolve(&self, id: ItemId) -> &'a str {
        self.by_id[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_stably_and_resolves() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let a_again = interner.intern("a");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "a");
        assert_eq!(interner.resolve(b), "b");
    }

    #[test]
    fn sentinel_is_never_interned() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        for name in ["x", "y", "z"] {
            assert_ne!(interner.intern(name), ItemId::SENTINEL);
        }
    }

    #[test]
    fn get_does_not_insert() {
        let arena = Arena::new();
        let mut interner = Interner::new(&arena);
        assert_eq!(interner.get("a"), None);
        interner.intern("a");
        assert_eq!(interner.get("a"), Some(ItemId(0)));
    }
}
