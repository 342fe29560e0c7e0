//! The support filter: the standard PrefixSpan "drop globally infrequent
//! items first" pass, applied both once globally before mining starts and
//! once per extension step (with a `mustKeep` guard so the items the
//! current prefix depends on are never dropped).

use crate::item::ItemId;
use fnv::{FnvHashMap, FnvHashSet};

/// Counts, per item, the number of *sequences* (not occurrences) of
/// `database` in which the item appears, then rebuilds each sequence
/// keeping only items that are frequent enough or protected by
/// `must_keep`, collapsing any resulting `⊣⊣` runs and dropping a leading
/// `⊣`.
pub fn filter(
    database: &[Vec<ItemId>],
    min_sup: usize,
    must_keep: &FnvHashSet<ItemId>,
) -> Vec<Vec<ItemId>> {
    let mut sequence_counts: FnvHashMap<ItemId, usize> = FnvHashMap::default();
    for sequence in database {
        let mut seen: FnvHashSet<ItemId> = FnvHashSet::default();
        for &item in sequence {
            if !item.is_sentinel() && seen.insert(item) {
                *sequence_counts.entry(item).or_insert(0) += 1;
            }
        }
    }

    database
        .iter()
        .map(|sequence| {
            let mut out: Vec<ItemId> = Vec::with_capacity(sequence.len());
            for &item in sequence {
                if item.is_sentinel() {
                    if matches!(out.last(), Some(&last) if !last.is_sentinel()) {
                        out.push(item);
                    }
                    continue;
                }
                let keep = must_keep.contains(&item)
                    || sequence_counts.get(&item).is_some_and(|&c| c >= min_sup);
                if keep {
                    out.push(item);
                }
            }
            out
        })
        .collect()
}
