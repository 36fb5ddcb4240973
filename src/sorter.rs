//! Deterministic modifier ordering.
//!
//! Recomputation folds modifiers in the order produced here. The key is
//! `(priority, name, count)`, all ascending, and the sort is stable, so
//! entries that tie on the whole key keep their insertion order. Repeated
//! recomputation with unchanged inputs therefore folds in an identical
//! order every time.

use crate::collection::ModifierEntry;

/// Order entries by `(priority, name, count)`, ties in insertion order.
///
/// Returns references into the given slice; the slice itself is untouched.
///
/// # Examples
///
/// ```rust
/// use nummod::{sorter, Modifier, ModifierCollection, TagSet};
///
/// let mut collection = ModifierCollection::new();
/// collection.add(Modifier::addition(1, TagSet::new(), "zeta", 1).unwrap());
/// collection.add(Modifier::addition(1, TagSet::new(), "alpha", 1).unwrap());
///
/// let entries: Vec<_> = collection.iter().cloned().collect();
/// let ordered = sorter::stable_order(&entries);
/// assert_eq!(ordered[0].modifier().name(), "alpha");
/// assert_eq!(ordered[1].modifier().name(), "zeta");
/// ```
pub fn stable_order(entries: &[ModifierEntry]) -> Vec<&ModifierEntry> {
    let mut ordered: Vec<&ModifierEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    ordered
}

fn sort_key(entry: &ModifierEntry) -> (u8, &str, i64) {
    (
        entry.modifier().priority().value(),
        entry.modifier().name(),
        entry.count(),
    )
}
