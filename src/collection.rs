//! Modifier storage with merge-by-name semantics.
//!
//! A [`ModifierCollection`] keeps entries in insertion order. Named
//! modifiers are unique per name: adding a second modifier with an existing
//! name merges into the entry by adding its count. Anonymous modifiers
//! (named [`DEFAULT_NAME`]) always append unmerged and are removed by
//! structural match instead.
//!
//! The accumulated count lives on the entry, owned by the collection. The
//! stored modifier value is never mutated, so the same `Modifier` can be
//! shared across many collections safely.
//!
//! [`DEFAULT_NAME`]: crate::modifier::DEFAULT_NAME

use crate::error::NumericError;
use crate::modifier::{Modifier, ModifierKind};
use crate::tag::TagSet;

/// A stored modifier together with its collection-owned stack count.
#[derive(Debug, Clone)]
pub struct ModifierEntry {
    pub(crate) modifier: Modifier,
    pub(crate) count: i64,
}

impl ModifierEntry {
    /// The stored modifier value.
    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    /// Accumulated stack count for this entry.
    pub fn count(&self) -> i64 {
        self.count
    }
}

/// Insertion-ordered container of modifier entries.
///
/// # Examples
///
/// ```rust
/// use nummod::{Modifier, ModifierCollection, TagSet};
///
/// let mut collection = ModifierCollection::new();
/// collection.add(Modifier::addition(50, TagSet::new(), "ring", 1).unwrap());
/// collection.add(Modifier::addition(50, TagSet::new(), "ring", 2).unwrap());
///
/// // Same name: one entry, counts summed.
/// assert_eq!(collection.len(), 1);
/// assert_eq!(collection.find_by_name("ring").unwrap().count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModifierCollection {
    entries: Vec<ModifierEntry>,
}

impl ModifierCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a modifier.
    ///
    /// Anonymous modifiers always append as new entries. A named modifier
    /// merges into the same-named entry by adding its count; the entry keeps
    /// the modifier value it was created with, since the name is the
    /// identity key.
    pub fn add(&mut self, modifier: Modifier) {
        if !modifier.is_anonymous() {
            if let Some(entry) = self
                .entries
                .iter_mut()
                .find(|e| e.modifier.name() == modifier.name())
            {
                entry.count = entry.count.saturating_add(modifier.count());
                return;
            }
        }
        self.entries.push(ModifierEntry {
            count: modifier.count(),
            modifier,
        });
    }

    /// Remove a modifier; returns whether anything changed.
    ///
    /// A named modifier decrements the same-named entry's count by its own
    /// count and deletes the entry when the result is no longer positive.
    /// An anonymous modifier deletes the first anonymous entry whose payload
    /// structurally matches; custom and conditional payloads are opaque and
    /// never match.
    pub fn remove(&mut self, modifier: &Modifier) -> bool {
        if modifier.is_anonymous() {
            let position = self
                .entries
                .iter()
                .position(|e| e.modifier.is_anonymous() && e.modifier.structurally_matches(modifier));
            if let Some(index) = position {
                self.entries.remove(index);
                return true;
            }
            return false;
        }

        let position = self
            .entries
            .iter()
            .position(|e| e.modifier.name() == modifier.name());
        if let Some(index) = position {
            let entry = &mut self.entries[index];
            entry.count -= modifier.count();
            if entry.count <= 0 {
                self.entries.remove(index);
            }
            return true;
        }
        false
    }

    /// Find the entry with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&ModifierEntry> {
        self.entries.iter().find(|e| e.modifier.name() == name)
    }

    /// Iterate entries of one variant, in insertion order.
    pub fn of_kind(&self, kind: ModifierKind) -> impl Iterator<Item = &ModifierEntry> {
        self.entries.iter().filter(move |e| e.modifier.kind() == kind)
    }

    /// Sum of `store_value × count` over all addition entries.
    ///
    /// Accumulated in wide arithmetic; fails with
    /// [`NumericError::ArithmeticOverflow`] when the total leaves the
    /// representable range.
    pub fn additive_sum(&self) -> Result<i64, NumericError> {
        self.additive_sum_by_tags(&TagSet::new())
    }

    /// Sum of `store_value × count` over addition entries sharing a tag
    /// with the query. An empty query is unfiltered.
    pub fn additive_sum_by_tags(&self, tags: &TagSet) -> Result<i64, NumericError> {
        let mut sum: i128 = 0;
        for entry in &self.entries {
            if let crate::modifier::ModifierOp::Addition { store_value } = entry.modifier.op() {
                if !tags.is_empty() && !entry.modifier.tags().intersects(tags) {
                    continue;
                }
                sum += (*store_value as i128) * (entry.count as i128);
            }
        }
        i64::try_from(sum).map_err(|_| NumericError::ArithmeticOverflow("additive sum"))
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries (merged names count once).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ModifierEntry> {
        self.entries.iter()
    }

    pub(crate) fn entries(&self) -> &[ModifierEntry] {
        &self.entries
    }
}
