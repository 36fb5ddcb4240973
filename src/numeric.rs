//! The `Numeric` value container and its cache state machine.
//!
//! A [`Numeric`] owns an immutable base value and three modifier
//! containers: ordinary modifiers (additions and fractions), constraints
//! (customs, applied after all ordinary modifiers) and conditionals
//! (applied last). Reading the final value recomputes only when a mutation
//! has happened since the last read.
//!
//! The cache is an explicit two-state machine: `Dirty` (initial, and after
//! any mutation) holds the last successfully computed value if there was
//! one; `Clean` holds the current value. A failed recompute leaves the
//! state `Dirty` and the last good value observable, so diagnostics can
//! still report something sensible while the error propagates.

use crate::collection::ModifierCollection;
use crate::error::NumericError;
use crate::fixed;
use crate::modifier::{Modifier, ModifierKind};
use crate::snapshot::NumericSnapshot;
use crate::sorter;
use crate::tag::TagSet;

#[derive(Debug, Clone)]
enum CacheState {
    Dirty { last_good: Option<i64> },
    Clean(i64),
}

/// A derived numeric value: immutable base plus a dynamic modifier set.
///
/// All internal arithmetic is fixed-point (`i64` scaled by
/// [`fixed::SCALE`]), so identical inputs produce bit-identical results on
/// every platform.
///
/// # Examples
///
/// ```rust
/// use nummod::{FractionMode, Modifier, Numeric, TagSet};
///
/// let mut damage = Numeric::new(100).unwrap();
/// damage.add_modifier(Modifier::addition(20, TagSet::from(["Equipment"]), "sword", 1).unwrap());
/// damage.add_modifier(
///     Modifier::fraction(
///         150,
///         100,
///         FractionMode::Increase,
///         TagSet::from(["Equipment"]),
///         "whetstone",
///         1,
///     )
///     .unwrap(),
/// );
///
/// // The +150% targets only the Equipment-tagged 20; the base is untouched.
/// assert_eq!(damage.final_value().unwrap(), 150);
/// ```
#[derive(Debug, Clone)]
pub struct Numeric {
    origin: i64,
    ordinary: ModifierCollection,
    constraints: ModifierCollection,
    conditionals: ModifierCollection,
    state: CacheState,
}

impl Numeric {
    /// Create from an external integer base value.
    ///
    /// Fails with [`NumericError::InvalidValue`] if the base overflows when
    /// scaled.
    pub fn new(base: i64) -> Result<Self, NumericError> {
        Ok(Self::from_scaled(fixed::from_int(base)?))
    }

    /// Create from an external decimal base value.
    ///
    /// Fails with [`NumericError::InvalidValue`] on NaN, infinity or a
    /// magnitude that overflows after scaling.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::Numeric;
    ///
    /// let mut speed = Numeric::from_f64(2.5).unwrap();
    /// assert_eq!(speed.final_value_f64().unwrap(), 2.5);
    /// assert!(Numeric::from_f64(f64::NAN).is_err());
    /// ```
    pub fn from_f64(base: f64) -> Result<Self, NumericError> {
        Ok(Self::from_scaled(fixed::from_f64(base)?))
    }

    fn from_scaled(origin: i64) -> Self {
        Self {
            origin,
            ordinary: ModifierCollection::new(),
            constraints: ModifierCollection::new(),
            conditionals: ModifierCollection::new(),
            state: CacheState::Dirty { last_good: None },
        }
    }

    /// Add a modifier, routed by variant.
    ///
    /// Additions and fractions go into the ordinary collection, customs
    /// into the constraint set, conditionals into the conditional set.
    /// Every call marks the cache dirty.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.container_mut(modifier.kind()).add(modifier);
        self.mark_dirty();
    }

    /// Remove a modifier from whichever container its variant routes to;
    /// returns whether anything changed.
    ///
    /// Named modifiers are matched by name (the entry count is decremented
    /// by the incoming count); anonymous additions and fractions by
    /// structural match. Anonymous customs and conditionals are opaque and
    /// can only be dropped through [`clear_constraints`] or
    /// [`clear_conditionals`]. Every call marks the cache dirty, found or
    /// not.
    ///
    /// [`clear_constraints`]: Numeric::clear_constraints
    /// [`clear_conditionals`]: Numeric::clear_conditionals
    pub fn remove_modifier(&mut self, modifier: &Modifier) -> bool {
        let removed = self.container_mut(modifier.kind()).remove(modifier);
        self.mark_dirty();
        removed
    }

    fn container_mut(&mut self, kind: ModifierKind) -> &mut ModifierCollection {
        match kind {
            ModifierKind::Addition | ModifierKind::Fraction => &mut self.ordinary,
            ModifierKind::Custom => &mut self.constraints,
            ModifierKind::Conditional => &mut self.conditionals,
        }
    }

    /// Empty the ordinary collection.
    ///
    /// Constraints and conditionals are untouched; callers wanting a full
    /// reset clear those explicitly.
    pub fn clear(&mut self) {
        self.ordinary.clear();
        self.mark_dirty();
    }

    /// Empty the constraint set.
    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
        self.mark_dirty();
    }

    /// Empty the conditional set.
    pub fn clear_conditionals(&mut self) {
        self.conditionals.clear();
        self.mark_dirty();
    }

    /// The final value as an external integer, truncating toward zero.
    ///
    /// Recomputes only when dirty: ordinary modifiers fold first in sorted
    /// order, then constraints, then conditionals, starting from the base
    /// value. A clean read returns the cache without recomputation.
    ///
    /// On error the state stays dirty, the previous good value remains
    /// observable through [`cached_value`](Numeric::cached_value), and the
    /// error propagates to the caller.
    pub fn final_value(&mut self) -> Result<i64, NumericError> {
        self.ensure_clean().map(fixed::to_int)
    }

    /// The final value as an external decimal.
    pub fn final_value_f64(&mut self) -> Result<f64, NumericError> {
        self.ensure_clean().map(fixed::to_f64)
    }

    /// The final value in raw scaled form, for serializers and diagnostics.
    pub fn final_value_scaled(&mut self) -> Result<i64, NumericError> {
        self.ensure_clean()
    }

    /// The immutable base value in raw scaled form.
    pub fn origin_value(&self) -> i64 {
        self.origin
    }

    /// Sum of `store_value × count` over all addition entries, scaled.
    pub fn additive_sum(&self) -> Result<i64, NumericError> {
        self.ordinary.additive_sum()
    }

    /// Sum of `store_value × count` over addition entries sharing a tag
    /// with the query, scaled. An empty query is unfiltered.
    pub fn additive_sum_by_tags(&self, tags: &TagSet) -> Result<i64, NumericError> {
        self.ordinary.additive_sum_by_tags(tags)
    }

    /// A deep-copied, read-only snapshot of the base value and every stored
    /// modifier. Never aliases live state.
    pub fn all_modifiers(&self) -> NumericSnapshot {
        NumericSnapshot::capture(self)
    }

    /// The cached value in raw scaled form, if any recompute ever
    /// succeeded. While dirty this is the last good value.
    pub fn cached_value(&self) -> Option<i64> {
        match self.state {
            CacheState::Clean(value) => Some(value),
            CacheState::Dirty { last_good } => last_good,
        }
    }

    /// Whether the next read will recompute.
    pub fn is_dirty(&self) -> bool {
        matches!(self.state, CacheState::Dirty { .. })
    }

    /// Total number of stored entries across all three containers.
    pub fn modifier_count(&self) -> usize {
        self.ordinary.len() + self.constraints.len() + self.conditionals.len()
    }

    pub(crate) fn ordinary(&self) -> &ModifierCollection {
        &self.ordinary
    }

    pub(crate) fn constraints(&self) -> &ModifierCollection {
        &self.constraints
    }

    pub(crate) fn conditionals(&self) -> &ModifierCollection {
        &self.conditionals
    }

    fn mark_dirty(&mut self) {
        let last_good = self.cached_value();
        self.state = CacheState::Dirty { last_good };
    }

    fn ensure_clean(&mut self) -> Result<i64, NumericError> {
        if let CacheState::Clean(value) = self.state {
            return Ok(value);
        }
        let value = self.recompute()?;
        self.state = CacheState::Clean(value);
        Ok(value)
    }

    fn recompute(&self) -> Result<i64, NumericError> {
        let mut value = self.origin;
        for group in [&self.ordinary, &self.constraints, &self.conditionals] {
            for entry in sorter::stable_order(group.entries()) {
                value = entry.modifier().apply(entry.count(), value, self)?;
            }
        }
        Ok(value)
    }
}

impl Default for Numeric {
    /// A `Numeric` with base value zero and no modifiers.
    fn default() -> Self {
        Self::from_scaled(0)
    }
}
