//! Read-only snapshots for diagnostics and external serializers.
//!
//! [`NumericSnapshot`] is a deep copy of a [`Numeric`]'s base value and
//! stored modifiers. It never aliases live state, so a serializer or
//! inspector can hold one across later mutations.
//!
//! Custom and conditional modifiers carry callable state that cannot be
//! persisted; their rows appear in the snapshot for diagnostics but report
//! [`is_persistable`](ModifierSnapshot::is_persistable) as `false` so a
//! serializer can skip them silently.

use crate::collection::ModifierEntry;
use crate::modifier::{FractionMode, ModifierKind, ModifierOp, Priority};
use crate::numeric::Numeric;
use crate::tag::TagSet;
use serde::{Deserialize, Serialize};

/// One stored modifier, flattened to plain data.
///
/// Payload fields are populated per variant: `store_value` for additions,
/// `numerator`/`denominator`/`fraction_mode` for fractions, nothing for
/// customs and conditionals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierSnapshot {
    /// Variant discriminant.
    pub kind: ModifierKind,

    /// Tags scoping the modifier.
    pub tags: TagSet,

    /// Identity name; [`DEFAULT_NAME`] for anonymous modifiers.
    ///
    /// [`DEFAULT_NAME`]: crate::modifier::DEFAULT_NAME
    pub name: String,

    /// Accumulated stack count of the collection entry.
    pub count: i64,

    /// Application tier.
    pub priority: Priority,

    /// Flat amount in scaled form, for addition rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_value: Option<i64>,

    /// Ratio numerator, for fraction rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerator: Option<i64>,

    /// Ratio denominator, for fraction rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denominator: Option<i64>,

    /// Ratio mode, for fraction rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction_mode: Option<FractionMode>,
}

impl ModifierSnapshot {
    /// Whether this row carries its full payload as plain data.
    ///
    /// Custom and conditional modifiers hold closures and cannot be
    /// reconstructed from a snapshot.
    pub fn is_persistable(&self) -> bool {
        matches!(self.kind, ModifierKind::Addition | ModifierKind::Fraction)
    }

    fn capture(entry: &ModifierEntry) -> Self {
        let modifier = entry.modifier();
        let mut row = Self {
            kind: modifier.kind(),
            tags: modifier.tags().clone(),
            name: modifier.name().to_string(),
            count: entry.count(),
            priority: modifier.priority(),
            store_value: None,
            numerator: None,
            denominator: None,
            fraction_mode: None,
        };
        match modifier.op() {
            ModifierOp::Addition { store_value } => {
                row.store_value = Some(*store_value);
            }
            ModifierOp::Fraction {
                numerator,
                denominator,
                mode,
            } => {
                row.numerator = Some(*numerator);
                row.denominator = Some(*denominator);
                row.fraction_mode = Some(*mode);
            }
            ModifierOp::Custom { .. } | ModifierOp::Conditional { .. } => {}
        }
        row
    }
}

/// A deep-copied view of a [`Numeric`]: base value plus every stored
/// modifier, ordinary entries first, then constraints, then conditionals,
/// each group in insertion order.
///
/// # Examples
///
/// ```rust
/// use nummod::{Modifier, Numeric, TagSet};
///
/// let mut numeric = Numeric::new(100).unwrap();
/// numeric.add_modifier(Modifier::addition(50, TagSet::new(), "ring", 1).unwrap());
///
/// let snapshot = numeric.all_modifiers();
/// assert_eq!(snapshot.origin_value, 1_000_000);
/// assert_eq!(snapshot.modifiers.len(), 1);
/// assert_eq!(snapshot.modifiers[0].name, "ring");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericSnapshot {
    /// The immutable base value in raw scaled form.
    pub origin_value: i64,

    /// All stored modifiers, flattened.
    pub modifiers: Vec<ModifierSnapshot>,
}

impl NumericSnapshot {
    pub(crate) fn capture(numeric: &Numeric) -> Self {
        let modifiers = numeric
            .ordinary()
            .iter()
            .chain(numeric.constraints().iter())
            .chain(numeric.conditionals().iter())
            .map(ModifierSnapshot::capture)
            .collect();
        Self {
            origin_value: numeric.origin_value(),
            modifiers,
        }
    }

    /// Iterate only the rows an external serializer can persist.
    pub fn persistable(&self) -> impl Iterator<Item = &ModifierSnapshot> {
        self.modifiers.iter().filter(|m| m.is_persistable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::Modifier;

    fn sample() -> Numeric {
        let mut numeric = Numeric::new(100).unwrap();
        numeric.add_modifier(
            Modifier::addition(20, TagSet::from(["Equipment"]), "sword", 2).unwrap(),
        );
        numeric.add_modifier(
            Modifier::fraction(3, 2, FractionMode::Increase, TagSet::new(), "blessing", 1)
                .unwrap(),
        );
        numeric.add_modifier(Modifier::clamp(Some(0), Some(500), "cap").unwrap());
        numeric
    }

    #[test]
    fn test_capture_shape() {
        let snapshot = sample().all_modifiers();

        assert_eq!(snapshot.origin_value, 1_000_000);
        assert_eq!(snapshot.modifiers.len(), 3);

        let sword = &snapshot.modifiers[0];
        assert_eq!(sword.kind, ModifierKind::Addition);
        assert_eq!(sword.name, "sword");
        assert_eq!(sword.count, 2);
        assert_eq!(sword.store_value, Some(200_000));
        assert_eq!(sword.numerator, None);

        let blessing = &snapshot.modifiers[1];
        assert_eq!(blessing.kind, ModifierKind::Fraction);
        assert_eq!(blessing.numerator, Some(3));
        assert_eq!(blessing.denominator, Some(2));
        assert_eq!(blessing.fraction_mode, Some(FractionMode::Increase));
        assert_eq!(blessing.store_value, None);

        let cap = &snapshot.modifiers[2];
        assert_eq!(cap.kind, ModifierKind::Custom);
        assert_eq!(cap.priority, Priority::Clamp);
        assert_eq!(cap.store_value, None);
    }

    #[test]
    fn test_persistable_skips_opaque_rows() {
        let mut numeric = sample();
        let inner = Modifier::addition(1, TagSet::new(), "inner", 1).unwrap();
        numeric.add_modifier(
            Modifier::conditional(|_: &Numeric| true, inner, "gate", 1).unwrap(),
        );

        let snapshot = numeric.all_modifiers();
        assert_eq!(snapshot.modifiers.len(), 4);

        let kept: Vec<&str> = snapshot.persistable().map(|m| m.name.as_str()).collect();
        assert_eq!(kept, vec!["sword", "blessing"]);
        assert!(!snapshot.modifiers[3].is_persistable());
    }

    #[test]
    fn test_snapshot_does_not_alias_live_state() {
        let mut numeric = sample();
        let snapshot = numeric.all_modifiers();

        numeric.clear();
        numeric.clear_constraints();

        assert_eq!(snapshot.modifiers.len(), 3);
        assert_eq!(numeric.all_modifiers().modifiers.len(), 0);
    }

    #[test]
    fn test_serde_layout() {
        let snapshot = sample().all_modifiers();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["origin_value"], 1_000_000);
        assert_eq!(json["modifiers"][0]["kind"], "Addition");
        assert_eq!(json["modifiers"][0]["tags"][0], "Equipment");
        assert_eq!(json["modifiers"][0]["count"], 2);
        assert_eq!(json["modifiers"][0]["store_value"], 200_000);
        // Absent payload fields are omitted, not null.
        assert!(json["modifiers"][0].get("numerator").is_none());
        assert_eq!(json["modifiers"][1]["fraction_mode"], "Increase");
        assert_eq!(json["modifiers"][2]["priority"], "Clamp");
    }

    #[test]
    fn test_serde_round_trip() {
        let snapshot = sample().all_modifiers();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: NumericSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
