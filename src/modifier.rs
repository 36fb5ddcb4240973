//! Modifier variants and their apply algorithms.
//!
//! A [`Modifier`] pairs a payload ([`ModifierOp`]) with shared metadata
//! ([`ModifierMeta`]): tags, name, count and priority. Modifiers are
//! value-like and shareable across [`Numeric`] instances; `apply` is a pure
//! function of the accumulated value and the owning `Numeric`.
//!
//! The tag-scoped fraction composition rule lives here. A fraction modifier
//! splits the accumulated value into the portion it targets (additions
//! sharing a tag, plus the base value when tagged [`SELF_TAG`]) and the
//! portion it must pass through untouched, so several fractions with
//! different tag scopes compose deterministically.
//!
//! [`SELF_TAG`]: crate::tag::SELF_TAG

use crate::error::NumericError;
use crate::fixed;
use crate::numeric::Numeric;
use crate::tag::TagSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name marking a modifier as anonymous.
///
/// Anonymous modifiers never merge in a collection and are removed by
/// structural match instead of by name.
pub const DEFAULT_NAME: &str = "default";

/// Application tier for modifiers.
///
/// Tiers are applied low to high; within a tier the sorter falls back to
/// name, then count, then insertion order.
///
/// # Examples
///
/// ```rust
/// use nummod::Priority;
///
/// assert!(Priority::Critical < Priority::Base);
/// assert!(Priority::Skill < Priority::Multiplier);
/// assert_eq!(Priority::Clamp.value(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Earliest tier, applied before everything else.
    Critical,
    /// Base-value adjustments.
    Base,
    /// Equipment contributions.
    Equipment,
    /// Buffs and debuffs.
    Buff,
    /// Skill effects. The default tier for addition modifiers.
    Skill,
    /// Percentage scaling. The default tier for fraction modifiers.
    Multiplier,
    /// Final limits. The default tier for custom modifiers.
    Clamp,
}

impl Priority {
    /// Numeric rank of this tier for ordering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::Priority;
    ///
    /// assert_eq!(Priority::Critical.value(), 0);
    /// assert_eq!(Priority::Skill.value(), 4);
    /// ```
    pub fn value(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::Base => 1,
            Priority::Equipment => 2,
            Priority::Buff => 3,
            Priority::Skill => 4,
            Priority::Multiplier => 5,
            Priority::Clamp => 6,
        }
    }
}

/// How a fraction modifier applies its ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FractionMode {
    /// Replace the targeted value with `value × (numerator/denominator)^count`.
    ///
    /// Stacks compound: each count multiplies by the ratio again.
    Override,
    /// Grow the targeted value by `value × numerator × count / denominator`.
    ///
    /// Stacks are linear and computed in exact integer arithmetic.
    Increase,
}

/// Discriminant of a modifier, used for queries and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Flat addition.
    Addition,
    /// Ratio scaling of a tag-targeted portion.
    Fraction,
    /// Caller-supplied transform (constraints such as clamps).
    Custom,
    /// Predicate-gated wrapper around another modifier.
    Conditional,
}

/// Metadata shared by every modifier variant.
///
/// The `count` stored here is the stack delta this modifier carries into a
/// collection; the accumulated count lives on the collection entry, never
/// on the shared modifier value.
#[derive(Debug, Clone)]
pub struct ModifierMeta {
    pub(crate) tags: TagSet,
    pub(crate) name: Arc<str>,
    pub(crate) count: i64,
    pub(crate) priority: Priority,
}

impl ModifierMeta {
    /// Tags scoping this modifier.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Identity key for merge-by-name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stack count this modifier carries.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Application tier.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Whether the modifier is anonymous (named [`DEFAULT_NAME`]).
    pub fn is_anonymous(&self) -> bool {
        self.name.as_ref() == DEFAULT_NAME
    }
}

/// The modifier payload, matched exhaustively during `apply`.
pub enum ModifierOp {
    /// Adds `store_value × count` to the accumulated value.
    Addition {
        /// Flat amount in scaled fixed-point form.
        store_value: i64,
    },
    /// Scales the tag-targeted portion of the accumulated value by
    /// `numerator / denominator`.
    Fraction {
        /// Ratio numerator.
        numerator: i64,
        /// Ratio denominator, never zero.
        denominator: i64,
        /// Whether the ratio replaces or grows the targeted value.
        mode: FractionMode,
    },
    /// Caller-supplied transform. Exactly one of the two is populated by
    /// the constructors; the raw transform sees the scaled representation,
    /// the value transform sees the external `f64` value.
    Custom {
        /// Transform over the scaled fixed-point value.
        raw: Option<Arc<dyn Fn(i64) -> i64 + Send + Sync>>,
        /// Transform over the external decimal value.
        value: Option<Arc<dyn Fn(f64) -> f64 + Send + Sync>>,
    },
    /// Applies `inner` only while `predicate` holds for the owning
    /// [`Numeric`] at computation time.
    Conditional {
        /// Gate evaluated against the current state on every recompute.
        predicate: Arc<dyn Fn(&Numeric) -> bool + Send + Sync>,
        /// The modifier applied when the gate is open.
        inner: Box<Modifier>,
    },
}

impl Clone for ModifierOp {
    fn clone(&self) -> Self {
        match self {
            ModifierOp::Addition { store_value } => ModifierOp::Addition {
                store_value: *store_value,
            },
            ModifierOp::Fraction {
                numerator,
                denominator,
                mode,
            } => ModifierOp::Fraction {
                numerator: *numerator,
                denominator: *denominator,
                mode: *mode,
            },
            ModifierOp::Custom { raw, value } => ModifierOp::Custom {
                raw: raw.clone(),
                value: value.clone(),
            },
            ModifierOp::Conditional { predicate, inner } => ModifierOp::Conditional {
                predicate: Arc::clone(predicate),
                inner: inner.clone(),
            },
        }
    }
}

impl std::fmt::Debug for ModifierOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifierOp::Addition { store_value } => f
                .debug_struct("Addition")
                .field("store_value", store_value)
                .finish(),
            ModifierOp::Fraction {
                numerator,
                denominator,
                mode,
            } => f
                .debug_struct("Fraction")
                .field("numerator", numerator)
                .field("denominator", denominator)
                .field("mode", mode)
                .finish(),
            ModifierOp::Custom { raw, value } => f
                .debug_struct("Custom")
                .field("raw", &raw.as_ref().map(|_| "<fn>"))
                .field("value", &value.as_ref().map(|_| "<fn>"))
                .finish(),
            ModifierOp::Conditional { inner, .. } => f
                .debug_struct("Conditional")
                .field("predicate", &"<fn>")
                .field("inner", inner)
                .finish(),
        }
    }
}

/// A modifier: payload plus shared metadata.
///
/// Constructed through the named constructors, which validate arguments
/// (`count > 0`, non-empty name, non-zero denominator) up front so malformed
/// game data is rejected at load time rather than mid-computation.
///
/// # Examples
///
/// ```rust
/// use nummod::{fixed, Modifier, Numeric, TagSet};
///
/// let numeric = Numeric::new(100).unwrap();
/// let bonus = Modifier::addition(50, TagSet::new(), "ring", 1).unwrap();
///
/// let out = bonus.apply(1, numeric.origin_value(), &numeric).unwrap();
/// assert_eq!(fixed::to_int(out), 150);
/// ```
#[derive(Debug, Clone)]
pub struct Modifier {
    pub(crate) op: ModifierOp,
    pub(crate) meta: ModifierMeta,
}

impl Modifier {
    /// Create a flat addition of an external integer amount.
    ///
    /// The amount is scaled into fixed-point form; fails with
    /// [`NumericError::InvalidValue`] if scaling overflows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{Modifier, Priority, TagSet};
    ///
    /// let bonus = Modifier::addition(25, TagSet::from(["Equipment"]), "ring", 2).unwrap();
    /// assert_eq!(bonus.count(), 2);
    /// assert_eq!(bonus.priority(), Priority::Skill);
    /// ```
    pub fn addition(value: i64, tags: TagSet, name: &str, count: i64) -> Result<Self, NumericError> {
        let store_value = fixed::from_int(value)?;
        Self::addition_scaled(store_value, tags, name, count)
    }

    /// Create a flat addition of an external decimal amount.
    ///
    /// Fails with [`NumericError::InvalidValue`] on NaN, infinity or a
    /// magnitude that overflows after scaling.
    pub fn addition_f64(
        value: f64,
        tags: TagSet,
        name: &str,
        count: i64,
    ) -> Result<Self, NumericError> {
        let store_value = fixed::from_f64(value)?;
        Self::addition_scaled(store_value, tags, name, count)
    }

    fn addition_scaled(
        store_value: i64,
        tags: TagSet,
        name: &str,
        count: i64,
    ) -> Result<Self, NumericError> {
        let meta = validated_meta(tags, name, count, Priority::Skill)?;
        Ok(Self {
            op: ModifierOp::Addition { store_value },
            meta,
        })
    }

    /// Create a fraction modifier scaling its tag-targeted portion by
    /// `numerator / denominator`.
    ///
    /// Fails with [`NumericError::InvalidArgument`] on a zero denominator;
    /// the ratio never reaches `apply` malformed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{FractionMode, Modifier, TagSet};
    ///
    /// // +50% on everything tagged Equipment.
    /// let scaling = Modifier::fraction(
    ///     150,
    ///     100,
    ///     FractionMode::Increase,
    ///     TagSet::from(["Equipment"]),
    ///     "gear polish",
    ///     1,
    /// )
    /// .unwrap();
    /// assert!(scaling.tags().intersects(&TagSet::from(["Equipment"])));
    /// ```
    pub fn fraction(
        numerator: i64,
        denominator: i64,
        mode: FractionMode,
        tags: TagSet,
        name: &str,
        count: i64,
    ) -> Result<Self, NumericError> {
        if denominator == 0 {
            return Err(NumericError::InvalidArgument(
                "fraction denominator must not be zero".to_string(),
            ));
        }
        let meta = validated_meta(tags, name, count, Priority::Multiplier)?;
        Ok(Self {
            op: ModifierOp::Fraction {
                numerator,
                denominator,
                mode,
            },
            meta,
        })
    }

    /// Create a custom modifier transforming the scaled fixed-point value.
    ///
    /// The transform runs once per recompute, after all ordinary modifiers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{fixed, Modifier, Numeric};
    ///
    /// // Round down to whole external units.
    /// let floor = Modifier::custom_raw(|v| v - v.rem_euclid(fixed::SCALE), "floor", 1).unwrap();
    ///
    /// let numeric = Numeric::from_f64(1.5).unwrap();
    /// let out = floor.apply(1, numeric.origin_value(), &numeric).unwrap();
    /// assert_eq!(out, fixed::SCALE);
    /// ```
    pub fn custom_raw<F>(transform: F, name: &str, count: i64) -> Result<Self, NumericError>
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        let meta = validated_meta(TagSet::new(), name, count, Priority::Clamp)?;
        Ok(Self {
            op: ModifierOp::Custom {
                raw: Some(Arc::new(transform)),
                value: None,
            },
            meta,
        })
    }

    /// Create a custom modifier transforming the external decimal value.
    ///
    /// The result is validated and scaled back; a non-finite or out-of-range
    /// output fails with [`NumericError::ArithmeticOverflow`].
    pub fn custom_value<F>(transform: F, name: &str, count: i64) -> Result<Self, NumericError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let meta = validated_meta(TagSet::new(), name, count, Priority::Clamp)?;
        Ok(Self {
            op: ModifierOp::Custom {
                raw: None,
                value: Some(Arc::new(transform)),
            },
            meta,
        })
    }

    /// Create a clamp constraint with optional external integer bounds.
    ///
    /// Either bound may be `None` for no limit in that direction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{Modifier, Numeric};
    ///
    /// let mut health = Numeric::new(250).unwrap();
    /// health.add_modifier(Modifier::clamp(Some(0), Some(100), "hp cap").unwrap());
    /// assert_eq!(health.final_value().unwrap(), 100);
    /// ```
    pub fn clamp(min: Option<i64>, max: Option<i64>, name: &str) -> Result<Self, NumericError> {
        Self::clamp_counted(min, max, name, 1)
    }

    pub(crate) fn clamp_counted(
        min: Option<i64>,
        max: Option<i64>,
        name: &str,
        count: i64,
    ) -> Result<Self, NumericError> {
        let min_raw = min.map(fixed::from_int).transpose()?;
        let max_raw = max.map(fixed::from_int).transpose()?;
        Self::custom_raw(
            move |v| {
                let mut out = v;
                if let Some(min) = min_raw {
                    out = out.max(min);
                }
                if let Some(max) = max_raw {
                    out = out.min(max);
                }
                out
            },
            name,
            count,
        )
    }

    /// Wrap another modifier behind a predicate over the owning [`Numeric`].
    ///
    /// The predicate is evaluated on every recompute; while it returns
    /// `false` the accumulated value passes through unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{Modifier, Numeric, TagSet};
    ///
    /// let inner = Modifier::addition(10, TagSet::new(), "rage", 1).unwrap();
    /// let rage = Modifier::conditional(
    ///     |n: &Numeric| n.origin_value() >= 0,
    ///     inner,
    ///     "rage when alive",
    ///     1,
    /// )
    /// .unwrap();
    ///
    /// let mut damage = Numeric::new(100).unwrap();
    /// damage.add_modifier(rage);
    /// assert_eq!(damage.final_value().unwrap(), 110);
    /// ```
    pub fn conditional<P>(
        predicate: P,
        inner: Modifier,
        name: &str,
        count: i64,
    ) -> Result<Self, NumericError>
    where
        P: Fn(&Numeric) -> bool + Send + Sync + 'static,
    {
        let priority = inner.meta.priority;
        let meta = validated_meta(TagSet::new(), name, count, priority)?;
        Ok(Self {
            op: ModifierOp::Conditional {
                predicate: Arc::new(predicate),
                inner: Box::new(inner),
            },
            meta,
        })
    }

    /// Override the application tier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{Modifier, Priority, TagSet};
    ///
    /// let early = Modifier::addition(5, TagSet::new(), "base boost", 1)
    ///     .unwrap()
    ///     .with_priority(Priority::Base);
    /// assert_eq!(early.priority(), Priority::Base);
    /// ```
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.meta.priority = priority;
        self
    }

    /// The payload of this modifier.
    pub fn op(&self) -> &ModifierOp {
        &self.op
    }

    /// The shared metadata of this modifier.
    pub fn meta(&self) -> &ModifierMeta {
        &self.meta
    }

    /// The variant discriminant.
    pub fn kind(&self) -> ModifierKind {
        match self.op {
            ModifierOp::Addition { .. } => ModifierKind::Addition,
            ModifierOp::Fraction { .. } => ModifierKind::Fraction,
            ModifierOp::Custom { .. } => ModifierKind::Custom,
            ModifierOp::Conditional { .. } => ModifierKind::Conditional,
        }
    }

    /// Identity key for merge-by-name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Stack count this modifier carries into a collection.
    pub fn count(&self) -> i64 {
        self.meta.count
    }

    /// Tags scoping this modifier.
    pub fn tags(&self) -> &TagSet {
        &self.meta.tags
    }

    /// Application tier.
    pub fn priority(&self) -> Priority {
        self.meta.priority
    }

    /// Whether the modifier is anonymous (named [`DEFAULT_NAME`]).
    pub fn is_anonymous(&self) -> bool {
        self.meta.is_anonymous()
    }

    /// Whether `other` has the same variant and stored payload.
    ///
    /// Used to remove anonymous modifiers, which have no usable name.
    /// Custom and conditional payloads are opaque and never match.
    pub fn structurally_matches(&self, other: &Modifier) -> bool {
        match (&self.op, &other.op) {
            (
                ModifierOp::Addition { store_value: a },
                ModifierOp::Addition { store_value: b },
            ) => a == b,
            (
                ModifierOp::Fraction {
                    numerator: n1,
                    denominator: d1,
                    mode: m1,
                },
                ModifierOp::Fraction {
                    numerator: n2,
                    denominator: d2,
                    mode: m2,
                },
            ) => n1 == n2 && d1 == d2 && m1 == m2,
            _ => false,
        }
    }

    /// Apply this modifier to the accumulated value `source`.
    ///
    /// `count` is the accumulated stack count owned by the collection entry.
    /// `numeric` is the owning container; only fraction targeting and
    /// conditional predicates read it.
    ///
    /// All values are in scaled fixed-point form.
    pub fn apply(&self, count: i64, source: i64, numeric: &Numeric) -> Result<i64, NumericError> {
        match &self.op {
            ModifierOp::Addition { store_value } => {
                let next = source as i128 + (*store_value as i128) * (count as i128);
                to_raw(next, "addition")
            }
            ModifierOp::Fraction {
                numerator,
                denominator,
                mode,
            } => self.apply_fraction(*numerator, *denominator, *mode, count, source, numeric),
            ModifierOp::Custom { raw, value } => match (raw, value) {
                (Some(transform), _) => Ok(transform(source)),
                (None, Some(transform)) => {
                    let out = transform(fixed::to_f64(source));
                    fixed::checked_from_f64(out)
                        .ok_or(NumericError::ArithmeticOverflow("custom transform"))
                }
                (None, None) => Err(NumericError::InvalidState(
                    "custom modifier has no transform",
                )),
            },
            ModifierOp::Conditional { predicate, inner } => {
                if predicate(numeric) {
                    let effective = inner
                        .meta
                        .count
                        .checked_mul(count)
                        .ok_or(NumericError::ArithmeticOverflow("conditional count"))?;
                    inner.apply(effective, source, numeric)
                } else {
                    Ok(source)
                }
            }
        }
    }

    /// Tag-scoped fraction composition.
    ///
    /// Splits the accumulated value into the targeted portion (additions
    /// sharing a tag, plus the origin when tagged `SELF`) and the untargeted
    /// remainder, then applies the ratio to the targeted portion only.
    fn apply_fraction(
        &self,
        numerator: i64,
        denominator: i64,
        mode: FractionMode,
        count: i64,
        source: i64,
        numeric: &Numeric,
    ) -> Result<i64, NumericError> {
        let origin = numeric.origin_value();
        let tags = &self.meta.tags;

        // Untagged fractions scale the origin only; additive contributions
        // pass through untouched.
        if tags.is_empty() {
            let all_add = numeric.additive_sum()?;
            let scaled = apply_ratio(origin, numerator, denominator, mode, count)?;
            return to_raw(scaled as i128 + all_add as i128, "fraction");
        }

        let all_add = numeric.additive_sum()?;
        let targeted_add = numeric.additive_sum_by_tags(tags)?;
        let targeted_base = if tags.contains_self() {
            to_raw(origin as i128 + targeted_add as i128, "fraction target")?
        } else {
            targeted_add
        };
        let untargeted_base = origin as i128 + all_add as i128 - targeted_base as i128;

        if untargeted_base == 0 {
            // Everything accumulated so far belongs to this fraction.
            apply_ratio(source, numerator, denominator, mode, count)
        } else if targeted_base == 0 {
            // No addition shares a tag and SELF is absent.
            Ok(source)
        } else {
            // Isolate the portion this fraction is responsible for, so
            // successive fractions with different scopes compose without
            // re-deriving from scratch.
            let current_targeted = to_raw(source as i128 - untargeted_base, "fraction target")?;
            let scaled = apply_ratio(current_targeted, numerator, denominator, mode, count)?;
            to_raw(untargeted_base + scaled as i128, "fraction")
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.op {
            ModifierOp::Addition { store_value } => {
                write!(f, "{:+.2}", fixed::to_f64(*store_value))?;
            }
            ModifierOp::Fraction {
                numerator,
                denominator,
                mode,
            } => match mode {
                FractionMode::Override => write!(f, "×{numerator}/{denominator}")?,
                FractionMode::Increase => write!(f, "+{numerator}/{denominator}")?,
            },
            ModifierOp::Custom { raw, .. } => {
                if raw.is_some() {
                    write!(f, "custom(raw)")?;
                } else {
                    write!(f, "custom(value)")?;
                }
            }
            ModifierOp::Conditional { inner, .. } => {
                write!(f, "if(..) {inner}")?;
            }
        }
        if self.meta.count > 1 {
            write!(f, " ×{}", self.meta.count)?;
        }
        if !self.meta.tags.is_empty() {
            write!(f, " {}", self.meta.tags)?;
        }
        Ok(())
    }
}

fn validated_meta(
    tags: TagSet,
    name: &str,
    count: i64,
    priority: Priority,
) -> Result<ModifierMeta, NumericError> {
    if name.is_empty() {
        return Err(NumericError::InvalidArgument(
            "modifier name must not be empty".to_string(),
        ));
    }
    if count <= 0 {
        return Err(NumericError::InvalidArgument(format!(
            "modifier count must be positive, got {count}"
        )));
    }
    Ok(ModifierMeta {
        tags,
        name: Arc::from(name),
        count,
        priority,
    })
}

fn to_raw(value: i128, op: &'static str) -> Result<i64, NumericError> {
    i64::try_from(value).map_err(|_| NumericError::ArithmeticOverflow(op))
}

/// Apply `numerator/denominator` to `x` under the given mode and count.
///
/// `Increase` stays in exact integer arithmetic with truncating division.
/// `Override` compounds the ratio `count` times; it uses only IEEE-754
/// field operations (one division, binary exponentiation by multiplication)
/// so the result is bit-identical across platforms.
fn apply_ratio(
    x: i64,
    numerator: i64,
    denominator: i64,
    mode: FractionMode,
    count: i64,
) -> Result<i64, NumericError> {
    match mode {
        FractionMode::Increase => {
            let delta = (x as i128)
                .checked_mul(numerator as i128)
                .and_then(|p| p.checked_mul(count as i128))
                .map(|p| p / denominator as i128)
                .ok_or(NumericError::ArithmeticOverflow("fraction increase"))?;
            to_raw(x as i128 + delta, "fraction increase")
        }
        FractionMode::Override => {
            let ratio = numerator as f64 / denominator as f64;
            let multiplier = pow_by_mul(ratio, count as u64);
            fixed::checked_raw_f64(x as f64 * multiplier)
                .ok_or(NumericError::ArithmeticOverflow("fraction override"))
        }
    }
}

/// Binary exponentiation by repeated multiplication. Count is always
/// positive, so `exp == 0` never reaches the loop in practice.
fn pow_by_mul(base: f64, mut exp: u64) -> f64 {
    let mut result = 1.0_f64;
    let mut base = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result *= base;
        }
        base *= base;
        exp >>= 1;
    }
    result
}
