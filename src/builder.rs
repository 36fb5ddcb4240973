//! Fluent construction sugar for modifiers.
//!
//! The builder is a thin declarative layer over the named constructors:
//! `build()` funnels through the same validation, so merge and tag
//! semantics are identical however a modifier was made. Defaults are an
//! anonymous name, no tags, count 1 and the variant's default priority.

use crate::error::NumericError;
use crate::modifier::{FractionMode, Modifier, Priority, DEFAULT_NAME};
use crate::numeric::Numeric;
use crate::tag::{Tag, TagSet};
use std::sync::Arc;

enum BuilderPayload {
    Addition(i64),
    AdditionF64(f64),
    Fraction {
        numerator: i64,
        denominator: i64,
        mode: FractionMode,
    },
    Clamp {
        min: Option<i64>,
        max: Option<i64>,
    },
    Raw(Arc<dyn Fn(i64) -> i64 + Send + Sync>),
    Value(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
    Conditional {
        predicate: Arc<dyn Fn(&Numeric) -> bool + Send + Sync>,
        inner: Box<Modifier>,
    },
}

/// Accumulates modifier settings before validation.
///
/// Created through the `*_of` entry points on [`Modifier`].
pub struct ModifierBuilder {
    payload: BuilderPayload,
    tags: TagSet,
    name: String,
    count: i64,
    priority: Option<Priority>,
}

impl Modifier {
    /// Start building a flat addition of an external integer amount.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{Modifier, TagSet};
    ///
    /// let bonus = Modifier::addition_of(50)
    ///     .tags(["Equipment"])
    ///     .name("ring")
    ///     .count(2)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(bonus.name(), "ring");
    /// assert_eq!(bonus.count(), 2);
    /// ```
    pub fn addition_of(value: i64) -> ModifierBuilder {
        ModifierBuilder::new(BuilderPayload::Addition(value))
    }

    /// Start building a flat addition of an external decimal amount.
    pub fn addition_of_f64(value: f64) -> ModifierBuilder {
        ModifierBuilder::new(BuilderPayload::AdditionF64(value))
    }

    /// Start building a fraction modifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nummod::{FractionMode, Modifier};
    ///
    /// let double = Modifier::fraction_of(2, 1, FractionMode::Override)
    ///     .name("double")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(double.name(), "double");
    /// ```
    pub fn fraction_of(numerator: i64, denominator: i64, mode: FractionMode) -> ModifierBuilder {
        ModifierBuilder::new(BuilderPayload::Fraction {
            numerator,
            denominator,
            mode,
        })
    }

    /// Start building a clamp constraint with external integer bounds.
    pub fn clamp_of(min: Option<i64>, max: Option<i64>) -> ModifierBuilder {
        ModifierBuilder::new(BuilderPayload::Clamp { min, max })
    }

    /// Start building a custom modifier over the scaled representation.
    pub fn custom_of<F>(transform: F) -> ModifierBuilder
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        ModifierBuilder::new(BuilderPayload::Raw(Arc::new(transform)))
    }

    /// Start building a custom modifier over the external decimal value.
    pub fn custom_value_of<F>(transform: F) -> ModifierBuilder
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        ModifierBuilder::new(BuilderPayload::Value(Arc::new(transform)))
    }

    /// Start building a conditional wrapper around `inner`.
    pub fn conditional_of<P>(predicate: P, inner: Modifier) -> ModifierBuilder
    where
        P: Fn(&Numeric) -> bool + Send + Sync + 'static,
    {
        ModifierBuilder::new(BuilderPayload::Conditional {
            predicate: Arc::new(predicate),
            inner: Box::new(inner),
        })
    }
}

impl ModifierBuilder {
    fn new(payload: BuilderPayload) -> Self {
        Self {
            payload,
            tags: TagSet::new(),
            name: DEFAULT_NAME.to_string(),
            count: 1,
            priority: None,
        }
    }

    /// Replace the tag set.
    pub fn tags<T: Into<TagSet>>(mut self, tags: T) -> Self {
        self.tags = tags.into();
        self
    }

    /// Add a single tag.
    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.insert(Tag::new(tag));
        self
    }

    /// Set the identity name. Without this the modifier stays anonymous.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the stack count carried into a collection.
    pub fn count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    /// Override the variant's default priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Validate and construct the modifier.
    ///
    /// Fails exactly like the named constructors: zero denominator,
    /// empty name or non-positive count are rejected here, never later.
    pub fn build(self) -> Result<Modifier, NumericError> {
        let name = self.name;
        let count = self.count;
        let tags = self.tags;

        let mut modifier = match self.payload {
            BuilderPayload::Addition(value) => Modifier::addition(value, tags, &name, count)?,
            BuilderPayload::AdditionF64(value) => {
                Modifier::addition_f64(value, tags, &name, count)?
            }
            BuilderPayload::Fraction {
                numerator,
                denominator,
                mode,
            } => Modifier::fraction(numerator, denominator, mode, tags, &name, count)?,
            BuilderPayload::Clamp { min, max } => {
                let mut built = Modifier::clamp_counted(min, max, &name, count)?;
                built.meta.tags = tags;
                built
            }
            BuilderPayload::Raw(transform) => {
                let mut built = Modifier::custom_raw(move |v| transform(v), &name, count)?;
                built.meta.tags = tags;
                built
            }
            BuilderPayload::Value(transform) => {
                let mut built = Modifier::custom_value(move |v| transform(v), &name, count)?;
                built.meta.tags = tags;
                built
            }
            BuilderPayload::Conditional { predicate, inner } => {
                let mut built =
                    Modifier::conditional(move |n: &Numeric| predicate(n), *inner, &name, count)?;
                built.meta.tags = tags;
                built
            }
        };

        if let Some(priority) = self.priority {
            modifier = modifier.with_priority(priority);
        }
        Ok(modifier)
    }
}
