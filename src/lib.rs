//! # nummod - Deterministic Numeric Modifier Engine
//!
//! A modifier stacking engine for game numerics that provides:
//! - **Deterministic** resolution (same modifiers → same value, on every platform)
//! - **Fixed-point** storage (`i64` scaled by 10,000, no float drift)
//! - **Tag-scoped** fractions (percentages that target only tagged contributions)
//! - **Cached** final values (recomputed only after a modifier change)
//!
//! ## Core Concepts
//!
//! ### Modifier Pipeline
//!
//! Values flow through a simple pipeline:
//!
//! ```text
//! [Modifier] → [ModifierCollection] → [stable order] → [Numeric final value]
//! ```
//!
//! 1. **Modifiers** describe one change each (flat addition, fraction, clamp, ...)
//! 2. **Collections** store them and merge repeat applications by name
//! 3. **Numeric** folds them in a stable order and caches the result
//!
//! ### Key Features
//!
//! - **Stable Ordering**: modifiers apply by priority, then name, then count
//! - **Merge by Name**: adding a named modifier twice stacks its count
//! - **Constraint Stage**: clamps and custom transforms run after ordinary modifiers
//! - **Conditional Stage**: gated modifiers run last and see live state
//! - **Snapshots**: persistable modifiers serialize with `serde`
//!
//! ## Example
//!
//! ```rust
//! use nummod::{FractionMode, Modifier, Numeric, TagSet};
//!
//! let mut attack = Numeric::new(100).unwrap();
//!
//! // Flat bonus contributed by a piece of equipment.
//! attack.add_modifier(Modifier::addition(20, TagSet::from(["Equipment"]), "sword", 1).unwrap());
//!
//! // +150% applied only to equipment-tagged contributions.
//! attack.add_modifier(
//!     Modifier::fraction(
//!         150,
//!         100,
//!         FractionMode::Increase,
//!         TagSet::from(["Equipment"]),
//!         "honing",
//!         1,
//!     )
//!     .unwrap(),
//! );
//!
//! assert_eq!(attack.final_value().unwrap(), 150); // 100 + (20 + 20 * 1.5)
//! ```
//!
//! ## Modules
//!
//! - [`numeric`] - Modified numeric values with cached resolution
//! - [`modifier`] - Modifier payloads and their application rules
//! - [`collection`] - Modifier storage with merge-by-name semantics
//! - [`builder`] - Fluent modifier construction
//! - [`sorter`] - Deterministic modifier ordering
//! - [`tag`] - Tags and tag sets for scoped fractions
//! - [`fixed`] - Fixed-point conversion helpers
//! - [`snapshot`] - Serializable state capture
//! - [`error`] - Error types

pub mod builder;
pub mod collection;
pub mod error;
pub mod fixed;
pub mod modifier;
pub mod numeric;
pub mod snapshot;
pub mod sorter;
pub mod tag;

// Re-export main types for convenience
pub use error::NumericError;
pub use numeric::Numeric;

// Re-export modifier types
pub use builder::ModifierBuilder;
pub use modifier::{
    FractionMode, Modifier, ModifierKind, ModifierMeta, ModifierOp, Priority, DEFAULT_NAME,
};

// Re-export storage types
pub use collection::{ModifierCollection, ModifierEntry};
pub use tag::{Tag, TagSet, SELF_TAG};

// Re-export snapshot types
pub use snapshot::{ModifierSnapshot, NumericSnapshot};
