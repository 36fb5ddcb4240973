//! Tag identifiers for scoping fraction modifiers.
//!
//! A `Tag` is an interned string label attached to modifiers. Fraction
//! modifiers use tags to select which addition modifiers they act on; the
//! reserved tag [`SELF_TAG`] denotes the immutable base value itself.
//!
//! Uses `Arc<str>` so that tags shared across many modifiers compare fast
//! and stay cheap to clone.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Reserved tag denoting the base value of a [`Numeric`](crate::Numeric).
///
/// A fraction modifier whose tag set contains this tag targets the origin
/// value in addition to any tag-matched addition modifiers.
pub const SELF_TAG: &str = "SELF";

/// Interned string label scoping which modifiers a fraction affects.
///
/// # Examples
///
/// ```rust
/// use nummod::Tag;
///
/// let equipment = Tag::new("Equipment");
/// let same: Tag = "Equipment".into();
/// assert_eq!(equipment, same);
/// assert!(!equipment.is_self());
/// assert!(Tag::self_tag().is_self());
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tag(Arc<str>);

impl Tag {
    /// Create a tag from a string slice.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// The reserved tag for the base value.
    pub fn self_tag() -> Self {
        Self::new(SELF_TAG)
    }

    /// String form of the tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved base-value tag.
    pub fn is_self(&self) -> bool {
        self.0.as_ref() == SELF_TAG
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Tag::from(s))
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of tags carried by a modifier or used as a query.
///
/// Iteration order is the tags' lexicographic order, which keeps every
/// tag-driven computation deterministic.
///
/// # Examples
///
/// ```rust
/// use nummod::{Tag, TagSet};
///
/// let gear = TagSet::from(["Equipment", "Ring"]);
/// let query = TagSet::from(["Equipment"]);
/// assert!(gear.intersects(&query));
/// assert!(!gear.contains_self());
///
/// let self_scope = TagSet::from([nummod::tag::SELF_TAG, "Equipment"]);
/// assert!(self_scope.contains_self());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag; returns `false` if it was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    /// Whether the set contains the given tag.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Whether the set contains the reserved base-value tag.
    pub fn contains_self(&self) -> bool {
        self.0.iter().any(Tag::is_self)
    }

    /// Whether any tag is shared with `other`.
    pub fn intersects(&self, other: &TagSet) -> bool {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small.iter().any(|t| large.contains(t))
    }

    /// Number of tags in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tags in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[&str; N]> for TagSet {
    fn from(tags: [&str; N]) -> Self {
        tags.iter().map(|s| Tag::new(s)).collect()
    }
}

impl From<&[&str]> for TagSet {
    fn from(tags: &[&str]) -> Self {
        tags.iter().map(|s| Tag::new(s)).collect()
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tag}")?;
        }
        write!(f, "]")
    }
}
