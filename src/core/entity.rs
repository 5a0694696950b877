//! Entity trait - common interface for everything a [`Store`](crate::core::store::Store) holds

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::core::error::AeroResult;

/// Common trait for all AeroCode entities
///
/// A store only knows how to validate, key, build and merge an entity
/// through this trait; the entity modules supply the field rules.
pub trait Entity: Clone + Serialize {
    /// Identifier type (natural code or surrogate id)
    type Key: Clone + PartialEq + fmt::Display + fmt::Debug;

    /// Input accepted by `create`
    type Draft;

    /// Partial update accepted by `update` (every field optional)
    type Patch;

    /// Human-readable entity kind used in messages and logs (e.g. "part")
    const KIND: &'static str;

    /// Get the entity's key
    fn key(&self) -> Self::Key;

    /// Whether this entity is addressed by `key`
    fn has_key(&self, key: &Self::Key) -> bool {
        self.key() == *key
    }

    /// Check that required draft fields are present
    fn validate(draft: &Self::Draft) -> AeroResult<()>;

    /// Choose the key for a new entity, rejecting collisions
    fn assign_key(draft: &Self::Draft, existing: &[Self]) -> AeroResult<Self::Key>;

    /// Build the entity from a validated draft
    fn build(key: Self::Key, draft: Self::Draft, today: NaiveDate) -> Self;

    /// Shallow-merge a patch; fields left as `None` keep their value
    fn merge(&mut self, patch: Self::Patch, today: NaiveDate);
}

/// Marker for entities whose stores expose `delete`
pub trait Deletable: Entity {}

/// Next surrogate id: one past the largest existing id (1 for an empty list)
pub fn next_id<I>(ids: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    ids.into_iter().max().unwrap_or(0) + 1
}

/// Colour family used when rendering a status value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Active,
    Waiting,
    Bad,
    Muted,
}

/// Closed enumerations with a display label in the domain's vocabulary
pub trait Labeled: Sized + Copy + 'static {
    /// Every variant, in declaration order
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn tone(&self) -> Tone {
        Tone::Muted
    }

    /// Parse from the display label or the kebab-case CLI name
    fn from_label(s: &str) -> Option<Self> {
        let wanted = normalize(s);
        Self::ALL.iter().copied().find(|v| normalize(v.label()) == wanted)
    }
}

/// Lower-case and unify separators so "EM ESTOQUE", "em-estoque" and
/// "em_estoque" compare equal
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect()
}

/// Case-insensitive substring search used by every free-text filter
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
