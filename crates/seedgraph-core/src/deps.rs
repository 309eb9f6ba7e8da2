//! Named forward edges from a seed to the seeds it needs.
//!
//! [`Dependencies`] is an insertion-ordered map from [`DepKey`] to
//! [`SeedRef`]. Keys are unique within one seed; iteration order is the
//! order keys were declared, which the compiler protocol treats only as a
//! default traversal hint (actual scheduling order comes from topology).

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::id::SeedRef;

/// Key naming one dependency edge of a seed.
///
/// Front ends use `Name` for semantically named inputs ("condition",
/// "body") and `Index` for positional ones (argument 0, 1, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepKey {
    Name(String),
    Index(u32),
}

impl DepKey {
    pub fn name(s: impl Into<String>) -> Self {
        DepKey::Name(s.into())
    }

    pub fn index(i: u32) -> Self {
        DepKey::Index(i)
    }
}

impl fmt::Display for DepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepKey::Name(s) => write!(f, ":{}", s),
            DepKey::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// Ordered, keyed forward edge set of one seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dependencies {
    entries: IndexMap<DepKey, SeedRef>,
}

impl Dependencies {
    pub fn new() -> Self {
        Dependencies::default()
    }

    /// Inserts a dependency edge. Re-inserting an existing key is a usage
    /// error surfaced by the graph wiring layer; this returns the key back
    /// so the caller can build the full error with seed context.
    pub(crate) fn insert(&mut self, key: DepKey, target: SeedRef) -> Result<(), DepKey> {
        if self.entries.contains_key(&key) {
            return Err(key);
        }
        self.entries.insert(key, target);
        Ok(())
    }

    /// Looks up the target seed under a key.
    pub fn get(&self, key: &DepKey) -> Option<SeedRef> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &DepKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates edges in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&DepKey, SeedRef)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// The referenced seeds, in declaration order. Most seeds have a
    /// handful of inputs, so the list is inline-allocated.
    pub fn targets(&self) -> SmallVec<[SeedRef; 4]> {
        self.entries.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
