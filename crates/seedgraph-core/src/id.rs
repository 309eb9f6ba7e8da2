//! Stable ID newtypes for graph entities.
//!
//! All IDs are distinct newtype wrappers over `u32`, providing type safety
//! so that a [`SeedRef`] (arena handle) cannot be accidentally used where a
//! [`SeedId`] (compile-order id) is expected.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Arena handle for a seed, assigned at insertion time.
///
/// The inner value is the seed's index in the graph arena, which is also its
/// declaration order. All edges (dependencies, referents, raw deps) store
/// `SeedRef`s. A `SeedRef` is valid for the lifetime of the graph that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeedRef(pub u32);

/// Compile-order seed identifier.
///
/// Starts as [`SeedId::UNDEFINED`] and is assigned exactly once by the
/// graph's finalize pass, in topological order (dependencies first, ties
/// broken by declaration order). Used for variable naming, scheduling,
/// equality, and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeedId(pub u32);

impl SeedId {
    /// Sentinel for a seed that has not been through the finalize pass yet.
    pub const UNDEFINED: SeedId = SeedId(u32::MAX);

    /// Returns `true` if this id has been assigned by a finalize pass.
    pub fn is_defined(self) -> bool {
        self != SeedId::UNDEFINED
    }
}

// Display implementations -- just print the inner value (UNDEFINED spelled out).

impl fmt::Display for SeedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_defined() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "undefined")
        }
    }
}

// Bridge between SeedRef and petgraph's NodeIndex<u32>, used by the
// finalize pass when building the scheduling adjacency.

impl From<NodeIndex<u32>> for SeedRef {
    fn from(idx: NodeIndex<u32>) -> Self {
        SeedRef(idx.index() as u32)
    }
}

impl From<SeedRef> for NodeIndex<u32> {
    fn from(r: SeedRef) -> Self {
        NodeIndex::new(r.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ref_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let r = SeedRef::from(idx);
        assert_eq!(r.0, 42);

        let back: NodeIndex<u32> = r.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn seed_id_starts_undefined() {
        assert!(!SeedId::UNDEFINED.is_defined());
        assert!(SeedId(0).is_defined());
    }

    #[test]
    fn seed_id_display() {
        assert_eq!(format!("{}", SeedId(7)), "7");
        assert_eq!(format!("{}", SeedId::UNDEFINED), "undefined");
    }

    #[test]
    fn seed_ref_display() {
        assert_eq!(format!("{}", SeedRef(3)), "3");
    }

    #[test]
    fn serde_roundtrip() {
        let r = SeedRef(42);
        let json = serde_json::to_string(&r).unwrap();
        let back: SeedRef = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);

        let id = SeedId::UNDEFINED;
        let json = serde_json::to_string(&id).unwrap();
        let back: SeedId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
