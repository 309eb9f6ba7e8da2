//! Reverse edges: who depends on this seed.
//!
//! [`Referents`] records, for one seed, every other seed that names it as a
//! dependency. The set is non-owning (it stores arena handles) and is only
//! ever appended to: in the defined lifecycle edges accumulate during
//! construction and the graph is then frozen, so no removal is provided.
//!
//! Referents support liveness queries (which seeds are still needed),
//! reverse traversal for emission-order decisions, and diagnostics.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::id::SeedRef;

/// Insertion-ordered set of back references for one seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Referents {
    set: IndexSet<SeedRef>,
}

impl Referents {
    pub fn new() -> Self {
        Referents::default()
    }

    /// Records that `referent` depends on the owning seed. Idempotent: a
    /// seed depending on the same target under two keys appears once.
    pub(crate) fn insert(&mut self, referent: SeedRef) {
        self.set.insert(referent);
    }

    pub fn contains(&self, referent: SeedRef) -> bool {
        self.set.contains(&referent)
    }

    /// Iterates referents in first-recorded order.
    pub fn iter(&self) -> impl Iterator<Item = SeedRef> + '_ {
        self.set.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// A seed with no referents is a root: nothing downstream needs its value.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut refs = Referents::new();
        refs.insert(SeedRef(1));
        refs.insert(SeedRef(3));

        assert!(refs.contains(SeedRef(1)));
        assert!(refs.contains(SeedRef(3)));
        assert!(!refs.contains(SeedRef(2)));
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut refs = Referents::new();
        refs.insert(SeedRef(7));
        refs.insert(SeedRef(7));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn iteration_preserves_first_recorded_order() {
        let mut refs = Referents::new();
        refs.insert(SeedRef(9));
        refs.insert(SeedRef(2));
        refs.insert(SeedRef(9));
        refs.insert(SeedRef(4));

        let order: Vec<SeedRef> = refs.iter().collect();
        assert_eq!(order, vec![SeedRef(9), SeedRef(2), SeedRef(4)]);
    }

    #[test]
    fn empty_set_is_root() {
        let refs = Referents::new();
        assert!(refs.is_empty());
        assert_eq!(refs.len(), 0);
    }
}
