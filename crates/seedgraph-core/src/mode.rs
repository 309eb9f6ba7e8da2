//! Compilation modes.
//!
//! Every seed carries a [`Mode`] classifying its compilation semantics. The
//! set is closed and ordered by strictness: a pure seed may be inlined or
//! reordered freely, an ordered seed must keep its position relative to
//! other ordered seeds, a side-effectful seed must execute exactly once,
//! and a statement seed produces no usable value at all.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compilation mode of a seed, from least to most strict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Mode {
    /// A pure expression: no effects, freely inlinable.
    Pure,
    /// Value-producing, but must keep its relative order.
    Ordered,
    /// Performs side effects; must be materialized exactly once.
    SideEffectful,
    /// A statement: executed for effect only, no value at use sites.
    Statement,
}

impl Mode {
    /// Returns the stricter of two modes.
    ///
    /// Front ends use this to fold a seed's effective mode over the modes
    /// of its dependencies.
    pub fn stricter(self, other: Mode) -> Mode {
        self.max(other)
    }

    /// Returns `true` if a seed in this mode produces a value usable at
    /// reference sites.
    pub fn has_value(self) -> bool {
        !matches!(self, Mode::Statement)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Pure => "pure",
            Mode::Ordered => "ordered",
            Mode::SideEffectful => "side-effectful",
            Mode::Statement => "statement",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictness_order() {
        assert!(Mode::Pure < Mode::Ordered);
        assert!(Mode::Ordered < Mode::SideEffectful);
        assert!(Mode::SideEffectful < Mode::Statement);
    }

    #[test]
    fn stricter_picks_max() {
        assert_eq!(Mode::Pure.stricter(Mode::Statement), Mode::Statement);
        assert_eq!(Mode::SideEffectful.stricter(Mode::Ordered), Mode::SideEffectful);
        assert_eq!(Mode::Pure.stricter(Mode::Pure), Mode::Pure);
    }

    #[test]
    fn statement_has_no_value() {
        assert!(Mode::Pure.has_value());
        assert!(Mode::Ordered.has_value());
        assert!(Mode::SideEffectful.has_value());
        assert!(!Mode::Statement.has_value());
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Mode::Ordered).unwrap();
        let back: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mode::Ordered);
    }
}
