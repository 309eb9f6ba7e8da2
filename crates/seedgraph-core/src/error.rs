//! Core error types for seedgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants. Two enums
//! split the surface by phase: [`CoreError`] for construction, wiring, and
//! finalize; [`CompileError`] for failures during a compilation run.
//!
//! Variants fall into the taxonomy the crate is built around:
//! - configuration errors (construction-time, fatal to that seed),
//! - capability errors (call-time, recoverable by the caller),
//! - consistency errors (fatal, a defect in the driving authority).

use crate::deps::DepKey;
use crate::id::{SeedId, SeedRef};
use thiserror::Error;

/// Errors produced by seed construction, graph wiring, and the finalize pass.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Seed parameters were built without a description.
    #[error("missing description")]
    MissingDescription,

    /// Seed parameters were built without a compiler function.
    #[error("missing compiler for seed '{description}'")]
    MissingCompiler { description: String },

    /// Seed parameters were built without a compilation mode.
    #[error("seed mode has not been defined for seed '{description}'")]
    MissingMode { description: String },

    /// Seed parameters were built without a type tag.
    #[error("missing type for seed '{description}'")]
    MissingType { description: String },

    /// The type tag failed the type-validation contract.
    #[error("invalid type '{tag}' for seed '{description}': {reason}")]
    InvalidType {
        description: String,
        tag: String,
        reason: String,
    },

    /// A dependency key was declared twice on the same seed.
    #[error("duplicate dependency key {key} on seed '{description}'")]
    DuplicateDependencyKey { description: String, key: DepKey },

    /// A SeedRef did not resolve to a seed in this graph.
    #[error("seed not found: SeedRef({r})", r = r.0)]
    SeedNotFound { r: SeedRef },

    /// A seed without a forwarding target was invoked as a function.
    #[error("seed '{description}' cannot be used as a function")]
    NotCallable { description: String },

    /// Consistency: a seed's id was assigned a second time.
    #[error("id already assigned for seed {id} '{description}'")]
    IdReassigned { id: SeedId, description: String },

    /// Consistency: a seed's compilation result was written a second time.
    #[error("compilation result already set for seed {id} '{description}'")]
    ResultOverwrite { id: SeedId, description: String },

    /// A compilation result was read before any was set.
    #[error("no compilation result for seed {id} '{description}'")]
    ResultMissing { id: SeedId, description: String },

    /// A structural mutation was attempted after finalize.
    #[error("graph is frozen: {operation} after finalize")]
    GraphFrozen { operation: &'static str },

    /// Compilation (or re-finalize) was requested out of phase.
    #[error("graph has not been finalized")]
    NotFinalized,

    /// The finalize pass was run twice.
    #[error("graph has already been finalized")]
    AlreadyFinalized,

    /// Consistency: the graph contains a dependency cycle. Memoized
    /// single-run-per-seed compilation has no semantics for cycles.
    #[error("dependency cycle involving seeds: {}", involved.join(", "))]
    DependencyCycle { involved: Vec<String> },
}

/// Errors produced while driving a compilation run.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A core consistency or usage error surfaced mid-run.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A seed's compiler returned without ever resuming its continuation,
    /// leaving the traversal with an uncompiled seed.
    #[error("compiler for seed {id} '{description}' did not invoke its continuation")]
    ContinuationNotInvoked { id: SeedId, description: String },

    /// Backend-defined failure raised inside a compiler callback.
    #[error("emit error: {0}")]
    Emit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_callable_message_names_description() {
        let err = CoreError::NotCallable {
            description: "sum of squares".into(),
        };
        assert_eq!(
            err.to_string(),
            "seed 'sum of squares' cannot be used as a function"
        );
    }

    #[test]
    fn cycle_message_lists_involved_seeds() {
        let err = CoreError::DependencyCycle {
            involved: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle involving seeds: a, b");
    }

    #[test]
    fn core_error_converts_into_compile_error() {
        let core = CoreError::NotFinalized;
        let compile: CompileError = core.into();
        assert!(matches!(compile, CompileError::Core(CoreError::NotFinalized)));
    }
}
