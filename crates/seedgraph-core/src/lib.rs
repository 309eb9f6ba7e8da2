//! seedgraph-core: the expression dependency graph of a staged compiler.
//!
//! Nodes ("seeds") represent deferred computations, linked by named
//! dependency edges and mirrored reverse edges. A graph is built
//! incrementally, finalized once (compile-order ids assigned, cycles
//! rejected, structure frozen), then compiled seed by seed through a
//! continuation protocol that lets a single seed's compiler drive further
//! compilation non-linearly while the write-once memo keeps every compiler
//! body to exactly one run.

pub mod compile;
pub mod deps;
pub mod error;
pub mod graph;
pub mod id;
pub mod mode;
pub mod params;
pub mod refs;
pub mod seed;
pub mod type_tag;

// Re-export commonly used types
pub use compile::{Artifact, CompileContext, CompilerFn, Continuation, ForwardFn};
pub use deps::{DepKey, Dependencies};
pub use error::{CompileError, CoreError};
pub use graph::ExprGraph;
pub use id::{SeedId, SeedRef};
pub use mode::Mode;
pub use params::{SeedParameters, SeedParametersBuilder};
pub use refs::Referents;
pub use seed::Seed;
pub use type_tag::{AnyType, TypeCheck, TypeRegistry, TypeTag};
