//! The compilation protocol: compiler callbacks and continuations.
//!
//! A seed is turned into code by its configured [`CompilerFn`], which
//! receives the graph, the shared [`CompileContext`], its own [`SeedRef`],
//! and a [`Continuation`]. The compiler produces the seed's artifact and
//! publishes it by resuming the continuation; the driving walk advances
//! when the compiler returns. Because the continuation is consumed by
//! value, it can be resumed at most once; because resuming writes the
//! seed's write-once memo, the compiler body runs at most once per seed no
//! matter how many downstream seeds reference it.
//!
//! Artifacts, forwarded-call values, and front-end scratch data are all
//! opaque `serde_json::Value`s: the graph stores and routes them without
//! interpreting them.

use std::rc::Rc;

use serde_json::Value;

use crate::error::CompileError;
use crate::graph::ExprGraph;
use crate::id::SeedRef;

/// Opaque compiled artifact of one seed.
pub type Artifact = Value;

/// A seed's compiler callback.
///
/// Contract: produce the seed's artifact and resume the continuation
/// exactly once (directly or after driving nested compilation through
/// [`ExprGraph::compile_seed`]). Returning without resuming leaves the
/// seed uncompiled, which the driver reports as
/// [`CompileError::ContinuationNotInvoked`].
pub type CompilerFn = Rc<
    dyn Fn(&mut ExprGraph, &mut CompileContext, SeedRef, Continuation) -> Result<(), CompileError>,
>;

/// Forwarding target for a callable seed.
pub type ForwardFn = Rc<dyn Fn(&[Value]) -> Value>;

/// Shared per-run compilation context.
///
/// The graph itself does not interpret `data`; it is a scratch payload the
/// front end and the compiler callbacks share across the run.
#[derive(Debug, Default)]
pub struct CompileContext {
    pub data: Value,
}

impl CompileContext {
    pub fn new() -> Self {
        CompileContext::default()
    }
}

/// Single-use resume token handed to a compiler callback.
///
/// Resuming stores the artifact in the seed's write-once memo; the driving
/// walk picks the next seed once the compiler returns, so the walk's stack
/// stays flat no matter how many seeds the graph holds. Nested scheduling
/// goes through [`ExprGraph::compile_seed`], whose depth is bounded by the
/// actual nesting, not the graph size.
#[must_use = "a compiler must resume its continuation"]
pub struct Continuation {
    pub(crate) seed: SeedRef,
}

impl Continuation {
    /// The seed this continuation will store an artifact for.
    pub fn seed(&self) -> SeedRef {
        self.seed
    }

    /// Stores `artifact` as the seed's compilation result.
    ///
    /// Errors with a consistency error if the seed already holds a result.
    pub fn resume(self, graph: &mut ExprGraph, artifact: Artifact) -> Result<(), CompileError> {
        graph.seed_mut(self.seed)?.set_compilation_result(artifact)?;
        Ok(())
    }
}
