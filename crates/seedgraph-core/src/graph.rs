//! ExprGraph: the arena-owning graph authority.
//!
//! [`ExprGraph`] owns every [`Seed`] in a single arena and is the only path
//! through which structure changes: seed insertion, dependency wiring, the
//! finalize pass, and the compilation walk. Edges are `SeedRef` index sets,
//! so forward and back edges carry no ownership and cannot dangle.
//!
//! Lifecycle: seeds are inserted and wired incrementally (the bidirectional
//! edge invariant holds continuously); `finalize` assigns compile-order ids
//! and freezes the structure; `compile` walks seeds in id order, invoking
//! each seed's compiler through the continuation protocol exactly once.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::{debug, trace};

use crate::compile::{CompileContext, Continuation};
use crate::deps::DepKey;
use crate::error::{CompileError, CoreError};
use crate::id::{SeedId, SeedRef};
use crate::params::SeedParameters;
use crate::seed::Seed;

/// The expression dependency graph.
#[derive(Debug, Default)]
pub struct ExprGraph {
    /// Arena: `SeedRef(i)` is index `i`. Seeds are never removed.
    seeds: Vec<Seed>,
    /// Compile order, filled by `finalize`. `order[k]` has id `k`.
    order: Vec<SeedRef>,
    finalized: bool,
}

impl ExprGraph {
    pub fn new() -> Self {
        ExprGraph::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Inserts a seed and wires its declared raw dependencies, keeping the
    /// reverse edges of every target in sync. Returns the arena handle.
    pub fn add_seed(&mut self, params: SeedParameters) -> Result<SeedRef, CoreError> {
        if self.finalized {
            return Err(CoreError::GraphFrozen {
                operation: "add_seed",
            });
        }

        // Every raw dep must point at a seed already in the arena.
        for (_, &target) in params.raw_deps() {
            if target.0 as usize >= self.seeds.len() {
                return Err(CoreError::SeedNotFound { r: target });
            }
        }

        let r = SeedRef(self.seeds.len() as u32);
        let raw: Vec<(DepKey, SeedRef)> = params
            .raw_deps()
            .iter()
            .map(|(k, &t)| (k.clone(), t))
            .collect();
        self.seeds.push(Seed::new(params));

        for (key, target) in raw {
            self.wire(r, key, target)?;
        }

        #[cfg(debug_assertions)]
        self.assert_edges_consistent(r);

        Ok(r)
    }

    /// Adds a dependency edge from `from` to `to` under `key`, recording
    /// `from` in `to`'s referents in the same step.
    pub fn add_dependency(
        &mut self,
        from: SeedRef,
        key: DepKey,
        to: SeedRef,
    ) -> Result<(), CoreError> {
        if self.finalized {
            return Err(CoreError::GraphFrozen {
                operation: "add_dependency",
            });
        }
        self.seed(from)?;
        self.seed(to)?;
        self.wire(from, key, to)?;

        #[cfg(debug_assertions)]
        self.assert_edges_consistent(from);

        Ok(())
    }

    /// Both halves of one edge. Callers have validated `from` and `to`.
    fn wire(&mut self, from: SeedRef, key: DepKey, to: SeedRef) -> Result<(), CoreError> {
        if let Err(key) = self.seed_mut(from)?.deps_mut().insert(key, to) {
            return Err(CoreError::DuplicateDependencyKey {
                description: self.seed(from)?.description().to_string(),
                key,
            });
        }
        self.seed_mut(to)?.refs_mut().insert(from);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn seed(&self, r: SeedRef) -> Result<&Seed, CoreError> {
        self.seeds
            .get(r.0 as usize)
            .ok_or(CoreError::SeedNotFound { r })
    }

    pub fn seed_mut(&mut self, r: SeedRef) -> Result<&mut Seed, CoreError> {
        self.seeds
            .get_mut(r.0 as usize)
            .ok_or(CoreError::SeedNotFound { r })
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    /// Arena handles in declaration order.
    pub fn seed_refs(&self) -> impl Iterator<Item = SeedRef> {
        (0..self.seeds.len() as u32).map(SeedRef)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The compile order assigned by `finalize`; empty before it.
    pub fn compile_order(&self) -> &[SeedRef] {
        &self.order
    }

    // -----------------------------------------------------------------------
    // Finalize pass
    // -----------------------------------------------------------------------

    /// Assigns ids in topological order (dependencies first, ties broken by
    /// declaration order) and freezes the structure.
    ///
    /// A dependency cycle aborts the pass with the descriptions of the
    /// seeds still on it, before any compilation begins.
    pub fn finalize(&mut self) -> Result<(), CoreError> {
        if self.finalized {
            return Err(CoreError::AlreadyFinalized);
        }

        let n = self.seeds.len();

        // Adjacency for scheduling: one edge per dependency, pointing
        // dep -> dependent, so in-degree zero means "all inputs ready".
        let mut adj: DiGraph<SeedRef, (), u32> = DiGraph::with_capacity(n, n);
        for r in self.seed_refs() {
            adj.add_node(r);
        }
        for (i, seed) in self.seeds.iter().enumerate() {
            for target in seed.deps().targets() {
                adj.add_edge(target.into(), NodeIndex::new(i), ());
            }
        }

        let mut indegree: Vec<usize> = adj
            .node_indices()
            .map(|ix| adj.edges_directed(ix, Direction::Incoming).count())
            .collect();

        // Min-heap on the arena index: among ready seeds, the earliest
        // declared compiles first.
        let mut ready: BinaryHeap<Reverse<u32>> = indegree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i as u32))
            .collect();

        let mut order: Vec<SeedRef> = Vec::with_capacity(n);
        while let Some(Reverse(i)) = ready.pop() {
            order.push(SeedRef(i));
            for succ in adj.neighbors_directed(NodeIndex::new(i as usize), Direction::Outgoing) {
                indegree[succ.index()] -= 1;
                if indegree[succ.index()] == 0 {
                    ready.push(Reverse(succ.index() as u32));
                }
            }
        }

        if order.len() < n {
            let mut scheduled = vec![false; n];
            for &r in &order {
                scheduled[r.0 as usize] = true;
            }
            let involved: Vec<String> = self
                .seeds
                .iter()
                .enumerate()
                .filter(|&(i, _)| !scheduled[i])
                .map(|(_, s)| s.description().to_string())
                .collect();
            return Err(CoreError::DependencyCycle { involved });
        }

        for (pos, &r) in order.iter().enumerate() {
            self.seed_mut(r)?.assign_id(SeedId(pos as u32))?;
        }
        self.order = order;
        self.finalized = true;

        debug!(seeds = n, "graph finalized");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Compilation walk
    // -----------------------------------------------------------------------

    /// Compiles every seed in id order through the continuation protocol.
    ///
    /// Each seed's compiler runs exactly once; seeds already holding a
    /// memoized result (for instance from nested compilation) are skipped.
    /// The walk is a flat loop over the compile order, so its stack depth
    /// does not grow with the graph. A compiler that returns without
    /// resuming its continuation aborts the walk on the spot.
    pub fn compile(&mut self, ctx: &mut CompileContext) -> Result<(), CompileError> {
        if !self.finalized {
            return Err(CoreError::NotFinalized.into());
        }

        for pos in 0..self.order.len() {
            let seed = self.order[pos];
            if self.seed(seed)?.has_compilation_result() {
                trace!(seed = %seed, "memoized, skipping");
                continue;
            }
            self.dispatch(ctx, seed, Continuation { seed })?;
            self.ensure_resumed(seed)?;
        }
        Ok(())
    }

    /// Compiles one seed out of line, from inside another seed's compiler.
    ///
    /// The memo makes this a no-op for seeds already compiled, and makes
    /// the driving walk skip seeds compiled here. Nesting depth is bounded
    /// by how deeply compilers chain into each other, not by graph size.
    pub fn compile_seed(
        &mut self,
        ctx: &mut CompileContext,
        seed: SeedRef,
    ) -> Result<(), CompileError> {
        if !self.finalized {
            return Err(CoreError::NotFinalized.into());
        }
        if self.seed(seed)?.has_compilation_result() {
            trace!(seed = %seed, "memoized, nested compile skipped");
            return Ok(());
        }
        self.dispatch(ctx, seed, Continuation { seed })?;
        self.ensure_resumed(seed)
    }

    /// A compiler returning `Ok` must have resumed its continuation.
    fn ensure_resumed(&self, seed: SeedRef) -> Result<(), CompileError> {
        let s = self.seed(seed)?;
        if s.has_compilation_result() {
            Ok(())
        } else {
            Err(CompileError::ContinuationNotInvoked {
                id: s.id(),
                description: s.description().to_string(),
            })
        }
    }

    fn dispatch(
        &mut self,
        ctx: &mut CompileContext,
        seed: SeedRef,
        k: Continuation,
    ) -> Result<(), CompileError> {
        let s = self.seed(seed)?;
        debug!(seed = %seed, id = %s.id(), description = s.description(), "compiling seed");
        let compiler = s.params().compiler.clone();
        compiler(self, ctx, seed, k)
    }

    // -----------------------------------------------------------------------
    // Debug consistency assertion
    // -----------------------------------------------------------------------

    /// Verifies the bidirectional edge invariant around one seed:
    /// B is in A's dependency targets iff A is in B's referents.
    ///
    /// Only called in debug builds (via `cfg(debug_assertions)`), once per
    /// mutation and scoped to the touched seed so construction stays
    /// linear in the number of edges.
    #[cfg(debug_assertions)]
    fn assert_edges_consistent(&self, me: SeedRef) {
        let seed = &self.seeds[me.0 as usize];
        for target in seed.deps().targets() {
            assert!(
                self.seeds[target.0 as usize].refs().contains(me),
                "seed {} depends on {} but is missing from its referents",
                me,
                target
            );
        }
        for referent in seed.refs().iter() {
            assert!(
                self.seeds[referent.0 as usize]
                    .deps()
                    .targets()
                    .contains(&me),
                "seed {} is a referent of {} without a matching dependency",
                referent,
                me
            );
        }
    }
}
