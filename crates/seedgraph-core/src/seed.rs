//! The graph node: one deferred computation.
//!
//! A [`Seed`] wraps its [`SeedParameters`] with graph-assigned state: the
//! compile-order id, the forward and reverse edge sets, the write-once
//! compilation memo, and the variable-name counter. Seeds live in a
//! graph-owned arena and are handled by [`SeedRef`] everywhere else; the
//! structural mutators are crate-private so that edges and ids only change
//! through the graph authority.
//!
//! [`SeedRef`]: crate::id::SeedRef

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::compile::Artifact;
use crate::deps::Dependencies;
use crate::error::CoreError;
use crate::id::SeedId;
use crate::mode::Mode;
use crate::params::SeedParameters;
use crate::refs::Referents;
use crate::type_tag::TypeTag;

/// A node in the expression dependency graph.
#[derive(Debug)]
pub struct Seed {
    params: SeedParameters,
    id: SeedId,
    deps: Dependencies,
    refs: Referents,
    compilation_result: Option<Artifact>,
    var_counter: u32,
}

impl Seed {
    pub(crate) fn new(params: SeedParameters) -> Self {
        Seed {
            params,
            id: SeedId::UNDEFINED,
            deps: Dependencies::new(),
            refs: Referents::new(),
            compilation_result: None,
            var_counter: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Parameter accessors
    // -----------------------------------------------------------------------

    pub fn description(&self) -> &str {
        self.params.description()
    }

    pub fn type_tag(&self) -> &TypeTag {
        self.params.type_tag()
    }

    pub fn mode(&self) -> Mode {
        self.params.mode()
    }

    pub fn seed_function(&self) -> Option<&str> {
        self.params.seed_function()
    }

    pub fn params(&self) -> &SeedParameters {
        &self.params
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// The compile-order id; [`SeedId::UNDEFINED`] before finalize.
    pub fn id(&self) -> SeedId {
        self.id
    }

    /// Assigns the id. Called exactly once per seed, by the finalize pass.
    /// A second assignment is a graph-consistency defect.
    pub(crate) fn assign_id(&mut self, id: SeedId) -> Result<(), CoreError> {
        if self.id.is_defined() {
            return Err(CoreError::IdReassigned {
                id: self.id,
                description: self.description().to_string(),
            });
        }
        self.id = id;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    pub fn deps(&self) -> &Dependencies {
        &self.deps
    }

    pub fn refs(&self) -> &Referents {
        &self.refs
    }

    pub(crate) fn deps_mut(&mut self) -> &mut Dependencies {
        &mut self.deps
    }

    pub(crate) fn refs_mut(&mut self) -> &mut Referents {
        &mut self.refs
    }

    // -----------------------------------------------------------------------
    // Compilation memo
    // -----------------------------------------------------------------------

    pub fn has_compilation_result(&self) -> bool {
        self.compilation_result.is_some()
    }

    /// The memoized artifact. Reading before any result was set is a usage
    /// error.
    pub fn compilation_result(&self) -> Result<&Artifact, CoreError> {
        self.compilation_result
            .as_ref()
            .ok_or_else(|| CoreError::ResultMissing {
                id: self.id,
                description: self.description().to_string(),
            })
    }

    /// Stores the artifact. Write-once: a second call is a
    /// graph-consistency defect.
    pub fn set_compilation_result(&mut self, artifact: Artifact) -> Result<(), CoreError> {
        if self.compilation_result.is_some() {
            return Err(CoreError::ResultOverwrite {
                id: self.id,
                description: self.description().to_string(),
            });
        }
        self.compilation_result = Some(artifact);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Variable naming
    // -----------------------------------------------------------------------

    /// Mints a deterministic variable name from the seed's id and an
    /// internal counter: first call `s0042`, later calls `s0042_02`,
    /// `s0042_03`, ... Stable across runs for the same graph.
    pub fn generate_var_name(&mut self) -> String {
        self.var_counter += 1;
        if self.var_counter == 1 {
            format!("s{:04}", self.id.0)
        } else {
            format!("s{:04}_{:02}", self.id.0, self.var_counter)
        }
    }

    // -----------------------------------------------------------------------
    // The two mutable parameter fields
    // -----------------------------------------------------------------------

    /// Whether the result must be bound to a named variable rather than
    /// inlined. `None` means the emission backend decides.
    pub fn should_bind(&self) -> Option<bool> {
        self.params.bind
    }

    pub fn set_bind(&mut self, bind: bool) {
        self.params.bind = Some(bind);
    }

    /// Opaque front-end payload, not interpreted by the graph.
    pub fn data(&self) -> &Value {
        &self.params.data
    }

    pub fn set_data(&mut self, data: Value) {
        self.params.data = data;
    }

    // -----------------------------------------------------------------------
    // Forwarding capability
    // -----------------------------------------------------------------------

    /// Invokes the seed as a function, forwarding `args` to the configured
    /// callable. A seed built without one fails with a capability error
    /// naming its description.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, CoreError> {
        match &self.params.callable {
            Some(f) => Ok(f(args)),
            None => Err(CoreError::NotCallable {
                description: self.description().to_string(),
            }),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seed(id={}, description='{}', type={})",
            self.id,
            self.description(),
            self.type_tag()
        )
    }
}

// Identity is by id only: two seeds are the same entity iff they carry the
// same assigned id. Structural content does not participate.

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Seed {}

impl Hash for Seed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
