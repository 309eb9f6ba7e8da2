//! Seed configuration: the validated parameter bundle.
//!
//! [`SeedParameters`] describes one seed before it is wired into a graph.
//! All required-field and type checks happen in
//! [`SeedParametersBuilder::build`], so a malformed seed can never enter a
//! graph. After construction only two fields remain mutable, `bind` and
//! `data`; everything else is frozen.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::compile::{CompilerFn, ForwardFn};
use crate::deps::DepKey;
use crate::error::CoreError;
use crate::id::SeedRef;
use crate::mode::Mode;
use crate::type_tag::{TypeCheck, TypeTag};

/// Immutable configuration bundle for one seed.
pub struct SeedParameters {
    description: String,
    type_tag: TypeTag,
    mode: Mode,
    pub(crate) compiler: CompilerFn,
    raw_deps: IndexMap<DepKey, SeedRef>,
    pub(crate) callable: Option<ForwardFn>,
    seed_function: Option<String>,
    // The two post-construction mutable fields.
    pub(crate) bind: Option<bool>,
    pub(crate) data: Value,
}

impl SeedParameters {
    pub fn builder() -> SeedParametersBuilder {
        SeedParametersBuilder::default()
    }

    /// Diagnostic label, always non-empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The declared dependency edges, consumed by the graph when the seed
    /// is inserted.
    pub fn raw_deps(&self) -> &IndexMap<DepKey, SeedRef> {
        &self.raw_deps
    }

    /// Tag identifying which higher-level operation produced this seed.
    pub fn seed_function(&self) -> Option<&str> {
        self.seed_function.as_deref()
    }

    pub fn is_callable(&self) -> bool {
        self.callable.is_some()
    }
}

impl fmt::Debug for SeedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedParameters")
            .field("description", &self.description)
            .field("type_tag", &self.type_tag)
            .field("mode", &self.mode)
            .field("raw_deps", &self.raw_deps)
            .field("callable", &self.callable.is_some())
            .field("seed_function", &self.seed_function)
            .field("bind", &self.bind)
            .field("data", &self.data)
            .finish()
    }
}

/// Builder for [`SeedParameters`]. Required fields are checked in
/// [`build`](Self::build), not at first use.
#[derive(Default)]
pub struct SeedParametersBuilder {
    description: Option<String>,
    type_tag: Option<TypeTag>,
    mode: Option<Mode>,
    compiler: Option<CompilerFn>,
    raw_deps: Vec<(DepKey, SeedRef)>,
    callable: Option<ForwardFn>,
    seed_function: Option<String>,
    bind: Option<bool>,
    data: Option<Value>,
}

impl SeedParametersBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn type_tag(mut self, tag: TypeTag) -> Self {
        self.type_tag = Some(tag);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn compiler(mut self, compiler: CompilerFn) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Declares a dependency edge to be wired when the seed is inserted.
    /// Declaration order is preserved.
    pub fn raw_dep(mut self, key: DepKey, target: SeedRef) -> Self {
        self.raw_deps.push((key, target));
        self
    }

    pub fn callable(mut self, f: ForwardFn) -> Self {
        self.callable = Some(f);
        self
    }

    pub fn seed_function(mut self, tag: impl Into<String>) -> Self {
        self.seed_function = Some(tag.into());
        self
    }

    pub fn bind(mut self, bind: bool) -> Self {
        self.bind = Some(bind);
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Validates and constructs the parameter bundle.
    ///
    /// Fails if `description` is missing or empty, if `compiler`, `mode`,
    /// or `type_tag` is absent, if the type tag fails `types`, or if a
    /// dependency key was declared twice.
    pub fn build(self, types: &impl TypeCheck) -> Result<SeedParameters, CoreError> {
        let description = match self.description {
            Some(d) if !d.is_empty() => d,
            _ => return Err(CoreError::MissingDescription),
        };
        let compiler = self.compiler.ok_or_else(|| CoreError::MissingCompiler {
            description: description.clone(),
        })?;
        let mode = self.mode.ok_or_else(|| CoreError::MissingMode {
            description: description.clone(),
        })?;
        let type_tag = self.type_tag.ok_or_else(|| CoreError::MissingType {
            description: description.clone(),
        })?;

        types.check_type(&type_tag).map_err(|err| match err {
            // Fill in the seed context the checker does not have.
            CoreError::InvalidType { tag, reason, .. } => CoreError::InvalidType {
                description: description.clone(),
                tag,
                reason,
            },
            other => other,
        })?;

        let mut raw_deps = IndexMap::with_capacity(self.raw_deps.len());
        for (key, target) in self.raw_deps {
            if raw_deps.contains_key(&key) {
                return Err(CoreError::DuplicateDependencyKey { description, key });
            }
            raw_deps.insert(key, target);
        }

        Ok(SeedParameters {
            description,
            type_tag,
            mode,
            compiler,
            raw_deps,
            callable: self.callable,
            seed_function: self.seed_function,
            bind: self.bind,
            data: self.data.unwrap_or(Value::Null),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_tag::AnyType;
    use std::rc::Rc;

    fn noop_compiler() -> CompilerFn {
        Rc::new(|graph, _ctx, _seed, k| k.resume(graph, Value::Null))
    }

    fn tag() -> TypeTag {
        TypeTag::new("i64")
    }

    #[test]
    fn full_build_succeeds() {
        let params = SeedParameters::builder()
            .description("constant 42")
            .type_tag(tag())
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .seed_function("constant")
            .bind(false)
            .build(&AnyType)
            .unwrap();

        assert_eq!(params.description(), "constant 42");
        assert_eq!(params.mode(), Mode::Pure);
        assert_eq!(params.type_tag().name(), "i64");
        assert_eq!(params.seed_function(), Some("constant"));
        assert_eq!(params.bind, Some(false));
        assert_eq!(params.data, Value::Null);
        assert!(!params.is_callable());
    }

    #[test]
    fn missing_description_rejected() {
        let result = SeedParameters::builder()
            .type_tag(tag())
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .build(&AnyType);
        assert!(matches!(result, Err(CoreError::MissingDescription)));
    }

    #[test]
    fn empty_description_rejected() {
        let result = SeedParameters::builder()
            .description("")
            .type_tag(tag())
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .build(&AnyType);
        assert!(matches!(result, Err(CoreError::MissingDescription)));
    }

    #[test]
    fn missing_compiler_rejected() {
        let result = SeedParameters::builder()
            .description("no compiler")
            .type_tag(tag())
            .mode(Mode::Pure)
            .build(&AnyType);
        match result {
            Err(CoreError::MissingCompiler { description }) => {
                assert_eq!(description, "no compiler");
            }
            other => panic!("expected MissingCompiler, got {:?}", other.err()),
        }
    }

    #[test]
    fn missing_mode_rejected() {
        let result = SeedParameters::builder()
            .description("no mode")
            .type_tag(tag())
            .compiler(noop_compiler())
            .build(&AnyType);
        assert!(matches!(result, Err(CoreError::MissingMode { .. })));
    }

    #[test]
    fn missing_type_rejected() {
        let result = SeedParameters::builder()
            .description("no type")
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .build(&AnyType);
        assert!(matches!(result, Err(CoreError::MissingType { .. })));
    }

    #[test]
    fn invalid_type_rejected_with_seed_context() {
        use crate::type_tag::TypeRegistry;

        let reg = TypeRegistry::new(); // empty: every tag is unknown
        let result = SeedParameters::builder()
            .description("bad type")
            .type_tag(TypeTag::new("ghost"))
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .build(&reg);
        match result {
            Err(CoreError::InvalidType {
                description, tag, ..
            }) => {
                assert_eq!(description, "bad type");
                assert_eq!(tag, "ghost");
            }
            other => panic!("expected InvalidType, got {:?}", other.err()),
        }
    }

    #[test]
    fn duplicate_raw_dep_key_rejected() {
        let result = SeedParameters::builder()
            .description("dup deps")
            .type_tag(tag())
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .raw_dep(DepKey::name("x"), SeedRef(0))
            .raw_dep(DepKey::name("x"), SeedRef(1))
            .build(&AnyType);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateDependencyKey { .. })
        ));
    }

    #[test]
    fn raw_deps_preserve_declaration_order() {
        let params = SeedParameters::builder()
            .description("ordered deps")
            .type_tag(tag())
            .mode(Mode::Pure)
            .compiler(noop_compiler())
            .raw_dep(DepKey::name("b"), SeedRef(1))
            .raw_dep(DepKey::name("a"), SeedRef(0))
            .build(&AnyType)
            .unwrap();

        let keys: Vec<String> = params.raw_deps().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec![":b", ":a"]);
    }
}
