//! Type tags and the type-validation contract.
//!
//! The graph does not define a type system. A seed carries an opaque
//! [`TypeTag`] which is validated once, at parameter construction, against
//! the [`TypeCheck`] contract. [`TypeRegistry`] is the crate-provided
//! implementation: a set of known tag names with nominal identity. Front
//! ends with their own type machinery can substitute any `TypeCheck` impl.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque nominal type tag attached to a seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag(pub String);

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        TypeTag(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The shared type-validation contract.
///
/// Consumed exactly once per seed, at [`SeedParameters`] construction, so
/// that a seed with an invalid type can never enter a graph.
///
/// [`SeedParameters`]: crate::params::SeedParameters
pub trait TypeCheck {
    fn check_type(&self, tag: &TypeTag) -> Result<(), CoreError>;
}

/// A registry of known type tags with nominal identity.
///
/// Pre-registers nothing: the front end owns the type vocabulary and
/// registers each tag before building seeds with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    names: HashSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// Registers a tag name. Registration is idempotent.
    pub fn register(&mut self, name: impl Into<String>) -> TypeTag {
        let name = name.into();
        self.names.insert(name.clone());
        TypeTag(name)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.names.contains(tag.name())
    }
}

impl TypeCheck for TypeRegistry {
    fn check_type(&self, tag: &TypeTag) -> Result<(), CoreError> {
        if tag.name().is_empty() {
            return Err(CoreError::InvalidType {
                description: String::new(),
                tag: tag.name().to_string(),
                reason: "empty type tag".to_string(),
            });
        }
        if !self.contains(tag) {
            return Err(CoreError::InvalidType {
                description: String::new(),
                tag: tag.name().to_string(),
                reason: "unknown type tag".to_string(),
            });
        }
        Ok(())
    }
}

/// A `TypeCheck` that accepts every non-empty tag.
///
/// Useful for front ends that defer type validation entirely, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

impl TypeCheck for AnyType {
    fn check_type(&self, tag: &TypeTag) -> Result<(), CoreError> {
        if tag.name().is_empty() {
            return Err(CoreError::InvalidType {
                description: String::new(),
                tag: String::new(),
                reason: "empty type tag".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_tag_passes() {
        let mut reg = TypeRegistry::new();
        let tag = reg.register("i64");
        assert!(reg.check_type(&tag).is_ok());
        assert!(reg.contains(&tag));
    }

    #[test]
    fn unknown_tag_fails() {
        let reg = TypeRegistry::new();
        let result = reg.check_type(&TypeTag::new("f32"));
        assert!(matches!(result, Err(CoreError::InvalidType { .. })));
    }

    #[test]
    fn empty_tag_fails_even_for_any_type() {
        assert!(AnyType.check_type(&TypeTag::new("")).is_err());
        assert!(AnyType.check_type(&TypeTag::new("anything")).is_ok());
    }

    #[test]
    fn register_is_idempotent() {
        let mut reg = TypeRegistry::new();
        let a = reg.register("bool");
        let b = reg.register("bool");
        assert_eq!(a, b);
    }

    #[test]
    fn serde_roundtrip() {
        let mut reg = TypeRegistry::new();
        reg.register("unit");
        let json = serde_json::to_string(&reg).unwrap();
        let back: TypeRegistry = serde_json::from_str(&json).unwrap();
        assert!(back.contains(&TypeTag::new("unit")));
    }
}
