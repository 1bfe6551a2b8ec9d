//! The type registry: fully-qualified name to declaration lookup.
//!
//! The registry is built once, then shared read-only (typically behind an
//! `Arc`) by every codec call. Nothing in the codec mutates it.

use crate::declaration::TypeDeclaration;
use crate::error::ModelError;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDeclaration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// Register a declaration under its fully-qualified name.
    pub fn register(&mut self, declaration: TypeDeclaration) -> Result<(), ModelError> {
        let name = declaration.fully_qualified_name();
        if self.types.contains_key(&name) {
            return Err(ModelError::DuplicateType { name });
        }
        self.types.insert(name, declaration);
        Ok(())
    }

    pub fn resolve(&self, fully_qualified_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(fully_qualified_name)
    }

    /// Like [`resolve`](TypeRegistry::resolve), but failing with
    /// [`ModelError::UnknownType`].
    pub fn require(&self, fully_qualified_name: &str) -> Result<&TypeDeclaration, ModelError> {
        self.resolve(fully_qualified_name)
            .ok_or_else(|| ModelError::UnknownType {
                name: fully_qualified_name.to_owned(),
            })
    }

    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Category;

    #[test]
    fn resolve_finds_registered_declarations() {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeDeclaration::new(Category::Concept, "org.acme", "Address"))
            .unwrap();

        assert!(registry.resolve("org.acme.Address").is_some());
        assert!(registry.resolve("org.acme.Missing").is_none());
        assert!(matches!(
            registry.require("org.acme.Missing"),
            Err(ModelError::UnknownType { .. })
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeDeclaration::new(Category::Concept, "org.acme", "Address"))
            .unwrap();
        let err = registry
            .register(TypeDeclaration::new(Category::Concept, "org.acme", "Address"))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateType { .. }));
    }
}
