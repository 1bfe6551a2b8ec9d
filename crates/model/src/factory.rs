//! The instance factory: category-checked allocation of typed instances.

use crate::declaration::{Category, TypeDeclaration};
use crate::error::ModelError;
use crate::instance::{Instance, PropertyValue};
use crate::registry::TypeRegistry;
use std::sync::Arc;

/// Allocates new typed instances against the registry. One entry point per
/// category, each verifying that the resolved declaration matches.
#[derive(Debug, Clone)]
pub struct Factory {
    registry: Arc<TypeRegistry>,
}

impl Factory {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Factory { registry }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn new_transaction(
        &self,
        namespace: &str,
        name: &str,
        identifier: Option<&str>,
    ) -> Result<Instance, ModelError> {
        self.allocate(namespace, name, identifier, Some(Category::Transaction))
    }

    pub fn new_event(
        &self,
        namespace: &str,
        name: &str,
        identifier: Option<&str>,
    ) -> Result<Instance, ModelError> {
        self.allocate(namespace, name, identifier, Some(Category::Event))
    }

    pub fn new_concept(
        &self,
        namespace: &str,
        name: &str,
        identifier: Option<&str>,
    ) -> Result<Instance, ModelError> {
        self.allocate(namespace, name, identifier, Some(Category::Concept))
    }

    /// Allocate an asset or participant (any identified, non-enum category).
    pub fn new_resource(
        &self,
        namespace: &str,
        name: &str,
        identifier: Option<&str>,
    ) -> Result<Instance, ModelError> {
        self.allocate(namespace, name, identifier, None)
    }

    fn allocate(
        &self,
        namespace: &str,
        name: &str,
        identifier: Option<&str>,
        expected: Option<Category>,
    ) -> Result<Instance, ModelError> {
        let fqn = format!("{}.{}", namespace, name);
        let declaration = self.registry.require(&fqn)?;
        if declaration.is_enum() {
            return Err(ModelError::EnumNotInstantiable { name: fqn });
        }
        if let Some(expected) = expected {
            if declaration.category() != expected {
                return Err(ModelError::CategoryMismatch {
                    name: fqn,
                    expected: expected.as_str().to_owned(),
                    actual: declaration.category().as_str().to_owned(),
                });
            }
        }
        Ok(Self::blank(declaration, identifier))
    }

    fn blank(declaration: &TypeDeclaration, identifier: Option<&str>) -> Instance {
        let mut instance = Instance::new(declaration.fully_qualified_name());
        if let (Some(field), Some(id)) = (declaration.identifier_field(), identifier) {
            instance.set(field, PropertyValue::Text(id.to_owned()));
        }
        instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{FieldDeclaration, FieldType, Property};

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDeclaration::new(Category::Transaction, "org.acme", "PlaceOrder")
                    .with_identifier_field("transactionId")
                    .with_property(Property::Field(FieldDeclaration::new(
                        "transactionId",
                        FieldType::Text,
                    ))),
            )
            .unwrap();
        registry
            .register(TypeDeclaration::new(Category::Enum, "org.acme", "Country"))
            .unwrap();
        Arc::new(registry)
    }

    #[test]
    fn transaction_allocation_sets_identifier_field() {
        let factory = Factory::new(registry());
        let txn = factory
            .new_transaction("org.acme", "PlaceOrder", Some("txn-1"))
            .unwrap();
        assert_eq!(txn.class(), "org.acme.PlaceOrder");
        assert_eq!(
            txn.get("transactionId"),
            Some(&PropertyValue::Text("txn-1".to_owned()))
        );
    }

    #[test]
    fn category_mismatch_is_rejected() {
        let factory = Factory::new(registry());
        let err = factory
            .new_event("org.acme", "PlaceOrder", None)
            .unwrap_err();
        assert!(matches!(err, ModelError::CategoryMismatch { .. }));
    }

    #[test]
    fn enums_are_not_instantiable() {
        let factory = Factory::new(registry());
        let err = factory.new_resource("org.acme", "Country", None).unwrap_err();
        assert!(matches!(err, ModelError::EnumNotInstantiable { .. }));
    }
}
