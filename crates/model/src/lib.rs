//! vellum-model: the Vellum type model.
//!
//! Provides the schema side of the system: type declarations with ordered
//! property lists, the registry that resolves fully-qualified type names,
//! typed runtime instances, and the factory that allocates them.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`TypeRegistry`] -- fully-qualified name to declaration lookup
//! - [`TypeDeclaration`], [`Property`], [`FieldType`], [`FieldConstraint`]
//! - [`Instance`], [`PropertyValue`], [`RelationshipRef`]
//! - [`Factory`] -- category-checked instance allocation
//! - [`ModelError`] -- model-side error type

pub mod declaration;
pub mod error;
pub mod factory;
pub mod instance;
pub mod registry;

pub use declaration::{
    Category, EnumValueDeclaration, FieldConstraint, FieldDeclaration, FieldType, Property,
    RelationshipDeclaration, TypeDeclaration,
};
pub use error::ModelError;
pub use factory::Factory;
pub use instance::{Instance, PropertyValue, RelationshipRef};
pub use registry::TypeRegistry;
