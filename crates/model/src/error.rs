/// All errors that can be returned by the model layer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No declaration registered under the fully-qualified name.
    #[error("type not found in registry: {name}")]
    UnknownType { name: String },

    /// A declaration with this fully-qualified name is already registered.
    #[error("type already registered: {name}")]
    DuplicateType { name: String },

    /// Enum declarations describe symbol sets, not instantiable resources.
    #[error("enum type cannot be instantiated: {name}")]
    EnumNotInstantiable { name: String },

    /// A factory entry point was called for a declaration of another category.
    #[error("category mismatch for {name}: expected {expected}, declared as {actual}")]
    CategoryMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// A relationship string does not have the `namespace.Type#identifier` shape.
    #[error("malformed relationship reference: '{text}'")]
    MalformedReference { text: String },
}
