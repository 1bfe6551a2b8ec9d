//! Codec error taxonomy and validation violation descriptors.

use serde::Serialize;
use std::fmt;
use vellum_model::ModelError;

/// One structural or constraint violation found by the validator.
///
/// `path` is the property path from the root (`$` for the root itself),
/// `rule` names the broken rule, and `actual` summarizes the offending
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub rule: String,
    pub actual: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, rule: impl Into<String>, actual: impl Into<String>) -> Self {
        Violation {
            path: path.into(),
            rule: rule.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.rule, self.actual)
    }
}

/// All errors that can be returned by `to_json` / `from_json`.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input to `to_json` carries no usable `$class` tag.
    #[error("input is not a typed instance: empty $class tag")]
    NotTyped,

    /// The fully-qualified type name is absent from the registry.
    #[error("type not found in registry: {name}")]
    UnknownType { name: String },

    /// Malformed wire input: missing `$class`, malformed relationship
    /// string, unqualified date/time under strict mode, dangling or
    /// forward `$id` reference, malformed ergo envelope.
    #[error("invalid wire data: {0}")]
    Format(String),

    /// Operation not supported by the model, e.g. instantiating an enum
    /// declaration as a top-level resource.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// One or more validation violations, in declaration order.
    #[error("validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),
}

impl From<ModelError> for CodecError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownType { name } => CodecError::UnknownType { name },
            ModelError::EnumNotInstantiable { name } => CodecError::Unsupported(format!(
                "cannot instantiate enum type {} as a resource",
                name
            )),
            ModelError::MalformedReference { text } => {
                CodecError::Format(format!("malformed relationship reference: '{}'", text))
            }
            other => CodecError::Format(other.to_string()),
        }
    }
}
