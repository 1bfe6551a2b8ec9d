//! vellum-codec: the Vellum persistence codec.
//!
//! Converts schema-validated in-memory instances to and from plain JSON
//! for long-term storage and interchange, gated behind validation against
//! the registered type model.
//!
//! # Public API
//!
//! - [`Serializer`] -- `to_json` / `from_json` orchestrator
//! - [`SerializerOptions`], [`EmbeddedResourcePolicy`] -- per-call policy
//! - [`validate_instance`] -- the standalone validation entry point
//! - [`CodecError`], [`Violation`] -- failure taxonomy
//!
//! Each call is a self-contained synchronous traversal: the dedup tables
//! are call-scoped, the registry is only read, and the input is never
//! mutated. Calls on independent instances may run concurrently.

pub mod datetime;
pub mod ergo;
pub mod error;
pub mod generate;
pub mod options;
pub mod populate;
pub mod validate;

pub use error::{CodecError, Violation};
pub use options::{EmbeddedResourcePolicy, SerializerOptions};
pub use validate::validate_instance;

use serde_json::Value;
use std::sync::Arc;
use vellum_model::{Factory, Instance, TypeRegistry};

/// The `$class` type-tag key of the normal wire format.
pub const CLASS_KEY: &str = "$class";
/// The synthetic reference key attached by deduplication.
pub const ID_KEY: &str = "$id";

/// Serialize instances to/from JSON for long-term storage.
///
/// Owns the default options; a call that passes `None` uses them, a call
/// that passes `Some` supplies a complete options value of its own.
#[derive(Debug)]
pub struct Serializer {
    factory: Factory,
    registry: Arc<TypeRegistry>,
    defaults: SerializerOptions,
}

impl Serializer {
    pub fn new(factory: Factory, registry: Arc<TypeRegistry>) -> Self {
        Serializer {
            factory,
            registry,
            defaults: SerializerOptions::default(),
        }
    }

    /// Replace the default options used when a call omits explicit ones.
    ///
    /// Not safe to race against in-flight conversions; do this at
    /// initialization.
    pub fn set_default_options(&mut self, options: SerializerOptions) {
        self.defaults = options;
    }

    pub fn default_options(&self) -> &SerializerOptions {
        &self.defaults
    }

    /// Convert an instance to a JSON value suitable for persistent storage.
    ///
    /// Fails with [`CodecError::NotTyped`] when the instance carries no
    /// `$class`, [`CodecError::UnknownType`] when the registry cannot
    /// resolve it, and [`CodecError::Validation`] when validation is
    /// enabled and fails. The instance is not mutated.
    pub fn to_json(
        &self,
        resource: &Arc<Instance>,
        options: Option<&SerializerOptions>,
    ) -> Result<Value, CodecError> {
        let options = options.unwrap_or(&self.defaults);

        if resource.class().trim().is_empty() {
            return Err(CodecError::NotTyped);
        }
        let declaration = self.registry.require(resource.class())?;
        if declaration.is_enum() {
            return Err(CodecError::Unsupported(format!(
                "enum type {} cannot back a top-level resource",
                resource.class()
            )));
        }

        if options.validate {
            let permit_embedded =
                options.embedded_resources != EmbeddedResourcePolicy::Reject;
            validate::validate_with(&self.registry, resource, permit_embedded)?;
        }

        let generated = generate::generate(&self.registry, options, resource)?;
        if options.ergo {
            ergo::wrap(generated)
        } else {
            Ok(generated)
        }
    }

    /// Create an instance from its JSON representation.
    ///
    /// Fails with [`CodecError::Format`] when `$class` is absent or the
    /// wire data is malformed, [`CodecError::UnknownType`] when the type
    /// is unresolvable, [`CodecError::Unsupported`] when it resolves to an
    /// enum, and [`CodecError::Validation`] when post-population
    /// validation is enabled and fails. No partial instance is returned on
    /// failure.
    pub fn from_json(
        &self,
        json: &Value,
        options: Option<&SerializerOptions>,
    ) -> Result<Arc<Instance>, CodecError> {
        let options = options.unwrap_or(&self.defaults);

        let unwrapped;
        let json = if options.ergo {
            unwrapped = ergo::unwrap(json)?;
            &unwrapped
        } else {
            json
        };

        let instance = populate::populate(&self.registry, &self.factory, options, json)?;

        if options.validate {
            validate::validate_with(
                &self.registry,
                &instance,
                options.accept_resources_for_relationships,
            )?;
        }

        Ok(instance)
    }
}
