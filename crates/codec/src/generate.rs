//! Generation pass: typed instance graph to plain JSON.
//!
//! Depth-first traversal in declared property order. The output object
//! carries `$class` first, then `$id` when deduplicating, then the
//! identifier field, then the remaining properties in declaration order;
//! that key order is an observable contract.

use crate::error::{CodecError, Violation};
use crate::options::{EmbeddedResourcePolicy, SerializerOptions};
use crate::{datetime, CLASS_KEY, ID_KEY};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use vellum_model::{
    FieldDeclaration, Instance, Property, PropertyValue, RelationshipDeclaration, RelationshipRef,
    TypeDeclaration, TypeRegistry,
};

/// Convert one instance graph to a JSON value tree.
pub fn generate(
    registry: &TypeRegistry,
    options: &SerializerOptions,
    root: &Arc<Instance>,
) -> Result<Value, CodecError> {
    let mut generator = JsonGenerator {
        registry,
        options,
        identities: HashMap::new(),
        next_id: 1,
    };
    generator.visit_resource(root)
}

struct JsonGenerator<'a> {
    registry: &'a TypeRegistry,
    options: &'a SerializerOptions,
    /// Call-scoped identity table: `Arc` pointer -> synthetic `$id`.
    /// Keyed on runtime identity, never on value equality.
    identities: HashMap<usize, String>,
    next_id: u64,
}

impl JsonGenerator<'_> {
    fn visit_resource(&mut self, instance: &Arc<Instance>) -> Result<Value, CodecError> {
        let declaration = self.registry.require(instance.class())?;
        if declaration.is_enum() {
            return Err(CodecError::Unsupported(format!(
                "enum type {} cannot back a resource",
                instance.class()
            )));
        }

        let mut object = Map::new();
        object.insert(
            CLASS_KEY.to_owned(),
            Value::String(instance.class().to_owned()),
        );

        if self.options.deduplicate_resources {
            let identity = Arc::as_ptr(instance) as usize;
            if let Some(id) = self.identities.get(&identity) {
                let mut reference = Map::new();
                reference.insert(ID_KEY.to_owned(), Value::String(id.clone()));
                return Ok(Value::Object(reference));
            }
            let id = format!("resource{}", self.next_id);
            self.next_id += 1;
            self.identities.insert(identity, id.clone());
            object.insert(ID_KEY.to_owned(), Value::String(id));
        }

        for property in ordered_properties(declaration) {
            let Some(value) = instance.get(property.name()) else {
                continue; // absent fields are omitted, not nulled
            };
            let generated = match property {
                Property::Field(field) => self.visit_field(field, value)?,
                Property::Relationship(relationship) => {
                    self.visit_relationship(relationship, value)?
                }
                Property::EnumValue(_) => continue,
            };
            object.insert(property.name().to_owned(), generated);
        }

        Ok(Value::Object(object))
    }

    fn visit_field(
        &mut self,
        field: &FieldDeclaration,
        value: &PropertyValue,
    ) -> Result<Value, CodecError> {
        if field.is_array() {
            if let PropertyValue::Array(items) = value {
                let generated: Result<Vec<Value>, CodecError> =
                    items.iter().map(|item| self.scalar(item)).collect();
                return Ok(Value::Array(generated?));
            }
        }
        self.scalar(value)
    }

    fn scalar(&mut self, value: &PropertyValue) -> Result<Value, CodecError> {
        match value {
            PropertyValue::Boolean(b) => Ok(Value::Bool(*b)),
            PropertyValue::Integer(n) => Ok(Value::from(*n)),
            PropertyValue::Double(d) => Ok(Value::from(*d)),
            PropertyValue::Text(s) => Ok(Value::String(s.clone())),
            PropertyValue::DateTime(dt) => Ok(Value::String(datetime::format(
                dt,
                self.options.utc_offset_minutes,
            )?)),
            PropertyValue::Resource(nested) => self.visit_resource(nested),
            PropertyValue::Relationship(reference) => Ok(Value::String(reference.to_string())),
            PropertyValue::Array(items) => {
                let generated: Result<Vec<Value>, CodecError> =
                    items.iter().map(|item| self.scalar(item)).collect();
                Ok(Value::Array(generated?))
            }
        }
    }

    fn visit_relationship(
        &mut self,
        relationship: &RelationshipDeclaration,
        value: &PropertyValue,
    ) -> Result<Value, CodecError> {
        if relationship.is_array() {
            if let PropertyValue::Array(items) = value {
                let generated: Result<Vec<Value>, CodecError> = items
                    .iter()
                    .map(|item| self.relationship_slot(relationship, item))
                    .collect();
                return Ok(Value::Array(generated?));
            }
        }
        self.relationship_slot(relationship, value)
    }

    fn relationship_slot(
        &mut self,
        relationship: &RelationshipDeclaration,
        value: &PropertyValue,
    ) -> Result<Value, CodecError> {
        match value {
            PropertyValue::Relationship(reference) => Ok(Value::String(reference.to_string())),
            PropertyValue::Resource(nested) => match self.options.embedded_resources {
                EmbeddedResourcePolicy::Reject => Err(CodecError::Validation(vec![Violation::new(
                    relationship.name(),
                    "relationship",
                    "embedded resource in relationship slot",
                )])),
                EmbeddedResourcePolicy::ConvertToReference => {
                    let reference = self.reference_for(relationship, nested)?;
                    Ok(Value::String(reference.to_string()))
                }
                EmbeddedResourcePolicy::Embed => self.visit_resource(nested),
                EmbeddedResourcePolicy::BareId => {
                    let reference = self.reference_for(relationship, nested)?;
                    Ok(Value::String(reference.identifier))
                }
            },
            other => Err(CodecError::Validation(vec![Violation::new(
                relationship.name(),
                "relationship",
                other.kind(),
            )])),
        }
    }

    /// Build a reference to an embedded resource from its own identifier.
    fn reference_for(
        &self,
        relationship: &RelationshipDeclaration,
        nested: &Arc<Instance>,
    ) -> Result<RelationshipRef, CodecError> {
        let declaration = self.registry.require(nested.class())?;
        let identifier = nested.identifier(declaration).ok_or_else(|| {
            CodecError::Validation(vec![Violation::new(
                relationship.name(),
                "relationship",
                format!("embedded {} has no identifier", nested.class()),
            )])
        })?;
        Ok(RelationshipRef::new(
            declaration.namespace(),
            declaration.name(),
            identifier,
        ))
    }
}

/// Declared properties with the identifier field moved to the front.
fn ordered_properties(declaration: &TypeDeclaration) -> impl Iterator<Item = &Property> {
    let identifier = declaration.identifier_field();
    let first = declaration
        .properties()
        .iter()
        .filter(move |p| Some(p.name()) == identifier);
    let rest = declaration
        .properties()
        .iter()
        .filter(move |p| Some(p.name()) != identifier);
    first.chain(rest)
}
