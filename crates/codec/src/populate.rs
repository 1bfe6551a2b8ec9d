//! Population pass: plain JSON to a typed instance graph.
//!
//! The inverse of generation: walks the same declaration-ordered property
//! list while pulling values out of the JSON tree. Wire keys with no
//! declared counterpart are dropped; enum symbol membership is left to the
//! validation pass.

use crate::error::CodecError;
use crate::options::SerializerOptions;
use crate::{datetime, CLASS_KEY, ID_KEY};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use vellum_model::{
    Category, Factory, FieldDeclaration, FieldType, Instance, Property, PropertyValue,
    RelationshipDeclaration, RelationshipRef, TypeRegistry,
};

/// Populate one instance graph from a JSON value tree.
pub fn populate(
    registry: &TypeRegistry,
    factory: &Factory,
    options: &SerializerOptions,
    json: &Value,
) -> Result<Arc<Instance>, CodecError> {
    let Value::Object(object) = json else {
        return Err(CodecError::Format(
            "expected a JSON object at the root".to_owned(),
        ));
    };
    let mut populator = JsonPopulator {
        registry,
        factory,
        options,
        identities: HashMap::new(),
    };
    populator.visit_resource(object, None)
}

struct JsonPopulator<'a> {
    registry: &'a TypeRegistry,
    factory: &'a Factory,
    options: &'a SerializerOptions,
    /// Call-scoped `$id` -> populated instance table, filled strictly in
    /// traversal order. References ahead of their definition fail.
    identities: HashMap<String, Arc<Instance>>,
}

impl JsonPopulator<'_> {
    fn visit_resource(
        &mut self,
        object: &Map<String, Value>,
        declared_type: Option<&str>,
    ) -> Result<Arc<Instance>, CodecError> {
        // A `{"$id": ...}`-only object is a reference to an earlier full
        // definition within this call.
        if object.len() == 1 {
            if let Some(id) = object.get(ID_KEY) {
                let id = id.as_str().ok_or_else(|| {
                    CodecError::Format("$id reference must be a string".to_owned())
                })?;
                return self.identities.get(id).cloned().ok_or_else(|| {
                    CodecError::Format(format!(
                        "$id reference '{}' appears before its definition",
                        id
                    ))
                });
            }
        }

        // The embedded $class overrides the declared type, so a slot can
        // carry any resolvable type.
        let class = match object.get(CLASS_KEY) {
            Some(Value::String(class)) => class.as_str(),
            Some(_) => {
                return Err(CodecError::Format(
                    "$class type identifier must be a string".to_owned(),
                ))
            }
            None => declared_type.ok_or_else(|| {
                CodecError::Format(
                    "invalid JSON data: does not contain a $class type identifier".to_owned(),
                )
            })?,
        };

        let declaration = self.registry.require(class)?;
        if declaration.is_enum() {
            return Err(CodecError::Unsupported(format!(
                "cannot instantiate enum type {} as a resource",
                class
            )));
        }

        let identifier = declaration
            .identifier_field()
            .and_then(|field| object.get(field))
            .and_then(Value::as_str);
        let mut instance = match declaration.category() {
            Category::Transaction => self.factory.new_transaction(
                declaration.namespace(),
                declaration.name(),
                identifier,
            )?,
            Category::Event => {
                self.factory
                    .new_event(declaration.namespace(), declaration.name(), identifier)?
            }
            Category::Concept => {
                self.factory
                    .new_concept(declaration.namespace(), declaration.name(), identifier)?
            }
            _ => self
                .factory
                .new_resource(declaration.namespace(), declaration.name(), identifier)?,
        };

        for property in declaration.properties() {
            let Some(value) = object.get(property.name()) else {
                continue;
            };
            // Explicit null means absent, matching the generator's
            // field-absence policy.
            if value.is_null() {
                continue;
            }
            let populated = match property {
                Property::Field(field) => self.visit_field(field, value)?,
                Property::Relationship(relationship) => {
                    self.visit_relationship(relationship, value)?
                }
                Property::EnumValue(_) => continue,
            };
            instance.set(property.name(), populated);
        }

        let instance = Arc::new(instance);
        if let Some(Value::String(id)) = object.get(ID_KEY) {
            self.identities.insert(id.clone(), instance.clone());
        }
        Ok(instance)
    }

    fn visit_field(
        &mut self,
        field: &FieldDeclaration,
        value: &Value,
    ) -> Result<PropertyValue, CodecError> {
        if field.is_array() {
            let items = value.as_array().ok_or_else(|| {
                CodecError::Format(format!("property '{}' expects an array", field.name()))
            })?;
            let populated: Result<Vec<PropertyValue>, CodecError> = items
                .iter()
                .map(|item| self.field_scalar(field, item))
                .collect();
            return Ok(PropertyValue::Array(populated?));
        }
        self.field_scalar(field, value)
    }

    fn field_scalar(
        &mut self,
        field: &FieldDeclaration,
        value: &Value,
    ) -> Result<PropertyValue, CodecError> {
        let mismatch = |expected: &str| {
            CodecError::Format(format!(
                "property '{}' expects {}, found {}",
                field.name(),
                expected,
                json_kind(value)
            ))
        };

        match field.field_type() {
            FieldType::Boolean => value
                .as_bool()
                .map(PropertyValue::Boolean)
                .ok_or_else(|| mismatch("a boolean")),
            FieldType::Integer => value
                .as_i64()
                .map(PropertyValue::Integer)
                .ok_or_else(|| mismatch("an integer")),
            FieldType::Double => value
                .as_f64()
                .map(PropertyValue::Double)
                .ok_or_else(|| mismatch("a number")),
            FieldType::Text => value
                .as_str()
                .map(|s| PropertyValue::Text(s.to_owned()))
                .ok_or_else(|| mismatch("a string")),
            FieldType::DateTime => {
                let text = value.as_str().ok_or_else(|| mismatch("a datetime string"))?;
                let parsed = datetime::parse(
                    text,
                    self.options.utc_offset_minutes,
                    self.options.strict_qualified_date_times,
                )?;
                Ok(PropertyValue::DateTime(parsed))
            }
            FieldType::Declared(target) => {
                let target_declaration = self.registry.require(target)?;
                if target_declaration.is_enum() {
                    // Symbol membership is checked by the validation pass.
                    value
                        .as_str()
                        .map(|s| PropertyValue::Text(s.to_owned()))
                        .ok_or_else(|| mismatch("an enum symbol string"))
                } else {
                    let object = value.as_object().ok_or_else(|| mismatch("an object"))?;
                    let nested = self.visit_resource(object, Some(target))?;
                    Ok(PropertyValue::Resource(nested))
                }
            }
        }
    }

    fn visit_relationship(
        &mut self,
        relationship: &RelationshipDeclaration,
        value: &Value,
    ) -> Result<PropertyValue, CodecError> {
        if relationship.is_array() {
            let items = value.as_array().ok_or_else(|| {
                CodecError::Format(format!(
                    "property '{}' expects an array",
                    relationship.name()
                ))
            })?;
            let populated: Result<Vec<PropertyValue>, CodecError> = items
                .iter()
                .map(|item| self.relationship_slot(relationship, item))
                .collect();
            return Ok(PropertyValue::Array(populated?));
        }
        self.relationship_slot(relationship, value)
    }

    fn relationship_slot(
        &mut self,
        relationship: &RelationshipDeclaration,
        value: &Value,
    ) -> Result<PropertyValue, CodecError> {
        match value {
            Value::String(text) => {
                let reference: RelationshipRef = text.parse()?;
                Ok(PropertyValue::Relationship(reference))
            }
            Value::Object(object) if self.options.accept_resources_for_relationships => {
                let nested = self.visit_resource(object, Some(relationship.target()))?;
                Ok(PropertyValue::Resource(nested))
            }
            _ => Err(CodecError::Format(format!(
                "relationship '{}' expects a reference string",
                relationship.name()
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
