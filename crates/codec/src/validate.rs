//! Validation pass: structural and constraint checks of an instance graph
//! against its declaration.
//!
//! The pass is read-only and aggregates every violation it finds, in
//! declared property order, depth-first. Unknown properties (closed-world
//! schema) are reported after the declared ones, in name order.

use crate::error::{CodecError, Violation};
use vellum_model::{
    FieldConstraint, FieldDeclaration, FieldType, Instance, Property, PropertyValue,
    RelationshipDeclaration, TypeRegistry,
};

/// Validate a populated instance against the registry, as a standalone
/// check. Embedded resources in relationship slots are not permitted.
pub fn validate_instance(registry: &TypeRegistry, instance: &Instance) -> Result<(), CodecError> {
    validate_with(registry, instance, false)
}

/// Validate with an explicit embedded-resource policy, as the serializer
/// does when the active options permit resources in relationship slots.
pub(crate) fn validate_with(
    registry: &TypeRegistry,
    instance: &Instance,
    permit_embedded: bool,
) -> Result<(), CodecError> {
    let mut validator = InstanceValidator {
        registry,
        permit_embedded,
        violations: Vec::new(),
    };
    validator.visit_resource(instance, "$");
    if validator.violations.is_empty() {
        Ok(())
    } else {
        Err(CodecError::Validation(validator.violations))
    }
}

struct InstanceValidator<'a> {
    registry: &'a TypeRegistry,
    permit_embedded: bool,
    violations: Vec<Violation>,
}

impl InstanceValidator<'_> {
    fn report(&mut self, path: &str, rule: &str, actual: impl Into<String>) {
        self.violations.push(Violation::new(path, rule, actual));
    }

    fn visit_resource(&mut self, instance: &Instance, path: &str) {
        let Some(declaration) = self.registry.resolve(instance.class()) else {
            self.report(path, "unknown-type", instance.class());
            return;
        };
        if declaration.is_enum() {
            self.report(path, "type", format!("enum {} as resource", instance.class()));
            return;
        }

        for property in declaration.properties() {
            let child = format!("{}.{}", path, property.name());
            match (property, instance.get(property.name())) {
                (Property::Field(field), Some(value)) => self.visit_field(field, value, &child),
                (Property::Field(field), None) => {
                    if !field.is_optional() && !field.is_array() {
                        self.report(&child, "missing-required", "absent");
                    }
                }
                (Property::Relationship(relationship), Some(value)) => {
                    self.visit_relationship(relationship, value, &child)
                }
                (Property::Relationship(relationship), None) => {
                    if !relationship.is_optional() && !relationship.is_array() {
                        self.report(&child, "missing-required", "absent");
                    }
                }
                (Property::EnumValue(_), _) => {}
            }
        }

        // Closed-world check. Instance property names iterate sorted, so
        // unknown-property violations come out in name order.
        for name in instance.property_names() {
            if declaration.property(name).is_none() {
                self.report(&format!("{}.{}", path, name), "unknown-property", "present");
            }
        }
    }

    fn visit_field(&mut self, field: &FieldDeclaration, value: &PropertyValue, path: &str) {
        if field.is_array() {
            match value {
                PropertyValue::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let element = format!("{}[{}]", path, index);
                        self.field_scalar(field, item, &element);
                    }
                }
                other => self.report(path, "type", other.kind()),
            }
            return;
        }
        self.field_scalar(field, value, path);
    }

    fn field_scalar(&mut self, field: &FieldDeclaration, value: &PropertyValue, path: &str) {
        match (field.field_type(), value) {
            (FieldType::Boolean, PropertyValue::Boolean(_)) => {}
            (FieldType::Integer, PropertyValue::Integer(n)) => {
                self.check_number(field, *n as f64, path)
            }
            (FieldType::Double, PropertyValue::Double(d)) => self.check_number(field, *d, path),
            (FieldType::Double, PropertyValue::Integer(n)) => {
                self.check_number(field, *n as f64, path)
            }
            (FieldType::Text, PropertyValue::Text(s)) => self.check_text(field, s, path),
            (FieldType::DateTime, PropertyValue::DateTime(_)) => {}
            (FieldType::Declared(target), value) => self.declared_scalar(target, value, path),
            (_, other) => self.report(path, "type", other.kind()),
        }
    }

    fn declared_scalar(&mut self, target: &str, value: &PropertyValue, path: &str) {
        let Some(target_declaration) = self.registry.resolve(target) else {
            self.report(path, "unknown-type", target);
            return;
        };
        if target_declaration.is_enum() {
            match value {
                PropertyValue::Text(symbol) => {
                    if !target_declaration.enum_symbols().any(|s| s == symbol) {
                        self.report(path, "enum-value", symbol.clone());
                    }
                }
                other => self.report(path, "type", other.kind()),
            }
            return;
        }
        match value {
            // Validated against its own $class, which may be a substitute
            // for the declared type.
            PropertyValue::Resource(nested) => self.visit_resource(nested, path),
            other => self.report(path, "type", other.kind()),
        }
    }

    fn visit_relationship(
        &mut self,
        relationship: &RelationshipDeclaration,
        value: &PropertyValue,
        path: &str,
    ) {
        if relationship.is_array() {
            match value {
                PropertyValue::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let element = format!("{}[{}]", path, index);
                        self.relationship_slot(relationship, item, &element);
                    }
                }
                other => self.report(path, "type", other.kind()),
            }
            return;
        }
        self.relationship_slot(relationship, value, path);
    }

    fn relationship_slot(
        &mut self,
        relationship: &RelationshipDeclaration,
        value: &PropertyValue,
        path: &str,
    ) {
        match value {
            PropertyValue::Relationship(reference) => {
                if reference.fully_qualified_type() != relationship.target() {
                    self.report(path, "relationship-target", reference.fully_qualified_type());
                }
            }
            PropertyValue::Resource(nested) => {
                if self.permit_embedded {
                    self.visit_resource(nested, path);
                } else {
                    self.report(path, "relationship", "embedded resource not permitted");
                }
            }
            other => self.report(path, "type", other.kind()),
        }
    }

    fn check_number(&mut self, field: &FieldDeclaration, value: f64, path: &str) {
        if let Some(FieldConstraint::Number { minimum, maximum }) = field.constraint() {
            if minimum.is_some_and(|min| value < min) || maximum.is_some_and(|max| value > max) {
                self.report(path, "number-range", value.to_string());
            }
        }
    }

    fn check_text(&mut self, field: &FieldDeclaration, value: &str, path: &str) {
        if let Some(FieldConstraint::Text {
            min_length,
            max_length,
            pattern,
        }) = field.constraint()
        {
            let length = value.chars().count();
            if min_length.is_some_and(|min| length < min) || max_length.is_some_and(|max| length > max)
            {
                self.report(path, "string-length", format!("length {}", length));
                return;
            }
            if let Some(pattern) = pattern {
                if !pattern.is_match(value) {
                    self.report(path, "string-pattern", value.to_owned());
                }
            }
        }
    }
}
