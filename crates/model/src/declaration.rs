//! Type declarations: the immutable schema description of one named type.
//!
//! A [`TypeDeclaration`] carries a category tag, a namespace and simple
//! name, an optional identifier-field name, and an ordered list of
//! [`Property`] declarations. Property order is the traversal order for
//! every codec pass, so it is preserved exactly as declared.

use std::fmt;

/// The six declaration categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Asset,
    Concept,
    Enum,
    Event,
    Participant,
    Transaction,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Asset => "asset",
            Category::Concept => "concept",
            Category::Enum => "enum",
            Category::Event => "event",
            Category::Participant => "participant",
            Category::Transaction => "transaction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primitive or declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Boolean,
    Integer,
    Double,
    Text,
    DateTime,
    /// A declared type, referenced by fully-qualified name. Resolves to a
    /// concept (nested object) or an enum (symbol string) in the registry.
    Declared(String),
}

/// Value constraints attachable to a field.
#[derive(Debug, Clone)]
pub enum FieldConstraint {
    /// Range constraint for Integer and Double fields.
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    /// Length and pattern constraints for Text fields.
    Text {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<regex::Regex>,
    },
}

/// A primitive, array, nested-concept, or date/time valued property.
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    name: String,
    field_type: FieldType,
    is_array: bool,
    optional: bool,
    constraint: Option<FieldConstraint>,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDeclaration {
            name: name.into(),
            field_type,
            is_array: false,
            optional: false,
            constraint: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_constraint(mut self, constraint: FieldConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn constraint(&self) -> Option<&FieldConstraint> {
        self.constraint.as_ref()
    }
}

/// A typed by-reference link to another instance, resolved by identifier.
#[derive(Debug, Clone)]
pub struct RelationshipDeclaration {
    name: String,
    target: String,
    is_array: bool,
    optional: bool,
}

impl RelationshipDeclaration {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        RelationshipDeclaration {
            name: name.into(),
            target: target.into(),
            is_array: false,
            optional: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified name of the target declaration.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// One symbolic literal inside an enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDeclaration {
    name: String,
}

impl EnumValueDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        EnumValueDeclaration { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The closed set of property kinds. Every codec pass dispatches on this
/// with one arm per kind.
#[derive(Debug, Clone)]
pub enum Property {
    Field(FieldDeclaration),
    Relationship(RelationshipDeclaration),
    EnumValue(EnumValueDeclaration),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Property::Field(f) => f.name(),
            Property::Relationship(r) => r.name(),
            Property::EnumValue(e) => e.name(),
        }
    }
}

/// Immutable description of one named type. Shared read-only through the
/// registry for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    category: Category,
    namespace: String,
    name: String,
    identifier_field: Option<String>,
    properties: Vec<Property>,
}

impl TypeDeclaration {
    pub fn new(category: Category, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDeclaration {
            category,
            namespace: namespace.into(),
            name: name.into(),
            identifier_field: None,
            properties: Vec::new(),
        }
    }

    pub fn with_identifier_field(mut self, name: impl Into<String>) -> Self {
        self.identifier_field = Some(name.into());
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fully_qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn is_enum(&self) -> bool {
        self.category == Category::Enum
    }

    /// Name of the identifier field, if this type is identified.
    pub fn identifier_field(&self) -> Option<&str> {
        self.identifier_field.as_deref()
    }

    /// Properties in declared order. This order is an observable contract:
    /// serialization output and violation reports follow it.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// The symbolic literals of an enum declaration, in declared order.
    pub fn enum_symbols(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().filter_map(|p| match p {
            Property::EnumValue(e) => Some(e.name()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_order_is_declared_order() {
        let decl = TypeDeclaration::new(Category::Concept, "org.acme", "Address")
            .with_property(Property::Field(FieldDeclaration::new(
                "line1",
                FieldType::Text,
            )))
            .with_property(Property::Field(FieldDeclaration::new(
                "city",
                FieldType::Text,
            )))
            .with_property(Property::Field(FieldDeclaration::new(
                "country",
                FieldType::Text,
            )));

        let names: Vec<&str> = decl.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["line1", "city", "country"]);
    }

    #[test]
    fn enum_symbols_skip_non_enum_properties() {
        let decl = TypeDeclaration::new(Category::Enum, "org.acme", "Country")
            .with_property(Property::EnumValue(EnumValueDeclaration::new("FR")))
            .with_property(Property::EnumValue(EnumValueDeclaration::new("DE")));

        let symbols: Vec<&str> = decl.enum_symbols().collect();
        assert_eq!(symbols, vec!["FR", "DE"]);
        assert!(decl.is_enum());
    }

    #[test]
    fn fully_qualified_name_joins_namespace_and_name() {
        let decl = TypeDeclaration::new(Category::Asset, "org.acme", "Vehicle");
        assert_eq!(decl.fully_qualified_name(), "org.acme.Vehicle");
    }
}
