//! Runtime instances: typed objects conforming to a declared type.
//!
//! An [`Instance`] is tagged with its fully-qualified type name and holds a
//! property-name to [`PropertyValue`] map. Nested resources are held behind
//! `Arc` so a single object identity can be reachable through several
//! property paths; the codec's deduplication passes key on that identity
//! (`Arc::as_ptr`), never on value equality.

use crate::declaration::TypeDeclaration;
use crate::error::ModelError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// An unresolved by-reference link: `namespace.Type#identifier`.
///
/// Resolution against a live object graph is outside the codec; the
/// reference is carried as parsed components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRef {
    pub namespace: String,
    pub type_name: String,
    pub identifier: String,
}

impl RelationshipRef {
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        RelationshipRef {
            namespace: namespace.into(),
            type_name: type_name.into(),
            identifier: identifier.into(),
        }
    }

    /// Fully-qualified name of the target type.
    pub fn fully_qualified_type(&self) -> String {
        format!("{}.{}", self.namespace, self.type_name)
    }
}

impl fmt::Display for RelationshipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}#{}",
            self.namespace, self.type_name, self.identifier
        )
    }
}

impl FromStr for RelationshipRef {
    type Err = ModelError;

    /// Parse `namespace.Type#identifier`. The identifier starts at the
    /// first `#`; the type name is the last dot-separated segment before it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ModelError::MalformedReference { text: s.to_owned() };
        let hash = s.find('#').ok_or_else(malformed)?;
        let (fqn, identifier) = (&s[..hash], &s[hash + 1..]);
        let dot = fqn.rfind('.').ok_or_else(malformed)?;
        let (namespace, type_name) = (&fqn[..dot], &fqn[dot + 1..]);
        if namespace.is_empty() || type_name.is_empty() || identifier.is_empty() {
            return Err(malformed());
        }
        Ok(RelationshipRef::new(namespace, type_name, identifier))
    }
}

/// A property value on an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    DateTime(time::OffsetDateTime),
    /// A nested resource. `Arc` identity is the deduplication key.
    Resource(Arc<Instance>),
    Relationship(RelationshipRef),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Short description of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Double(_) => "double",
            PropertyValue::Text(_) => "text",
            PropertyValue::DateTime(_) => "datetime",
            PropertyValue::Resource(_) => "resource",
            PropertyValue::Relationship(_) => "relationship",
            PropertyValue::Array(_) => "array",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One typed object. The codec never retains references to an instance
/// after a call returns, and never mutates one it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: String,
    values: BTreeMap<String, PropertyValue>,
}

impl Instance {
    pub fn new(class: impl Into<String>) -> Self {
        Instance {
            class: class.into(),
            values: BTreeMap::new(),
        }
    }

    /// Fully-qualified type name (`$class`).
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style [`set`](Instance::set).
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Property names currently set on this instance.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The identifier value, read through the declaration's identifier field.
    pub fn identifier(&self, declaration: &TypeDeclaration) -> Option<&str> {
        declaration
            .identifier_field()
            .and_then(|field| self.get(field))
            .and_then(PropertyValue::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_ref_round_trips_through_display() {
        let r: RelationshipRef = "org.acme.sales.Customer#c-001".parse().unwrap();
        assert_eq!(r.namespace, "org.acme.sales");
        assert_eq!(r.type_name, "Customer");
        assert_eq!(r.identifier, "c-001");
        assert_eq!(r.to_string(), "org.acme.sales.Customer#c-001");
    }

    #[test]
    fn relationship_ref_identifier_may_contain_hash() {
        let r: RelationshipRef = "org.acme.Customer#a#b".parse().unwrap();
        assert_eq!(r.identifier, "a#b");
    }

    #[test]
    fn malformed_relationship_refs_are_rejected() {
        for text in ["org.acme.Customer", "Customer#c-001", "org.acme.#c-001", "#"] {
            assert!(text.parse::<RelationshipRef>().is_err(), "{}", text);
        }
    }

    #[test]
    fn equal_values_do_not_imply_shared_identity() {
        let a = Arc::new(Instance::new("org.acme.Address").with(
            "line1",
            PropertyValue::Text("1 Main St".to_owned()),
        ));
        let b = Arc::new(Instance::new("org.acme.Address").with(
            "line1",
            PropertyValue::Text("1 Main St".to_owned()),
        ));
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
