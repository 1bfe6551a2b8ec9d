//! The legacy "ergo" wire envelope.
//!
//! An older execution engine emitted resources wrapped as
//! `{"$class": {"$coll": ["<real $class>"]}, "$data": {...}}`, with the
//! body stripped of its own `$class` key. This adapter is the only place
//! that knows the envelope shape; the traversal passes never see it.

use crate::error::CodecError;
use crate::CLASS_KEY;
use serde_json::{Map, Value};

pub const COLLECTION_KEY: &str = "$coll";
pub const DATA_KEY: &str = "$data";

/// Wrap a normally-generated object in the legacy envelope.
pub fn wrap(object: Value) -> Result<Value, CodecError> {
    let Value::Object(mut body) = object else {
        return Err(CodecError::Format(
            "ergo envelope requires an object body".to_owned(),
        ));
    };
    let class = match body.shift_remove(CLASS_KEY) {
        Some(Value::String(class)) => class,
        _ => {
            return Err(CodecError::Format(
                "ergo envelope requires a string $class tag".to_owned(),
            ))
        }
    };

    let mut tag = Map::new();
    tag.insert(COLLECTION_KEY.to_owned(), Value::Array(vec![Value::String(class)]));
    let mut envelope = Map::new();
    envelope.insert(CLASS_KEY.to_owned(), Value::Object(tag));
    envelope.insert(DATA_KEY.to_owned(), Value::Object(body));
    Ok(Value::Object(envelope))
}

/// Unwrap a legacy envelope back into a normal object, with the real
/// `$class` merged back in as the first key.
pub fn unwrap(envelope: &Value) -> Result<Value, CodecError> {
    let malformed = |detail: &str| CodecError::Format(format!("malformed ergo envelope: {}", detail));

    let class = envelope
        .get(CLASS_KEY)
        .and_then(|tag| tag.get(COLLECTION_KEY))
        .and_then(Value::as_array)
        .and_then(|coll| coll.first())
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing $class.$coll[0]"))?;

    let body = envelope
        .get(DATA_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing $data object"))?;

    let mut object = Map::new();
    object.insert(CLASS_KEY.to_owned(), Value::String(class.to_owned()));
    for (key, value) in body {
        if key != CLASS_KEY {
            object.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Object(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrap_then_unwrap_recovers_class_and_body() {
        let original = json!({
            "$class": "org.acme.Order",
            "orderId": "o-1",
            "amount": 10.5
        });
        let wrapped = wrap(original.clone()).unwrap();
        assert_eq!(wrapped["$class"]["$coll"][0], "org.acme.Order");
        assert_eq!(wrapped["$data"]["orderId"], "o-1");
        assert!(wrapped["$data"].get("$class").is_none());

        let unwrapped = unwrap(&wrapped).unwrap();
        assert_eq!(unwrapped, original);
    }

    #[test]
    fn unwrap_rejects_missing_pieces() {
        assert!(unwrap(&json!({"$data": {}})).is_err());
        assert!(unwrap(&json!({"$class": {"$coll": []}, "$data": {}})).is_err());
        assert!(unwrap(&json!({"$class": {"$coll": ["org.acme.Order"]}})).is_err());
    }

    #[test]
    fn wrap_rejects_untagged_bodies() {
        assert!(wrap(json!({"orderId": "o-1"})).is_err());
        assert!(wrap(json!("not an object")).is_err());
    }
}
