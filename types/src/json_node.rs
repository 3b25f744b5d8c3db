//! Read access to a parsed JSON tree.
//!
//! Decoders in this crate are written against [`JsonNode`] rather than a concrete JSON library so
//! that any parse tree offering these typed queries can be fed in.  The implementation for
//! [`serde_json::Value`] is provided.

use serde_json::Value;

/// Typed queries over a node of a parsed JSON document.
pub trait JsonNode: Sized {
    /// Returns the named field if `self` is an object containing it.
    fn get(&self, field: &str) -> Option<&Self>;

    /// Returns the field names in document order if `self` is an object, otherwise an empty list.
    fn field_names(&self) -> Vec<&str>;

    /// Returns the elements if `self` is an array.
    fn elements(&self) -> Option<Vec<&Self>>;

    /// Returns the text if `self` is a string.
    fn as_text(&self) -> Option<&str>;

    /// Returns the value if `self` is a non-negative integer fitting in a `u64`.
    fn as_u64(&self) -> Option<u64>;

    /// Returns the value if `self` is an integer fitting in an `i64`.
    fn as_i64(&self) -> Option<i64>;

    /// Returns the literal text of `self` if it is a number, e.g. `"1180591620717411303424"`.
    fn as_number_text(&self) -> Option<String>;

    /// Returns the value if `self` is a boolean.
    fn as_bool(&self) -> Option<bool>;

    /// Returns `true` if `self` is `null`.
    fn is_null(&self) -> bool;

    /// Returns `true` if `self` is an object.
    fn is_object(&self) -> bool;

    /// Returns `true` if `self` is a number of any kind.
    fn is_number(&self) -> bool;

    /// Returns the named field unless it is missing or `null`.
    fn get_present(&self, field: &str) -> Option<&Self> {
        self.get(field).filter(|node| !node.is_null())
    }
}

impl JsonNode for Value {
    fn get(&self, field: &str) -> Option<&Self> {
        self.as_object().and_then(|object| object.get(field))
    }

    fn field_names(&self) -> Vec<&str> {
        self.as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn elements(&self) -> Option<Vec<&Self>> {
        self.as_array().map(|array| array.iter().collect())
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn as_u64(&self) -> Option<u64> {
        Value::as_u64(self)
    }

    fn as_i64(&self) -> Option<i64> {
        Value::as_i64(self)
    }

    fn as_number_text(&self) -> Option<String> {
        self.as_number().map(ToString::to_string)
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn is_object(&self) -> bool {
        Value::is_object(self)
    }

    fn is_number(&self) -> bool {
        Value::is_number(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_preserve_field_order() {
        let value = json!({ "b": 1, "a": 2, "c": null });
        assert_eq!(value.field_names(), vec!["b", "a", "c"]);
        assert!(value.get("c").is_some());
        assert!(value.get_present("c").is_none());
        assert!(value.get_present("missing").is_none());
    }

    #[test]
    fn typed_queries() {
        let value = json!(["text", 7, -7, true, 1.5]);
        let elements = JsonNode::elements(&value).unwrap();
        assert_eq!(elements[0].as_text(), Some("text"));
        assert_eq!(JsonNode::as_u64(elements[1]), Some(7));
        assert_eq!(JsonNode::as_u64(elements[2]), None);
        assert_eq!(JsonNode::as_i64(elements[2]), Some(-7));
        assert_eq!(JsonNode::as_bool(elements[3]), Some(true));
        assert!(JsonNode::is_number(elements[4]));
        assert_eq!(elements[4].as_number_text().as_deref(), Some("1.5"));
        assert_eq!(elements[0].as_number_text(), None);
        assert!(elements[4].field_names().is_empty());
    }

    #[test]
    fn numbers_wider_than_u64_keep_their_digits() {
        let value: Value = serde_json::from_str("[1180591620717411303424]").unwrap();
        let elements = JsonNode::elements(&value).unwrap();
        assert_eq!(JsonNode::as_u64(elements[0]), None);
        assert_eq!(
            elements[0].as_number_text().as_deref(),
            Some("1180591620717411303424")
        );
    }
}
