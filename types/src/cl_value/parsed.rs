//! The human-readable projection carried in the `parsed` field of a value's JSON form.

use std::fmt::{self, Display, Formatter};

use serde_json::{json, Map, Value};
use tracing::trace;

use super::NativeValue;
use crate::{
    cl_type::{CLType, CLTypeInfo},
    crypto::AsymmetricType,
    json_node::JsonNode,
    key::KeyType,
    Error, Key, U512,
};

/// A scalar projection of a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parsed {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Signed(i64),
    /// An unsigned integer of any width up to 512 bits.
    Unsigned(U512),
    /// Text, including formatted keys and hex-encoded bytes.
    Text(String),
}

impl Parsed {
    /// Derives the projection of a decoded value, or `None` for values which have no scalar
    /// projection (`Unit`, `None` options and composites other than `Option`).
    pub fn derive(value: &NativeValue) -> Option<Parsed> {
        let parsed = match value {
            NativeValue::Bool(value) => Parsed::Bool(*value),
            NativeValue::I32(value) => Parsed::Signed(i64::from(*value)),
            NativeValue::I64(value) => Parsed::Signed(*value),
            NativeValue::U8(value) => Parsed::Unsigned(U512::from(*value)),
            NativeValue::U32(value) => Parsed::Unsigned(U512::from(*value)),
            NativeValue::U64(value) => Parsed::Unsigned(U512::from(*value)),
            NativeValue::U128(value) => Parsed::Unsigned(U512::from(*value)),
            NativeValue::U256(value) => Parsed::Unsigned(U512::from(*value)),
            NativeValue::U512(value) => Parsed::Unsigned(*value),
            NativeValue::String(value) => Parsed::Text(value.clone()),
            NativeValue::Key(key) => Parsed::Text(key.to_formatted_string()),
            NativeValue::URef(uref) => Parsed::Text(uref.to_formatted_string()),
            NativeValue::PublicKey(public_key) => Parsed::Text(public_key.to_hex()),
            NativeValue::ByteArray(bytes) => Parsed::Text(base16::encode_lower(bytes)),
            NativeValue::Option(Some(inner)) => return Parsed::derive(inner),
            NativeValue::Unit
            | NativeValue::Option(None)
            | NativeValue::List(_)
            | NativeValue::Result(_)
            | NativeValue::Map(_)
            | NativeValue::Tuple(_) => return None,
        };
        Some(parsed)
    }

    /// Reads the projection supplied in JSON for a value of type `cl_type`.
    ///
    /// Option types are read according to their innermost type.  For keys, the text held under
    /// the field named after the key kind is taken.  Text is taken verbatim, numbers only for
    /// numeric types (at any width up to 512 bits) and booleans only for `Bool`.  Anything else reads as absent.
    pub fn from_json<N: JsonNode>(node: &N, cl_type: &CLTypeInfo) -> Result<Option<Parsed>, Error> {
        let target = cl_type.innermost().cl_type();
        if target == CLType::Key && node.is_object() {
            let text = KeyType::all()
                .iter()
                .find_map(|kind| node.get(kind.name()).and_then(|field| field.as_text()));
            trace!(key = ?text, "read parsed key");
            return Ok(text.map(|text| Parsed::Text(text.to_string())));
        }
        if let Some(text) = node.as_text() {
            return Ok(Some(Parsed::Text(text.to_string())));
        }
        if node.is_number() && target.is_numeric() {
            if let Some(value) = node.as_u64() {
                return Ok(Some(Parsed::Unsigned(U512::from(value))));
            }
            if let Some(value) = node.as_i64() {
                return Ok(Some(Parsed::Signed(value)));
            }
            if let Some(value) = node
                .as_number_text()
                .and_then(|text| U512::from_dec_str(&text).ok())
            {
                return Ok(Some(Parsed::Unsigned(value)));
            }
            return Err(Error::MalformedValue(format!(
                "parsed value of a {} is not an integer",
                cl_type
            )));
        }
        if target == CLType::Bool {
            if let Some(value) = node.as_bool() {
                return Ok(Some(Parsed::Bool(value)));
            }
        }
        Ok(None)
    }

    /// Renders the projection for a value of type `cl_type`.
    ///
    /// Keys are wrapped in a single-field object named after their kind; 128-bit and wider
    /// integers are rendered as decimal strings.
    pub fn to_json(&self, cl_type: &CLTypeInfo) -> Value {
        let target = cl_type.innermost().cl_type();
        match self {
            Parsed::Bool(value) => Value::Bool(*value),
            Parsed::Signed(value) => json!(value),
            Parsed::Unsigned(value) => match target {
                CLType::U128 | CLType::U256 | CLType::U512 => Value::String(value.to_string()),
                _ if *value <= U512::from(u64::MAX) => json!(value.as_u64()),
                _ => Value::String(value.to_string()),
            },
            Parsed::Text(text) if target == CLType::Key => match Key::from_formatted_str(text) {
                Ok(key) => {
                    let mut object = Map::new();
                    object.insert(key.key_type().name().to_string(), Value::String(text.clone()));
                    Value::Object(object)
                }
                Err(_) => Value::String(text.clone()),
            },
            Parsed::Text(text) => Value::String(text.clone()),
        }
    }
}

impl Display for Parsed {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Parsed::Bool(value) => write!(formatter, "{}", value),
            Parsed::Signed(value) => write!(formatter, "{}", value),
            Parsed::Unsigned(value) => write!(formatter, "{}", value),
            Parsed::Text(text) => formatter.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn option_of(inner: CLTypeInfo) -> CLTypeInfo {
        CLTypeInfo::Option(Box::new(inner))
    }

    #[test]
    fn should_derive_scalars() {
        assert_eq!(
            Parsed::derive(&NativeValue::U512(U512::from(1_000_000u64))),
            Some(Parsed::Unsigned(U512::from(1_000_000u64)))
        );
        assert_eq!(
            Parsed::derive(&NativeValue::ByteArray(vec![1; 2])),
            Some(Parsed::Text("0101".to_string()))
        );
        assert_eq!(
            Parsed::derive(&NativeValue::Option(Some(Box::new(NativeValue::U64(999))))),
            Some(Parsed::Unsigned(U512::from(999u64)))
        );
        assert_eq!(Parsed::derive(&NativeValue::Option(None)), None);
        assert_eq!(Parsed::derive(&NativeValue::List(vec![])), None);
    }

    #[test]
    fn should_read_by_innermost_type() {
        let parsed = Parsed::from_json(&json!(999), &option_of(CLTypeInfo::U64)).unwrap();
        assert_eq!(parsed, Some(Parsed::Unsigned(U512::from(999u64))));

        let parsed = Parsed::from_json(&json!(-5), &CLTypeInfo::I32).unwrap();
        assert_eq!(parsed, Some(Parsed::Signed(-5)));

        assert_eq!(Parsed::from_json(&json!(5), &CLTypeInfo::String).unwrap(), None);
        assert_eq!(Parsed::from_json(&json!(null), &CLTypeInfo::U8).unwrap(), None);
        assert_eq!(
            Parsed::from_json(&json!(true), &CLTypeInfo::Bool).unwrap(),
            Some(Parsed::Bool(true))
        );
        assert!(matches!(
            Parsed::from_json(&json!(1.5), &CLTypeInfo::U64),
            Err(Error::MalformedValue(_))
        ));
    }

    #[test]
    fn should_read_key_from_any_kind_field() {
        let text = "hash-2b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5";
        let parsed = Parsed::from_json(&json!({ "Hash": text }), &CLTypeInfo::Key).unwrap();
        assert_eq!(parsed, Some(Parsed::Text(text.to_string())));

        let account = "account-hash-0101010101010101010101010101010101010101010101010101010101010101";
        let parsed = Parsed::from_json(&json!({ "Account": account }), &CLTypeInfo::Key).unwrap();
        assert_eq!(parsed, Some(Parsed::Text(account.to_string())));
    }

    #[test]
    fn should_render_by_type() {
        let amount = Parsed::Unsigned(U512::from(24_500_000_000u64));
        assert_eq!(amount.to_json(&CLTypeInfo::U512), json!("24500000000"));
        assert_eq!(
            amount.to_json(&option_of(CLTypeInfo::U64)),
            json!(24_500_000_000u64)
        );
        let key = Key::Hash([0x2b; 32]).to_formatted_string();
        assert_eq!(
            Parsed::Text(key.clone()).to_json(&CLTypeInfo::Key),
            json!({ "Hash": key })
        );
        assert_eq!(Parsed::Signed(-1).to_string(), "-1");
    }
}
