use std::{
    convert::TryFrom,
    hash::{Hash, Hasher},
};

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use tracing::trace;

use crate::{
    byte_utils,
    bytesrepr::{self, Bytes, FromBytes, ToBytes},
    cl_type::{CLType, CLTypeInfo, CLTyped},
    json_node::JsonNode,
    Error,
};

mod native_value;
mod parsed;
mod views;

pub use native_value::NativeValue;
pub use parsed::Parsed;
pub use views::{CLKeyValue, CLOptionValue};

/// A value as carried in deploy arguments.
///
/// It holds the underlying data as a type-erased, serialized `Vec<u8>`, the [`CLTypeInfo`] of the
/// underlying data, and an optional human-readable projection of it.  The bytes are always the
/// canonical encoding of a value of the declared type.  Equality and hashing ignore the
/// projection.
#[derive(Clone, Debug)]
pub struct CLValue {
    cl_type: CLTypeInfo,
    bytes: Bytes,
    parsed: Option<Parsed>,
}

impl CLValue {
    /// Constructs a `CLValue`, validating `bytes` against `cl_type` and `parsed` against `bytes`.
    ///
    /// A `parsed` projection which disagrees with the one derived from `bytes` is rejected with
    /// [`Error::MalformedValue`].  Values of type `Any` are opaque and are not validated.
    pub fn new<B: Into<Bytes>>(
        cl_type: CLTypeInfo,
        bytes: B,
        parsed: Option<Parsed>,
    ) -> Result<CLValue, Error> {
        let bytes = bytes.into();
        if cl_type == CLTypeInfo::Any {
            return Ok(CLValue {
                cl_type,
                bytes,
                parsed,
            });
        }

        let native = decode_canonical(&cl_type, &bytes)?;
        let derived = Parsed::derive(&native);
        let parsed = match (derived, parsed) {
            (Some(derived), Some(provided)) => {
                if derived.to_string() != provided.to_string() {
                    return Err(Error::MalformedValue(format!(
                        "parsed value '{}' does not match bytes of {} holding '{}'",
                        provided, cl_type, derived
                    )));
                }
                Some(derived)
            }
            (Some(derived), None) => Some(derived),
            (None, _) if has_scalar_projection(&cl_type) => None,
            (None, provided) => provided,
        };

        Ok(CLValue {
            cl_type,
            bytes,
            parsed,
        })
    }

    /// Encodes `value` as a value of type `cl_type`.
    pub fn from_native(cl_type: CLTypeInfo, value: &NativeValue) -> Result<CLValue, Error> {
        let bytes = value.to_bytes_as(&cl_type)?;
        Ok(CLValue {
            cl_type,
            bytes: bytes.into(),
            parsed: Parsed::derive(value),
        })
    }

    /// Constructs a `CLValue` from `t`.
    pub fn from_t<T: CLTyped + ToBytes>(t: T) -> Result<CLValue, Error> {
        let bytes = t.into_bytes()?;
        CLValue::new(T::cl_type(), bytes, None)
    }

    /// Consumes and converts `self` back into its underlying type.
    pub fn into_t<T: CLTyped + FromBytes>(self) -> Result<T, Error> {
        let expected = T::cl_type();
        if self.cl_type == expected {
            Ok(bytesrepr::deserialize_from_slice(&self.bytes)?)
        } else {
            Err(Error::TypeMismatch {
                expected: expected.to_string(),
                found: self.cl_type.to_string(),
            })
        }
    }

    /// A convenience method to create CLValue for a unit.
    pub fn unit() -> Self {
        CLValue {
            cl_type: CLTypeInfo::Unit,
            bytes: Bytes::new(),
            parsed: None,
        }
    }

    /// Decodes the underlying data.
    pub fn to_native(&self) -> Result<NativeValue, Error> {
        decode_canonical(&self.cl_type, &self.bytes)
    }

    /// The [`CLTypeInfo`] of the underlying data.
    pub fn cl_type(&self) -> &CLTypeInfo {
        &self.cl_type
    }

    /// Returns a reference to the serialized form of the underlying value held in this `CLValue`.
    pub fn inner_bytes(&self) -> &Vec<u8> {
        self.bytes.inner_bytes()
    }

    /// The human-readable projection, if any.
    pub fn parsed(&self) -> Option<&Parsed> {
        self.parsed.as_ref()
    }

    /// Returns a key view if this is a `Key` value.
    pub fn as_key_value(&self) -> Option<CLKeyValue> {
        CLKeyValue::try_from(self).ok()
    }

    /// Returns an option view if this is an `Option` value.
    pub fn as_option_value(&self) -> Option<CLOptionValue> {
        CLOptionValue::try_from(self).ok()
    }

    /// Parses a value from its JSON form `{"cl_type": .., "bytes": .., "parsed": ..}`.
    pub fn from_json<N: JsonNode>(node: &N) -> Result<CLValue, Error> {
        let cl_type_node = node
            .get_present("cl_type")
            .ok_or_else(|| Error::MalformedValue("missing field 'cl_type'".to_string()))?;
        let cl_type = CLTypeInfo::from_json(cl_type_node)?;
        let hex = node
            .get_present("bytes")
            .and_then(|bytes| bytes.as_text())
            .ok_or_else(|| Error::MalformedValue("missing hex field 'bytes'".to_string()))?;
        let bytes = byte_utils::decode_hex(hex)?;
        let parsed = match node.get_present("parsed") {
            Some(parsed) => Parsed::from_json(parsed, &cl_type)?,
            None => None,
        };
        trace!(%cl_type, bytes = hex, "read value from JSON");
        CLValue::new(cl_type, bytes, parsed)
    }

    /// Returns the JSON form of this value.
    pub fn to_json(&self) -> Value {
        let parsed = self
            .parsed
            .as_ref()
            .map_or(Value::Null, |parsed| parsed.to_json(&self.cl_type));
        json!({
            "cl_type": self.cl_type.to_json(),
            "bytes": byte_utils::encode_hex(self.inner_bytes()),
            "parsed": parsed,
        })
    }
}

fn decode_canonical(cl_type: &CLTypeInfo, bytes: &[u8]) -> Result<NativeValue, Error> {
    let (native, remainder) =
        NativeValue::from_bytes_as(cl_type, bytes).map_err(|error| match error {
            bytesrepr::Error::NotRepresentable => Error::UnsupportedType(CLType::Any),
            error => Error::MalformedValue(format!("bytes are not a valid {}: {}", cl_type, error)),
        })?;
    if !remainder.is_empty() {
        return Err(Error::MalformedValue(format!(
            "{} trailing bytes after {} value",
            remainder.len(),
            cl_type
        )));
    }
    if native.to_bytes_as(cl_type)? != bytes {
        return Err(Error::MalformedValue(format!(
            "non-canonical encoding of {}",
            cl_type
        )));
    }
    Ok(native)
}

/// Types whose projection is fully determined by the bytes.
fn has_scalar_projection(cl_type: &CLTypeInfo) -> bool {
    let innermost = cl_type.innermost().cl_type();
    !innermost.is_composite() && innermost != CLType::Unit && innermost != CLType::Any
}

impl PartialEq for CLValue {
    fn eq(&self, other: &Self) -> bool {
        self.cl_type == other.cl_type && self.bytes == other.bytes
    }
}

impl Eq for CLValue {}

impl Hash for CLValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cl_type.hash(state);
        self.bytes.hash(state);
    }
}

impl ToBytes for CLValue {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.bytes.serialized_length() + self.cl_type.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.bytes.write_bytes(writer)?;
        self.cl_type.write_bytes(writer)?;
        Ok(())
    }
}

impl FromBytes for CLValue {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (bytes, remainder) = Bytes::from_bytes(bytes)?;
        let (cl_type, remainder) = CLTypeInfo::from_bytes(remainder)?;
        let cl_value =
            CLValue::new(cl_type, bytes, None).map_err(|_| bytesrepr::Error::Formatting)?;
        Ok((cl_value, remainder))
    }
}

impl Serialize for CLValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_json().serialize(serializer)
        } else {
            self.to_bytes()
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for CLValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let json = Value::deserialize(deserializer)?;
            CLValue::from_json(&json).map_err(SerdeError::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
        }
    }
}
