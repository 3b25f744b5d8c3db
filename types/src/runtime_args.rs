//! Named arguments passed to a deploy's payment and session code.

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    json_node::JsonNode,
    CLTyped, CLValue, Error,
};

/// One argument: a non-empty name and its value.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct NamedArg(String, CLValue);

impl NamedArg {
    /// Pairs `name` with `value`, rejecting an empty name.
    pub fn new<K: Into<String>>(name: K, value: CLValue) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::MalformedValue(
                "argument name must not be empty".to_string(),
            ));
        }
        Ok(NamedArg(name, value))
    }

    /// The argument name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The argument value.
    pub fn cl_value(&self) -> &CLValue {
        &self.1
    }

    /// Parses the JSON form `[name, value]`.
    pub fn from_json<N: JsonNode>(node: &N) -> Result<Self, Error> {
        let malformed = || Error::MalformedValue("argument must be a [name, value] pair".to_string());
        let pair = node.elements().ok_or_else(malformed)?;
        match pair.as_slice() {
            [name, value] => {
                let name = name.as_text().ok_or_else(malformed)?;
                NamedArg::new(name, CLValue::from_json(*value)?)
            }
            _ => Err(malformed()),
        }
    }

    /// Returns the JSON form `[name, value]`.
    pub fn to_json(&self) -> Value {
        Value::Array(vec![Value::String(self.0.clone()), self.1.to_json()])
    }
}

impl ToBytes for NamedArg {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length() + self.1.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)?;
        self.1.write_bytes(writer)
    }
}

impl FromBytes for NamedArg {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (name, remainder) = String::from_bytes(bytes)?;
        let (cl_value, remainder) = CLValue::from_bytes(remainder)?;
        let named_arg = NamedArg::new(name, cl_value).map_err(|_| bytesrepr::Error::Formatting)?;
        Ok((named_arg, remainder))
    }
}

/// The ordered, named arguments of a deploy item.
///
/// Both wire formats keep insertion order, so encoding is deterministic.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct RuntimeArgs(Vec<NamedArg>);

impl RuntimeArgs {
    /// No arguments.
    pub fn new() -> RuntimeArgs {
        RuntimeArgs::default()
    }

    /// The value of the first argument called `name`.
    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0
            .iter()
            .find(|arg| arg.name() == name)
            .map(NamedArg::cl_value)
    }

    /// The number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes `value` as a `CLValue` and appends it under `name`.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Result<(), Error>
    where
        K: Into<String>,
        V: CLTyped + ToBytes,
    {
        self.insert_cl_value(name, CLValue::from_t(value)?)
    }

    /// Appends an already encoded value under `name`.
    pub fn insert_cl_value<K>(&mut self, name: K, cl_value: CLValue) -> Result<(), Error>
    where
        K: Into<String>,
    {
        self.0.push(NamedArg::new(name, cl_value)?);
        Ok(())
    }

    /// The arguments, in order.
    pub fn named_args(&self) -> impl Iterator<Item = &NamedArg> {
        self.0.iter()
    }

    /// Parses the JSON form: an array of `[name, value]` pairs.
    pub fn from_json<N: JsonNode>(node: &N) -> Result<Self, Error> {
        let elements = node
            .elements()
            .ok_or_else(|| Error::MalformedValue("args must be an array".to_string()))?;
        elements
            .into_iter()
            .map(NamedArg::from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(RuntimeArgs)
    }

    /// Returns the JSON form: an array of `[name, value]` pairs.
    pub fn to_json(&self) -> Value {
        Value::Array(self.0.iter().map(NamedArg::to_json).collect())
    }
}

impl From<Vec<NamedArg>> for RuntimeArgs {
    fn from(args: Vec<NamedArg>) -> Self {
        RuntimeArgs(args)
    }
}

impl ToBytes for RuntimeArgs {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for RuntimeArgs {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (args, remainder) = Vec::<NamedArg>::from_bytes(bytes)?;
        Ok((RuntimeArgs(args), remainder))
    }
}

impl Serialize for RuntimeArgs {
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

impl<'de> Deserialize<'de> for RuntimeArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let json = Value::deserialize(deserializer)?;
            RuntimeArgs::from_json(&json).map_err(SerdeError::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
        }
    }
}

/// Builds [`RuntimeArgs`] from `name => value` pairs, in the given order.
///
/// Panics if a value cannot be encoded; use [`RuntimeArgs::insert`] to handle that case.
///
/// ```
/// use casper_sdk_types::runtime_args;
///
/// let args = runtime_args! {
///     "amount" => 2_500_000_000u64,
///     "memo" => "rent",
/// };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! runtime_args {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut args = $crate::RuntimeArgs::new();
        $(
            args.insert($name, $value)
                .expect("runtime_args! value should encode as a CLValue");
        )*
        args
    }};
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::U512;

    #[test]
    fn get_should_find_values_by_name() {
        let amount = CLValue::from_t(U512::from(7u8)).unwrap();
        let memo = CLValue::from_t("rent").unwrap();
        let mut args = RuntimeArgs::new();
        args.insert_cl_value("amount", amount.clone()).unwrap();
        args.insert_cl_value("memo", memo.clone()).unwrap();

        assert_eq!(args.get("memo"), Some(&memo));
        assert_eq!(args.get("amount"), Some(&amount));
        assert_eq!(args.get("target"), None);
        assert_eq!(args.len(), 2);
        assert!(RuntimeArgs::new().is_empty());

        let from_macro = runtime_args! {
            "amount" => U512::from(7u8),
            "memo" => "rent",
        };
        assert_eq!(from_macro, args);
        assert_eq!(runtime_args! {}, RuntimeArgs::new());
    }

    #[test]
    fn should_preserve_insertion_order() {
        let args = runtime_args! {
            "zeta" => 1u8,
            "alpha" => 2u8,
        };
        let names: Vec<&str> = args.named_args().map(NamedArg::name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let bytes = args.to_bytes().unwrap();
        assert_eq!(&bytes[..4], &[2, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[4, 0, 0, 0]);
        assert_eq!(&bytes[8..12], b"zeta");
    }

    #[test]
    fn named_serialization_roundtrip() {
        let args = runtime_args! {
            "foo" => 1i32,
        };
        bytesrepr::test_serialization_roundtrip(&args);
    }

    #[test]
    fn should_encode_amount_arg() {
        let args = runtime_args! {
            "amount" => U512::from(1_000_000_000u64),
        };
        assert_eq!(
            base16::encode_lower(&args.to_bytes().unwrap()),
            "0100000006000000616d6f756e74050000000400ca9a3b08"
        );
    }

    #[test]
    fn should_reject_empty_names() {
        assert!(matches!(
            RuntimeArgs::new().insert("", 1u8),
            Err(Error::MalformedValue(_))
        ));
        let bytes = base16::decode("0100000000000000010000000003").unwrap();
        assert_eq!(
            bytesrepr::deserialize::<RuntimeArgs>(bytes).unwrap_err(),
            bytesrepr::Error::Formatting
        );
    }

    #[test]
    fn json_should_be_array_of_pairs() {
        let args = runtime_args! {
            "amount" => U512::from(1_000_000_000u64),
        };
        let json = args.to_json();
        assert_eq!(
            json,
            json!([[
                "amount",
                { "cl_type": "U512", "bytes": "0400ca9a3b", "parsed": "1000000000" }
            ]])
        );
        assert_eq!(RuntimeArgs::from_json(&json).unwrap(), args);
        assert_eq!(serde_json::from_value::<RuntimeArgs>(json).unwrap(), args);

        assert!(matches!(
            RuntimeArgs::from_json(&json!([["amount"]])),
            Err(Error::MalformedValue(_))
        ));
        assert!(matches!(
            RuntimeArgs::from_json(&json!({ "amount": 1 })),
            Err(Error::MalformedValue(_))
        ));
    }
}
