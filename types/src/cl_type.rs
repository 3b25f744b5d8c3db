//! The type system of values carried in deploy arguments.

use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::{
    bytesrepr::{self, FromBytes, ToBytes, U32_SERIALIZED_LENGTH, U8_SERIALIZED_LENGTH},
    json_node::JsonNode,
    Error, Key, PublicKey, URef, U128, U256, U512,
};

/// The maximum nesting of composite types accepted when decoding a type descriptor.
pub const CL_TYPE_RECURSION_DEPTH: u8 = 50;

const CL_TYPE_TAG_BOOL: u8 = 0;
const CL_TYPE_TAG_I32: u8 = 1;
const CL_TYPE_TAG_I64: u8 = 2;
const CL_TYPE_TAG_U8: u8 = 3;
const CL_TYPE_TAG_U32: u8 = 4;
const CL_TYPE_TAG_U64: u8 = 5;
const CL_TYPE_TAG_U128: u8 = 6;
const CL_TYPE_TAG_U256: u8 = 7;
const CL_TYPE_TAG_U512: u8 = 8;
const CL_TYPE_TAG_UNIT: u8 = 9;
const CL_TYPE_TAG_STRING: u8 = 10;
const CL_TYPE_TAG_KEY: u8 = 11;
const CL_TYPE_TAG_UREF: u8 = 12;
const CL_TYPE_TAG_OPTION: u8 = 13;
const CL_TYPE_TAG_LIST: u8 = 14;
const CL_TYPE_TAG_BYTE_ARRAY: u8 = 15;
const CL_TYPE_TAG_RESULT: u8 = 16;
const CL_TYPE_TAG_MAP: u8 = 17;
const CL_TYPE_TAG_TUPLE1: u8 = 18;
const CL_TYPE_TAG_TUPLE2: u8 = 19;
const CL_TYPE_TAG_TUPLE3: u8 = 20;
const CL_TYPE_TAG_ANY: u8 = 21;
const CL_TYPE_TAG_PUBLIC_KEY: u8 = 22;

/// The flat set of type tags.  Composite tags carry no detail here; see [`CLTypeInfo`] for the
/// full recursive descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CLType {
    /// `bool` primitive.
    Bool = CL_TYPE_TAG_BOOL,
    /// `i32` primitive.
    I32 = CL_TYPE_TAG_I32,
    /// `i64` primitive.
    I64 = CL_TYPE_TAG_I64,
    /// `u8` primitive.
    U8 = CL_TYPE_TAG_U8,
    /// `u32` primitive.
    U32 = CL_TYPE_TAG_U32,
    /// `u64` primitive.
    U64 = CL_TYPE_TAG_U64,
    /// [`U128`] large unsigned integer type.
    U128 = CL_TYPE_TAG_U128,
    /// [`U256`] large unsigned integer type.
    U256 = CL_TYPE_TAG_U256,
    /// [`U512`] large unsigned integer type.
    U512 = CL_TYPE_TAG_U512,
    /// `()` primitive.
    Unit = CL_TYPE_TAG_UNIT,
    /// `String` primitive.
    String = CL_TYPE_TAG_STRING,
    /// [`Key`] system type.
    Key = CL_TYPE_TAG_KEY,
    /// [`URef`] system type.
    URef = CL_TYPE_TAG_UREF,
    /// `Option` of a `CLType`.
    Option = CL_TYPE_TAG_OPTION,
    /// Variable-length list of a single `CLType`.
    List = CL_TYPE_TAG_LIST,
    /// Fixed-length list of bytes.
    ByteArray = CL_TYPE_TAG_BYTE_ARRAY,
    /// `Result` with `Ok` and `Err` variants of `CLType`s.
    Result = CL_TYPE_TAG_RESULT,
    /// Map with keys of a single `CLType` and values of a single `CLType`.
    Map = CL_TYPE_TAG_MAP,
    /// 1-ary tuple of a `CLType`.
    Tuple1 = CL_TYPE_TAG_TUPLE1,
    /// 2-ary tuple of `CLType`s.
    Tuple2 = CL_TYPE_TAG_TUPLE2,
    /// 3-ary tuple of `CLType`s.
    Tuple3 = CL_TYPE_TAG_TUPLE3,
    /// Unspecified type; the bytes are opaque.
    Any = CL_TYPE_TAG_ANY,
    /// [`PublicKey`] system type.
    PublicKey = CL_TYPE_TAG_PUBLIC_KEY,
}

impl CLType {
    /// Every tag, in tag order.
    pub const ALL: [CLType; 23] = [
        CLType::Bool,
        CLType::I32,
        CLType::I64,
        CLType::U8,
        CLType::U32,
        CLType::U64,
        CLType::U128,
        CLType::U256,
        CLType::U512,
        CLType::Unit,
        CLType::String,
        CLType::Key,
        CLType::URef,
        CLType::Option,
        CLType::List,
        CLType::ByteArray,
        CLType::Result,
        CLType::Map,
        CLType::Tuple1,
        CLType::Tuple2,
        CLType::Tuple3,
        CLType::Any,
        CLType::PublicKey,
    ];

    /// Returns the binary tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the name used for this type in JSON.
    pub fn json_name(self) -> &'static str {
        match self {
            CLType::Bool => "Bool",
            CLType::I32 => "I32",
            CLType::I64 => "I64",
            CLType::U8 => "U8",
            CLType::U32 => "U32",
            CLType::U64 => "U64",
            CLType::U128 => "U128",
            CLType::U256 => "U256",
            CLType::U512 => "U512",
            CLType::Unit => "Unit",
            CLType::String => "String",
            CLType::Key => "Key",
            CLType::URef => "URef",
            CLType::Option => "Option",
            CLType::List => "List",
            CLType::ByteArray => "ByteArray",
            CLType::Result => "Result",
            CLType::Map => "Map",
            CLType::Tuple1 => "Tuple1",
            CLType::Tuple2 => "Tuple2",
            CLType::Tuple3 => "Tuple3",
            CLType::Any => "Any",
            CLType::PublicKey => "PublicKey",
        }
    }

    /// Resolves a JSON type name.
    pub fn from_json_name(name: &str) -> Result<CLType, Error> {
        CLType::ALL
            .iter()
            .find(|cl_type| cl_type.json_name() == name)
            .copied()
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Resolves a binary tag.
    pub fn from_tag(tag: u8) -> Result<CLType, Error> {
        CLType::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| Error::UnknownType(format!("tag {}", tag)))
    }

    /// Returns `true` for the fixed-width and wide integer types.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            CLType::I32
                | CLType::I64
                | CLType::U8
                | CLType::U32
                | CLType::U64
                | CLType::U128
                | CLType::U256
                | CLType::U512
        )
    }

    /// Returns `true` if the type needs further detail (an inner type or a length) to be
    /// complete.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            CLType::Option
                | CLType::List
                | CLType::ByteArray
                | CLType::Result
                | CLType::Map
                | CLType::Tuple1
                | CLType::Tuple2
                | CLType::Tuple3
        )
    }
}

impl Display for CLType {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str(self.json_name())
    }
}

/// A complete, possibly nested, type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CLTypeInfo {
    /// `bool` primitive.
    Bool,
    /// `i32` primitive.
    I32,
    /// `i64` primitive.
    I64,
    /// `u8` primitive.
    U8,
    /// `u32` primitive.
    U32,
    /// `u64` primitive.
    U64,
    /// [`U128`] large unsigned integer type.
    U128,
    /// [`U256`] large unsigned integer type.
    U256,
    /// [`U512`] large unsigned integer type.
    U512,
    /// `()` primitive.
    Unit,
    /// `String` primitive.
    String,
    /// [`Key`] system type.
    Key,
    /// [`URef`] system type.
    URef,
    /// [`PublicKey`] system type.
    PublicKey,
    /// `Option` of a `CLTypeInfo`.
    Option(Box<CLTypeInfo>),
    /// Variable-length list of a single `CLTypeInfo`.
    List(Box<CLTypeInfo>),
    /// Fixed-length list of bytes.
    ByteArray(u32),
    /// `Result` with `Ok` and `Err` variants of `CLTypeInfo`s.
    #[allow(missing_docs)]
    Result {
        ok: Box<CLTypeInfo>,
        err: Box<CLTypeInfo>,
    },
    /// Map with keys of a single `CLTypeInfo` and values of a single `CLTypeInfo`.
    #[allow(missing_docs)]
    Map {
        key: Box<CLTypeInfo>,
        value: Box<CLTypeInfo>,
    },
    /// 1-ary tuple of a `CLTypeInfo`.
    Tuple1([Box<CLTypeInfo>; 1]),
    /// 2-ary tuple of `CLTypeInfo`s.
    Tuple2([Box<CLTypeInfo>; 2]),
    /// 3-ary tuple of `CLTypeInfo`s.
    Tuple3([Box<CLTypeInfo>; 3]),
    /// Unspecified type.
    Any,
}

impl CLTypeInfo {
    /// Returns the flat tag of this descriptor.
    pub fn cl_type(&self) -> CLType {
        match self {
            CLTypeInfo::Bool => CLType::Bool,
            CLTypeInfo::I32 => CLType::I32,
            CLTypeInfo::I64 => CLType::I64,
            CLTypeInfo::U8 => CLType::U8,
            CLTypeInfo::U32 => CLType::U32,
            CLTypeInfo::U64 => CLType::U64,
            CLTypeInfo::U128 => CLType::U128,
            CLTypeInfo::U256 => CLType::U256,
            CLTypeInfo::U512 => CLType::U512,
            CLTypeInfo::Unit => CLType::Unit,
            CLTypeInfo::String => CLType::String,
            CLTypeInfo::Key => CLType::Key,
            CLTypeInfo::URef => CLType::URef,
            CLTypeInfo::PublicKey => CLType::PublicKey,
            CLTypeInfo::Option(_) => CLType::Option,
            CLTypeInfo::List(_) => CLType::List,
            CLTypeInfo::ByteArray(_) => CLType::ByteArray,
            CLTypeInfo::Result { .. } => CLType::Result,
            CLTypeInfo::Map { .. } => CLType::Map,
            CLTypeInfo::Tuple1(_) => CLType::Tuple1,
            CLTypeInfo::Tuple2(_) => CLType::Tuple2,
            CLTypeInfo::Tuple3(_) => CLType::Tuple3,
            CLTypeInfo::Any => CLType::Any,
        }
    }

    /// Builds the descriptor for a non-composite tag.
    ///
    /// Returns [`Error::MalformedValue`] for composite tags, which need further detail.
    pub fn simple(cl_type: CLType) -> Result<CLTypeInfo, Error> {
        let info = match cl_type {
            CLType::Bool => CLTypeInfo::Bool,
            CLType::I32 => CLTypeInfo::I32,
            CLType::I64 => CLTypeInfo::I64,
            CLType::U8 => CLTypeInfo::U8,
            CLType::U32 => CLTypeInfo::U32,
            CLType::U64 => CLTypeInfo::U64,
            CLType::U128 => CLTypeInfo::U128,
            CLType::U256 => CLTypeInfo::U256,
            CLType::U512 => CLTypeInfo::U512,
            CLType::Unit => CLTypeInfo::Unit,
            CLType::String => CLTypeInfo::String,
            CLType::Key => CLTypeInfo::Key,
            CLType::URef => CLTypeInfo::URef,
            CLType::PublicKey => CLTypeInfo::PublicKey,
            CLType::Any => CLTypeInfo::Any,
            CLType::Option
            | CLType::List
            | CLType::ByteArray
            | CLType::Result
            | CLType::Map
            | CLType::Tuple1
            | CLType::Tuple2
            | CLType::Tuple3 => {
                return Err(Error::MalformedValue(format!(
                    "{} requires a nested type description",
                    cl_type
                )))
            }
        };
        Ok(info)
    }

    /// Strips any number of `Option` wrappers.
    pub fn innermost(&self) -> &CLTypeInfo {
        let mut current = self;
        while let CLTypeInfo::Option(inner) = current {
            current = inner;
        }
        current
    }

    /// Parses a type descriptor from its JSON form: a bare type name for simple types, or a
    /// single-field object for composites.
    pub fn from_json<N: JsonNode>(node: &N) -> Result<CLTypeInfo, Error> {
        Self::from_json_with_depth(node, 0)
    }

    fn from_json_with_depth<N: JsonNode>(node: &N, depth: u8) -> Result<CLTypeInfo, Error> {
        if depth >= CL_TYPE_RECURSION_DEPTH {
            return Err(Error::Serialization(bytesrepr::Error::ExceededRecursionDepth));
        }
        if let Some(name) = node.as_text() {
            return CLTypeInfo::simple(CLType::from_json_name(name)?);
        }
        if !node.is_object() {
            return Err(Error::MalformedValue(
                "cl_type must be a string or an object".to_string(),
            ));
        }
        let field_names = node.field_names();
        let name = match field_names.as_slice() {
            [name] => *name,
            _ => {
                return Err(Error::MalformedValue(format!(
                    "cl_type object must have exactly one field, got {}",
                    field_names.len()
                )))
            }
        };
        let cl_type = CLType::from_json_name(name)?;
        let body = node
            .get(name)
            .ok_or_else(|| Error::MalformedValue(format!("missing body for {}", name)))?;
        let nested = |child: &N| -> Result<Box<CLTypeInfo>, Error> {
            Ok(Box::new(Self::from_json_with_depth(child, depth + 1)?))
        };
        let field = |field_name: &str| -> Result<&N, Error> {
            body.get(field_name).ok_or_else(|| {
                Error::MalformedValue(format!("{} type is missing '{}'", name, field_name))
            })
        };
        let elements = |count: usize| -> Result<Vec<&N>, Error> {
            let elements = body.elements().ok_or_else(|| {
                Error::MalformedValue(format!("{} type must be an array", name))
            })?;
            if elements.len() != count {
                return Err(Error::MalformedValue(format!(
                    "{} type must have {} elements, got {}",
                    name,
                    count,
                    elements.len()
                )));
            }
            Ok(elements)
        };

        let info = match cl_type {
            CLType::Option => CLTypeInfo::Option(nested(body)?),
            CLType::List => CLTypeInfo::List(nested(body)?),
            CLType::ByteArray => {
                let length = body
                    .as_u64()
                    .and_then(|length| u32::try_from(length).ok())
                    .ok_or_else(|| {
                        Error::MalformedValue("ByteArray length must be a u32".to_string())
                    })?;
                CLTypeInfo::ByteArray(length)
            }
            CLType::Result => CLTypeInfo::Result {
                ok: nested(field("ok")?)?,
                err: nested(field("err")?)?,
            },
            CLType::Map => CLTypeInfo::Map {
                key: nested(field("key")?)?,
                value: nested(field("value")?)?,
            },
            CLType::Tuple1 => {
                let types = elements(1)?;
                CLTypeInfo::Tuple1([nested(types[0])?])
            }
            CLType::Tuple2 => {
                let types = elements(2)?;
                CLTypeInfo::Tuple2([nested(types[0])?, nested(types[1])?])
            }
            CLType::Tuple3 => {
                let types = elements(3)?;
                CLTypeInfo::Tuple3([nested(types[0])?, nested(types[1])?, nested(types[2])?])
            }
            simple => {
                return Err(Error::MalformedValue(format!(
                    "{} must be given as a bare string",
                    simple
                )))
            }
        };
        Ok(info)
    }

    /// Returns the JSON form of this descriptor.
    pub fn to_json(&self) -> Value {
        match self {
            CLTypeInfo::Option(inner) => json!({ "Option": inner.to_json() }),
            CLTypeInfo::List(inner) => json!({ "List": inner.to_json() }),
            CLTypeInfo::ByteArray(length) => json!({ "ByteArray": length }),
            CLTypeInfo::Result { ok, err } => {
                json!({ "Result": { "ok": ok.to_json(), "err": err.to_json() } })
            }
            CLTypeInfo::Map { key, value } => {
                json!({ "Map": { "key": key.to_json(), "value": value.to_json() } })
            }
            CLTypeInfo::Tuple1(types) => json!({ "Tuple1": tuple_to_json(types) }),
            CLTypeInfo::Tuple2(types) => json!({ "Tuple2": tuple_to_json(types) }),
            CLTypeInfo::Tuple3(types) => json!({ "Tuple3": tuple_to_json(types) }),
            simple => Value::String(simple.cl_type().json_name().to_string()),
        }
    }

    pub(crate) fn from_bytes_with_depth(
        bytes: &[u8],
        depth: u8,
    ) -> Result<(CLTypeInfo, &[u8]), bytesrepr::Error> {
        if depth >= CL_TYPE_RECURSION_DEPTH {
            return Err(bytesrepr::Error::ExceededRecursionDepth);
        }
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let cl_type = CLType::from_tag(tag).map_err(|_| bytesrepr::Error::Formatting)?;
        let nested = |bytes| -> Result<(Box<CLTypeInfo>, &[u8]), bytesrepr::Error> {
            let (inner, remainder) = Self::from_bytes_with_depth(bytes, depth + 1)?;
            Ok((Box::new(inner), remainder))
        };
        match cl_type {
            CLType::Option => {
                let (inner, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::Option(inner), remainder))
            }
            CLType::List => {
                let (inner, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::List(inner), remainder))
            }
            CLType::ByteArray => {
                let (length, remainder) = u32::from_bytes(remainder)?;
                Ok((CLTypeInfo::ByteArray(length), remainder))
            }
            CLType::Result => {
                let (ok, remainder) = nested(remainder)?;
                let (err, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::Result { ok, err }, remainder))
            }
            CLType::Map => {
                let (key, remainder) = nested(remainder)?;
                let (value, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::Map { key, value }, remainder))
            }
            CLType::Tuple1 => {
                let (t1, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::Tuple1([t1]), remainder))
            }
            CLType::Tuple2 => {
                let (t1, remainder) = nested(remainder)?;
                let (t2, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::Tuple2([t1, t2]), remainder))
            }
            CLType::Tuple3 => {
                let (t1, remainder) = nested(remainder)?;
                let (t2, remainder) = nested(remainder)?;
                let (t3, remainder) = nested(remainder)?;
                Ok((CLTypeInfo::Tuple3([t1, t2, t3]), remainder))
            }
            simple => {
                let info = CLTypeInfo::simple(simple).map_err(|_| bytesrepr::Error::Formatting)?;
                Ok((info, remainder))
            }
        }
    }
}

fn tuple_to_json(types: &[Box<CLTypeInfo>]) -> Value {
    Value::Array(types.iter().map(|cl_type| cl_type.to_json()).collect())
}

impl Display for CLTypeInfo {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self.to_json() {
            Value::String(name) => formatter.write_str(&name),
            composite => write!(formatter, "{}", composite),
        }
    }
}

impl ToBytes for CLTypeInfo {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                CLTypeInfo::Option(inner) | CLTypeInfo::List(inner) => inner.serialized_length(),
                CLTypeInfo::ByteArray(_) => U32_SERIALIZED_LENGTH,
                CLTypeInfo::Result { ok, err } => ok.serialized_length() + err.serialized_length(),
                CLTypeInfo::Map { key, value } => {
                    key.serialized_length() + value.serialized_length()
                }
                CLTypeInfo::Tuple1(types) => serialized_length_of_types(types),
                CLTypeInfo::Tuple2(types) => serialized_length_of_types(types),
                CLTypeInfo::Tuple3(types) => serialized_length_of_types(types),
                _ => 0,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.cl_type().tag());
        match self {
            CLTypeInfo::Option(inner) | CLTypeInfo::List(inner) => inner.write_bytes(writer),
            CLTypeInfo::ByteArray(length) => length.write_bytes(writer),
            CLTypeInfo::Result { ok, err } => {
                ok.write_bytes(writer)?;
                err.write_bytes(writer)
            }
            CLTypeInfo::Map { key, value } => {
                key.write_bytes(writer)?;
                value.write_bytes(writer)
            }
            CLTypeInfo::Tuple1(types) => write_types(types, writer),
            CLTypeInfo::Tuple2(types) => write_types(types, writer),
            CLTypeInfo::Tuple3(types) => write_types(types, writer),
            _ => Ok(()),
        }
    }
}

fn serialized_length_of_types(types: &[Box<CLTypeInfo>]) -> usize {
    types.iter().map(|cl_type| cl_type.serialized_length()).sum()
}

fn write_types(types: &[Box<CLTypeInfo>], writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
    for cl_type in types {
        cl_type.write_bytes(writer)?;
    }
    Ok(())
}

impl FromBytes for CLTypeInfo {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        CLTypeInfo::from_bytes_with_depth(bytes, 0)
    }
}

impl Serialize for CLTypeInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CLTypeInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CLTypeInfo::from_json(&value).map_err(D::Error::custom)
    }
}

/// A type which can be described by a [`CLTypeInfo`].
pub trait CLTyped {
    /// The `CLTypeInfo` of `Self`.
    fn cl_type() -> CLTypeInfo;
}

macro_rules! impl_cl_typed {
    ($($type:ty => $info:expr),* $(,)?) => {
        $(
            impl CLTyped for $type {
                fn cl_type() -> CLTypeInfo {
                    $info
                }
            }
        )*
    };
}

impl_cl_typed! {
    bool => CLTypeInfo::Bool,
    i32 => CLTypeInfo::I32,
    i64 => CLTypeInfo::I64,
    u8 => CLTypeInfo::U8,
    u32 => CLTypeInfo::U32,
    u64 => CLTypeInfo::U64,
    U128 => CLTypeInfo::U128,
    U256 => CLTypeInfo::U256,
    U512 => CLTypeInfo::U512,
    () => CLTypeInfo::Unit,
    String => CLTypeInfo::String,
    &str => CLTypeInfo::String,
    Key => CLTypeInfo::Key,
    URef => CLTypeInfo::URef,
    PublicKey => CLTypeInfo::PublicKey,
}

impl<T: CLTyped> CLTyped for Option<T> {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::Option(Box::new(T::cl_type()))
    }
}

impl<T: CLTyped> CLTyped for Vec<T> {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::List(Box::new(T::cl_type()))
    }
}

impl<const COUNT: usize> CLTyped for [u8; COUNT] {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::ByteArray(COUNT as u32)
    }
}

impl<T: CLTyped, E: CLTyped> CLTyped for Result<T, E> {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::Result {
            ok: Box::new(T::cl_type()),
            err: Box::new(E::cl_type()),
        }
    }
}

impl<K: CLTyped, V: CLTyped> CLTyped for BTreeMap<K, V> {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::Map {
            key: Box::new(K::cl_type()),
            value: Box::new(V::cl_type()),
        }
    }
}

impl<T1: CLTyped> CLTyped for (T1,) {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::Tuple1([Box::new(T1::cl_type())])
    }
}

impl<T1: CLTyped, T2: CLTyped> CLTyped for (T1, T2) {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::Tuple2([Box::new(T1::cl_type()), Box::new(T2::cl_type())])
    }
}

impl<T1: CLTyped, T2: CLTyped, T3: CLTyped> CLTyped for (T1, T2, T3) {
    fn cl_type() -> CLTypeInfo {
        CLTypeInfo::Tuple3([
            Box::new(T1::cl_type()),
            Box::new(T2::cl_type()),
            Box::new(T3::cl_type()),
        ])
    }
}
