//! Native values and the type-keyed codec which maps them to and from canonical bytes.

use std::convert::TryFrom;

use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    cl_type::{CLType, CLTypeInfo},
    Error, Key, PublicKey, URef, U128, U256, U512,
};

const OPTION_NONE_TAG: u8 = 0;
const OPTION_SOME_TAG: u8 = 1;
const RESULT_ERR_TAG: u8 = 0;
const RESULT_OK_TAG: u8 = 1;

/// A decoded value.  The shape mirrors [`CLTypeInfo`]; the type itself is held alongside, never
/// inferred from the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeValue {
    /// `bool` value.
    Bool(bool),
    /// `i32` value.
    I32(i32),
    /// `i64` value.
    I64(i64),
    /// `u8` value.
    U8(u8),
    /// `u32` value.
    U32(u32),
    /// `u64` value.
    U64(u64),
    /// [`U128`] value.
    U128(U128),
    /// [`U256`] value.
    U256(U256),
    /// [`U512`] value.
    U512(U512),
    /// `()` value.
    Unit,
    /// `String` value.
    String(String),
    /// [`Key`] value.
    Key(Key),
    /// [`URef`] value.
    URef(URef),
    /// [`PublicKey`] value.
    PublicKey(PublicKey),
    /// Optional value.
    Option(Option<Box<NativeValue>>),
    /// Homogeneous list.
    List(Vec<NativeValue>),
    /// Fixed-length run of bytes.
    ByteArray(Vec<u8>),
    /// Either an `Ok` or an `Err` value.
    Result(Result<Box<NativeValue>, Box<NativeValue>>),
    /// Map entries in wire order.
    Map(Vec<(NativeValue, NativeValue)>),
    /// Elements of a `Tuple1`, `Tuple2` or `Tuple3`.
    Tuple(Vec<NativeValue>),
}

impl NativeValue {
    /// A short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::Bool(_) => "Bool",
            NativeValue::I32(_) => "I32",
            NativeValue::I64(_) => "I64",
            NativeValue::U8(_) => "U8",
            NativeValue::U32(_) => "U32",
            NativeValue::U64(_) => "U64",
            NativeValue::U128(_) => "U128",
            NativeValue::U256(_) => "U256",
            NativeValue::U512(_) => "U512",
            NativeValue::Unit => "Unit",
            NativeValue::String(_) => "String",
            NativeValue::Key(_) => "Key",
            NativeValue::URef(_) => "URef",
            NativeValue::PublicKey(_) => "PublicKey",
            NativeValue::Option(_) => "Option",
            NativeValue::List(_) => "List",
            NativeValue::ByteArray(_) => "ByteArray",
            NativeValue::Result(_) => "Result",
            NativeValue::Map(_) => "Map",
            NativeValue::Tuple(_) => "Tuple",
        }
    }

    /// Encodes `self` as a value of type `cl_type`.
    pub fn to_bytes_as(&self, cl_type: &CLTypeInfo) -> Result<Vec<u8>, Error> {
        let mut buffer = Vec::new();
        self.write_bytes_as(cl_type, &mut buffer)?;
        Ok(buffer)
    }

    /// Appends the encoding of `self` as a value of type `cl_type` to `writer`.
    ///
    /// Fails with [`Error::MalformedValue`] if the value does not have the shape of `cl_type`, and
    /// with [`Error::UnsupportedType`] if `cl_type` is or contains `Any`.
    pub fn write_bytes_as(&self, cl_type: &CLTypeInfo, writer: &mut Vec<u8>) -> Result<(), Error> {
        match (cl_type, self) {
            (CLTypeInfo::Any, _) => return Err(Error::UnsupportedType(CLType::Any)),
            (CLTypeInfo::Bool, NativeValue::Bool(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::I32, NativeValue::I32(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::I64, NativeValue::I64(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::U8, NativeValue::U8(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::U32, NativeValue::U32(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::U64, NativeValue::U64(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::U128, NativeValue::U128(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::U256, NativeValue::U256(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::U512, NativeValue::U512(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::Unit, NativeValue::Unit) => {}
            (CLTypeInfo::String, NativeValue::String(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::Key, NativeValue::Key(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::URef, NativeValue::URef(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::PublicKey, NativeValue::PublicKey(value)) => value.write_bytes(writer)?,
            (CLTypeInfo::Option(inner_type), NativeValue::Option(value)) => match value {
                None => writer.push(OPTION_NONE_TAG),
                Some(inner) => {
                    writer.push(OPTION_SOME_TAG);
                    inner.write_bytes_as(inner_type, writer)?;
                }
            },
            (CLTypeInfo::List(element_type), NativeValue::List(elements)) => {
                write_count(elements.len(), writer)?;
                for element in elements {
                    element.write_bytes_as(element_type, writer)?;
                }
            }
            (CLTypeInfo::ByteArray(length), NativeValue::ByteArray(bytes)) => {
                if bytes.len() != *length as usize {
                    return Err(Error::MalformedValue(format!(
                        "expected {} bytes for ByteArray, got {}",
                        length,
                        bytes.len()
                    )));
                }
                writer.extend_from_slice(bytes);
            }
            (CLTypeInfo::Result { ok, err }, NativeValue::Result(value)) => match value {
                Ok(inner) => {
                    writer.push(RESULT_OK_TAG);
                    inner.write_bytes_as(ok, writer)?;
                }
                Err(inner) => {
                    writer.push(RESULT_ERR_TAG);
                    inner.write_bytes_as(err, writer)?;
                }
            },
            (CLTypeInfo::Map { key, value }, NativeValue::Map(entries)) => {
                write_count(entries.len(), writer)?;
                for (entry_key, entry_value) in entries {
                    entry_key.write_bytes_as(key, writer)?;
                    entry_value.write_bytes_as(value, writer)?;
                }
            }
            (CLTypeInfo::Tuple1(types), NativeValue::Tuple(elements)) => {
                write_tuple(types, elements, writer)?
            }
            (CLTypeInfo::Tuple2(types), NativeValue::Tuple(elements)) => {
                write_tuple(types, elements, writer)?
            }
            (CLTypeInfo::Tuple3(types), NativeValue::Tuple(elements)) => {
                write_tuple(types, elements, writer)?
            }
            (cl_type, value) => {
                return Err(Error::MalformedValue(format!(
                    "expected a {} value, got {}",
                    cl_type,
                    value.kind()
                )))
            }
        }
        Ok(())
    }

    /// Decodes a single value of type `cl_type` from the front of `bytes`.
    ///
    /// `Any` cannot be decoded and yields [`bytesrepr::Error::NotRepresentable`].
    pub fn from_bytes_as<'a>(
        cl_type: &CLTypeInfo,
        bytes: &'a [u8],
    ) -> Result<(NativeValue, &'a [u8]), bytesrepr::Error> {
        fn read<'a, T: FromBytes>(
            bytes: &'a [u8],
            wrap: fn(T) -> NativeValue,
        ) -> Result<(NativeValue, &'a [u8]), bytesrepr::Error> {
            let (value, remainder) = T::from_bytes(bytes)?;
            Ok((wrap(value), remainder))
        }

        match cl_type {
            CLTypeInfo::Any => Err(bytesrepr::Error::NotRepresentable),
            CLTypeInfo::Bool => read(bytes, NativeValue::Bool),
            CLTypeInfo::I32 => read(bytes, NativeValue::I32),
            CLTypeInfo::I64 => read(bytes, NativeValue::I64),
            CLTypeInfo::U8 => read(bytes, NativeValue::U8),
            CLTypeInfo::U32 => read(bytes, NativeValue::U32),
            CLTypeInfo::U64 => read(bytes, NativeValue::U64),
            CLTypeInfo::U128 => read(bytes, NativeValue::U128),
            CLTypeInfo::U256 => read(bytes, NativeValue::U256),
            CLTypeInfo::U512 => read(bytes, NativeValue::U512),
            CLTypeInfo::Unit => Ok((NativeValue::Unit, bytes)),
            CLTypeInfo::String => read(bytes, NativeValue::String),
            CLTypeInfo::Key => read(bytes, NativeValue::Key),
            CLTypeInfo::URef => read(bytes, NativeValue::URef),
            CLTypeInfo::PublicKey => read(bytes, NativeValue::PublicKey),
            CLTypeInfo::Option(inner_type) => {
                let (tag, remainder) = u8::from_bytes(bytes)?;
                match tag {
                    OPTION_NONE_TAG => Ok((NativeValue::Option(None), remainder)),
                    OPTION_SOME_TAG => {
                        let (inner, remainder) = Self::from_bytes_as(inner_type, remainder)?;
                        Ok((NativeValue::Option(Some(Box::new(inner))), remainder))
                    }
                    _ => Err(bytesrepr::Error::Formatting),
                }
            }
            CLTypeInfo::List(element_type) => {
                let (count, mut remainder) = bytesrepr::read_count(bytes)?;
                let mut elements = Vec::with_capacity(count.min(remainder.len()));
                for _ in 0..count {
                    let (element, rem) = Self::from_bytes_as(element_type, remainder)?;
                    elements.push(element);
                    remainder = rem;
                }
                Ok((NativeValue::List(elements), remainder))
            }
            CLTypeInfo::ByteArray(length) => {
                let (array, remainder) = bytesrepr::safe_split_at(bytes, *length as usize)?;
                Ok((NativeValue::ByteArray(array.to_vec()), remainder))
            }
            CLTypeInfo::Result { ok, err } => {
                let (tag, remainder) = u8::from_bytes(bytes)?;
                match tag {
                    RESULT_OK_TAG => {
                        let (inner, remainder) = Self::from_bytes_as(ok, remainder)?;
                        Ok((NativeValue::Result(Ok(Box::new(inner))), remainder))
                    }
                    RESULT_ERR_TAG => {
                        let (inner, remainder) = Self::from_bytes_as(err, remainder)?;
                        Ok((NativeValue::Result(Err(Box::new(inner))), remainder))
                    }
                    _ => Err(bytesrepr::Error::Formatting),
                }
            }
            CLTypeInfo::Map { key, value } => {
                let (count, mut remainder) = bytesrepr::read_count(bytes)?;
                let mut entries = Vec::with_capacity(count.min(remainder.len()));
                for _ in 0..count {
                    let (entry_key, rem) = Self::from_bytes_as(key, remainder)?;
                    let (entry_value, rem) = Self::from_bytes_as(value, rem)?;
                    entries.push((entry_key, entry_value));
                    remainder = rem;
                }
                Ok((NativeValue::Map(entries), remainder))
            }
            CLTypeInfo::Tuple1(types) => read_tuple(types, bytes),
            CLTypeInfo::Tuple2(types) => read_tuple(types, bytes),
            CLTypeInfo::Tuple3(types) => read_tuple(types, bytes),
        }
    }
}

fn write_count(count: usize, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
    let count = u32::try_from(count).map_err(|_| bytesrepr::Error::NotRepresentable)?;
    count.write_bytes(writer)
}

fn write_tuple(
    types: &[Box<CLTypeInfo>],
    elements: &[NativeValue],
    writer: &mut Vec<u8>,
) -> Result<(), Error> {
    if types.len() != elements.len() {
        return Err(Error::MalformedValue(format!(
            "expected a tuple of {} elements, got {}",
            types.len(),
            elements.len()
        )));
    }
    for (element_type, element) in types.iter().zip(elements) {
        element.write_bytes_as(element_type, writer)?;
    }
    Ok(())
}

fn read_tuple<'a>(
    types: &[Box<CLTypeInfo>],
    bytes: &'a [u8],
) -> Result<(NativeValue, &'a [u8]), bytesrepr::Error> {
    let mut elements = Vec::with_capacity(types.len());
    let mut remainder = bytes;
    for element_type in types {
        let (element, rem) = NativeValue::from_bytes_as(element_type, remainder)?;
        elements.push(element);
        remainder = rem;
    }
    Ok((NativeValue::Tuple(elements), remainder))
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Bool(value)
    }
}

impl From<u64> for NativeValue {
    fn from(value: u64) -> Self {
        NativeValue::U64(value)
    }
}

impl From<U512> for NativeValue {
    fn from(value: U512) -> Self {
        NativeValue::U512(value)
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::String(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl From<Key> for NativeValue {
    fn from(value: Key) -> Self {
        NativeValue::Key(value)
    }
}

impl From<PublicKey> for NativeValue {
    fn from(value: PublicKey) -> Self {
        NativeValue::PublicKey(value)
    }
}
