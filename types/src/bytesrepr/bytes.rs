use std::{
    fmt::{self, Debug, Formatter},
    ops::Deref,
};

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use super::{read_u8_slice, write_u8_slice, Error, FromBytes, ToBytes, U32_SERIALIZED_LENGTH};
use crate::{
    byte_utils,
    cl_type::{CLTypeInfo, CLTyped},
};

/// An owned run of bytes such as a CLValue payload or Wasm module.
///
/// Encoded like `Vec<u8>` (a `u32` count then the bytes) but rendered as hex in JSON.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Default, Hash)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    /// An empty run.
    pub fn new() -> Bytes {
        Bytes::default()
    }

    /// The underlying vector.
    #[inline]
    pub fn inner_bytes(&self) -> &Vec<u8> {
        &self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(vec: Vec<u8>) -> Self {
        Bytes(vec)
    }
}

impl From<&[u8]> for Bytes {
    fn from(slice: &[u8]) -> Self {
        Bytes(slice.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

impl CLTyped for Bytes {
    fn cl_type() -> CLTypeInfo {
        Vec::<u8>::cl_type()
    }
}

impl Debug for Bytes {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Bytes({})", byte_utils::encode_hex(&self.0))
    }
}

impl ToBytes for Bytes {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buffer = super::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH + self.0.len()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        write_u8_slice(&self.0, writer)
    }
}

impl FromBytes for Bytes {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (contents, remainder) = read_u8_slice(bytes)?;
        Ok((Bytes::from(contents), remainder))
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&byte_utils::encode_hex(&self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let contents = if deserializer.is_human_readable() {
            let hex = String::deserialize(deserializer)?;
            byte_utils::decode_hex(&hex).map_err(SerdeError::custom)?
        } else {
            Vec::<u8>::deserialize(deserializer)?
        };
        Ok(Bytes(contents))
    }
}
