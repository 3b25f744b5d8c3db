//! Canonical binary encoding used on the wire for values, executables and deploys.

mod bytes;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
};

use casper_sdk_hashing::Digest;
use thiserror::Error;

pub use bytes::Bytes;

/// The number of bytes in a serialized `()`.
pub const UNIT_SERIALIZED_LENGTH: usize = 0;
/// The number of bytes in a serialized `bool`.
pub const BOOL_SERIALIZED_LENGTH: usize = 1;
/// The number of bytes in a serialized `i32`.
pub const I32_SERIALIZED_LENGTH: usize = std::mem::size_of::<i32>();
/// The number of bytes in a serialized `i64`.
pub const I64_SERIALIZED_LENGTH: usize = std::mem::size_of::<i64>();
/// The number of bytes in a serialized `u8`.
pub const U8_SERIALIZED_LENGTH: usize = std::mem::size_of::<u8>();
/// The number of bytes in a serialized `u32`.
pub const U32_SERIALIZED_LENGTH: usize = std::mem::size_of::<u32>();
/// The number of bytes in a serialized `u64`.
pub const U64_SERIALIZED_LENGTH: usize = std::mem::size_of::<u64>();
/// The number of bytes in a serialized option flag.
pub const OPTION_TAG_SERIALIZED_LENGTH: usize = 1;
/// The number of bytes in a serialized result flag.
pub const RESULT_TAG_SERIALIZED_LENGTH: usize = 1;

const OPTION_NONE_TAG: u8 = 0;
const OPTION_SOME_TAG: u8 = 1;
const RESULT_ERR_TAG: u8 = 0;
const RESULT_OK_TAG: u8 = 1;

/// Serialization and deserialization errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Early end of stream while deserializing.
    #[error("deserialization error: early end of stream")]
    EarlyEndOfStream,
    /// Formatting error while deserializing.
    #[error("deserialization error: formatting")]
    Formatting,
    /// Not all input bytes were consumed in [`deserialize`].
    #[error("deserialization error: left-over bytes")]
    LeftOverBytes,
    /// Out of memory error.
    #[error("serialization error: out of memory")]
    OutOfMemory,
    /// The value cannot be represented in the target encoding.
    #[error("serialization error: value not representable")]
    NotRepresentable,
    /// Type descriptor nesting went deeper than the permitted limit.
    #[error("deserialization error: exceeded recursion depth")]
    ExceededRecursionDepth,
}

/// A type which can be serialized to a `Vec<u8>`.
pub trait ToBytes {
    /// Serializes `&self` to a `Vec<u8>`.
    fn to_bytes(&self) -> Result<Vec<u8>, Error>;

    /// Consumes `self` and serializes to a `Vec<u8>`.
    fn into_bytes(self) -> Result<Vec<u8>, Error>
    where
        Self: Sized,
    {
        self.to_bytes()
    }

    /// Returns the length of the `Vec<u8>` which would be returned from a successful call to
    /// `to_bytes()` or `into_bytes()`.  The data is not actually serialized, so this call is
    /// relatively cheap.
    fn serialized_length(&self) -> usize;

    /// Writes `&self` into a mutable `writer`.
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.extend(self.to_bytes()?);
        Ok(())
    }
}

/// A type which can be deserialized from a `Vec<u8>`.
pub trait FromBytes: Sized {
    /// Deserializes the slice into `Self`.
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error>;

    /// Deserializes the `Vec<u8>` into `Self`.
    fn from_vec(bytes: Vec<u8>) -> Result<(Self, Vec<u8>), Error> {
        Self::from_bytes(bytes.as_slice()).map(|(x, remainder)| (x, Vec::from(remainder)))
    }
}

/// Returns a `Vec<u8>` initialized with sufficient capacity to hold `to_be_serialized` after
/// serialization, or an error if the capacity would exceed `u32::MAX`.
pub fn allocate_buffer<T: ToBytes>(to_be_serialized: &T) -> Result<Vec<u8>, Error> {
    let serialized_length = to_be_serialized.serialized_length();
    if serialized_length > u32::MAX as usize {
        return Err(Error::OutOfMemory);
    }
    Ok(Vec::with_capacity(serialized_length))
}

/// Serializes `t` into a `Vec<u8>`.
pub fn serialize(t: impl ToBytes) -> Result<Vec<u8>, Error> {
    t.into_bytes()
}

/// Deserializes `bytes` into an instance of `T`.
///
/// Returns an error if the bytes cannot be deserialized into `T` or if not all of the input bytes
/// are consumed in the operation.
pub fn deserialize<T: FromBytes>(bytes: Vec<u8>) -> Result<T, Error> {
    let (t, remainder) = T::from_bytes(&bytes)?;
    if remainder.is_empty() {
        Ok(t)
    } else {
        Err(Error::LeftOverBytes)
    }
}

/// Deserializes a slice of bytes into an instance of `T`.
///
/// Returns an error if the bytes cannot be deserialized into `T` or if not all of the input bytes
/// are consumed in the operation.
pub fn deserialize_from_slice<I: AsRef<[u8]>, O: FromBytes>(bytes: I) -> Result<O, Error> {
    let (t, remainder) = O::from_bytes(bytes.as_ref())?;
    if remainder.is_empty() {
        Ok(t)
    } else {
        Err(Error::LeftOverBytes)
    }
}

/// Returns a tuple of the first `n` bytes and the remainder, or an error if fewer than `n` bytes
/// are available.
pub fn safe_split_at(bytes: &[u8], n: usize) -> Result<(&[u8], &[u8]), Error> {
    if n > bytes.len() {
        Err(Error::EarlyEndOfStream)
    } else {
        Ok(bytes.split_at(n))
    }
}

/// Writes `bytes` with a `u32` length prefix.
pub(crate) fn write_u8_slice(bytes: &[u8], writer: &mut Vec<u8>) -> Result<(), Error> {
    let length = u32::try_from(bytes.len()).map_err(|_| Error::NotRepresentable)?;
    writer.extend_from_slice(&length.to_le_bytes());
    writer.extend_from_slice(bytes);
    Ok(())
}

/// Reads a `u32` length-prefixed run of bytes.
pub(crate) fn read_u8_slice(bytes: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let (length, remainder) = u32::from_bytes(bytes)?;
    safe_split_at(remainder, length as usize)
}

/// Reads a `u32` element count, rejecting counts larger than the remaining input.
pub(crate) fn read_count(bytes: &[u8]) -> Result<(usize, &[u8]), Error> {
    let (count, remainder) = u32::from_bytes(bytes)?;
    let count = count as usize;
    if count > remainder.len() {
        return Err(Error::EarlyEndOfStream);
    }
    Ok((count, remainder))
}

impl ToBytes for bool {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        u8::from(*self).to_bytes()
    }

    fn serialized_length(&self) -> usize {
        BOOL_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.push(u8::from(*self));
        Ok(())
    }
}

impl FromBytes for bool {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        match bytes.split_first() {
            None => Err(Error::EarlyEndOfStream),
            Some((byte, rem)) => match byte {
                1 => Ok((true, rem)),
                0 => Ok((false, rem)),
                _ => Err(Error::Formatting),
            },
        }
    }
}

impl ToBytes for u8 {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(vec![*self])
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.push(*self);
        Ok(())
    }
}

impl FromBytes for u8 {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        match bytes.split_first() {
            None => Err(Error::EarlyEndOfStream),
            Some((byte, rem)) => Ok((*byte, rem)),
        }
    }
}

macro_rules! impl_to_from_bytes_for_integer {
    ($type:ty, $length:expr) => {
        impl ToBytes for $type {
            fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                Ok(self.to_le_bytes().to_vec())
            }

            fn serialized_length(&self) -> usize {
                $length
            }

            fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
                writer.extend_from_slice(&self.to_le_bytes());
                Ok(())
            }
        }

        impl FromBytes for $type {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
                let mut result = [0u8; $length];
                let (bytes, remainder) = safe_split_at(bytes, $length)?;
                result.copy_from_slice(bytes);
                Ok((<$type>::from_le_bytes(result), remainder))
            }
        }
    };
}

impl_to_from_bytes_for_integer!(i32, I32_SERIALIZED_LENGTH);
impl_to_from_bytes_for_integer!(i64, I64_SERIALIZED_LENGTH);
impl_to_from_bytes_for_integer!(u32, U32_SERIALIZED_LENGTH);
impl_to_from_bytes_for_integer!(u64, U64_SERIALIZED_LENGTH);

impl ToBytes for () {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(Vec::new())
    }

    fn serialized_length(&self) -> usize {
        UNIT_SERIALIZED_LENGTH
    }
}

impl FromBytes for () {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        Ok(((), bytes))
    }
}

impl ToBytes for str {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buffer = Vec::with_capacity(self.serialized_length());
        write_u8_slice(self.as_bytes(), &mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH + self.len()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        write_u8_slice(self.as_bytes(), writer)
    }
}

impl ToBytes for &str {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        (*self).to_bytes()
    }

    fn serialized_length(&self) -> usize {
        (*self).serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        (*self).write_bytes(writer)
    }
}

impl ToBytes for String {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.as_str().to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.as_str().serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        self.as_str().write_bytes(writer)
    }
}

impl FromBytes for String {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (str_bytes, remainder) = read_u8_slice(bytes)?;
        let result = String::from_utf8(str_bytes.to_vec()).map_err(|_| Error::Formatting)?;
        Ok((result, remainder))
    }
}

impl<T: ToBytes> ToBytes for Vec<T> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH + self.iter().map(ToBytes::serialized_length).sum::<usize>()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        let length = u32::try_from(self.len()).map_err(|_| Error::NotRepresentable)?;
        length.write_bytes(writer)?;
        for item in self.iter() {
            item.write_bytes(writer)?;
        }
        Ok(())
    }
}

impl<T: FromBytes> FromBytes for Vec<T> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (count, mut stream) = read_count(bytes)?;
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            let (value, remainder) = T::from_bytes(stream)?;
            result.push(value);
            stream = remainder;
        }
        Ok((result, stream))
    }
}

impl<const COUNT: usize> ToBytes for [u8; COUNT] {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(self.to_vec())
    }

    fn serialized_length(&self) -> usize {
        COUNT
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.extend_from_slice(self);
        Ok(())
    }
}

impl<const COUNT: usize> FromBytes for [u8; COUNT] {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (bytes, remainder) = safe_split_at(bytes, COUNT)?;
        let mut result = [0u8; COUNT];
        result.copy_from_slice(bytes);
        Ok((result, remainder))
    }
}

impl ToBytes for Digest {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.value().to_bytes()
    }

    fn serialized_length(&self) -> usize {
        Digest::LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        writer.extend_from_slice(self.as_ref());
        Ok(())
    }
}

impl FromBytes for Digest {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        <[u8; Digest::LENGTH]>::from_bytes(bytes)
            .map(|(inner, remainder)| (Digest::from(inner), remainder))
    }
}

impl<T: ToBytes> ToBytes for Option<T> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        OPTION_TAG_SERIALIZED_LENGTH
            + match self {
                Some(v) => v.serialized_length(),
                None => 0,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        match self {
            None => writer.push(OPTION_NONE_TAG),
            Some(v) => {
                writer.push(OPTION_SOME_TAG);
                v.write_bytes(writer)?;
            }
        }
        Ok(())
    }
}

impl<T: FromBytes> FromBytes for Option<T> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (tag, rem) = u8::from_bytes(bytes)?;
        match tag {
            OPTION_NONE_TAG => Ok((None, rem)),
            OPTION_SOME_TAG => {
                let (t, rem) = T::from_bytes(rem)?;
                Ok((Some(t), rem))
            }
            _ => Err(Error::Formatting),
        }
    }
}

impl<T: ToBytes, E: ToBytes> ToBytes for Result<T, E> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        RESULT_TAG_SERIALIZED_LENGTH
            + match self {
                Ok(ok) => ok.serialized_length(),
                Err(error) => error.serialized_length(),
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        match self {
            Err(error) => {
                writer.push(RESULT_ERR_TAG);
                error.write_bytes(writer)?;
            }
            Ok(result) => {
                writer.push(RESULT_OK_TAG);
                result.write_bytes(writer)?;
            }
        }
        Ok(())
    }
}

impl<T: FromBytes, E: FromBytes> FromBytes for Result<T, E> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (variant, rem) = u8::from_bytes(bytes)?;
        match variant {
            RESULT_ERR_TAG => {
                let (value, rem) = E::from_bytes(rem)?;
                Ok((Err(value), rem))
            }
            RESULT_OK_TAG => {
                let (value, rem) = T::from_bytes(rem)?;
                Ok((Ok(value), rem))
            }
            _ => Err(Error::Formatting),
        }
    }
}

impl<K: ToBytes, V: ToBytes> ToBytes for BTreeMap<K, V> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH
            + self
                .iter()
                .map(|(key, value)| key.serialized_length() + value.serialized_length())
                .sum::<usize>()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        let length = u32::try_from(self.len()).map_err(|_| Error::NotRepresentable)?;
        length.write_bytes(writer)?;
        for (key, value) in self.iter() {
            key.write_bytes(writer)?;
            value.write_bytes(writer)?;
        }
        Ok(())
    }
}

impl<K: FromBytes + Ord, V: FromBytes> FromBytes for BTreeMap<K, V> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (count, mut stream) = read_count(bytes)?;
        let mut result = BTreeMap::new();
        for _ in 0..count {
            let (key, rem) = K::from_bytes(stream)?;
            let (value, rem) = V::from_bytes(rem)?;
            result.insert(key, value);
            stream = rem;
        }
        Ok((result, stream))
    }
}

impl<T: ToBytes> ToBytes for BTreeSet<T> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U32_SERIALIZED_LENGTH + self.iter().map(ToBytes::serialized_length).sum::<usize>()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), Error> {
        let length = u32::try_from(self.len()).map_err(|_| Error::NotRepresentable)?;
        length.write_bytes(writer)?;
        for value in self.iter() {
            value.write_bytes(writer)?;
        }
        Ok(())
    }
}

impl<T: FromBytes + Ord> FromBytes for BTreeSet<T> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (count, mut stream) = read_count(bytes)?;
        let mut result = BTreeSet::new();
        for _ in 0..count {
            let (value, remainder) = T::from_bytes(stream)?;
            result.insert(value);
            stream = remainder;
        }
        Ok((result, stream))
    }
}

impl<T1: ToBytes> ToBytes for (T1,) {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }
}

impl<T1: FromBytes> FromBytes for (T1,) {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (t1, remainder) = T1::from_bytes(bytes)?;
        Ok(((t1,), remainder))
    }
}

impl<T1: ToBytes, T2: ToBytes> ToBytes for (T1, T2) {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.0.write_bytes(&mut result)?;
        self.1.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length() + self.1.serialized_length()
    }
}

impl<T1: FromBytes, T2: FromBytes> FromBytes for (T1, T2) {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (t1, remainder) = T1::from_bytes(bytes)?;
        let (t2, remainder) = T2::from_bytes(remainder)?;
        Ok(((t1, t2), remainder))
    }
}

impl<T1: ToBytes, T2: ToBytes, T3: ToBytes> ToBytes for (T1, T2, T3) {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = allocate_buffer(self)?;
        self.0.write_bytes(&mut result)?;
        self.1.write_bytes(&mut result)?;
        self.2.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length() + self.1.serialized_length() + self.2.serialized_length()
    }
}

impl<T1: FromBytes, T2: FromBytes, T3: FromBytes> FromBytes for (T1, T2, T3) {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (t1, remainder) = T1::from_bytes(bytes)?;
        let (t2, remainder) = T2::from_bytes(remainder)?;
        let (t3, remainder) = T3::from_bytes(remainder)?;
        Ok(((t1, t2, t3), remainder))
    }
}

/// Asserts that `t` can be serialized and when deserialized back into an instance `T` compares
/// equal to `t`.
///
/// Also asserts that `t.serialized_length()` is the same as the actual number of bytes of the
/// serialized `t` instance.
#[cfg(any(feature = "testing", test))]
#[track_caller]
pub fn test_serialization_roundtrip<T>(t: &T)
where
    T: Debug + ToBytes + FromBytes + PartialEq,
{
    let serialized = ToBytes::to_bytes(t).expect("Unable to serialize data");
    assert_eq!(
        serialized.len(),
        t.serialized_length(),
        "\nLength of serialized data: {},\nserialized_length() yielded: {},\nserialized data: {:?}, t is {:?}",
        serialized.len(),
        t.serialized_length(),
        serialized,
        t
    );
    let mut written_bytes = vec![];
    t.write_bytes(&mut written_bytes)
        .expect("Unable to serialize data via write_bytes");
    assert_eq!(serialized, written_bytes);

    let deserialized = deserialize::<T>(serialized).expect("Unable to deserialize data");
    assert_eq!(*t, deserialized);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_deserialize_vec_with_huge_count() {
        let serialized = u32::MAX.to_bytes().unwrap();
        let result: Result<Vec<u32>, Error> = deserialize(serialized);
        assert_eq!(result, Err(Error::EarlyEndOfStream));
    }

    #[test]
    fn digest_should_encode_as_bare_bytes() {
        let digest = Digest::hash(b"payment");
        let bytes = digest.to_bytes().unwrap();
        assert_eq!(bytes.as_slice(), digest.as_ref());
        assert_eq!(bytes.len(), digest.serialized_length());
        let mut written = vec![0xff];
        digest.write_bytes(&mut written).unwrap();
        assert_eq!(&written[1..], digest.as_ref());
        test_serialization_roundtrip(&digest);
        assert_eq!(
            Digest::from_bytes(&bytes[..31]).unwrap_err(),
            Error::EarlyEndOfStream
        );
    }

    #[test]
    fn should_fail_on_left_over_bytes() {
        let mut serialized = 7u32.to_bytes().unwrap();
        serialized.push(0);
        assert_eq!(deserialize::<u32>(serialized), Err(Error::LeftOverBytes));
    }

    #[test]
    fn should_reject_invalid_bool() {
        assert_eq!(bool::from_bytes(&[2]), Err(Error::Formatting));
        assert_eq!(bool::from_bytes(&[]), Err(Error::EarlyEndOfStream));
    }

    #[test]
    fn should_encode_integers_little_endian() {
        assert_eq!(999u64.to_bytes().unwrap(), vec![0xe7, 0x03, 0, 0, 0, 0, 0, 0]);
        assert_eq!((-1i32).to_bytes().unwrap(), vec![0xff; 4]);
        assert_eq!(7u32.to_bytes().unwrap(), vec![7, 0, 0, 0]);
    }

    #[test]
    fn should_encode_string_with_length_prefix() {
        assert_eq!(
            "mainnet".to_bytes().unwrap(),
            base16::decode("070000006d61696e6e6574").unwrap()
        );
        assert_eq!(String::from_bytes(&[1, 0, 0, 0, 0xff]), Err(Error::Formatting));
    }

    #[test]
    fn should_encode_tuples_without_prefix() {
        let tuple = (1u8, String::from("a"), true);
        assert_eq!(tuple.to_bytes().unwrap(), vec![1, 1, 0, 0, 0, b'a', 1]);
        test_serialization_roundtrip(&tuple);
    }

    #[test]
    fn should_roundtrip_collections() {
        test_serialization_roundtrip(&vec![1u64, 2, 3]);
        test_serialization_roundtrip(&Some(5i64));
        test_serialization_roundtrip(&Option::<u32>::None);
        test_serialization_roundtrip(&Result::<u8, String>::Ok(3));
        test_serialization_roundtrip(&Result::<u8, String>::Err("nope".to_string()));
        let mut map = BTreeMap::new();
        map.insert("one".to_string(), 1u32);
        map.insert("two".to_string(), 2u32);
        test_serialization_roundtrip(&map);
        test_serialization_roundtrip(&[7u8; 32]);
    }

    #[test]
    fn option_and_result_tags() {
        assert_eq!(Some(1u8).to_bytes().unwrap(), vec![1, 1]);
        assert_eq!(Option::<u8>::None.to_bytes().unwrap(), vec![0]);
        assert_eq!(Result::<u8, u8>::Ok(9).to_bytes().unwrap(), vec![1, 9]);
        assert_eq!(Result::<u8, u8>::Err(9).to_bytes().unwrap(), vec![0, 9]);
        assert_eq!(Option::<u8>::from_bytes(&[2]), Err(Error::Formatting));
    }
}
