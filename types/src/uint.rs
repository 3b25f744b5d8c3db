//! Wide unsigned integers encoded with a length byte followed by their significant little-endian
//! bytes.

// `construct_uint!` expands to code which trips these lints.
#![allow(clippy::assign_op_pattern, clippy::ptr_offset_with_cast, clippy::manual_range_contains)]

use std::fmt::{self, Formatter};

use serde::{
    de::{self, Deserialize, Deserializer, Visitor},
    ser::{Serialize, Serializer},
};

use crate::bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

uint::construct_uint! {
    /// 512-bit unsigned integer.
    pub struct U512(8);
}

uint::construct_uint! {
    /// 256-bit unsigned integer.
    pub struct U256(4);
}

uint::construct_uint! {
    /// 128-bit unsigned integer.
    pub struct U128(2);
}

macro_rules! impl_traits_for_uint {
    ($type:ident, $total_bytes:expr, $test_mod:ident) => {
        impl ToBytes for $type {
            fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
                let mut buf = [0u8; $total_bytes];
                self.to_little_endian(&mut buf);
                let mut non_zero_bytes: Vec<u8> =
                    buf.iter().rev().skip_while(|b| **b == 0).cloned().collect();
                let num_bytes = non_zero_bytes.len() as u8;
                non_zero_bytes.push(num_bytes);
                non_zero_bytes.reverse();
                Ok(non_zero_bytes)
            }

            fn serialized_length(&self) -> usize {
                let num_bytes = (self.bits() + 7) / 8;
                U8_SERIALIZED_LENGTH + num_bytes
            }
        }

        impl FromBytes for $type {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
                let (num_bytes, rem): (u8, &[u8]) = FromBytes::from_bytes(bytes)?;

                if num_bytes > $total_bytes {
                    Err(bytesrepr::Error::Formatting)
                } else {
                    let (value, rem) = bytesrepr::safe_split_at(rem, num_bytes as usize)?;
                    let result = $type::from_little_endian(value);
                    Ok((result, rem))
                }
            }
        }

        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    self.to_string().serialize(serializer)
                } else {
                    let mut buffer = [0u8; $total_bytes];
                    self.to_little_endian(&mut buffer);
                    serializer.serialize_bytes(&buffer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct DecimalVisitor;

                impl<'de> Visitor<'de> for DecimalVisitor {
                    type Value = $type;

                    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                        formatter.write_str("a decimal string or an unsigned integer")
                    }

                    fn visit_str<E: de::Error>(self, value: &str) -> Result<$type, E> {
                        $type::from_dec_str(value).map_err(E::custom)
                    }

                    fn visit_u64<E: de::Error>(self, value: u64) -> Result<$type, E> {
                        Ok($type::from(value))
                    }
                }

                if deserializer.is_human_readable() {
                    deserializer.deserialize_any(DecimalVisitor)
                } else {
                    let bytes = Vec::<u8>::deserialize(deserializer)?;
                    if bytes.len() > $total_bytes {
                        return Err(de::Error::invalid_length(bytes.len(), &DecimalVisitor));
                    }
                    Ok($type::from_little_endian(&bytes))
                }
            }
        }

        #[cfg(test)]
        mod $test_mod {
            use super::*;

            #[test]
            fn zero_should_encode_as_single_byte() {
                assert_eq!($type::zero().to_bytes().unwrap(), vec![0]);
                assert_eq!($type::zero().serialized_length(), 1);
            }

            #[test]
            fn max_should_roundtrip() {
                bytesrepr::test_serialization_roundtrip(&$type::MAX);
                bytesrepr::test_serialization_roundtrip(&$type::from(u64::MAX));
            }

            #[test]
            fn should_reject_oversized_length() {
                let mut bytes = vec![$total_bytes as u8 + 1];
                bytes.extend(vec![1u8; $total_bytes + 1]);
                assert_eq!(
                    $type::from_bytes(&bytes).unwrap_err(),
                    bytesrepr::Error::Formatting
                );
            }

            #[test]
            fn json_should_be_decimal_string() {
                let value = $type::from(1_000_000_000u64);
                let json = serde_json::to_string(&value).unwrap();
                assert_eq!(json, "\"1000000000\"");
                let decoded: $type = serde_json::from_str(&json).unwrap();
                assert_eq!(decoded, value);
            }
        }
    };
}

impl_traits_for_uint!(U128, 16, u128_test);
impl_traits_for_uint!(U256, 32, u256_test);
impl_traits_for_uint!(U512, 64, u512_test);

impl From<U128> for U512 {
    fn from(value: U128) -> Self {
        let mut buffer = [0u8; 16];
        value.to_little_endian(&mut buffer);
        U512::from_little_endian(&buffer)
    }
}

impl From<U256> for U512 {
    fn from(value: U256) -> Self {
        let mut buffer = [0u8; 32];
        value.to_little_endian(&mut buffer);
        U512::from_little_endian(&buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of<T: ToBytes>(value: T) -> String {
        base16::encode_lower(&value.to_bytes().unwrap())
    }

    #[test]
    fn should_encode_amounts_like_the_network() {
        assert_eq!(hex_of(U512::from(1_000_000_000u64)), "0400ca9a3b");
        assert_eq!(hex_of(U512::from(24_500_000_000u64)), "05005550b405");
        assert_eq!(hex_of(U512::from(1_000_000u64)), "0340420f");
        assert_eq!(hex_of(U128::from(1u64)), "0101");
        assert_eq!(hex_of(U256::from(256u64)), "020001");
    }

    #[test]
    fn should_decode_non_minimal_encoding() {
        let (value, rem) = U512::from_bytes(&[2, 7, 0]).unwrap();
        assert_eq!(value, U512::from(7));
        assert!(rem.is_empty());
    }

    #[test]
    fn should_widen_into_u512() {
        assert_eq!(
            U512::from(U128::MAX),
            U512::from_dec_str("340282366920938463463374607431768211455").unwrap()
        );
        assert_eq!(U512::from(U256::from(42)), U512::from(42));
    }

    #[test]
    fn should_reject_non_decimal_text() {
        assert!(U512::from_dec_str("12x").is_err());
        assert!(serde_json::from_str::<U512>("\"0x10\"").is_err());
    }
}
