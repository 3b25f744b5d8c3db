//! Blake2b-256 hashing for deploy headers, deploy bodies and account hashes.

mod error;

use std::{
    array::TryFromSliceError,
    convert::TryFrom,
    fmt::{self, Debug, Display, Formatter, LowerHex},
    str::FromStr,
};

use blake2::{
    digest::{Update, VariableOutput},
    VarBlake2b,
};
use hex_buffer_serde::{Hex, HexForm};
use serde::{Deserialize, Serialize};

pub use error::Error;

/// A 32-byte Blake2b digest, rendered as lowercase hex.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Digest(#[serde(with = "HexForm::<[u8; Digest::LENGTH]>")] [u8; Digest::LENGTH]);

impl Digest {
    /// The number of bytes in a digest.
    pub const LENGTH: usize = 32;

    /// Blake2b-256 of `data`.
    pub fn hash<T: AsRef<[u8]>>(data: T) -> Digest {
        Digest::hash_parts(&[data.as_ref()])
    }

    /// Blake2b-256 of the concatenation of `parts`.
    pub fn hash_parts(parts: &[&[u8]]) -> Digest {
        let mut hasher =
            VarBlake2b::new(Digest::LENGTH).expect("32 is a valid blake2b output length");
        for part in parts {
            hasher.update(part);
        }
        let mut digest = Digest::default();
        hasher.finalize_variable(|output| digest.0.copy_from_slice(output));
        digest
    }

    /// The digest bytes.
    pub fn value(self) -> [u8; Digest::LENGTH] {
        self.0
    }

    /// Parses exactly 64 hex characters, in either case.
    pub fn from_hex<T: AsRef<[u8]>>(hex_input: T) -> Result<Self, Error> {
        let hex_input = hex_input.as_ref();
        if hex_input.len() != Digest::LENGTH * 2 {
            return Err(Error::IncorrectLength {
                expected: Digest::LENGTH,
                actual: hex_input.len() / 2,
            });
        }
        let mut digest = Digest::default();
        hex::decode_to_slice(hex_input, &mut digest.0)?;
        Ok(digest)
    }
}

impl Display for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str(&base16::encode_lower(&self.0))
    }
}

impl Debug for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl LowerHex for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        if formatter.alternate() {
            formatter.write_str("0x")?;
        }
        Display::fmt(self, formatter)
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(input)
    }
}

impl From<[u8; Digest::LENGTH]> for Digest {
    fn from(bytes: [u8; Digest::LENGTH]) -> Self {
        Digest(bytes)
    }
}

impl From<Digest> for [u8; Digest::LENGTH] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Digest, Self::Error> {
        <[u8; Digest::LENGTH]>::try_from(slice).map(Digest)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn hex_roundtrip(bytes: [u8; Digest::LENGTH]) {
            let digest = Digest::from(bytes);
            prop_assert_eq!(digest.to_string().parse::<Digest>().unwrap(), digest);
            prop_assert_eq!(Digest::from_hex(digest.to_string().to_uppercase()).unwrap(), digest);
        }
    }

    #[test]
    fn should_match_blake2b_256_vectors() {
        let vectors: [(&[u8], &str); 2] = [
            (
                b"",
                "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8",
            ),
            (
                b"The quick brown fox jumps over the lazy dog",
                "01718cec35cd3d796dd00020e0bfecb473ad23457d063b75eff29c0ffa2e58a9",
            ),
        ];
        for (input, expected) in vectors {
            assert_eq!(Digest::hash(input).to_string(), expected);
        }
    }

    #[test]
    fn parts_should_hash_as_their_concatenation() {
        assert_eq!(
            Digest::hash_parts(&[&b"payment-bytes"[..], &b"session-bytes"[..]]),
            Digest::hash("payment-bytessession-bytes")
        );
        assert_eq!(Digest::hash_parts(&[]), Digest::hash(b""));
    }

    #[test]
    fn from_hex_should_check_length_then_digits() {
        assert_eq!(
            Digest::from_hex("ff".repeat(31)),
            Err(Error::IncorrectLength {
                expected: 32,
                actual: 31
            })
        );
        assert!(Digest::from_hex("f".repeat(65)).is_err());
        let mut bad_digit = "0".repeat(63);
        bad_digit.push('g');
        assert!(matches!(Digest::from_hex(bad_digit), Err(Error::Hex(_))));
    }

    #[test]
    fn errors_should_compare_by_cause() {
        let first = Digest::from_hex("0g".repeat(32)).unwrap_err();
        let second = Digest::from_hex("0g".repeat(32)).unwrap_err();
        assert_eq!(first, second);
        assert_ne!(first, Digest::from_hex("00").unwrap_err());
        assert_eq!(first.clone(), first);
    }

    #[test]
    fn should_format_as_lowercase_hex() {
        let digest = Digest::from([0xab; 32]);
        let hex = "ab".repeat(32);
        assert_eq!(digest.to_string(), hex);
        assert_eq!(format!("{:?}", digest), hex);
        assert_eq!(format!("{:#x}", digest), format!("0x{}", hex));
    }

    #[test]
    fn json_should_be_hex_string() {
        let digest = Digest::from([16; 32]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", "10".repeat(32)));
        assert_eq!(serde_json::from_str::<Digest>(&json).unwrap(), digest);
    }
}
