//! The 32-byte identity of an account, derived from its public key.

use std::{
    convert::TryFrom,
    fmt::{self, Debug, Display, Formatter},
};

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    cl_type::{CLTypeInfo, CLTyped},
    crypto::AsymmetricType,
    Digest, PublicKey,
};

/// The number of bytes in an [`AccountHash`].
pub const ACCOUNT_HASH_LENGTH: usize = 32;

/// Prefix of the formatted form, `account-hash-<hex>`.
pub const ACCOUNT_HASH_FORMATTED_STRING_PREFIX: &str = "account-hash-";

/// Error while parsing `account-hash-<hex>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FromStrError {
    /// The text does not start with `account-hash-`.
    #[error("prefix is not '{}'", ACCOUNT_HASH_FORMATTED_STRING_PREFIX)]
    InvalidPrefix,
    /// The suffix is not hex.
    #[error("decode from hex: {0}")]
    Hex(#[from] base16::DecodeError),
    /// The suffix does not decode to 32 bytes.
    #[error("account hash must be {} bytes", ACCOUNT_HASH_LENGTH)]
    Hash,
}

/// Blake2b-256 of an account's public key, prefixed with the key's algorithm name.
///
/// Transfer targets are given as account hashes.
#[derive(Default, PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AccountHash([u8; ACCOUNT_HASH_LENGTH]);

impl AccountHash {
    /// Wraps already-derived hash bytes.
    pub const fn new(value: [u8; ACCOUNT_HASH_LENGTH]) -> AccountHash {
        AccountHash(value)
    }

    /// The hash bytes.
    pub fn value(&self) -> [u8; ACCOUNT_HASH_LENGTH] {
        self.0
    }

    /// Hashes `<algorithm name> || 0x00 || <raw public key>`, where the name is `ed25519` or
    /// `secp256k1`.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let raw_key = public_key.raw_bytes();
        let preimage: [&[u8]; 3] = [public_key.algorithm().name().as_bytes(), &[0], &raw_key];
        AccountHash(Digest::hash_parts(&preimage).value())
    }

    /// Renders as `account-hash-<lowercase hex>`.
    pub fn to_formatted_string(self) -> String {
        format!("{}{}", ACCOUNT_HASH_FORMATTED_STRING_PREFIX, self)
    }

    /// Parses the form produced by [`AccountHash::to_formatted_string`].
    pub fn from_formatted_str(input: &str) -> Result<Self, FromStrError> {
        let hex = input
            .strip_prefix(ACCOUNT_HASH_FORMATTED_STRING_PREFIX)
            .ok_or(FromStrError::InvalidPrefix)?;
        let decoded = base16::decode(hex)?;
        <[u8; ACCOUNT_HASH_LENGTH]>::try_from(decoded.as_slice())
            .map(AccountHash)
            .map_err(|_| FromStrError::Hash)
    }
}

impl From<&PublicKey> for AccountHash {
    fn from(public_key: &PublicKey) -> Self {
        AccountHash::from_public_key(public_key)
    }
}

impl Display for AccountHash {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str(&base16::encode_lower(&self.0))
    }
}

impl Debug for AccountHash {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "AccountHash({})", self)
    }
}

impl CLTyped for AccountHash {
    fn cl_type() -> CLTypeInfo {
        <[u8; ACCOUNT_HASH_LENGTH]>::cl_type()
    }
}

impl ToBytes for AccountHash {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        Ok(self.0.to_vec())
    }

    fn serialized_length(&self) -> usize {
        ACCOUNT_HASH_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.extend_from_slice(&self.0);
        Ok(())
    }
}

impl FromBytes for AccountHash {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        <[u8; ACCOUNT_HASH_LENGTH]>::from_bytes(bytes)
            .map(|(value, remainder)| (AccountHash(value), remainder))
    }
}

impl Serialize for AccountHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_formatted_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            AccountHash::from_formatted_str(&text).map_err(SerdeError::custom)
        } else {
            <[u8; ACCOUNT_HASH_LENGTH]>::deserialize(deserializer).map(AccountHash)
        }
    }
}

impl Distribution<AccountHash> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> AccountHash {
        AccountHash(rng.gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_derive_from_ed25519_key() {
        let public_key = PublicKey::from_hex(
            "017f747b67bd3fe63c2a736739dfe40156d622347346e70f68f51c178a75ce5537",
        )
        .unwrap();
        let expected = "24749ecb377e548d114538c2d5504d77645257e21b2b8ee430170c74ab3ddc6d";
        assert_eq!(public_key.to_account_hash().to_string(), expected);
        assert_eq!(AccountHash::from(&public_key).to_string(), expected);
    }

    #[test]
    fn should_parse_formatted_string() {
        let account_hash = AccountHash::new([3; ACCOUNT_HASH_LENGTH]);
        let formatted = account_hash.to_formatted_string();
        assert_eq!(formatted, format!("account-hash-{}", "03".repeat(32)));
        assert_eq!(
            AccountHash::from_formatted_str(&formatted).unwrap(),
            account_hash
        );

        assert!(matches!(
            AccountHash::from_formatted_str("hash-0303"),
            Err(FromStrError::InvalidPrefix)
        ));
        assert!(matches!(
            AccountHash::from_formatted_str("account-hash-0303"),
            Err(FromStrError::Hash)
        ));
        assert!(matches!(
            AccountHash::from_formatted_str("account-hash-0g"),
            Err(FromStrError::Hex(_))
        ));
    }

    #[test]
    fn should_encode_as_bare_bytes() {
        let account_hash = AccountHash::new([1; ACCOUNT_HASH_LENGTH]);
        assert_eq!(account_hash.to_bytes().unwrap(), vec![1; ACCOUNT_HASH_LENGTH]);
        assert_eq!(AccountHash::cl_type(), CLTypeInfo::ByteArray(32));
        bytesrepr::test_serialization_roundtrip(&account_hash);
    }

    #[test]
    fn json_should_be_formatted_string() {
        let account_hash = AccountHash::new([0xa1; ACCOUNT_HASH_LENGTH]);
        let json = serde_json::to_value(account_hash).unwrap();
        assert_eq!(json, serde_json::json!(account_hash.to_formatted_string()));
        assert_eq!(serde_json::from_value::<AccountHash>(json).unwrap(), account_hash);
    }
}
