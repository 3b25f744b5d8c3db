//! Global state keys, as carried by `Key` values in deploy arguments.

use std::{
    collections::BTreeMap,
    convert::TryFrom,
    fmt::{self, Debug, Display, Formatter},
};

use hex_fmt::HexFmt;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{
    de::Error as SerdeError, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer,
};
use thiserror::Error;

use crate::{
    account_hash::{self, AccountHash},
    bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
    uref::{self, URef},
    Error as CrateError,
};

/// The number of bytes in every key address.
pub const KEY_ADDR_LENGTH: usize = 32;

/// The address of a [`Key::Hash`], [`Key::Transfer`] or [`Key::DeployInfo`].
pub type HashAddr = [u8; KEY_ADDR_LENGTH];

/// The discriminator of a [`Key`], held as the first byte of its binary encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum KeyType {
    /// An account, addressed by its [`AccountHash`].
    Account = 0,
    /// A contract or other hash-addressed entity.
    Hash = 1,
    /// An unforgeable reference.
    URef = 2,
    /// A transfer record.
    Transfer = 3,
    /// A deploy info record.
    DeployInfo = 4,
}

impl KeyType {
    const ALL: [KeyType; 5] = [
        KeyType::Account,
        KeyType::Hash,
        KeyType::URef,
        KeyType::Transfer,
        KeyType::DeployInfo,
    ];

    /// Returns the discriminator byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Resolves a discriminator byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        KeyType::ALL.get(usize::from(tag)).copied()
    }

    /// Returns the name used to label keys of this kind in JSON.
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Account => "Account",
            KeyType::Hash => "Hash",
            KeyType::URef => "URef",
            KeyType::Transfer => "Transfer",
            KeyType::DeployInfo => "DeployInfo",
        }
    }

    /// Resolves a JSON label.
    pub fn from_name(name: &str) -> Option<Self> {
        KeyType::ALL.iter().find(|kind| kind.name() == name).copied()
    }

    /// Every key kind, in tag order.
    pub fn all() -> &'static [KeyType] {
        &KeyType::ALL
    }

    /// The prefix of keys of this kind in formatted form.
    pub fn prefix(self) -> &'static str {
        match self {
            KeyType::Account => account_hash::ACCOUNT_HASH_FORMATTED_STRING_PREFIX,
            KeyType::Hash => "hash-",
            KeyType::URef => "uref-",
            KeyType::Transfer => "transfer-",
            KeyType::DeployInfo => "deploy-",
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// An address in global state that a deploy argument can point at.
#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum Key {
    /// An account.
    Account(AccountHash),
    /// A stored contract, package or other hash-addressed value.
    Hash(HashAddr),
    /// An unforgeable reference with its access rights.
    URef(URef),
    /// A transfer record.
    Transfer(HashAddr),
    /// A deploy info record.
    DeployInfo(HashAddr),
}

/// Error while parsing a [`Key`] from its formatted form.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FromStrError {
    /// The string carries none of the known key prefixes.
    #[error("invalid prefix")]
    InvalidPrefix,
    /// The address is not valid hex.
    #[error("decode from hex: {0}")]
    Hex(#[from] base16::DecodeError),
    /// The address is not 32 bytes.
    #[error("address must be {} bytes", KEY_ADDR_LENGTH)]
    Address,
    /// An `account-hash-` key failed to parse.
    #[error("account hash: {0}")]
    AccountHash(#[from] account_hash::FromStrError),
    /// A `uref-` key failed to parse.
    #[error("uref: {0}")]
    URef(#[from] uref::FromStrError),
}

fn decode_addr(hex: &str) -> Result<HashAddr, FromStrError> {
    HashAddr::try_from(base16::decode(hex)?.as_slice()).map_err(|_| FromStrError::Address)
}

impl Key {
    /// Returns the discriminator of this key.
    pub fn key_type(&self) -> KeyType {
        match self {
            Key::Account(_) => KeyType::Account,
            Key::Hash(_) => KeyType::Hash,
            Key::URef(_) => KeyType::URef,
            Key::Transfer(_) => KeyType::Transfer,
            Key::DeployInfo(_) => KeyType::DeployInfo,
        }
    }

    /// The 32-byte address, without the discriminator or any access rights.
    pub fn addr(&self) -> HashAddr {
        match self {
            Key::Account(account_hash) => account_hash.value(),
            Key::Hash(addr) | Key::Transfer(addr) | Key::DeployInfo(addr) => *addr,
            Key::URef(uref) => uref.addr(),
        }
    }

    /// The inner URef, for [`Key::URef`] only.
    pub fn as_uref(&self) -> Option<&URef> {
        match self {
            Key::URef(uref) => Some(uref),
            _ => None,
        }
    }

    /// Renders as `<prefix><hex address>`, with URefs also carrying their access rights.
    pub fn to_formatted_string(&self) -> String {
        match self {
            Key::Account(account_hash) => account_hash.to_formatted_string(),
            Key::URef(uref) => uref.to_formatted_string(),
            Key::Hash(addr) | Key::Transfer(addr) | Key::DeployInfo(addr) => format!(
                "{}{}",
                self.key_type().prefix(),
                base16::encode_lower(addr)
            ),
        }
    }

    /// Parses the form produced by [`Key::to_formatted_string`].
    pub fn from_formatted_str(input: &str) -> Result<Key, FromStrError> {
        let key_type = KeyType::ALL
            .iter()
            .copied()
            .find(|kind| input.starts_with(kind.prefix()))
            .ok_or(FromStrError::InvalidPrefix)?;
        let hex = &input[key_type.prefix().len()..];
        let key = match key_type {
            KeyType::Account => Key::Account(AccountHash::from_formatted_str(input)?),
            KeyType::URef => Key::URef(URef::from_formatted_str(input)?),
            KeyType::Hash => Key::Hash(decode_addr(hex)?),
            KeyType::Transfer => Key::Transfer(decode_addr(hex)?),
            KeyType::DeployInfo => Key::DeployInfo(decode_addr(hex)?),
        };
        Ok(key)
    }

    /// Parses a formatted string, requiring it to be of the given kind.
    pub fn from_formatted_str_of_type(key_type: KeyType, input: &str) -> Result<Key, CrateError> {
        let key = Key::from_formatted_str(input)
            .map_err(|error| CrateError::MalformedValue(format!("{}: {}", input, error)))?;
        if key.key_type() != key_type {
            return Err(CrateError::MalformedValue(format!(
                "expected a {} key, got '{}'",
                key_type, input
            )));
        }
        Ok(key)
    }
}

impl Display for Key {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Key::Account(account_hash) => write!(formatter, "Key::Account({})", account_hash),
            Key::URef(uref) => write!(formatter, "Key::{}", uref),
            Key::Hash(addr) | Key::Transfer(addr) | Key::DeployInfo(addr) => {
                write!(formatter, "Key::{}({})", self.key_type(), HexFmt(addr))
            }
        }
    }
}

impl Debug for Key {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl From<URef> for Key {
    fn from(uref: URef) -> Key {
        Key::URef(uref)
    }
}

impl From<AccountHash> for Key {
    fn from(account_hash: AccountHash) -> Key {
        Key::Account(account_hash)
    }
}

impl From<HashAddr> for Key {
    fn from(addr: HashAddr) -> Self {
        Key::Hash(addr)
    }
}

impl ToBytes for Key {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                Key::URef(uref) => uref.serialized_length(),
                _ => KEY_ADDR_LENGTH,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.key_type().tag());
        match self {
            Key::URef(uref) => uref.write_bytes(writer),
            _ => {
                writer.extend_from_slice(&self.addr());
                Ok(())
            }
        }
    }
}

impl FromBytes for Key {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let key_type = KeyType::from_tag(tag).ok_or(bytesrepr::Error::Formatting)?;
        if key_type == KeyType::URef {
            let (uref, remainder) = URef::from_bytes(remainder)?;
            return Ok((Key::URef(uref), remainder));
        }
        let (addr, remainder) = HashAddr::from_bytes(remainder)?;
        let key = match key_type {
            KeyType::Account => Key::Account(AccountHash::new(addr)),
            KeyType::Transfer => Key::Transfer(addr),
            KeyType::DeployInfo => Key::DeployInfo(addr),
            KeyType::Hash | KeyType::URef => Key::Hash(addr),
        };
        Ok((key, remainder))
    }
}

// JSON wraps the formatted string in a one-entry object labelled by kind: `{"Hash": "hash-.."}`.
impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(self.key_type().name(), &self.to_formatted_string())?;
            map.end()
        } else {
            self.to_bytes()
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let labelled = BTreeMap::<String, String>::deserialize(deserializer)?;
            let mut entries = labelled.iter();
            let (label, text) = match (entries.next(), entries.next()) {
                (Some(entry), None) => entry,
                _ => return Err(SerdeError::custom("key must be a single-entry object")),
            };
            let key_type = KeyType::from_name(label)
                .ok_or_else(|| SerdeError::custom(format!("unknown key kind '{}'", label)))?;
            Key::from_formatted_str_of_type(key_type, text).map_err(SerdeError::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
        }
    }
}

impl Distribution<Key> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Key {
        match KeyType::ALL[rng.gen_range(0..KeyType::ALL.len())] {
            KeyType::Account => Key::Account(rng.gen()),
            KeyType::Hash => Key::Hash(rng.gen()),
            KeyType::URef => Key::URef(rng.gen()),
            KeyType::Transfer => Key::Transfer(rng.gen()),
            KeyType::DeployInfo => Key::DeployInfo(rng.gen()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccessRights;

    const HASH_KEY_HEX: &str =
        "012b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5";

    fn all_keys() -> Vec<Key> {
        vec![
            Key::Account(AccountHash::new([1; 32])),
            Key::Hash([2; 32]),
            Key::URef(URef::new([3; 32], AccessRights::READ)),
            Key::Transfer([4; 32]),
            Key::DeployInfo([5; 32]),
        ]
    }

    #[test]
    fn should_decode_hash_key() {
        let bytes = base16::decode(HASH_KEY_HEX).unwrap();
        let key: Key = bytesrepr::deserialize(bytes.clone()).unwrap();
        assert_eq!(key.key_type(), KeyType::Hash);
        assert_eq!(
            key.to_formatted_string(),
            "hash-2b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5"
        );
        assert_eq!(key.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn discriminator_should_lead_encoding() {
        for key in all_keys() {
            let bytes = key.to_bytes().unwrap();
            assert_eq!(bytes[0], key.key_type().tag());
            assert_eq!(bytes.len(), key.serialized_length());
            bytesrepr::test_serialization_roundtrip(&key);
        }
        assert_eq!(
            Key::from_bytes(&[9; 33]).unwrap_err(),
            bytesrepr::Error::Formatting
        );
    }

    #[test]
    fn formatted_string_should_roundtrip() {
        for key in all_keys() {
            let formatted = key.to_formatted_string();
            assert_eq!(Key::from_formatted_str(&formatted).unwrap(), key);
        }
        assert!(matches!(
            Key::from_formatted_str("era-1"),
            Err(FromStrError::InvalidPrefix)
        ));
        assert!(matches!(
            Key::from_formatted_str("hash-00"),
            Err(FromStrError::Address)
        ));
    }

    #[test]
    fn json_should_be_labelled_by_kind() {
        let key = Key::Hash([0x2b; 32]);
        let json = serde_json::to_value(key).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Hash": key.to_formatted_string() })
        );
        assert_eq!(serde_json::from_value::<Key>(json).unwrap(), key);

        let mislabelled = serde_json::json!({ "Account": key.to_formatted_string() });
        assert!(serde_json::from_value::<Key>(mislabelled).is_err());
    }

    #[test]
    fn key_type_names() {
        for key_type in KeyType::all() {
            assert_eq!(KeyType::from_name(key_type.name()), Some(*key_type));
            assert_eq!(KeyType::from_tag(key_type.tag()), Some(*key_type));
        }
        assert_eq!(KeyType::from_tag(5), None);
    }
}
