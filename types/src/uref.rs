//! Unforgeable references, as carried by `URef` values and `Key::URef` keys in deploy arguments.

use std::{
    convert::TryFrom,
    fmt::{self, Debug, Display, Formatter},
};

use hex_fmt::HexFmt;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    AccessRights, ACCESS_RIGHTS_SERIALIZED_LENGTH,
};

/// The number of bytes in a [`URef`] address.
pub const UREF_ADDR_LENGTH: usize = 32;

/// The number of bytes in a serialized [`URef`]: the address followed by the access rights.
pub const UREF_SERIALIZED_LENGTH: usize = UREF_ADDR_LENGTH + ACCESS_RIGHTS_SERIALIZED_LENGTH;

const PREFIX: &str = "uref-";

/// The address of a [`URef`].
pub type URefAddr = [u8; UREF_ADDR_LENGTH];

/// Error while parsing a formatted `uref-<hex>-<octal>` string.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FromStrError {
    /// The text does not start with `uref-`.
    #[error("prefix is not '{}'", PREFIX)]
    InvalidPrefix,
    /// There is no `-<octal>` access rights suffix.
    #[error("no access rights suffix")]
    MissingSuffix,
    /// The suffix is not a valid octal access rights value.
    #[error("invalid access rights suffix '{0}'")]
    InvalidAccessRights(String),
    /// The address is not hex.
    #[error("failed to decode uref address: {0}")]
    Hex(#[from] base16::DecodeError),
    /// The address is not 32 bytes.
    #[error("uref address must be {} bytes", UREF_ADDR_LENGTH)]
    Address,
}

/// An unforgeable reference: a 32-byte address and the [`AccessRights`] it grants.
#[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct URef(URefAddr, AccessRights);

impl URef {
    /// Constructs a `URef` from an address and access rights.
    pub const fn new(address: URefAddr, access_rights: AccessRights) -> Self {
        URef(address, access_rights)
    }

    /// The address.
    pub fn addr(&self) -> URefAddr {
        self.0
    }

    /// The access rights.
    pub fn access_rights(&self) -> AccessRights {
        self.1
    }

    /// Renders as `uref-<hex address>-<access rights as three octal digits>`.
    pub fn to_formatted_string(self) -> String {
        format!(
            "{}{}-{:03o}",
            PREFIX,
            base16::encode_lower(&self.0),
            self.1.bits()
        )
    }

    /// Parses the form produced by [`URef::to_formatted_string`].
    pub fn from_formatted_str(input: &str) -> Result<Self, FromStrError> {
        let (hex, rights) = input
            .strip_prefix(PREFIX)
            .ok_or(FromStrError::InvalidPrefix)?
            .split_once('-')
            .ok_or(FromStrError::MissingSuffix)?;
        let address =
            URefAddr::try_from(base16::decode(hex)?.as_slice()).map_err(|_| FromStrError::Address)?;
        let access_rights = AccessRights::from_octal_digit(rights)
            .ok_or_else(|| FromStrError::InvalidAccessRights(rights.to_string()))?;
        Ok(URef(address, access_rights))
    }
}

impl Display for URef {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "URef({}, {})", HexFmt(&self.0), self.1)
    }
}

impl Debug for URef {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl ToBytes for URef {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        UREF_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.extend_from_slice(&self.0);
        self.1.write_bytes(writer)
    }
}

impl FromBytes for URef {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (address, remainder) = URefAddr::from_bytes(bytes)?;
        let (access_rights, remainder) = AccessRights::from_bytes(remainder)?;
        Ok((URef(address, access_rights), remainder))
    }
}

impl Serialize for URef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_formatted_string())
        } else {
            (self.0, self.1).serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for URef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            URef::from_formatted_str(&text).map_err(SerdeError::custom)
        } else {
            let (address, access_rights) = <(URefAddr, AccessRights)>::deserialize(deserializer)?;
            Ok(URef(address, access_rights))
        }
    }
}

impl Distribution<URef> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> URef {
        let access_rights = AccessRights::from_bits_truncate(rng.gen_range(0..8));
        URef::new(rng.gen(), access_rights)
    }
}
