use std::fmt::{self, Display, Formatter};

use bitflags::bitflags;
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::bytesrepr::{self, FromBytes, ToBytes};

/// The number of bytes in a serialized [`AccessRights`].
pub const ACCESS_RIGHTS_SERIALIZED_LENGTH: usize = 1;

bitflags! {
    /// The permissions a [`URef`](crate::URef) grants over the value it points at.
    ///
    /// Encoded as a single byte, and as one octal digit in a URef's formatted string.
    pub struct AccessRights: u8 {
        #[allow(missing_docs)]
        const NONE = 0;
        #[allow(missing_docs)]
        const READ = 0b001;
        #[allow(missing_docs)]
        const WRITE = 0b010;
        #[allow(missing_docs)]
        const ADD = 0b100;
        #[allow(missing_docs)]
        const READ_ADD = Self::READ.bits | Self::ADD.bits;
        #[allow(missing_docs)]
        const READ_WRITE = Self::READ.bits | Self::WRITE.bits;
        #[allow(missing_docs)]
        const ADD_WRITE = Self::ADD.bits | Self::WRITE.bits;
        #[allow(missing_docs)]
        const READ_ADD_WRITE = Self::READ.bits | Self::ADD.bits | Self::WRITE.bits;
    }
}

impl AccessRights {
    /// Parses the octal digit used in formatted URefs, e.g. `7` for `READ_ADD_WRITE`.
    pub fn from_octal_digit(digit: &str) -> Option<AccessRights> {
        u8::from_str_radix(digit, 8)
            .ok()
            .and_then(AccessRights::from_bits)
    }
}

impl Default for AccessRights {
    fn default() -> Self {
        AccessRights::NONE
    }
}

impl Display for AccessRights {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let names: Vec<&str> = [
            (AccessRights::READ, "READ"),
            (AccessRights::ADD, "ADD"),
            (AccessRights::WRITE, "WRITE"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
        if names.is_empty() {
            formatter.write_str("NONE")
        } else {
            formatter.write_str(&names.join("_"))
        }
    }
}

impl ToBytes for AccessRights {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        Ok(vec![self.bits])
    }

    fn serialized_length(&self) -> usize {
        ACCESS_RIGHTS_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.bits);
        Ok(())
    }
}

impl FromBytes for AccessRights {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (bits, remainder) = u8::from_bytes(bytes)?;
        let rights = AccessRights::from_bits(bits).ok_or(bytesrepr::Error::Formatting)?;
        Ok((rights, remainder))
    }
}

impl Serialize for AccessRights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits)
    }
}

impl<'de> Deserialize<'de> for AccessRights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        AccessRights::from_bits(bits)
            .ok_or_else(|| SerdeError::custom(format!("invalid access rights bits {:#05b}", bits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_combined_rights() {
        assert_eq!(AccessRights::NONE.to_string(), "NONE");
        assert_eq!(AccessRights::WRITE.to_string(), "WRITE");
        assert_eq!(AccessRights::READ_ADD.to_string(), "READ_ADD");
        assert_eq!(AccessRights::ADD_WRITE.to_string(), "ADD_WRITE");
        assert_eq!(AccessRights::READ_ADD_WRITE.to_string(), "READ_ADD_WRITE");
    }

    #[test]
    fn should_parse_octal_digit() {
        assert_eq!(
            AccessRights::from_octal_digit("7"),
            Some(AccessRights::READ_ADD_WRITE)
        );
        assert_eq!(AccessRights::from_octal_digit("0"), Some(AccessRights::NONE));
        assert_eq!(AccessRights::from_octal_digit("10"), None);
        assert_eq!(AccessRights::from_octal_digit("9"), None);
    }

    #[test]
    fn should_reject_unknown_bits() {
        assert_eq!(
            AccessRights::from_bytes(&[0b1000]).unwrap_err(),
            bytesrepr::Error::Formatting
        );
        let (rights, remainder) = AccessRights::from_bytes(&[7, 1]).unwrap();
        assert_eq!(rights, AccessRights::READ_ADD_WRITE);
        assert_eq!(remainder, &[1u8]);
        bytesrepr::test_serialization_roundtrip(&AccessRights::ADD);
    }
}
