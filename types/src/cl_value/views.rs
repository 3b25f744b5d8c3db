//! Typed views over key-typed and option-typed values.

use std::convert::TryFrom;

use super::CLValue;
use crate::{
    bytesrepr::{self, FromBytes},
    cl_type::CLTypeInfo,
    key::KeyType,
    AccessRights, Error, Key,
};

/// A view over a [`CLValue`] of type `Key`.
///
/// The discriminator is not part of the type descriptor; it is the first byte of the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CLKeyValue {
    key: Key,
}

impl CLKeyValue {
    /// The kind of key held.
    pub fn key_type(&self) -> KeyType {
        self.key.key_type()
    }

    /// The 32-byte address following the discriminator.
    pub fn payload(&self) -> [u8; 32] {
        self.key.addr()
    }

    /// The access rights of a URef key.
    pub fn access_rights(&self) -> Option<AccessRights> {
        self.key.as_uref().map(|uref| uref.access_rights())
    }

    /// The decoded key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The formatted string form, e.g. `hash-<hex>`.
    pub fn parsed(&self) -> String {
        self.key.to_formatted_string()
    }
}

impl TryFrom<&CLValue> for CLKeyValue {
    type Error = Error;

    fn try_from(cl_value: &CLValue) -> Result<Self, Self::Error> {
        if *cl_value.cl_type() != CLTypeInfo::Key {
            return Err(Error::TypeMismatch {
                expected: CLTypeInfo::Key.to_string(),
                found: cl_value.cl_type().to_string(),
            });
        }
        let key: Key = bytesrepr::deserialize_from_slice(cl_value.inner_bytes())?;
        Ok(CLKeyValue { key })
    }
}

/// A view over a [`CLValue`] of type `Option`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CLOptionValue {
    inner_type: CLTypeInfo,
    inner: Option<CLValue>,
}

impl CLOptionValue {
    /// The type of the wrapped value.
    pub fn inner_type(&self) -> &CLTypeInfo {
        &self.inner_type
    }

    /// The wrapped value, if present.
    pub fn value(&self) -> Option<&CLValue> {
        self.inner.as_ref()
    }

    /// Returns `true` if a value is present.
    pub fn is_some(&self) -> bool {
        self.inner.is_some()
    }

    /// Consumes the view, returning the wrapped value if present.
    pub fn into_value(self) -> Option<CLValue> {
        self.inner
    }
}

impl TryFrom<&CLValue> for CLOptionValue {
    type Error = Error;

    fn try_from(cl_value: &CLValue) -> Result<Self, Self::Error> {
        let inner_type = match cl_value.cl_type() {
            CLTypeInfo::Option(inner_type) => (**inner_type).clone(),
            other => {
                return Err(Error::TypeMismatch {
                    expected: "Option".to_string(),
                    found: other.to_string(),
                })
            }
        };
        let (flag, remainder) = u8::from_bytes(cl_value.inner_bytes())?;
        let inner = match flag {
            0 => None,
            _ => Some(CLValue::new(inner_type.clone(), remainder.to_vec(), None)?),
        };
        Ok(CLOptionValue { inner_type, inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{URef, U512};

    #[test]
    fn should_view_hash_key() {
        let bytes =
            base16::decode("012b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5")
                .unwrap();
        let cl_value = CLValue::new(CLTypeInfo::Key, bytes.clone(), None).unwrap();
        let view = CLKeyValue::try_from(&cl_value).unwrap();
        assert_eq!(view.key_type(), KeyType::Hash);
        assert_eq!(view.payload().to_vec(), bytes[1..].to_vec());
        assert_eq!(view.access_rights(), None);
        assert_eq!(
            view.parsed(),
            "hash-2b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5"
        );
    }

    #[test]
    fn should_carry_uref_rights() {
        let uref = URef::new([4; 32], AccessRights::READ_WRITE);
        let cl_value = CLValue::from_t(Key::URef(uref)).unwrap();
        let view = CLKeyValue::try_from(&cl_value).unwrap();
        assert_eq!(view.key_type(), KeyType::URef);
        assert_eq!(view.access_rights(), Some(AccessRights::READ_WRITE));
        assert!(view.parsed().ends_with("-003"));
    }

    #[test]
    fn should_view_option() {
        let cl_value = CLValue::from_t(Some(999u64)).unwrap();
        let view = CLOptionValue::try_from(&cl_value).unwrap();
        assert_eq!(*view.inner_type(), CLTypeInfo::U64);
        let inner = view.value().unwrap();
        assert_eq!(base16::encode_lower(inner.inner_bytes()), "e703000000000000");

        let none = CLValue::from_t(Option::<U512>::None).unwrap();
        let view = CLOptionValue::try_from(&none).unwrap();
        assert!(!view.is_some());
        assert_eq!(*view.inner_type(), CLTypeInfo::U512);
    }

    #[test]
    fn should_reject_other_types() {
        let cl_value = CLValue::from_t(1u8).unwrap();
        assert!(matches!(
            CLKeyValue::try_from(&cl_value),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            CLOptionValue::try_from(&cl_value),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
