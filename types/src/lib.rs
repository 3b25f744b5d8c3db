//! Types for building, encoding and signing deploys for the Casper network.
//!
//! The crate covers the dynamically typed [`CLValue`] system, the canonical binary encoding
//! ([`bytesrepr`]) and JSON encoding of values and deploys, the six forms of
//! [`ExecutableDeployItem`], assembly and hashing of [`Deploy`]s, and signing with Ed25519 or
//! secp256k1 keys.
//!
//! ```
//! use casper_sdk_types::{
//!     AccountHash, Deploy, DeployParams, ExecutableDeployItem, PublicKey, SecretKey,
//! };
//!
//! # fn main() -> Result<(), casper_sdk_types::Error> {
//! let secret_key = SecretKey::generate_ed25519()?;
//! let params = DeployParams::new(PublicKey::from(&secret_key), "casper-test");
//! let session =
//!     ExecutableDeployItem::new_transfer(24_500_000_000u64, AccountHash::new([1; 32]), Some(999))?;
//! let payment = ExecutableDeployItem::new_standard_payment(100_000_000u64)?;
//!
//! let mut deploy = Deploy::new(params, session, payment)?;
//! deploy.sign(&secret_key)?;
//! deploy.verify()?;
//! # Ok(())
//! # }
//! ```

#![doc(test(attr(deny(warnings))))]
#![warn(missing_docs)]

mod access_rights;
pub mod account_hash;
pub mod byte_utils;
pub mod bytesrepr;
pub mod cl_type;
mod cl_value;
pub mod crypto;
pub mod deploy;
mod error;
#[cfg(any(feature = "gens", test))]
pub mod gens;
pub mod json_node;
pub mod key;
pub mod runtime_args;
#[cfg(any(feature = "testing", test))]
pub mod testing;
mod timestamp;
mod uint;
pub mod uref;

pub use access_rights::{AccessRights, ACCESS_RIGHTS_SERIALIZED_LENGTH};
pub use account_hash::AccountHash;
pub use casper_sdk_hashing::Digest;
pub use cl_type::{CLType, CLTypeInfo, CLTyped};
pub use cl_value::{CLKeyValue, CLOptionValue, CLValue, NativeValue, Parsed};
pub use crypto::{
    AsymmetricType, KeyPairBuilder, PublicKey, SecretKey, Signature, SignatureAlgorithm,
};
pub use deploy::{
    make_body_hash, Approval, ContractVersion, Deploy, DeployConfig, DeployHash, DeployHeader,
    DeployParams, ExecutableDeployItem,
};
pub use error::Error;
pub use json_node::JsonNode;
pub use key::{HashAddr, Key, KeyType};
pub use runtime_args::{NamedArg, RuntimeArgs};
pub use timestamp::{TimeDiff, Timestamp};
pub use uint::{U128, U256, U512};
pub use uref::URef;
