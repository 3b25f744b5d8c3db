//! Cryptographic types and operations on them

mod asymmetric_key;
mod error;
mod key_pair_builder;

pub use asymmetric_key::{
    sign, verify, AsymmetricType, PublicKey, SecretKey, Signature, ED25519_TAG, SECP256K1_TAG,
};
pub use error::Error;
pub use key_pair_builder::{
    Ed25519KeyPairBuilder, KeyPairBuilder, Secp256k1KeyPairBuilder, SignatureAlgorithm,
};
