//! Per-algorithm key handling, selected by explicit algorithm tag.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::asymmetric_key::{self, ED25519_TAG, SECP256K1_TAG};
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    crypto::AsymmetricType,
    Error, PublicKey, SecretKey, Signature,
};

/// The signature algorithms supported for signing deploys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignatureAlgorithm {
    /// Ed25519 over Curve25519.
    Ed25519 = ED25519_TAG,
    /// ECDSA over secp256k1.
    Secp256k1 = SECP256K1_TAG,
}

impl SignatureAlgorithm {
    /// Returns the tag byte prefixed to keys and signatures of this algorithm.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Resolves an algorithm from its tag byte.
    pub fn from_tag(tag: u8) -> Result<Self, Error> {
        match tag {
            ED25519_TAG => Ok(SignatureAlgorithm::Ed25519),
            SECP256K1_TAG => Ok(SignatureAlgorithm::Secp256k1),
            _ => Err(Error::InvalidKey(format!(
                "unsupported algorithm tag {}",
                tag
            ))),
        }
    }

    /// The lowercase name, as mixed into account hashes.
    pub fn name(self) -> &'static str {
        match self {
            SignatureAlgorithm::Ed25519 => "ed25519",
            SignatureAlgorithm::Secp256k1 => "secp256k1",
        }
    }

    /// Returns the key-pair builder for this algorithm.
    pub fn key_pair_builder(self) -> &'static dyn KeyPairBuilder {
        match self {
            SignatureAlgorithm::Ed25519 => &Ed25519KeyPairBuilder,
            SignatureAlgorithm::Secp256k1 => &Secp256k1KeyPairBuilder,
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Creates, encodes and uses keys of a single signature algorithm.
pub trait KeyPairBuilder: Send + Sync {
    /// The algorithm handled by this builder.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Generates a fresh key pair from the operating system's random number generator.
    fn generate_key_pair(&self) -> Result<(SecretKey, PublicKey), Error>;

    /// Returns `true` if `public_key` belongs to this builder's algorithm.
    fn is_supported_public_key(&self, public_key: &PublicKey) -> bool {
        public_key.algorithm() == self.algorithm()
    }

    /// Returns the algorithm tag followed by the encoded point of `public_key`.
    fn public_key_raw_bytes(&self, public_key: &PublicKey) -> Result<Vec<u8>, Error> {
        self.check_supported(public_key)?;
        Ok(public_key.to_bytes()?)
    }

    /// Parses bytes as produced by [`KeyPairBuilder::public_key_raw_bytes`].
    fn create_public_key(&self, raw_bytes: &[u8]) -> Result<PublicKey, Error> {
        match raw_bytes.first() {
            Some(tag) if *tag == self.algorithm().tag() => {}
            Some(tag) => {
                return Err(Error::InvalidKey(format!(
                    "expected {} tag {}, got {}",
                    self.algorithm(),
                    self.algorithm().tag(),
                    tag
                )))
            }
            None => return Err(Error::InvalidKey("empty public key".to_string())),
        }
        bytesrepr::deserialize_from_slice(raw_bytes).map_err(|error: bytesrepr::Error| {
            Error::InvalidKey(format!("malformed {} public key: {}", self.algorithm(), error))
        })
    }

    /// Signs `message` with `secret_key`.
    fn sign(&self, message: &[u8], secret_key: &SecretKey) -> Result<Signature, Error> {
        if secret_key.algorithm() != self.algorithm() {
            return Err(Error::InvalidKey(format!(
                "expected {} secret key, got {}",
                self.algorithm(),
                secret_key.algorithm()
            )));
        }
        Ok(asymmetric_key::sign(message, secret_key)?)
    }

    /// Verifies `signature` over `message` against `public_key`.
    fn verify(
        &self,
        message: &[u8],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> Result<(), Error> {
        self.check_supported(public_key)?;
        asymmetric_key::verify(message, signature, public_key)
            .map_err(|error| Error::InvalidSignature(error.to_string()))
    }

    #[doc(hidden)]
    fn check_supported(&self, public_key: &PublicKey) -> Result<(), Error> {
        if self.is_supported_public_key(public_key) {
            Ok(())
        } else {
            Err(Error::InvalidKey(format!(
                "expected {} public key, got {}",
                self.algorithm(),
                public_key.algorithm()
            )))
        }
    }
}

/// Builder for Ed25519 keys.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ed25519KeyPairBuilder;

impl KeyPairBuilder for Ed25519KeyPairBuilder {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Ed25519
    }

    fn generate_key_pair(&self) -> Result<(SecretKey, PublicKey), Error> {
        let secret_key = SecretKey::generate_ed25519()?;
        let public_key = PublicKey::from(&secret_key);
        Ok((secret_key, public_key))
    }
}

/// Builder for secp256k1 keys.
#[derive(Copy, Clone, Debug, Default)]
pub struct Secp256k1KeyPairBuilder;

impl KeyPairBuilder for Secp256k1KeyPairBuilder {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Secp256k1
    }

    fn generate_key_pair(&self) -> Result<(SecretKey, PublicKey), Error> {
        let secret_key = SecretKey::generate_secp256k1()?;
        let public_key = PublicKey::from(&secret_key);
        Ok((secret_key, public_key))
    }
}

impl ToBytes for SignatureAlgorithm {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.tag().to_bytes()
    }

    fn serialized_length(&self) -> usize {
        bytesrepr::U8_SERIALIZED_LENGTH
    }
}

impl FromBytes for SignatureAlgorithm {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let algorithm =
            SignatureAlgorithm::from_tag(tag).map_err(|_| bytesrepr::Error::Formatting)?;
        Ok((algorithm, remainder))
    }
}
