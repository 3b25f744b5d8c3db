//! Ed25519 and secp256k1 keys and signatures.
//!
//! Public keys and signatures share one encoding: a tag byte naming the algorithm followed by
//! the raw key or signature bytes. Hex and binary forms both use it.

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

use ed25519_dalek::{
    Signature as Ed25519Signature, SigningKey as Ed25519SecretKey,
    VerifyingKey as Ed25519PublicKey, PUBLIC_KEY_LENGTH as ED25519_PUBLIC_KEY_LENGTH,
    SECRET_KEY_LENGTH as ED25519_SECRET_KEY_LENGTH, SIGNATURE_LENGTH as ED25519_SIGNATURE_LENGTH,
};
use hex_fmt::HexFmt;
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature as Secp256k1Signature, SigningKey as Secp256k1SecretKey,
    VerifyingKey as Secp256k1PublicKey,
};
#[cfg(any(feature = "testing", test))]
use rand::{Rng, RngCore};
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

#[cfg(any(feature = "testing", test))]
use crate::testing::TestRng;
use crate::{
    bytesrepr::{self, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
    crypto::{Error, SignatureAlgorithm},
    AccountHash,
};

/// Tag byte of Ed25519 keys and signatures.
pub const ED25519_TAG: u8 = 1;

/// Tag byte of secp256k1 keys and signatures.
pub const SECP256K1_TAG: u8 = 2;

const SECP256K1_SECRET_KEY_LENGTH: usize = 32;
const SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;
const SECP256K1_SIGNATURE_LENGTH: usize = 64;

// Scalars outside the curve order are rejected, so generation draws again.
const SECP256K1_GENERATE_ATTEMPTS: usize = 8;

fn algorithm_for_tag(tag: u8) -> Result<SignatureAlgorithm, Error> {
    match tag {
        ED25519_TAG => Ok(SignatureAlgorithm::Ed25519),
        SECP256K1_TAG => Ok(SignatureAlgorithm::Secp256k1),
        _ => Err(Error::AsymmetricKey(format!(
            "invalid algorithm tag {}, expected {} or {}",
            tag, ED25519_TAG, SECP256K1_TAG
        ))),
    }
}

/// A value tagged with the algorithm it belongs to: a public key or a signature.
pub trait AsymmetricType: Sized {
    /// The algorithm of this value.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// The raw bytes, without the algorithm tag.
    fn untagged_bytes(&self) -> Vec<u8>;

    /// Builds a value of `algorithm` from its raw bytes.
    fn from_untagged_bytes(algorithm: SignatureAlgorithm, bytes: &[u8]) -> Result<Self, Error>;

    /// Builds an Ed25519 value from its raw bytes.
    fn ed25519_from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, Error> {
        Self::from_untagged_bytes(SignatureAlgorithm::Ed25519, bytes.as_ref())
    }

    /// Builds a secp256k1 value from its raw bytes.
    fn secp256k1_from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, Error> {
        Self::from_untagged_bytes(SignatureAlgorithm::Secp256k1, bytes.as_ref())
    }

    /// Lowercase hex of the tag byte followed by the raw bytes.
    fn to_hex(&self) -> String {
        let mut bytes = vec![self.algorithm().tag()];
        bytes.extend(self.untagged_bytes());
        base16::encode_lower(&bytes)
    }

    /// Parses the form produced by [`AsymmetricType::to_hex`].
    fn from_hex<A: AsRef<[u8]>>(input: A) -> Result<Self, Error> {
        let bytes = base16::decode(input.as_ref())?;
        let (tag, raw) = bytes
            .split_first()
            .ok_or_else(|| Error::AsymmetricKey("empty hex input".to_string()))?;
        Self::from_untagged_bytes(algorithm_for_tag(*tag)?, raw)
    }
}

/// Formatting, ordering, hashing and both codecs for a tagged type with a
/// `fn untagged_length(SignatureAlgorithm) -> usize`.
macro_rules! impl_tagged {
    ($type:ident, $short_name:literal) => {
        impl Debug for $type {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                write!(
                    formatter,
                    "{}::{:?}({})",
                    stringify!($type),
                    self.algorithm(),
                    HexFmt(self.untagged_bytes())
                )
            }
        }

        impl Display for $type {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                write!(
                    formatter,
                    "{}::{:?}({:10})",
                    $short_name,
                    self.algorithm(),
                    HexFmt(self.untagged_bytes())
                )
            }
        }

        impl PartialEq for $type {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl Eq for $type {}

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $type {
            fn cmp(&self, other: &Self) -> Ordering {
                self.algorithm()
                    .cmp(&other.algorithm())
                    .then_with(|| self.untagged_bytes().cmp(&other.untagged_bytes()))
            }
        }

        impl Hash for $type {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.algorithm().hash(state);
                self.untagged_bytes().hash(state);
            }
        }

        impl ToBytes for $type {
            fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
                let mut buffer = bytesrepr::allocate_buffer(self)?;
                self.write_bytes(&mut buffer)?;
                Ok(buffer)
            }

            fn serialized_length(&self) -> usize {
                U8_SERIALIZED_LENGTH + $type::untagged_length(self.algorithm())
            }

            fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
                writer.push(self.algorithm().tag());
                writer.extend(self.untagged_bytes());
                Ok(())
            }
        }

        impl FromBytes for $type {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
                let (tag, remainder) = u8::from_bytes(bytes)?;
                let algorithm =
                    algorithm_for_tag(tag).map_err(|_| bytesrepr::Error::Formatting)?;
                let (raw, remainder) =
                    bytesrepr::safe_split_at(remainder, $type::untagged_length(algorithm))?;
                let value = $type::from_untagged_bytes(algorithm, raw)
                    .map_err(|_| bytesrepr::Error::Formatting)?;
                Ok((value, remainder))
            }
        }

        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_hex())
                } else {
                    (self.algorithm().tag(), self.untagged_bytes()).serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let parsed = if deserializer.is_human_readable() {
                    let hex = String::deserialize(deserializer)?;
                    $type::from_hex(hex)
                } else {
                    let (tag, raw) = <(u8, Vec<u8>)>::deserialize(deserializer)?;
                    algorithm_for_tag(tag)
                        .and_then(|algorithm| $type::from_untagged_bytes(algorithm, &raw))
                };
                parsed.map_err(SerdeError::custom)
            }
        }
    };
}

/// A secret key. Its bytes never appear in `Debug` or `Display` output.
#[non_exhaustive]
pub enum SecretKey {
    /// Ed25519 secret key.
    Ed25519(Ed25519SecretKey),
    /// secp256k1 secret key.
    Secp256k1(Secp256k1SecretKey),
}

impl SecretKey {
    /// The length in bytes of an Ed25519 secret key.
    pub const ED25519_LENGTH: usize = ED25519_SECRET_KEY_LENGTH;

    /// The length in bytes of a secp256k1 secret key.
    pub const SECP256K1_LENGTH: usize = SECP256K1_SECRET_KEY_LENGTH;

    /// Builds an Ed25519 secret key from its 32 bytes.
    pub fn ed25519_from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, Error> {
        let key = Ed25519SecretKey::try_from(bytes.as_ref())?;
        Ok(SecretKey::Ed25519(key))
    }

    /// Builds a secp256k1 secret key from its 32-byte scalar.
    pub fn secp256k1_from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, Error> {
        Secp256k1SecretKey::from_slice(bytes.as_ref())
            .map(SecretKey::Secp256k1)
            .map_err(|_| Error::AsymmetricKey("invalid secp256k1 secret key".to_string()))
    }

    /// Generates an Ed25519 key from the operating system's random number generator.
    pub fn generate_ed25519() -> Result<Self, Error> {
        let mut seed = [0u8; Self::ED25519_LENGTH];
        getrandom::getrandom(&mut seed)?;
        SecretKey::ed25519_from_bytes(seed)
    }

    /// Generates a secp256k1 key from the operating system's random number generator.
    pub fn generate_secp256k1() -> Result<Self, Error> {
        let mut scalar = [0u8; Self::SECP256K1_LENGTH];
        for _ in 0..SECP256K1_GENERATE_ATTEMPTS {
            getrandom::getrandom(&mut scalar)?;
            if let Ok(secret_key) = SecretKey::secp256k1_from_bytes(scalar) {
                return Ok(secret_key);
            }
        }
        Err(Error::AsymmetricKey(
            "failed to generate a valid secp256k1 secret key".to_string(),
        ))
    }

    /// The algorithm of this key.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            SecretKey::Ed25519(_) => SignatureAlgorithm::Ed25519,
            SecretKey::Secp256k1(_) => SignatureAlgorithm::Secp256k1,
        }
    }

    /// Returns a random key of either algorithm.
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        if rng.gen() {
            Self::random_ed25519(rng)
        } else {
            Self::random_secp256k1(rng)
        }
    }

    /// Returns a random Ed25519 key.
    #[cfg(any(feature = "testing", test))]
    pub fn random_ed25519(rng: &mut TestRng) -> Self {
        let mut seed = [0u8; Self::ED25519_LENGTH];
        rng.fill_bytes(&mut seed);
        SecretKey::Ed25519(Ed25519SecretKey::from_bytes(&seed))
    }

    /// Returns a random secp256k1 key.
    #[cfg(any(feature = "testing", test))]
    pub fn random_secp256k1(rng: &mut TestRng) -> Self {
        let mut scalar = [0u8; Self::SECP256K1_LENGTH];
        loop {
            rng.fill_bytes(&mut scalar);
            if let Ok(secret_key) = SecretKey::secp256k1_from_bytes(scalar) {
                return secret_key;
            }
        }
    }
}

impl Debug for SecretKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "SecretKey::{:?}", self.algorithm())
    }
}

impl Display for SecretKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, formatter)
    }
}

/// A public key, identifying a deploy's account or an approval's signer.
#[derive(Clone)]
#[non_exhaustive]
pub enum PublicKey {
    /// Ed25519 public key.
    Ed25519(Ed25519PublicKey),
    /// secp256k1 public key, kept in compressed SEC1 form.
    Secp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// The length in bytes of an Ed25519 public key.
    pub const ED25519_LENGTH: usize = ED25519_PUBLIC_KEY_LENGTH;

    /// The length in bytes of a compressed secp256k1 public key.
    pub const SECP256K1_LENGTH: usize = SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH;

    fn untagged_length(algorithm: SignatureAlgorithm) -> usize {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Self::ED25519_LENGTH,
            SignatureAlgorithm::Secp256k1 => Self::SECP256K1_LENGTH,
        }
    }

    /// The account hash owned by this key.
    pub fn to_account_hash(&self) -> AccountHash {
        AccountHash::from_public_key(self)
    }

    /// The encoded point, without the algorithm tag.
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.untagged_bytes()
    }

    /// Returns the public half of [`SecretKey::random`].
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        PublicKey::from(&SecretKey::random(rng))
    }

    /// Returns the public half of [`SecretKey::random_ed25519`].
    #[cfg(any(feature = "testing", test))]
    pub fn random_ed25519(rng: &mut TestRng) -> Self {
        PublicKey::from(&SecretKey::random_ed25519(rng))
    }

    /// Returns the public half of [`SecretKey::random_secp256k1`].
    #[cfg(any(feature = "testing", test))]
    pub fn random_secp256k1(rng: &mut TestRng) -> Self {
        PublicKey::from(&SecretKey::random_secp256k1(rng))
    }
}

impl AsymmetricType for PublicKey {
    fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            PublicKey::Ed25519(_) => SignatureAlgorithm::Ed25519,
            PublicKey::Secp256k1(_) => SignatureAlgorithm::Secp256k1,
        }
    }

    fn untagged_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => key.as_bytes().to_vec(),
            PublicKey::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    fn from_untagged_bytes(algorithm: SignatureAlgorithm, bytes: &[u8]) -> Result<Self, Error> {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Ok(PublicKey::Ed25519(Ed25519PublicKey::try_from(
                bytes,
            )?)),
            SignatureAlgorithm::Secp256k1 => Secp256k1PublicKey::from_sec1_bytes(bytes)
                .map(PublicKey::Secp256k1)
                .map_err(|_| Error::AsymmetricKey("invalid secp256k1 public key".to_string())),
        }
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(secret_key: &SecretKey) -> PublicKey {
        match secret_key {
            SecretKey::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            SecretKey::Secp256k1(key) => PublicKey::Secp256k1(Secp256k1PublicKey::from(key)),
        }
    }
}

impl_tagged!(PublicKey, "PubKey");

/// A signature over a deploy hash.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub enum Signature {
    /// Ed25519 signature.
    Ed25519(Ed25519Signature),
    /// secp256k1 signature, as `r || s`.
    Secp256k1(Secp256k1Signature),
}

impl Signature {
    /// The length in bytes of an Ed25519 signature.
    pub const ED25519_LENGTH: usize = ED25519_SIGNATURE_LENGTH;

    /// The length in bytes of a secp256k1 signature.
    pub const SECP256K1_LENGTH: usize = SECP256K1_SIGNATURE_LENGTH;

    fn untagged_length(algorithm: SignatureAlgorithm) -> usize {
        match algorithm {
            SignatureAlgorithm::Ed25519 => Self::ED25519_LENGTH,
            SignatureAlgorithm::Secp256k1 => Self::SECP256K1_LENGTH,
        }
    }
}

impl AsymmetricType for Signature {
    fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Signature::Ed25519(_) => SignatureAlgorithm::Ed25519,
            Signature::Secp256k1(_) => SignatureAlgorithm::Secp256k1,
        }
    }

    fn untagged_bytes(&self) -> Vec<u8> {
        match self {
            Signature::Ed25519(signature) => signature.to_bytes().to_vec(),
            Signature::Secp256k1(signature) => signature.to_bytes().to_vec(),
        }
    }

    fn from_untagged_bytes(algorithm: SignatureAlgorithm, bytes: &[u8]) -> Result<Self, Error> {
        let signature = match algorithm {
            SignatureAlgorithm::Ed25519 => {
                Ed25519Signature::from_slice(bytes).map(Signature::Ed25519)
            }
            SignatureAlgorithm::Secp256k1 => {
                Secp256k1Signature::from_slice(bytes).map(Signature::Secp256k1)
            }
        };
        signature.map_err(|_| {
            Error::AsymmetricKey(format!(
                "invalid {} signature of {} bytes",
                algorithm,
                bytes.len()
            ))
        })
    }
}

impl_tagged!(Signature, "Sig");

/// Signs `message` with `secret_key`.
pub fn sign<T: AsRef<[u8]>>(message: T, secret_key: &SecretKey) -> Result<Signature, Error> {
    let message = message.as_ref();
    let signature = match secret_key {
        SecretKey::Ed25519(key) => Signature::Ed25519(key.sign(message)),
        SecretKey::Secp256k1(key) => Signature::Secp256k1(key.try_sign(message)?),
    };
    Ok(signature)
}

/// Checks that `signature` was made over `message` by the holder of `public_key`.
///
/// Ed25519 signatures are checked strictly, rejecting small-order keys and non-canonical `R`.
pub fn verify<T: AsRef<[u8]>>(
    message: T,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<(), Error> {
    let message = message.as_ref();
    match (signature, public_key) {
        (Signature::Ed25519(signature), PublicKey::Ed25519(key)) => key
            .verify_strict(message, signature)
            .map_err(|_| Error::AsymmetricKey("failed to verify Ed25519 signature".to_string())),
        (Signature::Secp256k1(signature), PublicKey::Secp256k1(key)) => {
            key.verify(message, signature).map_err(|error| {
                Error::AsymmetricKey(format!("failed to verify secp256k1 signature: {}", error))
            })
        }
        _ => Err(Error::AsymmetricKey(format!(
            "{} cannot verify a {} signature",
            public_key,
            signature.algorithm()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_ACCOUNT: &str =
        "017f747b67bd3fe63c2a736739dfe40156d622347346e70f68f51c178a75ce5537";

    fn secret_keys(rng: &mut TestRng) -> [SecretKey; 2] {
        [
            SecretKey::random_ed25519(rng),
            SecretKey::random_secp256k1(rng),
        ]
    }

    #[test]
    fn hex_and_bytes_should_agree_on_tagged_form() {
        let public_key = PublicKey::from_hex(FIXTURE_ACCOUNT).unwrap();
        assert_eq!(public_key.algorithm(), SignatureAlgorithm::Ed25519);
        assert_eq!(public_key.to_hex(), FIXTURE_ACCOUNT);
        assert_eq!(
            base16::encode_lower(&public_key.to_bytes().unwrap()),
            FIXTURE_ACCOUNT
        );
        assert_eq!(public_key.raw_bytes().len(), PublicKey::ED25519_LENGTH);
    }

    #[test]
    fn from_hex_should_reject_malformed_input() {
        for bad in ["", "0", "03aa", "01zz", "0101"] {
            assert!(PublicKey::from_hex(bad).is_err(), "{:?}", bad);
        }
        assert!(Signature::from_hex("02ff").is_err());
    }

    #[test]
    fn should_sign_and_verify_with_both_algorithms() {
        let mut rng = TestRng::new();
        let message = b"deploy hash bytes";
        for secret_key in &secret_keys(&mut rng) {
            let public_key = PublicKey::from(secret_key);
            let signature = sign(message, secret_key).unwrap();
            assert_eq!(signature.algorithm(), secret_key.algorithm());
            verify(message, &signature, &public_key).unwrap();
            assert!(verify(b"other", &signature, &public_key).is_err());
        }
    }

    #[test]
    fn should_reject_algorithm_mismatch() {
        let mut rng = TestRng::new();
        let secp256k1_key = SecretKey::random_secp256k1(&mut rng);
        let signature = sign(b"message", &secp256k1_key).unwrap();
        let ed25519_public_key = PublicKey::random_ed25519(&mut rng);
        assert!(verify(b"message", &signature, &ed25519_public_key).is_err());
    }

    #[test]
    fn generated_keys_should_sign() {
        for secret_key in [
            SecretKey::generate_ed25519().unwrap(),
            SecretKey::generate_secp256k1().unwrap(),
        ] {
            let signature = sign([1u8; 32], &secret_key).unwrap();
            verify([1u8; 32], &signature, &PublicKey::from(&secret_key)).unwrap();
        }
    }

    #[test]
    fn encoded_lengths_should_include_tag() {
        let mut rng = TestRng::new();
        let [ed25519, secp256k1] = secret_keys(&mut rng);

        let public_key = PublicKey::from(&secp256k1);
        assert_eq!(
            public_key.to_bytes().unwrap().len(),
            1 + PublicKey::SECP256K1_LENGTH
        );
        let signature = sign(b"message", &ed25519).unwrap();
        assert_eq!(
            signature.to_bytes().unwrap().len(),
            1 + Signature::ED25519_LENGTH
        );
    }

    #[test]
    fn bytesrepr_roundtrip() {
        let mut rng = TestRng::new();
        for secret_key in &secret_keys(&mut rng) {
            bytesrepr::test_serialization_roundtrip(&PublicKey::from(secret_key));
            bytesrepr::test_serialization_roundtrip(&sign(b"message", secret_key).unwrap());
        }
    }

    #[test]
    fn from_bytes_should_reject_unknown_tag_and_short_input() {
        assert_eq!(
            PublicKey::from_bytes(&[3; 33]).unwrap_err(),
            bytesrepr::Error::Formatting
        );
        assert!(PublicKey::from_bytes(&[ED25519_TAG, 1, 2]).is_err());
    }

    #[test]
    fn json_should_be_tagged_hex() {
        let public_key = PublicKey::from_hex(FIXTURE_ACCOUNT).unwrap();
        let json = serde_json::to_string(&public_key).unwrap();
        assert_eq!(json, format!("\"{}\"", FIXTURE_ACCOUNT));
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), public_key);
    }

    #[test]
    fn should_order_by_algorithm_then_bytes() {
        let mut rng = TestRng::new();
        let ed25519 = PublicKey::random_ed25519(&mut rng);
        let secp256k1 = PublicKey::random_secp256k1(&mut rng);
        assert!(ed25519 < secp256k1);
        assert_eq!(ed25519.cmp(&ed25519.clone()), Ordering::Equal);
    }
}
