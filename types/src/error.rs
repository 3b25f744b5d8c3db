use std::io;

use thiserror::Error;

use crate::{bytesrepr, cl_type::CLType, crypto, Digest, TimeDiff};

/// Errors raised while building, encoding, decoding or verifying values and deploys.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A type name or tag is not one of the known `CLType`s.
    #[error("unknown cl type: {0}")]
    UnknownType(String),

    /// The type is known but cannot be handled in this position.
    #[error("unsupported cl type: {0}")]
    UnsupportedType(CLType),

    /// A value's bytes or parsed projection do not agree with its declared type.
    #[error("malformed value: {0}")]
    MalformedValue(String),

    /// A value was requested as a different type than the one it holds.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The requested type.
        expected: String,
        /// The type actually held.
        found: String,
    },

    /// A JSON executable object has an unrecognized variant key.
    #[error("invalid executable field: {0}")]
    InvalidExecutableField(String),

    /// Public key bytes cannot be parsed for the claimed algorithm.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Decoding one of the executable variants failed.
    #[error("failed to convert {variant}: {source}")]
    Conversion {
        /// The variant being decoded.
        variant: &'static str,
        /// The underlying failure.
        source: Box<Error>,
    },

    /// Binary encoding or decoding failed.
    #[error("serialization: {0}")]
    Serialization(#[from] bytesrepr::Error),

    /// Cryptographic failure.
    #[error(transparent)]
    Crypto(#[from] crypto::Error),

    /// An approval's signature does not verify against the deploy hash.
    #[error("invalid approval signature: {0}")]
    InvalidSignature(String),

    /// The header's body hash does not match the payment and session.
    #[error("invalid body hash: expected {expected}, actual {actual}")]
    InvalidBodyHash {
        /// The hash held in the header.
        expected: Digest,
        /// The hash computed from payment and session.
        actual: Digest,
    },

    /// The deploy hash does not match the header.
    #[error("invalid deploy hash: expected {expected}, actual {actual}")]
    InvalidDeployHash {
        /// The hash held in the deploy.
        expected: Digest,
        /// The hash computed from the header.
        actual: Digest,
    },

    /// A deploy without approvals cannot be verified.
    #[error("deploy has no approvals")]
    EmptyApprovals,

    /// The deploy's time-to-live exceeds the configured maximum.
    #[error("ttl of {got} exceeds the maximum of {max}")]
    ExcessiveTtl {
        /// The configured maximum.
        max: TimeDiff,
        /// The requested ttl.
        got: TimeDiff,
    },

    /// The deploy lists more dependencies than configured.
    #[error("{got} dependencies exceed the maximum of {max}")]
    ExcessiveDependencies {
        /// The configured maximum.
        max: u8,
        /// The number requested.
        got: usize,
    },

    /// JSON text could not be parsed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    /// Reading input failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn conversion(variant: &'static str, source: Error) -> Self {
        Error::Conversion {
            variant,
            source: Box::new(source),
        }
    }
}
