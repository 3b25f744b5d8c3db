use thiserror::Error;

/// Failures while decoding, generating or using keys and signatures.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A key or signature could not be built from the given input.
    #[error("asymmetric key error: {0}")]
    AsymmetricKey(String),

    /// The input was not valid hex.
    #[error("parsing from hex: {0}")]
    FromHex(#[from] base16::DecodeError),

    /// Raised by the signature backends, which report no further detail.
    #[error("error in signature")]
    Signature,

    /// The operating system's random number generator failed.
    #[error("failed to get random bytes: {0}")]
    GetRandom(String),
}

// ed25519-dalek and k256 share the `signature` crate's error type.
impl From<ed25519_dalek::SignatureError> for Error {
    fn from(_: ed25519_dalek::SignatureError) -> Self {
        Error::Signature
    }
}

impl From<getrandom::Error> for Error {
    fn from(error: getrandom::Error) -> Self {
        Error::GetRandom(error.to_string())
    }
}
