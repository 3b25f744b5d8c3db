use thiserror::Error;

/// Error returned when a [`Digest`](crate::Digest) cannot be decoded.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum Error {
    /// The input was not valid hex.
    #[error("failed to decode digest from hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// The input had the wrong number of bytes.
    #[error("incorrect digest length: expected {expected} bytes, got {actual}")]
    IncorrectLength {
        /// The required number of bytes.
        expected: usize,
        /// The number of bytes supplied.
        actual: usize,
    },
}
