//! Hex and byte-buffer helpers shared by the codecs.

use crate::Error;

/// Encodes `bytes` as lowercase hex.
pub fn encode_hex<T: AsRef<[u8]>>(bytes: T) -> String {
    base16::encode_lower(bytes.as_ref())
}

/// Decodes a hex string of either case.  An empty string decodes to an empty vector.
pub fn decode_hex<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, Error> {
    base16::decode(input.as_ref())
        .map_err(|error| Error::MalformedValue(format!("invalid hex: {}", error)))
}

/// Decodes a hex string which must hold exactly `N` bytes.
pub fn decode_hex_array<const N: usize>(input: &str) -> Result<[u8; N], Error> {
    let bytes = decode_hex(input)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        Error::MalformedValue(format!(
            "expected {} hex-encoded bytes, got {}",
            N,
            bytes.len()
        ))
    })
}
