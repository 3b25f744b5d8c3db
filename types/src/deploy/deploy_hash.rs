use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

#[cfg(doc)]
use super::Deploy;
#[cfg(any(feature = "testing", test))]
use crate::testing::TestRng;
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    json_node::JsonNode,
    Digest, Error,
};

/// Identifies a [`Deploy`]: Blake2b-256 of its serialized header.
///
/// Approvals sign these 32 bytes.
#[derive(
    Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, Debug, Default,
)]
#[serde(transparent)]
pub struct DeployHash(Digest);

impl DeployHash {
    /// Wraps an already computed digest.
    pub const fn new(digest: Digest) -> Self {
        DeployHash(digest)
    }

    /// Wraps 32 raw bytes.
    pub fn from_raw(bytes: [u8; Digest::LENGTH]) -> Self {
        DeployHash(Digest::from(bytes))
    }

    /// The digest.
    pub fn inner(&self) -> &Digest {
        &self.0
    }

    pub(crate) fn from_json<N: JsonNode>(node: &N) -> Result<Self, Error> {
        let text = node
            .as_text()
            .ok_or_else(|| Error::MalformedValue("deploy hash must be a hex string".to_string()))?;
        match Digest::from_hex(text) {
            Ok(digest) => Ok(DeployHash(digest)),
            Err(error) => Err(Error::MalformedValue(format!(
                "invalid deploy hash '{}': {}",
                text, error
            ))),
        }
    }

    /// Returns a random `DeployHash`.
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        DeployHash::from_raw(rand::Rng::gen(rng))
    }
}

impl From<Digest> for DeployHash {
    fn from(digest: Digest) -> Self {
        DeployHash(digest)
    }
}

impl Display for DeployHash {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "deploy-hash({})", self.0)
    }
}

impl AsRef<[u8]> for DeployHash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl ToBytes for DeployHash {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        Digest::LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for DeployHash {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (digest, remainder) = Digest::from_bytes(bytes)?;
        Ok((DeployHash(digest), remainder))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const FIXTURE_HASH: &str = "d7a68bbe656a883d04bba9f26aa340dbe3f8ec99b2adb63b628f2bc920431998";

    #[test]
    fn should_encode_as_bare_digest() {
        let hash = DeployHash::random(&mut TestRng::new());
        let bytes = hash.to_bytes().unwrap();
        assert_eq!(bytes.as_slice(), hash.inner().as_ref());
        bytesrepr::test_serialization_roundtrip(&hash);
    }

    #[test]
    fn should_read_and_write_hex() {
        let hash = DeployHash::from_json(&json!(FIXTURE_HASH)).unwrap();
        assert_eq!(hash.inner().to_string(), FIXTURE_HASH);
        assert_eq!(serde_json::to_value(hash).unwrap(), json!(FIXTURE_HASH));
        assert_eq!(hash.to_string(), format!("deploy-hash({})", FIXTURE_HASH));
    }

    #[test]
    fn should_reject_non_digest_json() {
        for node in [json!("d7a6"), json!(7), json!(null), json!([FIXTURE_HASH])] {
            assert!(matches!(
                DeployHash::from_json(&node),
                Err(Error::MalformedValue(_))
            ));
        }
    }
}
