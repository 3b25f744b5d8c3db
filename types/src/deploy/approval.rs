use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DeployHash;
#[cfg(any(feature = "testing", test))]
use crate::testing::TestRng;
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    crypto::{self, AsymmetricType},
    json_node::JsonNode,
    Error, PublicKey, SecretKey, Signature,
};

/// A signer's public key and their signature over a deploy hash.
///
/// Deploys hold approvals in a set ordered by signer, then signature.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Approval {
    signer: PublicKey,
    signature: Signature,
}

impl Approval {
    /// Signs `hash` with `secret_key`.
    pub fn create(hash: &DeployHash, secret_key: &SecretKey) -> Result<Self, Error> {
        Ok(Approval {
            signer: PublicKey::from(secret_key),
            signature: crypto::sign(hash, secret_key)?,
        })
    }

    /// Pairs an existing signature with its signer.
    pub fn new(signer: PublicKey, signature: Signature) -> Self {
        Approval { signer, signature }
    }

    /// The signer's public key.
    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    /// The signature over the deploy hash.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Checks the signature against `hash` and the signer's key.
    pub fn verify(&self, hash: &DeployHash) -> Result<(), Error> {
        crypto::verify(hash, &self.signature, &self.signer)
            .map_err(|error| Error::InvalidSignature(format!("{}: {}", self.signer, error)))
    }

    pub(crate) fn from_json<N: JsonNode>(node: &N) -> Result<Self, Error> {
        let hex_field = |name: &str| {
            node.get_present(name)
                .and_then(|value| value.as_text())
                .ok_or_else(|| {
                    Error::MalformedValue(format!("approval is missing hex field '{}'", name))
                })
        };
        Ok(Approval {
            signer: PublicKey::from_hex(hex_field("signer")?)?,
            signature: Signature::from_hex(hex_field("signature")?)?,
        })
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({
            "signer": self.signer.to_hex(),
            "signature": self.signature.to_hex(),
        })
    }

    /// An approval by a random key over a random hash.
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        let hash = DeployHash::random(rng);
        let secret_key = SecretKey::random(rng);
        let signature = match crypto::sign(hash, &secret_key) {
            Ok(signature) => signature,
            Err(error) => panic!("should sign random hash: {}", error),
        };
        Approval::new(PublicKey::from(&secret_key), signature)
    }
}

impl Display for Approval {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "approval({})", self.signer)
    }
}

impl ToBytes for Approval {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.signer.serialized_length() + self.signature.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.signer.write_bytes(writer)?;
        self.signature.write_bytes(writer)
    }
}

impl FromBytes for Approval {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (signer, remainder) = PublicKey::from_bytes(bytes)?;
        let (signature, remainder) = Signature::from_bytes(remainder)?;
        Ok((Approval::new(signer, signature), remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_signer_then_signature() {
        let rng = &mut TestRng::new();
        let approval = Approval::random(rng);
        let bytes = approval.to_bytes().unwrap();
        let signer_length = approval.signer().serialized_length();
        assert_eq!(&bytes[..signer_length], approval.signer().to_bytes().unwrap().as_slice());
        assert_eq!(bytes.len(), approval.serialized_length());
        bytesrepr::test_serialization_roundtrip(&approval);
    }

    #[test]
    fn json_should_be_signer_and_signature_hex() {
        let rng = &mut TestRng::new();
        let approval = Approval::random(rng);
        let json = approval.to_json();
        assert_eq!(json["signer"], json!(approval.signer().to_hex()));
        assert_eq!(Approval::from_json(&json).unwrap(), approval);
        assert_eq!(serde_json::from_value::<Approval>(json).unwrap(), approval);
        assert!(matches!(
            Approval::from_json(&json!({ "signer": approval.signer().to_hex() })),
            Err(Error::MalformedValue(_))
        ));
    }

    #[test]
    fn should_verify_only_the_signed_hash() {
        let rng = &mut TestRng::new();
        let hash = DeployHash::random(rng);
        let approval = Approval::create(&hash, &SecretKey::random(rng)).unwrap();
        approval.verify(&hash).unwrap();

        let other_hash = DeployHash::random(rng);
        assert!(matches!(
            approval.verify(&other_hash),
            Err(Error::InvalidSignature(_))
        ));
    }
}
