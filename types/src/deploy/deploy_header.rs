use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DeployHash;
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    crypto::AsymmetricType,
    json_node::JsonNode,
    Digest, Error, PublicKey, TimeDiff, Timestamp,
};

/// The header portion of a [`Deploy`](super::Deploy).
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct DeployHeader {
    account: PublicKey,
    timestamp: Timestamp,
    ttl: TimeDiff,
    gas_price: u64,
    body_hash: Digest,
    dependencies: Vec<DeployHash>,
    chain_name: String,
}

impl DeployHeader {
    pub(super) fn new(
        account: PublicKey,
        timestamp: Timestamp,
        ttl: TimeDiff,
        gas_price: u64,
        body_hash: Digest,
        dependencies: Vec<DeployHash>,
        chain_name: String,
    ) -> Self {
        DeployHeader {
            account,
            timestamp,
            ttl,
            gas_price,
            body_hash,
            dependencies,
            chain_name,
        }
    }

    /// Returns the public key of the account providing the context in which to run the deploy.
    pub fn account(&self) -> &PublicKey {
        &self.account
    }

    /// Returns the creation timestamp of the deploy.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the duration after the creation timestamp for which the deploy will stay valid.
    pub fn ttl(&self) -> TimeDiff {
        self.ttl
    }

    /// Returns `true` if the deploy has expired at `current_instant`.
    pub fn expired(&self, current_instant: Timestamp) -> bool {
        self.expires() < current_instant
    }

    /// Returns the price per gas unit for the deploy.
    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    /// Returns the hash of the body (i.e. the payment and session code) of the deploy.
    pub fn body_hash(&self) -> &Digest {
        &self.body_hash
    }

    /// Returns the list of other deploys that have to be executed before this one.
    pub fn dependencies(&self) -> &Vec<DeployHash> {
        &self.dependencies
    }

    /// Returns the name of the chain the deploy should be executed on.
    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    /// Returns the point in time when the deploy will expire.
    pub fn expires(&self) -> Timestamp {
        self.timestamp.saturating_add(self.ttl)
    }

    pub(super) fn from_json<N: JsonNode>(node: &N) -> Result<Self, Error> {
        let text = |field: &str| {
            node.get_present(field)
                .and_then(|value| value.as_text())
                .ok_or_else(|| {
                    Error::MalformedValue(format!("header is missing text field '{}'", field))
                })
        };

        let account = PublicKey::from_hex(text("account")?)?;
        let timestamp = Timestamp::from_str(text("timestamp")?)
            .map_err(|error| Error::MalformedValue(format!("invalid timestamp: {}", error)))?;
        let ttl = TimeDiff::from_str(text("ttl")?)
            .map_err(|error| Error::MalformedValue(format!("invalid ttl: {}", error)))?;
        let gas_price = node
            .get_present("gas_price")
            .and_then(|value| value.as_u64())
            .ok_or_else(|| {
                Error::MalformedValue("header gas_price must be an unsigned integer".to_string())
            })?;
        let body_hash = Digest::from_hex(text("body_hash")?)
            .map_err(|error| Error::MalformedValue(format!("invalid body hash: {}", error)))?;
        let dependencies = match node.get_present("dependencies") {
            None => vec![],
            Some(dependencies) => dependencies
                .elements()
                .ok_or_else(|| {
                    Error::MalformedValue("header dependencies must be an array".to_string())
                })?
                .into_iter()
                .map(DeployHash::from_json)
                .collect::<Result<Vec<_>, _>>()?,
        };
        let chain_name = text("chain_name")?.to_string();

        Ok(DeployHeader {
            account,
            timestamp,
            ttl,
            gas_price,
            body_hash,
            dependencies,
            chain_name,
        })
    }

    pub(super) fn to_json(&self) -> Value {
        let dependencies: Vec<String> = self
            .dependencies
            .iter()
            .map(|dependency| dependency.inner().to_string())
            .collect();
        json!({
            "account": self.account.to_hex(),
            "timestamp": self.timestamp.to_string(),
            "ttl": self.ttl.to_string(),
            "gas_price": self.gas_price,
            "body_hash": self.body_hash.to_string(),
            "dependencies": dependencies,
            "chain_name": self.chain_name,
        })
    }
}

impl Display for DeployHeader {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "deploy-header[account: {}, timestamp: {}, ttl: {}, gas_price: {}, body_hash: {}, \
            dependencies: [{}], chain_name: {}]",
            self.account,
            self.timestamp,
            self.ttl,
            self.gas_price,
            self.body_hash,
            itertools::join(&self.dependencies, ", "),
            self.chain_name,
        )
    }
}

impl ToBytes for DeployHeader {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.account.serialized_length()
            + self.timestamp.serialized_length()
            + self.ttl.serialized_length()
            + self.gas_price.serialized_length()
            + self.body_hash.serialized_length()
            + self.dependencies.serialized_length()
            + self.chain_name.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.account.write_bytes(writer)?;
        self.timestamp.write_bytes(writer)?;
        self.ttl.write_bytes(writer)?;
        self.gas_price.write_bytes(writer)?;
        self.body_hash.write_bytes(writer)?;
        self.dependencies.write_bytes(writer)?;
        self.chain_name.write_bytes(writer)
    }
}

impl FromBytes for DeployHeader {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (account, remainder) = PublicKey::from_bytes(bytes)?;
        let (timestamp, remainder) = Timestamp::from_bytes(remainder)?;
        let (ttl, remainder) = TimeDiff::from_bytes(remainder)?;
        let (gas_price, remainder) = u64::from_bytes(remainder)?;
        let (body_hash, remainder) = Digest::from_bytes(remainder)?;
        let (dependencies, remainder) = Vec::<DeployHash>::from_bytes(remainder)?;
        let (chain_name, remainder) = String::from_bytes(remainder)?;
        let header = DeployHeader {
            account,
            timestamp,
            ttl,
            gas_price,
            body_hash,
            dependencies,
            chain_name,
        };
        Ok((header, remainder))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::testing::TestRng;

    fn random_header(rng: &mut TestRng) -> DeployHeader {
        DeployHeader::new(
            PublicKey::random(rng),
            Timestamp::random(rng),
            TimeDiff::from_seconds(90),
            rng.gen_range(1..100),
            Digest::hash(rng.random_vec::<_, u8>(1..50)),
            vec![DeployHash::random(rng), DeployHash::random(rng)],
            rng.random_string(1..20),
        )
    }

    #[test]
    fn bytesrepr_roundtrip() {
        let mut rng = TestRng::new();
        let header = random_header(&mut rng);
        bytesrepr::test_serialization_roundtrip(&header);
    }

    #[test]
    fn json_roundtrip() {
        let mut rng = TestRng::new();
        let header = random_header(&mut rng);
        let json = header.to_json();
        assert_eq!(json["ttl"], "1m 30s");
        assert_eq!(DeployHeader::from_json(&json).unwrap(), header);
        let via_serde: DeployHeader =
            serde_json::from_value(serde_json::to_value(&header).unwrap()).unwrap();
        assert_eq!(via_serde, header);
    }

    #[test]
    fn should_expire_after_ttl() {
        let mut rng = TestRng::new();
        let header = random_header(&mut rng);
        assert_eq!(
            header.expires().millis(),
            header.timestamp().millis() + 90_000
        );
        assert!(!header.expired(header.expires()));
        assert!(header.expired(header.expires() + TimeDiff::from_millis(1)));
    }

    #[test]
    fn should_reject_missing_fields() {
        let mut rng = TestRng::new();
        let mut json = random_header(&mut rng).to_json();
        json["gas_price"] = Value::from("two");
        assert!(matches!(
            DeployHeader::from_json(&json),
            Err(Error::MalformedValue(_))
        ));
    }
}
