//! Deploys: the header, payment and session code, and approvals of a request to execute code on
//! the network.

mod approval;
mod deploy_config;
mod deploy_hash;
mod deploy_header;
mod deploy_params;
mod executable_deploy_item;

use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    io::Read,
};

use itertools::Itertools;
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use tracing::{debug, warn};

#[cfg(any(feature = "testing", test))]
use crate::testing::TestRng;
use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    json_node::JsonNode,
    Digest, Error, SecretKey,
};
#[cfg(any(feature = "testing", test))]
use crate::{PublicKey, TimeDiff, Timestamp};

pub use approval::Approval;
pub use deploy_config::DeployConfig;
pub use deploy_hash::DeployHash;
pub use deploy_header::DeployHeader;
pub use deploy_params::DeployParams;
pub use executable_deploy_item::{
    ContractVersion, ExecutableDeployItem, ARG_AMOUNT, ARG_ID, ARG_TARGET,
    DEFAULT_ENTRY_POINT_NAME, STANDARD_PAYMENT_CONTRACT_NAME,
};

/// Returns the Blake2b-256 digest of the serialized payment followed by the serialized session.
pub fn make_body_hash(
    payment: &ExecutableDeployItem,
    session: &ExecutableDeployItem,
) -> Result<Digest, Error> {
    let payment_bytes = payment.to_bytes()?;
    let session_bytes = session.to_bytes()?;
    Ok(Digest::hash_parts(&[
        payment_bytes.as_slice(),
        session_bytes.as_slice(),
    ]))
}

fn make_deploy_hash(header: &DeployHeader) -> Result<DeployHash, Error> {
    Ok(DeployHash::new(Digest::hash(header.to_bytes()?)))
}

/// A signed item sent to the network used to request execution of Wasm.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Deploy {
    hash: DeployHash,
    header: DeployHeader,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
    approvals: BTreeSet<Approval>,
}

impl Deploy {
    /// Assembles an unsigned `Deploy`.
    ///
    /// The header takes its metadata from `params`, with duplicate dependencies removed, and the
    /// hash of `payment` and `session` as its body hash.  The deploy hash is the hash of the
    /// serialized header.
    pub fn new(
        params: DeployParams,
        session: ExecutableDeployItem,
        payment: ExecutableDeployItem,
    ) -> Result<Deploy, Error> {
        let body_hash = make_body_hash(&payment, &session)?;

        // Remove duplicates.
        let dependencies = params.dependencies.into_iter().unique().collect();
        let header = DeployHeader::new(
            params.account,
            params.timestamp,
            params.ttl,
            params.gas_price,
            body_hash,
            dependencies,
            params.chain_name,
        );
        let hash = make_deploy_hash(&header)?;
        debug!(
            deploy_hash = %hash.inner(),
            chain_name = header.chain_name(),
            "assembled deploy"
        );

        Ok(Deploy {
            hash,
            header,
            payment,
            session,
            approvals: BTreeSet::new(),
        })
    }

    /// Adds a signature of this deploy's hash to its approvals.
    ///
    /// Signing twice with the same key leaves a single approval for that key when the algorithm
    /// is deterministic.
    pub fn sign(&mut self, secret_key: &SecretKey) -> Result<(), Error> {
        let approval = Approval::create(&self.hash, secret_key)?;
        debug!(
            deploy_hash = %self.hash.inner(),
            signer = %approval.signer(),
            "signed deploy"
        );
        let _ = self.approvals.insert(approval);
        Ok(())
    }

    /// Returns the hash uniquely identifying this deploy.
    pub fn hash(&self) -> &DeployHash {
        &self.hash
    }

    /// Returns the header portion of the deploy.
    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    /// Returns the payment code of the deploy.
    pub fn payment(&self) -> &ExecutableDeployItem {
        &self.payment
    }

    /// Returns the session code of the deploy.
    pub fn session(&self) -> &ExecutableDeployItem {
        &self.session
    }

    /// Returns the approvals, ordered by signer and signature.
    pub fn approvals(&self) -> &BTreeSet<Approval> {
        &self.approvals
    }

    /// Returns `true` if the session code is a native transfer.
    pub fn is_transfer(&self) -> bool {
        self.session.is_transfer()
    }

    /// Returns `Ok` if and only if this deploy's body hashes to the value of `body_hash()`, and if
    /// this deploy's header hashes to the value claimed as the deploy hash.
    pub fn has_valid_hash(&self) -> Result<(), Error> {
        let body_hash = make_body_hash(&self.payment, &self.session)?;
        if body_hash != *self.header.body_hash() {
            warn!(deploy_hash = %self.hash.inner(), %body_hash, "invalid deploy body hash");
            return Err(Error::InvalidBodyHash {
                expected: *self.header.body_hash(),
                actual: body_hash,
            });
        }

        let hash = make_deploy_hash(&self.header)?;
        if hash != self.hash {
            warn!(deploy_hash = %self.hash.inner(), actual = %hash.inner(), "invalid deploy hash");
            return Err(Error::InvalidDeployHash {
                expected: *self.hash.inner(),
                actual: *hash.inner(),
            });
        }
        Ok(())
    }

    /// Returns `Ok` if and only if:
    ///   * the deploy hash is correct (see [`Deploy::has_valid_hash`] for details)
    ///   * approvals are non empty, and
    ///   * all approvals are valid signatures of the deploy hash
    pub fn verify(&self) -> Result<(), Error> {
        if self.approvals.is_empty() {
            warn!(deploy_hash = %self.hash.inner(), "deploy has no approvals");
            return Err(Error::EmptyApprovals);
        }

        self.has_valid_hash()?;

        for (index, approval) in self.approvals.iter().enumerate() {
            if let Err(error) = approval.verify(&self.hash) {
                warn!(
                    deploy_hash = %self.hash.inner(),
                    "failed to verify deploy approval {}: {}", index, error
                );
                return Err(error);
            }
        }

        Ok(())
    }

    /// Parses a deploy from its JSON form, checking that its body hash and deploy hash are
    /// consistent with its contents.  Approvals are not verified.
    pub fn from_json<N: JsonNode>(node: &N) -> Result<Deploy, Error> {
        let field = |name: &str| {
            node.get_present(name)
                .ok_or_else(|| Error::MalformedValue(format!("deploy is missing field '{}'", name)))
        };

        let hash = DeployHash::from_json(field("hash")?)?;
        let header = DeployHeader::from_json(field("header")?)?;
        let payment = ExecutableDeployItem::from_json_field(node, "payment")?;
        let session = ExecutableDeployItem::from_json_field(node, "session")?;
        let approvals = match node.get_present("approvals") {
            None => BTreeSet::new(),
            Some(approvals) => approvals
                .elements()
                .ok_or_else(|| Error::MalformedValue("approvals must be an array".to_string()))?
                .into_iter()
                .map(Approval::from_json)
                .collect::<Result<BTreeSet<_>, _>>()?,
        };

        let deploy = Deploy {
            hash,
            header,
            payment,
            session,
            approvals,
        };
        deploy.has_valid_hash()?;
        Ok(deploy)
    }

    /// Reads a JSON document from `reader` and parses it as a deploy.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Deploy, Error> {
        let json: Value = serde_json::from_reader(reader)?;
        Self::from_json(&json)
    }

    /// Returns the JSON form of this deploy.
    pub fn to_json(&self) -> Value {
        let approvals: Vec<Value> = self.approvals.iter().map(Approval::to_json).collect();
        json!({
            "hash": self.hash.inner().to_string(),
            "header": self.header.to_json(),
            "payment": self.payment.to_json(),
            "session": self.session.to_json(),
            "approvals": approvals,
        })
    }

    /// Returns a random, signed `Deploy`.
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        use rand::Rng;

        let secret_key = SecretKey::random(rng);
        let dependencies = (0..3).map(|_| DeployHash::random(rng)).collect();
        let params = DeployParams::new(PublicKey::from(&secret_key), "casper-example")
            .with_timestamp(Timestamp::random(rng))
            .with_ttl(TimeDiff::from_millis(rng.gen_range(60_000..3_600_000)))
            .with_gas_price(rng.gen_range(1..100))
            .with_dependencies(dependencies);

        let result = ExecutableDeployItem::new_standard_payment(rng.gen::<u64>())
            .and_then(|payment| Deploy::new(params, rng.gen(), payment))
            .and_then(|mut deploy| {
                deploy.sign(&secret_key)?;
                Ok(deploy)
            });
        match result {
            Ok(deploy) => deploy,
            Err(error) => panic!("should create random deploy: {}", error),
        }
    }
}

impl Display for Deploy {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "deploy[{}, {}, payment_code: {}, session_code: {}, approvals: [{}]]",
            self.hash,
            self.header,
            self.payment,
            self.session,
            self.approvals.iter().join(", ")
        )
    }
}

impl ToBytes for Deploy {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.header.serialized_length()
            + self.hash.serialized_length()
            + self.payment.serialized_length()
            + self.session.serialized_length()
            + self.approvals.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.header.write_bytes(writer)?;
        self.hash.write_bytes(writer)?;
        self.payment.write_bytes(writer)?;
        self.session.write_bytes(writer)?;
        self.approvals.write_bytes(writer)
    }
}

impl FromBytes for Deploy {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (header, remainder) = DeployHeader::from_bytes(bytes)?;
        let (hash, remainder) = DeployHash::from_bytes(remainder)?;
        let (payment, remainder) = ExecutableDeployItem::from_bytes(remainder)?;
        let (session, remainder) = ExecutableDeployItem::from_bytes(remainder)?;
        let (approvals, remainder) = BTreeSet::<Approval>::from_bytes(remainder)?;
        let deploy = Deploy {
            hash,
            header,
            payment,
            session,
            approvals,
        };
        Ok((deploy, remainder))
    }
}

impl Serialize for Deploy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_json().serialize(serializer)
        } else {
            self.to_bytes()
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Deploy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let json = Value::deserialize(deserializer)?;
            Deploy::from_json(&json).map_err(SerdeError::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{crypto::AsymmetricType, AccountHash, PublicKey, TimeDiff, Timestamp};

    fn params(secret_key: &SecretKey) -> DeployParams {
        DeployParams::new(PublicKey::from(secret_key), "mainnet")
            .with_timestamp(Timestamp::from(1_620_138_035_104))
            .with_ttl(TimeDiff::from_millis(1_800_000))
            .with_gas_price(2)
    }

    fn transfer_deploy(rng: &mut TestRng, secret_key: &SecretKey) -> Deploy {
        let session = ExecutableDeployItem::new_transfer(
            24_500_000_000u64,
            AccountHash::new([1; 32]),
            Some(999),
        )
        .unwrap();
        let payment = ExecutableDeployItem::new_module_bytes_payment(1_000_000_000u64).unwrap();
        let dependencies = vec![DeployHash::random(rng)];
        Deploy::new(
            params(secret_key).with_dependencies(dependencies),
            session,
            payment,
        )
        .unwrap()
    }

    #[test]
    fn should_hash_header_and_body() {
        let mut rng = TestRng::new();
        let secret_key = SecretKey::random(&mut rng);
        let deploy = transfer_deploy(&mut rng, &secret_key);

        let mut body = deploy.payment().to_bytes().unwrap();
        body.extend(deploy.session().to_bytes().unwrap());
        assert_eq!(*deploy.header().body_hash(), Digest::hash(&body));
        assert_eq!(
            *deploy.header().body_hash(),
            make_body_hash(deploy.payment(), deploy.session()).unwrap()
        );
        assert_eq!(
            *deploy.hash().inner(),
            Digest::hash(deploy.header().to_bytes().unwrap())
        );
        assert!(deploy.approvals().is_empty());
        assert!(deploy.is_transfer());
        deploy.has_valid_hash().unwrap();
    }

    #[test]
    fn body_hash_should_be_deterministic() {
        let payment = ExecutableDeployItem::new_standard_payment(1_000_000u64).unwrap();
        let session = ExecutableDeployItem::Transfer {
            args: Default::default(),
        };
        assert_eq!(
            make_body_hash(&payment, &session).unwrap(),
            make_body_hash(&payment.clone(), &session.clone()).unwrap()
        );
        assert_ne!(
            make_body_hash(&payment, &session).unwrap(),
            make_body_hash(&session, &payment).unwrap()
        );
    }

    #[test]
    fn should_remove_duplicate_dependencies() {
        let mut rng = TestRng::new();
        let secret_key = SecretKey::random(&mut rng);
        let first = DeployHash::random(&mut rng);
        let second = DeployHash::random(&mut rng);
        let params = params(&secret_key).with_dependencies(vec![first, second, first]);
        let deploy = Deploy::new(
            params,
            ExecutableDeployItem::Transfer {
                args: Default::default(),
            },
            ExecutableDeployItem::new_standard_payment(1u64).unwrap(),
        )
        .unwrap();
        assert_eq!(deploy.header().dependencies(), &vec![first, second]);
    }

    #[test]
    fn should_sign_and_verify() {
        let mut rng = TestRng::new();
        let ed25519_key = SecretKey::random_ed25519(&mut rng);
        let secp256k1_key = SecretKey::random_secp256k1(&mut rng);
        let mut deploy = transfer_deploy(&mut rng, &ed25519_key);
        assert!(matches!(deploy.verify(), Err(Error::EmptyApprovals)));

        deploy.sign(&ed25519_key).unwrap();
        deploy.verify().unwrap();
        deploy.sign(&ed25519_key).unwrap();
        assert_eq!(deploy.approvals().len(), 1);

        deploy.sign(&secp256k1_key).unwrap();
        assert_eq!(deploy.approvals().len(), 2);
        deploy.verify().unwrap();
    }

    #[test]
    fn should_reject_tampered_deploys() {
        let mut rng = TestRng::new();
        let secret_key = SecretKey::random(&mut rng);
        let mut deploy = transfer_deploy(&mut rng, &secret_key);
        deploy.sign(&secret_key).unwrap();

        let mut tampered_body = deploy.clone();
        tampered_body.session = ExecutableDeployItem::new_transfer(
            1u64,
            AccountHash::new([2; 32]),
            None,
        )
        .unwrap();
        assert!(matches!(
            tampered_body.verify(),
            Err(Error::InvalidBodyHash { .. })
        ));

        let mut tampered_hash = deploy.clone();
        tampered_hash.hash = DeployHash::random(&mut rng);
        assert!(matches!(
            tampered_hash.has_valid_hash(),
            Err(Error::InvalidDeployHash { .. })
        ));
        assert!(matches!(
            Deploy::from_json(&tampered_hash.to_json()),
            Err(Error::InvalidDeployHash { .. })
        ));

        let other_key = SecretKey::random(&mut rng);
        let forged = Approval::new(
            PublicKey::from(&other_key),
            *deploy.approvals().iter().next().unwrap().signature(),
        );
        let mut forged_deploy = deploy;
        forged_deploy.approvals = BTreeSet::from([forged]);
        assert!(matches!(
            forged_deploy.verify(),
            Err(Error::InvalidSignature(_))
        ));
    }

    #[test]
    fn bytesrepr_roundtrip() {
        let mut rng = TestRng::new();
        let deploy = Deploy::random(&mut rng);
        bytesrepr::test_serialization_roundtrip(&deploy);
        deploy.verify().unwrap();
    }

    #[test]
    fn json_roundtrip() {
        let mut rng = TestRng::new();
        let deploy = Deploy::random(&mut rng);
        let json = deploy.to_json();
        assert_eq!(
            json["header"]["account"],
            deploy.header().account().to_hex()
        );
        assert_eq!(Deploy::from_json(&json).unwrap(), deploy);

        let json_text = serde_json::to_string(&deploy).unwrap();
        assert_eq!(
            Deploy::from_json_reader(json_text.as_bytes()).unwrap(),
            deploy
        );
        assert_eq!(serde_json::from_str::<Deploy>(&json_text).unwrap(), deploy);
    }

    #[test]
    fn should_reject_missing_session() {
        let mut rng = TestRng::new();
        let mut json = Deploy::random(&mut rng).to_json();
        let _ = json.as_object_mut().unwrap().remove("session");
        assert!(matches!(
            Deploy::from_json(&json),
            Err(Error::MalformedValue(_))
        ));
        assert!(matches!(
            Deploy::from_json_reader("not json".as_bytes()),
            Err(Error::Json(_))
        ));
    }
}
