use std::{fs::File, path::PathBuf, str::FromStr};

use serde_json::Value;

use casper_sdk_types::{
    bytesrepr::{self, FromBytes, ToBytes},
    make_body_hash, AccountHash, AsymmetricType, CLValue, Deploy, DeployHash, DeployParams, Digest,
    ExecutableDeployItem, PublicKey, RuntimeArgs, SecretKey, TimeDiff, Timestamp, U512,
};

const DEPLOY_HEX: &str = "017f747b67bd3fe63c2a736739dfe40156d622347346e70f68f51c178a75ce5537a087c0\
377901000040771b00000000000200000000000000f2e0782bba4a0a9663cafc7d707fd4a74421bc5bfef4e368b7e8f38d\
fab87db8020000000f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f101010101010101010\
1010101010101010101010101010101010101010101010070000006d61696e6e6574d7a68bbe656a883d04bba9f26aa340\
dbe3f8ec99b2adb63b628f2bc92043199800000000000100000006000000616d6f756e74050000000400ca9a3b08050400\
000006000000616d6f756e740600000005005550b40508060000007461726765742000000001010101010101010101010\
101010101010101010101010101010101010101010f200000000200000069640900000001e7030000000000000d050f00\
00006164646974696f6e616c5f696e666f140000001000000074686973206973207472616e736665720a01000000017f7\
47b67bd3fe63c2a736739dfe40156d622347346e70f68f51c178a75ce55370195a68b1a05731b7014e580b4c67a506e03\
39a7fffeaded9f24eb2e7f78b96bdd900b9be8ca33e4552a9a619dc4fc5e4e3a9f74a4b0537c14a5a8007d62a5dc06";

const ACCOUNT_HEX: &str = "017f747b67bd3fe63c2a736739dfe40156d622347346e70f68f51c178a75ce5537";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("deploy.json")
}

fn read_fixture() -> Deploy {
    let file = File::open(fixture_path()).unwrap();
    Deploy::from_json_reader(file).unwrap()
}

fn fixture_payment() -> ExecutableDeployItem {
    ExecutableDeployItem::new_module_bytes_payment(1_000_000_000u64).unwrap()
}

fn fixture_session() -> ExecutableDeployItem {
    let mut args = RuntimeArgs::new();
    args.insert("amount", U512::from(24_500_000_000u64)).unwrap();
    args.insert("target", AccountHash::new([1; 32])).unwrap();
    args.insert("id", Some(999u64)).unwrap();
    args.insert("additional_info", "this is transfer".to_string())
        .unwrap();
    ExecutableDeployItem::Transfer { args }
}

#[test]
fn should_read_fixture_header() {
    let deploy = read_fixture();
    let header = deploy.header();

    assert_eq!(header.account(), &PublicKey::from_hex(ACCOUNT_HEX).unwrap());
    assert_eq!(
        header.timestamp(),
        Timestamp::from_str("2021-05-04T14:20:35.104Z").unwrap()
    );
    assert_eq!(header.ttl(), TimeDiff::from_seconds(30 * 60));
    assert_eq!(header.gas_price(), 2);
    assert_eq!(header.chain_name(), "mainnet");
    assert_eq!(
        header.dependencies(),
        &vec![
            DeployHash::new(Digest::from([15; 32])),
            DeployHash::new(Digest::from([16; 32])),
        ]
    );
    assert_eq!(
        deploy.hash().inner().to_string(),
        "d7a68bbe656a883d04bba9f26aa340dbe3f8ec99b2adb63b628f2bc920431998"
    );
    assert!(deploy.is_transfer());
    assert_eq!(deploy.approvals().len(), 1);
    deploy.verify().unwrap();
}

#[test]
fn should_encode_fixture_to_canonical_bytes() {
    let deploy = read_fixture();
    let bytes = deploy.to_bytes().unwrap();
    assert_eq!(base16::encode_lower(&bytes), DEPLOY_HEX);
    assert_eq!(bytes.len(), deploy.serialized_length());

    let decoded = Deploy::from_bytes(&bytes).unwrap().0;
    assert_eq!(decoded, deploy);
    decoded.has_valid_hash().unwrap();
    bytesrepr::test_serialization_roundtrip(&deploy);
}

#[test]
fn should_write_fixture_json() {
    let deploy = read_fixture();
    let file = File::open(fixture_path()).unwrap();
    let expected: Value = serde_json::from_reader(file).unwrap();
    assert_eq!(deploy.to_json(), expected);
}

#[test]
fn should_rebuild_fixture_body_from_constructors() {
    let deploy = read_fixture();
    let payment = fixture_payment();
    let session = fixture_session();

    assert_eq!(deploy.payment(), &payment);
    assert_eq!(deploy.session(), &session);
    assert_eq!(
        make_body_hash(&payment, &session).unwrap().to_string(),
        "f2e0782bba4a0a9663cafc7d707fd4a74421bc5bfef4e368b7e8f38dfab87db8"
    );

    let amount: U512 = session
        .args()
        .get("amount")
        .cloned()
        .map(CLValue::into_t)
        .unwrap()
        .unwrap();
    assert_eq!(amount, U512::from(24_500_000_000u64));
    let id: Option<u64> = session.args().get("id").unwrap().clone().into_t().unwrap();
    assert_eq!(id, Some(999));
}

#[test]
fn should_reject_fixture_with_tampered_header() {
    let file = File::open(fixture_path()).unwrap();
    let mut json: Value = serde_json::from_reader(file).unwrap();
    json["header"]["gas_price"] = Value::from(3);
    assert!(matches!(
        Deploy::from_json(&json),
        Err(casper_sdk_types::Error::InvalidDeployHash { .. })
    ));
}

#[test]
fn should_build_sign_and_verify_transfer() {
    let secret_key = SecretKey::generate_ed25519().unwrap();
    let params = DeployParams::new(PublicKey::from(&secret_key), "mainnet")
        .with_gas_price(2)
        .with_timestamp(Timestamp::from_str("2021-05-04T14:20:35.104Z").unwrap())
        .with_dependencies(vec![
            DeployHash::new(Digest::from([15; 32])),
            DeployHash::new(Digest::from([16; 32])),
        ]);

    let mut deploy = Deploy::new(params, fixture_session(), fixture_payment()).unwrap();
    assert_eq!(
        deploy.header().body_hash().to_string(),
        "f2e0782bba4a0a9663cafc7d707fd4a74421bc5bfef4e368b7e8f38dfab87db8"
    );
    assert!(deploy.verify().is_err());

    deploy.sign(&secret_key).unwrap();
    deploy.verify().unwrap();

    let json = deploy.to_json();
    let parsed = Deploy::from_json(&json).unwrap();
    assert_eq!(parsed, deploy);
    parsed.verify().unwrap();
}
