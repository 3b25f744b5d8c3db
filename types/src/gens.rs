//! Contains functions for generating arbitrary values for use by
//! [`Proptest`](https://crates.io/crates/proptest).
#![allow(missing_docs)]

use std::collections::BTreeMap;

use proptest::{
    array,
    collection::{self, SizeRange},
    option,
    prelude::*,
    result,
};

use crate::{
    account_hash::AccountHash,
    bytesrepr::Bytes,
    deploy::{DeployHash, ExecutableDeployItem},
    runtime_args::NamedArg,
    AccessRights, CLValue, Key, PublicKey, RuntimeArgs, SecretKey, URef, U128, U256, U512,
};

pub fn u8_slice_32() -> impl Strategy<Value = [u8; 32]> {
    collection::vec(any::<u8>(), 32).prop_map(|b| {
        let mut res = [0u8; 32];
        res.clone_from_slice(b.as_slice());
        res
    })
}

pub fn u128_arb() -> impl Strategy<Value = U128> {
    collection::vec(any::<u8>(), 0..16).prop_map(|b| U128::from_little_endian(b.as_slice()))
}

pub fn u256_arb() -> impl Strategy<Value = U256> {
    collection::vec(any::<u8>(), 0..32).prop_map(|b| U256::from_little_endian(b.as_slice()))
}

pub fn u512_arb() -> impl Strategy<Value = U512> {
    prop_oneof![
        1 => Just(U512::zero()),
        8 => collection::vec(any::<u8>(), 0..64)
            .prop_map(|b| U512::from_little_endian(b.as_slice())),
        1 => Just(U512::MAX),
    ]
}

pub fn bytes_arb(size: impl Into<SizeRange>) -> impl Strategy<Value = Bytes> {
    collection::vec(any::<u8>(), size).prop_map(Bytes::from)
}

pub fn access_rights_arb() -> impl Strategy<Value = AccessRights> {
    prop_oneof![
        Just(AccessRights::NONE),
        Just(AccessRights::READ),
        Just(AccessRights::ADD),
        Just(AccessRights::WRITE),
        Just(AccessRights::READ_ADD),
        Just(AccessRights::READ_WRITE),
        Just(AccessRights::ADD_WRITE),
        Just(AccessRights::READ_ADD_WRITE),
    ]
}

pub fn uref_arb() -> impl Strategy<Value = URef> {
    (array::uniform32(any::<u8>()), access_rights_arb())
        .prop_map(|(id, access_rights)| URef::new(id, access_rights))
}

pub fn account_hash_arb() -> impl Strategy<Value = AccountHash> {
    u8_slice_32().prop_map(AccountHash::new)
}

pub fn key_arb() -> impl Strategy<Value = Key> {
    prop_oneof![
        account_hash_arb().prop_map(Key::Account),
        u8_slice_32().prop_map(Key::Hash),
        uref_arb().prop_map(Key::URef),
        u8_slice_32().prop_map(Key::Transfer),
        u8_slice_32().prop_map(Key::DeployInfo),
    ]
}

pub fn public_key_arb() -> impl Strategy<Value = PublicKey> {
    prop_oneof![
        u8_slice_32().prop_map(|bytes| {
            let secret_key =
                SecretKey::ed25519_from_bytes(bytes).expect("should create secret key");
            PublicKey::from(&secret_key)
        }),
        u8_slice_32()
            .prop_filter("must be a valid secp256k1 scalar", |bytes| {
                SecretKey::secp256k1_from_bytes(bytes).is_ok()
            })
            .prop_map(|bytes| {
                let secret_key =
                    SecretKey::secp256k1_from_bytes(bytes).expect("should create secret key");
                PublicKey::from(&secret_key)
            }),
    ]
}

pub fn deploy_hash_arb() -> impl Strategy<Value = DeployHash> {
    array::uniform32(<u8>::arbitrary()).prop_map(DeployHash::from_raw)
}

fn to_cl_value<T: crate::CLTyped + crate::bytesrepr::ToBytes>(value: T) -> CLValue {
    CLValue::from_t(value).expect("should create CLValue")
}

fn scalar_cl_value_arb() -> impl Strategy<Value = CLValue> {
    prop_oneof![
        any::<bool>().prop_map(to_cl_value),
        any::<i32>().prop_map(to_cl_value),
        any::<i64>().prop_map(to_cl_value),
        any::<u8>().prop_map(to_cl_value),
        any::<u32>().prop_map(to_cl_value),
        any::<u64>().prop_map(to_cl_value),
        u128_arb().prop_map(to_cl_value),
        u256_arb().prop_map(to_cl_value),
        u512_arb().prop_map(to_cl_value),
        Just(CLValue::unit()),
    ]
}

fn textual_cl_value_arb() -> impl Strategy<Value = CLValue> {
    prop_oneof![
        ".*".prop_map(to_cl_value),
        key_arb().prop_map(to_cl_value),
        uref_arb().prop_map(to_cl_value),
        public_key_arb().prop_map(to_cl_value),
    ]
}

fn composite_cl_value_arb() -> impl Strategy<Value = CLValue> {
    prop_oneof![
        option::of(any::<u64>()).prop_map(to_cl_value),
        collection::vec(any::<i32>(), 0..20).prop_map(to_cl_value),
        u8_slice_32().prop_map(to_cl_value),
        result::maybe_ok(any::<u64>(), "[a-z]{0,8}").prop_map(to_cl_value),
        collection::btree_map("[a-z]{1,8}", u512_arb(), 0..5)
            .prop_map(|map: BTreeMap<String, U512>| to_cl_value(map)),
        any::<u8>().prop_map(|a| to_cl_value((a,))),
        (any::<u32>(), ".*").prop_map(|(a, b)| to_cl_value((a, b))),
        (any::<bool>(), key_arb(), option::of(uref_arb()))
            .prop_map(|(a, b, c)| to_cl_value((a, b, c))),
    ]
}

/// Values of every concrete type, nested at most one level deep.
pub fn cl_value_arb() -> impl Strategy<Value = CLValue> {
    prop_oneof![
        scalar_cl_value_arb(),
        textual_cl_value_arb(),
        composite_cl_value_arb(),
    ]
}

pub fn named_arg_arb() -> impl Strategy<Value = NamedArg> {
    ("[a-z_]{1,16}", cl_value_arb())
        .prop_map(|(name, value)| NamedArg::new(name, value).expect("name should be non-empty"))
}

pub fn runtime_args_arb() -> impl Strategy<Value = RuntimeArgs> {
    collection::vec(named_arg_arb(), 0..5).prop_map(RuntimeArgs::from)
}

pub fn executable_deploy_item_arb() -> impl Strategy<Value = ExecutableDeployItem> {
    let name = "[a-zA-Z0-9_]{1,20}";
    prop_oneof![
        (bytes_arb(0..100), runtime_args_arb()).prop_map(|(module_bytes, args)| {
            ExecutableDeployItem::ModuleBytes { module_bytes, args }
        }),
        (u8_slice_32(), name, runtime_args_arb()).prop_map(|(hash, entry_point, args)| {
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            }
        }),
        (name, name, runtime_args_arb()).prop_map(|(name, entry_point, args)| {
            ExecutableDeployItem::StoredContractByName {
                name,
                entry_point,
                args,
            }
        }),
        (
            u8_slice_32(),
            option::of(any::<u32>()),
            name,
            runtime_args_arb()
        )
            .prop_map(|(hash, version, entry_point, args)| {
                ExecutableDeployItem::StoredVersionedContractByHash {
                    hash,
                    version,
                    entry_point,
                    args,
                }
            }),
        (name, option::of(any::<u32>()), name, runtime_args_arb()).prop_map(
            |(name, version, entry_point, args)| {
                ExecutableDeployItem::StoredVersionedContractByName {
                    name,
                    version,
                    entry_point,
                    args,
                }
            }
        ),
        runtime_args_arb().prop_map(|args| ExecutableDeployItem::Transfer { args }),
    ]
}
