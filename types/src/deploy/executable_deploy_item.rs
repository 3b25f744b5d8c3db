use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
};

use rand::{
    distributions::{Alphanumeric, Distribution, Standard},
    Rng,
};
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use tracing::trace;

use crate::{
    account_hash::AccountHash,
    byte_utils,
    bytesrepr::{self, Bytes, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
    json_node::JsonNode,
    key::HashAddr,
    Error, RuntimeArgs, U512,
};

const TAG_LENGTH: usize = U8_SERIALIZED_LENGTH;
const MODULE_BYTES_TAG: u8 = 0;
const STORED_CONTRACT_BY_HASH_TAG: u8 = 1;
const STORED_CONTRACT_BY_NAME_TAG: u8 = 2;
const STORED_VERSIONED_CONTRACT_BY_HASH_TAG: u8 = 3;
const STORED_VERSIONED_CONTRACT_BY_NAME_TAG: u8 = 4;
const TRANSFER_TAG: u8 = 5;

const MODULE_BYTES: &str = "ModuleBytes";
const STORED_CONTRACT_BY_HASH: &str = "StoredContractByHash";
const STORED_CONTRACT_BY_NAME: &str = "StoredContractByName";
const STORED_VERSIONED_CONTRACT_BY_HASH: &str = "StoredVersionedContractByHash";
const STORED_VERSIONED_CONTRACT_BY_NAME: &str = "StoredVersionedContractByName";
const TRANSFER: &str = "Transfer";

const ARGS_FIELD: &str = "args";

/// The name of the entry point called by module bytes.
pub const DEFAULT_ENTRY_POINT_NAME: &str = "call";
/// The name of the named key holding the standard payment contract.
pub const STANDARD_PAYMENT_CONTRACT_NAME: &str = "payment";
/// The amount argument of payments and transfers.
pub const ARG_AMOUNT: &str = "amount";
/// The target argument of a transfer.
pub const ARG_TARGET: &str = "target";
/// The id argument of a transfer.
pub const ARG_ID: &str = "id";

/// Version of a contract within its package.
pub type ContractVersion = u32;

/// The payment or session code of a [`Deploy`](crate::Deploy).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ExecutableDeployItem {
    /// Raw bytes of compiled Wasm code, which must include a `call` entry point, and the arguments
    /// to call at runtime.
    ModuleBytes {
        /// The compiled Wasm bytes.  Empty for standard payment.
        module_bytes: Bytes,
        /// The arguments to be passed to the entry point at runtime.
        args: RuntimeArgs,
    },
    /// A contract stored in global state, referenced by its "hash", along with the entry point and
    /// arguments to call at runtime.
    StoredContractByHash {
        /// The contract's identifier.
        hash: HashAddr,
        /// The contract's entry point to be called at runtime.
        entry_point: String,
        /// The arguments to be passed to the entry point at runtime.
        args: RuntimeArgs,
    },
    /// A contract stored in global state, referenced by a named key existing in the `Deploy`'s
    /// account context, along with the entry point and arguments to call at runtime.
    StoredContractByName {
        /// The named of the named key under which the contract is referenced.
        name: String,
        /// The contract's entry point to be called at runtime.
        entry_point: String,
        /// The arguments to be passed to the entry point at runtime.
        args: RuntimeArgs,
    },
    /// A versioned contract stored in global state, referenced by its "hash", along with the entry
    /// point and arguments to call at runtime.
    StoredVersionedContractByHash {
        /// The contract package's identifier.
        hash: HashAddr,
        /// The version of the contract to call.  If `None`, the highest enabled version is used.
        version: Option<ContractVersion>,
        /// The contract's entry point to be called at runtime.
        entry_point: String,
        /// The arguments to be passed to the entry point at runtime.
        args: RuntimeArgs,
    },
    /// A versioned contract stored in global state, referenced by a named key existing in the
    /// `Deploy`'s account context, along with the entry point and arguments to call at runtime.
    StoredVersionedContractByName {
        /// The named of the named key under which the contract package is referenced.
        name: String,
        /// The version of the contract to call.  If `None`, the highest enabled version is used.
        version: Option<ContractVersion>,
        /// The contract's entry point to be called at runtime.
        entry_point: String,
        /// The arguments to be passed to the entry point at runtime.
        args: RuntimeArgs,
    },
    /// A native transfer which does not contain or reference any Wasm code.
    Transfer {
        /// The arguments to be passed to the native transfer entry point at runtime.
        args: RuntimeArgs,
    },
}

impl ExecutableDeployItem {
    /// Returns a new `ExecutableDeployItem::ModuleBytes`.
    pub fn new_module_bytes(module_bytes: Bytes, args: RuntimeArgs) -> Self {
        ExecutableDeployItem::ModuleBytes { module_bytes, args }
    }

    /// Returns a new `ExecutableDeployItem::StoredContractByHash`.
    pub fn new_stored_contract_by_hash(
        hash: HashAddr,
        entry_point: String,
        args: RuntimeArgs,
    ) -> Self {
        ExecutableDeployItem::StoredContractByHash {
            hash,
            entry_point,
            args,
        }
    }

    /// Returns a new `ExecutableDeployItem::StoredContractByName`.
    pub fn new_stored_contract_by_name(
        name: String,
        entry_point: String,
        args: RuntimeArgs,
    ) -> Self {
        ExecutableDeployItem::StoredContractByName {
            name,
            entry_point,
            args,
        }
    }

    /// Returns a new `ExecutableDeployItem::StoredVersionedContractByHash`.
    pub fn new_stored_versioned_contract_by_hash(
        hash: HashAddr,
        version: Option<ContractVersion>,
        entry_point: String,
        args: RuntimeArgs,
    ) -> Self {
        ExecutableDeployItem::StoredVersionedContractByHash {
            hash,
            version,
            entry_point,
            args,
        }
    }

    /// Returns a new `ExecutableDeployItem::StoredVersionedContractByName`.
    pub fn new_stored_versioned_contract_by_name(
        name: String,
        version: Option<ContractVersion>,
        entry_point: String,
        args: RuntimeArgs,
    ) -> Self {
        ExecutableDeployItem::StoredVersionedContractByName {
            name,
            version,
            entry_point,
            args,
        }
    }

    /// Returns a new `ExecutableDeployItem::StoredContractByName` calling the standard payment
    /// contract with `amount`.
    pub fn new_standard_payment<A: Into<U512>>(amount: A) -> Result<Self, Error> {
        let mut args = RuntimeArgs::new();
        args.insert(ARG_AMOUNT, amount.into())?;
        Ok(ExecutableDeployItem::StoredContractByName {
            name: STANDARD_PAYMENT_CONTRACT_NAME.to_string(),
            entry_point: DEFAULT_ENTRY_POINT_NAME.to_string(),
            args,
        })
    }

    /// Returns a new `ExecutableDeployItem::ModuleBytes` with no module, paying `amount` through
    /// the system's standard payment.
    pub fn new_module_bytes_payment<A: Into<U512>>(amount: A) -> Result<Self, Error> {
        let mut args = RuntimeArgs::new();
        args.insert(ARG_AMOUNT, amount.into())?;
        Ok(ExecutableDeployItem::ModuleBytes {
            module_bytes: Bytes::new(),
            args,
        })
    }

    /// Returns a new `ExecutableDeployItem` suitable for use as session code for a transfer.
    ///
    /// The arguments are `amount`, `target` and `id`, in that order.
    pub fn new_transfer<A: Into<U512>>(
        amount: A,
        target: AccountHash,
        maybe_transfer_id: Option<u64>,
    ) -> Result<Self, Error> {
        let mut args = RuntimeArgs::new();
        args.insert(ARG_AMOUNT, amount.into())?;
        args.insert(ARG_TARGET, target)?;
        args.insert(ARG_ID, maybe_transfer_id)?;
        Ok(ExecutableDeployItem::Transfer { args })
    }

    /// Returns the runtime arguments.
    pub fn args(&self) -> &RuntimeArgs {
        match self {
            ExecutableDeployItem::ModuleBytes { args, .. }
            | ExecutableDeployItem::StoredContractByHash { args, .. }
            | ExecutableDeployItem::StoredContractByName { args, .. }
            | ExecutableDeployItem::StoredVersionedContractByHash { args, .. }
            | ExecutableDeployItem::StoredVersionedContractByName { args, .. }
            | ExecutableDeployItem::Transfer { args } => args,
        }
    }

    /// Returns the entry point name.
    pub fn entry_point_name(&self) -> &str {
        match self {
            ExecutableDeployItem::ModuleBytes { .. } => DEFAULT_ENTRY_POINT_NAME,
            ExecutableDeployItem::Transfer { .. } => "transfer",
            ExecutableDeployItem::StoredContractByHash { entry_point, .. }
            | ExecutableDeployItem::StoredContractByName { entry_point, .. }
            | ExecutableDeployItem::StoredVersionedContractByHash { entry_point, .. }
            | ExecutableDeployItem::StoredVersionedContractByName { entry_point, .. } => {
                entry_point
            }
        }
    }

    /// Returns the binary tag of the variant.
    pub fn tag(&self) -> u8 {
        match self {
            ExecutableDeployItem::ModuleBytes { .. } => MODULE_BYTES_TAG,
            ExecutableDeployItem::StoredContractByHash { .. } => STORED_CONTRACT_BY_HASH_TAG,
            ExecutableDeployItem::StoredContractByName { .. } => STORED_CONTRACT_BY_NAME_TAG,
            ExecutableDeployItem::StoredVersionedContractByHash { .. } => {
                STORED_VERSIONED_CONTRACT_BY_HASH_TAG
            }
            ExecutableDeployItem::StoredVersionedContractByName { .. } => {
                STORED_VERSIONED_CONTRACT_BY_NAME_TAG
            }
            ExecutableDeployItem::Transfer { .. } => TRANSFER_TAG,
        }
    }

    /// Returns the name of the variant, as used for its JSON key.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ExecutableDeployItem::ModuleBytes { .. } => MODULE_BYTES,
            ExecutableDeployItem::StoredContractByHash { .. } => STORED_CONTRACT_BY_HASH,
            ExecutableDeployItem::StoredContractByName { .. } => STORED_CONTRACT_BY_NAME,
            ExecutableDeployItem::StoredVersionedContractByHash { .. } => {
                STORED_VERSIONED_CONTRACT_BY_HASH
            }
            ExecutableDeployItem::StoredVersionedContractByName { .. } => {
                STORED_VERSIONED_CONTRACT_BY_NAME
            }
            ExecutableDeployItem::Transfer { .. } => TRANSFER,
        }
    }

    /// Returns `true` if the executable item is a native transfer.
    pub fn is_transfer(&self) -> bool {
        matches!(self, ExecutableDeployItem::Transfer { .. })
    }

    /// Parses the executable held in `parent` under `field`, e.g. the `payment` or `session` of a
    /// deploy.
    pub fn from_json_field<N: JsonNode>(parent: &N, field: &str) -> Result<Self, Error> {
        let node = parent
            .get_present(field)
            .ok_or_else(|| Error::MalformedValue(format!("missing field '{}'", field)))?;
        Self::from_json(node)
    }

    /// Parses an executable from its JSON form: a single-field object keyed by the variant name.
    ///
    /// The variant's `args` may sit inside the variant object or next to it.
    pub fn from_json<N: JsonNode>(node: &N) -> Result<Self, Error> {
        let variant_keys: Vec<&str> = node
            .field_names()
            .into_iter()
            .filter(|name| *name != ARGS_FIELD)
            .collect();
        let variant = match variant_keys.as_slice() {
            [variant] => *variant,
            [] => {
                return Err(Error::InvalidExecutableField(
                    "no executable variant".to_string(),
                ))
            }
            keys => return Err(Error::InvalidExecutableField(keys.join(", "))),
        };
        let body = node
            .get(variant)
            .ok_or_else(|| Error::InvalidExecutableField(variant.to_string()))?;
        let fallback_args = node.get_present(ARGS_FIELD);
        trace!(variant, "reading executable from JSON");

        let fields = VariantFields {
            body,
            fallback_args,
        };
        match variant {
            MODULE_BYTES => fields
                .module_bytes()
                .map_err(|error| Error::conversion(MODULE_BYTES, error)),
            STORED_CONTRACT_BY_HASH => fields
                .stored_contract_by_hash()
                .map_err(|error| Error::conversion(STORED_CONTRACT_BY_HASH, error)),
            STORED_CONTRACT_BY_NAME => fields
                .stored_contract_by_name()
                .map_err(|error| Error::conversion(STORED_CONTRACT_BY_NAME, error)),
            STORED_VERSIONED_CONTRACT_BY_HASH => fields
                .stored_versioned_contract_by_hash()
                .map_err(|error| Error::conversion(STORED_VERSIONED_CONTRACT_BY_HASH, error)),
            STORED_VERSIONED_CONTRACT_BY_NAME => fields
                .stored_versioned_contract_by_name()
                .map_err(|error| Error::conversion(STORED_VERSIONED_CONTRACT_BY_NAME, error)),
            TRANSFER => fields
                .transfer()
                .map_err(|error| Error::conversion(TRANSFER, error)),
            unknown => Err(Error::InvalidExecutableField(unknown.to_string())),
        }
    }

    /// Returns the JSON form of this executable.
    pub fn to_json(&self) -> Value {
        let body = match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => json!({
                "module_bytes": byte_utils::encode_hex(module_bytes),
                "args": args.to_json(),
            }),
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            } => json!({
                "hash": byte_utils::encode_hex(hash),
                "entry_point": entry_point,
                "args": args.to_json(),
            }),
            ExecutableDeployItem::StoredContractByName {
                name,
                entry_point,
                args,
            } => json!({
                "name": name,
                "entry_point": entry_point,
                "args": args.to_json(),
            }),
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                args,
            } => json!({
                "hash": byte_utils::encode_hex(hash),
                "version": version,
                "entry_point": entry_point,
                "args": args.to_json(),
            }),
            ExecutableDeployItem::StoredVersionedContractByName {
                name,
                version,
                entry_point,
                args,
            } => json!({
                "name": name,
                "version": version,
                "entry_point": entry_point,
                "args": args.to_json(),
            }),
            ExecutableDeployItem::Transfer { args } => json!({ "args": args.to_json() }),
        };
        json!({ self.variant_name(): body })
    }
}

/// The fields of one variant's JSON object.
struct VariantFields<'a, N> {
    body: &'a N,
    fallback_args: Option<&'a N>,
}

impl<'a, N: JsonNode> VariantFields<'a, N> {
    fn text(&self, field: &str) -> Result<String, Error> {
        self.body
            .get_present(field)
            .and_then(|node| node.as_text())
            .map(str::to_string)
            .ok_or_else(|| Error::MalformedValue(format!("missing text field '{}'", field)))
    }

    fn hash(&self) -> Result<HashAddr, Error> {
        byte_utils::decode_hex_array(&self.text("hash")?)
    }

    fn entry_point(&self) -> Result<String, Error> {
        self.text("entry_point")
    }

    fn version(&self) -> Result<Option<ContractVersion>, Error> {
        match self.body.get_present("version") {
            None => Ok(None),
            Some(node) => node
                .as_u64()
                .and_then(|version| ContractVersion::try_from(version).ok())
                .map(Some)
                .ok_or_else(|| {
                    Error::MalformedValue("version must be an unsigned 32-bit integer".to_string())
                }),
        }
    }

    fn args(&self) -> Result<RuntimeArgs, Error> {
        match self.body.get_present(ARGS_FIELD).or(self.fallback_args) {
            Some(node) => RuntimeArgs::from_json(node),
            None => Ok(RuntimeArgs::new()),
        }
    }

    fn module_bytes(&self) -> Result<ExecutableDeployItem, Error> {
        let module_bytes = match self.body.get_present("module_bytes") {
            None => Bytes::new(),
            Some(node) => {
                let hex = node.as_text().ok_or_else(|| {
                    Error::MalformedValue("module_bytes must be a hex string".to_string())
                })?;
                Bytes::from(byte_utils::decode_hex(hex)?)
            }
        };
        Ok(ExecutableDeployItem::ModuleBytes {
            module_bytes,
            args: self.args()?,
        })
    }

    fn stored_contract_by_hash(&self) -> Result<ExecutableDeployItem, Error> {
        Ok(ExecutableDeployItem::StoredContractByHash {
            hash: self.hash()?,
            entry_point: self.entry_point()?,
            args: self.args()?,
        })
    }

    fn stored_contract_by_name(&self) -> Result<ExecutableDeployItem, Error> {
        Ok(ExecutableDeployItem::StoredContractByName {
            name: self.text("name")?,
            entry_point: self.entry_point()?,
            args: self.args()?,
        })
    }

    fn stored_versioned_contract_by_hash(&self) -> Result<ExecutableDeployItem, Error> {
        Ok(ExecutableDeployItem::StoredVersionedContractByHash {
            hash: self.hash()?,
            version: self.version()?,
            entry_point: self.entry_point()?,
            args: self.args()?,
        })
    }

    fn stored_versioned_contract_by_name(&self) -> Result<ExecutableDeployItem, Error> {
        Ok(ExecutableDeployItem::StoredVersionedContractByName {
            name: self.text("name")?,
            version: self.version()?,
            entry_point: self.entry_point()?,
            args: self.args()?,
        })
    }

    fn transfer(&self) -> Result<ExecutableDeployItem, Error> {
        Ok(ExecutableDeployItem::Transfer { args: self.args()? })
    }
}

impl Display for ExecutableDeployItem {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, .. } => {
                write!(formatter, "module-bytes [{} bytes]", module_bytes.len())
            }
            ExecutableDeployItem::StoredContractByHash {
                hash, entry_point, ..
            } => write!(
                formatter,
                "stored-contract-by-hash: {}, entry-point: {}",
                base16::encode_lower(hash),
                entry_point,
            ),
            ExecutableDeployItem::StoredContractByName {
                name, entry_point, ..
            } => write!(
                formatter,
                "stored-contract-by-name: {}, entry-point: {}",
                name, entry_point,
            ),
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                ..
            } => write!(
                formatter,
                "stored-versioned-contract-by-hash: {}, version: {:?}, entry-point: {}",
                base16::encode_lower(hash),
                version,
                entry_point,
            ),
            ExecutableDeployItem::StoredVersionedContractByName {
                name,
                version,
                entry_point,
                ..
            } => write!(
                formatter,
                "stored-versioned-contract-by-name: {}, version: {:?}, entry-point: {}",
                name, version, entry_point,
            ),
            ExecutableDeployItem::Transfer { .. } => write!(formatter, "transfer"),
        }
    }
}

impl ToBytes for ExecutableDeployItem {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        TAG_LENGTH
            + match self {
                ExecutableDeployItem::ModuleBytes { module_bytes, args } => {
                    module_bytes.serialized_length() + args.serialized_length()
                }
                ExecutableDeployItem::StoredContractByHash {
                    hash,
                    entry_point,
                    args,
                } => {
                    hash.serialized_length()
                        + entry_point.serialized_length()
                        + args.serialized_length()
                }
                ExecutableDeployItem::StoredContractByName {
                    name,
                    entry_point,
                    args,
                } => {
                    name.serialized_length()
                        + entry_point.serialized_length()
                        + args.serialized_length()
                }
                ExecutableDeployItem::StoredVersionedContractByHash {
                    hash,
                    version,
                    entry_point,
                    args,
                } => {
                    hash.serialized_length()
                        + version.serialized_length()
                        + entry_point.serialized_length()
                        + args.serialized_length()
                }
                ExecutableDeployItem::StoredVersionedContractByName {
                    name,
                    version,
                    entry_point,
                    args,
                } => {
                    name.serialized_length()
                        + version.serialized_length()
                        + entry_point.serialized_length()
                        + args.serialized_length()
                }
                ExecutableDeployItem::Transfer { args } => args.serialized_length(),
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        writer.push(self.tag());
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => {
                module_bytes.write_bytes(writer)?;
                args.write_bytes(writer)
            }
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            } => {
                hash.write_bytes(writer)?;
                entry_point.write_bytes(writer)?;
                args.write_bytes(writer)
            }
            ExecutableDeployItem::StoredContractByName {
                name,
                entry_point,
                args,
            } => {
                name.write_bytes(writer)?;
                entry_point.write_bytes(writer)?;
                args.write_bytes(writer)
            }
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                args,
            } => {
                hash.write_bytes(writer)?;
                version.write_bytes(writer)?;
                entry_point.write_bytes(writer)?;
                args.write_bytes(writer)
            }
            ExecutableDeployItem::StoredVersionedContractByName {
                name,
                version,
                entry_point,
                args,
            } => {
                name.write_bytes(writer)?;
                version.write_bytes(writer)?;
                entry_point.write_bytes(writer)?;
                args.write_bytes(writer)
            }
            ExecutableDeployItem::Transfer { args } => args.write_bytes(writer),
        }
    }
}

impl FromBytes for ExecutableDeployItem {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        match tag {
            MODULE_BYTES_TAG => {
                let (module_bytes, remainder) = Bytes::from_bytes(remainder)?;
                let (args, remainder) = RuntimeArgs::from_bytes(remainder)?;
                Ok((
                    ExecutableDeployItem::ModuleBytes { module_bytes, args },
                    remainder,
                ))
            }
            STORED_CONTRACT_BY_HASH_TAG => {
                let (hash, remainder) = HashAddr::from_bytes(remainder)?;
                let (entry_point, remainder) = String::from_bytes(remainder)?;
                let (args, remainder) = RuntimeArgs::from_bytes(remainder)?;
                Ok((
                    ExecutableDeployItem::StoredContractByHash {
                        hash,
                        entry_point,
                        args,
                    },
                    remainder,
                ))
            }
            STORED_CONTRACT_BY_NAME_TAG => {
                let (name, remainder) = String::from_bytes(remainder)?;
                let (entry_point, remainder) = String::from_bytes(remainder)?;
                let (args, remainder) = RuntimeArgs::from_bytes(remainder)?;
                Ok((
                    ExecutableDeployItem::StoredContractByName {
                        name,
                        entry_point,
                        args,
                    },
                    remainder,
                ))
            }
            STORED_VERSIONED_CONTRACT_BY_HASH_TAG => {
                let (hash, remainder) = HashAddr::from_bytes(remainder)?;
                let (version, remainder) = Option::<ContractVersion>::from_bytes(remainder)?;
                let (entry_point, remainder) = String::from_bytes(remainder)?;
                let (args, remainder) = RuntimeArgs::from_bytes(remainder)?;
                Ok((
                    ExecutableDeployItem::StoredVersionedContractByHash {
                        hash,
                        version,
                        entry_point,
                        args,
                    },
                    remainder,
                ))
            }
            STORED_VERSIONED_CONTRACT_BY_NAME_TAG => {
                let (name, remainder) = String::from_bytes(remainder)?;
                let (version, remainder) = Option::<ContractVersion>::from_bytes(remainder)?;
                let (entry_point, remainder) = String::from_bytes(remainder)?;
                let (args, remainder) = RuntimeArgs::from_bytes(remainder)?;
                Ok((
                    ExecutableDeployItem::StoredVersionedContractByName {
                        name,
                        version,
                        entry_point,
                        args,
                    },
                    remainder,
                ))
            }
            TRANSFER_TAG => {
                let (args, remainder) = RuntimeArgs::from_bytes(remainder)?;
                Ok((ExecutableDeployItem::Transfer { args }, remainder))
            }
            _ => Err(bytesrepr::Error::Formatting),
        }
    }
}

impl Serialize for ExecutableDeployItem {
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

impl<'de> Deserialize<'de> for ExecutableDeployItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let json = Value::deserialize(deserializer)?;
            ExecutableDeployItem::from_json(&json).map_err(SerdeError::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            bytesrepr::deserialize(bytes).map_err(SerdeError::custom)
        }
    }
}

impl Distribution<ExecutableDeployItem> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ExecutableDeployItem {
        fn random_bytes<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
            let mut bytes = vec![0u8; rng.gen_range(0..100)];
            rng.fill_bytes(bytes.as_mut());
            bytes
        }

        fn random_string<R: Rng + ?Sized>(rng: &mut R) -> String {
            (0..20)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        }

        let mut args = RuntimeArgs::new();
        let _ = args.insert(random_string(rng), Bytes::from(random_bytes(rng)));

        match rng.gen_range(0..6) {
            0 => ExecutableDeployItem::ModuleBytes {
                module_bytes: random_bytes(rng).into(),
                args,
            },
            1 => ExecutableDeployItem::StoredContractByHash {
                hash: rng.gen(),
                entry_point: random_string(rng),
                args,
            },
            2 => ExecutableDeployItem::StoredContractByName {
                name: random_string(rng),
                entry_point: random_string(rng),
                args,
            },
            3 => ExecutableDeployItem::StoredVersionedContractByHash {
                hash: rng.gen(),
                version: rng.gen(),
                entry_point: random_string(rng),
                args,
            },
            4 => ExecutableDeployItem::StoredVersionedContractByName {
                name: random_string(rng),
                version: rng.gen(),
                entry_point: random_string(rng),
                args,
            },
            _ => {
                let mut transfer_args = RuntimeArgs::new();
                let _ = transfer_args.insert(ARG_AMOUNT, U512::from(rng.gen::<u64>()));
                let _ = transfer_args.insert(ARG_TARGET, rng.gen::<AccountHash>());
                let _ = transfer_args.insert(ARG_ID, rng.gen::<Option<u64>>());
                ExecutableDeployItem::Transfer {
                    args: transfer_args,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{cl_type::CLTypeInfo, testing::TestRng, CLValue};

    const HASH_KEY_HEX: &str =
        "012b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5";
    const HASH_KEY_TEXT: &str =
        "hash-2b177f0739348d33ce868b2f95bb83decf5b5dcc71279d4bec64c87f60b805d5";

    fn amount_and_key_args() -> Value {
        json!([
            ["amount", { "cl_type": "U512", "bytes": "0400ca9a3b", "parsed": "1000000000" }],
            [
                "instrument_state_hash",
                { "cl_type": "Key", "bytes": HASH_KEY_HEX, "parsed": { "Hash": HASH_KEY_TEXT } }
            ]
        ])
    }

    #[test]
    fn should_build_transfer() {
        let transfer =
            ExecutableDeployItem::new_transfer(24_500_000_000u64, AccountHash::new([1; 32]), Some(999))
                .unwrap();
        assert_eq!(transfer.tag(), 5);
        assert!(transfer.is_transfer());

        let names: Vec<&str> = transfer.args().named_args().map(|arg| arg.name()).collect();
        assert_eq!(names, vec!["amount", "target", "id"]);

        let amount = transfer.args().get("amount").unwrap();
        assert_eq!(*amount.cl_type(), CLTypeInfo::U512);
        assert_eq!(base16::encode_lower(amount.inner_bytes()), "05005550b405");
        assert_eq!(amount.parsed().unwrap().to_string(), "24500000000");

        let target = transfer.args().get("target").unwrap();
        assert_eq!(*target.cl_type(), CLTypeInfo::ByteArray(32));
        assert_eq!(target.inner_bytes(), &vec![1; 32]);
        assert_eq!(target.parsed().unwrap().to_string(), "01".repeat(32));

        let id = transfer.args().get("id").unwrap();
        assert_eq!(*id.cl_type(), CLTypeInfo::Option(Box::new(CLTypeInfo::U64)));
        assert_eq!(base16::encode_lower(id.inner_bytes()), "01e703000000000000");
        assert_eq!(id.parsed().unwrap().to_string(), "999");
    }

    #[test]
    fn should_build_standard_payment() {
        let payment = ExecutableDeployItem::new_standard_payment(1_000_000u64).unwrap();
        assert_eq!(payment.tag(), 2);
        match &payment {
            ExecutableDeployItem::StoredContractByName {
                name, entry_point, ..
            } => {
                assert_eq!(name, "payment");
                assert_eq!(entry_point, "call");
            }
            other => panic!("unexpected payment {:?}", other),
        }
        let amount = payment.args().get("amount").unwrap();
        assert_eq!(*amount.cl_type(), CLTypeInfo::U512);
        assert_eq!(base16::encode_lower(amount.inner_bytes()), "0340420f");
        assert_eq!(amount.parsed().unwrap().to_string(), "1000000");
        assert_eq!(
            base16::encode_lower(&payment.to_bytes().unwrap()),
            "02070000007061796d656e74040000006361\
             6c6c0100000006000000616d6f756e74040000000340420f08"
        );
    }

    #[test]
    fn should_encode_module_bytes_payment() {
        let payment = ExecutableDeployItem::new_module_bytes_payment(1_000_000_000u64).unwrap();
        assert_eq!(
            base16::encode_lower(&payment.to_bytes().unwrap()),
            "00000000000100000006000000616d6f756e74050000000400ca9a3b08"
        );
    }

    #[test]
    fn should_read_stored_contract_by_hash() {
        let json = json!({
            "StoredContractByHash": {
                "hash": "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f",
                "entry_point": "pclphXwfYmCmdITj8hnh",
                "args": amount_and_key_args()
            }
        });
        let item = ExecutableDeployItem::from_json(&json).unwrap();
        match &item {
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            } => {
                assert_eq!(*hash, [0x0f; 32]);
                assert_eq!(entry_point, "pclphXwfYmCmdITj8hnh");
                assert_eq!(args.len(), 2);
                let key = args.get("instrument_state_hash").unwrap();
                assert_eq!(key.parsed().unwrap().to_string(), HASH_KEY_TEXT);
            }
            other => panic!("unexpected item {:?}", other),
        }
        assert_eq!(item.to_json(), json);
    }

    #[test]
    fn should_read_versioned_variants() {
        let json = json!({
            "StoredVersionedContractByHash": {
                "hash": "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f",
                "version": 1_632_552_656u32,
                "entry_point": "pclphXwfYmCmdITj8hnh",
                "args": amount_and_key_args()
            }
        });
        let item = ExecutableDeployItem::from_json(&json).unwrap();
        assert!(matches!(
            item,
            ExecutableDeployItem::StoredVersionedContractByHash {
                version: Some(1_632_552_656),
                ..
            }
        ));

        let json = json!({
            "StoredVersionedContractByName": {
                "name": "U5A74bSZH8abT8HqVaK9",
                "version": null,
                "entry_point": "gIetSxltnRDvMhWdxTqQ",
                "args": []
            }
        });
        let item = ExecutableDeployItem::from_json(&json).unwrap();
        assert!(matches!(
            item,
            ExecutableDeployItem::StoredVersionedContractByName { version: None, .. }
        ));
        assert_eq!(item.to_json(), json);
    }

    #[test]
    fn should_fall_back_to_sibling_args() {
        let json = json!({
            "ModuleBytes": { "module_bytes": "" },
            "args": [["amount", { "cl_type": "U512", "bytes": "0400ca9a3b", "parsed": "1000000000" }]]
        });
        let item = ExecutableDeployItem::from_json(&json).unwrap();
        assert_eq!(
            item,
            ExecutableDeployItem::new_module_bytes_payment(1_000_000_000u64).unwrap()
        );
    }

    #[test]
    fn should_reject_unknown_variant() {
        let json = json!({ "StoredContractByKey": { "args": [] } });
        assert!(matches!(
            ExecutableDeployItem::from_json(&json),
            Err(Error::InvalidExecutableField(field)) if field == "StoredContractByKey"
        ));
        assert!(matches!(
            ExecutableDeployItem::from_json(&json!({})),
            Err(Error::InvalidExecutableField(_))
        ));
    }

    #[test]
    fn should_wrap_field_failures() {
        let json = json!({
            "StoredContractByHash": { "hash": "0f0f", "entry_point": "call", "args": [] }
        });
        match ExecutableDeployItem::from_json(&json) {
            Err(Error::Conversion { variant, source }) => {
                assert_eq!(variant, "StoredContractByHash");
                assert!(matches!(*source, Error::MalformedValue(_)));
            }
            other => panic!("unexpected result {:?}", other),
        }

        let json = json!({ "Transfer": { "args": [["", { "cl_type": "Unit", "bytes": "" }]] } });
        assert!(matches!(
            ExecutableDeployItem::from_json(&json),
            Err(Error::Conversion { variant: "Transfer", .. })
        ));
    }

    #[test]
    fn should_read_from_parent_field() {
        let deploy_json = json!({
            "session": { "Transfer": { "args": [] } }
        });
        let item = ExecutableDeployItem::from_json_field(&deploy_json, "session").unwrap();
        assert_eq!(item.entry_point_name(), "transfer");
        assert!(matches!(
            ExecutableDeployItem::from_json_field(&deploy_json, "payment"),
            Err(Error::MalformedValue(_))
        ));
    }

    #[test]
    fn random_items_should_roundtrip() {
        let mut rng = TestRng::new();
        for _ in 0..20 {
            let item: ExecutableDeployItem = rng.gen();
            bytesrepr::test_serialization_roundtrip(&item);
            let json = serde_json::to_value(&item).unwrap();
            assert_eq!(serde_json::from_value::<ExecutableDeployItem>(json).unwrap(), item);
        }
    }

    #[test]
    fn should_reject_unknown_tag() {
        assert_eq!(
            ExecutableDeployItem::from_bytes(&[6, 0, 0, 0, 0]).unwrap_err(),
            bytesrepr::Error::Formatting
        );
        let transfer = CLValue::from_t(1u8).unwrap();
        let mut args = RuntimeArgs::new();
        args.insert_cl_value("a", transfer).unwrap();
        let item = ExecutableDeployItem::Transfer { args };
        assert_eq!(item.to_bytes().unwrap()[0], TRANSFER_TAG);
    }
}
