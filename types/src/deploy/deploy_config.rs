use std::{fs, path::Path};

#[cfg(any(feature = "testing", test))]
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::DeployParams;
#[cfg(any(feature = "testing", test))]
use crate::testing::TestRng;
use crate::{Error, TimeDiff};

const DEFAULT_TTL: TimeDiff = TimeDiff::from_millis(30 * 60 * 1_000);
const DEFAULT_MAX_TTL: TimeDiff = TimeDiff::from_millis(24 * 60 * 60 * 1_000);
const DEFAULT_GAS_PRICE: u64 = 1;
const DEFAULT_MAX_DEPENDENCIES: u8 = 10;

/// Chain-level settings used when assembling deploys.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
// Disallow unknown fields to ensure config files contain valid keys.
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Name of the chain deploys are created for.
    pub chain_name: String,
    /// Time-to-live given to deploys which don't specify one.
    pub default_ttl: TimeDiff,
    /// Gas price given to deploys which don't specify one.
    pub default_gas_price: u64,
    /// Maximum time-to-live any deploy can specify.
    pub max_ttl: TimeDiff,
    /// Maximum number of dependencies any deploy can specify.
    pub max_dependencies: u8,
}

impl DeployConfig {
    /// Parses a config from TOML text.
    pub fn from_toml_str(toml_text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(toml_text)?)
    }

    /// Reads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let toml_text = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_text)
    }

    /// Returns `Ok` if `params` are within this config's limits.
    pub fn check_params(&self, params: &DeployParams) -> Result<(), Error> {
        if params.ttl > self.max_ttl {
            return Err(Error::ExcessiveTtl {
                max: self.max_ttl,
                got: params.ttl,
            });
        }
        if params.dependencies.len() > usize::from(self.max_dependencies) {
            return Err(Error::ExcessiveDependencies {
                max: self.max_dependencies,
                got: params.dependencies.len(),
            });
        }
        Ok(())
    }

    /// Generates a random instance using a `TestRng`.
    #[cfg(any(feature = "testing", test))]
    pub fn random(rng: &mut TestRng) -> Self {
        let max_ttl = TimeDiff::from_millis(rng.gen_range(60_000..3_600_000));
        DeployConfig {
            chain_name: rng.random_string(1..20),
            default_ttl: TimeDiff::from_millis(rng.gen_range(1_000..=max_ttl.millis())),
            default_gas_price: rng.gen_range(1..100),
            max_ttl,
            max_dependencies: rng.gen(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            chain_name: String::from("casper"),
            default_ttl: DEFAULT_TTL,
            default_gas_price: DEFAULT_GAS_PRICE,
            max_ttl: DEFAULT_MAX_TTL,
            max_dependencies: DEFAULT_MAX_DEPENDENCIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{deploy::DeployHash, PublicKey};

    const CONFIG: &str = r#"
chain_name = "mainnet"
default_ttl = "30m"
default_gas_price = 2
max_ttl = "1day"
max_dependencies = 2
"#;

    #[test]
    fn should_read_toml() {
        let config = DeployConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.chain_name, "mainnet");
        assert_eq!(config.default_ttl.millis(), 1_800_000);
        assert_eq!(config.default_gas_price, 2);
        assert_eq!(config.max_ttl.millis(), 86_400_000);
        assert_eq!(config.max_dependencies, 2);
    }

    #[test]
    fn should_reject_unknown_fields() {
        let toml_text = format!("{}\nmax_block_size = 10\n", CONFIG);
        assert!(matches!(
            DeployConfig::from_toml_str(&toml_text),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let mut rng = TestRng::new();
        let config = DeployConfig::random(&mut rng);
        let encoded = toml::to_string_pretty(&config).unwrap();
        let decoded = DeployConfig::from_toml_str(&encoded).unwrap();
        assert_eq!(config, decoded);
    }

    #[test]
    fn should_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let config = DeployConfig::from_file(file.path()).unwrap();
        assert_eq!(config.chain_name, "mainnet");

        assert!(matches!(
            DeployConfig::from_file(file.path().with_extension("missing")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn should_check_limits() {
        let mut rng = TestRng::new();
        let config = DeployConfig::from_toml_str(CONFIG).unwrap();
        let account = PublicKey::random(&mut rng);

        let params = DeployParams::from_config(&config, account);
        config.check_params(&params).unwrap();

        let too_long = params.clone().with_ttl(TimeDiff::from_millis(86_400_001));
        assert!(matches!(
            config.check_params(&too_long),
            Err(Error::ExcessiveTtl { .. })
        ));

        let dependencies = (0..3).map(|_| DeployHash::random(&mut rng)).collect();
        let too_many = params.with_dependencies(dependencies);
        assert!(matches!(
            config.check_params(&too_many),
            Err(Error::ExcessiveDependencies { max: 2, got: 3 })
        ));
    }
}
