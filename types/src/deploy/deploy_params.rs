use super::{DeployConfig, DeployHash};
use crate::{PublicKey, TimeDiff, Timestamp};

/// The header metadata a [`Deploy`](super::Deploy) is assembled from.
///
/// The body hash is not part of the params; it is computed from the payment and session when the
/// deploy is built.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeployParams {
    pub(crate) account: PublicKey,
    pub(crate) chain_name: String,
    pub(crate) gas_price: u64,
    pub(crate) ttl: TimeDiff,
    pub(crate) timestamp: Timestamp,
    pub(crate) dependencies: Vec<DeployHash>,
}

impl DeployParams {
    /// The default time-to-live for deploys, i.e. 30 minutes.
    pub const DEFAULT_TTL: TimeDiff = TimeDiff::from_millis(30 * 60 * 1_000);
    /// The default gas price for deploys, i.e. `1`.
    pub const DEFAULT_GAS_PRICE: u64 = 1;

    /// Returns new params for `account` on `chain_name`, timestamped now, with the default ttl and
    /// gas price and no dependencies.
    pub fn new<C: Into<String>>(account: PublicKey, chain_name: C) -> Self {
        DeployParams {
            account,
            chain_name: chain_name.into(),
            gas_price: Self::DEFAULT_GAS_PRICE,
            ttl: Self::DEFAULT_TTL,
            timestamp: Timestamp::now(),
            dependencies: vec![],
        }
    }

    /// Returns new params for `account` using the chain name, ttl and gas price of `config`.
    pub fn from_config(config: &DeployConfig, account: PublicKey) -> Self {
        DeployParams {
            account,
            chain_name: config.chain_name.clone(),
            gas_price: config.default_gas_price,
            ttl: config.default_ttl,
            timestamp: Timestamp::now(),
            dependencies: vec![],
        }
    }

    /// Sets the gas price.
    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Sets the time-to-live.
    pub fn with_ttl(mut self, ttl: TimeDiff) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the deploys which must be executed before this one.
    pub fn with_dependencies(mut self, dependencies: Vec<DeployHash>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Returns the account within which the deploy will be run.
    pub fn account(&self) -> &PublicKey {
        &self.account
    }

    /// Returns the chain name.
    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    /// Returns the gas price.
    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    /// Returns the time-to-live.
    pub fn ttl(&self) -> TimeDiff {
        self.ttl
    }

    /// Returns the creation timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the dependencies.
    pub fn dependencies(&self) -> &[DeployHash] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRng;

    #[test]
    fn should_apply_defaults_and_overrides() {
        let mut rng = TestRng::new();
        let account = PublicKey::random(&mut rng);
        let params = DeployParams::new(account.clone(), "mainnet");
        assert_eq!(params.ttl(), DeployParams::DEFAULT_TTL);
        assert_eq!(params.gas_price(), 1);
        assert!(params.dependencies().is_empty());

        let timestamp = Timestamp::from(1_620_138_035_104);
        let params = params
            .with_gas_price(2)
            .with_timestamp(timestamp)
            .with_ttl(TimeDiff::from_seconds(60));
        assert_eq!(params.account(), &account);
        assert_eq!(params.chain_name(), "mainnet");
        assert_eq!(params.gas_price(), 2);
        assert_eq!(params.timestamp(), timestamp);
        assert_eq!(params.ttl().millis(), 60_000);
    }

    #[test]
    fn should_take_config_defaults() {
        let mut rng = TestRng::new();
        let config = DeployConfig::random(&mut rng);
        let params = DeployParams::from_config(&config, PublicKey::random(&mut rng));
        assert_eq!(params.chain_name(), config.chain_name);
        assert_eq!(params.ttl(), config.default_ttl);
        assert_eq!(params.gas_price(), config.default_gas_price);
    }
}
