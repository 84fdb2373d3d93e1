//! Deploy-time configuration.
//!
//! ```toml
//! owner = "0x00000000000000000000000000000000000000aa"
//! account = "0x00000000000000000000000000000000000000dd"
//! wrapped_native = "0x00000000000000000000000000000000000000ee"
//! delay = 300
//! min_gas_limit = 100000
//! max_gas_limit = 5000000
//! gas_price = 1000000000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Initial owner of the admin surface
    pub owner: Address,
    /// Address the engine holds tokens under
    pub account: Address,
    /// Token that represents the wrapped native asset
    pub wrapped_native: Address,
    /// Seconds between submission and maturity
    #[serde(default = "default_delay")]
    pub delay: u64,
    #[serde(default = "default_min_gas_limit")]
    pub min_gas_limit: u64,
    #[serde(default = "default_max_gas_limit")]
    pub max_gas_limit: u64,
    /// Initial gas price in wei
    #[serde(default = "default_gas_price")]
    pub gas_price: u128,
}

fn default_delay() -> u64 {
    300
}

fn default_min_gas_limit() -> u64 {
    100_000
}

fn default_max_gas_limit() -> u64 {
    5_000_000
}

fn default_gas_price() -> u128 {
    1_000_000_000
}

impl DelayConfig {
    /// Config with defaults for everything except the three addresses.
    pub fn new(owner: Address, account: Address, wrapped_native: Address) -> Self {
        Self {
            owner,
            account,
            wrapped_native,
            delay: default_delay(),
            min_gas_limit: default_min_gas_limit(),
            max_gas_limit: default_max_gas_limit(),
            gas_price: default_gas_price(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() || self.account.is_zero() || self.wrapped_native.is_zero() {
            return Err(ConfigError::Invalid("addresses must be non-zero".into()));
        }
        if self.min_gas_limit > self.max_gas_limit {
            return Err(ConfigError::Invalid(format!(
                "min_gas_limit {} exceeds max_gas_limit {}",
                self.min_gas_limit, self.max_gas_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        owner = "0x00000000000000000000000000000000000000aa"
        account = "0x00000000000000000000000000000000000000dd"
        wrapped_native = "0x00000000000000000000000000000000000000ee"
        delay = 120
    "#;

    #[test]
    fn test_parse_with_defaults() {
        let config = DelayConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.owner, Address::from_low_u64(0xaa));
        assert_eq!(config.delay, 120);
        assert_eq!(config.min_gas_limit, 100_000);
        assert_eq!(config.max_gas_limit, 5_000_000);
        assert_eq!(config.gas_price, 1_000_000_000);
    }

    #[test]
    fn test_rejects_bad_address() {
        let err = DelayConfig::from_toml_str(
            r#"
            owner = "0x1234"
            account = "0x00000000000000000000000000000000000000dd"
            wrapped_native = "0x00000000000000000000000000000000000000ee"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_inverted_gas_bounds() {
        let mut config = DelayConfig::new(
            Address::from_low_u64(1),
            Address::from_low_u64(2),
            Address::from_low_u64(3),
        );
        config.min_gas_limit = 10;
        config.max_gas_limit = 5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_owner() {
        let config = DelayConfig::new(
            Address::ZERO,
            Address::from_low_u64(2),
            Address::from_low_u64(3),
        );
        assert!(config.validate().is_err());
    }
}
