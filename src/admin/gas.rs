//! Process-wide gas price used to size escrow at submission.

use tracing::info;

use crate::admin::OracleAdmin;
use crate::error::Result;
use crate::types::{Address, Event};

#[derive(Debug, Clone, Default)]
pub struct GasPriceOracle {
    gas_price: u128,
}

impl GasPriceOracle {
    pub fn new(gas_price: u128) -> Self {
        Self { gas_price }
    }

    #[inline]
    pub fn current_gas_price(&self) -> u128 {
        self.gas_price
    }

    /// Owner-only overwrite. Orders keep the price they were submitted with.
    pub fn set_gas_price(
        &mut self,
        admin: &OracleAdmin,
        caller: Address,
        gas_price: u128,
    ) -> Result<Event> {
        admin.ensure_owner(caller)?;
        self.gas_price = gas_price;
        info!(gas_price, "gas price set");
        Ok(Event::GasPriceChanged(gas_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DelayError;

    #[test]
    fn test_set_gas_price() {
        let owner = Address::from_low_u64(1);
        let admin = OracleAdmin::new(owner);
        let mut gas = GasPriceOracle::new(1_000);

        let event = gas.set_gas_price(&admin, owner, 69_420_000_000).unwrap();
        assert_eq!(event, Event::GasPriceChanged(69_420_000_000));
        assert_eq!(gas.current_gas_price(), 69_420_000_000);

        gas.set_gas_price(&admin, owner, 0).unwrap();
        assert_eq!(gas.current_gas_price(), 0);
    }

    #[test]
    fn test_set_gas_price_requires_owner() {
        let admin = OracleAdmin::new(Address::from_low_u64(1));
        let mut gas = GasPriceOracle::new(1_000);

        let err = gas
            .set_gas_price(&admin, Address::from_low_u64(2), 5)
            .unwrap_err();
        assert!(matches!(err, DelayError::Unauthorized));
        assert_eq!(gas.current_gas_price(), 1_000);
    }
}
