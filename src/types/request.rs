//! Caller-submitted requests.
//!
//! Each request carries the kind-specific fields plus the two fields every
//! submission shares: the declared `gas_limit` and a `submit_deadline` after
//! which the request is rejected. Shape checks that need no engine state live
//! here; gas-limit bounds and pair resolution are checked by the engine.

use crate::error::{DelayError, Result};
use crate::types::{Address, BuyOrder, DepositOrder, SellOrder, WithdrawOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in_max: u128,
    pub amount_out: u128,
    pub wrap_unwrap: bool,
    pub to: Address,
    pub gas_limit: u64,
    pub submit_deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub amount_out_min: u128,
    pub wrap_unwrap: bool,
    pub to: Address,
    pub gas_limit: u64,
    pub submit_deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRequest {
    pub token0: Address,
    pub token1: Address,
    pub amount0: u128,
    pub amount1: u128,
    pub swap: bool,
    pub min_swap_price: u64,
    pub max_swap_price: u64,
    pub wrap_unwrap: bool,
    pub to: Address,
    pub gas_limit: u64,
    pub submit_deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawRequest {
    pub token0: Address,
    pub token1: Address,
    pub liquidity: u128,
    pub amount0_min: u128,
    pub amount1_min: u128,
    pub wrap_unwrap: bool,
    pub to: Address,
    pub gas_limit: u64,
    pub submit_deadline: u64,
}

fn require(condition: bool, reason: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(DelayError::InvalidRequest(reason.to_string()))
    }
}

impl BuyRequest {
    pub fn validate_shape(&self) -> Result<()> {
        require(self.amount_in_max != 0, "amount_in_max is zero")?;
        require(self.amount_out != 0, "amount_out is zero")?;
        require(!self.to.is_zero(), "recipient is the zero address")
    }
}

impl SellRequest {
    pub fn validate_shape(&self) -> Result<()> {
        require(self.amount_in != 0, "amount_in is zero")?;
        require(!self.to.is_zero(), "recipient is the zero address")
    }
}

impl DepositRequest {
    pub fn validate_shape(&self) -> Result<()> {
        require(
            self.amount0 != 0 || self.amount1 != 0,
            "both deposit amounts are zero",
        )?;
        require(
            self.min_swap_price <= self.max_swap_price,
            "min_swap_price exceeds max_swap_price",
        )?;
        require(!self.to.is_zero(), "recipient is the zero address")
    }
}

impl WithdrawRequest {
    pub fn validate_shape(&self) -> Result<()> {
        require(self.liquidity != 0, "liquidity is zero")?;
        require(!self.to.is_zero(), "recipient is the zero address")
    }
}

// ============================================================================
// Request -> stored payload
// ============================================================================

impl From<&BuyRequest> for BuyOrder {
    fn from(request: &BuyRequest) -> Self {
        Self {
            token_in: request.token_in,
            token_out: request.token_out,
            amount_in_max: request.amount_in_max,
            amount_out: request.amount_out,
            wrap_unwrap: request.wrap_unwrap,
            to: request.to,
        }
    }
}

impl From<&SellRequest> for SellOrder {
    fn from(request: &SellRequest) -> Self {
        Self {
            token_in: request.token_in,
            token_out: request.token_out,
            amount_in: request.amount_in,
            amount_out_min: request.amount_out_min,
            wrap_unwrap: request.wrap_unwrap,
            to: request.to,
        }
    }
}

impl From<&DepositRequest> for DepositOrder {
    fn from(request: &DepositRequest) -> Self {
        Self {
            token0: request.token0,
            token1: request.token1,
            amount0: request.amount0,
            amount1: request.amount1,
            swap: request.swap,
            min_swap_price: request.min_swap_price,
            max_swap_price: request.max_swap_price,
            wrap_unwrap: request.wrap_unwrap,
            to: request.to,
        }
    }
}

impl From<&WithdrawRequest> for WithdrawOrder {
    fn from(request: &WithdrawRequest) -> Self {
        Self {
            token0: request.token0,
            token1: request.token1,
            liquidity: request.liquidity,
            amount0_min: request.amount0_min,
            amount1_min: request.amount1_min,
            wrap_unwrap: request.wrap_unwrap,
            to: request.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy() -> BuyRequest {
        BuyRequest {
            token_in: Address::from_low_u64(1),
            token_out: Address::from_low_u64(2),
            amount_in_max: 1_000,
            amount_out: 900,
            wrap_unwrap: false,
            to: Address::from_low_u64(9),
            gas_limit: 400_000,
            submit_deadline: u64::MAX,
        }
    }

    #[test]
    fn test_buy_shape() {
        assert!(buy().validate_shape().is_ok());

        let mut request = buy();
        request.amount_out = 0;
        assert!(matches!(request.validate_shape(), Err(DelayError::InvalidRequest(_))));

        let mut request = buy();
        request.to = Address::ZERO;
        assert!(matches!(request.validate_shape(), Err(DelayError::InvalidRequest(_))));
    }

    #[test]
    fn test_sell_allows_zero_min_out() {
        let request = SellRequest {
            token_in: Address::from_low_u64(1),
            token_out: Address::from_low_u64(2),
            amount_in: 10,
            amount_out_min: 0,
            wrap_unwrap: false,
            to: Address::from_low_u64(9),
            gas_limit: 400_000,
            submit_deadline: 0,
        };
        assert!(request.validate_shape().is_ok());
    }

    #[test]
    fn test_deposit_shape() {
        let mut request = DepositRequest {
            token0: Address::from_low_u64(1),
            token1: Address::from_low_u64(2),
            amount0: 0,
            amount1: 5,
            swap: true,
            min_swap_price: 10,
            max_swap_price: 20,
            wrap_unwrap: false,
            to: Address::from_low_u64(9),
            gas_limit: 400_000,
            submit_deadline: 0,
        };
        assert!(request.validate_shape().is_ok());

        request.amount1 = 0;
        assert!(request.validate_shape().is_err());

        request.amount1 = 5;
        request.min_swap_price = 30;
        assert!(request.validate_shape().is_err());
    }

    #[test]
    fn test_buy_into_order_keeps_fields() {
        let request = buy();
        let order = BuyOrder::from(&request);
        assert_eq!(order.amount_in_max, request.amount_in_max);
        assert_eq!(order.amount_out, request.amount_out);
        assert_eq!(order.token_in, request.token_in);
        assert_eq!(order.to, request.to);
    }
}
