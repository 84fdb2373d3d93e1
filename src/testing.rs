//! In-memory collaborators for tests, benches and demos.
//!
//! - [`MockTokens`]: token balances per (token, account), wrapping against a
//!   single holder account, optional failure injection per token
//! - [`MockPriceOracle`]: constant price per pair, accumulator = price * now

use std::collections::{HashMap, HashSet};

use crate::engine::{PriceAccumulatorSource, TokenTransfer};
use crate::error::{OracleError, TransferError};
use crate::pair::PairInfo;
use crate::types::{Address, PairId};

#[derive(Debug, Clone)]
pub struct MockTokens {
    holder: Address,
    wrapped_native: Address,
    balances: HashMap<(Address, Address), u128>,
    failing: HashSet<Address>,
    wrapped: u128,
    unwrapped: u128,
}

impl MockTokens {
    /// `holder` is the engine's account; wrapping credits it `wrapped_native`.
    pub fn new(holder: Address, wrapped_native: Address) -> Self {
        Self {
            holder,
            wrapped_native,
            balances: HashMap::new(),
            failing: HashSet::new(),
            wrapped: 0,
            unwrapped: 0,
        }
    }

    pub fn mint(&mut self, token: Address, account: Address, amount: u128) {
        *self.balances.entry((token, account)).or_insert(0) += amount;
    }

    pub fn balance_of(&self, token: Address, account: Address) -> u128 {
        self.balances.get(&(token, account)).copied().unwrap_or(0)
    }

    /// Make every movement of `token` fail.
    pub fn fail_token(&mut self, token: Address) {
        self.failing.insert(token);
    }

    pub fn thaw_token(&mut self, token: Address) {
        self.failing.remove(&token);
    }

    /// Total native value wrapped so far.
    pub fn total_wrapped(&self) -> u128 {
        self.wrapped
    }

    /// Total wrapped value converted back to native so far.
    pub fn total_unwrapped(&self) -> u128 {
        self.unwrapped
    }

    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        if self.failing.contains(&token) {
            return Err(TransferError(format!("token {token} is frozen")));
        }
        let from_balance = self.balance_of(token, from);
        if from_balance < amount {
            return Err(TransferError(format!(
                "{from} holds {from_balance} of {token}, needs {amount}"
            )));
        }
        self.balances.insert((token, from), from_balance - amount);
        self.mint(token, to, amount);
        Ok(())
    }
}

impl TokenTransfer for MockTokens {
    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.move_tokens(token, from, to, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: u128) -> Result<(), TransferError> {
        let holder = self.holder;
        self.move_tokens(token, holder, to, amount)
    }

    fn wrap(&mut self, amount: u128) -> Result<u128, TransferError> {
        if self.failing.contains(&self.wrapped_native) {
            return Err(TransferError("wrapping disabled".into()));
        }
        let (token, holder) = (self.wrapped_native, self.holder);
        self.mint(token, holder, amount);
        self.wrapped += amount;
        Ok(amount)
    }

    fn unwrap(&mut self, amount: u128) -> Result<u128, TransferError> {
        let (token, holder) = (self.wrapped_native, self.holder);
        let balance = self.balance_of(token, holder);
        if balance < amount || self.failing.contains(&token) {
            return Err(TransferError(format!("cannot unwrap {amount}")));
        }
        self.balances.insert((token, holder), balance - amount);
        self.unwrapped += amount;
        Ok(amount)
    }
}

/// Constant-price oracle. Unknown pairs fail.
#[derive(Debug, Clone, Default)]
pub struct MockPriceOracle {
    prices: HashMap<PairId, u64>,
}

impl MockPriceOracle {
    /// Set the fixed-point (10^8) price of `pair_id`.
    pub fn set_price(&mut self, pair_id: PairId, price: u64) {
        self.prices.insert(pair_id, price);
    }
}

impl PriceAccumulatorSource for MockPriceOracle {
    fn current_price_accumulator(&self, pair: &PairInfo, now: u64) -> Result<u128, OracleError> {
        let price = self
            .prices
            .get(&pair.pair_id)
            .ok_or_else(|| OracleError(format!("no price for pair {}", pair.pair_id)))?;
        Ok(u128::from(*price) * u128::from(now))
    }
}
