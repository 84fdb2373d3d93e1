//! Native-asset ledger holding per-order escrow.
//!
//! ## Accounting
//!
//! The ledger keeps native balances for every principal plus one held balance
//! for the engine. Each order's escrow is tracked as two sub-amounts:
//!
//! - `gas_cost` = `gas_price * gas_limit`, the expected execution cost
//! - `principal`, native value the payer attached as trade input
//!
//! Invariant: `held_balance() == outstanding()`, the sum of every unsettled
//! record. Payment debits exactly the required amount from the payer; any
//! excess the payer offered never leaves their balance, which is the same as
//! an atomic refund inside the call.
//!
//! ## Example
//!
//! ```
//! use twap_delay::escrow::EscrowLedger;
//! use twap_delay::types::Address;
//!
//! let payer = Address::from_low_u64(1);
//! let mut ledger = EscrowLedger::new();
//! ledger.credit(payer, 10_000).unwrap();
//!
//! let refund = ledger.accept_payment(1, payer, 5_000, 3_000, 1_000).unwrap();
//! assert_eq!(refund, 1_000);
//! assert_eq!(ledger.balance_of(&payer), 6_000);
//! assert_eq!(ledger.held_balance(), 4_000);
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DelayError, Result};
use crate::types::{Address, OrderId};

/// Escrow held for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowRecord {
    pub payer: Address,
    pub gas_cost: u128,
    pub principal: u128,
    /// Released or refunded; a record settles exactly once
    pub settled: bool,
}

impl EscrowRecord {
    /// Total value held for the order. Bounded at acceptance, cannot overflow.
    #[inline]
    pub fn total(&self) -> u128 {
        self.gas_cost + self.principal
    }
}

#[derive(Debug, Default)]
pub struct EscrowLedger {
    balances: HashMap<Address, u128>,
    records: HashMap<OrderId, EscrowRecord>,
    held: u128,
}

impl EscrowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Sizing
    // ========================================================================

    /// `gas_price * gas_limit + principal`, overflow-checked.
    pub fn compute_required_escrow(gas_price: u128, gas_limit: u64, principal: u128) -> Result<u128> {
        gas_price
            .checked_mul(u128::from(gas_limit))
            .and_then(|gas_cost| gas_cost.checked_add(principal))
            .ok_or(DelayError::ArithmeticOverflow)
    }

    // ========================================================================
    // Balances
    // ========================================================================

    /// Fund an account. Hosts use this to mirror native deposits.
    pub fn credit(&mut self, account: Address, amount: u128) -> Result<()> {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(DelayError::ArithmeticOverflow)?;
        Ok(())
    }

    #[inline]
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Value currently held on behalf of unsettled orders.
    #[inline]
    pub fn held_balance(&self) -> u128 {
        self.held
    }

    #[inline]
    pub fn escrow(&self, order_id: OrderId) -> Option<&EscrowRecord> {
        self.records.get(&order_id)
    }

    /// Sum of unsettled records, recomputed from scratch.
    pub fn outstanding(&self) -> u128 {
        self.records
            .values()
            .filter(|record| !record.settled)
            .map(EscrowRecord::total)
            .sum()
    }

    // ========================================================================
    // Payment
    // ========================================================================

    /// Check that `payer` offered at least `required` and actually has what
    /// they offered. No state change.
    pub fn check_payment(&self, payer: &Address, provided: u128, required: u128) -> Result<()> {
        if provided < required {
            return Err(DelayError::InsufficientPayment { provided, required });
        }
        let balance = self.balance_of(payer);
        if balance < provided {
            return Err(DelayError::InsufficientBalance {
                balance,
                needed: provided,
            });
        }
        Ok(())
    }

    /// Take escrow for `order_id` and return the refunded excess.
    ///
    /// The payer's balance drops by exactly `gas_cost + principal`; the held
    /// balance rises by the same amount.
    pub fn accept_payment(
        &mut self,
        order_id: OrderId,
        payer: Address,
        provided: u128,
        gas_cost: u128,
        principal: u128,
    ) -> Result<u128> {
        let required = gas_cost
            .checked_add(principal)
            .ok_or(DelayError::ArithmeticOverflow)?;
        self.check_payment(&payer, provided, required)?;
        let held = self
            .held
            .checked_add(required)
            .ok_or(DelayError::ArithmeticOverflow)?;
        if self.records.contains_key(&order_id) {
            return Err(DelayError::DuplicateEscrow(order_id));
        }

        let balance = self.balances.entry(payer).or_insert(0);
        *balance -= required;
        self.held = held;
        self.records.insert(
            order_id,
            EscrowRecord {
                payer,
                gas_cost,
                principal,
                settled: false,
            },
        );

        let refund = provided - required;
        debug!(order_id, %payer, required, refund, "escrow accepted");
        Ok(refund)
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Amount that would be paid out for `order_id`, without paying it.
    pub fn check_settleable(&self, order_id: OrderId) -> Result<&EscrowRecord> {
        let record = self
            .records
            .get(&order_id)
            .ok_or(DelayError::NotFound(order_id))?;
        if record.settled {
            return Err(DelayError::AlreadySettled(order_id));
        }
        Ok(record)
    }

    /// Pay the whole escrow of `order_id` to `recipient`.
    pub fn release_to_recipient(&mut self, order_id: OrderId, recipient: Address) -> Result<u128> {
        let amount = self.pay_out(order_id, recipient)?;
        debug!(order_id, %recipient, amount, "escrow released");
        Ok(amount)
    }

    /// Return the whole escrow of `order_id` to the payer who funded it.
    pub fn refund_to_payer(&mut self, order_id: OrderId) -> Result<u128> {
        let payer = self.check_settleable(order_id)?.payer;
        let amount = self.pay_out(order_id, payer)?;
        debug!(order_id, %payer, amount, "escrow refunded");
        Ok(amount)
    }

    fn pay_out(&mut self, order_id: OrderId, to: Address) -> Result<u128> {
        let amount = self.check_settleable(order_id)?.total();
        let new_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(DelayError::ArithmeticOverflow)?;

        self.balances.insert(to, new_balance);
        self.held -= amount;
        if let Some(record) = self.records.get_mut(&order_id) {
            record.settled = true;
        }
        Ok(amount)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn funded(payer: Address, amount: u128) -> EscrowLedger {
        let mut ledger = EscrowLedger::new();
        ledger.credit(payer, amount).unwrap();
        ledger
    }

    #[test]
    fn test_compute_required_escrow() {
        assert_eq!(EscrowLedger::compute_required_escrow(10, 5, 7).unwrap(), 57);
        assert_eq!(EscrowLedger::compute_required_escrow(0, 5, 7).unwrap(), 7);
        assert!(matches!(
            EscrowLedger::compute_required_escrow(u128::MAX, 2, 0),
            Err(DelayError::ArithmeticOverflow)
        ));
        assert!(matches!(
            EscrowLedger::compute_required_escrow(1, 1, u128::MAX),
            Err(DelayError::ArithmeticOverflow)
        ));
    }

    #[test]
    fn test_accept_refunds_excess() {
        let payer = Address::from_low_u64(1);
        let mut ledger = funded(payer, 1_000_000);

        let refund = ledger.accept_payment(1, payer, 10_234, 9_000, 1_000).unwrap();

        assert_eq!(refund, 234);
        assert_eq!(ledger.balance_of(&payer), 1_000_000 - 10_000);
        assert_eq!(ledger.held_balance(), 10_000);
        assert_eq!(ledger.outstanding(), ledger.held_balance());
    }

    #[test]
    fn test_accept_insufficient_payment() {
        let payer = Address::from_low_u64(1);
        let mut ledger = funded(payer, 1_000_000);

        let err = ledger.accept_payment(1, payer, 99, 100, 0).unwrap_err();
        assert!(matches!(
            err,
            DelayError::InsufficientPayment { provided: 99, required: 100 }
        ));
        assert_eq!(ledger.held_balance(), 0);
        assert_eq!(ledger.balance_of(&payer), 1_000_000);
        assert!(ledger.escrow(1).is_none());
    }

    #[test]
    fn test_accept_insufficient_balance() {
        let payer = Address::from_low_u64(1);
        let mut ledger = funded(payer, 50);

        let err = ledger.accept_payment(1, payer, 60, 40, 0).unwrap_err();
        assert!(matches!(err, DelayError::InsufficientBalance { balance: 50, needed: 60 }));
        assert_eq!(ledger.balance_of(&payer), 50);
    }

    #[test]
    fn test_accept_twice_for_one_order() {
        let payer = Address::from_low_u64(1);
        let mut ledger = funded(payer, 1_000);
        ledger.accept_payment(1, payer, 300, 200, 100).unwrap();

        let err = ledger.accept_payment(1, payer, 300, 200, 100).unwrap_err();
        assert!(matches!(err, DelayError::DuplicateEscrow(1)));
        assert_eq!(ledger.balance_of(&payer), 700);
        assert_eq!(ledger.held_balance(), 300);
        assert!(!ledger.escrow(1).unwrap().settled);
    }

    #[test]
    fn test_release_once() {
        let payer = Address::from_low_u64(1);
        let executor = Address::from_low_u64(2);
        let mut ledger = funded(payer, 1_000);
        ledger.accept_payment(1, payer, 300, 200, 100).unwrap();

        assert_eq!(ledger.release_to_recipient(1, executor).unwrap(), 300);
        assert_eq!(ledger.balance_of(&executor), 300);
        assert_eq!(ledger.held_balance(), 0);
        assert!(ledger.escrow(1).unwrap().settled);

        assert!(matches!(
            ledger.release_to_recipient(1, executor),
            Err(DelayError::AlreadySettled(1))
        ));
        assert!(matches!(ledger.refund_to_payer(1), Err(DelayError::AlreadySettled(1))));
    }

    #[test]
    fn test_refund_returns_both_parts() {
        let payer = Address::from_low_u64(1);
        let mut ledger = funded(payer, 1_000);
        ledger.accept_payment(1, payer, 300, 200, 100).unwrap();
        ledger.accept_payment(2, payer, 50, 50, 0).unwrap();

        assert_eq!(ledger.refund_to_payer(1).unwrap(), 300);
        assert_eq!(ledger.balance_of(&payer), 1_000 - 50);
        assert_eq!(ledger.held_balance(), 50);
        assert_eq!(ledger.outstanding(), 50);
    }

    #[test]
    fn test_settle_unknown_order() {
        let mut ledger = EscrowLedger::new();
        assert!(matches!(ledger.refund_to_payer(9), Err(DelayError::NotFound(9))));
        assert!(matches!(
            ledger.release_to_recipient(9, Address::from_low_u64(1)),
            Err(DelayError::NotFound(9))
        ));
    }
}
