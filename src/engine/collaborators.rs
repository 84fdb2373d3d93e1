//! Interfaces of the external collaborators the engine calls.
//!
//! The engine never moves tokens or reads the AMM itself. Hosts plug in
//! implementations of these traits; [`crate::testing`] has in-memory ones.

use crate::error::{OracleError, TransferError};
use crate::pair::PairInfo;
use crate::types::Address;

/// Token movement and native-asset wrapping.
///
/// `transfer`, `wrap` and `unwrap` act on the engine's own holding account.
pub trait TokenTransfer {
    /// Pull `amount` of `token` from `from` into `to`.
    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TransferError>;

    /// Send `amount` of `token` from the engine's holding account to `to`.
    fn transfer(&mut self, token: Address, to: Address, amount: u128) -> Result<(), TransferError>;

    /// Convert native value into the wrapped token. Returns the wrapped amount.
    fn wrap(&mut self, amount: u128) -> Result<u128, TransferError>;

    /// Convert the wrapped token back into native value.
    fn unwrap(&mut self, amount: u128) -> Result<u128, TransferError>;
}

/// TWAP oracle: cumulative price readings per pair.
pub trait PriceAccumulatorSource {
    /// Current accumulator for `pair` at `now`, in canonical orientation.
    fn current_price_accumulator(&self, pair: &PairInfo, now: u64) -> Result<u128, OracleError>;
}
