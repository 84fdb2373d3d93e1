//! Core data types for the TWAP delay engine
//!
//! ## Types
//!
//! - [`Address`], [`PairId`]: token/principal and pair identity
//! - [`Order`]: header + kind-specific [`OrderDetails`]
//! - [`BuyRequest`] and friends: caller submissions
//! - [`Event`]: notifications from mutating calls
//! - [`price`]: fixed-point prices and the TWAP average
//!
//! ## Amounts
//!
//! Native-asset and token amounts are `u128` with checked arithmetic.
//! Timestamps are seconds.

mod address;
mod event;
mod order;
mod request;
pub mod price;

pub use address::{Address, AddressParseError, PairId, ADDRESS_LEN};
pub use event::Event;
pub use order::{
    BuyOrder, DepositOrder, Order, OrderDetails, OrderHeader, OrderId, OrderKind, OrderRecord,
    OrderState, OrderStatus, OrderSummary, SellOrder, WithdrawOrder,
};
pub use request::{BuyRequest, DepositRequest, SellRequest, WithdrawRequest};
