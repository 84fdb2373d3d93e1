//! Escrow accounting for queued orders.
//!
//! [`EscrowLedger`] is the only component that moves native value. The engine
//! sizes escrow with [`EscrowLedger::compute_required_escrow`], takes payment
//! at enqueue, and releases or refunds each order's record exactly once.

pub mod ledger;

pub use ledger::{EscrowLedger, EscrowRecord};
