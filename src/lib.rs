//! # TWAP Delay
//!
//! Delayed-order execution engine for token swaps against an AMM pair,
//! priced from a time-weighted average (TWAP) oracle.
//!
//! ## Architecture
//!
//! - **Types**: addresses, pair ids, orders, requests, events, fixed-point prices
//! - **Pair**: canonical pair orientation and registered pairs
//! - **Admin**: owner gate and the gas price it guards
//! - **Escrow**: native-asset ledger, per-order escrow, refunds
//! - **Queue**: append-only order storage and lifecycle
//! - **Engine**: enqueue / settle / cancel over the above
//!
//! ## Design Principles
//!
//! 1. **Atomicity**: a failed call changes nothing
//! 2. **Locked pricing**: gas price and oracle accumulator are snapshotted at submission
//! 3. **Monotonic ids**: one sequence for every order kind, starting at 1
//! 4. **No Floating Point**: TWAP math uses fixed-point decimals

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types
pub mod types;

/// Error types
pub mod error;

/// Deploy-time configuration
pub mod config;

/// Pair identity and registry
pub mod pair;

/// Owner gate and gas price
pub mod admin;

/// Escrow ledger
pub mod escrow;

/// Order queue
pub mod queue;

/// Delay engine and collaborator traits
pub mod engine;

/// In-memory collaborators
pub mod testing;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::DelayConfig;
pub use engine::{CallContext, DelayEngine, EnqueueReceipt, PriceAccumulatorSource, TokenTransfer};
pub use error::{DelayError, Result};
pub use types::{Address, Event, Order, OrderKind, OrderState, PairId};
