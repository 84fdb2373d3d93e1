//! Error types for the delay engine.
//!
//! Every mutating call checks all of its preconditions before touching state,
//! so any `Err` returned from the engine means nothing was changed.

use thiserror::Error;

use crate::types::{OrderId, OrderKind, PairId};

/// Failure reported by the token transfer collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransferError(pub String);

/// Failure reported by the price accumulator collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct OracleError(pub String);

/// Configuration loading/validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Main error type for the delay engine
#[derive(Debug, Error)]
pub enum DelayError {
    // Request validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // Pair resolution
    #[error("invalid pair: tokens must be distinct and non-zero")]
    InvalidPair,

    #[error("pair {0} is not registered")]
    UnknownPair(PairId),

    #[error("pair {0} is already registered")]
    PairExists(PairId),

    #[error("{kind:?} orders are disabled for pair {pair_id}")]
    OrderDisabled { pair_id: PairId, kind: OrderKind },

    // Escrow sizing
    #[error("insufficient payment: provided {provided}, required {required}")]
    InsufficientPayment { provided: u128, required: u128 },

    #[error("insufficient balance: has {balance}, needs {needed}")]
    InsufficientBalance { balance: u128, needed: u128 },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    // Admin gating
    #[error("unauthorized caller")]
    Unauthorized,

    #[error("zero address")]
    ZeroAddress,

    #[error("new owner equals current owner")]
    SameOwner,

    // State machine
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("order {order_id} matures after {valid_after_timestamp}")]
    NotMatured {
        order_id: OrderId,
        valid_after_timestamp: u64,
    },

    #[error("order {0} already settled")]
    AlreadySettled(OrderId),

    #[error("escrow for order {0} already taken")]
    DuplicateEscrow(OrderId),

    // Collaborators
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("encoding failed: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, DelayError>;
