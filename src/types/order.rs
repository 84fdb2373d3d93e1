//! Order types for the delayed-order queue.
//!
//! ## Layout
//!
//! Every order is an [`OrderHeader`] (fields shared by all kinds) plus an
//! [`OrderDetails`] payload tagged by [`OrderKind`]. Amount fields in the
//! payload keep the caller's token orientation; the header's `inverted` flag
//! records how that orientation relates to the canonical pair order.
//!
//! ## SSZ Serialization
//!
//! [`OrderRecord`] is the fixed-size projection that feeds the queue's audit
//! root: header fields inline, payer and payload folded into a SHA-256 digest. SSZ encodes basic types little-endian and fixed-size
//! containers as plain concatenations, so identical queues hash identically.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::types::{Address, PairId};

/// Order identifier. Allocated from 1, never reused.
pub type OrderId = u64;

// ============================================================================
// OrderKind enum
// ============================================================================

/// Kind of delayed order.
///
/// Represented as u8 in [`OrderRecord`]:
/// - Buy = 1
/// - Sell = 2
/// - Deposit = 3
/// - Withdraw = 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderKind {
    /// Swap for an exact output, spending at most `amount_in_max`
    Buy,
    /// Swap an exact input for at least `amount_out_min`
    Sell,
    /// Add liquidity to the pair
    Deposit,
    /// Remove liquidity from the pair
    Withdraw,
}

impl OrderKind {
    pub const ALL: [OrderKind; 4] = [
        OrderKind::Buy,
        OrderKind::Sell,
        OrderKind::Deposit,
        OrderKind::Withdraw,
    ];

    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderKind::Buy => 1,
            OrderKind::Sell => 2,
            OrderKind::Deposit => 3,
            OrderKind::Withdraw => 4,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(OrderKind::Buy),
            2 => Some(OrderKind::Sell),
            3 => Some(OrderKind::Deposit),
            4 => Some(OrderKind::Withdraw),
            _ => None,
        }
    }
}

// ============================================================================
// Order status
// ============================================================================

/// Stored lifecycle status. Only `Pending` can transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Settled,
    Canceled,
}

impl OrderStatus {
    pub fn to_u8(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Settled => 1,
            OrderStatus::Canceled => 2,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

/// Lifecycle state as observed at a given instant.
///
/// `Matured` is never stored; it is derived from the clock on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    Pending,
    Matured,
    Settled,
    Canceled,
}

// ============================================================================
// Order header and payloads
// ============================================================================

/// Fields shared by every order kind, snapshotted at enqueue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHeader {
    pub order_id: OrderId,
    pub pair_id: PairId,
    /// Caller's token order is the reverse of canonical orientation
    pub inverted: bool,
    /// The order matures strictly after this instant
    pub valid_after_timestamp: u64,
    /// Gas price locked at submission
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Oracle price accumulator reading at submission
    pub price_accumulator: u128,
    /// Submission timestamp
    pub timestamp: u64,
    /// Principal that funded the escrow
    pub payer: Address,
}

impl OrderHeader {
    /// Whether the order is past its delay window at `now`.
    #[inline]
    pub fn is_mature(&self, now: u64) -> bool {
        now > self.valid_after_timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyOrder {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in_max: u128,
    pub amount_out: u128,
    pub wrap_unwrap: bool,
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellOrder {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub amount_out_min: u128,
    pub wrap_unwrap: bool,
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositOrder {
    pub token0: Address,
    pub token1: Address,
    pub amount0: u128,
    pub amount1: u128,
    /// Swap part of the deposit to balance the amounts before adding liquidity
    pub swap: bool,
    /// Fixed-point (10^8) bounds the executor enforces on the balancing swap
    pub min_swap_price: u64,
    pub max_swap_price: u64,
    pub wrap_unwrap: bool,
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOrder {
    pub token0: Address,
    pub token1: Address,
    pub liquidity: u128,
    pub amount0_min: u128,
    pub amount1_min: u128,
    pub wrap_unwrap: bool,
    pub to: Address,
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDetails {
    Buy(BuyOrder),
    Sell(SellOrder),
    Deposit(DepositOrder),
    Withdraw(WithdrawOrder),
}

impl OrderDetails {
    pub fn kind(&self) -> OrderKind {
        match self {
            OrderDetails::Buy(_) => OrderKind::Buy,
            OrderDetails::Sell(_) => OrderKind::Sell,
            OrderDetails::Deposit(_) => OrderKind::Deposit,
            OrderDetails::Withdraw(_) => OrderKind::Withdraw,
        }
    }

    pub fn wrap_unwrap(&self) -> bool {
        match self {
            OrderDetails::Buy(buy) => buy.wrap_unwrap,
            OrderDetails::Sell(sell) => sell.wrap_unwrap,
            OrderDetails::Deposit(deposit) => deposit.wrap_unwrap,
            OrderDetails::Withdraw(withdraw) => withdraw.wrap_unwrap,
        }
    }

    /// Feed every payload field into `hasher`, little-endian, in declaration
    /// order.
    fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update([self.kind().to_u8()]);
        match self {
            OrderDetails::Buy(buy) => {
                hasher.update(buy.token_in.as_bytes());
                hasher.update(buy.token_out.as_bytes());
                hasher.update(buy.amount_in_max.to_le_bytes());
                hasher.update(buy.amount_out.to_le_bytes());
                hasher.update([u8::from(buy.wrap_unwrap)]);
                hasher.update(buy.to.as_bytes());
            }
            OrderDetails::Sell(sell) => {
                hasher.update(sell.token_in.as_bytes());
                hasher.update(sell.token_out.as_bytes());
                hasher.update(sell.amount_in.to_le_bytes());
                hasher.update(sell.amount_out_min.to_le_bytes());
                hasher.update([u8::from(sell.wrap_unwrap)]);
                hasher.update(sell.to.as_bytes());
            }
            OrderDetails::Deposit(deposit) => {
                hasher.update(deposit.token0.as_bytes());
                hasher.update(deposit.token1.as_bytes());
                hasher.update(deposit.amount0.to_le_bytes());
                hasher.update(deposit.amount1.to_le_bytes());
                hasher.update([u8::from(deposit.swap)]);
                hasher.update(deposit.min_swap_price.to_le_bytes());
                hasher.update(deposit.max_swap_price.to_le_bytes());
                hasher.update([u8::from(deposit.wrap_unwrap)]);
                hasher.update(deposit.to.as_bytes());
            }
            OrderDetails::Withdraw(withdraw) => {
                hasher.update(withdraw.token0.as_bytes());
                hasher.update(withdraw.token1.as_bytes());
                hasher.update(withdraw.liquidity.to_le_bytes());
                hasher.update(withdraw.amount0_min.to_le_bytes());
                hasher.update(withdraw.amount1_min.to_le_bytes());
                hasher.update([u8::from(withdraw.wrap_unwrap)]);
                hasher.update(withdraw.to.as_bytes());
            }
        }
    }
}

/// A queued order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub header: OrderHeader,
    pub details: OrderDetails,
}

impl Order {
    #[inline]
    pub fn id(&self) -> OrderId {
        self.header.order_id
    }

    #[inline]
    pub fn kind(&self) -> OrderKind {
        self.details.kind()
    }
}

/// Kind-agnostic view returned by `get_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub kind: OrderKind,
    pub valid_after_timestamp: u64,
    pub status: OrderStatus,
}

// ============================================================================
// SSZ record
// ============================================================================

/// Fixed-size order projection used for the queue audit root.
///
/// `body_digest` is SHA-256 over the payer and the kind-specific payload, so
/// orders differing only in amounts, recipient or flags hash differently.
///
/// ## SSZ Layout
///
/// 8 + 1 + 1 + 32 + 1 + 8 + 16 + 8 + 16 + 8 + 32 = 131 bytes
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderRecord {
    pub order_id: u64,
    pub kind_raw: u8,
    pub status_raw: u8,
    pub pair_id: [u8; 32],
    pub inverted: bool,
    pub valid_after_timestamp: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub price_accumulator: u128,
    pub timestamp: u64,
    pub body_digest: [u8; 32],
}

impl OrderRecord {
    pub fn new(order: &Order, status: OrderStatus) -> Self {
        let header = &order.header;
        Self {
            order_id: header.order_id,
            kind_raw: order.kind().to_u8(),
            status_raw: status.to_u8(),
            pair_id: header.pair_id.0,
            inverted: header.inverted,
            valid_after_timestamp: header.valid_after_timestamp,
            gas_price: header.gas_price,
            gas_limit: header.gas_limit,
            price_accumulator: header.price_accumulator,
            timestamp: header.timestamp,
            body_digest: Self::body_digest(order),
        }
    }

    fn body_digest(order: &Order) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(order.header.payer.as_bytes());
        order.details.hash_into(&mut hasher);

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
