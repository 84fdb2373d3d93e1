//! Append-only order queue.
//!
//! ## Architecture
//!
//! - **Slab**: order entry storage, never removed from, so slab keys follow
//!   allocation order
//! - **HashMap**: order id → slab key
//! - **Counter**: `newest_order_id`, one sequence shared by every order kind
//!
//! ## Lifecycle
//!
//! ```text
//! Pending ──(now > valid_after)──> Matured ──settle──> Settled
//!                                          └─cancel──> Canceled
//! ```
//!
//! `Matured` is derived from the clock on every read. Consumed orders stay in
//! the queue for audit; ids are never reused.
//!
//! ## Example
//!
//! ```
//! use twap_delay::queue::OrderQueue;
//! use twap_delay::types::*;
//!
//! let mut queue = OrderQueue::with_capacity(16);
//! let header = OrderHeader {
//!     order_id: 0,
//!     pair_id: PairId([1u8; 32]),
//!     inverted: false,
//!     valid_after_timestamp: 1_300,
//!     gas_price: 0,
//!     gas_limit: 400_000,
//!     price_accumulator: 0,
//!     timestamp: 1_000,
//!     payer: Address::from_low_u64(1),
//! };
//! let details = OrderDetails::Sell(SellOrder {
//!     token_in: Address::from_low_u64(2),
//!     token_out: Address::from_low_u64(3),
//!     amount_in: 10,
//!     amount_out_min: 0,
//!     wrap_unwrap: false,
//!     to: Address::from_low_u64(1),
//! });
//!
//! let id = queue.push(header, details).unwrap();
//! assert_eq!(id, 1);
//! assert_eq!(queue.state(id, 1_300).unwrap(), OrderState::Pending);
//! assert_eq!(queue.state(id, 1_301).unwrap(), OrderState::Matured);
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::debug;

use crate::error::{DelayError, Result};
use crate::types::{
    BuyOrder, DepositOrder, Order, OrderDetails, OrderHeader, OrderId, OrderRecord, OrderState,
    OrderStatus, OrderSummary, SellOrder, WithdrawOrder,
};

/// A stored order and its lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    pub order: Order,
    pub status: OrderStatus,
}

impl OrderEntry {
    /// Lifecycle state observed at `now`.
    pub fn state(&self, now: u64) -> OrderState {
        match self.status {
            OrderStatus::Settled => OrderState::Settled,
            OrderStatus::Canceled => OrderState::Canceled,
            OrderStatus::Pending if self.order.header.is_mature(now) => OrderState::Matured,
            OrderStatus::Pending => OrderState::Pending,
        }
    }
}

#[derive(Debug, Default)]
pub struct OrderQueue {
    orders: Slab<OrderEntry>,
    order_index: HashMap<OrderId, usize>,
    newest_order_id: OrderId,
    last_processed_order_id: OrderId,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(capacity),
            order_index: HashMap::with_capacity(capacity),
            newest_order_id: 0,
            last_processed_order_id: 0,
        }
    }

    // ========================================================================
    // Counters
    // ========================================================================

    /// Id of the last allocated order; 0 before the first enqueue.
    #[inline]
    pub fn newest_order_id(&self) -> OrderId {
        self.newest_order_id
    }

    /// Highest id that has been settled or canceled.
    #[inline]
    pub fn last_processed_order_id(&self) -> OrderId {
        self.last_processed_order_id
    }

    /// Id the next `push` will allocate.
    pub fn next_order_id(&self) -> Result<OrderId> {
        self.newest_order_id
            .checked_add(1)
            .ok_or(DelayError::ArithmeticOverflow)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    // ========================================================================
    // Append
    // ========================================================================

    /// Allocate the next id, stamp it on `header`, and store the order Pending.
    pub fn push(&mut self, mut header: OrderHeader, details: OrderDetails) -> Result<OrderId> {
        let order_id = self.next_order_id()?;
        header.order_id = order_id;

        let key = self.orders.insert(OrderEntry {
            order: Order { header, details },
            status: OrderStatus::Pending,
        });
        self.order_index.insert(order_id, key);
        self.newest_order_id = order_id;

        debug!(order_id, "order queued");
        Ok(order_id)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get(&self, order_id: OrderId) -> Result<&OrderEntry> {
        self.order_index
            .get(&order_id)
            .and_then(|key| self.orders.get(*key))
            .ok_or(DelayError::NotFound(order_id))
    }

    pub fn get_order(&self, order_id: OrderId) -> Result<OrderSummary> {
        let entry = self.get(order_id)?;
        Ok(OrderSummary {
            order_id,
            kind: entry.order.kind(),
            valid_after_timestamp: entry.order.header.valid_after_timestamp,
            status: entry.status,
        })
    }

    /// Typed read. An id of another kind is reported as `NotFound`.
    pub fn get_buy_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &BuyOrder)> {
        let order = &self.get(order_id)?.order;
        match &order.details {
            OrderDetails::Buy(buy) => Ok((&order.header, buy)),
            _ => Err(DelayError::NotFound(order_id)),
        }
    }

    pub fn get_sell_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &SellOrder)> {
        let order = &self.get(order_id)?.order;
        match &order.details {
            OrderDetails::Sell(sell) => Ok((&order.header, sell)),
            _ => Err(DelayError::NotFound(order_id)),
        }
    }

    pub fn get_deposit_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &DepositOrder)> {
        let order = &self.get(order_id)?.order;
        match &order.details {
            OrderDetails::Deposit(deposit) => Ok((&order.header, deposit)),
            _ => Err(DelayError::NotFound(order_id)),
        }
    }

    pub fn get_withdraw_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &WithdrawOrder)> {
        let order = &self.get(order_id)?.order;
        match &order.details {
            OrderDetails::Withdraw(withdraw) => Ok((&order.header, withdraw)),
            _ => Err(DelayError::NotFound(order_id)),
        }
    }

    pub fn state(&self, order_id: OrderId, now: u64) -> Result<OrderState> {
        Ok(self.get(order_id)?.state(now))
    }

    /// Pending orders past their delay at `now`, oldest first.
    pub fn mature_orders(&self, now: u64, limit: usize) -> Vec<OrderId> {
        self.orders
            .iter()
            .map(|(_, entry)| entry)
            .filter(|entry| entry.state(now) == OrderState::Matured)
            .map(|entry| entry.order.id())
            .take(limit)
            .collect()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Check that `order_id` is Pending and matured at `now`.
    pub fn ensure_settleable(&self, order_id: OrderId, now: u64) -> Result<&OrderEntry> {
        let entry = self.get(order_id)?;
        match entry.state(now) {
            OrderState::Matured => Ok(entry),
            OrderState::Pending => Err(DelayError::NotMatured {
                order_id,
                valid_after_timestamp: entry.order.header.valid_after_timestamp,
            }),
            OrderState::Settled | OrderState::Canceled => {
                Err(DelayError::AlreadySettled(order_id))
            }
        }
    }

    pub fn mark_settled(&mut self, order_id: OrderId) -> Result<()> {
        self.consume(order_id, OrderStatus::Settled)
    }

    pub fn mark_canceled(&mut self, order_id: OrderId) -> Result<()> {
        self.consume(order_id, OrderStatus::Canceled)
    }

    fn consume(&mut self, order_id: OrderId, status: OrderStatus) -> Result<()> {
        let key = *self
            .order_index
            .get(&order_id)
            .ok_or(DelayError::NotFound(order_id))?;
        let entry = self
            .orders
            .get_mut(key)
            .ok_or(DelayError::NotFound(order_id))?;
        if entry.status.is_terminal() {
            return Err(DelayError::AlreadySettled(order_id));
        }

        entry.status = status;
        self.last_processed_order_id = self.last_processed_order_id.max(order_id);
        debug!(order_id, ?status, "order consumed");
        Ok(())
    }

    // ========================================================================
    // Audit root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every order record, in id order.
    /// Each record carries the header, the status and a digest of the
    /// payer and payload.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        for (_, entry) in self.orders.iter() {
            let record = OrderRecord::new(&entry.order, entry.status);
            let bytes = ssz_rs::serialize(&record)
                .map_err(|err| DelayError::Encoding(format!("{err:?}")))?;
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    pub fn state_root_hex(&self) -> Result<String> {
        Ok(hex::encode(self.state_root()?))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
