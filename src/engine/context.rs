//! Per-call context and call results.

use crate::types::{Address, Order, OrderId};

/// Who is calling, what native value they attached, and the block time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub value: u128,
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(sender: Address, timestamp: u64) -> Self {
        Self {
            sender,
            value: 0,
            timestamp,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

/// Result of a successful enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueReceipt {
    pub order_id: OrderId,
    /// Excess over the required escrow, returned to the payer in the same call
    pub refund: u128,
}

/// Result of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub order: Order,
    /// Escrow (gas cost + principal) released to the executor
    pub released: u128,
}
