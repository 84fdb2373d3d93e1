//! Notifications emitted by successful mutating calls.
//!
//! Exactly one event is produced per successful state change. The engine
//! buffers them; hosts drain the buffer with `DelayEngine::take_events`.

use crate::types::{Address, OrderId, OrderKind, PairId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    OrderCreated {
        order_id: OrderId,
        pair_id: PairId,
        kind: OrderKind,
    },
    OrderSettled {
        order_id: OrderId,
        executor: Address,
        released: u128,
    },
    OrderCanceled {
        order_id: OrderId,
        refunded: u128,
    },
    GasPriceChanged(u128),
    OwnerChanged(Address),
    DelayChanged(u64),
    MaxGasLimitChanged(u64),
    ExecutorChanged {
        executor: Address,
        enabled: bool,
    },
    OrderDisabledChanged {
        pair_id: PairId,
        kind: OrderKind,
        disabled: bool,
    },
    PairRegistered {
        pair_id: PairId,
        token0: Address,
        token1: Address,
    },
}
