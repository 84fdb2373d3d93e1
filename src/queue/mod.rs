//! Order queue: storage, id sequence and lifecycle.
//!
//! ## Components
//!
//! - [`OrderQueue`]: append-only storage with a single global id counter
//! - [`OrderEntry`]: an order plus its stored status
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Push | O(1) |
//! | Get by id | O(1) |
//! | Settle / cancel | O(1) |
//! | Mature scan | O(n) |

pub mod order_queue;

pub use order_queue::{OrderEntry, OrderQueue};
