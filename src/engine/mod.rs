//! Delay engine module.
//!
//! ## Design Principles
//!
//! 1. **Atomic calls**: every check runs before the first mutation
//! 2. **Locked pricing**: gas price and oracle accumulator are snapshotted at
//!    submission; execution reads them from the order
//! 3. **Clock-derived maturity**: an order is executable strictly after
//!    `valid_after_timestamp`, computed on each call from the caller's clock
//! 4. **Synchronous execution**: `&mut self` on every mutation serializes the
//!    id counter and the ledger
//!
//! ## Example
//!
//! ```
//! use twap_delay::config::DelayConfig;
//! use twap_delay::engine::{CallContext, DelayEngine};
//! use twap_delay::testing::{MockPriceOracle, MockTokens};
//! use twap_delay::types::{Address, BuyRequest};
//!
//! let owner = Address::from_low_u64(0xaa);
//! let account = Address::from_low_u64(0xdd);
//! let weth = Address::from_low_u64(0xee);
//! let token = Address::from_low_u64(0x11);
//!
//! let config = DelayConfig::new(owner, account, weth);
//! let mut engine = DelayEngine::new(
//!     config,
//!     MockTokens::new(account, weth),
//!     MockPriceOracle::default(),
//! )
//! .unwrap();
//!
//! let admin = CallContext::new(owner, 1_000);
//! let pair_id = engine.register_pair(&admin, weth, token, Address::from_low_u64(0x99)).unwrap();
//! engine.oracle_mut().set_price(pair_id, 100_000_000);
//! engine.set_gas_price(&admin, 0).unwrap();
//!
//! let wallet = Address::from_low_u64(1);
//! engine.fund(wallet, 10_000).unwrap();
//!
//! let request = BuyRequest {
//!     token_in: weth,
//!     token_out: token,
//!     amount_in_max: 1_000,
//!     amount_out: 900,
//!     wrap_unwrap: true,
//!     to: wallet,
//!     gas_limit: 400_000,
//!     submit_deadline: u64::MAX,
//! };
//! let ctx = CallContext::new(wallet, 1_000).with_value(1_500);
//! let receipt = engine.buy(&ctx, &request).unwrap();
//!
//! assert_eq!(receipt.order_id, 1);
//! assert_eq!(receipt.refund, 500);
//! assert_eq!(engine.held_balance(), 1_000);
//! ```

pub mod collaborators;
pub mod context;
pub mod delay;

pub use collaborators::{PriceAccumulatorSource, TokenTransfer};
pub use context::{CallContext, EnqueueReceipt, Settlement};
pub use delay::DelayEngine;
