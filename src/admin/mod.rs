//! Administration: the owner gate and the gas price it guards.
//!
//! - [`OracleAdmin`]: current owner, ownership transfer, `ensure_owner`
//! - [`GasPriceOracle`]: process-wide gas price, owner-settable

pub mod gas;
pub mod owner;

pub use gas::GasPriceOracle;
pub use owner::OracleAdmin;
