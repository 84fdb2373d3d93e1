//! Pair identity for the delay engine.
//!
//! - [`PairRegistry`]: canonical orientation, pair ids, registered pairs
//! - [`PairInfo`]: tokens of a registered pair in low→high order

pub mod registry;

pub use registry::{PairInfo, PairRegistry};
