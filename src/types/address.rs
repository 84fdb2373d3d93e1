//! Token and principal identifiers.
//!
//! ## Address
//!
//! A 20-byte identifier used both for fungible tokens and for principals
//! (payers, recipients, executors, the owner). Addresses compare byte-wise,
//! which gives the total order used for canonical pair orientation.
//!
//! ## PairId
//!
//! A 32-byte identity derived from the canonical (low, high) token order:
//! `SHA-256(low ++ high)`. Both call orders of the same two tokens resolve to
//! the same id.
//!
//! ## Example
//!
//! ```
//! use twap_delay::types::{Address, PairId};
//!
//! let a = Address::from_low_u64(1);
//! let b = Address::from_low_u64(2);
//! assert!(a < b);
//! assert_eq!(PairId::from_canonical(a, b).to_string().len(), 66);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

// ============================================================================
// Address
// ============================================================================

/// A token or principal identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// Failure to parse a hex address string.
#[derive(Debug, Error, PartialEq)]
pub enum AddressParseError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected 20 bytes, got {0}")]
    Length(usize),
}

impl Address {
    /// The null principal.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Build an address whose last eight bytes hold `value` (big-endian).
    ///
    /// Handy for fixtures where only distinctness and ordering matter.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Address(bytes)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw)?;
        let bytes: [u8; ADDRESS_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::Length(bytes.len()))?;
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

// ============================================================================
// PairId
// ============================================================================

/// Canonical identity of an unordered token pair.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PairId(pub [u8; 32]);

impl PairId {
    /// Derive the id from tokens already in canonical (low, high) order.
    ///
    /// Callers normally go through [`crate::pair::PairRegistry::resolve_pair_id`],
    /// which orients the tokens first.
    pub fn from_canonical(low: Address, high: Address) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(low.as_bytes());
        hasher.update(high.as_bytes());
        let digest = hasher.finalize();

        let mut id = [0u8; 32];
        id.copy_from_slice(&digest);
        PairId(id)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairId({self})")
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
