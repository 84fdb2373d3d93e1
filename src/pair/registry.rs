//! Pair registry: canonical orientation and registered pair metadata.
//!
//! ## Canonical Orientation
//!
//! A pair is an unordered set of two tokens. Internally the tokens are always
//! stored low→high by byte order. Resolution is a pure function of the two
//! addresses, so `resolve_pair_id(a, b) == resolve_pair_id(b, a)`; the
//! direction a caller asked for survives only as the per-order `inverted` flag.
//!
//! ## Example
//!
//! ```
//! use twap_delay::pair::PairRegistry;
//! use twap_delay::types::Address;
//!
//! let a = Address::from_low_u64(1);
//! let b = Address::from_low_u64(2);
//!
//! assert_eq!(
//!     PairRegistry::resolve_pair_id(a, b).unwrap(),
//!     PairRegistry::resolve_pair_id(b, a).unwrap(),
//! );
//! assert!(!PairRegistry::is_inverted(a, b));
//! assert!(PairRegistry::is_inverted(b, a));
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DelayError, Result};
use crate::types::{Address, PairId};

/// Metadata of a registered pair, tokens in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairInfo {
    pub pair_id: PairId,
    pub token0: Address,
    pub token1: Address,
    /// Token minted to liquidity providers; pulled on withdraw requests
    pub liquidity_token: Address,
}

impl PairInfo {
    #[inline]
    pub fn contains(&self, token: Address) -> bool {
        self.token0 == token || self.token1 == token
    }
}

#[derive(Debug, Default)]
pub struct PairRegistry {
    pairs: HashMap<PairId, PairInfo>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Pure resolution
    // ========================================================================

    /// Orient two tokens low→high.
    #[inline]
    pub fn canonical(token_a: Address, token_b: Address) -> (Address, Address) {
        if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        }
    }

    /// Resolve the pair id of two distinct, non-zero tokens.
    pub fn resolve_pair_id(token_a: Address, token_b: Address) -> Result<PairId> {
        if token_a == token_b || token_a.is_zero() || token_b.is_zero() {
            return Err(DelayError::InvalidPair);
        }
        let (low, high) = Self::canonical(token_a, token_b);
        Ok(PairId::from_canonical(low, high))
    }

    /// True iff `(token_a, token_b)` is the reverse of canonical order.
    #[inline]
    pub fn is_inverted(token_a: Address, token_b: Address) -> bool {
        token_a > token_b
    }

    // ========================================================================
    // Registered pairs
    // ========================================================================

    /// Record a pair. Fails if the tokens are invalid or already registered.
    pub fn register(
        &mut self,
        token_a: Address,
        token_b: Address,
        liquidity_token: Address,
    ) -> Result<PairInfo> {
        let pair_id = Self::resolve_pair_id(token_a, token_b)?;
        if liquidity_token.is_zero() {
            return Err(DelayError::ZeroAddress);
        }
        if self.pairs.contains_key(&pair_id) {
            return Err(DelayError::PairExists(pair_id));
        }

        let (token0, token1) = Self::canonical(token_a, token_b);
        let info = PairInfo {
            pair_id,
            token0,
            token1,
            liquidity_token,
        };
        self.pairs.insert(pair_id, info);

        debug!(%pair_id, %token0, %token1, "pair registered");
        Ok(info)
    }

    #[inline]
    pub fn get(&self, pair_id: &PairId) -> Option<&PairInfo> {
        self.pairs.get(pair_id)
    }

    /// Resolve and look up in one step.
    ///
    /// Returns the registered pair and the caller's `inverted` flag.
    pub fn lookup(&self, token_a: Address, token_b: Address) -> Result<(&PairInfo, bool)> {
        let pair_id = Self::resolve_pair_id(token_a, token_b)?;
        let info = self
            .pairs
            .get(&pair_id)
            .ok_or(DelayError::UnknownPair(pair_id))?;
        Ok((info, Self::is_inverted(token_a, token_b)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
