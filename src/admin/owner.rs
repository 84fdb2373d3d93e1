//! Ownership gate for privileged mutations.

use tracing::{info, warn};

use crate::error::{DelayError, Result};
use crate::types::{Address, Event};

#[derive(Debug, Clone)]
pub struct OracleAdmin {
    owner: Address,
}

impl OracleAdmin {
    /// The deployer becomes the owner.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    #[inline]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            warn!(%caller, owner = %self.owner, "privileged call rejected");
            return Err(DelayError::Unauthorized);
        }
        Ok(())
    }

    /// Transfer ownership.
    ///
    /// Checks run in order: caller is owner, new owner differs, new owner is
    /// not the zero address.
    pub fn set_owner(&mut self, caller: Address, new_owner: Address) -> Result<Event> {
        self.ensure_owner(caller)?;
        if new_owner == self.owner {
            return Err(DelayError::SameOwner);
        }
        if new_owner.is_zero() {
            return Err(DelayError::ZeroAddress);
        }

        self.owner = new_owner;
        info!(%new_owner, "owner set");
        Ok(Event::OwnerChanged(new_owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_deployer() {
        let deployer = Address::from_low_u64(1);
        assert_eq!(OracleAdmin::new(deployer).owner(), deployer);
    }

    #[test]
    fn test_set_owner_checks() {
        let wallet = Address::from_low_u64(1);
        let other = Address::from_low_u64(2);
        let mut admin = OracleAdmin::new(wallet);

        assert!(matches!(admin.set_owner(other, other), Err(DelayError::Unauthorized)));
        assert!(matches!(admin.set_owner(wallet, wallet), Err(DelayError::SameOwner)));
        assert!(matches!(admin.set_owner(wallet, Address::ZERO), Err(DelayError::ZeroAddress)));
        assert_eq!(admin.owner(), wallet);

        let event = admin.set_owner(wallet, other).unwrap();
        assert_eq!(event, Event::OwnerChanged(other));
        assert_eq!(admin.owner(), other);

        // old owner lost the capability
        assert!(admin.ensure_owner(wallet).is_err());
        assert!(admin.ensure_owner(other).is_ok());
    }
}
