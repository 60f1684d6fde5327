//! Per-tier cash/blocked accounting.
//!
//! Each tier keeps a `cash` balance (usable for new commitments) and a
//! `blocked` balance (reserved against existing commitments). All mutations
//! are atomic: either the full operation succeeds or the account is unchanged.

use serde::{Deserialize, Serialize};
use settlewallet_types::{Balance, Money, Result, WalletError};

/// One tier's cash and blocked balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAccount {
    cash: Balance,
    blocked: Balance,
}

impl TierAccount {
    /// Create an account with both balances at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add cash.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if cash would exceed `u64::MAX`.
    pub fn deposit(&mut self, amount: Money) -> Result<()> {
        self.cash.increase(amount)
    }

    /// Reserve cash (cash → blocked).
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if cash < amount.
    pub fn block(&mut self, amount: Money) -> Result<()> {
        let (mut cash, mut blocked) = (self.cash, self.blocked);
        cash.decrease(amount)?;
        blocked.increase(amount)?;
        (self.cash, self.blocked) = (cash, blocked);
        Ok(())
    }

    /// Consume blocked funds. The money leaves the account entirely.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if blocked < amount.
    pub fn spend(&mut self, amount: Money) -> Result<()> {
        self.blocked.decrease(amount)
    }

    /// Release blocked funds back to cash (blocked → cash).
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if blocked < amount.
    pub fn unblock(&mut self, amount: Money) -> Result<()> {
        let (mut cash, mut blocked) = (self.cash, self.blocked);
        blocked.decrease(amount)?;
        cash.increase(amount)?;
        (self.cash, self.blocked) = (cash, blocked);
        Ok(())
    }

    /// Remove cash from the account.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if cash < amount.
    pub fn withdraw(&mut self, amount: Money) -> Result<()> {
        self.cash.decrease(amount)
    }

    /// Cash usable for new commitments.
    #[must_use]
    pub fn buying_power(&self) -> Money {
        self.cash.value()
    }

    #[must_use]
    pub fn cash(&self) -> Money {
        self.cash.value()
    }

    #[must_use]
    pub fn blocked(&self) -> Money {
        self.blocked.value()
    }

    /// Cash + blocked.
    #[must_use]
    pub fn total(&self) -> Money {
        self.cash.value().saturating_plus(self.blocked.value())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}

pub(crate) fn insufficient(needed: Money, available: Money) -> WalletError {
    WalletError::InsufficientFunds { needed, available }
}
