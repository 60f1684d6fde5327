//! Supply conservation invariant checker.
//!
//! Invariant enforced after every mutating wallet call:
//! ```text
//! Σ_tiers(cash + blocked) == Σ(charges) + Σ(deposits) - Σ(spends)
//! ```
//!
//! Block and unblock only move money between balances; deposit
//! reconciliation only moves it between tiers. If this ever breaks, the
//! ledger has lost or invented money.

use serde::{Deserialize, Serialize};
use settlewallet_types::{Money, Result, WalletError};

/// Running flow totals for one wallet since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyConservation {
    charged: Money,
    deposited: Money,
    spent: Money,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `AmountOverflow` if total inflow would exceed `u64::MAX`.
    pub fn record_charge(&mut self, amount: Money) -> Result<()> {
        let charged = self.charged.plus(amount)?;
        charged.plus(self.deposited)?;
        self.charged = charged;
        Ok(())
    }

    /// # Errors
    /// Returns `AmountOverflow` if total inflow would exceed `u64::MAX`.
    pub fn record_deposit(&mut self, amount: Money) -> Result<()> {
        let deposited = self.deposited.plus(amount)?;
        self.charged.plus(deposited)?;
        self.deposited = deposited;
        Ok(())
    }

    /// # Errors
    /// Returns `AmountOverflow` if total outflow would exceed `u64::MAX`.
    pub fn record_spend(&mut self, amount: Money) -> Result<()> {
        self.spent = self.spent.plus(amount)?;
        Ok(())
    }

    /// charges + deposits - spends.
    ///
    /// Spends are bounded by what was committed, so this never goes below
    /// zero on a wallet that only recorded successful operations. Inflow
    /// never exceeds `u64::MAX`, so the sum is exact.
    #[must_use]
    pub fn expected_supply(&self) -> Money {
        self.charged
            .saturating_plus(self.deposited)
            .saturating_minus(self.spent)
    }

    /// # Errors
    /// Returns [`WalletError::InvariantViolation`] if `actual_supply` differs
    /// from the expected supply.
    pub fn verify(&self, actual_supply: Money) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(WalletError::InvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (charged={}, deposited={}, spent={})",
                    self.charged, self.deposited, self.spent,
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_charged(&self) -> Money {
        self.charged
    }

    #[must_use]
    pub fn total_deposited(&self) -> Money {
        self.deposited
    }

    #[must_use]
    pub fn total_spent(&self) -> Money {
        self.spent
    }
}
