//! Cross-tier debt ledger.
//!
//! When a slow tier's commitment is funded from a faster tier's cash, the
//! faster tier (lender) ends up holding blocked funds on behalf of the slower
//! tier (borrower). The ledger records how much each borrower owes each
//! lender. Entries only ever run from a faster lender to a slower borrower:
//!
//! ```text
//!            borrower
//!           T0  T1  T2  T3
//!   lender T0 -   x   x   x
//!          T1 -   -   x   x
//!          T2 -   -   -   x
//!          T3 -   -   -   -
//! ```
//!
//! Missing entries read as zero.

use serde::{Deserialize, Serialize};
use settlewallet_types::{Money, Result, SettlementDelay, WalletError, constants::TIER_COUNT};

/// A single non-zero ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebtEntry {
    pub lender: SettlementDelay,
    pub borrower: SettlementDelay,
    pub amount: Money,
}

/// Fixed lender × borrower table of owed amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebtLedger {
    owed: [[Money; TIER_COUNT]; TIER_COUNT],
}

impl DebtLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_pair(lender: SettlementDelay, borrower: SettlementDelay) -> Result<()> {
        if lender.is_faster_than(borrower) {
            Ok(())
        } else {
            Err(WalletError::InvalidDebtPair { lender, borrower })
        }
    }

    fn slot(&mut self, lender: SettlementDelay, borrower: SettlementDelay) -> &mut Money {
        &mut self.owed[lender.ordinal()][borrower.ordinal()]
    }

    /// Amount `borrower` owes `lender`; zero if absent.
    #[must_use]
    pub fn get(&self, lender: SettlementDelay, borrower: SettlementDelay) -> Money {
        self.owed[lender.ordinal()][borrower.ordinal()]
    }

    /// # Errors
    /// - `InvalidDebtPair` unless `lender` is faster than `borrower`
    /// - `AmountOverflow` if the entry would exceed `u64::MAX`
    pub fn increase(
        &mut self,
        lender: SettlementDelay,
        borrower: SettlementDelay,
        amount: Money,
    ) -> Result<()> {
        Self::check_pair(lender, borrower)?;
        let slot = self.slot(lender, borrower);
        *slot = slot.plus(amount)?;
        Ok(())
    }

    /// Reduce an entry. Decreasing by more than is owed fails and leaves the
    /// entry unchanged.
    ///
    /// # Errors
    /// - `InvalidDebtPair` unless `lender` is faster than `borrower`
    /// - `DebtUnderflow` if `amount` exceeds the current entry
    pub fn decrease(
        &mut self,
        lender: SettlementDelay,
        borrower: SettlementDelay,
        amount: Money,
    ) -> Result<()> {
        Self::check_pair(lender, borrower)?;
        let owed = self.get(lender, borrower);
        let remaining = owed.minus(amount).map_err(|_| WalletError::DebtUnderflow {
            lender,
            borrower,
            owed,
            requested: amount,
        })?;
        *self.slot(lender, borrower) = remaining;
        Ok(())
    }

    /// Reset an entry to zero, returning what was owed.
    pub fn clear(&mut self, lender: SettlementDelay, borrower: SettlementDelay) -> Money {
        std::mem::take(self.slot(lender, borrower))
    }

    /// Total `lender` has lent to all slower tiers.
    #[must_use]
    pub fn lent_by(&self, lender: SettlementDelay) -> Money {
        lender
            .slower()
            .iter()
            .map(|&borrower| self.get(lender, borrower))
            .sum()
    }

    /// Total `borrower` owes all faster tiers.
    #[must_use]
    pub fn owed_by(&self, borrower: SettlementDelay) -> Money {
        borrower
            .faster()
            .iter()
            .map(|&lender| self.get(lender, borrower))
            .sum()
    }

    /// All non-zero entries, ordered by (lender, borrower).
    #[must_use]
    pub fn entries(&self) -> Vec<DebtEntry> {
        let mut out = Vec::new();
        for lender in SettlementDelay::ALL {
            for &borrower in lender.slower() {
                let amount = self.get(lender, borrower);
                if amount.is_not_zero() {
                    out.push(DebtEntry {
                        lender,
                        borrower,
                        amount,
                    });
                }
            }
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owed.iter().flatten().all(|m| m.is_zero())
    }
}
