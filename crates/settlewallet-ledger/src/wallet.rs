//! The settlement wallet: four tier accounts plus the cross-tier debt ledger.
//!
//! ## Operations
//!
//! - **charge**: already-settled cash lands on T0.
//! - **block**: reserve against a commitment at tier `t`, drawing cash from
//!   `t` first and then from progressively faster tiers. Every faster-tier
//!   contribution is recorded as `debt(lender, t)`.
//! - **deposit**: funds arriving at `t` first repay what `t` owes faster
//!   tiers (fastest first); only the surplus becomes `t`'s cash.
//! - **spend**: consume a commitment at `t`: `t`'s own reservation first,
//!   then borrowed reservations from the closest faster tier outward.
//! - **unblock**: release a commitment at `t` back to cash, settling
//!   borrowed reservations fastest first.
//!
//! ## Free blocked and commitment capacity
//!
//! A tier's blocked balance also holds funds it lent to slower tiers.
//! Only the remainder is its own:
//!
//! ```text
//! free_blocked(t) = blocked(t) - Σ_b debt(t, b)
//! spendable(t)    = free_blocked(t) + Σ_l debt(l, t)
//! ```
//!
//! `spend` and `unblock` are bounded by `spendable(t)` and never draw a
//! lender below what it still backs, so `Σ_b debt(l, b) <= blocked(l)`
//! holds for every lender after every call. Block raises `spendable(t)`,
//! spend and unblock lower it. A deposit repaying `debt(l, t)` only touches
//! the debt and `l`'s cash, so the repaid part of the commitment moves from
//! `spendable(t)` to `spendable(l)`: `l` now holds that reservation as its
//! own.
//!
//! ## Atomicity
//!
//! Each call works on a draft copy of the books and commits only when every
//! step (and, if enabled, the invariant check) succeeded. A failed call
//! leaves the wallet exactly as it was.

use settlewallet_types::{
    AccountId, Money, Result, SettlementDelay, WalletConfig, WalletError, constants::TIER_COUNT,
};

use crate::debt_ledger::DebtLedger;
use crate::snapshot::{TierSnapshot, WalletSnapshot};
use crate::supply_conservation::SupplyConservation;
use crate::tier_account::{TierAccount, insufficient};

/// Everything a wallet mutates. Cloned into a draft for every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Books {
    accounts: [TierAccount; TIER_COUNT],
    debts: DebtLedger,
    supply: SupplyConservation,
}

impl Books {
    fn account(&self, tier: SettlementDelay) -> &TierAccount {
        &self.accounts[tier.ordinal()]
    }

    fn account_mut(&mut self, tier: SettlementDelay) -> &mut TierAccount {
        &mut self.accounts[tier.ordinal()]
    }

    fn buying_power(&self, tier: SettlementDelay) -> Money {
        tier.up_to_and_including()
            .map(|t| self.account(t).buying_power())
            .sum()
    }

    fn free_blocked(&self, tier: SettlementDelay) -> Money {
        self.account(tier)
            .blocked()
            .saturating_minus(self.debts.lent_by(tier))
    }

    fn spendable(&self, tier: SettlementDelay) -> Money {
        self.free_blocked(tier)
            .saturating_plus(self.debts.owed_by(tier))
    }

    fn total_supply(&self) -> Money {
        self.accounts.iter().map(TierAccount::total).sum()
    }

    fn block(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        let available = self.buying_power(tier);
        if amount > available {
            return Err(insufficient(amount, available));
        }

        let mut remaining = amount;
        for candidate in tier.up_to_and_including() {
            if remaining.is_zero() {
                break;
            }
            let cash = self.account(candidate).cash();
            if cash.is_zero() {
                continue;
            }
            // Whole remainder when the candidate covers it, else all its cash.
            let portion = remaining.min(cash);
            self.account_mut(candidate).block(portion)?;
            if candidate != tier {
                self.debts.increase(candidate, tier, portion)?;
                tracing::trace!(lender = %candidate, borrower = %tier, %portion, "borrowed for block");
            }
            remaining = remaining.minus(portion)?;
        }
        Ok(())
    }

    fn settle_incoming(&mut self, amount: Money, borrower: SettlementDelay) -> Result<()> {
        let mut remaining = amount;
        for &lender in borrower.faster() {
            if remaining.is_zero() {
                break;
            }
            let debt = self.debts.get(lender, borrower);
            if debt.is_zero() {
                continue;
            }
            if debt >= remaining {
                self.debts.decrease(lender, borrower, remaining)?;
                self.account_mut(lender).deposit(remaining)?;
                tracing::trace!(%lender, %borrower, repaid = %remaining, "debt partially repaid");
                remaining = Money::ZERO;
            } else {
                self.debts.clear(lender, borrower);
                tracing::trace!(%lender, %borrower, repaid = %debt, "debt cleared");
                self.settle_incoming(debt, lender)?;
                remaining = remaining.minus(debt)?;
            }
        }
        self.account_mut(borrower).deposit(remaining)
    }

    fn spend(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        let capacity = self.spendable(tier);
        if amount > capacity {
            return Err(insufficient(amount, capacity));
        }

        let own = amount.min(self.free_blocked(tier));
        self.account_mut(tier).spend(own)?;
        let mut remaining = amount.minus(own)?;

        for lender in tier.faster_descending() {
            if remaining.is_zero() {
                break;
            }
            let debt = self.debts.get(lender, tier);
            if debt.is_zero() {
                continue;
            }
            if debt > remaining {
                self.debts.decrease(lender, tier, remaining)?;
                self.account_mut(lender).spend(remaining)?;
                remaining = Money::ZERO;
            } else {
                self.debts.clear(lender, tier);
                self.account_mut(lender).spend(debt)?;
                remaining = remaining.minus(debt)?;
            }
        }
        self.supply.record_spend(amount)
    }

    fn unblock(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        let capacity = self.spendable(tier);
        if amount > capacity {
            return Err(insufficient(amount, capacity));
        }
        self.release(amount, tier)
    }

    fn release(&mut self, amount: Money, borrower: SettlementDelay) -> Result<()> {
        let mut remaining = amount;
        for &lender in borrower.faster() {
            if remaining.is_zero() {
                break;
            }
            let debt = self.debts.get(lender, borrower);
            if debt.is_zero() {
                continue;
            }
            if debt > remaining {
                self.account_mut(lender).unblock(remaining)?;
                self.debts.decrease(lender, borrower, remaining)?;
                remaining = Money::ZERO;
            } else {
                // The lender's reservation becomes its own; release as much
                // of the lender's commitment instead.
                self.debts.clear(lender, borrower);
                self.release(debt, lender)?;
                remaining = remaining.minus(debt)?;
            }
        }
        if remaining.is_not_zero() {
            self.account_mut(borrower).unblock(remaining)?;
        }
        Ok(())
    }

    fn check_invariants(&self) -> Result<()> {
        // Non-negativity is enforced by `Money` being unsigned.
        self.supply.verify(self.total_supply())?;
        for tier in SettlementDelay::ALL {
            let lent = self.debts.lent_by(tier);
            let blocked = self.account(tier).blocked();
            if lent > blocked {
                return Err(WalletError::InvariantViolation {
                    reason: format!("tier {tier} lent {lent} but only {blocked} is blocked"),
                });
            }
        }
        Ok(())
    }
}

/// A single account's multi-tier settlement ledger.
///
/// Not safe for unsynchronized concurrent use; callers serialize all
/// operations against one wallet (e.g. behind a `Mutex` or an actor).
#[derive(Debug, Clone)]
pub struct SettlementWallet {
    id: AccountId,
    config: WalletConfig,
    books: Books,
}

impl SettlementWallet {
    /// Create an empty wallet for a fresh account with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AccountId::new(), WalletConfig::default())
    }

    #[must_use]
    pub fn with_config(id: AccountId, config: WalletConfig) -> Self {
        Self {
            id,
            config,
            books: Books::default(),
        }
    }

    /// Run `op` against a draft of the books and commit it only on success.
    fn commit<F>(
        &mut self,
        operation: &'static str,
        tier: SettlementDelay,
        amount: Money,
        op: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Books) -> Result<()>,
    {
        let mut draft = self.books.clone();
        if let Err(err) = op(&mut draft) {
            tracing::debug!(account = %self.id, %tier, %amount, error = %err, "{operation} rejected");
            return Err(err);
        }
        if self.config.check_invariants {
            if let Err(err) = draft.check_invariants() {
                tracing::error!(account = %self.id, %tier, %amount, error = %err, "{operation} broke a ledger invariant");
                return Err(err);
            }
        }
        self.books = draft;
        tracing::debug!(account = %self.id, %tier, %amount, "{operation}");
        Ok(())
    }

    /// Already-settled cash inflow. Always lands on T0.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the wallet's total inflow would exceed
    /// `u64::MAX`.
    pub fn charge(&mut self, amount: Money) -> Result<()> {
        self.commit("charge", SettlementDelay::T0, amount, |books| {
            books.supply.record_charge(amount)?;
            books.account_mut(SettlementDelay::T0).deposit(amount)
        })
    }

    /// Reserve `amount` against a commitment settling at `tier`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `amount > buying_power(tier)`.
    pub fn block(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        self.commit("block", tier, amount, |books| books.block(amount, tier))
    }

    /// New funds settling at `tier`. Outstanding debts of `tier` are repaid
    /// first, fastest lender first; the surplus becomes `tier`'s cash.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the wallet's total inflow would exceed
    /// `u64::MAX`.
    pub fn deposit(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        self.commit("deposit", tier, amount, |books| {
            books.supply.record_deposit(amount)?;
            books.settle_incoming(amount, tier)
        })
    }

    /// Consume `amount` of the commitment at `tier`. The money leaves the wallet.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `amount > spendable(tier)`.
    pub fn spend(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        self.commit("spend", tier, amount, |books| books.spend(amount, tier))
    }

    /// Release `amount` of the commitment at `tier` back to cash.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `amount > spendable(tier)`.
    pub fn unblock(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        self.commit("unblock", tier, amount, |books| books.unblock(amount, tier))
    }

    /// Declared for callers but has no defined behavior yet. Never touches
    /// the wallet.
    ///
    /// # Errors
    /// Always returns `Unsupported`.
    pub fn withdraw(&mut self, amount: Money, tier: SettlementDelay) -> Result<()> {
        tracing::debug!(account = %self.id, %tier, %amount, "withdraw is not supported");
        Err(WalletError::Unsupported {
            operation: "withdraw",
        })
    }

    /// Cash across `tier` and every faster tier.
    #[must_use]
    pub fn buying_power(&self, tier: SettlementDelay) -> Money {
        self.books.buying_power(tier)
    }

    /// Outstanding commitment at `tier`: its free blocked funds plus what
    /// it borrowed from faster tiers.
    #[must_use]
    pub fn spendable(&self, tier: SettlementDelay) -> Money {
        self.books.spendable(tier)
    }

    /// Blocked funds at `tier` that are not lent to a slower tier.
    #[must_use]
    pub fn free_blocked(&self, tier: SettlementDelay) -> Money {
        self.books.free_blocked(tier)
    }

    #[must_use]
    pub fn account(&self, tier: SettlementDelay) -> &TierAccount {
        self.books.account(tier)
    }

    #[must_use]
    pub fn cash(&self, tier: SettlementDelay) -> Money {
        self.books.account(tier).cash()
    }

    #[must_use]
    pub fn blocked(&self, tier: SettlementDelay) -> Money {
        self.books.account(tier).blocked()
    }

    #[must_use]
    pub fn debts(&self) -> &DebtLedger {
        &self.books.debts
    }

    #[must_use]
    pub fn debt(&self, lender: SettlementDelay, borrower: SettlementDelay) -> Money {
        self.books.debts.get(lender, borrower)
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.books.supply
    }

    /// Σ cash + blocked over all tiers.
    #[must_use]
    pub fn total_supply(&self) -> Money {
        self.books.total_supply()
    }

    pub fn verify_supply(&self) -> Result<()> {
        self.books.supply.verify(self.books.total_supply())
    }

    /// Verify conservation and lender coverage on demand, regardless of
    /// [`WalletConfig::check_invariants`].
    pub fn check_invariants(&self) -> Result<()> {
        self.books.check_invariants()
    }

    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Point-in-time copy of the wallet state.
    #[must_use]
    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            account: self.id,
            taken_at: chrono::Utc::now(),
            tiers: SettlementDelay::ALL
                .into_iter()
                .map(|tier| TierSnapshot {
                    tier,
                    cash: self.cash(tier),
                    blocked: self.blocked(tier),
                })
                .collect(),
            debts: self.books.debts.entries(),
            supply: self.books.supply,
        }
    }
}

impl Default for SettlementWallet {
    fn default() -> Self {
        Self::new()
    }
}
