//! # settlewallet-ledger
//!
//! The settlement ledger engine for a single account's spendable funds.
//!
//! ## Architecture
//!
//! Funds are split over four settlement delay tiers (T+0 .. T+3):
//! 1. **TierAccount**: one tier's `cash` / `blocked` balances
//! 2. **DebtLedger**: what each slower tier owes each faster tier whose cash
//!    funded its commitments
//! 3. **SupplyConservation**: charge/deposit/spend totals backing the
//!    conservation check
//! 4. **SettlementWallet**: owns the four accounts and the ledger, and runs
//!    charge, block, deposit, spend, unblock and buying-power queries
//!
//! ## Flow
//!
//! ```text
//! charge ─▶ T0.cash
//! block(t)   ─▶ t.cash ▶ t-1.cash ▶ .. ▶ T0.cash   (borrowed parts → debt)
//! deposit(t) ─▶ repay debt(T0,t) ▶ .. ▶ debt(t-1,t) ▶ t.cash
//! spend(t)   ─▶ t.free_blocked ▶ debt(t-1,t) ▶ .. ▶ debt(T0,t)
//! unblock(t) ─▶ debt(T0,t) ▶ .. ▶ debt(t-1,t) ▶ t.free_blocked
//! ```
//!
//! Every call is all-or-nothing; a rejected call leaves the wallet unchanged.

pub mod debt_ledger;
pub mod snapshot;
pub mod supply_conservation;
pub mod tier_account;
pub mod wallet;

pub use debt_ledger::{DebtEntry, DebtLedger};
pub use snapshot::{TierSnapshot, WalletSnapshot};
pub use supply_conservation::SupplyConservation;
pub use tier_account::TierAccount;
pub use wallet::SettlementWallet;
