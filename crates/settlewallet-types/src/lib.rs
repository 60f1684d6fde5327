//! # settlewallet-types
//!
//! Shared types, errors, and configuration for the **SettleWallet** ledger.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Amounts**: [`Money`] (non-negative smallest-unit integer) and [`Balance`]
//! - **Tiers**: [`SettlementDelay`] with its ordering relations
//! - **Identifiers**: [`AccountId`]
//! - **Configuration**: [`WalletConfig`]
//! - **Errors**: [`WalletError`] with `SW_ERR_` prefix codes
//! - **Constants**: tier count and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod money;
pub mod tier;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use money::*;
pub use tier::*;

// Constants are accessed via `settlewallet_types::constants::FOO`.
