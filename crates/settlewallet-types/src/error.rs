//! Error types for the SettleWallet ledger.
//!
//! All errors use the `SW_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Amount errors
//! - 2xx: Balance errors
//! - 3xx: Debt ledger errors
//! - 8xx: Invariant / safety errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Money, SettlementDelay};

/// Central error enum for all SettleWallet operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    // =================================================================
    // Amount Errors (1xx)
    // =================================================================
    /// Attempted to construct a negative monetary amount.
    #[error("SW_ERR_100: Invalid amount: {value} is negative")]
    InvalidAmount { value: i64 },

    /// A checked subtraction would go below zero.
    #[error("SW_ERR_101: Amount underflow: {minuend} - {subtrahend}")]
    AmountUnderflow { minuend: Money, subtrahend: Money },

    /// A checked addition would exceed the largest representable amount.
    #[error("SW_ERR_102: Amount overflow: {augend} + {addend}")]
    AmountOverflow { augend: Money, addend: Money },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough cash, blocked funds, or aggregate capacity.
    #[error("SW_ERR_200: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },

    // =================================================================
    // Debt Ledger Errors (3xx)
    // =================================================================
    /// Tried to decrease a debt entry by more than is owed.
    #[error(
        "SW_ERR_300: Debt underflow: {borrower} owes {lender} {owed}, cannot decrease by {requested}"
    )]
    DebtUnderflow {
        lender: SettlementDelay,
        borrower: SettlementDelay,
        owed: Money,
        requested: Money,
    },

    /// Debts only run from a faster lender to a slower borrower.
    #[error("SW_ERR_301: Invalid debt pair: lender {lender} is not faster than borrower {borrower}")]
    InvalidDebtPair {
        lender: SettlementDelay,
        borrower: SettlementDelay,
    },

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// A ledger invariant broke. Critical safety alert.
    #[error("SW_ERR_800: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// The operation is declared but has no defined behavior.
    #[error("SW_ERR_900: Unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    /// Serialization / deserialization error.
    #[error("SW_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (malformed config, bad values).
    #[error("SW_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, WalletError>;

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
