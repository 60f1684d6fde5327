//! Wallet configuration.

use serde::{Deserialize, Serialize};

use crate::{Result, WalletError, constants};

/// Per-wallet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalletConfig {
    /// Re-verify conservation, non-negativity and lender coverage after
    /// every successful mutation.
    pub check_invariants: bool,
}

impl WalletConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `Configuration` if the input is malformed.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| WalletError::Configuration(e.to_string()))
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            check_invariants: constants::DEFAULT_CHECK_INVARIANTS,
        }
    }
}
