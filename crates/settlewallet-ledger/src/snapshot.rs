//! Point-in-time wallet snapshots.
//!
//! A snapshot is a plain serde value a caller can log, persist, or compare.
//! The [`WalletSnapshot::digest`] hashes the canonical ledger state so two
//! wallets driven through the same operations yield the same digest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use settlewallet_types::{AccountId, Money, Result, SettlementDelay, constants};

use crate::debt_ledger::DebtEntry;
use crate::supply_conservation::SupplyConservation;

/// Balances of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSnapshot {
    pub tier: SettlementDelay,
    pub cash: Money,
    pub blocked: Money,
}

/// Full wallet state at `taken_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub account: AccountId,
    pub taken_at: DateTime<Utc>,
    /// One entry per tier, fastest first.
    pub tiers: Vec<TierSnapshot>,
    /// Non-zero debt entries ordered by (lender, borrower).
    pub debts: Vec<DebtEntry>,
    pub supply: SupplyConservation,
}

impl WalletSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Canonical bytes hashed by [`Self::digest`].
    ///
    /// Format: `domain || account(16) || per tier: ordinal(1) cash(8) blocked(8)
    /// || per debt: lender(1) borrower(1) amount(8) || charged(8) deposited(8) spent(8)`,
    /// integers little-endian. The timestamp is excluded.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(256);
        payload.extend_from_slice(constants::SNAPSHOT_DIGEST_DOMAIN);
        payload.extend_from_slice(self.account.0.as_bytes());
        for t in &self.tiers {
            payload.push(ordinal_byte(t.tier));
            payload.extend_from_slice(&t.cash.units().to_le_bytes());
            payload.extend_from_slice(&t.blocked.units().to_le_bytes());
        }
        for d in &self.debts {
            payload.push(ordinal_byte(d.lender));
            payload.push(ordinal_byte(d.borrower));
            payload.extend_from_slice(&d.amount.units().to_le_bytes());
        }
        payload.extend_from_slice(&self.supply.total_charged().units().to_le_bytes());
        payload.extend_from_slice(&self.supply.total_deposited().units().to_le_bytes());
        payload.extend_from_slice(&self.supply.total_spent().units().to_le_bytes());
        payload
    }

    /// SHA-256 over [`Self::canonical_bytes`], hex encoded.
    #[must_use]
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.canonical_bytes()))
    }
}

fn ordinal_byte(tier: SettlementDelay) -> u8 {
    // Four tiers always fit.
    u8::try_from(tier.ordinal()).unwrap_or(u8::MAX)
}
