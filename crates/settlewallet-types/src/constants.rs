//! System-wide constants for the SettleWallet ledger.

/// Number of settlement delay tiers (T+0 through T+3).
pub const TIER_COUNT: usize = 4;

/// Whether wallets re-verify their invariants after every mutation by default.
pub const DEFAULT_CHECK_INVARIANTS: bool = true;

/// Domain tag prepended to the canonical snapshot bytes before hashing.
pub const SNAPSHOT_DIGEST_DOMAIN: &[u8] = b"settlewallet:snapshot:v1:";

