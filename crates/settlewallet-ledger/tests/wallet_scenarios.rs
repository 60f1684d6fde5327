//! Scenario tests for the settlement wallet.
//!
//! Each test drives a fresh wallet through a realistic sequence of
//! charges, deposits, blocks, spends and unblocks and checks buying power,
//! per-tier balances and the debt ledger afterwards.

use settlewallet_ledger::SettlementWallet;
use settlewallet_types::{Money, SettlementDelay, WalletError};
use tracing_subscriber::EnvFilter;

use SettlementDelay::{T0, T1, T2, T3};

const M1: u64 = 1_000_000;
const M2: u64 = 2_000_000;
const M3: u64 = 3_000_000;
const M4: u64 = 4_000_000;
const M7: u64 = 7_000_000;
const M9: u64 = 9_000_000;
const M10: u64 = 10_000_000;

fn m(units: u64) -> Money {
    Money::from_units(units)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn wallet() -> SettlementWallet {
    init_tracing();
    SettlementWallet::new()
}

/// t0 = 500_000, t1 = 100_000, t2 = 1_000_000, then
/// block(1.6M, T2) -> charge(4M).
fn staggered_wallet() -> SettlementWallet {
    let mut w = wallet();
    w.charge(m(500_000)).unwrap();
    w.deposit(m(100_000), T1).unwrap();
    w.deposit(m(M1), T2).unwrap();
    w.block(m(1_600_000), T2).unwrap();
    w.charge(m(M4)).unwrap();
    w
}

/// `staggered_wallet` followed by block(1M, T1) -> block(1.5M, T2).
fn staggered_then_small_blocks() -> SettlementWallet {
    let mut w = staggered_wallet();
    w.block(m(M1), T1).unwrap();
    w.block(m(1_500_000), T2).unwrap();
    w
}

fn assert_buying_power_everywhere(w: &SettlementWallet, expected: u64) {
    for tier in SettlementDelay::ALL {
        assert_eq!(w.buying_power(tier), m(expected), "buying power at {tier}");
    }
}

fn at_or_slower(tier: SettlementDelay) -> impl Iterator<Item = SettlementDelay> {
    SettlementDelay::ALL.into_iter().filter(move |t| *t >= tier)
}

// =============================================================================
// charge
// =============================================================================

#[test]
fn charge_on_fresh_wallet() {
    let mut w = wallet();
    w.charge(m(M7)).unwrap();
    assert_buying_power_everywhere(&w, M7);
}

#[test]
fn charges_add_up() {
    let mut w = wallet();
    w.charge(m(M7)).unwrap();
    w.charge(m(M2)).unwrap();
    assert_buying_power_everywhere(&w, M9);
}

#[test]
fn charge_past_the_largest_amount_is_rejected() {
    let mut w = wallet();
    w.charge(m(u64::MAX)).unwrap();
    let before = w.snapshot().digest();
    let err = w.charge(m(1)).unwrap_err();
    assert_eq!(
        err,
        WalletError::AmountOverflow {
            augend: m(u64::MAX),
            addend: m(1),
        }
    );
    assert_eq!(w.snapshot().digest(), before);
    assert_buying_power_everywhere(&w, u64::MAX);
}

// =============================================================================
// block
// =============================================================================

#[test]
fn blocking_from_empty_wallet_fails_at_every_tier() {
    for tier in SettlementDelay::ALL {
        let mut w = wallet();
        let err = w.block(m(M3), tier).unwrap_err();
        assert!(
            matches!(err, WalletError::InsufficientFunds { .. }),
            "tier {tier}: {err}"
        );
        assert_eq!(w.total_supply(), Money::ZERO);
    }
}

#[test]
fn block_reduces_buying_power_at_and_above_tier() {
    for tier in SettlementDelay::ALL {
        let mut w = wallet();
        w.charge(m(M7)).unwrap();
        w.block(m(M3), tier).unwrap();
        for t in at_or_slower(tier) {
            assert_eq!(w.buying_power(t), m(M4), "block at {tier}, read at {t}");
        }
    }
}

#[test]
fn block_then_unblock_restores_buying_power() {
    for tier in SettlementDelay::ALL {
        let mut w = wallet();
        w.charge(m(M7)).unwrap();
        w.block(m(M3), tier).unwrap();
        w.unblock(m(M3), tier).unwrap();
        assert_buying_power_everywhere(&w, M7);
        assert!(w.debts().is_empty());
    }
}

// =============================================================================
// spend
// =============================================================================

#[test]
fn spent_commitment_cannot_be_unblocked() {
    for tier in [T1, T2, T3] {
        let mut w = wallet();
        w.charge(m(M7)).unwrap();
        w.block(m(M3), tier).unwrap();
        w.spend(m(M3), tier).unwrap();

        let err = w.unblock(m(M3), tier).unwrap_err();
        assert!(matches!(err, WalletError::InsufficientFunds { .. }));
        assert_buying_power_everywhere(&w, M4);
    }
}

#[test]
fn spend_at_t2_settles_own_then_closest_lender() {
    let mut w = staggered_then_small_blocks();
    w.spend(m(1_600_000), T2).unwrap();

    assert_eq!(w.blocked(T0), m(2_500_000));
    assert_eq!(w.blocked(T1), Money::ZERO);
    assert_eq!(w.blocked(T2), Money::ZERO);
    assert_eq!(w.debt(T1, T2), Money::ZERO);
    assert_eq!(w.debt(T0, T2), m(1_500_000));
    w.check_invariants().unwrap();
}

#[test]
fn spend_beyond_t1_commitment_fails() {
    let mut w = staggered_then_small_blocks();
    let before = w.snapshot().digest();
    let err = w.spend(m(1_600_000), T1).unwrap_err();
    assert_eq!(
        err,
        WalletError::InsufficientFunds {
            needed: m(1_600_000),
            available: m(M1),
        }
    );
    assert_eq!(w.snapshot().digest(), before);
}

#[test]
fn spend_at_t1_leaves_reservation_lent_to_t2() {
    let mut w = staggered_then_small_blocks();
    w.spend(m(M1), T1).unwrap();

    // T1's own blocked 100_000 backs T2, so the whole T1 commitment is
    // drawn from T0.
    assert_eq!(w.blocked(T0), m(M2));
    assert_eq!(w.blocked(T1), m(100_000));
    assert_eq!(w.blocked(T2), m(M1));
    assert_eq!(w.debt(T0, T1), Money::ZERO);
    assert_eq!(w.debt(T0, T2), m(M2));
    assert_eq!(w.debt(T1, T2), m(100_000));
    assert_eq!(w.spendable(T2), m(3_100_000));
    w.check_invariants().unwrap();
}

// =============================================================================
// deposit
// =============================================================================

#[test]
fn deposit_on_clear_wallet_raises_own_and_slower_buying_power() {
    for tier in SettlementDelay::ALL {
        let mut w = wallet();
        w.deposit(m(M1), tier).unwrap();
        for t in SettlementDelay::ALL {
            let expected = if t >= tier { m(M1) } else { Money::ZERO };
            assert_eq!(w.buying_power(t), expected, "deposit at {tier}, read at {t}");
        }
    }
}

#[test]
fn deposit_repays_t0_when_tier_owes_it() {
    for tier in [T1, T2] {
        let mut w = wallet();
        w.charge(m(M7)).unwrap();
        w.block(m(M3), T1).unwrap();
        w.block(m(M3), T2).unwrap();

        w.deposit(m(M1), tier).unwrap();
        assert_eq!(w.buying_power(T0), m(M2), "deposit at {tier}");
    }
}

#[test]
fn deposit_at_debt_free_tier_does_not_repay() {
    let mut w = wallet();
    w.charge(m(M7)).unwrap();
    w.block(m(M3), T1).unwrap();
    w.block(m(M3), T2).unwrap();

    w.deposit(m(M1), T3).unwrap();
    assert_eq!(w.buying_power(T0), m(M1));
    assert_eq!(w.buying_power(T3), m(M2));
}

#[test]
fn small_deposit_at_t2_partially_repays_t0() {
    let mut w = staggered_wallet();
    w.block(m(M2), T1).unwrap();
    w.block(m(M2), T2).unwrap();

    w.deposit(m(M1), T2).unwrap();
    assert_eq!(w.buying_power(T0), m(M1));
}

#[test]
fn large_deposit_at_t2_clears_every_debt_it_owes() {
    let mut w = staggered_then_small_blocks();
    w.deposit(m(M10), T2).unwrap();

    assert_eq!(w.buying_power(T0), m(3_600_000));
    assert_eq!(w.buying_power(T1), m(3_600_000));
    assert_eq!(w.buying_power(T2), m(11_500_000));
    assert_eq!(w.buying_power(T3), m(11_500_000));

    assert_eq!(w.debt(T0, T2), Money::ZERO);
    assert_eq!(w.debt(T1, T2), Money::ZERO);
    // T1's repayment was passed on to T0.
    assert_eq!(w.debt(T0, T1), m(900_000));

    // Repayment never touches blocked funds: the reservations T0 and T1
    // held for T2 are now their own.
    assert_eq!(w.blocked(T0), m(M3));
    assert_eq!(w.blocked(T1), m(100_000));
    assert_eq!(w.blocked(T2), m(M1));
    assert_eq!(w.spendable(T0), m(2_100_000));
    assert_eq!(w.spendable(T1), m(M1));
    assert_eq!(w.spendable(T2), m(M1));
    w.check_invariants().unwrap();
}

#[test]
fn large_deposit_at_t1_repays_t0_then_credits_t1() {
    let mut w = staggered_then_small_blocks();
    w.deposit(m(M10), T1).unwrap();

    assert_eq!(w.buying_power(T0), m(2_500_000));
    assert_eq!(w.buying_power(T1), m(11_500_000));
    assert_eq!(w.buying_power(T2), m(11_500_000));
    assert_eq!(w.buying_power(T3), m(11_500_000));
}

// =============================================================================
// unblock
// =============================================================================

#[test]
fn unblock_from_single_large_lender() {
    let mut w = staggered_wallet();
    w.block(m(M2), T1).unwrap();
    w.block(m(M2), T2).unwrap();

    w.unblock(m(1_600_000), T2).unwrap();
    assert_buying_power_everywhere(&w, 1_600_000);
}

#[test]
fn unblock_across_lenders_cascades_to_fastest_tier() {
    let mut w = staggered_wallet();
    w.block(m(M2), T1).unwrap();
    w.block(m(M1), T2).unwrap();

    w.unblock(m(1_600_000), T2).unwrap();
    assert_buying_power_everywhere(&w, 2_600_000);
    // T1's commitment is still fully backed.
    assert_eq!(w.spendable(T1), m(M2));
    assert_eq!(w.debt(T1, T2), Money::ZERO);
    w.check_invariants().unwrap();
}

#[test]
fn unblock_after_small_blocks() {
    let mut w = staggered_then_small_blocks();
    w.unblock(m(1_600_000), T2).unwrap();
    assert_buying_power_everywhere(&w, 3_100_000);
}

#[test]
fn unblock_beyond_commitment_is_rejected_unchanged() {
    let mut w = staggered_then_small_blocks();
    let before = w.snapshot().digest();
    let err = w.unblock(m(3_100_001), T2).unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
    assert_eq!(w.snapshot().digest(), before);
}

// =============================================================================
// withdraw
// =============================================================================

#[test]
fn withdraw_has_no_effect() {
    let mut w = staggered_wallet();
    let before = w.snapshot().digest();
    assert!(w.withdraw(m(1), T0).is_err());
    assert_eq!(w.snapshot().digest(), before);
}
