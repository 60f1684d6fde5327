//! Settlement delay tiers.
//!
//! A tier says how many settlement periods must elapse before funds are
//! unconditionally usable. Tiers are totally ordered: `T0 < T1 < T2 < T3`,
//! where a lower tier settles *faster*.
//!
//! Relations are plain arithmetic over the ordinal:
//!
//! ```text
//!   up_to_and_including(T2) = [T2, T1, T0]   (descending)
//!   faster(T2)              = [T0, T1]       (ascending)
//!   faster_descending(T2)   = [T1, T0]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::TIER_COUNT;

// Slices handed out by the relations borrow from here.
static ORDERED: [SettlementDelay; TIER_COUNT] = SettlementDelay::ALL;

/// One of the four settlement delay tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettlementDelay {
    /// Settled immediately (T+0).
    T0,
    /// Settles after one period (T+1).
    T1,
    /// Settles after two periods (T+2).
    T2,
    /// Settles after three periods (T+3).
    T3,
}

impl SettlementDelay {
    /// All tiers, fastest first.
    pub const ALL: [Self; TIER_COUNT] = [Self::T0, Self::T1, Self::T2, Self::T3];

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// `[self, self-1, ..., T0]`.
    pub fn up_to_and_including(self) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        ORDERED[..=self.ordinal()].iter().rev().copied()
    }

    /// Tiers strictly faster than `self`, ascending (`[T0, ..., self-1]`).
    #[must_use]
    pub fn faster(self) -> &'static [Self] {
        &ORDERED[..self.ordinal()]
    }

    /// Tiers strictly faster than `self`, closest first.
    pub fn faster_descending(self) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        self.faster().iter().rev().copied()
    }

    /// Tiers strictly slower than `self`, ascending.
    #[must_use]
    pub fn slower(self) -> &'static [Self] {
        &ORDERED[self.ordinal() + 1..]
    }

    #[must_use]
    pub fn is_faster_than(self, other: Self) -> bool {
        self < other
    }
}

impl fmt::Display for SettlementDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{}", self.ordinal())
    }
}
