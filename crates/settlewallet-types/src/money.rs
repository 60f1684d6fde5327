//! Monetary amounts.
//!
//! All money values are integers in the smallest currency unit. [`Money`]
//! is an immutable, never-negative value; [`Balance`] is the mutable slot
//! a tier account keeps its cash or blocked funds in.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use crate::{Result, WalletError};

/// A non-negative amount of money in the smallest currency unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// The additive identity.
    pub const ZERO: Self = Self(0);

    /// Construct from a signed value.
    ///
    /// # Errors
    /// Returns `InvalidAmount` if `value` is negative.
    pub fn new(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| WalletError::InvalidAmount { value })
    }

    /// Construct from a value that is non-negative by type.
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// The raw amount in smallest units.
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_not_zero(self) -> bool {
        self.0 != 0
    }

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the sum does not fit in a `u64`.
    pub fn plus(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(WalletError::AmountOverflow {
                augend: self,
                addend: other,
            })
    }

    /// Addition clamped at `u64::MAX`.
    #[must_use]
    pub const fn saturating_plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `AmountUnderflow` if `other > self`.
    pub fn minus(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(WalletError::AmountUnderflow {
                minuend: self,
                subtrahend: other,
            })
    }

    /// Subtraction clamped at zero.
    #[must_use]
    pub const fn saturating_minus(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl TryFrom<i64> for Money {
    type Error = WalletError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<u64> for Money {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

/// Saturating. Every inflow into a wallet goes through [`Money::plus`], so
/// sums over its balances stay below `u64::MAX`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_plus)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutable, never-negative quantity owned by one tier account field.
///
/// Every mutation that would drive the balance negative fails with
/// `InsufficientFunds` and leaves the balance unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(Money);

impl Balance {
    pub const ZERO: Self = Self(Money::ZERO);

    #[must_use]
    pub const fn new(value: Money) -> Self {
        Self(value)
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> Money {
        self.0
    }

    /// # Errors
    /// Returns `AmountOverflow` if the new value does not fit; the balance is
    /// left unchanged.
    pub fn increase(&mut self, amount: Money) -> Result<()> {
        self.0 = self.0.plus(amount)?;
        Ok(())
    }

    /// # Errors
    /// Returns `InsufficientFunds` if `amount` exceeds the current value.
    pub fn decrease(&mut self, amount: Money) -> Result<()> {
        if amount > self.0 {
            return Err(WalletError::InsufficientFunds {
                needed: amount,
                available: self.0,
            });
        }
        self.0 = self.0.saturating_minus(amount);
        Ok(())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
