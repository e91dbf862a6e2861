//! Money value object and the amount normalizer.
//!
//! Amounts are stored as an integer count of minor currency units (paise,
//! cents). Humans enter and read them in major units; [`to_minor_units`] and
//! [`to_major_units`] are the only conversions between the two.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::shared::DomainError;

/// Number of minor units in one major unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Convert a decimal amount in major units to minor units.
///
/// Fractions of a minor unit are discarded by truncation toward zero, so
/// `19.999` becomes `1999`, never `2000`.
///
/// # Errors
///
/// Returns `InvalidValue` if the amount is negative or does not fit in an
/// `i64` once scaled.
pub fn to_minor_units(value: Decimal) -> Result<i64, DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::invalid("amount", "Amount cannot be negative"));
    }
    value
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .and_then(|scaled| scaled.trunc().to_i64())
        .ok_or_else(|| DomainError::invalid("amount", format!("Amount {value} is too large")))
}

/// Convert an integer count of minor units back to major units.
#[must_use]
pub fn to_major_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// A non-negative monetary amount held in minor units.
///
/// Serializes as a major-unit decimal string (`"1499.99"`), the same form
/// amounts take at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a Money value from minor units.
    ///
    /// # Errors
    ///
    /// Returns error if the count is negative.
    pub fn from_minor(minor: i64) -> Result<Self, DomainError> {
        if minor < 0 {
            return Err(DomainError::invalid("amount", "Amount cannot be negative"));
        }
        Ok(Self(minor))
    }

    /// Create a Money value from a user-entered major-unit amount.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is negative or overflows.
    pub fn from_major(value: Decimal) -> Result<Self, DomainError> {
        to_minor_units(value).map(Self)
    }

    /// Create a Money value from whole major units.
    #[must_use]
    pub const fn whole(units: u32) -> Self {
        Self(units as i64 * MINOR_UNITS_PER_MAJOR)
    }

    /// Get the stored minor-unit count.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Get the amount in major units.
    #[must_use]
    pub fn to_major(self) -> Decimal {
        to_major_units(self.0)
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns error on overflow.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| DomainError::invalid("amount", "Total amount is too large"))
    }

    /// Subtract an amount, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        let diff = self.0.saturating_sub(rhs.0);
        if diff < 0 { Self::ZERO } else { Self(diff) }
    }

    /// Sum a sequence of amounts.
    ///
    /// # Errors
    ///
    /// Returns error on overflow.
    pub fn total<I>(amounts: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::str::serialize(&self.to_major(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_major(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_major())
    }
}
