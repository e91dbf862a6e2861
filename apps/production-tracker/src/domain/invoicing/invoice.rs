//! Invoice aggregate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, InvoiceId, Money, Timestamp};

/// Amount fields an invoice edit may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceAmounts {
    /// Invoice total.
    pub total: Money,
    /// Amount received so far.
    pub paid: Money,
    /// Day the payment arrived.
    pub paid_on: Option<NaiveDate>,
}

/// A bill covering one or more orders.
///
/// The total starts as the sum of the order amounts and follows orders as
/// they are added or removed; staff may also edit it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    total: Money,
    paid: Money,
    paid_on: Option<NaiveDate>,
    created_at: Timestamp,
}

impl Invoice {
    /// Open an invoice for a known total.
    #[must_use]
    pub const fn open(id: InvoiceId, total: Money, at: Timestamp) -> Self {
        Self {
            id,
            total,
            paid: Money::ZERO,
            paid_on: None,
            created_at: at,
        }
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Get the total.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Get the paid amount.
    #[must_use]
    pub const fn paid(&self) -> Money {
        self.paid
    }

    /// Get the payment day.
    #[must_use]
    pub const fn paid_on(&self) -> Option<NaiveDate> {
        self.paid_on
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true once the paid amount covers the total.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.paid >= self.total
    }

    /// Amount still owed.
    #[must_use]
    pub const fn balance(&self) -> Money {
        self.total.saturating_sub(self.paid)
    }

    /// Add order amounts to the total.
    ///
    /// # Errors
    ///
    /// Returns error if the total overflows.
    pub fn add_amount(&mut self, amount: Money) -> Result<(), DomainError> {
        self.total = self.total.checked_add(amount)?;
        Ok(())
    }

    /// Take an order amount off the total, flooring at zero.
    pub fn remove_amount(&mut self, amount: Money) {
        self.total = self.total.saturating_sub(amount);
    }

    /// Overwrite the amount fields.
    pub fn revise(&mut self, amounts: InvoiceAmounts) {
        self.total = amounts.total;
        self.paid = amounts.paid;
        self.paid_on = amounts.paid_on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn money(minor: i64) -> Money {
        Money::from_minor(minor).unwrap()
    }

    fn invoice() -> Invoice {
        Invoice::open(InvoiceId::new(1), money(10_000), Timestamp::new(Utc::now()))
    }

    #[test]
    fn open_is_unpaid() {
        let inv = invoice();
        assert_eq!(inv.paid(), Money::ZERO);
        assert!(!inv.is_settled());
        assert_eq!(inv.balance(), money(10_000));
    }

    #[test]
    fn add_and_remove_amounts() {
        let mut inv = invoice();
        inv.add_amount(money(2_500)).unwrap();
        assert_eq!(inv.total(), money(12_500));
        inv.remove_amount(money(20_000));
        assert_eq!(inv.total(), Money::ZERO);
    }

    #[test]
    fn revise_settles() {
        let mut inv = invoice();
        inv.revise(InvoiceAmounts {
            total: money(10_000),
            paid: money(10_000),
            paid_on: NaiveDate::from_ymd_opt(2026, 8, 1),
        });
        assert!(inv.is_settled());
        assert_eq!(inv.balance(), Money::ZERO);
    }
}
