//! Invoice DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::invoicing::Invoice;
use crate::domain::shared::{InvoiceId, OrderId, Timestamp};

/// DTO naming the orders to invoice or add to an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceOrdersDto {
    /// Picked orders.
    #[serde(default)]
    pub order_ids: Vec<OrderId>,
}

/// DTO for editing invoice amounts, in major units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceAmountsDto {
    /// Total.
    pub total: Decimal,
    /// Amount paid so far.
    #[serde(default)]
    pub paid: Decimal,
    /// Day of the last payment.
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
}

/// DTO representing an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDto {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Total in major units.
    pub total: Decimal,
    /// Paid in major units.
    pub paid: Decimal,
    /// Outstanding balance in major units.
    pub balance: Decimal,
    /// Day of the last payment.
    pub paid_on: Option<NaiveDate>,
    /// True once the paid amount covers the total.
    pub settled: bool,
    /// Orders on the invoice.
    pub order_ids: Vec<OrderId>,
    /// Created at.
    pub created_at: Timestamp,
}

impl InvoiceDto {
    /// Create from a domain invoice and its order ids.
    #[must_use]
    pub fn from_invoice(invoice: &Invoice, order_ids: Vec<OrderId>) -> Self {
        Self {
            id: invoice.id(),
            total: invoice.total().to_major(),
            paid: invoice.paid().to_major(),
            balance: invoice.balance().to_major(),
            paid_on: invoice.paid_on(),
            settled: invoice.is_settled(),
            order_ids,
            created_at: invoice.created_at(),
        }
    }
}
