//! Invoice Repository Trait

use async_trait::async_trait;

use super::invoice::{Invoice, InvoiceAmounts};
use crate::domain::shared::{DomainError, InvoiceId, Money};

/// Repository for invoices.
///
/// Order membership lives on the order side; see
/// [`OrderRepository::assign_invoice`](crate::domain::order_tracking::OrderRepository::assign_invoice).
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Reserve an id for a new invoice.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_id(&self) -> Result<InvoiceId, DomainError>;

    /// Insert or overwrite an invoice.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Find an invoice by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError>;

    /// Move the stored total up by `added` and down by `removed`, flooring
    /// at zero, as one write. Returns the invoice as stored.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist, or an error if the
    /// total overflows.
    async fn adjust_total(
        &self,
        id: InvoiceId,
        added: Money,
        removed: Money,
    ) -> Result<Invoice, DomainError>;

    /// Overwrite the stored amount fields. Returns the invoice as stored.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    async fn revise(&self, id: InvoiceId, amounts: InvoiceAmounts) -> Result<Invoice, DomainError>;

    /// All invoices, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self) -> Result<Vec<Invoice>, DomainError>;

    /// Delete an invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    async fn delete(&self, id: InvoiceId) -> Result<(), DomainError>;
}
