//! Order Tracking Repository Trait
//!
//! Persistence for orders and their stage rows. Every "at most one" rule
//! on orders is enforced here, by checking and writing under one lock:
//!
//! - a measurement is bound to at most one order
//! - an order has at most one row per pipeline stage
//! - an order belongs to at most one invoice
//!
//! The derived status is recomputed here too, from the stage rows held
//! under the same lock, so a stale read can never write it back.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::aggregate::{Order, OrderStage};
use super::value_objects::{OrderStatus, StageStatus};
use crate::domain::shared::{CustomerId, DomainError, InvoiceId, OrderId, OrderStageId, Timestamp};

/// Criteria for listing orders. Empty criteria match every order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Effective status to match.
    pub status: Option<OrderStatus>,
    /// Earliest placed-on day, inclusive.
    pub placed_from: Option<NaiveDate>,
    /// Latest placed-on day, inclusive.
    pub placed_to: Option<NaiveDate>,
    /// Customer to match.
    pub customer_id: Option<CustomerId>,
}

impl OrderFilter {
    /// Returns true if the order satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.status.is_none_or(|s| order.status().status() == s)
            && self.placed_from.is_none_or(|d| order.placed_on() >= d)
            && self.placed_to.is_none_or(|d| order.placed_on() <= d)
            && self.customer_id.is_none_or(|c| order.customer_id() == c)
    }
}

/// An order as stored just before and just after an update.
#[derive(Debug, Clone)]
pub struct OrderRevision {
    /// Stored order before the write.
    pub before: Order,
    /// Stored order after the write.
    pub after: Order,
}

/// Repository for orders and order stages.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Reserve an id for a new order.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_id(&self) -> Result<OrderId, DomainError>;

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `Conflict::MeasurementAlreadyBound` if another order already
    /// references the order's measurement.
    async fn insert(&self, order: &Order) -> Result<(), DomainError>;

    /// Overwrite an order's editable fields.
    ///
    /// Only [`Order::details`] is taken from `order`. The stored invoice link
    /// and both statuses are kept: the link changes through
    /// [`assign_invoice`](Self::assign_invoice) and the release methods, the
    /// derived status through [`save_progress`](Self::save_progress) and the
    /// override through [`set_override`](Self::set_override).
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Conflict::MeasurementAlreadyBound` if an
    /// order other than this one references the measurement.
    async fn update(&self, order: &Order) -> Result<OrderRevision, DomainError>;

    /// Set or clear the manual status override of the stored order.
    ///
    /// Returns the order with its `StatusChanged` event pending when the
    /// effective status moved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    async fn set_override(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        at: Timestamp,
    ) -> Result<Order, DomainError>;

    /// Find an order by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Orders matching `filter`, newest placed-on day first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError>;

    /// Orders belonging to an invoice, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_by_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Order>, DomainError>;

    /// Delete an order together with its stage rows.
    ///
    /// Returns the removed order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    async fn delete(&self, id: OrderId) -> Result<Order, DomainError>;

    /// Attach every listed order to `invoice_id`, or none of them.
    ///
    /// Returns the updated orders with their `OrderInvoiced` events pending.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if an order is missing, or
    /// `Conflict::OrderAlreadyInvoiced` if any order is already on an
    /// invoice. Nothing is written in either case.
    async fn assign_invoice(
        &self,
        ids: &[OrderId],
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<Vec<Order>, DomainError>;

    /// Detach one order from `invoice_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or a rule violation if the order is not on that
    /// invoice.
    async fn release_invoice(
        &self,
        id: OrderId,
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<Order, DomainError>;

    /// Detach every order from `invoice_id`.
    ///
    /// Returns the ids of the released orders.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn release_all(
        &self,
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<Vec<OrderId>, DomainError>;

    /// Reserve an id for a new stage row.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_stage_id(&self) -> Result<OrderStageId, DomainError>;

    /// Insert a stage row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist, or
    /// `Conflict::DuplicateOrderStage` if the order already has a row for
    /// the pipeline stage. An existing row is never modified.
    async fn insert_stage(&self, stage: &OrderStage) -> Result<(), DomainError>;

    /// Every stage row of an order, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn stages_for(&self, order_id: OrderId) -> Result<Vec<OrderStage>, DomainError>;

    /// Write a set of an order's stage rows and re-derive the order status
    /// from every stored row, in one step.
    ///
    /// Returns the order with its `StatusChanged` event pending when the
    /// effective status moved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order or any stage row does not exist.
    async fn save_progress(
        &self,
        order_id: OrderId,
        stages: &[OrderStage],
        at: Timestamp,
    ) -> Result<Order, DomainError>;

    /// Number of stage rows in a given status across all orders.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn count_stages(&self, status: StageStatus) -> Result<usize, DomainError>;
}
