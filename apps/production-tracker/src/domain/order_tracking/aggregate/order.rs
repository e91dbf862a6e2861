//! Order Aggregate Root
//!
//! An order for one customer. Its status is derived from its stages unless
//! someone has set an override by hand; both values are kept so clearing
//! the override falls back to the derived status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::events::{
    InvoiceLinkChanged, OrderPlaced, StatusChanged, TrackingEvent,
};
use crate::domain::order_tracking::value_objects::{EffectiveStatus, OrderStatus};
use crate::domain::shared::{
    Conflict, CustomerId, DomainError, InvoiceId, MeasurementId, Money, OrderId, Timestamp,
    bounded_text,
};

const SPECIFICATIONS_MAX_CHARS: usize = 5000;

/// Editable order fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    /// Customer the order is for.
    pub customer_id: CustomerId,
    /// Day the order was placed.
    pub placed_on: NaiveDate,
    /// Promised or actual completion day.
    pub completion_date: Option<NaiveDate>,
    /// Free-form garment specifications.
    pub specifications: String,
    /// Order amount.
    pub amount: Money,
    /// Measurement set the garment is cut to.
    pub measurement_id: Option<MeasurementId>,
}

impl OrderDetails {
    /// Validate the details.
    ///
    /// # Errors
    ///
    /// Returns error if the completion date precedes the placed-on date or
    /// the specifications are too long.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(done) = self.completion_date
            && done < self.placed_on
        {
            return Err(DomainError::invalid(
                "completion_date",
                "Completion date cannot be before the order date.",
            ));
        }
        bounded_text("specifications", &self.specifications, SPECIFICATIONS_MAX_CHARS)?;
        Ok(())
    }
}

/// Order Aggregate Root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    placed_on: NaiveDate,
    completion_date: Option<NaiveDate>,
    specifications: String,
    amount: Money,
    measurement_id: Option<MeasurementId>,
    invoice_id: Option<InvoiceId>,
    derived_status: OrderStatus,
    status_override: Option<OrderStatus>,
    #[serde(skip)]
    events: Vec<TrackingEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Place a new order.
    ///
    /// Generates an `OrderPlaced` event. The order starts `New`.
    ///
    /// # Errors
    ///
    /// Returns error if the details are invalid.
    pub fn place(id: OrderId, details: OrderDetails, at: Timestamp) -> Result<Self, DomainError> {
        details.validate()?;

        let mut order = Self {
            id,
            customer_id: details.customer_id,
            placed_on: details.placed_on,
            completion_date: details.completion_date,
            specifications: details.specifications.trim().to_string(),
            amount: details.amount,
            measurement_id: details.measurement_id,
            invoice_id: None,
            derived_status: OrderStatus::New,
            status_override: None,
            events: Vec::new(),
            created_at: at,
            updated_at: at,
        };

        order.events.push(TrackingEvent::OrderPlaced(OrderPlaced {
            order_id: id,
            customer_id: order.customer_id,
            amount: order.amount,
            occurred_at: at,
        }));

        Ok(order)
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Get the customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Get the placed-on day.
    #[must_use]
    pub const fn placed_on(&self) -> NaiveDate {
        self.placed_on
    }

    /// Get the completion day.
    #[must_use]
    pub const fn completion_date(&self) -> Option<NaiveDate> {
        self.completion_date
    }

    /// Get the specifications.
    #[must_use]
    pub fn specifications(&self) -> &str {
        &self.specifications
    }

    /// Get the amount.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Get the bound measurement set.
    #[must_use]
    pub const fn measurement_id(&self) -> Option<MeasurementId> {
        self.measurement_id
    }

    /// Get the invoice this order belongs to.
    #[must_use]
    pub const fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id
    }

    /// The editable fields as they stand.
    #[must_use]
    pub fn details(&self) -> OrderDetails {
        OrderDetails {
            customer_id: self.customer_id,
            placed_on: self.placed_on,
            completion_date: self.completion_date,
            specifications: self.specifications.clone(),
            amount: self.amount,
            measurement_id: self.measurement_id,
        }
    }

    /// Get the status derived from the stages.
    #[must_use]
    pub const fn derived_status(&self) -> OrderStatus {
        self.derived_status
    }

    /// Get the manual override, if any.
    #[must_use]
    pub const fn status_override(&self) -> Option<OrderStatus> {
        self.status_override
    }

    /// Get the status the order reports.
    #[must_use]
    pub const fn status(&self) -> EffectiveStatus {
        match self.status_override {
            Some(status) => EffectiveStatus::Manual(status),
            None => EffectiveStatus::Derived(self.derived_status),
        }
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the editable fields.
    ///
    /// The invoice link and status are untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the details are invalid.
    pub fn revise(&mut self, details: OrderDetails, at: Timestamp) -> Result<(), DomainError> {
        details.validate()?;
        self.customer_id = details.customer_id;
        self.placed_on = details.placed_on;
        self.completion_date = details.completion_date;
        self.specifications = details.specifications.trim().to_string();
        self.amount = details.amount;
        self.measurement_id = details.measurement_id;
        self.updated_at = at;
        Ok(())
    }

    /// Record a freshly computed derived status.
    ///
    /// Generates `StatusChanged` when the effective status moves.
    pub fn apply_derived_status(&mut self, derived: OrderStatus, at: Timestamp) {
        self.change_status(at, |order| order.derived_status = derived);
    }

    /// Set a manual status override.
    ///
    /// Generates `StatusChanged` when the effective status moves.
    pub fn override_status(&mut self, status: OrderStatus, at: Timestamp) {
        self.change_status(at, |order| order.status_override = Some(status));
    }

    /// Drop the manual override and report the derived status again.
    ///
    /// Generates `StatusChanged` when the effective status moves.
    pub fn clear_override(&mut self, at: Timestamp) {
        self.change_status(at, |order| order.status_override = None);
    }

    /// Attach the order to an invoice.
    ///
    /// Generates an `OrderInvoiced` event.
    ///
    /// # Errors
    ///
    /// Returns `Conflict::OrderAlreadyInvoiced` if the order is already on an
    /// invoice, including the same one.
    pub fn link_invoice(&mut self, invoice_id: InvoiceId, at: Timestamp) -> Result<(), DomainError> {
        if let Some(existing) = self.invoice_id {
            return Err(Conflict::OrderAlreadyInvoiced {
                order: self.id.value(),
                invoice: existing.value(),
            }
            .into());
        }
        self.invoice_id = Some(invoice_id);
        self.updated_at = at;
        self.events
            .push(TrackingEvent::OrderInvoiced(InvoiceLinkChanged {
                order_id: self.id,
                invoice_id,
                occurred_at: at,
            }));
        Ok(())
    }

    /// Detach the order from an invoice.
    ///
    /// Generates an `OrderUninvoiced` event.
    ///
    /// # Errors
    ///
    /// Returns error if the order is not on `invoice_id`.
    pub fn unlink_invoice(
        &mut self,
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        if self.invoice_id != Some(invoice_id) {
            return Err(DomainError::BusinessRuleViolation {
                rule: "INVOICE_MEMBERSHIP".to_string(),
                message: format!("Order #{} is not part of invoice #{invoice_id}.", self.id),
            });
        }
        self.invoice_id = None;
        self.updated_at = at;
        self.events
            .push(TrackingEvent::OrderUninvoiced(InvoiceLinkChanged {
                order_id: self.id,
                invoice_id,
                occurred_at: at,
            }));
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<TrackingEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[TrackingEvent] {
        &self.events
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    fn change_status(&mut self, at: Timestamp, apply: impl FnOnce(&mut Self)) {
        let before = self.status();
        apply(self);
        let after = self.status();
        if before != after {
            self.updated_at = at;
            self.events.push(TrackingEvent::StatusChanged(StatusChanged {
                order_id: self.id,
                from: before,
                to: after,
                occurred_at: at,
            }));
        }
    }
}
