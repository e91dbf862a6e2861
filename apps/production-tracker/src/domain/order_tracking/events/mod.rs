//! Domain events for order tracking.
//!
//! Events record what changed on an order so adapters can log or forward
//! them without re-reading state.

use serde::{Deserialize, Serialize};

use super::value_objects::EffectiveStatus;
use crate::domain::shared::{
    CustomerId, InvoiceId, Money, OrderId, OrderStageId, PipelineStageId, Timestamp,
};

/// All possible order tracking events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingEvent {
    /// A new order was placed.
    OrderPlaced(OrderPlaced),
    /// A pipeline stage was attached to an order.
    StageAdded(StageChanged),
    /// A stage was marked completed.
    StageCompleted(StageChanged),
    /// A stage was moved to in-progress by the sequencer.
    StageActivated(StageChanged),
    /// The order's effective status changed.
    StatusChanged(StatusChanged),
    /// The order was added to an invoice.
    OrderInvoiced(InvoiceLinkChanged),
    /// The order was removed from an invoice.
    OrderUninvoiced(InvoiceLinkChanged),
}

impl TrackingEvent {
    /// Get the order ID for this event.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        match self {
            Self::OrderPlaced(e) => e.order_id,
            Self::StageAdded(e) | Self::StageCompleted(e) | Self::StageActivated(e) => e.order_id,
            Self::StatusChanged(e) => e.order_id,
            Self::OrderInvoiced(e) | Self::OrderUninvoiced(e) => e.order_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::OrderPlaced(e) => e.occurred_at,
            Self::StageAdded(e) | Self::StageCompleted(e) | Self::StageActivated(e) => {
                e.occurred_at
            }
            Self::StatusChanged(e) => e.occurred_at,
            Self::OrderInvoiced(e) | Self::OrderUninvoiced(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::OrderPlaced(_) => "ORDER_PLACED",
            Self::StageAdded(_) => "STAGE_ADDED",
            Self::StageCompleted(_) => "STAGE_COMPLETED",
            Self::StageActivated(_) => "STAGE_ACTIVATED",
            Self::StatusChanged(_) => "STATUS_CHANGED",
            Self::OrderInvoiced(_) => "ORDER_INVOICED",
            Self::OrderUninvoiced(_) => "ORDER_UNINVOICED",
        }
    }
}

/// Event: order placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    /// Order ID.
    pub order_id: OrderId,
    /// Customer the order is for.
    pub customer_id: CustomerId,
    /// Order amount.
    pub amount: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event payload shared by the stage events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChanged {
    /// Order ID.
    pub order_id: OrderId,
    /// Order stage row.
    pub order_stage_id: OrderStageId,
    /// Pipeline stage the row is for.
    pub stage_id: PipelineStageId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: effective status changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    /// Order ID.
    pub order_id: OrderId,
    /// Status before the change.
    pub from: EffectiveStatus,
    /// Status after the change.
    pub to: EffectiveStatus,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event payload for invoice membership changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLinkChanged {
    /// Order ID.
    pub order_id: OrderId,
    /// Invoice gained or lost.
    pub invoice_id: InvoiceId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}
