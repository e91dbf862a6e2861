//! Order DTOs
//!
//! Amounts cross this boundary in major units.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::{
    EffectiveStatus, Order, OrderFilter, OrderStage, OrderStatus, StageStatus,
};
use crate::domain::shared::{
    CustomerId, InvoiceId, MeasurementId, OrderId, OrderStageId, PipelineStageId, Timestamp,
    VendorId,
};

/// DTO for placing or updating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInputDto {
    /// Customer; required.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Day the order was placed.
    pub placed_on: NaiveDate,
    /// Promised completion day.
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    /// Garment specifications.
    #[serde(default)]
    pub specifications: String,
    /// Amount in major units.
    pub amount: Decimal,
    /// Measurement set to cut to.
    #[serde(default)]
    pub measurement_id: Option<MeasurementId>,
}

/// Query parameters for listing orders.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrderQueryDto {
    /// Effective status to match; absent means every status.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Earliest placed-on day.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Latest placed-on day.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Customer to match.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

impl From<OrderQueryDto> for OrderFilter {
    fn from(query: OrderQueryDto) -> Self {
        Self {
            status: query.status,
            placed_from: query.from,
            placed_to: query.to,
            customer_id: query.customer_id,
        }
    }
}

/// DTO for setting or clearing a manual status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusOverrideDto {
    /// Status to force; `null` returns the order to its derived status.
    pub status: Option<OrderStatus>,
}

/// DTO for attaching a pipeline stage to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStageDto {
    /// Pipeline stage to attach.
    pub stage_id: PipelineStageId,
    /// Vendor doing the work.
    #[serde(default)]
    pub assigned_vendor: Option<VendorId>,
    /// Planned start day; required.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// End day, if already known.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// DTO for updating one order stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStageDto {
    /// New status.
    pub status: StageStatus,
    /// Vendor doing the work.
    #[serde(default)]
    pub assigned_vendor: Option<VendorId>,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// DTO representing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDto {
    /// Order ID.
    pub id: OrderId,
    /// Customer.
    pub customer_id: CustomerId,
    /// Customer name, when known.
    pub customer_name: Option<String>,
    /// Day the order was placed.
    pub placed_on: NaiveDate,
    /// Completion day.
    pub completion_date: Option<NaiveDate>,
    /// Specifications.
    pub specifications: String,
    /// Amount in major units.
    pub amount: Decimal,
    /// Bound measurement set.
    pub measurement_id: Option<MeasurementId>,
    /// Invoice the order belongs to.
    pub invoice_id: Option<InvoiceId>,
    /// Effective status and its source.
    pub status: EffectiveStatus,
    /// Status derived from the stages.
    pub derived_status: OrderStatus,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
}

impl OrderDto {
    /// Create from a domain order.
    #[must_use]
    pub fn from_order(order: &Order, customer_name: Option<&str>) -> Self {
        Self {
            id: order.id(),
            customer_id: order.customer_id(),
            customer_name: customer_name.map(str::to_string),
            placed_on: order.placed_on(),
            completion_date: order.completion_date(),
            specifications: order.specifications().to_string(),
            amount: order.amount().to_major(),
            measurement_id: order.measurement_id(),
            invoice_id: order.invoice_id(),
            status: order.status(),
            derived_status: order.derived_status(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }
}

/// DTO representing one stage of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStageDto {
    /// Stage row ID.
    pub id: OrderStageId,
    /// Order.
    pub order_id: OrderId,
    /// Pipeline stage.
    pub stage_id: PipelineStageId,
    /// Pipeline stage name, when known.
    pub stage_name: Option<String>,
    /// Pipeline ordinal, when known.
    pub ordinal: Option<u32>,
    /// Assigned vendor.
    pub assigned_vendor: Option<VendorId>,
    /// Start day.
    pub start_date: NaiveDate,
    /// End day.
    pub end_date: Option<NaiveDate>,
    /// Status.
    pub status: StageStatus,
    /// Note.
    pub note: String,
}

impl OrderStageDto {
    /// Create from a domain stage row and its catalog name and ordinal.
    #[must_use]
    pub fn from_stage(stage: &OrderStage, name: Option<&str>, ordinal: Option<u32>) -> Self {
        Self {
            id: stage.id(),
            order_id: stage.order_id(),
            stage_id: stage.stage_id(),
            stage_name: name.map(str::to_string),
            ordinal,
            assigned_vendor: stage.assigned_vendor(),
            start_date: stage.start_date(),
            end_date: stage.end_date(),
            status: stage.status(),
            note: stage.note().to_string(),
        }
    }
}

/// An order with its stages in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailDto {
    /// The order.
    pub order: OrderDto,
    /// Stages sorted by ordinal.
    pub stages: Vec<OrderStageDto>,
    /// First in-progress stage by ordinal.
    pub current_stage: Option<OrderStageDto>,
}

/// Order search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHitDto {
    /// Order ID.
    pub id: OrderId,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub phone: Option<String>,
    /// Amount in major units.
    pub amount: Decimal,
    /// Effective status.
    pub status: OrderStatus,
}

/// Result of a stage update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUpdateDto {
    /// The updated stage.
    pub stage: OrderStageDto,
    /// Stage the update moved to in-progress, if any.
    pub activated: Option<OrderStageId>,
    /// Order status after the update.
    pub order_status: EffectiveStatus,
}
