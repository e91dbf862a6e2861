//! One production stage attached to an order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::value_objects::StageStatus;
use crate::domain::shared::{
    DomainError, OrderId, OrderStageId, PipelineStageId, VendorId, bounded_text,
};

const NOTE_MAX_CHARS: usize = 2000;

/// Fields for attaching a pipeline stage to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderStage {
    /// Order the stage belongs to.
    pub order_id: OrderId,
    /// Pipeline stage being attached.
    pub stage_id: PipelineStageId,
    /// Vendor doing the work.
    pub assigned_vendor: Option<VendorId>,
    /// Day work is planned to start.
    pub start_date: NaiveDate,
    /// Day work ended, if already known.
    pub end_date: Option<NaiveDate>,
    /// Free-form note.
    pub note: String,
}

/// Fields a stage update may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageUpdate {
    /// New status.
    pub status: StageStatus,
    /// New assigned vendor (`None` unassigns).
    pub assigned_vendor: Option<VendorId>,
    /// New note.
    pub note: String,
}

/// An order × pipeline-stage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStage {
    id: OrderStageId,
    order_id: OrderId,
    stage_id: PipelineStageId,
    assigned_vendor: Option<VendorId>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: StageStatus,
    note: String,
}

impl OrderStage {
    /// Create a stage row in status `New`.
    ///
    /// # Errors
    ///
    /// Returns error if the end date precedes the start date or the note is
    /// too long.
    pub fn new(id: OrderStageId, fields: NewOrderStage) -> Result<Self, DomainError> {
        if let Some(end) = fields.end_date
            && end < fields.start_date
        {
            return Err(DomainError::invalid(
                "end_date",
                "End date cannot be before the start date.",
            ));
        }
        Ok(Self {
            id,
            order_id: fields.order_id,
            stage_id: fields.stage_id,
            assigned_vendor: fields.assigned_vendor,
            start_date: fields.start_date,
            end_date: fields.end_date,
            status: StageStatus::New,
            note: bounded_text("note", &fields.note, NOTE_MAX_CHARS)?,
        })
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> OrderStageId {
        self.id
    }

    /// Get the order.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Get the pipeline stage.
    #[must_use]
    pub const fn stage_id(&self) -> PipelineStageId {
        self.stage_id
    }

    /// Get the assigned vendor.
    #[must_use]
    pub const fn assigned_vendor(&self) -> Option<VendorId> {
        self.assigned_vendor
    }

    /// Get the start day.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Get the end day.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Get the status.
    #[must_use]
    pub const fn status(&self) -> StageStatus {
        self.status
    }

    /// Get the note.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Apply an update.
    ///
    /// Returns true if this update moved the stage into `Completed`, in which
    /// case the end date is set to `today`. Re-saving a completed stage
    /// returns false and keeps the original end date.
    ///
    /// # Errors
    ///
    /// Returns error if the note is too long.
    pub fn apply_update(
        &mut self,
        update: StageUpdate,
        today: NaiveDate,
    ) -> Result<bool, DomainError> {
        let note = bounded_text("note", &update.note, NOTE_MAX_CHARS)?;
        let entered_completed =
            update.status.is_completed() && !self.status.is_completed();
        if entered_completed {
            self.end_date = Some(today);
        }
        self.status = update.status;
        self.assigned_vendor = update.assigned_vendor;
        self.note = note;
        Ok(entered_completed)
    }

    /// Move the stage to `InProgress`.
    pub fn activate(&mut self) {
        self.status = StageStatus::InProgress;
    }
}
