//! Stage Progress Service
//!
//! Applies one stage update to an order's stages: the update itself and the
//! sequencer advance when the stage completes. The order status is derived
//! afterwards from the stored rows.

use super::{StageOrdinals, StageSequencer};
use crate::domain::order_tracking::aggregate::{OrderStage, StageUpdate};
use crate::domain::order_tracking::events::{StageChanged, TrackingEvent};
use crate::domain::shared::{DomainError, OrderStageId, Timestamp};

/// What a stage update changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    /// Stage rows that must be written back.
    pub touched: Vec<OrderStageId>,
    /// Stage the sequencer moved to in-progress.
    pub activated: Option<OrderStageId>,
    /// Stage events raised by the update.
    pub events: Vec<TrackingEvent>,
}

/// Stage progress tracking.
pub struct ProgressTracker;

impl ProgressTracker {
    /// Apply `update` to the stage `target` within `stages`, which must hold
    /// every stage of the order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `target` is not among `stages`, or a validation
    /// error from the update itself.
    pub fn record_update(
        stages: &mut [OrderStage],
        target: OrderStageId,
        update: StageUpdate,
        ordinals: &StageOrdinals,
        at: Timestamp,
    ) -> Result<StageProgress, DomainError> {
        let stage = stages
            .iter_mut()
            .find(|s| s.id() == target)
            .ok_or_else(|| DomainError::not_found("OrderStage", target))?;

        let completed = stage.apply_update(update, at.date())?;
        let mut touched = vec![target];
        let mut events = Vec::new();
        let mut activated = None;

        if completed {
            events.push(TrackingEvent::StageCompleted(changed(stage, at)));
            activated = StageSequencer::advance(stages, target, ordinals);
            if let Some(next_id) = activated
                && let Some(next) = stages.iter().find(|s| s.id() == next_id)
            {
                touched.push(next_id);
                events.push(TrackingEvent::StageActivated(changed(next, at)));
            }
        }

        Ok(StageProgress {
            touched,
            activated,
            events,
        })
    }
}

fn changed(stage: &OrderStage, at: Timestamp) -> StageChanged {
    StageChanged {
        order_id: stage.order_id(),
        order_stage_id: stage.id(),
        stage_id: stage.stage_id(),
        occurred_at: at,
    }
}
