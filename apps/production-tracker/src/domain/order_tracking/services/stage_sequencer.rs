//! Stage Sequencer Service
//!
//! Orders an order's stages by pipeline ordinal and walks forward when a
//! stage completes.

use std::collections::HashMap;

use crate::domain::order_tracking::aggregate::OrderStage;
use crate::domain::production_catalog::{Ordinal, PipelineStage};
use crate::domain::shared::{OrderStageId, PipelineStageId};

/// Lookup from pipeline stage to its ordinal.
#[derive(Debug, Clone, Default)]
pub struct StageOrdinals(HashMap<PipelineStageId, Ordinal>);

impl StageOrdinals {
    /// Build the lookup from catalog stages.
    #[must_use]
    pub fn from_catalog(stages: &[PipelineStage]) -> Self {
        stages.iter().map(|s| (s.id(), s.ordinal())).collect()
    }

    /// Ordinal of a pipeline stage.
    #[must_use]
    pub fn get(&self, stage: PipelineStageId) -> Option<Ordinal> {
        self.0.get(&stage).copied()
    }
}

impl FromIterator<(PipelineStageId, Ordinal)> for StageOrdinals {
    fn from_iter<I: IntoIterator<Item = (PipelineStageId, Ordinal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Stage Sequencer for ordering and advancing order stages.
pub struct StageSequencer;

impl StageSequencer {
    /// Sort stages by ordinal. Stages whose pipeline stage is unknown sort
    /// last, by row id.
    pub fn sort(stages: &mut [OrderStage], ordinals: &StageOrdinals) {
        stages.sort_by_key(|s| sort_key(s, ordinals));
    }

    /// Index of the stage that follows `completed`: the one with the
    /// smallest ordinal strictly greater than the completed stage's.
    #[must_use]
    pub fn next_after(
        stages: &[OrderStage],
        completed: OrderStageId,
        ordinals: &StageOrdinals,
    ) -> Option<usize> {
        let done = stages.iter().find(|s| s.id() == completed)?;
        let current = ordinals.get(done.stage_id())?;
        let order_id = done.order_id();

        stages
            .iter()
            .enumerate()
            .filter(|(_, s)| s.order_id() == order_id)
            .filter_map(|(idx, s)| ordinals.get(s.stage_id()).map(|o| (idx, o)))
            .filter(|(_, ordinal)| *ordinal > current)
            .min_by_key(|(_, ordinal)| *ordinal)
            .map(|(idx, _)| idx)
    }

    /// Move the stage after `completed` to `InProgress`.
    ///
    /// Returns the activated stage, or `None` when `completed` was the last
    /// stage of the order.
    pub fn advance(
        stages: &mut [OrderStage],
        completed: OrderStageId,
        ordinals: &StageOrdinals,
    ) -> Option<OrderStageId> {
        let idx = Self::next_after(stages, completed, ordinals)?;
        let next = &mut stages[idx];
        next.activate();
        Some(next.id())
    }

    /// The first in-progress stage in pipeline order.
    #[must_use]
    pub fn current<'a>(
        stages: &'a [OrderStage],
        ordinals: &StageOrdinals,
    ) -> Option<&'a OrderStage> {
        stages
            .iter()
            .filter(|s| s.status().is_in_progress())
            .min_by_key(|s| sort_key(s, ordinals))
    }
}

fn sort_key(
    stage: &OrderStage,
    ordinals: &StageOrdinals,
) -> (bool, Option<Ordinal>, OrderStageId) {
    let ordinal = ordinals.get(stage.stage_id());
    (ordinal.is_none(), ordinal, stage.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_tracking::aggregate::NewOrderStage;
    use crate::domain::order_tracking::value_objects::StageStatus;
    use crate::domain::shared::OrderId;
    use chrono::NaiveDate;

    fn stage(id: u64, pipeline: u64) -> OrderStage {
        OrderStage::new(
            OrderStageId::new(id),
            NewOrderStage {
                order_id: OrderId::new(1),
                stage_id: PipelineStageId::new(pipeline),
                assigned_vendor: None,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end_date: None,
                note: String::new(),
            },
        )
        .unwrap()
    }

    /// Pipeline stage `n` sits at ordinal `n * 10`.
    fn ordinals(ids: &[u64]) -> StageOrdinals {
        ids.iter()
            .map(|&n| {
                let ordinal = Ordinal::new(u32::try_from(n).unwrap() * 10);
                (PipelineStageId::new(n), ordinal)
            })
            .collect()
    }

    #[test]
    fn next_after_picks_smallest_greater_ordinal() {
        // Rows added out of order: ordinals 30, 10, 20.
        let stages = vec![stage(1, 3), stage(2, 1), stage(3, 2)];
        let ordinals = ordinals(&[1, 2, 3]);

        assert_eq!(
            StageSequencer::next_after(&stages, OrderStageId::new(2), &ordinals),
            Some(2)
        );
        assert_eq!(
            StageSequencer::next_after(&stages, OrderStageId::new(3), &ordinals),
            Some(0)
        );
        assert_eq!(
            StageSequencer::next_after(&stages, OrderStageId::new(1), &ordinals),
            None
        );
    }

    #[test]
    fn next_after_skips_gaps_in_ordinals() {
        let stages = vec![stage(1, 1), stage(2, 4)];
        let ordinals = ordinals(&[1, 4]);
        assert_eq!(
            StageSequencer::next_after(&stages, OrderStageId::new(1), &ordinals),
            Some(1)
        );
    }

    #[test]
    fn advance_activates_only_the_next_stage() {
        let mut stages = vec![stage(1, 1), stage(2, 2), stage(3, 3)];
        let ordinals = ordinals(&[1, 2, 3]);

        let activated = StageSequencer::advance(&mut stages, OrderStageId::new(1), &ordinals);

        assert_eq!(activated, Some(OrderStageId::new(2)));
        assert_eq!(stages[1].status(), StageStatus::InProgress);
        assert_eq!(stages[2].status(), StageStatus::New);
    }

    #[test]
    fn advance_past_last_stage_is_none() {
        let mut stages = vec![stage(1, 1), stage(2, 2)];
        let ordinals = ordinals(&[1, 2]);
        assert_eq!(
            StageSequencer::advance(&mut stages, OrderStageId::new(2), &ordinals),
            None
        );
    }

    #[test]
    fn unknown_pipeline_stage_is_never_next() {
        let stages = vec![stage(1, 1), stage(2, 99)];
        let ordinals = ordinals(&[1]);
        assert_eq!(
            StageSequencer::next_after(&stages, OrderStageId::new(1), &ordinals),
            None
        );
    }

    #[test]
    fn sort_orders_by_ordinal() {
        let mut stages = vec![stage(1, 3), stage(2, 99), stage(3, 1)];
        StageSequencer::sort(&mut stages, &ordinals(&[1, 3]));
        let ids: Vec<u64> = stages.iter().map(|s| s.id().value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn current_is_first_in_progress_by_ordinal() {
        let mut stages = vec![stage(1, 3), stage(2, 2), stage(3, 1)];
        stages[0].activate();
        stages[1].activate();
        let ordinals = ordinals(&[1, 2, 3]);
        let current = StageSequencer::current(&stages, &ordinals).unwrap();
        assert_eq!(current.id(), OrderStageId::new(2));
    }
}
