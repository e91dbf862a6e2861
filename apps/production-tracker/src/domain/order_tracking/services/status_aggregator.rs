//! Order Status Aggregator Service
//!
//! Derives an order's overall status from its stage statuses.

use crate::domain::order_tracking::aggregate::OrderStage;
use crate::domain::order_tracking::value_objects::OrderStatus;

/// Order Status Aggregator.
pub struct OrderStatusAggregator;

impl OrderStatusAggregator {
    /// Derive the order status from all of its stages.
    ///
    /// - any stage in progress: `InProgress`
    /// - at least one stage and all completed: `Completed`
    /// - anything else, including no stages at all: `Pending`
    #[must_use]
    pub fn recompute(stages: &[OrderStage]) -> OrderStatus {
        if stages.iter().any(|s| s.status().is_in_progress()) {
            OrderStatus::InProgress
        } else if !stages.is_empty() && stages.iter().all(|s| s.status().is_completed()) {
            OrderStatus::Completed
        } else {
            OrderStatus::Pending
        }
    }
}
