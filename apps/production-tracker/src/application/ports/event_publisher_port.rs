//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing tracking events to external systems.

use async_trait::async_trait;

use crate::domain::order_tracking::TrackingEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError { message: String },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed { message: String },
}

/// Port for publishing tracking events.
///
/// Publishing happens after the write it describes; a failure is logged by
/// the caller and never undoes the write.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish a batch of events in order.
    async fn publish_events(&self, events: Vec<TrackingEvent>) -> Result<(), EventPublishError>;

    /// Publish a single event.
    async fn publish_event(&self, event: TrackingEvent) -> Result<(), EventPublishError> {
        self.publish_events(vec![event]).await
    }
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_events(&self, _events: Vec<TrackingEvent>) -> Result<(), EventPublishError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_tracking::events::OrderPlaced;
    use crate::domain::shared::{CustomerId, Money, OrderId, Timestamp};
    use chrono::Utc;

    fn placed(id: u64) -> TrackingEvent {
        TrackingEvent::OrderPlaced(OrderPlaced {
            order_id: OrderId::new(id),
            customer_id: CustomerId::new(1),
            amount: Money::ZERO,
            occurred_at: Timestamp::new(Utc::now()),
        })
    }

    #[tokio::test]
    async fn no_op_publisher_succeeds() {
        let publisher = NoOpEventPublisher;
        assert!(publisher.publish_event(placed(1)).await.is_ok());
    }

    #[tokio::test]
    async fn no_op_publisher_multiple_events() {
        let publisher = NoOpEventPublisher;
        assert!(publisher.publish_events(vec![placed(1), placed(2)]).await.is_ok());
    }
}
