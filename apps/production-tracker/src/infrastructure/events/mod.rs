//! Event Publishing Adapters
//!
//! Implementations of [`EventPublisherPort`]: one that writes each event to
//! the log, and one that keeps them in memory for assertions.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::order_tracking::TrackingEvent;

/// Publisher that emits every event as a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventPublisher;

impl LoggingEventPublisher {
    /// Create a new publisher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisherPort for LoggingEventPublisher {
    async fn publish_events(&self, events: Vec<TrackingEvent>) -> Result<(), EventPublishError> {
        for event in events {
            let payload = serde_json::to_string(&event).map_err(|e| {
                EventPublishError::SerializationError {
                    message: e.to_string(),
                }
            })?;
            tracing::info!(
                target: "production_tracker::events",
                event_type = event.event_type(),
                order_id = %event.order_id(),
                payload = %payload,
                "Tracking event"
            );
        }
        Ok(())
    }
}

/// Publisher that records events in memory.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    published: RwLock<Vec<TrackingEvent>>,
}

impl RecordingEventPublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Event type names in publish order.
    pub async fn event_types(&self) -> Vec<&'static str> {
        self.published
            .read()
            .await
            .iter()
            .map(TrackingEvent::event_type)
            .collect()
    }

    /// Remove and return everything published so far.
    pub async fn take_published(&self) -> Vec<TrackingEvent> {
        std::mem::take(&mut *self.published.write().await)
    }
}

#[async_trait]
impl EventPublisherPort for RecordingEventPublisher {
    async fn publish_events(&self, events: Vec<TrackingEvent>) -> Result<(), EventPublishError> {
        self.published.write().await.extend(events);
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
            amount: Money::whole(10),
            occurred_at: Timestamp::new(Utc::now()),
        })
    }

    #[tokio::test]
    async fn logging_publisher_accepts_events() {
        let publisher = LoggingEventPublisher::new();
        assert!(publisher.publish_events(vec![placed(1), placed(2)]).await.is_ok());
    }

    #[tokio::test]
    async fn recording_publisher_keeps_order() {
        let publisher = RecordingEventPublisher::new();
        publisher.publish_event(placed(1)).await.unwrap();
        publisher.publish_event(placed(2)).await.unwrap();

        assert_eq!(publisher.event_types().await, vec!["ORDER_PLACED", "ORDER_PLACED"]);
        let taken = publisher.take_published().await;
        assert_eq!(taken[1].order_id(), OrderId::new(2));
        assert!(publisher.take_published().await.is_empty());
    }
}
