//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod dashboard;
mod manage_catalog;
mod manage_customers;
mod manage_invoices;
mod manage_measurements;
mod manage_orders;
mod track_stages;

pub use dashboard::DashboardUseCase;
pub use manage_catalog::ManageCatalogUseCase;
pub use manage_customers::ManageCustomersUseCase;
pub use manage_invoices::ManageInvoicesUseCase;
pub use manage_measurements::ManageMeasurementsUseCase;
pub use manage_orders::ManageOrdersUseCase;
pub use track_stages::TrackStagesUseCase;

use crate::application::ports::EventPublisherPort;
use crate::application::TrackerError;
use crate::domain::order_tracking::TrackingEvent;
use crate::observability::record_conflict;

/// Convert a store error, counting and logging uniqueness rejections.
pub(crate) fn guarded(err: impl Into<TrackerError>) -> TrackerError {
    let err = err.into();
    if let TrackerError::Conflict(conflict) = &err {
        record_conflict(conflict);
        tracing::warn!(conflict = %conflict, "Write rejected by uniqueness rule");
    }
    err
}

/// Publish events after their write has landed. Failures are logged only.
pub(crate) async fn publish(publisher: &dyn EventPublisherPort, events: Vec<TrackingEvent>) {
    if events.is_empty() {
        return;
    }
    let count = events.len();
    if let Err(e) = publisher.publish_events(events).await {
        tracing::warn!(error = %e, count, "Failed to publish tracking events");
    }
}
