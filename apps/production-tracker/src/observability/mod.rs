//! Observability module for metrics and logging.
//!
//! Prometheus counters for the shop's key moments and the tracing
//! subscriber setup.

mod logging;
mod metrics;

pub use logging::{TracingError, build_filter, init_tracing};
pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_conflict, record_invoice_created,
    record_order_placed, record_stage_completed, record_status_override,
};
