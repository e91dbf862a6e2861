//! Prometheus metrics for the production tracker.
//!
//! Counters for the shop's key moments: orders placed, stages completed,
//! writes refused by a uniqueness rule and invoices raised.
//!
//! # Example
//!
//! ```ignore
//! use production_tracker::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_order_placed();
//! ```

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

use crate::domain::shared::Conflict;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub const fn with_addr(addr: SocketAddr) -> Self {
        Self { listen_addr: addr }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Order Metrics
// ============================================================================

/// Record a newly placed order.
pub fn record_order_placed() {
    counter!("orders_placed_total").increment(1);
}

/// Record a stage moving into `Completed`.
///
/// # Arguments
///
/// * `advanced` - Whether the sequencer activated a following stage
pub fn record_stage_completed(advanced: bool) {
    counter!(
        "stage_completions_total",
        "advanced" => advanced.to_string()
    )
    .increment(1);
}

/// Record a manual status override being set or cleared.
pub fn record_status_override(cleared: bool) {
    let action = if cleared { "cleared" } else { "set" };
    counter!("status_overrides_total", "action" => action).increment(1);
}

// ============================================================================
// Guard Metrics
// ============================================================================

/// Record a write refused by a uniqueness rule.
pub fn record_conflict(conflict: &Conflict) {
    counter!(
        "conflict_rejections_total",
        "kind" => conflict_kind(conflict)
    )
    .increment(1);
}

const fn conflict_kind(conflict: &Conflict) -> &'static str {
    match conflict {
        Conflict::DuplicatePhone { .. } => "duplicate_phone",
        Conflict::MeasurementAlreadyBound { .. } => "measurement_already_bound",
        Conflict::DuplicateOrderStage { .. } => "duplicate_order_stage",
        Conflict::OrderAlreadyInvoiced { .. } => "order_already_invoiced",
        Conflict::DuplicateOrdinal { .. } => "duplicate_ordinal",
    }
}

// ============================================================================
// Invoice Metrics
// ============================================================================

/// Record a newly raised invoice.
///
/// # Arguments
///
/// * `orders` - Number of orders on the invoice
pub fn record_invoice_created(orders: usize) {
    counter!("invoices_created_total").increment(1);
    gauge!("last_invoice_order_count").set(orders as f64);
}
