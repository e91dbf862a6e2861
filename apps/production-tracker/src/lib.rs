// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Production Tracker - Rust Core Library
//!
//! Order-stage pipeline tracker for a made-to-order garment shop.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `customer_registry`: Customers and their measurement sets
//!   - `production_catalog`: Vendor roles, pipeline stages, vendors
//!   - `order_tracking`: Order aggregate, stage rows, stage sequencer,
//!     status aggregator
//!   - `invoicing`: Invoices over sets of orders
//!   - `shared`: Identifiers, money and the amount normalizer, conflicts
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for the clock and event publishing
//!   - `use_cases`: Customers, measurements, catalog, orders, stages,
//!     invoices, dashboard
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: In-memory stores guarding the uniqueness rules
//!   - `events`: Tracking event publishers
//!   - `http`: Axum REST API
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Concerns
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// HTTP error mapping.
pub mod error;

/// Metrics and logging.
pub mod observability;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::order_tracking::{
    Order, OrderStage, OrderStatus, OrderStatusAggregator, StageOrdinals, StageSequencer,
    StageStatus, TrackingEvent,
};
pub use domain::shared::{
    Conflict, CustomerId, DomainError, InvoiceId, MeasurementId, Money, OrderId, OrderStageId,
    PipelineStageId, VendorId, VendorRoleId, to_major_units, to_minor_units,
};

// Application re-exports
pub use application::{Actor, BusinessRules, Confirmed, FieldError, TrackerError};

// Infrastructure re-exports
pub use error::{ApiError, ErrorCode};
pub use infrastructure::config::Container;
pub use infrastructure::http::{AppState, create_router};
