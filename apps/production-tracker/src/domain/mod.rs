//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Records of state transitions
//! - **Domain Services**: Stateless business logic
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`customer_registry`]: Customers and their measurements
//! - [`production_catalog`]: Vendor roles, pipeline stages, vendors
//! - [`order_tracking`]: Orders, stages, sequencing and status derivation
//! - [`invoicing`]: Invoices over orders

pub mod customer_registry;
pub mod invoicing;
pub mod order_tracking;
pub mod production_catalog;
pub mod shared;
