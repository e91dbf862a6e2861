//! Order Tracking Bounded Context
//!
//! Orders move through an ordered set of production stages. The order's
//! status follows from its stages.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: customer, amount, measurement binding, invoice link
//!   and the derived/manual status pair
//! - **Order Stage**: one pipeline stage attached to one order
//! - **Stage Sequencer**: activates the next stage by ordinal when one completes
//! - **Status Aggregator**: derives the order status from stage statuses

pub mod aggregate;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{NewOrderStage, Order, OrderDetails, OrderStage, StageUpdate};
pub use events::TrackingEvent;
pub use repository::{OrderFilter, OrderRepository, OrderRevision};
pub use services::{
    OrderStatusAggregator, ProgressTracker, StageOrdinals, StageProgress, StageSequencer,
};
pub use value_objects::{EffectiveStatus, OrderStatus, StageStatus};
