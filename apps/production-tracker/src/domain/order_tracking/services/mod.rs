//! Order Tracking Domain Services
//!
//! Stateless business logic over an order's stages.

mod progress;
mod stage_sequencer;
mod status_aggregator;

pub use progress::{ProgressTracker, StageProgress};
pub use stage_sequencer::{StageOrdinals, StageSequencer};
pub use status_aggregator::OrderStatusAggregator;
