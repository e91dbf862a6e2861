//! Order Tracking Value Objects

mod order_status;
mod stage_status;

pub use order_status::{EffectiveStatus, OrderStatus};
pub use stage_status::StageStatus;
