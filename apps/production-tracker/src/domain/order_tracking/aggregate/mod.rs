//! Order Tracking Aggregates

mod order;
mod order_stage;

pub use order::{Order, OrderDetails};
pub use order_stage::{NewOrderStage, OrderStage, StageUpdate};
