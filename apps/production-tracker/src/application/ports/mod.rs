//! Application Ports (Driven)
//!
//! Ports define how the application reaches things outside the domain:
//! the clock and the event sink. Storage ports live with their bounded
//! context as repository traits.

mod clock_port;
mod event_publisher_port;

pub use clock_port::{Clock, FixedClock, SystemClock};
pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
