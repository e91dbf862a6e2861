//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with external systems
//! - **Use Cases**: Application-specific business rules
//! - **DTOs**: Data transfer objects for API boundaries
//! - **Errors**: The taxonomy every use case reports

mod actor;
pub mod dto;
mod errors;
pub mod ports;
mod rules;
pub mod use_cases;

pub use actor::Actor;
pub use errors::{Confirmed, FieldError, TrackerError};
pub use rules::BusinessRules;
pub use use_cases::*;
