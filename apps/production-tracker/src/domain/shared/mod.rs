//! Shared Domain Types
//!
//! Value objects and errors shared across bounded contexts.

pub mod errors;
pub mod value_objects;

pub use errors::{Conflict, DomainError};
pub use value_objects::{
    CustomerId, EmailAddress, InvoiceId, MINOR_UNITS_PER_MAJOR, MeasurementId, Money, OrderId,
    OrderStageId, PhoneNumber, PipelineStageId, Timestamp, VendorId, VendorRoleId, bounded_text,
    contains_ignore_case, required_text, to_major_units, to_minor_units,
};
