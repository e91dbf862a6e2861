//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod contact;
mod identifiers;
mod money;
mod text;
mod timestamp;

pub use contact::{EmailAddress, PhoneNumber};
pub use identifiers::{
    CustomerId, InvoiceId, MeasurementId, OrderId, OrderStageId, PipelineStageId, VendorId,
    VendorRoleId,
};
pub use money::{MINOR_UNITS_PER_MAJOR, Money, to_major_units, to_minor_units};
pub use text::{bounded_text, contains_ignore_case, required_text};
pub use timestamp::Timestamp;
