//! Customer Registry Bounded Context
//!
//! Customers and the measurement sets taken for their garments.

pub mod customer;
pub mod measurement;
pub mod repository;

pub use customer::{Customer, CustomerForm, CustomerProfile, Gender};
pub use measurement::{GarmentType, Measurement, MeasurementValues, STANDARD_FIELDS};
pub use repository::{CustomerRepository, MeasurementRepository};
