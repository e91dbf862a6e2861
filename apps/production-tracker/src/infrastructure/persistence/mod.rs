//! Persistence Adapters
//!
//! In-memory implementations of the repository traits.

mod in_memory;

pub use in_memory::{
    InMemoryCustomerRepository, InMemoryInvoiceRepository, InMemoryMeasurementRepository,
    InMemoryOrderRepository, InMemoryPipelineStageRepository, InMemoryVendorRepository,
    InMemoryVendorRoleRepository,
};
