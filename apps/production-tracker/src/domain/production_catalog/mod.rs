//! Production Catalog Bounded Context
//!
//! The shop's reference data: which trades exist, which stages an order
//! passes through and in what order, and who can work each stage.

pub mod pipeline_stage;
pub mod repository;
pub mod vendor;

pub use pipeline_stage::{Ordinal, PipelineStage, PipelineStageSpec};
pub use repository::{PipelineStageRepository, VendorRepository, VendorRoleRepository};
pub use vendor::{Vendor, VendorForm, VendorProfile, VendorRole};
