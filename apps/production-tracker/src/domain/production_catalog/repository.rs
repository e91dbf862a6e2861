//! Production Catalog Repository Traits
//!
//! Persistence abstractions for vendor roles, pipeline stages and vendors.

use async_trait::async_trait;

use super::pipeline_stage::{PipelineStage, PipelineStageSpec};
use super::vendor::{Vendor, VendorRole};
use crate::domain::shared::{DomainError, PipelineStageId, VendorId, VendorRoleId};

/// Repository for vendor roles.
#[async_trait]
pub trait VendorRoleRepository: Send + Sync {
    /// Reserve an id for a new role.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_id(&self) -> Result<VendorRoleId, DomainError>;

    /// Insert a role.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn insert(&self, role: &VendorRole) -> Result<(), DomainError>;

    /// Find a role by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: VendorRoleId) -> Result<Option<VendorRole>, DomainError>;

    /// All roles ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self) -> Result<Vec<VendorRole>, DomainError>;
}

/// Repository for pipeline stages.
///
/// The store owns ordinal uniqueness: `create` resolves a missing ordinal and
/// checks for collisions under the same lock as the write.
#[async_trait]
pub trait PipelineStageRepository: Send + Sync {
    /// Create a stage. When `spec.ordinal` is `None` the stage is placed
    /// after the current last stage.
    ///
    /// # Errors
    ///
    /// Returns `Conflict::DuplicateOrdinal` if the ordinal is taken.
    async fn create(&self, spec: PipelineStageSpec) -> Result<PipelineStage, DomainError>;

    /// Overwrite an existing stage.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the stage does not exist, or
    /// `Conflict::DuplicateOrdinal` if another stage has the ordinal.
    async fn update(&self, stage: &PipelineStage) -> Result<(), DomainError>;

    /// Find a stage by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: PipelineStageId)
    -> Result<Option<PipelineStage>, DomainError>;

    /// All stages in ascending ordinal order.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self) -> Result<Vec<PipelineStage>, DomainError>;
}

/// Repository for vendors.
#[async_trait]
pub trait VendorRepository: Send + Sync {
    /// Reserve an id for a new vendor.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_id(&self) -> Result<VendorId, DomainError>;

    /// Insert or overwrite a vendor.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save(&self, vendor: &Vendor) -> Result<(), DomainError>;

    /// Find a vendor by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: VendorId) -> Result<Option<Vendor>, DomainError>;

    /// All vendors ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self) -> Result<Vec<Vendor>, DomainError>;

    /// Vendors performing one role, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_by_role(&self, role: VendorRoleId) -> Result<Vec<Vendor>, DomainError>;
}
