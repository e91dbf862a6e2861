//! Manage Catalog Use Case
//!
//! Vendor roles, pipeline stages and vendors. Every write here is admin
//! only.

use std::collections::HashMap;
use std::sync::Arc;

use super::guarded;
use crate::application::dto::{PipelineStageInputDto, VendorDto, VendorRoleInputDto};
use crate::application::{Actor, Confirmed, TrackerError};
use crate::domain::production_catalog::{
    PipelineStage, PipelineStageRepository, PipelineStageSpec, Vendor, VendorForm,
    VendorProfile, VendorRepository, VendorRole, VendorRoleRepository,
};
use crate::domain::shared::{PipelineStageId, VendorId, VendorRoleId};

/// Use case for maintaining the production catalog.
pub struct ManageCatalogUseCase {
    roles: Arc<dyn VendorRoleRepository>,
    stages: Arc<dyn PipelineStageRepository>,
    vendors: Arc<dyn VendorRepository>,
}

impl ManageCatalogUseCase {
    /// Create a new `ManageCatalogUseCase`.
    pub fn new(
        roles: Arc<dyn VendorRoleRepository>,
        stages: Arc<dyn PipelineStageRepository>,
        vendors: Arc<dyn VendorRepository>,
    ) -> Self {
        Self {
            roles,
            stages,
            vendors,
        }
    }

    // ========================================================================
    // Vendor Roles
    // ========================================================================

    /// Add a vendor role.
    pub async fn create_role(
        &self,
        actor: &Actor,
        input: VendorRoleInputDto,
    ) -> Result<Confirmed<VendorRole>, TrackerError> {
        actor.require_privilege("create vendor roles")?;
        let id = self.roles.next_id().await?;
        let role = VendorRole::new(id, &input.name)?;
        self.roles.insert(&role).await.map_err(guarded)?;

        tracing::info!(role_id = %id, actor = actor.name(), "Vendor role created");
        let message = format!("Vendor role {} created.", role.name());
        Ok(Confirmed::new(role, message))
    }

    /// Every vendor role.
    pub async fn list_roles(&self) -> Result<Vec<VendorRole>, TrackerError> {
        Ok(self.roles.list().await?)
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Add a pipeline stage. Without an ordinal it goes after the last one.
    pub async fn create_stage(
        &self,
        actor: &Actor,
        input: PipelineStageInputDto,
    ) -> Result<Confirmed<PipelineStage>, TrackerError> {
        actor.require_privilege("create pipeline stages")?;
        let spec = self.stage_spec(input).await?;
        let stage = self.stages.create(spec).await.map_err(guarded)?;

        tracing::info!(
            stage_id = %stage.id(),
            ordinal = %stage.ordinal(),
            actor = actor.name(),
            "Pipeline stage created"
        );
        let message = format!(
            "Pipeline stage {} created at position {}.",
            stage.name(),
            stage.ordinal()
        );
        Ok(Confirmed::new(stage, message))
    }

    /// Rename, move or re-role a pipeline stage.
    pub async fn update_stage(
        &self,
        actor: &Actor,
        id: PipelineStageId,
        input: PipelineStageInputDto,
    ) -> Result<Confirmed<PipelineStage>, TrackerError> {
        actor.require_privilege("update pipeline stages")?;
        let mut stage = self.stage(id).await?;
        let spec = self.stage_spec(input).await?;
        stage.revise(spec);
        self.stages.update(&stage).await.map_err(guarded)?;

        tracing::info!(stage_id = %id, ordinal = %stage.ordinal(), "Pipeline stage updated");
        let message = format!("Pipeline stage {} updated.", stage.name());
        Ok(Confirmed::new(stage, message))
    }

    /// Load one pipeline stage.
    pub async fn stage(&self, id: PipelineStageId) -> Result<PipelineStage, TrackerError> {
        self.stages
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("PipelineStage", id))
    }

    /// Every pipeline stage by ordinal.
    pub async fn list_stages(&self) -> Result<Vec<PipelineStage>, TrackerError> {
        Ok(self.stages.list().await?)
    }

    // ========================================================================
    // Vendors
    // ========================================================================

    /// Add a vendor.
    pub async fn create_vendor(
        &self,
        actor: &Actor,
        form: VendorForm,
    ) -> Result<Confirmed<VendorDto>, TrackerError> {
        actor.require_privilege("create vendors")?;
        let profile = VendorProfile::parse(form)?;
        let role = self.role(profile.role).await?;
        let id = self.vendors.next_id().await?;
        let vendor = Vendor::new(id, profile);
        self.vendors.save(&vendor).await.map_err(guarded)?;

        tracing::info!(vendor_id = %id, role = role.name(), "Vendor created");
        let message = format!("Vendor {} created.", vendor.name());
        Ok(Confirmed::new(
            VendorDto::from_vendor(&vendor, Some(role.name())),
            message,
        ))
    }

    /// Replace a vendor's details.
    pub async fn update_vendor(
        &self,
        actor: &Actor,
        id: VendorId,
        form: VendorForm,
    ) -> Result<Confirmed<VendorDto>, TrackerError> {
        actor.require_privilege("update vendors")?;
        let mut vendor = self.vendor(id).await?;
        let profile = VendorProfile::parse(form)?;
        let role = self.role(profile.role).await?;
        vendor.revise(profile);
        self.vendors.save(&vendor).await.map_err(guarded)?;

        tracing::info!(vendor_id = %id, "Vendor updated");
        let message = format!("Vendor {} updated.", vendor.name());
        Ok(Confirmed::new(
            VendorDto::from_vendor(&vendor, Some(role.name())),
            message,
        ))
    }

    /// Load one vendor.
    pub async fn vendor(&self, id: VendorId) -> Result<Vendor, TrackerError> {
        self.vendors
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Vendor", id))
    }

    /// Every vendor with its role name.
    pub async fn list_vendors(&self) -> Result<Vec<VendorDto>, TrackerError> {
        let vendors = self.vendors.list().await?;
        self.with_role_names(&vendors, "").await
    }

    /// Vendors whose name or role name contains `query`, ignoring case.
    pub async fn search_vendors(&self, query: &str) -> Result<Vec<VendorDto>, TrackerError> {
        let vendors = self.vendors.list().await?;
        self.with_role_names(&vendors, query.trim()).await
    }

    /// Vendors able to work a pipeline stage: those holding its required
    /// role, or everyone when the stage requires none.
    pub async fn vendors_for_stage(
        &self,
        stage_id: PipelineStageId,
    ) -> Result<Vec<VendorDto>, TrackerError> {
        let stage = self.stage(stage_id).await?;
        let vendors = match stage.required_role() {
            Some(role) => self.vendors.list_by_role(role).await?,
            None => self.vendors.list().await?,
        };
        self.with_role_names(&vendors, "").await
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn role(&self, id: VendorRoleId) -> Result<VendorRole, TrackerError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::invalid("role", format!("Vendor role #{id} does not exist.")))
    }

    async fn stage_spec(
        &self,
        input: PipelineStageInputDto,
    ) -> Result<PipelineStageSpec, TrackerError> {
        let spec = PipelineStageSpec::parse(&input.name, input.ordinal, input.required_role)?;
        if let Some(role) = spec.required_role {
            self.roles.find_by_id(role).await?.ok_or_else(|| {
                TrackerError::invalid("required_role", format!("Vendor role #{role} does not exist."))
            })?;
        }
        Ok(spec)
    }

    async fn with_role_names(
        &self,
        vendors: &[Vendor],
        query: &str,
    ) -> Result<Vec<VendorDto>, TrackerError> {
        let names: HashMap<VendorRoleId, String> = self
            .roles
            .list()
            .await?
            .into_iter()
            .map(|r| (r.id(), r.name().to_string()))
            .collect();

        Ok(vendors
            .iter()
            .filter_map(|vendor| {
                let role_name = names.get(&vendor.role()).map(String::as_str);
                (query.is_empty() || vendor.matches(query, role_name))
                    .then(|| VendorDto::from_vendor(vendor, role_name))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{
        InMemoryPipelineStageRepository, InMemoryVendorRepository, InMemoryVendorRoleRepository,
    };

    fn use_case() -> ManageCatalogUseCase {
        ManageCatalogUseCase::new(
            Arc::new(InMemoryVendorRoleRepository::new()),
            Arc::new(InMemoryPipelineStageRepository::new()),
            Arc::new(InMemoryVendorRepository::new()),
        )
    }

    fn admin() -> Actor {
        Actor::admin("owner")
    }

    fn stage_input(name: &str, ordinal: Option<u32>, role: Option<VendorRoleId>) -> PipelineStageInputDto {
        PipelineStageInputDto {
            name: name.to_string(),
            ordinal,
            required_role: role,
        }
    }

    fn vendor_form(name: &str, role: VendorRoleId) -> VendorForm {
        VendorForm {
            name: name.to_string(),
            role,
            phone_numbers: vec!["9988776655".to_string()],
            address: String::new(),
            remark: String::new(),
        }
    }

    async fn role(uc: &ManageCatalogUseCase, name: &str) -> VendorRoleId {
        uc.create_role(&admin(), VendorRoleInputDto { name: name.to_string() })
            .await
            .unwrap()
            .value
            .id()
    }

    #[tokio::test]
    async fn staff_cannot_edit_catalog() {
        let uc = use_case();
        let staff = Actor::staff("desk");
        let err = uc
            .create_stage(&staff, stage_input("Cutting", None, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "forbidden");
        let err = uc
            .create_role(&staff, VendorRoleInputDto { name: "Cutter".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "forbidden");
    }

    #[tokio::test]
    async fn stages_without_ordinal_append() {
        let uc = use_case();
        uc.create_stage(&admin(), stage_input("Cutting", Some(10), None)).await.unwrap();
        let next = uc
            .create_stage(&admin(), stage_input("Stitching", None, None))
            .await
            .unwrap();
        assert_eq!(next.value.ordinal().value(), 11);
        assert_eq!(next.message, "Pipeline stage Stitching created at position 11.");

        let names: Vec<String> = uc
            .list_stages()
            .await
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Cutting", "Stitching"]);
    }

    #[tokio::test]
    async fn duplicate_ordinal_is_a_conflict() {
        let uc = use_case();
        uc.create_stage(&admin(), stage_input("Cutting", Some(1), None)).await.unwrap();
        let err = uc
            .create_stage(&admin(), stage_input("Stitching", Some(1), None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }

    #[tokio::test]
    async fn stage_with_unknown_role_is_invalid() {
        let uc = use_case();
        let err = uc
            .create_stage(&admin(), stage_input("Cutting", None, Some(VendorRoleId::new(9))))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn vendors_for_stage_follow_required_role() {
        let uc = use_case();
        let cutter = role(&uc, "Cutter").await;
        let tailor = role(&uc, "Tailor").await;
        uc.create_vendor(&admin(), vendor_form("Anil", cutter)).await.unwrap();
        uc.create_vendor(&admin(), vendor_form("Bela", tailor)).await.unwrap();

        let cutting = uc
            .create_stage(&admin(), stage_input("Cutting", None, Some(cutter)))
            .await
            .unwrap()
            .value;
        let packing = uc
            .create_stage(&admin(), stage_input("Packing", None, None))
            .await
            .unwrap()
            .value;

        let for_cutting = uc.vendors_for_stage(cutting.id()).await.unwrap();
        assert_eq!(for_cutting.len(), 1);
        assert_eq!(for_cutting[0].name, "Anil");
        assert_eq!(for_cutting[0].role_name.as_deref(), Some("Cutter"));

        assert_eq!(uc.vendors_for_stage(packing.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_vendors_by_role_name() {
        let uc = use_case();
        let tailor = role(&uc, "Tailor").await;
        uc.create_vendor(&admin(), vendor_form("Bela", tailor)).await.unwrap();
        assert_eq!(uc.search_vendors("tail").await.unwrap().len(), 1);
        assert!(uc.search_vendors("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn vendor_with_unknown_role_is_invalid() {
        let uc = use_case();
        let err = uc
            .create_vendor(&admin(), vendor_form("Anil", VendorRoleId::new(3)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }
}
