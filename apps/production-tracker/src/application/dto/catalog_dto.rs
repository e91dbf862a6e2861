//! Catalog DTOs

use serde::{Deserialize, Serialize};

use crate::domain::production_catalog::{PipelineStage, Vendor, VendorRole};
use crate::domain::shared::{PipelineStageId, VendorId, VendorRoleId};

/// DTO for creating a vendor role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRoleInputDto {
    /// Role name.
    pub name: String,
}

/// DTO representing a vendor role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRoleDto {
    /// Role ID.
    pub id: VendorRoleId,
    /// Role name.
    pub name: String,
}

impl From<&VendorRole> for VendorRoleDto {
    fn from(role: &VendorRole) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_string(),
        }
    }
}

/// DTO for creating or updating a pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStageInputDto {
    /// Stage name.
    pub name: String,
    /// Explicit position; omitted means "after the last stage" on create
    /// and "unchanged" on update.
    #[serde(default)]
    pub ordinal: Option<u32>,
    /// Vendor role required to work the stage.
    #[serde(default)]
    pub required_role: Option<VendorRoleId>,
}

/// DTO representing a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStageDto {
    /// Stage ID.
    pub id: PipelineStageId,
    /// Stage name.
    pub name: String,
    /// Position in the pipeline.
    pub ordinal: u32,
    /// Vendor role required to work the stage.
    pub required_role: Option<VendorRoleId>,
}

impl From<&PipelineStage> for PipelineStageDto {
    fn from(stage: &PipelineStage) -> Self {
        Self {
            id: stage.id(),
            name: stage.name().to_string(),
            ordinal: stage.ordinal().value(),
            required_role: stage.required_role(),
        }
    }
}

/// DTO representing a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorDto {
    /// Vendor ID.
    pub id: VendorId,
    /// Name.
    pub name: String,
    /// Role.
    pub role: VendorRoleId,
    /// Role name, when the role is known.
    pub role_name: Option<String>,
    /// Contact numbers.
    pub phone_numbers: Vec<String>,
    /// Address.
    pub address: String,
    /// Remark.
    pub remark: String,
}

impl VendorDto {
    /// Create from a domain vendor and its role name.
    #[must_use]
    pub fn from_vendor(vendor: &Vendor, role_name: Option<&str>) -> Self {
        let profile = vendor.profile();
        Self {
            id: vendor.id(),
            name: profile.name.clone(),
            role: profile.role,
            role_name: role_name.map(str::to_string),
            phone_numbers: profile
                .phone_numbers
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            address: profile.address.clone(),
            remark: profile.remark.clone(),
        }
    }
}
