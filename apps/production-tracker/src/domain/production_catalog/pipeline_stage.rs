//! Pipeline stages and their ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{DomainError, PipelineStageId, VendorRoleId, required_text};

const NAME_MAX_CHARS: usize = 20;

/// Sequence position of a pipeline stage.
///
/// Stages advance in ascending ordinal order. Ordinals are unique across the
/// catalog but need not be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ordinal(u32);

impl Ordinal {
    /// The ordinal given to the first stage of an empty catalog.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw ordinal.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw ordinal.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The ordinal after this one.
    ///
    /// # Errors
    ///
    /// Returns error if the ordinal space is exhausted.
    pub fn next(self) -> Result<Self, DomainError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| DomainError::invalid("ordinal", "No ordinal left after u32::MAX"))
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated pipeline stage fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStageSpec {
    /// Stage name, at most 20 characters.
    pub name: String,
    /// Explicit position; `None` asks the store for the next free one.
    pub ordinal: Option<Ordinal>,
    /// Vendor role required to work this stage.
    pub required_role: Option<VendorRoleId>,
}

impl PipelineStageSpec {
    /// Validate raw stage fields.
    ///
    /// # Errors
    ///
    /// Returns error if the name is blank or longer than 20 characters.
    pub fn parse(
        name: &str,
        ordinal: Option<u32>,
        required_role: Option<VendorRoleId>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: required_text("name", name, NAME_MAX_CHARS)?,
            ordinal: ordinal.map(Ordinal::new),
            required_role,
        })
    }
}

/// A named, ordered step of production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    id: PipelineStageId,
    name: String,
    ordinal: Ordinal,
    required_role: Option<VendorRoleId>,
}

impl PipelineStage {
    /// Create a stage at a resolved ordinal.
    #[must_use]
    pub const fn new(
        id: PipelineStageId,
        name: String,
        ordinal: Ordinal,
        required_role: Option<VendorRoleId>,
    ) -> Self {
        Self {
            id,
            name,
            ordinal,
            required_role,
        }
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> PipelineStageId {
        self.id
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    /// Get the required vendor role.
    #[must_use]
    pub const fn required_role(&self) -> Option<VendorRoleId> {
        self.required_role
    }

    /// Apply new fields. A `None` ordinal keeps the current one.
    pub fn revise(&mut self, spec: PipelineStageSpec) {
        self.name = spec.name;
        if let Some(ordinal) = spec.ordinal {
            self.ordinal = ordinal;
        }
        self.required_role = spec.required_role;
    }
}
