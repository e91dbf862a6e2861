//! Vendor roles and vendors.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{
    DomainError, PhoneNumber, VendorId, VendorRoleId, bounded_text, contains_ignore_case,
    required_text,
};

const NAME_MAX_CHARS: usize = 100;
const NOTE_MAX_CHARS: usize = 1000;

/// A named trade such as Cutter or Tailor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRole {
    id: VendorRoleId,
    name: String,
}

impl VendorRole {
    /// Create a role, validating its name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is blank or too long.
    pub fn new(id: VendorRoleId, name: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: required_text("name", name, NAME_MAX_CHARS)?,
        })
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> VendorRoleId {
        self.id
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Raw vendor fields as entered by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorForm {
    /// Vendor name.
    pub name: String,
    /// Role the vendor performs.
    pub role: VendorRoleId,
    /// Contact numbers.
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Free-form remark.
    #[serde(default)]
    pub remark: String,
}

/// Validated vendor fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    /// Vendor name.
    pub name: String,
    /// Role the vendor performs.
    pub role: VendorRoleId,
    /// Contact numbers, duplicates removed.
    pub phone_numbers: Vec<PhoneNumber>,
    /// Postal address.
    pub address: String,
    /// Free-form remark.
    pub remark: String,
}

impl VendorProfile {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn parse(form: VendorForm) -> Result<Self, DomainError> {
        let name = required_text("name", &form.name, NAME_MAX_CHARS)?;
        let mut phone_numbers: Vec<PhoneNumber> = Vec::with_capacity(form.phone_numbers.len());
        for raw in form.phone_numbers.iter().filter(|p| !p.trim().is_empty()) {
            let phone = PhoneNumber::parse(raw).map_err(|_| {
                DomainError::invalid("phone_numbers", format!("'{raw}' is not a valid phone number"))
            })?;
            if !phone_numbers.contains(&phone) {
                phone_numbers.push(phone);
            }
        }
        Ok(Self {
            name,
            role: form.role,
            phone_numbers,
            address: bounded_text("address", &form.address, NOTE_MAX_CHARS)?,
            remark: bounded_text("remark", &form.remark, NOTE_MAX_CHARS)?,
        })
    }
}

/// A tailor, cutter or other worker who can be assigned to stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    id: VendorId,
    #[serde(flatten)]
    profile: VendorProfile,
}

impl Vendor {
    /// Create a vendor with a store-assigned id.
    #[must_use]
    pub const fn new(id: VendorId, profile: VendorProfile) -> Self {
        Self { id, profile }
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> VendorId {
        self.id
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Get the role.
    #[must_use]
    pub const fn role(&self) -> VendorRoleId {
        self.profile.role
    }

    /// Get the validated fields.
    #[must_use]
    pub const fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    /// Replace the validated fields.
    pub fn revise(&mut self, profile: VendorProfile) {
        self.profile = profile;
    }

    /// Returns true if the vendor can work a stage requiring `role`.
    ///
    /// A stage with no required role accepts any vendor.
    #[must_use]
    pub fn can_work(&self, role: Option<VendorRoleId>) -> bool {
        role.is_none_or(|r| r == self.profile.role)
    }

    /// Returns true if the vendor name or role name contains `query`.
    #[must_use]
    pub fn matches(&self, query: &str, role_name: Option<&str>) -> bool {
        contains_ignore_case(&self.profile.name, query)
            || role_name.is_some_and(|r| contains_ignore_case(r, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> VendorForm {
        VendorForm {
            name: "Ravi Tailors".to_string(),
            role: VendorRoleId::new(2),
            phone_numbers: vec![
                "98765 43210".to_string(),
                "9876543210".to_string(),
                String::new(),
            ],
            address: String::new(),
            remark: "Fast on kurtas".to_string(),
        }
    }

    #[test]
    fn profile_dedupes_phone_numbers() {
        let profile = VendorProfile::parse(form()).unwrap();
        assert_eq!(profile.phone_numbers.len(), 1);
    }

    #[test]
    fn profile_rejects_bad_phone() {
        let err = VendorProfile::parse(VendorForm {
            phone_numbers: vec!["call me".to_string()],
            ..form()
        })
        .unwrap_err();
        assert!(format!("{err}").contains("phone_numbers"));
    }

    #[test]
    fn role_requires_name() {
        assert!(VendorRole::new(VendorRoleId::new(1), " ").is_err());
        assert_eq!(VendorRole::new(VendorRoleId::new(1), "Tailor").unwrap().name(), "Tailor");
    }

    #[test]
    fn can_work_matches_required_role() {
        let vendor = Vendor::new(VendorId::new(1), VendorProfile::parse(form()).unwrap());
        assert!(vendor.can_work(None));
        assert!(vendor.can_work(Some(VendorRoleId::new(2))));
        assert!(!vendor.can_work(Some(VendorRoleId::new(3))));
    }

    #[test]
    fn matches_vendor_or_role_name() {
        let vendor = Vendor::new(VendorId::new(1), VendorProfile::parse(form()).unwrap());
        assert!(vendor.matches("ravi", None));
        assert!(vendor.matches("tail", Some("Tailor")));
        assert!(!vendor.matches("cutter", Some("Tailor")));
    }
}
