//! Customer entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{
    CustomerId, DomainError, EmailAddress, PhoneNumber, bounded_text, contains_ignore_case,
    required_text,
};

const NAME_MAX_CHARS: usize = 100;
const ADDRESS_MAX_CHARS: usize = 500;

/// Self-reported gender of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Raw customer fields as entered by a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerForm {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Optional gender.
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Validated customer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: EmailAddress,
    /// Phone number, unique across customers when present.
    pub phone: Option<PhoneNumber>,
    /// Postal address.
    pub address: String,
    /// Gender.
    pub gender: Option<Gender>,
}

impl CustomerProfile {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// Returns every field error found, in form order.
    pub fn parse(form: CustomerForm) -> Result<Self, Vec<DomainError>> {
        let mut errors = Vec::new();

        let name = required_text("name", &form.name, NAME_MAX_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let email = EmailAddress::parse(&form.email)
            .map_err(|e| errors.push(e))
            .ok();
        let phone = match form.phone.as_deref().map(str::trim) {
            None | Some("") => Some(None),
            Some(raw) => PhoneNumber::parse(raw)
                .map(Some)
                .map_err(|e| errors.push(e))
                .ok(),
        };
        let address = bounded_text("address", &form.address, ADDRESS_MAX_CHARS)
            .map_err(|e| errors.push(e))
            .ok();

        match (name, email, phone, address) {
            (Some(name), Some(email), Some(phone), Some(address)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    phone,
                    address,
                    gender: form.gender,
                })
            }
            _ => Err(errors),
        }
    }
}

/// A customer of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    #[serde(flatten)]
    profile: CustomerProfile,
}

impl Customer {
    /// Create a customer with a store-assigned id.
    #[must_use]
    pub const fn new(id: CustomerId, profile: CustomerProfile) -> Self {
        Self { id, profile }
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Get the validated fields.
    #[must_use]
    pub const fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Get the phone number.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.profile.phone.as_ref()
    }

    /// Replace the validated fields.
    pub fn revise(&mut self, profile: CustomerProfile) {
        self.profile = profile;
    }

    /// Returns true if the name or phone contains `query`, ignoring case.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.profile.name, query)
            || self.phone().is_some_and(|p| p.contains(query.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CustomerForm {
        CustomerForm {
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: Some("98765 43210".to_string()),
            address: "12 Lake Road".to_string(),
            gender: Some(Gender::Female),
        }
    }

    #[test]
    fn parse_valid_form() {
        let profile = CustomerProfile::parse(form()).unwrap();
        assert_eq!(profile.name, "Asha Verma");
        assert_eq!(profile.phone.unwrap().as_str(), "9876543210");
    }

    #[test]
    fn blank_phone_is_none() {
        let profile = CustomerProfile::parse(CustomerForm {
            phone: Some("  ".to_string()),
            ..form()
        })
        .unwrap();
        assert!(profile.phone.is_none());
    }

    #[test]
    fn parse_collects_every_field_error() {
        let errors = CustomerProfile::parse(CustomerForm {
            name: String::new(),
            email: "not-an-email".to_string(),
            phone: Some("12".to_string()),
            ..form()
        })
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn matches_name_and_phone() {
        let customer = Customer::new(CustomerId::new(1), CustomerProfile::parse(form()).unwrap());
        assert!(customer.matches("asha"));
        assert!(customer.matches("43210"));
        assert!(!customer.matches("kumar"));
    }

    #[test]
    fn customer_serializes_flat() {
        let customer = Customer::new(CustomerId::new(3), CustomerProfile::parse(form()).unwrap());
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["gender"], "Female");
        assert_eq!(json["phone"], "9876543210");
    }
}
