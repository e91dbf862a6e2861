//! Customer and Measurement DTOs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer_registry::{Customer, Gender, GarmentType, Measurement};
use crate::domain::shared::{CustomerId, MeasurementId};

/// DTO representing a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDto {
    /// Customer ID.
    pub id: CustomerId,
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone, digits only.
    pub phone: Option<String>,
    /// Address.
    pub address: String,
    /// Gender.
    pub gender: Option<Gender>,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        let profile = customer.profile();
        Self {
            id: customer.id(),
            name: profile.name.clone(),
            email: profile.email.as_str().to_string(),
            phone: profile.phone.as_ref().map(|p| p.as_str().to_string()),
            address: profile.address.clone(),
            gender: profile.gender,
        }
    }
}

/// Customer search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerHitDto {
    /// Customer ID.
    pub id: CustomerId,
    /// Name.
    pub name: String,
    /// Phone, digits only.
    pub phone: Option<String>,
}

impl From<&Customer> for CustomerHitDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            name: customer.name().to_string(),
            phone: customer.phone().map(|p| p.as_str().to_string()),
        }
    }
}

/// DTO for creating or updating a measurement set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementInputDto {
    /// Owning customer; required.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Garment the measurements are for.
    pub garment_type: GarmentType,
    /// Named values.
    #[serde(default)]
    pub values: BTreeMap<String, Decimal>,
}

/// DTO representing a measurement set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementDto {
    /// Measurement ID.
    pub id: MeasurementId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Garment type.
    pub garment_type: GarmentType,
    /// Named values.
    pub values: BTreeMap<String, Decimal>,
}

impl From<&Measurement> for MeasurementDto {
    fn from(measurement: &Measurement) -> Self {
        Self {
            id: measurement.id(),
            customer_id: measurement.customer_id(),
            garment_type: measurement.garment_type(),
            values: measurement
                .values()
                .iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

/// Measurement search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementHitDto {
    /// Measurement ID.
    pub id: MeasurementId,
    /// Owning customer's name.
    pub customer_name: String,
    /// Garment type.
    #[serde(rename = "type")]
    pub garment_type: GarmentType,
}
