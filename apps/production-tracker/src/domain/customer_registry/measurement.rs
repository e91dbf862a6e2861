//! Measurement sets recorded for a customer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::shared::{CustomerId, DomainError, MeasurementId};

/// Measurement names the shop records for most garments.
///
/// Other names are accepted; these are the ones the intake form offers.
pub const STANDARD_FIELDS: [&str; 19] = [
    "height",
    "weight",
    "chest",
    "waist",
    "hips",
    "neck",
    "sleeve_length",
    "bicep",
    "wrist",
    "shoulder_width",
    "shirt_length",
    "inseam",
    "outseam",
    "thigh",
    "knee",
    "ankle",
    "pant_length",
    "jacket_length",
    "dress_length",
];

const FIELD_NAME_MAX_CHARS: usize = 40;

/// The garment a measurement set was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GarmentType {
    /// Pant.
    Pant,
    /// Shirt.
    Shirt,
    /// Suite.
    Suite,
    /// Jacket.
    Jacket,
    /// Trouser.
    Trouser,
    /// Blouse.
    Blouse,
    /// Skirt.
    Skirt,
    /// Dress.
    Dress,
    /// Coat.
    Coat,
    /// Vest.
    Vest,
    /// Kurta.
    Kurta,
    /// Pajama.
    Pajama,
    /// Sherwani.
    Sherwani,
    /// Lehenga.
    Lehenga,
    /// Saree blouse.
    #[serde(rename = "Saree Blouse")]
    SareeBlouse,
    /// Salwar kameez.
    #[serde(rename = "Salwar Kameez")]
    SalwarKameez,
}

impl GarmentType {
    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pant => "Pant",
            Self::Shirt => "Shirt",
            Self::Suite => "Suite",
            Self::Jacket => "Jacket",
            Self::Trouser => "Trouser",
            Self::Blouse => "Blouse",
            Self::Skirt => "Skirt",
            Self::Dress => "Dress",
            Self::Coat => "Coat",
            Self::Vest => "Vest",
            Self::Kurta => "Kurta",
            Self::Pajama => "Pajama",
            Self::Sherwani => "Sherwani",
            Self::Lehenga => "Lehenga",
            Self::SareeBlouse => "Saree Blouse",
            Self::SalwarKameez => "Salwar Kameez",
        }
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named body measurements, keyed by lowercase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementValues(BTreeMap<String, Decimal>);

impl MeasurementValues {
    /// Validate raw name/value pairs.
    ///
    /// Names are trimmed and lowercased. Values must be non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry.
    pub fn parse(raw: BTreeMap<String, Decimal>) -> Result<Self, DomainError> {
        let mut values = BTreeMap::new();
        for (name, value) in raw {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                return Err(DomainError::invalid(
                    "values",
                    "Measurement names cannot be blank",
                ));
            }
            if key.chars().count() > FIELD_NAME_MAX_CHARS {
                return Err(DomainError::invalid(
                    "values",
                    format!("Measurement name '{key}' is too long"),
                ));
            }
            if value.is_sign_negative() && !value.is_zero() {
                return Err(DomainError::invalid(
                    key,
                    "Measurement cannot be negative",
                ));
            }
            values.insert(key, value);
        }
        Ok(Self(values))
    }

    /// Look up one measurement.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.0.get(name).copied()
    }

    /// Number of recorded measurements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name/value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names outside [`STANDARD_FIELDS`].
    pub fn custom_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| !STANDARD_FIELDS.contains(k))
    }
}

/// A measurement set as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    id: MeasurementId,
    customer_id: CustomerId,
    garment_type: GarmentType,
    values: MeasurementValues,
}

impl Measurement {
    /// Create a measurement set with a store-assigned id.
    #[must_use]
    pub const fn new(
        id: MeasurementId,
        customer_id: CustomerId,
        garment_type: GarmentType,
        values: MeasurementValues,
    ) -> Self {
        Self {
            id,
            customer_id,
            garment_type,
            values,
        }
    }

    /// Get the id.
    #[must_use]
    pub const fn id(&self) -> MeasurementId {
        self.id
    }

    /// Get the owning customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Get the garment type.
    #[must_use]
    pub const fn garment_type(&self) -> GarmentType {
        self.garment_type
    }

    /// Get the recorded values.
    #[must_use]
    pub const fn values(&self) -> &MeasurementValues {
        &self.values
    }

    /// Replace the customer, garment and values.
    pub fn revise(
        &mut self,
        customer_id: CustomerId,
        garment_type: GarmentType,
        values: MeasurementValues,
    ) {
        self.customer_id = customer_id;
        self.garment_type = garment_type;
        self.values = values;
    }
}
