//! Manage Measurements Use Case

use std::collections::HashMap;
use std::sync::Arc;

use super::guarded;
use crate::application::dto::{MeasurementHitDto, MeasurementInputDto};
use crate::application::{Confirmed, TrackerError};
use crate::domain::customer_registry::{
    Customer, CustomerRepository, Measurement, MeasurementRepository, MeasurementValues,
};
use crate::domain::shared::{CustomerId, MeasurementId, contains_ignore_case};

/// Use case for recording customers' measurement sets.
pub struct ManageMeasurementsUseCase {
    measurements: Arc<dyn MeasurementRepository>,
    customers: Arc<dyn CustomerRepository>,
}

impl ManageMeasurementsUseCase {
    /// Create a new `ManageMeasurementsUseCase`.
    pub fn new(
        measurements: Arc<dyn MeasurementRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            measurements,
            customers,
        }
    }

    /// Record a new measurement set.
    pub async fn create(
        &self,
        input: MeasurementInputDto,
    ) -> Result<Confirmed<Measurement>, TrackerError> {
        let (customer, values) = self.validate(&input).await?;
        let id = self.measurements.next_id().await?;
        let measurement = Measurement::new(id, customer.id(), input.garment_type, values);

        self.measurements.save(&measurement).await.map_err(guarded)?;

        tracing::info!(
            measurement_id = %id,
            customer_id = %customer.id(),
            garment = %input.garment_type,
            "Measurement recorded"
        );
        let message = format!("Measurement for {} saved successfully.", customer.name());
        Ok(Confirmed::new(measurement, message))
    }

    /// Replace an existing measurement set.
    pub async fn update(
        &self,
        id: MeasurementId,
        input: MeasurementInputDto,
    ) -> Result<Confirmed<Measurement>, TrackerError> {
        let mut measurement = self.get(id).await?;
        let (customer, values) = self.validate(&input).await?;
        measurement.revise(customer.id(), input.garment_type, values);

        self.measurements.save(&measurement).await.map_err(guarded)?;

        tracing::info!(measurement_id = %id, "Measurement updated");
        let message = format!("Measurement for {} saved successfully.", customer.name());
        Ok(Confirmed::new(measurement, message))
    }

    /// Load one measurement set.
    pub async fn get(&self, id: MeasurementId) -> Result<Measurement, TrackerError> {
        self.measurements
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Measurement", id))
    }

    /// Measurement sets of one customer; none when no customer is given.
    pub async fn list_for_customer(
        &self,
        customer_id: Option<CustomerId>,
    ) -> Result<Vec<Measurement>, TrackerError> {
        match customer_id {
            Some(id) => Ok(self.measurements.list_for_customer(id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Measurement sets matching `query` against the customer's name, the
    /// customer's phone or the garment type, optionally restricted to one
    /// customer. An empty query matches every set.
    pub async fn search(
        &self,
        query: &str,
        customer_id: Option<CustomerId>,
    ) -> Result<Vec<MeasurementHitDto>, TrackerError> {
        let query = query.trim();
        let candidates = match customer_id {
            Some(id) => self.measurements.list_for_customer(id).await?,
            None => self.measurements.list().await?,
        };

        let mut owners: HashMap<CustomerId, Option<Customer>> = HashMap::new();
        let mut hits = Vec::new();
        for measurement in candidates {
            let owner_id = measurement.customer_id();
            if !owners.contains_key(&owner_id) {
                let owner = self.customers.find_by_id(owner_id).await?;
                owners.insert(owner_id, owner);
            }
            let Some(Some(owner)) = owners.get(&owner_id) else {
                continue;
            };
            let garment = measurement.garment_type();
            if query.is_empty() || owner.matches(query) || contains_ignore_case(garment.label(), query)
            {
                hits.push(MeasurementHitDto {
                    id: measurement.id(),
                    customer_name: owner.name().to_string(),
                    garment_type: garment,
                });
            }
        }
        Ok(hits)
    }

    async fn validate(
        &self,
        input: &MeasurementInputDto,
    ) -> Result<(Customer, MeasurementValues), TrackerError> {
        let Some(customer_id) = input.customer_id else {
            return Err(TrackerError::invalid("customer", "Please select a customer."));
        };
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Customer", customer_id))?;
        let values = MeasurementValues::parse(input.values.clone())?;
        Ok((customer, values))
    }
}
