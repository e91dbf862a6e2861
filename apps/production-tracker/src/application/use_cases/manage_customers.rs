//! Manage Customers Use Case

use std::sync::Arc;

use super::guarded;
use crate::application::dto::CustomerHitDto;
use crate::application::{Actor, Confirmed, TrackerError};
use crate::domain::customer_registry::{
    Customer, CustomerForm, CustomerProfile, CustomerRepository,
};
use crate::domain::shared::CustomerId;

/// Use case for registering and looking up customers.
pub struct ManageCustomersUseCase {
    customers: Arc<dyn CustomerRepository>,
}

impl ManageCustomersUseCase {
    /// Create a new `ManageCustomersUseCase`.
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    /// Register a customer.
    pub async fn create(&self, form: CustomerForm) -> Result<Confirmed<Customer>, TrackerError> {
        let profile = CustomerProfile::parse(form)?;
        let id = self.customers.next_id().await?;
        let customer = Customer::new(id, profile);

        self.customers.insert(&customer).await.map_err(guarded)?;

        tracing::info!(customer_id = %id, "Customer registered");
        let message = format!("Customer {} added successfully.", customer.name());
        Ok(Confirmed::new(customer, message))
    }

    /// Replace a customer's details.
    pub async fn update(
        &self,
        id: CustomerId,
        form: CustomerForm,
    ) -> Result<Confirmed<Customer>, TrackerError> {
        let mut customer = self.get(id).await?;
        let profile = CustomerProfile::parse(form)?;
        customer.revise(profile);

        self.customers.update(&customer).await.map_err(guarded)?;

        tracing::info!(customer_id = %id, "Customer updated");
        Ok(Confirmed::new(
            customer,
            "Customer details updated successfully!",
        ))
    }

    /// Load one customer.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, TrackerError> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Customer", id))
    }

    /// Every customer. Admin only.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Customer>, TrackerError> {
        actor.require_privilege("list customers")?;
        Ok(self.customers.list().await?)
    }

    /// Customers whose name contains `query` (ignoring case) or whose phone
    /// contains it. An empty query matches everyone.
    pub async fn search(&self, query: &str) -> Result<Vec<CustomerHitDto>, TrackerError> {
        let hits = self.customers.search(query.trim()).await?;
        Ok(hits.iter().map(CustomerHitDto::from).collect())
    }
}
