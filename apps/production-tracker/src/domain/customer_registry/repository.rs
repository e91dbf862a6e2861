//! Customer Registry Repository Traits
//!
//! Persistence abstractions for customers and their measurements.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::customer::Customer;
use super::measurement::Measurement;
use crate::domain::shared::{CustomerId, DomainError, MeasurementId};

/// Repository for customers.
///
/// Phone uniqueness is enforced by the store itself: `insert` and `update`
/// check and write under one lock.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Reserve an id for a new customer.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_id(&self) -> Result<CustomerId, DomainError>;

    /// Insert a new customer.
    ///
    /// # Errors
    ///
    /// Returns `Conflict::DuplicatePhone` if another customer has the phone.
    async fn insert(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Overwrite an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist, or
    /// `Conflict::DuplicatePhone` if a different customer has the phone.
    async fn update(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Find a customer by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError>;

    /// All customers ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self) -> Result<Vec<Customer>, DomainError>;

    /// Customers whose name or phone contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn search(&self, query: &str) -> Result<Vec<Customer>, DomainError>;

    /// Number of customers.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Repository for measurement sets.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Reserve an id for a new measurement set.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable.
    async fn next_id(&self) -> Result<MeasurementId, DomainError>;

    /// Insert or overwrite a measurement set.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save(&self, measurement: &Measurement) -> Result<(), DomainError>;

    /// Find a measurement set by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: MeasurementId) -> Result<Option<Measurement>, DomainError>;

    /// Every measurement set, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list(&self) -> Result<Vec<Measurement>, DomainError>;

    /// Measurement sets belonging to one customer, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Measurement>, DomainError>;
}
