//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::BusinessRules;
use crate::application::ports::{Clock, EventPublisherPort, SystemClock};
use crate::application::use_cases::{
    DashboardUseCase, ManageCatalogUseCase, ManageCustomersUseCase, ManageInvoicesUseCase,
    ManageMeasurementsUseCase, ManageOrdersUseCase, TrackStagesUseCase,
};
use crate::domain::customer_registry::{CustomerRepository, MeasurementRepository};
use crate::domain::invoicing::InvoiceRepository;
use crate::domain::order_tracking::OrderRepository;
use crate::domain::production_catalog::{
    PipelineStageRepository, VendorRepository, VendorRoleRepository,
};
use crate::infrastructure::events::LoggingEventPublisher;
use crate::infrastructure::http::AppState;
use crate::infrastructure::persistence::{
    InMemoryCustomerRepository, InMemoryInvoiceRepository, InMemoryMeasurementRepository,
    InMemoryOrderRepository, InMemoryPipelineStageRepository, InMemoryVendorRepository,
    InMemoryVendorRoleRepository,
};

/// Dependency injection container.
///
/// Holds every repository and port once; each use case factory hands out
/// shared handles to the same stores.
#[derive(Clone)]
pub struct Container {
    // Repositories
    customers: Arc<dyn CustomerRepository>,
    measurements: Arc<dyn MeasurementRepository>,
    roles: Arc<dyn VendorRoleRepository>,
    stages: Arc<dyn PipelineStageRepository>,
    vendors: Arc<dyn VendorRepository>,
    orders: Arc<dyn OrderRepository>,
    invoices: Arc<dyn InvoiceRepository>,

    // Ports
    publisher: Arc<dyn EventPublisherPort>,
    clock: Arc<dyn Clock>,

    rules: BusinessRules,
}

impl Container {
    /// Wire in-memory stores, the logging publisher and the system clock.
    #[must_use]
    pub fn in_memory(rules: BusinessRules) -> Self {
        Self::with_ports(
            rules,
            Arc::new(LoggingEventPublisher::new()),
            Arc::new(SystemClock),
        )
    }

    /// Wire in-memory stores with the given publisher and clock.
    #[must_use]
    pub fn with_ports(
        rules: BusinessRules,
        publisher: Arc<dyn EventPublisherPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepository::new()),
            measurements: Arc::new(InMemoryMeasurementRepository::new()),
            roles: Arc::new(InMemoryVendorRoleRepository::new()),
            stages: Arc::new(InMemoryPipelineStageRepository::new()),
            vendors: Arc::new(InMemoryVendorRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
            invoices: Arc::new(InMemoryInvoiceRepository::new()),
            publisher,
            clock,
            rules,
        }
    }

    /// Get the business rules.
    #[must_use]
    pub const fn rules(&self) -> &BusinessRules {
        &self.rules
    }

    /// Get the event publisher port.
    #[must_use]
    pub fn event_publisher(&self) -> Arc<dyn EventPublisherPort> {
        Arc::clone(&self.publisher)
    }

    // =========================================================================
    // Use Case Factories
    // =========================================================================

    /// Create the customer use case.
    #[must_use]
    pub fn manage_customers(&self) -> ManageCustomersUseCase {
        ManageCustomersUseCase::new(Arc::clone(&self.customers))
    }

    /// Create the measurement use case.
    #[must_use]
    pub fn manage_measurements(&self) -> ManageMeasurementsUseCase {
        ManageMeasurementsUseCase::new(Arc::clone(&self.measurements), Arc::clone(&self.customers))
    }

    /// Create the catalog use case.
    #[must_use]
    pub fn manage_catalog(&self) -> ManageCatalogUseCase {
        ManageCatalogUseCase::new(
            Arc::clone(&self.roles),
            Arc::clone(&self.stages),
            Arc::clone(&self.vendors),
        )
    }

    /// Create the order use case.
    #[must_use]
    pub fn manage_orders(&self) -> ManageOrdersUseCase {
        ManageOrdersUseCase::new(
            Arc::clone(&self.orders),
            Arc::clone(&self.customers),
            Arc::clone(&self.measurements),
            Arc::clone(&self.invoices),
            Arc::clone(&self.stages),
            Arc::clone(&self.publisher),
            Arc::clone(&self.clock),
            self.rules.clone(),
        )
    }

    /// Create the stage tracking use case.
    #[must_use]
    pub fn track_stages(&self) -> TrackStagesUseCase {
        TrackStagesUseCase::new(
            Arc::clone(&self.orders),
            Arc::clone(&self.stages),
            Arc::clone(&self.vendors),
            Arc::clone(&self.publisher),
            Arc::clone(&self.clock),
        )
    }

    /// Create the invoice use case.
    #[must_use]
    pub fn manage_invoices(&self) -> ManageInvoicesUseCase {
        ManageInvoicesUseCase::new(
            Arc::clone(&self.invoices),
            Arc::clone(&self.orders),
            Arc::clone(&self.publisher),
            Arc::clone(&self.clock),
        )
    }

    /// Create the dashboard use case.
    #[must_use]
    pub fn dashboard(&self) -> DashboardUseCase {
        DashboardUseCase::new(
            Arc::clone(&self.orders),
            Arc::clone(&self.customers),
            Arc::clone(&self.vendors),
            Arc::clone(&self.invoices),
            self.rules.clone(),
        )
    }

    /// Build the HTTP state with every use case.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState {
            customers: Arc::new(self.manage_customers()),
            measurements: Arc::new(self.manage_measurements()),
            catalog: Arc::new(self.manage_catalog()),
            orders: Arc::new(self.manage_orders()),
            stages: Arc::new(self.track_stages()),
            invoices: Arc::new(self.manage_invoices()),
            dashboard: Arc::new(self.dashboard()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
