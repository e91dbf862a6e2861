//! In-memory repositories.
//!
//! Each repository keeps its rows behind one `tokio::sync::RwLock`. Every
//! uniqueness check runs under the same write guard as the write it
//! protects, so two concurrent requests can never both pass a guard.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::customer_registry::{
    Customer, CustomerRepository, Measurement, MeasurementRepository,
};
use crate::domain::invoicing::{Invoice, InvoiceAmounts, InvoiceRepository};
use crate::domain::order_tracking::{
    Order, OrderFilter, OrderRepository, OrderRevision, OrderStage, OrderStatus,
    OrderStatusAggregator, StageStatus,
};
use crate::domain::production_catalog::{
    Ordinal, PipelineStage, PipelineStageRepository, PipelineStageSpec, Vendor,
    VendorRepository, VendorRole, VendorRoleRepository,
};
use crate::domain::shared::{
    Conflict, CustomerId, DomainError, InvoiceId, MeasurementId, Money, OrderId, OrderStageId,
    PipelineStageId, Timestamp, VendorId, VendorRoleId,
};

/// Monotonic id source starting at 1.
#[derive(Debug, Default)]
struct Sequence(AtomicU64);

impl Sequence {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

// ============================================================================
// Customers
// ============================================================================

/// In-memory implementation of `CustomerRepository`.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    ids: Sequence,
    customers: RwLock<BTreeMap<CustomerId, Customer>>,
}

impl InMemoryCustomerRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn phone_holder(
    customers: &BTreeMap<CustomerId, Customer>,
    candidate: &Customer,
) -> Option<Conflict> {
    let phone = candidate.phone()?;
    customers
        .values()
        .find(|c| c.id() != candidate.id() && c.phone() == Some(phone))
        .map(|holder| Conflict::DuplicatePhone {
            holder: holder.id().value(),
        })
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn next_id(&self) -> Result<CustomerId, DomainError> {
        Ok(CustomerId::new(self.ids.next()))
    }

    async fn insert(&self, customer: &Customer) -> Result<(), DomainError> {
        let mut customers = self.customers.write().await;
        if let Some(conflict) = phone_holder(&customers, customer) {
            return Err(conflict.into());
        }
        customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), DomainError> {
        let mut customers = self.customers.write().await;
        if !customers.contains_key(&customer.id()) {
            return Err(DomainError::not_found("Customer", customer.id()));
        }
        if let Some(conflict) = phone_holder(&customers, customer) {
            return Err(conflict.into());
        }
        customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.customers.read().await.values().cloned().collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Customer>, DomainError> {
        Ok(self
            .customers
            .read()
            .await
            .values()
            .filter(|c| c.matches(query))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.customers.read().await.len())
    }
}

// ============================================================================
// Measurements
// ============================================================================

/// In-memory implementation of `MeasurementRepository`.
#[derive(Debug, Default)]
pub struct InMemoryMeasurementRepository {
    ids: Sequence,
    measurements: RwLock<BTreeMap<MeasurementId, Measurement>>,
}

impl InMemoryMeasurementRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MeasurementRepository for InMemoryMeasurementRepository {
    async fn next_id(&self) -> Result<MeasurementId, DomainError> {
        Ok(MeasurementId::new(self.ids.next()))
    }

    async fn save(&self, measurement: &Measurement) -> Result<(), DomainError> {
        self.measurements
            .write()
            .await
            .insert(measurement.id(), measurement.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MeasurementId) -> Result<Option<Measurement>, DomainError> {
        Ok(self.measurements.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Measurement>, DomainError> {
        Ok(self.measurements.read().await.values().cloned().collect())
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Measurement>, DomainError> {
        Ok(self
            .measurements
            .read()
            .await
            .values()
            .filter(|m| m.customer_id() == customer_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// In-memory implementation of `VendorRoleRepository`.
#[derive(Debug, Default)]
pub struct InMemoryVendorRoleRepository {
    ids: Sequence,
    roles: RwLock<BTreeMap<VendorRoleId, VendorRole>>,
}

impl InMemoryVendorRoleRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VendorRoleRepository for InMemoryVendorRoleRepository {
    async fn next_id(&self) -> Result<VendorRoleId, DomainError> {
        Ok(VendorRoleId::new(self.ids.next()))
    }

    async fn insert(&self, role: &VendorRole) -> Result<(), DomainError> {
        self.roles.write().await.insert(role.id(), role.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: VendorRoleId) -> Result<Option<VendorRole>, DomainError> {
        Ok(self.roles.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<VendorRole>, DomainError> {
        Ok(self.roles.read().await.values().cloned().collect())
    }
}

/// In-memory implementation of `PipelineStageRepository`.
#[derive(Debug, Default)]
pub struct InMemoryPipelineStageRepository {
    ids: Sequence,
    stages: RwLock<BTreeMap<PipelineStageId, PipelineStage>>,
}

impl InMemoryPipelineStageRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn ordinal_holder(
    stages: &BTreeMap<PipelineStageId, PipelineStage>,
    ordinal: Ordinal,
    except: Option<PipelineStageId>,
) -> Option<Conflict> {
    stages
        .values()
        .find(|s| s.ordinal() == ordinal && Some(s.id()) != except)
        .map(|holder| Conflict::DuplicateOrdinal {
            ordinal: ordinal.value(),
            holder: holder.id().value(),
        })
}

#[async_trait]
impl PipelineStageRepository for InMemoryPipelineStageRepository {
    async fn create(&self, spec: PipelineStageSpec) -> Result<PipelineStage, DomainError> {
        let mut stages = self.stages.write().await;
        let ordinal = match spec.ordinal {
            Some(ordinal) => ordinal,
            None => match stages.values().map(PipelineStage::ordinal).max() {
                Some(last) => last.next()?,
                None => Ordinal::FIRST,
            },
        };
        if let Some(conflict) = ordinal_holder(&stages, ordinal, None) {
            return Err(conflict.into());
        }

        let stage = PipelineStage::new(
            PipelineStageId::new(self.ids.next()),
            spec.name,
            ordinal,
            spec.required_role,
        );
        stages.insert(stage.id(), stage.clone());
        Ok(stage)
    }

    async fn update(&self, stage: &PipelineStage) -> Result<(), DomainError> {
        let mut stages = self.stages.write().await;
        if !stages.contains_key(&stage.id()) {
            return Err(DomainError::not_found("PipelineStage", stage.id()));
        }
        if let Some(conflict) = ordinal_holder(&stages, stage.ordinal(), Some(stage.id())) {
            return Err(conflict.into());
        }
        stages.insert(stage.id(), stage.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: PipelineStageId,
    ) -> Result<Option<PipelineStage>, DomainError> {
        Ok(self.stages.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<PipelineStage>, DomainError> {
        let mut stages: Vec<_> = self.stages.read().await.values().cloned().collect();
        stages.sort_by_key(PipelineStage::ordinal);
        Ok(stages)
    }
}

/// In-memory implementation of `VendorRepository`.
#[derive(Debug, Default)]
pub struct InMemoryVendorRepository {
    ids: Sequence,
    vendors: RwLock<BTreeMap<VendorId, Vendor>>,
}

impl InMemoryVendorRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VendorRepository for InMemoryVendorRepository {
    async fn next_id(&self) -> Result<VendorId, DomainError> {
        Ok(VendorId::new(self.ids.next()))
    }

    async fn save(&self, vendor: &Vendor) -> Result<(), DomainError> {
        self.vendors.write().await.insert(vendor.id(), vendor.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: VendorId) -> Result<Option<Vendor>, DomainError> {
        Ok(self.vendors.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Vendor>, DomainError> {
        Ok(self.vendors.read().await.values().cloned().collect())
    }

    async fn list_by_role(&self, role: VendorRoleId) -> Result<Vec<Vendor>, DomainError> {
        Ok(self
            .vendors
            .read()
            .await
            .values()
            .filter(|v| v.role() == role)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Default)]
struct OrderTables {
    orders: BTreeMap<OrderId, Order>,
    stages: BTreeMap<OrderStageId, OrderStage>,
}

impl OrderTables {
    fn order(&self, id: OrderId) -> Result<&Order, DomainError> {
        self.orders
            .get(&id)
            .ok_or_else(|| DomainError::not_found("Order", id))
    }

    fn measurement_holder(&self, candidate: &Order) -> Option<Conflict> {
        let measurement = candidate.measurement_id()?;
        self.orders
            .values()
            .find(|o| o.id() != candidate.id() && o.measurement_id() == Some(measurement))
            .map(|holder| Conflict::MeasurementAlreadyBound {
                measurement: measurement.value(),
                holder: holder.id().value(),
            })
    }

    /// Store a copy with its pending events dropped.
    fn put(&mut self, order: &Order) {
        let mut row = order.clone();
        row.drain_events();
        self.orders.insert(row.id(), row);
    }
}

/// In-memory implementation of `OrderRepository`.
///
/// Orders and their stage rows share one lock so multi-row writes are
/// all-or-nothing.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    order_ids: Sequence,
    stage_ids: Sequence,
    tables: RwLock<OrderTables>,
}

impl InMemoryOrderRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn next_id(&self) -> Result<OrderId, DomainError> {
        Ok(OrderId::new(self.order_ids.next()))
    }

    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if let Some(conflict) = tables.measurement_holder(order) {
            return Err(conflict.into());
        }
        tables.put(order);
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<OrderRevision, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.order(order.id())?.clone();
        if let Some(conflict) = tables.measurement_holder(order) {
            return Err(conflict.into());
        }
        let mut after = before.clone();
        after.revise(order.details(), order.updated_at())?;
        tables.put(&after);
        Ok(OrderRevision { before, after })
    }

    async fn set_override(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        at: Timestamp,
    ) -> Result<Order, DomainError> {
        let mut tables = self.tables.write().await;
        let mut row = tables.order(id)?.clone();
        match status {
            Some(status) => row.override_status(status, at),
            None => row.clear_override(at),
        }
        tables.put(&row);
        Ok(row)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .tables
            .read()
            .await
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.placed_on()
                .cmp(&a.placed_on())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(orders)
    }

    async fn list_by_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.invoice_id() == Some(invoice_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: OrderId) -> Result<Order, DomainError> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .orders
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Order", id))?;
        tables.stages.retain(|_, s| s.order_id() != id);
        Ok(removed)
    }

    async fn assign_invoice(
        &self,
        ids: &[OrderId],
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<Vec<Order>, DomainError> {
        let mut tables = self.tables.write().await;
        let unique: BTreeSet<OrderId> = ids.iter().copied().collect();

        let mut linked = Vec::with_capacity(unique.len());
        for id in unique {
            let mut order = tables.order(id)?.clone();
            order.link_invoice(invoice_id, at)?;
            linked.push(order);
        }
        for order in &linked {
            tables.put(order);
        }
        Ok(linked)
    }

    async fn release_invoice(
        &self,
        id: OrderId,
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<Order, DomainError> {
        let mut tables = self.tables.write().await;
        let mut order = tables.order(id)?.clone();
        order.unlink_invoice(invoice_id, at)?;
        tables.put(&order);
        Ok(order)
    }

    async fn release_all(
        &self,
        invoice_id: InvoiceId,
        at: Timestamp,
    ) -> Result<Vec<OrderId>, DomainError> {
        let mut tables = self.tables.write().await;
        let mut released = Vec::new();
        for order in tables.orders.values_mut() {
            if order.invoice_id() == Some(invoice_id) {
                order.unlink_invoice(invoice_id, at)?;
                order.drain_events();
                released.push(order.id());
            }
        }
        Ok(released)
    }

    async fn next_stage_id(&self) -> Result<OrderStageId, DomainError> {
        Ok(OrderStageId::new(self.stage_ids.next()))
    }

    async fn insert_stage(&self, stage: &OrderStage) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.order(stage.order_id())?;
        let duplicate = tables
            .stages
            .values()
            .any(|s| s.order_id() == stage.order_id() && s.stage_id() == stage.stage_id());
        if duplicate {
            return Err(Conflict::DuplicateOrderStage {
                order: stage.order_id().value(),
                stage: stage.stage_id().value(),
            }
            .into());
        }
        tables.stages.insert(stage.id(), stage.clone());
        Ok(())
    }

    async fn stages_for(&self, order_id: OrderId) -> Result<Vec<OrderStage>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .stages
            .values()
            .filter(|s| s.order_id() == order_id)
            .cloned()
            .collect())
    }

    async fn save_progress(
        &self,
        order_id: OrderId,
        stages: &[OrderStage],
        at: Timestamp,
    ) -> Result<Order, DomainError> {
        let mut tables = self.tables.write().await;
        let mut row = tables.order(order_id)?.clone();
        if let Some(stray) = stages.iter().find(|s| {
            s.order_id() != order_id || !tables.stages.contains_key(&s.id())
        }) {
            return Err(DomainError::not_found("OrderStage", stray.id()));
        }

        for stage in stages {
            tables.stages.insert(stage.id(), stage.clone());
        }
        let rows: Vec<OrderStage> = tables
            .stages
            .values()
            .filter(|s| s.order_id() == order_id)
            .cloned()
            .collect();
        row.apply_derived_status(OrderStatusAggregator::recompute(&rows), at);
        tables.put(&row);
        Ok(row)
    }

    async fn count_stages(&self, status: StageStatus) -> Result<usize, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .stages
            .values()
            .filter(|s| s.status() == status)
            .count())
    }
}

// ============================================================================
// Invoices
// ============================================================================

/// In-memory implementation of `InvoiceRepository`.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    ids: Sequence,
    invoices: RwLock<BTreeMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn next_id(&self) -> Result<InvoiceId, DomainError> {
        Ok(InvoiceId::new(self.ids.next()))
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        self.invoices
            .write()
            .await
            .insert(invoice.id(), invoice.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().await.get(&id).cloned())
    }

    async fn adjust_total(
        &self,
        id: InvoiceId,
        added: Money,
        removed: Money,
    ) -> Result<Invoice, DomainError> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Invoice", id))?;
        let mut revised = invoice.clone();
        revised.add_amount(added)?;
        revised.remove_amount(removed);
        *invoice = revised.clone();
        Ok(revised)
    }

    async fn revise(&self, id: InvoiceId, amounts: InvoiceAmounts) -> Result<Invoice, DomainError> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Invoice", id))?;
        invoice.revise(amounts);
        Ok(invoice.clone())
    }

    async fn list(&self) -> Result<Vec<Invoice>, DomainError> {
        Ok(self.invoices.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), DomainError> {
        self.invoices
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Invoice", id))
    }
}
