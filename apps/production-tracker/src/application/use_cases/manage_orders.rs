//! Manage Orders Use Case
//!
//! Placing, revising and deleting orders, plus the read side: detail with
//! stages in pipeline order, filtered lists and search.

use std::collections::HashMap;
use std::sync::Arc;

use super::{guarded, publish};
use crate::application::dto::{
    OrderDetailDto, OrderDto, OrderHitDto, OrderInputDto, OrderQueryDto, OrderStageDto,
    StatusOverrideDto,
};
use crate::application::ports::{Clock, EventPublisherPort};
use crate::application::{BusinessRules, Confirmed, TrackerError};
use crate::domain::customer_registry::{Customer, CustomerRepository, MeasurementRepository};
use crate::domain::invoicing::InvoiceRepository;
use crate::domain::order_tracking::{
    Order, OrderDetails, OrderFilter, OrderRepository, OrderRevision, OrderStage,
    StageOrdinals, StageSequencer,
};
use crate::domain::production_catalog::PipelineStageRepository;
use crate::domain::shared::{
    CustomerId, DomainError, InvoiceId, Money, OrderId, contains_ignore_case,
};
use crate::observability::{record_order_placed, record_status_override};

/// Use case for the order lifecycle.
pub struct ManageOrdersUseCase {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
    measurements: Arc<dyn MeasurementRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    stages: Arc<dyn PipelineStageRepository>,
    publisher: Arc<dyn EventPublisherPort>,
    clock: Arc<dyn Clock>,
    rules: BusinessRules,
}

impl ManageOrdersUseCase {
    /// Create a new `ManageOrdersUseCase`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerRepository>,
        measurements: Arc<dyn MeasurementRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        stages: Arc<dyn PipelineStageRepository>,
        publisher: Arc<dyn EventPublisherPort>,
        clock: Arc<dyn Clock>,
        rules: BusinessRules,
    ) -> Self {
        Self {
            orders,
            customers,
            measurements,
            invoices,
            stages,
            publisher,
            clock,
            rules,
        }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Place a new order in status `New`.
    pub async fn place(&self, input: OrderInputDto) -> Result<Confirmed<OrderDto>, TrackerError> {
        let (customer, details) = self.validate(input).await?;
        let id = self.orders.next_id().await?;
        let mut order = Order::place(id, details, self.clock.now())?;

        self.orders.insert(&order).await.map_err(guarded)?;

        tracing::info!(
            order_id = %id,
            customer_id = %customer.id(),
            amount = %order.amount(),
            "Order placed"
        );
        record_order_placed();
        publish(self.publisher.as_ref(), order.drain_events()).await;

        let message = format!("Order #{id} for {} created successfully.", customer.name());
        Ok(Confirmed::new(
            OrderDto::from_order(&order, Some(customer.name())),
            message,
        ))
    }

    /// Replace an order's details.
    ///
    /// When the order is on an invoice, a changed amount moves the invoice
    /// total by the difference.
    pub async fn update(
        &self,
        id: OrderId,
        input: OrderInputDto,
    ) -> Result<Confirmed<OrderDto>, TrackerError> {
        let mut order = self.get(id).await?;
        let (customer, details) = self.validate(input).await?;
        order.revise(details, self.clock.now())?;

        let OrderRevision { before, after: order } =
            self.orders.update(&order).await.map_err(guarded)?;

        if let Some(invoice_id) = order.invoice_id()
            && before.amount() != order.amount()
        {
            self.adjust_invoice(invoice_id, before.amount(), order.amount())
                .await?;
        }

        tracing::info!(order_id = %id, amount = %order.amount(), "Order updated");
        Ok(Confirmed::new(
            OrderDto::from_order(&order, Some(customer.name())),
            format!("Order #{id} updated successfully."),
        ))
    }

    /// Delete an order and its stages. An invoiced order leaves its amount
    /// off the invoice total.
    pub async fn delete(&self, id: OrderId) -> Result<Confirmed<OrderId>, TrackerError> {
        let removed = self.orders.delete(id).await?;

        if let Some(invoice_id) = removed.invoice_id() {
            self.adjust_invoice(invoice_id, removed.amount(), Money::ZERO)
                .await?;
        }

        tracing::info!(order_id = %id, invoice_id = ?removed.invoice_id(), "Order deleted");
        Ok(Confirmed::new(id, format!("Order #{id} deleted.")))
    }

    /// Set or clear the manual status override.
    pub async fn set_status(
        &self,
        id: OrderId,
        input: StatusOverrideDto,
    ) -> Result<Confirmed<OrderDto>, TrackerError> {
        let mut order = self
            .orders
            .set_override(id, input.status, self.clock.now())
            .await?;

        tracing::info!(order_id = %id, status = %order.status(), "Order status set");
        record_status_override(input.status.is_none());
        publish(self.publisher.as_ref(), order.drain_events()).await;

        let message = match input.status {
            Some(status) => format!("Order #{id} marked {status}."),
            None => format!("Order #{id} returned to {}.", order.derived_status()),
        };
        let name = self.customer_name(order.customer_id()).await?;
        Ok(Confirmed::new(
            OrderDto::from_order(&order, name.as_deref()),
            message,
        ))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Load one order.
    pub async fn get(&self, id: OrderId) -> Result<Order, TrackerError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Order", id))
    }

    /// An order with its stages in pipeline order and the current stage.
    pub async fn detail(&self, id: OrderId) -> Result<OrderDetailDto, TrackerError> {
        let order = self.get(id).await?;
        let mut rows = self.orders.stages_for(id).await?;
        let catalog = self.stages.list().await?;
        let ordinals = StageOrdinals::from_catalog(&catalog);
        StageSequencer::sort(&mut rows, &ordinals);

        let names: HashMap<_, _> = catalog.iter().map(|s| (s.id(), s)).collect();
        let to_dto = |row: &OrderStage| {
            let pipeline = names.get(&row.stage_id());
            OrderStageDto::from_stage(
                row,
                pipeline.map(|p| p.name()),
                pipeline.map(|p| p.ordinal().value()),
            )
        };

        let current_stage = StageSequencer::current(&rows, &ordinals).map(&to_dto);
        let stages = rows.iter().map(&to_dto).collect();
        let name = self.customer_name(order.customer_id()).await?;

        Ok(OrderDetailDto {
            order: OrderDto::from_order(&order, name.as_deref()),
            stages,
            current_stage,
        })
    }

    /// Orders matching the query, newest first.
    pub async fn list(&self, query: OrderQueryDto) -> Result<Vec<OrderDto>, TrackerError> {
        let orders = self.orders.list(OrderFilter::from(query)).await?;
        let names = self.customer_names().await?;
        Ok(orders
            .iter()
            .map(|o| {
                let name = names.get(&o.customer_id()).map(|c| c.name());
                OrderDto::from_order(o, name)
            })
            .collect())
    }

    /// Orders whose customer name or phone contains `query`, or whose id is
    /// `query`. An empty query matches every order.
    pub async fn search(&self, query: &str) -> Result<Vec<OrderHitDto>, TrackerError> {
        let query = query.trim().trim_start_matches('#');
        let orders = self.orders.list(OrderFilter::default()).await?;
        let customers = self.customer_names().await?;

        Ok(orders
            .iter()
            .filter_map(|order| {
                let customer = customers.get(&order.customer_id());
                let hit = query.is_empty()
                    || order.id().to_string() == query
                    || customer.is_some_and(|c| {
                        contains_ignore_case(c.name(), query)
                            || c.phone().is_some_and(|p| p.contains(query))
                    });
                hit.then(|| OrderHitDto {
                    id: order.id(),
                    customer_name: customer.map(|c| c.name().to_string()).unwrap_or_default(),
                    phone: customer
                        .and_then(Customer::phone)
                        .map(|p| p.as_str().to_string()),
                    amount: order.amount().to_major(),
                    status: order.status().status(),
                })
            })
            .collect())
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn validate(
        &self,
        input: OrderInputDto,
    ) -> Result<(Customer, OrderDetails), TrackerError> {
        let customer_id = input
            .customer_id
            .ok_or_else(|| TrackerError::rejected("Please select a customer."))?;
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Customer", customer_id))?;

        let amount = Money::from_major(input.amount)?;
        if amount > self.rules.max_order_amount {
            return Err(TrackerError::invalid(
                "amount",
                format!(
                    "Amount cannot exceed {} {}.",
                    self.rules.max_order_amount, self.rules.currency
                ),
            ));
        }

        if let Some(measurement_id) = input.measurement_id {
            let measurement = self
                .measurements
                .find_by_id(measurement_id)
                .await?
                .ok_or_else(|| TrackerError::not_found("Measurement", measurement_id))?;
            if measurement.customer_id() != customer_id {
                return Err(TrackerError::invalid(
                    "measurement_id",
                    "This measurement belongs to a different customer.",
                ));
            }
        }

        let details = OrderDetails {
            customer_id,
            placed_on: input.placed_on,
            completion_date: input.completion_date,
            specifications: input.specifications,
            amount,
            measurement_id: input.measurement_id,
        };
        Ok((customer, details))
    }

    async fn adjust_invoice(
        &self,
        invoice_id: InvoiceId,
        previous: Money,
        current: Money,
    ) -> Result<(), TrackerError> {
        match self.invoices.adjust_total(invoice_id, current, previous).await {
            Ok(invoice) => {
                tracing::debug!(invoice_id = %invoice_id, total = %invoice.total(), "Invoice total adjusted");
                Ok(())
            }
            Err(DomainError::NotFound { .. }) => {
                tracing::warn!(invoice_id = %invoice_id, "Order references a missing invoice");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn customer_name(&self, id: CustomerId) -> Result<Option<String>, TrackerError> {
        Ok(self
            .customers
            .find_by_id(id)
            .await?
            .map(|c| c.name().to_string()))
    }

    async fn customer_names(&self) -> Result<HashMap<CustomerId, Customer>, TrackerError> {
        Ok(self
            .customers
            .list()
            .await?
            .into_iter()
            .map(|c| (c.id(), c))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FixedClock, NoOpEventPublisher};
    use crate::domain::customer_registry::{
        CustomerForm, CustomerProfile, GarmentType, Measurement, MeasurementValues,
    };
    use crate::domain::invoicing::Invoice;
    use crate::domain::order_tracking::{EffectiveStatus, NewOrderStage, OrderStatus};
    use crate::domain::shared::{MeasurementId, PipelineStageId, Timestamp};
    use crate::infrastructure::persistence::{
        InMemoryCustomerRepository, InMemoryInvoiceRepository, InMemoryMeasurementRepository,
        InMemoryOrderRepository, InMemoryPipelineStageRepository,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    struct Fixture {
        uc: ManageOrdersUseCase,
        customers: Arc<InMemoryCustomerRepository>,
        measurements: Arc<InMemoryMeasurementRepository>,
        invoices: Arc<InMemoryInvoiceRepository>,
    }

    fn fixture() -> Fixture {
        let customers = Arc::new(InMemoryCustomerRepository::new());
        let measurements = Arc::new(InMemoryMeasurementRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());
        let uc = ManageOrdersUseCase::new(
            Arc::new(InMemoryOrderRepository::new()),
            customers.clone(),
            measurements.clone(),
            invoices.clone(),
            Arc::new(InMemoryPipelineStageRepository::new()),
            Arc::new(NoOpEventPublisher),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap())),
            BusinessRules::default(),
        );
        Fixture {
            uc,
            customers,
            measurements,
            invoices,
        }
    }

    async fn customer(f: &Fixture, name: &str, phone: &str) -> CustomerId {
        let id = f.customers.next_id().await.unwrap();
        let profile = CustomerProfile::parse(CustomerForm {
            name: name.to_string(),
            email: "c@example.com".to_string(),
            phone: Some(phone.to_string()),
            ..CustomerForm::default()
        })
        .unwrap();
        f.customers.insert(&Customer::new(id, profile)).await.unwrap();
        id
    }

    async fn measurement(f: &Fixture, owner: CustomerId) -> MeasurementId {
        let id = f.measurements.next_id().await.unwrap();
        f.measurements
            .save(&Measurement::new(
                id,
                owner,
                GarmentType::Kurta,
                MeasurementValues::default(),
            ))
            .await
            .unwrap();
        id
    }

    fn input(customer: Option<CustomerId>, amount: rust_decimal::Decimal) -> OrderInputDto {
        OrderInputDto {
            customer_id: customer,
            placed_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            completion_date: None,
            specifications: "Kurta with mandarin collar".to_string(),
            amount,
            measurement_id: None,
        }
    }

    #[tokio::test]
    async fn place_truncates_amount_and_starts_new() {
        let f = fixture();
        let c = customer(&f, "Ravi", "9000000001").await;
        let placed = f.uc.place(input(Some(c), dec!(1499.999))).await.unwrap();
        assert_eq!(placed.value.amount, dec!(1499.99));
        assert_eq!(placed.value.status, EffectiveStatus::Derived(OrderStatus::New));
        assert_eq!(placed.value.customer_name.as_deref(), Some("Ravi"));
    }

    #[tokio::test]
    async fn place_requires_customer() {
        let f = fixture();
        let err = f.uc.place(input(None, dec!(10))).await.unwrap_err();
        assert_eq!(err, TrackerError::rejected("Please select a customer."));
    }

    #[tokio::test]
    async fn place_rejects_negative_and_excessive_amounts() {
        let f = fixture();
        let c = customer(&f, "Ravi", "9000000001").await;
        let err = f.uc.place(input(Some(c), dec!(-1))).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
        let err = f.uc.place(input(Some(c), dec!(2000000))).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn measurement_must_belong_to_customer() {
        let f = fixture();
        let ravi = customer(&f, "Ravi", "9000000001").await;
        let sita = customer(&f, "Sita", "9000000002").await;
        let m = measurement(&f, sita).await;
        let err = f
            .uc
            .place(OrderInputDto {
                measurement_id: Some(m),
                ..input(Some(ravi), dec!(10))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref fields)
            if fields[0].field.as_deref() == Some("measurement_id")));
    }

    #[tokio::test]
    async fn measurement_binds_to_one_order() {
        let f = fixture();
        let c = customer(&f, "Ravi", "9000000001").await;
        let m = measurement(&f, c).await;
        let bound = OrderInputDto {
            measurement_id: Some(m),
            ..input(Some(c), dec!(10))
        };
        let first = f.uc.place(bound.clone()).await.unwrap().value;
        let err = f.uc.place(bound.clone()).await.unwrap_err();
        assert_eq!(err.kind(), "conflict");

        // Re-saving the owning order passes the guard.
        f.uc.update(first.id, bound).await.unwrap();
        assert_eq!(f.uc.get(first.id).await.unwrap().measurement_id(), Some(m));
    }

    #[tokio::test]
    async fn override_and_clear_status() {
        let f = fixture();
        let c = customer(&f, "Ravi", "9000000001").await;
        let order = f.uc.place(input(Some(c), dec!(10))).await.unwrap().value;

        let set = f
            .uc
            .set_status(order.id, StatusOverrideDto { status: Some(OrderStatus::Cancelled) })
            .await
            .unwrap();
        assert_eq!(set.value.status, EffectiveStatus::Manual(OrderStatus::Cancelled));

        let cleared = f
            .uc
            .set_status(order.id, StatusOverrideDto { status: None })
            .await
            .unwrap();
        assert_eq!(cleared.value.status, EffectiveStatus::Derived(OrderStatus::New));
    }

    #[tokio::test]
    async fn invoiced_order_changes_move_invoice_total() {
        let f = fixture();
        let c = customer(&f, "Ravi", "9000000001").await;
        let order = f.uc.place(input(Some(c), dec!(100))).await.unwrap().value;

        let invoice_id = f.invoices.next_id().await.unwrap();
        let at = Timestamp::new(Utc::now());
        f.uc.orders.assign_invoice(&[order.id], invoice_id, at).await.unwrap();
        f.invoices
            .save(&Invoice::open(invoice_id, Money::whole(100), at))
            .await
            .unwrap();

        f.uc.update(order.id, input(Some(c), dec!(150))).await.unwrap();
        let invoice = f.invoices.find_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.total(), Money::whole(150));

        f.uc.delete(order.id).await.unwrap();
        let invoice = f.invoices.find_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.total(), Money::ZERO);
    }

    #[tokio::test]
    async fn update_keeps_status_written_by_stage_progress() {
        let f = fixture();
        let c = customer(&f, "Ravi", "9000000001").await;
        let order = f.uc.place(input(Some(c), dec!(100))).await.unwrap().value;

        let row = OrderStage::new(
            f.uc.orders.next_stage_id().await.unwrap(),
            NewOrderStage {
                order_id: order.id,
                stage_id: PipelineStageId::new(1),
                assigned_vendor: None,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: None,
                note: String::new(),
            },
        )
        .unwrap();
        f.uc.orders.insert_stage(&row).await.unwrap();
        let mut started = row.clone();
        started.activate();
        f.uc.orders
            .save_progress(order.id, &[started], Timestamp::new(Utc::now()))
            .await
            .unwrap();

        let updated = f.uc.update(order.id, input(Some(c), dec!(120))).await.unwrap().value;
        assert_eq!(updated.amount, dec!(120.00));
        assert_eq!(updated.status, EffectiveStatus::Derived(OrderStatus::InProgress));
    }

    #[tokio::test]
    async fn search_by_phone_name_or_id() {
        let f = fixture();
        let ravi = customer(&f, "Ravi", "9000000001").await;
        let sita = customer(&f, "Sita", "9111111111").await;
        let first = f.uc.place(input(Some(ravi), dec!(10))).await.unwrap().value;
        f.uc.place(input(Some(sita), dec!(20))).await.unwrap();

        assert_eq!(f.uc.search("sit").await.unwrap().len(), 1);
        assert_eq!(f.uc.search("9111").await.unwrap()[0].customer_name, "Sita");
        let by_id = f.uc.search(&format!("#{}", first.id)).await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].amount, dec!(10.00));
        assert_eq!(f.uc.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_filters_by_customer() {
        let f = fixture();
        let ravi = customer(&f, "Ravi", "9000000001").await;
        let sita = customer(&f, "Sita", "9111111111").await;
        f.uc.place(input(Some(ravi), dec!(10))).await.unwrap();
        f.uc.place(input(Some(sita), dec!(20))).await.unwrap();

        let listed = f
            .uc
            .list(OrderQueryDto {
                customer_id: Some(sita),
                ..OrderQueryDto::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_name.as_deref(), Some("Sita"));
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let f = fixture();
        let err = f.uc.detail(OrderId::new(99)).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
