//! Manage Invoices Use Case
//!
//! An invoice's total follows the amounts of the orders on it. Membership
//! changes go through the order store's conditional writes, so an order can
//! never land on two invoices, and every total change is a single write in
//! the invoice store, so concurrent changes all land.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rust_decimal::Decimal;

use super::{guarded, publish};
use crate::application::dto::{InvoiceAmountsDto, InvoiceDto, InvoiceOrdersDto};
use crate::application::ports::{Clock, EventPublisherPort};
use crate::application::{Confirmed, TrackerError};
use crate::domain::invoicing::{Invoice, InvoiceAmounts, InvoiceRepository};
use crate::domain::order_tracking::{Order, OrderFilter, OrderRepository};
use crate::domain::shared::{DomainError, InvoiceId, Money, OrderId, Timestamp};
use crate::observability::record_invoice_created;

/// Use case for billing orders.
pub struct ManageInvoicesUseCase {
    invoices: Arc<dyn InvoiceRepository>,
    orders: Arc<dyn OrderRepository>,
    publisher: Arc<dyn EventPublisherPort>,
    clock: Arc<dyn Clock>,
}

impl ManageInvoicesUseCase {
    /// Create a new `ManageInvoicesUseCase`.
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        orders: Arc<dyn OrderRepository>,
        publisher: Arc<dyn EventPublisherPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invoices,
            orders,
            publisher,
            clock,
        }
    }

    /// Raise an invoice over the picked orders.
    ///
    /// Every order must be uninvoiced; otherwise nothing is written.
    pub async fn create(
        &self,
        input: InvoiceOrdersDto,
    ) -> Result<Confirmed<InvoiceDto>, TrackerError> {
        let ids = picked(input)?;
        let at = self.clock.now();
        let id = self.invoices.next_id().await?;

        let mut assigned = self
            .orders
            .assign_invoice(&ids, id, at)
            .await
            .map_err(guarded)?;

        let invoice = match self.open(id, &assigned, at).await {
            Ok(invoice) => invoice,
            Err(err) => {
                let released = self.orders.release_all(id, at).await?;
                tracing::warn!(
                    invoice_id = %id,
                    released = released.len(),
                    error = %err,
                    "Invoice creation rolled back"
                );
                return Err(err);
            }
        };

        tracing::info!(
            invoice_id = %id,
            orders = ids.len(),
            total = %invoice.total(),
            "Invoice created"
        );
        record_invoice_created(ids.len());
        publish(
            self.publisher.as_ref(),
            assigned.iter_mut().flat_map(Order::drain_events).collect(),
        )
        .await;

        let message = format!("Invoice #{id} created for {} order(s).", ids.len());
        Ok(Confirmed::new(InvoiceDto::from_invoice(&invoice, ids), message))
    }

    /// Put more orders on an existing invoice.
    pub async fn add_orders(
        &self,
        id: InvoiceId,
        input: InvoiceOrdersDto,
    ) -> Result<Confirmed<InvoiceDto>, TrackerError> {
        self.invoice(id).await?;
        let ids = picked(input)?;
        let at = self.clock.now();

        let mut assigned = self
            .orders
            .assign_invoice(&ids, id, at)
            .await
            .map_err(guarded)?;
        let invoice = match self.add_to_total(id, &assigned).await {
            Ok(invoice) => invoice,
            Err(err) => {
                self.unassign(id, &assigned, at).await;
                return Err(err);
            }
        };

        tracing::info!(invoice_id = %id, added = ids.len(), total = %invoice.total(), "Orders added to invoice");
        publish(
            self.publisher.as_ref(),
            assigned.iter_mut().flat_map(Order::drain_events).collect(),
        )
        .await;

        let dto = self.describe(&invoice).await?;
        Ok(Confirmed::new(
            dto,
            format!("{} order(s) added to invoice #{id}.", ids.len()),
        ))
    }

    /// Take one order off an invoice.
    pub async fn remove_order(
        &self,
        id: InvoiceId,
        order_id: OrderId,
    ) -> Result<Confirmed<InvoiceDto>, TrackerError> {
        self.invoice(id).await?;
        let mut released = self
            .orders
            .release_invoice(order_id, id, self.clock.now())
            .await?;
        let invoice = self
            .invoices
            .adjust_total(id, Money::ZERO, released.amount())
            .await?;

        tracing::info!(invoice_id = %id, order_id = %order_id, total = %invoice.total(), "Order removed from invoice");
        publish(self.publisher.as_ref(), released.drain_events()).await;

        let dto = self.describe(&invoice).await?;
        Ok(Confirmed::new(
            dto,
            format!("Order #{order_id} removed from invoice #{id}."),
        ))
    }

    /// Edit the total, the paid amount and the payment day.
    pub async fn update_amounts(
        &self,
        id: InvoiceId,
        input: InvoiceAmountsDto,
    ) -> Result<Confirmed<InvoiceDto>, TrackerError> {
        self.invoice(id).await?;
        let total = amount_field("total", input.total);
        let paid = amount_field("paid", input.paid);
        let (total, paid) = match (total, paid) {
            (Ok(total), Ok(paid)) => (total, paid),
            (total, paid) => {
                let errors = [total.err(), paid.err()].into_iter().flatten().collect::<Vec<_>>();
                return Err(errors.into());
            }
        };
        let invoice = self
            .invoices
            .revise(
                id,
                InvoiceAmounts {
                    total,
                    paid,
                    paid_on: input.paid_on,
                },
            )
            .await?;

        tracing::info!(
            invoice_id = %id,
            total = %invoice.total(),
            paid = %invoice.paid(),
            settled = invoice.is_settled(),
            "Invoice amounts updated"
        );
        let dto = self.describe(&invoice).await?;
        Ok(Confirmed::new(dto, format!("Invoice #{id} updated successfully.")))
    }

    /// Delete an invoice, returning its orders to uninvoiced.
    pub async fn delete(&self, id: InvoiceId) -> Result<Confirmed<Vec<OrderId>>, TrackerError> {
        self.invoice(id).await?;
        let released = self.orders.release_all(id, self.clock.now()).await?;
        self.invoices.delete(id).await?;

        tracing::info!(invoice_id = %id, released = released.len(), "Invoice deleted");
        Ok(Confirmed::new(released, format!("Invoice #{id} deleted.")))
    }

    /// One invoice with its orders.
    pub async fn get(&self, id: InvoiceId) -> Result<InvoiceDto, TrackerError> {
        let invoice = self.invoice(id).await?;
        self.describe(&invoice).await
    }

    /// Every invoice with its orders.
    pub async fn list(&self) -> Result<Vec<InvoiceDto>, TrackerError> {
        let invoices = self.invoices.list().await?;
        let mut members: BTreeMap<InvoiceId, Vec<OrderId>> = BTreeMap::new();
        for order in self.orders.list(OrderFilter::default()).await? {
            if let Some(invoice_id) = order.invoice_id() {
                members.entry(invoice_id).or_default().push(order.id());
            }
        }
        Ok(invoices
            .iter()
            .map(|invoice| {
                let mut ids = members.remove(&invoice.id()).unwrap_or_default();
                ids.sort_unstable();
                InvoiceDto::from_invoice(invoice, ids)
            })
            .collect())
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn open(
        &self,
        id: InvoiceId,
        orders: &[Order],
        at: Timestamp,
    ) -> Result<Invoice, TrackerError> {
        let total = Money::total(orders.iter().map(Order::amount))?;
        let invoice = Invoice::open(id, total, at);
        self.invoices.save(&invoice).await?;
        Ok(invoice)
    }

    async fn add_to_total(&self, id: InvoiceId, orders: &[Order]) -> Result<Invoice, TrackerError> {
        let added = Money::total(orders.iter().map(Order::amount))?;
        Ok(self.invoices.adjust_total(id, added, Money::ZERO).await?)
    }

    /// Take freshly assigned orders back off an invoice whose total could
    /// not be moved.
    async fn unassign(&self, id: InvoiceId, orders: &[Order], at: Timestamp) {
        for order in orders {
            if let Err(err) = self.orders.release_invoice(order.id(), id, at).await {
                tracing::error!(
                    invoice_id = %id,
                    order_id = %order.id(),
                    error = %err,
                    "Failed to release order after invoice update failed"
                );
            }
        }
    }

    async fn invoice(&self, id: InvoiceId) -> Result<Invoice, TrackerError> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Invoice", id))
    }

    async fn describe(&self, invoice: &Invoice) -> Result<InvoiceDto, TrackerError> {
        let ids = self
            .orders
            .list_by_invoice(invoice.id())
            .await?
            .iter()
            .map(Order::id)
            .collect();
        Ok(InvoiceDto::from_invoice(invoice, ids))
    }
}

fn picked(input: InvoiceOrdersDto) -> Result<Vec<OrderId>, TrackerError> {
    let ids: BTreeSet<OrderId> = input.order_ids.into_iter().collect();
    if ids.is_empty() {
        return Err(TrackerError::invalid("order_ids", "Select at least one order."));
    }
    Ok(ids.into_iter().collect())
}

fn amount_field(field: &str, value: Decimal) -> Result<Money, DomainError> {
    Money::from_major(value).map_err(|err| match err {
        DomainError::InvalidValue { message, .. } => DomainError::invalid(field, message),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FixedClock, NoOpEventPublisher};
    use crate::domain::order_tracking::OrderDetails;
    use crate::domain::shared::CustomerId;
    use crate::infrastructure::persistence::{InMemoryInvoiceRepository, InMemoryOrderRepository};
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    struct Fixture {
        uc: ManageInvoicesUseCase,
        orders: Arc<InMemoryOrderRepository>,
    }

    /// Invoice store that yields before every read, so concurrent calls
    /// interleave between their read and their write.
    struct YieldingInvoices(InMemoryInvoiceRepository);

    #[async_trait]
    impl InvoiceRepository for YieldingInvoices {
        async fn next_id(&self) -> Result<InvoiceId, DomainError> {
            self.0.next_id().await
        }

        async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
            self.0.save(invoice).await
        }

        async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
            tokio::task::yield_now().await;
            self.0.find_by_id(id).await
        }

        async fn adjust_total(
            &self,
            id: InvoiceId,
            added: Money,
            removed: Money,
        ) -> Result<Invoice, DomainError> {
            self.0.adjust_total(id, added, removed).await
        }

        async fn revise(
            &self,
            id: InvoiceId,
            amounts: InvoiceAmounts,
        ) -> Result<Invoice, DomainError> {
            self.0.revise(id, amounts).await
        }

        async fn list(&self) -> Result<Vec<Invoice>, DomainError> {
            self.0.list().await
        }

        async fn delete(&self, id: InvoiceId) -> Result<(), DomainError> {
            self.0.delete(id).await
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemoryInvoiceRepository::new()))
    }

    fn fixture_with(invoices: Arc<dyn InvoiceRepository>) -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let uc = ManageInvoicesUseCase::new(
            invoices,
            orders.clone(),
            Arc::new(NoOpEventPublisher),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 5, 20, 10, 0, 0).unwrap())),
        );
        Fixture { uc, orders }
    }

    async fn order(f: &Fixture, amount: u32) -> OrderId {
        let id = f.orders.next_id().await.unwrap();
        let order = Order::place(
            id,
            OrderDetails {
                customer_id: CustomerId::new(1),
                placed_on: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                completion_date: None,
                specifications: String::new(),
                amount: Money::whole(amount),
                measurement_id: None,
            },
            Timestamp::new(Utc::now()),
        )
        .unwrap();
        f.orders.insert(&order).await.unwrap();
        id
    }

    fn pick(ids: &[OrderId]) -> InvoiceOrdersDto {
        InvoiceOrdersDto {
            order_ids: ids.to_vec(),
        }
    }

    #[tokio::test]
    async fn create_totals_picked_orders() {
        let f = fixture();
        let a = order(&f, 1200).await;
        let b = order(&f, 800).await;
        let created = f.uc.create(pick(&[a, b])).await.unwrap();
        assert_eq!(created.value.total, dec!(2000.00));
        assert_eq!(created.value.order_ids, vec![a, b]);
        assert!(!created.value.settled);
    }

    #[tokio::test]
    async fn create_requires_an_order() {
        let f = fixture();
        let err = f.uc.create(pick(&[])).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn invoiced_order_rejects_whole_request() {
        let f = fixture();
        let a = order(&f, 100).await;
        let b = order(&f, 200).await;
        f.uc.create(pick(&[a])).await.unwrap();

        let err = f.uc.create(pick(&[a, b])).await.unwrap_err();
        assert_eq!(err.kind(), "conflict");
        let b_order = f.orders.find_by_id(b).await.unwrap().unwrap();
        assert_eq!(b_order.invoice_id(), None);
        assert_eq!(f.uc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_and_remove_orders_move_total() {
        let f = fixture();
        let a = order(&f, 100).await;
        let b = order(&f, 250).await;
        let invoice = f.uc.create(pick(&[a])).await.unwrap().value;

        let added = f.uc.add_orders(invoice.id, pick(&[b])).await.unwrap().value;
        assert_eq!(added.total, dec!(350.00));

        let removed = f.uc.remove_order(invoice.id, a).await.unwrap().value;
        assert_eq!(removed.total, dec!(250.00));
        assert_eq!(removed.order_ids, vec![b]);

        let err = f.uc.remove_order(invoice.id, a).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn concurrent_additions_all_reach_the_total() {
        let f = fixture_with(Arc::new(YieldingInvoices(InMemoryInvoiceRepository::new())));
        let a = order(&f, 100).await;
        let b = order(&f, 200).await;
        let c = order(&f, 300).await;
        let invoice = f.uc.create(pick(&[a])).await.unwrap().value;

        let (first, second) = tokio::join!(
            f.uc.add_orders(invoice.id, pick(&[b])),
            f.uc.add_orders(invoice.id, pick(&[c])),
        );
        first.unwrap();
        second.unwrap();

        let stored = f.uc.get(invoice.id).await.unwrap();
        assert_eq!(stored.order_ids, vec![a, b, c]);
        assert_eq!(stored.total, dec!(600.00));
    }

    #[tokio::test]
    async fn concurrent_removals_all_leave_the_total() {
        let f = fixture_with(Arc::new(YieldingInvoices(InMemoryInvoiceRepository::new())));
        let a = order(&f, 100).await;
        let b = order(&f, 200).await;
        let c = order(&f, 300).await;
        let invoice = f.uc.create(pick(&[a, b, c])).await.unwrap().value;

        let (first, second) = tokio::join!(
            f.uc.remove_order(invoice.id, a),
            f.uc.remove_order(invoice.id, c),
        );
        first.unwrap();
        second.unwrap();

        let stored = f.uc.get(invoice.id).await.unwrap();
        assert_eq!(stored.order_ids, vec![b]);
        assert_eq!(stored.total, dec!(200.00));
    }

    #[tokio::test]
    async fn paid_cannot_be_negative() {
        let f = fixture();
        let a = order(&f, 100).await;
        let invoice = f.uc.create(pick(&[a])).await.unwrap().value;
        let err = f
            .uc
            .update_amounts(
                invoice.id,
                InvoiceAmountsDto {
                    total: dec!(100),
                    paid: dec!(-5),
                    paid_on: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref fields)
            if fields[0].field.as_deref() == Some("paid")));
    }

    #[tokio::test]
    async fn paying_in_full_settles() {
        let f = fixture();
        let a = order(&f, 100).await;
        let invoice = f.uc.create(pick(&[a])).await.unwrap().value;
        let updated = f
            .uc
            .update_amounts(
                invoice.id,
                InvoiceAmountsDto {
                    total: dec!(100),
                    paid: dec!(100),
                    paid_on: NaiveDate::from_ymd_opt(2026, 5, 21),
                },
            )
            .await
            .unwrap()
            .value;
        assert!(updated.settled);
        assert_eq!(updated.balance, dec!(0.00));
    }

    #[tokio::test]
    async fn delete_releases_orders() {
        let f = fixture();
        let a = order(&f, 100).await;
        let invoice = f.uc.create(pick(&[a])).await.unwrap().value;
        let deleted = f.uc.delete(invoice.id).await.unwrap();
        assert_eq!(deleted.value, vec![a]);
        assert_eq!(f.orders.find_by_id(a).await.unwrap().unwrap().invoice_id(), None);
        assert_eq!(f.uc.get(invoice.id).await.unwrap_err().kind(), "not_found");

        // The released order can be invoiced again.
        f.uc.create(pick(&[a])).await.unwrap();
    }
}
