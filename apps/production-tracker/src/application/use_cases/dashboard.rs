//! Dashboard Use Case

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::dto::{DashboardDto, OrderDto};
use crate::application::{BusinessRules, TrackerError};
use crate::domain::customer_registry::CustomerRepository;
use crate::domain::invoicing::{Invoice, InvoiceRepository};
use crate::domain::order_tracking::{OrderFilter, OrderRepository, OrderStatus, StageStatus};
use crate::domain::production_catalog::VendorRepository;
use crate::domain::shared::Money;

/// Use case for the shop-wide summary.
pub struct DashboardUseCase {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
    vendors: Arc<dyn VendorRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    rules: BusinessRules,
}

impl DashboardUseCase {
    /// Create a new `DashboardUseCase`.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerRepository>,
        vendors: Arc<dyn VendorRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        rules: BusinessRules,
    ) -> Self {
        Self {
            orders,
            customers,
            vendors,
            invoices,
            rules,
        }
    }

    /// Counts by effective status, recent orders and billing totals.
    pub async fn summary(&self) -> Result<DashboardDto, TrackerError> {
        let orders = self.orders.list(OrderFilter::default()).await?;
        let invoices = self.invoices.list().await?;

        let mut by_status: HashMap<OrderStatus, usize> = HashMap::new();
        for order in &orders {
            *by_status.entry(order.status().status()).or_default() += 1;
        }
        let count = |status| by_status.get(&status).copied().unwrap_or_default();

        let names: HashMap<_, _> = self
            .customers
            .list()
            .await?
            .into_iter()
            .map(|c| (c.id(), c.name().to_string()))
            .collect();
        let recent_orders = orders
            .iter()
            .take(self.rules.recent_orders)
            .map(|o| OrderDto::from_order(o, names.get(&o.customer_id()).map(String::as_str)))
            .collect();

        let settled = invoices.iter().filter(|i| i.is_settled()).count();

        Ok(DashboardDto {
            total_orders: orders.len(),
            pending_orders: count(OrderStatus::Pending),
            in_progress_orders: count(OrderStatus::InProgress),
            completed_orders: count(OrderStatus::Completed),
            recent_orders,
            total_vendors: self.vendors.list().await?.len(),
            total_customers: self.customers.count().await?,
            total_invoiced: Money::total(invoices.iter().map(Invoice::total))?.to_major(),
            settled_invoices: settled,
            unsettled_invoices: invoices.len() - settled,
            stages_in_progress: self.orders.count_stages(StageStatus::InProgress).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoicing::InvoiceAmounts;
    use crate::domain::order_tracking::{Order, OrderDetails};
    use crate::domain::shared::{CustomerId, InvoiceId, OrderId, Timestamp};
    use crate::infrastructure::persistence::{
        InMemoryCustomerRepository, InMemoryInvoiceRepository, InMemoryOrderRepository,
        InMemoryVendorRepository,
    };
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    async fn place(orders: &InMemoryOrderRepository, day: u32, status: Option<OrderStatus>) -> OrderId {
        let id = orders.next_id().await.unwrap();
        let mut order = Order::place(
            id,
            OrderDetails {
                customer_id: CustomerId::new(1),
                placed_on: NaiveDate::from_ymd_opt(2026, 6, day).unwrap(),
                completion_date: None,
                specifications: String::new(),
                amount: Money::whole(100),
                measurement_id: None,
            },
            Timestamp::new(Utc::now()),
        )
        .unwrap();
        if let Some(status) = status {
            order.override_status(status, Timestamp::new(Utc::now()));
        }
        orders.insert(&order).await.unwrap();
        id
    }

    #[tokio::test]
    async fn summary_counts_effective_statuses() {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());
        let newest = place(&orders, 9, Some(OrderStatus::Pending)).await;
        place(&orders, 3, Some(OrderStatus::Completed)).await;
        place(&orders, 5, None).await;

        let at = Timestamp::new(Utc::now());
        let mut paid = Invoice::open(InvoiceId::new(1), Money::whole(100), at);
        paid.revise(InvoiceAmounts {
            total: Money::whole(100),
            paid: Money::whole(100),
            paid_on: None,
        });
        invoices.save(&paid).await.unwrap();
        invoices
            .save(&Invoice::open(InvoiceId::new(2), Money::whole(50), at))
            .await
            .unwrap();

        let uc = DashboardUseCase::new(
            orders,
            Arc::new(InMemoryCustomerRepository::new()),
            Arc::new(InMemoryVendorRepository::new()),
            invoices,
            BusinessRules {
                recent_orders: 2,
                ..BusinessRules::default()
            },
        );
        let summary = uc.summary().await.unwrap();

        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(summary.completed_orders, 1);
        assert_eq!(summary.in_progress_orders, 0);
        assert_eq!(summary.recent_orders.len(), 2);
        assert_eq!(summary.recent_orders[0].id, newest);
        assert_eq!(summary.total_invoiced, dec!(150.00));
        assert_eq!(summary.settled_invoices, 1);
        assert_eq!(summary.unsettled_invoices, 1);
        assert_eq!(summary.stages_in_progress, 0);
    }
}
