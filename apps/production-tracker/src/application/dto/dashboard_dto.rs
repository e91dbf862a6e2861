//! Dashboard DTO

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderDto;

/// Shop-wide counts and the most recent orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDto {
    /// Every order.
    pub total_orders: usize,
    /// Orders whose effective status is `Pending`.
    pub pending_orders: usize,
    /// Orders whose effective status is `In-Progress`.
    pub in_progress_orders: usize,
    /// Orders whose effective status is `Completed`.
    pub completed_orders: usize,
    /// Newest orders by placed-on day.
    pub recent_orders: Vec<OrderDto>,
    /// Vendors on file.
    pub total_vendors: usize,
    /// Customers on file.
    pub total_customers: usize,
    /// Sum of invoice totals in major units.
    pub total_invoiced: Decimal,
    /// Invoices whose paid amount covers the total.
    pub settled_invoices: usize,
    /// Invoices with a balance outstanding.
    pub unsettled_invoices: usize,
    /// Stage rows currently in progress.
    pub stages_in_progress: usize,
}
