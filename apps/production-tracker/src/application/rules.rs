//! Shop-wide limits applied by the use cases.

use crate::domain::shared::Money;

/// Limits and display settings taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRules {
    /// ISO currency code amounts are entered in.
    pub currency: String,
    /// Largest amount a single order may carry.
    pub max_order_amount: Money,
    /// Number of orders shown in the dashboard's recent list.
    pub recent_orders: usize,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            max_order_amount: Money::whole(1_000_000),
            recent_orders: 5,
        }
    }
}
