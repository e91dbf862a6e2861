//! Shop settings: currency, order limits and dashboard size.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::application::BusinessRules;
use crate::domain::shared::Money;

use super::ConfigError;

/// Business configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// ISO 4217 code amounts are entered in.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Largest order amount accepted, in major units.
    #[serde(default = "default_max_order_amount")]
    pub max_order_amount: Decimal,
    /// Orders listed on the dashboard.
    #[serde(default = "default_recent_orders")]
    pub recent_orders: usize,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            max_order_amount: default_max_order_amount(),
            recent_orders: default_recent_orders(),
        }
    }
}

impl BusinessConfig {
    /// Convert into the rules the use cases apply.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the maximum amount cannot be held in
    /// minor units.
    pub fn to_rules(&self) -> Result<BusinessRules, ConfigError> {
        let max_order_amount = Money::from_major(self.max_order_amount).map_err(|e| {
            ConfigError::ValidationError(format!("business.max_order_amount: {e}"))
        })?;
        Ok(BusinessRules {
            currency: self.currency.clone(),
            max_order_amount,
            recent_orders: self.recent_orders,
        })
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_max_order_amount() -> Decimal {
    dec!(1000000)
}

const fn default_recent_orders() -> usize {
    5
}
