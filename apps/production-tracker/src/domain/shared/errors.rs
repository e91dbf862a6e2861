//! Domain errors for the production tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A uniqueness rule the store refused to break.
///
/// Each variant names the record that already holds the contested slot, so
/// callers can tell the user what to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conflict {
    /// Another customer already uses this phone number.
    DuplicatePhone {
        /// Customer holding the number.
        holder: u64,
    },
    /// Another order already references this measurement.
    MeasurementAlreadyBound {
        /// Measurement being bound.
        measurement: u64,
        /// Order holding the binding.
        holder: u64,
    },
    /// The order already has a row for this pipeline stage.
    DuplicateOrderStage {
        /// Order being staged.
        order: u64,
        /// Pipeline stage being added.
        stage: u64,
    },
    /// The order already belongs to an invoice.
    OrderAlreadyInvoiced {
        /// Order being invoiced.
        order: u64,
        /// Invoice holding the order.
        invoice: u64,
    },
    /// Another pipeline stage already uses this ordinal.
    DuplicateOrdinal {
        /// Contested ordinal.
        ordinal: u32,
        /// Stage holding the ordinal.
        holder: u64,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePhone { .. } => {
                write!(f, "This phone number is already registered to another customer.")
            }
            Self::MeasurementAlreadyBound {
                measurement,
                holder,
            } => write!(
                f,
                "Measurement #{measurement} is already used by order #{holder}."
            ),
            Self::DuplicateOrderStage { order, stage } => write!(
                f,
                "Order #{order} already has a row for pipeline stage #{stage}."
            ),
            Self::OrderAlreadyInvoiced { order, invoice } => {
                write!(f, "Order #{order} is already part of invoice #{invoice}.")
            }
            Self::DuplicateOrdinal { ordinal, holder } => write!(
                f,
                "Ordinal {ordinal} is already used by pipeline stage #{holder}."
            ),
        }
    }
}

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Business rule violation that is not tied to a single field.
    BusinessRuleViolation {
        /// Rule name or code.
        rule: String,
        /// Description of the violation.
        message: String,
    },

    /// Entity not found.
    NotFound {
        /// Entity type.
        entity_type: String,
        /// Entity identifier.
        id: String,
    },

    /// A uniqueness rule rejected the write.
    Conflict(Conflict),

    /// The backing store failed.
    Storage {
        /// Error message.
        message: String,
    },
}

impl DomainError {
    /// Shorthand for an `InvalidValue` error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::BusinessRuleViolation { rule, message } => {
                write!(f, "Business rule '{rule}' violated: {message}")
            }
            Self::NotFound { entity_type, id } => {
                write!(f, "{entity_type} not found: {id}")
            }
            Self::Conflict(conflict) => write!(f, "{conflict}"),
            Self::Storage { message } => write!(f, "Storage failure: {message}"),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<Conflict> for DomainError {
    fn from(conflict: Conflict) -> Self {
        Self::Conflict(conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_display() {
        let err = DomainError::invalid("amount", "cannot be negative");
        let msg = format!("{err}");
        assert!(msg.contains("amount"));
        assert!(msg.contains("negative"));
    }

    #[test]
    fn not_found_display() {
        let err = DomainError::not_found("Order", 42);
        assert_eq!(format!("{err}"), "Order not found: 42");
    }

    #[test]
    fn conflict_display_names_the_holder() {
        let err: DomainError = Conflict::MeasurementAlreadyBound {
            measurement: 7,
            holder: 3,
        }
        .into();
        let msg = format!("{err}");
        assert!(msg.contains("#7"));
        assert!(msg.contains("#3"));
    }

    #[test]
    fn conflict_serializes_with_kind_tag() {
        let json = serde_json::to_value(Conflict::DuplicateOrderStage { order: 5, stage: 2 })
            .unwrap();
        assert_eq!(json["kind"], "DUPLICATE_ORDER_STAGE");
        assert_eq!(json["order"], 5);
    }

    #[test]
    fn domain_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(DomainError::Storage {
            message: "lock poisoned".to_string(),
        });
        assert!(!err.to_string().is_empty());
    }
}
