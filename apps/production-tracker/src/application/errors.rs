//! Application Errors
//!
//! The error taxonomy every use case reports: validation, conflict, not
//! found, forbidden and storage failures.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Conflict, DomainError};

/// One validation message, optionally tied to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field the message belongs to; `None` for a form-level message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// User-facing message.
    pub message: String,
}

impl FieldError {
    /// Message tied to a field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Form-level message.
    pub fn non_field(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Errors returned by use cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// Input failed validation. Nothing was written.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// A uniqueness rule rejected the write. Nothing was written.
    #[error("{0}")]
    Conflict(Conflict),

    /// A referenced record does not exist.
    #[error("{entity} #{id} not found")]
    NotFound {
        /// Entity type.
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// The actor may not perform the action.
    #[error("{action} requires a privileged user")]
    Forbidden {
        /// Action attempted.
        action: String,
    },

    /// The store failed.
    #[error("storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },
}

impl TrackerError {
    /// Single field-level validation error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::field(field, message)])
    }

    /// Single form-level validation error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::non_field(message)])
    }

    /// Not-found error.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Stable lower-case kind label, used in logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Forbidden { .. } => "forbidden",
            Self::Storage { .. } => "storage",
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) => format!("{field}: {}", e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<DomainError> for TrackerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => Self::invalid(field, message),
            DomainError::BusinessRuleViolation { message, .. } => Self::rejected(message),
            DomainError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            DomainError::Conflict(conflict) => Self::Conflict(conflict),
            DomainError::Storage { message } => Self::Storage { message },
        }
    }
}

impl From<Vec<DomainError>> for TrackerError {
    fn from(errors: Vec<DomainError>) -> Self {
        let mut fields = Vec::with_capacity(errors.len());
        for err in errors {
            match Self::from(err) {
                Self::Validation(mut more) => fields.append(&mut more),
                other => return other,
            }
        }
        Self::Validation(fields)
    }
}

/// A successful write together with its user-facing confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed<T> {
    /// What was written.
    pub value: T,
    /// Confirmation message.
    pub message: String,
}

impl<T> Confirmed<T> {
    /// Pair a value with its confirmation message.
    pub fn new(value: T, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }

    /// Transform the value, keeping the message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Confirmed<U> {
        Confirmed {
            value: f(self.value),
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_field_error_becomes_validation() {
        let err: TrackerError = DomainError::invalid("email", "Enter a valid email address.").into();
        assert_eq!(
            err,
            TrackerError::Validation(vec![FieldError::field(
                "email",
                "Enter a valid email address."
            )])
        );
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn rule_violation_is_a_form_level_message() {
        let err: TrackerError = DomainError::BusinessRuleViolation {
            rule: "INVOICE_MEMBERSHIP".to_string(),
            message: "Order #3 is not part of invoice #1.".to_string(),
        }
        .into();
        let TrackerError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, None);
    }

    #[test]
    fn field_errors_are_collected() {
        let err: TrackerError = vec![
            DomainError::invalid("name", "This field is required."),
            DomainError::invalid("email", "This field is required."),
        ]
        .into();
        let TrackerError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn conflict_keeps_user_message() {
        let err: TrackerError = DomainError::Conflict(Conflict::DuplicatePhone { holder: 4 }).into();
        assert_eq!(
            err.to_string(),
            "This phone number is already registered to another customer."
        );
    }

    #[test]
    fn confirmed_map_keeps_message() {
        let confirmed = Confirmed::new(2, "saved").map(|n| n * 10);
        assert_eq!(confirmed.value, 20);
        assert_eq!(confirmed.message, "saved");
    }
}
