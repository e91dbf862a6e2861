//! Order status and where it comes from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall status of an order.
///
/// `New` is only ever held by an order that has not had its stages
/// inspected yet. The derived statuses are `Pending`, `InProgress` and
/// `Completed`; the rest can only be set by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, stages not yet inspected.
    New,
    /// Stages exist but none is being worked on.
    Pending,
    /// At least one stage is being worked on.
    #[serde(rename = "In-Progress")]
    InProgress,
    /// Every stage is completed.
    Completed,
    /// Handed over and closed.
    Closed,
    /// Cancelled.
    Cancelled,
    /// Abandoned.
    Aborted,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Closed,
        Self::Cancelled,
        Self::Aborted,
    ];
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "In-Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Closed => write!(f, "Closed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}

/// The status an order reports, tagged with its source.
///
/// Serializes as `{"source": "DERIVED", "status": "Pending"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveStatus {
    /// Computed from the order's stages.
    Derived(OrderStatus),
    /// Set by hand, overriding the derived status.
    Manual(OrderStatus),
}

impl EffectiveStatus {
    /// The status value regardless of source.
    #[must_use]
    pub const fn status(self) -> OrderStatus {
        match self {
            Self::Derived(s) | Self::Manual(s) => s,
        }
    }

    /// Returns true if this is a manual override.
    #[must_use]
    pub const fn is_manual(self) -> bool {
        matches!(self, Self::Manual(_))
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Derived(s) => write!(f, "{s}"),
            Self::Manual(s) => write!(f, "{s} (manual)"),
        }
    }
}
