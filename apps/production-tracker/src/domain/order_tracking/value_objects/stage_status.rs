//! Status of one stage of an order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an order stage is in its own lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StageStatus {
    /// Added to the order, not started.
    #[default]
    New,
    /// Being worked on.
    #[serde(rename = "In-Progress")]
    InProgress,
    /// Work finished.
    Completed,
    /// Closed without further work.
    Closed,
    /// Cancelled by the shop or the customer.
    Cancelled,
    /// Abandoned part-way.
    Aborted,
}

impl StageStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::InProgress,
        Self::Completed,
        Self::Closed,
        Self::Cancelled,
        Self::Aborted,
    ];

    /// Returns true if the stage is being worked on.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns true if the stage's work is done.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::InProgress => write!(f, "In-Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Closed => write!(f, "Closed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_matches_display() {
        for status in StageStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn default_is_new() {
        assert_eq!(StageStatus::default(), StageStatus::New);
    }
}
