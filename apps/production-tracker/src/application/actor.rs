//! The caller behind a request.

use super::errors::TrackerError;

/// Identity of the caller plus whether it holds admin rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    name: String,
    privileged: bool,
}

impl Actor {
    /// Create an actor.
    pub fn new(name: impl Into<String>, privileged: bool) -> Self {
        Self {
            name: name.into(),
            privileged,
        }
    }

    /// Staff member without admin rights.
    pub fn staff(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Admin.
    pub fn admin(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the actor holds admin rights.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Fail with `Forbidden` unless the actor holds admin rights.
    pub fn require_privilege(&self, action: &str) -> Result<(), TrackerError> {
        if self.privileged {
            Ok(())
        } else {
            tracing::warn!(actor = %self.name, action, "Privileged action refused");
            Err(TrackerError::Forbidden {
                action: action.to_string(),
            })
        }
    }
}
