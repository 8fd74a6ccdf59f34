//! The generation state machine.
//!
//! ```text
//! Idle ─► Validating ─┬─► Blocked ─► Failed
//!                     └─► Resolving ─► Rendering ─┬─► Assembling ─► Completed
//!                                                 └─► Cancelled
//! ```

use std::fmt;

use serde::Serialize;

use crate::application::ApplicationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Idle,
    Validating,
    Blocked,
    Resolving,
    Rendering,
    Assembling,
    Completed,
    Failed,
    Cancelled,
}

impl GenerationState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Blocked => "blocked",
            Self::Resolving => "resolving",
            Self::Rendering => "rendering",
            Self::Assembling => "assembling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether `self → next` is an edge of the state machine.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Validating)
                | (Self::Validating, Self::Blocked)
                | (Self::Validating, Self::Resolving)
                | (Self::Blocked, Self::Failed)
                | (Self::Resolving, Self::Rendering)
                | (Self::Rendering, Self::Assembling)
                | (Self::Rendering, Self::Cancelled)
                | (Self::Assembling, Self::Completed)
        )
    }

    /// Move to `next`, rejecting edges the machine does not have.
    pub fn transition(&mut self, next: Self) -> Result<(), ApplicationError> {
        if !self.can_transition_to(next) {
            return Err(ApplicationError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
