//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::GenerationState;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The orchestrator was asked to make a transition its state machine
    /// does not allow.
    #[error("Illegal generation state transition: {from} -> {to}")]
    InvalidTransition {
        from: GenerationState,
        to: GenerationState,
    },

    /// Rendering infrastructure failed (not a single artifact).
    #[error("Rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Domain store error")]
    StoreLockError,

    /// No stored configuration with this name.
    #[error("No domain configuration named '{name}'")]
    DomainNotFound { name: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Output root already exists.
    #[error("Output already exists at {path}")]
    OutputExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The domain store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::DomainNotFound { .. } => vec![
                "Try: stencil presets to see the built-in domains".into(),
            ],
            Self::OutputExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Or choose a different output directory with --output".into(),
            ],
            Self::ValidationFailed(_) => vec![
                "Run: stencil validate <CONFIG> to see every issue".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DomainNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::InvalidTransition { .. } => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::OutputExists { .. } => ErrorCategory::Validation,
            Self::RenderingFailed { .. } => ErrorCategory::Internal,
        }
    }
}
