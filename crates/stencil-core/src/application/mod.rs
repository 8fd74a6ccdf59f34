//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, ExportService, DomainService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CancellationToken, DomainService, DomainSummary, ExportService, ExportSummary,
    GenerationOptions, GenerationService, GenerationState, NoProgress,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ArtifactRenderer, DomainStore, Filesystem, ProgressSink, ProgressUpdate};

pub use error::ApplicationError;
