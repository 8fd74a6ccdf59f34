//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate an application from a domain" or
//! "export the generated tree".

pub mod domain_service;
pub mod export_service;
pub mod generation_service;
pub mod progress;
pub mod state;

pub use domain_service::{DomainService, DomainSummary};
pub use export_service::{ExportService, ExportSummary};
pub use generation_service::{GenerationOptions, GenerationService};
pub use progress::{CancellationToken, NoProgress};
pub use state::GenerationState;
