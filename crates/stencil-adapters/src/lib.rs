//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod loader;
pub mod presets;
pub mod progress;
pub mod renderer;
pub mod store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use loader::{DocumentFormat, LoadError};
pub use progress::{ChannelProgress, PollingProgress};
pub use renderer::StackRenderer;
pub use store::InMemoryDomainStore;
