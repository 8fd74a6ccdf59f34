//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stencil-adapters` crate provides implementations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    ArtifactFile, ArtifactKind, DomainConfiguration, DomainError, Entity, EntityRelations,
    Junction, OutputLayout, TypeRegistry,
};
use crate::error::StencilResult;

/// Everything a renderer sees when rendering one entity.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub config: &'a DomainConfiguration,
    pub entity: &'a Entity,
    /// Foreign keys, navigation attributes and junctions of `entity`.
    pub relations: &'a EntityRelations,
    pub registry: &'a TypeRegistry,
    pub layout: &'a OutputLayout,
}

/// Everything a renderer sees when rendering one junction table.
#[derive(Debug, Clone, Copy)]
pub struct JunctionInput<'a> {
    pub config: &'a DomainConfiguration,
    pub junction: &'a Junction,
    pub registry: &'a TypeRegistry,
    pub layout: &'a OutputLayout,
}

/// Everything a renderer sees when rendering the shared package modules.
#[derive(Debug, Clone, Copy)]
pub struct PackageInput<'a> {
    pub config: &'a DomainConfiguration,
    /// Entities whose route sets were generated, in configuration order.
    pub routed: &'a [&'a Entity],
    pub junctions: &'a [Junction],
    pub registry: &'a TypeRegistry,
    pub layout: &'a OutputLayout,
}

/// Port for artifact rendering (the template engine).
///
/// Implemented by:
/// - `stencil_adapters::renderer::StackRenderer` (Python backend + React UI)
///
/// ## Contract
///
/// - Pure and byte-deterministic: same input, same output
/// - Paths come from `input.layout`, never invented by the renderer
/// - A failure is returned, never panicked; the orchestrator still guards
///   against panics at the per-artifact boundary
pub trait ArtifactRenderer: Send + Sync {
    /// Render one artifact kind for one entity. The first file is primary.
    fn render(
        &self,
        input: &RenderInput<'_>,
        kind: ArtifactKind,
    ) -> Result<Vec<ArtifactFile>, DomainError>;

    /// Render the join-table model of a many-to-many relationship.
    fn render_junction(&self, input: &JunctionInput<'_>) -> Result<ArtifactFile, DomainError>;

    /// Render the modules every entity artifact imports from: the database
    /// session and the application entry point.
    fn render_package(&self, input: &PackageInput<'_>) -> Result<Vec<ArtifactFile>, DomainError>;
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Percentage, 0-100.
    pub progress: u8,
    pub current_step: String,
    pub files_generated: usize,
    pub step: usize,
    pub total_steps: usize,
}

/// Port for progress reporting.
///
/// Implemented by:
/// - `stencil_adapters::progress::ChannelProgress` (subscribe)
/// - `stencil_adapters::progress::PollingProgress` (latest snapshot)
///
/// Updates arrive in step order; a sink never sees a step regress.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressSink: Send + Sync {
    fn publish(&self, update: &ProgressUpdate);
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;
}

/// Port for saved domain configurations.
///
/// Implemented by:
/// - `stencil_adapters::store::InMemoryDomainStore` (built-in presets)
#[cfg_attr(test, mockall::automock)]
pub trait DomainStore: Send + Sync {
    /// All stored configurations, ordered by name.
    fn list(&self) -> StencilResult<Vec<DomainConfiguration>>;

    /// A configuration by name.
    fn get(&self, name: &str) -> StencilResult<DomainConfiguration>;

    /// Insert or replace a configuration (keyed by name).
    fn insert(&self, config: DomainConfiguration) -> StencilResult<()>;

    /// Remove a configuration by name.
    fn remove(&self, name: &str) -> StencilResult<()>;
}
