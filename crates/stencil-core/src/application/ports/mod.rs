//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stencil-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ArtifactRenderer`: Artifact rendering
//!   - `ProgressSink`: Progress reporting
//!   - `Filesystem`: File operations
//!   - `DomainStore`: Saved configuration storage
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ArtifactRenderer, DomainStore, Filesystem, JunctionInput, PackageInput, ProgressSink,
    ProgressUpdate, RenderInput,
};

#[cfg(test)]
pub use output::{MockDomainStore, MockFilesystem, MockProgressSink};
