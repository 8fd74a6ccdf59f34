//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the template
//! builder's code generation engine: it turns a declarative
//! [`DomainConfiguration`](domain::DomainConfiguration) into a set of
//! generated source artifacts.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService, ExportService, ...) │
//! │   validate → resolve → render → assemble│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (ArtifactRenderer, Filesystem, Store,   │
//! │  ProgressSink)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stencil-adapters (Infrastructure)    │
//! │ (StackRenderer, LocalFilesystem, ...)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Configuration, Registry, Validator,    │
//! │  Resolver, FileTree)                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::prelude::*;
//!
//! let service = GenerationService::new(Box::new(renderer));
//! let result = service.generate(&config);
//! assert_eq!(result.status, GenerationStatus::Completed);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CancellationToken, DomainService, ExportService, GenerationOptions, GenerationService,
        GenerationState,
        ports::{
            ArtifactRenderer, DomainStore, Filesystem, JunctionInput, PackageInput,
            ProgressSink, ProgressUpdate, RenderInput,
        },
    };
    pub use crate::domain::{
        ArtifactFile, ArtifactKind, ArtifactStatus, DomainConfiguration, DomainValidator, Entity,
        Field, FieldKind, FieldType, FileTree, GeneratedArtifact, GenerationResult,
        GenerationStatus, IssueCategory, IssueLevel, OutputLayout, Relationship,
        RelationshipKind, RelationshipResolver, TypeRegistry, ValidationIssue,
    };
    pub use crate::error::{StencilError, StencilResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
