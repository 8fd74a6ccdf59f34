//! Core domain layer for Stencil.
//!
//! This module contains pure business logic. All I/O and rendering concerns
//! are handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: Observability belongs to the application and CLI layers
//! - **Immutable inputs**: A configuration is never mutated by the pipeline
//! - **Total checks**: Validation reports issues instead of failing

pub mod entities;
pub mod error;
pub mod layout;
pub mod naming;
pub mod registry;
pub mod relationships;
pub mod value_objects;

mod validation;

pub use entities::{
    ArtifactFile, ArtifactStatus, DomainConfiguration, Entity, Field, FieldType, FileTree,
    GeneratedArtifact, GenerationResult, GenerationStatus, NumericConstraints, PrimaryKey,
    Relationship, TextConstraints, TreeFile, TreeNode, ValidationIssue, ValidationRules,
};

pub use error::{DomainError, ErrorCategory};

pub use layout::OutputLayout;

pub use registry::{SampleLiteral, SchemaType, StorageType, TypeRegistry, UiWidget};

pub use relationships::{
    EntityRelations, ForeignKey, Junction, KeyReference, NavigationProperty, RelationshipIndex,
    RelationshipLink, RelationshipResolver, ResolvedRelationship,
};

pub use validation::{DomainValidator, Inspection};

pub use value_objects::{
    ArtifactKind, FieldKind, IssueCategory, IssueLevel, RelationshipKind,
};
