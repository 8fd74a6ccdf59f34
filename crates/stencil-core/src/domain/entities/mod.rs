pub mod artifact;
pub mod configuration;
pub mod file_tree;
pub mod issue;

pub use artifact::{ArtifactFile, ArtifactStatus, GeneratedArtifact, GenerationResult, GenerationStatus};
pub use configuration::{
    DomainConfiguration, Entity, Field, FieldType, NumericConstraints, PrimaryKey, Relationship,
    SYNTHETIC_KEY, TextConstraints, ValidationRules,
};
pub use file_tree::{FileTree, TreeDirectory, TreeFile, TreeNode};
pub use issue::ValidationIssue;
