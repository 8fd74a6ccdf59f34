// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::FieldKind;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel through render result slots)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Duplicate path in output: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Registry Errors
    // ========================================================================
    #[error("field '{entity}.{field}' has unsupported type '{type_name}'")]
    UnsupportedType {
        entity: String,
        field: String,
        type_name: String,
    },

    #[error(
        "field '{entity}.{field}' needs at least {min_length} characters but allows at most {max_length}"
    )]
    UnsatisfiableLength {
        entity: String,
        field: String,
        min_length: usize,
        max_length: usize,
    },

    // ========================================================================
    // Relationship Errors
    // ========================================================================
    #[error("relationship '{relationship}' references unknown entity '{entity}'")]
    UnknownEntity {
        relationship: String,
        entity: String,
    },

    #[error(
        "self-relationship '{relationship}' on '{entity}' cannot derive distinct names (both resolve to '{name}')"
    )]
    AmbiguousSelfRelationship {
        relationship: String,
        entity: String,
        name: String,
    },

    #[error("relationships '{first}' and '{second}' both add '{name}' to '{entity}'")]
    RelationshipNameCollision {
        entity: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("relationship '{relationship}' adds '{name}' to '{entity}', which already declares that field")]
    RelationshipShadowsField {
        relationship: String,
        entity: String,
        name: String,
    },

    #[error("junction table '{table}' of '{second}' is already used by '{first}'")]
    JunctionTableCollision {
        table: String,
        first: String,
        second: String,
    },

    #[error("relationship '{relationship}' uses '{column}' as its foreign key, which is the primary key of '{entity}'")]
    ForeignKeyIsPrimaryKey {
        relationship: String,
        entity: String,
        column: String,
    },

    #[error("junction table '{table}' of '{relationship}' has the same path as the model of '{entity}'")]
    JunctionShadowsEntity {
        table: String,
        relationship: String,
        entity: String,
    },

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    #[error("rendering '{artifact}' failed: {reason}")]
    RenderFailed { artifact: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfiguration(msg) => vec![
                "Check your domain configuration".into(),
                format!("Details: {}", msg),
            ],
            Self::UnsupportedType { field, .. } => vec![
                format!("Change the type of '{}' to a supported type:", field),
                format!("  • {}", FieldKind::ALL.map(|k| k.as_str()).join(", ")),
            ],
            Self::UnsatisfiableLength { max_length, .. } => vec![
                format!("Lower 'minLength' to at most {}", max_length),
                "Or raise 'maxLength' / the configured short-text length".into(),
            ],
            Self::UnknownEntity { entity, .. } => vec![
                format!("Declare an entity named '{}'", entity),
                "Or point the relationship at an existing entity".into(),
            ],
            Self::AmbiguousSelfRelationship { .. } => vec![
                "Give the relationship an explicit 'foreignKey'".into(),
                "And a 'backReference' that differs from the default name".into(),
            ],
            Self::RelationshipNameCollision { name, .. } => vec![
                format!("Rename '{}' on one relationship", name),
                "Use 'foreignKey' or 'backReference' to pick distinct names".into(),
            ],
            Self::RelationshipShadowsField { name, .. } => vec![
                format!("Rename the declared field '{}'", name),
                "Or set 'backReference' on the relationship".into(),
            ],
            Self::JunctionTableCollision { .. } => vec![
                "Two many-to-many relationships link the same entities".into(),
                "Remove one, or model the link as its own entity".into(),
            ],
            Self::ForeignKeyIsPrimaryKey { column, .. } => vec![
                format!("Pick a foreign key other than '{}'", column),
                "Or drop 'foreignKey' to use the default '<source>_id'".into(),
            ],
            Self::JunctionShadowsEntity { entity, .. } => vec![
                format!("Rename the entity '{}'", entity),
                "Or model the link through that entity instead of many-to-many".into(),
            ],
            Self::DuplicatePath { path } => vec![
                format!("Two artifacts map to '{}'", path),
                "Rename one of the entities".into(),
            ],
            Self::RenderFailed { .. } => vec!["See the error details above".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration(_)
            | Self::AmbiguousSelfRelationship { .. }
            | Self::RelationshipNameCollision { .. }
            | Self::RelationshipShadowsField { .. }
            | Self::JunctionTableCollision { .. }
            | Self::ForeignKeyIsPrimaryKey { .. }
            | Self::JunctionShadowsEntity { .. }
            | Self::UnsatisfiableLength { .. }
            | Self::DuplicatePath { .. } => ErrorCategory::Validation,
            Self::UnsupportedType { .. } => ErrorCategory::Unsupported,
            Self::UnknownEntity { .. } => ErrorCategory::NotFound,
            Self::RenderFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Unsupported,
    NotFound,
    Internal,
}
