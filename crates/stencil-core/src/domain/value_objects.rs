//! Domain value objects: FieldKind, RelationshipKind, ArtifactKind, IssueLevel,
//! IssueCategory.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! They hold no mapping logic. Per-type representations live in
//! `registry.rs`. This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.
//!
//! # Adding a Field Type
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add a `FieldKindDef` entry in `registry.rs`
//! 4. Add the `FieldType` variant in `entities/configuration.rs`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── FieldKind ────────────────────────────────────────────────────────────────

/// The closed set of semantic field types a domain may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    ShortText,
    LongText,
    Integer,
    Decimal,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Email,
    Url,
    StructuredData,
    Identifier,
    FileReference,
}

impl FieldKind {
    /// Every kind, in declaration order.
    pub const ALL: [FieldKind; 12] = [
        Self::ShortText,
        Self::LongText,
        Self::Integer,
        Self::Decimal,
        Self::Boolean,
        Self::Date,
        Self::DateTime,
        Self::Email,
        Self::Url,
        Self::StructuredData,
        Self::Identifier,
        Self::FileReference,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShortText => "short-text",
            Self::LongText => "long-text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Email => "email",
            Self::Url => "url",
            Self::StructuredData => "structured-data",
            Self::Identifier => "identifier",
            Self::FileReference => "file-reference",
        }
    }

    /// Whether the kind accepts length/pattern constraints.
    pub const fn is_textual(self) -> bool {
        matches!(
            self,
            Self::ShortText | Self::LongText | Self::Email | Self::Url
        )
    }

    /// Whether the kind accepts min/max value constraints.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    /// Accepts the canonical names plus the loose aliases older template
    /// documents were saved with (`string`, `number`, `json`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "short-text" | "string" | "text-short" | "shorttext" => Ok(Self::ShortText),
            "long-text" | "text" | "longtext" | "textarea" => Ok(Self::LongText),
            "integer" | "int" | "number" => Ok(Self::Integer),
            "decimal" | "float" | "money" | "currency" => Ok(Self::Decimal),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "datetime" | "date-time" | "timestamp" => Ok(Self::DateTime),
            "email" => Ok(Self::Email),
            "url" | "uri" => Ok(Self::Url),
            "structured-data" | "json" | "object" => Ok(Self::StructuredData),
            "identifier" | "uuid" | "id" => Ok(Self::Identifier),
            "file-reference" | "file" | "upload" => Ok(Self::FileReference),
            other => Err(other.to_string()),
        }
    }
}

// ── RelationshipKind ─────────────────────────────────────────────────────────

/// Cardinality of a relationship between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationshipKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "one-to-one" | "1:1" => Ok(Self::OneToOne),
            "one-to-many" | "1:n" => Ok(Self::OneToMany),
            "many-to-many" | "n:m" => Ok(Self::ManyToMany),
            other => Err(other.to_string()),
        }
    }
}

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// The kind of generated artifact.
///
/// Declaration order is the output order of per-entity artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Persistence model (table mapping).
    Model,
    /// Validation schema.
    Schema,
    /// REST route set.
    Routes,
    /// UI list + form component pair.
    Ui,
    /// Test suite.
    Tests,
    /// Join table for a many-to-many relationship (cross-entity).
    Junction,
    /// Database session and application entry point, one per run.
    Package,
}

impl ArtifactKind {
    /// The five kinds rendered for every entity, in output order.
    pub const PER_ENTITY: [ArtifactKind; 5] = [
        Self::Model,
        Self::Schema,
        Self::Routes,
        Self::Ui,
        Self::Tests,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Schema => "schema",
            Self::Routes => "routes",
            Self::Ui => "ui",
            Self::Tests => "tests",
            Self::Junction => "junction",
            Self::Package => "package",
        }
    }

    /// Whether rendering this kind depends on every field's type mapping.
    ///
    /// Route sets only touch the primary key, so an unsupported non-key field
    /// leaves them renderable.
    pub const fn depends_on_field_types(self) -> bool {
        !matches!(self, Self::Routes | Self::Junction | Self::Package)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Issue classification ─────────────────────────────────────────────────────

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
    Info,
}

impl IssueLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What part of the configuration an issue concerns.
///
/// Declaration order is the grouping order of validator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Domain,
    Entity,
    Field,
    Relationship,
}

impl IssueCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Entity => "entity",
            Self::Field => "field",
            Self::Relationship => "relationship",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_round_trips_canonical_names() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldKind::from_str(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn field_kind_accepts_aliases() {
        assert_eq!(FieldKind::from_str("string"), Ok(FieldKind::ShortText));
        assert_eq!(FieldKind::from_str("JSON"), Ok(FieldKind::StructuredData));
        assert_eq!(FieldKind::from_str("date_time"), Ok(FieldKind::DateTime));
        assert_eq!(FieldKind::from_str("geo-point"), Err("geo-point".to_string()));
    }

    #[test]
    fn field_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FieldKind::StructuredData).unwrap();
        assert_eq!(json, "\"structured-data\"");
        let json = serde_json::to_string(&FieldKind::DateTime).unwrap();
        assert_eq!(json, "\"datetime\"");
    }

    #[test]
    fn relationship_kind_parses() {
        assert_eq!(
            RelationshipKind::from_str("one_to_many"),
            Ok(RelationshipKind::OneToMany)
        );
        assert!(RelationshipKind::from_str("some-to-some").is_err());
    }

    #[test]
    fn artifact_kinds_are_ordered_for_output() {
        let mut kinds = ArtifactKind::PER_ENTITY.to_vec();
        kinds.reverse();
        kinds.sort();
        assert_eq!(kinds, ArtifactKind::PER_ENTITY.to_vec());
    }

    #[test]
    fn issue_categories_group_domain_first() {
        assert!(IssueCategory::Domain < IssueCategory::Entity);
        assert!(IssueCategory::Field < IssueCategory::Relationship);
    }
}
