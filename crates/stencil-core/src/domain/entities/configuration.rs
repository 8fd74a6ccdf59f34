//! The `DomainConfiguration` aggregate: entities, fields, relationships.
//!
//! A configuration is constructed by the caller (usually deserialized from a
//! saved template document) and handed to the pipeline read-only. Nothing in
//! this module validates. That is the job of
//! [`DomainValidator`](crate::domain::DomainValidator), which reports every
//! problem as an issue instead of rejecting the document outright.
//!
//! # Wire format
//!
//! Keys are camelCase. A field's `type` is parsed into the closed
//! [`FieldType`] union; a type name outside the enumeration is preserved as
//! [`FieldType::Unsupported`] so the document still loads and the registry
//! can report it against the right entity and field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    naming,
    value_objects::{FieldKind, RelationshipKind},
};

// ── Constraints ──────────────────────────────────────────────────────────────

/// Constraints accepted by text-like field types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl TextConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none() && self.max_length.is_none() && self.pattern.is_none()
    }
}

/// Constraints accepted by numeric field types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericConstraints {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

// ── FieldType ────────────────────────────────────────────────────────────────

/// A field's semantic type together with the constraints that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    ShortText(TextConstraints),
    LongText(TextConstraints),
    Integer(NumericConstraints),
    Decimal(NumericConstraints),
    Boolean,
    Date,
    DateTime,
    Email(TextConstraints),
    Url(TextConstraints),
    StructuredData,
    Identifier,
    FileReference,
    /// A type name outside the supported enumeration, kept verbatim.
    Unsupported(String),
}

impl FieldType {
    /// The unconstrained type for a kind.
    pub fn from_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::ShortText => Self::ShortText(TextConstraints::default()),
            FieldKind::LongText => Self::LongText(TextConstraints::default()),
            FieldKind::Integer => Self::Integer(NumericConstraints::default()),
            FieldKind::Decimal => Self::Decimal(NumericConstraints::default()),
            FieldKind::Boolean => Self::Boolean,
            FieldKind::Date => Self::Date,
            FieldKind::DateTime => Self::DateTime,
            FieldKind::Email => Self::Email(TextConstraints::default()),
            FieldKind::Url => Self::Url(TextConstraints::default()),
            FieldKind::StructuredData => Self::StructuredData,
            FieldKind::Identifier => Self::Identifier,
            FieldKind::FileReference => Self::FileReference,
        }
    }

    /// Build a type from its wire name and optional constraints.
    ///
    /// Constraints that do not apply to the resulting kind are dropped.
    pub fn parse(type_name: &str, constraints: Option<ValidationRules>) -> Self {
        let Ok(kind) = type_name.parse::<FieldKind>() else {
            return Self::Unsupported(type_name.to_string());
        };
        let rules = constraints.unwrap_or_default();
        let text = TextConstraints {
            min_length: rules.min_length,
            max_length: rules.max_length,
            pattern: rules.pattern,
        };
        let numeric = NumericConstraints {
            min: rules.min,
            max: rules.max,
        };

        match kind {
            FieldKind::ShortText => Self::ShortText(text),
            FieldKind::LongText => Self::LongText(text),
            FieldKind::Email => Self::Email(text),
            FieldKind::Url => Self::Url(text),
            FieldKind::Integer => Self::Integer(numeric),
            FieldKind::Decimal => Self::Decimal(numeric),
            other => Self::from_kind(other),
        }
    }

    /// The semantic kind, or `None` for an unsupported type.
    pub fn kind(&self) -> Option<FieldKind> {
        Some(match self {
            Self::ShortText(_) => FieldKind::ShortText,
            Self::LongText(_) => FieldKind::LongText,
            Self::Integer(_) => FieldKind::Integer,
            Self::Decimal(_) => FieldKind::Decimal,
            Self::Boolean => FieldKind::Boolean,
            Self::Date => FieldKind::Date,
            Self::DateTime => FieldKind::DateTime,
            Self::Email(_) => FieldKind::Email,
            Self::Url(_) => FieldKind::Url,
            Self::StructuredData => FieldKind::StructuredData,
            Self::Identifier => FieldKind::Identifier,
            Self::FileReference => FieldKind::FileReference,
            Self::Unsupported(_) => return None,
        })
    }

    /// The name this type is written as on the wire.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unsupported(name) => name,
            other => other.kind().map_or("", |k| k.as_str()),
        }
    }

    pub fn text_constraints(&self) -> Option<&TextConstraints> {
        match self {
            Self::ShortText(c) | Self::LongText(c) | Self::Email(c) | Self::Url(c) => Some(c),
            _ => None,
        }
    }

    pub fn numeric_constraints(&self) -> Option<&NumericConstraints> {
        match self {
            Self::Integer(c) | Self::Decimal(c) => Some(c),
            _ => None,
        }
    }

    fn rules(&self) -> Option<ValidationRules> {
        if let Some(text) = self.text_constraints().filter(|c| !c.is_empty()) {
            return Some(ValidationRules {
                min_length: text.min_length,
                max_length: text.max_length,
                pattern: text.pattern.clone(),
                ..ValidationRules::default()
            });
        }
        if let Some(numeric) = self.numeric_constraints().filter(|c| !c.is_empty()) {
            return Some(ValidationRules {
                min: numeric.min,
                max: numeric.max,
                ..ValidationRules::default()
            });
        }
        None
    }
}

// ── Field ────────────────────────────────────────────────────────────────────

/// One attribute of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldDocument", into = "FieldDocument")]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    pub default_value: Option<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            unique: false,
            default_value: None,
        }
    }

    /// An unconstrained field of the given kind.
    pub fn of(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, FieldType::from_kind(kind))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn kind(&self) -> Option<FieldKind> {
        self.field_type.kind()
    }
}

/// Raw validation block as written in configuration documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Wire shape of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDocument {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationRules>,
}

impl From<FieldDocument> for Field {
    fn from(doc: FieldDocument) -> Self {
        Self {
            field_type: FieldType::parse(&doc.type_name, doc.validation),
            name: doc.name,
            required: doc.required,
            unique: doc.unique,
            default_value: doc.default_value.filter(|v| !v.is_null()),
        }
    }
}

impl From<Field> for FieldDocument {
    fn from(field: Field) -> Self {
        Self {
            type_name: field.field_type.type_name().to_string(),
            validation: field.field_type.rules(),
            name: field.name,
            required: field.required,
            unique: field.unique,
            default_value: field.default_value,
        }
    }
}

// ── Entity ───────────────────────────────────────────────────────────────────

/// The name of the key column substituted when an entity declares none.
pub const SYNTHETIC_KEY: &str = "id";

/// A business entity: one table, one schema, one route set, one UI pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(
        default,
        alias = "primaryKeyFieldName",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_key: Option<String>,
}

/// How an entity is keyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimaryKey<'a> {
    /// A declared field acts as the key.
    Declared(&'a Field),
    /// No usable key field; an auto-increment integer `id` is synthesized.
    Synthetic,
}

impl PrimaryKey<'_> {
    pub fn name(&self) -> &str {
        match self {
            Self::Declared(field) => &field.name,
            Self::Synthetic => SYNTHETIC_KEY,
        }
    }

    /// Kind of the key column. Synthetic keys are integers.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Declared(field) => field.kind(),
            Self::Synthetic => Some(FieldKind::Integer),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic)
    }
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            primary_key: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_primary_key(mut self, field_name: impl Into<String>) -> Self {
        self.primary_key = Some(field_name.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve the entity's key.
    ///
    /// An explicit `primaryKey` naming an existing field wins; otherwise a
    /// field literally named `id` is used; otherwise the key is synthetic.
    pub fn primary_key(&self) -> PrimaryKey<'_> {
        let declared = match &self.primary_key {
            Some(name) => self.field(name),
            None => self.field(SYNTHETIC_KEY),
        };
        declared.map_or(PrimaryKey::Synthetic, PrimaryKey::Declared)
    }

    /// Fields other than the key, in declaration order.
    pub fn data_fields(&self) -> impl Iterator<Item = &Field> {
        let key = self.primary_key();
        self.fields
            .iter()
            .filter(move |f| !matches!(key, PrimaryKey::Declared(k) if k.name == f.name))
    }

    pub fn snake_name(&self) -> String {
        naming::to_snake_case(&self.name)
    }

    pub fn pascal_name(&self) -> String {
        naming::to_pascal_case(&self.name)
    }

    pub fn table_name(&self) -> String {
        naming::table_name(&self.name)
    }
}

// ── Relationship ─────────────────────────────────────────────────────────────

/// A directed association between two entities of the same configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    pub kind: RelationshipKind,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_reference: Option<String>,
}

impl Relationship {
    pub fn new(
        name: impl Into<String>,
        kind: RelationshipKind,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            source: source.into(),
            target: target.into(),
            foreign_key: None,
            back_reference: None,
        }
    }

    pub fn with_foreign_key(mut self, name: impl Into<String>) -> Self {
        self.foreign_key = Some(name.into());
        self
    }

    pub fn with_back_reference(mut self, name: impl Into<String>) -> Self {
        self.back_reference = Some(name.into());
        self
    }

    pub fn is_self_referential(&self) -> bool {
        self.source == self.target
    }
}

// ── DomainConfiguration ──────────────────────────────────────────────────────

/// A complete declarative description of a business domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfiguration {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Domain category (`ecommerce`, `project-management`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl DomainConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            domain: None,
            version: None,
            entities: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// First entity with the given name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Human title, falling back to the title-cased name.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => naming::to_title_case(&self.name),
        }
    }

    /// Backend package directory: the lowercase plural of the name.
    ///
    /// `Shop` → `shops`, `Project Tracker` → `project_trackers`.
    pub fn package_name(&self) -> String {
        naming::pluralize(&naming::to_snake_case(&self.name))
    }
}
