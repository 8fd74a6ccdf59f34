//! Type & naming registry.
//!
//! # Design
//!
//! Each semantic field kind is described exactly once by a [`FieldKindDef`]
//! in [`FIELD_KIND_REGISTRY`]: its schema primitive and its form widget.
//! Storage types depend on the registry's parameters (text length, decimal
//! precision) and are computed by [`TypeRegistry::storage_type`].
//!
//! Every lookup is a pure function. A field whose type is outside the
//! enumeration fails with [`DomainError::UnsupportedType`] naming the entity,
//! field, and type, and only the artifacts that need that mapping fail.

use std::fmt;

use crate::domain::{
    entities::{Entity, Field, FieldType},
    error::DomainError,
    naming,
    value_objects::FieldKind,
};

// ── Layer tokens ─────────────────────────────────────────────────────────────

/// Column type used by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    VarChar(u32),
    Text,
    Integer,
    Numeric { precision: u8, scale: u8 },
    Boolean,
    Date,
    Timestamp,
    Json,
    Uuid,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarChar(len) => write!(f, "VARCHAR({len})"),
            Self::Text => f.write_str("TEXT"),
            Self::Integer => f.write_str("INTEGER"),
            Self::Numeric { precision, scale } => write!(f, "NUMERIC({precision}, {scale})"),
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Date => f.write_str("DATE"),
            Self::Timestamp => f.write_str("TIMESTAMP"),
            Self::Json => f.write_str("JSON"),
            Self::Uuid => f.write_str("UUID"),
        }
    }
}

/// Primitive used by the validation/schema layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Email,
    Url,
    Object,
    Uuid,
    FilePath,
}

impl SchemaType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Email => "email",
            Self::Url => "url",
            Self::Object => "object",
            Self::Uuid => "uuid",
            Self::FilePath => "file-path",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form control used by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiWidget {
    Text,
    TextArea,
    Number,
    DecimalNumber,
    Checkbox,
    Date,
    DateTime,
    Email,
    Url,
    JsonEditor,
    /// Read-only identifier; not editable in forms.
    Hidden,
    File,
}

impl UiWidget {
    /// The HTML `<input type>` for the widget; `None` when the widget is
    /// not an `<input>` element.
    pub const fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Number | Self::DecimalNumber => Some("number"),
            Self::Checkbox => Some("checkbox"),
            Self::Date => Some("date"),
            Self::DateTime => Some("datetime-local"),
            Self::Email => Some("email"),
            Self::Url => Some("url"),
            Self::Hidden => Some("hidden"),
            Self::File => Some("file"),
            Self::TextArea | Self::JsonEditor => None,
        }
    }
}

/// A deterministic example value of a field's type, used by generated tests.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleLiteral {
    Text(String),
    Integer(i64),
    /// Decimal rendered with the registry's scale, e.g. `"19.99"`.
    Decimal(String),
    Boolean(bool),
    /// Key/value pairs of a JSON object.
    Object(Vec<(String, String)>),
}

// ── Registry table ───────────────────────────────────────────────────────────

/// Everything the layers need to know about one field kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldKindDef {
    pub kind: FieldKind,
    pub schema: SchemaType,
    pub widget: UiWidget,
    /// One-line description for listings.
    pub summary: &'static str,
}

/// Single source of truth for per-kind representations.
pub static FIELD_KIND_REGISTRY: &[FieldKindDef] = &[
    FieldKindDef {
        kind: FieldKind::ShortText,
        schema: SchemaType::String,
        widget: UiWidget::Text,
        summary: "single-line text of bounded length",
    },
    FieldKindDef {
        kind: FieldKind::LongText,
        schema: SchemaType::String,
        widget: UiWidget::TextArea,
        summary: "multi-line text",
    },
    FieldKindDef {
        kind: FieldKind::Integer,
        schema: SchemaType::Integer,
        widget: UiWidget::Number,
        summary: "whole number",
    },
    FieldKindDef {
        kind: FieldKind::Decimal,
        schema: SchemaType::Decimal,
        widget: UiWidget::DecimalNumber,
        summary: "fixed-precision number",
    },
    FieldKindDef {
        kind: FieldKind::Boolean,
        schema: SchemaType::Boolean,
        widget: UiWidget::Checkbox,
        summary: "true/false flag",
    },
    FieldKindDef {
        kind: FieldKind::Date,
        schema: SchemaType::Date,
        widget: UiWidget::Date,
        summary: "calendar date",
    },
    FieldKindDef {
        kind: FieldKind::DateTime,
        schema: SchemaType::DateTime,
        widget: UiWidget::DateTime,
        summary: "date and time",
    },
    FieldKindDef {
        kind: FieldKind::Email,
        schema: SchemaType::Email,
        widget: UiWidget::Email,
        summary: "email address",
    },
    FieldKindDef {
        kind: FieldKind::Url,
        schema: SchemaType::Url,
        widget: UiWidget::Url,
        summary: "web address",
    },
    FieldKindDef {
        kind: FieldKind::StructuredData,
        schema: SchemaType::Object,
        widget: UiWidget::JsonEditor,
        summary: "free-form JSON object",
    },
    FieldKindDef {
        kind: FieldKind::Identifier,
        schema: SchemaType::Uuid,
        widget: UiWidget::Hidden,
        summary: "UUID identifier",
    },
    FieldKindDef {
        kind: FieldKind::FileReference,
        schema: SchemaType::FilePath,
        widget: UiWidget::File,
        summary: "path to an uploaded file",
    },
];

/// Look up the definition of a kind.
pub fn kind_def(kind: FieldKind) -> &'static FieldKindDef {
    FIELD_KIND_REGISTRY
        .iter()
        .find(|def| def.kind == kind)
        .unwrap_or(&FIELD_KIND_REGISTRY[0])
}

// ── TypeRegistry ─────────────────────────────────────────────────────────────

pub const DEFAULT_SHORT_TEXT_LENGTH: u32 = 255;
pub const DEFAULT_DECIMAL_PRECISION: u8 = 10;
pub const DEFAULT_DECIMAL_SCALE: u8 = 2;

const EMAIL_LENGTH: u32 = 320;
const URL_LENGTH: u32 = 2048;
const FILE_PATH_LENGTH: u32 = 1024;

/// Largest `minLength` a text field may ask for.
pub const MAX_TEXT_LENGTH: u32 = 65_535;

/// Maps semantic field types to their per-layer representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRegistry {
    short_text_length: u32,
    decimal_precision: u8,
    decimal_scale: u8,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            short_text_length: DEFAULT_SHORT_TEXT_LENGTH,
            decimal_precision: DEFAULT_DECIMAL_PRECISION,
            decimal_scale: DEFAULT_DECIMAL_SCALE,
        }
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_short_text_length(mut self, length: u32) -> Self {
        self.short_text_length = length.max(1);
        self
    }

    /// Set decimal precision and scale. Scale is clamped to the precision.
    pub fn with_decimal(mut self, precision: u8, scale: u8) -> Self {
        self.decimal_precision = precision.max(1);
        self.decimal_scale = scale.min(self.decimal_precision);
        self
    }

    pub const fn short_text_length(&self) -> u32 {
        self.short_text_length
    }

    pub const fn decimal_precision(&self) -> u8 {
        self.decimal_precision
    }

    pub const fn decimal_scale(&self) -> u8 {
        self.decimal_scale
    }

    /// The field's kind, or `UnsupportedType` naming entity and field.
    pub fn kind_of(&self, entity: &Entity, field: &Field) -> Result<FieldKind, DomainError> {
        field.kind().ok_or_else(|| DomainError::UnsupportedType {
            entity: entity.name.clone(),
            field: field.name.clone(),
            type_name: field.field_type.type_name().to_string(),
        })
    }

    /// Check that every field of an entity maps to a supported kind.
    pub fn check_entity(&self, entity: &Entity) -> Result<(), DomainError> {
        entity
            .fields
            .iter()
            .try_for_each(|field| self.kind_of(entity, field).map(drop))
    }

    pub fn storage_type(&self, entity: &Entity, field: &Field) -> Result<StorageType, DomainError> {
        let kind = self.kind_of(entity, field)?;
        Ok(match kind {
            FieldKind::ShortText => {
                let declared = field
                    .field_type
                    .text_constraints()
                    .and_then(|c| c.max_length);
                StorageType::VarChar(declared.unwrap_or(self.short_text_length))
            }
            FieldKind::LongText => StorageType::Text,
            FieldKind::Integer => StorageType::Integer,
            FieldKind::Decimal => StorageType::Numeric {
                precision: self.decimal_precision,
                scale: self.decimal_scale,
            },
            FieldKind::Boolean => StorageType::Boolean,
            FieldKind::Date => StorageType::Date,
            FieldKind::DateTime => StorageType::Timestamp,
            FieldKind::Email => StorageType::VarChar(EMAIL_LENGTH),
            FieldKind::Url => StorageType::VarChar(URL_LENGTH),
            FieldKind::StructuredData => StorageType::Json,
            FieldKind::Identifier => StorageType::Uuid,
            FieldKind::FileReference => StorageType::VarChar(FILE_PATH_LENGTH),
        })
    }

    pub fn schema_type(&self, entity: &Entity, field: &Field) -> Result<SchemaType, DomainError> {
        Ok(kind_def(self.kind_of(entity, field)?).schema)
    }

    pub fn ui_input_kind(&self, entity: &Entity, field: &Field) -> Result<UiWidget, DomainError> {
        Ok(kind_def(self.kind_of(entity, field)?).widget)
    }

    /// A deterministic example value that satisfies the field's length and
    /// range constraints. Regex patterns are not considered.
    pub fn sample_literal(
        &self,
        entity: &Entity,
        field: &Field,
    ) -> Result<SampleLiteral, DomainError> {
        let kind = self.kind_of(entity, field)?;
        let snake = naming::to_snake_case(&field.name);

        Ok(match &field.field_type {
            FieldType::ShortText(c) | FieldType::LongText(c) => {
                let mut max = c.max_length.map(|m| m as usize);
                if kind == FieldKind::ShortText {
                    let cap = self.short_text_length as usize;
                    max = Some(max.map_or(cap, |m| m.min(cap)));
                }
                let min = c.min_length.map(|m| m as usize);
                let ceiling = max.map_or(MAX_TEXT_LENGTH as usize, |m| {
                    m.min(MAX_TEXT_LENGTH as usize)
                });
                if let Some(min) = min
                    && min > ceiling
                {
                    return Err(DomainError::UnsatisfiableLength {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        min_length: min,
                        max_length: ceiling,
                    });
                }
                SampleLiteral::Text(fit_length(
                    format!("sample {}", snake.replace('_', " ")),
                    min,
                    max,
                ))
            }
            FieldType::Integer(c) => SampleLiteral::Integer(clamp(42.0, c.min, c.max, true) as i64),
            FieldType::Decimal(c) => {
                let value = clamp(19.99, c.min, c.max, false);
                SampleLiteral::Decimal(format!("{:.*}", self.decimal_scale as usize, value))
            }
            FieldType::Boolean => SampleLiteral::Boolean(true),
            FieldType::Date => SampleLiteral::Text("2024-01-15".into()),
            FieldType::DateTime => SampleLiteral::Text("2024-01-15T10:30:00".into()),
            FieldType::Email(_) => SampleLiteral::Text(format!("{}@example.com", snake.replace('_', "."))),
            FieldType::Url(_) => SampleLiteral::Text(format!(
                "https://example.com/{}",
                naming::to_kebab_case(&field.name)
            )),
            FieldType::StructuredData => {
                SampleLiteral::Object(vec![("key".into(), "value".into())])
            }
            FieldType::Identifier => {
                SampleLiteral::Text("00000000-0000-4000-8000-000000000001".into())
            }
            FieldType::FileReference => SampleLiteral::Text(format!("uploads/{snake}.txt")),
            FieldType::Unsupported(_) => unreachable_kind(entity, field)?,
        })
    }

    // ── Entity naming ────────────────────────────────────────────────────────

    /// Class / component name: `order_item` → `OrderItem`.
    pub fn class_name(&self, entity: &Entity) -> String {
        naming::to_pascal_case(&entity.name)
    }

    /// Table name: `OrderItem` → `order_items`.
    pub fn table_name(&self, entity: &Entity) -> String {
        naming::table_name(&entity.name)
    }

    /// URL segment: `OrderItem` → `order-items`.
    pub fn route_segment(&self, entity: &Entity) -> String {
        naming::pluralize(&naming::to_kebab_case(&entity.name))
    }

    /// Singular display label: `OrderItem` → `Order Item`.
    pub fn display_label(&self, entity: &Entity) -> String {
        naming::to_title_case(&entity.name)
    }

    /// Plural display label: `Category` → `Categories`.
    pub fn display_label_plural(&self, entity: &Entity) -> String {
        naming::pluralize(&naming::to_title_case(&entity.name))
    }
}

/// `kind_of` already rejected unsupported types; this keeps the match total
/// without panicking.
fn unreachable_kind(entity: &Entity, field: &Field) -> Result<SampleLiteral, DomainError> {
    Err(DomainError::UnsupportedType {
        entity: entity.name.clone(),
        field: field.name.clone(),
        type_name: field.field_type.type_name().to_string(),
    })
}

fn fit_length(mut text: String, min: Option<usize>, max: Option<usize>) -> String {
    if let Some(max) = max
        && text.chars().count() > max
    {
        text = text.chars().take(max).collect();
    }
    if let Some(min) = min {
        let len = text.chars().count();
        if len < min {
            text.push_str(&"x".repeat(min - len));
        }
    }
    text
}

fn clamp(base: f64, min: Option<f64>, max: Option<f64>, integral: bool) -> f64 {
    let mut value = base;
    if let Some(min) = min {
        let floor = if integral { min.ceil() } else { min };
        value = value.max(floor);
    }
    if let Some(max) = max {
        let ceiling = if integral { max.floor() } else { max };
        value = value.min(ceiling);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NumericConstraints, TextConstraints};

    fn entity() -> Entity {
        Entity::new("Product")
    }

    #[test]
    fn every_kind_has_a_registry_entry() {
        for kind in FieldKind::ALL {
            assert_eq!(kind_def(kind).kind, kind);
        }
        assert_eq!(FIELD_KIND_REGISTRY.len(), FieldKind::ALL.len());
    }

    #[test]
    fn storage_types_follow_parameters() {
        let registry = TypeRegistry::new().with_short_text_length(120).with_decimal(12, 4);
        let e = entity();

        assert_eq!(
            registry.storage_type(&e, &Field::of("name", FieldKind::ShortText)),
            Ok(StorageType::VarChar(120))
        );
        assert_eq!(
            registry.storage_type(&e, &Field::of("price", FieldKind::Decimal)),
            Ok(StorageType::Numeric {
                precision: 12,
                scale: 4
            })
        );
        assert_eq!(
            registry.storage_type(&e, &Field::of("email", FieldKind::Email)),
            Ok(StorageType::VarChar(320))
        );
        assert_eq!(
            registry
                .storage_type(&e, &Field::of("at", FieldKind::DateTime))
                .map(|s| s.to_string()),
            Ok("TIMESTAMP".to_string())
        );
    }

    #[test]
    fn declared_max_length_overrides_default_varchar() {
        let field = Field::new(
            "code",
            FieldType::ShortText(TextConstraints {
                max_length: Some(12),
                ..TextConstraints::default()
            }),
        );
        assert_eq!(
            TypeRegistry::new().storage_type(&entity(), &field),
            Ok(StorageType::VarChar(12))
        );
    }

    #[test]
    fn unsupported_type_names_entity_field_and_type() {
        let field = Field::new("location", FieldType::Unsupported("geo-point".into()));
        let err = TypeRegistry::new()
            .schema_type(&entity(), &field)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::UnsupportedType {
                entity: "Product".into(),
                field: "location".into(),
                type_name: "geo-point".into(),
            }
        );
        assert!(TypeRegistry::new().check_entity(&entity().with_field(field)).is_err());
    }

    #[test]
    fn samples_respect_constraints() {
        let registry = TypeRegistry::new();
        let e = entity();

        let short = Field::new(
            "sku",
            FieldType::ShortText(TextConstraints {
                max_length: Some(4),
                ..TextConstraints::default()
            }),
        );
        assert_eq!(
            registry.sample_literal(&e, &short),
            Ok(SampleLiteral::Text("samp".into()))
        );

        let long = Field::new(
            "bio",
            FieldType::LongText(TextConstraints {
                min_length: Some(20),
                ..TextConstraints::default()
            }),
        );
        assert_eq!(
            registry.sample_literal(&e, &long),
            Ok(SampleLiteral::Text("sample bioxxxxxxxxxx".into()))
        );

        let qty = Field::new(
            "quantity",
            FieldType::Integer(NumericConstraints {
                min: Some(100.5),
                max: None,
            }),
        );
        assert_eq!(registry.sample_literal(&e, &qty), Ok(SampleLiteral::Integer(101)));

        let price = Field::new(
            "price",
            FieldType::Decimal(NumericConstraints {
                min: None,
                max: Some(5.0),
            }),
        );
        assert_eq!(
            registry.sample_literal(&e, &price),
            Ok(SampleLiteral::Decimal("5.00".into()))
        );
    }

    #[test]
    fn unsatisfiable_lengths_are_errors() {
        let registry = TypeRegistry::new().with_short_text_length(10);
        let e = entity();
        let text = |min: u32, max: Option<u32>| {
            Field::new(
                "code",
                FieldType::ShortText(TextConstraints {
                    min_length: Some(min),
                    max_length: max,
                    ..TextConstraints::default()
                }),
            )
        };

        assert_eq!(
            registry.sample_literal(&e, &text(8, Some(6))),
            Err(DomainError::UnsatisfiableLength {
                entity: "Product".into(),
                field: "code".into(),
                min_length: 8,
                max_length: 6,
            })
        );
        // The configured short-text length caps an absent maximum.
        assert!(registry.sample_literal(&e, &text(11, None)).is_err());
        assert_eq!(
            registry.sample_literal(&e, &text(10, None)),
            Ok(SampleLiteral::Text("sample cod".into()))
        );
    }

    #[test]
    fn huge_minimum_length_fails_fast() {
        let long = Field::new(
            "essay",
            FieldType::LongText(TextConstraints {
                min_length: Some(u32::MAX),
                ..TextConstraints::default()
            }),
        );
        let err = TypeRegistry::new().sample_literal(&entity(), &long).unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnsatisfiableLength { max_length, .. } if max_length == MAX_TEXT_LENGTH as usize
        ));

        let at_ceiling = Field::new(
            "essay",
            FieldType::LongText(TextConstraints {
                min_length: Some(MAX_TEXT_LENGTH),
                ..TextConstraints::default()
            }),
        );
        match TypeRegistry::new().sample_literal(&entity(), &at_ceiling) {
            Ok(SampleLiteral::Text(text)) => assert_eq!(text.len(), MAX_TEXT_LENGTH as usize),
            other => panic!("unexpected sample: {other:?}"),
        }
    }

    #[test]
    fn samples_are_deterministic() {
        let registry = TypeRegistry::new();
        let field = Field::of("contact_email", FieldKind::Email);
        let a = registry.sample_literal(&entity(), &field);
        let b = registry.sample_literal(&entity(), &field);
        assert_eq!(a, b);
        assert_eq!(a, Ok(SampleLiteral::Text("contact.email@example.com".into())));
    }

    #[test]
    fn entity_names() {
        let registry = TypeRegistry::new();
        let e = Entity::new("OrderItem");
        assert_eq!(registry.class_name(&e), "OrderItem");
        assert_eq!(registry.table_name(&e), "order_items");
        assert_eq!(registry.route_segment(&e), "order-items");
        assert_eq!(registry.display_label(&e), "Order Item");
        assert_eq!(
            registry.display_label_plural(&Entity::new("Category")),
            "Categories"
        );
    }
}
