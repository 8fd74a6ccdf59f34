//! Pydantic request/response schemas.

use stencil_core::{
    application::ports::RenderInput,
    domain::{ArtifactFile, ArtifactKind, DomainError, Field, FieldKind, SchemaType, registry},
};

use super::{
    KeyInfo,
    python::{self as py, Group, Imports},
    writer::CodeWriter,
};

/// One attribute of a schema class, before it is spelled out.
struct SchemaField {
    name: String,
    annotation: String,
    required: bool,
    default: Option<String>,
    constraints: Vec<String>,
}

impl SchemaField {
    /// `name: annotation [= default | = Field(...)]`; `optional` forces the
    /// field to be omissible (partial updates).
    fn line(&self, optional: bool) -> String {
        let required = self.required && !optional;
        let default = if optional {
            None
        } else {
            self.default.clone()
        };

        if required && default.is_none() {
            if self.constraints.is_empty() {
                return format!("{}: {}", self.name, self.annotation);
            }
            return format!(
                "{}: {} = Field({})",
                self.name,
                self.annotation,
                self.constraints.join(", ")
            );
        }

        let annotation = if required {
            self.annotation.clone()
        } else {
            format!("{} | None", self.annotation)
        };
        let default = default.unwrap_or_else(|| "None".to_string());
        if self.constraints.is_empty() {
            format!("{}: {annotation} = {default}", self.name)
        } else {
            format!(
                "{}: {annotation} = Field(default={default}, {})",
                self.name,
                self.constraints.join(", ")
            )
        }
    }
}

pub fn render(input: &RenderInput<'_>) -> Result<ArtifactFile, DomainError> {
    let RenderInput {
        entity,
        relations,
        registry: types,
        layout,
        ..
    } = *input;
    let path = layout.primary_path(&entity.name, ArtifactKind::Schema);
    let key = KeyInfo::of(entity, types)?;
    let class = types.class_name(entity);
    let label = types.display_label(entity).to_lowercase();

    let mut imports = Imports::new();
    imports
        .from(Group::ThirdParty, "pydantic", "BaseModel")
        .from(Group::ThirdParty, "pydantic", "ConfigDict");

    let mut fields = Vec::new();
    if let (false, Some(field)) = (key.generated, key.field) {
        fields.push(schema_field(input, field, &mut imports)?);
    }
    for field in entity.data_fields() {
        fields.push(schema_field(input, field, &mut imports)?);
    }
    for fk in relations.added_columns() {
        let annotation = fk
            .references
            .kind
            .map(|kind| py::schema_type(registry::kind_def(kind).schema))
            .unwrap_or("int");
        imports.annotation(annotation);
        fields.push(SchemaField {
            name: fk.column.clone(),
            annotation: annotation.to_string(),
            required: false,
            default: None,
            constraints: Vec::new(),
        });
    }
    if fields.iter().any(|f| !f.constraints.is_empty()) {
        imports.from(Group::ThirdParty, "pydantic", "Field");
    }

    let key_annotation = py::model_type(key.kind);
    if key.generated {
        imports.annotation(key_annotation);
    }

    let mut w = CodeWriter::python();
    py::preamble(
        &mut w,
        &format!("{} request and response schemas.", types.display_label(entity)),
        &imports,
    );

    w.blank_lines(2);
    w.block(format!("class {class}Base(BaseModel):"), |w| {
        w.line(format!("\"\"\"Fields shared by every {label} schema.\"\"\""));
        if !fields.is_empty() {
            w.blank();
            w.lines(fields.iter().map(|f| f.line(false)));
        }
    });

    w.blank_lines(2);
    w.block(format!("class {class}Create({class}Base):"), |w| {
        w.line(format!("\"\"\"Payload for creating a {label}.\"\"\""));
    });

    w.blank_lines(2);
    w.block(format!("class {class}Update(BaseModel):"), |w| {
        w.line(format!(
            "\"\"\"Payload for a partial {label} update; every field is optional.\"\"\""
        ));
        let updatable: Vec<String> = fields
            .iter()
            .filter(|f| key.generated || f.name != key.name)
            .map(|f| f.line(true))
            .collect();
        if !updatable.is_empty() {
            w.blank();
            w.lines(&updatable);
        }
    });

    w.blank_lines(2);
    w.block(format!("class {class}Read({class}Base):"), |w| {
        w.line(format!("\"\"\"A {label} as returned by the API.\"\"\""));
        w.blank();
        w.line("model_config = ConfigDict(from_attributes=True)");
        if key.generated {
            w.blank();
            w.line(format!("{}: {key_annotation}", key.name));
        }
    });

    Ok(ArtifactFile::new(path, w.finish()))
}

fn schema_field(
    input: &RenderInput<'_>,
    field: &Field,
    imports: &mut Imports,
) -> Result<SchemaField, DomainError> {
    let RenderInput {
        entity,
        registry: types,
        ..
    } = *input;
    let kind = types.kind_of(entity, field)?;
    let schema = types.schema_type(entity, field)?;

    let annotation = py::schema_type(schema);
    imports.annotation(annotation);
    match schema {
        SchemaType::Email => {
            imports.from(Group::ThirdParty, "pydantic", "EmailStr");
        }
        SchemaType::Url => {
            imports.from(Group::ThirdParty, "pydantic", "HttpUrl");
        }
        _ => {}
    }

    let mut constraints = Vec::new();
    if matches!(kind, FieldKind::ShortText | FieldKind::LongText) {
        let text = field.field_type.text_constraints();
        if let Some(min) = text.and_then(|c| c.min_length) {
            constraints.push(format!("min_length={min}"));
        }
        let max = text.and_then(|c| c.max_length).or_else(|| {
            (kind == FieldKind::ShortText).then(|| types.short_text_length())
        });
        if let Some(max) = max {
            constraints.push(format!("max_length={max}"));
        }
        if let Some(pattern) = text.and_then(|c| c.pattern.as_deref()) {
            constraints.push(format!("pattern={}", py::string(pattern)));
        }
    }
    if let Some(numeric) = field.field_type.numeric_constraints() {
        if let Some(min) = numeric.min {
            constraints.push(format!("ge={min}"));
        }
        if let Some(max) = numeric.max {
            constraints.push(format!("le={max}"));
        }
    }

    Ok(SchemaField {
        name: field.name.clone(),
        annotation: annotation.to_string(),
        required: field.required,
        default: field.default_value.as_ref().map(py::value),
        constraints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::{render_for, shop};
    use stencil_core::domain::{DomainConfiguration, Entity};

    #[test]
    fn base_schema_lists_fields_with_constraints() {
        let schema = render_for(&shop(), "Product", ArtifactKind::Schema);
        assert!(schema.contains("class ProductBase(BaseModel):"));
        assert!(schema.contains("    name: str = Field(max_length=120)\n"));
        assert!(schema.contains("    price: Decimal | None = None\n"));
        assert!(schema.contains("    category_id: int | None = None\n"));
        assert!(schema.contains("class ProductCreate(ProductBase):"));
        assert!(schema.contains("    name: str | None = Field(default=None, max_length=120)\n"));
        assert!(schema.contains("model_config = ConfigDict(from_attributes=True)"));
        assert!(schema.contains("    id: int\n"));
    }

    #[test]
    fn client_assigned_key_is_part_of_the_payload() {
        let config = DomainConfiguration::new("Inventory").with_entity(
            Entity::new("Item")
                .with_field(Field::of("sku", FieldKind::ShortText).required())
                .with_field(Field::of("contact", FieldKind::Email))
                .with_field(Field::of("stock", FieldKind::Integer).with_default(0))
                .with_primary_key("sku"),
        );
        let schema = render_for(&config, "Item", ArtifactKind::Schema);

        assert!(schema.contains("    sku: str = Field(max_length=255)\n"));
        assert!(schema.contains("    contact: EmailStr | None = None\n"));
        assert!(schema.contains("    stock: int | None = 0\n"));
        assert!(schema.contains("from pydantic import BaseModel, ConfigDict, EmailStr, Field"));

        let update = schema.split("class ItemUpdate").nth(1).unwrap();
        let update = update.split("class ItemRead").next().unwrap();
        assert!(!update.contains("sku"));
    }
}
