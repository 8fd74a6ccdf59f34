//! SQLAlchemy persistence models and many-to-many join tables.

use stencil_core::{
    application::ports::{JunctionInput, RenderInput},
    domain::{
        ArtifactFile, ArtifactKind, DomainError, Entity, FieldKind, NavigationProperty, naming,
    },
};

use super::{
    KeyInfo, database_module,
    python::{self as py, Group, Imports},
    writer::CodeWriter,
};

pub fn render(input: &RenderInput<'_>) -> Result<ArtifactFile, DomainError> {
    let RenderInput {
        entity,
        relations,
        registry,
        layout,
        ..
    } = *input;
    let path = layout.primary_path(&entity.name, ArtifactKind::Model);
    let key = KeyInfo::of(entity, registry)?;
    let class = registry.class_name(entity);

    let mut imports = Imports::new();
    imports
        .from(Group::ThirdParty, "sqlalchemy.orm", "Mapped")
        .from(Group::ThirdParty, "sqlalchemy.orm", "mapped_column")
        .from(Group::Local, &database_module(layout), "Base");

    let mut columns = Vec::new();

    // ── Key ──
    let (key_type, key_import) = match key.field {
        Some(field) => py::column_type(registry.storage_type(entity, field)?),
        None => ("Integer".to_string(), "Integer"),
    };
    imports.from(Group::ThirdParty, "sqlalchemy", key_import);
    let mut key_args = vec![key_type, "primary_key=True".to_string()];
    match key.kind {
        FieldKind::Integer => key_args.push("autoincrement=True".into()),
        FieldKind::Identifier => key_args.push("default=uuid.uuid4".into()),
        _ => {}
    }
    let key_annotation = py::model_type(key.kind);
    imports.annotation(key_annotation);
    columns.push(format!(
        "{}: Mapped[{key_annotation}] = mapped_column({})",
        key.name,
        key_args.join(", ")
    ));

    // ── Declared fields ──
    for field in entity.data_fields() {
        let kind = registry.kind_of(entity, field)?;
        let (column, import) = py::column_type(registry.storage_type(entity, field)?);
        imports.from(Group::ThirdParty, "sqlalchemy", import);

        let mut args = vec![column];
        let mut unique = field.unique;
        if let Some(fk) = relations.foreign_key(&field.name) {
            imports.from(Group::ThirdParty, "sqlalchemy", "ForeignKey");
            args.push(format!("ForeignKey({})", py::string(&fk.references.qualified())));
            unique |= fk.unique;
        }
        args.push(format!("nullable={}", python_bool(!field.required)));
        if unique {
            args.push("unique=True".into());
        }
        if let Some(default) = &field.default_value {
            args.push(format!("default={}", py::value(default)));
        }

        let annotation = optional(py::model_type(kind), !field.required);
        imports.annotation(&annotation);
        columns.push(format!(
            "{}: Mapped[{annotation}] = mapped_column({})",
            field.name,
            args.join(", ")
        ));
    }

    // ── Foreign keys added by relationships ──
    for fk in relations.added_columns() {
        let kind = fk.references.kind.ok_or_else(|| DomainError::RenderFailed {
            artifact: path.clone(),
            reason: format!(
                "the key of '{}' has an unsupported type",
                fk.references.entity
            ),
        })?;
        imports.from(Group::ThirdParty, "sqlalchemy", "ForeignKey");

        let annotation = optional(py::model_type(kind), true);
        imports.annotation(&annotation);
        let mut args = vec![format!("ForeignKey({})", py::string(&fk.references.qualified()))];
        if fk.unique {
            args.push("unique=True".into());
        }
        columns.push(format!(
            "{}: Mapped[{annotation}] = mapped_column({})",
            fk.column,
            args.join(", ")
        ));
    }

    // ── Navigation attributes ──
    let navigations: Vec<String> = relations
        .navigations
        .iter()
        .map(|nav| navigation_line(entity, &key, nav, input))
        .collect();
    if !navigations.is_empty() {
        imports.from(Group::ThirdParty, "sqlalchemy.orm", "relationship");
    }

    let mut w = CodeWriter::python();
    py::preamble(
        &mut w,
        &format!("{} persistence model.", registry.display_label(entity)),
        &imports,
    );
    w.blank_lines(2);
    w.block(format!("class {class}(Base):"), |w| {
        w.line(format!("\"\"\"{}\"\"\"", class_docstring(entity)));
        w.blank();
        w.line(format!(
            "__tablename__ = {}",
            py::string(&registry.table_name(entity))
        ));
        w.blank();
        w.lines(&columns);
        if !navigations.is_empty() {
            w.blank();
            w.lines(&navigations);
        }
    });

    Ok(ArtifactFile::new(path, w.finish()))
}

fn navigation_line(
    entity: &Entity,
    key: &KeyInfo<'_>,
    nav: &NavigationProperty,
    input: &RenderInput<'_>,
) -> String {
    let target = naming::to_pascal_case(&nav.target);
    let annotation = if nav.collection {
        format!("list[\"{target}\"]")
    } else {
        format!("\"{target} | None\"")
    };
    let self_referential = nav.target == entity.name;

    let mut args = Vec::new();
    if let Some(table) = &nav.secondary {
        args.push(format!("secondary={}", py::string(table)));
        if self_referential {
            args.extend(self_join(key, nav, input, table));
        }
    }
    if let Some(column) = &nav.foreign_key {
        if nav.owns_key {
            args.push(format!("foreign_keys=[{column}]"));
            if self_referential {
                args.push(format!("remote_side=[{}]", key.name));
            }
        } else {
            args.push(format!(
                "foreign_keys={}",
                py::string(&format!("[{target}.{column}]"))
            ));
        }
    }
    args.push(format!("back_populates={}", py::string(&nav.back_populates)));

    format!(
        "{}: Mapped[{annotation}] = relationship({})",
        nav.name,
        args.join(", ")
    )
}

/// Join conditions of a self-referential many-to-many navigation. The first
/// navigation of the relationship walks source → target, the second back.
fn self_join(
    key: &KeyInfo<'_>,
    nav: &NavigationProperty,
    input: &RenderInput<'_>,
    table: &str,
) -> Vec<String> {
    let Some(junction) = input
        .relations
        .junctions
        .iter()
        .find(|j| j.relationship == nav.relationship)
    else {
        return Vec::new();
    };
    let forward = input
        .relations
        .navigations
        .iter()
        .find(|n| n.relationship == nav.relationship)
        .is_some_and(|first| first.name == nav.name);

    let (near, far) = if forward {
        (&junction.source_column, &junction.target_column)
    } else {
        (&junction.target_column, &junction.source_column)
    };
    let class = naming::to_pascal_case(&input.entity.name);
    vec![
        format!(
            "primaryjoin={}",
            py::string(&format!("{class}.{} == {table}.c.{near}", key.name))
        ),
        format!(
            "secondaryjoin={}",
            py::string(&format!("{class}.{} == {table}.c.{far}", key.name))
        ),
    ]
}

/// The join table of a many-to-many relationship.
pub fn render_junction(input: &JunctionInput<'_>) -> Result<ArtifactFile, DomainError> {
    let JunctionInput {
        junction, layout, ..
    } = *input;
    let path = layout.junction_path(&junction.table);

    let mut imports = Imports::new();
    imports
        .from(Group::ThirdParty, "sqlalchemy", "Column")
        .from(Group::ThirdParty, "sqlalchemy", "ForeignKey")
        .from(Group::ThirdParty, "sqlalchemy", "Table")
        .from(Group::Local, &database_module(layout), "Base");

    let mut w = CodeWriter::python();
    py::preamble(
        &mut w,
        &format!(
            "Join table of the {} relationship.",
            py_doc_text(&junction.relationship)
        ),
        &imports,
    );
    w.blank_lines(2);
    w.line(format!("{} = Table(", junction.table));
    w.indent();
    w.line(format!("{},", py::string(&junction.table)));
    w.line("Base.metadata,");
    for (column, reference) in [
        (&junction.source_column, &junction.source),
        (&junction.target_column, &junction.target),
    ] {
        w.line(format!(
            "Column({}, ForeignKey({}, ondelete=\"CASCADE\"), primary_key=True),",
            py::string(column),
            py::string(&reference.qualified())
        ));
    }
    w.dedent();
    w.line(")");

    Ok(ArtifactFile::new(path, w.finish()))
}

fn class_docstring(entity: &Entity) -> String {
    match entity.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => py_doc_text(description),
        _ => format!("A {} record.", naming::to_title_case(&entity.name).to_lowercase()),
    }
}

/// Text safe inside a triple-quoted docstring.
fn py_doc_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

fn optional(annotation: &str, nullable: bool) -> String {
    if nullable {
        format!("{annotation} | None")
    } else {
        annotation.to_string()
    }
}

fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::{render_for, shop};
    use stencil_core::domain::{Field, FieldType, Relationship, RelationshipKind};

    #[test]
    fn product_model_carries_foreign_key_and_navigation() {
        let model = render_for(&shop(), "Product", ArtifactKind::Model);
        assert!(model.contains("class Product(Base):"));
        assert!(model.contains("__tablename__ = \"products\""));
        assert!(model.contains(
            "id: Mapped[int] = mapped_column(Integer, primary_key=True, autoincrement=True)"
        ));
        assert!(model.contains(
            "name: Mapped[str] = mapped_column(String(120), nullable=False)"
        ));
        assert!(model.contains(
            "price: Mapped[Decimal | None] = mapped_column(Numeric(10, 2), nullable=True)"
        ));
        assert!(model.contains(
            "category_id: Mapped[int | None] = mapped_column(ForeignKey(\"categories.id\"))"
        ));
        assert!(model.contains(
            "category: Mapped[\"Category | None\"] = relationship(foreign_keys=[category_id], back_populates=\"products\")"
        ));
        assert!(model.contains("from decimal import Decimal"));
        assert!(model.contains("from shops.database import Base"));
    }

    #[test]
    fn category_model_carries_back_reference() {
        let model = render_for(&shop(), "Category", ArtifactKind::Model);
        assert!(model.contains(
            "products: Mapped[list[\"Product\"]] = relationship(foreign_keys=\"[Product.category_id]\", back_populates=\"category\")"
        ));
        assert!(!model.contains("ForeignKey"));
    }

    #[test]
    fn self_referential_reference_uses_remote_side() {
        let config = stencil_core::domain::DomainConfiguration::new("Org")
            .with_entity(Entity::new("Employee").with_field(Field::of("name", FieldKind::ShortText)))
            .with_relationship(
                Relationship::new("reports", RelationshipKind::OneToMany, "Employee", "Employee")
                    .with_foreign_key("manager_id")
                    .with_back_reference("reports"),
            );
        let model = render_for(&config, "Employee", ArtifactKind::Model);
        assert!(model.contains("remote_side=[id]"));
        assert!(model.contains("foreign_keys=\"[Employee.manager_id]\""));
    }

    #[test]
    fn unsupported_field_type_fails() {
        let mut config = shop();
        config.entities[0]
            .fields
            .push(Field::new("shape", FieldType::Unsupported("polygon".into())));
        let err = crate::renderer::tests::try_render(&config, "Product", ArtifactKind::Model)
            .unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedType { ref field, .. } if field == "shape"));
    }

    #[test]
    fn junction_table_references_both_keys() {
        let table = crate::renderer::tests::render_junction_for(&shop(), "product_tags");
        assert!(table.contains("product_tags = Table("));
        assert!(table.contains(
            "Column(\"product_id\", ForeignKey(\"products.id\", ondelete=\"CASCADE\"), primary_key=True),"
        ));
        assert!(table.contains(
            "Column(\"tag_id\", ForeignKey(\"tags.id\", ondelete=\"CASCADE\"), primary_key=True),"
        ));
    }
}
