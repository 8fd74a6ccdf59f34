//! pytest suites exercising the generated routes end to end.

use stencil_core::{
    application::ports::RenderInput,
    domain::{ArtifactFile, ArtifactKind, DomainError, naming},
};

use super::{
    KeyInfo,
    python::{self as py, Group, Imports},
    writer::CodeWriter,
};

pub fn render(input: &RenderInput<'_>) -> Result<ArtifactFile, DomainError> {
    let RenderInput {
        entity,
        registry,
        layout,
        ..
    } = *input;
    let path = layout.primary_path(&entity.name, ArtifactKind::Tests);
    let key = KeyInfo::of(entity, registry)?;
    let snake = naming::to_snake_case(&entity.name);
    let plural = naming::pluralize(&snake);
    let base = format!("/{}", registry.route_segment(entity));

    // ── Payload ──
    let mut payload = Vec::new();
    if let (false, Some(field)) = (key.generated, key.field) {
        let sample = registry.sample_literal(entity, field)?;
        payload.push((field.name.as_str(), py::payload_literal(&sample)));
    }
    let mut update = None;
    for field in entity.data_fields() {
        let sample = py::payload_literal(&registry.sample_literal(entity, field)?);
        if update.is_none() {
            update = Some((field.name.as_str(), sample.clone()));
        }
        payload.push((field.name.as_str(), sample));
    }

    let mut imports = Imports::new();
    imports
        .from(Group::ThirdParty, "pytest", "fixture")
        .from(Group::ThirdParty, "fastapi.testclient", "TestClient")
        .from(Group::Local, &format!("{}.main", layout.package()), "app");

    let mut w = CodeWriter::python();
    py::preamble(
        &mut w,
        &format!(
            "End-to-end tests for the {} endpoints.",
            registry.display_label(entity).to_lowercase()
        ),
        &imports,
    );

    w.blank_lines(1);
    w.line("client = TestClient(app)");
    w.blank();
    w.line(format!("BASE = {}", py::string(&base)));
    if payload.is_empty() {
        w.line("PAYLOAD: dict = {}");
    } else {
        w.line("PAYLOAD = {");
        w.indent();
        w.lines(
            payload
                .iter()
                .map(|(name, literal)| format!("{}: {literal},", py::string(name))),
        );
        w.dedent();
        w.line("}");
    }

    let item = format!("f\"{{BASE}}/{{created['{}']}}\"", key.name);

    w.blank_lines(2);
    w.line("@fixture(scope=\"module\")");
    w.block("def created() -> dict:", |w| {
        w.line("response = client.post(f\"{BASE}/\", json=PAYLOAD)");
        w.line("assert response.status_code == 201, response.text");
        w.line("return response.json()");
    });

    w.blank_lines(2);
    w.block(format!("def test_create_{snake}(created: dict) -> None:"), |w| {
        w.line(format!("assert {} in created", py::string(key.name)));
    });

    w.blank_lines(2);
    w.block(format!("def test_list_{plural}(created: dict) -> None:"), |w| {
        w.line("response = client.get(f\"{BASE}/\")");
        w.line("assert response.status_code == 200");
        w.line(format!(
            "assert any(row[{k}] == created[{k}] for row in response.json())",
            k = py::string(key.name)
        ));
    });

    w.blank_lines(2);
    w.block(format!("def test_get_{snake}(created: dict) -> None:"), |w| {
        w.line(format!("response = client.get({item})"));
        w.line("assert response.status_code == 200");
        w.line(format!(
            "assert response.json()[{k}] == created[{k}]",
            k = py::string(key.name)
        ));
    });

    w.blank_lines(2);
    w.block(format!("def test_update_{snake}(created: dict) -> None:"), |w| {
        match &update {
            Some((name, literal)) => {
                w.line(format!("response = client.patch({item}, json={{{}: {literal}}})", py::string(name)))
            }
            None => w.line(format!("response = client.patch({item}, json={{}})")),
        };
        w.line("assert response.status_code == 200");
    });

    w.blank_lines(2);
    w.block(format!("def test_get_missing_{snake}_returns_404() -> None:"), |w| {
        w.line(format!(
            "response = client.get(f\"{{BASE}}/{}\")",
            key.missing_literal()
        ));
        w.line("assert response.status_code == 404");
    });

    w.blank_lines(2);
    w.block(format!("def test_delete_{snake}(created: dict) -> None:"), |w| {
        w.line(format!("response = client.delete({item})"));
        w.line("assert response.status_code == 204");
        w.line(format!("assert client.get({item}).status_code == 404"));
    });

    Ok(ArtifactFile::new(path, w.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::{render_for, shop};
    use stencil_core::domain::{DomainConfiguration, Entity, Field, FieldKind};

    #[test]
    fn payload_uses_sample_literals() {
        let suite = render_for(&shop(), "Product", ArtifactKind::Tests);
        assert!(suite.contains("from shops.main import app"));
        assert!(suite.contains("BASE = \"/products\""));
        assert!(suite.contains("    \"name\": \"sample name\",\n"));
        assert!(suite.contains("    \"price\": \"19.99\",\n"));
        assert!(suite.contains("json={\"name\": \"sample name\"}"));
    }

    #[test]
    fn tests_run_in_crud_order() {
        let suite = render_for(&shop(), "Product", ArtifactKind::Tests);
        let order = [
            "def test_create_product",
            "def test_list_products",
            "def test_get_product",
            "def test_update_product",
            "def test_get_missing_product_returns_404",
            "def test_delete_product",
        ];
        let positions: Vec<usize> = order.iter().map(|t| suite.find(t).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(suite.contains("client.get(f\"{BASE}/999999\")"));
    }

    #[test]
    fn entity_without_fields_posts_an_empty_payload() {
        let config = DomainConfiguration::new("Marks").with_entity(Entity::new("Marker"));
        let suite = render_for(&config, "Marker", ArtifactKind::Tests);
        assert!(suite.contains("PAYLOAD: dict = {}"));
        assert!(suite.contains("json={})"));
    }

    #[test]
    fn client_assigned_key_is_posted() {
        let config = DomainConfiguration::new("Inventory").with_entity(
            Entity::new("Item")
                .with_field(Field::of("sku", FieldKind::ShortText).required())
                .with_primary_key("sku"),
        );
        let suite = render_for(&config, "Item", ArtifactKind::Tests);
        assert!(suite.contains("    \"sku\": \"sample sku\",\n"));
        assert!(suite.contains("client.get(f\"{BASE}/missing\")"));
        assert!(suite.contains("f\"{BASE}/{created['sku']}\""));
    }
}
