//! End-to-end tests: the real renderer behind the generation service, with
//! export through both filesystem adapters.

use std::path::Path;

use stencil_adapters::{
    ChannelProgress, InMemoryDomainStore, LocalFilesystem, MemoryFilesystem, StackRenderer,
    loader::{self, DocumentFormat},
    presets,
};
use stencil_core::{domain::TextConstraints, prelude::*};

fn service() -> GenerationService {
    GenerationService::new(Box::new(StackRenderer::new()))
}

#[test]
fn every_preset_generates_without_failures() {
    for preset in presets::all() {
        let result = service().generate(&preset);

        assert_eq!(result.status, GenerationStatus::Completed, "{}", preset.name);
        assert!(result.issues.is_empty(), "{}: {:?}", preset.name, result.issues);
        assert_eq!(result.failed().count(), 0, "{}", preset.name);

        let junctions = preset
            .relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::ManyToMany)
            .count();
        assert_eq!(
            result.total_artifacts,
            preset.entities.len() * ArtifactKind::PER_ENTITY.len() + junctions + 1
        );
        assert_eq!(result.tree.file_count(), result.total_files);
    }
}

const SMALL_SHOP: &str = r#"{
    "name": "shop",
    "entities": [
        { "name": "Product", "fields": [ { "name": "title", "type": "short-text", "required": true } ] },
        { "name": "Category", "fields": [ { "name": "label", "type": "short-text" } ] }
    ],
    "relationships": [
        { "name": "cat-products", "kind": "one-to-many", "source": "Category", "target": "Product" }
    ]
}"#;

#[test]
fn small_shop_document_generates_cleanly() {
    let config = loader::parse_str(SMALL_SHOP, DocumentFormat::Json).unwrap();
    let result = service().generate(&config);

    assert_eq!(result.status, GenerationStatus::Completed);
    assert_eq!(result.artifacts_for("Product").count(), 5);
    assert_eq!(result.artifacts_for("Category").count(), 5);
    assert_eq!(result.failed().count(), 0);

    let product = result.file("shops/models/product.py").unwrap();
    assert!(product.contains("category_id: Mapped[int | None]"));
    assert!(product.contains("id: Mapped[int] = mapped_column(Integer, primary_key=True, autoincrement=True)"));
    let category = result.file("shops/models/category.py").unwrap();
    assert!(category.contains("products: Mapped[list[\"Product\"]]"));

    // Neither entity declares `id`; the synthetic key is noted, nothing more.
    let notes: Vec<_> = result
        .issues
        .iter()
        .map(|i| (i.level, i.category, i.entity.as_deref()))
        .collect();
    assert_eq!(
        notes,
        vec![
            (IssueLevel::Info, IssueCategory::Entity, Some("Product")),
            (IssueLevel::Info, IssueCategory::Entity, Some("Category")),
        ]
    );
}

#[test]
fn small_shop_with_unknown_target_fails() {
    let document = SMALL_SHOP.replace(r#""target": "Product""#, r#""target": "Supplier""#);
    let config = loader::parse_str(&document, DocumentFormat::Json).unwrap();
    let result = service().generate(&config);

    assert_eq!(result.status, GenerationStatus::Failed);
    assert!(result.artifacts.is_empty());
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].category, IssueCategory::Relationship);
    assert!(errors[0].message.contains("Supplier"));
}

#[test]
fn foreign_key_on_the_primary_key_is_refused() {
    let document = SMALL_SHOP.replace(
        r#""target": "Product" }"#,
        r#""target": "Product", "foreignKey": "id" }"#,
    );
    let config = loader::parse_str(&document, DocumentFormat::Json).unwrap();
    assert_eq!(config.relationships[0].foreign_key.as_deref(), Some("id"));
    let result = service().generate(&config);

    assert_eq!(result.status, GenerationStatus::Failed);
    assert!(result.artifacts.is_empty());
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].category, IssueCategory::Relationship);
    assert!(errors[0].message.contains("primary key of 'Product'"));
}

#[test]
fn impossible_length_fails_only_the_tests() {
    let mut config = loader::parse_str(SMALL_SHOP, DocumentFormat::Json).unwrap();
    config.entities[1].fields.push(
        Field::new(
            "code",
            FieldType::ShortText(TextConstraints {
                min_length: Some(9),
                max_length: Some(3),
                pattern: None,
            }),
        ),
    );
    let result = service().generate(&config);

    assert_eq!(result.status, GenerationStatus::Completed);
    let failed: Vec<_> = result
        .failed()
        .map(|a| (a.entity.as_deref(), a.kind))
        .collect();
    assert_eq!(failed, vec![(Some("Category"), ArtifactKind::Tests)]);

    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field.as_deref(), Some("code"));
    assert!(result.issues.iter().any(|i| {
        i.level == IssueLevel::Warning && i.field.as_deref() == Some("code")
    }));
    assert_eq!(result.total_files, result.tree.file_count());
}

#[test]
fn shop_models_carry_relationship_columns() {
    let result = service().generate(&presets::shop());

    let product = result.file("shops/models/product.py").unwrap();
    assert!(product.contains("category_id: Mapped[int | None]"));
    assert!(product.contains("secondary=\"order_products\""));
    assert!(product.contains("secondary=\"product_tags\""));

    let category = result.file("shops/models/category.py").unwrap();
    assert!(category.contains("products: Mapped[list[\"Product\"]]"));

    assert!(result.file("shops/models/order_products.py").is_some());
    assert!(result.file("frontend/components/Category/CategoryForm.tsx").is_some());

    let main = result.file("shops/main.py").unwrap();
    assert!(main.contains("app.include_router(category_router)"));
    assert!(main.contains("import shops.models.order_products"));
    assert!(result.file("shops/database.py").unwrap().contains("def get_session()"));
}

#[test]
fn irregular_plurals_reach_the_output() {
    let result = service().generate(&presets::project_tracker());
    assert!(
        result
            .file("project_trackers/api/routes/person.py")
            .unwrap()
            .contains("prefix=\"/people\"")
    );
    assert!(
        result
            .file("project_trackers/models/status.py")
            .unwrap()
            .contains("__tablename__ = \"statuses\"")
    );
    let task = result.file("project_trackers/models/task.py").unwrap();
    assert!(task.contains("assignee: Mapped[\"Person | None\"]"));
}

#[test]
fn parallel_and_inline_runs_agree() {
    let preset = presets::crm();
    let inline = service()
        .with_options(GenerationOptions::default().with_parallelism(1))
        .generate(&preset);
    let parallel = service()
        .with_options(GenerationOptions::default().with_parallelism(8))
        .generate(&preset);

    assert_eq!(inline.artifacts, parallel.artifacts);
}

#[test]
fn progress_reaches_subscribers_in_order() {
    let sink = ChannelProgress::new();
    let updates = sink.subscribe();
    let result = service()
        .with_progress(Box::new(sink))
        .generate(&presets::blog());

    let updates: Vec<ProgressUpdate> = updates.try_iter().collect();
    assert!(updates.windows(2).all(|w| w[0].step < w[1].step));
    let last = updates.last().unwrap();
    assert_eq!(last.progress, 100);
    assert_eq!(last.files_generated, result.total_files);
}

#[test]
fn export_to_memory_writes_every_file() {
    let result = service().generate(&presets::blog());
    let fs = MemoryFilesystem::new();

    let summary = ExportService::new(Box::new(fs.clone()))
        .export(&result.tree, "out", false)
        .unwrap();

    assert_eq!(summary.files, result.total_files);
    assert_eq!(summary.bytes, result.tree.total_size());
    assert_eq!(fs.list_files().len(), result.total_files);
    assert_eq!(fs.total_bytes(), summary.bytes);
    assert_eq!(
        fs.read_file(Path::new("out/blogs/models/post_tags.py")).as_deref(),
        result.file("blogs/models/post_tags.py")
    );
}

#[test]
fn export_to_disk_refuses_existing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("app");
    let result = service().generate(&presets::shop());
    let export = ExportService::new(Box::new(LocalFilesystem::new()));

    export.export(&result.tree, &root, false).unwrap();
    let on_disk = std::fs::read_to_string(root.join("shops/schemas/product.py")).unwrap();
    assert_eq!(Some(on_disk.as_str()), result.file("shops/schemas/product.py"));

    let err = export.export(&result.tree, &root, false).unwrap_err();
    assert!(matches!(
        err,
        StencilError::Application(stencil_core::application::ApplicationError::OutputExists { .. })
    ));
    export.export(&result.tree, &root, true).unwrap();
}

#[test]
fn json_and_yaml_documents_load_identically() {
    let json = r#"{
        "name": "Library",
        "entities": [
            {
                "name": "Book",
                "fields": [
                    { "name": "title", "type": "short-text", "required": true,
                      "validation": { "maxLength": 200 } },
                    { "name": "pages", "type": "integer", "validation": { "min": 1 } }
                ]
            },
            { "name": "Author", "fields": [ { "name": "name", "type": "short-text" } ] }
        ],
        "relationships": [
            { "name": "author-books", "kind": "one-to-many",
              "source": "Author", "target": "Book", "backReference": "books" }
        ]
    }"#;
    let yaml = "
name: Library
entities:
  - name: Book
    fields:
      - name: title
        type: short-text
        required: true
        validation:
          maxLength: 200
      - name: pages
        type: integer
        validation:
          min: 1
  - name: Author
    fields:
      - name: name
        type: short-text
relationships:
  - name: author-books
    kind: one-to-many
    source: Author
    target: Book
    backReference: books
";
    let from_json = loader::parse_str(json, DocumentFormat::Json).unwrap();
    let from_yaml = loader::parse_str(yaml, DocumentFormat::Yaml).unwrap();
    assert_eq!(from_json, from_yaml);

    let a = service().generate(&from_json);
    let b = service().generate(&from_yaml);
    assert_eq!(a.status, GenerationStatus::Completed);
    assert_eq!(a.artifacts, b.artifacts);
}

#[test]
fn domain_service_serves_presets() {
    let service = DomainService::new(Box::new(InMemoryDomainStore::with_presets()));
    let summaries = service.list().unwrap();
    assert_eq!(summaries.len(), presets::all().len());

    let shop = summaries.iter().find(|s| s.name == "Shop").unwrap();
    assert_eq!(shop.entities, 5);
    assert_eq!(shop.relationships, 4);
}
