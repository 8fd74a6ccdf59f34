//! Built-in domain presets.
//!
//! One configuration per domain category the template builder offers. They
//! double as realistic fixtures: between them they cover every relationship
//! kind, irregular plurals (`Category`, `Person`, `Status`, `Company`,
//! `Address`) and foreign key / back-reference overrides.

use stencil_core::domain::{
    DomainConfiguration, Entity, Field, FieldKind, FieldType, Relationship, RelationshipKind,
    ValidationRules,
};

/// Every preset, in display order.
pub fn all() -> Vec<DomainConfiguration> {
    vec![shop(), project_tracker(), blog(), crm()]
}

/// A preset by name, ignoring case and `-`/`_` separators.
pub fn find(name: &str) -> Option<DomainConfiguration> {
    all().into_iter().find(|preset| same_name(&preset.name, name))
}

/// Name equality ignoring case and `-`/`_`/space separators.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Explicit auto-increment key, so presets validate without notices.
fn key() -> Field {
    Field::of("id", FieldKind::Integer)
}

fn text(name: &str, max_length: u32) -> Field {
    Field::new(
        name,
        FieldType::parse(
            FieldKind::ShortText.as_str(),
            Some(ValidationRules {
                max_length: Some(max_length),
                ..ValidationRules::default()
            }),
        ),
    )
}

fn ranged(name: &str, kind: FieldKind, min: Option<f64>, max: Option<f64>) -> Field {
    Field::new(
        name,
        FieldType::parse(
            kind.as_str(),
            Some(ValidationRules {
                min,
                max,
                ..ValidationRules::default()
            }),
        ),
    )
}

fn one_to_many(name: &str, source: &str, target: &str) -> Relationship {
    Relationship::new(name, RelationshipKind::OneToMany, source, target)
}

fn many_to_many(name: &str, source: &str, target: &str) -> Relationship {
    Relationship::new(name, RelationshipKind::ManyToMany, source, target)
}

// ── Presets ───────────────────────────────────────────────────────────────────

/// E-commerce storefront.
pub fn shop() -> DomainConfiguration {
    DomainConfiguration::new("Shop")
        .with_title("Online Shop")
        .with_domain("ecommerce")
        .with_version("1.0.0")
        .with_entity(
            Entity::new("Product")
                .with_description("An item offered for sale.")
                .with_field(key())
                .with_field(text("name", 120).required())
                .with_field(Field::of("description", FieldKind::LongText))
                .with_field(ranged("price", FieldKind::Decimal, Some(0.0), None).required())
                .with_field(Field::of("in_stock", FieldKind::Boolean).with_default(true))
                .with_field(text("sku", 64).unique())
                .with_field(Field::of("image", FieldKind::FileReference)),
        )
        .with_entity(
            Entity::new("Category")
                .with_field(key())
                .with_field(text("name", 80).required().unique())
                .with_field(Field::of("slug", FieldKind::ShortText)),
        )
        .with_entity(
            Entity::new("Customer")
                .with_field(key())
                .with_field(Field::of("email", FieldKind::Email).required().unique())
                .with_field(text("full_name", 120).required())
                .with_field(Field::of("joined_on", FieldKind::Date)),
        )
        .with_entity(
            Entity::new("Order")
                .with_field(key())
                .with_field(Field::of("placed_at", FieldKind::DateTime).required())
                .with_field(text("state", 32).with_default("pending"))
                .with_field(ranged("total", FieldKind::Decimal, Some(0.0), None)),
        )
        .with_entity(
            Entity::new("Tag")
                .with_field(key())
                .with_field(text("label", 40).required().unique()),
        )
        .with_relationship(one_to_many("category-products", "Category", "Product"))
        .with_relationship(one_to_many("customer-orders", "Customer", "Order"))
        .with_relationship(many_to_many("order-products", "Order", "Product"))
        .with_relationship(many_to_many("product-tags", "Product", "Tag"))
}

/// Project management board.
pub fn project_tracker() -> DomainConfiguration {
    DomainConfiguration::new("ProjectTracker")
        .with_title("Project Tracker")
        .with_domain("project-management")
        .with_version("1.0.0")
        .with_entity(
            Entity::new("Project")
                .with_field(key())
                .with_field(text("name", 120).required())
                .with_field(Field::of("summary", FieldKind::LongText))
                .with_field(Field::of("starts_on", FieldKind::Date))
                .with_field(ranged("budget", FieldKind::Decimal, Some(0.0), None)),
        )
        .with_entity(
            Entity::new("Task")
                .with_field(key())
                .with_field(text("title", 200).required())
                .with_field(Field::of("details", FieldKind::LongText))
                .with_field(Field::of("done", FieldKind::Boolean).with_default(false))
                .with_field(Field::of("due_on", FieldKind::Date))
                .with_field(ranged("estimate_hours", FieldKind::Integer, Some(0.0), Some(1000.0))),
        )
        .with_entity(
            Entity::new("Person")
                .with_field(key())
                .with_field(text("full_name", 120).required())
                .with_field(Field::of("email", FieldKind::Email).required().unique()),
        )
        .with_entity(
            Entity::new("Status")
                .with_field(key())
                .with_description("A column on the board, such as 'In progress'.")
                .with_field(text("name", 40).required().unique())
                .with_field(ranged("position", FieldKind::Integer, Some(0.0), None)),
        )
        .with_relationship(one_to_many("project-tasks", "Project", "Task"))
        .with_relationship(one_to_many("status-tasks", "Status", "Task"))
        .with_relationship(
            one_to_many("person-tasks", "Person", "Task")
                .with_foreign_key("assignee_id")
                .with_back_reference("assigned_tasks"),
        )
        .with_relationship(many_to_many("project-members", "Project", "Person"))
}

/// Publishing platform.
pub fn blog() -> DomainConfiguration {
    DomainConfiguration::new("Blog")
        .with_domain("content")
        .with_version("1.0.0")
        .with_entity(
            Entity::new("Author")
                .with_field(key())
                .with_field(text("display_name", 80).required())
                .with_field(Field::of("email", FieldKind::Email).unique())
                .with_field(Field::of("bio", FieldKind::LongText))
                .with_field(Field::of("website", FieldKind::Url)),
        )
        .with_entity(
            Entity::new("Post")
                .with_field(key())
                .with_field(text("title", 200).required())
                .with_field(Field::of("body", FieldKind::LongText).required())
                .with_field(Field::of("published", FieldKind::Boolean).with_default(false))
                .with_field(Field::of("published_at", FieldKind::DateTime))
                .with_field(Field::of("extra", FieldKind::StructuredData)),
        )
        .with_entity(
            Entity::new("Comment")
                .with_field(key())
                .with_field(Field::of("body", FieldKind::LongText).required())
                .with_field(Field::of("created_at", FieldKind::DateTime)),
        )
        .with_entity(
            Entity::new("Tag")
                .with_field(key())
                .with_field(text("name", 40).required().unique()),
        )
        .with_relationship(one_to_many("author-posts", "Author", "Post"))
        .with_relationship(one_to_many("post-comments", "Post", "Comment"))
        .with_relationship(many_to_many("post-tags", "Post", "Tag"))
}

/// Customer relationship management.
pub fn crm() -> DomainConfiguration {
    DomainConfiguration::new("Crm")
        .with_title("Customer Relationships")
        .with_domain("crm")
        .with_version("1.0.0")
        .with_entity(
            Entity::new("Company")
                .with_field(key())
                .with_field(text("name", 120).required().unique())
                .with_field(Field::of("website", FieldKind::Url))
                .with_field(Field::of("industry", FieldKind::ShortText))
                .with_field(ranged("employees", FieldKind::Integer, Some(0.0), None)),
        )
        .with_entity(
            Entity::new("Person")
                .with_field(key())
                .with_field(text("first_name", 80).required())
                .with_field(text("last_name", 80).required())
                .with_field(Field::of("email", FieldKind::Email).unique())
                .with_field(text("phone", 32)),
        )
        .with_entity(
            Entity::new("Deal")
                .with_field(key())
                .with_field(Field::of("reference", FieldKind::Identifier))
                .with_field(text("title", 160).required())
                .with_field(ranged("amount", FieldKind::Decimal, Some(0.0), None))
                .with_field(text("stage", 32).with_default("lead"))
                .with_field(Field::of("closes_on", FieldKind::Date)),
        )
        .with_entity(
            Entity::new("Address")
                .with_field(key())
                .with_field(text("line1", 120).required())
                .with_field(text("city", 80).required())
                .with_field(text("postal_code", 16))
                .with_field(text("country", 2)),
        )
        .with_relationship(one_to_many("company-people", "Company", "Person"))
        .with_relationship(one_to_many("company-deals", "Company", "Deal"))
        .with_relationship(
            one_to_many("person-deals", "Person", "Deal")
                .with_foreign_key("contact_id")
                .with_back_reference("deals"),
        )
        .with_relationship(Relationship::new(
            "company-address",
            RelationshipKind::OneToOne,
            "Company",
            "Address",
        ))
}
