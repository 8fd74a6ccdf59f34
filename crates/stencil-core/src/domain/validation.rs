use std::collections::HashMap;

use crate::domain::{
    entities::{DomainConfiguration, Entity, Field, ValidationIssue},
    error::DomainError,
    naming,
    registry::MAX_TEXT_LENGTH,
    relationships::{RelationshipResolver, ResolvedRelationship},
    value_objects::IssueCategory,
};

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    /// Issues grouped by category (domain, entity, field, relationship), each
    /// group in input order.
    pub issues: Vec<ValidationIssue>,
    /// Relationships that resolved cleanly, in declaration order. Empty when
    /// any relationship failed to resolve.
    pub resolved: Vec<ResolvedRelationship>,
}

impl Inspection {
    pub fn is_blocked(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_blocking)
    }
}

/// Structural checker over a [`DomainConfiguration`].
///
/// Total: never panics, never errors, never mutates its input. Every problem
/// is reported as a [`ValidationIssue`].
pub struct DomainValidator;

impl DomainValidator {
    /// Check a configuration and return its issues.
    pub fn validate(config: &DomainConfiguration) -> Vec<ValidationIssue> {
        Self::inspect(config).issues
    }

    /// Check a configuration and keep the resolved relationships.
    pub fn inspect(config: &DomainConfiguration) -> Inspection {
        let mut issues = Vec::new();
        issues.extend(domain_issues(config));
        issues.extend(entity_issues(config));
        issues.extend(field_issues(config));

        let (relationship_issues, resolved) = relationship_issues(config);
        issues.extend(relationship_issues);

        Inspection { issues, resolved }
    }
}

// ── Domain ───────────────────────────────────────────────────────────────────

fn domain_issues(config: &DomainConfiguration) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if config.name.trim().is_empty() {
        issues.push(
            ValidationIssue::error(IssueCategory::Domain, "Configuration name is required")
                .with_suggestion("Give the template a name, e.g. \"Shop\""),
        );
    } else if !naming::is_valid_identifier(&config.package_name()) {
        issues.push(
            ValidationIssue::error(
                IssueCategory::Domain,
                format!(
                    "Configuration name '{}' does not give a valid package name",
                    config.name
                ),
            )
            .with_suggestion("Use letters, digits, spaces, '-' or '_', starting with a letter"),
        );
    }
    issues
}

// ── Entities ─────────────────────────────────────────────────────────────────

fn entity_issues(config: &DomainConfiguration) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.entities.is_empty() {
        issues.push(
            ValidationIssue::warning(IssueCategory::Entity, "Template has no structure: no entities defined")
                .with_suggestion("Add at least one entity"),
        );
        return issues;
    }

    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut snake_names: HashMap<String, &str> = HashMap::new();

    for entity in &config.entities {
        let name = entity.name.as_str();

        if !naming::is_valid_identifier(name) {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::Entity,
                    format!("Entity name '{name}' is not a valid identifier"),
                )
                .with_suggestion("Use letters, digits and underscores, starting with a letter")
                .for_entity(name),
            );
        }

        let seen = names.entry(name).or_insert(0);
        *seen += 1;
        if *seen == 2 {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::Entity,
                    format!("Entity name '{name}' is used more than once"),
                )
                .with_suggestion("Entity names must be unique within a template")
                .for_entity(name),
            );
        } else if *seen == 1 {
            let snake = naming::to_snake_case(name);
            match snake_names.get(&snake) {
                Some(first) => issues.push(
                    ValidationIssue::error(
                        IssueCategory::Entity,
                        format!(
                            "Entity '{name}' and '{first}' would both generate files named '{snake}'"
                        ),
                    )
                    .with_suggestion("Rename one of the entities")
                    .for_entity(name),
                ),
                None => {
                    snake_names.insert(snake, name);
                }
            }
        }

        if entity.fields.is_empty() {
            issues.push(
                ValidationIssue::warning(
                    IssueCategory::Entity,
                    format!("Entity '{name}' has no fields"),
                )
                .with_suggestion("Add fields to give the entity some data")
                .for_entity(name),
            );
        }

        issues.extend(primary_key_issue(entity));
    }

    issues
}

fn primary_key_issue(entity: &Entity) -> Option<ValidationIssue> {
    let name = &entity.name;
    match &entity.primary_key {
        Some(key) if entity.field(key).is_none() => Some(
            ValidationIssue::error(
                IssueCategory::Entity,
                format!("Primary key '{key}' of entity '{name}' is not one of its fields"),
            )
            .with_suggestion("Point 'primaryKey' at a declared field, or remove it")
            .for_entity(name),
        ),
        Some(_) => None,
        None if entity.primary_key().is_synthetic() => Some(
            ValidationIssue::info(
                IssueCategory::Entity,
                format!("Entity '{name}' has no primary key; a synthetic 'id' key will be added"),
            )
            .for_entity(name),
        ),
        None => None,
    }
}

// ── Fields ───────────────────────────────────────────────────────────────────

fn field_issues(config: &DomainConfiguration) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for entity in &config.entities {
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for field in &entity.fields {
            let count = seen.entry(field.name.as_str()).or_insert(0);
            *count += 1;
            let duplicate = *count == 2;
            issues.extend(check_field(entity, field, duplicate));
        }
    }

    issues
}

fn check_field(entity: &Entity, field: &Field, duplicate: bool) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let (e, f) = (entity.name.as_str(), field.name.as_str());

    if !naming::is_valid_identifier(f) {
        issues.push(
            ValidationIssue::error(
                IssueCategory::Field,
                format!("Field name '{e}.{f}' is not a valid identifier"),
            )
            .with_suggestion("Use letters, digits and underscores, starting with a letter")
            .for_field(e, f),
        );
    }

    if duplicate {
        issues.push(
            ValidationIssue::error(
                IssueCategory::Field,
                format!("Field '{f}' is declared more than once on '{e}'"),
            )
            .with_suggestion("Field names must be unique within an entity")
            .for_field(e, f),
        );
    }

    if field.unique && field.default_value.as_ref().is_some_and(|v| !v.is_null()) {
        issues.push(
            ValidationIssue::warning(
                IssueCategory::Field,
                format!("Field '{e}.{f}' is unique but has a constant default"),
            )
            .with_suggestion("Only one row could ever use the default; remove it or drop 'unique'")
            .for_field(e, f),
        );
    }

    let inverted = field
        .field_type
        .text_constraints()
        .is_some_and(|c| matches!((c.min_length, c.max_length), (Some(min), Some(max)) if min > max))
        || field
            .field_type
            .numeric_constraints()
            .is_some_and(|c| matches!((c.min, c.max), (Some(min), Some(max)) if min > max));
    if inverted {
        issues.push(
            ValidationIssue::warning(
                IssueCategory::Field,
                format!("Field '{e}.{f}' has a minimum greater than its maximum"),
            )
            .with_suggestion("No value can satisfy this constraint; swap or fix the bounds")
            .for_field(e, f),
        );
    }

    if let Some(min) = field.field_type.text_constraints().and_then(|c| c.min_length)
        && min > MAX_TEXT_LENGTH
    {
        issues.push(
            ValidationIssue::error(
                IssueCategory::Field,
                format!(
                    "Field '{e}.{f}' has a minimum length of {min}, above the supported {MAX_TEXT_LENGTH}"
                ),
            )
            .with_suggestion(format!("Keep 'minLength' at or below {MAX_TEXT_LENGTH}"))
            .for_field(e, f),
        );
    }

    if let Some(pattern) = field
        .field_type
        .text_constraints()
        .and_then(|c| c.pattern.as_deref())
        && let Err(err) = regex_lite::Regex::new(pattern)
    {
        issues.push(
            ValidationIssue::warning(
                IssueCategory::Field,
                format!("Field '{e}.{f}' has an invalid pattern: {err}"),
            )
            .with_suggestion("The pattern will be ignored in generated validation")
            .for_field(e, f),
        );
    }

    issues
}

// ── Relationships ────────────────────────────────────────────────────────────

fn relationship_issues(
    config: &DomainConfiguration,
) -> (Vec<ValidationIssue>, Vec<ResolvedRelationship>) {
    let mut issues = Vec::new();
    let mut resolvable = Vec::new();

    for rel in &config.relationships {
        let missing: Vec<&str> = [rel.source.as_str(), rel.target.as_str()]
            .into_iter()
            .filter(|name| config.entity(name).is_none())
            .fold(Vec::new(), |mut acc, name| {
                if !acc.contains(&name) {
                    acc.push(name);
                }
                acc
            });

        if missing.is_empty() {
            resolvable.push(rel.clone());
            continue;
        }

        let list = missing
            .iter()
            .map(|m| format!("'{m}'"))
            .collect::<Vec<_>>()
            .join(" and ");
        issues.push(
            ValidationIssue::error(
                IssueCategory::Relationship,
                format!("Relationship '{}' references unknown entity {list}", rel.name),
            )
            .with_suggestion(format!(
                "Declare {list} as an entity, or point the relationship at an existing one"
            )),
        );
    }

    match RelationshipResolver::resolve(&config.entities, &resolvable) {
        Ok(resolved) if issues.is_empty() => (issues, resolved),
        Ok(_) => (issues, Vec::new()),
        Err(errors) => {
            issues.extend(errors.iter().map(resolution_issue));
            (issues, Vec::new())
        }
    }
}

fn resolution_issue(err: &DomainError) -> ValidationIssue {
    let mut issue = ValidationIssue::error(IssueCategory::Relationship, err.to_string());
    if let Some(first) = err.suggestions().into_iter().next() {
        issue = issue.with_suggestion(first);
    }
    issue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{FieldType, NumericConstraints, Relationship, TextConstraints},
        value_objects::{FieldKind, IssueLevel, RelationshipKind},
    };

    fn shop() -> DomainConfiguration {
        DomainConfiguration::new("Shop")
            .with_entity(
                Entity::new("Product")
                    .with_field(Field::of("id", FieldKind::Integer))
                    .with_field(Field::of("name", FieldKind::ShortText).required()),
            )
            .with_entity(
                Entity::new("Category")
                    .with_field(Field::of("id", FieldKind::Integer))
                    .with_field(Field::of("name", FieldKind::ShortText)),
            )
            .with_relationship(Relationship::new(
                "category-products",
                RelationshipKind::OneToMany,
                "Category",
                "Product",
            ))
    }

    fn summary(issues: &[ValidationIssue]) -> Vec<(IssueLevel, IssueCategory)> {
        issues.iter().map(|i| (i.level, i.category)).collect()
    }

    #[test]
    fn clean_configuration_has_no_issues() {
        let inspection = DomainValidator::inspect(&shop());
        assert!(inspection.issues.is_empty());
        assert_eq!(inspection.resolved.len(), 1);
        assert!(!inspection.is_blocked());
    }

    #[test]
    fn blank_name_is_domain_error() {
        let mut config = shop();
        config.name = "  ".into();
        let issues = DomainValidator::validate(&config);
        assert_eq!(summary(&issues), vec![(IssueLevel::Error, IssueCategory::Domain)]);
    }

    #[test]
    fn name_must_give_a_valid_package() {
        for bad in ["../../tmp/evil", "/etc/shop", "shop.v2", "2fast"] {
            let mut config = shop();
            config.name = bad.into();
            let issues = DomainValidator::validate(&config);
            assert_eq!(
                summary(&issues),
                vec![(IssueLevel::Error, IssueCategory::Domain)],
                "{bad}"
            );
            assert!(issues[0].message.contains(bad));
        }

        for good in ["Shop", "Project Tracker", "online-shop", "crm_2"] {
            let mut config = shop();
            config.name = good.into();
            assert!(DomainValidator::validate(&config).is_empty(), "{good}");
        }
    }

    #[test]
    fn minimum_length_above_ceiling_is_field_error() {
        let config = DomainConfiguration::new("Shop").with_entity(
            Entity::new("Product")
                .with_field(Field::of("id", FieldKind::Integer))
                .with_field(Field::new(
                    "notes",
                    FieldType::LongText(TextConstraints {
                        min_length: Some(5_000_000),
                        ..TextConstraints::default()
                    }),
                )),
        );
        let issues = DomainValidator::validate(&config);
        assert_eq!(summary(&issues), vec![(IssueLevel::Error, IssueCategory::Field)]);
        assert!(issues[0].message.contains("5000000"));
        assert!(issues[0].quarantines("Product"));
    }

    #[test]
    fn empty_template_warns() {
        let issues = DomainValidator::validate(&DomainConfiguration::new("Empty"));
        assert_eq!(summary(&issues), vec![(IssueLevel::Warning, IssueCategory::Entity)]);
        assert!(issues[0].message.contains("no structure"));
    }

    #[test]
    fn dangling_reference_is_single_relationship_error() {
        let mut config = shop();
        config.relationships[0].target = "Supplier".into();
        let inspection = DomainValidator::inspect(&config);

        assert_eq!(
            summary(&inspection.issues),
            vec![(IssueLevel::Error, IssueCategory::Relationship)]
        );
        assert!(inspection.issues[0].message.contains("Supplier"));
        assert!(inspection.is_blocked());
        assert!(inspection.resolved.is_empty());
    }

    #[test]
    fn issues_are_grouped_by_category_in_input_order() {
        let config = DomainConfiguration::new("")
            .with_entity(
                Entity::new("Note")
                    .with_field(Field::of("body", FieldKind::LongText))
                    .with_field(Field::of("body", FieldKind::LongText)),
            )
            .with_entity(Entity::new("Empty").with_field(Field::of("id", FieldKind::Identifier)))
            .with_entity(Entity::new("Empty"))
            .with_entity(
                Entity::new("Coupon")
                    .with_field(
                        Field::of("code", FieldKind::ShortText)
                            .unique()
                            .with_default("WELCOME"),
                    )
                    .with_primary_key("code"),
            )
            .with_relationship(Relationship::new(
                "dangling",
                RelationshipKind::OneToMany,
                "Note",
                "Ghost",
            ));

        let issues = DomainValidator::validate(&config);
        let shape: Vec<_> = issues
            .iter()
            .map(|i| (i.level, i.category, i.entity.as_deref()))
            .collect();

        assert_eq!(
            shape,
            vec![
                (IssueLevel::Error, IssueCategory::Domain, None),
                (IssueLevel::Info, IssueCategory::Entity, Some("Note")),
                (IssueLevel::Error, IssueCategory::Entity, Some("Empty")),
                (IssueLevel::Warning, IssueCategory::Entity, Some("Empty")),
                (IssueLevel::Info, IssueCategory::Entity, Some("Empty")),
                (IssueLevel::Error, IssueCategory::Field, Some("Note")),
                (IssueLevel::Warning, IssueCategory::Field, Some("Coupon")),
                (IssueLevel::Error, IssueCategory::Relationship, None),
            ]
        );
    }

    #[test]
    fn missing_primary_key_field_is_entity_error() {
        let config = DomainConfiguration::new("Shop").with_entity(
            Entity::new("Product")
                .with_field(Field::of("name", FieldKind::ShortText))
                .with_primary_key("sku"),
        );
        let issues = DomainValidator::validate(&config);
        assert_eq!(summary(&issues), vec![(IssueLevel::Error, IssueCategory::Entity)]);
        assert!(issues[0].quarantines("Product"));
    }

    #[test]
    fn invalid_identifiers_and_snake_collisions() {
        let config = DomainConfiguration::new("Shop")
            .with_entity(Entity::new("OrderItem").with_field(Field::of("id", FieldKind::Integer)))
            .with_entity(Entity::new("order_item").with_field(Field::of("id", FieldKind::Integer)))
            .with_entity(
                Entity::new("2Bad")
                    .with_field(Field::of("id", FieldKind::Integer))
                    .with_field(Field::of("unit price", FieldKind::Decimal)),
            );

        let issues = DomainValidator::validate(&config);
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();

        assert_eq!(issues.len(), 3);
        assert!(messages[0].contains("would both generate"));
        assert!(messages[1].contains("'2Bad' is not a valid identifier"));
        assert!(messages[2].contains("'2Bad.unit price' is not a valid identifier"));
    }

    #[test]
    fn constraint_warnings() {
        let config = DomainConfiguration::new("Shop").with_entity(
            Entity::new("Product")
                .with_field(Field::of("id", FieldKind::Integer))
                .with_field(Field::new(
                    "qty",
                    FieldType::Integer(NumericConstraints {
                        min: Some(10.0),
                        max: Some(1.0),
                    }),
                ))
                .with_field(Field::new(
                    "code",
                    FieldType::ShortText(TextConstraints {
                        pattern: Some("([a-z".into()),
                        ..TextConstraints::default()
                    }),
                )),
        );

        let issues = DomainValidator::validate(&config);
        assert_eq!(
            summary(&issues),
            vec![
                (IssueLevel::Warning, IssueCategory::Field),
                (IssueLevel::Warning, IssueCategory::Field),
            ]
        );
        assert!(issues[0].message.contains("minimum greater"));
        assert!(issues[1].message.contains("invalid pattern"));
    }

    #[test]
    fn ambiguous_self_relationship_surfaces_as_relationship_error() {
        let config = shop().with_relationship(Relationship::new(
            "related",
            RelationshipKind::ManyToMany,
            "Product",
            "Product",
        ));
        let inspection = DomainValidator::inspect(&config);
        assert_eq!(
            summary(&inspection.issues),
            vec![(IssueLevel::Error, IssueCategory::Relationship)]
        );
        assert!(inspection.issues[0].message.contains("related"));
        assert!(inspection.is_blocked());
    }

    #[test]
    fn validation_does_not_flag_unsupported_types() {
        let mut config = shop();
        config.entities[0]
            .fields
            .push(Field::new("location", FieldType::Unsupported("geo-point".into())));
        assert!(DomainValidator::validate(&config).is_empty());
    }
}
