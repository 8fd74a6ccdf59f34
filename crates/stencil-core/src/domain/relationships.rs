//! Relationship resolution.
//!
//! Turns declared [`Relationship`]s into concrete emission rules: which
//! entity owns the foreign key column, what the navigation attributes on
//! each side are called, and which many-to-many links need a junction table.
//!
//! | Kind         | Foreign key              | Source side                 | Target side                  |
//! |--------------|--------------------------|-----------------------------|------------------------------|
//! | one-to-many  | `<source>_id` on target  | collection `plural(target)` | reference `<fk sans _id>`    |
//! | one-to-one   | `<source>_id` on target  | reference `snake(target)`   | reference `<fk sans _id>`    |
//! | many-to-many | junction `<source>_<plural(target)>` | collection `plural(target)` | collection `plural(source)` |
//!
//! Names added to an entity must be unique on that entity across all
//! relationships; see [`RelationshipResolver::resolve`] for the failure
//! modes.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{
    entities::{Entity, Relationship},
    error::DomainError,
    naming,
    value_objects::{FieldKind, RelationshipKind},
};

// ── Resolved shapes ──────────────────────────────────────────────────────────

/// The primary key column a foreign key points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReference {
    pub entity: String,
    pub table: String,
    pub column: String,
    /// Kind of the key column; `None` when the key field's type is
    /// unsupported.
    pub kind: Option<FieldKind>,
}

impl KeyReference {
    fn of(entity: &Entity) -> Self {
        let key = entity.primary_key();
        Self {
            entity: entity.name.clone(),
            table: entity.table_name(),
            column: key.name().to_string(),
            kind: key.kind(),
        }
    }

    /// `table.column`, as written in a foreign key clause.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// A foreign key column on its owning entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub relationship: String,
    /// Entity that owns the column.
    pub host: String,
    pub column: String,
    pub references: KeyReference,
    /// The column is a field the host already declares.
    pub reuses_field: bool,
    /// One-to-one keys are unique.
    pub unique: bool,
}

/// A many-to-many join table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    pub relationship: String,
    pub table: String,
    pub source: KeyReference,
    pub source_column: String,
    pub target: KeyReference,
    pub target_column: String,
}

/// A navigation attribute placed on an entity's model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationProperty {
    pub relationship: String,
    /// Entity the attribute lives on.
    pub host: String,
    pub name: String,
    /// Entity the attribute navigates to.
    pub target: String,
    pub collection: bool,
    /// Name of the paired attribute on `target`.
    pub back_populates: String,
    /// Junction table for many-to-many navigation.
    pub secondary: Option<String>,
    /// Foreign key column the navigation follows (one-to-one/one-to-many).
    pub foreign_key: Option<String>,
    /// The foreign key column lives on `host` rather than on `target`.
    pub owns_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipLink {
    ForeignKey(ForeignKey),
    Junction(Junction),
}

/// A relationship with every derived name decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelationship {
    pub name: String,
    pub kind: RelationshipKind,
    pub source: String,
    pub target: String,
    pub link: RelationshipLink,
    /// Navigation attributes on either side, forward side first.
    pub navigations: Vec<NavigationProperty>,
}

impl ResolvedRelationship {
    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        match &self.link {
            RelationshipLink::ForeignKey(fk) => Some(fk),
            RelationshipLink::Junction(_) => None,
        }
    }

    pub fn junction(&self) -> Option<&Junction> {
        match &self.link {
            RelationshipLink::Junction(j) => Some(j),
            RelationshipLink::ForeignKey(_) => None,
        }
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

pub struct RelationshipResolver;

impl RelationshipResolver {
    /// Resolve every relationship, or report every failure.
    ///
    /// Failures, in relationship order:
    /// - [`DomainError::UnknownEntity`] for a dangling source or target
    /// - [`DomainError::AmbiguousSelfRelationship`] when a self-relationship
    ///   would add the same name twice to its entity
    /// - [`DomainError::RelationshipNameCollision`] when two relationships add
    ///   the same name to one entity
    /// - [`DomainError::RelationshipShadowsField`] when a navigation name
    ///   matches a declared field
    /// - [`DomainError::ForeignKeyIsPrimaryKey`] when the key column is the
    ///   host's own primary key
    /// - [`DomainError::JunctionTableCollision`] when two many-to-many
    ///   relationships derive the same join table
    /// - [`DomainError::JunctionShadowsEntity`] when a join table would be
    ///   written over an entity's model
    pub fn resolve(
        entities: &[Entity],
        relationships: &[Relationship],
    ) -> Result<Vec<ResolvedRelationship>, Vec<DomainError>> {
        let by_name: HashMap<&str, &Entity> = entities
            .iter()
            .rev()
            .map(|e| (e.name.as_str(), e))
            .collect();

        let mut resolved = Vec::with_capacity(relationships.len());
        let mut errors = Vec::new();
        let mut claimed: HashMap<(String, String), String> = HashMap::new();
        let mut tables: HashMap<String, String> = HashMap::new();

        for rel in relationships {
            let (Some(source), Some(target)) = (
                by_name.get(rel.source.as_str()),
                by_name.get(rel.target.as_str()),
            ) else {
                for missing in [&rel.source, &rel.target] {
                    if !by_name.contains_key(missing.as_str()) {
                        errors.push(DomainError::UnknownEntity {
                            relationship: rel.name.clone(),
                            entity: missing.clone(),
                        });
                    }
                }
                continue;
            };

            let candidate = resolve_one(rel, source, target);

            if let Err(e) = check_self_names(rel, &candidate) {
                errors.push(e);
                continue;
            }

            if let RelationshipLink::ForeignKey(fk) = &candidate.link
                && target.primary_key().name() == fk.column
            {
                errors.push(DomainError::ForeignKeyIsPrimaryKey {
                    relationship: rel.name.clone(),
                    entity: fk.host.clone(),
                    column: fk.column.clone(),
                });
                continue;
            }

            let mut failed = false;

            if let RelationshipLink::Junction(j) = &candidate.link {
                if let Some(entity) = entities.iter().find(|e| e.snake_name() == j.table) {
                    errors.push(DomainError::JunctionShadowsEntity {
                        table: j.table.clone(),
                        relationship: rel.name.clone(),
                        entity: entity.name.clone(),
                    });
                    failed = true;
                }
                match tables.get(&j.table) {
                    Some(first) => {
                        errors.push(DomainError::JunctionTableCollision {
                            table: j.table.clone(),
                            first: first.clone(),
                            second: rel.name.clone(),
                        });
                        failed = true;
                    }
                    None => {
                        tables.insert(j.table.clone(), rel.name.clone());
                    }
                }
            }

            for (host, name, is_column) in added_names(&candidate) {
                let declared = by_name.get(host.as_str()).and_then(|e| e.field(&name));
                if declared.is_some() && !is_column {
                    errors.push(DomainError::RelationshipShadowsField {
                        relationship: rel.name.clone(),
                        entity: host.clone(),
                        name: name.clone(),
                    });
                    failed = true;
                    continue;
                }

                match claimed.get(&(host.clone(), name.clone())) {
                    Some(first) if *first != rel.name => {
                        errors.push(DomainError::RelationshipNameCollision {
                            entity: host.clone(),
                            name: name.clone(),
                            first: first.clone(),
                            second: rel.name.clone(),
                        });
                        failed = true;
                    }
                    Some(_) => {}
                    None => {
                        claimed.insert((host, name), rel.name.clone());
                    }
                }
            }

            if !failed {
                resolved.push(candidate);
            }
        }

        if errors.is_empty() {
            Ok(resolved)
        } else {
            Err(errors)
        }
    }
}

fn resolve_one(rel: &Relationship, source: &Entity, target: &Entity) -> ResolvedRelationship {
    let source_snake = source.snake_name();
    let target_snake = target.snake_name();

    let (link, navigations) = match rel.kind {
        RelationshipKind::OneToMany | RelationshipKind::OneToOne => {
            let column = rel
                .foreign_key
                .clone()
                .unwrap_or_else(|| format!("{source_snake}_id"));
            let forward = navigation_name(&column);
            let one_to_one = rel.kind == RelationshipKind::OneToOne;
            let back = rel.back_reference.clone().unwrap_or_else(|| {
                if one_to_one {
                    target_snake.clone()
                } else {
                    naming::pluralize(&target_snake)
                }
            });

            let fk = ForeignKey {
                relationship: rel.name.clone(),
                host: target.name.clone(),
                reuses_field: target.field(&column).is_some(),
                column,
                references: KeyReference::of(source),
                unique: one_to_one,
            };
            let navigations = vec![
                NavigationProperty {
                    relationship: rel.name.clone(),
                    host: target.name.clone(),
                    name: forward.clone(),
                    target: source.name.clone(),
                    collection: false,
                    back_populates: back.clone(),
                    secondary: None,
                    foreign_key: Some(fk.column.clone()),
                    owns_key: true,
                },
                NavigationProperty {
                    relationship: rel.name.clone(),
                    host: source.name.clone(),
                    name: back,
                    target: target.name.clone(),
                    collection: !one_to_one,
                    back_populates: forward,
                    secondary: None,
                    foreign_key: Some(fk.column.clone()),
                    owns_key: false,
                },
            ];
            (RelationshipLink::ForeignKey(fk), navigations)
        }
        RelationshipKind::ManyToMany => {
            let table = format!("{source_snake}_{}", naming::pluralize(&target_snake));
            let junction = Junction {
                relationship: rel.name.clone(),
                table: table.clone(),
                source: KeyReference::of(source),
                source_column: format!("{source_snake}_id"),
                target: KeyReference::of(target),
                target_column: rel
                    .foreign_key
                    .clone()
                    .unwrap_or_else(|| format!("{target_snake}_id")),
            };
            let source_side = rel
                .back_reference
                .clone()
                .unwrap_or_else(|| naming::pluralize(&target_snake));
            let target_side = naming::pluralize(&source_snake);

            let navigations = vec![
                NavigationProperty {
                    relationship: rel.name.clone(),
                    host: source.name.clone(),
                    name: source_side.clone(),
                    target: target.name.clone(),
                    collection: true,
                    back_populates: target_side.clone(),
                    secondary: Some(table.clone()),
                    foreign_key: None,
                    owns_key: false,
                },
                NavigationProperty {
                    relationship: rel.name.clone(),
                    host: target.name.clone(),
                    name: target_side,
                    target: source.name.clone(),
                    collection: true,
                    back_populates: source_side,
                    secondary: Some(table),
                    foreign_key: None,
                    owns_key: false,
                },
            ];
            (RelationshipLink::Junction(junction), navigations)
        }
    };

    ResolvedRelationship {
        name: rel.name.clone(),
        kind: rel.kind,
        source: source.name.clone(),
        target: target.name.clone(),
        link,
        navigations,
    }
}

/// Forward navigation name for a key column: `category_id` → `category`.
fn navigation_name(column: &str) -> String {
    match column.strip_suffix("_id") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{column}_ref"),
    }
}

/// Every `(entity, name, is_column)` a relationship adds to an entity.
fn added_names(rel: &ResolvedRelationship) -> Vec<(String, String, bool)> {
    let mut names = Vec::new();
    if let RelationshipLink::ForeignKey(fk) = &rel.link {
        names.push((fk.host.clone(), fk.column.clone(), true));
    }
    names.extend(
        rel.navigations
            .iter()
            .map(|n| (n.host.clone(), n.name.clone(), false)),
    );
    names
}

/// A self-relationship adds all of its names to one entity; they must be
/// pairwise distinct. Junction columns must be distinct too.
fn check_self_names(rel: &Relationship, resolved: &ResolvedRelationship) -> Result<(), DomainError> {
    if !rel.is_self_referential() {
        return Ok(());
    }

    let mut names: Vec<String> = added_names(resolved).into_iter().map(|(_, n, _)| n).collect();
    if let RelationshipLink::Junction(j) = &resolved.link {
        names.push(j.source_column.clone());
        names.push(j.target_column.clone());
    }

    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name.clone()) {
            return Err(DomainError::AmbiguousSelfRelationship {
                relationship: rel.name.clone(),
                entity: rel.source.clone(),
                name,
            });
        }
    }
    Ok(())
}

// ── Per-entity view ──────────────────────────────────────────────────────────

/// Everything relationships add to one entity, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRelations {
    pub foreign_keys: Vec<ForeignKey>,
    pub navigations: Vec<NavigationProperty>,
    pub junctions: Vec<Junction>,
}

impl EntityRelations {
    pub fn is_empty(&self) -> bool {
        self.foreign_keys.is_empty() && self.navigations.is_empty() && self.junctions.is_empty()
    }

    /// Foreign key columns the model must add (not already declared).
    pub fn added_columns(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys.iter().filter(|fk| !fk.reuses_field)
    }

    /// The foreign key on `column`, if one exists.
    pub fn foreign_key(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }
}

/// Lookup of [`EntityRelations`] by entity name.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    by_entity: BTreeMap<String, EntityRelations>,
    junctions: Vec<Junction>,
}

impl RelationshipIndex {
    pub fn new(resolved: &[ResolvedRelationship]) -> Self {
        let mut index = Self::default();

        for rel in resolved {
            match &rel.link {
                RelationshipLink::ForeignKey(fk) => {
                    index.entry(&fk.host).foreign_keys.push(fk.clone());
                }
                RelationshipLink::Junction(j) => {
                    index.entry(&rel.source).junctions.push(j.clone());
                    if rel.target != rel.source {
                        index.entry(&rel.target).junctions.push(j.clone());
                    }
                    index.junctions.push(j.clone());
                }
            }
            for nav in &rel.navigations {
                index.entry(&nav.host).navigations.push(nav.clone());
            }
        }

        index
    }

    fn entry(&mut self, entity: &str) -> &mut EntityRelations {
        self.by_entity.entry(entity.to_string()).or_default()
    }

    /// Relations of one entity; empty when it takes part in none.
    pub fn for_entity(&self, entity: &str) -> EntityRelations {
        self.by_entity.get(entity).cloned().unwrap_or_default()
    }

    /// Every junction, in relationship order.
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }
}
