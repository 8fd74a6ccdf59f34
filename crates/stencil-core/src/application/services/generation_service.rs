//! Generation Service - the pipeline orchestrator.
//!
//! Drives one run through the state machine:
//! 1. Validate (gate on configuration-level errors)
//! 2. Resolve relationships into a per-entity index and the output layout
//! 3. Render every (entity × kind) pair and every junction, possibly on
//!    several threads, then the package modules that tie them together
//! 4. Assemble the file tree
//!
//! A run always produces a [`GenerationResult`]. Only configuration-level
//! errors fail it; everything else degrades to failed artifacts.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ArtifactRenderer, JunctionInput, PackageInput, ProgressSink, RenderInput},
        services::{
            progress::{CancellationToken, NoProgress, ProgressTracker},
            state::GenerationState,
        },
    },
    domain::{
        ArtifactKind, DomainConfiguration, DomainError, DomainValidator, Entity, FileTree,
        GeneratedArtifact, GenerationResult, GenerationStatus, IssueCategory, Junction,
        OutputLayout, RelationshipIndex, RelationshipKind, TypeRegistry, ValidationIssue,
    },
};

const MAX_DEFAULT_PARALLELISM: usize = 8;

/// Per-run knobs.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Worker threads for rendering. `1` renders inline on the caller's thread.
    pub parallelism: usize,
    /// Root directory for UI components; `frontend` when unset.
    pub frontend_root: Option<String>,
    pub registry: TypeRegistry,
    pub cancellation: CancellationToken,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            parallelism: thread::available_parallelism()
                .map_or(1, NonZeroUsize::get)
                .min(MAX_DEFAULT_PARALLELISM),
            frontend_root: None,
            registry: TypeRegistry::default(),
            cancellation: CancellationToken::new(),
        }
    }
}

impl GenerationOptions {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_frontend_root(mut self, root: impl Into<String>) -> Self {
        self.frontend_root = Some(root.into());
        self
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

/// One unit of rendering work.
#[derive(Debug, Clone, Copy)]
enum Job<'a> {
    Entity {
        entity: &'a Entity,
        kind: ArtifactKind,
        quarantined: bool,
    },
    Junction(&'a Junction),
}

impl Job<'_> {
    fn label(&self) -> String {
        match self {
            Self::Entity { entity, kind, .. } => format!("Rendering {kind} for {}", entity.name),
            Self::Junction(j) => format!("Rendering junction {}", j.table),
        }
    }
}

/// A finished job: the artifact plus the issue describing its failure.
#[derive(Debug, Clone)]
struct Outcome {
    artifact: GeneratedArtifact,
    issue: Option<ValidationIssue>,
}

/// Shared, read-only state of the render phase.
struct RenderContext<'a> {
    config: &'a DomainConfiguration,
    index: &'a RelationshipIndex,
    layout: &'a OutputLayout,
    registry: &'a TypeRegistry,
}

/// The generation orchestrator.
pub struct GenerationService {
    renderer: Arc<dyn ArtifactRenderer>,
    progress: Arc<dyn ProgressSink>,
    options: GenerationOptions,
}

impl GenerationService {
    /// Create a service with default options and no progress reporting.
    pub fn new(renderer: Box<dyn ArtifactRenderer>) -> Self {
        Self {
            renderer: Arc::from(renderer),
            progress: Arc::new(NoProgress),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_progress(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = Arc::from(sink);
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Run the pipeline over a configuration.
    #[instrument(
        skip_all,
        fields(
            domain = %config.name,
            entities = config.entities.len(),
            relationships = config.relationships.len()
        )
    )]
    pub fn generate(&self, config: &DomainConfiguration) -> GenerationResult {
        match self.run(config) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Generation aborted by an internal error");
                GenerationResult::new(
                    GenerationStatus::Failed,
                    Vec::new(),
                    vec![
                        ValidationIssue::error(IssueCategory::Domain, e.to_string())
                            .with_suggestion("This is a bug in Stencil, please report it"),
                    ],
                    Vec::new(),
                    FileTree::default(),
                )
            }
        }
    }

    fn run(&self, config: &DomainConfiguration) -> Result<GenerationResult, ApplicationError> {
        let mut state = GenerationState::Idle;
        let mut steps = Vec::new();

        let junction_count = config
            .relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::ManyToMany)
            .count();
        let job_count = config.entities.len() * ArtifactKind::PER_ENTITY.len() + junction_count;
        // validate, resolve, package modules, assemble
        let tracker = ProgressTracker::new(self.progress.as_ref(), job_count + 4);

        // ── Validating ──
        state.transition(GenerationState::Validating)?;
        steps.push("validate".to_string());
        let inspection = DomainValidator::inspect(config);
        tracker.advance("Validating configuration", 0);

        if inspection.is_blocked() {
            state.transition(GenerationState::Blocked)?;
            let errors = inspection.issues.iter().filter(|i| i.is_blocking()).count();
            info!(errors, "Generation blocked by configuration errors");

            state.transition(GenerationState::Failed)?;
            tracker.finish(GenerationState::Failed.as_str());
            return Ok(GenerationResult::new(
                GenerationStatus::Failed,
                steps,
                inspection.issues,
                Vec::new(),
                FileTree::default(),
            ));
        }

        // ── Resolving ──
        state.transition(GenerationState::Resolving)?;
        steps.push("resolve".to_string());
        let index = RelationshipIndex::new(&inspection.resolved);
        let mut layout = OutputLayout::for_configuration(config);
        if let Some(root) = &self.options.frontend_root {
            layout = layout.with_frontend_root(root);
        }
        let quarantined: HashSet<&str> = config
            .entities
            .iter()
            .map(|e| e.name.as_str())
            .filter(|name| inspection.issues.iter().any(|i| i.quarantines(name)))
            .collect();
        if !quarantined.is_empty() {
            warn!(entities = ?quarantined, "Entities with errors will not be rendered");
        }
        tracker.advance("Resolving relationships", 0);

        // ── Rendering ──
        state.transition(GenerationState::Rendering)?;
        steps.push("render".to_string());

        let mut jobs: Vec<Job<'_>> = config
            .entities
            .iter()
            .flat_map(|entity| {
                let quarantined = quarantined.contains(entity.name.as_str());
                ArtifactKind::PER_ENTITY.into_iter().map(move |kind| Job::Entity {
                    entity,
                    kind,
                    quarantined,
                })
            })
            .collect();
        jobs.extend(index.junctions().iter().map(Job::Junction));

        let ctx = RenderContext {
            config,
            index: &index,
            layout: &layout,
            registry: &self.options.registry,
        };
        let slots = self.render_all(&ctx, &jobs, &tracker);
        let attempted = slots.iter().filter(|s| s.get().is_some()).count();

        // One bad field fails several kinds with the same issue; report it once.
        let mut issues = inspection.issues;
        let mut reported = HashSet::new();
        let mut artifacts = Vec::with_capacity(attempted);
        for outcome in slots.into_iter().filter_map(OnceLock::into_inner) {
            if let Some(issue) = outcome.issue
                && reported.insert((issue.entity.clone(), issue.field.clone(), issue.message.clone()))
            {
                issues.push(issue);
            }
            artifacts.push(outcome.artifact);
        }

        if attempted < jobs.len() {
            state.transition(GenerationState::Cancelled)?;
            info!(attempted, total = jobs.len(), "Generation cancelled");
            tracker.finish(GenerationState::Cancelled.as_str());
            return Ok(GenerationResult::new(
                GenerationStatus::Cancelled,
                steps,
                issues,
                artifacts,
                FileTree::default(),
            ));
        }

        // The entry point only mounts routers that exist.
        let routed: Vec<&Entity> = config
            .entities
            .iter()
            .filter(|e| {
                artifacts.iter().any(|a| {
                    a.kind == ArtifactKind::Routes
                        && a.is_generated()
                        && a.entity.as_deref() == Some(e.name.as_str())
                })
            })
            .collect();
        let outcome = self.attempt_package(&ctx, &routed);
        let files = if outcome.artifact.is_generated() {
            outcome.artifact.files.len()
        } else {
            0
        };
        tracker.advance("Rendering package modules", files);
        issues.extend(outcome.issue);
        artifacts.push(outcome.artifact);

        // ── Assembling ──
        state.transition(GenerationState::Assembling)?;
        steps.push("assemble".to_string());
        let (tree, rejected) = FileTree::assemble(&artifacts);
        for (i, conflict) in rejected {
            let artifact = &mut artifacts[i];
            warn!(error = %conflict, kind = %artifact.kind, "Duplicate output path; keeping the first file");
            issues.push(duplicate_issue(artifact, &conflict));
            let (kind, entity, path) = (artifact.kind, artifact.entity.take(), std::mem::take(&mut artifact.path));
            *artifact = GeneratedArtifact::failed(kind, entity, path);
        }
        tracker.advance("Assembling output", 0);

        state.transition(GenerationState::Completed)?;
        let result = GenerationResult::new(
            GenerationStatus::Completed,
            steps,
            issues,
            artifacts,
            tree,
        );
        info!(
            artifacts = result.total_artifacts,
            files = result.total_files,
            failed = result.failed().count(),
            "Generation completed"
        );
        Ok(result)
    }

    /// Render every job into its write-once slot.
    ///
    /// Slot `i` belongs to job `i`, so output order is job order whatever
    /// the completion order. Slots left empty were never attempted.
    fn render_all(
        &self,
        ctx: &RenderContext<'_>,
        jobs: &[Job<'_>],
        tracker: &ProgressTracker<'_>,
    ) -> Vec<OnceLock<Outcome>> {
        let slots: Vec<OnceLock<Outcome>> = jobs.iter().map(|_| OnceLock::new()).collect();
        let next = AtomicUsize::new(0);
        let cancellation = &self.options.cancellation;

        let work = || {
            loop {
                if cancellation.is_cancelled() {
                    break;
                }
                let i = next.fetch_add(1, Ordering::SeqCst);
                let Some(job) = jobs.get(i) else {
                    break;
                };

                let outcome = self.attempt(ctx, job);
                let files = if outcome.artifact.is_generated() {
                    outcome.artifact.files.len()
                } else {
                    0
                };
                tracker.advance(job.label(), files);
                let _ = slots[i].set(outcome);
            }
        };

        let workers = self.options.parallelism.clamp(1, jobs.len().max(1));
        debug!(workers, jobs = jobs.len(), "Rendering artifacts");

        if workers == 1 {
            work();
        } else {
            thread::scope(|scope| {
                for _ in 0..workers {
                    scope.spawn(&work);
                }
            });
        }

        slots
    }

    /// Attempt one job. Never panics: renderer panics become failed artifacts.
    fn attempt(&self, ctx: &RenderContext<'_>, job: &Job<'_>) -> Outcome {
        match *job {
            Job::Entity {
                entity,
                kind,
                quarantined,
            } => {
                let path = ctx.layout.primary_path(&entity.name, kind);
                if quarantined {
                    debug!(entity = %entity.name, %kind, "Skipping quarantined entity");
                    return Outcome {
                        artifact: GeneratedArtifact::failed(kind, Some(entity.name.clone()), path),
                        issue: None,
                    };
                }
                self.attempt_entity(ctx, entity, kind, path)
            }
            Job::Junction(junction) => self.attempt_junction(ctx, junction),
        }
    }

    fn attempt_entity(
        &self,
        ctx: &RenderContext<'_>,
        entity: &Entity,
        kind: ArtifactKind,
        path: String,
    ) -> Outcome {
        let relations = ctx.index.for_entity(&entity.name);
        let input = RenderInput {
            config: ctx.config,
            entity,
            relations: &relations,
            registry: ctx.registry,
            layout: ctx.layout,
        };

        let rendered = catch_unwind(AssertUnwindSafe(|| {
            if kind.depends_on_field_types() {
                ctx.registry.check_entity(entity)?;
            }
            self.renderer.render(&input, kind)
        }));

        let owner = Some(entity.name.clone());
        match rendered {
            Ok(Ok(files)) if !files.is_empty() => {
                debug!(entity = %entity.name, %kind, files = files.len(), "Rendered");
                Outcome {
                    artifact: GeneratedArtifact::generated(kind, owner, files),
                    issue: None,
                }
            }
            Ok(Ok(_)) => {
                let err = DomainError::RenderFailed {
                    artifact: path.clone(),
                    reason: "renderer produced no files".into(),
                };
                Outcome {
                    artifact: GeneratedArtifact::failed(kind, owner, path),
                    issue: Some(render_issue(entity, kind, &err)),
                }
            }
            Ok(Err(err)) => {
                debug!(entity = %entity.name, %kind, error = %err, "Render failed");
                Outcome {
                    artifact: GeneratedArtifact::failed(kind, owner, path),
                    issue: Some(render_issue(entity, kind, &err)),
                }
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!(entity = %entity.name, %kind, %reason, "Renderer panicked");
                Outcome {
                    artifact: GeneratedArtifact::failed(kind, owner, path),
                    issue: Some(
                        ValidationIssue::error(
                            IssueCategory::Entity,
                            format!(
                                "Internal error while rendering {kind} for '{}': {reason}",
                                entity.name
                            ),
                        )
                        .with_suggestion("This is a bug in Stencil, please report it")
                        .for_entity(&entity.name),
                    ),
                }
            }
        }
    }

    fn attempt_junction(&self, ctx: &RenderContext<'_>, junction: &Junction) -> Outcome {
        let path = ctx.layout.junction_path(&junction.table);
        let input = JunctionInput {
            config: ctx.config,
            junction,
            registry: ctx.registry,
            layout: ctx.layout,
        };

        let rendered = catch_unwind(AssertUnwindSafe(|| self.renderer.render_junction(&input)));
        let reason = match rendered {
            Ok(Ok(file)) => {
                debug!(table = %junction.table, "Rendered junction");
                return Outcome {
                    artifact: GeneratedArtifact::generated(ArtifactKind::Junction, None, vec![file]),
                    issue: None,
                };
            }
            Ok(Err(err)) => err.to_string(),
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!(table = %junction.table, %reason, "Renderer panicked");
                reason
            }
        };

        Outcome {
            artifact: GeneratedArtifact::failed(ArtifactKind::Junction, None, path),
            issue: Some(ValidationIssue::error(
                IssueCategory::Relationship,
                format!(
                    "Could not render junction '{}' of relationship '{}': {reason}",
                    junction.table, junction.relationship
                ),
            )),
        }
    }

    fn attempt_package(&self, ctx: &RenderContext<'_>, routed: &[&Entity]) -> Outcome {
        let input = PackageInput {
            config: ctx.config,
            routed,
            junctions: ctx.index.junctions(),
            registry: ctx.registry,
            layout: ctx.layout,
        };

        let rendered = catch_unwind(AssertUnwindSafe(|| self.renderer.render_package(&input)));
        let reason = match rendered {
            Ok(Ok(files)) if !files.is_empty() => {
                debug!(files = files.len(), "Rendered package modules");
                return Outcome {
                    artifact: GeneratedArtifact::generated(ArtifactKind::Package, None, files),
                    issue: None,
                };
            }
            Ok(Ok(_)) => "renderer produced no files".to_string(),
            Ok(Err(err)) => err.to_string(),
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!(%reason, "Renderer panicked");
                reason
            }
        };

        let path = ctx.layout.package_paths().into_iter().next().unwrap_or_default();
        Outcome {
            artifact: GeneratedArtifact::failed(ArtifactKind::Package, None, path),
            issue: Some(ValidationIssue::error(
                IssueCategory::Domain,
                format!(
                    "Could not render the package modules of '{}': {reason}",
                    ctx.config.name
                ),
            )),
        }
    }
}

/// The field-level issue paired with a failed render.
///
/// Field errors do not name the kind, so every kind they fail reports the
/// same issue.
fn render_issue(entity: &Entity, kind: ArtifactKind, err: &DomainError) -> ValidationIssue {
    let field = match err {
        DomainError::UnsupportedType { field, .. }
        | DomainError::UnsatisfiableLength { field, .. } => Some(field),
        _ => None,
    };
    let message = match field {
        Some(_) => format!("Could not render '{}': {err}", entity.name),
        None => format!("Could not render {kind} for '{}': {err}", entity.name),
    };
    let issue = ValidationIssue::error(IssueCategory::Field, message);
    let issue = match err.suggestions().into_iter().next() {
        Some(s) => issue.with_suggestion(s),
        None => issue,
    };
    match field {
        Some(field) => issue.for_field(&entity.name, field),
        None => issue.for_entity(&entity.name),
    }
}

/// The issue for an artifact dropped because its path was already taken.
fn duplicate_issue(artifact: &GeneratedArtifact, err: &DomainError) -> ValidationIssue {
    let issue = match &artifact.entity {
        Some(entity) => ValidationIssue::error(
            IssueCategory::Entity,
            format!("The {} of '{entity}' was not placed: {err}", artifact.kind),
        )
        .for_entity(entity),
        None => ValidationIssue::error(
            match artifact.kind {
                ArtifactKind::Junction => IssueCategory::Relationship,
                _ => IssueCategory::Domain,
            },
            format!("The {} '{}' was not placed: {err}", artifact.kind, artifact.path),
        ),
    };
    issue.with_suggestion("Rename one of the entities so their files do not overlap")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockProgressSink;
    use crate::domain::{ArtifactFile, Field, FieldKind, FieldType, Relationship};
    use std::sync::Mutex;

    /// Renders one file per path with the path as content.
    struct EchoRenderer;

    impl ArtifactRenderer for EchoRenderer {
        fn render(
            &self,
            input: &RenderInput<'_>,
            kind: ArtifactKind,
        ) -> Result<Vec<ArtifactFile>, DomainError> {
            Ok(input
                .layout
                .paths(&input.entity.name, kind)
                .into_iter()
                .map(|p| ArtifactFile::new(p.clone(), p))
                .collect())
        }

        fn render_junction(&self, input: &JunctionInput<'_>) -> Result<ArtifactFile, DomainError> {
            let path = input.layout.junction_path(&input.junction.table);
            Ok(ArtifactFile::new(path.clone(), path))
        }

        fn render_package(&self, input: &PackageInput<'_>) -> Result<Vec<ArtifactFile>, DomainError> {
            let routed: Vec<_> = input.routed.iter().map(|e| e.name.as_str()).collect();
            Ok(input
                .layout
                .package_paths()
                .into_iter()
                .map(|p| ArtifactFile::new(p, routed.join(",")))
                .collect())
        }
    }

    /// Panics for one entity.
    struct PanickyRenderer(&'static str);

    impl ArtifactRenderer for PanickyRenderer {
        fn render(
            &self,
            input: &RenderInput<'_>,
            kind: ArtifactKind,
        ) -> Result<Vec<ArtifactFile>, DomainError> {
            if input.entity.name == self.0 {
                panic!("boom");
            }
            EchoRenderer.render(input, kind)
        }

        fn render_junction(&self, input: &JunctionInput<'_>) -> Result<ArtifactFile, DomainError> {
            EchoRenderer.render_junction(input)
        }

        fn render_package(&self, input: &PackageInput<'_>) -> Result<Vec<ArtifactFile>, DomainError> {
            EchoRenderer.render_package(input)
        }
    }

    /// Writes the schema of one entity over another entity's model.
    struct OverlappingRenderer {
        entity: &'static str,
        onto: &'static str,
    }

    impl ArtifactRenderer for OverlappingRenderer {
        fn render(
            &self,
            input: &RenderInput<'_>,
            kind: ArtifactKind,
        ) -> Result<Vec<ArtifactFile>, DomainError> {
            if input.entity.name == self.entity && kind == ArtifactKind::Schema {
                let path = input.layout.primary_path(self.onto, ArtifactKind::Model);
                return Ok(vec![ArtifactFile::new(path, "overlap")]);
            }
            EchoRenderer.render(input, kind)
        }

        fn render_junction(&self, input: &JunctionInput<'_>) -> Result<ArtifactFile, DomainError> {
            EchoRenderer.render_junction(input)
        }

        fn render_package(&self, input: &PackageInput<'_>) -> Result<Vec<ArtifactFile>, DomainError> {
            EchoRenderer.render_package(input)
        }
    }

    fn shop() -> DomainConfiguration {
        DomainConfiguration::new("Shop")
            .with_entity(
                Entity::new("Product")
                    .with_field(Field::of("id", FieldKind::Integer))
                    .with_field(Field::of("name", FieldKind::ShortText)),
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

    fn service(parallelism: usize) -> GenerationService {
        GenerationService::new(Box::new(EchoRenderer))
            .with_options(GenerationOptions::default().with_parallelism(parallelism))
    }

    #[test]
    fn completed_run_renders_every_pair_in_order() {
        let result = service(4).generate(&shop());

        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.steps, vec!["validate", "resolve", "render", "assemble"]);
        assert_eq!(result.total_artifacts, 11);
        assert_eq!(result.total_files, 14);

        let order: Vec<_> = result
            .artifacts
            .iter()
            .map(|a| (a.entity.as_deref().unwrap_or(""), a.kind))
            .collect();
        let mut expected = Vec::new();
        for entity in ["Product", "Category"] {
            for kind in ArtifactKind::PER_ENTITY {
                expected.push((entity, kind));
            }
        }
        expected.push(("", ArtifactKind::Package));
        assert_eq!(order, expected);
        assert_eq!(result.tree.file_count(), 14);
        assert_eq!(result.file("shops/main.py"), Some("Product,Category"));
    }

    #[test]
    fn blocked_run_fails_without_artifacts() {
        let mut config = shop();
        config.relationships[0].target = "Supplier".into();
        let result = service(1).generate(&config);

        assert_eq!(result.status, GenerationStatus::Failed);
        assert_eq!(result.steps, vec!["validate"]);
        assert!(result.artifacts.is_empty());
        assert_eq!(result.errors().count(), 1);
    }

    #[test]
    fn name_that_is_not_a_package_blocks_the_run() {
        let mut config = shop();
        config.name = "../../tmp/evil".into();
        let result = service(1).generate(&config);

        assert_eq!(result.status, GenerationStatus::Failed);
        assert!(result.artifacts.is_empty());
        assert!(result.tree.is_empty());
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, IssueCategory::Domain);
    }

    #[test]
    fn unsupported_type_fails_only_type_dependent_artifacts() {
        let mut config = shop();
        config.entities[0]
            .fields
            .push(Field::new("location", FieldType::Unsupported("geo-point".into())));
        let result = service(2).generate(&config);

        assert_eq!(result.status, GenerationStatus::Completed);
        let product: Vec<_> = result
            .artifacts_for("Product")
            .map(|a| (a.kind, a.is_generated()))
            .collect();
        assert_eq!(
            product,
            vec![
                (ArtifactKind::Model, false),
                (ArtifactKind::Schema, false),
                (ArtifactKind::Routes, true),
                (ArtifactKind::Ui, false),
                (ArtifactKind::Tests, false),
            ]
        );
        assert!(result.artifacts_for("Category").all(|a| a.is_generated()));

        let issues: Vec<_> = result.errors().collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, IssueCategory::Field);
        assert_eq!(issues[0].entity.as_deref(), Some("Product"));
        assert_eq!(issues[0].field.as_deref(), Some("location"));
        assert!(issues[0].message.contains("geo-point"));
    }

    #[test]
    fn each_bad_field_is_reported_once() {
        let mut config = shop();
        for entity in &mut config.entities {
            entity
                .fields
                .push(Field::new("location", FieldType::Unsupported("geo-point".into())));
        }
        let result = service(3).generate(&config);

        let reported: Vec<_> = result
            .errors()
            .map(|i| (i.entity.as_deref(), i.field.as_deref()))
            .collect();
        assert_eq!(
            reported,
            vec![
                (Some("Product"), Some("location")),
                (Some("Category"), Some("location")),
            ]
        );
        assert_eq!(result.failed().count(), 8);
    }

    #[test]
    fn quarantined_entity_is_not_rendered_and_issue_not_duplicated() {
        let mut config = shop();
        config.entities[0].primary_key = Some("sku".into());
        let result = service(1).generate(&config);

        assert_eq!(result.status, GenerationStatus::Completed);
        assert!(result.artifacts_for("Product").all(|a| !a.is_generated()));
        assert!(result.artifacts_for("Category").all(|a| a.is_generated()));
        assert_eq!(result.errors().count(), 1);
    }

    #[test]
    fn renderer_panic_becomes_failed_artifact() {
        let result = GenerationService::new(Box::new(PanickyRenderer("Category")))
            .with_options(GenerationOptions::default().with_parallelism(3))
            .generate(&shop());

        assert_eq!(result.status, GenerationStatus::Completed);
        assert!(result.artifacts_for("Category").all(|a| !a.is_generated()));
        assert!(result.artifacts_for("Product").all(|a| a.is_generated()));
        assert_eq!(result.errors().count(), 5);
        assert!(
            result
                .errors()
                .all(|i| i.category == IssueCategory::Entity && i.message.contains("boom"))
        );
    }

    #[test]
    fn cancellation_before_rendering_yields_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = GenerationService::new(Box::new(EchoRenderer))
            .with_options(GenerationOptions::default().with_cancellation(token))
            .generate(&shop());

        assert_eq!(result.status, GenerationStatus::Cancelled);
        assert!(result.artifacts.is_empty());
        assert_eq!(result.steps, vec!["validate", "resolve", "render"]);
    }

    #[test]
    fn many_to_many_adds_junction_after_entity_artifacts() {
        let config = shop()
            .with_entity(Entity::new("Tag").with_field(Field::of("id", FieldKind::Integer)))
            .with_relationship(Relationship::new(
                "product-tags",
                RelationshipKind::ManyToMany,
                "Product",
                "Tag",
            ));
        let result = service(2).generate(&config);

        let junction = &result.artifacts[15];
        assert_eq!(junction.kind, ArtifactKind::Junction);
        assert_eq!(junction.entity, None);
        assert_eq!(junction.path, "shops/models/product_tags.py");
        assert_eq!(result.artifacts[16].kind, ArtifactKind::Package);
        assert_eq!(result.total_artifacts, 17);
    }

    #[test]
    fn overlapping_artifact_fails_and_counts_agree() {
        let result = GenerationService::new(Box::new(OverlappingRenderer {
            entity: "Category",
            onto: "Product",
        }))
        .with_options(GenerationOptions::default().with_parallelism(2))
        .generate(&shop());

        assert_eq!(result.status, GenerationStatus::Completed);
        let failed: Vec<_> = result
            .failed()
            .map(|a| (a.entity.as_deref(), a.kind))
            .collect();
        assert_eq!(failed, vec![(Some("Category"), ArtifactKind::Schema)]);
        assert_eq!(result.file("shops/models/product.py"), Some("shops/models/product.py"));

        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, IssueCategory::Entity);
        assert_eq!(errors[0].entity.as_deref(), Some("Category"));
        assert!(errors[0].message.contains("shops/models/product.py"));

        assert_eq!(result.total_files, 13);
        assert_eq!(result.total_files, result.tree.file_count());
    }

    #[test]
    fn junction_named_like_an_entity_blocks_the_run() {
        let config = shop()
            .with_entity(Entity::new("Tag").with_field(Field::of("id", FieldKind::Integer)))
            .with_entity(Entity::new("ProductTags").with_field(Field::of("id", FieldKind::Integer)))
            .with_relationship(Relationship::new(
                "product-tags",
                RelationshipKind::ManyToMany,
                "Product",
                "Tag",
            ));
        let result = service(2).generate(&config);

        assert_eq!(result.status, GenerationStatus::Failed);
        assert!(result.artifacts.is_empty());
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, IssueCategory::Relationship);
        assert!(errors[0].message.contains("product_tags"));
    }

    #[test]
    fn progress_is_strictly_increasing_and_ends_at_100() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut sink = MockProgressSink::new();
        let record = Arc::clone(&seen);
        sink.expect_publish().returning(move |u| {
            record.lock().unwrap().push((u.step, u.progress, u.total_steps));
        });

        let result = GenerationService::new(Box::new(EchoRenderer))
            .with_progress(Box::new(sink))
            .with_options(GenerationOptions::default().with_parallelism(4))
            .generate(&shop());
        assert_eq!(result.status, GenerationStatus::Completed);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 14);
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
        assert_eq!(seen.last().map(|s| s.1), Some(100));
        assert!(seen.iter().all(|s| s.2 == 14));
    }

    #[test]
    fn parallel_and_inline_runs_are_identical() {
        let a = service(1).generate(&shop());
        let b = service(8).generate(&shop());
        assert_eq!(a.artifacts, b.artifacts);
        assert_eq!(a.issues, b.issues);
    }
}
