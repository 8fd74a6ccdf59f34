//! Artifact renderers.
//!
//! [`StackRenderer`] targets a Python backend (SQLAlchemy models, Pydantic
//! schemas, FastAPI routes, pytest suites, plus the database module and
//! entry point they share) and a React/TypeScript frontend.
//! Every renderer is a pure function of its [`RenderInput`] built on
//! [`CodeWriter`]; the same input always yields the same bytes.

mod model;
mod package;
mod python;
mod routes;
mod schema;
mod test_suite;
mod typescript;
mod ui;
mod writer;

pub use writer::CodeWriter;

use stencil_core::{
    application::ports::{ArtifactRenderer, JunctionInput, PackageInput, RenderInput},
    domain::{
        ArtifactFile, ArtifactKind, DomainError, Entity, Field, FieldKind, OutputLayout,
        PrimaryKey, TypeRegistry,
    },
};
use tracing::instrument;

/// Renders the Python/React application stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackRenderer;

impl StackRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactRenderer for StackRenderer {
    #[instrument(level = "debug", skip_all, fields(entity = %input.entity.name, %kind))]
    fn render(
        &self,
        input: &RenderInput<'_>,
        kind: ArtifactKind,
    ) -> Result<Vec<ArtifactFile>, DomainError> {
        match kind {
            ArtifactKind::Model => model::render(input).map(|file| vec![file]),
            ArtifactKind::Schema => schema::render(input).map(|file| vec![file]),
            ArtifactKind::Routes => routes::render(input).map(|file| vec![file]),
            ArtifactKind::Ui => ui::render(input),
            ArtifactKind::Tests => test_suite::render(input).map(|file| vec![file]),
            ArtifactKind::Junction | ArtifactKind::Package => Err(DomainError::RenderFailed {
                artifact: format!("{}/{kind}", input.entity.name),
                reason: format!("{kind} artifacts are not rendered per entity"),
            }),
        }
    }

    #[instrument(level = "debug", skip_all, fields(table = %input.junction.table))]
    fn render_junction(&self, input: &JunctionInput<'_>) -> Result<ArtifactFile, DomainError> {
        model::render_junction(input)
    }

    #[instrument(level = "debug", skip_all, fields(routers = input.routed.len()))]
    fn render_package(&self, input: &PackageInput<'_>) -> Result<Vec<ArtifactFile>, DomainError> {
        package::render(input)
    }
}

/// Dotted module every backend artifact imports the session and base from.
fn database_module(layout: &OutputLayout) -> String {
    format!("{}.database", layout.package())
}

/// The primary key as the renderers need it.
#[derive(Debug, Clone, Copy)]
struct KeyInfo<'a> {
    name: &'a str,
    kind: FieldKind,
    /// The declared key field; `None` for the synthetic `id`.
    field: Option<&'a Field>,
    /// Assigned by the database (or a default) rather than the client.
    generated: bool,
}

impl<'a> KeyInfo<'a> {
    fn of(entity: &'a Entity, registry: &TypeRegistry) -> Result<Self, DomainError> {
        Ok(match entity.primary_key() {
            PrimaryKey::Synthetic => Self {
                name: stencil_core::domain::entities::SYNTHETIC_KEY,
                kind: FieldKind::Integer,
                field: None,
                generated: true,
            },
            PrimaryKey::Declared(field) => {
                let kind = registry.kind_of(entity, field)?;
                Self {
                    name: &field.name,
                    kind,
                    field: Some(field),
                    generated: matches!(kind, FieldKind::Integer | FieldKind::Identifier),
                }
            }
        })
    }

    /// Literal for a key value that no record has.
    fn missing_literal(&self) -> &'static str {
        match self.kind {
            FieldKind::Integer => "999999",
            FieldKind::Identifier => "00000000-0000-4000-8000-00000000ffff",
            _ => "missing",
        }
    }
}
