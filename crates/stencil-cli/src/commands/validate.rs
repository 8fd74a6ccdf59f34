//! `stencil validate`: run the validator and relationship resolver only.

use serde::Serialize;
use tracing::{debug, instrument};

use stencil_core::domain::{
    DomainValidator, IssueLevel, RelationshipLink, ResolvedRelationship, ValidationIssue,
};

use crate::{
    cli::ValidateArgs,
    commands::{load_source, print_issues},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Machine-readable validation report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReport<'a> {
    name: &'a str,
    valid: bool,
    entities: usize,
    relationships: usize,
    issues: &'a [ValidationIssue],
}

#[instrument(skip_all, fields(strict = args.strict))]
pub fn execute(args: ValidateArgs, output: OutputManager) -> CliResult<()> {
    let domain = load_source(&args.source, &args.input)?;
    let inspection = DomainValidator::inspect(&domain);

    let blocking = inspection
        .issues
        .iter()
        .filter(|issue| blocks(issue, args.strict))
        .count();
    debug!(
        domain = %domain.name,
        issues = inspection.issues.len(),
        blocking,
        "Validation finished"
    );

    if output.is_json() {
        output.json(&ValidationReport {
            name: &domain.name,
            valid: blocking == 0,
            entities: domain.entities.len(),
            relationships: domain.relationships.len(),
            issues: &inspection.issues,
        })?;
    } else {
        output.header(&format!("Validating '{}'", domain.name))?;
        print_issues(&output, &inspection.issues)?;
        if blocking == 0 {
            for relationship in &inspection.resolved {
                output.dim(&format!("  {}", describe(relationship)))?;
            }
            output.success(&format!(
                "'{}' is valid: {} entities, {} relationships",
                domain.name,
                domain.entities.len(),
                domain.relationships.len()
            ))?;
        }
    }

    if blocking > 0 {
        return Err(CliError::ValidationFailed {
            name: domain.name,
            errors: blocking,
        });
    }
    Ok(())
}

/// Any error blocks validation, not only configuration-level ones; with
/// `--strict` warnings do too.
fn blocks(issue: &ValidationIssue, strict: bool) -> bool {
    match issue.level {
        IssueLevel::Error => true,
        IssueLevel::Warning => strict,
        IssueLevel::Info => false,
    }
}

/// One-line summary of how a relationship will be stored.
fn describe(relationship: &ResolvedRelationship) -> String {
    let storage = match &relationship.link {
        RelationshipLink::ForeignKey(fk) => {
            format!("{}.{} -> {}", fk.host, fk.column, fk.references.qualified())
        }
        RelationshipLink::Junction(junction) => format!("junction table {}", junction.table),
    };
    format!(
        "{} ({} {} {}): {}",
        relationship.name, relationship.source, relationship.kind, relationship.target, storage
    )
}
