//! Implementation of the `stencil generate` command.
//!
//! Responsibility: load the domain configuration, run the generation
//! pipeline, export the file tree and report. No generation logic lives here.

use tracing::{info, instrument, warn};

use stencil_adapters::{LocalFilesystem, StackRenderer};
use stencil_core::{
    application::{ExportService, ExportSummary, GenerationService},
    domain::{GenerationResult, GenerationStatus},
};

use crate::{
    cli::GenerateArgs,
    commands::{generation_options, load_source, print_issues},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `stencil generate` command.
///
/// Dispatch sequence:
/// 1. Load the configuration document or preset
/// 2. Run the pipeline with a progress bar
/// 3. Stop with exit code 2 if the configuration is blocked
/// 4. Export the tree unless `--dry-run`
/// 5. Print the summary or the JSON result
#[instrument(skip_all, fields(dry_run = args.dry_run, force = args.force))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let domain = load_source(&args.source, &args.input)?;
    let options = generation_options(&config, args.jobs, args.frontend_root.as_deref());

    let progress = output.progress();
    let service = GenerationService::new(Box::new(StackRenderer::new()))
        .with_progress(Box::new(progress.clone()))
        .with_options(options);

    info!(domain = %domain.name, "Generation started");
    let result = service.generate(&domain);
    progress.finish();

    match result.status {
        GenerationStatus::Failed => {
            if output.is_json() {
                output.json(&result)?;
            } else {
                output.header(&format!("Generation of '{}' failed", domain.name))?;
                print_issues(&output, &result.issues)?;
            }
            return Err(CliError::GenerationFailed {
                name: domain.name,
                errors: result.errors().count(),
            });
        }
        GenerationStatus::Cancelled => {
            warn!(domain = %domain.name, "Generation cancelled");
            output.warning("Generation was cancelled; nothing was written")?;
            return Ok(());
        }
        GenerationStatus::Completed => {}
    }

    let exported = if args.dry_run {
        None
    } else {
        let export = ExportService::new(Box::new(LocalFilesystem::new()));
        Some(export.export(&result.tree, &args.output, args.force)?)
    };

    if output.is_json() {
        output.json(&result)?;
    } else {
        print_summary(&output, &result, exported.as_ref(), &args)?;
    }

    info!(
        domain = %domain.name,
        artifacts = result.total_artifacts,
        files = result.total_files,
        written = exported.is_some(),
        "Generation finished"
    );
    Ok(())
}

fn print_summary(
    output: &OutputManager,
    result: &GenerationResult,
    exported: Option<&ExportSummary>,
    args: &GenerateArgs,
) -> CliResult<()> {
    output.header(&format!(
        "Generated {} of {} artifact(s), {} file(s)",
        result.generated().count(),
        result.total_artifacts,
        result.total_files
    ))?;

    for artifact in &result.artifacts {
        let line = format!("{:<12} {}", artifact.kind.as_str(), artifact.path);
        if artifact.is_generated() {
            output.print(&format!("  {line}"))?;
        } else {
            output.warning(&format!("{line} (failed)"))?;
        }
    }

    if !result.issues.is_empty() {
        output.print("")?;
        print_issues(output, &result.issues)?;
    }

    output.print("")?;
    match exported {
        Some(summary) => output.success(&format!(
            "Wrote {} file(s), {} bytes to {}",
            summary.files,
            summary.bytes,
            summary.root.display()
        ))?,
        None => output.info(&format!(
            "Dry run: {} file(s), {} bytes would be written to {}",
            result.tree.file_count(),
            result.tree.total_size(),
            args.output.display()
        ))?,
    }

    if result.failed().next().is_some() {
        output.warning("Some artifacts failed; see the issues above")?;
    }
    Ok(())
}
