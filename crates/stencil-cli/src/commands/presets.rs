//! `stencil presets`: list the built-in domains or print one as a document.

use tracing::instrument;

use crate::{
    cli::PresetsArgs,
    commands::{load_preset, preset_service},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: PresetsArgs, output: OutputManager) -> CliResult<()> {
    if let Some(name) = args.name {
        // A configuration document is always JSON so it can be fed back in.
        return Ok(output.json(&load_preset(&name)?)?);
    }

    let summaries = preset_service().list()?;
    if output.is_json() {
        output.json(&summaries)?;
        return Ok(());
    }

    output.header("Built-in presets:")?;
    for summary in &summaries {
        output.print(&format!(
            "  {:<16} {:<24} {} entities, {} relationships",
            summary.name,
            summary.title,
            summary.entities,
            summary.relationships
        ))?;
        if let Some(domain) = &summary.domain {
            output.dim(&format!("  {:<16} {domain}", ""))?;
        }
    }
    output.print("")?;
    output.info("Generate one with: stencil generate --preset <NAME>")?;
    Ok(())
}
