//! `stencil tree`: show the file tree a configuration produces, without
//! writing it.

use tracing::instrument;

use stencil_adapters::StackRenderer;
use stencil_core::{
    application::GenerationService,
    domain::GenerationStatus,
};

use crate::{
    cli::TreeArgs,
    commands::{generation_options, load_source, print_issues},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(paths = args.paths))]
pub fn execute(args: TreeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let domain = load_source(&args.source, &args.input)?;
    let options = generation_options(&config, None, args.frontend_root.as_deref());
    let result = GenerationService::new(Box::new(StackRenderer::new()))
        .with_options(options)
        .generate(&domain);

    if result.status == GenerationStatus::Failed {
        print_issues(&output, &result.issues)?;
        return Err(CliError::GenerationFailed {
            name: domain.name,
            errors: result.errors().count(),
        });
    }

    if output.is_json() {
        output.json(&result.tree.walk())?;
    } else if args.paths {
        for file in result.tree.files() {
            output.print(&file.path)?;
        }
    } else {
        for line in result.tree.render_ascii().lines() {
            output.print(line)?;
        }
    }

    for artifact in result.failed() {
        output.warning(&format!("{} was not generated", artifact.path))?;
    }
    Ok(())
}
