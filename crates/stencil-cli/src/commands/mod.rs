//! Command handlers.
//!
//! Each handler translates parsed arguments into core calls and renders the
//! outcome. The helpers here are shared by the commands that take a domain
//! configuration.

use std::{fs, io::Read as _, path::Path};

use stencil_adapters::{DocumentFormat, InMemoryDomainStore, LoadError, loader};
use stencil_core::{
    application::{ApplicationError, DomainService, GenerationOptions},
    domain::{DomainConfiguration, IssueLevel, ValidationIssue},
    error::StencilError,
};

use crate::{
    cli::{InputFormat, InputFormatArgs, SourceArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub mod completions;
pub mod config;
pub mod generate;
pub mod presets;
pub mod tree;
pub mod validate;

// ── Source loading ────────────────────────────────────────────────────────────

/// Resolve the domain configuration named by `source`.
pub(crate) fn load_source(
    source: &SourceArgs,
    input: &InputFormatArgs,
) -> CliResult<DomainConfiguration> {
    if let Some(name) = &source.preset {
        return load_preset(name);
    }

    let Some(path) = &source.document else {
        return Err(CliError::InvalidInput {
            message: "a configuration document or --preset is required".into(),
            source: None,
        });
    };
    let format = input.input_format.map(document_format);

    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .with_cli_context(|| "reading configuration from stdin")?;
        return Ok(loader::parse_str(&text, format.unwrap_or(DocumentFormat::Json))?);
    }

    match format {
        Some(format) => Ok(loader::parse_str(&read_document(path)?, format)?),
        None => Ok(loader::load_path(path)?),
    }
}

fn read_document(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn preset_service() -> DomainService {
    DomainService::new(Box::new(InMemoryDomainStore::with_presets()))
}

pub(crate) fn load_preset(name: &str) -> CliResult<DomainConfiguration> {
    let service = preset_service();
    match service.get(name) {
        Err(StencilError::Application(ApplicationError::DomainNotFound { name })) => {
            let available = service
                .list()?
                .into_iter()
                .map(|summary| summary.name)
                .collect();
            Err(CliError::PresetNotFound { name, available })
        }
        other => Ok(other?),
    }
}

fn document_format(format: InputFormat) -> DocumentFormat {
    match format {
        InputFormat::Json => DocumentFormat::Json,
        InputFormat::Yaml => DocumentFormat::Yaml,
    }
}

// ── Options ───────────────────────────────────────────────────────────────────

/// Engine options: configuration first, then per-invocation flags.
pub(crate) fn generation_options(
    config: &AppConfig,
    jobs: Option<u16>,
    frontend_root: Option<&str>,
) -> GenerationOptions {
    let mut options = config.generation_options();
    if let Some(jobs) = jobs {
        options = options.with_parallelism(usize::from(jobs));
    }
    if let Some(root) = frontend_root {
        options = options.with_frontend_root(root);
    }
    options
}

// ── Reporting ─────────────────────────────────────────────────────────────────

/// Print issues, most severe first within the validator's order.
pub(crate) fn print_issues(output: &OutputManager, issues: &[ValidationIssue]) -> CliResult<()> {
    for issue in issues {
        let line = format!("[{}] {}", issue.category, issue.message);
        match issue.level {
            IssueLevel::Error => output.error(&line)?,
            IssueLevel::Warning => output.warning(&line)?,
            IssueLevel::Info => output.info(&line)?,
        }
        if let Some(suggestion) = &issue.suggestion {
            output.dim(&format!("    {suggestion}"))?;
        }
    }
    Ok(())
}
