//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Domain-to-application code generation",
    long_about = "Stencil turns a declarative domain description (entities, fields, \
                  relationships) into persistence models, validation schemas, REST \
                  routes, UI components and tests.",
    after_help = "EXAMPLES:\n\
        \x20 stencil generate shop.yaml -o ./shop\n\
        \x20 stencil generate --preset blog --dry-run\n\
        \x20 stencil validate shop.json\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate application code from a domain configuration.
    #[command(
        visible_alias = "gen",
        about = "Generate code from a domain configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil generate shop.yaml -o ./out\n\
            \x20 stencil generate --preset crm --jobs 4 --force -o ./crm\n\
            \x20 stencil generate shop.json --dry-run --format json"
    )]
    Generate(GenerateArgs),

    /// Check a domain configuration without generating anything.
    #[command(
        about = "Validate a domain configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil validate shop.yaml\n\
            \x20 stencil validate --preset blog --strict"
    )]
    Validate(ValidateArgs),

    /// Print the file tree a configuration would produce.
    #[command(
        about = "Show the generated file tree",
        after_help = "EXAMPLES:\n\
            \x20 stencil tree shop.yaml\n\
            \x20 stencil tree --preset project-tracker --paths"
    )]
    Tree(TreeArgs),

    /// List the built-in domain presets.
    #[command(
        visible_alias = "ls",
        about = "List built-in presets",
        after_help = "EXAMPLES:\n\
            \x20 stencil presets\n\
            \x20 stencil presets shop > shop.json"
    )]
    Presets(PresetsArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get generation.parallelism\n\
            \x20 stencil config list\n\
            \x20 stencil config path"
    )]
    Config(ConfigCommands),
}

// ── source ────────────────────────────────────────────────────────────────────

/// Where the domain configuration comes from: a document or a preset.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Path to a JSON or YAML document; `-` reads standard input.
    #[arg(value_name = "CONFIG", help = "Domain configuration document (- for stdin)")]
    pub document: Option<PathBuf>,

    /// Use a built-in preset instead of a document.
    #[arg(
        short = 'p',
        long = "preset",
        value_name = "NAME",
        help = "Built-in preset (see `stencil presets`)"
    )]
    pub preset: Option<String>,
}

/// Document format override for `-` or extension-less paths.
#[derive(Debug, Args)]
pub struct InputFormatArgs {
    #[arg(
        long = "input-format",
        value_enum,
        value_name = "FORMAT",
        help = "Document format when it cannot be inferred from the extension"
    )]
    pub input_format: Option<InputFormat>,
}

/// Accepted configuration document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    /// Also accepted as `yml`.
    #[value(alias = "yml")]
    Yaml,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `stencil generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub input: InputFormatArgs,

    /// Directory the generated tree is written into.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = "generated",
        help = "Output directory"
    )]
    pub output: PathBuf,

    /// Root directory for UI components inside the output.
    #[arg(
        long = "frontend-root",
        value_name = "DIR",
        help = "Root directory for UI components (default: frontend)"
    )]
    pub frontend_root: Option<String>,

    /// Rendering worker threads.
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Number of rendering threads"
    )]
    pub jobs: Option<u16>,

    /// Report without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,

    /// Overwrite an existing output directory (destructive).
    #[arg(long = "force", help = "Overwrite existing output directory")]
    pub force: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `stencil validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub input: InputFormatArgs,

    /// Treat warnings as blocking.
    #[arg(long = "strict", help = "Fail on warnings as well as errors")]
    pub strict: bool,
}

// ── tree ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil tree`.
#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub input: InputFormatArgs,

    /// Root directory for UI components.
    #[arg(long = "frontend-root", value_name = "DIR")]
    pub frontend_root: Option<String>,

    /// One path per line instead of the drawn tree.
    #[arg(long = "paths", help = "Print one file path per line")]
    pub paths: bool,
}

// ── presets ───────────────────────────────────────────────────────────────────

/// Arguments for `stencil presets`.
#[derive(Debug, Args)]
pub struct PresetsArgs {
    /// Print this preset as a JSON document instead of listing.
    #[arg(value_name = "NAME", help = "Preset to print as a configuration document")]
    pub name: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `registry.short_text_length`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
