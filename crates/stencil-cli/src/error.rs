//! Error handling for the Stencil CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;
use std::io;

use owo_colors::OwoColorize;
use thiserror::Error;

use stencil_adapters::LoadError;
use stencil_core::error::StencilError;

// Re-export so callers only need `use crate::error::*`.
pub use stencil_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration file or key could not be read.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The domain configuration document could not be loaded.
    #[error("Could not load domain configuration: {0}")]
    Load(#[from] LoadError),

    /// No built-in preset has this name.
    #[error("Preset not found: {name}")]
    PresetNotFound { name: String, available: Vec<String> },

    /// The configuration has blocking issues.
    #[error("Domain '{name}' has {errors} blocking issue(s)")]
    ValidationFailed { name: String, errors: usize },

    /// The pipeline halted before rendering.
    #[error("Generation of '{name}' failed with {errors} blocking issue(s)")]
    GenerationFailed { name: String, errors: usize },

    /// An error propagated from `stencil-core`.
    #[error("{0}")]
    Core(#[from] StencilError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Check your config file (see: stencil config path)".into(),
                "Environment overrides use STENCIL__SECTION__KEY".into(),
            ],

            Self::Load(err) => err.suggestions(),

            Self::PresetNotFound { name, available } => {
                let mut suggestions = vec![format!("'{}' is not a built-in preset", name)];
                if !available.is_empty() {
                    suggestions.push("Available presets:".into());
                    suggestions.extend(available.iter().map(|p| format!("  \u{2022} {p}")));
                }
                suggestions.push("List presets: stencil presets".into());
                suggestions
            }

            Self::ValidationFailed { .. } => vec![
                "Fix the errors listed above and validate again".into(),
                "Entity names are case-sensitive in relationships".into(),
            ],

            Self::GenerationFailed { .. } => vec![
                "Run `stencil validate` on the same configuration for details".into(),
                "No files were written".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Load(LoadError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                ErrorCategory::NotFound
            }
            Self::Load(LoadError::Io { .. }) => ErrorCategory::Internal,
            Self::Load(_) => ErrorCategory::UserError,
            Self::PresetNotFound { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed { .. } => ErrorCategory::UserError,
            Self::GenerationFailed { .. } => ErrorCategory::UserError,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "\u{2192}".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`]; no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
///
/// There is no blanket impl; it would overlap with the concrete ones.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use stencil_core::application::ApplicationError;

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn preset_not_found_lists_available() {
        let err = CliError::PresetNotFound {
            name: "garden".into(),
            available: vec!["Shop".into(), "Blog".into()],
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("Shop")));
        assert!(suggestions.iter().any(|s| s.contains("stencil presets")));
    }

    #[test]
    fn output_exists_suggests_force() {
        let err = CliError::Core(
            ApplicationError::OutputExists {
                path: PathBuf::from("/tmp/out"),
            }
            .into(),
        );
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn load_errors_reuse_loader_suggestions() {
        let err = CliError::Load(LoadError::UnknownFormat {
            path: PathBuf::from("shop.toml"),
            extension: "toml".into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains(".yaml")));
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        let err = CliError::ValidationFailed {
            name: "Shop".into(),
            errors: 1,
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            CliError::GenerationFailed {
                name: "Shop".into(),
                errors: 1
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn exit_code_not_found() {
        let err = CliError::PresetNotFound {
            name: "x".into(),
            available: Vec::new(),
        };
        assert_eq!(err.exit_code(), 3);

        let missing = CliError::Load(LoadError::Io {
            path: PathBuf::from("absent.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(missing.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        let core = CliError::Core(StencilError::Configuration {
            message: "bad".into(),
        });
        assert_eq!(core.exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::ValidationFailed {
            name: "Shop".into(),
            errors: 2,
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error: Domain 'Shop' has 2 blocking issue(s)"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "writing report".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading stdin");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message == "reading stdin"));
    }
}
