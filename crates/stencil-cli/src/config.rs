//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the
//! [`GenerationOptions`] built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STENCIL__<SECTION>__<KEY>`, e.g.
//!    `STENCIL__GENERATION__PARALLELISM=4`
//! 3. Config file: `--config <FILE>` or the platform config directory
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use stencil_core::{application::GenerationOptions, domain::TypeRegistry};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pipeline settings.
    pub generation: GenerationConfig,
    /// Type registry settings.
    pub registry: RegistryConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// UI component root; the engine default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_root: Option<String>,
    /// Rendering threads; `0` picks one per core.
    pub parallelism: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub short_text_length: u32,
    pub decimal_precision: u8,
    pub decimal_scale: u8,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let registry = TypeRegistry::default();
        Self {
            short_text_length: registry.short_text_length(),
            decimal_precision: registry.decimal_precision(),
            decimal_scale: registry.decimal_scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::config_path().as_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("STENCIL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.check()?;
        Ok(config)
    }

    /// Reject values the engine would otherwise clamp silently.
    fn check(&self) -> anyhow::Result<()> {
        let registry = &self.registry;
        if registry.short_text_length == 0 {
            anyhow::bail!("registry.short_text_length must be at least 1");
        }
        if registry.decimal_precision == 0 {
            anyhow::bail!("registry.decimal_precision must be at least 1");
        }
        if registry.decimal_scale > registry.decimal_precision {
            anyhow::bail!(
                "registry.decimal_scale ({}) exceeds registry.decimal_precision ({})",
                registry.decimal_scale,
                registry.decimal_precision
            );
        }
        Ok(())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stencil.toml"))
    }

    pub fn type_registry(&self) -> TypeRegistry {
        TypeRegistry::new()
            .with_short_text_length(self.registry.short_text_length)
            .with_decimal(self.registry.decimal_precision, self.registry.decimal_scale)
    }

    /// Engine options from this configuration; flags override at the
    /// call-site.
    pub fn generation_options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::default().with_registry(self.type_registry());
        if self.generation.parallelism > 0 {
            options = options.with_parallelism(self.generation.parallelism);
        }
        if let Some(root) = &self.generation.frontend_root {
            options = options.with_frontend_root(root.clone());
        }
        options
    }
}
