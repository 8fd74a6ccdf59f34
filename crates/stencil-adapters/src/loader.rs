//! Domain configuration document loader.
//!
//! Reads a [`DomainConfiguration`] from a JSON or YAML document. The format
//! comes from the file extension (`.json`, `.yaml`, `.yml`) or is given
//! explicitly when the document does not live on disk.
//!
//! ```yaml
//! name: Shop
//! entities:
//!   - name: Product
//!     fields:
//!       - { name: name, type: short-text, required: true }
//! relationships: []
//! ```
//!
//! Loading only parses; it never validates. Use
//! [`DomainValidator`](stencil_core::domain::DomainValidator) for that.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use stencil_core::{domain::DomainConfiguration, error::StencilError};
use thiserror::Error;
use tracing::{debug, instrument};

// ── Format ────────────────────────────────────────────────────────────────────

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse().map_err(|_| LoadError::UnknownFormat {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors from reading or parsing a configuration document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unrecognised document format '{extension}' for {path}")]
    UnknownFormat { path: PathBuf, extension: String },
}

impl LoadError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Io { path, .. } => vec![
                format!("Check that {} exists and is readable", path.display()),
            ],
            Self::Json(_) | Self::Yaml(_) => vec![
                "Keys are camelCase: name, entities, relationships, primaryKey".into(),
                "Every field needs a name and a type".into(),
            ],
            Self::UnknownFormat { .. } => vec![
                "Use a .json, .yaml or .yml file".into(),
            ],
        }
    }
}

impl From<LoadError> for StencilError {
    fn from(err: LoadError) -> Self {
        StencilError::Configuration {
            message: err.to_string(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Read and parse a configuration document; the format follows the
/// extension.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_path(path: impl AsRef<Path>) -> Result<DomainConfiguration, LoadError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_str(&text, format)?;
    debug!(
        name = %config.name,
        entities = config.entities.len(),
        relationships = config.relationships.len(),
        %format,
        "Loaded domain configuration"
    );
    Ok(config)
}

/// Parse a configuration document held in memory.
pub fn parse_str(text: &str, format: DocumentFormat) -> Result<DomainConfiguration, LoadError> {
    Ok(match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    })
}
