//! Output paths for generated artifacts.
//!
//! A path is a pure function of (configuration name, entity name, artifact
//! kind, frontend root). Backend artifacts live under the configuration's
//! package directory (its lowercase plural name); UI components live under
//! the frontend root.
//!
//! | Kind     | Path |
//! |----------|------|
//! | model    | `<package>/models/<snake>.py` |
//! | schema   | `<package>/schemas/<snake>.py` |
//! | routes   | `<package>/api/routes/<snake>.py` |
//! | ui       | `<frontend>/components/<Pascal>/<Pascal>List.tsx`, `...Form.tsx` |
//! | tests    | `<package>/tests/test_<snake>.py` |
//! | junction | `<package>/models/<junction_table>.py` |
//! | package  | `<package>/database.py`, `<package>/main.py` |

use crate::domain::{entities::DomainConfiguration, naming, value_objects::ArtifactKind};

pub const DEFAULT_FRONTEND_ROOT: &str = "frontend";
const FALLBACK_PACKAGE: &str = "app";

const BACKEND_EXTENSION: &str = "py";
const UI_EXTENSION: &str = "tsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    package: String,
    frontend_root: String,
}

impl OutputLayout {
    pub fn new(package: impl Into<String>) -> Self {
        let package = package.into();
        Self {
            package: if package.is_empty() {
                FALLBACK_PACKAGE.to_string()
            } else {
                package
            },
            frontend_root: DEFAULT_FRONTEND_ROOT.to_string(),
        }
    }

    /// Layout for a configuration with the default frontend root.
    pub fn for_configuration(config: &DomainConfiguration) -> Self {
        Self::new(config.package_name())
    }

    /// Set the frontend root. Surrounding slashes are dropped; an empty root
    /// falls back to the default.
    pub fn with_frontend_root(mut self, root: impl AsRef<str>) -> Self {
        let root = root.as_ref().trim().trim_matches('/');
        self.frontend_root = if root.is_empty() {
            DEFAULT_FRONTEND_ROOT.to_string()
        } else {
            root.to_string()
        };
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn frontend_root(&self) -> &str {
        &self.frontend_root
    }

    /// Extension-less path stems for an entity's artifact of `kind`.
    ///
    /// Every kind has one stem except UI, which has the list and the form,
    /// and the package, whose database and entry modules ignore `entity`.
    pub fn stems(&self, entity: &str, kind: ArtifactKind) -> Vec<String> {
        let snake = naming::to_snake_case(entity);
        let pascal = naming::to_pascal_case(entity);
        let package = &self.package;

        match kind {
            ArtifactKind::Model | ArtifactKind::Junction => {
                vec![format!("{package}/models/{snake}")]
            }
            ArtifactKind::Schema => vec![format!("{package}/schemas/{snake}")],
            ArtifactKind::Routes => vec![format!("{package}/api/routes/{snake}")],
            ArtifactKind::Tests => vec![format!("{package}/tests/test_{snake}")],
            ArtifactKind::Ui => {
                let dir = format!("{}/components/{pascal}", self.frontend_root);
                vec![format!("{dir}/{pascal}List"), format!("{dir}/{pascal}Form")]
            }
            ArtifactKind::Package => vec![format!("{package}/database"), format!("{package}/main")],
        }
    }

    /// Full file paths for an entity's artifact of `kind`.
    pub fn paths(&self, entity: &str, kind: ArtifactKind) -> Vec<String> {
        let ext = match kind {
            ArtifactKind::Ui => UI_EXTENSION,
            _ => BACKEND_EXTENSION,
        };
        self.stems(entity, kind)
            .into_iter()
            .map(|stem| format!("{stem}.{ext}"))
            .collect()
    }

    /// The primary (first) path for an entity's artifact of `kind`.
    pub fn primary_path(&self, entity: &str, kind: ArtifactKind) -> String {
        self.paths(entity, kind).into_iter().next().unwrap_or_default()
    }

    /// Paths of the shared package modules: database first, then the entry
    /// point.
    pub fn package_paths(&self) -> Vec<String> {
        self.paths("", ArtifactKind::Package)
    }

    /// Path of a many-to-many junction model.
    pub fn junction_path(&self, table: &str) -> String {
        format!("{}/models/{table}.{BACKEND_EXTENSION}", self.package)
    }

    /// Python module path for a backend path: `shops/models/product.py` →
    /// `shops.models.product`.
    pub fn module_path(&self, path: &str) -> String {
        path.trim_end_matches(&format!(".{BACKEND_EXTENSION}"))
            .replace('/', ".")
    }
}
