use serde::{Serialize, Serializer};

use crate::domain::{
    entities::{file_tree::FileTree, issue::ValidationIssue},
    value_objects::ArtifactKind,
};

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFile {
    pub path: String,
    pub content: String,
}

impl ArtifactFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Outcome of one artifact render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Generated,
    Failed,
}

/// The result of rendering one (entity, kind) pair, or one junction table.
///
/// `path` and `content` are those of the primary file; `size` is the byte
/// size of all files. A failed artifact carries its would-be path and no
/// files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub path: String,
    pub kind: ArtifactKind,
    pub size: usize,
    #[serde(skip)]
    pub content: String,
    pub status: ArtifactStatus,
    /// Source entity; `None` for cross-entity artifacts such as junctions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(serialize_with = "serialize_file_paths")]
    pub files: Vec<ArtifactFile>,
}

fn serialize_file_paths<S: Serializer>(files: &[ArtifactFile], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(files.iter().map(|f| f.path.as_str()))
}

impl GeneratedArtifact {
    /// A successful render. `files` must be non-empty; the first is primary.
    pub fn generated(kind: ArtifactKind, entity: Option<String>, files: Vec<ArtifactFile>) -> Self {
        let (path, content) = files
            .first()
            .map(|f| (f.path.clone(), f.content.clone()))
            .unwrap_or_default();

        Self {
            path,
            kind,
            size: files.iter().map(ArtifactFile::size).sum(),
            content,
            status: ArtifactStatus::Generated,
            entity,
            files,
        }
    }

    /// A render that failed or was never attempted because its entity is
    /// quarantined.
    pub fn failed(kind: ArtifactKind, entity: Option<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            size: 0,
            content: String::new(),
            status: ArtifactStatus::Failed,
            entity,
            files: Vec::new(),
        }
    }

    pub fn is_generated(&self) -> bool {
        self.status == ArtifactStatus::Generated
    }
}

/// Terminal status of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Every pair was attempted. Individual artifacts may still have failed.
    Completed,
    /// A configuration-level error halted the run before rendering.
    Failed,
    /// The caller cancelled the run during rendering.
    Cancelled,
}

impl GenerationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller-owned outcome of a generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub status: GenerationStatus,
    /// Names of the pipeline steps that ran, in order.
    pub steps: Vec<String>,
    pub issues: Vec<ValidationIssue>,
    pub artifacts: Vec<GeneratedArtifact>,
    /// Number of entries in `artifacts`, failed ones included.
    pub total_artifacts: usize,
    /// Number of files across generated artifacts.
    pub total_files: usize,
    #[serde(skip)]
    pub tree: FileTree,
}

impl GenerationResult {
    pub fn new(
        status: GenerationStatus,
        steps: Vec<String>,
        issues: Vec<ValidationIssue>,
        artifacts: Vec<GeneratedArtifact>,
        tree: FileTree,
    ) -> Self {
        let total_files = artifacts
            .iter()
            .filter(|a| a.is_generated())
            .map(|a| a.files.len())
            .sum();

        Self {
            status,
            steps,
            issues,
            total_artifacts: artifacts.len(),
            total_files,
            artifacts,
            tree,
        }
    }

    pub fn generated(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(|a| a.is_generated())
    }

    pub fn failed(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(|a| !a.is_generated())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    /// Artifacts derived from one entity, in kind order.
    pub fn artifacts_for<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = &'a GeneratedArtifact> + 'a {
        self.artifacts
            .iter()
            .filter(move |a| a.entity.as_deref() == Some(entity))
    }

    /// Content of the file at `path`, if a generated artifact produced it.
    pub fn file(&self, path: &str) -> Option<&str> {
        self.generated()
            .flat_map(|a| a.files.iter())
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_artifact_sums_file_sizes() {
        let artifact = GeneratedArtifact::generated(
            ArtifactKind::Ui,
            Some("Product".into()),
            vec![
                ArtifactFile::new("ui/ProductList.tsx", "abc"),
                ArtifactFile::new("ui/ProductForm.tsx", "defgh"),
            ],
        );
        assert_eq!(artifact.size, 8);
        assert_eq!(artifact.path, "ui/ProductList.tsx");
        assert_eq!(artifact.content, "abc");
    }

    #[test]
    fn result_counts_only_generated_files() {
        let ok = GeneratedArtifact::generated(
            ArtifactKind::Model,
            Some("A".into()),
            vec![ArtifactFile::new("a.py", "x")],
        );
        let bad = GeneratedArtifact::failed(ArtifactKind::Schema, Some("A".into()), "s.py");
        let result = GenerationResult::new(
            GenerationStatus::Completed,
            vec![],
            vec![],
            vec![ok, bad],
            FileTree::default(),
        );
        assert_eq!(result.total_artifacts, 2);
        assert_eq!(result.total_files, 1);
        assert_eq!(result.file("a.py"), Some("x"));
        assert_eq!(result.file("s.py"), None);
    }

    #[test]
    fn serializes_file_paths_not_contents() {
        let artifact = GeneratedArtifact::generated(
            ArtifactKind::Model,
            None,
            vec![ArtifactFile::new("m/junction.py", "class X: pass")],
        );
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["files"], serde_json::json!(["m/junction.py"]));
        assert_eq!(json["status"], "generated");
        assert!(json.get("content").is_none());
        assert!(json.get("entity").is_none());
    }
}
