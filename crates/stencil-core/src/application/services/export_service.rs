//! Export Service - writes an assembled file tree to a filesystem.
//!
//! Export is all-or-nothing when it owns the output root: if any write fails
//! the root it created is removed again.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::FileTree,
    error::StencilResult,
};

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub root: PathBuf,
    pub files: usize,
    pub bytes: usize,
}

pub struct ExportService {
    filesystem: Box<dyn Filesystem>,
}

impl ExportService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write every file of `tree` below `root`.
    ///
    /// An existing `root` is refused unless `overwrite` is set. Files already
    /// present are then replaced and files not in the tree are left alone.
    /// Nothing is written if any path of the tree would leave `root`.
    #[instrument(
        skip_all,
        fields(root = %root.as_ref().display(), files = tree.file_count(), overwrite)
    )]
    pub fn export(
        &self,
        tree: &FileTree,
        root: impl AsRef<Path>,
        overwrite: bool,
    ) -> StencilResult<ExportSummary> {
        let root = root.as_ref();
        if let Some(file) = tree.files().into_iter().find(|f| !stays_below_root(&f.path)) {
            return Err(ApplicationError::FilesystemError {
                path: root.join(&file.path),
                reason: "path leaves the output directory".into(),
            }
            .into());
        }
        let existed = self.filesystem.exists(root);

        if existed && !overwrite {
            return Err(ApplicationError::OutputExists {
                path: root.to_path_buf(),
            }
            .into());
        }

        match self.write_all(tree, root) {
            Ok(summary) => {
                info!(files = summary.files, bytes = summary.bytes, "Export completed");
                Ok(summary)
            }
            Err(e) if existed => {
                warn!(error = %e, "Export failed; pre-existing output left as is");
                Err(e)
            }
            Err(e) => {
                warn!("Export failed, attempting rollback");
                self.rollback(root);
                Err(e)
            }
        }
    }

    fn write_all(&self, tree: &FileTree, root: &Path) -> StencilResult<ExportSummary> {
        self.filesystem.create_dir_all(root)?;

        let mut summary = ExportSummary {
            root: root.to_path_buf(),
            files: 0,
            bytes: 0,
        };

        for file in tree.files() {
            let path = root.join(&file.path);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, &file.content)?;

            summary.files += 1;
            summary.bytes += file.size();
        }

        Ok(summary)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

/// Only plain relative segments: no `..`, no root, no drive prefix.
fn stays_below_root(path: &str) -> bool {
    let path = Path::new(path);
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{ArtifactFile, ArtifactKind, GeneratedArtifact};
    use crate::error::StencilError;
    use mockall::predicate::eq;

    fn tree() -> FileTree {
        let artifacts = vec![GeneratedArtifact::generated(
            ArtifactKind::Model,
            Some("Product".into()),
            vec![ArtifactFile::new("shops/models/product.py", "class Product: ...\n")],
        )];
        FileTree::assemble(&artifacts).0
    }

    #[test]
    fn refuses_existing_root_without_overwrite() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_create_dir_all().never();

        let err = ExportService::new(Box::new(fs))
            .export(&tree(), "/out", false)
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::OutputExists { .. })
        ));
    }

    #[test]
    fn writes_every_file_below_root() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .with(
                eq(Path::new("/out/shops/models/product.py")),
                eq("class Product: ...\n"),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let summary = ExportService::new(Box::new(fs))
            .export(&tree(), "/out", false)
            .unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.bytes, 19);
    }

    #[test]
    fn paths_leaving_the_root_are_refused_before_writing() {
        for escaping in ["../../tmp/evils/models/product.py", "/etc/shops/models/product.py"] {
            let artifacts = vec![GeneratedArtifact::generated(
                ArtifactKind::Model,
                Some("Product".into()),
                vec![ArtifactFile::new(escaping, "class Product: ...\n")],
            )];
            let tree = FileTree::assemble(&artifacts).0;

            let mut fs = MockFilesystem::new();
            fs.expect_exists().never();
            fs.expect_create_dir_all().never();
            fs.expect_write_file().never();

            let err = ExportService::new(Box::new(fs))
                .export(&tree, "/out", true)
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    StencilError::Application(ApplicationError::FilesystemError { .. })
                ),
                "{escaping}"
            );
        }
    }

    #[test]
    fn failed_write_rolls_back_created_root() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/out")))
            .times(1)
            .returning(|_| Ok(()));

        assert!(
            ExportService::new(Box::new(fs))
                .export(&tree(), "/out", false)
                .is_err()
        );
    }

    #[test]
    fn failed_overwrite_leaves_existing_root() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "read-only".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all().never();

        assert!(
            ExportService::new(Box::new(fs))
                .export(&tree(), "/out", true)
                .is_err()
        );
    }
}
