//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StencilError, StencilResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StencilError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_removes_a_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&root.join("shops/models")).unwrap();
        fs.write_file(&root.join("shops/models/product.py"), "x = 1\n")
            .unwrap();
        assert!(fs.exists(&root.join("shops/models/product.py")));

        fs.remove_dir_all(&root).unwrap();
        assert!(!fs.exists(&root));
    }

    #[test]
    fn writing_into_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&dir.path().join("missing/file.py"), "")
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
