//! The virtual file tree assembled from generated artifacts.
//!
//! Paths are `/`-separated and relative. Levels are kept in `BTreeMap`s so a
//! traversal is always directories first, then files, each alphabetical.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::domain::{
    entities::artifact::GeneratedArtifact, error::DomainError, value_objects::ArtifactKind,
};

/// A file placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub path: String,
    pub content: String,
    pub kind: ArtifactKind,
    pub entity: Option<String>,
}

impl TreeFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// One directory level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDirectory {
    directories: BTreeMap<String, TreeDirectory>,
    files: BTreeMap<String, TreeFile>,
    size: usize,
    file_count: usize,
}

impl TreeDirectory {
    /// Total bytes of all files below this directory.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of files below this directory.
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Whether a file could be inserted at `segments`.
    fn is_free(&self, segments: &[&str]) -> bool {
        match segments {
            [] => false,
            [name] => !self.files.contains_key(*name) && !self.directories.contains_key(*name),
            [dir, rest @ ..] => {
                !self.files.contains_key(*dir)
                    && self.directories.get(*dir).is_none_or(|d| d.is_free(rest))
            }
        }
    }

    fn insert(&mut self, segments: &[&str], file: TreeFile) -> bool {
        let inserted = match segments {
            [] => false,
            [name] => {
                if self.files.contains_key(*name) || self.directories.contains_key(*name) {
                    false
                } else {
                    self.files.insert((*name).to_string(), file.clone());
                    true
                }
            }
            [dir, rest @ ..] => {
                if self.files.contains_key(*dir) {
                    false
                } else {
                    self.directories
                        .entry((*dir).to_string())
                        .or_default()
                        .insert(rest, file.clone())
                }
            }
        };

        if inserted {
            self.size += file.size();
            self.file_count += 1;
        }
        inserted
    }
}

/// A node visited by [`FileTree::walk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub size: usize,
    /// Files below a directory; `1` for a file.
    pub file_count: usize,
}

/// Nested view of every file produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    root: TreeDirectory,
}

impl FileTree {
    /// Group the files of generated artifacts into a tree.
    ///
    /// Failed artifacts contribute nothing. An artifact is placed whole or
    /// not at all: if any of its files lands on a path that is already
    /// taken, none of them is placed. Rejected artifacts are returned by
    /// index alongside the tree so the caller can report them.
    pub fn assemble(artifacts: &[GeneratedArtifact]) -> (Self, Vec<(usize, DomainError)>) {
        let mut tree = Self::default();
        let mut rejected = Vec::new();

        for (i, artifact) in artifacts.iter().enumerate() {
            if !artifact.is_generated() {
                continue;
            }
            match tree.first_clash(artifact) {
                Some(path) => rejected.push((i, DomainError::DuplicatePath { path })),
                None => {
                    for file in &artifact.files {
                        tree.insert(TreeFile {
                            path: file.path.clone(),
                            content: file.content.clone(),
                            kind: artifact.kind,
                            entity: artifact.entity.clone(),
                        });
                    }
                }
            }
        }

        (tree, rejected)
    }

    /// The first file of `artifact` that cannot be placed, either because
    /// the tree already holds its path or because the artifact's own files
    /// collide with each other.
    fn first_clash(&self, artifact: &GeneratedArtifact) -> Option<String> {
        let mut own = TreeDirectory::default();
        artifact.files.iter().find_map(|file| {
            let segments = split(&file.path);
            let free = self.root.is_free(&segments)
                && own.insert(
                    &segments,
                    TreeFile {
                        path: file.path.clone(),
                        content: String::new(),
                        kind: artifact.kind,
                        entity: None,
                    },
                );
            (!free).then(|| file.path.clone())
        })
    }

    /// Insert one file. Returns `false` if the path is already occupied.
    pub fn insert(&mut self, file: TreeFile) -> bool {
        let path = file.path.clone();
        self.root.insert(&split(&path), file)
    }

    pub fn root(&self) -> &TreeDirectory {
        &self.root
    }

    pub fn total_size(&self) -> usize {
        self.root.size
    }

    pub fn file_count(&self) -> usize {
        self.root.file_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.file_count == 0
    }

    /// Top-level directory and file names.
    pub fn roots(&self) -> Vec<&str> {
        self.root
            .directories
            .keys()
            .chain(self.root.files.keys())
            .map(String::as_str)
            .collect()
    }

    /// Depth-first traversal: directories before files, alphabetical within
    /// a level.
    pub fn walk(&self) -> Vec<TreeNode> {
        let mut nodes = Vec::new();
        walk_dir(&self.root, "", 0, &mut nodes);
        nodes
    }

    /// Every file in traversal order.
    pub fn files(&self) -> Vec<&TreeFile> {
        let mut files = Vec::new();
        collect_files(&self.root, &mut files);
        files
    }

    /// Render as an ASCII tree with per-directory totals.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            ". ({} files, {})",
            self.file_count(),
            human_size(self.total_size())
        );
        render_level(&self.root, "", &mut out);
        out
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

fn walk_dir(dir: &TreeDirectory, prefix: &str, depth: usize, out: &mut Vec<TreeNode>) {
    for (name, sub) in &dir.directories {
        let path = join(prefix, name);
        out.push(TreeNode {
            path: path.clone(),
            name: name.clone(),
            depth,
            is_dir: true,
            size: sub.size,
            file_count: sub.file_count,
        });
        walk_dir(sub, &path, depth + 1, out);
    }
    for (name, file) in &dir.files {
        out.push(TreeNode {
            path: join(prefix, name),
            name: name.clone(),
            depth,
            is_dir: false,
            size: file.size(),
            file_count: 1,
        });
    }
}

fn collect_files<'a>(dir: &'a TreeDirectory, out: &mut Vec<&'a TreeFile>) {
    for sub in dir.directories.values() {
        collect_files(sub, out);
    }
    out.extend(dir.files.values());
}

fn render_level(dir: &TreeDirectory, indent: &str, out: &mut String) {
    let total = dir.directories.len() + dir.files.len();
    let entries = dir
        .directories
        .iter()
        .map(|(name, sub)| (name, Some(sub), sub.size))
        .chain(dir.files.iter().map(|(name, f)| (name, None, f.size())));

    for (i, (name, sub, size)) in entries.enumerate() {
        let last = i + 1 == total;
        let branch = if last { "└── " } else { "├── " };
        match sub {
            Some(sub) => {
                let _ = writeln!(
                    out,
                    "{indent}{branch}{name}/ ({} files, {})",
                    sub.file_count,
                    human_size(size)
                );
                let child_indent = format!("{indent}{}", if last { "    " } else { "│   " });
                render_level(sub, &child_indent, out);
            }
            None => {
                let _ = writeln!(out, "{indent}{branch}{name} ({})", human_size(size));
            }
        }
    }
}

fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
