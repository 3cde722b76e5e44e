//! Source trees that can be published.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use include_dir::{Dir, DirEntry};
use tracing::debug;

use crate::error::{Error, Result};

/// A file in a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the source root.
    pub path: PathBuf,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

/// A read-only tree of files to publish.
pub trait SourceTree {
    /// Returns every file in the tree, sorted by relative path.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be read.
    fn files(&self) -> Result<Vec<SourceFile>>;
}

/// A tree compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    root: &'static Dir<'static>,
}

impl EmbeddedSource {
    /// Wraps an embedded directory.
    #[must_use]
    pub const fn new(root: &'static Dir<'static>) -> Self {
        Self { root }
    }
}

impl SourceTree for EmbeddedSource {
    fn files(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        let mut stack: Vec<&Dir<'_>> = vec![self.root];
        while let Some(dir) = stack.pop() {
            for entry in dir.entries() {
                match entry {
                    DirEntry::Dir(sub) => stack.push(sub),
                    DirEntry::File(file) => files.push(SourceFile {
                        path: file.path().to_path_buf(),
                        contents: file.contents().to_vec(),
                    }),
                }
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

/// A tree read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the source root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceTree for DirSource {
    fn files(&self) -> Result<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(Error::SourceNotFound(self.root.clone()));
        }

        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| Error::InvalidPath(entry.path().to_path_buf()))?;
            let contents = std::fs::read(entry.path())
                .map_err(|e| Error::io("read", entry.path(), e))?;
            files.push(SourceFile {
                path: relative.to_path_buf(),
                contents,
            });
        }
        debug!(root = %self.root.display(), count = files.len(), "read source directory");

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

/// A tree held in memory, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the tree.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl<P: Into<PathBuf>, C: Into<Vec<u8>>> FromIterator<(P, C)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}

impl SourceTree for MemorySource {
    fn files(&self) -> Result<Vec<SourceFile>> {
        Ok(self
            .files
            .iter()
            .map(|(path, contents)| SourceFile {
                path: path.clone(),
                contents: contents.clone(),
            })
            .collect())
    }
}
