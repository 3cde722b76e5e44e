//! Destination filesystem abstraction.
//!
//! The publisher only needs four operations on the destination, so they
//! are expressed as a small trait. [`OsFileSystem`] delegates to `std::fs`;
//! [`MemoryFileSystem`] keeps everything in memory for tests and previews.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations used when writing a destination tree.
pub trait FileSystem {
    /// Returns `true` if any entry exists at `path`.
    ///
    /// Symlinks count as present even when their target is missing.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Creates `path` and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Writes `contents` to `path`, replacing any existing file.
    ///
    /// The parent directory must already exist. A symlink at `path` is
    /// replaced by a regular file, never written through.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Reads the full contents of the file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match std::fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink()) {
            std::fs::remove_file(path)?;
        }
        std::fs::write(path, contents)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// An in-memory filesystem.
///
/// Mirrors the parts of real filesystem behaviour the publisher depends
/// on: writing a file requires its parent directory, and a path cannot be
/// both a file and a directory.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    dirs: RefCell<BTreeSet<PathBuf>>,
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, creating its parent directories.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.insert_dirs(parent);
        }
        self.files.borrow_mut().insert(path, contents.into());
        self
    }

    /// Adds an empty directory and its parents.
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert_dirs(path.as_ref());
        self
    }

    /// Returns a snapshot of all files.
    #[must_use]
    pub fn files(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        self.files.borrow().clone()
    }

    /// Returns `true` if `path` is a known directory.
    #[must_use]
    pub fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn insert_dirs(&self, path: &Path) {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            None => true,
            Some(parent) if parent.as_os_str().is_empty() => true,
            Some(parent) => self.dirs.borrow().contains(parent),
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if path
            .ancestors()
            .any(|a| self.files.borrow().contains_key(a))
        {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a file exists where a directory is required",
            ));
        }
        self.insert_dirs(path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if !self.parent_exists(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "parent directory does not exist",
            ));
        }
        if self.dirs.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "path is a directory",
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
    }
}
