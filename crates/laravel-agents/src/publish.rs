//! Publishing a source tree into a destination root.
//!
//! Every file of the source lands at the same relative path under the
//! destination root. Files already present are kept or replaced depending
//! on the [`PublishMode`]; files that exist only at the destination are
//! never touched. Runs are not transactional: an I/O failure stops the
//! walk and leaves whatever was already written in place.

use std::path::{Component, Path};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::report::Report;
use crate::source::SourceTree;
use crate::types::{FileAction, PublishMode};

/// Options controlling a publish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// How existing destination content is reconciled.
    pub mode: PublishMode,
    /// Decide and report without creating or writing anything.
    pub dry_run: bool,
}

impl PublishOptions {
    /// Creates options for a real run in the given mode.
    #[must_use]
    pub const fn new(mode: PublishMode) -> Self {
        Self {
            mode,
            dry_run: false,
        }
    }

    /// Sets whether the run only reports without writing.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Whether a source file should be written to its destination path.
///
/// # Examples
///
/// ```
/// use laravel_agents::should_write;
///
/// assert!(should_write(false, false));
/// assert!(should_write(true, true));
/// assert!(!should_write(true, false));
/// ```
#[must_use]
pub const fn should_write(exists_at_dest: bool, overwrite: bool) -> bool {
    !exists_at_dest || overwrite
}

/// The action taken for a file given its destination state.
#[must_use]
pub const fn file_action(exists_at_dest: bool, overwrite: bool) -> FileAction {
    match (exists_at_dest, should_write(exists_at_dest, overwrite)) {
        (false, _) => FileAction::Created,
        (true, true) => FileAction::Updated,
        (true, false) => FileAction::Skipped,
    }
}

/// Publishes `source` under `destination_root`.
///
/// # Errors
///
/// Returns [`Error::SourceNotFound`] if the source tree is missing,
/// [`Error::DestinationExists`] in [`PublishMode::Strict`] when the
/// destination root already exists, [`Error::InvalidPath`] if a source
/// path would escape the destination root, and [`Error::Io`] if a
/// directory or file cannot be written.
pub fn publish<S, F>(
    source: &S,
    fs: &F,
    destination_root: &Path,
    options: PublishOptions,
) -> Result<Report>
where
    S: SourceTree + ?Sized,
    F: FileSystem + ?Sized,
{
    let files = source.files()?;
    for file in &files {
        ensure_relative(&file.path)?;
    }

    let root_exists = entry_exists(fs, destination_root)?;
    if root_exists && options.mode == PublishMode::Strict {
        return Err(Error::DestinationExists(destination_root.to_path_buf()));
    }

    info!(
        destination = %destination_root.display(),
        mode = %options.mode,
        dry_run = options.dry_run,
        files = files.len(),
        "publishing"
    );

    if !root_exists && !options.dry_run {
        fs.create_dir_all(destination_root)
            .map_err(|e| Error::io("create directory", destination_root, e))?;
    }

    let overwrite = options.mode.overwrites();
    let mut report = Report::new(destination_root, options.mode, options.dry_run);

    for file in files {
        let target = destination_root.join(&file.path);
        let exists = root_exists && entry_exists(fs, &target)?;
        let action = file_action(exists, overwrite);

        if action.writes() && !options.dry_run {
            if let Some(parent) = target.parent()
                && !entry_exists(fs, parent)?
            {
                fs.create_dir_all(parent)
                    .map_err(|e| Error::io("create directory", parent, e))?;
            }
            fs.write(&target, &file.contents)
                .map_err(|e| Error::io("write", &target, e))?;
        }

        debug!(path = %file.path.display(), %action, "published file");
        report.record(file.path, action);
    }

    Ok(report)
}

fn entry_exists<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<bool> {
    fs.exists(path).map_err(|e| Error::io("inspect", path, e))
}

fn ensure_relative(path: &Path) -> Result<()> {
    let escapes = path.as_os_str().is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }
    Ok(())
}
