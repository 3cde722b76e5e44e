//! Destination root resolution.
//!
//! Claude Code reads agents and skills from:
//! - **Global**: `$CLAUDE_CONFIG_DIR` or `~/.claude/`
//! - **Project**: `.claude/` in project root

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Scope;

/// Environment variable for Claude Code config directory override.
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Directory name Claude Code uses inside a project.
pub const PROJECT_DIR_NAME: &str = ".claude";

/// Returns the user's home directory.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the home directory cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or_else(|| Error::NotFound("home directory".into()))
}

/// Returns the global Claude Code configuration directory.
///
/// Checks `CLAUDE_CONFIG_DIR` first (absolute paths only), then falls back
/// to `~/.claude/`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// no environment variable is set.
pub fn global_config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CLAUDE_CONFIG_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.is_absolute() {
            return Ok(path);
        }
    }

    Ok(home_dir()?.join(PROJECT_DIR_NAME))
}

/// Returns the project-local Claude Code directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR_NAME)
}

/// Resolves the destination root for the given scope.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for [`Scope::Global`] when no home
/// directory is available.
pub fn destination_root(scope: &Scope) -> Result<PathBuf> {
    match scope {
        Scope::Global => global_config_dir(),
        Scope::Project(root) => Ok(project_config_dir(root)),
        Scope::Custom(dir) => Ok(dir.clone()),
    }
}
