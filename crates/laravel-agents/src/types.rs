//! Core type definitions for publishing.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory holding one markdown file per agent.
pub const AGENTS_DIR: &str = "agents";

/// Directory holding one subdirectory per skill.
pub const SKILLS_DIR: &str = "skills";

/// Descriptor file inside each skill directory.
pub const SKILL_FILE: &str = "SKILL.md";

/// Where the bundle is published to.
///
/// Determines whether files land in the user-level Claude Code
/// directory, a project's `.claude/` directory, or an explicit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// User-level configuration (e.g., `~/.claude/`)
    Global,
    /// Project-local configuration (`.claude/` in the project root)
    Project(PathBuf),
    /// Explicit destination root, used as given
    Custom(PathBuf),
}

/// What a bundled file represents.
///
/// Classification is purely path based: `agents/<name>.md` is an agent,
/// `skills/<name>/SKILL.md` is a skill descriptor, anything else is other
/// supporting content that is published but not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A single agent prompt file.
    Agent,
    /// A skill descriptor file.
    Skill,
    /// Any other file in the bundle.
    Other,
}

impl ResourceKind {
    /// Classifies a path relative to the bundle root.
    ///
    /// # Examples
    ///
    /// ```
    /// use laravel_agents::ResourceKind;
    ///
    /// assert_eq!(ResourceKind::classify("agents/eloquent-expert.md".as_ref()), ResourceKind::Agent);
    /// assert_eq!(ResourceKind::classify("skills/pest-testing/SKILL.md".as_ref()), ResourceKind::Skill);
    /// assert_eq!(ResourceKind::classify("skills/pest-testing/notes.md".as_ref()), ResourceKind::Other);
    /// ```
    #[must_use]
    pub fn classify(path: &Path) -> Self {
        let parts: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        match parts.as_slice() {
            [AGENTS_DIR, file] if file.ends_with(".md") => Self::Agent,
            [SKILLS_DIR, _, SKILL_FILE] => Self::Skill,
            _ => Self::Other,
        }
    }

    /// Returns the display name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Skill => "skill",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How existing destination content is reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Add missing files, leave existing files untouched.
    #[default]
    Merge,
    /// Add missing files and overwrite existing ones.
    Force,
    /// Refuse to run if the destination root already exists.
    Strict,
}

impl PublishMode {
    /// Whether files already present at the destination get replaced.
    #[must_use]
    pub const fn overwrites(self) -> bool {
        matches!(self, Self::Force)
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Force => write!(f, "force"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Outcome for a single published file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// The file was absent and has been written.
    Created,
    /// The file existed and has been replaced.
    Updated,
    /// The file existed and was left as is.
    Skipped,
}

impl FileAction {
    /// Returns `true` if the action writes content to the destination.
    #[must_use]
    pub const fn writes(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Skipped => "skipped",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_agents() {
        assert_eq!(
            ResourceKind::classify(Path::new("agents/laravel-architect.md")),
            ResourceKind::Agent
        );
    }

    #[test]
    fn nested_agent_paths_are_other() {
        assert_eq!(
            ResourceKind::classify(Path::new("agents/drafts/old.md")),
            ResourceKind::Other
        );
        assert_eq!(
            ResourceKind::classify(Path::new("agents/notes.txt")),
            ResourceKind::Other
        );
    }

    #[test]
    fn classifies_skill_descriptors_only() {
        assert_eq!(
            ResourceKind::classify(Path::new("skills/migrations/SKILL.md")),
            ResourceKind::Skill
        );
        assert_eq!(
            ResourceKind::classify(Path::new("skills/migrations/reference.md")),
            ResourceKind::Other
        );
        assert_eq!(
            ResourceKind::classify(Path::new("skills/SKILL.md")),
            ResourceKind::Other
        );
    }

    #[test]
    fn only_force_overwrites() {
        assert!(PublishMode::Force.overwrites());
        assert!(!PublishMode::Merge.overwrites());
        assert!(!PublishMode::Strict.overwrites());
    }

    #[test]
    fn default_mode_is_merge() {
        assert_eq!(PublishMode::default(), PublishMode::Merge);
    }

    #[test]
    fn file_action_display() {
        assert_eq!(FileAction::Created.to_string(), "created");
        assert_eq!(FileAction::Updated.to_string(), "updated");
        assert_eq!(FileAction::Skipped.to_string(), "skipped");
        assert!(!FileAction::Skipped.writes());
    }
}
