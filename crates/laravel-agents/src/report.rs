//! Per-file outcomes and summary counts for a publish run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::{FileAction, PublishMode, ResourceKind};

/// Outcome for one file of the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path relative to the destination root.
    pub path: PathBuf,
    /// What the file represents.
    pub kind: ResourceKind,
    /// What happened to it.
    pub action: FileAction,
}

/// Aggregated counts for a publish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Files that were absent and have been written.
    pub created: usize,
    /// Files that existed and have been replaced.
    pub updated: usize,
    /// Files that existed and were left alone.
    pub skipped: usize,
    /// Agent files written (created or updated).
    pub agents: usize,
    /// Skill descriptors written (created or updated).
    pub skills: usize,
}

/// Full report of a publish run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Destination root the source was published under.
    pub destination: PathBuf,
    /// Mode the run used.
    pub mode: PublishMode,
    /// Whether the run only reported without writing.
    pub dry_run: bool,
    /// Outcome per source file, in source order.
    pub entries: Vec<FileEntry>,
    /// Counts over `entries`.
    pub summary: Summary,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>, mode: PublishMode, dry_run: bool) -> Self {
        Self {
            destination: destination.into(),
            mode,
            dry_run,
            entries: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Records the outcome for one file.
    pub fn record(&mut self, path: impl Into<PathBuf>, action: FileAction) {
        let path = path.into();
        let kind = ResourceKind::classify(&path);

        match action {
            FileAction::Created => self.summary.created += 1,
            FileAction::Updated => self.summary.updated += 1,
            FileAction::Skipped => self.summary.skipped += 1,
        }
        if action.writes() {
            match kind {
                ResourceKind::Agent => self.summary.agents += 1,
                ResourceKind::Skill => self.summary.skills += 1,
                ResourceKind::Other => {}
            }
        }

        self.entries.push(FileEntry { path, kind, action });
    }

    /// Number of files created.
    pub fn created(&self) -> usize {
        self.summary.created
    }

    /// Number of files updated.
    pub fn updated(&self) -> usize {
        self.summary.updated
    }

    /// Number of files skipped.
    pub fn skipped(&self) -> usize {
        self.summary.skipped
    }

    /// Number of agent files written.
    pub fn agents_published(&self) -> usize {
        self.summary.agents
    }

    /// Number of skill descriptors written.
    pub fn skills_published(&self) -> usize {
        self.summary.skills
    }

    /// Whether the source tree was empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries with the given action.
    pub fn entries_with(&self, action: FileAction) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(move |e| e.action == action)
    }

    /// One-line summary suitable for terminal output.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let s = &self.summary;
        let verb = if self.dry_run {
            "dry run: would publish"
        } else {
            "Published"
        };
        format!(
            "{verb} {} and {} ({} created, {} updated, {} skipped)",
            plural(s.agents, "agent"),
            plural(s.skills, "skill"),
            s.created,
            s.updated,
            s.skipped,
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{:<8} {}", entry.action, entry.path.display())?;
        }
        write!(f, "{}", self.summary_line())
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut report = Report::new("/app/.claude", PublishMode::Merge, false);
        report.record("agents/a.md", FileAction::Created);
        report.record("agents/b.md", FileAction::Skipped);
        report.record("skills/c/SKILL.md", FileAction::Updated);
        report.record("skills/c/reference.md", FileAction::Created);
        report
    }

    #[test]
    fn counts_actions_and_kinds() {
        let report = sample();
        assert_eq!(report.created(), 2);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.agents_published(), 1);
        assert_eq!(report.skills_published(), 1);
        assert_eq!(report.entries_with(FileAction::Created).count(), 2);
    }

    #[test]
    fn display_lists_files_then_summary() {
        let text = sample().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "created  agents/a.md");
        assert_eq!(lines[1], "skipped  agents/b.md");
        assert_eq!(lines[2], "updated  skills/c/SKILL.md");
        assert_eq!(
            lines[4],
            "Published 1 agent and 1 skill (2 created, 1 updated, 1 skipped)"
        );
    }

    #[test]
    fn dry_run_summary_is_prefixed() {
        let mut report = Report::new("/app/.claude", PublishMode::Force, true);
        report.record("agents/a.md", FileAction::Created);
        report.record("agents/b.md", FileAction::Created);
        assert_eq!(
            report.summary_line(),
            "dry run: would publish 2 agents and 0 skills (2 created, 0 updated, 0 skipped)"
        );
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["mode"], "merge");
        assert_eq!(json["summary"]["created"], 2);
        assert_eq!(json["entries"][0]["kind"], "agent");
        assert_eq!(json["entries"][0]["action"], "created");
    }
}
