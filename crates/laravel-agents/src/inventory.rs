//! Bundle inventory: agents and skills with their frontmatter metadata.
//!
//! Prompt files start with an optional YAML frontmatter block fenced by
//! `---` lines. Only `name` and `description` are read here; the rest of
//! the document is opaque.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::SourceTree;
use crate::types::ResourceKind;

/// Pattern skill and agent names must follow.
pub const NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

/// Maximum name length accepted by Claude Code.
pub const NAME_MAX_LEN: usize = 64;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("NAME_PATTERN is a valid regex"));

/// Parsed frontmatter result.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
    /// Parsed YAML frontmatter, if present.
    pub yaml: Option<serde_yaml::Value>,
    /// The markdown body after the frontmatter.
    pub body: &'a str,
}

/// Splits a document into its YAML frontmatter and markdown body.
///
/// Accepts LF and CRLF line endings. A document without an opening fence,
/// or with an unterminated one, is returned as all body.
///
/// # Errors
///
/// Returns `Error::YamlParse` if the fenced block is not valid YAML.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter<'_>> {
    let no_frontmatter = Frontmatter {
        yaml: None,
        body: content,
    };
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok(no_frontmatter);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let value = if yaml.trim().is_empty() {
                serde_yaml::Value::Null
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok(Frontmatter {
                yaml: Some(value),
                body,
            });
        }
        offset += line.len();
    }

    Ok(no_frontmatter)
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    name: Option<String>,
    description: Option<String>,
}

/// An agent or skill found in a source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleItem {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path relative to the source root.
    pub path: PathBuf,
    /// Problems that would keep Claude Code from loading the item cleanly.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// Lists the agents and skills in a source tree.
///
/// Supporting files (anything not classified as an agent or a skill
/// descriptor) are left out. Frontmatter problems are recorded on the
/// item rather than failing the listing.
///
/// # Errors
///
/// Returns an error only if the source tree cannot be read.
pub fn inventory<S: SourceTree + ?Sized>(source: &S) -> Result<Vec<BundleItem>> {
    let mut items = Vec::new();
    for file in source.files()? {
        let kind = ResourceKind::classify(&file.path);
        if kind == ResourceKind::Other {
            continue;
        }
        let content = String::from_utf8_lossy(&file.contents);
        items.push(describe(kind, &file.path, &content));
    }
    Ok(items)
}

fn describe(kind: ResourceKind, path: &Path, content: &str) -> BundleItem {
    let mut issues = Vec::new();

    let metadata = match parse_frontmatter(content) {
        Ok(Frontmatter {
            yaml: Some(yaml @ serde_yaml::Value::Mapping(_)),
            ..
        }) => serde_yaml::from_value(yaml).unwrap_or_else(|e| {
            issues.push(format!("invalid frontmatter: {e}"));
            Metadata::default()
        }),
        Ok(Frontmatter { yaml: Some(_), .. }) => Metadata::default(),
        Ok(Frontmatter { yaml: None, .. }) => {
            issues.push("missing frontmatter".to_string());
            Metadata::default()
        }
        Err(e) => {
            issues.push(format!("invalid frontmatter: {e}"));
            Metadata::default()
        }
    };

    let fallback = fallback_name(kind, path);
    let name = match metadata.name {
        Some(name) => name,
        None => {
            issues.push("missing name".to_string());
            fallback.clone()
        }
    };
    if metadata.description.is_none() {
        issues.push("missing description".to_string());
    }

    issues.extend(name_issues(&name));
    if kind == ResourceKind::Skill && name != fallback {
        issues.push(format!("name '{name}' does not match directory '{fallback}'"));
    }

    BundleItem {
        kind,
        name,
        description: metadata.description,
        path: path.to_path_buf(),
        issues,
    }
}

/// Checks a name against the naming rules.
#[must_use]
pub fn name_issues(name: &str) -> Vec<String> {
    let mut issues = Vec::new();
    if name.len() > NAME_MAX_LEN {
        issues.push(format!(
            "name is {} characters (max {NAME_MAX_LEN})",
            name.len()
        ));
    }
    if !NAME_RE.is_match(name) {
        issues.push(format!(
            "name '{name}' must be lowercase letters, digits and single hyphens"
        ));
    }
    issues
}

fn fallback_name(kind: ResourceKind, path: &Path) -> String {
    let source = match kind {
        ResourceKind::Skill => path.parent().and_then(Path::file_name),
        _ => path.file_stem(),
    };
    source
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
