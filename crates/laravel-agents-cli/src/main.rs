use std::io::Write;
use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Args, Parser, Subcommand},
    laravel_agents::{
        BundleItem, DirSource, OsFileSystem, PublishMode, PublishOptions, ResourceKind, Scope,
        SourceTree, bundled, destination_root, inventory, publish,
    },
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "laravel-agents",
    version,
    about = "Publish Laravel agents and skills for Claude Code"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the bundled agents and skills into a project.
    Publish(PublishArgs),
    /// List the bundled agents and skills.
    List(ListArgs),
}

#[derive(Args)]
struct PublishArgs {
    /// Overwrite files that already exist at the destination.
    #[arg(long, conflicts_with = "strict")]
    force: bool,
    /// Refuse to run if the destination directory already exists.
    #[arg(long)]
    strict: bool,
    /// Show what would be published without writing anything.
    #[arg(long)]
    dry_run: bool,
    /// Publish into the user-level Claude Code directory (~/.claude).
    #[arg(long, conflicts_with = "target")]
    global: bool,
    /// Project root to publish into (defaults to the current directory).
    ///
    /// Ignored when `--global` or `--target` is given.
    #[arg(long, env = "LARAVEL_AGENTS_PROJECT_DIR")]
    project: Option<PathBuf>,
    /// Exact destination directory, used as given.
    #[arg(long)]
    target: Option<PathBuf>,
    /// Publish from this directory instead of the bundled content.
    #[arg(long, env = "LARAVEL_AGENTS_SOURCE")]
    source: Option<PathBuf>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

impl PublishArgs {
    fn mode(&self) -> PublishMode {
        if self.force {
            PublishMode::Force
        } else if self.strict {
            PublishMode::Strict
        } else {
            PublishMode::Merge
        }
    }

    fn scope(&self) -> anyhow::Result<Scope> {
        if self.global {
            return Ok(Scope::Global);
        }
        if let Some(target) = &self.target {
            return Ok(Scope::Custom(target.clone()));
        }
        let project = match &self.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("failed to determine current directory")?,
        };
        Ok(Scope::Project(project))
    }
}

#[derive(Args)]
struct ListArgs {
    /// List this directory instead of the bundled content.
    #[arg(long, env = "LARAVEL_AGENTS_SOURCE")]
    source: Option<PathBuf>,
    /// Print the listing as JSON.
    #[arg(long)]
    json: bool,
}

fn source_tree(dir: Option<&PathBuf>) -> Box<dyn SourceTree> {
    match dir {
        Some(dir) => {
            debug!(source = %dir.display(), "using source directory");
            Box::new(DirSource::new(dir))
        }
        None => Box::new(bundled()),
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn run_publish(args: &PublishArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let scope = args.scope()?;
    let root = destination_root(&scope).context("failed to resolve destination directory")?;
    let source = source_tree(args.source.as_ref());
    let options = PublishOptions::new(args.mode()).dry_run(args.dry_run);

    let report = publish(source.as_ref(), &OsFileSystem, &root, options)
        .with_context(|| format!("failed to publish to {}", root.display()))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{report}")?;
    if options.mode == PublishMode::Merge {
        writeln!(out, "Use --force to overwrite existing files.")?;
    }
    Ok(())
}

fn run_list(args: &ListArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let source = source_tree(args.source.as_ref());
    let items = inventory(source.as_ref()).context("failed to read agents and skills")?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &items)?;
        writeln!(out)?;
        return Ok(());
    }

    write_section(out, "Agents", &items, ResourceKind::Agent)?;
    writeln!(out)?;
    write_section(out, "Skills", &items, ResourceKind::Skill)?;
    Ok(())
}

fn write_section(
    out: &mut impl Write,
    title: &str,
    items: &[BundleItem],
    kind: ResourceKind,
) -> std::io::Result<()> {
    let items: Vec<_> = items.iter().filter(|i| i.kind == kind).collect();
    writeln!(out, "{title} ({}):", items.len())?;
    for item in items {
        match &item.description {
            Some(description) => writeln!(out, "  {:<28} {description}", item.name)?,
            None => writeln!(out, "  {}", item.name)?,
        }
        for issue in &item.issues {
            writeln!(out, "    warning: {issue}")?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Publish(args) => run_publish(args, &mut stdout),
        Commands::List(args) => run_list(args, &mut stdout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(key: &str, value: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let original = std::env::var_os(key);
        // SAFETY: ENV_LOCK serialises env access in these tests
        unsafe { std::env::set_var(key, value) };
        let result = f();
        match original {
            Some(v) => unsafe { std::env::set_var(key, v) },
            None => unsafe { std::env::remove_var(key) },
        }
        result
    }

    fn publish_args(argv: &[&str]) -> PublishArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Publish(args) => args,
            Commands::List(_) => panic!("expected publish"),
        }
    }

    fn write_source(root: &Path) {
        std::fs::create_dir_all(root.join("agents")).unwrap();
        std::fs::create_dir_all(root.join("skills/b")).unwrap();
        std::fs::write(root.join("agents/a.md"), "A").unwrap();
        std::fs::write(root.join("skills/b/SKILL.md"), "B").unwrap();
    }

    fn run(argv: &[&str]) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_publish(&publish_args(argv), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn publish_flags_select_mode() {
        assert_eq!(publish_args(&["laravel-agents", "publish"]).mode(), PublishMode::Merge);
        assert_eq!(
            publish_args(&["laravel-agents", "publish", "--force"]).mode(),
            PublishMode::Force
        );
        assert_eq!(
            publish_args(&["laravel-agents", "publish", "--strict"]).mode(),
            PublishMode::Strict
        );
    }

    #[test]
    fn force_and_strict_conflict() {
        let result = Cli::try_parse_from(["laravel-agents", "publish", "--force", "--strict"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_conflicts_with_target() {
        let result =
            Cli::try_parse_from(["laravel-agents", "publish", "--global", "--target", "/tmp/x"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_and_target_take_precedence_over_project() {
        let args = publish_args(&[
            "laravel-agents",
            "publish",
            "--global",
            "--project",
            "/srv/app",
        ]);
        assert_eq!(args.scope().unwrap(), Scope::Global);

        let args = publish_args(&[
            "laravel-agents",
            "publish",
            "--target",
            "/out",
            "--project",
            "/srv/app",
        ]);
        assert_eq!(args.scope().unwrap(), Scope::Custom(PathBuf::from("/out")));
    }

    #[test]
    fn project_dir_falls_back_to_env() {
        let args = with_env("LARAVEL_AGENTS_PROJECT_DIR", Path::new("/srv/envproj"), || {
            publish_args(&["laravel-agents", "publish"])
        });
        assert_eq!(args.scope().unwrap(), Scope::Project(PathBuf::from("/srv/envproj")));
    }

    #[test]
    fn project_flag_overrides_env() {
        let args = with_env("LARAVEL_AGENTS_PROJECT_DIR", Path::new("/srv/envproj"), || {
            publish_args(&["laravel-agents", "publish", "--project", "/srv/app"])
        });
        assert_eq!(args.scope().unwrap(), Scope::Project(PathBuf::from("/srv/app")));
    }

    #[test]
    fn global_is_accepted_with_project_env_set() {
        let args = with_env("LARAVEL_AGENTS_PROJECT_DIR", Path::new("/srv/envproj"), || {
            publish_args(&["laravel-agents", "publish", "--global"])
        });
        assert_eq!(args.scope().unwrap(), Scope::Global);
    }

    #[test]
    fn project_scope_targets_dot_claude() {
        let args = publish_args(&["laravel-agents", "publish", "--project", "/srv/app"]);
        assert_eq!(args.scope().unwrap(), Scope::Project(PathBuf::from("/srv/app")));
    }

    #[test]
    fn merge_prints_files_summary_and_hint() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dest = tmp.path().join("dest");
        write_source(&src);
        std::fs::create_dir_all(dest.join("agents")).unwrap();
        std::fs::write(dest.join("agents/a.md"), "CUSTOM").unwrap();

        let output = run(&[
            "laravel-agents",
            "publish",
            "--source",
            src.to_str().unwrap(),
            "--target",
            dest.to_str().unwrap(),
        ])
        .unwrap();

        assert!(output.contains("skipped  agents/a.md"));
        assert!(output.contains("created  skills/b/SKILL.md"));
        assert!(output.contains("Published 0 agents and 1 skill (1 created, 0 updated, 1 skipped)"));
        assert!(output.ends_with("Use --force to overwrite existing files.\n"));
        assert_eq!(std::fs::read_to_string(dest.join("agents/a.md")).unwrap(), "CUSTOM");
    }

    #[test]
    fn force_prints_updated_without_hint() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dest = tmp.path().join("dest");
        write_source(&src);
        std::fs::create_dir_all(dest.join("agents")).unwrap();
        std::fs::write(dest.join("agents/a.md"), "CUSTOM").unwrap();

        let output = run(&[
            "laravel-agents",
            "publish",
            "--force",
            "--source",
            src.to_str().unwrap(),
            "--target",
            dest.to_str().unwrap(),
        ])
        .unwrap();

        assert!(output.contains("updated  agents/a.md"));
        assert!(!output.contains("--force"));
        assert_eq!(std::fs::read_to_string(dest.join("agents/a.md")).unwrap(), "A");
    }

    #[test]
    fn strict_fails_when_destination_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        write_source(&src);

        let err = run(&[
            "laravel-agents",
            "publish",
            "--strict",
            "--source",
            src.to_str().unwrap(),
            "--target",
            tmp.path().to_str().unwrap(),
        ])
        .unwrap_err();

        assert!(format!("{err:#}").contains("use --force to overwrite"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run(&[
            "laravel-agents",
            "publish",
            "--source",
            tmp.path().join("missing").to_str().unwrap(),
            "--target",
            tmp.path().join("dest").to_str().unwrap(),
        ])
        .unwrap_err();

        assert!(format!("{err:#}").contains("source directory not found"));
    }

    #[test]
    fn json_report_is_parseable() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dest = tmp.path().join("dest");
        write_source(&src);

        let output = run(&[
            "laravel-agents",
            "publish",
            "--json",
            "--source",
            src.to_str().unwrap(),
            "--target",
            dest.to_str().unwrap(),
        ])
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["mode"], "merge");
        assert_eq!(json["summary"]["agents"], 1);
        assert_eq!(json["summary"]["skills"], 1);
        assert_eq!(json["entries"][0]["path"], "agents/a.md");
        assert_eq!(std::fs::read_to_string(dest.join("agents/a.md")).unwrap(), "A");
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dest = tmp.path().join("dest");
        write_source(&src);

        let output = run(&[
            "laravel-agents",
            "publish",
            "--dry-run",
            "--source",
            src.to_str().unwrap(),
            "--target",
            dest.to_str().unwrap(),
        ])
        .unwrap();

        assert!(output.contains("created  agents/a.md"));
        assert!(output.contains("created  skills/b/SKILL.md"));
        assert!(output.contains("dry run: would publish 1 agent and 1 skill"));
        assert!(!dest.exists());
    }

    #[test]
    fn global_publishes_into_claude_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let config = tmp.path().join("claude-home");
        write_source(&src);

        let output = with_env("CLAUDE_CONFIG_DIR", &config, || {
            run(&["laravel-agents", "publish", "--global", "--source", src.to_str().unwrap()])
        })
        .unwrap();

        assert!(output.contains("created  agents/a.md"));
        assert_eq!(std::fs::read_to_string(config.join("agents/a.md")).unwrap(), "A");
        assert_eq!(std::fs::read_to_string(config.join("skills/b/SKILL.md")).unwrap(), "B");
    }

    #[test]
    fn list_shows_bundled_sections() {
        let mut out = Vec::new();
        run_list(
            &ListArgs {
                source: None,
                json: false,
            },
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Agents ("));
        assert!(text.contains("Skills ("));
        assert!(text.contains("laravel-architect"));
        assert!(!text.contains("warning:"));
    }
}
