use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use glint_vm::config::{BuildInfo, DEFAULT_KEEP_VERSIONS, DEFAULT_REMOTE_LIMIT, TOOL_NAME};
use glint_vm::detector::{DetectionResult, VersionResolver};
use glint_vm::detector::version_file::VERSION_FILE_NAME;
use glint_vm::logging;
use glint_vm::version::activation::Activation;
use glint_vm::version::cache::{CacheStore, RemovalReport};
use glint_vm::version::error::CacheError;
use glint_vm::version::installer::{InstallOutcome, Installer};
use glint_vm::version::layout::CacheLayout;
use glint_vm::version::registries::GitHubReleases;
use glint_vm::version::registry::{ReleaseIndex, latest_stable};
use glint_vm::version::semver::{normalize_version, validate_version};

const MEGABYTE: f64 = 1024.0 * 1024.0;

#[derive(Parser)]
#[command(name = "glint-vm")]
#[command(version = BuildInfo::current().version, about = "golangci-lint version manager")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the golangci-lint version a project declares
    Detect(DetectArgs),
    /// Install a version into the cache
    Install {
        /// Version to install, or `latest`
        version: String,
        /// Activate the version after installing it
        #[arg(long = "use")]
        activate: bool,
    },
    /// Install a version if needed and make it the active one
    Use { version: String },
    /// Show the active version
    Current,
    /// List installed versions
    List,
    /// List stable releases published on GitHub
    ListRemote {
        #[arg(long, default_value_t = DEFAULT_REMOTE_LIMIT)]
        limit: u32,
    },
    /// Remove an installed version
    Uninstall { version: String },
    /// Inspect or prune the version cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Print build information
    Version,
}

#[derive(Args)]
struct DetectArgs {
    /// Print only the version; exit 1 when nothing is found
    #[arg(short, long)]
    quiet: bool,
    /// Install the detected version
    #[arg(long)]
    install: bool,
    /// Install and activate the detected version
    #[arg(long = "use")]
    activate: bool,
    /// Show every source that declares a version
    #[arg(long)]
    all: bool,
    /// Project directory to scan instead of the working directory
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show cached versions and their sizes
    List,
    /// Remove cached versions
    Clean {
        /// Remove every cached version
        #[arg(long, conflicts_with_all = ["keep", "incomplete"])]
        all: bool,
        /// Number of newest versions to keep
        #[arg(long, default_value_t = DEFAULT_KEEP_VERSIONS, allow_negative_numbers = true)]
        keep: i64,
        /// Remove only versions whose binary is missing or not executable
        #[arg(long)]
        incomplete: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let layout = CacheLayout::from_env().context("Failed to resolve cache directory")?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, layout))
}

async fn run(command: Command, layout: CacheLayout) -> anyhow::Result<()> {
    match command {
        Command::Detect(args) => detect(args, layout).await,
        Command::Install { version, activate } => {
            let version = resolve_requested_version(&version).await?;
            install(&version, &layout).await?;
            if activate {
                activate_version(&version, &layout)?;
            } else {
                println!();
                println!("To activate this version, run:");
                println!("  glint-vm use {}", version);
            }
            Ok(())
        }
        Command::Use { version } => {
            let version = parse_version_arg(&version)?;
            install(&version, &layout).await?;
            activate_version(&version, &layout)
        }
        Command::Current => current(&layout),
        Command::List => list(&layout),
        Command::ListRemote { limit } => list_remote(limit, &layout).await,
        Command::Uninstall { version } => uninstall(&version, &layout),
        Command::Cache { action } => match action {
            CacheAction::List => cache_list(&layout),
            CacheAction::Clean {
                all,
                keep,
                incomplete,
            } => cache_clean(all, keep, incomplete, &layout),
        },
        Command::Version => {
            println!("glint-vm {}", BuildInfo::current());
            Ok(())
        }
    }
}

fn parse_version_arg(raw: &str) -> anyhow::Result<String> {
    let version = normalize_version(raw.trim());
    if !validate_version(&version) {
        bail!("Invalid version '{}': expected vMAJOR.MINOR.PATCH", raw);
    }
    Ok(version)
}

async fn resolve_requested_version(raw: &str) -> anyhow::Result<String> {
    if !raw.eq_ignore_ascii_case("latest") {
        return parse_version_arg(raw);
    }

    let index = GitHubReleases::golangci_lint()?;
    match latest_stable(&index).await? {
        Some(version) => {
            println!("Latest stable release: {}", version);
            Ok(version)
        }
        None => bail!("No stable {} release found", TOOL_NAME),
    }
}

async fn install(version: &str, layout: &CacheLayout) -> anyhow::Result<()> {
    let installer = Installer::new(CacheStore::new(layout.clone()))?;
    let outcome = installer
        .install(version)
        .await
        .with_context(|| format!("Failed to install {} {}", TOOL_NAME, version))?;

    match outcome {
        InstallOutcome::AlreadyInstalled => {
            println!("✓ {} {} is already installed", TOOL_NAME, version)
        }
        InstallOutcome::Installed { checksum_verified } => {
            println!("✓ Installed {} {}", TOOL_NAME, version);
            if !checksum_verified {
                println!("⚠ No checksum was published; the download was not verified");
            }
        }
    }
    Ok(())
}

fn activate_version(version: &str, layout: &CacheLayout) -> anyhow::Result<()> {
    Activation::new(layout.clone())
        .set_current(version)
        .with_context(|| format!("Failed to activate {}", version))?;

    println!("✓ Now using {} {}", TOOL_NAME, version);
    println!("  Binary: {}", layout.pointer_path().display());
    println!();
    println!("Make sure {} is on your PATH.", layout.current_dir().display());
    Ok(())
}

async fn detect(args: DetectArgs, layout: CacheLayout) -> anyhow::Result<()> {
    let resolver = match &args.dir {
        Some(dir) => VersionResolver::new(dir.clone()),
        None => VersionResolver::current_dir(),
    }
    .context("Failed to open project directory")?;

    if args.all {
        let results = resolver.detect_all();
        if results.is_empty() {
            return report_nothing_detected(args.quiet);
        }
        for result in &results {
            print_detection(result);
            println!();
        }
        return Ok(());
    }

    let Some(result) = resolver.detect_first() else {
        return report_nothing_detected(args.quiet);
    };

    if args.activate {
        install(&result.version, &layout).await?;
        return activate_version(&result.version, &layout);
    }

    if args.install {
        install(&result.version, &layout).await?;
        println!();
        println!("To activate this version, run:");
        println!("  glint-vm use {}", result.version);
        return Ok(());
    }

    if args.quiet {
        println!("{}", result.version);
        return Ok(());
    }

    println!("Cache directory: {}", layout.root().display());
    println!("Platform: {}", layout.platform().as_string());
    println!();
    print_detection(&result);
    println!();

    let store = CacheStore::new(layout.clone());
    if store.is_cached(&result.version) {
        println!(
            "✓ Binary cached at: {}",
            layout.artifact_path(&result.version).display()
        );
    } else {
        println!(
            "⚠ Binary not cached. Run 'glint-vm install {}' to download it.",
            result.version
        );
    }
    Ok(())
}

fn print_detection(result: &DetectionResult) {
    println!("✓ Detected version: {}", result.version);
    println!("  Source: {}", result.source.display());
    println!("  Source type: {}", result.source_type);
    if result.line_number > 0 {
        println!("  Line: {}", result.line_number);
    }
    println!("  Pattern: {}", result.pattern_name);
}

fn report_nothing_detected(quiet: bool) -> anyhow::Result<()> {
    if quiet {
        std::process::exit(1);
    }

    println!("No {} version detected in this project", TOOL_NAME);
    println!("Searched in:");
    println!("  • {} file", VERSION_FILE_NAME);
    println!("  • GitHub Actions workflows (.github/workflows/*.yml)");
    println!("  • Semaphore CI (.semaphore/semaphore.yml)");
    println!("  • CircleCI (.circleci/config.yml)");
    println!("  • GitLab CI (.gitlab-ci.yml)");
    println!("  • Makefile");
    println!();
    println!("Create a {} file with your desired version:", VERSION_FILE_NAME);
    println!("  echo \"v1.55.2\" > {}", VERSION_FILE_NAME);
    Ok(())
}

fn current(layout: &CacheLayout) -> anyhow::Result<()> {
    match Activation::new(layout.clone()).current()? {
        Some(version) => {
            println!("Current version: {}", version);
            println!("Binary path: {}", layout.artifact_path(&version).display());
        }
        None => {
            println!("No version currently active.");
            println!();
            println!("Activate a version with:");
            println!("  glint-vm use v1.55.2");
        }
    }
    Ok(())
}

fn active_version(layout: &CacheLayout) -> Option<String> {
    Activation::new(layout.clone())
        .current()
        .unwrap_or_else(|e| {
            warn!("Could not read current version: {}", e);
            None
        })
}

fn list(layout: &CacheLayout) -> anyhow::Result<()> {
    let versions = CacheStore::new(layout.clone()).list()?;
    if versions.is_empty() {
        println!("No versions installed.");
        println!();
        println!("Install a version with:");
        println!("  glint-vm install v1.55.2");
        return Ok(());
    }

    let current = active_version(layout);

    println!("Installed versions:");
    for cached in &versions {
        let marker = if current.as_deref() == Some(cached.version.as_str()) {
            "*"
        } else {
            " "
        };
        let status = if cached.is_complete { "" } else { " (incomplete)" };
        println!("{} {}{}", marker, cached.version, status);
    }

    if let Some(current) = current {
        println!();
        println!("* = current version ({})", current);
    }
    Ok(())
}

async fn list_remote(limit: u32, layout: &CacheLayout) -> anyhow::Result<()> {
    println!("Fetching available {} versions from GitHub...", TOOL_NAME);
    println!();

    let index = GitHubReleases::golangci_lint()?;
    let releases = index
        .fetch_releases(limit)
        .await
        .context("Failed to fetch releases")?;

    if releases.is_empty() {
        println!("No stable releases found.");
        return Ok(());
    }

    let store = CacheStore::new(layout.clone());
    let current = active_version(layout);

    println!("Available versions ({} latest stable releases):", releases.len());
    for release in &releases {
        let (marker, status) = if current.as_deref() == Some(release.tag_name.as_str()) {
            ("*", " (current)")
        } else if store.is_cached(&release.tag_name) {
            (" ", " (installed)")
        } else {
            (" ", "")
        };
        let published = release
            .published_at
            .map(|at| format!("  {}", at.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("{} {}{}{}", marker, release.tag_name, status, published);
    }
    Ok(())
}

fn uninstall(raw: &str, layout: &CacheLayout) -> anyhow::Result<()> {
    let version = parse_version_arg(raw)?;
    let store = CacheStore::new(layout.clone());
    let activation = Activation::new(layout.clone());

    if !layout.version_dir(&version).exists() {
        return Err(CacheError::NotInstalled(version).into());
    }

    if active_version(layout).as_deref() == Some(version.as_str()) {
        warn!("{} is the active version; clearing the current pointer", version);
        activation.clear()?;
    }

    store.remove(&version)?;
    println!("✓ Removed version {}", version);
    Ok(())
}

fn cache_list(layout: &CacheLayout) -> anyhow::Result<()> {
    let store = CacheStore::new(layout.clone());
    let versions = store.list()?;

    println!("Cache directory: {}", layout.versions_dir().display());
    if versions.is_empty() {
        println!("No cached versions found.");
        return Ok(());
    }

    let total = store.total_size()?;
    println!(
        "Cached versions ({} total, {:.2} MB):",
        versions.len(),
        total as f64 / MEGABYTE
    );
    for cached in &versions {
        let (status, extra) = if cached.is_complete {
            ("✓", "")
        } else {
            ("✗", " (incomplete)")
        };
        let size = if cached.size > 0 {
            format!(" [{:.2} MB]", cached.size as f64 / MEGABYTE)
        } else {
            String::new()
        };
        println!("  {} {}{}{}", status, cached.version, size, extra);
    }
    Ok(())
}

fn cache_clean(all: bool, keep: i64, incomplete: bool, layout: &CacheLayout) -> anyhow::Result<()> {
    let store = CacheStore::new(layout.clone());
    let current = active_version(layout);

    let report = if all {
        println!("Removing all cached versions...");
        store.remove_all()?
    } else if incomplete {
        println!("Removing incomplete versions...");
        store.remove_incomplete()?
    } else {
        println!("Removing old versions (keeping {} most recent)...", keep);
        store.remove_oldest(keep)?
    };

    if let Some(current) = current
        && !layout.version_dir(&current).exists()
    {
        Activation::new(layout.clone()).clear()?;
        println!("Cleared current pointer ({} was removed)", current);
    }

    print_removal_report(&report);
    Ok(())
}

fn print_removal_report(report: &RemovalReport) {
    for (version, error) in &report.failures {
        println!("Warning: could not remove {}: {}", version, error);
    }

    if report.removed == 0 {
        println!("No versions to remove.");
    } else {
        println!();
        println!("✓ Removed {} version(s).", report.removed);
    }
}
