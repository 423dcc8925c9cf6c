mod output;
mod root;

use anyhow::Context;
use clap::Parser;
use rewind_core::batch::{BatchDriver, BatchStatus};
use rewind_core::config::RewindConfig;
use rewind_core::git::GitCli;
use rewind_core::restore::RestoreOptions;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "rewind",
    about = "Reset each git repository in a directory to its last commit before a deadline",
    long_about = "Reset each git repository in a directory to its last commit before a deadline.\n\n\
        The deadline is the given date at 23:59 in America/Chicago (configurable), plus a\n\
        grace period. Every immediate subdirectory holding a .git directory is reset to\n\
        the newest commit strictly before that instant.\n\n\
        Examples:\n  rewind --dir ./ics365 --date 09/10/2025\n  rewind --dir ./ics365 --date 2025-09-10 --dry-run",
    version
)]
struct Cli {
    /// Directory containing git repositories (one per subdirectory)
    #[arg(long, env = "REWIND_DIR")]
    dir: PathBuf,

    /// Deadline date: MM/DD/YYYY or YYYY-MM-DD
    #[arg(long)]
    date: String,

    /// Grace period in minutes added to the deadline [default: 5]
    #[arg(long, allow_negative_numbers = true)]
    grace: Option<i64>,

    /// IANA timezone the date is interpreted in [default: America/Chicago]
    #[arg(long, env = "REWIND_TIMEZONE")]
    timezone: Option<String>,

    /// YAML config file (defaults to <dir>/.rewind.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print what would be reset without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Reset even if a working tree has uncommitted changes
    #[arg(long)]
    force: bool,

    /// Also print the run summary as JSON on stdout
    #[arg(long, short = 'j')]
    json: bool,

    /// Log each decision and git invocation
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Exit code for a root directory that does not exist.
const EXIT_MISSING_ROOT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let git = GitCli::detect()?;
    let root = root::resolve_root(&cli.dir);

    let mut config = match &cli.config {
        Some(path) => RewindConfig::load_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RewindConfig::load(&root).context("failed to load config")?,
    };
    if let Some(grace) = cli.grace {
        config.grace_minutes = grace;
    }
    if let Some(tz) = cli.timezone {
        config.timezone = tz;
    }

    let options = RestoreOptions {
        dry_run: cli.dry_run,
        force: cli.force,
    };
    let driver = BatchDriver::new(&git, &config, options).context("invalid configuration")?;
    let resolver = *driver.resolver();

    let deadline = driver
        .resolve_deadline(&cli.date, config.grace_minutes)
        .context("cannot compute deadline")?;
    eprintln!(
        "Adjusted deadline ({}): {}",
        resolver.timezone().name(),
        resolver.format_for_display(&deadline.instant())
    );

    let status = driver.run(&root, &deadline, |index, total, report| {
        if index > 1 {
            eprintln!();
        }
        for line in output::repo_lines(index, total, report, &resolver) {
            eprintln!("{line}");
        }
    })?;

    let summary = match status {
        BatchStatus::MissingRoot(path) => {
            eprintln!("Not a directory: {}", path.display());
            return Ok(ExitCode::from(EXIT_MISSING_ROOT));
        }
        BatchStatus::Completed(summary) => summary,
    };

    if summary.repositories == 0 {
        eprintln!("No git repositories found (subfolders with a .git directory).");
    } else {
        eprintln!();
        eprintln!("{}", output::summary_line(&summary));
    }

    if cli.json {
        output::print_json(&summary)?;
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
