use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use bsl_scrubber::batch::{BatchReport, BatchRunner};
use bsl_scrubber::config::Settings;
use bsl_scrubber::Transform;

#[derive(Parser)]
#[command(name = "bsl-scrubber", version, about = "Bulk dead-code cleanup for 1C modules")]
struct Cli {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the container unpack/pack tool
    #[arg(long, global = true)]
    tool: Option<PathBuf>,

    /// Kill the unpack/pack tool after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report what would change without writing anything
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print the run report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove statements that follow an unconditional `Возврат;`
    DeadCode { root: PathBuf },
    /// Remove large commented-out blocks
    Comments {
        root: PathBuf,
        /// Minimum number of comment lines in a block
        #[arg(long)]
        min_lines: Option<usize>,
    },
    /// Remove long runs of blank lines
    Blanks {
        root: PathBuf,
        /// Minimum number of blank lines in a run
        #[arg(long)]
        min_lines: Option<usize>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if cli.tool.is_some() {
        settings.tool = cli.tool;
    }
    if cli.timeout.is_some() {
        settings.tool_timeout_secs = cli.timeout;
    }

    let (transform, root) = match cli.command {
        Commands::DeadCode { root } => (Transform::DeadCode, root),
        Commands::Comments { root, min_lines } => (
            Transform::CommentBlocks {
                min_lines: min_lines.unwrap_or(settings.comment_min_lines),
            },
            root,
        ),
        Commands::Blanks { root, min_lines } => (
            Transform::BlankBlocks {
                min_lines: min_lines.unwrap_or(settings.blank_min_lines),
            },
            root,
        ),
    };

    let report = BatchRunner::new(transform, &settings)
        .dry_run(cli.dry_run)
        .run(&root);

    print_report(&report, cli.json);
    ExitCode::SUCCESS
}

fn print_report(report: &BatchReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{out}"),
            Err(e) => error!("cannot serialize report: {e}"),
        }
        return;
    }

    for failure in &report.failures {
        println!("!! {}     {}", failure.path.display(), failure.error);
    }
    println!("Processed files: {}", report.files_scanned);
    println!("Changed files: {}", report.files_changed);
    if report.files_skipped > 0 {
        println!("Skipped containers: {}", report.files_skipped);
    }
    println!("Failed files: {}", report.failures.len());
    if report.dry_run {
        println!("(dry run, nothing written)");
    }
}
