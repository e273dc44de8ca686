//! sqlid: compute Oracle `SQL_ID` values from the command line.
//!
//! Provides `sqlid compute` for one-off statements, `sqlid batch` for
//! streams of statements resolved through the lookup cache, and `sqlid check`
//! for comparing a statement against a known `SQL_ID`.

#![warn(missing_docs)]

mod batch;
mod check;
mod compute;
mod output;
mod settings;

use std::io::{self, Write};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// sqlid: Oracle SQL_ID calculator.
#[derive(Parser, Debug)]
#[command(name = "sqlid", version, about = "Oracle SQL_ID calculator")]
pub struct Cli {
    /// Suppress log output and status lines. Computed records are still
    /// printed; `check` reports through its exit code alone.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `sqlid.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the SQL_ID of each statement argument.
    Compute(ComputeArgs),
    /// Compute SQL_IDs for statements read one per line.
    Batch(BatchArgs),
    /// Verify that a statement hashes to an expected SQL_ID.
    Check(CheckArgs),
}

/// Arguments for the `sqlid compute` subcommand.
#[derive(Parser, Debug)]
pub struct ComputeArgs {
    /// Native statement texts, exactly as the database receives them.
    #[arg(required = true)]
    pub statements: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `sqlid batch` subcommand.
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// File with one statement per line. Reads stdin when omitted or `-`.
    pub input: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Override the configured cache capacity. Must be at least 1.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub capacity: Option<usize>,
}

/// Arguments for the `sqlid check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The expected 13-character SQL_ID.
    pub sql_id: String,

    /// The native statement text.
    pub statement: String,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// `<sql_id>\t<statement>` lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress logs and status lines.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let config = match settings::load(&global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };
    init_logging(&global, &config.log.filter);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Command::Compute(ref args) => compute::run(args, &mut out),
        Command::Batch(ref args) => batch::run(args, &config, &mut out),
        Command::Check(ref args) => check::run(args, &global, &mut out),
    };

    let flushed = out.flush();
    drop(out);

    match (result, flushed) {
        (Ok(code), Ok(())) => process::exit(code),
        (Err(e), _) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
        (Ok(_), Err(e)) => {
            eprintln!("error: failed to write output: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins over the flags, which win over the configured filter.
fn init_logging(global: &GlobalArgs, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(global, configured)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn filter_directive<'a>(global: &GlobalArgs, configured: &'a str) -> &'a str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        configured
    }
}
