//! docstats - schema statistics for document collections
//!
//! Reads JSON lines or JSON documents (MongoDB Extended JSON values are
//! understood) and reports, for every field path, which types occur and how
//! often.
//!
//! Usage:
//!   docstats users.jsonl
//!   docstats --depth 2 --json --output stats.json users.jsonl
//!   mongoexport --collection users | docstats -

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use docstats_core::source::InputFormat;
use tracing_subscriber::EnvFilter;

use commands::analyze::{AnalyzeArgs, handle_analyze};

/// Analyze the schema of a document collection
#[derive(Parser, Debug)]
#[command(name = "docstats", version)]
#[command(about = "Report field types and their frequencies across a document collection")]
struct Cli {
    /// Input file (JSON lines or JSON), or '-' for stdin
    input: PathBuf,

    /// Input format, detected from the file extension when omitted
    #[arg(long, short = 'f', value_parser = parse_format)]
    format: Option<InputFormat>,

    /// Deepest nesting level to gather statistics for (0 for unlimited)
    #[arg(long, short = 'd', default_value_t = 0)]
    depth: usize,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Include total objects and max depth alongside the JSON statistics
    #[arg(long, requires = "json")]
    envelope: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Analyze at most this many records (0 for all)
    #[arg(long, short = 's', default_value_t = 0)]
    sample_size: usize,

    /// Stop at the first invalid record instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Expected number of records, used to size the progress bar
    #[arg(long)]
    estimated_count: Option<u64>,

    /// Log analysis details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_format(s: &str) -> Result<InputFormat, String> {
    s.parse()
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let args = AnalyzeArgs {
        input: cli.input,
        format: cli.format,
        depth: cli.depth,
        json: cli.json,
        envelope: cli.envelope,
        output: cli.output,
        sample_size: cli.sample_size,
        strict: cli.strict,
        progress: !cli.no_progress,
        estimated_count: cli.estimated_count,
    };

    match handle_analyze(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
