use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use tracing_subscriber::EnvFilter;

mod run_impl;

#[derive(Parser, Debug, Clone)]
#[command(name = "yamlsort", version, about = "Recursively sort the keys of a YAML document", long_about = None)]
pub struct Args {
    /// Input file (defaults to stdin, `-` also reads stdin)
    #[arg(long = "infile", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub infile: Option<PathBuf>,

    /// Output file (defaults to stdout, `-` also writes stdout)
    #[arg(long = "outfile", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub outfile: Option<PathBuf>,

    /// Sort the given file in place
    #[arg(
        long = "in-place",
        short = 'i',
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        conflicts_with_all = ["infile", "outfile"]
    )]
    pub in_place: Option<PathBuf>,

    /// Prepend a YAML comment for every value that was left unsorted
    #[arg(long = "annotate", action = ArgAction::SetTrue)]
    pub annotate: bool,

    /// Verbose logging (repeat for more)
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if the input cannot be read or decoded, a mapping key is
/// not a string, or the output cannot be written.
pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run_impl::run_with_args(&args)
}

/// Logs go to stderr so stdout carries nothing but YAML. `RUST_LOG` wins over
/// the `-v` count when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
