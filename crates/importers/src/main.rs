//! Importers CLI - list the packages that transitively import a target.
//!
//! Results go to stdout, one package per line. Logs and errors go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use importers::{GoToolchain, Query};

mod cli;

/// Report which packages in SOURCE transitively import any TARGET.
#[derive(Parser, Debug)]
#[command(name = "importers")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path spec of the packages to analyze (e.g. "./...")
    source: String,

    /// Path specs of the target packages
    #[arg(required = true)]
    targets: Vec<String>,

    /// Also follow each source package's test imports (first hop only)
    #[arg(long)]
    tests: bool,

    /// Show the shortest import chain behind each result
    #[arg(long)]
    why: bool,

    /// Go binary to run
    #[arg(long, value_name = "PATH", default_value = "go")]
    go: PathBuf,

    /// Run the Go toolchain in this directory
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Build tags passed to go list (comma-separated)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    tags: Vec<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn toolchain(&self) -> GoToolchain {
        GoToolchain {
            program: self.go.clone(),
            dir: self.dir.clone(),
            tags: self.tags.clone(),
        }
    }

    fn query(&self) -> Query {
        Query::new(self.source.clone(), self.targets.iter().cloned())
            .with_test_edges(self.tests)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version land here too, on stdout.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli::run(cli.toolchain(), &cli.query(), cli.why) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
