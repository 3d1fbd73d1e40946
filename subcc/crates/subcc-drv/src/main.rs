//! subcc - subC parser front-end.
//!
//! Parses one subC source file and prints the bottom-up reduction trace
//! to standard output, one reduction per line. Exit code 0 on a
//! successful parse; 1 on I/O, lexer, parser, or usage errors, with a
//! single diagnostic line on standard error.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use subcc_drv::{Config, Session};

/// Parse a subC source file and print its reduction trace.
#[derive(Parser, Debug)]
#[command(name = "subcc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse a subC source file and print its reduction trace")]
struct Cli {
    /// The source file to parse.
    input: PathBuf,

    /// Emit phase tracing on standard error.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprintln!("Usage: subcc <source-file>");
            return ExitCode::FAILURE;
        }
    };

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let result = Session::new(Config { input: cli.input })
        .and_then(|session| session.run(&mut io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
