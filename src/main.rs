use std::error::Error as _;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sigfold::RunConfig;
use tracing_subscriber::EnvFilter;

/// Groups same-type Go parameters and unwraps single unnamed results.
///
/// Every `.go` file below ROOT is rewritten in place; `vendor` and `.git`
/// directories are skipped.
#[derive(Parser, Debug)]
#[command(name = "sigfold", version, about)]
struct Cli {
    /// Directory to rewrite.
    #[arg(default_value = ".")]
    root: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SIGFOLD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match sigfold::run(&RunConfig::new(cli.root)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sigfold: {err}");
            let mut cause = err.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {inner}");
                cause = inner.source();
            }
            ExitCode::FAILURE
        }
    }
}
