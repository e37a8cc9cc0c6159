use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lintwrap::cli::Cli;
use lintwrap::{exit_code_for_error, run};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LINTWRAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "lint action finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Fatal paths always report; --silent only mutes diagnostics.
            eprintln!("lintwrap: {e}");
            ExitCode::from(exit_code_for_error(&e))
        }
    }
}
