//! Parlor terminal chat client entry point.
//!
//! Binary name: `parlor`
//!
//! Parses CLI arguments, initializes tracing, then runs a chat session
//! under the claimed username. Exit status: 0 for a session that reached
//! its cleanup (graceful or forced leave), 1 for usage errors and any
//! joining-phase failure.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                // Usage errors count as joining-phase failures: exit 1.
                _ => ExitCode::FAILURE,
            };
            let _ = err.print();
            return code;
        }
    };

    // Set up tracing based on verbosity. Logs go to stderr so they never
    // tangle with the readline prompt.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parlor_core=debug,parlor_infra=debug,parlor_cli=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli::chat::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", console::style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
