//! Reporting API CLI binary.
//!
//! Outputs reports downloaded from the Reporting API in CSV or JSON format.

use std::process::ExitCode;

use clap::Parser;
use reportingclient::cli::{run, Cli};
use reportingclient::ReportingError;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "reporting-client failed");
            eprintln!("Error: {e}");
            if matches!(e, ReportingError::InvalidCredential(_)) {
                eprintln!(
                    "Hint: Supply --os-token, or --os-auth-url, --os-username, \
                     --os-password and --os-project-name (or their OS_* environment variables)"
                );
            }
            ExitCode::FAILURE
        }
    }
}
