//! Execution of a parsed command line.

use std::fs::File;
use std::io::{self, BufWriter};

use super::{Cli, Operation};
use crate::auth::{authenticate, Credential};
use crate::client::ReportingClient;
use crate::error::Result;
use crate::output::{OutputFormat, PrettyPrint};

/// Message printed when a fetched report has no rows.
pub const EMPTY_RESULT_SET: &str = "Empty result set";

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The report listing was printed.
    Listed(usize),
    /// Report rows were written to the outfile or standard output.
    Written(usize),
    /// The report had no rows; [`EMPTY_RESULT_SET`] was printed instead.
    EmptyResultSet,
}

/// Run the operation described by `cli`.
///
/// The output format is checked before any network call. An empty report
/// prints [`EMPTY_RESULT_SET`] and leaves the output file untouched.
///
/// # Errors
///
/// Returns the first error hit; nothing is retried.
pub async fn run(cli: Cli) -> Result<RunOutcome> {
    let format: OutputFormat = cli.format.parse()?;

    let credential = Credential::resolve(cli.auth.credential_parts())?;
    let auth = authenticate(&credential, cli.auth.endpoint.as_deref()).await?;
    let mut client = ReportingClient::new(auth)?;
    tracing::debug!(endpoint = client.endpoint(), "authenticated");

    let name = match cli.operation() {
        Operation::ListReports => {
            let reports = client.get_reports().await?;
            for report in reports {
                println!("{}", report.pretty_print());
            }
            return Ok(RunOutcome::Listed(reports.len()));
        }
        Operation::Fetch(name) => name,
    };

    let rows = client.fetch(name, &cli.filter_params()).await?;
    if rows.is_empty() {
        println!("{EMPTY_RESULT_SET}");
        return Ok(RunOutcome::EmptyResultSet);
    }

    match &cli.outfile {
        Some(path) => {
            let file = File::create(path)?;
            format.write(BufWriter::new(file), &rows)?;
        }
        None => format.write(io::stdout().lock(), &rows)?,
    }
    Ok(RunOutcome::Written(rows.len()))
}
