//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! reporting-client binary, and [`run`] which executes a parsed command line.

mod run;

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser};

use crate::auth::CredentialParts;
use crate::models::FilterParams;

pub use run::{run, RunOutcome, EMPTY_RESULT_SET};

/// Reporting API command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "reporting-client",
    about = "Query the reporting API",
    version,
    group(ArgGroup::new("operation").required(true).args(["report", "list_reports"]))
)]
pub struct Cli {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// Report name.
    #[arg(long, value_name = "NAME")]
    pub report: Option<String>,

    /// List available reports.
    #[arg(long)]
    pub list_reports: bool,

    /// Supply a report filter criterion in name=value format. Repeat for
    /// multiple criteria.
    #[arg(long = "filter", value_name = "NAME=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Output format (csv or json).
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Output filename (defaults to standard output).
    #[arg(short, long, value_name = "PATH")]
    pub outfile: Option<PathBuf>,

    /// Enable debug output.
    #[arg(long)]
    pub debug: bool,
}

/// Identity options, following the OpenStack naming scheme.
///
/// Each `--os-*` flag falls back to its `OS_*` environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Reporting API endpoint (skips the catalog lookup).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Auth token for the reporting API.
    #[arg(long, env = "OS_TOKEN", hide_env_values = true)]
    pub os_token: Option<String>,

    /// Authentication URL.
    #[arg(long, env = "OS_AUTH_URL", value_name = "URL")]
    pub os_auth_url: Option<String>,

    /// Username.
    #[arg(long, env = "OS_USERNAME")]
    pub os_username: Option<String>,

    /// User's password.
    #[arg(long, env = "OS_PASSWORD", hide_env_values = true)]
    pub os_password: Option<String>,

    /// Project name to scope to.
    #[arg(long, env = "OS_PROJECT_NAME")]
    pub os_project_name: Option<String>,

    /// Project name to scope to (legacy name for --os-project-name).
    #[arg(long, env = "OS_TENANT_NAME")]
    pub os_tenant_name: Option<String>,

    /// Domain the user belongs to (defaults to "Default").
    #[arg(long, env = "OS_USER_DOMAIN_NAME")]
    pub os_user_domain_name: Option<String>,

    /// Domain the project belongs to (defaults to "Default").
    #[arg(long, env = "OS_PROJECT_DOMAIN_NAME")]
    pub os_project_domain_name: Option<String>,
}

impl AuthArgs {
    /// Credential input collected from the flags.
    pub fn credential_parts(&self) -> CredentialParts {
        CredentialParts {
            token: self.os_token.clone(),
            auth_url: self.os_auth_url.clone(),
            username: self.os_username.clone(),
            password: self.os_password.clone(),
            project_name: self.os_project_name.clone(),
            tenant_name: self.os_tenant_name.clone(),
            user_domain_name: self.os_user_domain_name.clone(),
            project_domain_name: self.os_project_domain_name.clone(),
        }
    }
}

/// What a command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<'a> {
    /// Print the available reports.
    ListReports,
    /// Fetch the named report.
    Fetch(&'a str),
}

impl Cli {
    /// The requested operation.
    pub fn operation(&self) -> Operation<'_> {
        match self.report.as_deref() {
            Some(name) if !self.list_reports => Operation::Fetch(name),
            _ => Operation::ListReports,
        }
    }

    /// Filter criteria as query parameters. A repeated name keeps its last value.
    pub fn filter_params(&self) -> FilterParams {
        self.filters.iter().cloned().collect()
    }
}

/// Parse a `name=value` filter, splitting on the first `=` only.
pub fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("invalid filter '{s}': expected name=value"))
}
