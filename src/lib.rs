//! OpenStack Reporting API client library.
//!
//! A Rust library for querying the Reporting API: authenticate against
//! Keystone, discover which reports the server offers, and fetch a report
//! with optional filter parameters.
//!
//! # Quick Start
//!
//! ```no_run
//! use reportingclient::{authenticate, Credential, FilterParams, ReportingClient};
//!
//! #[tokio::main]
//! async fn main() -> reportingclient::Result<()> {
//!     // Credentials from OS_* environment variables
//!     let credential = Credential::from_env()?;
//!     let auth = authenticate(&credential, None).await?;
//!     let mut client = ReportingClient::new(auth)?;
//!
//!     // List reports
//!     for report in client.get_reports().await? {
//!         println!("{}: {}", report.name, report.description);
//!     }
//!
//!     // Fetch one, filtered
//!     let mut filters = FilterParams::new();
//!     filters.insert("tenant_id".to_string(), "abc123".to_string());
//!     let rows = client.fetch("project", &filters).await?;
//!     println!("Fetched {} rows", rows.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`ReportingAuth`] - the session contract: token, request headers and
//!   reporting endpoint. [`KeystoneToken`] and [`KeystonePassword`] implement it.
//! - [`ReportingClient`] - walks the API's links from the version list to the
//!   report list to a report, caching the first two.
//! - [`output`] - CSV and JSON rendering of fetched rows.
//!
//! # Configuration
//!
//! [`Credential::from_env`] reads the usual OpenStack variables:
//!
//! - `OS_TOKEN` - an existing token, or
//! - `OS_AUTH_URL`, `OS_USERNAME`, `OS_PASSWORD`, `OS_PROJECT_NAME`
//!   (`OS_TENANT_NAME`), `OS_USER_DOMAIN_NAME`, `OS_PROJECT_DOMAIN_NAME`

mod auth;
mod client;
mod error;
mod models;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{request_url, ReportingClient};
pub use error::{ReportingError, Result};

// Re-export auth types
pub use auth::{
    authenticate, CatalogEndpoint, CatalogEntry, Credential, CredentialParts, KeystonePassword,
    KeystoneSession, KeystoneToken, PasswordCredential, ReportingAuth, AUTH_TOKEN_HEADER,
    DEFAULT_DOMAIN, REPORTING_SERVICE_TYPE,
};

// Re-export models
pub use models::{
    FilterParams, Report, ReportData, ReportRow, Version, LINK_REPORTS, LINK_SELF,
};

pub use output::{OutputFormat, PrettyPrint};
