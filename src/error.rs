//! Error types for Reporting API operations.

use thiserror::Error;

/// Errors that can occur while authenticating, querying or rendering reports.
///
/// Every variant is terminal for the operation in progress; nothing in this
/// crate retries or recovers locally.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// Missing or malformed authentication input, detected before any network call.
    #[error("No usable credentials supplied: {0}")]
    InvalidCredential(String),

    /// The identity service rejected the credentials.
    #[error("Keystone authentication failed: {0}")]
    AuthenticationFailure(String),

    /// No catalog entry for the service and no explicit endpoint override.
    #[error("No {service_type} endpoint found in the catalog")]
    EndpointNotFound { service_type: String },

    /// No API version (or resource) advertises the expected hypermedia link.
    #[error("No server API version supports link type '{0}'")]
    LinkNotFound(String),

    /// No report with the requested name.
    #[error("No report '{0}' available")]
    ReportNotFound(String),

    /// No API version with the requested id.
    #[error("No server support for API version '{0}'")]
    VersionNotFound(String),

    /// A request returned a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// The requested output format is not supported.
    #[error("Unknown output format '{0}'")]
    UnknownFormat(String),

    /// Failure writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure encoding CSV output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportingError {
    /// HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for reporting operations.
pub type Result<T> = core::result::Result<T, ReportingError>;
