//! Authentication against the identity service.
//!
//! The Reporting API only cares about a bearer token: whatever the caller
//! authenticates with, the server verifies the token it receives. This module
//! exposes that contract as the [`ReportingAuth`] trait, with two Keystone
//! implementations:
//!
//! - [`KeystoneToken`] - start from an existing token
//! - [`KeystonePassword`] - start from a username/password/project set
//!
//! Use [`authenticate`] to build whichever one a [`Credential`] calls for.

mod catalog;
mod credential;
mod keystone;

use reqwest::header::HeaderMap;

use crate::error::Result;

pub use catalog::{CatalogEndpoint, CatalogEntry};
pub use credential::{Credential, CredentialParts, PasswordCredential, DEFAULT_DOMAIN};
pub use keystone::{KeystonePassword, KeystoneSession, KeystoneToken, AUTH_TOKEN_HEADER};

/// Service type of the reporting service in the identity catalog.
pub const REPORTING_SERVICE_TYPE: &str = "reporting";

/// An established identity session, as seen by the reporting client.
///
/// All three accessors are free of I/O: implementations resolve everything
/// while the session is being established.
pub trait ReportingAuth: Send + Sync {
    /// The current bearer token.
    fn auth_token(&self) -> &str;

    /// Headers to attach to every request to the reporting service.
    fn auth_headers(&self) -> &HeaderMap;

    /// Base URL of the reporting service.
    fn reporting_endpoint(&self) -> &str;
}

impl<A: ReportingAuth + ?Sized> ReportingAuth for Box<A> {
    fn auth_token(&self) -> &str {
        (**self).auth_token()
    }

    fn auth_headers(&self) -> &HeaderMap {
        (**self).auth_headers()
    }

    fn reporting_endpoint(&self) -> &str {
        (**self).reporting_endpoint()
    }
}

/// Establish a session for `credential`.
///
/// `endpoint` overrides the catalog lookup for the reporting service.
///
/// # Errors
///
/// Returns [`ReportingError::AuthenticationFailure`] if the identity service
/// rejects the credentials and [`ReportingError::EndpointNotFound`] if no
/// reporting endpoint can be resolved.
///
/// [`ReportingError::AuthenticationFailure`]: crate::ReportingError::AuthenticationFailure
/// [`ReportingError::EndpointNotFound`]: crate::ReportingError::EndpointNotFound
pub async fn authenticate(
    credential: &Credential,
    endpoint: Option<&str>,
) -> Result<Box<dyn ReportingAuth>> {
    match credential {
        Credential::Token { token, auth_url } => {
            let auth = KeystoneToken::authenticate(token, auth_url.as_deref(), endpoint).await?;
            Ok(Box::new(auth))
        }
        Credential::Password(password) => {
            let auth = KeystonePassword::authenticate(password, endpoint).await?;
            Ok(Box::new(auth))
        }
    }
}
