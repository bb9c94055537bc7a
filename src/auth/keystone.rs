//! Keystone v3 sessions.
//!
//! Keystone authentication is session based: credentials are exchanged once
//! for a token plus a service catalog, and both are kept for the lifetime of
//! the process. Tokens are never refreshed.

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::catalog::{find_endpoint, CatalogEntry};
use super::credential::PasswordCredential;
use super::{ReportingAuth, REPORTING_SERVICE_TYPE};
use crate::client::{check_response, http_client};
use crate::error::{ReportingError, Result};

/// Header carrying the token on requests.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Header carrying the issued token on a Keystone token response.
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Catalog interface used for endpoint lookups.
const PUBLIC_INTERFACE: &str = "public";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

/// An authenticated Keystone session.
///
/// Owns the token and the headers derived from it; exclusively owned by
/// the auth provider that established it.
#[derive(Clone)]
pub struct KeystoneSession {
    token: String,
    headers: HeaderMap,
    catalog: Vec<CatalogEntry>,
    expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for KeystoneSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoneSession")
            .field("catalog", &self.catalog.len())
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl KeystoneSession {
    /// Use `token` as-is, without contacting the identity service.
    fn from_token(token: &str) -> Result<Self> {
        Ok(Self {
            token: token.to_string(),
            headers: token_headers(token)?,
            catalog: Vec::new(),
            expires_at: None,
        })
    }

    /// Exchange the auth `body` for a token at `{auth_url}/auth/tokens`.
    #[tracing::instrument(skip(http, body))]
    async fn establish(http: &Client, auth_url: &str, body: serde_json::Value) -> Result<Self> {
        let url = format!("{}/auth/tokens", auth_url.trim_end_matches('/'));

        let response = http.post(&url).json(&body).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "identity service rejected credentials");
            return Err(ReportingError::AuthenticationFailure(format!(
                "{} {}",
                status.as_u16(),
                body
            )));
        }
        let response = check_response(response).await?;

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ReportingError::AuthenticationFailure(
                    "identity service issued no token".to_string(),
                )
            })?;

        let data: TokenResponse = response.json().await?;
        tracing::debug!(
            expires_at = ?data.token.expires_at,
            services = data.token.catalog.len(),
            "established keystone session"
        );

        Ok(Self {
            headers: token_headers(&token)?,
            token,
            catalog: data.token.catalog,
            expires_at: data.token.expires_at,
        })
    }

    /// The session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Headers authenticating a request with this session.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Service catalog issued with the token. Empty for unscoped tokens.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// When the token expires, if the identity service said.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Look up the URL of `service_type` for `interface` in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::EndpointNotFound`] if the catalog has no match.
    pub fn endpoint(&self, service_type: &str, interface: &str) -> Result<&str> {
        find_endpoint(&self.catalog, service_type, interface).ok_or_else(|| {
            ReportingError::EndpointNotFound {
                service_type: service_type.to_string(),
            }
        })
    }

    /// Resolve the reporting endpoint, preferring an explicit override.
    fn reporting_endpoint(&self, endpoint: Option<&str>) -> Result<String> {
        match endpoint.filter(|e| !e.is_empty()) {
            Some(endpoint) => Ok(endpoint.to_string()),
            None => self
                .endpoint(REPORTING_SERVICE_TYPE, PUBLIC_INTERFACE)
                .map(str::to_string),
        }
    }
}

fn token_headers(token: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(token).map_err(|_| {
        ReportingError::InvalidCredential("token contains invalid characters".to_string())
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTH_TOKEN_HEADER, value);
    Ok(headers)
}

/// Keystone auth starting from an existing token.
///
/// With an auth URL the token is exchanged for a fresh session (and catalog);
/// without one it is used directly and the endpoint must be given explicitly.
#[derive(Debug, Clone)]
pub struct KeystoneToken {
    session: KeystoneSession,
    auth_url: Option<String>,
    endpoint: String,
}

impl KeystoneToken {
    /// Establish a session from `token`.
    ///
    /// # Errors
    ///
    /// - [`ReportingError::InvalidCredential`] if `token` is empty (no request is made)
    /// - [`ReportingError::AuthenticationFailure`] if Keystone rejects the token
    /// - [`ReportingError::EndpointNotFound`] if neither `endpoint` nor the catalog
    ///   gives a reporting endpoint
    pub async fn authenticate(
        token: &str,
        auth_url: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<Self> {
        if token.is_empty() {
            return Err(ReportingError::InvalidCredential(
                "no usable token supplied".to_string(),
            ));
        }

        let auth_url = auth_url.filter(|u| !u.is_empty());
        let session = match auth_url {
            Some(auth_url) => {
                let body = json!({
                    "auth": {
                        "identity": {
                            "methods": ["token"],
                            "token": { "id": token }
                        }
                    }
                });
                KeystoneSession::establish(&http_client()?, auth_url, body).await?
            }
            None => KeystoneSession::from_token(token)?,
        };
        let endpoint = session.reporting_endpoint(endpoint)?;

        Ok(Self {
            session,
            auth_url: auth_url.map(str::to_string),
            endpoint,
        })
    }

    /// The identity service URL, if one was used.
    pub fn auth_url(&self) -> Option<&str> {
        self.auth_url.as_deref()
    }

    /// The underlying session.
    pub fn session(&self) -> &KeystoneSession {
        &self.session
    }
}

impl ReportingAuth for KeystoneToken {
    fn auth_token(&self) -> &str {
        self.session.token()
    }

    fn auth_headers(&self) -> &HeaderMap {
        self.session.headers()
    }

    fn reporting_endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Keystone auth from a username/password credential set.
#[derive(Debug, Clone)]
pub struct KeystonePassword {
    session: KeystoneSession,
    auth_url: String,
    endpoint: String,
}

impl KeystonePassword {
    /// Establish a project-scoped session for `credential`.
    ///
    /// # Errors
    ///
    /// - [`ReportingError::InvalidCredential`] if any field is empty (no request is made)
    /// - [`ReportingError::AuthenticationFailure`] if Keystone rejects the credentials
    /// - [`ReportingError::EndpointNotFound`] if neither `endpoint` nor the catalog
    ///   gives a reporting endpoint
    pub async fn authenticate(
        credential: &PasswordCredential,
        endpoint: Option<&str>,
    ) -> Result<Self> {
        // Re-validate: the fields are public and may have been built by hand.
        crate::auth::Credential::password(credential.clone())?;

        let body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": credential.username,
                            "password": credential.password,
                            "domain": { "name": credential.user_domain_name }
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": credential.project_name,
                        "domain": { "name": credential.project_domain_name }
                    }
                }
            }
        });

        let session =
            KeystoneSession::establish(&http_client()?, &credential.auth_url, body).await?;
        let endpoint = session.reporting_endpoint(endpoint)?;

        Ok(Self {
            session,
            auth_url: credential.auth_url.clone(),
            endpoint,
        })
    }

    /// The identity service URL.
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// The underlying session.
    pub fn session(&self) -> &KeystoneSession {
        &self.session
    }
}

impl ReportingAuth for KeystonePassword {
    fn auth_token(&self) -> &str {
        self.session.token()
    }

    fn auth_headers(&self) -> &HeaderMap {
        self.session.headers()
    }

    fn reporting_endpoint(&self) -> &str {
        &self.endpoint
    }
}
