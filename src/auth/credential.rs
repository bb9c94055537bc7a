//! Credential input and validation.

use std::env;
use std::fmt;

use crate::error::{ReportingError, Result};

/// Domain used when no user or project domain name is supplied.
pub const DEFAULT_DOMAIN: &str = "Default";

/// What to authenticate with.
///
/// Exactly one complete variant is accepted; partial input is rejected with
/// [`ReportingError::InvalidCredential`] before any network call.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// An existing bearer token, optionally with the identity service URL
    /// used to validate it and look up the catalog.
    Token {
        token: String,
        auth_url: Option<String>,
    },
    /// A full username/password credential set scoped to a project.
    Password(PasswordCredential),
}

/// Username/password credentials scoped to a project.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain_name: String,
    pub project_domain_name: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { auth_url, .. } => f
                .debug_struct("Token")
                .field("auth_url", auth_url)
                .finish_non_exhaustive(),
            Self::Password(password) => f.debug_tuple("Password").field(password).finish(),
        }
    }
}

impl fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("project_name", &self.project_name)
            .field("user_domain_name", &self.user_domain_name)
            .field("project_domain_name", &self.project_domain_name)
            .finish_non_exhaustive()
    }
}

/// Loose credential input as collected from flags or the environment.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct CredentialParts {
    pub token: Option<String>,
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub project_name: Option<String>,
    /// Legacy name for `project_name`, used only when that is absent.
    pub tenant_name: Option<String>,
    pub user_domain_name: Option<String>,
    pub project_domain_name: Option<String>,
}

impl CredentialParts {
    /// Read every part from its `OS_*` environment variable.
    pub fn from_env() -> Self {
        Self {
            token: os_env("token"),
            auth_url: os_env("auth-url"),
            username: os_env("username"),
            password: os_env("password"),
            project_name: os_env("project-name"),
            tenant_name: os_env("tenant-name"),
            user_domain_name: os_env("user-domain-name"),
            project_domain_name: os_env("project-domain-name"),
        }
    }
}

/// Environment variable for an identity option, e.g. `auth-url` -> `OS_AUTH_URL`.
pub(crate) fn os_env_name(option: &str) -> String {
    format!("os_{option}").replace('-', "_").to_uppercase()
}

fn os_env(option: &str) -> Option<String> {
    env::var(os_env_name(option)).ok().filter(|v| !v.is_empty())
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Credential {
    /// A token credential.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::InvalidCredential`] if `token` is empty.
    pub fn token(token: impl Into<String>, auth_url: Option<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(ReportingError::InvalidCredential(
                "no usable token supplied".to_string(),
            ));
        }
        Ok(Self::Token {
            token,
            auth_url: present(auth_url),
        })
    }

    /// A password credential.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::InvalidCredential`] naming every empty field.
    pub fn password(credential: PasswordCredential) -> Result<Self> {
        let fields = [
            ("auth_url", &credential.auth_url),
            ("username", &credential.username),
            ("password", &credential.password),
            ("project_name", &credential.project_name),
            ("user_domain_name", &credential.user_domain_name),
            ("project_domain_name", &credential.project_domain_name),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ReportingError::InvalidCredential(format!(
                "missing {}",
                missing.join(", ")
            )));
        }
        Ok(Self::Password(credential))
    }

    /// Pick a credential variant from loose input.
    ///
    /// A token wins over everything else. Otherwise the password set must be
    /// complete; `tenant_name` stands in for a missing `project_name` and both
    /// domain names default to [`DEFAULT_DOMAIN`].
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::InvalidCredential`] if neither variant is complete.
    pub fn resolve(parts: CredentialParts) -> Result<Self> {
        if let Some(token) = present(parts.token) {
            return Self::token(token, parts.auth_url);
        }

        let project_name = present(parts.project_name).or_else(|| present(parts.tenant_name));
        Self::password(PasswordCredential {
            auth_url: present(parts.auth_url).unwrap_or_default(),
            username: present(parts.username).unwrap_or_default(),
            password: present(parts.password).unwrap_or_default(),
            project_name: project_name.unwrap_or_default(),
            user_domain_name: present(parts.user_domain_name)
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            project_domain_name: present(parts.project_domain_name)
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        })
    }

    /// Resolve a credential from `OS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::InvalidCredential`] if the environment holds
    /// neither a token nor a complete password set.
    pub fn from_env() -> Result<Self> {
        Self::resolve(CredentialParts::from_env())
    }

    /// The identity service URL, if the credential carries one.
    pub fn auth_url(&self) -> Option<&str> {
        match self {
            Self::Token { auth_url, .. } => auth_url.as_deref(),
            Self::Password(password) => Some(&password.auth_url),
        }
    }
}
