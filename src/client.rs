//! Reporting API client.
//!
//! Discovers API versions, resolves reports through the links each version
//! advertises, and fetches report data. Versions and reports are fetched at
//! most once per client and never refreshed.

use std::fmt;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::ReportingAuth;
use crate::error::{ReportingError, Result};
use crate::models::{FilterParams, Report, ReportData, Version, LINK_REPORTS, LINK_SELF};

const USER_AGENT: &str = concat!("reportingclient/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for identity and reporting requests.
pub(crate) fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .brotli(true)
        .gzip(true)
        .deflate(true)
        .build()
        .map_err(ReportingError::Transport)
}

/// Check response status, turning any non-success into [`ReportingError::HttpError`].
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ReportingError::HttpError {
        status: status.as_u16(),
        body,
    })
}

/// Build the URL for `path` under `endpoint`, with `params` as the query string.
///
/// Absolute `http`/`https` links are used as given. Otherwise `endpoint` and
/// `path` are concatenated, with exactly one `/` inserted only when neither
/// side already has one.
pub fn request_url(endpoint: &str, path: &str, params: &FilterParams) -> String {
    let mut url = if is_absolute(path) {
        path.to_string()
    } else if endpoint.ends_with('/') || path.starts_with('/') {
        format!("{endpoint}{path}")
    } else {
        format!("{endpoint}/{path}")
    };

    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    url
}

fn is_absolute(link: &str) -> bool {
    Url::parse(link)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Client for the Reporting API.
///
/// Holds an established [`ReportingAuth`] session and lazily caches the
/// version and report descriptors. Each cache is filled by the first call
/// that needs it; a failed fetch leaves it empty so a later call retries.
///
/// # Example
///
/// ```no_run
/// use reportingclient::{authenticate, Credential, FilterParams, ReportingClient};
///
/// # async fn example() -> reportingclient::Result<()> {
/// let credential = Credential::from_env()?;
/// let auth = authenticate(&credential, None).await?;
/// let mut client = ReportingClient::new(auth)?;
///
/// for report in client.get_reports().await? {
///     println!("{}: {}", report.name, report.description);
/// }
///
/// let mut filters = FilterParams::new();
/// filters.insert("tenant_id".to_string(), "abc".to_string());
/// let rows = client.fetch("project", &filters).await?;
/// # Ok(())
/// # }
/// ```
pub struct ReportingClient<A = Box<dyn ReportingAuth>> {
    http: Client,
    auth: A,
    versions: Option<Vec<Version>>,
    reports: Option<Vec<Report>>,
}

impl<A: ReportingAuth> fmt::Debug for ReportingClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportingClient")
            .field("endpoint", &self.auth.reporting_endpoint())
            .field("versions", &self.versions.as_ref().map(Vec::len))
            .field("reports", &self.reports.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

impl<A: ReportingAuth> ReportingClient<A> {
    /// Create a client over an established session.
    ///
    /// No request is made until the first operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(auth: A) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            auth,
            versions: None,
            reports: None,
        })
    }

    /// Base URL of the reporting service.
    pub fn endpoint(&self) -> &str {
        self.auth.reporting_endpoint()
    }

    /// The session requests are authenticated with.
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Send an authenticated GET and decode the JSON body.
    #[tracing::instrument(skip(self, params), fields(endpoint = self.endpoint()))]
    async fn request<T: DeserializeOwned>(&self, path: &str, params: &FilterParams) -> Result<T> {
        let url = Url::parse(&request_url(self.endpoint(), path, params))?;
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .headers(self.auth.auth_headers().clone())
            .send()
            .await?;

        let response = check_response(response).await?;
        Ok(response.json().await?)
    }

    /// All versions of the API the server offers, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint root cannot be fetched or decoded.
    pub async fn get_versions(&mut self) -> Result<&[Version]> {
        let versions = match self.versions.take() {
            Some(versions) => versions,
            None => {
                let versions: Vec<Version> = self.request("", &FilterParams::new()).await?;
                tracing::debug!(count = versions.len(), "cached API versions");
                versions
            }
        };
        Ok(self.versions.insert(versions).as_slice())
    }

    /// The version with identifier `version_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::VersionNotFound`] if the server does not offer it.
    pub async fn get_version(&mut self, version_id: &str) -> Result<&Version> {
        self.get_versions()
            .await?
            .iter()
            .find(|v| v.id == version_id)
            .ok_or_else(|| ReportingError::VersionNotFound(version_id.to_string()))
    }

    /// The URL of the first `link_type` link, scanning versions in server order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::LinkNotFound`] if no version advertises it.
    pub async fn get_any_version_link(&mut self, link_type: &str) -> Result<String> {
        self.get_versions()
            .await?
            .iter()
            .find_map(|v| v.link(link_type))
            .map(str::to_string)
            .ok_or_else(|| ReportingError::LinkNotFound(link_type.to_string()))
    }

    /// All reports available on the server.
    ///
    /// The list comes from the first version advertising a `reports` link.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::LinkNotFound`] if no version has a `reports`
    /// link, or an error if the report list cannot be fetched.
    pub async fn get_reports(&mut self) -> Result<&[Report]> {
        let reports = match self.reports.take() {
            Some(reports) => reports,
            None => {
                let link = self.get_any_version_link(LINK_REPORTS).await?;
                let reports: Vec<Report> = self.request(&link, &FilterParams::new()).await?;
                tracing::debug!(count = reports.len(), "cached report list");
                reports
            }
        };
        Ok(self.reports.insert(reports).as_slice())
    }

    /// The URL the named report is served from.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::ReportNotFound`] if no report has exactly this
    /// name, or [`ReportingError::LinkNotFound`] if the report has no `self` link.
    pub async fn get_report_url(&mut self, report_name: &str) -> Result<String> {
        let report = self
            .get_reports()
            .await?
            .iter()
            .find(|r| r.name == report_name)
            .ok_or_else(|| ReportingError::ReportNotFound(report_name.to_string()))?;

        report
            .self_link()
            .map(str::to_string)
            .ok_or_else(|| ReportingError::LinkNotFound(LINK_SELF.to_string()))
    }

    /// Fetch the named report, passing `params` as query-string filters.
    ///
    /// Parameters are forwarded without validation.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::ReportNotFound`] for an unknown report and
    /// [`ReportingError::HttpError`] if the server answers with an error status.
    pub async fn fetch(&mut self, report_name: &str, params: &FilterParams) -> Result<ReportData> {
        tracing::debug!("Fetching \"{}\"...", report_name);
        let url = self.get_report_url(report_name).await?;
        let data: ReportData = self.request(&url, params).await?;
        tracing::debug!("Fetched \"{}\".", report_name);
        Ok(data)
    }
}
