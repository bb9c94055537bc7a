//! Mock server state management.
//!
//! Provides the in-memory data store for the mock identity and reporting services.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Report, ReportData, ReportRow, Version};

/// A user the mock identity service accepts.
#[derive(Debug, Clone)]
pub struct MockUser {
    pub password: String,
    pub domain: String,
    /// Project the user may scope to.
    pub project: String,
    /// Domain that project belongs to.
    pub project_domain: String,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// API versions served at the root, in order.
    pub versions: Vec<Version>,

    /// Reports served at the reports link, in order.
    pub reports: Vec<Report>,

    /// Report rows indexed by report name.
    pub report_data: HashMap<String, ReportData>,

    /// Users indexed by name.
    pub users: HashMap<String, MockUser>,

    /// Tokens issued by the identity service (or pre-seeded).
    pub tokens: HashSet<String>,

    /// If set, reporting requests must carry an issued token.
    pub require_token: bool,

    /// Reporting endpoint advertised in the catalog.
    pub reporting_url: Option<String>,

    /// Request count per request path.
    pub hits: HashMap<String, usize>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an API version.
    pub fn with_version(mut self, version: Version) -> Self {
        self.versions.push(version);
        self
    }

    /// Add a report and its rows.
    pub fn with_report(mut self, report: Report, rows: ReportData) -> Self {
        self.report_data.insert(report.name.clone(), rows);
        self.reports.push(report);
        self
    }

    /// Add a user scoped to `project`, both in the default domain.
    pub fn with_user(self, name: &str, password: &str, project: &str) -> Self {
        self.with_domain_user(
            name,
            password,
            crate::DEFAULT_DOMAIN,
            project,
            crate::DEFAULT_DOMAIN,
        )
    }

    /// Add a user in `domain` scoped to `project` in `project_domain`.
    pub fn with_domain_user(
        mut self,
        name: &str,
        password: &str,
        domain: &str,
        project: &str,
        project_domain: &str,
    ) -> Self {
        self.users.insert(
            name.to_string(),
            MockUser {
                password: password.to_string(),
                domain: domain.to_string(),
                project: project.to_string(),
                project_domain: project_domain.to_string(),
            },
        );
        self
    }

    /// Accept `token` without it being issued first.
    pub fn with_token(mut self, token: &str) -> Self {
        self.tokens.insert(token.to_string());
        self
    }

    /// Require a valid token on reporting requests.
    pub fn with_required_token(mut self) -> Self {
        self.require_token = true;
        self
    }

    /// Record a request for `path`.
    pub fn hit(&mut self, path: &str) {
        *self.hits.entry(path.to_string()).or_default() += 1;
    }

    /// Number of requests seen for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.get(path).copied().unwrap_or(0)
    }

    /// Whether `token` may access the reporting service.
    pub fn token_allowed(&self, token: Option<&str>) -> bool {
        if !self.require_token {
            return true;
        }
        token.is_some_and(|t| self.tokens.contains(t))
    }

    /// Check a password login. Returns false for unknown users.
    pub fn check_password(
        &self,
        name: &str,
        password: &str,
        domain: &str,
        project: &str,
        project_domain: &str,
    ) -> bool {
        self.users.get(name).is_some_and(|user| {
            user.password == password
                && user.domain == domain
                && user.project == project
                && user.project_domain == project_domain
        })
    }

    /// Issue a new token and remember it.
    pub fn issue_token(&mut self) -> String {
        let token = format!("mock-token-{}", self.tokens.len() + 1);
        self.tokens.insert(token.clone());
        token
    }

    /// Rows of `report` whose values match every filter.
    ///
    /// A string value matches on equality; any other value matches on its
    /// JSON text.
    pub fn query_report(
        &self,
        report: &str,
        filters: &HashMap<String, String>,
    ) -> Option<Vec<ReportRow>> {
        let rows = self.report_data.get(report)?;
        Some(
            rows.iter()
                .filter(|row| {
                    filters.iter().all(|(key, expected)| match row.get(key) {
                        Some(serde_json::Value::String(s)) => s == expected,
                        Some(other) => other.to_string() == *expected,
                        None => false,
                    })
                })
                .cloned()
                .collect(),
        )
    }
}
