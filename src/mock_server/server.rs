//! Mock identity and Reporting API server.
//!
//! Provides an axum-based HTTP server that simulates Keystone and the Reporting API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{
    DefaultScenario, Fixtures, DEFAULT_PASSWORD, DEFAULT_PROJECT, DEFAULT_USER,
};
use super::handlers;
use super::state::MockState;
use crate::{PasswordCredential, DEFAULT_DOMAIN};

/// A mock identity + reporting server for testing.
///
/// The server runs in the background. The identity service lives under
/// `/identity/v3` and advertises the server's own root as the public
/// reporting endpoint.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(mut state: MockState) -> Self {
        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");
        let url = format!("http://{}", addr);

        state.reporting_url.get_or_insert_with(|| url.clone());
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url,
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server, which is also the reporting endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The Keystone v3 auth URL.
    pub fn auth_url(&self) -> String {
        format!("{}/identity/v3", self.url)
    }

    /// Credentials of the default fixture user.
    pub fn password_credential(&self) -> PasswordCredential {
        PasswordCredential {
            auth_url: self.auth_url(),
            username: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            project_name: DEFAULT_PROJECT.to_string(),
            user_domain_name: DEFAULT_DOMAIN.to_string(),
            project_domain_name: DEFAULT_DOMAIN.to_string(),
        }
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Number of requests the server has seen for `path`.
    pub async fn hits(&self, path: &str) -> usize {
        self.state.read().await.hits(path)
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new()
            .with_user(DEFAULT_USER, DEFAULT_PASSWORD, DEFAULT_PROJECT)
            .with_required_token();

        for version in scenario.versions {
            state = state.with_version(version);
        }

        for (report, rows) in scenario.reports {
            state = state.with_report(report, rows);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Identity routes
            .route("/identity/v3/auth/tokens", post(handlers::issue_token))
            // Reporting routes
            .route("/", get(handlers::list_versions))
            .route("/v1/reports", get(handlers::list_reports))
            .route("/v1/reports/:name", get(handlers::get_report))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
