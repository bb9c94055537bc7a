//! Mock identity and Reporting API server for E2E testing.
//!
//! This module provides an in-memory mock server that plays both the
//! Keystone identity service and the Reporting API. Unlike wiremock which
//! mocks at the HTTP level per-test, this server issues real tokens, checks
//! them on every reporting request, and counts hits per path, enabling
//! realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use reportingclient::mock_server::MockServer;
//! use reportingclient::{KeystonePassword, PasswordCredential, ReportingClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let credential = server.password_credential();
//!     let auth = KeystonePassword::authenticate(&credential, None).await.unwrap();
//!     let mut client = ReportingClient::new(auth).unwrap();
//!
//!     // Server comes with default fixtures
//!     let rows = client.fetch("hypervisor", &Default::default()).await.unwrap();
//!     assert!(!rows.is_empty());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, MockUser};
