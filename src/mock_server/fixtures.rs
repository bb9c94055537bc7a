//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::BTreeMap;

use serde_json::json;

use crate::{Report, ReportData, Version, LINK_REPORTS, LINK_SELF};

/// Default user accepted by the mock identity service.
pub const DEFAULT_USER: &str = "alice";
/// Password of [`DEFAULT_USER`].
pub const DEFAULT_PASSWORD: &str = "s3cret";
/// Project [`DEFAULT_USER`] may scope to.
pub const DEFAULT_PROJECT: &str = "reporting";

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// A complete data set for the default mock server.
pub struct DefaultScenario {
    pub versions: Vec<Version>,
    pub reports: Vec<(Report, ReportData)>,
}

impl Fixtures {
    // =========================================================================
    // Version Fixtures
    // =========================================================================

    /// A version advertising the given links.
    pub fn version(id: &str, links: &[(&str, &str)]) -> Version {
        Version {
            id: id.to_string(),
            links: links
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// A version whose reports live under `/{id}/reports`.
    pub fn version_with_reports(id: &str) -> Version {
        let reports = format!("/{id}/reports");
        let this = format!("/{id}");
        Self::version(id, &[(LINK_REPORTS, &reports), (LINK_SELF, &this)])
    }

    // =========================================================================
    // Report Fixtures
    // =========================================================================

    /// A report served at `/v1/reports/{name}`.
    pub fn report(name: &str) -> Report {
        Report {
            name: name.to_string(),
            description: format!("{name} usage"),
            last_updated: "2016-05-01 00:00:00".to_string(),
            links: BTreeMap::from([(
                LINK_SELF.to_string(),
                format!("/v1/reports/{}", urlencoding::encode(name)),
            )]),
        }
    }

    /// Decode report rows from a JSON array literal.
    ///
    /// Panics if `value` is not an array of objects.
    pub fn rows(value: serde_json::Value) -> ReportData {
        serde_json::from_value(value).expect("fixture rows must be an array of objects")
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// The default scenario: one version and three reports, one of them empty.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            versions: vec![Self::version_with_reports("v1")],
            reports: vec![
                (
                    Self::report("hypervisor"),
                    Self::rows(json!([
                        { "hostname": "cn01", "availability_zone": "melbourne-qh2", "vcpus": 32, "memory_mb": 257_000 },
                        { "hostname": "cn02", "availability_zone": "melbourne-qh2", "vcpus": 32, "memory_mb": 257_000 },
                        { "hostname": "cn03", "availability_zone": "monash-01", "vcpus": 16, "memory_mb": 128_000 }
                    ])),
                ),
                (
                    Self::report("project"),
                    Self::rows(json!([
                        { "id": "p-1", "display_name": "Alpha, Inc.", "enabled": true, "quota_instances": 10 },
                        { "id": "p-2", "display_name": "Beta", "enabled": false, "quota_instances": null }
                    ])),
                ),
                (Self::report("volume"), Vec::new()),
            ],
        }
    }
}
