//! Keystone service catalog.

use serde::{Deserialize, Serialize};

/// One service in the catalog returned with a Keystone token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Service type, e.g. `"reporting"` or `"identity"`.
    #[serde(rename = "type")]
    pub service_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

/// An endpoint of a catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEndpoint {
    /// `public`, `internal` or `admin`.
    pub interface: String,

    pub url: String,

    #[serde(default)]
    pub region: Option<String>,
}

/// Find the URL of `service_type` for `interface` in `catalog`.
///
/// The first matching service and endpoint win. `interface` also matches the
/// v2-style `<interface>URL` spelling.
pub(crate) fn find_endpoint<'a>(
    catalog: &'a [CatalogEntry],
    service_type: &str,
    interface: &str,
) -> Option<&'a str> {
    let legacy = format!("{interface}URL");
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|endpoint| endpoint.interface == interface || endpoint.interface == legacy)
        .map(|endpoint| endpoint.url.as_str())
}
