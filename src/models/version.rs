//! API version descriptor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One version of the Reporting API, as advertised at the endpoint root.
///
/// The server describes where each resource lives through `links`, keyed
/// by link type (e.g. `"reports"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Version identifier (e.g. `"v1"`).
    pub id: String,

    /// Link type to URL.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl Version {
    /// The URL advertised for `link_type`, if this version has one.
    pub fn link(&self, link_type: &str) -> Option<&str> {
        self.links.get(link_type).map(String::as_str)
    }

    /// Whether this version advertises `link_type`.
    pub fn has_link(&self, link_type: &str) -> bool {
        self.links.contains_key(link_type)
    }
}
