//! Report descriptor and report data types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use super::LINK_SELF;

/// A report the server can produce.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report name, used to select it on the command line.
    pub name: String,

    /// Human-readable description.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,

    /// When the report data was last refreshed, as sent by the server.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub last_updated: String,

    /// Link type to URL. `"self"` is where the report data is served.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl Report {
    /// The URL the report data is served from.
    pub fn self_link(&self) -> Option<&str> {
        self.links.get(LINK_SELF).map(String::as_str)
    }
}

/// One record of report data: column name to value.
///
/// The column set is not fixed; it is whatever the server returns.
pub type ReportRow = serde_json::Map<String, serde_json::Value>;

/// A decoded report: records in server order.
pub type ReportData = Vec<ReportRow>;

/// Filter parameters passed to a report fetch as `key=value` query pairs.
pub type FilterParams = BTreeMap<String, String>;
