//! Reporting API model types.

mod report;
mod version;

pub use report::*;
pub use version::*;

/// Link type naming the report collection of an API version.
pub const LINK_REPORTS: &str = "reports";

/// Link type naming a resource's own URL.
pub const LINK_SELF: &str = "self";
