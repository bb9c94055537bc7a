//! HTTP request handlers for the mock server.

pub mod identity;
pub mod reporting;

pub use identity::*;
pub use reporting::*;
