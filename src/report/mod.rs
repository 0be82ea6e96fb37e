// src/report/mod.rs
// =============================================================================
// This module sends the report to the campaign server.
//
// Submodules:
// - http: the GET request to the report endpoint
// - flow: resolve + request + pick a notification, in one call
// =============================================================================

mod flow;
mod http;

pub use flow::run_report;
pub use http::{build_client, ReportConfig};
