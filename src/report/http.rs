// src/report/http.rs
// =============================================================================
// This module calls the campaign server's report endpoint.
//
// Key functionality:
// - One plain GET to the resolved /report?rid=... URL
// - No cookies, no credentials, redirects followed
// - 200, 204 and 302 count as "the server recorded the report"
// - Transport failures (timeout, DNS, TLS) are reported with code 0
//
// Rust concepts:
// - async/await: the request is network I/O
// - Builders: reqwest::Client::builder() for timeouts and redirect policy
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::ReportError;
use crate::resolver::ReportUrl;

/// Settings for the report call
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Give up on the request after this long
    pub timeout: Duration,
    /// Follow at most this many redirects
    pub max_redirects: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// What happened when we called the endpoint
#[derive(Debug, Clone)]
pub struct ReportHit {
    /// Did the server accept the report?
    pub ok: bool,
    /// HTTP status code, or 0 if no response arrived
    pub code: u16,
    /// Why the request failed, for transport errors
    pub error: Option<String>,
}

impl ReportHit {
    fn transport_failure(message: String) -> Self {
        ReportHit {
            ok: false,
            code: 0,
            error: Some(message),
        }
    }

    // Accepted -> Ok(status code); anything else -> the matching ReportError
    pub fn into_result(self) -> Result<u16, ReportError> {
        match (self.ok, self.error) {
            (true, _) => Ok(self.code),
            (false, Some(message)) => Err(ReportError::Transport { message }),
            (false, None) => Err(ReportError::Rejected { code: self.code }),
        }
    }
}

// Builds the HTTP client used for report calls
//
// reqwest keeps no cookie store unless asked, so nothing is sent along
// except the URL itself.
pub fn build_client(config: &ReportConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .context("failed to create HTTP client")
}

// Is this status one the report endpoint sends on success?
//
// Report endpoints typically answer 204; some answer 200 or redirect (302)
// to a landing page.
pub fn is_report_accepted(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::FOUND
    )
}

// Calls the report endpoint once.
//
// Never returns an error: failures are described by the ReportHit instead.
pub async fn hit_report_endpoint(client: &Client, url: &ReportUrl) -> ReportHit {
    // The resolver only checks the shape; reqwest wants a real URL
    let target = match Url::parse(url.as_str()) {
        Ok(target) => target,
        Err(e) => {
            warn!(%url, error = %e, "report url is not a valid URL");
            return ReportHit::transport_failure(format!("invalid URL: {}", e));
        }
    };

    match client.get(target).send().await {
        Ok(response) => {
            let status = response.status();
            debug!(%url, status = status.as_u16(), "report endpoint answered");
            ReportHit {
                ok: is_report_accepted(status),
                code: status.as_u16(),
                error: None,
            }
        }
        Err(e) => {
            let message = categorize_error(&e);
            warn!(%url, error = %e, "report request failed");
            ReportHit::transport_failure(message)
        }
    }
}

// Short description of a reqwest error
fn categorize_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        "Connection failed".to_string()
    } else {
        error.to_string()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does hit_report_endpoint return ReportHit instead of Result?
//    - A refused report is a normal outcome we show to the user, not a bug
//    - into_result() turns it into a Result when `?` is more convenient
//
// 2. Why is 302 a success if redirects are followed?
//    - A 302 without a Location header can't be followed, so reqwest
//      hands it back to us; the server did record the report
//
// 3. What is #[cfg(test)] on a module?
//    - The module is only compiled for `cargo test`
//    - test_server is shared by the tests here and in flow.rs
// -----------------------------------------------------------------------------
