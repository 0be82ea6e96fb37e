// src/report/flow.rs
// =============================================================================
// The whole "report this message" action, minus the host.
//
//   body text -> resolver -> report endpoint -> notification
//
// The host adapter (main.rs) reads the body and shows the notification;
// everything between lives here so it can be tested without a terminal.
// =============================================================================

use reqwest::Client;
use tracing::{info, warn};

use super::http::hit_report_endpoint;
use crate::error::ReportError;
use crate::notify::Notification;
use crate::resolver::{Resolution, Resolver};

// Reports one message and says what to tell the user.
//
// Parameters:
//   client: HTTP client for the report call
//   resolver: finds the report URL
//   combined_body: HTML body + "\n" + text body, or None if neither was readable
pub async fn run_report(
    client: &Client,
    resolver: &Resolver,
    combined_body: Option<&str>,
) -> Notification {
    match report_message(client, resolver, combined_body).await {
        Ok((resolution, code)) => {
            info!(url = %resolution.url, tier = %resolution.tier, code, "message reported");
            Notification::Reported
        }
        Err(e) => {
            warn!(error = %e, "message was not reported");
            Notification::from_error(&e)
        }
    }
}

async fn report_message(
    client: &Client,
    resolver: &Resolver,
    combined_body: Option<&str>,
) -> Result<(Resolution, u16), ReportError> {
    let body = combined_body.ok_or(ReportError::NoBody)?;
    let resolution = resolver.resolve(body).ok_or(ReportError::Unresolved)?;
    let code = hit_report_endpoint(client, &resolution.url)
        .await
        .into_result()?;
    Ok((resolution, code))
}

#[cfg(test)]
mod tests {
    use super::super::http::test_server::{closed_addr, serve_once};
    use super::super::http::{build_client, ReportConfig};
    use super::*;

    fn client() -> Client {
        build_client(&ReportConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_reported() {
        let (addr, server) = serve_once("204 No Content").await;
        let body = format!(
            "<p>Quarterly bonus!</p>\nBRIXEON_REPORT_URL:http://{}/report?rid=R42",
            addr
        );

        let notification = run_report(&client(), &Resolver::default(), Some(&body)).await;
        assert_eq!(notification, Notification::Reported);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /report?rid=R42 "));
    }

    #[tokio::test]
    async fn test_rid_fallback_is_reported() {
        let (addr, server) = serve_once("200 OK").await;
        let body = format!("<a href=\"http://{}/click?rid=T%2B1\">Open</a>\n", addr);

        let notification = run_report(&client(), &Resolver::default(), Some(&body)).await;
        assert_eq!(notification, Notification::Reported);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /report?rid=T%2B1 "));
    }

    #[tokio::test]
    async fn test_no_body() {
        let notification = run_report(&client(), &Resolver::default(), None).await;
        assert_eq!(notification, Notification::NoBody);
    }

    #[tokio::test]
    async fn test_no_report_link() {
        let notification = run_report(
            &client(),
            &Resolver::default(),
            Some("<p>Lunch on Friday?</p>\nLunch on Friday?"),
        )
        .await;
        assert_eq!(notification, Notification::NoReportLink);
    }

    #[tokio::test]
    async fn test_rejected() {
        let (addr, server) = serve_once("404 Not Found").await;
        let body = format!("http://{}/report?rid=gone", addr);

        let notification = run_report(&client(), &Resolver::default(), Some(&body)).await;
        assert_eq!(notification, Notification::ReportFailed { code: 404 });
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable() {
        let addr = closed_addr().await;
        let body = format!("http://{}/report?rid=nobody-home", addr);

        let notification = run_report(&client(), &Resolver::default(), Some(&body)).await;
        assert_eq!(notification, Notification::ReportFailed { code: 0 });
    }
}
