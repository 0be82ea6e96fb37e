// src/notify.rs
// =============================================================================
// The short, transient message the user sees after pressing "report".
//
// In a mail client this would be a toast on the open message; on the command
// line we print it (or a JSON object with --json). Every notification carries
// the same fixed key, so a host that supports replacing notifications shows
// only the latest one.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::error::ReportError;

/// Identifier every notification is keyed by
pub const NOTIFICATION_KEY: &str = "brixeonReport";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// The report endpoint accepted the report
    Reported,
    /// No body text could be read
    NoBody,
    /// No report URL could be resolved
    NoReportLink,
    /// The endpoint refused or could not be reached (code 0)
    ReportFailed { code: u16 },
    /// Something went wrong that we didn't plan for
    Unexpected,
}

impl Notification {
    pub fn from_error(error: &ReportError) -> Self {
        match error {
            ReportError::NoBody => Notification::NoBody,
            ReportError::Unresolved => Notification::NoReportLink,
            ReportError::Rejected { .. } | ReportError::Transport { .. } => {
                Notification::ReportFailed { code: error.code() }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Reported)
    }

    // The human-readable text
    pub fn message(&self) -> String {
        match self {
            Notification::Reported => {
                "Reported. Thanks for helping keep your organization safe. ✅".to_string()
            }
            Notification::NoBody => "We couldn’t read this message body.".to_string(),
            Notification::NoReportLink => "We couldn’t find a report link in this message. \
                 Ask your admin to add the BRIXEON_REPORT_URL marker to the email template."
                .to_string(),
            Notification::ReportFailed { code } => format!(
                "Report failed ({}). Please try again, or contact your administrator.",
                code
            ),
            Notification::Unexpected => "Report failed. Check add-in logs.".to_string(),
        }
    }
}

// What --json prints
#[derive(Debug, Serialize)]
struct NotificationOutput<'a> {
    key: &'static str,
    #[serde(flatten)]
    notification: &'a Notification,
    message: String,
    persistent: bool,
}

// Shows a notification on stdout, as text or JSON
pub fn show_notification(notification: &Notification, json: bool) -> Result<()> {
    if json {
        let output = NotificationOutput {
            key: NOTIFICATION_KEY,
            notification,
            message: notification.message(),
            persistent: false,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", notification.message());
    }
    Ok(())
}
