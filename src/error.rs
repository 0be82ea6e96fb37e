// src/error.rs
// =============================================================================
// The ways reporting a message can fail.
//
// Each variant maps to exactly one message shown to the user (see notify.rs).
// Truly unexpected problems (can't build an HTTP client, can't write JSON)
// don't live here; they travel as anyhow::Error up to main.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Neither the HTML nor the text body could be read
    #[error("message body could not be read")]
    NoBody,

    /// The resolver found no report URL in the body
    #[error("no report link found in message body")]
    Unresolved,

    /// The endpoint answered, but not with 200, 204 or 302
    #[error("report endpoint answered with HTTP {code}")]
    Rejected { code: u16 },

    /// The request never got an answer (DNS, TLS, timeout, refused...)
    #[error("report request failed: {message}")]
    Transport { message: String },
}

impl ReportError {
    // Status code shown to the user; 0 when there was no HTTP answer
    pub fn code(&self) -> u16 {
        match self {
            ReportError::Rejected { code } => *code,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ReportError::Rejected { code: 500 }.code(), 500);
        assert_eq!(
            ReportError::Transport { message: "refused".to_string() }.code(),
            0
        );
        assert_eq!(ReportError::Unresolved.code(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ReportError::Rejected { code: 404 }.to_string(),
            "report endpoint answered with HTTP 404"
        );
    }
}
