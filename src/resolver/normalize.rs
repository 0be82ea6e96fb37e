// src/resolver/normalize.rs
// =============================================================================
// This module cleans up a candidate report URL and checks its shape.
//
// A report URL is anything that:
// - starts with http:// or https://
// - contains "/report?rid=" (any case)
//
// That's deliberately all we check. We don't know the campaign server's
// domain, and we don't try to judge whether it is trustworthy.
//
// Rust concepts:
// - Newtype pattern: ReportUrl can only be built by this module, so holding
//   one means the shape check already passed
// - Peekable iterators for run-length processing
// =============================================================================

use std::fmt;

use serde::Serialize;

use super::grammar::{self, encode_uri_component, trim_trailing_punctuation};
use super::unwrap::extract_direct_url;

/// The path + parameter every report endpoint has
pub const REPORT_PATH: &str = "/report?rid=";

/// A validated report endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportUrl(String);

impl ReportUrl {
    // Builds `<base>/report?rid=<encoded rid>`.
    //
    // `base` comes from base_url(), so it already starts with a scheme and a
    // host, and the result has the report shape by construction.
    pub(crate) fn from_base_and_rid(base: &str, rid: &str) -> Self {
        ReportUrl(format!(
            "{}{}{}",
            base.trim_end_matches('/'),
            REPORT_PATH,
            encode_uri_component(rid)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Normalizes + validates a candidate report URL.
//
// Steps:
// 1. trim whitespace
// 2. unwrap redirect wrappers and strip trailing punctuation, repeated until
//    nothing changes (wrappers nest, e.g. Safe Links around a Google redirect)
// 3. collapse "//" runs into "/", keeping exactly "//" after "scheme:"
// 4. check the shape
//
// Running it on its own output gives the same output back.
//
// Returns None if the result is not a report URL.
pub fn normalize_report_url(candidate: &str) -> Option<ReportUrl> {
    let mut url = grammar::trim_space(candidate).to_string();
    if url.is_empty() {
        return None;
    }

    // Every change makes the value strictly shorter, so this ends
    loop {
        let direct = extract_direct_url(&url);
        let next = trim_trailing_punctuation(grammar::trim_space(&direct)).to_string();
        if next == url {
            break;
        }
        url = next;
    }

    let url = collapse_duplicate_slashes(&url);

    if !has_scheme_and_rest(&url) || !grammar::contains_ignore_case(&url, REPORT_PATH) {
        return None;
    }

    Some(ReportUrl(url))
}

// Replaces every run of 2+ slashes with a single slash. A run at the very
// start or right after a ':' is the "https://" separator: it keeps its first
// two slashes and loses the rest.
//
// Example:
//   "https://ex.com//report?rid=1" -> "https://ex.com/report?rid=1"
//   "https:////ex.com/report"      -> "https://ex.com/report"
fn collapse_duplicate_slashes(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut prev: Option<char> = None;
    let mut chars = url.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '/' {
            let mut run = 1;
            while chars.next_if_eq(&'/').is_some() {
                run += 1;
            }

            let after_separator = prev.map_or(true, |p| p == ':');
            let keep = if after_separator { run.min(2) } else { 1 };
            out.extend(std::iter::repeat('/').take(keep));
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

// "http(s)://" plus at least one more character on the same line
fn has_scheme_and_rest(url: &str) -> bool {
    let Some(scheme_len) = grammar::scheme_len_at(url, 0) else {
        return false;
    };

    url[scheme_len..]
        .chars()
        .next()
        .map_or(false, |c| !matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
}

// Extracts the "scheme://host[:port]" prefix of a URL
//
// Example:
//   "https://ex.com:8443/track?rid=1" -> Some("https://ex.com:8443")
//   "mailto:x@ex.com"                 -> None
pub fn base_url(url: &str) -> Option<&str> {
    let scheme_len = grammar::scheme_len_at(url, 0)?;
    let rest = &url[scheme_len..];
    let host_len = rest.find('/').unwrap_or(rest.len());

    if host_len == 0 {
        return None;
    }

    Some(&url[..scheme_len + host_len])
}
