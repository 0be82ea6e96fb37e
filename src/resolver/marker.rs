// src/resolver/marker.rs
// =============================================================================
// This module finds the explicit report-URL marker in a message.
//
// Template authors can skip all the guessing by writing the report link out:
//
//   BRIXEON_REPORT_URL:https://phish.example/report?rid={{.RId}}
//   BRIXEON_REPORT_URL = "https://phish.example/report?rid={{.RId}}"
//
// Accepted shapes:
// - the key, case-insensitive, not glued to a preceding word character
// - optional whitespace, then ':' or '=', then optional whitespace
// - an optional ' or " quote
// - an http(s) URL running up to the next quote, whitespace or angle bracket
// - the same closing quote, if one was opened
//
// The colon form is searched across the whole text before the equals form.
// =============================================================================

use super::grammar;

/// Key recognized when none is configured
pub const DEFAULT_MARKER_KEY: &str = "BRIXEON_REPORT_URL";

#[derive(Debug, Clone, Copy)]
enum Separator {
    Colon,
    Equals,
}

impl Separator {
    fn as_char(self) -> char {
        match self {
            Separator::Colon => ':',
            Separator::Equals => '=',
        }
    }
}

// Colon first: it can't be confused with a query-string assignment
const SEPARATORS: [Separator; 2] = [Separator::Colon, Separator::Equals];

// Returns the URL named by the first `key:` marker, else the first `key=` one.
//
// Parameters:
//   text: the message text to search
//   key: the marker keyword (must start with a letter, digit or '_')
pub fn extract_marker_url<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    if key.is_empty() {
        return None;
    }

    SEPARATORS
        .iter()
        .find_map(|&separator| find_marker(text, key, separator))
}

fn find_marker<'a>(text: &'a str, key: &str, separator: Separator) -> Option<&'a str> {
    (0..text.len())
        .filter(|&at| {
            grammar::starts_with_ignore_case(text, at, key) && grammar::word_boundary_before(text, at)
        })
        .find_map(|at| marker_url_after(&text[at + key.len()..], separator))
}

// Parses `<ws> sep <ws> [quote] URL [same quote]` at the start of `rest`
fn marker_url_after(rest: &str, separator: Separator) -> Option<&str> {
    let rest = rest.trim_start_matches(grammar::is_space);
    let rest = rest
        .strip_prefix(separator.as_char())?
        .trim_start_matches(grammar::is_space);

    let (quote, rest) = match rest.chars().next() {
        Some(q @ ('"' | '\'')) => (Some(q), &rest[1..]),
        _ => (None, rest),
    };

    let url = grammar::url_at(rest, 0)?;

    match quote {
        Some(q) if !rest[url.len()..].starts_with(q) => None,
        _ => Some(url),
    }
}
