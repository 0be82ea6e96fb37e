// src/resolver/unwrap.rs
// =============================================================================
// This module unwraps redirect / click-tracking links.
//
// Mail gateways and trackers rewrite every link in a message so it points to
// their own server, with the real destination tucked into a query parameter:
//
//   https://eur01.safelinks.protection.outlook.com/?url=https%3A%2F%2Freal...
//   https://www.google.com/url?q=https://real...
//
// We don't keep a list of such services. Any link carrying a non-empty `url`
// (checked first) or `q` parameter is treated as a wrapper.
//
// Some gateways encode the destination twice ("https%253A%252F%252F..."), so
// if one decode still leaves "https%3A%2F%2F" at the front we decode again.
// =============================================================================

use tracing::debug;

use super::grammar::{self, percent_decode, trim_trailing_punctuation};
use super::query::get_query_param;

// Query parameters that carry the wrapped destination, in priority order
const WRAPPER_PARAMS: [&str; 2] = ["url", "q"];

// If `url` is a wrapper, returns the destination it points to.
// Otherwise returns `url` with trailing punctuation removed.
//
// Decoding is best effort: a value that fails to decode is returned as-is.
//
// Example:
//   "https://w.example/?url=https%3A%2F%2Freal.example%2Fx"
//   -> "https://real.example/x"
pub fn extract_direct_url(url: &str) -> String {
    let url = trim_trailing_punctuation(url);

    let wrapped = WRAPPER_PARAMS
        .iter()
        .find_map(|name| get_query_param(url, name).filter(|value| !value.is_empty()));

    let Some(raw) = wrapped else {
        return url.to_string();
    };

    let mut inner = percent_decode(raw).into_string();
    if is_still_encoded(&inner) {
        inner = percent_decode(&inner).into_string();
    }

    debug!(wrapper = %url, destination = %inner, "unwrapped redirect link");
    inner
}

// "https%3A%2F%2F..." or "http%3A%2F%2F...", any case
fn is_still_encoded(value: &str) -> bool {
    grammar::starts_with_ignore_case(value, 0, "https%3A%2F%2F")
        || grammar::starts_with_ignore_case(value, 0, "http%3A%2F%2F")
}
