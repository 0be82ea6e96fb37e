// src/resolver/query.rs
// =============================================================================
// Reads one parameter out of a URL's query string.
//
// Why not url::Url::query_pairs()?
// - It decodes values for us, and the unwrapper needs the raw value so it can
//   decide for itself how many times to decode
// - Links scraped from emails are often not valid URLs at all (stray
//   characters, half-encoded hosts), and we still want their parameters
//
// So this is a plain string split: first '?', then '&', then the first '='.
// =============================================================================

// Returns the raw (still percent-encoded) value of the first parameter
// named `name`, compared case-insensitively.
//
// Everything after the first '=' belongs to the value, so
// "?url=https://x/?a=b" gives "https://x/?a=b".
// Pairs without an '=' are skipped.
//
// Returns None if there is no query string or no such parameter.
pub fn get_query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let wanted = name.to_lowercase();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.to_lowercase() == wanted)
        .map(|(_, value)| value)
}
