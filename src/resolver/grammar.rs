// src/resolver/grammar.rs
// =============================================================================
// The small grammar shared by every extractor in the resolver.
//
// Email bodies are messy: HTML attributes, prose, quoted-printable leftovers.
// Instead of one big regular expression per extractor, we keep a handful of
// tiny, explicit building blocks here:
// - recognizing an http(s) scheme at a byte position
// - the URL character class (anything except whitespace, quotes, < and >)
// - word boundaries (so "grid=1" is not mistaken for "rid=1")
// - trailing punctuation picked up from surrounding prose
// - best-effort percent decoding / encodeURIComponent-style encoding
//
// Rust concepts:
// - &str slicing with byte offsets (only ever at ASCII positions)
// - Enums carrying data: Decoded vs Raw
// - const AsciiSet built at compile time
// =============================================================================

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Characters that prose tends to glue onto the end of a link:
// "see https://example.com/report?rid=1)." -> ")." is not part of the URL
pub const TRAILING_PUNCTUATION: &[char] = &[')', ']', '.', ',', ';'];

// Characters left alone by JavaScript's encodeURIComponent.
// Report endpoints are usually written against that behaviour, so we match it.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Result of a best-effort percent decode.
///
/// Malformed input is not an error for us: the caller just keeps the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// Every escape was well formed and the bytes were valid UTF-8
    Decoded(String),
    /// Decoding failed, this is the untouched input
    Raw(&'a str),
}

impl Decoded<'_> {
    /// The decoded text, or the raw input when decoding failed
    pub fn into_string(self) -> String {
        match self {
            Decoded::Decoded(value) => value,
            Decoded::Raw(raw) => raw.to_string(),
        }
    }
}

// Percent-decodes `raw`, falling back to the raw text when it can't.
//
// Two things make decoding fail:
// - a '%' that is not followed by two hex digits ("100%", "%zz")
// - escapes that decode to invalid UTF-8 ("%FF")
//
// Example:
//   "https%3A%2F%2Fexample.com" -> Decoded("https://example.com")
//   "50%off"                    -> Raw("50%off")
pub fn percent_decode(raw: &str) -> Decoded<'_> {
    if !has_well_formed_escapes(raw) {
        return Decoded::Raw(raw);
    }

    match percent_decode_str(raw).decode_utf8() {
        Ok(value) => Decoded::Decoded(value.into_owned()),
        Err(_) => Decoded::Raw(raw),
    }
}

// The percent_encoding crate passes bad escapes through silently.
// We want to know about them, so check first.
fn has_well_formed_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }

    true
}

// Encodes a value for use inside a query string, like encodeURIComponent
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

// Removes ")", "]", ".", "," and ";" from the end of a string
pub fn trim_trailing_punctuation(value: &str) -> &str {
    value.trim_end_matches(TRAILING_PUNCTUATION)
}

// Does `text` contain `needle` at byte offset `at`, ignoring ASCII case?
//
// Returns false (instead of panicking) when `at` runs past the end.
pub fn starts_with_ignore_case(text: &str, at: usize, needle: &str) -> bool {
    text.as_bytes()
        .get(at..at + needle.len())
        .map_or(false, |window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

// Case-insensitive substring search for an ASCII needle
pub fn contains_ignore_case(text: &str, needle: &str) -> bool {
    (0..text.len()).any(|at| starts_with_ignore_case(text, at, needle))
}

// Length of the "http://" or "https://" prefix at `at`, if there is one
pub fn scheme_len_at(text: &str, at: usize) -> Option<usize> {
    if starts_with_ignore_case(text, at, "https://") {
        Some("https://".len())
    } else if starts_with_ignore_case(text, at, "http://") {
        Some("http://".len())
    } else {
        None
    }
}

// Whitespace as mail bodies use it: Unicode White_Space minus NEL (U+0085),
// plus the zero-width no-break space (U+FEFF) that HTML mail is full of.
pub fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

// `str::trim` with is_space() as the whitespace class
pub fn trim_space(value: &str) -> &str {
    value.trim_matches(is_space)
}

// A URL ends at the first whitespace, quote or angle bracket
pub fn is_url_char(c: char) -> bool {
    !is_space(c) && !matches!(c, '"' | '\'' | '<' | '>')
}

// Reads one URL starting exactly at byte offset `at`.
//
// Grammar: http(s):// followed by one or more URL characters.
// `at` must point at an ASCII character (we only call this on an 'h').
//
// Returns None if there is no scheme at `at`, or nothing follows it.
pub fn url_at(text: &str, at: usize) -> Option<&str> {
    let scheme_len = scheme_len_at(text, at)?;
    let rest = &text[at + scheme_len..];

    let body_len = rest
        .char_indices()
        .find(|(_, c)| !is_url_char(*c))
        .map_or(rest.len(), |(i, _)| i);

    if body_len == 0 {
        return None;
    }

    Some(&text[at..at + scheme_len + body_len])
}

// Word characters, in the regex sense: [A-Za-z0-9_]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// Is there a word boundary just before byte offset `at`?
//
// Only valid when the character at `at` is itself a word character,
// which holds for every keyword we look for ("rid=", marker keys).
pub fn word_boundary_before(text: &str, at: usize) -> bool {
    at == 0 || !is_word_byte(text.as_bytes()[at - 1])
}
