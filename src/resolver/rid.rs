// src/resolver/rid.rs
// =============================================================================
// This module pulls the tracking identifier (rid) out of a message.
//
// Two questions, two functions:
// - extract_rid_from_text: what is the rid? We look at the whole text, not
//   only at recognized URLs, because some templates print the token in plain
//   text ("Reference: rid=ab12").
// - find_first_url_containing_rid: which link carries a rid? Used to learn the
//   campaign server's host when no direct report link exists.
// =============================================================================

use super::grammar::{self, percent_decode, trim_trailing_punctuation};
use super::scan::UrlScanner;

const RID_PARAM: &str = "rid=";

// Returns the first rid token in `text`, decoded and trimmed.
//
// The token is the run of characters after "rid=" (any case, on a word
// boundary) up to the next '&', quote, angle bracket, space, tab or newline.
// Trailing punctuation is dropped, then the value is percent-decoded
// (best effort) and trimmed.
//
// Returns None if no token has at least one ASCII letter or digit.
//
// Example:
//   "Ref: rid=AB%2012." -> Some("AB 12")
pub fn extract_rid_from_text(text: &str) -> Option<String> {
    let raw = trim_trailing_punctuation(find_rid_token(text)?);
    let decoded = percent_decode(raw).into_string();
    let rid = grammar::trim_space(&decoded);

    if rid.chars().any(|c| c.is_ascii_alphanumeric()) {
        Some(rid.to_string())
    } else {
        None
    }
}

// First non-empty run after a "rid=" occurrence
fn find_rid_token(text: &str) -> Option<&str> {
    (0..text.len())
        .filter(|&at| {
            grammar::starts_with_ignore_case(text, at, RID_PARAM)
                && grammar::word_boundary_before(text, at)
        })
        .find_map(|at| {
            let rest = &text[at + RID_PARAM.len()..];
            let len = rest.find(is_rid_terminator).unwrap_or(rest.len());
            (len > 0).then(|| &rest[..len])
        })
}

fn is_rid_terminator(c: char) -> bool {
    matches!(c, '&' | '"' | '\'' | '<' | '>' | ' ' | '\n' | '\r' | '\t')
}

// Does this URL mention "rid=" right after a non-word character?
//
// This is a substring test on purpose: "/rid=5/x" in a path counts too.
// Unlike the text search above it is case-sensitive.
pub fn contains_rid_param(url: &str) -> bool {
    url.match_indices(RID_PARAM)
        .any(|(at, _)| grammar::word_boundary_before(url, at))
}

// First URL in `text` that carries a rid
pub fn find_first_url_containing_rid(text: &str) -> Option<&str> {
    UrlScanner::new(text).find(|url| contains_rid_param(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rid_from_link() {
        let text = r#"<a href="https://ex.com/track?rid=TOKEN123&x=1">"#;
        assert_eq!(extract_rid_from_text(text), Some("TOKEN123".to_string()));
    }

    #[test]
    fn test_rid_from_plain_text() {
        assert_eq!(
            extract_rid_from_text("Click here rid=TOKEN123 at https://real.example/track"),
            Some("TOKEN123".to_string())
        );
    }

    #[test]
    fn test_rid_drops_zero_width_space() {
        assert_eq!(extract_rid_from_text("rid=abc\u{feff}"), Some("abc".to_string()));
    }

    #[test]
    fn test_rid_is_case_insensitive() {
        assert_eq!(extract_rid_from_text("RID=Abc"), Some("Abc".to_string()));
    }

    #[test]
    fn test_rid_trims_punctuation_and_decodes() {
        assert_eq!(extract_rid_from_text("(rid=ab%2Dcd)."), Some("ab-cd".to_string()));
        assert_eq!(extract_rid_from_text("rid=%20xy%20\n"), Some("xy".to_string()));
    }

    #[test]
    fn test_rid_keeps_raw_on_bad_encoding() {
        assert_eq!(extract_rid_from_text("rid=50%zz"), Some("50%zz".to_string()));
    }

    #[test]
    fn test_rid_needs_word_boundary() {
        assert_eq!(extract_rid_from_text("grid=abc"), None);
        assert_eq!(extract_rid_from_text("grid=abc ?rid=def"), Some("def".to_string()));
    }

    #[test]
    fn test_rid_skips_empty_occurrence() {
        assert_eq!(extract_rid_from_text("rid=&other rid=real"), Some("real".to_string()));
    }

    #[test]
    fn test_rid_without_alphanumerics_is_rejected() {
        assert_eq!(extract_rid_from_text("rid=%2D%2D"), None);
        assert_eq!(extract_rid_from_text("rid=..."), None);
        assert_eq!(extract_rid_from_text(""), None);
    }

    #[test]
    fn test_contains_rid_param() {
        assert!(contains_rid_param("https://a.example/x?rid=1"));
        assert!(contains_rid_param("https://a.example/x?a=1&rid=1"));
        assert!(contains_rid_param("https://a.example/rid=1/path"));
        assert!(!contains_rid_param("https://a.example/x?grid=1"));
        assert!(!contains_rid_param("https://a.example/x?RID=1"));
    }

    #[test]
    fn test_find_first_url_containing_rid() {
        let text = "https://a.example/x?grid=1 then https://b.example/t?rid=2 and https://c.example/?rid=3";
        assert_eq!(find_first_url_containing_rid(text), Some("https://b.example/t?rid=2"));
        assert_eq!(find_first_url_containing_rid("no links here rid=5"), None);
    }
}
