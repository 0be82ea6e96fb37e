// src/resolver/scan.rs
// =============================================================================
// This module finds every http(s) URL in a block of text.
//
// Unlike the HTML/markdown link extractors you'd normally reach for, we don't
// parse the document at all. Email bodies are half HTML, half plain text, and
// the report link can hide in an href, in prose, or in a comment. So we scan
// the raw characters:
//
//   https?://  followed by one or more characters that are not
//              whitespace, ", ', < or >
//
// Results come back in document order. Duplicates are kept: callers pick the
// *first* URL that matches some condition, so order matters, uniqueness doesn't.
//
// Rust concepts:
// - Implementing Iterator for our own struct
// - Lifetimes: the URLs we yield borrow from the input text ('a)
// =============================================================================

use super::grammar;

// A single pass over the text, yielding URLs as it finds them.
//
// Each call to next() resumes where the last URL ended.
pub struct UrlScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> UrlScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for UrlScanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            let at = self.pos;

            // Only an 'h' can start a scheme
            if bytes[at].eq_ignore_ascii_case(&b'h') {
                if let Some(url) = grammar::url_at(self.text, at) {
                    self.pos = at + url.len();
                    return Some(url);
                }
            }

            self.pos += 1;
        }

        None
    }
}

// Extracts all http(s) URLs from text, in order of appearance
//
// Example:
//   "See https://a.example/x and <https://b.example>"
//   -> ["https://a.example/x", "https://b.example"]
pub fn extract_all_urls(text: &str) -> Vec<&str> {
    UrlScanner::new(text).collect()
}

// First URL whose raw text contains `needle` (case-sensitive)
pub fn find_first_url_containing<'a>(text: &'a str, needle: &str) -> Option<&'a str> {
    UrlScanner::new(text).find(|url| url.contains(needle))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return &str instead of String?
//    - Every URL is a slice of the input text, so no copying is needed
//    - The lifetime 'a says "these slices live as long as the text does"
//
// 2. Why implement Iterator instead of returning a Vec?
//    - Callers usually want the *first* URL that matches something
//    - .find() on an iterator stops scanning as soon as it has an answer
//    - extract_all_urls() is still there when you need everything
//
// 3. Why byte positions?
//    - "http" is ASCII, so a match can only start on an ASCII byte, and
//      slicing there always lands on a character boundary
// -----------------------------------------------------------------------------
