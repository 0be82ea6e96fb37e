// src/resolver/resolve.rs
// =============================================================================
// The resolver: turns a message body into a report URL.
//
// Three strategies ("tiers"), tried in order, first success wins:
//
// 1. Marker       BRIXEON_REPORT_URL:<url> written into the template.
//                 An explicit directive beats any guess.
// 2. DirectLink   A link that already looks like .../report?rid=...
//                 (possibly hidden behind a redirect wrapper).
// 3. RidFallback  A rid token somewhere in the text, plus the host of any
//                 link carrying a rid, glued into <host>/report?rid=<rid>.
//
// Nothing here does I/O and nothing fails loudly: every dead end is None.
// =============================================================================

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::marker::{extract_marker_url, DEFAULT_MARKER_KEY};
use super::normalize::{base_url, normalize_report_url, ReportUrl, REPORT_PATH};
use super::rid::{extract_rid_from_text, find_first_url_containing_rid};
use super::scan::{find_first_url_containing, UrlScanner};
use super::unwrap::extract_direct_url;

/// One resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Explicit marker in the template
    Marker,
    /// A report link present in the body
    DirectLink,
    /// Built from a rid token and a rid-bearing link's host
    RidFallback,
}

impl Tier {
    /// The order tiers are attempted in
    pub const ORDER: [Tier; 3] = [Tier::Marker, Tier::DirectLink, Tier::RidFallback];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Marker => "marker",
            Tier::DirectLink => "direct link",
            Tier::RidFallback => "rid fallback",
        };
        f.write_str(name)
    }
}

/// A resolved report URL and the tier that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub url: ReportUrl,
    pub tier: Tier,
}

/// Resolver settings
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Keyword of the explicit marker (BRIXEON_REPORT_URL by default)
    pub marker_key: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            marker_key: DEFAULT_MARKER_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    // Resolves the report URL for one message.
    //
    // Parameters:
    //   combined_body: the HTML body, a newline, then the text body
    //
    // Returns: Some(Resolution) from the first tier that succeeds, else None
    pub fn resolve(&self, combined_body: &str) -> Option<Resolution> {
        Tier::ORDER.iter().find_map(|&tier| {
            let url = self.attempt(tier, combined_body);
            match &url {
                Some(url) => debug!(%tier, %url, "tier resolved report url"),
                None => debug!(%tier, "tier found nothing"),
            }
            url.map(|url| Resolution { url, tier })
        })
    }

    // Runs a single tier on its own
    pub fn attempt(&self, tier: Tier, combined_body: &str) -> Option<ReportUrl> {
        match tier {
            Tier::Marker => self.from_marker(combined_body),
            Tier::DirectLink => from_direct_link(combined_body),
            Tier::RidFallback => from_rid_and_base(combined_body),
        }
    }

    fn from_marker(&self, body: &str) -> Option<ReportUrl> {
        let marker = extract_marker_url(body, &self.config.marker_key)?;
        normalize_report_url(marker)
    }
}

// The first link whose raw text contains "/report?rid=". If none does, the
// first link whose unwrapped destination does: a Safe Links wrapper encodes
// the path, so the raw text never shows it.
fn from_direct_link(body: &str) -> Option<ReportUrl> {
    let direct = match find_first_url_containing(body, REPORT_PATH) {
        Some(link) => extract_direct_url(link),
        None => UrlScanner::new(body)
            .map(extract_direct_url)
            .find(|destination| destination.contains(REPORT_PATH))?,
    };

    normalize_report_url(&direct)
}

fn from_rid_and_base(body: &str) -> Option<ReportUrl> {
    let Some(rid) = extract_rid_from_text(body) else {
        debug!("no rid token in body");
        return None;
    };

    let Some(link) = find_first_url_containing_rid(body) else {
        debug!(%rid, "rid found but no link carries one");
        return None;
    };

    let direct = extract_direct_url(link);
    let Some(base) = base_url(&direct) else {
        debug!(link = %direct, "rid link has no usable base url");
        return None;
    };

    Some(ReportUrl::from_base_and_rid(base, &rid))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(body: &str) -> Option<String> {
        Resolver::default()
            .resolve(body)
            .map(|resolution| resolution.url.as_str().to_string())
    }

    fn resolve_tier(body: &str) -> Option<Tier> {
        Resolver::default().resolve(body).map(|resolution| resolution.tier)
    }

    #[test]
    fn test_marker_colon_form() {
        let body = "<p>Hello</p>\nBRIXEON_REPORT_URL:https://ex.com/report?rid=abc123";
        assert_eq!(resolve(body), Some("https://ex.com/report?rid=abc123".to_string()));
        assert_eq!(resolve_tier(body), Some(Tier::Marker));
    }

    #[test]
    fn test_marker_equals_form() {
        let body = "BRIXEON_REPORT_URL=https://ex.com/report?rid=abc123";
        assert_eq!(resolve(body), Some("https://ex.com/report?rid=abc123".to_string()));
    }

    #[test]
    fn test_marker_beats_other_report_links() {
        let body = "Report here: https://other.example/report?rid=zzz\n\
                    BRIXEON_REPORT_URL:https://ex.com/report?rid=abc123";
        assert_eq!(resolve(body), Some("https://ex.com/report?rid=abc123".to_string()));
    }

    #[test]
    fn test_invalid_marker_falls_through() {
        let body = "BRIXEON_REPORT_URL:https://ex.com/not-a-report\nhttps://real.example/report?rid=r1";
        assert_eq!(resolve(body), Some("https://real.example/report?rid=r1".to_string()));
        assert_eq!(resolve_tier(body), Some(Tier::DirectLink));
    }

    #[test]
    fn test_custom_marker_key() {
        let resolver = Resolver::new(ResolverConfig {
            marker_key: "ACME_REPORT".to_string(),
        });
        let body = "ACME_REPORT:https://acme.example/report?rid=1 https://other.example/report?rid=2";
        let resolution = resolver.resolve(body).expect("should resolve");
        assert_eq!(resolution.url.as_str(), "https://acme.example/report?rid=1");
        assert_eq!(resolution.tier, Tier::Marker);
    }

    #[test]
    fn test_direct_link_in_html() {
        let body = r#"<a href="https://ex.com/report?rid=abc123">Report phishing</a>"#;
        assert_eq!(resolve(body), Some("https://ex.com/report?rid=abc123".to_string()));
    }

    #[test]
    fn test_direct_link_with_trailing_punctuation() {
        let body = "\nPlease report it (https://ex.com/report?rid=abc123).";
        assert_eq!(resolve(body), Some("https://ex.com/report?rid=abc123".to_string()));
    }

    #[test]
    fn test_wrapped_link_only() {
        let body = "https://safelinks.example/?url=https%3A%2F%2Freal.example%2Freport%3Frid%3Dxyz";
        assert_eq!(resolve(body), Some("https://real.example/report?rid=xyz".to_string()));
        assert_eq!(resolve_tier(body), Some(Tier::DirectLink));
    }

    #[test]
    fn test_raw_report_link_beats_earlier_wrapped_one() {
        let body = "https://w.example/?url=https%3A%2F%2Fa.example%2Freport%3Frid%3D1 \
                    https://b.example/report?rid=2";
        assert_eq!(resolve(body), Some("https://b.example/report?rid=2".to_string()));
    }

    #[test]
    fn test_rid_fallback() {
        let body = "Click here rid=TOKEN123 at https://real.example/track?rid=TOKEN123";
        assert_eq!(
            resolve(body),
            Some("https://real.example/report?rid=TOKEN123".to_string())
        );
        assert_eq!(resolve_tier(body), Some(Tier::RidFallback));
    }

    #[test]
    fn test_rid_fallback_through_wrapper() {
        let body = "https://w.example/?url=https%3A%2F%2Fcampaign.example%3A8443%2Fopen%3Frid%3DR9&rid=R9";
        assert_eq!(
            resolve(body),
            Some("https://campaign.example:8443/report?rid=R9".to_string())
        );
    }

    #[test]
    fn test_rid_fallback_encodes_token() {
        let body = "rid=a%20b https://c.example/x?rid=whatever";
        assert_eq!(resolve(body), Some("https://c.example/report?rid=a%20b".to_string()));
    }

    #[test]
    fn test_rid_without_rid_link_is_unresolved() {
        assert_eq!(resolve("Click here rid=TOKEN123 at https://real.example/track"), None);
    }

    #[test]
    fn test_nothing_to_find() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("\n"), None);
        assert_eq!(resolve("Just a friendly note, see https://example.com"), None);
    }

    #[test]
    fn test_empty_input_every_tier() {
        let resolver = Resolver::default();
        for tier in Tier::ORDER {
            assert_eq!(resolver.attempt(tier, ""), None);
        }
    }

    #[test]
    fn test_resolved_urls_are_already_normalized() {
        let bodies = [
            "BRIXEON_REPORT_URL:'https://ex.com//report?rid=1'",
            "https://safelinks.example/?url=https%3A%2F%2Freal.example%2Freport%3Frid%3Dxyz",
            "(https://ex.com/report?rid=abc123).",
            "see https:///ex.com/report?rid=abc",
        ];

        for body in bodies {
            let url = resolve(body).expect("should resolve");
            assert_eq!(
                normalize_report_url(&url).map(|u| u.as_str().to_string()),
                Some(url)
            );
        }
    }

    #[test]
    fn test_extra_scheme_slashes_are_collapsed() {
        assert_eq!(
            resolve("see https:///ex.com/report?rid=abc"),
            Some("https://ex.com/report?rid=abc".to_string())
        );
    }
}
