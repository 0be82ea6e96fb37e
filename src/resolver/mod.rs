// src/resolver/mod.rs
// =============================================================================
// This module finds the report URL inside a message body.
//
// Submodules (leaf first):
// - grammar: shared tokenizer pieces (schemes, URL characters, decoding)
// - scan: finds every http(s) URL in text
// - query: reads one query-string parameter
// - unwrap: turns redirect/safe-link wrappers into their destination
// - marker: finds the explicit BRIXEON_REPORT_URL directive
// - rid: finds the tracking token and a link that carries it
// - normalize: cleans and validates report URLs, derives base URLs
// - resolve: runs the three strategies in order
//
// Everything in here is pure: a string goes in, an Option comes out.
// =============================================================================

mod grammar;
mod marker;
mod normalize;
mod query;
mod resolve;
mod rid;
mod scan;
mod unwrap;

pub use marker::DEFAULT_MARKER_KEY;
pub use normalize::ReportUrl;
pub use resolve::{Resolution, Resolver, ResolverConfig, Tier};
pub use scan::extract_all_urls;
pub use unwrap::extract_direct_url;
