//! Catalog search: descriptor resolution, query building, feed parsing
//!
//! The catalog speaks OpenSearch: each collection publishes a descriptor
//! document declaring a parametrized Atom search template, and search
//! responses come back as Atom feeds. This module owns the whole round trip:
//!
//! 1. [`client::CatalogClient`] fetches the collection descriptor
//! 2. [`template::extract_template`] pulls the Atom query template out of it
//! 3. [`query::build_search_url`] substitutes the resolved parameters
//! 4. [`client::CatalogClient`] executes the search
//! 5. [`feed::parse_feed`] turns the Atom response into candidates

pub mod client;
pub mod feed;
pub mod query;
pub mod template;

pub use client::{CatalogClient, DEFAULT_CATALOG_URL};

/// Search-stage errors; all are recorded per unit, none abort the run
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Collection descriptor could not be fetched or read
    #[error("descriptor fetch failed: {0}")]
    DescriptorFetch(String),

    /// Descriptor carries no Atom search template declaration
    #[error("no Atom search template found in collection descriptor")]
    TemplateNotFound,

    /// Search request failed (transport or non-2xx status)
    #[error("search request failed: {0}")]
    Request(String),

    /// Search response was not a parseable Atom feed
    #[error("feed parse error: {0}")]
    FeedParse(String),
}

/// One link carried by a feed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLink {
    /// Link relation (`enclosure` for the downloadable file)
    pub rel: String,
    /// Link target URL
    pub href: String,
    /// Declared media type, possibly empty
    pub media_type: String,
}

/// One product record parsed from a search feed
///
/// Candidates are transient: produced per search, filtered, downloaded, and
/// dropped. They are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProduct {
    /// Entry title (the product filename, carrying the baseline token)
    pub title: String,
    /// Entry links in document order, restricted to enclosure/alternate
    pub links: Vec<ProductLink>,
    /// Publication date string as reported by the feed
    pub date: String,
}

impl CandidateProduct {
    /// First enclosure link, the actual downloadable file resource
    pub fn enclosure(&self) -> Option<&ProductLink> {
        self.links.iter().find(|link| link.rel == "enclosure")
    }
}
