//! Metadata engines.
//!
//! Each engine wraps one provider: it takes a [`Route`] (or a bare
//! identifier), makes one request through the shared [`HttpClient`] and maps
//! the provider payload onto [`CitationMetadata`]. Engines never format and
//! never fall back; the resolver decides what to try next.

mod arxiv;
mod author_date;
mod books;
mod brave;
mod crossref;
mod legal;
mod oembed;
mod openalex;
mod pubmed;
mod scrape;
mod semantic_scholar;
mod wikipedia;

pub use arxiv::ArxivEngine;
pub use author_date::{AuthorDateEngine, Scored, confidence};
pub use books::BooksEngine;
pub use brave::{BraveEngine, extract_authors_from_snippet, find_matching_result, url_to_search_query};
pub use crossref::CrossrefEngine;
pub use legal::LegalEngine;
pub use oembed::OembedEngine;
pub use openalex::OpenAlexEngine;
pub use pubmed::PubmedEngine;
pub use scrape::{PageMeta, ScrapeEngine, clean_title};
pub use semantic_scholar::SemanticScholarEngine;
pub use wikipedia::WikipediaEngine;

use std::sync::LazyLock;

use regex::Regex;

use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::CitationMetadata;
use crate::router::{EngineKind, Route};

/// A provider that resolves a classified URL.
#[async_trait::async_trait]
pub trait Engine: Send + Sync {
    /// Which engine this is.
    fn kind(&self) -> EngineKind;

    /// Name recorded in `source_engine`.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Fetch metadata for a routed URL.
    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata>;
}

/// A provider that can be searched with free text.
#[async_trait::async_trait]
pub trait SearchEngine: Send + Sync {
    /// Provider name.
    fn name(&self) -> &'static str;

    /// Best matches for a query, most relevant first.
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<CitationMetadata>>;
}

/// A bibliographic search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text (title words, or author plus year).
    pub text: String,
    /// Author surname to filter on, when known.
    pub author: Option<String>,
    /// Publication year to filter on, when known.
    pub year: Option<i32>,
    /// Maximum results.
    pub limit: usize,
}

impl SearchQuery {
    /// A plain text search.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), author: None, year: None, limit: 5 }
    }
}

/// Shared state every engine is built from.
#[derive(Debug, Clone)]
pub struct EngineContext {
    pub http: HttpClient,
    pub config: std::sync::Arc<crate::config::Config>,
}

/// Identifier a route must carry for identifier-based engines.
pub(crate) fn require_identifier<'a>(route: &'a Route, engine: &'static str) -> ClientResult<&'a str> {
    route
        .identifier
        .as_deref()
        .ok_or_else(|| ClientError::bad_request(format!("{engine}: no identifier in {}", route.url)))
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Strip markup, decode common entities and collapse whitespace.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let decoded = without_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text, or `None` when nothing is left.
#[must_use]
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(clean_text).filter(|s| !s.is_empty())
}

/// Today's date as recorded in `access_date`.
#[must_use]
pub fn access_date() -> String {
    crate::models::today().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  <i>Nature</i>  &amp; Science\n"), "Nature & Science");
        assert_eq!(clean_text("<jats:p>Deep   learning</jats:p>"), "Deep learning");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" x ")).as_deref(), Some("x"));
        assert_eq!(non_empty(None), None);
    }
}
