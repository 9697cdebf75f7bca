//! Citation resolution.
//!
//! [`Citeflex`] owns the router, the shared HTTP client and every engine.
//! URLs go through the router and the dispatch table, then fall back to
//! generic scraping and, when a Brave key is configured, to web search.
//! Everything else is classified by [`detect`] and looked up by identifier
//! or searched.

use std::sync::Arc;

use serde::Serialize;

use crate::client::HttpClient;
use crate::config::Config;
use crate::engines::{
    ArxivEngine, AuthorDateEngine, BooksEngine, BraveEngine, CrossrefEngine, Engine, EngineContext, LegalEngine,
    OembedEngine, OpenAlexEngine, PubmedEngine, ScrapeEngine, SearchEngine, SearchQuery, SemanticScholarEngine,
    WikipediaEngine,
};
use crate::error::{CiteError, CiteResult, ClientError};
use crate::formatters::{get_formatter, strip_markup};
use crate::input::{InputKind, detect};
use crate::models::{CitationMetadata, CitationStyle, normalize_doi};
use crate::router::{EngineKind, Route, UrlRouter};

/// A resolved source, with the route when it came from a URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    pub metadata: CitationMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

/// A formatted citation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedCitation {
    /// Citation text, with `<i>` markup unless plain output was requested.
    pub formatted: String,
    pub metadata: CitationMetadata,
    pub style: CitationStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

/// The citation service.
#[derive(Debug, Clone)]
pub struct Citeflex {
    config: Arc<Config>,
    router: UrlRouter,
    crossref: CrossrefEngine,
    openalex: OpenAlexEngine,
    semantic_scholar: SemanticScholarEngine,
    pubmed: PubmedEngine,
    arxiv: ArxivEngine,
    wikipedia: WikipediaEngine,
    youtube: OembedEngine,
    vimeo: OembedEngine,
    books: BooksEngine,
    legal: LegalEngine,
    newspaper: ScrapeEngine,
    government: ScrapeEngine,
    generic: ScrapeEngine,
    author_date: AuthorDateEngine,
    brave: Option<BraveEngine>,
}

/// Log a failed lookup and report the source as unavailable.
fn unavailable(source: &str, err: &ClientError) -> CiteError {
    if err.is_unreachable() {
        tracing::warn!(source, error = %err, retry_after = ?err.retry_after(), "provider unreachable");
    } else {
        tracing::info!(source, error = %err, "lookup failed");
    }
    CiteError::unavailable(source)
}

impl Citeflex {
    /// Build the service and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let http = HttpClient::new(&config)?;
        Ok(Self::with_context(&EngineContext { http, config }))
    }

    /// Build the service on an existing client and configuration.
    #[must_use]
    pub fn with_context(ctx: &EngineContext) -> Self {
        Self {
            config: Arc::clone(&ctx.config),
            router: UrlRouter::new(),
            crossref: CrossrefEngine::new(ctx),
            openalex: OpenAlexEngine::new(ctx),
            semantic_scholar: SemanticScholarEngine::new(ctx),
            pubmed: PubmedEngine::new(ctx),
            arxiv: ArxivEngine::new(ctx),
            wikipedia: WikipediaEngine::new(ctx),
            youtube: OembedEngine::youtube(ctx),
            vimeo: OembedEngine::vimeo(ctx),
            books: BooksEngine::new(ctx),
            legal: LegalEngine::new(ctx),
            newspaper: ScrapeEngine::new(ctx, EngineKind::Newspaper),
            government: ScrapeEngine::new(ctx, EngineKind::Government),
            generic: ScrapeEngine::new(ctx, EngineKind::Generic),
            author_date: AuthorDateEngine::new(ctx),
            brave: BraveEngine::new(ctx),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// URL router.
    #[must_use]
    pub const fn router(&self) -> &UrlRouter {
        &self.router
    }

    /// Classify a URL without fetching it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed URLs.
    pub fn classify(&self, url: &str) -> CiteResult<Route> {
        self.router.classify(url)
    }

    /// Engine for a dispatch target.
    fn engine(&self, kind: EngineKind) -> &dyn Engine {
        match kind {
            EngineKind::Crossref => &self.crossref,
            EngineKind::Arxiv => &self.arxiv,
            EngineKind::Pubmed => &self.pubmed,
            EngineKind::Wikipedia => &self.wikipedia,
            EngineKind::Youtube => &self.youtube,
            EngineKind::Vimeo => &self.vimeo,
            EngineKind::Books => &self.books,
            EngineKind::SemanticScholar => &self.semantic_scholar,
            EngineKind::Legal => &self.legal,
            EngineKind::Newspaper => &self.newspaper,
            EngineKind::Government => &self.government,
            EngineKind::Generic => &self.generic,
        }
    }

    /// Metadata for a URL.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed URLs and `Unavailable` when
    /// every engine fails.
    pub async fn resolve_url(&self, url: &str) -> CiteResult<CitationMetadata> {
        let route = self.classify(url)?;
        self.resolve_route(&route).await
    }

    /// Metadata for a classified URL: the routed engine, then the generic
    /// scraper, then web search.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` when every step fails or comes back incomplete.
    #[tracing::instrument(skip(self, route), fields(url = %route.url, engine = %route.engine))]
    pub async fn resolve_route(&self, route: &Route) -> CiteResult<CitationMetadata> {
        match self.engine(route.engine).fetch(route).await {
            Ok(meta) if meta.is_complete() => return Ok(meta),
            Ok(meta) => tracing::info!(missing = ?meta.missing_field(), "incomplete metadata, trying fallbacks"),
            Err(e) => tracing::info!(error = %e, "engine failed, trying fallbacks"),
        }

        if route.engine != EngineKind::Generic {
            match self.generic.fetch(&route.as_generic()).await {
                Ok(meta) if meta.is_complete() => return Ok(meta),
                Ok(_) => tracing::debug!("generic scrape incomplete"),
                Err(e) => tracing::debug!(error = %e, "generic scrape failed"),
            }
        }

        if let Some(brave) = &self.brave {
            match brave.lookup(route).await {
                Ok(meta) if meta.is_complete() => return Ok(meta),
                Ok(_) => tracing::debug!("search result incomplete"),
                Err(e) => tracing::debug!(error = %e, "search fallback failed"),
            }
        }

        tracing::warn!("no engine could resolve the URL");
        Err(CiteError::unavailable(&route.url))
    }

    /// Metadata for any citation text.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text or a bare ibid, `NoMatch`
    /// when a search finds nothing, `Unavailable` when a lookup fails and
    /// `Incomplete` when an identifier lookup comes back without a title.
    #[tracing::instrument(skip(self, text))]
    pub async fn resolve(&self, text: &str) -> CiteResult<Resolved> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CiteError::validation("text", "Citation text is empty"));
        }

        let kind = detect(text);
        tracing::debug!(kind = kind.label(), "detected input");

        let metadata = match kind {
            InputKind::Ibid { .. } => {
                return Err(CiteError::validation("text", "An ibid reference needs a preceding note"));
            }
            InputKind::Url { url } => {
                let route = self.classify(&url)?;
                let metadata = self.resolve_route(&route).await?;
                return Ok(Resolved { metadata, route: Some(route) });
            }
            InputKind::Doi { doi } => self.resolve_doi(&doi).await?,
            InputKind::Isbn { isbn } => self.books.by_isbn(&isbn).await.map_err(|e| unavailable(text, &e))?,
            InputKind::Arxiv { id } => self.arxiv.paper(&id).await.map_err(|e| unavailable(text, &e))?,
            InputKind::Pmid { pmid } => self.pubmed.summary(&pmid).await.map_err(|e| unavailable(text, &e))?,
            InputKind::Legal { case_name, citation, year } => {
                self.resolve_case(text, case_name, citation, year).await?
            }
            InputKind::AuthorDate { author, second_author, year } => {
                self.resolve_author_date(&author, &year, second_author.as_deref()).await?
            }
            InputKind::FreeText { text: query } => self.search_text(&query).await?,
        };

        if let Some(field) = metadata.missing_field() {
            return Err(CiteError::Incomplete(format!("{text} has no {field}")));
        }
        Ok(Resolved { metadata, route: None })
    }

    /// Best match for an author-date reference.
    ///
    /// # Errors
    ///
    /// Returns `NoMatch` for undated references and when no candidate is
    /// confident enough, `Unavailable` when the searches fail.
    pub async fn resolve_author_date(
        &self,
        author: &str,
        year: &str,
        second_author: Option<&str>,
    ) -> CiteResult<CitationMetadata> {
        self.author_date.search(author, year, second_author).await.map_err(|e| match e {
            ClientError::NoResults { query, .. } => CiteError::NoMatch(format!("no confident match for {query}")),
            ClientError::BadRequest { message } => CiteError::NoMatch(message),
            other => unavailable(&format!("({author}, {year})"), &other),
        })
    }

    /// Crossref first, then Semantic Scholar's DOI lookup.
    async fn resolve_doi(&self, doi: &str) -> CiteResult<CitationMetadata> {
        let doi = normalize_doi(doi);
        match self.crossref.work(&doi).await {
            Ok(meta) if meta.is_complete() => return Ok(meta),
            Ok(_) => tracing::debug!(doi = %doi, "crossref record incomplete"),
            Err(e) => tracing::debug!(doi = %doi, error = %e, "crossref lookup failed"),
        }
        self.semantic_scholar
            .paper(&format!("DOI:{doi}"))
            .await
            .map_err(|e| unavailable(&doi, &e))
    }

    /// CourtListener search, then the bibliographic search.
    ///
    /// A case CourtListener cannot find may still be a book or film title
    /// ("Kramer v. Kramer"). When both fail the error is the CourtListener
    /// one, unless it simply found nothing.
    async fn resolve_case(
        &self,
        text: &str,
        case_name: String,
        citation: Option<String>,
        year: Option<String>,
    ) -> CiteResult<CitationMetadata> {
        match self.legal.search_case(&case_name, citation.as_deref()).await {
            Ok(mut meta) => {
                if citation.is_some() {
                    meta.citation = citation;
                }
                meta.year = meta.year.or(year);
                meta.raw_source = Some(text.to_string());
                Ok(meta)
            }
            Err(e) => {
                tracing::debug!(
                    case_name = %case_name,
                    error = %e,
                    "courtlistener search failed, searching as free text"
                );
                self.search_text(text).await.map_err(|search_err| match e {
                    ClientError::NoResults { .. } | ClientError::NotFound { .. } => search_err,
                    other => unavailable(text, &other),
                })
            }
        }
    }

    /// Crossref, then OpenAlex, then Semantic Scholar; first complete hit wins.
    async fn search_text(&self, text: &str) -> CiteResult<CitationMetadata> {
        let query = SearchQuery::text(text);
        let searches: [&dyn SearchEngine; 3] = [&self.crossref, &self.openalex, &self.semantic_scholar];

        for engine in searches {
            match engine.search(&query).await {
                Ok(hits) => {
                    if let Some(mut meta) = hits.into_iter().find(CitationMetadata::is_complete) {
                        meta.raw_source = Some(text.to_string());
                        return Ok(meta);
                    }
                }
                Err(e) => tracing::debug!(engine = engine.name(), error = %e, "search failed"),
            }
        }
        Err(CiteError::NoMatch(text.to_string()))
    }

    /// Resolve and format one citation.
    ///
    /// # Errors
    ///
    /// Returns the resolution error.
    pub async fn cite(&self, text: &str, style: CitationStyle) -> CiteResult<FormattedCitation> {
        let Resolved { metadata, route } = self.resolve(text).await?;
        let formatted = get_formatter(style).format_full(&metadata);
        Ok(FormattedCitation { formatted, metadata, style, route })
    }

    /// Resolve and format one citation, without markup when `plain` is set.
    ///
    /// # Errors
    ///
    /// Returns the resolution error.
    pub async fn cite_with(&self, text: &str, style: CitationStyle, plain: bool) -> CiteResult<FormattedCitation> {
        let mut citation = self.cite(text, style).await?;
        if plain {
            citation.formatted = strip_markup(&citation.formatted);
        }
        Ok(citation)
    }
}
