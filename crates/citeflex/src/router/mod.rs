//! URL classification and engine dispatch.
//!
//! The router holds an ordered list of rules. Each rule looks at the
//! normalized host and the full URL and either claims it (optionally with an
//! extracted identifier) or passes. The first rule that claims a URL decides
//! its [`UrlType`], and [`dispatch`] maps that type to an [`EngineKind`].

pub mod domains;
pub mod extract;

use std::fmt;

use serde::Serialize;
use url::Url;

pub use domains::DomainTables;
pub use extract::*;

use crate::error::{CiteError, CiteResult};
use crate::models::CitationType;

/// What kind of URL this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlType {
    Doi,
    Arxiv,
    Pubmed,
    Wikipedia,
    Youtube,
    Vimeo,
    Jstor,
    Ssrn,
    Book,
    SemanticScholar,
    AcademicPublisher,
    Legal,
    Newspaper,
    Government,
    Generic,
}

impl UrlType {
    /// Snake-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::Arxiv => "arxiv",
            Self::Pubmed => "pubmed",
            Self::Wikipedia => "wikipedia",
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
            Self::Jstor => "jstor",
            Self::Ssrn => "ssrn",
            Self::Book => "book",
            Self::SemanticScholar => "semantic_scholar",
            Self::AcademicPublisher => "academic_publisher",
            Self::Legal => "legal",
            Self::Newspaper => "newspaper",
            Self::Government => "government",
            Self::Generic => "generic",
        }
    }

    /// Citation type to assume for pages that are scraped rather than
    /// looked up in a bibliographic API.
    #[must_use]
    pub const fn citation_type_hint(self) -> CitationType {
        match self {
            Self::Doi | Self::Jstor | Self::AcademicPublisher | Self::SemanticScholar => {
                CitationType::Journal
            }
            Self::Arxiv | Self::Ssrn => CitationType::Preprint,
            Self::Pubmed => CitationType::Medical,
            Self::Wikipedia => CitationType::Encyclopedia,
            Self::Youtube | Self::Vimeo => CitationType::Video,
            Self::Book => CitationType::Book,
            Self::Legal => CitationType::Legal,
            Self::Newspaper => CitationType::Newspaper,
            Self::Government => CitationType::Government,
            Self::Generic => CitationType::Webpage,
        }
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The metadata engines a URL can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Crossref,
    Arxiv,
    Pubmed,
    Wikipedia,
    Youtube,
    Vimeo,
    Books,
    SemanticScholar,
    Legal,
    Newspaper,
    Government,
    Generic,
}

impl EngineKind {
    /// All URL engines.
    pub const ALL: [Self; 12] = [
        Self::Crossref,
        Self::Arxiv,
        Self::Pubmed,
        Self::Wikipedia,
        Self::Youtube,
        Self::Vimeo,
        Self::Books,
        Self::SemanticScholar,
        Self::Legal,
        Self::Newspaper,
        Self::Government,
        Self::Generic,
    ];

    /// Engine name as reported in `source_engine`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crossref => "crossref",
            Self::Arxiv => "arxiv",
            Self::Pubmed => "pubmed",
            Self::Wikipedia => "wikipedia",
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
            Self::Books => "books",
            Self::SemanticScholar => "semantic_scholar",
            Self::Legal => "legal",
            Self::Newspaper => "newspaper",
            Self::Government => "government",
            Self::Generic => "generic",
        }
    }

    /// Engines that scrape the page itself.
    #[must_use]
    pub const fn is_scraper(self) -> bool {
        matches!(self, Self::Legal | Self::Newspaper | Self::Government | Self::Generic)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed dispatch table from URL type to engine.
#[must_use]
pub const fn dispatch(url_type: UrlType) -> EngineKind {
    match url_type {
        UrlType::Doi | UrlType::Jstor | UrlType::Ssrn => EngineKind::Crossref,
        UrlType::Arxiv => EngineKind::Arxiv,
        UrlType::Pubmed => EngineKind::Pubmed,
        UrlType::Wikipedia => EngineKind::Wikipedia,
        UrlType::Youtube => EngineKind::Youtube,
        UrlType::Vimeo => EngineKind::Vimeo,
        UrlType::Book => EngineKind::Books,
        UrlType::SemanticScholar => EngineKind::SemanticScholar,
        UrlType::Legal => EngineKind::Legal,
        UrlType::Newspaper => EngineKind::Newspaper,
        UrlType::Government => EngineKind::Government,
        UrlType::AcademicPublisher | UrlType::Generic => EngineKind::Generic,
    }
}

/// Classification result for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Normalized URL (scheme added, fragment removed).
    pub url: String,
    /// Host without `www.`/`m.`/`amp.`.
    pub domain: String,
    pub url_type: UrlType,
    pub engine: EngineKind,
    /// Identifier the engine looks up (DOI, arXiv id, video id, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Publication, agency or court name from the domain tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<&'static str>,
}

impl Route {
    /// Citation type to assume when the engine has to scrape.
    #[must_use]
    pub const fn citation_type_hint(&self) -> CitationType {
        self.url_type.citation_type_hint()
    }

    /// Same URL re-routed to the generic scraper, keeping the publication name.
    #[must_use]
    pub fn as_generic(&self) -> Self {
        Self { engine: EngineKind::Generic, identifier: None, ..self.clone() }
    }
}

/// What a rule sees.
struct Candidate<'a> {
    url: &'a str,
    host: &'a str,
    path: &'a str,
    tables: &'a DomainTables,
}

/// What a rule reports when it claims a URL.
#[derive(Default)]
struct Claim {
    identifier: Option<String>,
    publication: Option<&'static str>,
}

impl Claim {
    fn id(identifier: String) -> Self {
        Self { identifier: Some(identifier), publication: None }
    }

    fn named(publication: Option<&'static str>) -> Self {
        Self { identifier: None, publication }
    }
}

type Matcher = fn(&Candidate<'_>) -> Option<Claim>;

/// One classification rule.
struct Rule {
    url_type: UrlType,
    matcher: Matcher,
}

/// Ordered rule list; first match wins.
const RULES: &[Rule] = &[
    Rule { url_type: UrlType::Doi, matcher: match_doi },
    Rule { url_type: UrlType::Arxiv, matcher: match_arxiv },
    Rule { url_type: UrlType::Pubmed, matcher: match_pubmed },
    Rule { url_type: UrlType::Wikipedia, matcher: match_wikipedia },
    Rule { url_type: UrlType::Youtube, matcher: match_youtube },
    Rule { url_type: UrlType::Vimeo, matcher: match_vimeo },
    Rule { url_type: UrlType::Jstor, matcher: match_jstor },
    Rule { url_type: UrlType::Ssrn, matcher: match_ssrn },
    Rule { url_type: UrlType::Book, matcher: match_book },
    Rule { url_type: UrlType::SemanticScholar, matcher: match_semantic_scholar },
    Rule { url_type: UrlType::AcademicPublisher, matcher: match_academic },
    Rule { url_type: UrlType::Legal, matcher: match_legal },
    Rule { url_type: UrlType::Newspaper, matcher: match_newspaper },
    Rule { url_type: UrlType::Government, matcher: match_government },
];

/// URL classifier.
#[derive(Debug, Clone)]
pub struct UrlRouter {
    tables: DomainTables,
}

impl Default for UrlRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlRouter {
    /// Router over the built-in domain tables.
    #[must_use]
    pub fn new() -> Self {
        Self { tables: DomainTables::builtin() }
    }

    /// Domain tables in use.
    #[must_use]
    pub const fn tables(&self) -> &DomainTables {
        &self.tables
    }

    /// Classify a URL.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the text cannot be parsed as an
    /// http(s) URL with a host.
    pub fn classify(&self, raw: &str) -> CiteResult<Route> {
        let url = parse_url(raw)?;
        let domain = normalize_host(url.host_str().unwrap_or_default());
        let candidate =
            Candidate { url: url.as_str(), host: &domain, path: url.path(), tables: &self.tables };

        let (url_type, claim) = RULES
            .iter()
            .find_map(|rule| (rule.matcher)(&candidate).map(|claim| (rule.url_type, claim)))
            .unwrap_or((UrlType::Generic, Claim::default()));

        let route = Route {
            url: url.to_string(),
            domain: domain.clone(),
            url_type,
            engine: dispatch(url_type),
            identifier: claim.identifier,
            publication: claim.publication,
        };
        tracing::debug!(url = %route.url, url_type = %route.url_type, engine = %route.engine, "classified");
        Ok(route)
    }

    /// Every rule that would claim the URL, in priority order.
    ///
    /// Diagnostic only: `classify` uses the first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unparseable URLs.
    pub fn matching_rules(&self, raw: &str) -> CiteResult<Vec<UrlType>> {
        let url = parse_url(raw)?;
        let domain = normalize_host(url.host_str().unwrap_or_default());
        let candidate =
            Candidate { url: url.as_str(), host: &domain, path: url.path(), tables: &self.tables };
        Ok(RULES
            .iter()
            .filter(|rule| (rule.matcher)(&candidate).is_some())
            .map(|rule| rule.url_type)
            .collect())
    }
}

/// Parse user input as an http(s) URL, adding `https://` when missing.
///
/// # Errors
///
/// Returns a validation error for other schemes or host-less input.
pub fn parse_url(raw: &str) -> CiteResult<Url> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut url = Url::parse(&with_scheme)
        .map_err(|e| CiteError::validation("url", format!("invalid URL '{trimmed}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CiteError::validation("url", format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(|h| !h.contains('.')) {
        return Err(CiteError::validation("url", format!("'{trimmed}' has no host")));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Lowercase a host and strip `www.`, `m.` and `amp.` prefixes.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let mut host = host.trim_end_matches('.').to_ascii_lowercase();
    for prefix in ["www.", "m.", "amp."] {
        if let Some(rest) = host.strip_prefix(prefix).filter(|rest| rest.contains('.')) {
            host = rest.to_string();
        }
    }
    host
}

fn host_is(host: &str, domain: &str) -> bool {
    host == domain || host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.'))
}

fn match_doi(c: &Candidate<'_>) -> Option<Claim> {
    if host_is(c.host, "doi.org") {
        return extract_doi(c.path).map(Claim::id);
    }
    let publication = c.tables.academic(c.host)?;
    extract_doi(c.url).map(|doi| Claim { identifier: Some(doi), publication: Some(publication) })
}

fn match_arxiv(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "arxiv.org") {
        return None;
    }
    ["/abs/", "/pdf/", "/html/"]
        .iter()
        .any(|p| c.path.starts_with(p))
        .then(|| extract_arxiv_id(c.url))?
        .map(Claim::id)
}

fn match_pubmed(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "nih.gov") {
        return None;
    }
    extract_pmid(c.url).map(Claim::id)
}

fn match_wikipedia(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "wikipedia.org") {
        return None;
    }
    extract_wikipedia_title(c.url).map(|(lang, title)| Claim::id(format!("{lang}:{title}")))
}

fn match_youtube(c: &Candidate<'_>) -> Option<Claim> {
    let known = ["youtube.com", "youtu.be", "youtube-nocookie.com"];
    if !known.iter().any(|d| host_is(c.host, d)) {
        return None;
    }
    extract_youtube_id(c.url).map(Claim::id)
}

fn match_vimeo(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "vimeo.com") {
        return None;
    }
    extract_vimeo_id(c.url).map(Claim::id)
}

fn match_jstor(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "jstor.org") {
        return None;
    }
    extract_jstor_id(c.url).map(|id| Claim::id(format!("10.2307/{id}")))
}

fn match_ssrn(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "ssrn.com") {
        return None;
    }
    extract_ssrn_id(c.url).map(|id| Claim::id(format!("10.2139/ssrn.{id}")))
}

fn match_book(c: &Candidate<'_>) -> Option<Claim> {
    let is_catalogue = c.host.starts_with("books.google.")
        || host_is(c.host, "openlibrary.org")
        || host_is(c.host, "worldcat.org")
        || (is_amazon(c.host) && (c.path.contains("/dp/") || c.path.contains("/gp/product/")));
    if !is_catalogue {
        return None;
    }
    extract_book_id(c.url).map(Claim::id)
}

fn is_amazon(host: &str) -> bool {
    host.split('.').next() == Some("amazon")
}

fn match_semantic_scholar(c: &Candidate<'_>) -> Option<Claim> {
    if !host_is(c.host, "semanticscholar.org") {
        return None;
    }
    extract_semantic_scholar_id(c.url).map(Claim::id)
}

fn match_academic(c: &Candidate<'_>) -> Option<Claim> {
    c.tables.academic(c.host).map(|name| Claim::named(Some(name)))
}

fn match_legal(c: &Candidate<'_>) -> Option<Claim> {
    c.tables.legal(c.host).map(|name| Claim::named(Some(name)))
}

fn match_newspaper(c: &Candidate<'_>) -> Option<Claim> {
    c.tables.newspaper(c.host).map(|name| Claim::named(Some(name)))
}

fn match_government(c: &Candidate<'_>) -> Option<Claim> {
    c.tables.government(c.host).map(Claim::named)
}
