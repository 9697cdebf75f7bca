//! Brave Search fallback for URLs no engine could resolve.
//!
//! The URL is turned into a search query (publication name plus slug words),
//! the result that best matches the URL is picked, and title, author and
//! date are read from its snippet.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::Deserialize;
use url::Url;

use super::{EngineContext, access_date, clean_text};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{Route, normalize_host};

static BY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bby\s+([A-Z][a-z]+(?:\s+[A-Z]\.?)?\s+[A-Z][a-z]+)").expect("valid byline regex")
});
static WRITES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]+\s+[A-Z][a-z]+)\s+(?:writes|reports|argues|explains)")
        .expect("valid writes regex")
});
static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Z][a-z]+\s+[A-Z][a-z]+),\s+(?:staff writer|reporter|columnist|editor)")
        .expect("valid role regex")
});
static PROSE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]+\s+\d{1,2},?\s+\d{4})").expect("valid prose date regex")
});
static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s+(day|hour|week|month)s?\s+ago").expect("valid relative date regex")
});
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid ISO date regex"));

const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " — ", " · "];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// One web result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub extra_snippets: Vec<String>,
}

/// Search query for a URL: publication name followed by the slug words.
///
/// `https://www.theatlantic.com/ideas/2025/12/private-equity-housing-changes/685138/`
/// becomes `The Atlantic ideas private equity housing changes`.
#[must_use]
pub fn url_to_search_query(url: &str, publication: Option<&str>) -> String {
    let Ok(parsed) = Url::parse(url) else { return url.to_string() };
    let domain = normalize_host(parsed.host_str().unwrap_or_default());

    let name = publication.map(str::to_string).unwrap_or_else(|| {
        let label = domain.split('.').next().unwrap_or_default();
        let label = label.strip_prefix("the").filter(|rest| !rest.is_empty()).unwrap_or(label);
        title_case(label)
    });

    let words: Vec<String> = parsed
        .path()
        .split('/')
        .filter(|seg| !seg.is_empty() && !seg.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|seg| {
            if seg.contains(['-', '_']) {
                Some(seg.replace(['-', '_'], " "))
            } else if seg.len() > 3 {
                Some(seg.to_string())
            } else {
                None
            }
        })
        .collect();

    format!("{name} {}", words.join(" ")).trim().to_string()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Pick the hit for a URL: exact URL, then same path, then same domain,
/// then the first hit.
#[must_use]
pub fn find_matching_result<'a>(url: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let normalize = |u: &str| u.to_lowercase().trim_end_matches('/').to_string();
    let target = normalize(url);
    if let Some(hit) = hits.iter().find(|h| normalize(&h.url) == target) {
        return Some(hit);
    }

    let parsed = Url::parse(url).ok();
    let path_of = |u: &Url| u.path().to_lowercase().trim_end_matches('/').to_string();

    if let Some(path) = parsed.as_ref().map(path_of).filter(|p| !p.is_empty()) {
        let by_path = hits
            .iter()
            .find(|h| Url::parse(&h.url).ok().is_some_and(|u| path_of(&u).contains(&path)));
        if by_path.is_some() {
            return by_path;
        }
    }

    if let Some(domain) = parsed.as_ref().and_then(|u| u.host_str()).map(normalize_host) {
        let by_domain = hits.iter().find(|h| {
            Url::parse(&h.url)
                .ok()
                .and_then(|u| u.host_str().map(normalize_host))
                .is_some_and(|d| d == domain)
        });
        if by_domain.is_some() {
            return by_domain;
        }
    }

    hits.first()
}

/// Author names mentioned in a snippet.
#[must_use]
pub fn extract_authors_from_snippet(text: &str) -> Vec<String> {
    [&*BY_RE, &*WRITES_RE, &*ROLE_RE]
        .iter()
        .find_map(|re| re.captures(text).map(|c| c[1].to_string()))
        .into_iter()
        .collect()
}

/// Publication date from Brave's `age` field or the snippet text.
fn extract_date(text: &str, age: Option<&str>, today: NaiveDate) -> Option<PubDate> {
    if let Some(age) = age.filter(|a| !a.is_empty()) {
        if let Some(date) = PROSE_DATE_RE.captures(age).and_then(|c| PubDate::parse(&c[1])) {
            return Some(date);
        }
        if let Some(caps) = RELATIVE_RE.captures(age) {
            let n: i64 = caps[1].parse().ok()?;
            let days = match caps[2].to_lowercase().as_str() {
                "day" => n,
                "week" => n * 7,
                "month" => n * 30,
                _ => 0,
            };
            return Some((today - Duration::days(days)).into());
        }
    }

    PROSE_DATE_RE
        .captures(text)
        .and_then(|c| PubDate::parse(&c[1]))
        .or_else(|| ISO_DATE_RE.captures(text).and_then(|c| PubDate::parse(&c[1])))
}

/// Title without a site-name suffix, when the leading part is long enough
/// to be the headline.
fn headline(title: &str) -> String {
    let title = clean_text(title);
    TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.split_once(sep))
        .map(|(head, _)| head.trim())
        .find(|head| head.chars().count() > 20)
        .map_or(title.clone(), str::to_string)
}

/// Brave Search client.
#[derive(Debug, Clone)]
pub struct BraveEngine {
    http: HttpClient,
    base: String,
    api_key: String,
}

impl BraveEngine {
    /// Build the engine; `None` without an API key.
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Option<Self> {
        let api_key = ctx.config.brave_api_key.clone()?;
        Some(Self { http: ctx.http.clone(), base: ctx.config.endpoints.brave.clone(), api_key })
    }

    async fn search(&self, query: &str, count: usize) -> ClientResult<Vec<SearchHit>> {
        let url = format!("{}/web/search", self.base);
        let params = [
            ("q", query.to_string()),
            ("count", count.to_string()),
            ("text_decorations", "false".to_string()),
            ("search_lang", "en".to_string()),
            ("country", "us".to_string()),
        ];
        let headers = [("X-Subscription-Token", self.api_key.clone())];
        let response: SearchResponse = self.http.get_json_with(&url, &params, &headers).await?;
        Ok(response.web.map(|w| w.results).unwrap_or_default())
    }

    /// Citation metadata for a routed URL from search snippets.
    ///
    /// # Errors
    ///
    /// Returns `NoResults` when the search finds nothing usable.
    pub async fn lookup(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let query = url_to_search_query(&route.url, route.publication);
        tracing::debug!(url = %route.url, query, "brave search");

        let hits = self.search(&query, 5).await?;
        let hit = find_matching_result(&route.url, &hits)
            .ok_or_else(|| ClientError::no_results("brave", &query))?;

        let text = format!("{} {} {}", hit.title, hit.description, hit.extra_snippets.join(" "));
        let date = extract_date(&text, hit.age.as_deref(), chrono::Local::now().date_naive());
        let title = headline(&hit.title);
        if title.is_empty() {
            return Err(ClientError::no_results("brave", &query));
        }

        let citation_type = match route.citation_type_hint() {
            t @ (CitationType::Newspaper | CitationType::Government) => t,
            _ => CitationType::Webpage,
        };
        let publication = route.publication.map_or_else(
            || {
                let label = route.domain.split('.').next().unwrap_or_default();
                title_case(label)
            },
            str::to_string,
        );

        let mut meta = CitationMetadata {
            citation_type,
            title: Some(title),
            authors: extract_authors_from_snippet(&text),
            date: date.map(|d| d.to_string()),
            url: Some(route.url.clone()),
            access_date: Some(access_date()),
            source_engine: Some("brave".to_string()),
            raw_source: Some(route.url.clone()),
            ..CitationMetadata::default()
        };
        match citation_type {
            CitationType::Newspaper => meta.newspaper = Some(publication),
            CitationType::Government => meta.agency = Some(publication),
            _ => meta.website = Some(publication),
        }
        Ok(meta)
    }
}
