//! Court decisions: case-law pages and CourtListener search.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::scrape::{PageMeta, clean_title};
use super::{Engine, EngineContext, access_date, non_empty};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{EngineKind, Route, domains};

/// `Roe v. Wade`, `In re Gault`, `R v Jogee`.
static CASE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:In re |Ex parte )?[A-Z][\w.'&\- ]{0,80}?\s+v\.?\s+[A-Z][\w.'&\- ]{0,80}?)(?:\s*[,(\[|–—-]|$)")
        .expect("valid case name regex")
});

/// Reporter and neutral citations: `410 U.S. 113`, `550 F.3d 1023`,
/// `[2016] UKSC 8`, `2019 SCC 65`, `[1992] HCA 23`.
static REPORTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,4}\s+(?:U\.\s?S\.|S\.\s?Ct\.|L\.\s?Ed\.(?:\s?2d)?|F\.(?:\s?(?:2d|3d|4th))?|F\.\s?Supp\.(?:\s?(?:2d|3d))?|[A-Z][a-z]*\.(?:\s?[23]d)?)\s+\d{1,5}|\[\d{4}\]\s+[A-Z]{2,6}(?:\s+(?:Civ|Crim|Admin|QB|Ch|Fam))?\s+\d{1,5}|\d{4}\s+(?:SCC|ONCA|BCCA|ABCA|QCCA|FCA|HCA|NZSC)\s+\d{1,5})",
    )
    .expect("valid reporter regex")
});

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Opinion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Opinion {
    case_name: Option<String>,
    #[serde(default)]
    court: Option<String>,
    #[serde(default)]
    date_filed: Option<String>,
    #[serde(default)]
    citation: Vec<String>,
    #[serde(rename = "absolute_url", default)]
    absolute_url: Option<String>,
}

impl Opinion {
    fn into_metadata(self) -> CitationMetadata {
        let date = self.date_filed.as_deref().and_then(PubDate::parse);
        CitationMetadata {
            citation_type: CitationType::Legal,
            case_name: non_empty(self.case_name.as_deref()),
            citation: self.citation.into_iter().next(),
            court: non_empty(self.court.as_deref()),
            date: date.map(|d| d.to_string()),
            year: date.map(|d| d.year.to_string()),
            url: self
                .absolute_url
                .map(|path| format!("https://www.courtlistener.com{path}")),
            source_engine: Some("courtlistener".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// Case name found in a page title.
fn find_case_name(text: &str) -> Option<String> {
    CASE_NAME_RE
        .captures(text)
        .map(|c| c[1].trim().trim_end_matches(['.', ',']).to_string())
        .filter(|name| name.len() > 4)
}

/// First reporter or neutral citation in the text.
#[must_use]
pub fn find_reporter_citation(text: &str) -> Option<String> {
    REPORTER_RE.find(text).map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Legal engine.
#[derive(Debug, Clone)]
pub struct LegalEngine {
    http: HttpClient,
    base: String,
    token: Option<String>,
}

impl LegalEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            base: ctx.config.endpoints.courtlistener.clone(),
            token: ctx.config.courtlistener_token.clone(),
        }
    }

    /// Search CourtListener opinions by case name.
    ///
    /// # Errors
    ///
    /// Returns `NoResults` when nothing matches.
    pub async fn search_case(&self, case_name: &str, citation: Option<&str>) -> ClientResult<CitationMetadata> {
        let url = format!("{}/search/", self.base);
        let query = match citation {
            Some(cite) => format!("\"{case_name}\" {cite}"),
            None => format!("\"{case_name}\""),
        };
        let params = [("q", query), ("type", "o".to_string()), ("order_by", "score desc".to_string())];
        let headers: Vec<(&'static str, String)> =
            self.token.iter().map(|t| ("Authorization", format!("Token {t}"))).collect();

        let response: SearchResponse = self.http.get_json_with(&url, &params, &headers).await?;
        tracing::debug!(case_name, results = response.results.len(), "courtlistener search");
        let mut meta = response
            .results
            .into_iter()
            .map(Opinion::into_metadata)
            .find(CitationMetadata::is_complete)
            .ok_or_else(|| ClientError::no_results("courtlistener", case_name))?;
        if meta.citation.is_none() {
            meta.citation = citation.map(str::to_string);
        }
        Ok(meta)
    }

    /// Build a legal citation from a scraped case page.
    fn page_to_case(route: &Route, final_url: &str, page: &PageMeta) -> CitationMetadata {
        let title = page.title.as_deref().map(|t| clean_title(t, route.publication)).unwrap_or_default();
        let haystack = format!("{title} {}", page.description.as_deref().unwrap_or_default());
        let date = page.date.as_deref().and_then(PubDate::parse);
        let citation = find_reporter_citation(&haystack);
        let year = date.map(|d| d.year.to_string()).or_else(|| {
            citation.as_deref().and_then(PubDate::parse).map(|d| d.year.to_string())
        });

        CitationMetadata {
            citation_type: CitationType::Legal,
            case_name: find_case_name(&title),
            title: Some(title).filter(|t| !t.is_empty()),
            citation,
            court: domains::court(&route.domain).map(str::to_string),
            date: date.map(|d| d.to_string()),
            year,
            url: Some(page.canonical_url.clone().unwrap_or_else(|| final_url.to_string())),
            access_date: Some(access_date()),
            source_engine: Some("legal".to_string()),
            ..CitationMetadata::default()
        }
    }
}

#[async_trait::async_trait]
impl Engine for LegalEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Legal
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let fetched = self.http.get_page(&route.url).await?;
        let page = PageMeta::parse(&fetched.body);
        let mut meta = Self::page_to_case(route, &fetched.url, &page);

        // Case pages without a reporter citation: ask CourtListener.
        if meta.citation.is_none() {
            if let Some(name) = meta.case_name.clone() {
                match self.search_case(&name, None).await {
                    Ok(found) => {
                        meta.citation = found.citation;
                        meta.court = meta.court.or(found.court);
                        meta.date = meta.date.or(found.date);
                        meta.year = meta.year.or(found.year);
                    }
                    Err(e) => tracing::debug!(case = %name, error = %e, "no courtlistener match"),
                }
            }
        }

        if !meta.is_complete() {
            return Err(ClientError::no_results("legal", &route.url));
        }
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}
