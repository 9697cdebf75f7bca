//! Wikipedia REST page summaries.

use serde::Deserialize;

use super::{Engine, EngineContext, access_date, non_empty, require_identifier};
use crate::client::HttpClient;
use crate::config::Endpoints;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{EngineKind, Route};

#[derive(Debug, Deserialize)]
struct Summary {
    title: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: Option<String>,
}

/// Wikipedia engine; the route identifier is `lang:Title`.
#[derive(Debug, Clone)]
pub struct WikipediaEngine {
    http: HttpClient,
    endpoints: Endpoints,
}

impl WikipediaEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self { http: ctx.http.clone(), endpoints: ctx.config.endpoints.clone() }
    }

    /// Summary of one article.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing articles.
    pub async fn article(&self, lang: &str, title: &str) -> ClientResult<CitationMetadata> {
        let url = format!("{}/page/summary/{title}", self.endpoints.wikipedia_for(lang));
        let summary: Summary = self.http.get_json(&url, &[]).await?;

        let title_text = non_empty(summary.title.as_deref())
            .ok_or_else(|| ClientError::not_found(format!("Wikipedia article {title}")))?;
        let revised = summary.timestamp.as_deref().and_then(PubDate::parse);
        let page = summary
            .content_urls
            .and_then(|c| c.desktop)
            .and_then(|d| d.page)
            .unwrap_or_else(|| format!("https://{lang}.wikipedia.org/wiki/{title}"));

        Ok(CitationMetadata {
            citation_type: CitationType::Encyclopedia,
            title: Some(title_text),
            date: revised.map(|d| d.to_string()),
            website: Some("Wikipedia".to_string()),
            publisher: Some("Wikimedia Foundation".to_string()),
            url: Some(page),
            access_date: Some(access_date()),
            source_engine: Some("wikipedia".to_string()),
            ..CitationMetadata::default()
        })
    }
}

#[async_trait::async_trait]
impl Engine for WikipediaEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Wikipedia
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let id = require_identifier(route, "wikipedia")?;
        let (lang, title) = id.split_once(':').unwrap_or(("en", id));
        let mut meta = self.article(lang, title).await?;
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}
