//! oEmbed lookups for YouTube and Vimeo.

use serde::Deserialize;

use super::{Engine, EngineContext, access_date, non_empty};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{EngineKind, Route};

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    upload_date: Option<String>,
}

/// Video engine for one oEmbed provider.
#[derive(Debug, Clone)]
pub struct OembedEngine {
    http: HttpClient,
    kind: EngineKind,
    endpoint: String,
}

impl OembedEngine {
    /// YouTube oEmbed.
    #[must_use]
    pub fn youtube(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            kind: EngineKind::Youtube,
            endpoint: ctx.config.endpoints.youtube_oembed.clone(),
        }
    }

    /// Vimeo oEmbed.
    #[must_use]
    pub fn vimeo(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            kind: EngineKind::Vimeo,
            endpoint: ctx.config.endpoints.vimeo_oembed.clone(),
        }
    }

    const fn site(&self) -> &'static str {
        match self.kind {
            EngineKind::Vimeo => "Vimeo",
            _ => "YouTube",
        }
    }

    /// Canonical watch URL for a video id.
    fn canonical_url(&self, id: &str) -> String {
        match self.kind {
            EngineKind::Vimeo => format!("https://vimeo.com/{id}"),
            _ => format!("https://www.youtube.com/watch?v={id}"),
        }
    }
}

#[async_trait::async_trait]
impl Engine for OembedEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let page_url = route
            .identifier
            .as_deref()
            .map_or_else(|| route.url.clone(), |id| self.canonical_url(id));
        let params = [("url", page_url.clone()), ("format", "json".to_string())];
        let response: OembedResponse = self.http.get_json(&self.endpoint, &params).await?;

        let title = non_empty(response.title.as_deref())
            .ok_or_else(|| ClientError::not_found(format!("{} video {page_url}", self.site())))?;
        let date = response.upload_date.as_deref().and_then(PubDate::parse);

        Ok(CitationMetadata {
            citation_type: CitationType::Video,
            title: Some(title),
            authors: non_empty(response.author_name.as_deref()).into_iter().collect(),
            date: date.map(|d| d.to_string()),
            website: Some(self.site().to_string()),
            url: Some(page_url),
            access_date: Some(access_date()),
            source_engine: Some(self.kind.name().to_string()),
            raw_source: Some(route.url.clone()),
            ..CitationMetadata::default()
        })
    }
}
