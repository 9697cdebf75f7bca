//! Semantic Scholar Graph API: paper lookup and search.

use serde::Deserialize;

use super::{Engine, EngineContext, SearchEngine, SearchQuery, non_empty, require_identifier};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType};
use crate::router::{EngineKind, Route};

/// Fields requested for every paper.
const PAPER_FIELDS: &str =
    "title,authors,year,venue,journal,externalIds,publicationDate,url,publicationTypes";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paper {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorRef>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    journal: Option<JournalRef>,
    #[serde(default)]
    external_ids: Option<ExternalIds>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    publication_types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JournalRef {
    name: Option<String>,
    volume: Option<String>,
    pages: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "ArXiv")]
    arxiv: Option<String>,
    #[serde(rename = "PubMed")]
    pubmed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Vec<Paper>,
}

impl Paper {
    fn into_metadata(self) -> CitationMetadata {
        let types = self.publication_types.unwrap_or_default();
        let (doi, arxiv_id, pmid) = self
            .external_ids
            .map(|ids| (ids.doi, ids.arxiv, ids.pubmed))
            .unwrap_or_default();

        let citation_type = if types.iter().any(|t| t == "Book") {
            CitationType::Book
        } else if doi.is_none() && arxiv_id.is_some() {
            CitationType::Preprint
        } else {
            CitationType::Journal
        };

        let (journal_name, volume, pages) =
            self.journal.map(|j| (j.name, j.volume, j.pages)).unwrap_or_default();

        CitationMetadata {
            citation_type,
            title: non_empty(self.title.as_deref()),
            authors: self.authors.into_iter().filter_map(|a| a.name).collect(),
            date: self.publication_date,
            year: self.year.map(|y| y.to_string()),
            journal: non_empty(journal_name.as_deref()).or_else(|| non_empty(self.venue.as_deref())),
            volume: non_empty(volume.as_deref()),
            pages: non_empty(pages.as_deref()),
            doi,
            arxiv_id,
            pmid,
            url: self.url,
            source_engine: Some("semantic_scholar".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// Semantic Scholar engine.
#[derive(Debug, Clone)]
pub struct SemanticScholarEngine {
    http: HttpClient,
    base: String,
    api_key: Option<String>,
}

impl SemanticScholarEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            base: ctx.config.endpoints.semantic_scholar.clone(),
            api_key: ctx.config.semantic_scholar_api_key.clone(),
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        self.api_key.iter().map(|k| ("x-api-key", k.clone())).collect()
    }

    /// Look up one paper by Semantic Scholar id or prefixed external id
    /// (`DOI:…`, `ARXIV:…`).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and transport errors otherwise.
    pub async fn paper(&self, id: &str) -> ClientResult<CitationMetadata> {
        let url = format!("{}/paper/{id}", self.base);
        let params = [("fields", PAPER_FIELDS.to_string())];
        let paper: Paper = self.http.get_json_with(&url, &params, &self.headers()).await?;
        Ok(paper.into_metadata())
    }
}

#[async_trait::async_trait]
impl Engine for SemanticScholarEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::SemanticScholar
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let id = require_identifier(route, "semantic_scholar")?;
        let mut meta = self.paper(id).await?;
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}

#[async_trait::async_trait]
impl SearchEngine for SemanticScholarEngine {
    fn name(&self) -> &'static str {
        "semantic_scholar"
    }

    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<CitationMetadata>> {
        let url = format!("{}/paper/search", self.base);
        let text = match &query.author {
            Some(author) if !query.text.contains(author.as_str()) => format!("{author} {}", query.text),
            _ => query.text.clone(),
        };
        let mut params = vec![
            ("query", text),
            ("limit", query.limit.max(1).to_string()),
            ("fields", PAPER_FIELDS.to_string()),
        ];
        if let Some(year) = query.year {
            params.push(("year", year.to_string()));
        }

        let page: SearchPage = self.http.get_json_with(&url, &params, &self.headers()).await?;
        let results: Vec<_> = page
            .data
            .into_iter()
            .map(Paper::into_metadata)
            .filter(CitationMetadata::is_complete)
            .collect();

        if results.is_empty() {
            return Err(ClientError::no_results("semantic_scholar", &query.text));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_mapping() {
        let json = serde_json::json!({
            "paperId": "204e3073870fae3d05bcbc2f6a8e263d9b72e776",
            "title": "Attention is All you Need",
            "authors": [{"authorId": "1", "name": "Ashish Vaswani"}],
            "year": 2017,
            "venue": "Neural Information Processing Systems",
            "journal": {"name": "", "pages": "5998-6008", "volume": "30"},
            "externalIds": {"ArXiv": "1706.03762", "DBLP": "conf/nips/VaswaniSPUJGKP17"},
            "publicationTypes": ["JournalArticle", "Conference"]
        });
        let meta = serde_json::from_value::<Paper>(json).unwrap().into_metadata();
        assert_eq!(meta.citation_type, CitationType::Preprint);
        assert_eq!(meta.journal.as_deref(), Some("Neural Information Processing Systems"));
        assert_eq!(meta.pages.as_deref(), Some("5998-6008"));
        assert_eq!(meta.year.as_deref(), Some("2017"));
    }
}
