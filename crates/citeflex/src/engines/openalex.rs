//! OpenAlex works search.

use serde::Deserialize;

use super::{EngineContext, SearchEngine, SearchQuery, non_empty};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, strip_doi};

#[derive(Debug, Deserialize)]
struct WorksPage {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    authorships: Vec<Authorship>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    publication_year: Option<i32>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    primary_location: Option<Location>,
    #[serde(default)]
    biblio: Option<Biblio>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: Option<AuthorRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    source: Option<Source>,
    #[serde(default)]
    landing_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Source {
    display_name: Option<String>,
    #[serde(default)]
    host_organization_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Biblio {
    volume: Option<String>,
    issue: Option<String>,
    first_page: Option<String>,
    last_page: Option<String>,
}

impl Work {
    fn into_metadata(self) -> CitationMetadata {
        let citation_type = match self.kind.as_deref() {
            Some("book" | "book-chapter" | "monograph") => CitationType::Book,
            Some("preprint" | "posted-content") => CitationType::Preprint,
            _ => CitationType::Journal,
        };

        let pages = self.biblio.as_ref().and_then(|b| match (&b.first_page, &b.last_page) {
            (Some(first), Some(last)) if first != last => Some(format!("{first}-{last}")),
            (Some(first), _) => Some(first.clone()),
            _ => None,
        });

        let (venue, publisher, landing) = match self.primary_location {
            Some(loc) => {
                let (venue, publisher) = loc
                    .source
                    .map(|s| (s.display_name, s.host_organization_name))
                    .unwrap_or_default();
                (venue, publisher, loc.landing_page_url)
            }
            None => (None, None, None),
        };

        let is_book = citation_type == CitationType::Book;
        CitationMetadata {
            citation_type,
            title: non_empty(self.title.as_deref().or(self.display_name.as_deref())),
            authors: self
                .authorships
                .into_iter()
                .filter_map(|a| a.author.and_then(|r| r.display_name))
                .collect(),
            date: self.publication_date,
            year: self.publication_year.map(|y| y.to_string()),
            journal: if is_book { None } else { non_empty(venue.as_deref()) },
            publisher: non_empty(publisher.as_deref()),
            volume: self.biblio.as_ref().and_then(|b| b.volume.clone()),
            issue: self.biblio.as_ref().and_then(|b| b.issue.clone()),
            pages,
            doi: self.doi.as_deref().map(|d| strip_doi(d).to_string()),
            url: landing,
            source_engine: Some("openalex".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// OpenAlex text search.
#[derive(Debug, Clone)]
pub struct OpenAlexEngine {
    http: HttpClient,
    base: String,
    mailto: Option<String>,
}

impl OpenAlexEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            base: ctx.config.endpoints.openalex.clone(),
            mailto: ctx.config.mailto.clone(),
        }
    }
}

#[async_trait::async_trait]
impl SearchEngine for OpenAlexEngine {
    fn name(&self) -> &'static str {
        "openalex"
    }

    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<CitationMetadata>> {
        let url = format!("{}/works", self.base);
        let text = match &query.author {
            Some(author) if !query.text.contains(author.as_str()) => format!("{author} {}", query.text),
            _ => query.text.clone(),
        };
        let mut params = vec![("search", text), ("per-page", query.limit.max(1).to_string())];
        if let Some(year) = query.year {
            params.push(("filter", format!("publication_year:{year}")));
        }
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }

        let page: WorksPage = self.http.get_json(&url, &params).await?;
        let results: Vec<_> = page
            .results
            .into_iter()
            .map(Work::into_metadata)
            .filter(CitationMetadata::is_complete)
            .collect();

        if results.is_empty() {
            return Err(ClientError::no_results("openalex", &query.text));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_mapping() {
        let json = serde_json::json!({
            "title": "Attention is all you need",
            "authorships": [{"author": {"display_name": "Ashish Vaswani"}}],
            "publication_date": "2017-06-12",
            "publication_year": 2017,
            "doi": "https://doi.org/10.48550/arxiv.1706.03762",
            "primary_location": {"source": {"display_name": "arXiv (Cornell University)"}},
            "biblio": {"volume": "30", "issue": null, "first_page": "5998", "last_page": "6008"},
            "type": "preprint"
        });
        let meta = serde_json::from_value::<Work>(json).unwrap().into_metadata();
        assert_eq!(meta.citation_type, CitationType::Preprint);
        assert_eq!(meta.doi.as_deref(), Some("10.48550/arxiv.1706.03762"));
        assert_eq!(meta.pages.as_deref(), Some("5998-6008"));
        assert_eq!(meta.authors, vec!["Ashish Vaswani"]);
    }
}
