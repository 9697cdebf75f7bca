//! Crossref: DOI lookup and bibliographic search.

use serde::Deserialize;

use super::{Engine, EngineContext, SearchEngine, SearchQuery, non_empty, require_identifier};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate, strip_doi};
use crate::router::{EngineKind, Route};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: T,
}

#[derive(Debug, Deserialize)]
struct WorkList {
    #[serde(default)]
    items: Vec<Work>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Work {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    subtitle: Vec<String>,
    #[serde(default)]
    author: Vec<Contributor>,
    #[serde(default)]
    container_title: Vec<String>,
    #[serde(default)]
    published_print: Option<DateParts>,
    #[serde(default)]
    published_online: Option<DateParts>,
    #[serde(default)]
    issued: Option<DateParts>,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    issue: Option<String>,
    #[serde(default)]
    page: Option<String>,
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    publisher_location: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(rename = "ISBN", default)]
    isbn: Vec<String>,
    #[serde(default)]
    edition_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
    /// Corporate authors carry only `name`.
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateParts {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl DateParts {
    fn to_date(&self) -> Option<PubDate> {
        let parts = self.date_parts.first()?;
        let year = (*parts.first()?)?;
        let month = parts.get(1).copied().flatten().and_then(|m| u32::try_from(m).ok());
        let day = parts.get(2).copied().flatten().and_then(|d| u32::try_from(d).ok());
        Some(PubDate::from_parts(year, month, day))
    }
}

impl Work {
    fn into_metadata(self) -> CitationMetadata {
        let citation_type = match self.kind.as_deref() {
            Some("book" | "monograph" | "edited-book" | "reference-book" | "book-chapter") => {
                CitationType::Book
            }
            Some("posted-content") => CitationType::Preprint,
            _ => CitationType::Journal,
        };

        let date = [&self.published_print, &self.published_online, &self.issued]
            .into_iter()
            .flatten()
            .find_map(DateParts::to_date);

        let mut title = non_empty(self.title.first().map(String::as_str));
        if let (Some(t), Some(sub)) = (&mut title, non_empty(self.subtitle.first().map(String::as_str))) {
            if !t.ends_with(['?', '!', ':']) {
                t.push(':');
            }
            t.push(' ');
            t.push_str(&sub);
        }

        let authors = self
            .author
            .iter()
            .filter_map(|a| match (&a.given, &a.family, &a.name) {
                (Some(given), Some(family), _) => Some(format!("{} {}", given.trim(), family.trim())),
                (None, Some(family), _) => Some(family.trim().to_string()),
                (_, None, Some(name)) => Some(name.trim().to_string()),
                _ => None,
            })
            .collect();

        let container = non_empty(self.container_title.first().map(String::as_str));
        let is_book = citation_type == CitationType::Book;

        CitationMetadata {
            citation_type,
            title,
            authors,
            date: date.map(|d| d.to_string()),
            year: date.map(|d| d.year.to_string()),
            journal: if is_book { None } else { container },
            publisher: non_empty(self.publisher.as_deref()),
            place: non_empty(self.publisher_location.as_deref()),
            volume: non_empty(self.volume.as_deref()),
            issue: non_empty(self.issue.as_deref()),
            pages: non_empty(self.page.as_deref()),
            edition: non_empty(self.edition_number.as_deref()),
            doi: self.doi.map(|d| strip_doi(&d).to_string()),
            isbn: self.isbn.into_iter().next(),
            url: self.url,
            source_engine: Some("crossref".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// Crossref REST API engine.
#[derive(Debug, Clone)]
pub struct CrossrefEngine {
    http: HttpClient,
    base: String,
    mailto: Option<String>,
}

impl CrossrefEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            base: ctx.config.endpoints.crossref.clone(),
            mailto: ctx.config.mailto.clone(),
        }
    }

    fn polite(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }
        params
    }

    /// Look up one DOI.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown DOIs and transport errors otherwise.
    pub async fn work(&self, doi: &str) -> ClientResult<CitationMetadata> {
        let doi = strip_doi(doi);
        let url = format!("{}/works/{doi}", self.base);
        tracing::debug!(doi, "crossref lookup");

        let envelope: Envelope<Work> = self.http.get_json(&url, &self.polite(vec![])).await?;
        let mut meta = envelope.message.into_metadata();
        if meta.doi.is_none() {
            meta.doi = Some(doi.to_string());
        }
        Ok(meta)
    }
}

#[async_trait::async_trait]
impl Engine for CrossrefEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Crossref
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let doi = require_identifier(route, "crossref")?;
        let mut meta = self.work(doi).await?;
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}

#[async_trait::async_trait]
impl SearchEngine for CrossrefEngine {
    fn name(&self) -> &'static str {
        "crossref"
    }

    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<CitationMetadata>> {
        let url = format!("{}/works", self.base);
        let mut params = vec![
            ("query.bibliographic", query.text.clone()),
            ("rows", query.limit.max(1).to_string()),
        ];
        if let Some(author) = &query.author {
            params.push(("query.author", author.clone()));
        }
        if let Some(year) = query.year {
            params.push(("filter", format!("from-pub-date:{year},until-pub-date:{year}")));
        }

        let envelope: Envelope<WorkList> = self.http.get_json(&url, &self.polite(params)).await?;
        let results: Vec<_> = envelope
            .message
            .items
            .into_iter()
            .map(Work::into_metadata)
            .filter(CitationMetadata::is_complete)
            .collect();

        if results.is_empty() {
            return Err(ClientError::no_results("crossref", &query.text));
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
            "title": ["Deep learning"],
            "author": [
                {"given": "Yann", "family": "LeCun"},
                {"name": "OpenAI Team"}
            ],
            "container-title": ["Nature"],
            "published-print": {"date-parts": [[2015, 5, 28]]},
            "volume": "521",
            "issue": "7553",
            "page": "436-444",
            "DOI": "10.1038/nature14539",
            "type": "journal-article"
        });
        let work: Work = serde_json::from_value(json).unwrap();
        let meta = work.into_metadata();
        assert_eq!(meta.citation_type, CitationType::Journal);
        assert_eq!(meta.title.as_deref(), Some("Deep learning"));
        assert_eq!(meta.authors, vec!["Yann LeCun", "OpenAI Team"]);
        assert_eq!(meta.date.as_deref(), Some("2015-05-28"));
        assert_eq!(meta.journal.as_deref(), Some("Nature"));
        assert_eq!(meta.pages.as_deref(), Some("436-444"));
    }

    #[test]
    fn test_null_date_parts_and_subtitle() {
        let json = serde_json::json!({
            "title": ["Thinking"],
            "subtitle": ["Fast and Slow"],
            "issued": {"date-parts": [[null]]},
            "type": "book",
            "container-title": ["Ignored"]
        });
        let meta = serde_json::from_value::<Work>(json).unwrap().into_metadata();
        assert_eq!(meta.title.as_deref(), Some("Thinking: Fast and Slow"));
        assert_eq!(meta.date, None);
        assert_eq!(meta.citation_type, CitationType::Book);
        assert_eq!(meta.journal, None);
    }
}
