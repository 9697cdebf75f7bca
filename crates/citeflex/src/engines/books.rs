//! Books: Google Books first, Open Library as fallback.

use std::collections::HashMap;

use serde::Deserialize;

use super::{Engine, EngineContext, non_empty, require_identifier};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{EngineKind, Route};

#[derive(Debug, Deserialize)]
struct VolumeList {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: Option<String>,
    #[serde(rename = "volumeInfo")]
    info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryId>,
    #[serde(default)]
    canonical_volume_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryId {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

/// One record from Open Library's `jscmd=data` books API.
#[derive(Debug, Deserialize)]
struct OpenLibraryBook {
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<Named>,
    #[serde(default)]
    publishers: Vec<Named>,
    #[serde(default)]
    publish_places: Vec<Named>,
    #[serde(default)]
    publish_date: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

fn join_subtitle(title: Option<String>, subtitle: Option<&str>) -> Option<String> {
    let title = non_empty(title.as_deref())?;
    match non_empty(subtitle) {
        Some(sub) => Some(format!("{title}: {sub}")),
        None => Some(title),
    }
}

impl Volume {
    fn into_metadata(self) -> CitationMetadata {
        let info = self.info;
        let isbn = ["ISBN_13", "ISBN_10"].iter().find_map(|kind| {
            info.industry_identifiers.iter().find(|i| i.kind == *kind).map(|i| i.identifier.clone())
        });
        let date = info.published_date.as_deref().and_then(PubDate::parse);
        let url = info.canonical_volume_link.or_else(|| {
            self.id.as_deref().map(|id| format!("https://books.google.com/books?id={id}"))
        });
        CitationMetadata {
            citation_type: CitationType::Book,
            title: join_subtitle(info.title, info.subtitle.as_deref()),
            authors: info.authors,
            date: date.map(|d| d.to_string()),
            year: date.map(|d| d.year.to_string()),
            publisher: non_empty(info.publisher.as_deref()),
            isbn,
            url,
            source_engine: Some("google_books".to_string()),
            ..CitationMetadata::default()
        }
    }
}

impl OpenLibraryBook {
    fn into_metadata(self, isbn: Option<&str>) -> CitationMetadata {
        let date = self.publish_date.as_deref().and_then(PubDate::parse);
        CitationMetadata {
            citation_type: CitationType::Book,
            title: join_subtitle(self.title, self.subtitle.as_deref()),
            authors: self.authors.into_iter().map(|a| a.name).collect(),
            date: date.map(|d| d.to_string()),
            year: date.map(|d| d.year.to_string()),
            publisher: self.publishers.into_iter().next().map(|p| p.name),
            place: self.publish_places.into_iter().next().map(|p| p.name),
            isbn: isbn.map(str::to_string),
            url: self.url,
            source_engine: Some("open_library".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// Book lookup engine.
#[derive(Debug, Clone)]
pub struct BooksEngine {
    http: HttpClient,
    google_base: String,
    open_library_base: String,
    api_key: Option<String>,
}

impl BooksEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            google_base: ctx.config.endpoints.google_books.clone(),
            open_library_base: ctx.config.endpoints.open_library.clone(),
            api_key: ctx.config.google_books_api_key.clone(),
        }
    }

    fn keyed(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params
    }

    /// Look up a book by ISBN, trying Google Books then Open Library.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when neither catalogue knows the ISBN.
    pub async fn by_isbn(&self, isbn: &str) -> ClientResult<CitationMetadata> {
        match self.google_isbn(isbn).await {
            Ok(meta) if meta.is_complete() => return Ok(meta),
            Ok(_) => tracing::debug!(isbn, "google books record incomplete"),
            Err(e) => tracing::debug!(isbn, error = %e, "google books lookup failed"),
        }
        self.open_library(&format!("ISBN:{isbn}"), Some(isbn)).await
    }

    async fn google_isbn(&self, isbn: &str) -> ClientResult<CitationMetadata> {
        let url = format!("{}/volumes", self.google_base);
        let params = self.keyed(vec![("q", format!("isbn:{isbn}"))]);
        let list: VolumeList = self.http.get_json(&url, &params).await?;
        let mut meta = list
            .items
            .into_iter()
            .next()
            .map(Volume::into_metadata)
            .ok_or_else(|| ClientError::no_results("google_books", isbn))?;
        meta.isbn.get_or_insert_with(|| isbn.to_string());
        Ok(meta)
    }

    async fn google_volume(&self, id: &str) -> ClientResult<CitationMetadata> {
        let url = format!("{}/volumes/{id}", self.google_base);
        let volume: Volume = self.http.get_json(&url, &self.keyed(vec![])).await?;
        Ok(volume.into_metadata())
    }

    /// Open Library lookup by bibkey (`ISBN:…` or `OLID:…`).
    async fn open_library(&self, bibkey: &str, isbn: Option<&str>) -> ClientResult<CitationMetadata> {
        let url = format!("{}/api/books", self.open_library_base);
        let params = [
            ("bibkeys", bibkey.to_string()),
            ("format", "json".to_string()),
            ("jscmd", "data".to_string()),
        ];
        let mut books: HashMap<String, OpenLibraryBook> = self.http.get_json(&url, &params).await?;
        books
            .remove(bibkey)
            .map(|book| book.into_metadata(isbn))
            .ok_or_else(|| ClientError::not_found(format!("Open Library {bibkey}")))
    }
}

#[async_trait::async_trait]
impl Engine for BooksEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Books
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let id = require_identifier(route, "books")?;
        let mut meta = match id.split_once(':') {
            Some(("isbn", isbn)) => self.by_isbn(isbn).await?,
            Some(("gbid", volume)) => self.google_volume(volume).await?,
            Some(("olid", olid)) => self.open_library(&format!("OLID:{olid}"), None).await?,
            _ => return Err(ClientError::bad_request(format!("books: unknown identifier {id}"))),
        };
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_volume_mapping() {
        let json = serde_json::json!({
            "id": "ZuKTvERuPG8C",
            "volumeInfo": {
                "title": "Thinking, Fast and Slow",
                "authors": ["Daniel Kahneman"],
                "publisher": "Farrar, Straus and Giroux",
                "publishedDate": "2011-10-25",
                "industryIdentifiers": [
                    {"type": "ISBN_10", "identifier": "0374275637"},
                    {"type": "ISBN_13", "identifier": "9780374275631"}
                ]
            }
        });
        let meta = serde_json::from_value::<Volume>(json).unwrap().into_metadata();
        assert_eq!(meta.isbn.as_deref(), Some("9780374275631"));
        assert_eq!(meta.year.as_deref(), Some("2011"));
        assert_eq!(meta.url.as_deref(), Some("https://books.google.com/books?id=ZuKTvERuPG8C"));
    }

    #[test]
    fn test_open_library_mapping() {
        let json = serde_json::json!({
            "title": "The Structure of Scientific Revolutions",
            "authors": [{"url": "https://openlibrary.org/authors/OL1A", "name": "Thomas S. Kuhn"}],
            "publishers": [{"name": "University of Chicago Press"}],
            "publish_places": [{"name": "Chicago"}],
            "publish_date": "1962"
        });
        let meta = serde_json::from_value::<OpenLibraryBook>(json)
            .unwrap()
            .into_metadata(Some("9780226458083"));
        assert_eq!(meta.place.as_deref(), Some("Chicago"));
        assert_eq!(meta.publisher.as_deref(), Some("University of Chicago Press"));
        assert_eq!(meta.authors, vec!["Thomas S. Kuhn"]);
        assert_eq!(meta.date.as_deref(), Some("1962"));
    }
}
