//! arXiv export API (Atom feed).

use quick_xml::Reader;
use quick_xml::events::Event;

use super::{Engine, EngineContext, clean_text, require_identifier};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{EngineKind, Route};

/// Fields of one `<entry>` in the feed.
#[derive(Debug, Default)]
struct Entry {
    id: String,
    title: String,
    authors: Vec<String>,
    published: String,
    doi: String,
    journal_ref: String,
}

/// Parse the first entry of an arXiv Atom feed.
///
/// Returns `Ok(None)` when the feed has no entries or only the API's error
/// entry.
fn parse_feed(xml: &str) -> ClientResult<Option<Entry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut entry: Option<Entry> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "entry" && entry.is_none() {
                    entry = Some(Entry::default());
                }
                path.push(name);
            }
            Ok(Event::Text(t)) => {
                let Some(current) = entry.as_mut() else { continue };
                let text = t.unescape().map_err(|e| ClientError::Xml(e.to_string()))?;
                let field = match path.iter().rev().map(String::as_str).collect::<Vec<_>>()[..] {
                    ["id", "entry", ..] => &mut current.id,
                    ["title", "entry", ..] => &mut current.title,
                    ["published", "entry", ..] => &mut current.published,
                    ["doi", "entry", ..] => &mut current.doi,
                    ["journal_ref", "entry", ..] => &mut current.journal_ref,
                    ["name", "author", "entry", ..] => {
                        current.authors.push(clean_text(&text));
                        continue;
                    }
                    _ => continue,
                };
                field.push_str(&text);
            }
            Ok(Event::End(e)) => {
                path.pop();
                if e.local_name().as_ref() == b"entry" {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ClientError::Xml(e.to_string())),
            _ => {}
        }
    }

    Ok(entry.filter(|e| !e.title.is_empty() && e.title != "Error"))
}

impl Entry {
    fn into_metadata(self, arxiv_id: &str) -> CitationMetadata {
        let date = PubDate::parse(&self.published);
        let doi = Some(self.doi.trim().to_string()).filter(|d| !d.is_empty());
        CitationMetadata {
            citation_type: CitationType::Preprint,
            title: Some(clean_text(&self.title)).filter(|t| !t.is_empty()),
            authors: self.authors.into_iter().filter(|a| !a.is_empty()).collect(),
            date: date.map(|d| d.to_string()),
            year: date.map(|d| d.year.to_string()),
            publisher: Some("arXiv".to_string()),
            journal: Some(clean_text(&self.journal_ref)).filter(|j| !j.is_empty()),
            doi,
            arxiv_id: Some(arxiv_id.to_string()),
            url: Some(format!("https://arxiv.org/abs/{arxiv_id}")),
            source_engine: Some("arxiv".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// arXiv engine.
#[derive(Debug, Clone)]
pub struct ArxivEngine {
    http: HttpClient,
    base: String,
}

impl ArxivEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self { http: ctx.http.clone(), base: ctx.config.endpoints.arxiv.clone() }
    }

    /// Look up one arXiv id (`2301.00001` or `hep-th/9901001`).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the feed has no matching entry.
    pub async fn paper(&self, arxiv_id: &str) -> ClientResult<CitationMetadata> {
        let url = format!("{}/query", self.base);
        let params = [("id_list", arxiv_id.to_string()), ("max_results", "1".to_string())];
        let xml = self.http.get_xml(&url, &params).await?;
        tracing::debug!(arxiv_id, bytes = xml.len(), "arxiv feed");

        parse_feed(&xml)?
            .map(|entry| entry.into_metadata(arxiv_id))
            .ok_or_else(|| ClientError::not_found(format!("arXiv {arxiv_id}")))
    }
}

#[async_trait::async_trait]
impl Engine for ArxivEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Arxiv
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let id = require_identifier(route, "arxiv")?;
        let mut meta = self.paper(id).await?;
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: id_list=1706.03762</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <arxiv:doi>10.48550/arXiv.1706.03762</arxiv:doi>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let entry = parse_feed(FEED).unwrap().unwrap();
        let meta = entry.into_metadata("1706.03762");
        assert_eq!(meta.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(meta.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(meta.date.as_deref(), Some("2017-06-12"));
        assert_eq!(meta.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(meta.url.as_deref(), Some("https://arxiv.org/abs/1706.03762"));
    }

    #[test]
    fn test_feed_title_is_not_entry_title() {
        let empty = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>ArXiv Query</title></feed>"#;
        assert!(parse_feed(empty).unwrap().is_none());
    }

    #[test]
    fn test_error_entry_is_none() {
        let error = r#"<feed><entry><id>http://arxiv.org/api/errors</id><title>Error</title></entry></feed>"#;
        assert!(parse_feed(error).unwrap().is_none());
    }
}
