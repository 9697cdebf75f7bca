//! PubMed / PubMed Central via NCBI E-utilities `esummary`.

use std::collections::HashMap;

use serde::Deserialize;

use super::{Engine, EngineContext, non_empty, require_identifier};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate};
use crate::router::{EngineKind, Route};

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    result: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<Author>,
    #[serde(default)]
    fulljournalname: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    pubdate: Option<String>,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    issue: Option<String>,
    #[serde(default)]
    pages: Option<String>,
    #[serde(default)]
    articleids: Vec<ArticleId>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
    #[serde(default)]
    authtype: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleId {
    idtype: String,
    value: String,
}

/// `Zhou P` → `Zhou, P.`; `Smith JA` → `Smith, J. A.`
fn medline_name(name: &str) -> String {
    match name.rsplit_once(' ') {
        Some((family, initials))
            if !initials.is_empty() && initials.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            let given: Vec<String> = initials.chars().map(|c| format!("{c}.")).collect();
            format!("{family}, {}", given.join(" "))
        }
        _ => name.to_string(),
    }
}

impl Summary {
    fn into_metadata(self, id: &str) -> CitationMetadata {
        let doi = self.articleids.iter().find(|a| a.idtype == "doi").map(|a| a.value.clone());
        let pmid = self
            .articleids
            .iter()
            .find(|a| a.idtype == "pubmed" || a.idtype == "pmid")
            .map(|a| a.value.clone())
            .or_else(|| (!id.starts_with("PMC")).then(|| id.to_string()));

        let date = self.pubdate.as_deref().and_then(PubDate::parse);
        let url = if id.starts_with("PMC") {
            format!("https://www.ncbi.nlm.nih.gov/pmc/articles/{id}/")
        } else {
            format!("https://pubmed.ncbi.nlm.nih.gov/{id}/")
        };

        CitationMetadata {
            citation_type: CitationType::Medical,
            title: non_empty(self.title.as_deref()).map(|t| t.trim_end_matches('.').to_string()),
            authors: self
                .authors
                .iter()
                .filter(|a| a.authtype.as_deref().is_none_or(|t| t == "Author"))
                .map(|a| medline_name(&a.name))
                .collect(),
            date: date.map(|d| d.to_string()),
            year: date.map(|d| d.year.to_string()),
            journal: non_empty(self.fulljournalname.as_deref().or(self.source.as_deref())),
            volume: non_empty(self.volume.as_deref()),
            issue: non_empty(self.issue.as_deref()),
            pages: non_empty(self.pages.as_deref()),
            doi,
            pmid,
            url: Some(url),
            source_engine: Some("pubmed".to_string()),
            ..CitationMetadata::default()
        }
    }
}

/// NCBI E-utilities engine.
#[derive(Debug, Clone)]
pub struct PubmedEngine {
    http: HttpClient,
    base: String,
    api_key: Option<String>,
}

impl PubmedEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self {
            http: ctx.http.clone(),
            base: ctx.config.endpoints.pubmed.clone(),
            api_key: ctx.config.ncbi_api_key.clone(),
        }
    }

    /// Summary for a PMID, or a PMCID when prefixed with `PMC`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is unknown.
    pub async fn summary(&self, id: &str) -> ClientResult<CitationMetadata> {
        let (db, uid) = match id.strip_prefix("PMC") {
            Some(num) => ("pmc", num),
            None => ("pubmed", id),
        };
        let url = format!("{}/esummary.fcgi", self.base);
        let mut params = vec![
            ("db", db.to_string()),
            ("id", uid.to_string()),
            ("retmode", "json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let response: SummaryResponse = self.http.get_json(&url, &params).await?;
        let record = response
            .result
            .and_then(|mut r| r.remove(uid))
            .ok_or_else(|| ClientError::not_found(format!("PubMed record {id}")))?;
        let summary: Summary = serde_json::from_value(record)?;
        if let Some(error) = &summary.error {
            return Err(ClientError::not_found(format!("PubMed record {id}: {error}")));
        }
        Ok(summary.into_metadata(id))
    }
}

#[async_trait::async_trait]
impl Engine for PubmedEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Pubmed
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let id = require_identifier(route, "pubmed")?;
        let mut meta = self.summary(id).await?;
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medline_names() {
        assert_eq!(medline_name("Zhou P"), "Zhou, P.");
        assert_eq!(medline_name("van der Berg JA"), "van der Berg, J. A.");
        assert_eq!(medline_name("WHO Consortium"), "WHO Consortium");
    }

    #[test]
    fn test_summary_mapping() {
        let json = serde_json::json!({
            "uid": "32015507",
            "title": "A pneumonia outbreak associated with a new coronavirus of probable bat origin.",
            "authors": [{"name": "Zhou P", "authtype": "Author"}, {"name": "Shi ZL", "authtype": "Author"}],
            "source": "Nature",
            "fulljournalname": "Nature",
            "pubdate": "2020 Mar",
            "volume": "579",
            "issue": "7798",
            "pages": "270-273",
            "articleids": [{"idtype": "doi", "value": "10.1038/s41586-020-2012-7"}]
        });
        let meta = serde_json::from_value::<Summary>(json).unwrap().into_metadata("32015507");
        assert_eq!(
            meta.title.as_deref(),
            Some("A pneumonia outbreak associated with a new coronavirus of probable bat origin")
        );
        assert_eq!(meta.authors, vec!["Zhou, P.", "Shi, Z. L."]);
        assert_eq!(meta.date.as_deref(), Some("2020-03"));
        assert_eq!(meta.pmid.as_deref(), Some("32015507"));
        assert_eq!(meta.doi.as_deref(), Some("10.1038/s41586-020-2012-7"));
    }
}
