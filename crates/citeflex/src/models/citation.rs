//! The citation record shared by every engine and formatter.

use serde::{Deserialize, Serialize};

use super::PubDate;

/// Category of source, used to pick a formatter template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationType {
    /// Journal article.
    Journal,
    /// Book (monograph or edited volume).
    Book,
    /// Newspaper or magazine article.
    Newspaper,
    /// Government or agency publication.
    Government,
    /// Court decision.
    Legal,
    /// Web page with no better category.
    #[default]
    Webpage,
    /// Online video.
    Video,
    /// Encyclopedia entry (Wikipedia).
    Encyclopedia,
    /// Preprint (arXiv, SSRN).
    Preprint,
    /// Biomedical article (PubMed).
    Medical,
}

impl CitationType {
    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Journal => "journal",
            Self::Book => "book",
            Self::Newspaper => "newspaper",
            Self::Government => "government",
            Self::Legal => "legal",
            Self::Webpage => "webpage",
            Self::Video => "video",
            Self::Encyclopedia => "encyclopedia",
            Self::Preprint => "preprint",
            Self::Medical => "medical",
        }
    }

    /// Journal-like types share the article templates.
    #[must_use]
    pub const fn is_article(self) -> bool {
        matches!(self, Self::Journal | Self::Medical)
    }
}

/// Metadata for one cited work.
///
/// Engines fill in what their provider knows; formatters skip what is missing.
/// Authors are display names, either `Given Family` or `Family, Given`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    pub citation_type: CitationType,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Publication date as supplied by the provider.
    #[serde(default)]
    pub date: Option<String>,

    /// Explicit year when the provider gives one separately.
    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub journal: Option<String>,

    #[serde(default)]
    pub newspaper: Option<String>,

    /// Site name for web pages and videos (e.g. "YouTube").
    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    /// Place of publication.
    #[serde(default)]
    pub place: Option<String>,

    /// Issuing agency for government documents.
    #[serde(default)]
    pub agency: Option<String>,

    #[serde(default)]
    pub volume: Option<String>,

    #[serde(default)]
    pub issue: Option<String>,

    #[serde(default)]
    pub pages: Option<String>,

    #[serde(default)]
    pub edition: Option<String>,

    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub isbn: Option<String>,

    #[serde(default)]
    pub pmid: Option<String>,

    #[serde(default)]
    pub arxiv_id: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    /// Case name for legal citations (`Roe v. Wade`).
    #[serde(default)]
    pub case_name: Option<String>,

    /// Reporter citation (`410 U.S. 113`).
    #[serde(default)]
    pub citation: Option<String>,

    #[serde(default)]
    pub court: Option<String>,

    /// Date the page was consulted, for undated web sources.
    #[serde(default)]
    pub access_date: Option<String>,

    /// Engine that produced this record.
    #[serde(default)]
    pub source_engine: Option<String>,

    /// The user input this record was resolved from.
    #[serde(default)]
    pub raw_source: Option<String>,
}

impl CitationMetadata {
    /// Empty record of the given type.
    #[must_use]
    pub fn new(citation_type: CitationType) -> Self {
        Self { citation_type, ..Default::default() }
    }

    /// Title, falling back to the case name and then "Untitled".
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .or(self.case_name.as_deref())
            .unwrap_or("Untitled")
    }

    /// Parsed publication date.
    #[must_use]
    pub fn parsed_date(&self) -> Option<PubDate> {
        self.date.as_deref().and_then(PubDate::parse).or_else(|| {
            self.year
                .as_deref()
                .and_then(|y| y.trim().parse().ok())
                .map(PubDate::year_only)
        })
    }

    /// Publication year, explicit or derived from the date.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
            .as_deref()
            .and_then(|y| y.trim().parse().ok())
            .or_else(|| self.parsed_date().map(|d| d.year))
    }

    /// Parsed access date.
    #[must_use]
    pub fn parsed_access_date(&self) -> Option<PubDate> {
        self.access_date.as_deref().and_then(PubDate::parse)
    }

    /// First author's display name.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Family name of the first author.
    #[must_use]
    pub fn first_author_family(&self) -> Option<String> {
        self.first_author().map(|a| super::PersonName::parse(a).family)
    }

    /// Container the work appeared in: journal, newspaper, site or agency.
    #[must_use]
    pub fn container(&self) -> Option<&str> {
        self.journal
            .as_deref()
            .or(self.newspaper.as_deref())
            .or(self.website.as_deref())
            .or(self.agency.as_deref())
    }

    /// DOI as a resolver URL.
    #[must_use]
    pub fn doi_url(&self) -> Option<String> {
        self.doi.as_deref().map(|d| format!("https://doi.org/{}", strip_doi(d)))
    }

    /// Link to print: DOI preferred, then URL.
    #[must_use]
    pub fn link(&self) -> Option<String> {
        self.doi_url().or_else(|| self.url.clone())
    }

    /// True when the record is good enough to format.
    ///
    /// Legal citations need a case name; everything else needs a title.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        match self.citation_type {
            CitationType::Legal => has(&self.case_name) || has(&self.title),
            _ => has(&self.title),
        }
    }

    /// Name of the first missing required field.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.is_complete() {
            None
        } else if self.citation_type == CitationType::Legal {
            Some("case name")
        } else {
            Some("title")
        }
    }
}

/// DOI without resolver prefix or `doi:` label, case preserved.
#[must_use]
pub fn strip_doi(doi: &str) -> &str {
    let trimmed = doi.trim();
    let lower = trimmed.to_ascii_lowercase();
    let prefix_len = [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi:",
    ]
    .iter()
    .find(|p| lower.starts_with(*p))
    .map_or(0, |p| p.len());
    trimmed[prefix_len..].trim().trim_end_matches(['.', ',', ';'])
}

/// Canonical DOI for comparisons: stripped and lowercased.
#[must_use]
pub fn normalize_doi(doi: &str) -> String {
    strip_doi(doi).to_lowercase()
}
