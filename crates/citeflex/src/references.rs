//! Reference lists for author-date documents.
//!
//! Every `(Author, Year)` citation in a body of text is found, each distinct
//! one is looked up once, and the results are sorted into a reference list.
//! A citation that cannot be resolved keeps a placeholder entry, so the list
//! always accounts for every source cited.

use std::collections::HashSet;
use std::sync::LazyLock;

use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::Serialize;

use crate::error::CiteError;
use crate::formatters::get_formatter;
use crate::models::{CitationMetadata, CitationStyle};
use crate::resolver::Citeflex;

const SURNAME: &str = r"\p{Lu}[\p{L}'’\-]+";
const YEAR: &str = r"\d{4}[a-z]?|n\.d\.";

/// Inside of a parenthetical that mentions a year.
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*?(?:\d{4}|n\.d\.)[^()]*)\)").expect("valid parenthetical regex"));

/// One citation inside a parenthetical: `see Smith & Jones, 2019, 2020, p. 4`.
static CITED_WORK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:(?:see also|see|e\.g\.|cf\.|i\.e\.),?\s+)?(?P<author>{SURNAME})(?:\s+(?:and|&)\s+(?P<second>{SURNAME}))?(?:\s+et\s+al\.?)?,?\s+(?P<years>(?:{YEAR})(?:\s*,\s*(?:{YEAR}))*)(?:\s*,\s*(?:pp?\.|chap\.|para\.)\s*\S+)?$"
    ))
    .expect("valid cited-work regex")
});

/// Narrative citation: `Smith and Jones (2019)`, `Smith et al. (2020, p. 4)`.
static NARRATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<author>{SURNAME})(?:\s+(?:and|&)\s+(?P<second>{SURNAME}))?(?:\s+et\s+al\.?)?\s+\((?P<year>{YEAR})(?:,\s*[^)]*)?\)"
    ))
    .expect("valid narrative regex")
});

static YEAR_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").expect("valid split regex"));

/// Capitalized words that precede a year in parentheses without being authors.
const NOT_AUTHORS: &[&str] = &[
    "In", "The", "This", "That", "See", "Table", "Figure", "Fig", "Chapter", "Section", "Appendix", "Since", "Until",
    "From", "After", "Before", "During", "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December",
];

/// An in-text author-date citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InTextCitation {
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_author: Option<String>,
    /// Year as written, `2020a` and `n.d.` included.
    pub year: String,
}

impl InTextCitation {
    fn new(author: &str, second_author: Option<&str>, year: &str) -> Self {
        Self {
            author: author.to_string(),
            second_author: second_author.map(str::to_string),
            year: year.to_string(),
        }
    }

    /// `Smith, 2020` or `Smith & Jones, 2019`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.second_author {
            Some(second) => format!("{} & {second}, {}", self.author, self.year),
            None => format!("{}, {}", self.author, self.year),
        }
    }

    fn key(&self) -> (String, String, String) {
        (
            self.author.to_lowercase(),
            self.year.to_lowercase(),
            self.second_author.as_deref().unwrap_or_default().to_lowercase(),
        )
    }
}

/// Distinct author-date citations in `text`, in order of first appearance.
#[must_use]
pub fn extract_citations(text: &str) -> Vec<InTextCitation> {
    let mut found: Vec<(usize, InTextCitation)> = Vec::new();

    for caps in PARENTHETICAL_RE.captures_iter(text) {
        let Some(inner) = caps.get(1) else { continue };
        for part in inner.as_str().split(';') {
            let Some(work) = CITED_WORK_RE.captures(part.trim()) else { continue };
            let second = work.name("second").map(|m| m.as_str());
            for year in YEAR_SPLIT_RE.split(&work["years"]) {
                found.push((inner.start(), InTextCitation::new(&work["author"], second, year)));
            }
        }
    }

    for caps in NARRATIVE_RE.captures_iter(text) {
        let author = &caps["author"];
        if NOT_AUTHORS.contains(&author) {
            continue;
        }
        let start = caps.get(0).map_or(0, |m| m.start());
        found.push((start, InTextCitation::new(author, caps.name("second").map(|m| m.as_str()), &caps["year"])));
    }

    found.sort_by_key(|(start, _)| *start);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, citation)| citation)
        .filter(|citation| seen.insert(citation.key()))
        .collect()
}

/// One reference-list entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub citation: InTextCitation,
    /// Formatted entry, or a `[NOT FOUND: …]`/`[ERROR: …]` placeholder.
    pub formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CitationMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReferenceEntry {
    /// True when the citation resolved.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.metadata.is_some()
    }
}

/// A sorted reference list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceList {
    pub style: CitationStyle,
    pub entries: Vec<ReferenceEntry>,
}

impl ReferenceList {
    /// Section heading the style uses.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self.style {
            CitationStyle::Chicago => "Bibliography",
            CitationStyle::Apa => "References",
            CitationStyle::Mla => "Works Cited",
        }
    }

    /// Entries that resolved.
    #[must_use]
    pub fn found(&self) -> usize {
        self.entries.iter().filter(|e| e.is_found()).count()
    }

    /// Heading and entries, one blank line apart.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![self.heading().to_string()];
        lines.extend(self.entries.iter().map(|entry| entry.formatted.clone()));
        lines.join("\n\n")
    }
}

/// Find, resolve and format every author-date citation in `text`.
///
/// Lookups run concurrently, at most `max_concurrent_lookups` at a time.
/// Entries are sorted by first author, year and second author.
pub async fn build_references(citeflex: &Citeflex, text: &str, style: CitationStyle) -> ReferenceList {
    let citations = extract_citations(text);
    tracing::debug!(citations = citations.len(), "author-date citations found");

    let limit = citeflex.config().max_concurrent_lookups.max(1);
    let formatter = get_formatter(style);

    let mut entries: Vec<ReferenceEntry> = stream::iter(citations)
        .map(|citation| async move {
            let result = citeflex
                .resolve_author_date(&citation.author, &citation.year, citation.second_author.as_deref())
                .await;
            (citation, result)
        })
        .buffered(limit)
        .map(|(citation, result)| match result {
            Ok(meta) => ReferenceEntry {
                formatted: formatter.format_bibliography(&meta),
                citation,
                metadata: Some(meta),
                error: None,
            },
            Err(e) => {
                let tag = if matches!(e, CiteError::NoMatch(_)) { "NOT FOUND" } else { "ERROR" };
                tracing::info!(citation = %citation.label(), error = %e, "reference not resolved");
                ReferenceEntry {
                    formatted: format!("[{tag}: {}]", citation.label()),
                    citation,
                    metadata: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
        .await;

    entries.sort_by_key(|entry| entry.citation.key());
    ReferenceList { style, entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(author: &str, second: Option<&str>, year: &str) -> InTextCitation {
        InTextCitation::new(author, second, year)
    }

    #[test]
    fn test_parenthetical_citations() {
        let text = "Loss aversion is robust (Kahneman & Tversky, 1979; see Thaler, 1980, 1985, p. 12).";
        assert_eq!(
            extract_citations(text),
            vec![
                cite("Kahneman", Some("Tversky"), "1979"),
                cite("Thaler", None, "1980"),
                cite("Thaler", None, "1985"),
            ]
        );
    }

    #[test]
    fn test_narrative_citations() {
        let text = "Diener et al. (2014) and Smith and Jones (2019, p. 4) disagree with Bandura (n.d.).";
        assert_eq!(
            extract_citations(text),
            vec![
                cite("Diener", None, "2014"),
                cite("Smith", Some("Jones"), "2019"),
                cite("Bandura", None, "n.d."),
            ]
        );
    }

    #[test]
    fn test_duplicates_and_noise() {
        let text = "As shown in Table (2020) and (Smith, 2020), Smith (2020) holds; (see Figure 3) (n = 2020).";
        assert_eq!(extract_citations(text), vec![cite("Smith", None, "2020")]);
    }

    #[test]
    fn test_letter_suffixed_years_are_distinct() {
        let found = extract_citations("(Smith, 2020a; Smith, 2020b)");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].year, "2020b");
    }

    #[test]
    fn test_labels_and_sort_key() {
        let pair = cite("Smith", Some("Jones"), "2019");
        assert_eq!(pair.label(), "Smith & Jones, 2019");
        assert!(cite("adams", None, "2021").key() < pair.key());
        assert!(cite("Smith", None, "2019").key() < pair.key());
    }

    #[test]
    fn test_render() {
        let list = ReferenceList {
            style: CitationStyle::Apa,
            entries: vec![ReferenceEntry {
                citation: cite("Smith", None, "2020"),
                formatted: "[NOT FOUND: Smith, 2020]".to_string(),
                metadata: None,
                error: Some("No match".to_string()),
            }],
        };
        assert_eq!(list.render(), "References\n\n[NOT FOUND: Smith, 2020]");
        assert_eq!(list.found(), 0);
    }
}
