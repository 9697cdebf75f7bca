//! Note sequences.
//!
//! A list of notes is resolved in two passes. The first resolves every note
//! that names a source, concurrently. The second walks the notes in order
//! and picks the form of each: ibid when the source repeats the previous
//! note, short form when it was cited earlier, full form otherwise.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::CiteResult;
use crate::formatters::get_formatter;
use crate::input::{extract_ibid_page, is_ibid};
use crate::models::{CitationForm, CitationMetadata, CitationStyle, normalize_doi};
use crate::resolver::Citeflex;

/// One note after processing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedNote {
    /// 1-based note number.
    pub number: usize,
    /// Text as written.
    pub original: String,
    /// Formatted citation, or the original text when the note failed.
    pub formatted: String,
    pub form: CitationForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CitationMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessedNote {
    fn failed(number: usize, original: &str, error: impl Into<String>) -> Self {
        Self {
            number,
            original: original.to_string(),
            formatted: original.to_string(),
            form: CitationForm::Full,
            metadata: None,
            error: Some(error.into()),
        }
    }

    /// True when the note resolved.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Sources cited so far and the source of the previous note.
#[derive(Debug, Default)]
pub struct CitationHistory {
    previous: Option<String>,
    seen: HashSet<String>,
}

impl CitationHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form for the next citation of `key`, recording the citation.
    pub fn cite(&mut self, key: &str) -> CitationForm {
        let form = if self.previous.as_deref() == Some(key) {
            CitationForm::Ibid
        } else if self.seen.contains(key) {
            CitationForm::Short
        } else {
            CitationForm::Full
        };
        self.seen.insert(key.to_string());
        self.previous = Some(key.to_string());
        form
    }

    /// Source of the previous note.
    #[must_use]
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Break the ibid chain (after a note that did not resolve).
    pub fn interrupt(&mut self) {
        self.previous = None;
    }
}

/// URL lowercased, without query, fragment or trailing slash.
fn normalize_url(url: &str) -> String {
    let url = url.trim().to_lowercase();
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].trim_end_matches('/').to_string()
}

fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Identity of a source, for spotting repeats.
///
/// DOI first, then URL, then case name with reporter citation, then title
/// with first author, then case name alone.
#[must_use]
pub fn source_key(meta: &CitationMetadata) -> String {
    if let Some(doi) = meta.doi.as_deref().filter(|d| !d.trim().is_empty()) {
        return format!("doi:{}", normalize_doi(doi));
    }
    if let Some(url) = meta.url.as_deref().filter(|u| !u.trim().is_empty()) {
        return format!("url:{}", normalize_url(url));
    }
    if let (Some(case), Some(citation)) = (&meta.case_name, &meta.citation) {
        return format!("case:{}|{}", normalize_text(case), normalize_text(citation));
    }
    if let Some(title) = &meta.title {
        let author = meta.first_author_family().unwrap_or_default();
        return format!("title:{}|{}", normalize_text(title), normalize_text(&author));
    }
    if let Some(case) = &meta.case_name {
        return format!("case:{}", normalize_text(case));
    }
    format!("raw:{}", normalize_text(meta.raw_source.as_deref().unwrap_or_default()))
}

/// Resolve and format a list of notes.
///
/// Lookups run concurrently, at most `max_concurrent_lookups` at a time;
/// results come back in note order.
pub async fn process_notes(citeflex: &Citeflex, notes: &[String], style: CitationStyle) -> Vec<ProcessedNote> {
    let limit = citeflex.config().max_concurrent_lookups.max(1);

    let lookups: Vec<Option<CiteResult<CitationMetadata>>> = stream::iter(notes.iter().cloned())
        .map(|text| async move {
            if is_ibid(&text) || text.trim().is_empty() {
                None
            } else {
                Some(citeflex.resolve(&text).await.map(|r| r.metadata))
            }
        })
        .buffered(limit)
        .collect()
        .await;

    sequence(notes, lookups, style)
}

/// Assign forms and format, in note order.
fn sequence(
    notes: &[String],
    lookups: Vec<Option<CiteResult<CitationMetadata>>>,
    style: CitationStyle,
) -> Vec<ProcessedNote> {
    let formatter = get_formatter(style);
    let mut history = CitationHistory::new();
    let mut last: Option<CitationMetadata> = None;
    let mut processed = Vec::with_capacity(notes.len());

    for (i, (text, lookup)) in notes.iter().zip(lookups).enumerate() {
        let number = i + 1;
        let note = match lookup {
            None if is_ibid(text) => match &last {
                Some(meta) => {
                    let form = history.cite(&source_key(meta));
                    let page = extract_ibid_page(text);
                    ProcessedNote {
                        number,
                        original: text.clone(),
                        formatted: formatter.format(meta, form, page.as_deref()),
                        form,
                        metadata: Some(meta.clone()),
                        error: None,
                    }
                }
                None => ProcessedNote::failed(number, text, "Ibid with no preceding citation"),
            },
            None => {
                history.interrupt();
                last = None;
                ProcessedNote::failed(number, text, "Empty note")
            }
            Some(Ok(meta)) => {
                let form = history.cite(&source_key(&meta));
                let note = ProcessedNote {
                    number,
                    original: text.clone(),
                    formatted: formatter.format(&meta, form, None),
                    form,
                    metadata: Some(meta.clone()),
                    error: None,
                };
                last = Some(meta);
                note
            }
            Some(Err(e)) => {
                tracing::info!(note = number, error = %e, "note could not be resolved");
                history.interrupt();
                last = None;
                ProcessedNote::failed(number, text, e.to_string())
            }
        };
        processed.push(note);
    }

    processed
}
