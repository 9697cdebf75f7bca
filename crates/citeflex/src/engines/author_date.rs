//! Author-date references: `(Smith, 2020)` to a full record.
//!
//! The surname and year are searched in Crossref, OpenAlex and Semantic
//! Scholar at once; every hit is scored and the best one is kept when it
//! clears [`AuthorDateEngine::THRESHOLD`].

use std::sync::Arc;

use futures::future::join_all;

use super::{CrossrefEngine, EngineContext, OpenAlexEngine, SearchEngine, SearchQuery, SemanticScholarEngine};
use crate::error::{ClientError, ClientResult};
use crate::models::CitationMetadata;

/// A candidate with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub metadata: CitationMetadata,
    pub confidence: f64,
    /// Engine that found it.
    pub source: &'static str,
}

/// How well a record matches a surname and year, from 0.0 to 1.0.
///
/// Exact year +0.3 (one year off +0.2), surname among the authors +0.3,
/// second surname +0.15, DOI +0.15, and +0.05 each for a title, a venue or
/// publisher, and a volume or page range.
#[must_use]
pub fn confidence(meta: &CitationMetadata, author: &str, year: i32, second_author: Option<&str>) -> f64 {
    let mut score = 0.0;

    match meta.year() {
        Some(y) if y == year => score += 0.3,
        Some(y) if (y - year).abs() <= 1 => score += 0.2,
        _ => {}
    }

    let authors: Vec<String> = meta.authors.iter().map(|a| a.to_lowercase()).collect();
    let mentions = |name: &str| {
        let name = name.to_lowercase();
        authors.iter().any(|a| a.contains(&name))
    };
    if mentions(author) {
        score += 0.3;
    }
    if second_author.is_some_and(mentions) {
        score += 0.15;
    }

    if meta.doi.is_some() {
        score += 0.15;
    }

    let completeness = [
        meta.title.is_some(),
        meta.journal.is_some() || meta.publisher.is_some(),
        meta.volume.is_some() || meta.pages.is_some(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    score += completeness as f64 * 0.05;

    score.min(1.0)
}

/// Concurrent author-year search.
#[derive(Clone)]
pub struct AuthorDateEngine {
    engines: Vec<Arc<dyn SearchEngine>>,
}

impl std::fmt::Debug for AuthorDateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.engines.iter().map(|e| e.name()).collect();
        f.debug_struct("AuthorDateEngine").field("engines", &names).finish()
    }
}

impl AuthorDateEngine {
    /// Minimum confidence for a match.
    pub const THRESHOLD: f64 = 0.6;

    /// Crossref, OpenAlex and Semantic Scholar.
    #[must_use]
    pub fn new(ctx: &EngineContext) -> Self {
        Self::with_engines(vec![
            Arc::new(CrossrefEngine::new(ctx)),
            Arc::new(OpenAlexEngine::new(ctx)),
            Arc::new(SemanticScholarEngine::new(ctx)),
        ])
    }

    /// Search a custom set of engines.
    #[must_use]
    pub fn with_engines(engines: Vec<Arc<dyn SearchEngine>>) -> Self {
        Self { engines }
    }

    /// Every scored candidate, best first.
    pub async fn candidates(&self, author: &str, year: i32, second_author: Option<&str>) -> Vec<Scored> {
        let text = match second_author {
            Some(second) => format!("{author} {second} {year}"),
            None => format!("{author} {year}"),
        };
        let query = SearchQuery { text, author: Some(author.to_string()), year: Some(year), limit: 5 };

        let searches = self.engines.iter().map(|engine| {
            let query = &query;
            async move { (engine.name(), engine.search(query).await) }
        });

        let mut scored: Vec<Scored> = join_all(searches)
            .await
            .into_iter()
            .flat_map(|(source, result)| match result {
                Ok(hits) => hits.into_iter().map(move |m| (source, m)).collect::<Vec<_>>(),
                Err(e) => {
                    tracing::debug!(source, error = %e, "author-date search failed");
                    Vec::new()
                }
            })
            .filter_map(|(source, metadata)| {
                // Crossref and OpenAlex are filtered on the exact year.
                let strict = matches!(source, "crossref" | "openalex");
                if strict && metadata.year() != Some(year) {
                    return None;
                }
                let mut confidence = confidence(&metadata, author, year, second_author);
                if source == "crossref" && metadata.doi.is_some() {
                    confidence = (confidence + 0.1).min(1.0);
                }
                Some(Scored { metadata, confidence, source })
            })
            .collect();

        scored.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        scored
    }

    /// Best record for `(author, year)`.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for undated references and `NoResults` when no
    /// candidate clears the threshold.
    pub async fn search(
        &self,
        author: &str,
        year: &str,
        second_author: Option<&str>,
    ) -> ClientResult<CitationMetadata> {
        let reference = format!("({author}, {year})");
        if year.eq_ignore_ascii_case("n.d.") {
            return Err(ClientError::bad_request(format!("{reference}: undated references cannot be searched")));
        }
        let year_num: i32 = year
            .get(..4)
            .and_then(|y| y.parse().ok())
            .ok_or_else(|| ClientError::bad_request(format!("{reference}: invalid year")))?;

        let candidates = self.candidates(author, year_num, second_author).await;
        let best = candidates.into_iter().next();
        if let Some(best) = &best {
            tracing::debug!(reference, source = best.source, confidence = best.confidence, "best author-date match");
        }

        let mut best = best
            .filter(|b| b.confidence >= Self::THRESHOLD)
            .ok_or_else(|| ClientError::no_results("author_date", reference.clone()))?;
        best.metadata.raw_source = Some(reference);
        Ok(best.metadata)
    }
}
