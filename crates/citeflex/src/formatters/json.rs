//! Compact JSON views.

use serde_json::{Value, json};

use crate::models::{CitationMetadata, CitationStyle};
use crate::notes::ProcessedNote;
use crate::references::ReferenceList;
use crate::resolver::FormattedCitation;
use crate::router::{Route, UrlType};

/// Compact metadata: fixed keys plus whichever optional fields are present.
#[must_use]
pub fn compact_metadata(meta: &CitationMetadata) -> Value {
    let mut obj = json!({
        "type": meta.citation_type.label(),
        "title": meta.title_or_default(),
        "year": meta.year(),
    });

    if !meta.authors.is_empty() {
        obj["authors"] = json!(meta.authors);
    }

    let optional = [
        ("date", &meta.date),
        ("journal", &meta.journal),
        ("newspaper", &meta.newspaper),
        ("website", &meta.website),
        ("publisher", &meta.publisher),
        ("place", &meta.place),
        ("agency", &meta.agency),
        ("volume", &meta.volume),
        ("issue", &meta.issue),
        ("pages", &meta.pages),
        ("edition", &meta.edition),
        ("isbn", &meta.isbn),
        ("pmid", &meta.pmid),
        ("arxiv", &meta.arxiv_id),
        ("url", &meta.url),
        ("caseName", &meta.case_name),
        ("citation", &meta.citation),
        ("court", &meta.court),
        ("accessed", &meta.access_date),
        ("engine", &meta.source_engine),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            obj[key] = json!(value);
        }
    }

    if let Some(doi) = &meta.doi {
        obj["doi"] = json!(crate::models::strip_doi(doi));
    }

    obj
}

/// Route as JSON.
#[must_use]
pub fn compact_route(route: &Route) -> Value {
    let mut obj = json!({
        "url": route.url,
        "domain": route.domain,
        "urlType": route.url_type.label(),
        "engine": route.engine.name(),
    });

    if let Some(identifier) = &route.identifier {
        obj["identifier"] = json!(identifier);
    }
    if let Some(publication) = route.publication {
        obj["publication"] = json!(publication);
    }

    obj
}

/// Route plus the other rules that also claimed the URL.
#[must_use]
pub fn classification_json(route: &Route, rules: &[UrlType]) -> Value {
    let mut obj = compact_route(route);
    let shadowed: Vec<&str> = rules.iter().filter(|t| **t != route.url_type).map(|t| t.label()).collect();
    if !shadowed.is_empty() {
        obj["alsoMatches"] = json!(shadowed);
    }
    obj
}

/// Formatted citation as JSON.
#[must_use]
pub fn citation_json(citation: &FormattedCitation) -> Value {
    let mut obj = json!({
        "citation": citation.formatted,
        "style": citation.style,
        "metadata": compact_metadata(&citation.metadata),
    });

    if let Some(route) = &citation.route {
        obj["route"] = compact_route(route);
    }

    obj
}

/// Processed notes as JSON, with counts.
#[must_use]
pub fn notes_json(notes: &[ProcessedNote], style: CitationStyle) -> Value {
    let failed = notes.iter().filter(|n| !n.is_ok()).count();
    let items: Vec<Value> = notes
        .iter()
        .map(|note| {
            let mut obj = json!({
                "number": note.number,
                "original": note.original,
                "citation": note.formatted,
                "form": note.form,
            });
            if let Some(error) = &note.error {
                obj["error"] = json!(error);
            }
            obj
        })
        .collect();

    json!({
        "style": style,
        "total": notes.len(),
        "failed": failed,
        "notes": items,
    })
}

/// Reference list as JSON, with counts and the rendered text.
#[must_use]
pub fn references_json(list: &ReferenceList) -> Value {
    let entries: Vec<Value> = list
        .entries
        .iter()
        .map(|entry| {
            let mut obj = json!({
                "citation": entry.citation.label(),
                "reference": entry.formatted,
                "found": entry.is_found(),
            });
            if let Some(error) = &entry.error {
                obj["error"] = json!(error);
            }
            obj
        })
        .collect();

    json!({
        "style": list.style,
        "heading": list.heading(),
        "total": list.entries.len(),
        "found": list.found(),
        "entries": entries,
        "text": list.render(),
    })
}
