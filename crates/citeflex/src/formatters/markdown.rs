//! Markdown output formatting.

use crate::models::{CitationMetadata, CitationStyle, CitationType};
use crate::notes::ProcessedNote;
use crate::references::ReferenceList;
use crate::resolver::FormattedCitation;
use crate::router::{Route, UrlType};

/// `<i>…</i>` to Markdown emphasis.
fn emphasis(text: &str) -> String {
    text.replace("<i>", "*").replace("</i>", "*")
}

/// Format a citation with its source details as Markdown.
#[must_use]
pub fn format_citation_markdown(citation: &FormattedCitation) -> String {
    let mut output = format!("# {} citation\n\n", citation.style.display_name());

    output.push_str(&format!("{}\n\n", emphasis(&citation.formatted)));
    output.push_str("---\n\n");
    output.push_str(&format_metadata_markdown(&citation.metadata));

    if let Some(route) = &citation.route {
        output.push_str(&format!(
            "\n**Route**: {} → {} ({})\n",
            route.domain,
            route.engine,
            route.url_type
        ));
    }

    output
}

/// Format metadata fields as Markdown.
#[must_use]
pub fn format_metadata_markdown(meta: &CitationMetadata) -> String {
    let mut output = String::new();

    output.push_str(&format!("**Type**: {}\n\n", meta.citation_type.label()));

    if meta.citation_type == CitationType::Legal {
        if let Some(case) = &meta.case_name {
            output.push_str(&format!("**Case**: {case}\n\n"));
        }
    } else {
        output.push_str(&format!("**Title**: {}\n\n", meta.title_or_default()));
    }

    if !meta.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", meta.authors.join(", ")));
    }

    let mut details = Vec::new();
    if let Some(year) = meta.year() {
        details.push(format!("**Year**: {year}"));
    }
    if let Some(container) = meta.container() {
        details.push(format!("**Published in**: {container}"));
    }
    if let Some(citation) = &meta.citation {
        details.push(format!("**Citation**: {citation}"));
    }
    if let Some(court) = &meta.court {
        details.push(format!("**Court**: {court}"));
    }
    if !details.is_empty() {
        output.push_str(&format!("{}\n\n", details.join(" | ")));
    }

    let mut links = Vec::new();
    if let Some(doi_url) = meta.doi_url() {
        links.push(format!("[DOI]({doi_url})"));
    }
    if let Some(arxiv) = &meta.arxiv_id {
        links.push(format!("[arXiv](https://arxiv.org/abs/{arxiv})"));
    }
    if let Some(pmid) = &meta.pmid {
        links.push(format!("[PubMed](https://pubmed.ncbi.nlm.nih.gov/{pmid}/)"));
    }
    if let Some(url) = &meta.url {
        links.push(format!("[Source]({url})"));
    }
    if !links.is_empty() {
        output.push_str(&format!("**Links**: {}\n\n", links.join(" | ")));
    }

    if let Some(engine) = &meta.source_engine {
        output.push_str(&format!("**Engine**: {engine}\n"));
    }

    output
}

/// Format a URL classification as Markdown, with any rules the winner shadowed.
#[must_use]
pub fn format_route_markdown(route: &Route, rules: &[UrlType]) -> String {
    let mut output = format!("# Route for {}\n\n", route.domain);

    output.push_str(&format!("**URL**: {}\n\n", route.url));
    output.push_str(&format!("**Type**: {} | **Engine**: {}\n\n", route.url_type, route.engine));

    if let Some(identifier) = &route.identifier {
        output.push_str(&format!("**Identifier**: `{identifier}`\n\n"));
    }
    if let Some(publication) = route.publication {
        output.push_str(&format!("**Publication**: {publication}\n\n"));
    }
    let shadowed: Vec<String> = rules.iter().filter(|t| **t != route.url_type).map(ToString::to_string).collect();
    if !shadowed.is_empty() {
        output.push_str(&format!("**Also matches**: {}\n", shadowed.join(", ")));
    }

    output
}

/// Format a processed note sequence as Markdown.
#[must_use]
pub fn format_notes_markdown(notes: &[ProcessedNote], style: CitationStyle) -> String {
    if notes.is_empty() {
        return "No notes given.".to_string();
    }

    let failed = notes.iter().filter(|n| !n.is_ok()).count();
    let mut output = format!("# Notes ({} notes, {})\n\n", notes.len(), style.display_name());

    for note in notes {
        output.push_str(&format!("{}. {}\n", note.number, emphasis(&note.formatted)));
        if let Some(error) = &note.error {
            output.push_str(&format!("   > **Not resolved**: {error}\n"));
        }
    }

    if failed > 0 {
        output.push_str(&format!("\n---\n\n{failed} of {} notes could not be resolved.\n", notes.len()));
    }

    output
}

/// Format a reference list as Markdown.
#[must_use]
pub fn format_references_markdown(list: &ReferenceList) -> String {
    if list.entries.is_empty() {
        return "No author-date citations found.".to_string();
    }

    let mut output = format!("# {} ({})\n\n", list.heading(), list.style.display_name());
    for entry in &list.entries {
        output.push_str(&format!("{}\n\n", emphasis(&entry.formatted)));
    }

    let missing = list.entries.len() - list.found();
    if missing > 0 {
        output.push_str(&format!("---\n\n{missing} of {} citations could not be resolved.\n", list.entries.len()));
    }

    output
}
