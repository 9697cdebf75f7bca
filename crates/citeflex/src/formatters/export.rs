//! Reference-manager exports: RIS and BibTeX.

use crate::models::{CitationMetadata, CitationType, ExportFormat, PersonName};

/// Render records in the requested export format.
#[must_use]
pub fn format_export(records: &[CitationMetadata], format: ExportFormat) -> String {
    match format {
        ExportFormat::Ris => format_ris(records),
        ExportFormat::Bibtex => format_bibtex(records),
    }
}

const fn ris_type(citation_type: CitationType) -> &'static str {
    match citation_type {
        CitationType::Journal | CitationType::Medical => "JOUR",
        CitationType::Book => "BOOK",
        CitationType::Newspaper => "NEWS",
        CitationType::Government => "GOVDOC",
        CitationType::Legal => "CASE",
        CitationType::Webpage => "ELEC",
        CitationType::Video => "VIDEO",
        CitationType::Encyclopedia => "ENCYC",
        CitationType::Preprint => "UNPB",
    }
}

/// Start and end page of a range.
fn split_pages(pages: &str) -> (&str, Option<&str>) {
    match pages.split_once(['-', '–']) {
        Some((start, end)) => (start.trim(), Some(end.trim_start_matches('-').trim())),
        None => (pages.trim(), None),
    }
}

/// Format records as RIS.
#[must_use]
pub fn format_ris(records: &[CitationMetadata]) -> String {
    let mut output = String::new();

    for meta in records {
        let mut line = |tag: &str, value: &str| {
            let value = value.replace(['\r', '\n'], " ");
            output.push_str(&format!("{tag}  - {}\n", value.trim()));
        };

        line("TY", ris_type(meta.citation_type));
        line("TI", meta.title_or_default());

        for author in &meta.authors {
            line("AU", &PersonName::parse(author).family_first());
        }

        if let Some(year) = meta.year() {
            line("PY", &year.to_string());
        }
        if let Some(date) = meta.parsed_date().filter(|d| d.month.is_some()) {
            let month = date.month.map_or(String::new(), |m| format!("{m:02}"));
            let day = date.day.map_or(String::new(), |d| format!("{d:02}"));
            line("DA", &format!("{}/{month}/{day}", date.year));
        }

        match meta.citation_type {
            CitationType::Journal | CitationType::Medical | CitationType::Preprint => {
                if let Some(journal) = &meta.journal {
                    line("JO", journal);
                }
            }
            _ => {
                if let Some(container) = meta.newspaper.as_ref().or(meta.website.as_ref()) {
                    line("T2", container);
                }
            }
        }

        for (tag, value) in [
            ("VL", &meta.volume),
            ("IS", &meta.issue),
            ("ET", &meta.edition),
            ("PB", &meta.publisher),
            ("CY", &meta.place),
            ("A2", &meta.agency),
        ] {
            if let Some(value) = value {
                line(tag, value);
            }
        }

        if let Some(pages) = &meta.pages {
            let (start, end) = split_pages(pages);
            line("SP", start);
            if let Some(end) = end {
                line("EP", end);
            }
        }

        if let Some(citation) = &meta.citation {
            line("M1", citation);
        }
        if let Some(court) = &meta.court {
            line("PB", court);
        }
        if let Some(doi) = &meta.doi {
            line("DO", crate::models::strip_doi(doi));
        }
        if let Some(isbn) = &meta.isbn {
            line("SN", isbn);
        }
        if let Some(pmid) = &meta.pmid {
            line("AN", pmid);
        }
        if let Some(url) = &meta.url {
            line("UR", url);
        }
        if let Some(accessed) = meta.parsed_access_date() {
            line("Y2", &accessed.to_string());
        }

        output.push_str("ER  - \n\n");
    }

    output
}

/// BibTeX key: first author's family name and the year (`Kahneman1979`).
#[must_use]
pub fn citation_key(meta: &CitationMetadata) -> String {
    let stem = meta
        .first_author_family()
        .or_else(|| meta.title_or_default().split_whitespace().next().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string());
    let stem: String = stem.chars().filter(char::is_ascii_alphanumeric).collect();
    let stem = if stem.is_empty() { "Unknown".to_string() } else { stem };
    match meta.year() {
        Some(year) => format!("{stem}{year}"),
        None => format!("{stem}nd"),
    }
}

const fn bibtex_type(citation_type: CitationType) -> &'static str {
    match citation_type {
        CitationType::Journal | CitationType::Medical | CitationType::Newspaper => "article",
        CitationType::Book => "book",
        CitationType::Government => "techreport",
        _ => "misc",
    }
}

/// Format records as BibTeX.
#[must_use]
pub fn format_bibtex(records: &[CitationMetadata]) -> String {
    let mut output = String::new();

    for meta in records {
        let kind = bibtex_type(meta.citation_type);
        output.push_str(&format!("@{kind}{{{},\n", citation_key(meta)));

        let mut field = |name: &str, value: &str| {
            output.push_str(&format!("  {name} = {{{}}},\n", escape_bibtex(value)));
        };

        field("title", meta.title_or_default());

        if !meta.authors.is_empty() {
            let authors: Vec<String> = meta.authors.iter().map(|a| PersonName::parse(a).family_first()).collect();
            field("author", &authors.join(" and "));
        }

        if let Some(year) = meta.year() {
            field("year", &year.to_string());
        }

        let container = match meta.citation_type {
            CitationType::Newspaper => meta.newspaper.as_ref(),
            _ => meta.journal.as_ref(),
        };
        if let Some(container) = container {
            field("journal", container);
        }

        if meta.citation_type == CitationType::Government {
            if let Some(agency) = &meta.agency {
                field("institution", agency);
            }
        }

        for (name, value) in [
            ("volume", &meta.volume),
            ("number", &meta.issue),
            ("edition", &meta.edition),
            ("publisher", &meta.publisher),
            ("address", &meta.place),
            ("isbn", &meta.isbn),
        ] {
            if let Some(value) = value {
                field(name, value);
            }
        }

        if let Some(pages) = &meta.pages {
            let (start, end) = split_pages(pages);
            match end {
                Some(end) => field("pages", &format!("{start}--{end}")),
                None => field("pages", start),
            }
        }

        if let Some(citation) = &meta.citation {
            field("note", citation);
        }
        if let Some(arxiv) = &meta.arxiv_id {
            field("eprint", arxiv);
            field("archiveprefix", "arXiv");
        }
        if let Some(doi) = &meta.doi {
            field("doi", crate::models::strip_doi(doi));
        }
        if let Some(url) = &meta.url {
            field("url", url);
        }
        if let Some(accessed) = meta.parsed_access_date() {
            field("urldate", &accessed.to_string());
        }

        output.push_str("}\n\n");
    }

    output
}

/// Escape characters BibTeX treats specially.
#[must_use]
pub fn escape_bibtex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '&' | '%' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '\r' | '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> CitationMetadata {
        CitationMetadata {
            citation_type: CitationType::Journal,
            title: Some("Prospect Theory: An Analysis of Decision under Risk".to_string()),
            authors: vec!["Daniel Kahneman".to_string(), "Amos Tversky".to_string()],
            journal: Some("Econometrica".to_string()),
            volume: Some("47".to_string()),
            issue: Some("2".to_string()),
            pages: Some("263-291".to_string()),
            year: Some("1979".to_string()),
            doi: Some("https://doi.org/10.2307/1914185".to_string()),
            ..CitationMetadata::default()
        }
    }

    #[test]
    fn test_ris_record() {
        let ris = format_ris(&[article()]);
        assert!(ris.starts_with("TY  - JOUR\n"));
        assert!(ris.contains("AU  - Kahneman, Daniel\n"));
        assert!(ris.contains("AU  - Tversky, Amos\n"));
        assert!(ris.contains("PY  - 1979\n"));
        assert!(ris.contains("JO  - Econometrica\n"));
        assert!(ris.contains("SP  - 263\nEP  - 291\n"));
        assert!(ris.contains("DO  - 10.2307/1914185\n"));
        assert!(ris.trim_end().ends_with("ER  -"));
    }

    #[test]
    fn test_ris_types() {
        let mut meta = article();
        meta.citation_type = CitationType::Legal;
        assert!(format_ris(&[meta]).starts_with("TY  - CASE\n"));
    }

    #[test]
    fn test_bibtex_record() {
        let bib = format_bibtex(&[article()]);
        assert!(bib.starts_with("@article{Kahneman1979,\n"));
        assert!(bib.contains("  author = {Kahneman, Daniel and Tversky, Amos},\n"));
        assert!(bib.contains("  pages = {263--291},\n"));
        assert!(bib.contains("  doi = {10.2307/1914185},\n"));
    }

    #[test]
    fn test_citation_key_fallbacks() {
        let meta = CitationMetadata {
            title: Some("Untitled Notes".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(citation_key(&meta), "Untitlednd");

        let meta = CitationMetadata {
            authors: vec!["Ludwig van Beethoven".to_string()],
            year: Some("1808".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(citation_key(&meta), "vanBeethoven1808");
    }

    #[test]
    fn test_escape_bibtex() {
        assert_eq!(escape_bibtex("R&D {50%}"), "R\\&D \\{50\\%\\}");
        assert_eq!(escape_bibtex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_bibtex("x_1^2"), "x\\_1\\textasciicircum{}2");
    }
}
