//! Chicago Manual of Style, 17th edition (notes and bibliography).

use super::CitationFormatter;
use super::common::{
    citation_has_year, date, edition_label, italic, join_names, join_parts, join_with, link, page_range, people,
    quoted, sentences, short_title, surnames, terminate,
};
use crate::models::{CitationMetadata, CitationStyle, CitationType, PersonName};

/// Chicago notes-bibliography formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChicagoFormatter;

/// `Jane Doe`, `Jane Doe and John Roe`, `Jane Doe et al.` (four or more).
fn note_authors(meta: &CitationMetadata) -> String {
    let names: Vec<String> = people(meta).iter().map(PersonName::given_first).collect();
    if names.len() > 3 {
        format!("{} et al.", names[0])
    } else {
        join_names(&names, "and")
    }
}

/// First author inverted; more than ten authors list seven then et al.
fn bibliography_authors(meta: &CitationMetadata) -> String {
    let mut names: Vec<String> = people(meta)
        .iter()
        .enumerate()
        .map(|(i, p)| if i == 0 { p.family_first() } else { p.given_first() })
        .collect();
    match names.len() {
        0 => String::new(),
        1 => names.remove(0),
        2 => format!("{}, and {}", names[0], names[1]),
        n if n > 10 => {
            names.truncate(7);
            format!("{}, et al.", names.join(", "))
        }
        _ => join_names(&names, "and"),
    }
}

fn short_authors(meta: &CitationMetadata) -> String {
    let names = surnames(meta);
    if names.len() > 3 {
        format!("{} et al.", names[0])
    } else {
        join_names(&names, "and")
    }
}

/// Government documents without a personal author are credited to the agency.
fn or_agency(meta: &CitationMetadata, authors: String) -> String {
    if authors.is_empty() && meta.citation_type == CitationType::Government {
        meta.agency.clone().unwrap_or_default()
    } else {
        authors
    }
}

fn long_date(meta: &CitationMetadata) -> String {
    date(meta).map(|d| d.long_us()).unwrap_or_default()
}

fn year(meta: &CitationMetadata) -> String {
    meta.year().map(|y| y.to_string()).unwrap_or_default()
}

fn accessed(meta: &CitationMetadata, label: &str) -> String {
    meta.parsed_access_date().map(|d| format!("{label} {}", d.long_us())).unwrap_or_default()
}

fn url(meta: &CitationMetadata) -> String {
    meta.url.clone().unwrap_or_default()
}

/// Titles set in italics rather than quotation marks.
const fn italic_title(citation_type: CitationType) -> bool {
    matches!(citation_type, CitationType::Book | CitationType::Government)
}

fn uses_journal_template(meta: &CitationMetadata) -> bool {
    match meta.citation_type {
        CitationType::Journal | CitationType::Medical => true,
        CitationType::Preprint => meta.journal.is_some(),
        _ => false,
    }
}

/// `<i>Journal</i> 47, no. 2 (1979): 263–291`
fn journal_block(meta: &CitationMetadata) -> String {
    let Some(journal) = meta.journal.as_deref() else {
        return String::new();
    };
    let mut block = italic(journal);
    if let Some(volume) = &meta.volume {
        block.push(' ');
        block.push_str(volume);
    }
    if let Some(issue) = &meta.issue {
        block.push_str(", no. ");
        block.push_str(issue);
    }
    if let Some(y) = meta.year() {
        block.push_str(&format!(" ({y})"));
    }
    if let Some(pages) = &meta.pages {
        block.push_str(": ");
        block.push_str(&page_range(pages));
    }
    block
}

/// `Chicago: University of Chicago Press, 1962`
fn imprint(meta: &CitationMetadata) -> String {
    let house = match (meta.place.as_deref(), meta.publisher.as_deref()) {
        (Some(place), Some(publisher)) => format!("{place}: {publisher}"),
        (place, publisher) => place.or(publisher).unwrap_or_default().to_string(),
    };
    join_parts(&[house, year(meta)], ", ")
}

fn edition(meta: &CitationMetadata) -> String {
    meta.edition.as_deref().map(|e| format!("{} ed.", edition_label(e))).unwrap_or_default()
}

/// Publisher of a government document, unless it repeats the agency.
fn issuing_body(meta: &CitationMetadata) -> String {
    match (meta.publisher.as_deref(), meta.agency.as_deref()) {
        (Some(publisher), Some(agency)) if publisher == agency => String::new(),
        (Some(publisher), _) => publisher.to_string(),
        _ => String::new(),
    }
}

fn video_site(meta: &CitationMetadata) -> String {
    meta.website.as_deref().map_or_else(|| "Video".to_string(), |site| format!("{site} video"))
}

fn preprint_label(meta: &CitationMetadata) -> String {
    meta.publisher.as_deref().map_or_else(|| "preprint".to_string(), |p| format!("{p} preprint"))
}

fn encyclopedia(meta: &CitationMetadata) -> String {
    italic(meta.website.as_deref().unwrap_or("Wikipedia"))
}

fn case_name(meta: &CitationMetadata) -> &str {
    meta.case_name.as_deref().or(meta.title.as_deref()).unwrap_or("Untitled")
}

/// First party of a case name; the second for Crown and state prosecutions.
fn short_case_name(name: &str) -> &str {
    let mut parties = name.splitn(2, " v. ");
    let first = parties.next().unwrap_or(name);
    let (first, second) = match parties.next() {
        Some(second) => (first, Some(second)),
        None => {
            let mut parties = name.splitn(2, " v ");
            (parties.next().unwrap_or(name), parties.next())
        }
    };
    match (first.trim(), second) {
        ("R" | "The Queen" | "The King" | "State" | "People" | "United States" | "Commonwealth", Some(s)) => s.trim(),
        (f, _) => f,
    }
}

/// `<i>Roe v. Wade</i>, 410 U.S. 113 (1973).`
fn legal(meta: &CitationMetadata) -> String {
    let citation = meta.citation.as_deref();
    let court = meta
        .court
        .as_deref()
        .filter(|c| !c.contains("Supreme Court of the United States"))
        .filter(|_| !citation.is_some_and(|c| c.contains("U.S.")))
        .unwrap_or_default();
    let parenthetical = match citation {
        Some(c) if citation_has_year(c) => String::new(),
        _ => {
            let inner = join_parts(&[court.to_string(), year(meta)], " ");
            if inner.is_empty() { inner } else { format!("({inner})") }
        }
    };
    let reporter = join_parts(&[citation.unwrap_or_default().to_string(), parenthetical], " ");
    let location = if citation.is_none() { url(meta) } else { String::new() };
    terminate(&join_with(&[italic(case_name(meta)), reporter, location], ','))
}

/// Bibliography entry.
fn bibliography(meta: &CitationMetadata) -> String {
    let authors = or_agency(meta, bibliography_authors(meta));
    let title = meta.title_or_default();

    match meta.citation_type {
        CitationType::Legal => legal(meta),
        _ if uses_journal_template(meta) => sentences(&[
            authors,
            quoted(title),
            journal_block(meta),
            link(meta).unwrap_or_default(),
        ]),
        CitationType::Book => sentences(&[
            authors,
            italic(title),
            edition(meta),
            imprint(meta),
            meta.doi_url().unwrap_or_default(),
        ]),
        CitationType::Newspaper => sentences(&[
            authors,
            quoted(title),
            join_with(&[italic(meta.container().unwrap_or_default()), long_date(meta)], ','),
            url(meta),
        ]),
        CitationType::Government => sentences(&[
            authors,
            italic(title),
            join_with(&[issuing_body(meta), long_date(meta)], ','),
            url(meta),
        ]),
        CitationType::Video => sentences(&[
            authors,
            quoted(title),
            join_with(&[video_site(meta), long_date(meta)], ','),
            url(meta),
        ]),
        CitationType::Encyclopedia => sentences(&[
            encyclopedia(meta),
            quoted(title),
            date(meta).map(|d| format!("Last modified {}", d.long_us())).unwrap_or_default(),
            url(meta),
        ]),
        CitationType::Preprint => sentences(&[
            authors,
            quoted(title),
            join_with(&[preprint_label(meta), long_date(meta)], ','),
            link(meta).unwrap_or_default(),
        ]),
        _ => {
            let when = if date(meta).is_some() { long_date(meta) } else { accessed(meta, "Accessed") };
            sentences(&[
                authors,
                quoted(title),
                meta.website.clone().unwrap_or_default(),
                when,
                url(meta),
            ])
        }
    }
}

impl CitationFormatter for ChicagoFormatter {
    fn style(&self) -> CitationStyle {
        CitationStyle::Chicago
    }

    fn format_full(&self, meta: &CitationMetadata) -> String {
        let authors = or_agency(meta, note_authors(meta));
        let title = meta.title_or_default();

        let parts: Vec<String> = match meta.citation_type {
            CitationType::Legal => return legal(meta),
            _ if uses_journal_template(meta) => {
                vec![authors, quoted(title), journal_block(meta), link(meta).unwrap_or_default()]
            }
            CitationType::Book => {
                let mut title = join_with(&[italic(title), edition(meta)], ',');
                let imprint = imprint(meta);
                if !imprint.is_empty() {
                    title.push_str(&format!(" ({imprint})"));
                }
                vec![authors, title, meta.doi_url().unwrap_or_default()]
            }
            CitationType::Newspaper => vec![
                authors,
                quoted(title),
                italic(meta.container().unwrap_or_default()),
                long_date(meta),
                url(meta),
            ],
            CitationType::Government => {
                let mut title = italic(title);
                let issued = join_parts(&[issuing_body(meta), long_date(meta)], ", ");
                if !issued.is_empty() {
                    title.push_str(&format!(" ({issued})"));
                }
                vec![authors, title, url(meta)]
            }
            CitationType::Video => vec![authors, quoted(title), video_site(meta), long_date(meta), url(meta)],
            CitationType::Encyclopedia => vec![
                encyclopedia(meta),
                format!("s.v. {}", quoted(title)),
                date(meta).map(|d| format!("last modified {}", d.long_us())).unwrap_or_default(),
                url(meta),
            ],
            CitationType::Preprint => {
                let status = join_parts(&[preprint_label(meta), long_date(meta)], ", ");
                vec![authors, format!("{} ({status})", quoted(title)), link(meta).unwrap_or_default()]
            }
            _ => {
                let when = if date(meta).is_some() { long_date(meta) } else { accessed(meta, "accessed") };
                vec![
                    authors,
                    quoted(title),
                    meta.website.clone().unwrap_or_default(),
                    when,
                    url(meta),
                ]
            }
        };
        terminate(&join_with(&parts, ','))
    }

    fn format_short(&self, meta: &CitationMetadata) -> String {
        match meta.citation_type {
            CitationType::Legal => {
                let name = italic(short_case_name(case_name(meta)));
                terminate(&join_with(&[name, meta.citation.clone().unwrap_or_default()], ','))
            }
            CitationType::Encyclopedia => terminate(&join_with(
                &[encyclopedia(meta), format!("s.v. {}", quoted(meta.title_or_default()))],
                ',',
            )),
            t => {
                let short = short_title(meta.title_or_default());
                let title = if italic_title(t) { italic(&short) } else { quoted(&short) };
                let who = or_agency(meta, short_authors(meta));
                terminate(&join_with(&[who, title], ','))
            }
        }
    }

    fn format_ibid(&self, _meta: &CitationMetadata, page: Option<&str>) -> String {
        match page.map(str::trim).filter(|p| !p.is_empty()) {
            Some(page) => terminate(&format!("Ibid., {page}")),
            None => "Ibid.".to_string(),
        }
    }

    fn format_in_text(&self, meta: &CitationMetadata, page: Option<&str>) -> String {
        let who = match meta.citation_type {
            CitationType::Legal => italic(case_name(meta)),
            t => {
                let authors = or_agency(meta, short_authors(meta));
                if !authors.is_empty() {
                    authors
                } else if italic_title(t) {
                    italic(&short_title(meta.title_or_default()))
                } else {
                    quoted(&short_title(meta.title_or_default()))
                }
            }
        };
        let year = meta.year().map_or_else(|| "n.d.".to_string(), |y| y.to_string());
        let mut inner = format!("{who} {year}");
        if let Some(page) = page.map(str::trim).filter(|p| !p.is_empty()) {
            inner.push_str(", ");
            inner.push_str(page);
        }
        format!("({inner})")
    }

    fn format_bibliography(&self, meta: &CitationMetadata) -> String {
        bibliography(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prospect_theory() -> CitationMetadata {
        CitationMetadata {
            citation_type: CitationType::Journal,
            title: Some("Prospect Theory: An Analysis of Decision under Risk".to_string()),
            authors: vec!["Daniel Kahneman".to_string(), "Amos Tversky".to_string()],
            journal: Some("Econometrica".to_string()),
            volume: Some("47".to_string()),
            issue: Some("2".to_string()),
            pages: Some("263-291".to_string()),
            year: Some("1979".to_string()),
            doi: Some("10.2307/1914185".to_string()),
            ..CitationMetadata::default()
        }
    }

    #[test]
    fn test_journal_note() {
        assert_eq!(
            ChicagoFormatter.format_full(&prospect_theory()),
            "Daniel Kahneman and Amos Tversky, “Prospect Theory: An Analysis of Decision under Risk,” \
             <i>Econometrica</i> 47, no. 2 (1979): 263–291, https://doi.org/10.2307/1914185."
        );
    }

    #[test]
    fn test_journal_bibliography() {
        assert_eq!(
            ChicagoFormatter.format_bibliography(&prospect_theory()),
            "Kahneman, Daniel, and Amos Tversky. “Prospect Theory: An Analysis of Decision under Risk.” \
             <i>Econometrica</i> 47, no. 2 (1979): 263–291. https://doi.org/10.2307/1914185."
        );
    }

    #[test]
    fn test_short_ibid_and_in_text() {
        let meta = prospect_theory();
        assert_eq!(ChicagoFormatter.format_short(&meta), "Kahneman and Tversky, “Prospect Theory.”");
        assert_eq!(ChicagoFormatter.format_ibid(&meta, None), "Ibid.");
        assert_eq!(ChicagoFormatter.format_ibid(&meta, Some("265")), "Ibid., 265.");
        assert_eq!(ChicagoFormatter.format_in_text(&meta, Some("265")), "(Kahneman and Tversky 1979, 265)");
    }

    #[test]
    fn test_book_note() {
        let meta = CitationMetadata {
            citation_type: CitationType::Book,
            title: Some("The Structure of Scientific Revolutions".to_string()),
            authors: vec!["Thomas S. Kuhn".to_string()],
            publisher: Some("University of Chicago Press".to_string()),
            place: Some("Chicago".to_string()),
            year: Some("1962".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ChicagoFormatter.format_full(&meta),
            "Thomas S. Kuhn, <i>The Structure of Scientific Revolutions</i> (Chicago: University of Chicago Press, 1962)."
        );
        assert_eq!(ChicagoFormatter.format_short(&meta), "Kuhn, <i>Structure of Scientific Revolutions</i>.");
        assert_eq!(
            ChicagoFormatter.format_bibliography(&meta),
            "Kuhn, Thomas S. <i>The Structure of Scientific Revolutions</i>. Chicago: University of Chicago Press, 1962."
        );
    }

    #[test]
    fn test_newspaper_note() {
        let meta = CitationMetadata {
            citation_type: CitationType::Newspaper,
            title: Some("City Council Votes".to_string()),
            authors: vec!["Jane Doe".to_string()],
            newspaper: Some("The New York Times".to_string()),
            date: Some("2024-03-05".to_string()),
            url: Some("https://www.nytimes.com/2024/03/05/nyregion/council.html".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ChicagoFormatter.format_full(&meta),
            "Jane Doe, “City Council Votes,” <i>The New York Times</i>, March 5, 2024, \
             https://www.nytimes.com/2024/03/05/nyregion/council.html."
        );
    }

    #[test]
    fn test_legal_notes() {
        let roe = CitationMetadata {
            citation_type: CitationType::Legal,
            case_name: Some("Roe v. Wade".to_string()),
            citation: Some("410 U.S. 113".to_string()),
            court: Some("Supreme Court of the United States".to_string()),
            year: Some("1973".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(ChicagoFormatter.format_full(&roe), "<i>Roe v. Wade</i>, 410 U.S. 113 (1973).");
        assert_eq!(ChicagoFormatter.format_short(&roe), "<i>Roe</i>, 410 U.S. 113.");

        let jogee = CitationMetadata {
            citation_type: CitationType::Legal,
            case_name: Some("R v Jogee".to_string()),
            citation: Some("[2016] UKSC 8".to_string()),
            year: Some("2016".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(ChicagoFormatter.format_full(&jogee), "<i>R v Jogee</i>, [2016] UKSC 8.");
        assert_eq!(ChicagoFormatter.format_short(&jogee), "<i>Jogee</i>, [2016] UKSC 8.");
    }

    #[test]
    fn test_undated_webpage_uses_access_date() {
        let meta = CitationMetadata {
            citation_type: CitationType::Webpage,
            title: Some("About Us".to_string()),
            website: Some("Example".to_string()),
            url: Some("https://example.com/about".to_string()),
            access_date: Some("2026-01-15".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ChicagoFormatter.format_full(&meta),
            "“About Us,” Example, accessed January 15, 2026, https://example.com/about."
        );
    }

    #[test]
    fn test_encyclopedia_note() {
        let meta = CitationMetadata {
            citation_type: CitationType::Encyclopedia,
            title: Some("Rust (programming language)".to_string()),
            website: Some("Wikipedia".to_string()),
            date: Some("2024-05-01T12:00:00Z".to_string()),
            url: Some("https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ChicagoFormatter.format_full(&meta),
            "<i>Wikipedia</i>, s.v. “Rust (programming language),” last modified May 1, 2024, \
             https://en.wikipedia.org/wiki/Rust_(programming_language)."
        );
    }

    #[test]
    fn test_many_authors() {
        let mut meta = prospect_theory();
        meta.authors = vec!["Ann Lee".into(), "Bo Kim".into(), "Cy Young".into(), "Di Park".into()];
        assert!(ChicagoFormatter.format_full(&meta).starts_with("Ann Lee et al., “Prospect"));
        assert!(ChicagoFormatter.format_short(&meta).starts_with("Lee et al., "));
    }

    #[test]
    fn test_government_agency_as_author() {
        let meta = CitationMetadata {
            citation_type: CitationType::Government,
            title: Some("Annual Report 2023".to_string()),
            agency: Some("Environmental Protection Agency".to_string()),
            date: Some("2023-06-01".to_string()),
            url: Some("https://www.epa.gov/report".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ChicagoFormatter.format_full(&meta),
            "Environmental Protection Agency, <i>Annual Report 2023</i> (June 1, 2023), https://www.epa.gov/report."
        );
    }
}
