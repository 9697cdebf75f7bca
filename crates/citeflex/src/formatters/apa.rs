//! APA Publication Manual, 7th edition.

use super::CitationFormatter;
use super::common::{
    date, edition_label, italic, join_parts, join_with, page_range, people, quoted, sentences, short_title, surnames,
    terminate,
};
use crate::models::{CitationMetadata, CitationStyle, CitationType, PersonName};

/// APA reference-list and in-text formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApaFormatter;

/// `Doe, J., & Roe, R.`; past twenty authors, nineteen then an ellipsis and the last.
fn reference_authors(meta: &CitationMetadata) -> String {
    let names: Vec<String> = people(meta).iter().map(PersonName::family_initials).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] if names.len() <= 20 => format!("{}, & {last}", init.join(", ")),
        [.., last] => format!("{}, . . . {last}", names[..19].join(", ")),
    }
}

/// In-text names: `Doe`, `Doe & Roe`, `Doe et al.`
fn cite_authors(meta: &CitationMetadata) -> String {
    let names = surnames(meta);
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} & {b}"),
        [first, ..] => format!("{first} et al."),
    }
}

fn author_or_agency(meta: &CitationMetadata) -> String {
    let authors = reference_authors(meta);
    if authors.is_empty() && meta.citation_type == CitationType::Government {
        meta.agency.clone().unwrap_or_default()
    } else {
        authors
    }
}

/// Year for periodicals and books; year, month and day for dated web content.
fn date_element(meta: &CitationMetadata) -> String {
    let precise = matches!(
        meta.citation_type,
        CitationType::Newspaper | CitationType::Webpage | CitationType::Video | CitationType::Encyclopedia
    );
    match date(meta) {
        Some(d) if precise => d.apa(),
        Some(d) => d.year.to_string(),
        None => "n.d.".to_string(),
    }
}

fn is_periodical(meta: &CitationMetadata) -> bool {
    match meta.citation_type {
        CitationType::Journal | CitationType::Medical => true,
        CitationType::Preprint => meta.journal.is_some(),
        _ => false,
    }
}

fn title_element(meta: &CitationMetadata) -> String {
    let title = meta.title_or_default();
    match meta.citation_type {
        _ if is_periodical(meta) => title.to_string(),
        CitationType::Newspaper | CitationType::Encyclopedia => title.to_string(),
        CitationType::Book => match meta.edition.as_deref() {
            Some(edition) => format!("{} ({} ed.)", italic(title), edition_label(edition)),
            None => italic(title),
        },
        CitationType::Video => format!("{} [Video]", italic(title)),
        CitationType::Preprint => match meta.arxiv_id.as_deref() {
            Some(id) => format!("{} (arXiv:{id})", italic(title)),
            None => italic(title),
        },
        _ => italic(title),
    }
}

/// `<i>Econometrica</i>, <i>47</i>(2), 263–291`
fn periodical_block(meta: &CitationMetadata) -> String {
    let Some(journal) = meta.journal.as_deref() else {
        return String::new();
    };
    let mut volume = meta.volume.as_deref().map(italic).unwrap_or_default();
    if let Some(issue) = &meta.issue {
        volume.push_str(&format!("({issue})"));
    }
    let pages = meta.pages.as_deref().map(page_range).unwrap_or_default();
    join_parts(&[italic(journal), volume, pages], ", ")
}

/// Drop a site or publisher that repeats the author.
fn unless_author(name: Option<&str>, author: &str) -> String {
    name.filter(|n| *n != author).unwrap_or_default().to_string()
}

fn source_element(meta: &CitationMetadata, author: &str) -> String {
    match meta.citation_type {
        _ if is_periodical(meta) => periodical_block(meta),
        CitationType::Newspaper => meta.container().map(italic).unwrap_or_default(),
        CitationType::Book => meta.publisher.clone().unwrap_or_default(),
        CitationType::Encyclopedia => format!("In {}", italic(meta.website.as_deref().unwrap_or("Wikipedia"))),
        CitationType::Video | CitationType::Webpage => unless_author(meta.website.as_deref(), author),
        CitationType::Preprint => meta.publisher.clone().unwrap_or_default(),
        _ => unless_author(meta.publisher.as_deref(), author),
    }
}

fn legal(meta: &CitationMetadata) -> String {
    let name = meta.case_name.as_deref().or(meta.title.as_deref()).unwrap_or("Untitled");
    let year = meta.year().map(|y| format!("({y})")).unwrap_or_default();
    let reporter = join_parts(&[meta.citation.clone().unwrap_or_default(), year], " ");
    let entry = terminate(&join_with(&[name.to_string(), reporter], ','));
    join_parts(&[entry, meta.url.clone().unwrap_or_default()], " ")
}

/// `p. 45` or `pp. 45–47`.
fn locator(page: &str) -> String {
    let bare = page.trim().trim_start_matches("pp.").trim_start_matches("p.").trim();
    if bare.contains(['-', '–', ',']) {
        format!("pp. {}", page_range(bare))
    } else {
        format!("p. {bare}")
    }
}

impl CitationFormatter for ApaFormatter {
    fn style(&self) -> CitationStyle {
        CitationStyle::Apa
    }

    fn format_full(&self, meta: &CitationMetadata) -> String {
        if meta.citation_type == CitationType::Legal {
            return legal(meta);
        }
        let authors = author_or_agency(meta);
        let date = format!("({})", date_element(meta));
        let title = title_element(meta);
        let source = source_element(meta, &authors);

        let head = if authors.is_empty() {
            sentences(&[title, date, source])
        } else {
            sentences(&[format!("{authors} {date}"), title, source])
        };
        let link = if meta.citation_type == CitationType::Book { meta.doi_url() } else { meta.link() };
        join_parts(&[head, link.unwrap_or_default()], " ")
    }

    fn format_short(&self, meta: &CitationMetadata) -> String {
        self.format_in_text(meta, None)
    }

    /// APA has no ibid; repeated citations use the parenthetical again.
    fn format_ibid(&self, meta: &CitationMetadata, page: Option<&str>) -> String {
        self.format_in_text(meta, page)
    }

    fn format_in_text(&self, meta: &CitationMetadata, page: Option<&str>) -> String {
        let who = match meta.citation_type {
            CitationType::Legal => italic(meta.case_name.as_deref().unwrap_or_else(|| meta.title_or_default())),
            _ => {
                let mut who = cite_authors(meta);
                if who.is_empty() && meta.citation_type == CitationType::Government {
                    who = meta.agency.clone().unwrap_or_default();
                }
                if who.is_empty() {
                    let short = short_title(meta.title_or_default());
                    who = if title_element(meta).starts_with("<i>") { italic(&short) } else { quoted(&short) };
                }
                who
            }
        };
        let year = meta.year().map_or_else(|| "n.d.".to_string(), |y| y.to_string());
        let page = page.map(str::trim).filter(|p| !p.is_empty()).map(locator);
        format!("({})", join_with(&[who, year, page.unwrap_or_default()], ','))
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
    fn test_journal_reference() {
        assert_eq!(
            ApaFormatter.format_full(&prospect_theory()),
            "Kahneman, D., & Tversky, A. (1979). Prospect Theory: An Analysis of Decision under Risk. \
             <i>Econometrica</i>, <i>47</i>(2), 263–291. https://doi.org/10.2307/1914185"
        );
    }

    #[test]
    fn test_in_text_forms() {
        let mut meta = prospect_theory();
        assert_eq!(ApaFormatter.format_in_text(&meta, None), "(Kahneman & Tversky, 1979)");
        assert_eq!(ApaFormatter.format_in_text(&meta, Some("265")), "(Kahneman & Tversky, 1979, p. 265)");
        assert_eq!(ApaFormatter.format_ibid(&meta, Some("265-267")), "(Kahneman & Tversky, 1979, pp. 265–267)");

        meta.authors.push("Paul Slovic".to_string());
        assert_eq!(ApaFormatter.format_short(&meta), "(Kahneman et al., 1979)");

        meta.authors.clear();
        meta.year = None;
        assert_eq!(ApaFormatter.format_short(&meta), "(“Prospect Theory,” n.d.)");
    }

    #[test]
    fn test_book_with_edition() {
        let meta = CitationMetadata {
            citation_type: CitationType::Book,
            title: Some("The Structure of Scientific Revolutions".to_string()),
            authors: vec!["Thomas S. Kuhn".to_string()],
            publisher: Some("University of Chicago Press".to_string()),
            edition: Some("3".to_string()),
            year: Some("1996".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ApaFormatter.format_full(&meta),
            "Kuhn, T. S. (1996). <i>The Structure of Scientific Revolutions</i> (3rd ed.). University of Chicago Press."
        );
    }

    #[test]
    fn test_newspaper_reference() {
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
            ApaFormatter.format_full(&meta),
            "Doe, J. (2024, March 5). City Council Votes. <i>The New York Times</i>. \
             https://www.nytimes.com/2024/03/05/nyregion/council.html"
        );
    }

    #[test]
    fn test_undated_page_without_author() {
        let meta = CitationMetadata {
            citation_type: CitationType::Webpage,
            title: Some("About Us".to_string()),
            website: Some("Example".to_string()),
            url: Some("https://example.com/about".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(ApaFormatter.format_full(&meta), "<i>About Us</i>. (n.d.). Example. https://example.com/about");
    }

    #[test]
    fn test_encyclopedia_and_legal() {
        let wiki = CitationMetadata {
            citation_type: CitationType::Encyclopedia,
            title: Some("Rust (programming language)".to_string()),
            website: Some("Wikipedia".to_string()),
            date: Some("2024-05-01".to_string()),
            url: Some("https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(
            ApaFormatter.format_full(&wiki),
            "Rust (programming language). (2024, May 1). In <i>Wikipedia</i>. \
             https://en.wikipedia.org/wiki/Rust_(programming_language)"
        );

        let roe = CitationMetadata {
            citation_type: CitationType::Legal,
            case_name: Some("Roe v. Wade".to_string()),
            citation: Some("410 U.S. 113".to_string()),
            year: Some("1973".to_string()),
            ..CitationMetadata::default()
        };
        assert_eq!(ApaFormatter.format_full(&roe), "Roe v. Wade, 410 U.S. 113 (1973).");
        assert_eq!(ApaFormatter.format_in_text(&roe, None), "(<i>Roe v. Wade</i>, 1973)");
    }

    #[test]
    fn test_more_than_twenty_authors() {
        let mut meta = prospect_theory();
        meta.authors = (1..=22).map(|i| format!("Author{i} Person{i}")).collect();
        let full = ApaFormatter.format_full(&meta);
        assert!(full.contains("Person19, A., . . . Person22, A. (1979)."));
        assert!(!full.contains("Person20"));
    }
}
