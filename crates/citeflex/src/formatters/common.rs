//! Helpers shared by the style formatters: names, titles and punctuation.

use crate::models::{CitationMetadata, PersonName, PubDate};

/// Wrap text in italic markup.
#[must_use]
pub fn italic(text: &str) -> String {
    format!("<i>{text}</i>")
}

/// Visible text with markup and closing quotes peeled off the end.
fn visible_tail(text: &str) -> &str {
    let mut tail = text.trim_end();
    loop {
        let before = tail;
        tail = tail.strip_suffix("</i>").unwrap_or(tail);
        tail = tail.strip_suffix('”').unwrap_or(tail);
        tail = tail.strip_suffix('"').unwrap_or(tail);
        if tail == before {
            return tail;
        }
    }
}

/// True when the visible text already ends in `.`, `?` or `!`.
#[must_use]
pub fn ends_terminal(text: &str) -> bool {
    visible_tail(text).ends_with(['.', '?', '!'])
}

/// Append `mark`, placing it inside a closing quote.
///
/// Nothing is added after `?` or `!`, and a period never follows a period.
#[must_use]
pub fn punctuate(text: &str, mark: char) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    let tail = visible_tail(trimmed);
    if tail.ends_with(['?', '!']) || (mark == '.' && tail.ends_with('.')) {
        return trimmed.to_string();
    }
    match trimmed.strip_suffix('”') {
        Some(inner) => format!("{inner}{mark}”"),
        None => format!("{trimmed}{mark}"),
    }
}

/// Close a citation with a period.
#[must_use]
pub fn terminate(text: &str) -> String {
    punctuate(text, '.')
}

/// A title in curly quotes.
#[must_use]
pub fn quoted(title: &str) -> String {
    format!("“{}”", title.trim())
}

/// Join elements with `mark` and a space, moving the mark inside quotes.
#[must_use]
pub fn join_with<S: AsRef<str>>(parts: &[S], mark: char) -> String {
    let parts: Vec<&str> = parts.iter().map(AsRef::as_ref).filter(|p| !p.trim().is_empty()).collect();
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i + 1 < parts.len() {
            out.push_str(&punctuate(part, mark));
            out.push(' ');
        } else {
            out.push_str(part.trim());
        }
    }
    out
}

/// Join the non-empty parts with a separator.
#[must_use]
pub fn join_parts<S: AsRef<str>>(parts: &[S], sep: &str) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Join sentences, each ending in a period.
#[must_use]
pub fn sentences<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.trim().is_empty())
        .map(terminate)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `A`, `A and B`, `A, B, and C` (serial comma).
#[must_use]
pub fn join_names(names: &[String], conjunction: &str) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} {conjunction} {b}"),
        [init @ .., last] => format!("{}, {conjunction} {last}", init.join(", ")),
    }
}

/// Parsed author names.
#[must_use]
pub fn people(meta: &CitationMetadata) -> Vec<PersonName> {
    meta.authors.iter().map(|a| PersonName::parse(a)).collect()
}

/// Family names for short forms and in-text citations.
#[must_use]
pub fn surnames(meta: &CitationMetadata) -> Vec<String> {
    people(meta).into_iter().map(|p| p.family).collect()
}

/// Words a short title never ends on.
const DANGLING: &[&str] = &["a", "an", "the", "of", "and", "or", "in", "on", "for", "to", "with", "at", "by"];

/// Short title: the main title before any subtitle, without a leading
/// article, at most four words.
#[must_use]
pub fn short_title(title: &str) -> String {
    let main = title.split_once(": ").map_or(title, |(head, _)| head).trim();
    let mut words: Vec<&str> = main.split_whitespace().collect();
    if words.len() > 2 && words.first().is_some_and(|w| ["a", "an", "the"].contains(&w.to_lowercase().as_str())) {
        words.remove(0);
    }
    if words.len() > 4 {
        words.truncate(4);
        while words.len() > 1 && words.last().is_some_and(|w| DANGLING.contains(&w.to_lowercase().as_str())) {
            words.pop();
        }
    }
    words.join(" ").trim_end_matches([',', ';', ':']).to_string()
}

/// DOI link, else the URL.
#[must_use]
pub fn link(meta: &CitationMetadata) -> Option<String> {
    meta.link()
}

/// URL without scheme, as MLA prints it.
#[must_use]
pub fn bare_url(url: &str) -> String {
    url.trim_start_matches("https://").trim_start_matches("http://").to_string()
}

/// Page range with an en dash.
#[must_use]
pub fn page_range(pages: &str) -> String {
    pages.trim().replace("--", "–").replace('-', "–")
}

/// Ordinal edition label: `2` → `2nd`.
#[must_use]
pub fn edition_label(edition: &str) -> String {
    let trimmed = edition.trim();
    match trimmed.parse::<u32>() {
        Ok(n) => {
            let suffix = match (n % 10, n % 100) {
                (1, 11) | (2, 12) | (3, 13) => "th",
                (1, _) => "st",
                (2, _) => "nd",
                (3, _) => "rd",
                _ => "th",
            };
            format!("{n}{suffix}")
        }
        Err(_) => trimmed.trim_end_matches(" ed.").trim_end_matches(" edition").to_string(),
    }
}

/// Publication date, or the year when that is all there is.
#[must_use]
pub fn date(meta: &CitationMetadata) -> Option<PubDate> {
    meta.parsed_date()
}

/// The reporter citation already carries the year (`[2016] UKSC 8`).
#[must_use]
pub fn citation_has_year(citation: &str) -> bool {
    citation.trim_start().starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_never_doubles() {
        assert_eq!(terminate("Title"), "Title.");
        assert_eq!(terminate("Title."), "Title.");
        assert_eq!(terminate("Why Now?"), "Why Now?");
        assert_eq!(terminate("<i>Who Knows?</i>"), "<i>Who Knows?</i>");
        assert_eq!(terminate("<i>Title</i>"), "<i>Title</i>.");
        assert_eq!(terminate("“Ends quoted.”"), "“Ends quoted.”");
        assert_eq!(terminate(""), "");
    }

    #[test]
    fn test_marks_go_inside_quotes() {
        assert_eq!(punctuate("“Title”", ','), "“Title,”");
        assert_eq!(punctuate("“Why Now?”", ','), "“Why Now?”");
        assert_eq!(punctuate("Acme Inc.", ','), "Acme Inc.,");
        assert_eq!(
            join_with(&["Jane Doe", "“Title”", "", "<i>Journal</i> 3"], ','),
            "Jane Doe, “Title,” <i>Journal</i> 3"
        );
    }

    #[test]
    fn test_join_names() {
        let names = |v: &[&str]| v.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        assert_eq!(join_names(&names(&["A"]), "and"), "A");
        assert_eq!(join_names(&names(&["A", "B"]), "and"), "A and B");
        assert_eq!(join_names(&names(&["A", "B", "C"]), "&"), "A, B, & C");
    }

    #[test]
    fn test_short_title() {
        assert_eq!(short_title("Thinking, Fast and Slow"), "Thinking, Fast and Slow");
        assert_eq!(short_title("The Structure of Scientific Revolutions"), "Structure of Scientific Revolutions");
        assert_eq!(short_title("A History of the World in Ten Objects"), "History of the World");
        assert_eq!(short_title("An Essay Concerning Human Understanding"), "Essay Concerning Human Understanding");
        assert_eq!(short_title("The Road"), "The Road");
        assert_eq!(short_title("Deep Learning: A Review"), "Deep Learning");
    }

    #[test]
    fn test_edition_and_pages() {
        assert_eq!(edition_label("2"), "2nd");
        assert_eq!(edition_label("11"), "11th");
        assert_eq!(edition_label("23"), "23rd");
        assert_eq!(edition_label("Revised"), "Revised");
        assert_eq!(page_range("436-444"), "436–444");
    }
}
