//! Classification of raw citation text.
//!
//! [`detect`] decides what a user typed before anything is fetched: a URL,
//! a bare identifier, a case name, an author-date reference, an ibid, or
//! free text to search for.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::router::{extract_doi, extract_isbn, is_valid_isbn, normalize_isbn};

/// `ibid`, `ibid., 45`, `ibidem`, `Id. at 789`, `ibid., pp. 12-15`.
static IBID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:ibid\.?|ibidem\.?|id\.?)(?:\s*(?:at\s+|[,.]?\s*)?(?:pp?\.?\s*)?(\d+[-–]?\d*)?)?\.?$")
        .expect("valid ibid regex")
});

static BARE_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.[a-z]{2,}/\S*$").expect("valid domain regex")
});

static ARXIV_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:arxiv:\s*)?(\d{4}\.\d{4,5}|[a-z][a-z\-]+(?:\.[a-z]{2})?/\d{7})(?:v\d+)?$")
        .expect("valid arXiv text regex")
});

static PMID_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^pmid:?\s*(\d{1,9})$").expect("valid PMID text regex"));

static ISBN_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^isbn(?:-1[03])?:?\s*").expect("valid ISBN prefix regex"));

static LEGAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<case>(?:In re |Ex parte )?[A-Z][^,]{0,80}?\s+(?P<sep>vs?\.?)\s+[^,(\[]{1,100}?)\s*(?:,\s*(?P<cite>[^()]+?))?\s*(?:\((?:[^)]*?\s)?(?P<year>\d{4})\))?\.?$",
    )
    .expect("valid legal regex")
});

static NEUTRAL_CITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<case>[A-Z][^\[]{0,80}?\s+v\.?\s+[^\[]{1,100}?)\s*(?P<cite>\[(?P<year>\d{4})\]\s*.+)$")
        .expect("valid neutral citation regex")
});

static AUTHOR_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\(?\s*(?P<author>\p{Lu}[\p{L}'’\-]+)(?:\s+(?:and|&)\s+(?P<second>\p{Lu}[\p{L}'’\-]+))?(?:\s+et\s+al\.?)?,?\s*\(?(?P<year>\d{4}[a-z]?|n\.d\.)\)?\s*\)?\.?$",
    )
    .expect("valid author-date regex")
});

/// What a piece of citation text is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// Repeat of the previous note's source.
    Ibid { page: Option<String> },
    Url { url: String },
    Doi { doi: String },
    Arxiv { id: String },
    Pmid { pmid: String },
    Isbn { isbn: String },
    /// Court decision by case name.
    Legal { case_name: String, citation: Option<String>, year: Option<String> },
    /// `(Smith, 2020)`-style reference.
    AuthorDate { author: String, second_author: Option<String>, year: String },
    /// Anything else: searched as a bibliographic query.
    FreeText { text: String },
}

impl InputKind {
    /// Short label for logs and reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ibid { .. } => "ibid",
            Self::Url { .. } => "url",
            Self::Doi { .. } => "doi",
            Self::Arxiv { .. } => "arxiv",
            Self::Pmid { .. } => "pmid",
            Self::Isbn { .. } => "isbn",
            Self::Legal { .. } => "legal",
            Self::AuthorDate { .. } => "author_date",
            Self::FreeText { .. } => "free_text",
        }
    }
}

/// Classify raw citation text.
#[must_use]
pub fn detect(text: &str) -> InputKind {
    let text = text.trim();

    if is_ibid(text) {
        return InputKind::Ibid { page: extract_ibid_page(text) };
    }

    if looks_like_url(text) {
        return InputKind::Url { url: text.to_string() };
    }

    if let Some(doi) = extract_doi(text) {
        return InputKind::Doi { doi };
    }

    if let Some(caps) = ARXIV_TEXT_RE.captures(text) {
        return InputKind::Arxiv { id: caps[1].to_string() };
    }

    if let Some(caps) = PMID_TEXT_RE.captures(text) {
        return InputKind::Pmid { pmid: caps[1].to_string() };
    }

    if let Some(isbn) = detect_isbn(text) {
        return InputKind::Isbn { isbn };
    }

    if let Some(legal) = detect_legal(text) {
        return legal;
    }

    if let Some(caps) = AUTHOR_DATE_RE.captures(text) {
        // `2020a` cites the same year as `2020`.
        let year = &caps["year"];
        let year = if year.starts_with(|c: char| c.is_ascii_digit()) { year.get(..4).unwrap_or(year) } else { year };
        return InputKind::AuthorDate {
            author: caps["author"].to_string(),
            second_author: caps.name("second").map(|m| m.as_str().to_string()),
            year: year.to_string(),
        };
    }

    InputKind::FreeText { text: text.to_string() }
}

/// True if the text is an ibid reference.
#[must_use]
pub fn is_ibid(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && IBID_RE.is_match(text)
}

/// Page of an ibid reference: `ibid., 123-125` gives `123-125`.
#[must_use]
pub fn extract_ibid_page(text: &str) -> Option<String> {
    IBID_RE
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn looks_like_url(text: &str) -> bool {
    if text.contains(char::is_whitespace) {
        return false;
    }
    let lower = text.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("www.")
        || BARE_DOMAIN_RE.is_match(text)
}

fn detect_isbn(text: &str) -> Option<String> {
    if let Some(prefix) = ISBN_PREFIX_RE.find(text) {
        return extract_isbn(&text[prefix.end()..]);
    }
    let normalized = normalize_isbn(text);
    let only_isbn_chars = text.chars().all(|c| c.is_ascii_digit() || matches!(c, '-' | ' ' | 'X' | 'x'));
    (only_isbn_chars && is_valid_isbn(&normalized)).then_some(normalized)
}

/// A case name needs a reporter citation, a year, or the `v.` form courts
/// use; "Godzilla vs. Kong" alone is a title.
fn detect_legal(text: &str) -> Option<InputKind> {
    let caps = NEUTRAL_CITE_RE.captures(text).or_else(|| LEGAL_RE.captures(text))?;
    let citation = caps
        .name("cite")
        .map(|m| m.as_str().trim().to_string())
        .filter(|c| c.contains(|ch: char| ch.is_ascii_digit()));
    let year = caps.name("year").map(|m| m.as_str().to_string());
    let court_form = caps.name("sep").is_none_or(|m| !m.as_str().starts_with("vs"));
    if citation.is_none() && year.is_none() && !court_form {
        return None;
    }
    Some(InputKind::Legal { case_name: caps["case"].trim().trim_end_matches(',').to_string(), citation, year })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibid_variants() {
        for text in ["ibid", "Ibid.", "IBID", "ibidem", "Id.", "id. at 789", "ibid., pp. 12-15", "ibid, 45"] {
            assert!(is_ibid(text), "{text}");
        }
        assert!(!is_ibid("Ibid. and more text"));
        assert!(!is_ibid(""));
        assert_eq!(extract_ibid_page("ibid, 45").as_deref(), Some("45"));
        assert_eq!(extract_ibid_page("ibid., 123-125").as_deref(), Some("123-125"));
        assert_eq!(extract_ibid_page("Id. at 789").as_deref(), Some("789"));
        assert_eq!(extract_ibid_page("ibid., pp. 12-15").as_deref(), Some("12-15"));
        assert_eq!(extract_ibid_page("ibid."), None);
    }

    #[test]
    fn test_urls() {
        assert_eq!(detect("https://example.com/a").label(), "url");
        assert_eq!(detect("www.nytimes.com/2020/01/01/x.html").label(), "url");
        assert_eq!(detect("nytimes.com/2020/01/01/x.html").label(), "url");
        assert_eq!(detect("https://doi.org/10.1000/xyz").label(), "url");
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(detect("doi:10.1038/nature12373"), InputKind::Doi { doi: "10.1038/nature12373".into() });
        assert_eq!(detect("arXiv:2301.01234v2"), InputKind::Arxiv { id: "2301.01234".into() });
        assert_eq!(detect("PMID: 32015507"), InputKind::Pmid { pmid: "32015507".into() });
        assert_eq!(detect("ISBN 978-0-306-40615-7"), InputKind::Isbn { isbn: "9780306406157".into() });
        assert_eq!(detect("0-306-40615-2"), InputKind::Isbn { isbn: "0306406152".into() });
    }

    #[test]
    fn test_legal_cases() {
        assert_eq!(
            detect("Roe v. Wade, 410 U.S. 113 (1973)"),
            InputKind::Legal {
                case_name: "Roe v. Wade".into(),
                citation: Some("410 U.S. 113".into()),
                year: Some("1973".into()),
            }
        );
        assert_eq!(
            detect("Donoghue v Stevenson [1932] UKHL 100"),
            InputKind::Legal {
                case_name: "Donoghue v Stevenson".into(),
                citation: Some("[1932] UKHL 100".into()),
                year: Some("1932".into()),
            }
        );
        assert_eq!(detect("Brown v. Board of Education").label(), "legal");
        assert_eq!(detect("Smith vs. Jones, 123 F.3d 456 (2d Cir. 1997)").label(), "legal");
    }

    #[test]
    fn test_vs_titles_are_free_text() {
        assert_eq!(detect("Godzilla vs. Kong"), InputKind::FreeText { text: "Godzilla vs. Kong".into() });
        assert_eq!(detect("Kramer vs. Kramer: A Novel").label(), "free_text");
        assert_eq!(detect("Alien vs. Predator, a novelization").label(), "free_text");
    }

    #[test]
    fn test_author_date() {
        assert_eq!(
            detect("(Smith, 2020)"),
            InputKind::AuthorDate { author: "Smith".into(), second_author: None, year: "2020".into() }
        );
        assert_eq!(
            detect("Smith and Jones (2019)"),
            InputKind::AuthorDate {
                author: "Smith".into(),
                second_author: Some("Jones".into()),
                year: "2019".into(),
            }
        );
        assert_eq!(detect("Diener et al., 2014").label(), "author_date");
        assert_eq!(detect("(Bandura, n.d.)").label(), "author_date");
    }

    #[test]
    fn test_free_text() {
        assert_eq!(detect("attention is all you need").label(), "free_text");
    }
}
