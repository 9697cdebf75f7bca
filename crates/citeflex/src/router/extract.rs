//! Identifier extraction from URLs and free text.
//!
//! Every extractor returns `None` rather than guessing; the router falls
//! through to the next rule when an identifier is missing.

use std::sync::LazyLock;

use regex::Regex;

static DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b10\.\d{4,9}/[^\s"'<>?#]+"#).expect("valid DOI regex"));

static ARXIV_NEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[/:\s])(\d{4}\.\d{4,5})(?:v\d+)?(?:\.pdf)?(?:$|[\s?#/])")
        .expect("valid arXiv regex")
});

static ARXIV_OLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/:\s])([a-z][a-z\-]+(?:\.[A-Z]{2})?/\d{7})(?:v\d+)?(?:$|[\s?#.])")
        .expect("valid old-style arXiv regex")
});

static PMID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:pubmed\.ncbi\.nlm\.nih\.gov/|ncbi\.nlm\.nih\.gov/pubmed/)(\d{1,9})\b")
        .expect("valid PMID regex")
});

static PMCID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ncbi\.nlm\.nih\.gov/pmc/articles/(PMC\d+)").expect("valid PMCID regex")
});

static WIKIPEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://([a-z\-]{2,12})\.(?:m\.)?wikipedia\.org/wiki/([^?#]+)")
        .expect("valid Wikipedia regex")
});

static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:$|[^A-Za-z0-9_-])",
    )
    .expect("valid YouTube regex")
});

static VIMEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)vimeo\.com/(?:video/|channels/[^/]+/|groups/[^/]+/videos/)?(\d{5,12})(?:$|[/?#])")
        .expect("valid Vimeo regex")
});

static JSTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)jstor\.org/stable/(?:pdf/|10\.2307/)?(\d+)").expect("valid JSTOR regex")
});

static SSRN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:abstract_id=|ssrn\.com/abstract=|ssrn\.)(\d{3,9})").expect("valid SSRN regex")
});

static ISBN_CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:97[89][-\s]?)?(?:\d[-\s]?){9}[\dX]\b").expect("valid ISBN regex")
});

static S2_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)semanticscholar\.org/paper/(?:[^/?#]+/)?([0-9a-f]{40})\b")
        .expect("valid Semantic Scholar regex")
});

static GOOGLE_BOOKS_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]id=|/books/edition/[^/]+/)([A-Za-z0-9_-]{12})\b")
        .expect("valid Google Books regex")
});

static OPEN_LIBRARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)openlibrary\.org/(?:books|works)/(OL\d+[MW])").expect("valid Open Library regex")
});

/// Suffixes publishers append after the DOI in article URLs.
const DOI_URL_SUFFIXES: &[&str] =
    &["/full", "/abstract", "/pdf", "/epdf", "/epub", "/fulltext", "/meta", "/html", ".pdf"];

/// First DOI in a URL or text, case preserved.
#[must_use]
pub fn extract_doi(text: &str) -> Option<String> {
    let decoded = text.replace("%2F", "/").replace("%2f", "/");
    let raw = DOI_RE.find(&decoded)?.as_str();
    let mut doi = raw.to_string();

    loop {
        let before = doi.len();
        for suffix in DOI_URL_SUFFIXES {
            if doi.to_ascii_lowercase().ends_with(suffix) {
                doi.truncate(doi.len() - suffix.len());
            }
        }
        while doi.ends_with(['.', ',', ';', ':', ']', '}', '/']) {
            doi.pop();
        }
        if doi.ends_with(')') && doi.matches('(').count() < doi.matches(')').count() {
            doi.pop();
        }
        if doi.len() == before {
            break;
        }
    }

    doi.contains('/').then_some(doi).filter(|d| d.len() > "10.1000/".len())
}

/// arXiv identifier without version suffix (`2301.01234`, `hep-th/9901001`).
#[must_use]
pub fn extract_arxiv_id(text: &str) -> Option<String> {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    let scope = if let Some(pos) = lower.find("arxiv.org/") {
        &text[pos..]
    } else if let Some(rest) = lower.strip_prefix("arxiv:") {
        &text[text.len() - rest.len()..]
    } else {
        text
    };

    if let Some(caps) = ARXIV_NEW_RE.captures(scope) {
        return Some(caps[1].to_string());
    }
    ARXIV_OLD_RE.captures(scope).map(|caps| caps[1].to_string())
}

/// PubMed identifier; PubMed Central articles come back as `PMC…`.
#[must_use]
pub fn extract_pmid(url: &str) -> Option<String> {
    if let Some(caps) = PMID_RE.captures(url) {
        return Some(caps[1].to_string());
    }
    PMCID_RE.captures(url).map(|caps| caps[1].to_uppercase())
}

/// Language edition and page title from a Wikipedia article URL.
///
/// The title stays percent-encoded, which the REST API accepts directly.
#[must_use]
pub fn extract_wikipedia_title(url: &str) -> Option<(String, String)> {
    let caps = WIKIPEDIA_RE.captures(url)?;
    let title = caps[2].trim_end_matches('/');
    if title.is_empty() || is_namespaced(title) {
        return None;
    }
    Some((caps[1].to_ascii_lowercase(), title.to_string()))
}

/// Special pages, talk pages and files are not articles.
fn is_namespaced(title: &str) -> bool {
    const NAMESPACES: &[&str] =
        &["Special:", "Talk:", "File:", "Category:", "Help:", "Wikipedia:", "Template:", "User:"];
    NAMESPACES.iter().any(|ns| title.starts_with(ns))
}

/// Eleven-character YouTube video id.
#[must_use]
pub fn extract_youtube_id(url: &str) -> Option<String> {
    YOUTUBE_RE.captures(url).map(|caps| caps[1].to_string())
}

/// Numeric Vimeo video id.
#[must_use]
pub fn extract_vimeo_id(url: &str) -> Option<String> {
    VIMEO_RE.captures(url).map(|caps| caps[1].to_string())
}

/// JSTOR stable id.
#[must_use]
pub fn extract_jstor_id(url: &str) -> Option<String> {
    JSTOR_RE.captures(url).map(|caps| caps[1].to_string())
}

/// SSRN abstract id.
#[must_use]
pub fn extract_ssrn_id(url: &str) -> Option<String> {
    SSRN_RE.captures(url).map(|caps| caps[1].to_string())
}

/// First ISBN in the text with a valid checksum, digits only.
#[must_use]
pub fn extract_isbn(text: &str) -> Option<String> {
    ISBN_CANDIDATE_RE
        .find_iter(text)
        .map(|m| normalize_isbn(m.as_str()))
        .find(|isbn| is_valid_isbn(isbn))
}

/// Strip hyphens and spaces and uppercase a trailing `x`.
#[must_use]
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_uppercase()).collect()
}

/// ISBN-10 or ISBN-13 checksum test on a normalized ISBN.
#[must_use]
pub fn is_valid_isbn(isbn: &str) -> bool {
    let digits: Vec<u32> = isbn
        .chars()
        .enumerate()
        .map_while(|(i, c)| match c {
            'X' if i == 9 && isbn.len() == 10 => Some(10),
            _ => c.to_digit(10),
        })
        .collect();

    match (isbn.len(), digits.len()) {
        (10, 10) => {
            let sum: u32 = digits.iter().zip((1..=10).rev()).map(|(d, w)| d * w).sum();
            sum % 11 == 0
        }
        (13, 13) => {
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
                .sum();
            sum % 10 == 0
        }
        _ => false,
    }
}

/// Semantic Scholar paper id (40 hex characters).
#[must_use]
pub fn extract_semantic_scholar_id(url: &str) -> Option<String> {
    S2_RE.captures(url).map(|caps| caps[1].to_ascii_lowercase())
}

/// Book identifier from a catalogue URL: `isbn:…`, `gbid:…` or `olid:…`.
#[must_use]
pub fn extract_book_id(url: &str) -> Option<String> {
    if let Some(caps) = OPEN_LIBRARY_RE.captures(url) {
        return Some(format!("olid:{}", &caps[1]));
    }
    if let Some(isbn) = extract_isbn(url) {
        return Some(format!("isbn:{isbn}"));
    }
    if url.contains("books.google.") {
        return GOOGLE_BOOKS_ID_RE.captures(url).map(|caps| format!("gbid:{}", &caps[1]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_from_publisher_urls() {
        assert_eq!(
            extract_doi("https://onlinelibrary.wiley.com/doi/full/10.1002/anie.201915678").as_deref(),
            Some("10.1002/anie.201915678")
        );
        assert_eq!(
            extract_doi("https://www.tandfonline.com/doi/abs/10.1080/00220388.2019.1649509?journalCode=fjds")
                .as_deref(),
            Some("10.1080/00220388.2019.1649509")
        );
        assert_eq!(
            extract_doi("https://doi.org/10.1016/S0140-6736(20)30183-5").as_deref(),
            Some("10.1016/S0140-6736(20)30183-5")
        );
        assert_eq!(extract_doi("(see 10.1000/xyz123)."), Some("10.1000/xyz123".to_string()));
        assert_eq!(extract_doi("https://example.com/10.5/"), None);
    }

    #[test]
    fn test_arxiv_ids() {
        assert_eq!(extract_arxiv_id("https://arxiv.org/abs/2301.01234v2").as_deref(), Some("2301.01234"));
        assert_eq!(extract_arxiv_id("https://arxiv.org/pdf/1706.03762.pdf").as_deref(), Some("1706.03762"));
        assert_eq!(extract_arxiv_id("arXiv:1706.03762").as_deref(), Some("1706.03762"));
        assert_eq!(
            extract_arxiv_id("https://arxiv.org/abs/hep-th/9901001").as_deref(),
            Some("hep-th/9901001")
        );
        assert_eq!(extract_arxiv_id("the year 2020 was long"), None);
    }

    #[test]
    fn test_pubmed_ids() {
        assert_eq!(extract_pmid("https://pubmed.ncbi.nlm.nih.gov/32015507/").as_deref(), Some("32015507"));
        assert_eq!(extract_pmid("https://www.ncbi.nlm.nih.gov/pubmed/32015507").as_deref(), Some("32015507"));
        assert_eq!(
            extract_pmid("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7092803/").as_deref(),
            Some("PMC7092803")
        );
    }

    #[test]
    fn test_wikipedia_titles() {
        assert_eq!(
            extract_wikipedia_title("https://en.m.wikipedia.org/wiki/Rust_(programming_language)"),
            Some(("en".to_string(), "Rust_(programming_language)".to_string()))
        );
        assert_eq!(extract_wikipedia_title("https://en.wikipedia.org/wiki/Special:Random"), None);
    }

    #[test]
    fn test_video_ids() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_youtube_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_youtube_id("https://www.youtube.com/shorts/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_youtube_id("https://www.youtube.com/@channel"), None);
        assert_eq!(extract_vimeo_id("https://vimeo.com/76979871").as_deref(), Some("76979871"));
        assert_eq!(extract_vimeo_id("https://player.vimeo.com/video/76979871").as_deref(), Some("76979871"));
    }

    #[test]
    fn test_jstor_and_ssrn() {
        assert_eq!(extract_jstor_id("https://www.jstor.org/stable/1885099").as_deref(), Some("1885099"));
        assert_eq!(
            extract_ssrn_id("https://papers.ssrn.com/sol3/papers.cfm?abstract_id=1234567").as_deref(),
            Some("1234567")
        );
    }

    #[test]
    fn test_isbn_checksums() {
        assert!(is_valid_isbn("9780306406157"));
        assert!(is_valid_isbn("0306406152"));
        assert!(is_valid_isbn("080442957X"));
        assert!(!is_valid_isbn("9780306406158"));
        assert_eq!(extract_isbn("ISBN 978-0-306-40615-7").as_deref(), Some("9780306406157"));
        assert_eq!(extract_isbn("call 555-123-4567"), None);
    }

    #[test]
    fn test_book_ids() {
        assert_eq!(
            extract_book_id("https://openlibrary.org/books/OL7353617M/Fantastic_Mr._Fox").as_deref(),
            Some("olid:OL7353617M")
        );
        assert_eq!(
            extract_book_id("https://www.amazon.com/dp/0306406152").as_deref(),
            Some("isbn:0306406152")
        );
        assert_eq!(
            extract_book_id("https://books.google.com/books?id=zyTCAlFPjgYC&hl=en").as_deref(),
            Some("gbid:zyTCAlFPjgYC")
        );
    }

    #[test]
    fn test_semantic_scholar_id() {
        let url = "https://www.semanticscholar.org/paper/Attention-is-All-you-Need-Vaswani/204e3073870fae3d05bcbc2f6a8e263d9b72e776";
        assert_eq!(
            extract_semantic_scholar_id(url).as_deref(),
            Some("204e3073870fae3d05bcbc2f6a8e263d9b72e776")
        );
    }
}
