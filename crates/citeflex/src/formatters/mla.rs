//! MLA Handbook, 9th edition.

use super::CitationFormatter;
use super::common::{
    bare_url, date, edition_label, italic, join_parts, join_with, page_range, people, quoted, sentences, short_title,
    surnames,
};
use crate::models::{CitationMetadata, CitationStyle, CitationType};

/// MLA works-cited and in-text formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MlaFormatter;

/// `Doe, Jane`, `Doe, Jane, and John Roe`, `Doe, Jane, et al.`
fn works_cited_authors(meta: &CitationMetadata) -> String {
    match people(meta).as_slice() {
        [] => String::new(),
        [one] => one.family_first(),
        [a, b] => format!("{}, and {}", a.family_first(), b.given_first()),
        [first, ..] => format!("{}, et al.", first.family_first()),
    }
}

fn cite_authors(meta: &CitationMetadata) -> String {
    match surnames(meta).as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [first, ..] => format!("{first} et al."),
    }
}

/// DOI link, else the URL without its scheme.
fn location(meta: &CitationMetadata) -> String {
    meta.doi_url()
        .or_else(|| meta.url.as_deref().map(bare_url))
        .unwrap_or_default()
}

fn mla_date(meta: &CitationMetadata) -> String {
    date(meta).map(|d| d.mla()).unwrap_or_default()
}

fn year(meta: &CitationMetadata) -> String {
    meta.year().map(|y| y.to_string()).unwrap_or_default()
}

/// Publisher, unless it repeats the site or agency already named.
fn distinct_publisher(meta: &CitationMetadata, named: Option<&str>) -> String {
    meta.publisher.as_deref().filter(|p| Some(*p) != named).unwrap_or_default().to_string()
}

fn is_periodical(meta: &CitationMetadata) -> bool {
    match meta.citation_type {
        CitationType::Journal | CitationType::Medical => true,
        CitationType::Preprint => meta.journal.is_some(),
        _ => false,
    }
}

const fn italic_title(citation_type: CitationType) -> bool {
    matches!(citation_type, CitationType::Book | CitationType::Government)
}

fn case_name(meta: &CitationMetadata) -> &str {
    meta.case_name.as_deref().or(meta.title.as_deref()).unwrap_or("Untitled")
}

impl CitationFormatter for MlaFormatter {
    fn style(&self) -> CitationStyle {
        CitationStyle::Mla
    }

    fn format_full(&self, meta: &CitationMetadata) -> String {
        let authors = works_cited_authors(meta);
        let title = meta.title_or_default();

        match meta.citation_type {
            CitationType::Legal => sentences(&[
                italic(case_name(meta)),
                meta.citation.clone().unwrap_or_default(),
                join_with(&[meta.court.clone().unwrap_or_default(), year(meta)], ','),
                meta.url.as_deref().map(bare_url).unwrap_or_default(),
            ]),
            _ if is_periodical(meta) => sentences(&[
                authors,
                quoted(title),
                join_with(
                    &[
                        meta.journal.as_deref().map(italic).unwrap_or_default(),
                        meta.volume.as_deref().map(|v| format!("vol. {v}")).unwrap_or_default(),
                        meta.issue.as_deref().map(|i| format!("no. {i}")).unwrap_or_default(),
                        mla_date(meta),
                        meta.pages.as_deref().map(|p| format!("pp. {}", page_range(p))).unwrap_or_default(),
                        location(meta),
                    ],
                    ',',
                ),
            ]),
            CitationType::Book => sentences(&[
                authors,
                italic(title),
                join_with(
                    &[
                        meta.edition.as_deref().map(|e| format!("{} ed.", edition_label(e))).unwrap_or_default(),
                        meta.publisher.clone().unwrap_or_default(),
                        year(meta),
                    ],
                    ',',
                ),
                meta.doi_url().unwrap_or_default(),
            ]),
            CitationType::Newspaper => sentences(&[
                authors,
                quoted(title),
                join_with(
                    &[meta.container().map(italic).unwrap_or_default(), mla_date(meta), location(meta)],
                    ',',
                ),
            ]),
            CitationType::Government => {
                let agency = meta.agency.as_deref();
                let author = if authors.is_empty() { agency.unwrap_or_default().to_string() } else { authors };
                sentences(&[
                    author,
                    italic(title),
                    join_with(&[distinct_publisher(meta, agency), mla_date(meta), location(meta)], ','),
                ])
            }
            CitationType::Encyclopedia => {
                let site = meta.website.as_deref().unwrap_or("Wikipedia");
                sentences(&[
                    quoted(title),
                    join_with(
                        &[italic(site), distinct_publisher(meta, Some(site)), mla_date(meta), location(meta)],
                        ',',
                    ),
                ])
            }
            CitationType::Preprint => sentences(&[
                authors,
                quoted(title),
                join_with(
                    &[meta.publisher.as_deref().map(italic).unwrap_or_default(), mla_date(meta), location(meta)],
                    ',',
                ),
            ]),
            _ => {
                let site = meta.website.as_deref();
                let accessed = if date(meta).is_none() {
                    meta.parsed_access_date().map(|d| format!("Accessed {}", d.mla())).unwrap_or_default()
                } else {
                    String::new()
                };
                sentences(&[
                    authors,
                    quoted(title),
                    join_with(
                        &[
                            site.map(italic).unwrap_or_default(),
                            distinct_publisher(meta, site),
                            mla_date(meta),
                            location(meta),
                        ],
                        ',',
                    ),
                    accessed,
                ])
            }
        }
    }

    fn format_short(&self, meta: &CitationMetadata) -> String {
        self.format_in_text(meta, None)
    }

    /// MLA has no ibid; repeated citations use the parenthetical again.
    fn format_ibid(&self, meta: &CitationMetadata, page: Option<&str>) -> String {
        self.format_in_text(meta, page)
    }

    fn format_in_text(&self, meta: &CitationMetadata, page: Option<&str>) -> String {
        let who = match meta.citation_type {
            CitationType::Legal => italic(case_name(meta)),
            t => {
                let mut who = cite_authors(meta);
                if who.is_empty() && t == CitationType::Government {
                    who = meta.agency.clone().unwrap_or_default();
                }
                if who.is_empty() {
                    let short = short_title(meta.title_or_default());
                    who = if italic_title(t) { italic(&short) } else { quoted(&short) };
                }
                who
            }
        };
        let page = page
            .map(|p| p.trim().trim_start_matches("pp.").trim_start_matches("p.").trim())
            .filter(|p| !p.is_empty())
            .map(page_range);
        format!("({})", join_parts(&[who, page.unwrap_or_default()], " "))
    }
}
