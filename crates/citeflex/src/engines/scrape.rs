//! HTML scraping for newspapers, government sites and everything else.
//!
//! Metadata comes from, in order of trust: Highwire `citation_*` tags,
//! Open Graph and `article:*` properties, JSON-LD, Dublin Core and finally
//! the `<title>` element.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use super::{Engine, EngineContext, access_date, clean_text};
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationMetadata, CitationType, PubDate, strip_doi};
use crate::router::{EngineKind, Route, UrlType, extract_doi};

static META_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid meta selector"));
static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));
static JSON_LD_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid JSON-LD selector")
});
static CANONICAL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="canonical"]"#).expect("valid canonical selector"));
static TIME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").expect("valid time selector"));
static BYLINE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[rel="author"], .byline__name, .author-name, [itemprop="author"] [itemprop="name"]"#)
        .expect("valid byline selector")
});

const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " — ", " – ", " · ", " :: "];

/// Everything a page says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub date: Option<String>,
    pub site_name: Option<String>,
    pub publisher: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub canonical_url: Option<String>,
    pub description: Option<String>,
    /// Whether the page carries Highwire `citation_*` tags.
    pub scholarly: bool,
}

/// `<meta>` name/property (lowercased) to content, in document order.
struct MetaTags(Vec<(String, String)>);

impl MetaTags {
    fn collect(doc: &Html) -> Self {
        let tags = doc
            .select(&META_SEL)
            .filter_map(|el| {
                let v = el.value();
                let key = v.attr("name").or_else(|| v.attr("property")).or_else(|| v.attr("itemprop"))?;
                let content = clean_text(v.attr("content")?);
                (!content.is_empty()).then(|| (key.trim().to_ascii_lowercase(), content))
            })
            .collect();
        Self(tags)
    }

    fn first(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|k| self.0.iter().find(|(name, _)| name == k).map(|(_, v)| v.clone()))
    }

    fn all(&self, key: &str) -> Vec<String> {
        self.0.iter().filter(|(name, _)| name == key).map(|(_, v)| v.clone()).collect()
    }
}

impl PageMeta {
    /// Extract metadata from an HTML document.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let tags = MetaTags::collect(&doc);
        let ld = JsonLd::collect(&doc);

        let title = tags
            .first(&["citation_title", "dc.title", "og:title", "twitter:title"])
            .or_else(|| ld.string("headline"))
            .or_else(|| {
                doc.select(&TITLE_SEL)
                    .next()
                    .map(|t| clean_text(&t.text().collect::<String>()))
                    .filter(|t| !t.is_empty())
            })
            .or_else(|| ld.string("name"))
            .filter(|t| !t.is_empty());

        let mut authors = tags.all("citation_author");
        if authors.is_empty() {
            authors = tags.all("dc.creator");
        }
        if authors.is_empty() {
            authors = ld.authors();
        }
        if authors.is_empty() {
            authors = tags
                .first(&["author", "article:author", "parsely-author", "sailthru.author", "byl"])
                .filter(|a| !a.starts_with("http"))
                .map(|a| split_byline(&a))
                .unwrap_or_default();
        }
        if authors.is_empty() {
            authors = doc
                .select(&BYLINE_SEL)
                .map(|el| clean_text(&el.text().collect::<String>()))
                .filter(|a| !a.is_empty() && a.split_whitespace().count() <= 5)
                .flat_map(|a| split_byline(&a))
                .collect();
            authors.dedup();
        }

        let date = tags
            .first(&[
                "citation_publication_date",
                "citation_date",
                "citation_online_date",
                "article:published_time",
                "dc.date",
                "dc.date.issued",
                "dcterms.date",
                "pubdate",
                "publishdate",
                "parsely-pub-date",
                "date",
                "og:updated_time",
            ])
            .or_else(|| ld.string("datePublished"))
            .or_else(|| {
                doc.select(&TIME_SEL)
                    .next()
                    .and_then(|t| t.value().attr("datetime"))
                    .map(str::to_string)
            });

        let site_name = tags
            .first(&["og:site_name", "application-name", "citation_journal_title"])
            .or_else(|| ld.publisher());

        let first_page = tags.first(&["citation_firstpage"]);
        let last_page = tags.first(&["citation_lastpage"]);
        let pages = match (first_page, last_page) {
            (Some(first), Some(last)) if first != last => Some(format!("{first}-{last}")),
            (first, _) => first,
        };

        let doi = tags
            .first(&["citation_doi", "dc.identifier", "prism.doi"])
            .and_then(|d| extract_doi(&d).or_else(|| Some(strip_doi(&d).to_string())))
            .filter(|d| d.starts_with("10."));

        let canonical_url = doc
            .select(&CANONICAL_SEL)
            .next()
            .and_then(|l| l.value().attr("href"))
            .map(str::to_string)
            .or_else(|| tags.first(&["og:url"]))
            .filter(|u| u.starts_with("http"));

        Self {
            title,
            authors: authors.into_iter().map(|a| a.trim().to_string()).filter(|a| !a.is_empty()).collect(),
            date,
            publisher: tags.first(&["citation_publisher", "dc.publisher"]).or_else(|| ld.publisher()),
            site_name,
            journal: tags.first(&["citation_journal_title", "prism.publicationname"]),
            volume: tags.first(&["citation_volume", "prism.volume"]),
            issue: tags.first(&["citation_issue", "prism.number"]),
            pages,
            doi,
            canonical_url,
            description: tags.first(&["description", "og:description"]),
            scholarly: tags.first(&["citation_title"]).is_some(),
        }
    }
}

/// Split `By Jane Doe and John Roe` into names.
fn split_byline(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let without_by = trimmed
        .strip_prefix("By ")
        .or_else(|| trimmed.strip_prefix("by "))
        .or_else(|| trimmed.strip_prefix("BY "))
        .unwrap_or(trimmed);
    without_by
        .split(" and ")
        .flat_map(|part| part.split(" & "))
        .flat_map(|part| {
            // `Doe, Jane` is one name; `Jane Doe, John Roe` is two.
            let pieces: Vec<&str> = part.split(", ").collect();
            if pieces.len() > 1 && pieces.iter().all(|p| p.trim().contains(' ')) {
                pieces
            } else {
                vec![part]
            }
        })
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// JSON-LD nodes from every `ld+json` block, flattened through `@graph`.
struct JsonLd(Vec<Value>);

impl JsonLd {
    fn collect(doc: &Html) -> Self {
        let mut nodes = Vec::new();
        for script in doc.select(&JSON_LD_SEL) {
            let text = script.text().collect::<String>();
            let Ok(value) = serde_json::from_str::<Value>(text.trim()) else { continue };
            flatten_ld(value, &mut nodes);
        }
        // Article-like nodes first.
        nodes.sort_by_key(|n| !is_article_node(n));
        Self(nodes)
    }

    fn string(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find_map(|n| n.get(key).and_then(Value::as_str))
            .map(clean_text)
            .filter(|s| !s.is_empty())
    }

    fn authors(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|n| is_article_node(n))
            .find_map(|n| n.get("author"))
            .map(ld_names)
            .unwrap_or_default()
    }

    fn publisher(&self) -> Option<String> {
        self.0.iter().find_map(|n| n.get("publisher")).and_then(|p| ld_names(p).into_iter().next())
    }
}

fn flatten_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|v| flatten_ld(v, out)),
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_ld(graph, out);
            }
            out.push(Value::Object(map));
        }
        _ => {}
    }
}

fn is_article_node(node: &Value) -> bool {
    let is_article = |t: &str| t.ends_with("Article") || t == "BlogPosting" || t == "Report";
    match node.get("@type") {
        Some(Value::String(t)) => is_article(t.as_str()),
        Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).any(is_article),
        _ => false,
    }
}

/// Names from a JSON-LD person/organization value (string, object or list).
fn ld_names(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_byline(s),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(clean_text)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
        Value::Array(items) => items.iter().flat_map(ld_names).collect(),
        _ => Vec::new(),
    }
}

/// Remove a trailing site name from a page title.
///
/// `Budget deal reached | Reuters` becomes `Budget deal reached` when the
/// site is Reuters. Titles whose tail is not the site name are left alone.
#[must_use]
pub fn clean_title(title: &str, site: Option<&str>) -> String {
    let title = clean_text(title);
    let Some(site) = site.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) else {
        return title;
    };
    let site_core = site.trim_start_matches("the ").to_string();

    for sep in TITLE_SEPARATORS {
        if let Some((head, tail)) = title.rsplit_once(sep) {
            let tail = tail.trim().to_lowercase();
            let tail_core = tail.trim_start_matches("the ");
            let names_site = tail_core == site_core
                || (tail_core.len() >= 3 && site_core.contains(tail_core))
                || tail_core.contains(&site_core);
            if !head.trim().is_empty() && names_site {
                return head.trim().to_string();
            }
        }
        if let Some((head, tail)) = title.split_once(sep) {
            let head_core = head.trim().to_lowercase();
            if !tail.trim().is_empty() && head_core.trim_start_matches("the ") == site_core {
                return tail.trim().to_string();
            }
        }
    }
    title
}

/// Scraping engine for one of the page-based engine kinds.
#[derive(Debug, Clone)]
pub struct ScrapeEngine {
    http: HttpClient,
    kind: EngineKind,
}

impl ScrapeEngine {
    #[must_use]
    pub fn new(ctx: &EngineContext, kind: EngineKind) -> Self {
        Self { http: ctx.http.clone(), kind }
    }

    /// Fetch and parse a page.
    ///
    /// # Errors
    ///
    /// Returns transport errors from the page fetch.
    pub async fn page(&self, url: &str) -> ClientResult<(String, PageMeta)> {
        let fetched = self.http.get_page(url).await?;
        let meta = PageMeta::parse(&fetched.body);
        tracing::debug!(url, title = ?meta.title, authors = meta.authors.len(), "scraped");
        Ok((fetched.url, meta))
    }
}

/// Map scraped page metadata onto a citation for the given route.
#[must_use]
pub fn page_to_metadata(route: &Route, final_url: &str, page: PageMeta) -> CitationMetadata {
    let site = page.site_name.clone().or_else(|| route.publication.map(str::to_string));
    let publication = route.publication.map(str::to_string).or_else(|| site.clone());

    let citation_type = match route.url_type {
        UrlType::Newspaper => CitationType::Newspaper,
        UrlType::Government => CitationType::Government,
        _ if page.scholarly && page.journal.is_some() => CitationType::Journal,
        UrlType::AcademicPublisher if page.journal.is_some() => CitationType::Journal,
        _ => CitationType::Webpage,
    };

    let date = page.date.as_deref().and_then(PubDate::parse);
    let title = page.title.as_deref().map(|t| clean_title(t, site.as_deref().or(route.publication)));

    let mut meta = CitationMetadata {
        citation_type,
        title: title.filter(|t| !t.is_empty()),
        authors: page.authors,
        date: date.map(|d| d.to_string()),
        year: date.map(|d| d.year.to_string()),
        publisher: page.publisher,
        volume: page.volume,
        issue: page.issue,
        pages: page.pages,
        doi: page.doi,
        url: Some(page.canonical_url.unwrap_or_else(|| final_url.to_string())),
        access_date: Some(access_date()),
        ..CitationMetadata::default()
    };

    match citation_type {
        CitationType::Newspaper => meta.newspaper = publication,
        CitationType::Government => {
            meta.agency = publication.or_else(|| meta.publisher.clone());
        }
        CitationType::Journal => meta.journal = page.journal.or(publication),
        _ => meta.website = site.or_else(|| Some(route.domain.clone())),
    }
    meta
}

#[async_trait::async_trait]
impl Engine for ScrapeEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn fetch(&self, route: &Route) -> ClientResult<CitationMetadata> {
        let (final_url, page) = self.page(&route.url).await?;
        let mut meta = page_to_metadata(route, &final_url, page);
        if !meta.is_complete() {
            return Err(ClientError::no_results(self.kind.name(), &route.url));
        }
        meta.source_engine = Some(self.kind.name().to_string());
        meta.raw_source = Some(route.url.clone());
        Ok(meta)
    }
}
