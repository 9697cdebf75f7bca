//! Configuration for citeflex.
//!
//! Provider endpoints, API keys, timeouts and cache settings.

use std::time::Duration;

use crate::models::CitationStyle;

/// Provider defaults.
pub mod api {
    use std::time::Duration;

    /// Crossref REST API.
    pub const CROSSREF: &str = "https://api.crossref.org";

    /// OpenAlex API.
    pub const OPENALEX: &str = "https://api.openalex.org";

    /// Semantic Scholar Graph API.
    pub const SEMANTIC_SCHOLAR: &str = "https://api.semanticscholar.org/graph/v1";

    /// NCBI E-utilities.
    pub const PUBMED: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

    /// arXiv export API.
    pub const ARXIV: &str = "https://export.arxiv.org/api";

    /// Wikipedia REST API, `{lang}` is substituted with the article language.
    pub const WIKIPEDIA: &str = "https://{lang}.wikipedia.org/api/rest_v1";

    /// YouTube oEmbed endpoint.
    pub const YOUTUBE_OEMBED: &str = "https://www.youtube.com/oembed";

    /// Vimeo oEmbed endpoint.
    pub const VIMEO_OEMBED: &str = "https://vimeo.com/api/oembed.json";

    /// Google Books API.
    pub const GOOGLE_BOOKS: &str = "https://www.googleapis.com/books/v1";

    /// Open Library.
    pub const OPEN_LIBRARY: &str = "https://openlibrary.org";

    /// CourtListener REST API.
    pub const COURTLISTENER: &str = "https://www.courtlistener.com/api/rest/v4";

    /// Brave Search API.
    pub const BRAVE: &str = "https://api.search.brave.com/res/v1";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Delay before each provider request.
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(100);

    /// Response cache TTL.
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cached responses.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Max idle connections per host.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keep-alive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Concurrent lookups when resolving a list of notes.
    pub const MAX_CONCURRENT_LOOKUPS: usize = 8;

    /// User agent sent to providers and scraped sites.
    pub const USER_AGENT: &str = concat!("citeflex/", env!("CARGO_PKG_VERSION"));
}

/// Base URLs for every provider.
///
/// All of them are overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub crossref: String,
    pub openalex: String,
    pub semantic_scholar: String,
    pub pubmed: String,
    pub arxiv: String,
    /// Template with a `{lang}` placeholder.
    pub wikipedia: String,
    pub youtube_oembed: String,
    pub vimeo_oembed: String,
    pub google_books: String,
    pub open_library: String,
    pub courtlistener: String,
    pub brave: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            crossref: api::CROSSREF.to_string(),
            openalex: api::OPENALEX.to_string(),
            semantic_scholar: api::SEMANTIC_SCHOLAR.to_string(),
            pubmed: api::PUBMED.to_string(),
            arxiv: api::ARXIV.to_string(),
            wikipedia: api::WIKIPEDIA.to_string(),
            youtube_oembed: api::YOUTUBE_OEMBED.to_string(),
            vimeo_oembed: api::VIMEO_OEMBED.to_string(),
            google_books: api::GOOGLE_BOOKS.to_string(),
            open_library: api::OPEN_LIBRARY.to_string(),
            courtlistener: api::COURTLISTENER.to_string(),
            brave: api::BRAVE.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every provider at one mock server, each under its own path prefix.
    #[must_use]
    pub fn under(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            crossref: format!("{base}/crossref"),
            openalex: format!("{base}/openalex"),
            semantic_scholar: format!("{base}/s2/graph/v1"),
            pubmed: format!("{base}/pubmed"),
            arxiv: format!("{base}/arxiv"),
            wikipedia: format!("{base}/wikipedia/{{lang}}"),
            youtube_oembed: format!("{base}/youtube/oembed"),
            vimeo_oembed: format!("{base}/vimeo/oembed.json"),
            google_books: format!("{base}/books/v1"),
            open_library: format!("{base}/openlibrary"),
            courtlistener: format!("{base}/courtlistener"),
            brave: format!("{base}/brave"),
        }
    }

    /// Wikipedia base URL for a language edition.
    #[must_use]
    pub fn wikipedia_for(&self, lang: &str) -> String {
        self.wikipedia.replace("{lang}", lang)
    }
}

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// Provider base URLs.
    pub endpoints: Endpoints,

    /// Brave Search key; enables the search fallback for URLs.
    pub brave_api_key: Option<String>,

    /// Semantic Scholar key (optional, higher rate limits).
    pub semantic_scholar_api_key: Option<String>,

    /// Google Books key (optional).
    pub google_books_api_key: Option<String>,

    /// CourtListener token (optional).
    pub courtlistener_token: Option<String>,

    /// NCBI key (optional).
    pub ncbi_api_key: Option<String>,

    /// Contact address for the Crossref polite pool.
    pub mailto: Option<String>,

    /// Style used when a request does not name one.
    pub default_style: CitationStyle,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay before each provider request.
    pub rate_limit_delay: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Retries for transient transport failures.
    pub max_retries: u32,

    /// Concurrent lookups when resolving a list of notes.
    pub max_concurrent_lookups: usize,
}

impl Config {
    /// Create a configuration with production endpoints and no keys.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoints: Endpoints::default(),
            brave_api_key: None,
            semantic_scholar_api_key: None,
            google_books_api_key: None,
            courtlistener_token: None,
            ncbi_api_key: None,
            mailto: None,
            default_style: CitationStyle::default(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            max_retries: 2,
            max_concurrent_lookups: api::MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Create a test configuration with every endpoint on a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            endpoints: Endpoints::under(base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            cache_ttl: Duration::from_secs(0),          // No caching in tests
            cache_max_size: 0,
            max_retries: 0,
            ..Self::new()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns error if `CITEFLEX_STYLE` names an unknown style.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::new();
        config.brave_api_key = var("BRAVE_API_KEY");
        config.semantic_scholar_api_key = var("SEMANTIC_SCHOLAR_API_KEY");
        config.google_books_api_key = var("GOOGLE_BOOKS_API_KEY");
        config.courtlistener_token = var("COURTLISTENER_API_TOKEN");
        config.ncbi_api_key = var("NCBI_API_KEY");
        config.mailto = var("CITEFLEX_MAILTO");

        if let Some(style) = var("CITEFLEX_STYLE") {
            config.default_style = style
                .parse()
                .map_err(|e| anyhow::anyhow!("CITEFLEX_STYLE: {e}"))?;
        }

        Ok(config)
    }

    /// Check if the Brave search fallback is available.
    #[must_use]
    pub const fn has_search_fallback(&self) -> bool {
        self.brave_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoints", &self.endpoints)
            .field("has_brave_key", &self.brave_api_key.is_some())
            .field("has_semantic_scholar_key", &self.semantic_scholar_api_key.is_some())
            .field("default_style", &self.default_style)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
