//! Shared HTTP client for every metadata provider.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - A politeness delay between requests
//! - Response caching keyed on method, URL, query and headers

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Accept header for JSON APIs.
pub const ACCEPT_JSON: &str = "application/json";

/// Accept header for HTML pages.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Accept header for Atom feeds.
pub const ACCEPT_XML: &str = "application/atom+xml,application/xml;q=0.9,*/*;q=0.8";

/// A response body together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// URL after redirects.
    pub url: String,
    /// Response body.
    pub body: Arc<str>,
}

/// HTTP client shared by all engines.
#[derive(Clone)]
pub struct HttpClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response cache.
    cache: Cache<String, Fetched>,

    /// Delay before each uncached request.
    rate_limit_delay: Duration,

    /// Per-request timeout, reported on timeouts.
    request_timeout: Duration,
}

impl HttpClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = match config.mailto.as_deref() {
            Some(mailto) => format!("{} (mailto:{mailto})", api::USER_AGENT),
            None => api::USER_AGENT.to_string(),
        };
        headers.insert(USER_AGENT, HeaderValue::from_str(&agent)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(10))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            rate_limit_delay: config.rate_limit_delay,
            request_timeout: config.request_timeout,
        })
    }

    /// GET a JSON document.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or bad JSON.
    pub async fn get_json<T>(&self, url: &str, params: &[(&str, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.get_json_with(url, params, &[]).await
    }

    /// GET a JSON document with extra request headers (API keys, tokens).
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or bad JSON.
    pub async fn get_json_with<T>(
        &self,
        url: &str,
        params: &[(&str, String)],
        headers: &[(&'static str, String)],
    ) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let fetched = self.fetch(url, params, headers, ACCEPT_JSON).await?;
        serde_json::from_str(&fetched.body).map_err(ClientError::from)
    }

    /// GET an XML document as text.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or non-success status.
    pub async fn get_xml(&self, url: &str, params: &[(&str, String)]) -> ClientResult<Arc<str>> {
        Ok(self.fetch(url, params, &[], ACCEPT_XML).await?.body)
    }

    /// GET an HTML page for scraping.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or non-success status.
    pub async fn get_page(&self, url: &str) -> ClientResult<Fetched> {
        self.fetch(url, &[], &[], ACCEPT_HTML).await
    }

    /// Make a GET request, consulting the cache first.
    async fn fetch(
        &self,
        url: &str,
        params: &[(&str, String)],
        headers: &[(&'static str, String)],
        accept: &str,
    ) -> ClientResult<Fetched> {
        // Check cache
        let cache_key = cache_key("GET", url, params, headers);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::trace!(url, "cache hit");
            return Ok(cached);
        }

        // Rate limit
        tokio::time::sleep(self.rate_limit_delay).await;

        let mut request = self.client.get(url).query(params).header(ACCEPT, accept);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await.map_err(|e| self.classify_transport(e))?;
        let response = handle_response(response).await?;
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() { ClientError::Timeout(self.request_timeout) } else { e.into() }
        })?;

        let fetched = Fetched { url: final_url, body: Arc::from(body) };

        // Cache response
        self.cache.insert(cache_key, fetched.clone()).await;

        Ok(fetched)
    }

    fn classify_transport(&self, err: reqwest_middleware::Error) -> ClientError {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                ClientError::Timeout(self.request_timeout)
            }
            reqwest_middleware::Error::Reqwest(e) => ClientError::Http(e),
            other => ClientError::Middleware(other),
        }
    }
}

/// Handle provider response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        404 | 410 => {
            let url = response.url().to_string();
            Err(ClientError::not_found(url))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}

/// Generate cache key.
fn cache_key(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    headers: &[(&'static str, String)],
) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");

    for (k, v) in params.iter().chain(headers.iter()) {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}
