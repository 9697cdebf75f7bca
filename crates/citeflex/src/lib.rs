//! citeflex
//!
//! Turns URLs, identifiers and loosely typed references into Chicago, APA and
//! MLA citations.
//!
//! # Features
//!
//! - **URL routing**: a fixed table maps domains to metadata engines
//! - **12 engines**: Crossref, arXiv, PubMed, Wikipedia, YouTube, Vimeo,
//!   Google Books/Open Library, Semantic Scholar, CourtListener and page scraping
//! - **Fallbacks**: generic scraping, then Brave search when configured
//! - **Note sequences**: ibid and short forms for repeated sources
//! - **Reference lists**: every `(Author, Year)` citation in a text, looked up and sorted
//! - **Surfaces**: CLI, JSON API and MCP tools over stdio or HTTP
//!
//! # Example
//!
//! ```no_run
//! use citeflex::{Citeflex, config::Config, models::CitationStyle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let citeflex = Citeflex::new(Config::from_env()?)?;
//!     let citation = citeflex.cite("10.2307/1914185", CitationStyle::Chicago).await?;
//!     println!("{}", citation.formatted);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod engines;
pub mod error;
pub mod formatters;
pub mod input;
pub mod models;
pub mod notes;
pub mod references;
pub mod resolver;
pub mod router;
pub mod server;
pub mod tools;

pub use client::HttpClient;
pub use config::Config;
pub use error::{CiteError, ClientError};
pub use resolver::{Citeflex, FormattedCitation, Resolved};
