//! citeflex - entry point
//!
//! One-shot citations from the command line, or a long-running server
//! (MCP over stdio, or the JSON API plus MCP over HTTP).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use citeflex::formatters::{
    citation_json, classification_json, format_route_markdown, notes_json, references_json, strip_markup,
};
use citeflex::models::CitationStyle;
use citeflex::notes::process_notes;
use citeflex::references::build_references;
use citeflex::server::McpServer;
use citeflex::{Citeflex, config::Config};

#[derive(Parser, Debug)]
#[command(name = "citeflex")]
#[command(about = "Turn URLs and references into Chicago, APA and MLA citations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Citation style used when a request names none
    #[arg(long, global = true, env = "CITEFLEX_STYLE")]
    style: Option<CitationStyle>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format one citation
    Cite {
        /// URL, DOI, ISBN, case name or reference text
        text: String,

        /// Plain text, without <i> markup
        #[arg(long)]
        plain: bool,

        /// Print the citation and its metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a URL is routed, without fetching it
    Classify {
        url: String,

        #[arg(long)]
        json: bool,
    },

    /// Format a file of notes, one per line
    Notes {
        /// Notes file (`-` for stdin)
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Build a reference list from the author-date citations in a text file
    References {
        /// Text file (`-` for stdin)
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Run the server
    Serve {
        /// Transport mode: stdio or http
        #[arg(long, default_value = "stdio")]
        transport: Transport,

        /// HTTP server port (only used with --transport http)
        #[arg(long, default_value = "8000", env = "PORT")]
        port: u16,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// JSON API and MCP over HTTP
    Http,
}

/// Logs go to stderr; stdout carries citations and MCP responses.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading stdin")
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
    }
}

fn read_notes(file: &Path) -> anyhow::Result<Vec<String>> {
    let text = read_input(file)?;
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(style) = cli.style {
        config.default_style = style;
    }
    let style = config.default_style;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), ?config, "Starting citeflex");

    let citeflex = Citeflex::new(config)?;

    match cli.command {
        Command::Cite { text, plain, json } => {
            let citation = citeflex.cite_with(&text, style, plain).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&citation_json(&citation))?);
            } else {
                println!("{}", citation.formatted);
            }
        }
        Command::Classify { url, json } => {
            let route = citeflex.classify(&url)?;
            let rules = citeflex.router().matching_rules(&url)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&classification_json(&route, &rules))?);
            } else {
                print!("{}", format_route_markdown(&route, &rules));
            }
        }
        Command::Notes { file, json } => {
            let notes = read_notes(&file)?;
            anyhow::ensure!(!notes.is_empty(), "no notes in {}", file.display());

            let processed = process_notes(&citeflex, &notes, style).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&notes_json(&processed, style))?);
            } else {
                for note in &processed {
                    println!("{}. {}", note.number, strip_markup(&note.formatted));
                    if let Some(error) = &note.error {
                        eprintln!("note {}: {error}", note.number);
                    }
                }
            }
        }
        Command::References { file, json } => {
            let text = read_input(&file)?;
            let list = build_references(&citeflex, &text, style).await;
            anyhow::ensure!(!list.entries.is_empty(), "no author-date citations in {}", file.display());

            if json {
                println!("{}", serde_json::to_string_pretty(&references_json(&list))?);
            } else {
                println!("{}", strip_markup(&list.render()));
                for entry in list.entries.iter().filter(|e| !e.is_found()) {
                    if let Some(error) = &entry.error {
                        eprintln!("{}: {error}", entry.citation.label());
                    }
                }
            }
        }
        Command::Serve { transport, port } => {
            let server = McpServer::new(citeflex);
            match transport {
                Transport::Stdio => server.run_stdio().await?,
                Transport::Http => server.run_http(port).await?,
            }
        }
    }

    Ok(())
}
