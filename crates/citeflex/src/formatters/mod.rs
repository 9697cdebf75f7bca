//! Output formatting: citation styles, reference-manager exports, and the
//! Markdown/JSON views returned by the tools.

mod apa;
mod chicago;
pub mod common;
mod export;
mod json;
mod markdown;
mod mla;

use std::sync::LazyLock;

use regex::Regex;

pub use self::json::*;
pub use apa::ApaFormatter;
pub use chicago::ChicagoFormatter;
pub use export::*;
pub use markdown::*;
pub use mla::MlaFormatter;

use crate::models::{CitationForm, CitationMetadata, CitationStyle};

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid markup regex"));

/// A citation style.
///
/// Output marks italics with `<i>…</i>`; see [`strip_markup`].
pub trait CitationFormatter: Send + Sync {
    /// Style implemented by this formatter.
    fn style(&self) -> CitationStyle;

    /// First citation of a source (a note in Chicago, a reference entry in APA and MLA).
    fn format_full(&self, meta: &CitationMetadata) -> String;

    /// Later citation of a source already cited in full.
    fn format_short(&self, meta: &CitationMetadata) -> String;

    /// Citation of the source cited immediately before.
    fn format_ibid(&self, meta: &CitationMetadata, page: Option<&str>) -> String;

    /// Parenthetical in-text citation.
    fn format_in_text(&self, meta: &CitationMetadata, page: Option<&str>) -> String;

    /// Bibliography or reference-list entry.
    fn format_bibliography(&self, meta: &CitationMetadata) -> String {
        self.format_full(meta)
    }

    /// Render a citation in the given note form.
    fn format(&self, meta: &CitationMetadata, form: CitationForm, page: Option<&str>) -> String {
        match form {
            CitationForm::Full => self.format_full(meta),
            CitationForm::Short => self.format_short(meta),
            CitationForm::Ibid => self.format_ibid(meta, page),
        }
    }
}

/// Formatter for a style.
#[must_use]
pub fn get_formatter(style: CitationStyle) -> &'static dyn CitationFormatter {
    match style {
        CitationStyle::Chicago => &ChicagoFormatter,
        CitationStyle::Apa => &ApaFormatter,
        CitationStyle::Mla => &MlaFormatter,
    }
}

/// Remove markup tags, leaving plain text.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    MARKUP_RE.replace_all(text, "").into_owned()
}
