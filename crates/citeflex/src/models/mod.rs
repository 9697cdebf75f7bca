//! Data models: the citation record, styles, dates and request inputs.
//!
//! All models use `#[serde(rename_all = "camelCase")]` to match the JSON API.

mod citation;
mod date;
mod enums;
mod inputs;
mod name;

pub use citation::{CitationMetadata, CitationType, normalize_doi, strip_doi};
pub use date::{PubDate, today};
pub use enums::{CitationForm, CitationStyle, ExportFormat, ResponseFormat};
pub use inputs::*;
pub use name::PersonName;
