//! Request models shared by the MCP tools and the JSON API.

use serde::{Deserialize, Serialize};

use super::{CitationStyle, ExportFormat, ResponseFormat};

/// Format one citation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatCitationInput {
    /// URL, DOI, ISBN, case name or free-form reference text.
    pub text: String,

    /// Style; the server default applies when omitted.
    #[serde(default)]
    pub style: Option<CitationStyle>,

    /// Strip `<i>` markup from the result.
    #[serde(default)]
    pub plain: bool,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Classify a URL without fetching anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyUrlInput {
    pub url: String,

    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Format a sequence of footnotes/endnotes with ibid and short forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatNotesInput {
    /// Note texts in document order.
    pub notes: Vec<String>,

    #[serde(default)]
    pub style: Option<CitationStyle>,

    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Build a reference list from the author-date citations in a text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatReferencesInput {
    /// Body text containing `(Author, Year)` citations.
    pub text: String,

    #[serde(default)]
    pub style: Option<CitationStyle>,

    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Export one reference for a reference manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCitationInput {
    pub text: String,

    #[serde(default)]
    pub format: ExportFormat,
}

impl FormatCitationInput {
    /// Reject blank input before anything is fetched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text.
    pub fn validate(&self) -> crate::error::CiteResult<()> {
        validate_text("text", &self.text)
    }
}

impl ClassifyUrlInput {
    /// Reject blank URLs.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty input.
    pub fn validate(&self) -> crate::error::CiteResult<()> {
        validate_text("url", &self.url)
    }
}

impl FormatReferencesInput {
    /// Maximum body text size.
    pub const MAX_TEXT: usize = 200_000;

    /// Reject blank or oversized text.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the text is empty or too long.
    pub fn validate(&self) -> crate::error::CiteResult<()> {
        if self.text.trim().is_empty() {
            return Err(crate::error::CiteError::validation("text", "must not be empty"));
        }
        if self.text.len() > Self::MAX_TEXT {
            return Err(crate::error::CiteError::validation(
                "text",
                format!("must be at most {} bytes", Self::MAX_TEXT),
            ));
        }
        Ok(())
    }
}

impl ExportCitationInput {
    /// Reject blank input before anything is fetched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text.
    pub fn validate(&self) -> crate::error::CiteResult<()> {
        validate_text("text", &self.text)
    }
}

impl FormatNotesInput {
    /// Maximum notes per request.
    pub const MAX_NOTES: usize = 500;

    /// Reject empty or oversized note lists.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the list is empty or too long.
    pub fn validate(&self) -> crate::error::CiteResult<()> {
        if self.notes.is_empty() {
            return Err(crate::error::CiteError::validation("notes", "at least one note is required"));
        }
        if self.notes.len() > Self::MAX_NOTES {
            return Err(crate::error::CiteError::validation(
                "notes",
                format!("at most {} notes per request", Self::MAX_NOTES),
            ));
        }
        self.notes.iter().try_for_each(|note| {
            if note.len() > 4096 {
                Err(crate::error::CiteError::validation("notes", "each note must be at most 4096 bytes"))
            } else {
                Ok(())
            }
        })
    }
}

pub(crate) fn validate_text(field: &str, text: &str) -> crate::error::CiteResult<()> {
    if text.trim().is_empty() {
        return Err(crate::error::CiteError::validation(field, "must not be empty"));
    }
    if text.len() > 4096 {
        return Err(crate::error::CiteError::validation(field, "must be at most 4096 bytes"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_input_defaults() {
        let input: FormatCitationInput =
            serde_json::from_value(serde_json::json!({"text": "10.1000/xyz"})).unwrap();
        assert!(input.style.is_none());
        assert!(!input.plain);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_text_rejected() {
        let input = FormatCitationInput {
            text: "   ".to_string(),
            style: None,
            plain: false,
            response_format: ResponseFormat::default(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_notes_limits() {
        let empty = FormatNotesInput { notes: vec![], style: None, response_format: ResponseFormat::Json };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_references_input() {
        let input: FormatReferencesInput =
            serde_json::from_value(serde_json::json!({"text": "As argued (Smith, 2020).", "style": "APA 7"})).unwrap();
        assert_eq!(input.style, Some(CitationStyle::Apa));
        assert!(input.validate().is_ok());

        let long = FormatReferencesInput {
            text: "x".repeat(FormatReferencesInput::MAX_TEXT + 1),
            style: None,
            response_format: ResponseFormat::Markdown,
        };
        assert!(long.validate().is_err());
    }
}
