//! Enumeration types for styles, output formats and note forms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Citation style guide.
///
/// Deserializes through [`FromStr`], so request bodies may name a style the
/// way people write it ("APA 7", "Chicago Manual of Style 17th").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CitationStyle {
    /// Chicago Manual of Style, 17th ed., notes and bibliography.
    #[default]
    Chicago,
    /// APA, 7th ed.
    Apa,
    /// MLA Handbook, 9th ed.
    Mla,
}

impl CitationStyle {
    /// All supported styles.
    pub const ALL: [Self; 3] = [Self::Chicago, Self::Apa, Self::Mla];

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Chicago => "Chicago Manual of Style 17th Edition",
            Self::Apa => "APA 7th Edition",
            Self::Mla => "MLA 9th Edition",
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chicago => "chicago",
            Self::Apa => "apa",
            Self::Mla => "mla",
        })
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    /// Accepts short keys and the long names used by the web form
    /// ("Chicago Manual of Style 17th Edition", "APA 7", "MLA 9th").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("chicago") || lower.starts_with("cms") || lower == "turabian" {
            Ok(Self::Chicago)
        } else if lower.starts_with("apa") {
            Ok(Self::Apa)
        } else if lower.starts_with("mla") {
            Ok(Self::Mla)
        } else {
            Err(format!("unknown citation style '{s}' (expected chicago, apa or mla)"))
        }
    }
}

impl TryFrom<String> for CitationStyle {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// How a citation appears in a note sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationForm {
    /// First citation of a source.
    #[default]
    Full,
    /// Later citation of a source cited earlier.
    Short,
    /// Same source as the immediately preceding note.
    Ibid,
}

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

impl ResponseFormat {
    /// Check if this is JSON format.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Export format for reference managers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Research Information Systems format.
    #[default]
    Ris,
    /// BibTeX format.
    Bibtex,
}

impl ExportFormat {
    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Ris => "ris",
            Self::Bibtex => "bib",
        }
    }

    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Ris => "application/x-research-info-systems",
            Self::Bibtex => "application/x-bibtex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parsing() {
        assert_eq!("chicago".parse::<CitationStyle>(), Ok(CitationStyle::Chicago));
        assert_eq!(
            "Chicago Manual of Style 17th Edition".parse::<CitationStyle>(),
            Ok(CitationStyle::Chicago)
        );
        assert_eq!("APA 7".parse::<CitationStyle>(), Ok(CitationStyle::Apa));
        assert_eq!(" mla ".parse::<CitationStyle>(), Ok(CitationStyle::Mla));
        assert!("bluebook".parse::<CitationStyle>().is_err());
    }

    #[test]
    fn test_style_display_roundtrip() {
        for style in CitationStyle::ALL {
            assert_eq!(style.to_string().parse::<CitationStyle>(), Ok(style));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&CitationStyle::Apa).unwrap();
        assert_eq!(json, r#""apa""#);
        let form: CitationForm = serde_json::from_str(r#""ibid""#).unwrap();
        assert_eq!(form, CitationForm::Ibid);
    }

    #[test]
    fn test_serde_accepts_long_names() {
        for (raw, style) in [
            (r#""Chicago""#, CitationStyle::Chicago),
            (r#""Chicago Manual of Style 17th""#, CitationStyle::Chicago),
            (r#""APA 7""#, CitationStyle::Apa),
            (r#""MLA 9""#, CitationStyle::Mla),
        ] {
            assert_eq!(serde_json::from_str::<CitationStyle>(raw).unwrap(), style, "{raw}");
        }
        assert!(serde_json::from_str::<CitationStyle>(r#""bluebook""#).is_err());
    }

    #[test]
    fn test_export_format_extensions() {
        assert_eq!(ExportFormat::Ris.extension(), "ris");
        assert_eq!(ExportFormat::Bibtex.extension(), "bib");
    }
}
