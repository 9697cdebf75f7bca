//! Single-citation tools: format_citation, classify_url, export_citation.

use serde_json::json;

use super::{McpTool, ToolContext, response_format_schema, style_schema};
use crate::error::CiteResult;
use crate::formatters::{
    citation_json, classification_json, format_citation_markdown, format_export, format_route_markdown,
};
use crate::models::{ClassifyUrlInput, ExportCitationInput, FormatCitationInput};

/// Resolve text or a URL and format it in one style.
#[derive(Debug)]
pub struct FormatCitationTool;

#[async_trait::async_trait]
impl McpTool for FormatCitationTool {
    fn name(&self) -> &'static str {
        "format_citation"
    }

    fn description(&self) -> &'static str {
        "Format a URL, DOI, ISBN, arXiv id, PubMed id, case name or free-form reference \
         as a Chicago, APA or MLA citation."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "maxLength": 4096,
                    "description": "URL, identifier or reference text"
                },
                "style": style_schema(),
                "plain": {
                    "type": "boolean",
                    "default": false,
                    "description": "Return plain text without <i> markup"
                },
                "responseFormat": response_format_schema()
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> CiteResult<String> {
        let params: FormatCitationInput = serde_json::from_value(input)?;
        params.validate()?;

        let style = ctx.style_or_default(params.style);
        let citation = ctx.citeflex.cite_with(&params.text, style, params.plain).await?;

        if params.response_format.is_json() {
            Ok(serde_json::to_string_pretty(&citation_json(&citation))?)
        } else {
            Ok(format_citation_markdown(&citation))
        }
    }
}

/// Report how a URL would be routed, without fetching it.
#[derive(Debug)]
pub struct ClassifyUrlTool;

#[async_trait::async_trait]
impl McpTool for ClassifyUrlTool {
    fn name(&self) -> &'static str {
        "classify_url"
    }

    fn description(&self) -> &'static str {
        "Classify a URL: source type, metadata engine and extracted identifier. Nothing is fetched."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to classify"
                },
                "responseFormat": response_format_schema()
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> CiteResult<String> {
        let params: ClassifyUrlInput = serde_json::from_value(input)?;
        params.validate()?;

        let route = ctx.citeflex.classify(&params.url)?;
        let rules = ctx.citeflex.router().matching_rules(&params.url)?;

        if params.response_format.is_json() {
            Ok(serde_json::to_string_pretty(&classification_json(&route, &rules))?)
        } else {
            Ok(format_route_markdown(&route, &rules))
        }
    }
}

/// Resolve one reference and export it for a reference manager.
#[derive(Debug)]
pub struct ExportCitationTool;

#[async_trait::async_trait]
impl McpTool for ExportCitationTool {
    fn name(&self) -> &'static str {
        "export_citation"
    }

    fn description(&self) -> &'static str {
        "Resolve a reference and export it as RIS or BibTeX."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "maxLength": 4096,
                    "description": "URL, identifier or reference text"
                },
                "format": {
                    "type": "string",
                    "enum": ["ris", "bibtex"],
                    "default": "ris"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> CiteResult<String> {
        let params: ExportCitationInput = serde_json::from_value(input)?;
        params.validate()?;

        let resolved = ctx.citeflex.resolve(&params.text).await?;
        Ok(format_export(std::slice::from_ref(&resolved.metadata), params.format))
    }
}
