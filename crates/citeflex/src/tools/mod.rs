//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses and validates its input
//! 2. Calls the resolver
//! 3. Formats the result as Markdown or JSON

mod citation;
mod notes;
mod references;

pub use citation::*;
pub use notes::*;
pub use references::*;

use std::sync::Arc;

use crate::error::CiteResult;
use crate::models::CitationStyle;
use crate::resolver::Citeflex;

/// Tool execution context.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Citation service.
    pub citeflex: Arc<Citeflex>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub const fn new(citeflex: Arc<Citeflex>) -> Self {
        Self { citeflex }
    }

    /// Requested style, or the configured default.
    #[must_use]
    pub fn style_or_default(&self, style: Option<CitationStyle>) -> CitationStyle {
        style.unwrap_or(self.citeflex.config().default_style)
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "format_citation").
    fn name(&self) -> &'static str;

    /// Tool description for the client.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> CiteResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(citation::FormatCitationTool),
        Box::new(citation::ClassifyUrlTool),
        Box::new(citation::ExportCitationTool),
        Box::new(notes::FormatNotesTool),
        Box::new(references::FormatReferencesTool),
    ]
}

/// Style enum shared by the tool schemas.
fn style_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "examples": ["chicago", "apa", "mla", "APA 7", "Chicago Manual of Style 17th"],
        "description": "Citation style: chicago, apa or mla, or a longer name starting with one of them \
                        (defaults to the server setting)"
    })
}

fn response_format_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "default": "markdown"
    })
}
