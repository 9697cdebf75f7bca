//! Reference-list tool: format_references.

use serde_json::json;

use super::{McpTool, ToolContext, response_format_schema, style_schema};
use crate::error::CiteResult;
use crate::formatters::{format_references_markdown, references_json};
use crate::models::FormatReferencesInput;
use crate::references::build_references;

/// Build a reference list from the author-date citations in a text.
#[derive(Debug)]
pub struct FormatReferencesTool;

#[async_trait::async_trait]
impl McpTool for FormatReferencesTool {
    fn name(&self) -> &'static str {
        "format_references"
    }

    fn description(&self) -> &'static str {
        "Find every author-date citation such as (Smith, 2020) or Smith and Jones (2019) in a text, \
         look each source up once, and return a sorted reference list. Unresolved citations are \
         listed as [NOT FOUND: ...] placeholders."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "maxLength": FormatReferencesInput::MAX_TEXT,
                    "description": "Body text containing author-date citations"
                },
                "style": style_schema(),
                "responseFormat": response_format_schema()
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> CiteResult<String> {
        let params: FormatReferencesInput = serde_json::from_value(input)?;
        params.validate()?;

        let style = ctx.style_or_default(params.style);
        let list = build_references(&ctx.citeflex, &params.text, style).await;

        if params.response_format.is_json() {
            Ok(serde_json::to_string_pretty(&references_json(&list))?)
        } else {
            Ok(format_references_markdown(&list))
        }
    }
}
