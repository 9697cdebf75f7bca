//! Note-sequence tool: format_notes.

use serde_json::json;

use super::{McpTool, ToolContext, response_format_schema, style_schema};
use crate::error::CiteResult;
use crate::formatters::{format_notes_markdown, notes_json};
use crate::models::FormatNotesInput;
use crate::notes::process_notes;

/// Format a list of footnotes, collapsing repeats to ibid and short forms.
#[derive(Debug)]
pub struct FormatNotesTool;

#[async_trait::async_trait]
impl McpTool for FormatNotesTool {
    fn name(&self) -> &'static str {
        "format_notes"
    }

    fn description(&self) -> &'static str {
        "Format a sequence of footnotes in document order. Repeated sources become \
         \"Ibid.\" or short-form citations; notes that cannot be resolved are kept as written."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "notes": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "maxItems": FormatNotesInput::MAX_NOTES,
                    "description": "Note texts in document order"
                },
                "style": style_schema(),
                "responseFormat": response_format_schema()
            },
            "required": ["notes"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> CiteResult<String> {
        let params: FormatNotesInput = serde_json::from_value(input)?;
        params.validate()?;

        let style = ctx.style_or_default(params.style);
        let notes = process_notes(&ctx.citeflex, &params.notes, style).await;

        if params.response_format.is_json() {
            Ok(serde_json::to_string_pretty(&notes_json(&notes, style))?)
        } else {
            Ok(format_notes_markdown(&notes, style))
        }
    }
}
