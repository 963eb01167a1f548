//! Recall memory search: `recall_memory_search[_date]` and
//! `conversation_search[_date]`.
//!
//! Both families search the committed history handed in through the
//! [`ToolContext`]; they differ only in name and wording.

use async_trait::async_trait;
use mnemos_core::error::ToolError;
use mnemos_core::tool::{Tool, ToolContext, ToolResult, parse_arguments};
use mnemos_memory::recall;
use serde::Deserialize;

use crate::request_heartbeat_schema;

fn page_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": "Allows you to page through results. Only use on a follow-up query. Defaults to 0 (first page)."
    })
}

/// Substring search over committed history.
pub struct HistorySearchTool {
    name: &'static str,
    description: &'static str,
    page_size: usize,
}

impl HistorySearchTool {
    pub fn recall(page_size: usize) -> Self {
        Self {
            name: "recall_memory_search",
            description: "Search prior conversation history using a string.",
            page_size,
        }
    }

    pub fn conversation(page_size: usize) -> Self {
        Self {
            name: "conversation_search",
            description: "Search prior conversation history using case-insensitive string matching.",
            page_size,
        }
    }
}

#[derive(Deserialize)]
struct TextSearchArgs {
    query: String,
    #[serde(default)]
    page: Option<usize>,
}

#[async_trait]
impl Tool for HistorySearchTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "String to search for."
                },
                "page": page_schema(),
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["query", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: TextSearchArgs = parse_arguments(arguments)?;
        let page = recall::search_text(
            ctx.history,
            &args.query,
            args.page.unwrap_or(0),
            self.page_size,
        );
        Ok(ToolResult::ok(page.summary()))
    }
}

/// Date-range search over committed history.
pub struct HistoryDateSearchTool {
    name: &'static str,
    description: &'static str,
    page_size: usize,
}

impl HistoryDateSearchTool {
    pub fn recall(page_size: usize) -> Self {
        Self {
            name: "recall_memory_search_date",
            description: "Search prior conversation history using a date range.",
            page_size,
        }
    }

    pub fn conversation(page_size: usize) -> Self {
        Self {
            name: "conversation_search_date",
            description: "Search prior conversation history using a date range.",
            page_size,
        }
    }
}

#[derive(Deserialize)]
struct DateSearchArgs {
    start_date: String,
    end_date: String,
    #[serde(default)]
    page: Option<usize>,
}

#[async_trait]
impl Tool for HistoryDateSearchTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "start_date": {
                    "type": "string",
                    "description": "The start of the date range to search, in the format 'YYYY-MM-DD'."
                },
                "end_date": {
                    "type": "string",
                    "description": "The end of the date range to search, in the format 'YYYY-MM-DD'."
                },
                "page": page_schema(),
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["start_date", "end_date", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: DateSearchArgs = parse_arguments(arguments)?;
        let page = recall::search_date(
            ctx.history,
            &args.start_date,
            &args.end_date,
            args.page.unwrap_or(0),
            self.page_size,
        )
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        Ok(ToolResult::ok(page.summary()))
    }
}
