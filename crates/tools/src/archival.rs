//! archival_memory_insert / archival_memory_search.

use async_trait::async_trait;
use mnemos_core::error::ToolError;
use mnemos_core::tool::{Tool, ToolContext, ToolResult, parse_arguments};
use mnemos_memory::MemoryStore;
use serde::Deserialize;
use std::sync::Arc;

use crate::request_heartbeat_schema;

pub struct ArchivalInsertTool {
    store: Arc<MemoryStore>,
}

impl ArchivalInsertTool {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct InsertArgs {
    content: String,
}

#[async_trait]
impl Tool for ArchivalInsertTool {
    fn name(&self) -> &str {
        "archival_memory_insert"
    }

    fn description(&self) -> &str {
        "Add to archival memory. Make sure to phrase the memory contents such that it can be easily queried later."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "Content to write to the memory. All unicode (including emojis) are supported."
                },
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["content", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: InsertArgs = parse_arguments(arguments)?;
        if args.content.trim().is_empty() {
            return Err(ToolError::InvalidArguments("content must not be empty".into()));
        }

        let id = self
            .store
            .archival_insert(&args.content)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "archival_memory_insert".into(),
                reason: e.to_string(),
            })?;
        Ok(ToolResult::ok("").with_data(serde_json::json!({ "id": id })))
    }
}

pub struct ArchivalSearchTool {
    store: Arc<MemoryStore>,
    page_size: usize,
}

impl ArchivalSearchTool {
    pub fn new(store: Arc<MemoryStore>, page_size: usize) -> Self {
        Self { store, page_size }
    }
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    page: Option<usize>,
}

#[async_trait]
impl Tool for ArchivalSearchTool {
    fn name(&self) -> &str {
        "archival_memory_search"
    }

    fn description(&self) -> &str {
        "Search archival memory using semantic (embedding-based) search."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "String to search for."
                },
                "page": {
                    "type": "integer",
                    "description": "Allows you to page through results. Only use on a follow-up query. Defaults to 0 (first page)."
                },
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["query", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: SearchArgs = parse_arguments(arguments)?;
        let page = self
            .store
            .archival_search(&args.query, args.page.unwrap_or(0), self.page_size)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "archival_memory_search".into(),
                reason: e.to_string(),
            })?;

        let data = serde_json::json!({ "results": page.items, "total": page.total });
        Ok(ToolResult::ok(page.summary()).with_data(data))
    }
}
