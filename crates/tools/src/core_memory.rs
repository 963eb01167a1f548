//! core_memory_append / core_memory_replace — edit the in-prompt blocks.

use async_trait::async_trait;
use mnemos_core::error::ToolError;
use mnemos_core::memory::BlockName;
use mnemos_core::tool::{Tool, ToolContext, ToolResult, parse_arguments};
use mnemos_memory::MemoryStore;
use serde::Deserialize;
use std::sync::Arc;

use crate::request_heartbeat_schema;

fn block_name_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": ["persona", "human"],
        "description": "Section of the memory to be edited (persona or human)."
    })
}

pub struct CoreMemoryAppendTool {
    store: Arc<MemoryStore>,
}

impl CoreMemoryAppendTool {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct AppendArgs {
    name: BlockName,
    content: String,
}

#[async_trait]
impl Tool for CoreMemoryAppendTool {
    fn name(&self) -> &str {
        "core_memory_append"
    }

    fn description(&self) -> &str {
        "Append to the contents of core memory."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": block_name_schema(),
                "content": {
                    "type": "string",
                    "description": "Content to write to the memory. All unicode (including emojis) are supported."
                },
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["name", "content", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: AppendArgs = parse_arguments(arguments)?;
        self.store.core_append(args.name, &args.content);
        Ok(ToolResult::ok(""))
    }
}

pub struct CoreMemoryReplaceTool {
    store: Arc<MemoryStore>,
}

impl CoreMemoryReplaceTool {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ReplaceArgs {
    name: BlockName,
    old_content: String,
    new_content: String,
}

#[async_trait]
impl Tool for CoreMemoryReplaceTool {
    fn name(&self) -> &str {
        "core_memory_replace"
    }

    fn description(&self) -> &str {
        "Replace the contents of core memory. To delete memories, use an empty string for new_content."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": block_name_schema(),
                "old_content": {
                    "type": "string",
                    "description": "String to replace. Must be an exact match."
                },
                "new_content": {
                    "type": "string",
                    "description": "Content to write to the memory. All unicode (including emojis) are supported."
                },
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["name", "old_content", "new_content", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: ReplaceArgs = parse_arguments(arguments)?;
        if self
            .store
            .core_replace(args.name, &args.old_content, &args.new_content)
        {
            Ok(ToolResult::ok(""))
        } else {
            // Still OK: the model learns nothing changed without the call counting as a failure
            Ok(ToolResult::ok(format!(
                "No match for old_content in {}; nothing replaced.",
                args.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemos_memory::{CoreMemory, HashEmbedder};

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(
            CoreMemory::new("I am Sam.", ""),
            Arc::new(HashEmbedder::default()),
        ))
    }

    #[tokio::test]
    async fn append_to_human() {
        let store = store();
        let result = CoreMemoryAppendTool::new(store.clone())
            .execute(
                serde_json::json!({"name": "human", "content": "likes cats", "request_heartbeat": false}),
                &ToolContext::new(&[]),
            )
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(store.core_block(BlockName::Human), "\nlikes cats");
    }

    #[tokio::test]
    async fn unknown_block_is_invalid() {
        let err = CoreMemoryAppendTool::new(store())
            .execute(
                serde_json::json!({"name": "system", "content": "x"}),
                &ToolContext::new(&[]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn replace_existing_text() {
        let store = store();
        CoreMemoryReplaceTool::new(store.clone())
            .execute(
                serde_json::json!({"name": "persona", "old_content": "Sam", "new_content": "Samantha"}),
                &ToolContext::new(&[]),
            )
            .await
            .unwrap();
        assert_eq!(store.core_block(BlockName::Persona), "I am Samantha.");
    }

    #[tokio::test]
    async fn replace_missing_text_is_ok_noop() {
        let store = store();
        let result = CoreMemoryReplaceTool::new(store.clone())
            .execute(
                serde_json::json!({"name": "persona", "old_content": "Bob", "new_content": "Rob"}),
                &ToolContext::new(&[]),
            )
            .await
            .unwrap();

        assert_eq!(store.core_block(BlockName::Persona), "I am Sam.");
        let envelope: serde_json::Value = serde_json::from_str(&result.envelope()).unwrap();
        assert_eq!(envelope["status"], "OK");
        assert_eq!(
            envelope["message"],
            "No match for old_content in persona; nothing replaced."
        );
    }
}
