//! Tool trait — the abstraction over agent functions.
//!
//! Tools are the functions the model may call: talking to the user, editing
//! core memory, searching recall and archival memory, pausing heartbeats.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ToolError;
use crate::message::{FunctionCall, Message};
use crate::provider::ToolDefinition;

/// Read-only view of agent state handed to every executor.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// The committed conversation history (recall memory).
    pub history: &'a [Message],
}

impl<'a> ToolContext<'a> {
    pub fn new(history: &'a [Message]) -> Self {
        Self { history }
    }
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content (the `message` field of the envelope)
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The canonical `{status, message}` envelope fed back to the model.
    pub fn envelope(&self) -> String {
        let status = if self.success { "OK" } else { "Failed" };
        serde_json::json!({ "status": status, "message": self.output }).to_string()
    }
}

/// The core Tool trait.
///
/// Each memory function implements this trait. Tools are registered in the
/// ToolRegistry and made available to the agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "send_message").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Deserialize tool arguments into a typed struct.
///
/// Serde's message names the offending field, which is what the model
/// needs to correct itself on the next round-trip.
pub fn parse_arguments<T: DeserializeOwned>(
    arguments: serde_json::Value,
) -> std::result::Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Dispatch the function calls the LLM requests
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    /// Registration order, so the schema list sent to the model is stable
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.to_definition())
            .collect()
    }

    /// Execute a function call, surfacing every failure as an error.
    pub async fn execute(
        &self,
        call: &FunctionCall,
        ctx: &ToolContext<'_>,
    ) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        let arguments = if call.arguments.trim().is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str::<serde_json::Value>(&call.arguments).map_err(|e| {
                ToolError::InvalidArguments(format!("arguments are not valid JSON: {e}"))
            })?
        };

        if !arguments.is_object() {
            return Err(ToolError::InvalidArguments(
                "arguments must be a JSON object".into(),
            ));
        }

        tool.execute(arguments, ctx).await
    }

    /// Execute a function call; never fails.
    ///
    /// Unknown functions, malformed arguments and executor failures all come
    /// back as a failed [`ToolResult`] so the model can self-correct.
    pub async fn dispatch(&self, call: &FunctionCall, ctx: &ToolContext<'_>) -> ToolResult {
        match self.execute(call, ctx).await {
            Ok(result) => result,
            Err(e) => {
                debug!(function = %call.name, error = %e, "Function call failed");
                ToolResult::failed(e.to_string())
            }
        }
    }

    /// List all registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
            ctx: &ToolContext<'_>,
        ) -> std::result::Result<ToolResult, ToolError> {
            let args: EchoArgs = parse_arguments(arguments)?;
            Ok(ToolResult::ok(format!("{} ({} in history)", args.text, ctx.history.len())))
        }
    }

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "placeholder"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
            _ctx: &ToolContext<'_>,
        ) -> std::result::Result<ToolResult, ToolError> {
            Ok(ToolResult::ok(""))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn definitions_follow_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NamedTool("zeta")));
        registry.register(Box::new(NamedTool("alpha")));
        registry.register(Box::new(NamedTool("zeta")));
        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let history = vec![Message::user("earlier")];
        let call = FunctionCall::new("echo", r#"{"text": "hello world"}"#);
        let result = registry
            .execute(&call, &ToolContext::new(&history))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world (1 in history)");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let call = FunctionCall::new("nonexistent", "{}");
        let err = registry
            .execute(&call, &ToolContext::new(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn dispatch_turns_bad_json_into_failed_result() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = FunctionCall::new("echo", "{not json");
        let result = registry.dispatch(&call, &ToolContext::new(&[])).await;
        assert!(!result.success);
        assert!(result.output.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn dispatch_reports_missing_field() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = FunctionCall::new("echo", r#"{"txt": "typo"}"#);
        let result = registry.dispatch(&call, &ToolContext::new(&[])).await;
        assert!(!result.success);
        assert!(result.output.contains("text"), "{}", result.output);
    }

    #[test]
    fn envelope_uses_status_and_message() {
        let ok: serde_json::Value =
            serde_json::from_str(&ToolResult::ok("").envelope()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "OK", "message": ""}));

        let failed: serde_json::Value =
            serde_json::from_str(&ToolResult::failed("boom").envelope()).unwrap();
        assert_eq!(failed["status"], "Failed");
        assert_eq!(failed["message"], "boom");
    }
}
