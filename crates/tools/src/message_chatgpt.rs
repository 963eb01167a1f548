//! message_chatgpt — forward a question to a plain secondary model.
//!
//! Without a secondary provider the call succeeds with an empty result.

use async_trait::async_trait;
use mnemos_core::error::ToolError;
use mnemos_core::message::Message;
use mnemos_core::provider::{Completion, CompletionRequest, Provider};
use mnemos_core::tool::{Tool, ToolContext, ToolResult, parse_arguments};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::request_heartbeat_schema;

/// The secondary model and the name it is addressed by.
#[derive(Clone)]
pub struct SecondaryModel {
    pub provider: Arc<dyn Provider>,
    pub model: String,
}

pub struct MessageChatGptTool {
    secondary: Option<SecondaryModel>,
}

impl MessageChatGptTool {
    pub fn new(secondary: Option<SecondaryModel>) -> Self {
        Self { secondary }
    }
}

#[derive(Deserialize)]
struct MessageChatGptArgs {
    message: String,
}

#[async_trait]
impl Tool for MessageChatGptTool {
    fn name(&self) -> &str {
        "message_chatgpt"
    }

    fn description(&self) -> &str {
        "Send a message to a more basic AI, ChatGPT. A useful resource for asking questions. ChatGPT does not retain memory of previous interactions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Message to send ChatGPT. Phrase your message as a full English sentence."
                },
                "request_heartbeat": request_heartbeat_schema()
            },
            "required": ["message", "request_heartbeat"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: MessageChatGptArgs = parse_arguments(arguments)?;
        let Some(secondary) = &self.secondary else {
            debug!("No secondary model configured; message_chatgpt is a no-op");
            return Ok(ToolResult::ok(""));
        };

        let request = CompletionRequest::new(
            secondary.model.clone(),
            "You are a helpful assistant. Keep your answers short and concise.",
            vec![Message::user(args.message)],
        );
        let response = secondary
            .provider
            .complete(request)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "message_chatgpt".into(),
                reason: e.to_string(),
            })?;

        let reply = match response.completion {
            Completion::Text { text } => text,
            Completion::FunctionCall { leading_text, .. } => leading_text,
        };
        Ok(ToolResult::ok(reply))
    }
}
