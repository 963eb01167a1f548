//! send_message — the only way the agent talks to the user.

use async_trait::async_trait;
use mnemos_core::error::ToolError;
use mnemos_core::event::{UiEvent, UiSink};
use mnemos_core::tool::{Tool, ToolContext, ToolResult, parse_arguments};
use serde::Deserialize;
use std::sync::Arc;

pub const SEND_MESSAGE: &str = "send_message";

pub struct SendMessageTool {
    sink: Arc<dyn UiSink>,
}

impl SendMessageTool {
    pub fn new(sink: Arc<dyn UiSink>) -> Self {
        Self { sink }
    }
}

#[derive(Deserialize)]
struct SendMessageArgs {
    message: String,
}

#[async_trait]
impl Tool for SendMessageTool {
    fn name(&self) -> &str {
        SEND_MESSAGE
    }

    fn description(&self) -> &str {
        "Sends a message to the human user."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Message contents. All unicode (including emojis) are supported."
                }
            },
            "required": ["message"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: SendMessageArgs = parse_arguments(arguments)?;
        self.sink.emit(UiEvent::bot_message(args.message));
        Ok(ToolResult::ok(""))
    }
}
