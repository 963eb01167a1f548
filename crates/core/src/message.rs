//! Message domain types.
//!
//! Messages are the append-only log the agent resends to the model on every
//! invocation. Ordering is significant: the exact sequence reconstructs the
//! conversational context the model has seen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A function invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to invoke
    pub name: String,

    /// Arguments as a raw JSON string, exactly as the model produced them
    pub arguments: String,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The payload of a message, tagged by who produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    /// Input from the user (already wrapped in its JSON envelope)
    User { text: String },

    /// A plain assistant reply with no function call
    AssistantText { text: String },

    /// The assistant asked for a function to run
    AssistantFunctionCall {
        call: FunctionCall,
        /// Free text the model emitted alongside the call
        #[serde(default, skip_serializing_if = "String::is_empty")]
        leading_text: String,
    },

    /// The serialized result envelope of a function execution
    FunctionResult { name: String, result: String },
}

/// A single message in the agent's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// The tagged payload
    pub body: MessageBody,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_body(body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body,
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_body(MessageBody::User { text: text.into() })
    }

    /// Create a new assistant text message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_body(MessageBody::AssistantText { text: text.into() })
    }

    /// Create an assistant message that requests a function call.
    pub fn function_call(call: FunctionCall, leading_text: impl Into<String>) -> Self {
        Self::with_body(MessageBody::AssistantFunctionCall {
            call,
            leading_text: leading_text.into(),
        })
    }

    /// Create a function result message.
    pub fn function_result(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self::with_body(MessageBody::FunctionResult {
            name: name.into(),
            result: result.into(),
        })
    }

    /// Override the timestamp (used for seeded or imported history).
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_user(&self) -> bool {
        matches!(self.body, MessageBody::User { .. })
    }

    /// The function call carried by this message, if any.
    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match &self.body {
            MessageBody::AssistantFunctionCall { call, .. } => Some(call),
            _ => None,
        }
    }

    /// The searchable text of this message.
    ///
    /// Function calls contribute their name and argument JSON so that
    /// recall search can find what the agent said through `send_message`.
    pub fn searchable_text(&self) -> String {
        match &self.body {
            MessageBody::User { text } | MessageBody::AssistantText { text } => text.clone(),
            MessageBody::AssistantFunctionCall { call, leading_text } => {
                if leading_text.is_empty() {
                    format!("{}({})", call.name, call.arguments)
                } else {
                    format!("{leading_text} {}({})", call.name, call.arguments)
                }
            }
            MessageBody::FunctionResult { result, .. } => result.clone(),
        }
    }

    /// Short role label used when rendering search results.
    pub fn role_label(&self) -> &'static str {
        match self.body {
            MessageBody::User { .. } => "user",
            MessageBody::AssistantText { .. } | MessageBody::AssistantFunctionCall { .. } => {
                "assistant"
            }
            MessageBody::FunctionResult { .. } => "function",
        }
    }
}
