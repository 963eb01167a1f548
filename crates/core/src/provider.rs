//! Provider trait — the abstraction over the hosted model.
//!
//! A Provider knows how to send a system prompt, a conversation history and a
//! function schema list to an LLM, and how to turn what comes back into a
//! [`Completion`]: either plain text or a single structured function call.
//!
//! Providers may also expose an embedding endpoint used by archival memory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::{FunctionCall, Message};

/// Everything the model needs for one round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-4-1106-preview")
    pub model: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// The live system prompt (preamble + core memory)
    pub system_prompt: String,

    /// Committed history followed by the in-flight scratch
    pub history: Vec<Message>,

    /// Functions the model may elect to call (at most one per round-trip)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<ToolDefinition>,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        history: Vec<Message>,
    ) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            system_prompt: system_prompt.into(),
            history,
            functions: Vec::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_functions(mut self, functions: Vec<ToolDefinition>) -> Self {
        self.functions = functions;
        self
    }
}

fn default_temperature() -> f32 {
    0.8
}

/// A function definition sent to the LLM so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The function name
    pub name: String,

    /// Description of what the function does
    pub description: String,

    /// JSON Schema describing the function's parameters
    pub parameters: serde_json::Value,
}

/// The interpreted shape of a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Completion {
    /// A final, plain-text answer.
    Text { text: String },

    /// A request to run one function. `leading_text` is whatever content the
    /// model produced next to the call (its inner monologue).
    FunctionCall {
        call: FunctionCall,
        #[serde(default)]
        leading_text: String,
    },
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn function_call(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self::FunctionCall {
            call: FunctionCall::new(name, arguments.to_string()),
            leading_text: String::new(),
        }
    }

    /// Attach leading text to a function call. No-op for text completions.
    pub fn with_leading_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::FunctionCall { call, .. } => Self::FunctionCall {
                call,
                leading_text: text.into(),
            },
            other => other,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// What the model decided to do
    pub completion: Completion,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings (e.g., "text-embedding-ada-002").
    pub model: String,

    /// The texts to embed.
    pub inputs: Vec<String>,
}

/// An embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vectors, one per input text.
    pub embeddings: Vec<Vec<f32>>,

    /// Which model was used.
    pub model: String,
}

/// The core Provider trait.
///
/// The agent loop calls `complete()` without knowing which backend answers,
/// which lets tests swap in a scripted provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get the interpreted response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Generate embeddings for the given texts.
    ///
    /// Default implementation returns an error indicating embeddings aren't supported.
    async fn embed(
        &self,
        _request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "Provider '{}' does not support embeddings",
            self.name()
        )))
    }

    /// List available models for this provider.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }
}
