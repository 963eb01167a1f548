//! Error types for the mnemos domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context
//! has its own enum; the agent's turn-level error lives in `mnemos-agent`.

use thiserror::Error;

/// Failures of the hosted completion or embedding capability.
///
/// The agent loop treats every variant as a transport failure and
/// retries it against the turn budget.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Unknown core memory block: {0}")]
    BlockNotFound(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

impl From<MemoryError> for ToolError {
    fn from(err: MemoryError) -> Self {
        ToolError::ExecutionFailed {
            tool_name: "memory".into(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn memory_error_converts_to_execution_failure() {
        let err: ToolError = MemoryError::EmbeddingFailed("service unavailable".into()).into();
        match err {
            ToolError::ExecutionFailed { reason, .. } => {
                assert!(reason.contains("service unavailable"));
            }
            other => panic!("Expected ExecutionFailed, got {other:?}"),
        }
    }
}
