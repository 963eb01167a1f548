//! What a turn returns.

use mnemos_core::error::ProviderError;
use serde::Serialize;
use thiserror::Error;

/// A turn that resolved and was committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    /// The model's final plain-text answer. May be empty: the assistant
    /// chose to say nothing beyond its `send_message` calls.
    pub reply: String,

    /// Successful `send_message` calls during the turn
    pub messages_sent: usize,

    /// Messages appended to the committed history
    pub committed: usize,

    /// Model invocations, retries included
    pub attempts: u32,
}

/// Why a round-trip was not accepted.
#[derive(Debug, Clone, Error)]
pub enum TurnFailure {
    #[error("transport failure: {0}")]
    Transport(#[from] ProviderError),

    /// The model answered in plain text before addressing the user.
    #[error("model answered without calling send_message: {text:?}")]
    ProtocolViolation { text: String },
}

/// A turn that was abandoned. History is untouched in every case.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("turn abandoned after {attempts} model invocations; last failure: {last_failure}")]
    RetriesExhausted {
        attempts: u32,
        last_failure: TurnFailure,
    },

    #[error("turn exceeded the limit of {steps} function calls")]
    StepLimitExceeded { steps: u32 },

    #[error("another turn is already in progress")]
    Busy,

    #[error("message is empty")]
    EmptyInput,
}

impl TurnError {
    /// Whether the agent tried and failed, as opposed to refusing the input.
    pub fn is_abandoned_turn(&self) -> bool {
        matches!(
            self,
            Self::RetriesExhausted { .. } | Self::StepLimitExceeded { .. }
        )
    }
}
