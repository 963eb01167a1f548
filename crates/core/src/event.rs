//! UI events — the fire-and-forget stream the agent emits while it works.
//!
//! The agent never renders anything itself. It pushes [`UiEvent`]s into a
//! [`UiSink`]; the terminal front-end, a web socket or a test recorder decide
//! what to do with them. Ordering of delivery must match emission order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiEventKind {
    /// The user's own input, echoed back
    UserMessage,
    /// A message the agent addressed to the user via `send_message`
    BotMessage,
    /// Inner monologue: leading text on a function call, or the final answer
    BotThought,
    /// Audit trail entry: `function_name(arguments_json)`
    BotFunction,
    /// A notice from the runtime itself (e.g., a failed turn)
    Notice,
}

/// A single event for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiEvent {
    pub kind: UiEventKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl UiEvent {
    pub fn new(kind: UiEventKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user_message(text: impl Into<String>) -> Self {
        Self::new(UiEventKind::UserMessage, text)
    }

    pub fn bot_message(text: impl Into<String>) -> Self {
        Self::new(UiEventKind::BotMessage, text)
    }

    pub fn bot_thought(text: impl Into<String>) -> Self {
        Self::new(UiEventKind::BotThought, text)
    }

    pub fn bot_function(name: &str, arguments: &str) -> Self {
        Self::new(UiEventKind::BotFunction, format!("{name}({arguments})"))
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(UiEventKind::Notice, text)
    }
}

/// Consumer of UI events. Implementations must not block.
pub trait UiSink: Send + Sync {
    fn emit(&self, event: UiEvent);
}

/// A sink that keeps every event in memory. Handy for tests and transcripts.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Texts of the events of one kind, in emission order.
    pub fn texts(&self, kind: UiEventKind) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.text)
            .collect()
    }
}

impl UiSink for RecordingSink {
    fn emit(&self, event: UiEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_filters_by_kind() {
        let sink = RecordingSink::new();
        sink.emit(UiEvent::bot_thought("thinking"));
        sink.emit(UiEvent::bot_message("hello"));
        sink.emit(UiEvent::bot_message("again"));

        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.texts(UiEventKind::BotMessage), vec!["hello", "again"]);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&UiEventKind::BotThought).unwrap();
        assert_eq!(json, r#""bot_thought""#);
    }
}
