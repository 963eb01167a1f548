//! The memory-agent function set.
//!
//! These are the functions the model may call during a turn: talking to the
//! user, editing core memory, searching recall and archival memory, pausing
//! heartbeats and asking a secondary model. Every function takes typed
//! arguments; malformed arguments come back to the model as a failed result.
//!
//! `request_heartbeat` is accepted on every function that declares it but is
//! advisory: the agent loop keeps calling the model until it answers in
//! plain text regardless.

pub mod archival;
pub mod core_memory;
pub mod message_chatgpt;
pub mod pause_heartbeats;
pub mod recall;
pub mod send_message;

use mnemos_core::event::UiSink;
use mnemos_core::heartbeat::HeartbeatState;
use mnemos_core::tool::ToolRegistry;
use mnemos_memory::MemoryStore;
use std::sync::Arc;

pub use message_chatgpt::SecondaryModel;
pub use send_message::SEND_MESSAGE;

pub(crate) fn request_heartbeat_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "boolean",
        "description": "Request an immediate heartbeat after function execution. Set to 'true' if you want to send a follow-up message or run a follow-up function."
    })
}

/// Everything the function executors act on.
pub struct ToolDeps {
    pub store: Arc<MemoryStore>,
    pub sink: Arc<dyn UiSink>,
    pub heartbeat: Arc<HeartbeatState>,
    pub secondary: Option<SecondaryModel>,
    pub page_size: usize,
}

/// Build the registry with all eleven memory-agent functions.
pub fn memgpt_registry(deps: ToolDeps) -> ToolRegistry {
    let ToolDeps {
        store,
        sink,
        heartbeat,
        secondary,
        page_size,
    } = deps;

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(send_message::SendMessageTool::new(sink)));
    registry.register(Box::new(pause_heartbeats::PauseHeartbeatsTool::new(heartbeat)));
    registry.register(Box::new(message_chatgpt::MessageChatGptTool::new(secondary)));
    registry.register(Box::new(core_memory::CoreMemoryAppendTool::new(store.clone())));
    registry.register(Box::new(core_memory::CoreMemoryReplaceTool::new(store.clone())));
    registry.register(Box::new(recall::HistorySearchTool::recall(page_size)));
    registry.register(Box::new(recall::HistoryDateSearchTool::recall(page_size)));
    registry.register(Box::new(recall::HistorySearchTool::conversation(page_size)));
    registry.register(Box::new(recall::HistoryDateSearchTool::conversation(page_size)));
    registry.register(Box::new(archival::ArchivalInsertTool::new(store.clone())));
    registry.register(Box::new(archival::ArchivalSearchTool::new(store, page_size)));
    registry
}
