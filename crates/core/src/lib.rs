//! # mnemos core
//!
//! Domain types, traits, and error definitions for the mnemos memory agent.
//! This crate carries **no framework logic**: it defines the domain model
//! that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external capability is a trait here (completion, embedding,
//! archival storage, the UI sink, tools). Implementations live in their
//! respective crates. This enables:
//! - Swapping the hosted model for a scripted stub in tests
//! - Running the archival store with or without a remote embedder
//! - Clean dependency graph (all crates depend inward on core)

pub mod agent;
pub mod error;
pub mod event;
pub mod heartbeat;
pub mod memory;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentConfig, AgentState};
pub use error::{MemoryError, ProviderError, ToolError};
pub use event::{RecordingSink, UiEvent, UiEventKind, UiSink};
pub use heartbeat::{HeartbeatPause, HeartbeatState};
pub use memory::{ArchivalMemory, ArchivalRecord, BlockName, CoreMemoryBlock, Embedder};
pub use message::{FunctionCall, Message, MessageBody};
pub use provider::{Completion, CompletionRequest, Provider};
pub use tool::{Tool, ToolContext, ToolRegistry, ToolResult};
