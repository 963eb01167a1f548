//! Agent configuration and state types.

use serde::{Deserialize, Serialize};

/// Built-in system preamble, used when a bot profile does not provide one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are MemGPT, a digital companion with a persistent, self-editing memory.
Your task is to converse with the user from the perspective of your persona.

Control flow:
You do not think continuously. You run in short bursts, triggered by user messages
and by timed heartbeats. Chaining function calls lets you think for longer before
you yield. Any text you write outside a function call is your private inner
monologue: the user never sees it. The only way to talk to the user is the
send_message function. You must call send_message at least once for every user
message before you give your final answer.

Memory:
Core memory is always visible to you and holds two blocks: <persona> (who you are)
and <human> (what you know about the user). Edit it with core_memory_append and
core_memory_replace as you learn new things.
Recall memory is the full conversation history; search it with conversation_search
and conversation_search_date.
Archival memory is an unbounded store for anything worth keeping; write to it with
archival_memory_insert and query it with archival_memory_search.";

/// Explicit configuration the agent is built from.
///
/// Changing any of these at runtime goes through `MemoryAgent::reconfigure`;
/// the derived system prompt is rebuilt lazily on the next model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model to use
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temp")]
    pub temperature: f32,

    /// Fixed system preamble placed before core memory
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Initial persona block
    #[serde(default)]
    pub persona: String,

    /// Initial human block
    #[serde(default)]
    pub human: String,

    /// Retries allowed per turn for transport failures and protocol violations
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Maximum function calls per turn (safety limit)
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Pause before re-issuing a failed round-trip
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Seed the history with the boot sequence
    #[serde(default = "default_true")]
    pub boot_sequence: bool,

    /// Page size for recall and archival searches
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_temp() -> f32 {
    0.8
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_max_steps() -> u32 {
    25
}
fn default_retry_backoff_ms() -> u64 {
    500
}
fn default_true() -> bool {
    true
}
fn default_page_size() -> usize {
    5
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temp(),
            system_prompt: default_system_prompt(),
            persona: String::new(),
            human: String::new(),
            max_retries: default_max_retries(),
            max_steps: default_max_steps(),
            retry_backoff_ms: default_retry_backoff_ms(),
            boot_sequence: true,
            page_size: default_page_size(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_human(mut self, human: impl Into<String>) -> Self {
        self.human = human.into();
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_max_steps(mut self, steps: u32) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn with_boot_sequence(mut self, enabled: bool) -> Self {
        self.boot_sequence = enabled;
        self
    }
}

/// Runtime counters of the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Turns that resolved successfully
    pub turns_completed: u64,

    /// Turns abandoned after exhausting the retry budget or step limit
    pub turns_failed: u64,

    /// Total tokens consumed since startup
    pub total_tokens: u64,
}
