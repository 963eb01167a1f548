//! The memory-agent call loop.

use mnemos_core::agent::{AgentConfig, AgentState};
use mnemos_core::error::ProviderError;
use mnemos_core::event::{UiEvent, UiSink};
use mnemos_core::heartbeat::HeartbeatState;
use mnemos_core::memory::{ArchivalMemory, BlockName, CoreMemoryBlock, Embedder};
use mnemos_core::message::Message;
use mnemos_core::provider::{Completion, CompletionRequest, Provider};
use mnemos_core::tool::{ToolContext, ToolRegistry};
use mnemos_memory::{CoreMemory, HashEmbedder, MemoryStore};
use mnemos_tools::{SEND_MESSAGE, SecondaryModel, ToolDeps, memgpt_registry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::boot;
use crate::outcome::{TurnError, TurnFailure, TurnOutcome};

/// Shown to the user when a turn is abandoned.
pub const FAILURE_NOTICE: &str = "The assistant failed to respond. Please try again.";

/// The rendered system prompt and what it was rendered from.
#[derive(Default)]
struct PromptCache {
    rendered: String,
    revision: u64,
    dirty: bool,
}

/// Drives one conversation: committed history, core and archival memory,
/// and the function registry the model calls into.
///
/// A turn runs to completion under `&mut self`, so two turns can never
/// interleave on the same agent. Wrap it in [`crate::SharedAgent`] to share
/// it between tasks.
pub struct MemoryAgent {
    config: AgentConfig,
    provider: Arc<dyn Provider>,
    sink: Arc<dyn UiSink>,
    embedder: Arc<dyn Embedder>,
    archive: Option<Arc<dyn ArchivalMemory>>,
    secondary: Option<SecondaryModel>,
    heartbeat: Arc<HeartbeatState>,
    store: Arc<MemoryStore>,
    tools: ToolRegistry,

    /// Committed history. Only ever extended by a resolved turn.
    history: Vec<Message>,
    prompt: PromptCache,
    state: AgentState,
}

impl MemoryAgent {
    /// Create an agent with the offline hash embedder and no secondary model.
    pub fn new(config: AgentConfig, provider: Arc<dyn Provider>, sink: Arc<dyn UiSink>) -> Self {
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::default());
        let heartbeat = Arc::new(HeartbeatState::new());
        let store = Arc::new(MemoryStore::new(
            CoreMemory::new(config.persona.as_str(), config.human.as_str()),
            embedder.clone(),
        ));
        let history = if config.boot_sequence {
            boot::boot_sequence()
        } else {
            Vec::new()
        };

        let mut agent = Self {
            config,
            provider,
            sink,
            embedder,
            archive: None,
            secondary: None,
            heartbeat,
            store,
            tools: ToolRegistry::new(),
            history,
            prompt: PromptCache {
                dirty: true,
                ..PromptCache::default()
            },
            state: AgentState::default(),
        };
        agent.rebuild_tools();
        agent
    }

    /// Use a different embedder for archival memory.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = embedder;
        self.rebuild_store();
        self
    }

    /// Use a pre-built archival backend.
    pub fn with_archive(mut self, archive: Arc<dyn ArchivalMemory>) -> Self {
        self.archive = Some(archive);
        self.rebuild_store();
        self
    }

    /// Answer `message_chatgpt` with a secondary model.
    pub fn with_secondary(mut self, secondary: SecondaryModel) -> Self {
        self.secondary = Some(secondary);
        self.rebuild_tools();
        self
    }

    /// Share heartbeat state with an external scheduler.
    pub fn with_heartbeat(mut self, heartbeat: Arc<HeartbeatState>) -> Self {
        self.heartbeat = heartbeat;
        self.rebuild_tools();
        self
    }

    fn rebuild_store(&mut self) {
        let core = CoreMemory::new(self.config.persona.as_str(), self.config.human.as_str());
        let store = MemoryStore::new(core, self.embedder.clone());
        self.store = Arc::new(match &self.archive {
            Some(archive) => store.with_archive(archive.clone()),
            None => store,
        });
        self.prompt.dirty = true;
        self.rebuild_tools();
    }

    fn rebuild_tools(&mut self) {
        self.tools = memgpt_registry(ToolDeps {
            store: self.store.clone(),
            sink: self.sink.clone(),
            heartbeat: self.heartbeat.clone(),
            secondary: self.secondary.clone(),
            page_size: self.config.page_size,
        });
    }

    /// Apply new settings. The system prompt is rebuilt on the next model
    /// call; a changed persona or human text replaces that core block.
    pub fn reconfigure(&mut self, config: AgentConfig) {
        if config.persona != self.config.persona {
            self.store.reset_core(BlockName::Persona, &config.persona);
        }
        if config.human != self.config.human {
            self.store.reset_core(BlockName::Human, &config.human);
        }
        let page_size_changed = config.page_size != self.config.page_size;

        self.config = config;
        self.prompt.dirty = true;
        if page_size_changed {
            self.rebuild_tools();
        }
        debug!(model = %self.config.model, "Agent reconfigured");
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The committed history, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn core_memory(&self) -> [CoreMemoryBlock; 2] {
        self.store.core_snapshot()
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn heartbeat(&self) -> &Arc<HeartbeatState> {
        &self.heartbeat
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn state(&self) -> AgentState {
        self.state.clone()
    }

    /// The system prompt as the next model call will see it.
    pub fn system_prompt(&self) -> String {
        self.store.render_prompt(&self.config.system_prompt)
    }

    /// Start a new conversation. Memory is kept.
    pub fn clear_history(&mut self) {
        self.history = if self.config.boot_sequence {
            boot::boot_sequence()
        } else {
            Vec::new()
        };
    }

    fn current_prompt(&mut self) -> String {
        let revision = self.store.revision();
        if self.prompt.dirty || self.prompt.revision != revision {
            self.prompt = PromptCache {
                rendered: self.system_prompt(),
                revision,
                dirty: false,
            };
            debug!(revision, "Rebuilt system prompt");
        }
        self.prompt.rendered.clone()
    }

    /// Process one user message.
    ///
    /// The turn resolves once the model has called `send_message` at least
    /// once and then answers in plain text. Everything the turn produced is
    /// then committed in one step. On any error the history is unchanged.
    pub async fn handle_turn(&mut self, user_text: &str) -> Result<TurnOutcome, TurnError> {
        let turn = self.state.turns_completed + self.state.turns_failed + 1;
        info!(turn, "Turn started");
        self.sink.emit(UiEvent::user_message(user_text));

        let result = self.run_turn(user_text).await;
        match &result {
            Ok(outcome) => {
                self.state.turns_completed += 1;
                info!(
                    turn,
                    attempts = outcome.attempts,
                    committed = outcome.committed,
                    "Turn completed"
                );
            }
            Err(e) => {
                self.state.turns_failed += 1;
                warn!(turn, error = %e, "Turn abandoned");
                self.sink.emit(UiEvent::notice(FAILURE_NOTICE));
            }
        }
        result
    }

    async fn run_turn(&mut self, user_text: &str) -> Result<TurnOutcome, TurnError> {
        let mut scratch = vec![Message::user(boot::user_message(user_text))];
        let mut messages_sent = 0usize;
        let mut retries = 0u32;
        let mut steps = 0u32;
        let mut attempts = 0u32;
        // Plain text rejected for not addressing the user, replayed with a
        // reminder on the next attempt and never committed.
        let mut rejected: Option<String> = None;

        loop {
            let system_prompt = self.current_prompt();
            let mut history = Vec::with_capacity(self.history.len() + scratch.len() + 2);
            history.extend_from_slice(&self.history);
            history.extend_from_slice(&scratch);
            if let Some(text) = &rejected {
                history.push(Message::assistant(text.as_str()));
                history.push(Message::user(boot::send_message_reminder()));
            }

            let request = CompletionRequest::new(&self.config.model, system_prompt, history)
                .with_temperature(self.config.temperature)
                .with_functions(self.tools.definitions());

            attempts += 1;
            debug!(step = steps, attempt = attempts, "Calling model");

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    let delay = self.backoff(&e);
                    self.spend_retry(&mut retries, attempts, TurnFailure::Transport(e))?;
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };
            if let Some(usage) = &response.usage {
                self.state.total_tokens += u64::from(usage.total_tokens);
            }

            match response.completion {
                Completion::FunctionCall { call, leading_text } => {
                    steps += 1;
                    if steps > self.config.max_steps {
                        return Err(TurnError::StepLimitExceeded {
                            steps: self.config.max_steps,
                        });
                    }
                    rejected = None;

                    if !leading_text.trim().is_empty() {
                        self.sink.emit(UiEvent::bot_thought(leading_text.as_str()));
                    }
                    self.sink
                        .emit(UiEvent::bot_function(&call.name, &call.arguments));

                    let result = self
                        .tools
                        .dispatch(&call, &ToolContext::new(&self.history))
                        .await;
                    debug!(step = steps, function = %call.name, success = result.success, "Function dispatched");

                    if call.name == SEND_MESSAGE && result.success {
                        messages_sent += 1;
                    }
                    let name = call.name.clone();
                    scratch.push(Message::function_call(call, leading_text));
                    scratch.push(Message::function_result(name, result.envelope()));
                }
                Completion::Text { text } => {
                    if messages_sent == 0 {
                        self.spend_retry(
                            &mut retries,
                            attempts,
                            TurnFailure::ProtocolViolation { text: text.clone() },
                        )?;
                        rejected = Some(text);
                        continue;
                    }

                    if !text.trim().is_empty() {
                        self.sink.emit(UiEvent::bot_thought(text.as_str()));
                    }
                    scratch.push(Message::assistant(text.as_str()));

                    let committed = scratch.len();
                    self.history.extend(scratch);
                    return Ok(TurnOutcome {
                        reply: text,
                        messages_sent,
                        committed,
                        attempts,
                    });
                }
            }
        }
    }

    /// Count one retry against the turn budget, or give up.
    fn spend_retry(
        &self,
        retries: &mut u32,
        attempts: u32,
        failure: TurnFailure,
    ) -> Result<(), TurnError> {
        *retries += 1;
        if *retries > self.config.max_retries {
            return Err(TurnError::RetriesExhausted {
                attempts,
                last_failure: failure,
            });
        }
        warn!(retries = *retries, max_retries = self.config.max_retries, %failure, "Retrying");
        Ok(())
    }

    fn backoff(&self, error: &ProviderError) -> Duration {
        let base = Duration::from_millis(self.config.retry_backoff_ms);
        match error {
            ProviderError::RateLimited { retry_after_secs } => {
                base.max(Duration::from_secs(*retry_after_secs))
            }
            _ => base,
        }
    }
}
