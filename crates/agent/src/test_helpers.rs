//! Shared test doubles for agent tests.

use mnemos_core::error::ProviderError;
use mnemos_core::provider::{Completion, CompletionRequest, Provider, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::Notify;

/// One scripted provider behaviour.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(Completion),
    Fail(ProviderError),
    /// Never resolve. Signals `entered` first.
    Hang,
}

/// A provider that plays back a script, one step per call, and records
/// every request it receives.
///
/// Once the script is used up the `repeat` step (if any) is returned
/// forever; otherwise the call panics.
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    repeat: Option<Step>,
    requests: Mutex<Vec<CompletionRequest>>,
    pub entered: Arc<Notify>,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
            entered: Arc::new(Notify::new()),
        }
    }

    /// Answer every call with the same step.
    pub fn always(step: Step) -> Self {
        Self {
            repeat: Some(step),
            ..Self::new(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone())
            .unwrap_or_else(|| panic!("ScriptedProvider: script exhausted"));

        match step {
            Step::Reply(completion) => Ok(ProviderResponse {
                completion,
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "scripted-model".into(),
            }),
            Step::Fail(err) => Err(err),
            Step::Hang => {
                self.entered.notify_one();
                std::future::pending().await
            }
        }
    }
}

/// The model calls `send_message` with `message`.
pub fn send(message: &str) -> Step {
    call("send_message", serde_json::json!({ "message": message }))
}

pub fn call(name: &str, arguments: serde_json::Value) -> Step {
    Step::Reply(Completion::function_call(name, arguments))
}

/// The model answers in plain text.
pub fn text(text: &str) -> Step {
    Step::Reply(Completion::text(text))
}
