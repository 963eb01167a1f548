//! Single-flight access to one agent from many tasks.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::loop_runner::MemoryAgent;
use crate::outcome::{TurnError, TurnOutcome};

/// A cloneable handle that lets at most one turn run at a time.
///
/// A submission that arrives while a turn is in flight is rejected with
/// [`TurnError::Busy`] rather than queued.
#[derive(Clone)]
pub struct SharedAgent {
    inner: Arc<Mutex<MemoryAgent>>,
}

impl SharedAgent {
    pub fn new(agent: MemoryAgent) -> Self {
        Self {
            inner: Arc::new(Mutex::new(agent)),
        }
    }

    /// Trim `text` and run it as a turn.
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyInput);
        }
        let mut agent = self.inner.try_lock().map_err(|_| TurnError::Busy)?;
        agent.handle_turn(text).await
    }

    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }

    /// Wait for any running turn, then borrow the agent.
    pub async fn lock(&self) -> MutexGuard<'_, MemoryAgent> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, Step, send, text};
    use mnemos_core::agent::AgentConfig;
    use mnemos_core::event::RecordingSink;

    fn shared(provider: Arc<ScriptedProvider>) -> SharedAgent {
        SharedAgent::new(MemoryAgent::new(
            AgentConfig::new("gpt-4").with_retry_backoff_ms(0),
            provider,
            Arc::new(RecordingSink::new()),
        ))
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_calling_the_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = shared(provider.clone());
        assert!(matches!(
            agent.submit("   \n").await,
            Err(TurnError::EmptyInput)
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn submit_trims_input() {
        let provider = Arc::new(ScriptedProvider::new(vec![send("hi"), text("done")]));
        let agent = shared(provider.clone());
        agent.submit("  hello  ").await.unwrap();
        let request = &provider.requests()[0];
        let user = request.history.last().unwrap().searchable_text();
        assert!(user.contains(r#""message":"hello""#), "{user}");
    }

    #[tokio::test]
    async fn second_submission_while_busy_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new(vec![Step::Hang]));
        let entered = provider.entered.clone();
        let agent = shared(provider);

        let background = agent.clone();
        let first = tokio::spawn(async move { background.submit("first").await });
        entered.notified().await;

        assert!(agent.is_busy());
        assert!(matches!(agent.submit("second").await, Err(TurnError::Busy)));

        first.abort();
        let _ = first.await;
        assert!(!agent.is_busy());
        assert_eq!(agent.lock().await.history().len(), 3);
    }
}
