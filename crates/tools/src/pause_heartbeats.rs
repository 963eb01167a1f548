//! pause_heartbeats — ask the scheduler for quiet.

use async_trait::async_trait;
use mnemos_core::error::ToolError;
use mnemos_core::heartbeat::{HeartbeatState, MAX_PAUSE_MINUTES};
use mnemos_core::tool::{Tool, ToolContext, ToolResult, parse_arguments};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub struct PauseHeartbeatsTool {
    state: Arc<HeartbeatState>,
}

impl PauseHeartbeatsTool {
    pub fn new(state: Arc<HeartbeatState>) -> Self {
        Self { state }
    }
}

#[derive(Deserialize)]
struct PauseArgs {
    minutes: i64,
}

#[async_trait]
impl Tool for PauseHeartbeatsTool {
    fn name(&self) -> &str {
        "pause_heartbeats"
    }

    fn description(&self) -> &str {
        "Temporarily ignore timed heartbeats. You may still receive messages from manual heartbeats and other events."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "minutes": {
                    "type": "integer",
                    "description": "Number of minutes to ignore heartbeats for. Max value of 360 minutes (6 hours)."
                }
            },
            "required": ["minutes"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        let args: PauseArgs = parse_arguments(arguments)?;
        if args.minutes < 1 {
            return Err(ToolError::InvalidArguments(format!(
                "minutes must be at least 1, got {}",
                args.minutes
            )));
        }

        let requested = u32::try_from(args.minutes).unwrap_or(u32::MAX);
        let pause = self.state.pause(requested);
        info!(
            minutes = pause.duration_minutes,
            requested = args.minutes,
            "Heartbeats paused"
        );

        let mut message = format!(
            "Pausing timed heartbeats for {} min",
            pause.duration_minutes
        );
        if i64::from(pause.duration_minutes) < args.minutes {
            message.push_str(&format!(" (capped at {MAX_PAUSE_MINUTES})"));
        }
        Ok(ToolResult::ok(message).with_data(serde_json::json!({
            "minutes": pause.duration_minutes,
            "resumes_at": pause.resumes_at().to_rfc3339(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pause(state: &Arc<HeartbeatState>, minutes: i64) -> Result<ToolResult, ToolError> {
        PauseHeartbeatsTool::new(state.clone())
            .execute(
                serde_json::json!({"minutes": minutes}),
                &ToolContext::new(&[]),
            )
            .await
    }

    #[tokio::test]
    async fn records_pause() {
        let state = Arc::new(HeartbeatState::new());
        let result = pause(&state, 30).await.unwrap();
        assert_eq!(result.output, "Pausing timed heartbeats for 30 min");
        assert_eq!(state.current().unwrap().duration_minutes, 30);
    }

    #[tokio::test]
    async fn clamps_to_six_hours() {
        let state = Arc::new(HeartbeatState::new());
        let result = pause(&state, 500).await.unwrap();
        assert_eq!(state.current().unwrap().duration_minutes, 360);
        assert!(result.output.starts_with("Pausing timed heartbeats for 360 min"));
        assert!(!result.output.contains("500"));
    }

    #[tokio::test]
    async fn rejects_non_positive_minutes() {
        let state = Arc::new(HeartbeatState::new());
        assert!(matches!(
            pause(&state, 0).await,
            Err(ToolError::InvalidArguments(_))
        ));
        assert!(state.current().is_none());
    }
}
