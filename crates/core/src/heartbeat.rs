//! Heartbeat pause state.
//!
//! An external scheduler would periodically wake the agent. The agent can ask
//! for quiet with `pause_heartbeats`; the request is recorded here and the
//! scheduler consults it before each wake-up.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Longest pause the agent may request, in minutes.
pub const MAX_PAUSE_MINUTES: u32 = 360;

/// A recorded request to suppress heartbeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatPause {
    pub started_at: DateTime<Utc>,
    /// Effective duration, already clamped to [`MAX_PAUSE_MINUTES`]
    pub duration_minutes: u32,
}

impl HeartbeatPause {
    pub fn new(started_at: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            started_at,
            duration_minutes: minutes.min(MAX_PAUSE_MINUTES),
        }
    }

    pub fn resumes_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.resumes_at()
    }
}

/// Shared, advisory heartbeat state. Only the latest pause counts.
#[derive(Debug, Default)]
pub struct HeartbeatState {
    current: Mutex<Option<HeartbeatPause>>,
}

impl HeartbeatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pause starting now. Returns the recorded (clamped) pause.
    pub fn pause(&self, minutes: u32) -> HeartbeatPause {
        self.pause_at(Utc::now(), minutes)
    }

    pub fn pause_at(&self, started_at: DateTime<Utc>, minutes: u32) -> HeartbeatPause {
        let pause = HeartbeatPause::new(started_at, minutes);
        *self.lock() = Some(pause.clone());
        pause
    }

    /// The latest recorded pause, active or not.
    pub fn current(&self) -> Option<HeartbeatPause> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<HeartbeatPause>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_paused(&self, now: DateTime<Utc>) -> bool {
        self.current().is_some_and(|p| p.is_active(now))
    }

    /// When heartbeats resume, if a pause is recorded.
    pub fn resumes_at(&self) -> Option<DateTime<Utc>> {
        self.current().map(|p| p.resumes_at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_clamps_to_maximum() {
        let state = HeartbeatState::new();
        let pause = state.pause(500);
        assert_eq!(pause.duration_minutes, 360);
        assert_eq!(state.current().unwrap().duration_minutes, 360);
    }

    #[test]
    fn pause_expires_after_duration() {
        let state = HeartbeatState::new();
        let start = Utc::now();
        state.pause_at(start, 30);

        assert!(state.is_paused(start + Duration::minutes(29)));
        assert!(!state.is_paused(start + Duration::minutes(30)));
        assert_eq!(state.resumes_at(), Some(start + Duration::minutes(30)));
    }

    #[test]
    fn latest_pause_wins() {
        let state = HeartbeatState::new();
        state.pause(10);
        state.pause(45);
        assert_eq!(state.current().unwrap().duration_minutes, 45);
    }

    #[test]
    fn no_pause_by_default() {
        let state = HeartbeatState::new();
        assert!(state.current().is_none());
        assert!(!state.is_paused(Utc::now()));
    }

    #[test]
    fn pause_survives_a_poisoned_lock() {
        let state = std::sync::Arc::new(HeartbeatState::new());
        let holder = state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.current.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(state.current.is_poisoned());

        state.pause(30);
        assert_eq!(state.current().unwrap().duration_minutes, 30);
    }
}
