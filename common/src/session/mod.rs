use crate::model::reading::Reading;
use serde::{Deserialize, Serialize};

/// Lifecycle state of the polling session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason")]
pub enum SessionStatus {
    #[default]
    Idle,
    Polling,
    /// The last fetch failed; contains the operator-facing message.
    Error(String),
}

/// Point-in-time view of the polling session handed to observers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The connection being polled, or the one that failed. `None` when idle.
    pub target_id: Option<String>,
    pub status: SessionStatus,
}

impl SessionSnapshot {
    pub fn is_polling(&self, target_id: &str) -> bool {
        self.status == SessionStatus::Polling && self.target_id.as_deref() == Some(target_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Error(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Session state together with the readings collected so far, most recent first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session: SessionSnapshot,
    pub readings: Vec<Reading>,
    /// Live polling timers; never more than one.
    pub armed_timers: usize,
}
