//! Mutable state of the polling engine.
//!
//! `EngineState` is only ever touched under the engine mutex. Every session
//! gets a fresh generation number; results carrying an older generation are
//! dropped instead of being applied to whatever session is current now.

use super::history::ReadingHistory;
use crate::error::FetchError;
use chrono::Utc;
use common::model::connection::ConnectionDescriptor;
use common::model::reading::Reading;
use common::session::{SessionSnapshot, SessionStatus};
use serde_json::Value;
use tokio::task::JoinHandle;

/// What happened to a fetch result handed to [`EngineState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Appended to the history; the session keeps polling.
    Applied,
    /// The fetch failed and moved the session to `Error`.
    Failed,
    /// The session the fetch belonged to is gone; nothing changed.
    Discarded,
}

/// Notifications collected under the lock and delivered after it is released.
#[derive(Debug, Clone)]
pub(crate) enum EngineEvent {
    Session(SessionSnapshot),
    Reading { target_id: String, reading: Reading },
}

pub(crate) struct EngineState {
    generation: u64,
    target: Option<ConnectionDescriptor>,
    status: SessionStatus,
    history: ReadingHistory,
    timer: Option<JoinHandle<()>>,
}

impl EngineState {
    pub(crate) fn new(history_capacity: usize) -> Self {
        Self {
            generation: 0,
            target: None,
            status: SessionStatus::Idle,
            history: ReadingHistory::new(history_capacity),
            timer: None,
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            target_id: self.target.as_ref().map(|t| t.id().to_string()),
            status: self.status.clone(),
        }
    }

    pub(crate) fn readings(&self) -> Vec<Reading> {
        self.history.to_vec()
    }

    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// True while `generation` is the live session and it is still polling.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.status == SessionStatus::Polling
    }

    pub(crate) fn is_polling(&self, target_id: &str) -> bool {
        self.snapshot().is_polling(target_id)
    }

    pub(crate) fn armed_timers(&self) -> usize {
        usize::from(self.timer.as_ref().is_some_and(|t| !t.is_finished()))
    }

    /// Replaces whatever session exists with a fresh `Polling` one for `target`.
    pub(crate) fn begin(&mut self, target: ConnectionDescriptor) -> u64 {
        self.disarm();
        self.generation += 1;
        self.target = Some(target);
        self.status = SessionStatus::Polling;
        self.history.clear();
        self.generation
    }

    /// Returns to `Idle`, discarding the history. Returns false if already idle.
    pub(crate) fn end(&mut self) -> bool {
        let had_session = self.target.is_some();
        self.disarm();
        self.generation += 1;
        self.target = None;
        self.status = SessionStatus::Idle;
        self.history.clear();
        had_session
    }

    /// Stores the handle of the task driving `generation`.
    pub(crate) fn arm(&mut self, generation: u64, timer: JoinHandle<()>) {
        if self.is_current(generation) {
            self.disarm();
            self.timer = Some(timer);
        } else {
            timer.abort();
        }
    }

    pub(crate) fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    pub(crate) fn apply(
        &mut self,
        generation: u64,
        result: Result<Vec<Value>, FetchError>,
        events: &mut Vec<EngineEvent>,
    ) -> TickOutcome {
        if !self.is_current(generation) {
            return TickOutcome::Discarded;
        }
        let target_id = self
            .target
            .as_ref()
            .map(|t| t.id().to_string())
            .unwrap_or_default();

        match result {
            Ok(payload) => {
                let reading = Reading {
                    timestamp: Utc::now(),
                    payload,
                };
                self.history.push(reading.clone());
                events.push(EngineEvent::Reading { target_id, reading });
                TickOutcome::Applied
            }
            Err(err) => {
                // The failing fetch runs inside the timer task, which exits on
                // its own; dropping the handle just detaches it.
                self.timer = None;
                self.status = SessionStatus::Error(err.to_string());
                events.push(EngineEvent::Session(self.snapshot()));
                TickOutcome::Failed
            }
        }
    }
}
