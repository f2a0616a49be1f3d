//! The live-polling engine.
//!
//! At most one session polls at a time. A session is driven by a single
//! spawned task that fetches immediately and then once per interval, awaiting
//! each fetch before the next tick so fetches of one session never overlap.
//! The task captures its session generation and every result goes through
//! [`EngineState::apply`], which drops results of sessions that are gone.
//!
//! The task only holds a `Weak` reference to the engine: dropping the engine
//! ends the task and aborts any armed timer.

use super::state::{EngineEvent, EngineState, TickOutcome};
use crate::config::PollingConfig;
use crate::error::FetchError;
use crate::fetcher::SourceFetcher;
use common::model::connection::ConnectionDescriptor;
use common::model::reading::Reading;
use common::session::SessionSnapshot;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};

pub type SessionListener = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;
pub type ReadingListener = Box<dyn Fn(&str, &Reading) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    session: Vec<SessionListener>,
    reading: Vec<ReadingListener>,
}

struct Shared {
    fetcher: Arc<dyn SourceFetcher>,
    interval: Duration,
    state: Mutex<EngineState>,
    listeners: RwLock<Listeners>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, events: Vec<EngineEvent>) {
        if events.is_empty() {
            return;
        }
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for event in &events {
            match event {
                EngineEvent::Session(snapshot) => {
                    listeners.session.iter().for_each(|listener| listener(snapshot))
                }
                EngineEvent::Reading { target_id, reading } => listeners
                    .reading
                    .iter()
                    .for_each(|listener| listener(target_id, reading)),
            }
        }
    }

    /// Ends the current session if `applies` holds for it, then notifies observers.
    /// Returns whether a session ended, with the state left behind.
    fn end_session_if<P>(&self, why: &str, applies: P) -> (bool, SessionSnapshot)
    where
        P: FnOnce(&EngineState) -> bool,
    {
        let (ended, snapshot) = {
            let mut state = self.lock();
            let previous = state.snapshot();
            let ended = applies(&state) && state.end();
            if ended {
                info!(
                    "polling of {} stopped ({})",
                    previous.target_id.as_deref().unwrap_or("-"),
                    why
                );
            }
            (ended, state.snapshot())
        };
        if ended {
            self.dispatch(vec![EngineEvent::Session(snapshot.clone())]);
        }
        (ended, snapshot)
    }

    fn settle(
        &self,
        generation: u64,
        result: Result<Vec<Value>, FetchError>,
    ) -> TickOutcome {
        let mut events = Vec::new();
        let outcome = {
            let mut state = self.lock();
            let outcome = state.apply(generation, result, &mut events);
            match outcome {
                TickOutcome::Applied => debug!(
                    "session {} appended a reading ({} kept)",
                    generation,
                    state.history_len()
                ),
                TickOutcome::Failed => warn!(
                    "session {} halted: {}",
                    generation,
                    state.snapshot().last_error().unwrap_or_default()
                ),
                TickOutcome::Discarded => debug!(
                    "discarding result of stale session {} (current is {})",
                    generation,
                    state.generation()
                ),
            }
            outcome
        };
        self.dispatch(events);
        outcome
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .disarm();
    }
}

/// Owner of the single polling session.
pub struct PollingEngine {
    shared: Arc<Shared>,
}

impl PollingEngine {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, config: PollingConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                interval: config.interval,
                state: Mutex::new(EngineState::new(config.history_capacity)),
                listeners: RwLock::new(Listeners::default()),
            }),
        }
    }

    /// Starts polling `target`, replacing any other session.
    ///
    /// Calling this for the target that is already polling stops it instead.
    /// Resolves once the immediate first fetch has settled (or the session was
    /// superseded in the meantime) and returns the resulting state.
    pub async fn start(&self, target: ConnectionDescriptor) -> SessionSnapshot {
        let (first_fetch, snapshot) = {
            let mut state = self.shared.lock();
            if state.is_polling(target.id()) {
                state.end();
                info!("polling of {} stopped (toggled off)", target.id());
                (None, state.snapshot())
            } else {
                if let Some(previous) = state.snapshot().target_id {
                    info!("leaving session on {} for {}", previous, target.id());
                }
                let url = target.url().to_string();
                info!(
                    "polling {} at {} every {:?}",
                    target.id(),
                    url,
                    self.shared.interval
                );

                let generation = state.begin(target);
                let (tx, rx) = oneshot::channel();
                let timer = tokio::spawn(drive_session(
                    Arc::downgrade(&self.shared),
                    generation,
                    url,
                    self.shared.interval,
                    tx,
                ));
                state.arm(generation, timer);
                (Some(rx), state.snapshot())
            }
        };
        self.shared.dispatch(vec![EngineEvent::Session(snapshot)]);

        if let Some(first_fetch) = first_fetch {
            // An error here means the session was stopped before its first fetch settled.
            let _ = first_fetch.await;
        }
        self.session()
    }

    pub fn stop(&self) -> SessionSnapshot {
        self.shared.end_session_if("stop requested", |_| true).1
    }

    /// Stops `target_id` if it is the target being polled and returns the new
    /// state. `None` when another target, or none, is polling.
    pub fn stop_target(&self, target_id: &str) -> Option<SessionSnapshot> {
        let (ended, snapshot) = self
            .shared
            .end_session_if("toggled off", |state| state.is_polling(target_id));
        ended.then_some(snapshot)
    }

    /// Stops polling if `target_id` is the target currently being polled.
    pub fn collapse(&self, target_id: &str) -> SessionSnapshot {
        self.shared
            .end_session_if("detail view collapsed", |state| state.is_polling(target_id))
            .1
    }

    /// Cancels any timer and returns to `Idle`; used when the owning view goes away.
    pub fn shutdown(&self) {
        self.shared.end_session_if("engine shut down", |_| true);
    }

    pub fn session(&self) -> SessionSnapshot {
        self.shared.lock().snapshot()
    }

    /// Readings of the current session, most recent first.
    pub fn readings(&self) -> Vec<Reading> {
        self.shared.lock().readings()
    }

    /// Number of live polling timers; never more than one.
    pub fn armed_timers(&self) -> usize {
        self.shared.lock().armed_timers()
    }

    pub fn on_session_state_changed<F>(&self, listener: F)
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        self.shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .session
            .push(Box::new(listener));
    }

    pub fn on_reading_appended<F>(&self, listener: F)
    where
        F: Fn(&str, &Reading) + Send + Sync + 'static,
    {
        self.shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reading
            .push(Box::new(listener));
    }
}

async fn drive_session(
    engine: Weak<Shared>,
    generation: u64,
    url: String,
    period: Duration,
    first_fetch: oneshot::Sender<()>,
) {
    let mut first_fetch = Some(first_fetch);
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let fetcher = {
            let Some(shared) = engine.upgrade() else {
                break;
            };
            let current = shared.lock().is_current(generation);
            if !current {
                break;
            }
            shared.fetcher.clone()
        };
        let result = fetcher.fetch(&url).await;

        let Some(shared) = engine.upgrade() else {
            break;
        };
        let outcome = shared.settle(generation, result);
        drop(shared);

        if let Some(tx) = first_fetch.take() {
            let _ = tx.send(());
        }
        if outcome != TickOutcome::Applied {
            break;
        }
    }
}
