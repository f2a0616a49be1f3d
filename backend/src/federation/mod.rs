//! # Federation Core
//!
//! The façade the HTTP layer talks to. It owns the injected catalog store and
//! fetcher, the open compliance gate (if any) and the polling engine, and
//! exposes the whole operator workflow:
//!
//! 1. **Registration**: `preview_source` / `register_preview` (or the combined
//!    `register_source`) turn a draft into a catalogued descriptor.
//! 2. **Compliance**: `begin_approval`, `toggle_compliance`, `submit_approval`.
//!    A new approval always starts from cleared flags.
//! 3. **Polling**: `start_polling` consumes an [`Approved`]; `toggle_polling`,
//!    `stop_polling` and `collapse_view` end the session.
//!
//! Nothing here is a process-wide singleton: `main.rs` builds one core and
//! calls [`FederationCore::shutdown`] when the server stops.

pub mod bulk;
pub mod compliance;
pub mod registration;

use compliance::{Approved, ComplianceGate};
use registration::SourcePreview;

use crate::config::PollingConfig;
use crate::error::FederationError;
use crate::fetcher::SourceFetcher;
use crate::polling::PollingEngine;
use crate::store::{CatalogStore, FEDERATED_RECORDS};
use common::model::compliance::{ComplianceAcknowledgment, ComplianceFlag};
use common::model::connection::{ConnectionDescriptor, SourceDraft};
use common::model::reading::Reading;
use common::requests::CommitFederationRequest;
use common::session::{SessionSnapshot, SessionView};
use log::info;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct FederationCore {
    store: Arc<dyn CatalogStore>,
    fetcher: Arc<dyn SourceFetcher>,
    gate: Mutex<Option<ComplianceGate>>,
    engine: PollingEngine,
}

impl FederationCore {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        fetcher: Arc<dyn SourceFetcher>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            engine: PollingEngine::new(fetcher.clone(), polling),
            store,
            fetcher,
            gate: Mutex::new(None),
        }
    }

    fn gate(&self) -> MutexGuard<'_, Option<ComplianceGate>> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn preview_source(
        &self,
        draft: SourceDraft,
    ) -> Result<SourcePreview, FederationError> {
        registration::preview_source(self.fetcher.as_ref(), draft).await
    }

    pub fn register_preview(
        &self,
        preview: SourcePreview,
    ) -> Result<ConnectionDescriptor, FederationError> {
        registration::register_preview(self.store.as_ref(), preview)
    }

    /// Validates, previews and registers `draft` in one step.
    pub async fn register_source(
        &self,
        draft: SourceDraft,
    ) -> Result<ConnectionDescriptor, FederationError> {
        let preview = self.preview_source(draft).await?;
        self.register_preview(preview)
    }

    pub fn list_sources(&self) -> Result<Vec<ConnectionDescriptor>, FederationError> {
        registration::list_sources(self.store.as_ref())
    }

    /// Opens a fresh gate for `target_id`, replacing any approval in progress.
    pub fn begin_approval(
        &self,
        target_id: &str,
    ) -> Result<ComplianceAcknowledgment, FederationError> {
        registration::find_source(self.store.as_ref(), target_id)?;
        let gate = ComplianceGate::begin(target_id);
        let acknowledgment = gate.acknowledgment();
        if let Some(previous) = self.gate().replace(gate) {
            info!("compliance approval for {} abandoned", previous.target_id());
        }
        info!("compliance approval opened for {}", target_id);
        Ok(acknowledgment)
    }

    pub fn toggle_compliance(
        &self,
        flag: ComplianceFlag,
    ) -> Result<ComplianceAcknowledgment, FederationError> {
        self.gate()
            .as_mut()
            .map(|gate| gate.toggle(flag))
            .ok_or(FederationError::NoPendingApproval)
    }

    /// Discards the open gate. Returns false if none was open.
    pub fn cancel_approval(&self) -> bool {
        self.gate().take().is_some()
    }

    /// Closes the gate if every flag is set. On failure the gate stays open
    /// with its flags untouched.
    pub fn submit_approval(&self) -> Result<Approved, FederationError> {
        let mut slot = self.gate();
        let approved = slot
            .as_ref()
            .ok_or(FederationError::NoPendingApproval)?
            .submit()?;
        *slot = None;
        info!("compliance approved for {}", approved.target_id());
        Ok(approved)
    }

    pub async fn start_polling(
        &self,
        approved: Approved,
    ) -> Result<SessionSnapshot, FederationError> {
        let target = registration::find_source(self.store.as_ref(), approved.target_id())?;
        Ok(self.engine.start(target).await)
    }

    /// Submits the open gate and, once approved, starts polling its target.
    pub async fn approve_and_start(&self) -> Result<SessionSnapshot, FederationError> {
        let approved = self.submit_approval()?;
        self.start_polling(approved).await
    }

    /// Stops `target_id` if it is the target being polled. Starting a source
    /// always goes through the compliance gate, so anything else is refused.
    pub fn toggle_polling(&self, target_id: &str) -> Result<SessionSnapshot, FederationError> {
        self.engine
            .stop_target(target_id)
            .ok_or_else(|| FederationError::ApprovalRequired(target_id.to_string()))
    }

    pub fn stop_polling(&self) -> SessionSnapshot {
        self.engine.stop()
    }

    pub fn collapse_view(&self, target_id: &str) -> SessionSnapshot {
        self.engine.collapse(target_id)
    }

    pub fn session(&self) -> SessionView {
        SessionView {
            session: self.engine.session(),
            readings: self.engine.readings(),
            armed_timers: self.engine.armed_timers(),
        }
    }

    pub fn on_session_state_changed<F>(&self, listener: F)
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        self.engine.on_session_state_changed(listener);
    }

    pub fn on_reading_appended<F>(&self, listener: F)
    where
        F: Fn(&str, &Reading) + Send + Sync + 'static,
    {
        self.engine.on_reading_appended(listener);
    }

    /// Writes the ticked rows of `request` to the federated collection.
    pub fn commit_selected(
        &self,
        request: &CommitFederationRequest,
    ) -> Result<usize, FederationError> {
        let rows = bulk::select_for_commit(&request.records, &request.selected);
        if rows.is_empty() {
            return Ok(0);
        }
        let committed = self.store.insert_many(FEDERATED_RECORDS, &rows)?;
        info!("federated {} selected records", committed);
        Ok(committed)
    }

    pub fn shutdown(&self) {
        self.cancel_approval();
        self.engine.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::scripted::ScriptedFetcher;
    use crate::store::SqliteCatalogStore;
    use common::session::SessionStatus;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    const URL: &str = "http://x/data";

    fn core() -> (TempDir, Arc<SqliteCatalogStore>, FederationCore) {
        let dir = tempdir().unwrap();
        let store = Arc::new(SqliteCatalogStore::open(dir.path().join("catalog.sqlite")).unwrap());
        let fetcher = ScriptedFetcher::new().route(URL, |n| Ok(json!([{ "v": n }, { "v": n }])));
        let core = FederationCore::new(store.clone(), Arc::new(fetcher), PollingConfig::default());
        (dir, store, core)
    }

    fn draft() -> SourceDraft {
        SourceDraft {
            name: "Temp Sensor".into(),
            description: "d".into(),
            url: URL.into(),
            ..SourceDraft::default()
        }
    }

    fn accept_all(core: &FederationCore) {
        for flag in ComplianceFlag::ALL {
            core.toggle_compliance(flag).unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn registered_source_is_polled_after_approval() {
        let (_dir, _store, core) = core();
        let descriptor = core.register_source(draft()).await.unwrap();
        assert_eq!(descriptor.record_count(), 2);

        core.begin_approval(descriptor.id()).unwrap();
        core.toggle_compliance(ComplianceFlag::Terms).unwrap();
        assert!(matches!(
            core.approve_and_start().await,
            Err(FederationError::IncompleteCompliance { .. })
        ));
        assert_eq!(core.session().session.status, SessionStatus::Idle);

        core.toggle_compliance(ComplianceFlag::DataProtection).unwrap();
        core.toggle_compliance(ComplianceFlag::PurposeLimitation).unwrap();
        let snapshot = core.approve_and_start().await.unwrap();
        assert!(snapshot.is_polling(descriptor.id()));

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(core.session().readings.len(), 2);

        // The gate was consumed by the successful submit.
        assert!(matches!(
            core.submit_approval(),
            Err(FederationError::NoPendingApproval)
        ));

        let stopped = core.toggle_polling(descriptor.id()).unwrap();
        assert_eq!(stopped.status, SessionStatus::Idle);
        assert_eq!(core.session().armed_timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submit_keeps_the_flags_already_checked() {
        let (_dir, _store, core) = core();
        let descriptor = core.register_source(draft()).await.unwrap();
        core.begin_approval(descriptor.id()).unwrap();
        core.toggle_compliance(ComplianceFlag::Terms).unwrap();
        core.toggle_compliance(ComplianceFlag::PurposeLimitation).unwrap();

        assert!(core.submit_approval().is_err());
        let flags = core.toggle_compliance(ComplianceFlag::DataProtection).unwrap();
        assert!(flags.all_accepted());
        assert!(core.submit_approval().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn beginning_a_new_approval_clears_previous_flags() {
        let (_dir, _store, core) = core();
        let first = core.register_source(draft()).await.unwrap();
        let second = core.register_source(draft()).await.unwrap();

        core.begin_approval(first.id()).unwrap();
        accept_all(&core);
        let flags = core.begin_approval(second.id()).unwrap();
        assert_eq!(flags, ComplianceAcknowledgment::default());
        assert!(core.submit_approval().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn approval_requires_a_catalogued_source() {
        let (_dir, _store, core) = core();
        assert!(matches!(
            core.begin_approval("missing"),
            Err(FederationError::UnknownSource(_))
        ));
        assert!(matches!(
            core.toggle_compliance(ComplianceFlag::Terms),
            Err(FederationError::NoPendingApproval)
        ));
        assert!(matches!(
            core.toggle_polling("missing"),
            Err(FederationError::ApprovalRequired(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_another_source_leaves_the_polled_one_running() {
        let (_dir, _store, core) = core();
        let idle = core.register_source(draft()).await.unwrap();
        let polled = core.register_source(draft()).await.unwrap();
        core.begin_approval(polled.id()).unwrap();
        accept_all(&core);
        core.approve_and_start().await.unwrap();

        assert!(matches!(
            core.toggle_polling(idle.id()),
            Err(FederationError::ApprovalRequired(id)) if id == idle.id()
        ));
        let view = core.session();
        assert!(view.session.is_polling(polled.id()));
        assert_eq!(view.armed_timers, 1);
        assert_eq!(view.readings.len(), 1);

        core.stop_polling();
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_approval_cannot_be_submitted() {
        let (_dir, _store, core) = core();
        let descriptor = core.register_source(draft()).await.unwrap();
        core.begin_approval(descriptor.id()).unwrap();
        accept_all(&core);

        assert!(core.cancel_approval());
        assert!(!core.cancel_approval());
        assert!(matches!(
            core.submit_approval(),
            Err(FederationError::NoPendingApproval)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn collapsing_the_polled_view_and_shutdown_stop_the_session() {
        let (_dir, _store, core) = core();
        let descriptor = core.register_source(draft()).await.unwrap();
        core.begin_approval(descriptor.id()).unwrap();
        accept_all(&core);
        core.approve_and_start().await.unwrap();

        assert_eq!(core.collapse_view(descriptor.id()).status, SessionStatus::Idle);

        core.begin_approval(descriptor.id()).unwrap();
        accept_all(&core);
        core.approve_and_start().await.unwrap();
        core.shutdown();
        assert_eq!(core.session().session, SessionSnapshot::default());
        assert_eq!(core.session().armed_timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn commit_selected_writes_only_ticked_rows() {
        let (_dir, store, core) = core();
        let request = CommitFederationRequest {
            records: vec![json!({"id": "a"}), json!({"id": "b"})],
            selected: HashMap::from([("b".to_string(), true)]),
        };

        assert_eq!(core.commit_selected(&request).unwrap(), 1);
        let rows = store.query_all(FEDERATED_RECORDS).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].body, json!({"id": "b"}));

        assert_eq!(core.commit_selected(&CommitFederationRequest::default()).unwrap(), 0);
    }
}
