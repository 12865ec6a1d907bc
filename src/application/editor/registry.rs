//! Editor registry: open usage-component sessions keyed by id

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::catalog::MetricSnapshot;
use crate::domain::component::{PlanDuration, UsageComponent};
use crate::domain::tier::TierValidator;
use crate::shared::errors::EditorError;

use super::ComponentEditor;

/// One open editor plus its bookkeeping
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub editor: ComponentEditor,
    pub opened_at: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
}

impl EditorSession {
    fn new(editor: ComponentEditor) -> Self {
        let now = Utc::now();
        Self {
            editor,
            opened_at: now,
            last_touched: now,
        }
    }

    fn touch(&mut self) {
        self.last_touched = Utc::now();
    }
}

/// Thread-safe registry of editing sessions.
///
/// A session is only mutated while its map entry is locked, so one tier
/// ladder never sees concurrent edits.
pub struct EditorRegistry {
    sessions: DashMap<Uuid, EditorSession>,
    validator: TierValidator,
}

pub type SharedEditorRegistry = Arc<EditorRegistry>;

impl EditorRegistry {
    pub fn new(validator: TierValidator) -> Self {
        Self {
            sessions: DashMap::new(),
            validator,
        }
    }

    pub fn shared(validator: TierValidator) -> SharedEditorRegistry {
        Arc::new(Self::new(validator))
    }

    pub fn validator(&self) -> TierValidator {
        self.validator
    }

    /// Open a session over an already loaded catalog snapshot
    pub fn open(
        &self,
        snapshot: Arc<MetricSnapshot>,
        existing: Option<UsageComponent>,
        plan_duration: PlanDuration,
    ) -> Uuid {
        let editing = existing.is_some();
        let editor = ComponentEditor::open(snapshot, existing, plan_duration, self.validator);
        let id = Uuid::new_v4();
        self.sessions.insert(id, EditorSession::new(editor));

        metrics::counter!("editor_sessions_opened_total", "kind" => if editing { "edit" } else { "create" })
            .increment(1);
        info!(session_id = %id, editing, %plan_duration, "Editor session opened");
        id
    }

    /// Run `f` against a session's editor under the entry lock.
    ///
    /// Returns `None` when the session does not exist.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut ComponentEditor) -> R) -> Option<R> {
        let mut entry = self.sessions.get_mut(&id)?;
        entry.touch();
        Some(f(&mut entry.editor))
    }

    /// Snapshot of a session, for read-only views
    pub fn get(&self, id: Uuid) -> Option<EditorSession> {
        self.sessions.get(&id).map(|s| s.clone())
    }

    /// Cancel a session, discarding its edits
    pub fn close(&self, id: Uuid) -> bool {
        if self.sessions.remove(&id).is_some() {
            info!(session_id = %id, "Editor session closed");
            true
        } else {
            warn!(session_id = %id, "Attempted to close unknown session");
            false
        }
    }

    /// Finalize a session. It is removed only when submission succeeds.
    pub fn submit(&self, id: Uuid) -> Option<Result<UsageComponent, EditorError>> {
        let result = self.with_session(id, |editor| editor.submit())?;
        if result.is_ok() {
            self.sessions.remove(&id);
            info!(session_id = %id, "Editor session submitted");
        }
        Some(result)
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop sessions idle for longer than `ttl`; returns how many were dropped.
    ///
    /// A `ttl` reaching past the representable time range expires nothing.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        match Utc::now().checked_sub_signed(ttl) {
            Some(cutoff) => self.purge_idle_since(cutoff),
            None => 0,
        }
    }

    fn purge_idle_since(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_touched >= cutoff);
        before.saturating_sub(self.sessions.len())
    }
}

impl Default for EditorRegistry {
    fn default() -> Self {
        Self::new(TierValidator::default())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::{Metric, MetricType};
    use rust_decimal::Decimal;

    fn snapshot() -> Arc<MetricSnapshot> {
        Arc::new(MetricSnapshot::from_metrics(
            vec![Metric::new("m1", "api_calls", MetricType::Counter)],
            None,
        ))
    }

    #[test]
    fn open_and_close() {
        let registry = EditorRegistry::default();
        let id = registry.open(snapshot(), None, PlanDuration::Monthly);
        assert_eq!(registry.count(), 1);
        assert!(registry.get(id).is_some());
        assert!(registry.close(id));
        assert!(!registry.close(id));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn with_session_on_unknown_id_is_none() {
        let registry = EditorRegistry::default();
        assert!(registry.with_session(Uuid::new_v4(), |_| ()).is_none());
        assert!(registry.submit(Uuid::new_v4()).is_none());
    }

    #[test]
    fn edits_persist_between_calls() {
        let registry = EditorRegistry::default();
        let id = registry.open(snapshot(), None, PlanDuration::Monthly);
        registry
            .with_session(id, |e| e.select_metric("api_calls"))
            .unwrap()
            .unwrap();
        let metric = registry
            .with_session(id, |e| e.metric().map(str::to_string))
            .unwrap();
        assert_eq!(metric.as_deref(), Some("api_calls"));
    }

    #[test]
    fn failed_submit_keeps_session() {
        let registry = EditorRegistry::default();
        let id = registry.open(snapshot(), None, PlanDuration::Monthly);
        let result = registry.submit(id).unwrap();
        assert_eq!(result, Err(EditorError::MetricRequired));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn successful_submit_removes_session() {
        let registry = EditorRegistry::default();
        let id = registry.open(snapshot(), None, PlanDuration::Monthly);
        registry.with_session(id, |e| e.select_metric("api_calls"));
        let component = registry.submit(id).unwrap().unwrap();
        assert_eq!(component.tiers[0].range_start, Decimal::ZERO);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn purge_drops_only_idle_sessions() {
        let registry = EditorRegistry::default();
        registry.open(snapshot(), None, PlanDuration::Monthly);
        assert_eq!(registry.purge_expired(Duration::hours(1)), 0);
        assert_eq!(registry.count(), 1);

        assert_eq!(registry.purge_expired(Duration::MAX), 0);
        assert_eq!(registry.count(), 1);

        let future = Utc::now() + Duration::seconds(1);
        assert_eq!(registry.purge_idle_since(future), 1);
        assert_eq!(registry.count(), 0);
    }
}
