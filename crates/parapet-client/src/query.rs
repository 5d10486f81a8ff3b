//! Single-key query cache for the risk list.
//!
//! Holds the latest fetched snapshot, exposes the three observable states
//! (loading, error with message, success with data) to the view,
//! de-duplicates concurrent reads, and re-runs the fetch exactly once after
//! each successful mutation. That mutate-then-refetch sequence is the only
//! ordering guarantee in the system: the view sees a transition through
//! `Loading` back to `Success` with the grown snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use parapet_core::{RiskDraft, RiskRecord};

use crate::service::{RiskService, ServiceError};

/// Observable state of the cached risk list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// A fetch is in flight and no settled snapshot is available.
    Loading,
    /// The last fetch failed; the view renders the message and takes no
    /// recovery action.
    Error(String),
    /// The latest settled snapshot.
    Success(Vec<RiskRecord>),
}

impl QueryState {
    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure message, when in the error state.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The snapshot, when in the success state.
    #[must_use]
    pub fn records(&self) -> Option<&[RiskRecord]> {
        match self {
            Self::Success(records) => Some(records),
            _ => None,
        }
    }
}

/// Cache and invalidation layer over a [`RiskService`].
///
/// One logical key (the risk list). Shared freely behind an [`Arc`]: the
/// view reads [`RiskQuery::state`] every frame while spawned tasks drive
/// [`RiskQuery::refresh`] and [`RiskQuery::add`].
#[derive(Debug)]
pub struct RiskQuery {
    service: Arc<RiskService>,
    state: Mutex<QueryState>,
    fetch_in_flight: AtomicBool,
    mutation_pending: AtomicBool,
}

impl RiskQuery {
    /// A cache over `service`, starting in the loading state.
    #[must_use]
    pub fn new(service: Arc<RiskService>) -> Self {
        Self {
            service,
            state: Mutex::new(QueryState::Loading),
            fetch_in_flight: AtomicBool::new(false),
            mutation_pending: AtomicBool::new(false),
        }
    }

    /// The service this cache fetches through.
    #[must_use]
    pub fn service(&self) -> &Arc<RiskService> {
        &self.service
    }

    /// Current observable state (cloned; cheap for dashboard-sized lists).
    #[must_use]
    pub fn state(&self) -> QueryState {
        self.lock_state().clone()
    }

    /// Whether a mutation is in flight. The view disables the add action
    /// while this is set, so computed ids cannot race.
    #[must_use]
    pub fn mutation_pending(&self) -> bool {
        self.mutation_pending.load(Ordering::SeqCst)
    }

    /// Run the fetch and settle the state, unless a fetch is already in
    /// flight (concurrent reads de-duplicate under the single key).
    ///
    /// Returns `true` if this call ran the fetch.
    pub async fn refresh(&self) -> bool {
        if self.fetch_in_flight.swap(true, Ordering::SeqCst) {
            debug!("refresh coalesced into in-flight fetch");
            return false;
        }
        *self.lock_state() = QueryState::Loading;

        let settled = match self.service.fetch_risks().await {
            Ok(records) => QueryState::Success(records),
            Err(err) => QueryState::Error(err.to_string()),
        };
        *self.lock_state() = settled;
        self.fetch_in_flight.store(false, Ordering::SeqCst);
        true
    }

    /// Mutate, then invalidate: a successful add re-runs the fetch exactly
    /// once before the view is considered stable again.
    ///
    /// Only one mutation may be in flight at a time; a second concurrent
    /// call fails with [`ServiceError::MutationPending`] without touching
    /// the register.
    pub async fn add(&self, draft: RiskDraft) -> Result<RiskRecord, ServiceError> {
        if self.mutation_pending.swap(true, Ordering::SeqCst) {
            return Err(ServiceError::MutationPending);
        }

        let result = self.service.add_risk(draft).await;
        self.mutation_pending.store(false, Ordering::SeqCst);

        match result {
            Ok(record) => {
                debug!(id = record.id, "mutation committed, invalidating risk list");
                self.refresh().await;
                Ok(record)
            }
            Err(err) => Err(err),
        }
    }

    /// Lock the state, recovering from a poisoned lock (a panicking reader
    /// cannot corrupt a plain enum swap).
    fn lock_state(&self) -> MutexGuard<'_, QueryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parapet_core::{RiskRegister, RiskStatus, Severity};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    fn seeded_query() -> Arc<RiskQuery> {
        let register = Arc::new(StdMutex::new(RiskRegister::seeded()));
        let service = Arc::new(RiskService::new(register));
        Arc::new(RiskQuery::new(service))
    }

    fn draft() -> RiskDraft {
        RiskDraft::new(
            "New Web Server",
            "SQL Injection",
            "Input validation missing",
            Severity::High,
            Severity::High,
        )
    }

    // ── states ──────────────────────────────────────────────────────────────

    #[test]
    fn new_cache_starts_loading() {
        let query = seeded_query();
        assert!(query.state().is_loading());
        assert!(!query.mutation_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_settles_into_success() {
        let query = seeded_query();
        assert!(query.refresh().await);
        let state = query.state();
        assert_eq!(state.records().map(<[_]>::len), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn injected_failure_settles_into_error_and_recovers() {
        let query = seeded_query();
        query
            .service()
            .inject_fetch_failures(1, "backend unreachable");

        query.refresh().await;
        assert_eq!(
            query.state().error_message(),
            Some("error fetching risk data: backend unreachable")
        );

        query.refresh().await;
        assert_eq!(query.state().records().map(<[_]>::len), Some(3));
    }

    // ── de-duplication ──────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn concurrent_refreshes_coalesce() {
        let query = seeded_query();
        let a = tokio::spawn({
            let query = Arc::clone(&query);
            async move { query.refresh().await }
        });
        let b = tokio::spawn({
            let query = Arc::clone(&query);
            async move { query.refresh().await }
        });
        let (ran_a, ran_b) = (a.await.expect("join"), b.await.expect("join"));
        assert!(ran_a ^ ran_b, "exactly one refresh runs the fetch");
        assert_eq!(query.service().fetches_run(), 1);
        assert_eq!(query.state().records().map(<[_]>::len), Some(3));
    }

    // ── mutate-then-refetch ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn add_commits_then_refetches_exactly_once() {
        let query = seeded_query();
        query.refresh().await;
        assert_eq!(query.service().fetches_run(), 1);

        let created = query.add(draft()).await.expect("add succeeds");
        assert_eq!(created.id, 4);
        assert_eq!(created.status, RiskStatus::Open);

        // One fetch for the initial load, exactly one for the invalidation.
        assert_eq!(query.service().fetches_run(), 2);
        let state = query.state();
        let records = state.records().expect("settled");
        assert_eq!(records.len(), 4);
        assert_eq!(records.last(), Some(&created));
    }

    #[tokio::test(start_paused = true)]
    async fn view_observes_loading_between_commit_and_settle() {
        let query = seeded_query();
        query.refresh().await;

        let handle = tokio::spawn({
            let query = Arc::clone(&query);
            async move { query.add(draft()).await }
        });

        // Mid-mutation: the add action must read as pending.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(query.mutation_pending());

        // Commit done, invalidation fetch in flight: loading, not pending.
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert!(!query.mutation_pending());
        assert!(query.state().is_loading());

        let created = handle.await.expect("join").expect("add succeeds");
        assert_eq!(query.state().records().map(<[_]>::len), Some(4));
        assert_eq!(created.id, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn second_concurrent_mutation_is_rejected() {
        let query = seeded_query();
        query.refresh().await;

        let first = tokio::spawn({
            let query = Arc::clone(&query);
            async move { query.add(draft()).await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let err = query.add(draft()).await.expect_err("second add rejected");
        assert_eq!(err, ServiceError::MutationPending);

        let created = first.await.expect("join").expect("first add commits");
        assert_eq!(created.id, 4);
        assert_eq!(query.state().records().map(<[_]>::len), Some(4));
    }
}
