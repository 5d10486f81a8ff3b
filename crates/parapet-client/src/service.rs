//! Asynchronous risk service: the fetch and mutate operations.
//!
//! Stands in for a remote API. Both operations suspend the caller for a
//! configured latency before touching the store, so callers observe the
//! timing a network client would; the store itself is only ever locked for
//! the brief commit at the resumption point. Cancellation is unsupported:
//! once issued, an operation completes after its delay or not at all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use parapet_core::{RiskDraft, RiskRecord, RiskRegister};

/// Latency applied to fetch and mutate unless configured otherwise.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(800);

/// Failures surfaced by the service operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The fetch failed (only under an injected fault policy).
    #[error("error fetching risk data: {0}")]
    FetchFailed(String),

    /// A mutation was requested while another was still in flight.
    #[error("a mutation is already in flight")]
    MutationPending,

    /// The register lock was poisoned by a panicking holder.
    #[error("risk register lock poisoned")]
    LockPoisoned,
}

/// Remaining injected fetch failures. Default: never fail.
#[derive(Debug, Default)]
struct FaultState {
    failures_left: u32,
    message: String,
}

/// Shared handle to the register plus the simulated-latency policy.
///
/// Cheap to clone behind an [`Arc`]; all state is interior.
#[derive(Debug)]
pub struct RiskService {
    register: Arc<Mutex<RiskRegister>>,
    latency: Duration,
    fault: Mutex<FaultState>,
    fetches_run: AtomicU64,
}

impl RiskService {
    /// Service over `register` with the default 800 ms latency.
    #[must_use]
    pub fn new(register: Arc<Mutex<RiskRegister>>) -> Self {
        Self::with_latency(register, DEFAULT_LATENCY)
    }

    /// Service over `register` with an explicit latency.
    #[must_use]
    pub fn with_latency(register: Arc<Mutex<RiskRegister>>, latency: Duration) -> Self {
        Self {
            register,
            latency,
            fault: Mutex::new(FaultState::default()),
            fetches_run: AtomicU64::new(0),
        }
    }

    /// The configured simulated latency.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Number of fetches that have run to completion or failure.
    ///
    /// Instrumentation for the invalidation contract tests.
    #[must_use]
    pub fn fetches_run(&self) -> u64 {
        self.fetches_run.load(Ordering::SeqCst)
    }

    /// Make the next `count` fetches fail with `message`.
    ///
    /// The shipped defaults never fail; this exists so the query cache's
    /// error path can be exercised.
    pub fn inject_fetch_failures(&self, count: u32, message: &str) {
        if let Ok(mut fault) = self.fault.lock() {
            fault.failures_left = count;
            fault.message = message.to_string();
        }
    }

    /// Fetch an independent snapshot of the register.
    ///
    /// Suspends for the configured latency, then copies the store under its
    /// lock. Mutating the returned vector never affects the register.
    pub async fn fetch_risks(&self) -> Result<Vec<RiskRecord>, ServiceError> {
        debug!("fetching risks");
        sleep(self.latency).await;
        self.fetches_run.fetch_add(1, Ordering::SeqCst);

        {
            let mut fault = self.fault.lock().map_err(|_| ServiceError::LockPoisoned)?;
            if fault.failures_left > 0 {
                fault.failures_left -= 1;
                warn!(message = %fault.message, "injected fetch failure");
                return Err(ServiceError::FetchFailed(fault.message.clone()));
            }
        }

        let register = self.register.lock().map_err(|_| ServiceError::LockPoisoned)?;
        let snapshot = register.snapshot();
        debug!(records = snapshot.len(), "fetched risks");
        Ok(snapshot)
    }

    /// Append a record built from `draft` and return it.
    ///
    /// Suspends for the configured latency, then commits atomically under
    /// the register lock: the id is computed, the status forced to `Open`,
    /// and the store grows by exactly one element. There is no partial
    /// mutation to roll back.
    pub async fn add_risk(&self, draft: RiskDraft) -> Result<RiskRecord, ServiceError> {
        debug!(asset = %draft.asset, "adding risk");
        sleep(self.latency).await;

        let mut register = self.register.lock().map_err(|_| ServiceError::LockPoisoned)?;
        let record = register.append(draft);
        info!(id = record.id, "risk added");
        Ok(record)
    }
}
