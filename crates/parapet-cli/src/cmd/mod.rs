//! CLI command modules and the shared composition root.

pub mod add;
pub mod completions;
pub mod export;
pub mod list;
pub mod summary;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use parapet_client::{QueryState, RiskQuery, RiskService};
use parapet_core::config::{self, ProjectConfig};
use parapet_core::{RiskRecord, RiskRegister};

/// Composition root shared by command handlers and the TUI.
///
/// Owns the seeded register, the service over it, the query cache, and a
/// current-thread tokio runtime that drives the async operations: one
/// logical thread of control with cooperative suspension, exactly as the
/// data layer is modeled. No module-level state anywhere.
pub struct Session {
    query: Arc<RiskQuery>,
    runtime: tokio::runtime::Runtime,
    config: ProjectConfig,
}

impl Session {
    /// Build the session for `project_root`: load `parapet.toml` (defaults
    /// when absent), seed the register, and stand up the service and cache.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = config::load_project_config(project_root)?;
        let register = Arc::new(Mutex::new(RiskRegister::seeded()));
        let service = Arc::new(RiskService::with_latency(
            register,
            Duration::from_millis(config.service.latency_ms),
        ));
        let query = Arc::new(RiskQuery::new(service));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to build tokio runtime")?;
        Ok(Self {
            query,
            runtime,
            config,
        })
    }

    /// The loaded project configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The query cache over the session's register.
    #[must_use]
    pub const fn query(&self) -> &Arc<RiskQuery> {
        &self.query
    }

    /// The runtime driving the async operations.
    #[must_use]
    pub const fn runtime(&self) -> &tokio::runtime::Runtime {
        &self.runtime
    }

    /// Fetch a settled snapshot through the cache (latency included).
    pub fn fetch_snapshot(&self) -> Result<Vec<RiskRecord>> {
        self.runtime.block_on(self.query.refresh());
        match self.query.state() {
            QueryState::Success(records) => Ok(records),
            QueryState::Error(message) => bail!("{message}"),
            QueryState::Loading => bail!("fetch did not settle"),
        }
    }
}
