//! parapet-core library.
//!
//! Domain model and pure projections for the parapet compliance dashboard:
//! the risk record model, the in-memory register, substring filtering, CSV
//! export, dashboard summaries, and project configuration.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` taxonomies for domain failures, `anyhow::Result`
//!   at I/O boundaries (config loading).
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod register;
pub mod summary;

pub use model::{RiskDraft, RiskRecord, RiskStatus, Severity};
pub use register::RiskRegister;
