//! parapet-client library.
//!
//! The asynchronous half of parapet: a service that simulates network
//! latency over the in-memory register, and a single-key query cache that
//! exposes loading/error/success states to the view and re-runs the fetch
//! after every successful mutation.
//!
//! Everything here is designed to run on a current-thread tokio runtime
//! driven by the composition root: one logical thread of control with
//! cooperative suspension, no parallelism required.

pub mod query;
pub mod service;

pub use query::{QueryState, RiskQuery};
pub use service::{DEFAULT_LATENCY, RiskService, ServiceError};
