//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! wallet session, contract dispatch, REST client produce:
//!     → logging.rs (structured log events, session_id correlation)
//!     → metrics.rs (counters via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated secrets
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
