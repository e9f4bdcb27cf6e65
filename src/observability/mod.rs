//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!     → events.rs (named telemetry events with properties)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level configured per deployment
//! - Metrics are cheap (atomic increments)
//! - Telemetry event recording is a capability trait, no-op-safe

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventRecorder, NoopRecorder, TracingRecorder};
