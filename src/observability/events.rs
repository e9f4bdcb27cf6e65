//! Telemetry event recording capability.
//!
//! Replaces an ad-hoc optional logger parameter with an explicit,
//! no-op-safe interface: callers always hold a recorder and never branch
//! on its presence.

/// Capability for recording named telemetry events with properties.
pub trait EventRecorder: Send + Sync {
    fn record_event(&self, name: &str, properties: &[(&str, &str)]);
}

/// Recorder that forwards events to the tracing pipeline.
pub struct TracingRecorder;

impl EventRecorder for TracingRecorder {
    fn record_event(&self, name: &str, properties: &[(&str, &str)]) {
        tracing::info!(target: "telemetry", event = name, properties = ?properties);
    }
}

/// Recorder that drops everything.
pub struct NoopRecorder;

impl EventRecorder for NoopRecorder {
    fn record_event(&self, _name: &str, _properties: &[(&str, &str)]) {}
}
