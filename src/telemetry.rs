//! Render telemetry events, sinks, and tracing setup.
//!
//! Tracing setup stays explicit and opt-in: consumers can either call
//! `init_default_tracing` or wire their own `tracing` subscriber and filters.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{ChartId, VizType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryEventKind {
    Render,
}

impl TelemetryEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Render => "render",
        }
    }
}

/// Timing and outcome record of one finished attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub kind: TelemetryEventKind,
    #[serde(rename = "slice_id")]
    pub chart_id: ChartId,
    pub viz_type: VizType,
    /// Monotonic milliseconds at which the attempt began.
    pub start_offset: f64,
    /// Unix epoch milliseconds at which the attempt finished.
    pub ts: i64,
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    #[serde(rename = "has_err", default)]
    pub error: bool,
    #[serde(rename = "error_details", default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// Destination for telemetry events.
pub trait TelemetrySink {
    fn log_event(&mut self, event: &TelemetryEvent);
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Rc<RefCell<S>> {
    fn log_event(&mut self, event: &TelemetryEvent) {
        self.borrow_mut().log_event(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn log_event(&mut self, _event: &TelemetryEvent) {}
}

/// Forwards events to the `tracing` pipeline at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn log_event(&mut self, event: &TelemetryEvent) {
        info!(
            kind = event.kind.as_str(),
            chart_id = %event.chart_id,
            viz_type = %event.viz_type,
            start_offset = event.start_offset,
            ts = event.ts,
            duration_ms = event.duration_ms,
            has_err = event.error,
            error_details = event.error_detail.as_deref(),
            "chart render telemetry"
        );
    }
}

/// Keeps every event in memory; used by tests and diagnostics tooling.
#[derive(Debug, Default, Clone)]
pub struct RecordingTelemetrySink {
    events: Vec<TelemetryEvent>,
}

impl RecordingTelemetrySink {
    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    #[must_use]
    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut self.events)
    }
}

impl TelemetrySink for RecordingTelemetrySink {
    fn log_event(&mut self, event: &TelemetryEvent) {
        self.events.push(event.clone());
    }
}

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
