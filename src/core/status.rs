use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ChartId;

/// Chart status as tracked by the external status store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStatus {
    Idle,
    Loading,
    Success,
    Error,
    Rendered,
}

impl ChartStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
            Self::Rendered => "rendered",
        }
    }

    /// Statuses in which query results may be displayed.
    #[must_use]
    pub const fn is_displayable(self) -> bool {
        matches!(self, Self::Success | Self::Rendered)
    }
}

/// Read-only view of one chart's entry in the status store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: Option<ChartStatus>,
    #[serde(default)]
    pub refresh_overlay_visible: bool,
    #[serde(default)]
    pub alert: Option<String>,
}

impl StatusSnapshot {
    #[must_use]
    pub fn with_status(status: ChartStatus) -> Self {
        Self {
            status: Some(status),
            refresh_overlay_visible: false,
            alert: None,
        }
    }

    /// Whether a draw may start: no overlay, no alert, and a known non-loading status.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !self.refresh_overlay_visible
            && self.alert.is_none()
            && !matches!(self.status, None | Some(ChartStatus::Loading))
    }
}

/// Externally owned per-chart status store.
///
/// The lifecycle core only reads snapshots and requests the two terminal
/// transitions; every chart id is independent.
pub trait StatusStore {
    fn snapshot(&self, chart_id: ChartId) -> StatusSnapshot;
    fn chart_rendering_succeeded(&mut self, chart_id: ChartId);
    fn chart_rendering_failed(&mut self, error: &str, chart_id: ChartId, stack: Option<&str>);
}

impl<S: StatusStore + ?Sized> StatusStore for Rc<RefCell<S>> {
    fn snapshot(&self, chart_id: ChartId) -> StatusSnapshot {
        self.borrow().snapshot(chart_id)
    }

    fn chart_rendering_succeeded(&mut self, chart_id: ChartId) {
        self.borrow_mut().chart_rendering_succeeded(chart_id);
    }

    fn chart_rendering_failed(&mut self, error: &str, chart_id: ChartId, stack: Option<&str>) {
        self.borrow_mut()
            .chart_rendering_failed(error, chart_id, stack);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusEntry {
    pub snapshot: StatusSnapshot,
    pub stack: Option<String>,
    pub succeeded_signals: usize,
    pub failed_signals: usize,
}

/// In-process status store for hosts without their own state container.
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    entries: HashMap<ChartId, StatusEntry>,
}

impl InMemoryStatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn set_status(&mut self, chart_id: ChartId, status: Option<ChartStatus>) {
        self.entries.entry(chart_id).or_default().snapshot.status = status;
    }

    pub fn set_refresh_overlay_visible(&mut self, chart_id: ChartId, visible: bool) {
        self.entries
            .entry(chart_id)
            .or_default()
            .snapshot
            .refresh_overlay_visible = visible;
    }

    pub fn set_alert(&mut self, chart_id: ChartId, alert: Option<String>) {
        self.entries.entry(chart_id).or_default().snapshot.alert = alert;
    }

    #[must_use]
    pub fn entry(&self, chart_id: ChartId) -> Option<&StatusEntry> {
        self.entries.get(&chart_id)
    }

    #[must_use]
    pub fn status(&self, chart_id: ChartId) -> Option<ChartStatus> {
        self.entries
            .get(&chart_id)
            .and_then(|entry| entry.snapshot.status)
    }
}

impl StatusStore for InMemoryStatusStore {
    fn snapshot(&self, chart_id: ChartId) -> StatusSnapshot {
        self.entries
            .get(&chart_id)
            .map(|entry| entry.snapshot.clone())
            .unwrap_or_default()
    }

    fn chart_rendering_succeeded(&mut self, chart_id: ChartId) {
        let entry = self.entries.entry(chart_id).or_default();
        entry.snapshot.status = Some(ChartStatus::Rendered);
        entry.succeeded_signals += 1;
        debug!(%chart_id, "chart rendering succeeded");
    }

    fn chart_rendering_failed(&mut self, error: &str, chart_id: ChartId, stack: Option<&str>) {
        let entry = self.entries.entry(chart_id).or_default();
        entry.snapshot.status = Some(ChartStatus::Error);
        entry.snapshot.alert = Some(error.to_owned());
        entry.stack = stack.map(str::to_owned);
        entry.failed_signals += 1;
        debug!(%chart_id, error, "chart rendering failed");
    }
}
