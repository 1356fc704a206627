use serde::{Deserialize, Serialize};

use crate::api::{DropReason, RedrawDecision};
use crate::core::{AttemptId, ChartId};

/// Lifecycle event stream exposed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    RedrawWithheld {
        chart_id: ChartId,
        decision: RedrawDecision,
    },
    AttemptBegun {
        chart_id: ChartId,
        attempt: AttemptId,
        result_change_triggered: bool,
    },
    Rendered {
        chart_id: ChartId,
        attempt: AttemptId,
        status_signaled: bool,
    },
    Failed {
        chart_id: ChartId,
        attempt: AttemptId,
    },
    CallbackDropped {
        chart_id: ChartId,
        attempt: AttemptId,
        reason: DropReason,
    },
}

/// Read-only hook notified of every lifecycle transition.
///
/// Observers cannot influence the outcome; they exist for diagnostics and
/// host-side bookkeeping.
pub trait LifecycleObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: LifecycleEvent);
}
