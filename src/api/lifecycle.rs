use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{AttemptId, ChartId, QueryResult, VizType};

/// Transient record of one outstanding draw attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleRecord {
    pub chart_id: ChartId,
    pub attempt: AttemptId,
    pub viz_type: VizType,
    pub started_at_ms: f64,
    /// The attempt was caused by new query results rather than a cosmetic change.
    pub result_change_triggered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Idle,
    Attempting(AttemptId),
    Rendered,
    Errored,
}

/// Why a completion callback was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// A newer attempt began for the same chart.
    Superseded { latest: AttemptId },
    /// The attempt already reached a terminal outcome.
    AlreadySettled,
    /// The chart has no lifecycle state (never drawn or removed).
    UnknownChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackOutcome {
    Applied {
        status_signaled: bool,
        telemetry_emitted: bool,
    },
    Dropped(DropReason),
}

impl CallbackOutcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Per-chart lifecycle state owned by the supervisor.
#[derive(Debug, Clone)]
pub(super) struct ChartLifecycle {
    pub(super) latest_attempt: AttemptId,
    pub(super) active: Option<LifecycleRecord>,
    pub(super) phase: LifecyclePhase,
    pub(super) last_query_result: Option<Arc<QueryResult>>,
}

impl Default for ChartLifecycle {
    fn default() -> Self {
        Self {
            latest_attempt: AttemptId::new(0),
            active: None,
            phase: LifecyclePhase::Idle,
            last_query_result: None,
        }
    }
}

impl ChartLifecycle {
    /// Fresh state for a chart re-added after removal.
    pub(super) fn resuming_after(latest_attempt: AttemptId) -> Self {
        Self {
            latest_attempt,
            ..Self::default()
        }
    }

    /// Takes the outstanding record when `attempt` is current and unsettled.
    pub(super) fn settle(&mut self, attempt: AttemptId) -> Result<LifecycleRecord, DropReason> {
        if attempt != self.latest_attempt {
            return Err(DropReason::Superseded {
                latest: self.latest_attempt,
            });
        }
        match self.active.take() {
            Some(record) if record.attempt == attempt => Ok(record),
            other => {
                self.active = other;
                Err(DropReason::AlreadySettled)
            }
        }
    }
}
