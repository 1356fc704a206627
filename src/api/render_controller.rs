use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AttemptId, ChartId, ChartStatus, Clock, RenderInput, StatusSnapshot, StatusStore};
use crate::error::ChartResult;
use crate::extensions::LifecycleEvent;
use crate::render::DrawingEngine;
use crate::telemetry::TelemetrySink;

use super::{
    CallbackOutcome, ChartRenderConfig, GateSnapshot, LifecycleRecord, RedrawDecision,
    RenderHooks, RenderSupervisor, evaluate_redraw,
};

/// Why an authorized redraw did not start an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RefreshOverlay,
    Loading,
    NullStatus,
    Alert,
}

impl SkipReason {
    #[must_use]
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Option<Self> {
        if snapshot.refresh_overlay_visible {
            Some(Self::RefreshOverlay)
        } else if snapshot.alert.is_some() {
            Some(Self::Alert)
        } else {
            match snapshot.status {
                None => Some(Self::NullStatus),
                Some(ChartStatus::Loading) => Some(Self::Loading),
                Some(_) => None,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Started(LifecycleRecord),
    Withheld(RedrawDecision),
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
struct SeenInput {
    input: RenderInput,
    status: StatusSnapshot,
}

/// Entry point for hosts: pushes input snapshots through the update gate and
/// starts supervised attempts for authorized redraws.
pub struct ChartRenderController<E: DrawingEngine> {
    supervisor: RenderSupervisor<E>,
    previous: HashMap<ChartId, SeenInput>,
}

impl<E: DrawingEngine> ChartRenderController<E> {
    #[must_use]
    pub fn new(
        engine: E,
        status_store: impl StatusStore + 'static,
        telemetry: impl TelemetrySink + 'static,
    ) -> Self {
        Self::from_supervisor(RenderSupervisor::new(engine, status_store, telemetry))
    }

    #[must_use]
    pub fn from_supervisor(supervisor: RenderSupervisor<E>) -> Self {
        Self {
            supervisor,
            previous: HashMap::new(),
        }
    }

    pub fn from_config(
        config: &ChartRenderConfig,
        engine: E,
        status_store: impl StatusStore + 'static,
        telemetry: impl TelemetrySink + 'static,
    ) -> ChartResult<Self> {
        let supervisor = RenderSupervisor::new(engine, status_store, telemetry)
            .with_registry(config.build_registry()?)
            .with_class_namer(config.class_namer());
        Ok(Self::from_supervisor(supervisor))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.supervisor = self.supervisor.with_clock(clock);
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: RenderHooks) -> Self {
        self.supervisor = self.supervisor.with_hooks(hooks);
        self
    }

    #[must_use]
    pub fn supervisor(&self) -> &RenderSupervisor<E> {
        &self.supervisor
    }

    pub fn supervisor_mut(&mut self) -> &mut RenderSupervisor<E> {
        &mut self.supervisor
    }

    /// Evaluates `input` against the chart's previous input and, when a redraw
    /// is authorized and the status allows drawing, begins a new attempt.
    ///
    /// The first input of a chart has nothing to compare against and is drawn
    /// whenever the status allows it. `input` always becomes the new previous
    /// input, drawn or not.
    pub fn submit(&mut self, input: RenderInput) -> SubmitOutcome {
        let chart_id = input.chart_id;
        let status = self.supervisor.status_snapshot(chart_id);

        let decision = self.previous.get(&chart_id).map(|prev| {
            evaluate_redraw(
                GateSnapshot::new(&prev.input, &prev.status),
                GateSnapshot::new(&input, &status),
                self.supervisor.registry(),
            )
        });

        let outcome = match decision {
            Some(decision) if !decision.is_redraw() => {
                debug!(%chart_id, ?decision, "redraw withheld");
                self.supervisor
                    .emit_lifecycle_event(LifecycleEvent::RedrawWithheld { chart_id, decision });
                SubmitOutcome::Withheld(decision)
            }
            _ => match SkipReason::from_snapshot(&status) {
                Some(reason) => {
                    debug!(%chart_id, ?reason, "render skipped");
                    SubmitOutcome::Skipped(reason)
                }
                None => SubmitOutcome::Started(self.supervisor.begin_attempt(&input)),
            },
        };

        self.previous.insert(chart_id, SeenInput { input, status });
        outcome
    }

    pub fn complete_success(&mut self, chart_id: ChartId, attempt: AttemptId) -> CallbackOutcome {
        self.supervisor.complete_success(chart_id, attempt)
    }

    pub fn complete_failure(
        &mut self,
        chart_id: ChartId,
        attempt: AttemptId,
        error: &dyn fmt::Display,
        component_stack: Option<&str>,
    ) -> CallbackOutcome {
        self.supervisor
            .complete_failure(chart_id, attempt, error, component_stack)
    }

    /// Forgets a chart entirely, e.g. when it leaves the dashboard.
    pub fn remove_chart(&mut self, chart_id: ChartId) -> bool {
        let had_input = self.previous.remove(&chart_id).is_some();
        self.supervisor.forget_chart(chart_id) || had_input
    }
}
