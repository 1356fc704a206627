use std::fmt;

use tracing::{debug, warn};

use crate::core::{AttemptId, ChartId, ChartStatus};
use crate::extensions::LifecycleEvent;
use crate::render::DrawingEngine;
use crate::telemetry::{TelemetryEvent, TelemetryEventKind};

use super::{CallbackOutcome, DropReason, LifecyclePhase, LifecycleRecord, RenderSupervisor};

impl<E: DrawingEngine> RenderSupervisor<E> {
    /// Success callback for `record`'s attempt.
    ///
    /// The status store is only signaled when its status is neither `loading`
    /// nor `rendered`. Telemetry is emitted only for attempts caused by new
    /// query results.
    pub fn on_success(&mut self, record: &LifecycleRecord) -> CallbackOutcome {
        self.complete_success(record.chart_id, record.attempt)
    }

    /// Failure callback for `record`'s attempt. Failures always reach the
    /// status store and are never retried here.
    pub fn on_failure(
        &mut self,
        record: &LifecycleRecord,
        error: &dyn fmt::Display,
        component_stack: Option<&str>,
    ) -> CallbackOutcome {
        self.complete_failure(record.chart_id, record.attempt, error, component_stack)
    }

    /// Same as [`Self::on_success`], addressed by the ids carried in a draw request.
    pub fn complete_success(&mut self, chart_id: ChartId, attempt: AttemptId) -> CallbackOutcome {
        let record = match self.settle(chart_id, attempt) {
            Ok(record) => record,
            Err(outcome) => return outcome,
        };

        // TODO: failure signals unconditionally; decide whether success should too.
        let status = self.status_store.snapshot(chart_id).status;
        let status_signaled = !matches!(
            status,
            Some(ChartStatus::Loading | ChartStatus::Rendered)
        );
        if status_signaled {
            self.status_store.chart_rendering_succeeded(chart_id);
        }

        let telemetry_emitted = record.result_change_triggered;
        if telemetry_emitted {
            let event = self.render_telemetry_event(&record, None);
            self.telemetry.log_event(&event);
        }

        self.set_phase(chart_id, LifecyclePhase::Rendered);
        self.emit_lifecycle_event(LifecycleEvent::Rendered {
            chart_id,
            attempt,
            status_signaled,
        });
        CallbackOutcome::Applied {
            status_signaled,
            telemetry_emitted,
        }
    }

    /// Same as [`Self::on_failure`], addressed by the ids carried in a draw request.
    pub fn complete_failure(
        &mut self,
        chart_id: ChartId,
        attempt: AttemptId,
        error: &dyn fmt::Display,
        component_stack: Option<&str>,
    ) -> CallbackOutcome {
        let record = match self.settle(chart_id, attempt) {
            Ok(record) => record,
            Err(outcome) => return outcome,
        };

        let error_text = error.to_string();
        warn!(%chart_id, %attempt, error = %error_text, "chart render failed");
        self.status_store
            .chart_rendering_failed(&error_text, chart_id, component_stack);

        let telemetry_emitted = record.result_change_triggered;
        if telemetry_emitted {
            let event = self.render_telemetry_event(&record, Some(error_text));
            self.telemetry.log_event(&event);
        }

        self.set_phase(chart_id, LifecyclePhase::Errored);
        self.emit_lifecycle_event(LifecycleEvent::Failed { chart_id, attempt });
        CallbackOutcome::Applied {
            status_signaled: true,
            telemetry_emitted,
        }
    }

    fn settle(
        &mut self,
        chart_id: ChartId,
        attempt: AttemptId,
    ) -> Result<LifecycleRecord, CallbackOutcome> {
        let settled = match self.charts.get_mut(&chart_id) {
            Some(state) => state.settle(attempt),
            None => Err(DropReason::UnknownChart),
        };
        settled.map_err(|reason| {
            debug!(%chart_id, %attempt, ?reason, "dropping render callback");
            self.emit_lifecycle_event(LifecycleEvent::CallbackDropped {
                chart_id,
                attempt,
                reason,
            });
            CallbackOutcome::Dropped(reason)
        })
    }

    fn set_phase(&mut self, chart_id: ChartId, phase: LifecyclePhase) {
        if let Some(state) = self.charts.get_mut(&chart_id) {
            state.phase = phase;
        }
    }

    fn render_telemetry_event(
        &self,
        record: &LifecycleRecord,
        error_detail: Option<String>,
    ) -> TelemetryEvent {
        TelemetryEvent {
            kind: TelemetryEventKind::Render,
            chart_id: record.chart_id,
            viz_type: record.viz_type.clone(),
            start_offset: record.started_at_ms,
            ts: self.clock.wall_clock_ms(),
            duration_ms: self.clock.now_ms() - record.started_at_ms,
            error: error_detail.is_some(),
            error_detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::{CallbackOutcome, DropReason, LifecyclePhase, RenderSupervisor};
    use crate::core::{
        ChartId, ChartStatus, InMemoryStatusStore, ManualClock, QueryResult, RenderInput, Viewport,
    };
    use crate::render::NullDrawingEngine;
    use crate::telemetry::RecordingTelemetrySink;

    struct Fixture {
        supervisor: RenderSupervisor<NullDrawingEngine>,
        store: Rc<RefCell<InMemoryStatusStore>>,
        sink: Rc<RefCell<RecordingTelemetrySink>>,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStatusStore::shared();
        let sink = RecordingTelemetrySink::shared();
        let clock = ManualClock::default();
        let supervisor = RenderSupervisor::new(NullDrawingEngine::default(), store.clone(), sink.clone())
            .with_clock(clock.clone());
        Fixture {
            supervisor,
            store,
            sink,
            clock,
        }
    }

    fn chart_input() -> RenderInput {
        RenderInput::new(ChartId::new(5), "line", Viewport::new(640, 480))
            .with_query_result(Arc::new(QueryResult::new(json!([{"x": 1}]))))
    }

    #[test]
    fn success_times_result_driven_attempt() {
        let mut fx = fixture();
        fx.store
            .borrow_mut()
            .set_status(ChartId::new(5), Some(ChartStatus::Success));
        fx.clock.set_ms(1_000.0);
        let record = fx.supervisor.begin_attempt(&chart_input());
        fx.clock.advance_ms(35.0);

        let outcome = fx.supervisor.on_success(&record);

        assert_eq!(
            outcome,
            CallbackOutcome::Applied {
                status_signaled: true,
                telemetry_emitted: true
            }
        );
        let sink = fx.sink.borrow();
        let event = sink.events().first().expect("telemetry event");
        assert_eq!(event.start_offset, 1_000.0);
        assert_eq!(event.duration_ms, 35.0);
        assert!(!event.error);
        assert_eq!(fx.supervisor.phase(ChartId::new(5)), LifecyclePhase::Rendered);
    }

    #[test]
    fn success_skips_signal_when_already_rendered() {
        let mut fx = fixture();
        fx.store
            .borrow_mut()
            .set_status(ChartId::new(5), Some(ChartStatus::Rendered));
        let record = fx.supervisor.begin_attempt(&chart_input());

        let outcome = fx.supervisor.on_success(&record);

        assert_eq!(
            outcome,
            CallbackOutcome::Applied {
                status_signaled: false,
                telemetry_emitted: true
            }
        );
        assert_eq!(
            fx.store
                .borrow()
                .entry(ChartId::new(5))
                .map(|entry| entry.succeeded_signals),
            Some(0)
        );
    }

    #[test]
    fn failure_reports_error_text_and_stack() {
        let mut fx = fixture();
        let record = fx.supervisor.begin_attempt(&chart_input());

        let outcome = fx
            .supervisor
            .on_failure(&record, &"TypeError: x is undefined", Some("at BoxPlot"));

        assert!(outcome.is_applied());
        let store = fx.store.borrow();
        let entry = store.entry(ChartId::new(5)).expect("entry");
        assert_eq!(entry.snapshot.status, Some(ChartStatus::Error));
        assert_eq!(entry.stack.as_deref(), Some("at BoxPlot"));
        let sink = fx.sink.borrow();
        let event = sink.events().first().expect("telemetry event");
        assert!(event.error);
        assert_eq!(event.error_detail.as_deref(), Some("TypeError: x is undefined"));
        assert_eq!(event.viz_type.as_str(), "line");
    }

    #[test]
    fn callback_for_forgotten_chart_is_dropped() {
        let mut fx = fixture();
        let record = fx.supervisor.begin_attempt(&chart_input());
        assert!(fx.supervisor.forget_chart(ChartId::new(5)));

        assert_eq!(
            fx.supervisor.on_success(&record),
            CallbackOutcome::Dropped(DropReason::UnknownChart)
        );
        assert!(fx.sink.borrow().events().is_empty());
    }
}
