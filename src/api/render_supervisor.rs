use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{
    AttemptId, ChartId, Clock, RenderInput, StatusSnapshot, StatusStore, SystemClock, VizType,
    same_payload,
};
use crate::extensions::{LifecycleEvent, LifecycleObserver};
use crate::render::{DrawRequest, DrawingEngine};
use crate::telemetry::TelemetrySink;

use super::lifecycle::ChartLifecycle;
use super::{
    AddFilterRequest, ChartClassNamer, LifecyclePhase, LifecycleRecord, RenderHooks, VizRegistry,
    derive_form_data,
};

/// Owns the lifecycle of draw attempts for any number of charts.
///
/// Each chart id has its own attempt counter. Beginning an attempt while an
/// earlier one is outstanding supersedes it: the earlier attempt's callback is
/// dropped whenever it arrives. There is no timeout; an engine that never
/// reports back leaves the chart attempting.
pub struct RenderSupervisor<E: DrawingEngine> {
    pub(super) engine: E,
    pub(super) status_store: Box<dyn StatusStore>,
    pub(super) telemetry: Box<dyn TelemetrySink>,
    pub(super) clock: Box<dyn Clock>,
    pub(super) hooks: RenderHooks,
    pub(super) registry: VizRegistry,
    pub(super) class_namer: ChartClassNamer,
    pub(super) observers: Vec<Box<dyn LifecycleObserver>>,
    pub(super) charts: HashMap<ChartId, ChartLifecycle>,
    /// Last attempt id of removed charts, so a re-added chart keeps counting upward.
    retired_attempts: HashMap<ChartId, AttemptId>,
}

impl<E: DrawingEngine> RenderSupervisor<E> {
    #[must_use]
    pub fn new(
        engine: E,
        status_store: impl StatusStore + 'static,
        telemetry: impl TelemetrySink + 'static,
    ) -> Self {
        Self {
            engine,
            status_store: Box::new(status_store),
            telemetry: Box::new(telemetry),
            clock: Box::new(SystemClock::new()),
            hooks: RenderHooks::default(),
            registry: VizRegistry::default(),
            class_namer: ChartClassNamer::default(),
            observers: Vec::new(),
            charts: HashMap::new(),
            retired_attempts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: VizRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_class_namer(mut self, class_namer: ChartClassNamer) -> Self {
        self.class_namer = class_namer;
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: RenderHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &VizRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut VizRegistry {
        &mut self.registry
    }

    pub fn hooks_mut(&mut self) -> &mut RenderHooks {
        &mut self.hooks
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub fn status_snapshot(&self, chart_id: ChartId) -> StatusSnapshot {
        self.status_store.snapshot(chart_id)
    }

    #[must_use]
    pub fn phase(&self, chart_id: ChartId) -> LifecyclePhase {
        self.charts
            .get(&chart_id)
            .map_or(LifecyclePhase::Idle, |state| state.phase)
    }

    #[must_use]
    pub fn active_attempt(&self, chart_id: ChartId) -> Option<&LifecycleRecord> {
        self.charts
            .get(&chart_id)
            .and_then(|state| state.active.as_ref())
    }

    #[must_use]
    pub fn latest_attempt(&self, chart_id: ChartId) -> Option<AttemptId> {
        self.charts.get(&chart_id).map(|state| state.latest_attempt)
    }

    /// Drops the lifecycle state for a chart. Late callbacks become unknown-chart
    /// drops, and superseded drops once the chart is drawn again: its attempt
    /// counter resumes after the last attempt begun before removal.
    pub fn forget_chart(&mut self, chart_id: ChartId) -> bool {
        let Some(state) = self.charts.remove(&chart_id) else {
            return false;
        };
        self.retired_attempts.insert(chart_id, state.latest_attempt);
        true
    }

    /// Starts a new attempt and hands the resolved request to the drawing engine.
    ///
    /// Callers must only invoke this after the update gate authorized a redraw
    /// and the chart's status allows drawing. If the engine refuses to start,
    /// the attempt fails immediately through the regular failure path.
    pub fn begin_attempt(&mut self, input: &RenderInput) -> LifecycleRecord {
        let started_at_ms = self.clock.now_ms();
        let record = {
            let retired = &mut self.retired_attempts;
            let state = self.charts.entry(input.chart_id).or_insert_with(|| {
                retired
                    .remove(&input.chart_id)
                    .map_or_else(ChartLifecycle::default, ChartLifecycle::resuming_after)
            });
            if let Some(previous) = state.active.take() {
                debug!(
                    chart_id = %input.chart_id,
                    attempt = %previous.attempt,
                    "superseding outstanding render attempt"
                );
            }
            let attempt = state.latest_attempt.next();
            let record = LifecycleRecord {
                chart_id: input.chart_id,
                attempt,
                viz_type: input.viz_type.clone(),
                started_at_ms,
                result_change_triggered: !same_payload(
                    &state.last_query_result,
                    &input.query_result,
                ),
            };
            state.latest_attempt = attempt;
            state.active = Some(record.clone());
            state.phase = LifecyclePhase::Attempting(attempt);
            state.last_query_result = input.query_result.clone();
            record
        };

        self.emit_lifecycle_event(LifecycleEvent::AttemptBegun {
            chart_id: record.chart_id,
            attempt: record.attempt,
            result_change_triggered: record.result_change_triggered,
        });

        let request = self.build_draw_request(input, record.attempt);
        if let Err(err) = self.engine.begin_draw(request) {
            warn!(
                chart_id = %record.chart_id,
                attempt = %record.attempt,
                error = %err,
                "drawing engine refused to start"
            );
            self.on_failure(&record, &err, None);
        }
        record
    }

    /// Resolves per-type derivations and packages the input for the engine.
    #[must_use]
    pub fn build_draw_request(&self, input: &RenderInput, attempt: AttemptId) -> DrawRequest {
        let form_viz_type = input
            .form_data
            .viz_type()
            .map_or_else(|| input.viz_type.clone(), VizType::new);
        let strategy = self.registry.resolve(&form_viz_type);

        DrawRequest {
            chart_id: input.chart_id,
            attempt,
            element_id: input.chart_id.element_id(),
            class_name: self.class_namer.class_name(&input.viz_type),
            viz_type: input.viz_type.clone(),
            engine: strategy.engine,
            viewport: input.viewport,
            query_result: input.query_result.clone(),
            annotation_data: input.annotation_data.clone(),
            datasource: input.datasource.clone(),
            initial_values: Arc::clone(&input.initial_values),
            form_data: derive_form_data(&input.form_data, strategy.metric_label),
        }
    }

    pub fn on_add_filter(&mut self, request: AddFilterRequest) {
        self.hooks.add_filter(&request);
    }

    pub fn on_set_control_value(&mut self, args: &[Value]) {
        self.hooks.set_control_value(args);
    }

    pub fn on_filter_menu_open(&mut self, column: &str) {
        self.hooks.filter_menu_open(column);
    }

    pub fn on_filter_menu_close(&mut self, column: &str) {
        self.hooks.filter_menu_close(column);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use serde_json::json;

    use super::RenderSupervisor;
    use crate::api::{AddFilterRequest, LifecyclePhase, RenderHooks};
    use crate::core::{
        ChartId, FormData, InMemoryStatusStore, ManualClock, QueryResult, RenderInput, Viewport,
    };
    use crate::render::{DrawEngineKind, NullDrawingEngine};
    use crate::telemetry::NullTelemetrySink;

    fn supervisor() -> RenderSupervisor<NullDrawingEngine> {
        RenderSupervisor::new(
            NullDrawingEngine::default(),
            InMemoryStatusStore::new(),
            NullTelemetrySink,
        )
        .with_clock(ManualClock::default())
    }

    #[test]
    fn first_attempt_with_results_counts_as_result_change() {
        let mut supervisor = supervisor();
        let input = RenderInput::new(ChartId::new(1), "line", Viewport::new(300, 200))
            .with_query_result(Arc::new(QueryResult::new(json!([]))));

        let record = supervisor.begin_attempt(&input);

        assert!(record.result_change_triggered);
        assert_eq!(
            supervisor.phase(ChartId::new(1)),
            LifecyclePhase::Attempting(record.attempt)
        );
    }

    #[test]
    fn same_results_on_next_attempt_is_cosmetic() {
        let mut supervisor = supervisor();
        let input = RenderInput::new(ChartId::new(1), "line", Viewport::new(300, 200))
            .with_query_result(Arc::new(QueryResult::new(json!([]))));

        supervisor.begin_attempt(&input);
        let resized = input.clone().with_viewport(Viewport::new(600, 200));
        let record = supervisor.begin_attempt(&resized);

        assert!(!record.result_change_triggered);
    }

    #[test]
    fn forgotten_chart_resumes_attempt_counter() {
        let mut supervisor = supervisor();
        let input = RenderInput::new(ChartId::new(2), "line", Viewport::new(300, 200));

        let before = supervisor.begin_attempt(&input);
        assert!(supervisor.forget_chart(ChartId::new(2)));
        assert!(!supervisor.forget_chart(ChartId::new(2)));
        let after = supervisor.begin_attempt(&input);

        assert!(after.attempt > before.attempt);
        assert_eq!(supervisor.latest_attempt(ChartId::new(2)), Some(after.attempt));
    }

    #[test]
    fn draw_request_routes_options_engine_and_derives_metric() {
        let supervisor = supervisor();
        let form = Arc::new(
            FormData::new()
                .with_option("viz_type", "box_plot_fin_str")
                .with_option("fin_str_metric_picker", "ROI (5yr)"),
        );
        let input = RenderInput::new(ChartId::new(9), "box_plot_fin_str", Viewport::new(300, 200))
            .with_form_data(form.clone());

        let request = supervisor.build_draw_request(&input, crate::core::AttemptId::new(1));

        assert_eq!(request.engine, DrawEngineKind::Plugin);
        assert_eq!(request.element_id, "chart-id-9");
        assert_eq!(request.form_data.metrics(), Some(&json!(["%"])));
        assert_eq!(form.metrics(), None);

        let histogram = RenderInput::new(ChartId::new(9), "spot_price_histogram", Viewport::new(1, 1));
        let request = supervisor.build_draw_request(&histogram, crate::core::AttemptId::new(2));
        assert_eq!(request.engine, DrawEngineKind::Options);
    }

    #[test]
    fn add_filter_passthrough_reaches_hook_unchanged() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut supervisor = supervisor().with_hooks(
            RenderHooks::new().with_add_filter(move |request| sink.borrow_mut().push(request.clone())),
        );

        let request = AddFilterRequest::new("region", vec![json!("QLD")]).with_refresh(false);
        supervisor.on_add_filter(request.clone());

        assert_eq!(*seen.borrow(), vec![request]);
    }

    #[test]
    fn zero_viewport_fails_attempt_immediately() {
        let store = InMemoryStatusStore::shared();
        let mut supervisor = RenderSupervisor::new(
            NullDrawingEngine::default(),
            store.clone(),
            NullTelemetrySink,
        );
        let input = RenderInput::new(ChartId::new(4), "line", Viewport::new(0, 200));

        supervisor.begin_attempt(&input);

        assert_eq!(supervisor.phase(ChartId::new(4)), LifecyclePhase::Errored);
        assert!(supervisor.active_attempt(ChartId::new(4)).is_none());
        let store = store.borrow();
        let entry = store.entry(ChartId::new(4)).expect("entry");
        assert_eq!(entry.failed_signals, 1);
        assert!(
            entry
                .snapshot
                .alert
                .as_deref()
                .is_some_and(|alert| alert.contains("invalid viewport"))
        );
    }
}
