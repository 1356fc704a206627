mod chart_class_name;
mod controller_config;
mod json_contract;
mod lifecycle;
mod metric_label;
mod observer_registry;
mod redraw_topics;
mod render_controller;
mod render_hooks;
mod render_outcome;
mod render_supervisor;
mod update_gate;
mod viz_registry;

pub use chart_class_name::{
    ChartClassNamer, DEFAULT_LEGACY_CLASS_PREFIX, chart_class_name, snake_case,
};
pub use controller_config::{ChartRenderConfig, VizStrategyEntry};
pub use json_contract::{TELEMETRY_EVENT_JSON_SCHEMA_V1, TelemetryEventJsonContractV1};
pub use lifecycle::{CallbackOutcome, DropReason, LifecyclePhase, LifecycleRecord};
pub use metric_label::{
    DATA_TYPE_PICKER, FIN_METRIC_PICKER, FIN_STR_METRIC_PICKER, MetricLabelRule, derive_form_data,
};
pub use redraw_topics::{RedrawTopic, RedrawTopics};
pub use render_controller::{ChartRenderController, SkipReason, SubmitOutcome};
pub use render_hooks::{
    AddFilterHook, AddFilterRequest, FilterMenuHook, RenderHooks, SetControlValueHook,
};
pub use render_supervisor::RenderSupervisor;
pub use update_gate::{
    GateSnapshot, RedrawDecision, changed_topics, evaluate_redraw, results_ready, should_redraw,
};
pub use viz_registry::{VizRegistry, VizStrategy};
