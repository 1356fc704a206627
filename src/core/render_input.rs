use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CacheBuster, ChartId, FormData, Viewport, VizType};

/// Query-result payload handed to the drawing engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self { data, error: None }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            data: Value::Null,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Annotation layers keyed by layer name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationData(pub Value);

/// Immutable snapshot of everything needed to draw one chart in one update cycle.
///
/// Payload fields are shared through `Arc` and compared by identity: producers
/// must allocate a new payload whenever its content changes.
#[derive(Debug, Clone)]
pub struct RenderInput {
    pub chart_id: ChartId,
    pub viz_type: VizType,
    pub viewport: Viewport,
    pub query_result: Option<Arc<QueryResult>>,
    pub annotation_data: Option<Arc<AnnotationData>>,
    pub datasource: Option<Arc<Value>>,
    pub form_data: Arc<FormData>,
    pub initial_values: Arc<FormData>,
    pub trigger_render: bool,
    pub cache_buster: Option<CacheBuster>,
}

impl RenderInput {
    #[must_use]
    pub fn new(chart_id: ChartId, viz_type: impl Into<VizType>, viewport: Viewport) -> Self {
        Self {
            chart_id,
            viz_type: viz_type.into(),
            viewport,
            query_result: None,
            annotation_data: None,
            datasource: None,
            form_data: Arc::new(FormData::new()),
            initial_values: Arc::new(FormData::new()),
            trigger_render: false,
            cache_buster: None,
        }
    }

    #[must_use]
    pub fn with_query_result(mut self, query_result: Arc<QueryResult>) -> Self {
        self.query_result = Some(query_result);
        self
    }

    #[must_use]
    pub fn with_annotation_data(mut self, annotation_data: Arc<AnnotationData>) -> Self {
        self.annotation_data = Some(annotation_data);
        self
    }

    #[must_use]
    pub fn with_datasource(mut self, datasource: Arc<Value>) -> Self {
        self.datasource = Some(datasource);
        self
    }

    #[must_use]
    pub fn with_form_data(mut self, form_data: Arc<FormData>) -> Self {
        self.form_data = form_data;
        self
    }

    #[must_use]
    pub fn with_initial_values(mut self, initial_values: Arc<FormData>) -> Self {
        self.initial_values = initial_values;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_trigger_render(mut self, trigger_render: bool) -> Self {
        self.trigger_render = trigger_render;
        self
    }

    #[must_use]
    pub fn with_cache_buster(mut self, cache_buster: CacheBuster) -> Self {
        self.cache_buster = Some(cache_buster);
        self
    }

    #[must_use]
    pub fn query_result_has_error(&self) -> bool {
        self.query_result
            .as_deref()
            .is_some_and(QueryResult::has_error)
    }
}

/// Identity comparison for optional shared payloads.
#[must_use]
pub fn same_payload<T>(left: &Option<Arc<T>>, right: &Option<Arc<T>>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => Arc::ptr_eq(left, right),
        (None, None) => true,
        _ => false,
    }
}
