use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{AnnotationData, AttemptId, ChartId, FormData, QueryResult, Viewport, VizType};
use crate::error::{ChartError, ChartResult};

/// Which drawing engine family handles a visualization type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawEngineKind {
    /// Registered chart plugin receiving form data and hooks.
    #[default]
    Plugin,
    /// Option-driven engine built directly from the query result.
    Options,
}

/// Fully resolved configuration handed to a drawing engine for one attempt.
#[derive(Debug, Clone)]
pub struct DrawRequest {
    pub chart_id: ChartId,
    pub attempt: AttemptId,
    pub element_id: String,
    pub class_name: String,
    pub viz_type: VizType,
    pub engine: DrawEngineKind,
    pub viewport: Viewport,
    pub query_result: Option<Arc<QueryResult>>,
    pub annotation_data: Option<Arc<AnnotationData>>,
    pub datasource: Option<Arc<Value>>,
    pub initial_values: Arc<FormData>,
    /// Form data after per-type derivations; never the caller's instance when derived.
    pub form_data: Arc<FormData>,
}

impl DrawRequest {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.viz_type.is_empty() {
            return Err(ChartError::InvalidData(
                "draw request viz type must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
