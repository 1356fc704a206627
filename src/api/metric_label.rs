use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::FormData;

pub const DATA_TYPE_PICKER: &str = "data_type_picker";
pub const FIN_METRIC_PICKER: &str = "fin_metric_picker";
pub const FIN_STR_METRIC_PICKER: &str = "fin_str_metric_picker";

const RUN_COMPARISON_LABELS: [(&str, &str); 3] = [
    ("ForwardPrice", "Forward Price ($/MWh)"),
    ("SpotPrice", "Spot Price ($/MWh)"),
    ("LGCPrice", "LGC Forward Price ($/certificate)"),
];

/// Y-axis metric label derivation for box-plot families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricLabelRule {
    /// Label keyed by the selected data type; unknown types label as themselves.
    RunComparison,
    /// Label is the picked financial metric.
    FinancialMetric,
    /// `%` for ROI metrics, `$` for everything else.
    FinancialByStrategy,
}

impl MetricLabelRule {
    #[must_use]
    pub const fn source_option(self) -> &'static str {
        match self {
            Self::RunComparison => DATA_TYPE_PICKER,
            Self::FinancialMetric => FIN_METRIC_PICKER,
            Self::FinancialByStrategy => FIN_STR_METRIC_PICKER,
        }
    }

    /// Returns `None` when the source option is absent or null.
    #[must_use]
    pub fn label(self, form_data: &FormData) -> Option<String> {
        let picked = match form_data.get(self.source_option()) {
            None | Some(Value::Null) => return None,
            Some(value) => option_text(value),
        };
        let label = match self {
            Self::RunComparison => RUN_COMPARISON_LABELS
                .iter()
                .find(|(data_type, _)| *data_type == picked)
                .map_or(picked, |(_, label)| (*label).to_owned()),
            Self::FinancialMetric => picked,
            Self::FinancialByStrategy => {
                if picked.contains("ROI") {
                    "%".to_owned()
                } else {
                    "$".to_owned()
                }
            }
        };
        Some(label)
    }
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Form data for the drawing engine after applying an optional label rule.
///
/// The caller's form data is shared untouched when nothing is derived; otherwise
/// a shallow copy with only `metrics` replaced is returned.
#[must_use]
pub fn derive_form_data(form_data: &Arc<FormData>, rule: Option<MetricLabelRule>) -> Arc<FormData> {
    match rule.and_then(|rule| rule.label(form_data)) {
        Some(label) => Arc::new(form_data.with_metric_label(label)),
        None => Arc::clone(form_data),
    }
}
