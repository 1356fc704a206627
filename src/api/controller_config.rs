use serde::{Deserialize, Serialize};

use crate::core::VizType;
use crate::error::{ChartError, ChartResult};

use super::chart_class_name::DEFAULT_LEGACY_CLASS_PREFIX;
use super::viz_registry::builtin_strategies;
use super::{ChartClassNamer, VizRegistry, VizStrategy};

/// One strategy row of the serialized configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizStrategyEntry {
    pub viz_type: VizType,
    #[serde(flatten)]
    pub strategy: VizStrategy,
}

/// Public controller bootstrap configuration.
///
/// This type is serializable so host applications can ship per-deployment
/// visualization rules without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRenderConfig {
    #[serde(default = "default_legacy_class_prefix")]
    pub legacy_class_prefix: String,
    #[serde(default = "default_legacy_prefixed_viz_types")]
    pub legacy_prefixed_viz_types: Vec<String>,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<VizStrategyEntry>,
}

impl Default for ChartRenderConfig {
    fn default() -> Self {
        Self {
            legacy_class_prefix: default_legacy_class_prefix(),
            legacy_prefixed_viz_types: default_legacy_prefixed_viz_types(),
            strategies: default_strategies(),
        }
    }
}

impl ChartRenderConfig {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse render config: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize render config: {e}"))
        })
    }

    /// Builds the strategy registry; duplicate or empty viz types are rejected.
    pub fn build_registry(&self) -> ChartResult<VizRegistry> {
        let mut registry = VizRegistry::empty();
        for entry in &self.strategies {
            registry.register(entry.viz_type.clone(), entry.strategy)?;
        }
        Ok(registry)
    }

    #[must_use]
    pub fn class_namer(&self) -> ChartClassNamer {
        ChartClassNamer::new(
            self.legacy_class_prefix.clone(),
            self.legacy_prefixed_viz_types.clone(),
        )
    }
}

fn default_legacy_class_prefix() -> String {
    DEFAULT_LEGACY_CLASS_PREFIX.to_owned()
}

fn default_legacy_prefixed_viz_types() -> Vec<String> {
    vec!["table".to_owned()]
}

fn default_strategies() -> Vec<VizStrategyEntry> {
    builtin_strategies()
        .into_iter()
        .map(|(viz_type, strategy)| VizStrategyEntry {
            viz_type: VizType::new(viz_type),
            strategy,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ChartRenderConfig;
    use crate::api::{MetricLabelRule, VizRegistry};
    use crate::core::VizType;
    use crate::error::ChartError;
    use crate::render::DrawEngineKind;

    #[test]
    fn empty_json_uses_defaults() {
        let config = ChartRenderConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, ChartRenderConfig::default());
        assert_eq!(config.build_registry().expect("registry"), VizRegistry::default());
    }

    #[test]
    fn custom_strategies_replace_builtins() {
        let config = ChartRenderConfig::from_json_str(
            r#"{
                "strategies": [
                    {"viz_type": "box_plot_custom", "always_redraw": true,
                     "metric_label": "financial_metric", "engine": "options"}
                ]
            }"#,
        )
        .expect("parse");

        let registry = config.build_registry().expect("registry");
        assert_eq!(registry.len(), 1);
        let strategy = registry
            .strategy(&VizType::new("box_plot_custom"))
            .expect("strategy");
        assert!(strategy.always_redraw);
        assert_eq!(strategy.metric_label, Some(MetricLabelRule::FinancialMetric));
        assert_eq!(strategy.engine, DrawEngineKind::Options);
    }

    #[test]
    fn duplicate_strategy_rows_fail_registry_build() {
        let config = ChartRenderConfig::from_json_str(
            r#"{"strategies": [{"viz_type": "a"}, {"viz_type": "a"}]}"#,
        )
        .expect("parse");
        assert!(matches!(
            config.build_registry(),
            Err(ChartError::InvalidData(_))
        ));
    }

    #[test]
    fn malformed_json_is_invalid_data() {
        assert!(matches!(
            ChartRenderConfig::from_json_str("{"),
            Err(ChartError::InvalidData(_))
        ));
    }

    #[test]
    fn config_round_trips_through_pretty_json() {
        let config = ChartRenderConfig::default();
        let json = config.to_json_pretty().expect("serialize");
        assert_eq!(ChartRenderConfig::from_json_str(&json).expect("parse"), config);
    }
}
