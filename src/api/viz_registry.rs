use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::VizType;
use crate::error::{ChartError, ChartResult};
use crate::render::DrawEngineKind;

use super::MetricLabelRule;

/// Per-visualization-type override rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VizStrategy {
    /// Redraw on every update cycle regardless of input changes.
    #[serde(default)]
    pub always_redraw: bool,
    #[serde(default)]
    pub metric_label: Option<MetricLabelRule>,
    #[serde(default)]
    pub engine: DrawEngineKind,
}

impl VizStrategy {
    #[must_use]
    pub const fn always_redraw() -> Self {
        Self {
            always_redraw: true,
            metric_label: None,
            engine: DrawEngineKind::Plugin,
        }
    }

    #[must_use]
    pub const fn with_metric_label(mut self, rule: MetricLabelRule) -> Self {
        self.metric_label = Some(rule);
        self
    }

    #[must_use]
    pub const fn with_engine(mut self, engine: DrawEngineKind) -> Self {
        self.engine = engine;
        self
    }
}

/// Strategies keyed by visualization type tag.
///
/// Types without an entry use the default policy: change-driven redraw,
/// no metric derivation, plugin engine.
#[derive(Debug, Clone, PartialEq)]
pub struct VizRegistry {
    strategies: IndexMap<VizType, VizStrategy>,
}

impl VizRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: IndexMap::new(),
        }
    }

    /// Box-plot and histogram types that relabel their own axes while drawing.
    #[must_use]
    pub fn with_builtin_strategies() -> Self {
        let mut strategies = IndexMap::new();
        for (viz_type, strategy) in builtin_strategies() {
            strategies.insert(VizType::new(viz_type), strategy);
        }
        Self { strategies }
    }

    /// Registers a strategy for a type that has none yet.
    pub fn register(&mut self, viz_type: impl Into<VizType>, strategy: VizStrategy) -> ChartResult<()> {
        let viz_type = viz_type.into();
        if viz_type.is_empty() {
            return Err(ChartError::InvalidData(
                "strategy viz type must not be empty".to_owned(),
            ));
        }
        if self.strategies.contains_key(&viz_type) {
            return Err(ChartError::InvalidData(format!(
                "strategy for viz type `{viz_type}` is already registered"
            )));
        }
        self.strategies.insert(viz_type, strategy);
        Ok(())
    }

    /// Unregisters a strategy. Returns `true` when removed.
    pub fn unregister(&mut self, viz_type: &VizType) -> bool {
        self.strategies.shift_remove(viz_type).is_some()
    }

    #[must_use]
    pub fn strategy(&self, viz_type: &VizType) -> Option<&VizStrategy> {
        self.strategies.get(viz_type)
    }

    #[must_use]
    pub fn resolve(&self, viz_type: &VizType) -> VizStrategy {
        self.strategy(viz_type).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn requires_unconditional_redraw(&self, viz_type: &VizType) -> bool {
        self.strategy(viz_type)
            .is_some_and(|strategy| strategy.always_redraw)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VizType, &VizStrategy)> {
        self.strategies.iter()
    }
}

impl Default for VizRegistry {
    fn default() -> Self {
        Self::with_builtin_strategies()
    }
}

pub(super) fn builtin_strategies() -> [(&'static str, VizStrategy); 5] {
    [
        (
            "box_plot_run_comp",
            VizStrategy::always_redraw().with_metric_label(MetricLabelRule::RunComparison),
        ),
        (
            "box_plot_fin",
            VizStrategy::always_redraw().with_metric_label(MetricLabelRule::FinancialMetric),
        ),
        (
            "box_plot_fin_str",
            VizStrategy::always_redraw().with_metric_label(MetricLabelRule::FinancialByStrategy),
        ),
        (
            "box_plot_300_cap",
            VizStrategy::always_redraw().with_engine(DrawEngineKind::Options),
        ),
        (
            "spot_price_histogram",
            VizStrategy::always_redraw().with_engine(DrawEngineKind::Options),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{VizRegistry, VizStrategy};
    use crate::api::MetricLabelRule;
    use crate::core::VizType;
    use crate::error::ChartError;
    use crate::render::DrawEngineKind;

    #[test]
    fn builtin_registry_covers_box_plot_and_histogram_types() {
        let registry = VizRegistry::default();
        for tag in [
            "box_plot_run_comp",
            "box_plot_fin",
            "box_plot_fin_str",
            "box_plot_300_cap",
            "spot_price_histogram",
        ] {
            assert!(registry.requires_unconditional_redraw(&VizType::new(tag)), "{tag}");
        }
        assert!(!registry.requires_unconditional_redraw(&VizType::new("table")));
    }

    #[test]
    fn unknown_type_resolves_to_default_policy() {
        let strategy = VizRegistry::default().resolve(&VizType::new("big_number_total"));
        assert_eq!(strategy, VizStrategy::default());
        assert_eq!(strategy.engine, DrawEngineKind::Plugin);
    }

    #[test]
    fn duplicate_and_empty_registrations_are_rejected() {
        let mut registry = VizRegistry::default();
        let err = registry
            .register("box_plot_fin", VizStrategy::always_redraw())
            .expect_err("duplicate must fail");
        assert!(matches!(err, ChartError::InvalidData(_)));

        let err = registry
            .register("", VizStrategy::always_redraw())
            .expect_err("empty must fail");
        assert!(matches!(err, ChartError::InvalidData(_)));
    }

    #[test]
    fn registered_strategy_can_be_removed() {
        let mut registry = VizRegistry::empty();
        registry
            .register(
                "box_plot_custom",
                VizStrategy::always_redraw().with_metric_label(MetricLabelRule::FinancialMetric),
            )
            .expect("register");
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(&VizType::new("box_plot_custom")));
        assert!(!registry.unregister(&VizType::new("box_plot_custom")));
        assert!(registry.is_empty());
    }
}
