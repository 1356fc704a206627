use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const COLOR_SCHEME_KEY: &str = "color_scheme";
pub const METRICS_KEY: &str = "metrics";
pub const VIZ_TYPE_KEY: &str = "viz_type";

/// Form configuration of a chart: option name to option value, in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    options: IndexMap<String, Value>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.options.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Returns the option as a string slice when it holds a JSON string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn color_scheme(&self) -> Option<&Value> {
        self.get(COLOR_SCHEME_KEY)
    }

    #[must_use]
    pub fn viz_type(&self) -> Option<&str> {
        self.get_str(VIZ_TYPE_KEY)
    }

    #[must_use]
    pub fn metrics(&self) -> Option<&Value> {
        self.get(METRICS_KEY)
    }

    /// Shallow copy with `metrics` replaced by a single label.
    #[must_use]
    pub fn with_metric_label(&self, label: impl Into<String>) -> Self {
        let mut derived = self.clone();
        derived.insert(METRICS_KEY, Value::Array(vec![Value::String(label.into())]));
        derived
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}
