use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter requested by a rendered visualization (e.g. a click on a bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFilterRequest {
    pub column: String,
    pub values: Vec<Value>,
    #[serde(default = "default_true")]
    pub merge: bool,
    #[serde(default = "default_true")]
    pub refresh: bool,
}

fn default_true() -> bool {
    true
}

impl AddFilterRequest {
    /// Creates a request that merges with existing filters and refreshes.
    #[must_use]
    pub fn new(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            column: column.into(),
            values,
            merge: true,
            refresh: true,
        }
    }

    #[must_use]
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    #[must_use]
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

pub type AddFilterHook = Box<dyn FnMut(&AddFilterRequest)>;
pub type SetControlValueHook = Box<dyn FnMut(&[Value])>;
pub type FilterMenuHook = Box<dyn FnMut(&str)>;

/// Capabilities forwarded from rendered visualizations to the host.
///
/// Every hook is optional; an unset hook makes the call a no-op.
#[derive(Default)]
pub struct RenderHooks {
    add_filter: Option<AddFilterHook>,
    set_control_value: Option<SetControlValueHook>,
    filter_menu_open: Option<FilterMenuHook>,
    filter_menu_close: Option<FilterMenuHook>,
}

impl RenderHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_add_filter(mut self, hook: impl FnMut(&AddFilterRequest) + 'static) -> Self {
        self.add_filter = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_set_control_value(mut self, hook: impl FnMut(&[Value]) + 'static) -> Self {
        self.set_control_value = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_filter_menu_open(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.filter_menu_open = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_filter_menu_close(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.filter_menu_close = Some(Box::new(hook));
        self
    }

    pub fn add_filter(&mut self, request: &AddFilterRequest) {
        if let Some(hook) = self.add_filter.as_mut() {
            hook(request);
        }
    }

    pub fn set_control_value(&mut self, args: &[Value]) {
        if let Some(hook) = self.set_control_value.as_mut() {
            hook(args);
        }
    }

    pub fn filter_menu_open(&mut self, column: &str) {
        if let Some(hook) = self.filter_menu_open.as_mut() {
            hook(column);
        }
    }

    pub fn filter_menu_close(&mut self, column: &str) {
        if let Some(hook) = self.filter_menu_close.as_mut() {
            hook(column);
        }
    }
}

impl std::fmt::Debug for RenderHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderHooks")
            .field("add_filter", &self.add_filter.is_some())
            .field("set_control_value", &self.set_control_value.is_some())
            .field("filter_menu_open", &self.filter_menu_open.is_some())
            .field("filter_menu_close", &self.filter_menu_close.is_some())
            .finish()
    }
}
