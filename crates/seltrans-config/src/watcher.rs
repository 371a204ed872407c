use seltrans_types::Size;
use serde::{Deserialize, Serialize};

/// What a scroll does to visible controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPolicy {
    /// Follow the selection while it is still active
    #[default]
    Reposition,
    /// Always tear both controls down
    Dismiss,
}

fn default_selection_debounce_ms() -> u64 {
    150
}

fn default_scroll_debounce_ms() -> u64 {
    100
}

fn default_trigger_size() -> Size {
    Size::new(60.0, 30.0)
}

fn default_popup_size() -> Size {
    Size::new(300.0, 100.0)
}

fn default_gap() -> f64 {
    4.0
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WatcherConfig {
    #[serde(default = "default_selection_debounce_ms")]
    pub selection_debounce_ms: u64,
    #[serde(default = "default_scroll_debounce_ms")]
    pub scroll_debounce_ms: u64,
    #[serde(default)]
    pub scroll_policy: ScrollPolicy,
    /// Footprint used for clamping the trigger
    #[serde(default = "default_trigger_size")]
    pub trigger_size: Size,
    /// Footprint used for clamping the popup
    #[serde(default = "default_popup_size")]
    pub popup_size: Size,
    /// Distance between the selection and a control
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Upper bound on waiting for a gateway reply
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            selection_debounce_ms: default_selection_debounce_ms(),
            scroll_debounce_ms: default_scroll_debounce_ms(),
            scroll_policy: ScrollPolicy::default(),
            trigger_size: default_trigger_size(),
            popup_size: default_popup_size(),
            gap: default_gap(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}
