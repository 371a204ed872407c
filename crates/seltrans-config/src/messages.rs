use serde::{Deserialize, Serialize};

fn default_button_label() -> String {
    "翻译".to_string()
}

fn default_error_prefix() -> String {
    "翻译出错：".to_string()
}

fn default_rate_limited() -> String {
    "超出API使用限制，请稍后再试".to_string()
}

fn default_failed() -> String {
    "翻译失败".to_string()
}

fn default_channel_failed() -> String {
    "翻译出错，请检查API设置".to_string()
}

/// User-facing strings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MessagesConfig {
    #[serde(default = "default_button_label")]
    pub button_label: String,
    /// Marker every gateway error string starts with
    #[serde(default = "default_error_prefix")]
    pub error_prefix: String,
    #[serde(default = "default_rate_limited")]
    pub rate_limited: String,
    #[serde(default = "default_failed")]
    pub failed: String,
    /// Shown when the gateway never replies
    #[serde(default = "default_channel_failed")]
    pub channel_failed: String,
}

impl MessagesConfig {
    pub fn error(&self, detail: &str) -> String {
        format!("{}{}", self.error_prefix, detail)
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            button_label: default_button_label(),
            error_prefix: default_error_prefix(),
            rate_limited: default_rate_limited(),
            failed: default_failed(),
            channel_failed: default_channel_failed(),
        }
    }
}
