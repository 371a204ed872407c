use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "mymemory".to_string()
}

fn default_from_lang() -> String {
    "en".to_string()
}

fn default_to_lang() -> String {
    "zh-CN".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    /// One of `mymemory`, `google`, `lingva`
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    /// Overrides the provider's public endpoint
    #[serde(default)]
    pub api_url: Option<String>,
    /// HTTP timeout for one provider call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
            api_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}
