use serde::{Deserialize, Serialize};

/// Request sent from the content side to the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuntimeMessage {
    Translate {
        text: String,
    },
    /// Any action this gateway does not serve
    #[serde(other)]
    Unknown,
}

impl RuntimeMessage {
    pub fn translate(text: impl Into<String>) -> Self {
        RuntimeMessage::Translate { text: text.into() }
    }
}

/// Reply to a [`RuntimeMessage::Translate`].
///
/// `translation` holds either the translated text or a prefixed,
/// user-facing error string. The content side never sees typed errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_request_wire_shape() {
        let msg = RuntimeMessage::translate("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"action": "translate", "text": "hello"}));
    }

    #[test]
    fn unknown_action_is_tolerated() {
        let msg: RuntimeMessage =
            serde_json::from_str(r#"{"action": "detect", "text": "hello"}"#).unwrap();
        assert_eq!(msg, RuntimeMessage::Unknown);
    }
}
