use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::TranslateError;

/// Free-tier translation endpoints this crate knows how to call.
///
/// Each one has its own query shape and JSON response shape; everything
/// provider-specific lives behind [`Provider::request`] and
/// [`Provider::parse_provider_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `api.mymemory.translated.net`, answers `{"responseData": {"translatedText": ..}}`
    MyMemory,
    /// Google's `client=gtx` endpoint, answers nested arrays `[[["译文", "source", ..], ..], ..]`
    GoogleGtx,
    /// Lingva front-end, answers `{"translation": ..}`
    Lingva,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("provider reports rate limiting")]
    RateLimited,

    #[error("{0}")]
    Rejected(String),

    #[error("body is not JSON")]
    NotJson,

    #[error("{0}")]
    UnexpectedShape(&'static str),
}

/// A GET request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::MyMemory => "mymemory",
            Provider::GoogleGtx => "google",
            Provider::Lingva => "lingva",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::MyMemory => "https://api.mymemory.translated.net",
            Provider::GoogleGtx => "https://translate.googleapis.com",
            Provider::Lingva => "https://lingva.ml",
        }
    }

    /// Builds the request for one translation. Query values are escaped by
    /// the HTTP client; Lingva carries the text in the path, so it is
    /// escaped here.
    pub fn request(self, base_url: &str, text: &str, from: &str, to: &str) -> ProviderRequest {
        let base_url = base_url.trim_end_matches('/');
        match self {
            Provider::MyMemory => ProviderRequest {
                url: format!("{base_url}/get"),
                query: vec![
                    ("q", text.to_string()),
                    ("langpair", format!("{from}|{to}")),
                ],
            },
            Provider::GoogleGtx => ProviderRequest {
                url: format!("{base_url}/translate_a/single"),
                query: vec![
                    ("client", "gtx".to_string()),
                    ("sl", from.to_string()),
                    ("tl", to.to_string()),
                    ("dt", "t".to_string()),
                    ("q", text.to_string()),
                ],
            },
            Provider::Lingva => ProviderRequest {
                url: format!(
                    "{base_url}/api/v1/{}/{}/{}",
                    lingva_lang(from),
                    lingva_lang(to),
                    urlencoding::encode(text)
                ),
                query: vec![],
            },
        }
    }

    /// Extracts the translated string from a provider's JSON body
    pub fn parse_provider_response(self, raw: &Value) -> Result<String, ParseError> {
        match self {
            Provider::MyMemory => parse_mymemory(raw),
            Provider::GoogleGtx => parse_gtx(raw),
            Provider::Lingva => parse_lingva(raw),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mymemory" => Ok(Provider::MyMemory),
            "google" | "gtx" => Ok(Provider::GoogleGtx),
            "lingva" => Ok(Provider::Lingva),
            other => Err(TranslateError::UnsupportedProvider(other.to_string())),
        }
    }
}

// Lingva uses bare `zh` for simplified Chinese
fn lingva_lang(code: &str) -> &str {
    match code {
        "zh-CN" | "zh-cn" | "zh-Hans" => "zh",
        "zh-TW" | "zh-tw" | "zh-Hant" => "zh_HANT",
        other => other,
    }
}

// `responseStatus` arrives as a number or as a numeric string
fn status_code(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_mymemory(raw: &Value) -> Result<String, ParseError> {
    let status = raw.get("responseStatus").and_then(status_code);
    if status == Some(429) {
        return Err(ParseError::RateLimited);
    }

    let translated = raw
        .pointer("/responseData/translatedText")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty());

    match (status, translated) {
        (None | Some(200), Some(text)) => Ok(text.to_string()),
        _ => {
            let details = raw
                .get("responseDetails")
                .and_then(Value::as_str)
                .filter(|d| !d.is_empty());
            match details {
                Some(details) => Err(ParseError::Rejected(details.to_string())),
                None => Err(ParseError::UnexpectedShape("missing responseData.translatedText")),
            }
        }
    }
}

fn parse_gtx(raw: &Value) -> Result<String, ParseError> {
    let segments = raw
        .get(0)
        .and_then(Value::as_array)
        .ok_or(ParseError::UnexpectedShape("missing sentence array"))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ParseError::UnexpectedShape("no translated segments"));
    }
    Ok(text)
}

fn parse_lingva(raw: &Value) -> Result<String, ParseError> {
    if let Some(error) = raw.get("error").and_then(Value::as_str) {
        return Err(ParseError::Rejected(error.to_string()));
    }
    raw.get("translation")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(ParseError::UnexpectedShape("missing translation"))
}
