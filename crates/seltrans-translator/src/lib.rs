pub mod http;
pub mod provider;

pub use http::HttpTranslator;
pub use provider::{ParseError, Provider, ProviderRequest};

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Network error: {0}")]
    NetworkError(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unexpected response: {0}")]
    ParseError(ParseError),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::NetworkError(e)
        }
    }
}

impl From<ParseError> for TranslateError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::RateLimited => TranslateError::RateLimitExceeded,
            ParseError::Rejected(details) => TranslateError::ApiError(details),
            other => TranslateError::ParseError(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_in_body_maps_to_rate_limit_error() {
        let err: TranslateError = ParseError::RateLimited.into();
        assert!(matches!(err, TranslateError::RateLimitExceeded));
    }

    #[test]
    fn shape_errors_stay_parse_errors() {
        let err: TranslateError = ParseError::UnexpectedShape("missing translation").into();
        assert!(matches!(err, TranslateError::ParseError(_)));
        assert_eq!(err.to_string(), "Unexpected response: missing translation");
    }
}
