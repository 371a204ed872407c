use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::provider::{ParseError, Provider};
use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

/// One GET per translation against a free-tier [`Provider`]
#[derive(Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    provider: Provider,
    base_url: String,
}

impl HttpTranslator {
    pub fn new(
        provider: Provider,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            provider,
            base_url: base_url.unwrap_or_else(|| provider.default_base_url().to_string()),
        })
    }

    /// Performs the request and returns the raw JSON body
    pub async fn fetch_translation(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Value, TranslateError> {
        let request = self.provider.request(&self.base_url, text, from, to);
        tracing::debug!(provider = %self.provider, url = %request.url, "Sending translation request");

        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(TranslateError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(provider = %self.provider, "Response is not JSON: {e}");
            TranslateError::from(ParseError::NotJson)
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let raw = self.fetch_translation(text, &from, &to).await?;
        let translated = self.provider.parse_provider_response(&raw)?;

        Ok(Translation {
            text: translated,
            from,
            to,
            provider: self.provider.name().to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: self.provider.name().to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;

    /// Answers a single HTTP request with a canned response and hands back
    /// the request line it saw.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let head = String::from_utf8_lossy(&buf);
            let request_line = head.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{addr}"), rx)
    }

    fn translator(provider: Provider, base_url: String) -> HttpTranslator {
        HttpTranslator::new(provider, Some(base_url), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn mymemory_round_trip() {
        let (url, seen) = serve_once(
            "200 OK",
            r#"{"responseData":{"translatedText":"你好"},"responseStatus":200}"#,
        )
        .await;

        let result = translator(Provider::MyMemory, url)
            .translate("hello world", "en".into(), "zh-CN".into())
            .await
            .unwrap();

        assert_eq!(result.text, "你好");
        assert_eq!(result.provider, "mymemory");

        let request_line = seen.await.unwrap();
        assert!(
            request_line.starts_with("GET /get?q=hello+world&langpair=en%7Czh-CN"),
            "{request_line}"
        );
    }

    #[tokio::test]
    async fn http_429_is_rate_limit() {
        let (url, _seen) = serve_once("429 Too Many Requests", "{}").await;

        let err = translator(Provider::GoogleGtx, url)
            .translate("hello", "en".into(), "zh-CN".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn server_error_is_http_status() {
        let (url, _seen) = serve_once("503 Service Unavailable", "{}").await;

        let err = translator(Provider::Lingva, url)
            .translate("hello", "en".into(), "zh-CN".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn html_body_is_parse_error() {
        let (url, _seen) = serve_once("200 OK", "<html>captcha</html>").await;

        let err = translator(Provider::GoogleGtx, url)
            .translate("hello", "en".into(), "zh-CN".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::ParseError(ParseError::NotJson)));
    }
}
