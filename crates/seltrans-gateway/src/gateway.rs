use std::sync::Arc;

use seltrans_config::messages::MessagesConfig;
use seltrans_translator::{LanguageCode, TranslateError, Translator};
use seltrans_types::{RuntimeMessage, TranslateResponse};
use tokio_util::sync::CancellationToken;

use crate::channel::{ChannelError, MessageReceiver, ReplyHandle};

/// Outcome of handing a message to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The reply will be sent once the translation settles
    Pending,
    /// Not ours; the reply handle was dropped
    Ignored,
}

/// Background side: turns translate requests into one reply string each
pub struct Gateway {
    translator: Arc<dyn Translator>,
    from_lang: LanguageCode,
    to_lang: LanguageCode,
    messages: MessagesConfig,
}

impl Gateway {
    pub fn new(
        translator: Arc<dyn Translator>,
        from_lang: LanguageCode,
        to_lang: LanguageCode,
        messages: MessagesConfig,
    ) -> Self {
        Self {
            translator,
            from_lang,
            to_lang,
            messages,
        }
    }

    /// Translated text, or a prefixed user-facing error string
    pub async fn translate(&self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        match self
            .translator
            .translate(text, self.from_lang.clone(), self.to_lang.clone())
            .await
        {
            Ok(translation) => {
                tracing::debug!(
                    provider = %translation.provider,
                    "Translated {} chars",
                    text.chars().count()
                );
                translation.text
            }
            Err(e) => self.describe(&e),
        }
    }

    fn describe(&self, err: &TranslateError) -> String {
        match err {
            TranslateError::RateLimitExceeded => {
                tracing::warn!("Translation API error: {err}");
                self.messages.error(&self.messages.rate_limited)
            }
            TranslateError::ApiError(details) => {
                tracing::warn!("Translation API error: {err}");
                self.messages.error(details)
            }
            TranslateError::ParseError(parse) => {
                tracing::warn!(
                    provider = %self.translator.metadata().name,
                    "Unparsable provider response: {parse}"
                );
                self.messages.error(&self.messages.failed)
            }
            _ => {
                tracing::error!("Translation API error: {err}");
                self.messages.error(&self.messages.failed)
            }
        }
    }

    /// Handles one runtime message. Translate requests take the reply
    /// handle into a spawned task before anything is awaited, so the reply
    /// slot stays open until the provider call settles.
    pub fn on_message(self: &Arc<Self>, message: RuntimeMessage, reply: ReplyHandle) -> Dispatch {
        match message {
            RuntimeMessage::Translate { text } => {
                let gateway = Arc::clone(self);
                tokio::spawn(async move {
                    let mut reply = reply;
                    let outcome = tokio::select! {
                        translation = gateway.translate(&text) => Some(translation),
                        _ = reply.closed() => None,
                    };

                    match outcome {
                        Some(translation) => {
                            if !reply.send(TranslateResponse { translation }) {
                                tracing::debug!("Requester left before the reply was sent");
                            }
                        }
                        None => tracing::debug!("Requester left, abandoning provider call"),
                    }
                });
                Dispatch::Pending
            }
            RuntimeMessage::Unknown => {
                tracing::debug!("Ignoring message with unknown action");
                drop(reply);
                Dispatch::Ignored
            }
        }
    }
}

/// Serves the runtime channel until cancelled or every sender is gone
pub async fn serve(
    gateway: Arc<Gateway>,
    rx: MessageReceiver,
    cancel: CancellationToken,
) -> Result<(), ChannelError> {
    tracing::info!(
        provider = %gateway.translator.metadata().name,
        "Gateway listening for messages"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Gateway stopping");
                return Ok(());
            }
            envelope = rx.recv() => {
                let envelope = envelope?;
                let dispatch = gateway.on_message(envelope.message, envelope.reply);
                tracing::trace!(?dispatch, "Message dispatched");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use seltrans_translator::{ParseError, ProviderMetadata, Translation};

    use super::*;
    use crate::channel;

    type Reply = fn(&str) -> Result<String, TranslateError>;

    struct StubTranslator {
        reply: Reply,
        delay: Duration,
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl StubTranslator {
        fn new(reply: Reply) -> Arc<Self> {
            Self::slow(reply, Duration::ZERO)
        }

        fn slow(reply: Reply, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply,
                delay,
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate(
            &self,
            text: &str,
            from: LanguageCode,
            to: LanguageCode,
        ) -> Result<Translation, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            (self.reply)(text).map(|text| Translation {
                text,
                from,
                to,
                provider: "stub".into(),
            })
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "stub".into(),
                requires_api_key: false,
                free_tier_available: true,
            }
        }
    }

    fn gateway(translator: Arc<StubTranslator>) -> Arc<Gateway> {
        Arc::new(Gateway::new(
            translator,
            "en".into(),
            "zh-CN".into(),
            MessagesConfig::default(),
        ))
    }

    #[tokio::test]
    async fn success_returns_translated_text() {
        let gw = gateway(StubTranslator::new(|_| Ok("你好".into())));
        assert_eq!(gw.translate("hello").await, "你好");
    }

    #[tokio::test]
    async fn rate_limit_gets_its_own_message() {
        let gw = gateway(StubTranslator::new(|_| Err(ParseError::RateLimited.into())));
        let messages = MessagesConfig::default();

        let reply = gw.translate("hello").await;
        assert!(reply.starts_with(&messages.error_prefix));
        assert!(reply.contains(&messages.rate_limited));
        assert!(!reply.contains(&messages.failed));
    }

    #[tokio::test]
    async fn parse_and_transport_errors_are_generic() {
        let messages = MessagesConfig::default();
        let expected = messages.error(&messages.failed);

        let gw = gateway(StubTranslator::new(|_| {
            Err(ParseError::UnexpectedShape("missing translation").into())
        }));
        assert_eq!(gw.translate("hello").await, expected);

        let gw = gateway(StubTranslator::new(|_| Err(TranslateError::HttpStatus(502))));
        assert_eq!(gw.translate("hello").await, expected);

        let gw = gateway(StubTranslator::new(|_| Err(TranslateError::Timeout)));
        assert_eq!(gw.translate("hello").await, expected);
    }

    #[tokio::test]
    async fn provider_details_are_surfaced() {
        let gw = gateway(StubTranslator::new(|_| {
            Err(TranslateError::ApiError("INVALID LANGUAGE PAIR".into()))
        }));
        assert_eq!(gw.translate("hello").await, "翻译出错：INVALID LANGUAGE PAIR");
    }

    #[tokio::test]
    async fn blank_text_skips_the_provider() {
        let stub = StubTranslator::new(|_| Ok("x".into()));
        let gw = gateway(stub.clone());

        assert_eq!(gw.translate("   \n").await, "");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn serve_replies_over_channel() {
        let stub = StubTranslator::new(|text| Ok(format!("译:{text}")));
        let (tx, rx) = channel::channel(8);
        let cancel = CancellationToken::new();
        let server = tokio::spawn(serve(gateway(stub), rx, cancel.clone()));

        let response = tx
            .send_message(RuntimeMessage::translate("  hello "))
            .await
            .unwrap();
        assert_eq!(response.translation, "译:hello");

        cancel.cancel();
        assert_eq!(server.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn unknown_action_gets_no_reply() {
        let stub = StubTranslator::new(|_| Ok("x".into()));
        let (tx, rx) = channel::channel(8);
        tokio::spawn(serve(gateway(stub.clone()), rx, CancellationToken::new()));

        let err = tx.send_message(RuntimeMessage::Unknown).await.unwrap_err();
        assert_eq!(err, ChannelError::NoResponse);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_request_cancels_provider_call() {
        let stub = StubTranslator::slow(|_| Ok("late".into()), Duration::from_secs(60));
        let (tx, rx) = channel::channel(8);
        tokio::spawn(serve(gateway(stub.clone()), rx, CancellationToken::new()));

        let waited = tokio::time::timeout(
            Duration::from_secs(1),
            tx.send_message(RuntimeMessage::translate("hello")),
        )
        .await;
        assert!(waited.is_err());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn serve_ends_when_senders_drop() {
        let stub = StubTranslator::new(|_| Ok("x".into()));
        let (tx, rx) = channel::channel(8);
        let server = tokio::spawn(serve(gateway(stub), rx, CancellationToken::new()));

        drop(tx);
        assert_eq!(server.await.unwrap(), Err(ChannelError::Disconnected));
    }
}
