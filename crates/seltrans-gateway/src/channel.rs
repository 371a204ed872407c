use kanal::{AsyncReceiver, AsyncSender};
use seltrans_types::{RuntimeMessage, TranslateResponse};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("message channel disconnected")]
    Disconnected,

    /// The receiving side dropped the reply handle without answering
    #[error("no response to message")]
    NoResponse,
}

/// One request travelling to the gateway with its reply slot
pub struct Envelope {
    pub message: RuntimeMessage,
    pub reply: ReplyHandle,
}

/// Answers exactly one message. Dropping it unanswered tells the sender
/// there will be no response.
pub struct ReplyHandle(oneshot::Sender<TranslateResponse>);

impl ReplyHandle {
    /// Returns false when the requester stopped waiting
    pub fn send(self, response: TranslateResponse) -> bool {
        self.0.send(response).is_ok()
    }

    /// Resolves once the requester stops waiting
    pub async fn closed(&mut self) {
        self.0.closed().await
    }
}

/// Content-side end of the runtime channel
#[derive(Clone)]
pub struct MessageSender {
    tx: AsyncSender<Envelope>,
}

/// Gateway-side end of the runtime channel
pub struct MessageReceiver {
    rx: AsyncReceiver<Envelope>,
}

pub fn channel(capacity: usize) -> (MessageSender, MessageReceiver) {
    let (tx, rx) = kanal::bounded_async(capacity);
    (MessageSender { tx }, MessageReceiver { rx })
}

impl MessageSender {
    /// Sends a message and waits for its single reply
    pub async fn send_message(
        &self,
        message: RuntimeMessage,
    ) -> Result<TranslateResponse, ChannelError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            message,
            reply: ReplyHandle(reply_tx),
        };

        self.tx
            .send(envelope)
            .await
            .map_err(|_| ChannelError::Disconnected)?;

        reply_rx.await.map_err(|_| ChannelError::NoResponse)
    }
}

impl MessageReceiver {
    pub async fn recv(&self) -> Result<Envelope, ChannelError> {
        self.rx.recv().await.map_err(|_| ChannelError::Disconnected)
    }
}
