use std::future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Timer-reset debounce: every `arm` pushes the deadline out again and
/// `fired` resolves once the deadline passes without another `arm`.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Pending forever while disarmed. Cancel-safe: dropping the future
    /// keeps the deadline.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => future::pending().await,
        }
    }
}
