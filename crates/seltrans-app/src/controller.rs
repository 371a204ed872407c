use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kanal::{AsyncReceiver, AsyncSender};
use seltrans_gateway::{Gateway, MessageReceiver, MessageSender};
use seltrans_types::HostEvent;
use seltrans_watcher::Watcher;
use tokio::io::AsyncBufRead;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::io::host_io;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub host_events: (AsyncSender<HostEvent>, AsyncReceiver<HostEvent>),
    pub runtime: (MessageSender, Option<MessageReceiver>),
}

impl ChannelSet {
    pub fn new(runtime_capacity: usize) -> Self {
        let (runtime_tx, runtime_rx) = seltrans_gateway::channel::channel(runtime_capacity);
        Self {
            host_events: kanal::bounded_async(256), // pointer/scroll bursts
            runtime: (runtime_tx, Some(runtime_rx)),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, runtime_capacity: usize) -> Self {
        Self {
            channels: ChannelSet::new(runtime_capacity),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawns the gateway, the watcher and the host input pump
    pub async fn spawn_tasks<R>(
        &mut self,
        gateway: Arc<Gateway>,
        input: R,
        linger: Duration,
    ) -> anyhow::Result<JoinSet<anyhow::Result<()>>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let runtime_rx = self
            .channels
            .runtime
            .1
            .take()
            .context("tasks already spawned")?;

        let (watcher_config, messages) = {
            let config = self.state.config.read().await;
            (config.watcher.clone(), config.messages.clone())
        };

        let mut tasks = JoinSet::new();

        // Background side
        let gateway_cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            seltrans_gateway::serve(gateway, runtime_rx, gateway_cancel).await?;
            Ok(())
        });

        // Content side
        let watcher = Watcher::new(
            self.state.page.clone(),
            self.channels.runtime.0.clone(),
            watcher_config,
            messages,
        );
        tasks.spawn(watcher.run(
            self.channels.host_events.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Host page input
        tasks.spawn(host_io(
            self.state.clone(),
            input,
            linger,
            self.cancel_token.child_token(),
            self.channels.host_events.0.clone(),
        ));

        Ok(tasks)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
