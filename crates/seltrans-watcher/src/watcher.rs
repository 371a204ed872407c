use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use seltrans_config::messages::MessagesConfig;
use seltrans_config::watcher::{ScrollPolicy, WatcherConfig};
use seltrans_gateway::MessageSender;
use seltrans_types::{ControlKind, ElementId, HostEvent, RuntimeMessage, Selection};
use tokio_util::sync::CancellationToken;

use crate::debounce::Debounce;
use crate::layout::{popup_position, trigger_position};
use crate::state::{TriggerState, UiState};
use crate::surface::Surface;

/// Reply for one trigger click, tagged with the generation that asked
#[derive(Debug)]
struct Completion {
    generation: u64,
    trigger: ElementId,
    translation: String,
}

/// Content side: turns host events into at most one trigger and one popup
pub struct Watcher<S: Surface> {
    surface: S,
    state: UiState,
    config: WatcherConfig,
    messages: MessagesConfig,
    runtime: MessageSender,
    selection_debounce: Debounce,
    scroll_debounce: Debounce,
    completion_tx: AsyncSender<Completion>,
    completion_rx: AsyncReceiver<Completion>,
}

impl<S: Surface> Watcher<S> {
    pub fn new(
        surface: S,
        runtime: MessageSender,
        config: WatcherConfig,
        messages: MessagesConfig,
    ) -> Self {
        let (completion_tx, completion_rx) = kanal::unbounded_async();

        Self {
            surface,
            state: UiState::new(),
            selection_debounce: Debounce::new(Duration::from_millis(config.selection_debounce_ms)),
            scroll_debounce: Debounce::new(Duration::from_millis(config.scroll_debounce_ms)),
            config,
            messages,
            runtime,
            completion_tx,
            completion_rx,
        }
    }

    /// Processes host events until the channel closes or `cancel` fires
    pub async fn run(
        mut self,
        events: AsyncReceiver<HostEvent>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Watcher started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Watcher stopping");
                    break;
                }
                event = events.recv() => {
                    match event {
                        Ok(event) => self.handle_event(event),
                        Err(_) => {
                            tracing::warn!("Host event channel closed");
                            break;
                        }
                    }
                }
                completion = self.completion_rx.recv() => {
                    // The watcher holds a sender, so this never closes
                    if let Ok(completion) = completion {
                        self.on_completion(completion);
                    }
                }
                _ = self.selection_debounce.fired() => self.on_selection_settled(),
                _ = self.scroll_debounce.fired() => self.on_scroll_settled(),
            }
        }

        self.teardown();
        Ok(())
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        tracing::trace!(?event, "Host event");
        match event {
            HostEvent::PointerUp { target } => self.on_pointer_up(target),
            HostEvent::Click { target } => self.on_click(target),
            HostEvent::Scroll => self.scroll_debounce.arm(),
            HostEvent::Resize => self.reclamp(),
        }
    }

    fn on_pointer_up(&mut self, target: Option<ElementId>) {
        // Releasing the mouse over our own controls is not a new selection
        if self.state.owns(target) {
            return;
        }
        self.selection_debounce.arm();
    }

    fn on_click(&mut self, target: Option<ElementId>) {
        match target {
            Some(id) if self.state.trigger_id() == Some(id) => self.on_trigger_click(),
            Some(id) if self.state.popup == Some(id) => {}
            _ => self.teardown(),
        }
    }

    fn current_selection(&self) -> Option<Selection> {
        self.surface.selection().and_then(|selection| {
            let text = selection.text.trim();
            if text.is_empty() {
                None
            } else {
                Some(Selection {
                    text: text.to_string(),
                    rect: selection.rect,
                })
            }
        })
    }

    fn on_selection_settled(&mut self) {
        let Some(selection) = self.current_selection() else {
            self.teardown();
            return;
        };

        self.teardown();
        let at = trigger_position(
            selection.rect,
            self.surface.viewport(),
            self.config.trigger_size,
            self.config.gap,
        );
        let id = self
            .surface
            .mount(ControlKind::Trigger, &self.messages.button_label, at);

        tracing::debug!(
            generation = self.state.generation(),
            chars = selection.text.chars().count(),
            "Showing trigger"
        );
        self.state.trigger = Some(TriggerState {
            id,
            text: selection.text,
            rect: selection.rect,
            translating: false,
        });
    }

    fn on_trigger_click(&mut self) {
        let generation = self.state.generation();
        let cancel = self.state.cancel_token();
        let Some(trigger) = self.state.trigger.as_mut() else {
            return;
        };

        if trigger.translating {
            tracing::debug!("Translation already in flight for this trigger");
            return;
        }
        trigger.translating = true;

        let message = RuntimeMessage::translate(trigger.text.clone());
        let trigger_id = trigger.id;
        let runtime = self.runtime.clone();
        let completion_tx = self.completion_tx.clone();
        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        let channel_failed = self.messages.channel_failed.clone();

        tracing::debug!(generation, "Requesting translation");
        tokio::spawn(async move {
            let request = tokio::time::timeout(timeout, runtime.send_message(message));
            let translation = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(generation, "Translation request cancelled");
                    return;
                }
                result = request => match result {
                    Ok(Ok(response)) => response.translation,
                    Ok(Err(e)) => {
                        tracing::error!("Translation error: {e}");
                        channel_failed
                    }
                    Err(_) => {
                        tracing::warn!(?timeout, "Translation request timed out");
                        channel_failed
                    }
                },
            };

            let completion = Completion {
                generation,
                trigger: trigger_id,
                translation,
            };
            if completion_tx.send(completion).await.is_err() {
                tracing::debug!("Watcher gone before translation completed");
            }
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        if completion.generation != self.state.generation() {
            tracing::debug!(
                stale = completion.generation,
                current = self.state.generation(),
                "Discarding stale translation"
            );
            return;
        }

        let Some(trigger) = self.state.trigger.as_mut() else {
            return;
        };
        if trigger.id != completion.trigger {
            return;
        }
        trigger.translating = false;
        let rect = trigger.rect;

        if let Some(popup) = self.state.popup.take() {
            self.release(popup);
        }
        let at = popup_position(
            rect,
            self.surface.viewport(),
            self.config.popup_size,
            self.config.trigger_size,
            self.config.gap,
        );
        let id = self
            .surface
            .mount(ControlKind::Popup, &completion.translation, at);
        self.state.popup = Some(id);
    }

    fn on_scroll_settled(&mut self) {
        match self.config.scroll_policy {
            ScrollPolicy::Dismiss => self.teardown(),
            ScrollPolicy::Reposition => {
                if self.state.is_empty() {
                    return;
                }
                match self.current_selection() {
                    Some(selection) => {
                        if let Some(trigger) = self.state.trigger.as_mut() {
                            trigger.rect = selection.rect;
                        }
                        self.reclamp();
                    }
                    None => self.teardown(),
                }
            }
        }
    }

    /// Re-applies layout to live controls against the current viewport
    fn reclamp(&mut self) {
        let Some(rect) = self.state.trigger.as_ref().map(|t| t.rect) else {
            return;
        };
        let viewport = self.surface.viewport();

        if let Some(id) = self.state.trigger_id() {
            let at = trigger_position(rect, viewport, self.config.trigger_size, self.config.gap);
            if let Err(e) = self.surface.move_to(id, at) {
                tracing::trace!("Trigger move skipped: {e}");
            }
        }
        if let Some(id) = self.state.popup {
            let at = popup_position(
                rect,
                viewport,
                self.config.popup_size,
                self.config.trigger_size,
                self.config.gap,
            );
            if let Err(e) = self.surface.move_to(id, at) {
                tracing::trace!("Popup move skipped: {e}");
            }
        }
    }

    /// Removes both controls and ends the current generation. Safe to
    /// call when nothing is shown.
    fn teardown(&mut self) {
        if let Some(trigger) = self.state.trigger.take() {
            self.release(trigger.id);
        }
        if let Some(popup) = self.state.popup.take() {
            self.release(popup);
        }
        self.state.advance();
    }

    fn release(&mut self, id: ElementId) {
        if let Err(e) = self.surface.remove(id) {
            tracing::trace!("Remove skipped: {e}");
        }
    }
}
