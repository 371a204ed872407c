use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use seltrans_io::{ScriptEvent, ScriptReader, Target};
use seltrans_types::{ElementId, HostEvent, Size};
use seltrans_watcher::SharedPage;
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

fn resolve_target(page: &SharedPage, target: Option<Target>) -> Option<ElementId> {
    let kind = target.and_then(Target::control)?;
    let id = page.lock().find(kind).map(|(id, _)| id);
    if id.is_none() {
        tracing::debug!(?kind, "Script targets a control that is not shown");
    }
    id
}

/// Applies a script event to the page and returns what the host would
/// dispatch for it. A `select` ends like a drag does, with a pointer-up.
pub fn apply_script_event(page: &SharedPage, event: ScriptEvent) -> Option<HostEvent> {
    match event {
        ScriptEvent::Select { text, rect } => {
            page.lock().select(text, rect.into());
            Some(HostEvent::PointerUp { target: None })
        }
        ScriptEvent::ClearSelection => {
            page.lock().clear_selection();
            None
        }
        ScriptEvent::PointerUp { target } => Some(HostEvent::PointerUp {
            target: resolve_target(page, target),
        }),
        ScriptEvent::Click { target } => Some(HostEvent::Click {
            target: resolve_target(page, target),
        }),
        ScriptEvent::Scroll { dx, dy } => {
            page.lock().scroll_by(dx, dy);
            Some(HostEvent::Scroll)
        }
        ScriptEvent::Resize { width, height } => {
            page.lock().resize(Size::new(width, height));
            Some(HostEvent::Resize)
        }
        ScriptEvent::Wait { .. } => None,
    }
}

async fn pump_script<R>(
    reader: R,
    page: &SharedPage,
    event_tx: &AsyncSender<HostEvent>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut script = ScriptReader::new(reader);

    while let Some(event) = script.next_event().await? {
        if let ScriptEvent::Wait { ms } = event {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            continue;
        }
        if let Some(host_event) = apply_script_event(page, event) {
            event_tx.send(host_event).await?;
        }
    }

    Ok(())
}

/// Feeds host events from a script into the watcher. Once input ends it
/// lingers so in-flight translations can still render, then returns.
pub async fn host_io<R>(
    state: Arc<AppState>,
    input: R,
    linger: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<HostEvent>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let page = state.page.clone();
    tracing::info!("Reading host events");

    tokio::select! {
        result = pump_script(input, &page, &event_tx) => result?,
        _ = cancel.cancelled() => {
            tracing::info!("Host input stopping");
            return Ok(());
        }
    }

    tracing::info!(?linger, "Input finished, waiting for pending translations");
    tokio::select! {
        _ = tokio::time::sleep(linger) => {}
        _ = cancel.cancelled() => {}
    }

    Ok(())
}
