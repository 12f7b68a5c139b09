use std::ops::ControlFlow;

use kanal::{AsyncReceiver, AsyncSender};
use ocrgrab_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::shell::HostShell;

pub mod selection;
pub mod trigger_ocr;

use selection::{handle_pointer, handle_selection_start};
use trigger_ocr::handle_ocr_trigger;

/// App's main loop. Runs on the calling task; OCR blocks it while it runs.
pub async fn event_loop(
    shell: &mut HostShell,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Event loop started");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::info!("Input channel closed");
                    break;
                }
            },
        };

        tracing::debug!("Event received: {:?}", event);
        if handle_events(shell, &app_to_ui_tx, event).await.is_break() {
            break;
        }
    }

    tracing::info!("Event loop stopped");
    Ok(())
}

pub async fn handle_events(
    shell: &mut HostShell,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> ControlFlow<()> {
    match event {
        AppEvent::StartSelection(bounds) => {
            handle_selection_start(shell, bounds, app_to_ui_tx).await;
        }
        AppEvent::Pointer(pointer) => {
            handle_pointer(shell, pointer, app_to_ui_tx).await;
        }
        AppEvent::TriggerOcr(region) => {
            handle_ocr_trigger(shell, region, app_to_ui_tx).await;
        }
        AppEvent::SetMode(mode) => {
            shell.set_mode(mode);
            send_status(app_to_ui_tx, format!("Mode: {mode}"), false).await;
        }
        AppEvent::CopyText => match shell.copy_text() {
            Ok(()) => send_status(app_to_ui_tx, "Copied to clipboard".to_string(), false).await,
            Err(e) => {
                tracing::warn!("Copy failed: {:#}", e);
                send_status(app_to_ui_tx, format!("Error: {e}"), false).await;
            }
        },
        AppEvent::Quit => {
            tracing::info!("Quit requested");
            return ControlFlow::Break(());
        }
        AppEvent::SelectionChanged(_)
        | AppEvent::SelectionClosed(_)
        | AppEvent::ShowText(_)
        | AppEvent::OcrStatusUpdate { .. } => {
            // Outgoing events, nothing to do when they come back in
            tracing::debug!("Ignoring outgoing event sent as input");
        }
    }

    ControlFlow::Continue(())
}

pub(crate) async fn send_all(app_to_ui_tx: &AsyncSender<AppEvent>, events: Vec<AppEvent>) {
    for event in events {
        if let Err(e) = app_to_ui_tx.send(event).await {
            tracing::error!("Failed to send event to UI: {}", e);
            return;
        }
    }
}

pub(crate) async fn send_status(app_to_ui_tx: &AsyncSender<AppEvent>, status: String, capturing: bool) {
    send_all(app_to_ui_tx, vec![AppEvent::OcrStatusUpdate { status, capturing }]).await;
}
