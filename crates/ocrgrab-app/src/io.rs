use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use ocrgrab_types::{AppEvent, ScreenRect};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// How outgoing events are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Every event as one JSON line
    Json,
    /// Only recognized text, as is
    Plain,
}

/// Read one JSON `AppEvent` per line until EOF or cancellation.
///
/// Lines that do not parse are logged and skipped. EOF is forwarded as `Quit`.
pub async fn read_events<R>(reader: R, tx: AsyncSender<AppEvent>, cancel: CancellationToken) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Input reader stopping");
                return Ok(());
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::info!("Input closed");
            let _ = tx.send(AppEvent::Quit).await;
            return Ok(());
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<AppEvent>(line) {
            Ok(event) => {
                if let Err(e) = tx.send(event).await {
                    tracing::error!("Failed to forward input event: {}", e);
                    return Ok(());
                }
            }
            Err(e) => tracing::warn!("Ignoring malformed input line: {}", e),
        }
    }
}

/// Print events until the channel closes
pub async fn write_events<W>(rx: AsyncReceiver<AppEvent>, mut writer: W, format: OutputFormat) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(event) = rx.recv().await {
        let line = match (format, event) {
            (OutputFormat::Json, event) => serde_json::to_string(&event)?,
            (OutputFormat::Plain, AppEvent::ShowText(text)) => text,
            (OutputFormat::Plain, AppEvent::OcrStatusUpdate { status, .. }) => {
                tracing::info!("{}", status);
                continue;
            }
            (OutputFormat::Plain, _) => continue,
        };

        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Turn hotkey presses into `TriggerOcr(region)` events
pub async fn watch_hotkey(
    hotkey: String,
    region: ScreenRect,
    tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let handle = tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let hotkey_manager = ocrgrab_ocr::HotkeyManager::new(&hotkey)?;
        tracing::info!("Press {} to capture {}", hotkey, region);

        while !cancel.is_cancelled() {
            if hotkey_manager.wait_timeout(Duration::from_millis(50)) {
                tracing::info!("OCR hotkey pressed");
                match tx.try_send(AppEvent::TriggerOcr(region)) {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!("OCR request dropped, previous capture still running"),
                    Err(e) => {
                        tracing::error!("Failed to send OCR request: {}", e);
                        break;
                    }
                }
            }
        }

        tracing::info!("OCR hotkey listener stopping");
        Ok(())
    });

    handle.await?
}
