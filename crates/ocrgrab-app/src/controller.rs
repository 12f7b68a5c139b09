use std::future::Future;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use ocrgrab_types::{AppEvent, ScreenRect};
use tokio::io::BufReader;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{OutputFormat, read_events, watch_hotkey, write_events};
use crate::shell::HostShell;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256),
            // Small on purpose: hotkey presses during a capture get dropped
            ui_to_app: kanal::bounded_async(4),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Task spawning and lifecycle around the shell's event loop
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
    tasks: JoinSet<anyhow::Result<()>>,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    /// JSON events on stdin, JSON replies on stdout
    pub async fn serve(mut self, shell: &mut HostShell) -> anyhow::Result<()> {
        self.tasks.spawn(read_events(
            BufReader::new(tokio::io::stdin()),
            self.channels.ui_to_app.0.clone(),
            self.cancel_token.child_token(),
        ));
        self.tasks.spawn(write_events(
            self.channels.app_to_ui.1.clone(),
            tokio::io::stdout(),
            OutputFormat::Json,
        ));

        self.run(shell, shutdown_signal()).await
    }

    /// Hotkey presses capture `region`; recognized text goes to stdout
    pub async fn listen(mut self, shell: &mut HostShell, hotkey: String, region: ScreenRect) -> anyhow::Result<()> {
        self.tasks.spawn(watch_hotkey(
            hotkey,
            region,
            self.channels.ui_to_app.0.clone(),
            self.cancel_token.child_token(),
        ));
        self.tasks.spawn(write_events(
            self.channels.app_to_ui.1.clone(),
            tokio::io::stdout(),
            OutputFormat::Plain,
        ));

        self.run(shell, shutdown_signal()).await
    }

    pub async fn run(self, shell: &mut HostShell, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        let AppController {
            channels,
            cancel_token,
            mut tasks,
        } = self;
        let (app_to_ui_tx, _) = channels.app_to_ui;
        let (_, ui_to_app_rx) = channels.ui_to_app;

        let result = tokio::select! {
            result = event_loop(shell, ui_to_app_rx, app_to_ui_tx, cancel_token.clone()) => result,
            _ = shutdown => {
                tracing::info!("Shutdown requested");
                Ok(())
            }
        };

        cancel_token.cancel();

        // Writer ends once every sender is gone, after flushing what is queued
        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::error!("Task failed: {:#}", e),
                    Err(e) => tracing::error!("Task panicked: {}", e),
                }
            }
        })
        .await;
        if drained.is_err() {
            tracing::warn!("Background tasks did not stop in time");
        }

        result
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
