use kanal::AsyncSender;
use ocrgrab_types::{AppEvent, PointerEvent, ScreenRect};

use super::{send_all, send_status};
use crate::shell::HostShell;

pub async fn handle_selection_start(
    shell: &mut HostShell,
    bounds: Option<ScreenRect>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) {
    match shell.start_selection(bounds) {
        Ok(bounds) => {
            tracing::info!("Selection opened over {}", bounds);
            send_all(app_to_ui_tx, vec![shell.status_event()]).await;
        }
        Err(e) => {
            tracing::warn!("Selection refused: {:#}", e);
            send_status(app_to_ui_tx, format!("Error: {e}"), false).await;
        }
    }
}

pub async fn handle_pointer(shell: &mut HostShell, pointer: PointerEvent, app_to_ui_tx: &AsyncSender<AppEvent>) {
    let replies = shell.on_pointer(pointer);
    send_all(app_to_ui_tx, replies).await;
}
