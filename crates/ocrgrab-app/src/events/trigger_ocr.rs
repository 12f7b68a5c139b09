use kanal::AsyncSender;
use ocrgrab_types::{AppEvent, ScreenRect};

use super::{send_all, send_status};
use crate::shell::HostShell;

pub async fn handle_ocr_trigger(shell: &mut HostShell, region: ScreenRect, app_to_ui_tx: &AsyncSender<AppEvent>) {
    send_status(app_to_ui_tx, "Capturing...".to_string(), true).await;
    let replies = shell.on_region_selected(region);
    send_all(app_to_ui_tx, replies).await;
}
