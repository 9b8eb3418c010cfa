use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use snap_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{command_reader, hotkey_watcher};
use crate::state::AppState;
use crate::status::status_loop;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64),
            ui_to_app: kanal::bounded_async(16),
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
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
        ));

        // Pipeline progress -> UI
        tasks.spawn(status_loop(
            self.state.pipeline.subscribe(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(ui_loop(self.channels.app_to_ui.1.clone()));

        // Hotkey
        let state = self.state.clone();
        let ui_to_app_tx = self.channels.ui_to_app.0.clone();
        let cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            let poll_interval = {
                let config = state.config.read().await;
                Duration::from_millis(config.delta_time_ms)
            };
            hotkey_watcher(poll_interval, cancel, ui_to_app_tx).await
        });

        // Console commands
        if let Err(e) = command_reader(self.channels.ui_to_app.0.clone()) {
            tracing::warn!("Console commands unavailable: {:#}", e);
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
        let _ = self.channels.ui_to_app.0.try_send(AppEvent::Shutdown);
    }
}
