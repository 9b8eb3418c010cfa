use std::io::BufRead;
use std::time::Duration;

use kanal::AsyncSender;
use snap_types::AppEvent;
use tokio_util::sync::CancellationToken;

/// Poll the global capture hotkey on a blocking thread
pub async fn hotkey_watcher(
    poll_interval: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let handle = tokio::task::spawn_blocking(move || {
        let hotkey_manager = snap_ocr::HotkeyManager::new()?;
        tracing::info!("Capture hotkey registered (Ctrl+Shift+T)");

        while !cancel.is_cancelled() {
            if hotkey_manager.poll() {
                tracing::debug!("Capture hotkey pressed");
                match event_tx.try_send(AppEvent::TriggerCapture) {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!("Event queue full, dropping capture trigger"),
                    Err(e) => {
                        tracing::error!("Failed to send capture trigger: {}", e);
                        break;
                    }
                }
            }

            std::thread::sleep(poll_interval);
        }

        tracing::info!("Hotkey listener stopping");
        Ok::<_, anyhow::Error>(())
    });

    handle.await?
}

/// Console commands: `capture`, or `translate [lang]` to re-run the last capture
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "c" | "capture" => Some(AppEvent::TriggerCapture),
        "t" | "translate" => Some(AppEvent::TranslateLast {
            from: words.next().map(str::to_lowercase),
        }),
        _ => None,
    }
}

/// Read commands from stdin on a detached thread.
///
/// A blocking stdin read never observes the cancel token, so the thread is
/// left to end with the process.
pub fn command_reader(event_tx: AsyncSender<AppEvent>) -> anyhow::Result<()> {
    std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };

                match parse_command(&line) {
                    Some(event) => match event_tx.try_send(event) {
                        Ok(true) => {}
                        Ok(false) => tracing::warn!("Event queue full, dropping command"),
                        Err(e) => {
                            tracing::error!("Failed to send command: {}", e);
                            break;
                        }
                    },
                    None if line.trim().is_empty() => {}
                    None => tracing::warn!(
                        "Unknown command {:?}, expected `capture` or `translate [lang]`",
                        line.trim()
                    ),
                }
            }
            tracing::debug!("Command reader stopping");
        })?;

    Ok(())
}
