//! Tutor chat commands.

use std::pin::pin;

use futures::StreamExt;
use tracing::info;

use kiddiebox_core::ChatMessage;
use kiddiebox_storefront::AppError;

use super::App;

fn log_message(message: &ChatMessage) {
    let badge = if message.is_tutor { " [tutor]" } else { "" };
    info!(
        "{} {}{}: {}",
        message.timestamp.format("%H:%M:%S"),
        message.sender_name,
        badge,
        message.text
    );
}

/// Send a message as the signed-in user.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if nobody is signed in.
pub fn send(app: &mut App, text: &str) -> Result<(), AppError> {
    let message = app.send_chat_message(text)?;
    log_message(&message);
    Ok(())
}

/// Show the whole chat log.
///
/// # Errors
///
/// Returns `AppError::Storage` if the log cannot be read.
pub fn list(app: &mut App) -> Result<(), AppError> {
    app.open_chat()?;
    if app.chat_messages().is_empty() {
        info!("No messages yet");
    }
    for message in app.chat_messages() {
        log_message(message);
    }
    Ok(())
}

/// Print new messages as they arrive until Ctrl+C or `refreshes` polls.
///
/// # Errors
///
/// Returns `AppError::Storage` if the log cannot be read.
pub async fn watch(app: &App, refreshes: Option<usize>) -> Result<(), AppError> {
    let mut snapshots = pin!(app.watch_chat());
    let mut shutdown = pin!(tokio::signal::ctrl_c());
    let mut seen = 0;
    let mut polls = 0;

    info!("Watching chat, press Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            snapshot = snapshots.next() => {
                let Some(snapshot) = snapshot else { break };
                let messages = snapshot?;
                for message in messages.iter().skip(seen) {
                    log_message(message);
                }
                seen = messages.len();
                polls += 1;
                if refreshes.is_some_and(|limit| polls >= limit) {
                    break;
                }
            }
        }
    }
    Ok(())
}
