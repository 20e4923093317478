//! Tutor chat.
//!
//! Messages live in one shared collection. There is no push channel:
//! viewers re-read the collection on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use chrono::Utc;
use futures::Stream;
use tokio::time::MissedTickBehavior;

use kiddiebox_core::{ChatMessage, ChatMessageId, User, UserRole};

use crate::db::{ChatRepository, KeyValueStore, StorageError};

/// Default refresh interval for a visible chat surface.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Build a message sent by `sender`. Tutors' messages are flagged.
#[must_use]
pub fn compose_message(sender: &User, text: &str) -> ChatMessage {
    ChatMessage {
        id: ChatMessageId::generate(),
        sender_id: sender.id.clone(),
        sender_name: sender.name.clone(),
        text: text.to_string(),
        timestamp: Utc::now(),
        is_tutor: sender.role == UserRole::Tutor,
    }
}

/// Interval-driven chat log reader.
pub struct ChatPoller;

impl ChatPoller {
    /// Stream a fresh snapshot of the chat log every `interval`.
    ///
    /// The first snapshot is yielded immediately. The stream never ends on
    /// its own; a failed read is yielded as an error and polling continues.
    pub fn watch<S>(
        store: Arc<S>,
        interval: Duration,
    ) -> impl Stream<Item = Result<Vec<ChatMessage>, StorageError>> + Send
    where
        S: KeyValueStore + ?Sized + 'static,
    {
        stream! {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let snapshot = ChatRepository::new(store.as_ref()).list();
                yield snapshot;
            }
        }
    }
}
