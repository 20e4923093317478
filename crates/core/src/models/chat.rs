//! Chat messages between students and tutors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChatMessageId, UserId};

/// A message in the shared chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set when the sender is a tutor.
    pub is_tutor: bool,
}
