//! Chat log repository.

use kiddiebox_core::ChatMessage;

use super::{Collection, KeyValueStore, StorageError, keys};

/// Repository for the shared chat log.
pub struct ChatRepository<'a, S: ?Sized> {
    messages: Collection<'a, S, ChatMessage>,
}

impl<'a, S: KeyValueStore + ?Sized> ChatRepository<'a, S> {
    /// Create a new chat repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            messages: Collection::new(store, keys::CHAT),
        }
    }

    /// All messages in the order they were appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<ChatMessage>, StorageError> {
        self.messages.read()
    }

    /// Append a message to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn append(&self, message: ChatMessage) -> Result<(), StorageError> {
        self.messages.append(message)
    }
}
