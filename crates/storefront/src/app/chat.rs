//! Chat operations on the storefront.

use std::sync::Arc;

use futures::Stream;
use tracing::debug;

use kiddiebox_core::ChatMessage;

use super::{Storefront, View};
use crate::db::{ChatRepository, KeyValueStore, StorageError};
use crate::error::{AppError, Result};
use crate::recommend::GenerativeModel;
use crate::services::chat::{ChatPoller, compose_message};

impl<S, M> Storefront<S, M>
where
    S: KeyValueStore + ?Sized,
    M: GenerativeModel,
{
    /// Post a message as the signed-in user and refresh the chat mirror.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if nobody is signed in and
    /// `AppError::BadRequest` if the text is blank.
    pub fn send_chat_message(&mut self, text: &str) -> Result<ChatMessage> {
        let sender = self.require_user("Please log in to chat with a tutor.")?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Message cannot be empty.".to_string()));
        }

        let message = compose_message(sender, text);
        let repo = ChatRepository::new(self.store.as_ref());
        repo.append(message.clone())?;
        debug!(is_tutor = message.is_tutor, "Chat message sent");
        self.chat_messages = repo.list()?;
        Ok(message)
    }

    /// Open the chat window and load the current messages.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the chat log cannot be read.
    pub fn open_chat(&mut self) -> Result<()> {
        self.chat_open = true;
        self.chat_messages = ChatRepository::new(self.store.as_ref()).list()?;
        Ok(())
    }

    pub const fn close_chat(&mut self) {
        self.chat_open = false;
    }

    #[must_use]
    pub const fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    /// Whether a chat surface is on screen: the chat window or the tutor
    /// console.
    #[must_use]
    pub fn is_chat_visible(&self) -> bool {
        self.chat_open || self.view == View::TutorConsole
    }

    /// Refresh the chat mirror if a chat surface is visible.
    ///
    /// Returns `true` if the mirror was refreshed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the chat log cannot be read.
    pub fn poll_chat(&mut self) -> Result<bool> {
        if !self.is_chat_visible() {
            return Ok(false);
        }
        self.chat_messages = ChatRepository::new(self.store.as_ref()).list()?;
        Ok(true)
    }
}

impl<S, M> Storefront<S, M>
where
    S: KeyValueStore + ?Sized + 'static,
    M: GenerativeModel,
{
    /// Stream chat snapshots at the configured poll interval.
    pub fn watch_chat(
        &self,
    ) -> impl Stream<Item = std::result::Result<Vec<ChatMessage>, StorageError>> + Send + use<S, M>
    {
        ChatPoller::watch(Arc::clone(&self.store), self.chat_poll_interval)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::pin::pin;
    use std::time::Duration;

    use futures::StreamExt;

    use super::*;
    use crate::app::tests::{ScriptedModel, storefront};
    use crate::recommend::RecommendationClient;

    #[test]
    fn test_guest_cannot_chat() {
        let mut app = storefront();
        assert!(matches!(
            app.send_chat_message("hello"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_tutor_messages_are_flagged() {
        let mut app = storefront();
        app.login("user1", "321321").unwrap();
        let question = app.send_chat_message("Which course for a 3 year old?").unwrap();
        assert!(!question.is_tutor);

        app.login("tutor@login", "Admin@9235").unwrap();
        let reply = app.send_chat_message("Try Toddler Phonics!").unwrap();
        assert!(reply.is_tutor);
        assert_eq!(reply.sender_name, "Pro Tutor");
        assert_eq!(app.chat_messages().len(), 2);
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut app = storefront();
        app.login("user1", "321321").unwrap();
        assert!(matches!(
            app.send_chat_message("   "),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_poll_only_while_visible() {
        let mut student = storefront();
        student.login("user1", "321321").unwrap();
        student.send_chat_message("Hi!").unwrap();

        // A second controller sharing the store sees the message only while
        // its chat surface is visible.
        let mut viewer: Storefront<_, ScriptedModel> = Storefront::new(
            Arc::clone(student.store()),
            RecommendationClient::simulated(),
        )
        .unwrap();
        viewer.logout().unwrap();
        assert!(!viewer.is_chat_visible());
        assert!(!viewer.poll_chat().unwrap());
        assert!(viewer.chat_messages().is_empty());

        viewer.open_chat().unwrap();
        assert!(viewer.poll_chat().unwrap());
        assert_eq!(viewer.chat_messages().len(), 1);

        viewer.close_chat();
        viewer.login("tutor@login", "Admin@9235").unwrap();
        assert_eq!(viewer.view(), View::TutorConsole);
        assert!(viewer.is_chat_visible());
    }

    #[tokio::test]
    async fn test_watch_chat_stream() {
        let mut app = storefront().with_chat_poll_interval(Duration::from_millis(10));
        app.login("user1", "321321").unwrap();
        app.send_chat_message("Hello tutor").unwrap();

        let mut snapshots = pin!(app.watch_chat());
        let snapshot = snapshots.next().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].text, "Hello tutor");
    }
}
