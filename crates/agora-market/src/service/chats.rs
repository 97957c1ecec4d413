use agora_core::model::{Chat, Message};
use agora_core::validation::{check_id, check_string};
use agora_core::{AgoraError, DocumentId, Result};
use chrono::Utc;
use tracing::debug;

use super::Marketplace;

fn check_participants(participants: &[String]) -> Result<Vec<String>> {
    if participants.is_empty() {
        return Err(AgoraError::validation(
            "participants",
            "at least one participant is required",
        ));
    }
    participants
        .iter()
        .map(|p| check_string(p, "participants"))
        .collect()
}

// Chats change with every message and are always read from the primary store.
impl Marketplace {
    pub async fn chat_by_id(&self, id: &str) -> Result<Chat> {
        let id = DocumentId::new(check_id(id)?);
        self.store
            .chats
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AgoraError::not_found("chat", id.as_str()))
    }

    /// The first chat in which every given user takes part.
    pub async fn chat_by_participants(&self, participants: &[String]) -> Result<Option<Chat>> {
        let participants = check_participants(participants)?;
        let chats = self
            .filtered(&self.store.chats, &|c: &Chat| c.includes_all(&participants))
            .await?;
        Ok(chats.into_iter().next())
    }

    /// Returns the chat between `participants`, creating it if needed.
    pub async fn add_chat(&self, participants: Vec<String>) -> Result<Chat> {
        if let Some(existing) = self.chat_by_participants(&participants).await? {
            return Ok(existing);
        }

        let chat = Chat {
            id: DocumentId::generate(),
            participants: check_participants(&participants)?,
            messages: Vec::new(),
        };
        let chat = self.store.chats.insert(chat).await?;
        debug!(chat = %chat.id, "Chat created");
        Ok(chat)
    }

    /// Appends a message to an existing chat.
    ///
    /// Concurrent appends to the same chat are all kept.
    pub async fn add_message(&self, chat_id: &str, sender: &str, message: &str) -> Result<Message> {
        let id = DocumentId::new(check_id(chat_id)?);
        let message = Message {
            sender: check_string(sender, "sender")?,
            time: Utc::now(),
            message: check_string(message, "message")?,
        };

        let appended = message.clone();
        self.store
            .chats
            .modify(
                &id,
                Box::new(move |chat: &mut Chat| {
                    chat.messages.push(appended);
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| AgoraError::not_found("chat", id.as_str()))?;
        Ok(message)
    }
}
