use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Document;
use crate::normalize::Normalize;
use crate::types::{DocumentId, EntityKind};

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub time: DateTime<Utc>,
    pub message: String,
}

/// A conversation between marketplace users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub participants: Vec<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    /// Returns true if every user in `users` takes part in the chat.
    pub fn includes_all(&self, users: &[String]) -> bool {
        users.iter().all(|u| self.participants.contains(u))
    }
}

/// Chats are never cached, and message times keep full precision so a
/// conversation can be ordered within a day.
impl Normalize for Chat {
    fn normalize(&mut self) {}
}

impl Document for Chat {
    const KIND: EntityKind = EntityKind::Chat;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
