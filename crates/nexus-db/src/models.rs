//! Database row types — these map directly to SQLite rows.
//! Distinct from nexus-types API models to keep the DB layer independent.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};

use nexus_types::models::{Conversation, Message, Sender};

pub struct MessageRow {
    pub id: i64,
    pub contact: String,
    pub sender: String,
    pub body: String,
    pub created_at: String,
}

pub struct ConversationRow {
    pub contact: String,
    pub last_message: String,
    pub last_message_at: String,
    pub total_messages: i64,
}

impl MessageRow {
    pub fn into_message(self) -> Result<Message> {
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|_| anyhow!("Corrupt sender '{}' on message {}", self.sender, self.id))?;
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| anyhow!("Corrupt created_at '{}' on message {}", self.created_at, self.id))?;

        Ok(Message {
            id: self.id,
            contact: self.contact,
            sender,
            body: self.body,
            created_at,
        })
    }
}

impl ConversationRow {
    pub fn into_conversation(self) -> Result<Conversation> {
        let last_message_at = parse_timestamp(&self.last_message_at).ok_or_else(|| {
            anyhow!(
                "Corrupt created_at '{}' for contact {}",
                self.last_message_at,
                self.contact
            )
        })?;

        Ok(Conversation {
            contact: self.contact,
            last_message: self.last_message,
            last_message_at,
            total_messages: self.total_messages.max(0) as u64,
            status: None,
            tags: Vec::new(),
        })
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS[.SSS]" without timezone.
/// Parse as naive UTC, falling back to RFC 3339.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .ok()
        .or_else(|| s.parse::<DateTime<Utc>>().ok())
}
