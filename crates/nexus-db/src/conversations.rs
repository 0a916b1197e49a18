use std::sync::Arc;

use nexus_types::error::LogError;
use nexus_types::models::{Conversation, Message};

use crate::Database;
use crate::log::{MessageLog, storage_error};

/// Read-time projection of the message log into per-contact conversations.
/// Nothing is cached; every call reads the log.
#[derive(Clone)]
pub struct ConversationAggregator {
    db: Arc<Database>,
    log: MessageLog,
}

impl ConversationAggregator {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            log: MessageLog::new(db.clone()),
            db,
        }
    }

    /// One entry per contact, most recently active first.
    pub fn list_conversations(&self) -> Result<Vec<Conversation>, LogError> {
        let rows = self
            .db
            .get_conversations()
            .map_err(|e| storage_error("list_conversations", "-", e))?;

        rows.into_iter()
            .map(|row| row.into_conversation())
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| storage_error("list_conversations", "-", e))
    }

    /// The conversation thread for `contact`, oldest first.
    pub fn get_history(&self, contact: &str) -> Result<Vec<Message>, LogError> {
        self.log.list_by_contact(contact)
    }
}
