//! Append-only message log keyed by contact.
//!
//! Input is validated before the store is touched. Store failures are logged
//! with the operation and contact and returned as [`LogError::Storage`];
//! nothing here retries, since a repeated append would duplicate a message.

use std::sync::Arc;

use tracing::{debug, error};

use nexus_types::error::LogError;
use nexus_types::models::{Message, Sender};

use crate::Database;
use crate::models::MessageRow;

/// Upper bound for [`MessageLog::list_recent`].
pub const MAX_RECENT: u32 = 500;

#[derive(Clone)]
pub struct MessageLog {
    db: Arc<Database>,
}

impl MessageLog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append one message. `raw` is the original payload, stored as-is.
    ///
    /// The contact is trimmed before storing so the same number always
    /// groups into one conversation.
    pub fn append(
        &self,
        contact: &str,
        sender: Sender,
        body: &str,
        raw: Option<&str>,
    ) -> Result<Message, LogError> {
        let contact = contact.trim();
        if contact.is_empty() {
            return Err(LogError::Validation("contact is required".into()));
        }
        if body.is_empty() {
            return Err(LogError::Validation("body is required".into()));
        }

        let row = self
            .db
            .insert_message(contact, sender.as_str(), body, raw)
            .map_err(|e| storage_error("append", contact, e))?;

        let message = row
            .into_message()
            .map_err(|e| storage_error("append", contact, e))?;

        debug!("Appended message {} for {} ({})", message.id, contact, sender);
        Ok(message)
    }

    /// All messages for `contact`, oldest first. Unknown contacts yield an empty list.
    pub fn list_by_contact(&self, contact: &str) -> Result<Vec<Message>, LogError> {
        let contact = contact.trim();
        let rows = self
            .db
            .get_messages_by_contact(contact)
            .map_err(|e| storage_error("list_by_contact", contact, e))?;

        into_messages(rows).map_err(|e| storage_error("list_by_contact", contact, e))
    }

    /// The newest `limit` messages across all contacts, newest first.
    pub fn list_recent(&self, limit: u32) -> Result<Vec<Message>, LogError> {
        let limit = limit.clamp(1, MAX_RECENT);
        let rows = self
            .db
            .get_recent_messages(limit)
            .map_err(|e| storage_error("list_recent", "-", e))?;

        into_messages(rows).map_err(|e| storage_error("list_recent", "-", e))
    }
}

fn into_messages(rows: Vec<MessageRow>) -> anyhow::Result<Vec<Message>> {
    rows.into_iter().map(MessageRow::into_message).collect()
}

pub(crate) fn storage_error(op: &str, contact: &str, err: anyhow::Error) -> LogError {
    error!("Message store {} failed (contact: {}): {:#}", op, contact, err);
    LogError::Storage(format!("{op} failed: {err}"))
}
