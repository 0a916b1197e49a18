use crate::Database;
use crate::models::{ConversationRow, MessageRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const MESSAGE_COLUMNS: &str = "id, contact, sender, body, created_at";

impl Database {
    // -- Messages --

    /// Insert a message and return the row as stored, with its assigned id and timestamp.
    pub fn insert_message(
        &self,
        contact: &str,
        sender: &str,
        body: &str,
        raw: Option<&str>,
    ) -> Result<MessageRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO messages (contact, sender, body, raw) VALUES (?1, ?2, ?3, ?4)
                     RETURNING {MESSAGE_COLUMNS}"
                ),
                rusqlite::params![contact, sender, body, raw],
                map_message_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_messages_by_contact(&self, contact: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages_by_contact(conn, contact))
    }

    pub fn get_recent_messages(&self, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_recent_messages(conn, limit))
    }

    pub fn count_messages(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    // -- Conversations --

    /// One row per contact in a single grouped read (no per-contact queries).
    pub fn get_conversations(&self) -> Result<Vec<ConversationRow>> {
        self.with_conn(query_conversations)
    }
}

fn map_message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        contact: row.get(1)?,
        sender: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn query_messages_by_contact(conn: &Connection, contact: &str) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MESSAGE_COLUMNS}
         FROM messages
         WHERE contact = ?1
         ORDER BY created_at ASC, id ASC"
    ))?;

    let rows = stmt
        .query_map([contact], map_message_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_recent_messages(conn: &Connection, limit: u32) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MESSAGE_COLUMNS}
         FROM messages
         ORDER BY created_at DESC, id DESC
         LIMIT ?1"
    ))?;

    let rows = stmt
        .query_map([limit], map_message_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_conversations(conn: &Connection) -> Result<Vec<ConversationRow>> {
    // Rank each contact's messages newest-first; rank 1 is the last message.
    let mut stmt = conn.prepare(
        "SELECT contact, body, created_at, total
         FROM (
             SELECT contact, body, created_at, id,
                    COUNT(*) OVER (PARTITION BY contact) AS total,
                    ROW_NUMBER() OVER (
                        PARTITION BY contact
                        ORDER BY created_at DESC, id DESC
                    ) AS rn
             FROM messages
         )
         WHERE rn = 1
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ConversationRow {
                contact: row.get(0)?,
                last_message: row.get(1)?,
                last_message_at: row.get(2)?,
                total_messages: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
