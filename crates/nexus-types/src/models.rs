use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Who authored a message. Fixed when the message is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The external contact (inbound via the webhook).
    #[default]
    Customer,
    /// A human or bot replying from our side.
    Agent,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: anything other than the two known roles is a validation error.
impl FromStr for Sender {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "agent" => Ok(Self::Agent),
            other => Err(LogError::Validation(format!(
                "unknown sender '{other}' (expected 'customer' or 'agent')"
            ))),
        }
    }
}

/// One entry of the append-only message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub contact: String,
    pub sender: Sender,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Per-contact summary, computed from the log on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub contact: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub total_messages: u64,
    /// Always `None`; conversation state is not tracked.
    pub status: Option<String>,
    /// Always empty; conversation state is not tracked.
    pub tags: Vec<String>,
}
