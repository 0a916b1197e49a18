use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// -- Inbound webhook --

/// Payload posted by the automation relay for every inbound WhatsApp message.
///
/// The relay historically sends `phone`/`message`; `contact`/`body` are
/// accepted as well. Either may arrive as a bare JSON number. Unknown fields
/// are tolerated and kept in the raw payload.
#[derive(Debug, Default, Deserialize)]
pub struct InboundMessageRequest {
    #[serde(default, alias = "contact", deserialize_with = "string_or_number")]
    pub phone: Option<String>,
    #[serde(default, alias = "body", deserialize_with = "string_or_number")]
    pub message: Option<String>,
    /// Omitted by legacy producers, in which case the message is a customer message.
    #[serde(default)]
    pub sender: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub status: String,
    pub received: bool,
    pub id: i64,
}

// -- Outbound send --

/// Agent reply. No `sender` field: outbound messages are always `agent`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    #[serde(default, alias = "phone", deserialize_with = "string_or_number")]
    pub contact: Option<String>,
    #[serde(default, alias = "message", deserialize_with = "string_or_number")]
    pub body: Option<String>,
}

// -- Reads --

#[derive(Debug, Default, Deserialize)]
pub struct RecentMessagesQuery {
    pub limit: Option<u32>,
}

// -- Misc --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
}

/// Text field that relays sometimes send as a number (`5491100000000`).
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
