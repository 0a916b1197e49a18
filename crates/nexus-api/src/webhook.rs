use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;
use tracing::{debug, info, warn};

use nexus_types::api::{InboundMessageRequest, WebhookAck};
use nexus_types::models::Sender;

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

/// Inbound WhatsApp message forwarded by the automation relay.
///
/// The full request body is kept as the message's raw payload.
pub async fn receive_whatsapp(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<WebhookAck>, ApiError> {
    let Json(payload) = payload?;
    let raw = payload.to_string();

    let req: InboundMessageRequest = serde_json::from_value(payload).map_err(|e| {
        warn!("Rejected webhook payload {}: {}", raw, e);
        ApiError::validation(format!("invalid payload: {e}"))
    })?;

    let (Some(contact), Some(body)) = (req.phone, req.message) else {
        warn!("Webhook payload missing fields: {}", raw);
        return Err(ApiError::validation("missing fields: phone or message"));
    };

    // Only this path may omit the sender
    let sender = match req.sender.as_deref() {
        None => Sender::Customer,
        Some(s) => s.parse()?,
    };

    debug!("Inbound message from {}: {}", contact, raw);

    let log = state.log.clone();
    let message = run_blocking(move || log.append(&contact, sender, &body, Some(raw.as_str()))).await?;

    info!("Stored inbound message {} from {}", message.id, message.contact);

    Ok(Json(WebhookAck {
        status: "ok".into(),
        received: true,
        id: message.id,
    }))
}
