use axum::{
    Json,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use nexus_types::api::{RecentMessagesQuery, SendMessageRequest};
use nexus_types::models::Sender;

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: u32 = 50;

/// Record an agent reply. Delivery to the channel itself happens elsewhere.
pub async fn send_message(
    State(state): State<AppState>,
    req: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let contact = req.contact.unwrap_or_default();
    let body = req.body.unwrap_or_default();

    let log = state.log.clone();
    let message = run_blocking(move || log.append(&contact, Sender::Agent, &body, None)).await?;

    info!("Stored agent message {} for {}", message.id, message.contact);

    Ok((StatusCode::CREATED, Json(message)))
}

/// Debug view of the newest messages across every contact.
pub async fn recent_messages(
    State(state): State<AppState>,
    query: Result<Query<RecentMessagesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    let log = state.log.clone();
    let messages = run_blocking(move || log.list_recent(limit)).await?;

    Ok(Json(messages))
}
