use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let conversations = state.conversations.clone();
    let list = run_blocking(move || conversations.list_conversations()).await?;

    Ok(Json(list))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(contact): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversations = state.conversations.clone();
    let history = run_blocking(move || conversations.get_history(&contact)).await?;

    Ok(Json(history))
}
