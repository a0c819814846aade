use axum::{extract::State, Json};
use models::Message;

use crate::errors::ApiError;
use crate::state::ServerState;

/// GET /messages
pub async fn list_messages(State(state): State<ServerState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.messages.get_all_messages().await?;
    Ok(Json(messages))
}

/// POST /messages
pub async fn create_message(
    State(state): State<ServerState>,
    Json(message): Json<Message>,
) -> Result<Json<Message>, ApiError> {
    let saved = state.messages.save_message(message).await?;
    Ok(Json(saved))
}
