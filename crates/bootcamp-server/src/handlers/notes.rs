//! Note handlers

use crate::error::ApiError;
use crate::extractors::{ApiPath, TextPath};
use crate::storage::Note;
use crate::AppState;
use axum::{extract::State, Json};
use tracing::info;

pub async fn create(
    State(state): State<AppState>,
    mut params: TextPath,
) -> Result<Json<Note>, ApiError> {
    let text = params.take("note");
    let id = state.db.insert_note(&text).await?;
    info!("Created note {}", id);

    Ok(Json(Note { id, text }))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Note>, ApiError> {
    state
        .db
        .get_note(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Note not found"))
}
