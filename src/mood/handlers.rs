use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_mood_level, CreateMoodEntry, MoodEntryResponse, UpdateMoodEntry},
    repo::MoodEntry,
};
use crate::{auth::extractors::CurrentUser, error::ApiError, pagination::Pagination, state::AppState};

#[instrument(skip(state, user, payload))]
pub async fn create_mood_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateMoodEntry>,
) -> Result<(StatusCode, Json<MoodEntryResponse>), ApiError> {
    validate_mood_level(payload.mood_level)?;

    let entry = MoodEntry::create(&state.db, user.id, &payload).await?;

    info!(user_id = %user.id, entry_id = %entry.id, "mood entry created");
    Ok((
        StatusCode::CREATED,
        Json(MoodEntryResponse {
            message: "Mood entry created successfully",
            mood_entry: entry,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_mood_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MoodEntry>>, ApiError> {
    let entries =
        MoodEntry::list_by_user(&state.db, user.id, p.capped_limit(), p.offset()).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, user, payload))]
pub async fn update_mood_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMoodEntry>,
) -> Result<Json<MoodEntryResponse>, ApiError> {
    if let Some(level) = payload.mood_level {
        validate_mood_level(level)?;
    }

    let entry = MoodEntry::update(&state.db, user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Mood entry"))?;

    Ok(Json(MoodEntryResponse {
        message: "Mood entry updated successfully",
        mood_entry: entry,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_mood_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !MoodEntry::delete(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Mood entry"));
    }
    Ok(Json(serde_json::json!({ "message": "Mood entry deleted successfully" })))
}
