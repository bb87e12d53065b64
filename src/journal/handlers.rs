use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_mood_rating, CreateJournalEntry, JournalEntryResponse, UpdateJournalEntry},
    repo::JournalEntry,
};
use crate::{auth::extractors::CurrentUser, error::ApiError, pagination::Pagination, state::AppState};

#[instrument(skip(state, user, payload))]
pub async fn create_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateJournalEntry>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    if let Some(rating) = payload.mood_rating {
        validate_mood_rating(rating)?;
    }

    let entry = JournalEntry::create(&state.db, user.id, &payload).await?;

    info!(user_id = %user.id, entry_id = %entry.id, "journal entry created");
    Ok((
        StatusCode::CREATED,
        Json(JournalEntryResponse {
            message: "Journal entry created successfully",
            journal_entry: entry,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_journal_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let entries =
        JournalEntry::list_by_user(&state.db, user.id, p.capped_limit(), p.offset()).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, user))]
pub async fn get_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, ApiError> {
    let entry = JournalEntry::find(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Journal entry"))?;
    Ok(Json(entry))
}

#[instrument(skip(state, user, payload))]
pub async fn update_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJournalEntry>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    if let Some(rating) = payload.mood_rating {
        validate_mood_rating(rating)?;
    }

    let entry = JournalEntry::update(&state.db, user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Journal entry"))?;

    Ok(Json(JournalEntryResponse {
        message: "Journal entry updated successfully",
        journal_entry: entry,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !JournalEntry::delete(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Journal entry"));
    }
    Ok(Json(serde_json::json!({ "message": "Journal entry deleted successfully" })))
}
