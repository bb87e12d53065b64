use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_duration, validate_session_type, CreateSession, SessionResponse, UpdateSession},
    repo::{MeditationSession, SessionStats},
};
use crate::{auth::extractors::CurrentUser, error::ApiError, pagination::Pagination, state::AppState};

#[instrument(skip(state, user, payload))]
pub async fn create_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateSession>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    validate_session_type(&payload.session_type)?;
    validate_duration(payload.duration_minutes)?;

    let session = MeditationSession::create(&state.db, user.id, &payload).await?;

    info!(user_id = %user.id, session_id = %session.id, "meditation session recorded");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "Meditation session created successfully",
            session,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_sessions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MeditationSession>>, ApiError> {
    let sessions =
        MeditationSession::list_by_user(&state.db, user.id, p.capped_limit(), p.offset()).await?;
    Ok(Json(sessions))
}

#[instrument(skip(state, user))]
pub async fn get_session_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SessionStats>, ApiError> {
    let stats = MeditationSession::stats(&state.db, user.id).await?;
    Ok(Json(stats))
}

#[instrument(skip(state, user, payload))]
pub async fn update_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSession>,
) -> Result<Json<SessionResponse>, ApiError> {
    if let Some(session_type) = payload.session_type.as_deref() {
        validate_session_type(session_type)?;
    }
    if let Some(minutes) = payload.duration_minutes {
        validate_duration(minutes)?;
    }

    let session = MeditationSession::update(&state.db, user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Meditation session"))?;

    Ok(Json(SessionResponse {
        message: "Meditation session updated successfully",
        session,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !MeditationSession::delete(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Meditation session"));
    }
    Ok(Json(serde_json::json!({ "message": "Meditation session deleted successfully" })))
}
