use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_frequency, validate_streak, CreateGoal, GoalResponse, UpdateGoal},
    repo::WellnessGoal,
};
use crate::{auth::extractors::CurrentUser, error::ApiError, state::AppState};

#[instrument(skip(state, user, payload))]
pub async fn create_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateGoal>,
) -> Result<(StatusCode, Json<GoalResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    validate_frequency(payload.target_frequency)?;

    let goal = WellnessGoal::create(&state.db, user.id, &payload).await?;

    info!(user_id = %user.id, goal_id = %goal.id, "wellness goal created");
    Ok((
        StatusCode::CREATED,
        Json(GoalResponse {
            message: "Wellness goal created successfully",
            goal,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_goals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WellnessGoal>>, ApiError> {
    let goals = WellnessGoal::list_by_user(&state.db, user.id).await?;
    Ok(Json(goals))
}

#[instrument(skip(state, user, payload))]
pub async fn update_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoal>,
) -> Result<Json<GoalResponse>, ApiError> {
    if let Some(frequency) = payload.target_frequency {
        validate_frequency(frequency)?;
    }
    if let Some(streak) = payload.current_streak {
        validate_streak(streak)?;
    }

    let goal = WellnessGoal::update(&state.db, user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Wellness goal"))?;

    Ok(Json(GoalResponse {
        message: "Wellness goal updated successfully",
        goal,
    }))
}

#[instrument(skip(state, user))]
pub async fn increment_streak(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goal = WellnessGoal::increment_streak(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Wellness goal"))?;

    Ok(Json(GoalResponse {
        message: "Streak incremented successfully",
        goal,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !WellnessGoal::delete(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Wellness goal"));
    }
    Ok(Json(serde_json::json!({ "message": "Wellness goal deleted successfully" })))
}
