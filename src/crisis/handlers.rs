use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateResource, ResourceResponse, UpdateResource},
    repo::CrisisResource,
};
use crate::{auth::extractors::CurrentUser, error::ApiError, state::AppState};

/// Crisis resources must stay reachable without an account.
#[instrument(skip(state))]
pub async fn get_resources(
    State(state): State<AppState>,
) -> Result<Json<Vec<CrisisResource>>, ApiError> {
    let resources = CrisisResource::list_active(&state.db).await?;
    Ok(Json(resources))
}

#[instrument(skip(state, user, payload))]
pub async fn create_resource(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateResource>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }

    let resource = CrisisResource::create(&state.db, &payload).await?;

    info!(user_id = %user.id, resource_id = %resource.id, "crisis resource created");
    Ok((
        StatusCode::CREATED,
        Json(ResourceResponse {
            message: "Crisis resource created successfully",
            resource,
        }),
    ))
}

#[instrument(skip(state, user, payload))]
pub async fn update_resource(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResource>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let resource = CrisisResource::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Crisis resource"))?;

    info!(user_id = %user.id, resource_id = %resource.id, "crisis resource updated");
    Ok(Json(ResourceResponse {
        message: "Crisis resource updated successfully",
        resource,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_resource(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !CrisisResource::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Crisis resource"));
    }
    info!(user_id = %user.id, %id, "crisis resource deleted");
    Ok(Json(serde_json::json!({ "message": "Crisis resource deleted successfully" })))
}
