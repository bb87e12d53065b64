use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_category, CreatePost, PostFilter, PostResponse, PostView, UpdatePost},
    repo::CommunityPost,
};
use crate::{
    auth::extractors::{CurrentUser, MaybeUser},
    error::ApiError,
    pagination::Pagination,
    state::AppState,
};

/// Public listing with optional personalization: anonymous readers get the
/// same posts, authenticated ones additionally see which are their own.
#[instrument(skip(state, viewer))]
pub async fn get_posts(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(filter): Query<PostFilter>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PostView>>, ApiError> {
    let category = filter
        .category
        .as_deref()
        .filter(|c| *c != "all");

    let viewer_id = viewer.map(|u| u.id);
    let posts = CommunityPost::list(&state.db, category, p.capped_limit(), p.offset()).await?;
    let views = posts
        .into_iter()
        .map(|post| PostView::for_viewer(post, viewer_id))
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state, viewer))]
pub async fn get_post(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostView>, ApiError> {
    let post = CommunityPost::find_with_author(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Community post"))?;
    Ok(Json(PostView::for_viewer(post, viewer.map(|u| u.id))))
}

#[instrument(skip(state, user, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePost>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    validate_category(&payload.category)?;

    let post = CommunityPost::create(&state.db, user.id, &payload).await?;

    info!(user_id = %user.id, post_id = %post.id, "community post created");
    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: "Community post created successfully",
            post,
        }),
    ))
}

#[instrument(skip(state, user, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePost>,
) -> Result<Json<PostResponse>, ApiError> {
    if let Some(category) = payload.category.as_deref() {
        validate_category(category)?;
    }

    let post = CommunityPost::update(&state.db, user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Community post"))?;

    Ok(Json(PostResponse {
        message: "Community post updated successfully",
        post,
    }))
}

#[instrument(skip(state, user))]
pub async fn like_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = CommunityPost::like(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Community post"))?;

    info!(user_id = %user.id, post_id = %post.id, "post liked");
    Ok(Json(PostResponse {
        message: "Post liked successfully",
        post,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !CommunityPost::delete(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Community post"));
    }
    Ok(Json(serde_json::json!({ "message": "Community post deleted successfully" })))
}
