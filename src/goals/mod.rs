use axum::{
    routing::{get, patch, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_goals).post(handlers::create_goal))
        .route(
            "/:id",
            put(handlers::update_goal).delete(handlers::delete_goal),
        )
        .route("/:id/increment-streak", patch(handlers::increment_streak))
}
