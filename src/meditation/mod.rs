use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_sessions).post(handlers::create_session))
        .route("/stats", get(handlers::get_session_stats))
        .route(
            "/:id",
            put(handlers::update_session).delete(handlers::delete_session),
        )
}
