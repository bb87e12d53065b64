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
        .route("/", get(handlers::get_mood_entries).post(handlers::create_mood_entry))
        .route(
            "/:id",
            put(handlers::update_mood_entry).delete(handlers::delete_mood_entry),
        )
}
