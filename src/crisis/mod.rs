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
        .route("/", get(handlers::get_resources).post(handlers::create_resource))
        .route(
            "/:id",
            put(handlers::update_resource).delete(handlers::delete_resource),
        )
}
