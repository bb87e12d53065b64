use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_journal_entries).post(handlers::create_journal_entry),
        )
        .route(
            "/:id",
            get(handlers::get_journal_entry)
                .put(handlers::update_journal_entry)
                .delete(handlers::delete_journal_entry),
        )
}
