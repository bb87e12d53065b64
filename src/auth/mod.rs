use axum::{
    routing::{get, post},
    Router,
};
use rand::Rng;

use crate::state::AppState;

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod oauth;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password", post(handlers::reset_password))
        .route("/profile", get(handlers::get_profile).put(handlers::update_profile))
        .route("/check", get(handlers::check))
        .route("/google", get(oauth::google_entry))
        .route("/google/callback", get(oauth::google_callback))
        .route("/google/exchange", post(oauth::google_exchange))
}

/// Random 32-byte hex string, used for email-confirmation tokens,
/// password-reset tokens and one-time OAuth login codes.
pub(crate) fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
