use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, CheckResponse, ForgotPasswordRequest, ForgotPasswordResponse,
            LoginRequest, ProfileResponse, PublicUser, RegisterRequest, ResetPasswordRequest,
            UpdateProfileRequest,
        },
        extractors::{CurrentUser, MaybeUser},
        generate_token,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

const RESET_TOKEN_TTL_MINUTES: i64 = 10;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    Ok(())
}

/// Argon2 is CPU-bound; keep it off the async executor.
async fn hash_password_blocking(password: String) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(hash)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    validate_password(&payload.password)?;

    let hash = hash_password_blocking(payload.password).await?;
    let confirmation_token = generate_token();

    // The unique index arbitrates concurrent registrations; a lost race
    // comes back as DuplicateEmail from the insert itself.
    let user = User::create_local(
        &state.db,
        &payload.email,
        &hash,
        &payload.name,
        &confirmation_token,
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email, wrong password and OAuth-only accounts all fail the
    // same way, so the endpoint cannot be used to enumerate emails.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let Some(stored_hash) = user.password_hash.clone() else {
        warn!(user_id = %user.id, "login attempt against oauth-only account");
        return Err(ApiError::InvalidCredentials);
    };

    let password = payload.password;
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(anyhow::Error::from)??;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: user.into(),
    }))
}

/// Tokens are self-contained and not revocable, so logout is purely a
/// client-side transition; the endpoint exists for API symmetry.
#[instrument]
pub async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Logout successful" }))
}

#[instrument(skip(user))]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let updated = User::update_profile(
        &state.db,
        user.id,
        payload.name.as_deref(),
        payload.username.as_deref(),
    )
    .await?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user: updated.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let reset_token = generate_token();
    let expires = OffsetDateTime::now_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    User::set_reset_token(&state.db, user.id, &reset_token, expires).await?;

    info!(user_id = %user.id, "password reset token generated");
    // Email delivery is not wired up; hand the token back directly.
    Ok(Json(ForgotPasswordResponse {
        message: "Password reset token generated",
        reset_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_password(&payload.password)?;

    let hash = hash_password_blocking(payload.password).await?;

    // One statement sets the new hash and nulls the token, so a second
    // attempt with the same token finds nothing.
    let user = User::reset_password_by_token(&state.db, &payload.token, &hash)
        .await?
        .ok_or(ApiError::NotFound("Reset token"))?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(serde_json::json!({ "message": "Password reset successful" })))
}

#[instrument(skip(user))]
pub async fn check(MaybeUser(user): MaybeUser) -> Json<CheckResponse> {
    Json(CheckResponse {
        authenticated: user.is_some(),
        user: user.map(PublicUser::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_normal_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
    }

    #[test]
    fn email_validation_rejects_garbage() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn short_passwords_rejected() {
        assert!(matches!(
            validate_password("seven77").unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(validate_password("hunter22").is_ok());
    }
}
