use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtKeys, repo::User},
    error::ApiError,
    state::AppState,
};

/// Result of running the one verification primitive over a request:
/// either a proven identity or no credentials at all. Verification
/// failures are errors, not an outcome.
pub enum AuthOutcome {
    Authenticated(User),
    Anonymous,
}

/// Seam between token verification and the credential store. Production
/// code always goes through `DbLookup`; tests substitute a fake the same
/// way `IdentityProvider` is faked for the OAuth bridge.
#[async_trait]
trait UserLookup: Sync {
    async fn find(&self, id: Uuid) -> Result<Option<User>, ApiError>;
}

struct DbLookup<'a>(&'a PgPool);

#[async_trait]
impl UserLookup for DbLookup<'_> {
    async fn find(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        User::find_by_id(self.0, id).await
    }
}

/// Shared primitive behind both extractors: pull the bearer token, verify
/// it, then materialize the user. A verified token whose subject no longer
/// exists is treated as invalid (stale token).
async fn authenticate(
    parts: &Parts,
    state: &AppState,
    users: &dyn UserLookup,
) -> Result<AuthOutcome, ApiError> {
    let Some(header) = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(AuthOutcome::Anonymous);
    };

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or(ApiError::InvalidToken)?;

    let keys = JwtKeys::from_ref(state);
    let claims = keys.verify(token)?;

    let user = users.find(claims.sub).await?.ok_or_else(|| {
        warn!(user_id = %claims.sub, "token subject no longer exists");
        ApiError::InvalidToken
    })?;

    Ok(AuthOutcome::Authenticated(user))
}

async fn require_user(
    parts: &Parts,
    state: &AppState,
    users: &dyn UserLookup,
) -> Result<CurrentUser, ApiError> {
    match authenticate(parts, state, users).await? {
        AuthOutcome::Authenticated(user) => Ok(CurrentUser(user)),
        AuthOutcome::Anonymous => Err(ApiError::Unauthenticated),
    }
}

async fn allow_anonymous(parts: &Parts, state: &AppState, users: &dyn UserLookup) -> MaybeUser {
    match authenticate(parts, state, users).await {
        Ok(AuthOutcome::Authenticated(user)) => MaybeUser(Some(user)),
        Ok(AuthOutcome::Anonymous) => MaybeUser(None),
        Err(e) => {
            debug!(error = %e, "optional auth degraded to anonymous");
            MaybeUser(None)
        }
    }
}

/// Mandatory gate: the route runs only with a proven identity.
#[derive(Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_user(parts, state, &DbLookup(&state.db)).await
    }
}

/// Optional gate: attaches the identity when a valid token is present and
/// otherwise continues anonymously. Never rejects the request.
#[derive(Debug)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(allow_anonymous(parts, state, &DbLookup(&state.db)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn parts_with(auth_header: Option<&str>) -> Parts {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = auth_header {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn sample_user(id: Uuid) -> User {
        User {
            id,
            email: "alice@example.com".into(),
            password_hash: Some("$argon2id$v=19$secret".into()),
            name: Some("Alice".into()),
            username: None,
            avatar: None,
            google_id: None,
            is_verified: false,
            email_confirmation_token: None,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    /// Lookup that knows exactly one user, or none at all.
    struct FixedLookup(Option<User>);

    #[async_trait]
    impl UserLookup for FixedLookup {
        async fn find(&self, _id: Uuid) -> Result<Option<User>, ApiError> {
            Ok(self.0.clone())
        }
    }

    fn signed_token(state: &AppState, user_id: Uuid) -> String {
        JwtKeys::from_ref(state).sign(user_id).unwrap()
    }

    #[tokio::test]
    async fn mandatory_rejects_missing_header_as_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with(None);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn mandatory_rejects_non_bearer_scheme() {
        let state = AppState::fake();
        let mut parts = parts_with(Some("Basic YWxhZGRpbjpvcGVuc2VzYW1l"));
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn mandatory_rejects_garbage_token() {
        let state = AppState::fake();
        let mut parts = parts_with(Some("Bearer not-a-jwt"));
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn mandatory_accepts_valid_token_for_existing_user() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = signed_token(&state, user_id);
        let parts = parts_with(Some(&format!("Bearer {token}")));

        let CurrentUser(user) =
            require_user(&parts, &state, &FixedLookup(Some(sample_user(user_id))))
                .await
                .unwrap();
        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn mandatory_rejects_token_for_deleted_user() {
        let state = AppState::fake();
        let token = signed_token(&state, Uuid::new_v4());
        let parts = parts_with(Some(&format!("Bearer {token}")));

        let err = require_user(&parts, &state, &FixedLookup(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn optional_continues_anonymous_without_header() {
        let state = AppState::fake();
        let mut parts = parts_with(None);
        let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn optional_swallows_broken_token() {
        let state = AppState::fake();
        let mut parts = parts_with(Some("Bearer broken.token.here"));
        let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn optional_degrades_token_for_deleted_user_to_anonymous() {
        let state = AppState::fake();
        let token = signed_token(&state, Uuid::new_v4());
        let parts = parts_with(Some(&format!("Bearer {token}")));

        let MaybeUser(user) = allow_anonymous(&parts, &state, &FixedLookup(None)).await;
        assert!(user.is_none());
    }
}
