use axum::{
    extract::{FromRef, Query, State},
    response::Redirect,
    Json,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::AuthResponse,
        jwt::JwtKeys,
        repo::{LoginCode, User},
    },
    config::GoogleConfig,
    error::ApiError,
    state::AppState,
};

/// Identity the provider has already verified for us: this is the only
/// thing the bridge consumes, the provider protocol stays behind the trait.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub provider_id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start the provider's consent flow.
    fn authorize_url(&self) -> String;

    /// Trade the provider's authorization code for a verified identity.
    async fn resolve_identity(&self, code: &str) -> anyhow::Result<ExternalIdentity>;
}

pub struct GoogleProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleProvider {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self) -> String {
        format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode("openid email profile"),
        )
    }

    async fn resolve_identity(&self, code: &str) -> anyhow::Result<ExternalIdentity> {
        let token: GoogleTokenResponse = self
            .http
            .post("https://oauth2.googleapis.com/token")
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let info: GoogleUserInfo = self
            .http
            .get("https://openidconnect.googleapis.com/v1/userinfo")
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(ExternalIdentity {
            provider_id: info.sub,
            email: info.email,
            name: info.name,
            avatar: info.picture,
        })
    }
}

// --- handlers ---

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub code: String,
}

#[instrument(skip(state))]
pub async fn google_entry(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.oauth.authorize_url())
}

/// Provider callback. This leg is a full-page navigation, so both outcomes
/// are redirects: success carries a one-time login code (never the bearer
/// token itself), failure lands on the client's error state.
#[instrument(skip(state, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let failure_url = format!("{}/auth?error=authentication_failed", state.config.client_url);

    let Some(code) = query.code else {
        warn!(provider_error = ?query.error, "provider denied the authorization");
        return Redirect::temporary(&failure_url);
    };

    match bridge_login(&state, &code).await {
        Ok(login_code) => {
            let url = format!("{}/auth/success?code={}", state.config.client_url, login_code);
            Redirect::temporary(&url)
        }
        Err(e) => {
            error!(error = %e, "oauth bridge failed");
            Redirect::temporary(&failure_url)
        }
    }
}

async fn bridge_login(state: &AppState, code: &str) -> Result<String, ApiError> {
    let identity = state.oauth.resolve_identity(code).await.map_err(|e| {
        warn!(error = %e, "identity provider exchange failed");
        ApiError::UpstreamAuthFailure
    })?;

    let email = identity.email.trim().to_lowercase();
    let user = User::find_or_create_google(&state.db, &email, &identity).await?;

    info!(user_id = %user.id, "oauth identity resolved");
    LoginCode::issue(&state.db, user.id).await
}

/// Same-origin POST trading the one-time code for the same bearer token
/// local login issues. Unknown, expired or already-consumed codes 404.
#[instrument(skip(state, payload))]
pub async fn google_exchange(
    State(state): State<AppState>,
    Json(payload): Json<ExchangeRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user_id = LoginCode::consume(&state.db, &payload.code)
        .await?
        .ok_or(ApiError::NotFound("Login code"))?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "oauth login code exchanged");
    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_escapes_parameters() {
        let provider = GoogleProvider::new(&GoogleConfig {
            client_id: "client id".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost:8080/api/auth/google/callback".into(),
        });
        let url = provider.authorize_url();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080"));
        assert!(!url.contains("secret"));
    }

    #[tokio::test]
    async fn fake_provider_resolves_identity() {
        let state = AppState::fake();
        let identity = state.oauth.resolve_identity("any-code").await.unwrap();
        assert_eq!(identity.email, "fake@example.com");
    }
}
