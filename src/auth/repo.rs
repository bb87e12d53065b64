use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::oauth::ExternalIdentity;
use crate::error::ApiError;

/// Credential-store record. Deliberately not `Serialize`: the public view
/// is `PublicUser` in dto.rs, so a password hash can never leak into JSON.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// NULL for accounts created through the OAuth bridge.
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub google_id: Option<String>,
    pub is_verified: bool,
    pub email_confirmation_token: Option<String>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Insert a local-credential account. A lost registration race surfaces
    /// as `DuplicateEmail` via the unique index on email.
    pub async fn create_local(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        confirmation_token: &str,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, email_confirmation_token)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(confirmation_token)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Look up or create the record backing an OAuth identity. A new record
    /// has no password hash; an existing one gains the provider linkage and
    /// avatar if it did not have them yet.
    pub async fn find_or_create_google(
        db: &PgPool,
        email: &str,
        identity: &ExternalIdentity,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, avatar, google_id, is_verified)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (email) DO UPDATE SET
                google_id = COALESCE(users.google_id, EXCLUDED.google_id),
                name = COALESCE(users.name, EXCLUDED.name),
                avatar = COALESCE(users.avatar, EXCLUDED.avatar),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(identity.name.as_deref())
        .bind(identity.avatar.as_deref())
        .bind(identity.provider_id.as_str())
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        username: Option<&str>,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                username = COALESCE($3, username),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token: &str,
        expires: OffsetDateTime,
    ) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_reset_token = $2,
                password_reset_expires = $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(expires)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Set the new hash and consume the reset token in one statement, so the
    /// token cannot be replayed. Returns `None` when the token is unknown,
    /// expired or already used.
    pub async fn reset_password_by_token(
        db: &PgPool,
        token: &str,
        new_hash: &str,
    ) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $2,
                password_reset_token = NULL,
                password_reset_expires = NULL,
                updated_at = now()
            WHERE password_reset_token = $1
              AND password_reset_expires > now()
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(new_hash)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}

/// One-time code minted by the OAuth callback and traded for a bearer token
/// via a same-origin POST, so no bearer token ever lands in a redirect URL.
pub struct LoginCode;

const LOGIN_CODE_TTL_SECONDS: i64 = 60;

impl LoginCode {
    pub async fn issue(db: &PgPool, user_id: Uuid) -> Result<String, ApiError> {
        // Opportunistic sweep of codes that were never exchanged.
        sqlx::query("DELETE FROM login_codes WHERE expires_at <= now()")
            .execute(db)
            .await?;

        let code = crate::auth::generate_token();
        let expires = OffsetDateTime::now_utc() + time::Duration::seconds(LOGIN_CODE_TTL_SECONDS);
        sqlx::query("INSERT INTO login_codes (code, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&code)
            .bind(user_id)
            .bind(expires)
            .execute(db)
            .await?;
        Ok(code)
    }

    /// Atomic single-use consumption: the row is deleted as it is read.
    pub async fn consume(db: &PgPool, code: &str) -> Result<Option<Uuid>, ApiError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "DELETE FROM login_codes WHERE code = $1 AND expires_at > now() RETURNING user_id",
        )
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(row.map(|(user_id,)| user_id))
    }
}
