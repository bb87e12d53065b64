use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateSession, UpdateSession};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MeditationSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_type: String,
    pub duration_minutes: i32,
    pub completed: bool,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Aggregates over the user's completed sessions.
#[derive(Debug, Serialize, FromRow)]
pub struct SessionStats {
    pub total_sessions: i64,
    pub total_minutes: i64,
    pub avg_duration: f64,
}

impl MeditationSession {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreateSession,
    ) -> Result<MeditationSession, ApiError> {
        let session = sqlx::query_as::<_, MeditationSession>(
            r#"
            INSERT INTO meditation_sessions (user_id, session_type, duration_minutes, completed, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&payload.session_type)
        .bind(payload.duration_minutes)
        .bind(payload.completed)
        .bind(payload.notes.as_deref())
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MeditationSession>, ApiError> {
        let sessions = sqlx::query_as::<_, MeditationSession>(
            r#"
            SELECT * FROM meditation_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(sessions)
    }

    pub async fn stats(db: &PgPool, user_id: Uuid) -> Result<SessionStats, ApiError> {
        let stats = sqlx::query_as::<_, SessionStats>(
            r#"
            SELECT COUNT(*) AS total_sessions,
                   COALESCE(SUM(duration_minutes), 0)::BIGINT AS total_minutes,
                   COALESCE(AVG(duration_minutes), 0)::DOUBLE PRECISION AS avg_duration
            FROM meditation_sessions
            WHERE user_id = $1 AND completed
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(stats)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdateSession,
    ) -> Result<Option<MeditationSession>, ApiError> {
        let session = sqlx::query_as::<_, MeditationSession>(
            r#"
            UPDATE meditation_sessions
            SET session_type = COALESCE($3, session_type),
                duration_minutes = COALESCE($4, duration_minutes),
                completed = COALESCE($5, completed),
                notes = COALESCE($6, notes),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payload.session_type.as_deref())
        .bind(payload.duration_minutes)
        .bind(payload.completed)
        .bind(payload.notes.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM meditation_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
