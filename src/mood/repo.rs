use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateMoodEntry, UpdateMoodEntry};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_level: i16,
    pub emotions: Vec<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MoodEntry {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreateMoodEntry,
    ) -> Result<MoodEntry, ApiError> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (user_id, mood_level, emotions, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.mood_level)
        .bind(&payload.emotions)
        .bind(payload.notes.as_deref())
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MoodEntry>, ApiError> {
        let entries = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
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
        Ok(entries)
    }

    /// Owner-scoped partial update; `None` when the entry does not exist
    /// or belongs to someone else.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdateMoodEntry,
    ) -> Result<Option<MoodEntry>, ApiError> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            UPDATE mood_entries
            SET mood_level = COALESCE($3, mood_level),
                emotions = COALESCE($4, emotions),
                notes = COALESCE($5, notes),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payload.mood_level)
        .bind(payload.emotions.as_deref())
        .bind(payload.notes.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
