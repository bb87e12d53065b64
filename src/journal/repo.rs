use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateJournalEntry, UpdateJournalEntry};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub mood_rating: Option<i16>,
    pub is_private: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl JournalEntry {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreateJournalEntry,
    ) -> Result<JournalEntry, ApiError> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (user_id, title, content, mood_rating, is_private)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.title.trim())
        .bind(&payload.content)
        .bind(payload.mood_rating)
        .bind(payload.is_private)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JournalEntry>, ApiError> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
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

    pub async fn find(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<JournalEntry>, ApiError> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdateJournalEntry,
    ) -> Result<Option<JournalEntry>, ApiError> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            UPDATE journal_entries
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                mood_rating = COALESCE($5, mood_rating),
                is_private = COALESCE($6, is_private),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payload.title.as_deref())
        .bind(payload.content.as_deref())
        .bind(payload.mood_rating)
        .bind(payload.is_private)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
