use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateGoal, UpdateGoal};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WellnessGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_frequency: i32,
    pub current_streak: i32,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl WellnessGoal {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreateGoal,
    ) -> Result<WellnessGoal, ApiError> {
        let goal = sqlx::query_as::<_, WellnessGoal>(
            r#"
            INSERT INTO wellness_goals (user_id, title, description, target_frequency)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.title.trim())
        .bind(payload.description.as_deref())
        .bind(payload.target_frequency)
        .fetch_one(db)
        .await?;
        Ok(goal)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<WellnessGoal>, ApiError> {
        let goals = sqlx::query_as::<_, WellnessGoal>(
            r#"
            SELECT * FROM wellness_goals
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(goals)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdateGoal,
    ) -> Result<Option<WellnessGoal>, ApiError> {
        let goal = sqlx::query_as::<_, WellnessGoal>(
            r#"
            UPDATE wellness_goals
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                target_frequency = COALESCE($5, target_frequency),
                current_streak = COALESCE($6, current_streak),
                is_completed = COALESCE($7, is_completed),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.target_frequency)
        .bind(payload.current_streak)
        .bind(payload.is_completed)
        .fetch_optional(db)
        .await?;
        Ok(goal)
    }

    /// Atomic increment; concurrent bumps serialize at the row.
    pub async fn increment_streak(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<WellnessGoal>, ApiError> {
        let goal = sqlx::query_as::<_, WellnessGoal>(
            r#"
            UPDATE wellness_goals
            SET current_streak = current_streak + 1,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(goal)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM wellness_goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
