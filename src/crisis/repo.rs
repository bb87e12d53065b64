use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreateResource, UpdateResource};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CrisisResource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    pub country: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl CrisisResource {
    /// Public list: active resources only, grouped by country.
    pub async fn list_active(db: &PgPool) -> Result<Vec<CrisisResource>, ApiError> {
        let resources = sqlx::query_as::<_, CrisisResource>(
            r#"
            SELECT * FROM crisis_resources
            WHERE is_active
            ORDER BY country ASC, title ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(resources)
    }

    pub async fn create(
        db: &PgPool,
        payload: &CreateResource,
    ) -> Result<CrisisResource, ApiError> {
        let resource = sqlx::query_as::<_, CrisisResource>(
            r#"
            INSERT INTO crisis_resources (title, description, phone_number, website_url, country)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.phone_number.as_deref())
        .bind(payload.website_url.as_deref())
        .bind(&payload.country)
        .fetch_one(db)
        .await?;
        Ok(resource)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        payload: &UpdateResource,
    ) -> Result<Option<CrisisResource>, ApiError> {
        let resource = sqlx::query_as::<_, CrisisResource>(
            r#"
            UPDATE crisis_resources
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                phone_number = COALESCE($4, phone_number),
                website_url = COALESCE($5, website_url),
                country = COALESCE($6, country),
                is_active = COALESCE($7, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.phone_number.as_deref())
        .bind(payload.website_url.as_deref())
        .bind(payload.country.as_deref())
        .bind(payload.is_active)
        .fetch_optional(db)
        .await?;
        Ok(resource)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM crisis_resources WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
