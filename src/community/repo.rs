use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{CreatePost, UpdatePost};
use crate::error::ApiError;

/// Raw post row. `user_id` is skipped in JSON so write responses cannot
/// unmask the author of an anonymous post.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommunityPost {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_anonymous: bool,
    pub likes_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Post joined with its author's public profile fields, for read views.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_anonymous: bool,
    pub likes_count: i32,
    pub author_name: Option<String>,
    pub author_username: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const POST_WITH_AUTHOR: &str = r#"
    SELECT p.id, p.user_id, p.title, p.content, p.category, p.is_anonymous,
           p.likes_count, p.created_at, p.updated_at,
           u.name AS author_name, u.username AS author_username
    FROM community_posts p
    JOIN users u ON u.id = p.user_id
"#;

impl CommunityPost {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        payload: &CreatePost,
    ) -> Result<CommunityPost, ApiError> {
        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            INSERT INTO community_posts (user_id, title, content, category, is_anonymous)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.title.trim())
        .bind(&payload.content)
        .bind(&payload.category)
        .bind(payload.is_anonymous)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn list(
        db: &PgPool,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, ApiError> {
        let sql = format!(
            "{POST_WITH_AUTHOR}
             WHERE ($1::TEXT IS NULL OR p.category = $1)
             ORDER BY p.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostWithAuthor>(&sql)
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;
        Ok(posts)
    }

    pub async fn find_with_author(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<PostWithAuthor>, ApiError> {
        let sql = format!("{POST_WITH_AUTHOR} WHERE p.id = $1");
        let post = sqlx::query_as::<_, PostWithAuthor>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(post)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdatePost,
    ) -> Result<Option<CommunityPost>, ApiError> {
        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            UPDATE community_posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                category = COALESCE($5, category),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payload.title.as_deref())
        .bind(payload.content.as_deref())
        .bind(payload.category.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    /// Any authenticated user may like any post; the increment is atomic.
    pub async fn like(db: &PgPool, id: Uuid) -> Result<Option<CommunityPost>, ApiError> {
        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            UPDATE community_posts
            SET likes_count = likes_count + 1,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM community_posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
