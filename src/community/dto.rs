use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::PostWithAuthor;
use crate::error::ApiError;

pub const CATEGORIES: [&str; 7] = [
    "general",
    "anxiety",
    "depression",
    "mindfulness",
    "self-care",
    "success-stories",
    "resources",
];

fn default_category() -> String {
    "general".into()
}

#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostFilter {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostAuthor {
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Read view of a post. The author block is withheld for anonymous posts;
/// `is_mine` personalizes the listing for an authenticated viewer.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_anonymous: bool,
    pub likes_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<PostAuthor>,
    pub is_mine: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostView {
    pub fn for_viewer(post: PostWithAuthor, viewer: Option<Uuid>) -> Self {
        let author = if post.is_anonymous {
            None
        } else {
            Some(PostAuthor {
                name: post.author_name,
                username: post.author_username,
            })
        };
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            category: post.category,
            is_anonymous: post.is_anonymous,
            likes_count: post.likes_count,
            author,
            is_mine: viewer == Some(post.user_id),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub message: &'static str,
    pub post: super::repo::CommunityPost,
}

pub fn validate_category(category: &str) -> Result<(), ApiError> {
    if !CATEGORIES.contains(&category) {
        return Err(ApiError::Validation(format!(
            "category must be one of: {}",
            CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(is_anonymous: bool, user_id: Uuid) -> PostWithAuthor {
        PostWithAuthor {
            id: Uuid::new_v4(),
            user_id,
            title: "One day at a time".into(),
            content: "…".into(),
            category: "success-stories".into(),
            is_anonymous,
            likes_count: 3,
            author_name: Some("Alice".into()),
            author_username: Some("alice".into()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn anonymous_post_hides_author() {
        let view = PostView::for_viewer(sample_post(true, Uuid::new_v4()), None);
        assert!(view.author.is_none());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("Alice"));
    }

    #[test]
    fn named_post_shows_author() {
        let view = PostView::for_viewer(sample_post(false, Uuid::new_v4()), None);
        assert_eq!(view.author.as_ref().unwrap().name.as_deref(), Some("Alice"));
    }

    #[test]
    fn viewer_sees_their_own_post_flagged() {
        let me = Uuid::new_v4();
        let view = PostView::for_viewer(sample_post(true, me), Some(me));
        assert!(view.is_mine);
        let other = PostView::for_viewer(sample_post(true, Uuid::new_v4()), Some(me));
        assert!(!other.is_mine);
    }

    #[test]
    fn category_whitelist() {
        assert!(validate_category("general").is_ok());
        assert!(validate_category("gossip").is_err());
    }
}
