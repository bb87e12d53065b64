use serde::{Deserialize, Serialize};

use super::repo::JournalEntry;
use crate::error::ApiError;

fn default_private() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateJournalEntry {
    pub title: String,
    pub content: String,
    pub mood_rating: Option<i16>,
    /// Entries default to private; sharing is an explicit choice.
    #[serde(default = "default_private")]
    pub is_private: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJournalEntry {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood_rating: Option<i16>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    pub message: &'static str,
    pub journal_entry: JournalEntry,
}

pub fn validate_mood_rating(rating: i16) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation(
            "mood_rating must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_default_to_private() {
        let payload: CreateJournalEntry =
            serde_json::from_str(r#"{"title":"Day one","content":"..."}"#).unwrap();
        assert!(payload.is_private);
    }

    #[test]
    fn mood_rating_bounds() {
        assert!(validate_mood_rating(3).is_ok());
        assert!(validate_mood_rating(0).is_err());
        assert!(validate_mood_rating(9).is_err());
    }
}
