use serde::{Deserialize, Serialize};

use super::repo::MoodEntry;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateMoodEntry {
    pub mood_level: i16,
    #[serde(default)]
    pub emotions: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMoodEntry {
    pub mood_level: Option<i16>,
    pub emotions: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoodEntryResponse {
    pub message: &'static str,
    pub mood_entry: MoodEntry,
}

pub fn validate_mood_level(level: i16) -> Result<(), ApiError> {
    if !(1..=5).contains(&level) {
        return Err(ApiError::Validation(
            "mood_level must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_level_bounds() {
        assert!(validate_mood_level(1).is_ok());
        assert!(validate_mood_level(5).is_ok());
        assert!(validate_mood_level(0).is_err());
        assert!(validate_mood_level(6).is_err());
    }
}
