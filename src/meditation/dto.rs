use serde::{Deserialize, Serialize};

use super::repo::MeditationSession;
use crate::error::ApiError;

pub const SESSION_TYPES: [&str; 4] = ["mindfulness", "breathing", "body-scan", "loving-kindness"];

#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub session_type: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub completed: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSession {
    pub session_type: Option<String>,
    pub duration_minutes: Option<i32>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub session: MeditationSession,
}

pub fn validate_session_type(session_type: &str) -> Result<(), ApiError> {
    if !SESSION_TYPES.contains(&session_type) {
        return Err(ApiError::Validation(format!(
            "session_type must be one of: {}",
            SESSION_TYPES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_duration(minutes: i32) -> Result<(), ApiError> {
    if minutes < 1 {
        return Err(ApiError::Validation(
            "duration_minutes must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_session_types_accepted() {
        for t in SESSION_TYPES {
            assert!(validate_session_type(t).is_ok());
        }
        assert!(validate_session_type("screaming").is_err());
    }

    #[test]
    fn duration_must_be_positive() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-10).is_err());
    }
}
