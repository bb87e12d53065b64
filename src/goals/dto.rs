use serde::{Deserialize, Serialize};

use super::repo::WellnessGoal;
use crate::error::ApiError;

fn default_frequency() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CreateGoal {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_frequency")]
    pub target_frequency: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_frequency: Option<i32>,
    pub current_streak: Option<i32>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub message: &'static str,
    pub goal: WellnessGoal,
}

pub fn validate_frequency(frequency: i32) -> Result<(), ApiError> {
    if frequency < 1 {
        return Err(ApiError::Validation(
            "target_frequency must be at least 1".into(),
        ));
    }
    Ok(())
}

pub fn validate_streak(streak: i32) -> Result<(), ApiError> {
    if streak < 0 {
        return Err(ApiError::Validation(
            "current_streak cannot be negative".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_defaults_to_one() {
        let payload: CreateGoal = serde_json::from_str(r#"{"title":"Sleep more"}"#).unwrap();
        assert_eq!(payload.target_frequency, 1);
    }

    #[test]
    fn frequency_must_be_positive() {
        assert!(validate_frequency(1).is_ok());
        assert!(validate_frequency(0).is_err());
    }

    #[test]
    fn streak_cannot_go_negative() {
        assert!(validate_streak(0).is_ok());
        assert!(validate_streak(12).is_ok());
        assert!(matches!(
            validate_streak(-1).unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
