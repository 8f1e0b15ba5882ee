use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::UserProfile;

/// One recommendation request, read as a single JSON document from stdin
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(rename = "userProfile", default)]
    #[validate(nested)]
    pub user_profile: UserProfile,
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_top_k")]
    #[validate(range(min = 1))]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl RecommendRequest {
    /// Built-in sample request used when the engine is invoked interactively
    /// with no piped input.
    pub fn sample() -> Self {
        Self {
            user_profile: UserProfile {
                age: Some(30),
                gender: Some("Female".to_string()),
                primary_goal: Some("Weight Loss".to_string()),
                dietary_restrictions: vec!["Vegan".to_string()],
                weekly_budget: Some(75.0),
            },
            query: "healthy breakfast".to_string(),
            top_k: default_top_k(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let request: RecommendRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.top_k, 5);
        assert_eq!(request.query, "");
        assert!(request.user_profile.dietary_restrictions.is_empty());
    }

    #[test]
    fn test_full_request_parses() {
        let json = r#"{
            "userProfile": {
                "primaryGoal": "Muscle Gain",
                "dietaryRestrictions": ["gluten-free"],
                "weeklyBudget": 120
            },
            "query": "post workout meals",
            "top_k": 3
        }"#;
        let request: RecommendRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.top_k, 3);
        assert_eq!(request.query, "post workout meals");
        assert_eq!(request.user_profile.budget(), 120.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let request: RecommendRequest = serde_json::from_str(r#"{"top_k": 0}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_negative_budget_rejected() {
        let json = r#"{"userProfile": {"weeklyBudget": -5}}"#;
        let request: RecommendRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }
}
