use serde::{Deserialize, Serialize};

use crate::models::domain::Recommendation;

/// Successful response with ranked recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
    pub query: String,
    pub total_eligible: usize,
    pub model_version: String,
    pub user_goal: String,
}

/// Response when constraint filtering leaves no eligible items.
/// A normal outcome, not an error: the process still exits zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResponse {
    pub recommendations: Vec<Recommendation>,
    pub message: String,
}

impl EmptyResponse {
    pub fn no_eligible_items() -> Self {
        Self {
            recommendations: Vec::new(),
            message: "No foods match your dietary restrictions and budget. \
                      Try relaxing some constraints."
                .to_string(),
        }
    }
}

/// Error object written to stderr on any failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_shape() {
        let response = EmptyResponse::no_eligible_items();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recommendations"].as_array().unwrap().len(), 0);
        assert!(json["message"].as_str().unwrap().contains("relaxing"));
    }
}
