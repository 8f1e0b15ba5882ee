// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Confidence, FoodItem, Goal, MaterializedFood, Nutrition, Recommendation, Restriction,
    UserProfile, DEFAULT_WEEKLY_BUDGET, SERVINGS_PER_WEEK,
};
pub use requests::RecommendRequest;
pub use responses::{EmptyResponse, ErrorResponse, RecommendResponse};
