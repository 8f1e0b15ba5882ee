// Core pipeline exports
pub mod features;
pub mod filters;
pub mod goals;
pub mod inference;
pub mod ranking;
pub mod recommender;

pub use features::{materialize, materialize_one, BINARY_FEATURES, CATEGORICAL_FEATURE, NUMERIC_FEATURES};
pub use filters::filter_by_constraints;
pub use goals::adjust_for_goal;
pub use inference::InferenceError;
pub use ranking::{build_recommendation, dietary_tags, rank, reasons_for};
pub use recommender::{Outcome, Recommender};
