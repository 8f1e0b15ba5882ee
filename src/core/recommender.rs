use crate::core::features::materialize;
use crate::core::filters::filter_by_constraints;
use crate::core::goals::adjust_for_goal;
use crate::core::inference::{self, InferenceError};
use crate::core::ranking::{build_recommendation, rank};
use crate::models::{RecommendRequest, RecommendResponse};
use crate::services::artifacts::ArtifactBundle;
use crate::services::catalog::Catalog;

/// Result of one recommendation request
#[derive(Debug)]
pub enum Outcome {
    Ranked(RecommendResponse),
    /// Constraint filtering removed every catalog item. A normal outcome,
    /// rendered as an empty response with guidance text.
    NoEligibleItems,
}

/// Request-time recommendation pipeline.
///
/// # Pipeline stages
/// 1. Constraint filtering (dietary restrictions, budget)
/// 2. Feature materialization
/// 3. Probability inference (transform, shift, select, classify)
/// 4. Goal-based re-weighting
/// 5. Ranking and explanation
///
/// Holds references to state loaded once at startup; the pipeline itself is
/// synchronous and deterministic per request.
#[derive(Debug, Clone)]
pub struct Recommender<'a> {
    bundle: &'a ArtifactBundle,
    catalog: &'a Catalog,
}

impl<'a> Recommender<'a> {
    pub fn new(bundle: &'a ArtifactBundle, catalog: &'a Catalog) -> Self {
        Self { bundle, catalog }
    }

    /// Run the full pipeline for one request
    pub fn recommend(&self, request: &RecommendRequest) -> Result<Outcome, InferenceError> {
        let profile = &request.user_profile;

        let eligible = filter_by_constraints(&self.catalog.foods, profile);
        let total_eligible = eligible.len();
        tracing::debug!(
            "{} of {} catalog items eligible after constraint filtering",
            total_eligible,
            self.catalog.foods.len()
        );

        if eligible.is_empty() {
            tracing::info!("No eligible items for this profile");
            return Ok(Outcome::NoEligibleItems);
        }

        let materialized = materialize(&eligible);
        let raw = inference::score(self.bundle, &materialized)?;
        let adjusted = adjust_for_goal(&raw, &materialized, profile.goal());

        let top = rank(&adjusted, request.top_k);
        let recommendations = top
            .iter()
            .map(|&index| build_recommendation(&materialized[index], adjusted[index]))
            .collect::<Vec<_>>();

        tracing::info!(
            "Returning {} recommendations ({} eligible)",
            recommendations.len(),
            total_eligible
        );

        Ok(Outcome::Ranked(RecommendResponse {
            recommendations,
            query: request.query.clone(),
            total_eligible,
            model_version: self.bundle.model.version.clone(),
            user_goal: profile.goal_label(),
        }))
    }
}
