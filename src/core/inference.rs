use thiserror::Error;

use crate::models::MaterializedFood;
use crate::services::artifacts::{ArtifactBundle, DecisionTree, Preprocessor, RandomForest};

/// Epsilon added after the non-negative shift so no transformed value is
/// exactly zero, matching the offline selector fit.
pub const NON_NEGATIVE_EPSILON: f64 = 1e-9;

/// Errors raised while scoring a batch.
///
/// These indicate artifact incompatibility, not bad requests: the caller
/// reports them as unexpected failures and exits non-zero.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("tree references feature {index} but only {width} features are selected")]
    FeatureOutOfRange { index: usize, width: usize },

    #[error("selector index {index} out of range for {width} transformed columns")]
    SelectorOutOfRange { index: usize, width: usize },

    #[error("malformed tree: {0}")]
    MalformedTree(String),
}

/// Score every materialized item with the fitted bundle, preserving input
/// order. Returns the probability of the positive ("fits user") class.
pub fn score(
    bundle: &ArtifactBundle,
    foods: &[MaterializedFood],
) -> Result<Vec<f64>, InferenceError> {
    if foods.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows: Vec<Vec<f64>> = foods
        .iter()
        .map(|food| transform_row(&bundle.preprocessor, food))
        .collect();

    // The chi2 scoring used to fit the selector only accepts non-negative
    // inputs. The shift is taken from the minimum of the batch being scored,
    // not from a training-time constant, to stay consistent with how the
    // selector was fitted offline.
    let min = rows
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(f64::INFINITY, f64::min);
    for row in &mut rows {
        for value in row.iter_mut() {
            *value = *value - min + NON_NEGATIVE_EPSILON;
        }
    }

    let mut probabilities = Vec::with_capacity(rows.len());
    for row in &rows {
        let selected = select_columns(&bundle.selector.support, row)?;
        probabilities.push(forest_proba(&bundle.model, &selected)?);
    }
    Ok(probabilities)
}

/// Apply the fitted column transform to one materialized item: scaled
/// numerics, one-hot category (first level dropped, unknown levels all
/// zeros), passthrough binary flags.
pub fn transform_row(preprocessor: &Preprocessor, food: &MaterializedFood) -> Vec<f64> {
    let scaler = &preprocessor.numeric;
    let mut row = Vec::with_capacity(
        scaler.features.len()
            + preprocessor.categorical.categories.len().saturating_sub(1)
            + preprocessor.binary.len(),
    );

    for (i, name) in scaler.features.iter().enumerate() {
        // Feature names are validated against the schema at load time
        let value = food.numeric(name).unwrap_or(0.0);
        let scale = if scaler.scale[i] != 0.0 { scaler.scale[i] } else { 1.0 };
        row.push((value - scaler.mean[i]) / scale);
    }

    for category in preprocessor.categorical.categories.iter().skip(1) {
        row.push(if food.food_category == *category { 1.0 } else { 0.0 });
    }

    for name in &preprocessor.binary {
        row.push(food.binary(name).unwrap_or(0.0));
    }

    row
}

/// Keep only the selector's support columns, in support order
fn select_columns(support: &[usize], row: &[f64]) -> Result<Vec<f64>, InferenceError> {
    support
        .iter()
        .map(|&index| {
            row.get(index)
                .copied()
                .ok_or(InferenceError::SelectorOutOfRange {
                    index,
                    width: row.len(),
                })
        })
        .collect()
}

/// Forest probability of the positive class: the mean of every tree's leaf
/// class proportions
fn forest_proba(forest: &RandomForest, x: &[f64]) -> Result<f64, InferenceError> {
    if forest.trees.is_empty() {
        return Err(InferenceError::MalformedTree(
            "forest carries no trees".to_string(),
        ));
    }
    let mut sum = 0.0;
    for tree in &forest.trees {
        sum += tree_proba(tree, x)?;
    }
    Ok(sum / forest.trees.len() as f64)
}

/// Walk one tree from the root to a leaf and return its positive-class
/// proportion
fn tree_proba(tree: &DecisionTree, x: &[f64]) -> Result<f64, InferenceError> {
    let mut index = 0usize;
    let mut steps = 0usize;
    loop {
        let node = tree.nodes.get(index).ok_or_else(|| {
            InferenceError::MalformedTree(format!("node index {index} out of range"))
        })?;

        match node.feature {
            Some(feature) => {
                let value = x
                    .get(feature)
                    .copied()
                    .ok_or(InferenceError::FeatureOutOfRange {
                        index: feature,
                        width: x.len(),
                    })?;
                index = if value <= node.threshold {
                    node.left
                } else {
                    node.right
                };
            }
            None => {
                let counts = node.value.as_ref().ok_or_else(|| {
                    InferenceError::MalformedTree("leaf carries no class counts".to_string())
                })?;
                if counts.len() < 2 {
                    return Err(InferenceError::MalformedTree(
                        "leaf must carry two class counts".to_string(),
                    ));
                }
                let total = counts[0] + counts[1];
                return Ok(if total > 0.0 { counts[1] / total } else { 0.0 });
            }
        }

        steps += 1;
        if steps > tree.nodes.len() {
            return Err(InferenceError::MalformedTree(
                "cycle detected in tree links".to_string(),
            ));
        }
    }
}
