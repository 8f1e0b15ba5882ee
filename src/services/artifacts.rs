use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::features::{BINARY_FEATURES, CATEGORICAL_FEATURE, NUMERIC_FEATURES};

pub const MODEL_FILE: &str = "rf_model.json";
pub const PREPROCESSOR_FILE: &str = "preprocessor.json";
pub const SELECTOR_FILE: &str = "feature_selector.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Errors that can occur when loading the scoring artifacts.
///
/// All of them are fatal at startup: the engine must not score with a
/// partial or inconsistent bundle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("missing artifact {} (run the offline training pipeline first)", .file.display())]
    Missing { file: PathBuf },

    #[error("failed to read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .file.display())]
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },

    #[error("inconsistent artifacts: {0}")]
    Mismatch(String),
}

/// One node of a fitted decision tree.
///
/// Internal nodes carry a feature index and threshold with child links;
/// leaves have `feature = None` and carry per-class sample counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default)]
    pub value: Option<Vec<f64>>,
}

/// A single fitted decision tree, stored as a flat node array rooted at 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// The fitted random-forest classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    #[serde(default = "default_model_version")]
    pub version: String,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

fn default_model_version() -> String {
    "1.0".to_string()
}

/// Standard-scaler parameters for the numeric columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericScaler {
    pub features: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// One-hot encoding of the category column. The first category is dropped
/// and unknown categories encode to all zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEncoder {
    pub feature: String,
    pub categories: Vec<String>,
}

/// The fitted column transform: scaled numerics, one-hot category,
/// passthrough binary flags, in that column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub numeric: NumericScaler,
    pub categorical: CategoryEncoder,
    pub binary: Vec<String>,
}

impl Preprocessor {
    /// Transformed column names in output order
    pub fn output_features(&self) -> Vec<String> {
        let mut names = self.numeric.features.clone();
        for category in self.categorical.categories.iter().skip(1) {
            names.push(format!("{}_{}", self.categorical.feature, category));
        }
        names.extend(self.binary.iter().cloned());
        names
    }
}

/// The fitted feature selector: indices into the transformed column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSelector {
    pub k: usize,
    pub support: Vec<usize>,
}

/// Feature-name manifest recorded when the transform and selector were fitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureManifest {
    pub all_features: Vec<String>,
    pub selected_features: Vec<String>,
}

/// The complete scoring artifact bundle, loaded once at startup and shared
/// read-only for the process lifetime
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub model: RandomForest,
    pub preprocessor: Preprocessor,
    pub selector: FeatureSelector,
    pub manifest: FeatureManifest,
}

impl ArtifactBundle {
    /// Load all four artifacts from `dir` and verify they agree with each
    /// other and with the feature schema the engine materializes.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let model: RandomForest = read_artifact(&dir.join(MODEL_FILE))?;
        let preprocessor: Preprocessor = read_artifact(&dir.join(PREPROCESSOR_FILE))?;
        let selector: FeatureSelector = read_artifact(&dir.join(SELECTOR_FILE))?;
        let manifest: FeatureManifest = read_artifact(&dir.join(FEATURE_NAMES_FILE))?;

        let bundle = Self {
            model,
            preprocessor,
            selector,
            manifest,
        };
        bundle.check_consistency()?;
        Ok(bundle)
    }

    fn check_consistency(&self) -> Result<(), ArtifactError> {
        let scaler = &self.preprocessor.numeric;
        if scaler.mean.len() != scaler.features.len() || scaler.scale.len() != scaler.features.len()
        {
            return Err(ArtifactError::Mismatch(format!(
                "scaler has {} features but {} means and {} scales",
                scaler.features.len(),
                scaler.mean.len(),
                scaler.scale.len()
            )));
        }

        // Every transform input must be a column the engine can materialize
        for name in &scaler.features {
            if !NUMERIC_FEATURES.contains(&name.as_str()) {
                return Err(ArtifactError::Mismatch(format!(
                    "unknown numeric feature {name:?} in preprocessor"
                )));
            }
        }
        if self.preprocessor.categorical.feature != CATEGORICAL_FEATURE {
            return Err(ArtifactError::Mismatch(format!(
                "unknown categorical feature {:?} in preprocessor",
                self.preprocessor.categorical.feature
            )));
        }
        for name in &self.preprocessor.binary {
            if !BINARY_FEATURES.contains(&name.as_str()) {
                return Err(ArtifactError::Mismatch(format!(
                    "unknown binary feature {name:?} in preprocessor"
                )));
            }
        }

        let produced = self.preprocessor.output_features();
        if produced != self.manifest.all_features {
            return Err(ArtifactError::Mismatch(
                "feature_names.json does not match the preprocessor output columns".to_string(),
            ));
        }

        if self.selector.support.len() != self.selector.k {
            return Err(ArtifactError::Mismatch(format!(
                "selector declares k={} but carries {} support indices",
                self.selector.k,
                self.selector.support.len()
            )));
        }
        if self.selector.k != self.manifest.selected_features.len() {
            return Err(ArtifactError::Mismatch(format!(
                "selector keeps {} features but the manifest lists {}",
                self.selector.k,
                self.manifest.selected_features.len()
            )));
        }
        for &index in &self.selector.support {
            if index >= produced.len() {
                return Err(ArtifactError::Mismatch(format!(
                    "selector index {index} out of range for {} transformed columns",
                    produced.len()
                )));
            }
        }
        let selected: Vec<&str> = self
            .selector
            .support
            .iter()
            .map(|&index| produced[index].as_str())
            .collect();
        let expected: Vec<&str> = self
            .manifest
            .selected_features
            .iter()
            .map(String::as_str)
            .collect();
        if selected != expected {
            return Err(ArtifactError::Mismatch(
                "selector support does not pick the manifest's selected features".to_string(),
            ));
        }

        if self.model.n_features != self.selector.k {
            return Err(ArtifactError::Mismatch(format!(
                "model expects {} features but the selector keeps {}",
                self.model.n_features, self.selector.k
            )));
        }

        Ok(())
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            file: path.to_path_buf(),
        });
    }
    let data = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ArtifactError::Parse {
        file: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn leaf(counts: [f64; 2]) -> TreeNode {
        TreeNode {
            feature: None,
            threshold: 0.0,
            left: 0,
            right: 0,
            value: Some(counts.to_vec()),
        }
    }

    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature: Some(feature),
            threshold,
            left,
            right,
            value: None,
        }
    }

    fn sample_bundle() -> ArtifactBundle {
        let preprocessor = Preprocessor {
            numeric: NumericScaler {
                features: vec!["calories".to_string(), "protein_g".to_string()],
                mean: vec![0.0, 0.0],
                scale: vec![1.0, 1.0],
            },
            categorical: CategoryEncoder {
                feature: "food_category".to_string(),
                categories: vec!["unknown".to_string(), "proteins".to_string()],
            },
            binary: vec!["is_vegan".to_string()],
        };
        // columns: calories, protein_g, food_category_proteins, is_vegan
        let selector = FeatureSelector {
            k: 2,
            support: vec![0, 3],
        };
        let manifest = FeatureManifest {
            all_features: vec![
                "calories".to_string(),
                "protein_g".to_string(),
                "food_category_proteins".to_string(),
                "is_vegan".to_string(),
            ],
            selected_features: vec!["calories".to_string(), "is_vegan".to_string()],
        };
        let model = RandomForest {
            version: "1.0".to_string(),
            n_features: 2,
            trees: vec![DecisionTree {
                nodes: vec![split(0, 200.0, 1, 2), leaf([1.0, 3.0]), leaf([4.0, 0.0])],
            }],
        };
        ArtifactBundle {
            model,
            preprocessor,
            selector,
            manifest,
        }
    }

    fn write_bundle(dir: &Path, bundle: &ArtifactBundle) {
        fs::write(
            dir.join(MODEL_FILE),
            serde_json::to_string(&bundle.model).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(PREPROCESSOR_FILE),
            serde_json::to_string(&bundle.preprocessor).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(SELECTOR_FILE),
            serde_json::to_string(&bundle.selector).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(FEATURE_NAMES_FILE),
            serde_json::to_string(&bundle.manifest).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_valid_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), &sample_bundle());

        let bundle = ArtifactBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.model.version, "1.0");
        assert_eq!(bundle.selector.k, 2);
    }

    #[test]
    fn test_missing_artifact_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), &sample_bundle());
        fs::remove_file(dir.path().join(MODEL_FILE)).unwrap();

        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        match err {
            ArtifactError::Missing { file } => {
                assert!(file.to_string_lossy().contains(MODEL_FILE));
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_manifest_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = sample_bundle();
        bundle.manifest.all_features.pop();
        write_bundle(dir.path(), &bundle);

        assert!(matches!(
            ArtifactBundle::load(dir.path()),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn test_selector_out_of_range_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = sample_bundle();
        bundle.selector.support = vec![0, 99];
        write_bundle(dir.path(), &bundle);

        assert!(matches!(
            ArtifactBundle::load(dir.path()),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn test_unknown_feature_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = sample_bundle();
        bundle.preprocessor.numeric.features[0] = "caffeine_mg".to_string();
        bundle.preprocessor.numeric.mean = vec![0.0, 0.0];
        bundle.preprocessor.numeric.scale = vec![1.0, 1.0];
        write_bundle(dir.path(), &bundle);

        assert!(matches!(
            ArtifactBundle::load(dir.path()),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn test_output_features_drop_first_category() {
        let bundle = sample_bundle();
        assert_eq!(
            bundle.preprocessor.output_features(),
            vec![
                "calories".to_string(),
                "protein_g".to_string(),
                "food_category_proteins".to_string(),
                "is_vegan".to_string(),
            ]
        );
    }
}
