use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_artifact_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_processed_path")]
    pub processed_path: String,
    #[serde(default = "default_raw_path")]
    pub raw_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            processed_path: default_processed_path(),
            raw_path: default_raw_path(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_top_k: default_max_top_k(),
        }
    }
}

fn default_artifact_dir() -> String {
    "ml".to_string()
}

fn default_processed_path() -> String {
    "ml/processed_data.csv".to_string()
}

fn default_raw_path() -> String {
    "data/usda-foods.csv".to_string()
}

fn default_max_top_k() -> usize {
    50
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NUTRI_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NUTRI__ARTIFACTS__DIR -> artifacts.dir
            .add_source(
                Environment::with_prefix("NUTRI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("NUTRI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
