use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::FoodItem;

/// Errors that can occur when loading the food catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("food catalog not found (searched {} and {})", .processed.display(), .raw.display())]
    Missing { processed: PathBuf, raw: PathBuf },

    #[error("failed to read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .file.display())]
    Parse { file: PathBuf, source: csv::Error },
}

/// Which catalog file the foods were loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Feature-complete catalog produced by the offline pipeline
    Processed,
    /// Raw source catalog; derived features are computed at request time
    Raw,
}

/// The food catalog, loaded once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct Catalog {
    pub foods: Vec<FoodItem>,
    pub source: CatalogSource,
}

impl Catalog {
    /// Load the catalog, preferring the processed file and falling back to
    /// the raw source. Missing both is fatal.
    pub fn load(processed: &Path, raw: &Path) -> Result<Self, CatalogError> {
        if processed.exists() {
            let foods = read_catalog_csv(processed)?;
            tracing::info!(
                "Loaded {} foods from processed catalog {}",
                foods.len(),
                processed.display()
            );
            return Ok(Self {
                foods,
                source: CatalogSource::Processed,
            });
        }

        if raw.exists() {
            let foods = read_catalog_csv(raw)?;
            tracing::info!(
                "Processed catalog missing; loaded {} foods from raw source {}",
                foods.len(),
                raw.display()
            );
            return Ok(Self {
                foods,
                source: CatalogSource::Raw,
            });
        }

        Err(CatalogError::Missing {
            processed: processed.to_path_buf(),
            raw: raw.to_path_buf(),
        })
    }
}

fn read_catalog_csv(path: &Path) -> Result<Vec<FoodItem>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        file: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let mut foods = Vec::new();
    for record in reader.deserialize() {
        let food: FoodItem = record.map_err(|source| CatalogError::Parse {
            file: path.to_path_buf(),
            source,
        })?;
        foods.push(food);
    }
    Ok(foods)
}
