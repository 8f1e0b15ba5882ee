use std::io::{IsTerminal, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

use nutrisolve_algo::config::Settings;
use nutrisolve_algo::core::{InferenceError, Outcome, Recommender};
use nutrisolve_algo::models::{EmptyResponse, ErrorResponse, RecommendRequest};
use nutrisolve_algo::services::{ArtifactBundle, ArtifactError, Catalog, CatalogError};

/// Any failure of the one-shot run. Every variant maps to the same exit
/// code; the message is what distinguishes them for the caller.
#[derive(Debug, Error)]
enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to load scoring artifacts: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Food database not found: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            let body = serde_json::to_string(&ErrorResponse {
                error: err.to_string(),
            })
            .unwrap_or_else(|_| r#"{"error":"failed to serialize error"}"#.to_string());
            eprintln!("{body}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RunError> {
    let settings = Settings::load()?;

    info!("Starting NutriSolve recommendation engine...");

    let bundle = ArtifactBundle::load(Path::new(&settings.artifacts.dir))?;
    info!(
        "Scoring artifacts loaded (model version {}, {} trees, {} selected features)",
        bundle.model.version,
        bundle.model.trees.len(),
        bundle.selector.k
    );

    let catalog = Catalog::load(
        Path::new(&settings.catalog.processed_path),
        Path::new(&settings.catalog.raw_path),
    )?;

    let mut request = read_request()?;
    request.validate()?;
    // Cap top_k to keep a single response bounded
    request.top_k = request.top_k.min(settings.engine.max_top_k);

    let recommender = Recommender::new(&bundle, &catalog);
    let outcome = recommender.recommend(&request)?;

    let body = match outcome {
        Outcome::Ranked(response) => serde_json::to_string_pretty(&response)?,
        Outcome::NoEligibleItems => serde_json::to_string_pretty(&EmptyResponse::no_eligible_items())?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(body.as_bytes())?;
    stdout.write_all(b"\n")?;

    Ok(())
}

/// Read the single request document from stdin. An interactive invocation
/// with no piped input scores the built-in sample request instead of
/// blocking on the terminal.
fn read_request() -> Result<RecommendRequest, RunError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        info!("No input provided. Using sample request...");
        return Ok(RecommendRequest::sample());
    }

    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    let request = serde_json::from_str(&input)?;
    Ok(request)
}

/// Initialize logging. All diagnostics go to stderr: stdout carries only
/// the response document.
fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}
