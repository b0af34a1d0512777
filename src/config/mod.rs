use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::search::FitWeights;
use crate::tracker::{SeedKind, StatusVocabulary};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub tracker: TrackerConfig,
    pub scoring: FitWeights,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = env::var("LEAPLY_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let state_path =
            env::var("LEAPLY_STATE_PATH").unwrap_or_else(|_| ".leaply/state.json".to_string());

        let vocabulary = match env::var("LEAPLY_STATUS_VOCABULARY") {
            Ok(raw) => raw
                .parse::<StatusVocabulary>()
                .map_err(|_| ConfigError::InvalidVocabulary(raw))?,
            Err(_) => StatusVocabulary::Detailed,
        };

        let seed = match env::var("LEAPLY_SEED_SOURCE") {
            Ok(raw) => raw
                .parse::<SeedKind>()
                .map_err(|_| ConfigError::InvalidSeedSource(raw))?,
            Err(_) => SeedKind::Stored,
        };

        let scoring = match env::var("LEAPLY_FIT_WEIGHTS") {
            Ok(raw) => parse_weights(&raw)?,
            Err(_) => FitWeights::default(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                data_dir: PathBuf::from(data_dir),
                state_path: PathBuf::from(state_path),
            },
            tracker: TrackerConfig { vocabulary, seed },
            scoring,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_weights(raw: &str) -> Result<FitWeights, ConfigError> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::InvalidFitWeights(raw.to_string()))?;

    let &[gpa, budget, field, location, language, acceptance] = &values[..] else {
        return Err(ConfigError::InvalidFitWeights(raw.to_string()));
    };

    let weights = FitWeights {
        gpa,
        budget,
        field,
        location,
        language,
        acceptance,
    };

    if (weights.total() - 100.0).abs() > 1e-6 || values.iter().any(|value| *value < 0.0) {
        return Err(ConfigError::InvalidFitWeights(raw.to_string()));
    }

    Ok(weights)
}

/// Locations of the static catalog files and the persisted tracker state.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub state_path: PathBuf,
}

impl DataConfig {
    pub fn universities_path(&self) -> PathBuf {
        self.data_dir.join("universities.json")
    }

    pub fn scholarships_path(&self) -> PathBuf {
        self.data_dir.join("scholarships.json")
    }
}

/// Controls how the application tracker is seeded and how statuses are rendered.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    pub vocabulary: StatusVocabulary,
    pub seed: SeedKind,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidVocabulary(String),
    InvalidSeedSource(String),
    InvalidFitWeights(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidVocabulary(value) => write!(
                f,
                "LEAPLY_STATUS_VOCABULARY must be 'simple' or 'detailed' (got '{value}')"
            ),
            ConfigError::InvalidSeedSource(value) => write!(
                f,
                "LEAPLY_SEED_SOURCE must be 'stored', 'mock', or 'catalog' (got '{value}')"
            ),
            ConfigError::InvalidFitWeights(value) => write!(
                f,
                "LEAPLY_FIT_WEIGHTS must be six non-negative numbers summing to 100 (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
