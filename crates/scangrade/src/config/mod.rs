use std::env;
use std::fmt;

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
    pub telemetry: TelemetryConfig,
    pub score_values: ScoreValuesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            score_values: ScoreValuesConfig::load()?,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Default per-question point values. Overridable per run from the CLI.
#[derive(Debug, Clone, Copy)]
pub struct ScoreValuesConfig {
    pub correct: f64,
    pub incorrect: f64,
    pub blank: f64,
}

impl ScoreValuesConfig {
    fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            correct: score_value("GRADE_CORRECT_VALUE", 10.0)?,
            incorrect: score_value("GRADE_INCORRECT_VALUE", 0.0)?,
            blank: score_value("GRADE_BLANK_VALUE", 2.0)?,
        })
    }
}

fn score_value(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(ConfigError::InvalidScoreValue { name }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidScoreValue { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidScoreValue { name } => {
                write!(f, "{name} must be a finite number")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
