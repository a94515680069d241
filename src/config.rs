//! Flow configuration, loaded from TOML.

use crate::games::tictactoe::OutcomePolicy;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Speed multiplier for every scripted delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Delays are divided by this. Zero or less means no delays at all.
    pub speed: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl Pacing {
    /// Pacing with every delay collapsed to zero.
    pub fn instant() -> Self {
        Self { speed: 0.0 }
    }

    /// Longest delay [`Pacing::scale`] will produce, however slow the speed.
    pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

    /// Applies the speed to a scripted delay, capped at [`Pacing::MAX_DELAY`].
    pub fn scale(&self, delay: Duration) -> Duration {
        if self.speed.is_nan() || self.speed <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(delay.as_secs_f64() / self.speed)
            .map_or(Self::MAX_DELAY, |scaled| scaled.min(Self::MAX_DELAY))
    }
}

/// Heart challenge settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    /// Taps needed to burst the heart.
    pub required_taps: u32,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self { required_taps: 5 }
    }
}

/// Everything tunable about a conversation run.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct FlowConfig {
    /// Delay scaling.
    pacing: Pacing,

    /// Seed for the injected randomness; entropy when absent.
    #[setters(strip_option)]
    seed: Option<u64>,

    /// Move policy for the system's ordinary turns.
    game: OutcomePolicy,

    /// Heart challenge settings.
    heart: HeartConfig,

    /// Where the binary writes its tracing output.
    log_file: PathBuf,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            seed: None,
            game: OutcomePolicy::default(),
            heart: HeartConfig::default(),
            log_file: PathBuf::from("valentine_flow.log"),
        }
    }
}

impl FlowConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(speed = config.pacing.speed, seed = ?config.seed, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
