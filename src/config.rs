//! Engine configuration
//!
//! Every section has defaults matching the shipped game, so a config file
//! only needs to name the values it changes.

use crate::error::EngineError;
use crate::timer::Millis;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `qte.seed`
pub const SEED_ENV: &str = "OIIA_SEED";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub typewriter: TypewriterConfig,
    pub countdown: CountdownConfig,
    pub qte: QteConfig,
    pub presentation: PresentationConfig,
}

/// Typewriter cadence and cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Delay between revealed characters
    pub interval_ms: Millis,
    /// Glyph appended while text is still being revealed
    pub cursor: String,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30,
            cursor: "▮".to_string(),
        }
    }
}

/// Driving countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    /// Distance a fresh drive starts from; also the upper bound for resuming
    pub start_distance: i64,
    /// Distance covered by one player step
    pub step: i64,
    /// Delay between reaching zero and dispatching `DISTANCE_REACHED`
    pub reach_delay_ms: Millis,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            start_distance: 500,
            step: 10,
            reach_delay_ms: 1_000,
        }
    }
}

/// Quick-time event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QteConfig {
    /// Number of directions in a generated sequence
    pub sequence_length: usize,
    /// How long the wrong-key shake stays on
    pub shake_ms: Millis,
    /// Time allowed to finish the sequence; `None` disables the limit
    pub time_limit_ms: Option<Millis>,
    /// RNG seed for sequence generation; random when unset
    pub seed: Option<u64>,
}

impl Default for QteConfig {
    fn default() -> Self {
        Self {
            sequence_length: 4,
            shake_ms: 500,
            time_limit_ms: Some(10_000),
            seed: None,
        }
    }
}

/// Timers owned by the presentation side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Pause at the gate before it opens, and again before parking
    pub gate_delay_ms: Millis,
    /// How long the mobile notification stays visible
    pub notification_ms: Millis,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            gate_delay_ms: 2_000,
            notification_ms: 5_000,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| EngineError::ConfigIo {
                path: path.display().to_string(),
                source,
            })?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Apply `OIIA_SEED` if it is set
    pub fn with_env_overrides(mut self) -> Result<Self, EngineError> {
        if let Ok(seed) = std::env::var(SEED_ENV) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| EngineError::config(format!("{SEED_ENV} must be an integer, got '{seed}'")))?;
            self.qte.seed = Some(seed);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.typewriter.interval_ms == 0 {
            return Err(EngineError::config("typewriter.interval_ms must be positive"));
        }
        if self.countdown.start_distance <= 0 {
            return Err(EngineError::config("countdown.start_distance must be positive"));
        }
        if self.countdown.step <= 0 {
            return Err(EngineError::config("countdown.step must be positive"));
        }
        if self.qte.sequence_length == 0 {
            return Err(EngineError::config("qte.sequence_length must be positive"));
        }
        Ok(())
    }
}
