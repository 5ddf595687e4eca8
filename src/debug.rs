//! Debug logging backend
//!
//! The engine logs through the `log` facade. This module provides the
//! stderr backend the terminal player installs: off unless `OIIA_DEBUG` is
//! set, filtered by level and by engine category.

use log::{LevelFilter, Log, Metadata, Record};
use std::collections::HashSet;

/// Environment variable that enables debug output. Its value may name a
/// level (`trace`, `debug`, `info`, `warn`, `error`).
pub const DEBUG_ENV: &str = "OIIA_DEBUG";

/// Debug log category, derived from the log target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugCategory {
    /// Narrative transitions
    Machine,
    Typewriter,
    Qte,
    Countdown,
    /// Scheduler arming and cancellation
    Timer,
    /// Presentation glue and everything else
    Session,
}

impl DebugCategory {
    /// Map a log target such as `oiia_parking::machine::script` to a category
    pub fn from_target(target: &str) -> Self {
        let module = target
            .strip_prefix("oiia_parking::")
            .and_then(|rest| rest.split("::").next())
            .unwrap_or("");
        match module {
            "machine" | "actor" => DebugCategory::Machine,
            "typewriter" | "text" => DebugCategory::Typewriter,
            "qte" => DebugCategory::Qte,
            "countdown" => DebugCategory::Countdown,
            "timer" => DebugCategory::Timer,
            _ => DebugCategory::Session,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Enable debug logging
    pub enabled: bool,
    /// Minimum log level
    pub level: LevelFilter,
    /// Enabled categories
    pub categories: HashSet<DebugCategory>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let setting = std::env::var(DEBUG_ENV).ok();
        let level = setting
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LevelFilter::Debug);

        let categories = [
            DebugCategory::Machine,
            DebugCategory::Qte,
            DebugCategory::Countdown,
            DebugCategory::Session,
        ]
        .into_iter()
        .collect();

        Self {
            enabled: setting.is_some(),
            level,
            categories,
        }
    }
}

impl DebugConfig {
    /// Everything at trace level, for tests and deep debugging
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Trace,
            categories: [
                DebugCategory::Machine,
                DebugCategory::Typewriter,
                DebugCategory::Qte,
                DebugCategory::Countdown,
                DebugCategory::Timer,
                DebugCategory::Session,
            ]
            .into_iter()
            .collect(),
        }
    }

    fn allows(&self, metadata: &Metadata<'_>) -> bool {
        self.enabled
            && metadata.level() <= self.level
            && self
                .categories
                .contains(&DebugCategory::from_target(metadata.target()))
    }
}

/// stderr logger writing `[LEVEL] Category message`
#[derive(Debug)]
pub struct DebugLogger {
    config: DebugConfig,
}

impl DebugLogger {
    pub fn new(config: DebugConfig) -> Self {
        Self { config }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.config.allows(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let category = format!("{:?}", DebugCategory::from_target(record.target()));
        eprintln!("[{}] {:10} {}", record.level(), category, record.args());
    }

    fn flush(&self) {}
}

/// Install the debug logger as the global `log` backend
pub fn init(config: DebugConfig) -> Result<(), log::SetLoggerError> {
    let max_level = if config.enabled {
        config.level
    } else {
        LevelFilter::Off
    };
    log::set_boxed_logger(Box::new(DebugLogger::new(config)))?;
    log::set_max_level(max_level);
    Ok(())
}
