//! Engine errors

use thiserror::Error;

/// Errors returned by the fallible surfaces of the engine.
///
/// The narrative machine itself never fails: events that do not apply to
/// the current state are ignored. These errors cover configuration and the
/// presentation-side validation that happens before an event is sent.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("unknown narrative state '{0}'")]
    UnknownState(String),

    #[error("choice {index} is out of range, {available} available")]
    ChoiceOutOfRange { index: usize, available: usize },

    #[error("email must not be empty")]
    EmptyEmail,

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("failed to read configuration '{path}'")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}
