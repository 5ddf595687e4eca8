//! What the machine publishes after each transition

use crate::types::{context::NarrativeContext, event::Event, state::NarrativeState};
use serde::Serialize;
use std::sync::Arc;

/// Read-only view of `(state, context)` after a transition.
///
/// The context is shared, never edited: every transition publishes a new
/// `Arc`, so a snapshot held by a consumer stays consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: NarrativeState,
    pub context: Arc<NarrativeContext>,
}

impl Snapshot {
    pub fn new(state: NarrativeState, context: Arc<NarrativeContext>) -> Self {
        Self { state, context }
    }

    /// Whether only `RESTART` leads anywhere from here
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            NarrativeState::Finished | NarrativeState::EndingBsod
        )
    }
}

/// A choice the presentation layer may offer for the current state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    /// Display text for the choice
    pub label: String,
    /// Event sent when the choice is taken
    pub action: Event,
}

impl Choice {
    pub fn new(label: impl Into<String>, action: Event) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}
