//! Core types for the narrative engine
//!
//! This module contains the fundamental types that form the public API:
//! - NarrativeState: the closed set of story states
//! - Event: everything the presentation layer may send to the machine
//! - NarrativeContext: the data bag threaded through every state
//! - Snapshot: what consumers observe after each transition
//! - TextSegment: colored, speaker-attributed display runs

pub mod context;
pub mod event;
pub mod output;
pub mod segment;
pub mod state;

pub use context::{Direction, LogEntry, NarrativeContext, Notification};
pub use event::Event;
pub use output::{Choice, Snapshot};
pub use segment::{ColorToken, TextSegment};
pub use state::NarrativeState;
