//! # oiia-parking
//!
//! Narrative engine for a short branching visual novel about parking a car
//! in a very strange garage. The story is a closed finite-state machine;
//! around it sit the pieces a front end needs to present it: a typewriter
//! that reveals speaker-coloured dialogue, a timed arrow-key QTE, a driving
//! countdown and a virtual phone for notifications.
//!
//! ## Quick Start
//!
//! ```rust
//! use oiia_parking::{EngineConfig, Event, NarrativeActor, NarrativeState};
//!
//! let mut config = EngineConfig::default();
//! config.qte.seed = Some(42);
//!
//! let mut actor = NarrativeActor::new(&config);
//! actor.subscribe(|snapshot| println!("now in {}", snapshot.state));
//!
//! let snapshot = actor.send(Event::Next);
//! assert_eq!(snapshot.state, NarrativeState::InCar);
//!
//! for choice in actor.choices() {
//!     println!("{}", choice.label);
//! }
//! ```
//!
//! ## Sessions and virtual time
//!
//! `PlayerSession` runs the whole presentation side on a virtual clock.
//! Nothing happens until time is advanced, which makes timing behaviour
//! easy to script:
//!
//! ```rust
//! use oiia_parking::{EngineConfig, NarrativeState, PlayerSession};
//!
//! let mut session = PlayerSession::new(&EngineConfig::default());
//! assert!(session.is_typing());
//!
//! session.advance(10_000);
//! assert!(!session.is_typing());
//!
//! session.choose(1)?;
//! assert_eq!(session.state(), NarrativeState::InCar);
//! # Ok::<(), oiia_parking::EngineError>(())
//! ```

pub mod actor;
pub mod cli;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod debug;
pub mod error;
pub mod machine;
pub mod presentation;
pub mod qte;
pub mod session;
pub mod text;
pub mod timer;
pub mod typewriter;
pub mod types;

pub use actor::{NarrativeActor, SubscriptionId};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use error::EngineError;
pub use machine::NarrativeMachine;
pub use session::{PlayerSession, SessionEffect};
pub use timer::{Millis, Scheduler, TimerHandle};
pub use typewriter::{RenderedText, Typewriter, TypewriterEvent};
pub use types::{
    Choice, ColorToken, Direction, Event, LogEntry, NarrativeContext, NarrativeState,
    Notification, Snapshot, TextSegment,
};
