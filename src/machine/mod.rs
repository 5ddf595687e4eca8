//! Narrative state machine
//!
//! A deterministic `(state, context, event) -> (state', context')` machine.
//! All context mutation happens inside `transition`. Events that do not apply
//! to the current state, and events whose guard fails, leave both state and
//! context untouched.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::qte::generate_sequence;
use crate::types::{
    context::NarrativeContext,
    event::Event,
    output::{Choice, Snapshot},
    state::NarrativeState,
};
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;

pub mod choices;
pub mod script;


/// Result of applying an event to the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Enter a state as a story beat: scene and one log entry
    Enter(NarrativeState),
    /// Go back to a state without recording a beat
    Return(NarrativeState),
    /// Stay put; the handler already updated the context
    Stay,
    /// Event does not apply, or its guard failed
    Ignored,
}

/// The narrative state machine
pub struct NarrativeMachine {
    state: NarrativeState,
    context: Arc<NarrativeContext>,
    rng: StdRng,
    seed: u64,
    clock: Arc<dyn Clock>,
    sequence_length: usize,
    start_distance: i64,
}

impl std::fmt::Debug for NarrativeMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeMachine")
            .field("state", &self.state)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl NarrativeMachine {
    /// Create a machine at `start` using the system clock
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a machine at `start` that timestamps logs with `clock`
    pub fn with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let seed = config.qte.seed.unwrap_or_else(rand::random);
        let start_distance = config.countdown.start_distance;
        log::debug!("narrative machine created with seed {seed}");
        Self {
            state: NarrativeState::Start,
            context: Arc::new(initial_context(start_distance)),
            rng: StdRng::seed_from_u64(seed),
            seed,
            clock,
            sequence_length: config.qte.sequence_length,
            start_distance,
        }
    }

    /// Continue from a published snapshot instead of `start`.
    ///
    /// `RESTART` still returns to a fresh game.
    pub fn resume(mut self, snapshot: Snapshot) -> Self {
        log::debug!("resuming at {}", snapshot.state);
        self.state = snapshot.state;
        self.context = snapshot.context;
        self
    }

    pub fn state(&self) -> NarrativeState {
        self.state
    }

    /// The current context. Published contexts are never edited.
    pub fn context(&self) -> &Arc<NarrativeContext> {
        &self.context
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state, Arc::clone(&self.context))
    }

    /// Seed the QTE generator was started with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Choices available right now
    pub fn choices(&self) -> Vec<Choice> {
        choices::choices(self.state, &self.context)
    }

    /// Apply `event`. Returns `false` when it did not apply.
    pub fn send(&mut self, event: &Event) -> bool {
        if let Event::Restart = event {
            log::info!("restart from {}", self.state);
            self.state = NarrativeState::Start;
            self.context = Arc::new(initial_context(self.start_distance));
            self.rng = StdRng::seed_from_u64(self.seed);
            return true;
        }

        let mut ctx = NarrativeContext::clone(&self.context);
        let outcome = self.transition(event, &mut ctx);
        match outcome {
            Outcome::Ignored => {
                log::debug!("ignored {} in {}", event.name(), self.state);
                return false;
            }
            Outcome::Stay => {
                log::trace!("{} handled in {}", event.name(), self.state);
            }
            Outcome::Return(to) => {
                log::debug!("{} -> {} ({})", self.state, to, event.name());
                script::enter(to, &mut ctx);
                self.state = to;
            }
            Outcome::Enter(to) => {
                log::debug!("{} -> {} ({})", self.state, to, event.name());
                script::enter(to, &mut ctx);
                ctx.push_log(self.clock.now(), script::entry_log(to));
                self.state = to;
            }
        }
        self.context = Arc::new(ctx);
        true
    }

    fn new_sequence(&mut self, ctx: &mut NarrativeContext) {
        ctx.qte_sequence = generate_sequence(&mut self.rng, self.sequence_length);
        ctx.qte_progress = 0;
    }

    fn transition(&mut self, event: &Event, ctx: &mut NarrativeContext) -> Outcome {
        use NarrativeState as S;
        use Outcome::{Enter, Ignored, Return, Stay};

        match (self.state, event) {
            (S::Start, Event::Next) => Enter(S::InCar),

            (S::InCar, Event::Next) => {
                self.new_sequence(ctx);
                Enter(S::QteSequence)
            }
            (S::InCar, Event::AutoPilot) if ctx.game_cleared => {
                ctx.notification = Some(script::parked_notification());
                Enter(S::Parked)
            }
            (S::InCar, Event::DoNothing) => Enter(S::EndingBsod),

            (S::QteSequence, Event::KeyPress { .. }) => {
                ctx.qte_progress = (ctx.qte_progress + 1).min(ctx.qte_sequence.len());
                Stay
            }
            (S::QteSequence, Event::QteSuccess) if ctx.qte_complete() => Enter(S::Driving),
            (S::QteSequence, Event::QteTimeout) => Enter(S::EngineStall),

            (S::EngineStall, Event::Retry) => {
                self.new_sequence(ctx);
                Enter(S::QteSequence)
            }

            (S::Driving, Event::UpdateDistance { distance }) => {
                ctx.driving_distance = *distance;
                Stay
            }
            (S::Driving, Event::DistanceReached) => Enter(S::AtGate),

            (S::AtGate, Event::Next) => Enter(S::GateOpening),
            (S::GateOpening, Event::Next) => {
                ctx.notification = Some(script::parked_notification());
                Enter(S::Parked)
            }

            (S::Parked, Event::GoCat) => Enter(S::InteractCat),
            (S::Parked, Event::GoSpaghetti) => Enter(S::InteractSpaghetti),
            (S::Parked, Event::GoExit) => Enter(S::InteractExit),

            (S::InteractCat, Event::TouchCat) => Enter(S::EndingBlackHole),
            (S::InteractCat, Event::FeedCat) if ctx.has_spaghetti => Enter(S::EndingCatChaos),

            (S::InteractSpaghetti, Event::EatSpaghetti) if !ctx.has_spaghetti => {
                Enter(S::EndingSpaghettiDance)
            }
            (S::InteractSpaghetti, Event::PickUp) if !ctx.has_spaghetti => {
                ctx.has_spaghetti = true;
                ctx.notification = Some(script::item_notification());
                ctx.push_log(self.clock.now(), script::PICK_UP_LOG);
                script::enter(S::InteractSpaghetti, ctx);
                Stay
            }

            (S::InteractExit, Event::HitWall) => Enter(S::EndingAdmin),

            (S::InteractCat | S::InteractSpaghetti | S::InteractExit, Event::Back) => {
                Return(S::Parked)
            }

            (
                S::EndingBlackHole | S::EndingCatChaos | S::EndingSpaghettiDance | S::EndingAdmin,
                Event::Next,
            ) => Enter(S::PaymentNarrative),

            (S::PaymentNarrative, Event::ProceedToPay) => Enter(S::PaymentInput),
            (S::PaymentInput, Event::SubmitEmail { email }) if !email.trim().is_empty() => {
                let email = email.trim().to_string();
                ctx.notification = Some(script::bill_notification(&email));
                ctx.email = email;
                ctx.game_cleared = true;
                Enter(S::Finished)
            }
            (S::PaymentInput, Event::Back) => Return(S::PaymentNarrative),

            _ => Ignored,
        }
    }
}

/// The context a new game starts with
pub fn initial_context(start_distance: i64) -> NarrativeContext {
    let mut ctx = NarrativeContext {
        driving_distance: start_distance,
        ..NarrativeContext::default()
    };
    script::enter(NarrativeState::Start, &mut ctx);
    ctx
}
