//! Player session: the presentation side of the game
//!
//! A `PlayerSession` wires the narrative actor to everything that reacts to
//! it: the typewriter, the QTE controller, the driving countdown, the gate
//! timers and the virtual phone. All of them share one virtual-time
//! scheduler, so the session runs the same way under a terminal front end
//! and in tests that jump the clock with `advance`.

use crate::actor::NarrativeActor;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::countdown::{Countdown, DistanceDelay};
use crate::error::EngineError;
use crate::machine::NarrativeMachine;
use crate::presentation::{DashboardView, MobileView, NotificationExpired, SceneKey, resolve_scene};
use crate::qte::{QteController, QteDeadline, QteShakeClear};
use crate::timer::{Millis, Scheduler, TimerHandle};
use crate::typewriter::{RenderedText, Typewriter, TypewriterEvent, TypewriterTick};
use crate::types::{
    context::{Direction, Notification},
    event::Event,
    output::{Choice, Snapshot},
    state::NarrativeState,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Payload of every timer the session schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    TypewriterTick,
    ShakeClear,
    QteDeadline,
    DistanceDelay,
    /// Automatic `NEXT` at the parking gate
    GateAdvance,
    NotificationExpired,
}

impl From<TypewriterTick> for TimerEvent {
    fn from(_: TypewriterTick) -> Self {
        TimerEvent::TypewriterTick
    }
}

impl From<QteShakeClear> for TimerEvent {
    fn from(_: QteShakeClear) -> Self {
        TimerEvent::ShakeClear
    }
}

impl From<QteDeadline> for TimerEvent {
    fn from(_: QteDeadline) -> Self {
        TimerEvent::QteDeadline
    }
}

impl From<DistanceDelay> for TimerEvent {
    fn from(_: DistanceDelay) -> Self {
        TimerEvent::DistanceDelay
    }
}

impl From<NotificationExpired> for TimerEvent {
    fn from(_: NotificationExpired) -> Self {
        TimerEvent::NotificationExpired
    }
}

/// Something the front end may want to redraw for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    StateChanged(NarrativeState),
    Text(TypewriterEvent),
    NotificationChanged,
    ShakeChanged,
}

pub struct PlayerSession {
    actor: NarrativeActor,
    scheduler: Scheduler<TimerEvent>,
    typewriter: Typewriter,
    qte: QteController,
    countdown: Countdown,
    mobile: MobileView,
    gate_delay: Millis,
    gate_timer: Option<TimerHandle>,
    gate_state: Option<NarrativeState>,
    /// Skip requested for the text currently shown
    force_show_full: bool,
    shown_text: String,
    effects: Vec<SessionEffect>,
}

impl std::fmt::Debug for PlayerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerSession")
            .field("state", &self.actor.state())
            .field("now", &self.scheduler.now())
            .field("pending_timers", &self.scheduler.pending_count())
            .finish_non_exhaustive()
    }
}

impl PlayerSession {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a session whose log timestamps come from `clock`
    pub fn with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_machine(config, NarrativeMachine::with_clock(config, clock))
    }

    /// Create a session around an existing machine
    pub fn with_machine(config: &EngineConfig, machine: NarrativeMachine) -> Self {
        let mut session = Self {
            actor: NarrativeActor::from_machine(machine),
            scheduler: Scheduler::new(),
            typewriter: Typewriter::new(config.typewriter.interval_ms, config.typewriter.cursor.clone()),
            qte: QteController::new(&config.qte),
            countdown: Countdown::new(&config.countdown),
            mobile: MobileView::new(config.presentation.notification_ms),
            gate_delay: config.presentation.gate_delay_ms,
            gate_timer: None,
            gate_state: None,
            force_show_full: false,
            shown_text: String::new(),
            effects: Vec::new(),
        };
        let snapshot = session.actor.snapshot();
        let follow_ups = session.follow(&snapshot);
        session.run(follow_ups);
        session
    }

    pub fn actor(&self) -> &NarrativeActor {
        &self.actor
    }

    /// Subscribe-capable access to the actor
    pub fn actor_mut(&mut self) -> &mut NarrativeActor {
        &mut self.actor
    }

    pub fn state(&self) -> NarrativeState {
        self.actor.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.actor.snapshot()
    }

    pub fn choices(&self) -> Vec<Choice> {
        self.actor.choices()
    }

    /// Current virtual time
    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    /// When the next timer fires, if any is pending
    pub fn next_due(&self) -> Option<Millis> {
        self.scheduler.next_due()
    }

    /// Drain effects produced since the last call
    pub fn take_effects(&mut self) -> Vec<SessionEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Send an event as-is
    pub fn send(&mut self, event: Event) -> Snapshot {
        self.run([event]);
        self.actor.snapshot()
    }

    /// Take the choice numbered `index`, counting from 1
    pub fn choose(&mut self, index: usize) -> Result<Snapshot, EngineError> {
        let choices = self.choices();
        let choice = index
            .checked_sub(1)
            .and_then(|i| choices.get(i))
            .ok_or(EngineError::ChoiceOutOfRange {
                index,
                available: choices.len(),
            })?;
        log::debug!("chose {index}: {}", choice.label);
        Ok(self.send(choice.action.clone()))
    }

    /// Press a direction key given by name (`ArrowUp`, `u`, `left`, ...).
    /// Outside the QTE the press is ignored.
    pub fn press_key(&mut self, key: &str) -> Result<Snapshot, EngineError> {
        let direction: Direction = key.parse()?;
        Ok(self.press(direction))
    }

    pub fn press(&mut self, key: Direction) -> Snapshot {
        let snapshot = self.actor.snapshot();
        let was_shaking = self.qte.is_shaking();
        let event = self.qte.press(key, &snapshot, &mut self.scheduler);
        if self.qte.is_shaking() != was_shaking {
            self.effects.push(SessionEffect::ShakeChanged);
        }
        match event {
            Some(event) => self.send(event),
            None => snapshot,
        }
    }

    /// Drive one step towards the gate
    pub fn drive(&mut self) -> Snapshot {
        let event = self.countdown.drive(&mut self.scheduler);
        self.run(event);
        self.actor.snapshot()
    }

    /// Set the distance to the gate directly
    pub fn set_distance(&mut self, distance: i64) -> Snapshot {
        let event = self.countdown.set_distance(distance, &mut self.scheduler);
        self.run(event);
        self.actor.snapshot()
    }

    /// Presentation-side distance, which the machine mirrors while driving
    pub fn distance(&self) -> i64 {
        self.countdown.distance()
    }

    /// Show the whole current text now
    pub fn skip_typing(&mut self) {
        self.force_show_full = true;
        self.sync_text();
    }

    /// Submit the billing email. Blank input is rejected before anything is
    /// sent to the machine.
    pub fn submit_email(&mut self, email: &str) -> Result<Snapshot, EngineError> {
        if email.trim().is_empty() {
            return Err(EngineError::EmptyEmail);
        }
        Ok(self.send(Event::SubmitEmail {
            email: email.to_string(),
        }))
    }

    pub fn restart(&mut self) -> Snapshot {
        self.send(Event::Restart)
    }

    /// Move virtual time forward by `ms`, firing every timer that falls due
    pub fn advance(&mut self, ms: Millis) {
        let target = self.scheduler.now().saturating_add(ms);
        self.advance_to(target);
    }

    /// Move virtual time forward to `target`
    pub fn advance_to(&mut self, target: Millis) {
        while let Some((handle, timer)) = self.scheduler.pop_due(target) {
            self.fire(handle, timer);
        }
    }

    pub fn rendered_text(&self) -> RenderedText {
        self.typewriter.render()
    }

    pub fn is_typing(&self) -> bool {
        self.typewriter.is_typing()
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::new(&self.actor.snapshot(), self.countdown.start_distance())
    }

    pub fn scene(&self) -> SceneKey {
        let snapshot = self.actor.snapshot();
        resolve_scene(snapshot.state, &snapshot.context)
    }

    /// Notification on the virtual phone, while it is showing
    pub fn notification(&self) -> Option<&Notification> {
        self.mobile.visible()
    }

    pub fn is_shaking(&self) -> bool {
        self.qte.is_shaking()
    }

    /// Virtual time at which the running QTE times out
    pub fn qte_deadline(&self) -> Option<Millis> {
        self.qte.deadline()
    }

    /// Whether `DISTANCE_REACHED` is waiting on its delay
    pub fn is_arriving(&self) -> bool {
        self.countdown.is_arriving()
    }

    fn fire(&mut self, handle: TimerHandle, timer: TimerEvent) {
        match timer {
            TimerEvent::TypewriterTick => {
                let events = self.typewriter.on_tick(handle, &mut self.scheduler);
                self.effects.extend(events.into_iter().map(SessionEffect::Text));
            }
            TimerEvent::ShakeClear => {
                if self.qte.on_shake_clear(handle) {
                    self.effects.push(SessionEffect::ShakeChanged);
                }
            }
            TimerEvent::QteDeadline => {
                let event = self.qte.on_deadline(handle, &self.actor.snapshot());
                self.run(event);
            }
            TimerEvent::DistanceDelay => {
                let event = self.countdown.on_fire(handle, &self.actor.snapshot());
                self.run(event);
            }
            TimerEvent::GateAdvance => {
                if self.gate_timer == Some(handle) {
                    self.gate_timer = None;
                    self.run([Event::Next]);
                }
            }
            TimerEvent::NotificationExpired => {
                if self.mobile.on_expire(handle) {
                    self.effects.push(SessionEffect::NotificationChanged);
                }
            }
        }
    }

    /// Send events one at a time, queueing whatever the subsystems dispatch
    /// in response, then bring the text up to date.
    fn run(&mut self, events: impl IntoIterator<Item = Event>) {
        let mut queue: VecDeque<Event> = events.into_iter().collect();
        while let Some(event) = queue.pop_front() {
            let before = self.actor.state();
            let restart = matches!(event, Event::Restart);
            let snapshot = self.actor.send(event);

            if restart {
                self.countdown.reset(&mut self.scheduler);
                self.qte.reset(&mut self.scheduler);
            }
            if snapshot.state != before {
                self.effects.push(SessionEffect::StateChanged(snapshot.state));
            }
            queue.extend(self.follow(&snapshot));
        }
        self.sync_text();
    }

    /// Let each subsystem react to a snapshot, collecting the events they
    /// want to send next
    fn follow(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        let mut follow_ups = Vec::new();
        follow_ups.extend(self.countdown.sync(snapshot, &mut self.scheduler));
        follow_ups.extend(self.qte.sync(snapshot, &mut self.scheduler));
        self.sync_gate(snapshot.state);
        if self.mobile.sync(snapshot, &mut self.scheduler) {
            self.effects.push(SessionEffect::NotificationChanged);
        }
        follow_ups
    }

    fn sync_gate(&mut self, state: NarrativeState) {
        let at_gate = matches!(state, NarrativeState::AtGate | NarrativeState::GateOpening);
        if !at_gate {
            self.scheduler.cancel_slot(&mut self.gate_timer);
            self.gate_state = None;
            return;
        }
        if self.gate_state != Some(state) {
            self.scheduler.cancel_slot(&mut self.gate_timer);
            self.gate_timer = Some(self.scheduler.schedule(self.gate_delay, TimerEvent::GateAdvance));
            self.gate_state = Some(state);
        }
    }

    fn sync_text(&mut self) {
        let snapshot = self.actor.snapshot();
        if snapshot.context.current_text != self.shown_text {
            self.shown_text = snapshot.context.current_text.clone();
            self.force_show_full = false;
        }
        let force = self.force_show_full || snapshot.state == NarrativeState::Driving;
        let events = self.typewriter.sync(
            &snapshot.context.current_text,
            &*snapshot.context,
            force,
            &mut self.scheduler,
        );
        self.effects.extend(events.into_iter().map(SessionEffect::Text));
    }
}
