//! Quick-time event: the ignition sequence
//!
//! The machine owns the sequence and the progress counter. This controller
//! owns what the machine does not: the wrong-key shake, the time limit, and
//! the once-only `QTE_SUCCESS` dispatch when progress reaches the end.

use crate::config::QteConfig;
use crate::timer::{Millis, Scheduler, TimerHandle};
use crate::types::{context::Direction, event::Event, output::Snapshot, state::NarrativeState};
use rand::Rng;

/// Timer payload that ends the wrong-key shake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QteShakeClear;

/// Timer payload for the QTE time limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QteDeadline;

/// Draw a sequence of `len` random directions
pub fn generate_sequence<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<Direction> {
    (0..len)
        .map(|_| Direction::ALL[rng.gen_range(0..Direction::ALL.len())])
        .collect()
}

#[derive(Debug)]
pub struct QteController {
    shake_ms: Millis,
    time_limit: Option<Millis>,
    active: bool,
    shaking: bool,
    success_sent: bool,
    shake_timer: Option<TimerHandle>,
    deadline: Option<TimerHandle>,
}

impl QteController {
    pub fn new(config: &QteConfig) -> Self {
        Self {
            shake_ms: config.shake_ms,
            time_limit: config.time_limit_ms,
            active: false,
            shaking: false,
            success_sent: false,
            shake_timer: None,
            deadline: None,
        }
    }

    /// Whether the wrong-key shake is showing
    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    /// Virtual time at which the sequence times out, if a limit is running
    pub fn deadline(&self) -> Option<Millis> {
        self.deadline.map(|h| h.due())
    }

    /// Follow a new snapshot: arm the time limit on entering `qteSequence`,
    /// cancel everything on leaving it, and dispatch `QTE_SUCCESS` once the
    /// sequence is complete.
    pub fn sync<T>(&mut self, snapshot: &Snapshot, scheduler: &mut Scheduler<T>) -> Option<Event>
    where
        T: From<QteShakeClear> + From<QteDeadline>,
    {
        if snapshot.state != NarrativeState::QteSequence {
            if self.active {
                log::debug!(target: "oiia_parking::qte", "left qte sequence");
                self.reset(scheduler);
            }
            return None;
        }

        if !self.active {
            self.active = true;
            self.success_sent = false;
            if let Some(limit) = self.time_limit {
                self.deadline = Some(scheduler.schedule(limit, QteDeadline.into()));
            }
            log::debug!(
                target: "oiia_parking::qte",
                "sequence {:?}",
                snapshot.context.qte_sequence
            );
        }

        if snapshot.context.qte_complete() && !self.success_sent {
            self.success_sent = true;
            scheduler.cancel_slot(&mut self.deadline);
            log::debug!(target: "oiia_parking::qte", "sequence complete");
            return Some(Event::QteSuccess);
        }
        None
    }

    /// Turn a directional press into the event to send.
    ///
    /// Every press is forwarded; a wrong one also starts the shake.
    pub fn press<T: From<QteShakeClear>>(
        &mut self,
        key: Direction,
        snapshot: &Snapshot,
        scheduler: &mut Scheduler<T>,
    ) -> Option<Event> {
        if snapshot.state != NarrativeState::QteSequence {
            return None;
        }
        if snapshot.context.qte_expected() != Some(key) {
            log::trace!(target: "oiia_parking::qte", "wrong key {}", key.key_name());
            scheduler.cancel_slot(&mut self.shake_timer);
            self.shaking = true;
            self.shake_timer = Some(scheduler.schedule(self.shake_ms, QteShakeClear.into()));
        }
        Some(Event::KeyPress { key })
    }

    /// Handle a fired shake timer. Returns whether the shake ended.
    pub fn on_shake_clear(&mut self, handle: TimerHandle) -> bool {
        if self.shake_timer != Some(handle) {
            return false;
        }
        self.shake_timer = None;
        self.shaking = false;
        true
    }

    /// Handle a fired time limit
    pub fn on_deadline(&mut self, handle: TimerHandle, snapshot: &Snapshot) -> Option<Event> {
        if self.deadline != Some(handle) {
            return None;
        }
        self.deadline = None;
        if snapshot.state == NarrativeState::QteSequence && !self.success_sent {
            log::debug!(target: "oiia_parking::qte", "time limit reached");
            return Some(Event::QteTimeout);
        }
        None
    }

    pub fn reset<T>(&mut self, scheduler: &mut Scheduler<T>) {
        scheduler.cancel_slot(&mut self.shake_timer);
        scheduler.cancel_slot(&mut self.deadline);
        self.active = false;
        self.shaking = false;
        self.success_sent = false;
    }
}
