//! Driving countdown
//!
//! The distance to the gate is controlled from outside the machine. Every
//! change is mirrored into the machine with `UPDATE_DISTANCE`; once it
//! drops to zero or below, `DISTANCE_REACHED` follows after a fixed delay.

use crate::config::CountdownConfig;
use crate::timer::{Millis, Scheduler, TimerHandle};
use crate::types::{event::Event, output::Snapshot, state::NarrativeState};

/// Timer payload for the delayed `DISTANCE_REACHED`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceDelay;

#[derive(Debug)]
pub struct Countdown {
    start_distance: i64,
    step: i64,
    reach_delay: Millis,
    distance: i64,
    active: bool,
    pending: Option<TimerHandle>,
}

impl Countdown {
    pub fn new(config: &CountdownConfig) -> Self {
        Self {
            start_distance: config.start_distance,
            step: config.step,
            reach_delay: config.reach_delay_ms,
            distance: config.start_distance,
            active: false,
            pending: None,
        }
    }

    pub fn distance(&self) -> i64 {
        self.distance
    }

    pub fn start_distance(&self) -> i64 {
        self.start_distance
    }

    /// Whether the driving state is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether `DISTANCE_REACHED` is waiting on its delay
    pub fn is_arriving(&self) -> bool {
        self.pending.is_some()
    }

    /// Distance to use when driving starts: a partial distance is kept,
    /// anything outside `(0, start)` starts over.
    pub fn normalize(&self, distance: i64) -> i64 {
        if distance > 0 && distance < self.start_distance {
            distance
        } else {
            self.start_distance
        }
    }

    /// Follow a new snapshot. On entering `driving` the distance is
    /// normalized and mirrored; on leaving it the pending delay is cancelled.
    pub fn sync<T: From<DistanceDelay>>(
        &mut self,
        snapshot: &Snapshot,
        scheduler: &mut Scheduler<T>,
    ) -> Option<Event> {
        let driving = snapshot.state == NarrativeState::Driving;
        if !driving {
            if self.active {
                log::debug!(target: "oiia_parking::countdown", "left driving at {}", self.distance);
                self.active = false;
                scheduler.cancel_slot(&mut self.pending);
            }
            return None;
        }
        if self.active {
            return None;
        }

        self.active = true;
        let distance = self.normalize(snapshot.context.driving_distance);
        log::debug!(target: "oiia_parking::countdown", "driving from {distance}");
        self.apply(distance, scheduler);
        (distance != snapshot.context.driving_distance)
            .then_some(Event::UpdateDistance { distance })
    }

    /// Set the distance directly. Returns the event mirroring it, or `None`
    /// when not driving.
    pub fn set_distance<T: From<DistanceDelay>>(
        &mut self,
        distance: i64,
        scheduler: &mut Scheduler<T>,
    ) -> Option<Event> {
        if !self.active {
            return None;
        }
        self.apply(distance, scheduler);
        Some(Event::UpdateDistance { distance })
    }

    /// Move one step closer to the gate
    pub fn drive<T: From<DistanceDelay>>(&mut self, scheduler: &mut Scheduler<T>) -> Option<Event> {
        self.set_distance(self.distance.saturating_sub(self.step), scheduler)
    }

    /// Handle a fired delay
    pub fn on_fire(&mut self, handle: TimerHandle, snapshot: &Snapshot) -> Option<Event> {
        if self.pending != Some(handle) {
            return None;
        }
        self.pending = None;
        if snapshot.state == NarrativeState::Driving && self.distance <= 0 {
            log::debug!(target: "oiia_parking::countdown", "arrived");
            return Some(Event::DistanceReached);
        }
        None
    }

    /// Back to the starting distance, with nothing pending
    pub fn reset<T>(&mut self, scheduler: &mut Scheduler<T>) {
        scheduler.cancel_slot(&mut self.pending);
        self.active = false;
        self.distance = self.start_distance;
    }

    fn apply<T: From<DistanceDelay>>(&mut self, distance: i64, scheduler: &mut Scheduler<T>) {
        self.distance = distance;
        scheduler.cancel_slot(&mut self.pending);
        if distance <= 0 {
            self.pending = Some(scheduler.schedule(self.reach_delay, DistanceDelay.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::context::NarrativeContext;
    use std::sync::Arc;

    fn snapshot(state: NarrativeState, distance: i64) -> Snapshot {
        let ctx = NarrativeContext {
            driving_distance: distance,
            ..NarrativeContext::default()
        };
        Snapshot::new(state, Arc::new(ctx))
    }

    fn driving(distance: i64) -> (Countdown, Scheduler<DistanceDelay>) {
        let mut scheduler = Scheduler::new();
        let mut countdown = Countdown::new(&CountdownConfig::default());
        countdown.sync(&snapshot(NarrativeState::Driving, distance), &mut scheduler);
        (countdown, scheduler)
    }

    #[test]
    fn entry_normalizes_distance() {
        let countdown = Countdown::new(&CountdownConfig::default());
        assert_eq!(countdown.normalize(120), 120);
        assert_eq!(countdown.normalize(0), 500);
        assert_eq!(countdown.normalize(-5), 500);
        assert_eq!(countdown.normalize(500), 500);
        assert_eq!(countdown.normalize(900), 500);
    }

    #[test]
    fn entry_mirrors_only_changed_distance() {
        let mut scheduler = Scheduler::<DistanceDelay>::new();
        let mut countdown = Countdown::new(&CountdownConfig::default());
        assert_eq!(
            countdown.sync(&snapshot(NarrativeState::Driving, 500), &mut scheduler),
            None
        );

        let mut countdown = Countdown::new(&CountdownConfig::default());
        assert_eq!(
            countdown.sync(&snapshot(NarrativeState::Driving, -3), &mut scheduler),
            Some(Event::UpdateDistance { distance: 500 })
        );
    }

    #[test]
    fn steps_are_mirrored() {
        let (mut countdown, mut scheduler) = driving(500);
        assert_eq!(
            countdown.drive(&mut scheduler),
            Some(Event::UpdateDistance { distance: 490 })
        );
        assert_eq!(countdown.distance(), 490);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn nothing_happens_outside_driving() {
        let mut scheduler = Scheduler::<DistanceDelay>::new();
        let mut countdown = Countdown::new(&CountdownConfig::default());
        assert_eq!(countdown.drive(&mut scheduler), None);
        assert_eq!(countdown.distance(), 500);
    }

    #[test]
    fn reaching_zero_dispatches_after_delay() {
        let (mut countdown, mut scheduler) = driving(500);
        countdown.set_distance(0, &mut scheduler);

        assert!(scheduler.pop_due(999).is_none());
        let (handle, _) = scheduler.pop_due(1_000).unwrap();
        let snap = snapshot(NarrativeState::Driving, 0);
        assert_eq!(countdown.on_fire(handle, &snap), Some(Event::DistanceReached));
    }

    #[test]
    fn changes_rearm_the_delay() {
        let (mut countdown, mut scheduler) = driving(500);
        countdown.set_distance(0, &mut scheduler);
        scheduler.pop_due(500);
        countdown.set_distance(-10, &mut scheduler);

        assert!(scheduler.pop_due(1_499).is_none());
        assert_eq!(scheduler.next_due(), Some(1_500));
    }

    #[test]
    fn backing_away_cancels_the_delay() {
        let (mut countdown, mut scheduler) = driving(500);
        countdown.set_distance(0, &mut scheduler);
        countdown.set_distance(30, &mut scheduler);
        assert!(!countdown.is_arriving());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn leaving_driving_cancels_the_delay() {
        let (mut countdown, mut scheduler) = driving(500);
        countdown.set_distance(0, &mut scheduler);
        countdown.sync(&snapshot(NarrativeState::Start, 0), &mut scheduler);
        assert!(!countdown.is_active());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn driving_from_the_floor_saturates() {
        let (mut countdown, mut scheduler) = driving(500);
        countdown.set_distance(i64::MIN, &mut scheduler);
        assert_eq!(
            countdown.drive(&mut scheduler),
            Some(Event::UpdateDistance { distance: i64::MIN })
        );
        assert_eq!(countdown.distance(), i64::MIN);
        assert!(countdown.is_arriving());
    }

    #[test]
    fn reset_restores_start_distance() {
        let (mut countdown, mut scheduler) = driving(500);
        countdown.set_distance(-40, &mut scheduler);
        countdown.reset(&mut scheduler);
        assert_eq!(countdown.distance(), 500);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
