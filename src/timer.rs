//! Cancellable single-shot timers on a virtual clock
//!
//! Everything time-based in the engine (typewriter ticks, the countdown's
//! delayed dispatch, the QTE shake and time limit, notification hiding)
//! goes through one `Scheduler`. Time only moves when the owner calls
//! `advance_to`, which makes every timing rule testable without sleeping.
//! A real-time front end maps wall time onto `advance_to`.

use std::collections::BTreeMap;

/// Milliseconds on the scheduler's virtual clock
pub type Millis = u64;

/// Cancellation token returned by `Scheduler::schedule`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
    due: Millis,
    id: u64,
}

impl TimerHandle {
    pub fn due(&self) -> Millis {
        self.due
    }
}

/// Virtual-time timer queue. Timers due at the same instant fire in the
/// order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    next_id: u64,
    pending: BTreeMap<TimerHandle, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Arm a timer that fires `delay` ms from now
    pub fn schedule(&mut self, delay: Millis, payload: T) -> TimerHandle {
        let handle = TimerHandle {
            due: self.now.saturating_add(delay),
            id: self.next_id,
        };
        self.next_id += 1;
        log::trace!(target: "oiia_parking::timer", "armed timer {} due at {}", handle.id, handle.due);
        self.pending.insert(handle, payload);
        handle
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled,
    /// which callers treat as benign.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.pending.remove(&handle).is_some();
        if removed {
            log::trace!(target: "oiia_parking::timer", "cancelled timer {}", handle.id);
        }
        removed
    }

    /// Cancel the timer in `slot`, if any, leaving the slot empty
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.cancel(handle);
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.keys().next().map(|h| h.due)
    }

    /// Pop the earliest timer due at or before `target`, moving the clock to
    /// its due time. Returns `None` once nothing else is due; the clock is
    /// then moved to `target`.
    ///
    /// Firing one timer at a time lets the caller schedule follow-up timers
    /// that may themselves fall inside the same window.
    pub fn pop_due(&mut self, target: Millis) -> Option<(TimerHandle, T)> {
        match self.pending.first_key_value() {
            Some((handle, _)) if handle.due <= target => {
                let (handle, payload) = self.pending.pop_first()?;
                self.now = self.now.max(handle.due);
                Some((handle, payload))
            }
            _ => {
                self.now = self.now.max(target);
                None
            }
        }
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, "late");
        scheduler.schedule(100, "early");
        scheduler.schedule(100, "early-second");

        let mut fired = Vec::new();
        while let Some((_, payload)) = scheduler.pop_due(1_000) {
            fired.push((scheduler.now(), payload));
        }

        assert_eq!(
            fired,
            vec![(100, "early"), (100, "early-second"), (300, "late")]
        );
        assert_eq!(scheduler.now(), 1_000);
    }

    #[test]
    fn timers_past_target_stay_pending() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(500, ());

        assert!(scheduler.pop_due(499).is_none());
        assert_eq!(scheduler.now(), 499);
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.pop_due(500).is_some());
    }

    #[test]
    fn cancelling_twice_is_benign() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(10, ());

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.pop_due(100).is_none());
    }

    #[test]
    fn cancelling_a_fired_timer_is_benign() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(10, ());
        assert!(scheduler.pop_due(10).is_some());
        assert!(!scheduler.cancel(handle));
    }

    #[test]
    fn cancel_slot_empties_the_slot() {
        let mut scheduler = Scheduler::new();
        let mut slot = Some(scheduler.schedule(10, ()));
        scheduler.cancel_slot(&mut slot);
        assert!(slot.is_none());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn follow_up_timers_inside_the_window_fire() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(30, 1);

        let mut count = 0;
        while let Some((_, n)) = scheduler.pop_due(100) {
            count += 1;
            if n < 3 {
                scheduler.schedule(30, n + 1);
            }
        }

        assert_eq!(count, 3);
        assert_eq!(scheduler.next_due(), None);
    }
}
