//! Actor wrapper around the narrative machine
//!
//! The actor is the only way to drive the machine from the outside:
//! `send` processes one event to completion and notifies subscribers with
//! the resulting snapshot. Subscribers only see `&Snapshot`, so they cannot
//! send events back while a notification is in progress.

use crate::config::EngineConfig;
use crate::machine::NarrativeMachine;
use crate::types::{
    event::Event,
    output::{Choice, Snapshot},
    state::NarrativeState,
};

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Snapshot) + Send>;

pub struct NarrativeActor {
    machine: NarrativeMachine,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl std::fmt::Debug for NarrativeActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeActor")
            .field("machine", &self.machine)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl NarrativeActor {
    pub fn new(config: &EngineConfig) -> Self {
        Self::from_machine(NarrativeMachine::new(config))
    }

    pub fn from_machine(machine: NarrativeMachine) -> Self {
        Self {
            machine,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> NarrativeState {
        self.machine.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    pub fn choices(&self) -> Vec<Choice> {
        self.machine.choices()
    }

    /// Process `event` and return the resulting snapshot.
    ///
    /// Subscribers are notified only when the event applied.
    pub fn send(&mut self, event: Event) -> Snapshot {
        let applied = self.machine.send(&event);
        let snapshot = self.machine.snapshot();
        if applied {
            for (_, subscriber) in &mut self.subscribers {
                subscriber(&snapshot);
            }
        }
        snapshot
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}
