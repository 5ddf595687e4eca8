//! Virtual phone that pops up machine notifications for a few seconds

use crate::timer::{Millis, Scheduler, TimerHandle};
use crate::types::{context::Notification, output::Snapshot};

/// Timer payload that hides the current notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationExpired;

#[derive(Debug)]
pub struct MobileView {
    duration: Millis,
    /// Last notification seen in a snapshot, shown or not
    last_seen: Option<Notification>,
    visible: Option<Notification>,
    hide_timer: Option<TimerHandle>,
}

impl MobileView {
    pub fn new(duration: Millis) -> Self {
        Self {
            duration,
            last_seen: None,
            visible: None,
            hide_timer: None,
        }
    }

    /// Notification currently on screen
    pub fn visible(&self) -> Option<&Notification> {
        self.visible.as_ref()
    }

    /// Show the snapshot's notification if it is new. Returns whether the
    /// view changed.
    pub fn sync<T: From<NotificationExpired>>(
        &mut self,
        snapshot: &Snapshot,
        scheduler: &mut Scheduler<T>,
    ) -> bool {
        let current = snapshot.context.notification.as_ref();
        if current == self.last_seen.as_ref() {
            return false;
        }
        self.last_seen = current.cloned();

        scheduler.cancel_slot(&mut self.hide_timer);
        let was_visible = self.visible.is_some();
        self.visible = current.cloned();
        if let Some(notification) = &self.visible {
            log::debug!("notification: {}", notification.title);
            self.hide_timer = Some(scheduler.schedule(self.duration, NotificationExpired.into()));
            return true;
        }
        was_visible
    }

    /// Handle a fired hide timer. Returns whether the view changed.
    pub fn on_expire(&mut self, handle: TimerHandle) -> bool {
        if self.hide_timer != Some(handle) {
            return false;
        }
        self.hide_timer = None;
        self.visible.take().is_some()
    }
}
