//! Typewriter reveal of segmented dialogue
//!
//! The typewriter keeps a global character index into the interpolated,
//! segmented text and advances it one character per tick. Ticks are
//! single-shot timers on the shared `Scheduler`; at most one is pending at a
//! time and any text change cancels it before a new cycle starts.

use crate::text::{VariableSource, interpolate, segment_text};
use crate::timer::{Millis, Scheduler, TimerHandle};
use crate::types::segment::{ColorToken, TextSegment};

/// Timer payload for a typewriter tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No text to reveal
    Idle,
    Revealing,
    Complete,
}

/// Side effects for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterEvent {
    /// Visible text changed; re-render (e.g. auto-scroll)
    Update,
    /// The whole text is visible. Fires once per text instance.
    Completed,
}

#[derive(Debug)]
pub struct Typewriter {
    interval: Millis,
    cursor: String,
    processed: String,
    segments: Vec<TextSegment>,
    total: usize,
    index: usize,
    phase: Phase,
    completion_fired: bool,
    pending_tick: Option<TimerHandle>,
}

impl Typewriter {
    pub fn new(interval: Millis, cursor: impl Into<String>) -> Self {
        Self {
            interval,
            cursor: cursor.into(),
            processed: String::new(),
            segments: Vec::new(),
            total: 0,
            index: 0,
            phase: Phase::Idle,
            completion_fired: false,
            pending_tick: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Interpolated text currently being revealed
    pub fn processed_text(&self) -> &str {
        &self.processed
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    pub fn is_typing(&self) -> bool {
        self.phase == Phase::Revealing && self.index < self.total
    }

    /// Bring the typewriter in line with the current render inputs.
    ///
    /// Call on every render. `force_full` is the "show everything now"
    /// override (an explicit skip, or the driving countdown being active).
    pub fn sync<T: From<TypewriterTick>>(
        &mut self,
        text: &str,
        vars: &dyn VariableSource,
        force_full: bool,
        scheduler: &mut Scheduler<T>,
    ) -> Vec<TypewriterEvent> {
        let processed = interpolate(text, vars);
        if processed != self.processed {
            self.restart(processed, scheduler);
        }

        let mut events = Vec::new();
        if self.processed.is_empty() {
            return events;
        }

        if force_full {
            scheduler.cancel_slot(&mut self.pending_tick);
            self.index = self.total;
            self.complete(&mut events);
            events.push(TypewriterEvent::Update);
            return events;
        }

        if self.index < self.total {
            if self.pending_tick.is_none() {
                self.arm(scheduler);
            }
        } else {
            self.complete(&mut events);
        }
        events
    }

    /// Handle a fired tick. Ticks that are no longer the pending one are
    /// ignored.
    pub fn on_tick<T: From<TypewriterTick>>(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut Scheduler<T>,
    ) -> Vec<TypewriterEvent> {
        let mut events = Vec::new();
        if self.pending_tick != Some(handle) {
            log::trace!(target: "oiia_parking::typewriter", "ignoring stale tick");
            return events;
        }
        self.pending_tick = None;

        if self.phase != Phase::Revealing || self.index >= self.total {
            return events;
        }

        self.index += 1;
        events.push(TypewriterEvent::Update);

        if self.index < self.total {
            self.arm(scheduler);
        } else {
            self.complete(&mut events);
        }
        events
    }

    /// Cancel any outstanding tick and forget the current text
    pub fn reset<T>(&mut self, scheduler: &mut Scheduler<T>) {
        scheduler.cancel_slot(&mut self.pending_tick);
        self.processed.clear();
        self.segments.clear();
        self.total = 0;
        self.index = 0;
        self.phase = Phase::Idle;
        self.completion_fired = false;
    }

    /// Visible portion of the text at the current index
    pub fn render(&self) -> RenderedText {
        let mut visible = Vec::new();
        let mut start = 0;

        for segment in &self.segments {
            if self.index < start {
                break;
            }
            let len = segment.char_len();
            let end = start + len;
            let text = if self.index >= end {
                segment.text.clone()
            } else {
                segment.text.chars().take(self.index - start).collect()
            };
            visible.push(VisibleSegment {
                text,
                color: segment.color,
                new_line: segment.new_line,
            });
            start = end;
        }

        RenderedText {
            segments: visible,
            cursor: (self.index < self.total).then(|| self.cursor.clone()),
        }
    }

    fn restart<T>(&mut self, processed: String, scheduler: &mut Scheduler<T>) {
        scheduler.cancel_slot(&mut self.pending_tick);
        self.segments = segment_text(&processed);
        self.total = self.segments.iter().map(TextSegment::char_len).sum();
        self.index = 0;
        self.completion_fired = false;
        self.phase = if processed.is_empty() {
            Phase::Idle
        } else {
            Phase::Revealing
        };
        log::debug!(
            target: "oiia_parking::typewriter",
            "new text: {} segments, {} chars",
            self.segments.len(),
            self.total
        );
        self.processed = processed;
    }

    fn arm<T: From<TypewriterTick>>(&mut self, scheduler: &mut Scheduler<T>) {
        self.pending_tick = Some(scheduler.schedule(self.interval, TypewriterTick.into()));
    }

    fn complete(&mut self, events: &mut Vec<TypewriterEvent>) {
        self.phase = Phase::Complete;
        if !self.completion_fired {
            self.completion_fired = true;
            events.push(TypewriterEvent::Completed);
        }
    }
}

/// A segment as currently visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSegment {
    pub text: String,
    pub color: ColorToken,
    pub new_line: bool,
}

/// Output of `Typewriter::render`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    pub segments: Vec<VisibleSegment>,
    /// Blinking cursor glyph, present while revealing
    pub cursor: Option<String>,
}

impl RenderedText {
    /// Number of revealed characters, excluding line breaks and cursor
    pub fn visible_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Flatten to plain text with line breaks and cursor
    pub fn plain(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.text);
            if segment.new_line {
                out.push('\n');
            }
        }
        if let Some(cursor) = &self.cursor {
            out.push_str(cursor);
        }
        out
    }
}
