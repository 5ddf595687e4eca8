//! View state management for the terminal player
//!
//! Tracks what is already on screen and works out the delta to print after
//! each batch of session effects, so the typewriter can stream characters
//! instead of redrawing the whole screen on every tick.

use crate::presentation::SceneKey;
use crate::session::{PlayerSession, SessionEffect};
use crate::typewriter::{TypewriterEvent, VisibleSegment};
use crate::types::{segment::ColorToken, state::NarrativeState};

/// Clear the terminal screen
pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
    if std::io::Write::flush(&mut std::io::stdout()).is_err() {
        for _ in 0..50 {
            println!();
        }
    }
}

/// What the terminal currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub state: Option<NarrativeState>,
    pub scene: Option<SceneKey>,
    /// Dialogue printed so far, line breaks included
    pub printed: String,
    pub shaking: bool,
    pub notification: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold session effects into the view and return what must be printed
    pub fn apply(&mut self, session: &PlayerSession, effects: &[SessionEffect]) -> RenderDelta {
        let mut delta = RenderDelta::default();

        let state = session.state();
        if self.state != Some(state) {
            self.state = Some(state);
            delta.state_changed = Some(state);
        }

        let scene = session.scene();
        if self.scene != Some(scene) {
            self.scene = Some(scene);
            delta.scene_changed = Some(scene);
        }

        let rendered = session.rendered_text();
        let plain: String = rendered
            .segments
            .iter()
            .flat_map(|s| s.text.chars().chain(s.new_line.then_some('\n')))
            .collect();
        if delta.state_changed.is_some() || !plain.starts_with(&self.printed) {
            delta.text_reset = true;
            self.printed.clear();
        }
        delta.text = tail_segments(&rendered.segments, self.printed.chars().count());
        self.printed = plain;

        delta.text_completed = effects
            .iter()
            .any(|e| *e == SessionEffect::Text(TypewriterEvent::Completed));

        if session.is_shaking() != self.shaking {
            self.shaking = session.is_shaking();
            if self.shaking {
                delta.notices.push("💢 方向錯誤！".to_string());
            }
        }

        let notification = session
            .notification()
            .map(|n| format!("📱 {} | {}", n.title, n.message));
        if notification != self.notification {
            if let Some(text) = &notification {
                delta.notices.push(text.clone());
            }
            self.notification = notification;
        }

        delta
    }
}

/// Segments of `segments` past the first `skip` characters (line breaks
/// count as one character)
fn tail_segments(segments: &[VisibleSegment], skip: usize) -> Vec<VisibleSegment> {
    let mut offset = 0;
    let mut tail = Vec::new();
    for segment in segments {
        let len = segment.text.chars().count() + usize::from(segment.new_line);
        let end = offset + len;
        if end > skip {
            let from = skip.saturating_sub(offset);
            let text_len = segment.text.chars().count();
            tail.push(VisibleSegment {
                text: segment.text.chars().skip(from.min(text_len)).collect(),
                color: segment.color,
                new_line: segment.new_line,
            });
        }
        offset = end;
    }
    tail
}

/// What needs to be printed since the last render
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderDelta {
    pub state_changed: Option<NarrativeState>,
    pub scene_changed: Option<SceneKey>,
    /// The dialogue restarted; `text` holds it from the beginning
    pub text_reset: bool,
    pub text: Vec<VisibleSegment>,
    pub text_completed: bool,
    pub notices: Vec<String>,
}

impl RenderDelta {
    pub fn is_empty(&self) -> bool {
        self.state_changed.is_none()
            && self.scene_changed.is_none()
            && self.text.iter().all(|s| s.text.is_empty() && !s.new_line)
            && !self.text_completed
            && self.notices.is_empty()
    }
}

/// ANSI true-colour foreground escape for `color`
pub fn paint(text: &str, color: ColorToken) -> String {
    let (r, g, b) = color.rgb();
    format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
}

/// Print the dialogue part of a delta
pub fn render_text(delta: &RenderDelta) {
    if delta.text_reset {
        println!();
    }
    for segment in &delta.text {
        print!("{}", paint(&segment.text, segment.color));
        if segment.new_line {
            println!();
        }
    }
}
