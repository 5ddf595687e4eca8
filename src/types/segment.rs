//! Display segments produced by the text segmenter

use serde::{Deserialize, Serialize};

/// Symbolic colour of a text run. Presentation maps it to a platform colour;
/// `hex` gives the reference palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    System,
    VehicleAi,
    Protagonist,
    Mysterious,
    Ambient,
    Neutral,
}

impl ColorToken {
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::System => "#4ade80",
            ColorToken::VehicleAi => "#22d3ee",
            ColorToken::Protagonist => "#facc15",
            ColorToken::Mysterious => "#c084fc",
            ColorToken::Ambient => "#9ca3af",
            ColorToken::Neutral => "#e5e7eb",
        }
    }

    /// RGB triple of `hex`, for terminals with true-colour support
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0xff);
        (channel(0), channel(2), channel(4))
    }
}

/// A coloured, speaker-attributed run of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub text: String,
    pub color: ColorToken,
    /// Whether a line break follows this segment
    pub new_line: bool,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, color: ColorToken, new_line: bool) -> Self {
        Self {
            text: text.into(),
            color,
            new_line,
        }
    }

    /// Length in characters, the unit the typewriter counts in
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
