//! Speaker-tag segmentation
//!
//! Splits dialogue into lines and recognises a leading `[Speaker]: ` tag on
//! each one. Tagged lines become a coloured speaker label followed by the
//! content; anything else is a single plain line.

use crate::types::segment::{ColorToken, TextSegment};

/// Keyword table for speaker colours, checked in order; the first hit wins.
const SPEAKER_COLORS: &[(&[&str], ColorToken)] = &[
    (&["系統"], ColorToken::System),
    (&["車載智能"], ColorToken::VehicleAi),
    (&["主角"], ColorToken::Protagonist),
    (&["神秘人", "未知聲音"], ColorToken::Mysterious),
    (&["動作", "聲音", "音樂"], ColorToken::Ambient),
];

/// Colour for a speaker tag such as `[系統]`
pub fn speaker_color(speaker: &str) -> ColorToken {
    SPEAKER_COLORS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| speaker.contains(k)))
        .map(|(_, color)| *color)
        .unwrap_or(ColorToken::Neutral)
}

/// Split `text` into display segments
pub fn segment_text(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();

    for line in text.split('\n') {
        match split_speaker(line) {
            Some((speaker, content)) => {
                segments.push(TextSegment::new(
                    format!("{speaker}: "),
                    speaker_color(speaker),
                    false,
                ));
                segments.push(TextSegment::new(content, ColorToken::Neutral, true));
            }
            None => segments.push(TextSegment::new(line, ColorToken::Neutral, true)),
        }
    }

    segments
}

/// Match `[Speaker]:` at the start of a line. Returns the bracketed tag
/// (brackets included) and the content after the colon and any whitespace.
fn split_speaker(line: &str) -> Option<(&str, &str)> {
    if !line.starts_with('[') {
        return None;
    }
    let close = line.find(']')?;
    if close < 2 {
        // Empty tag: "[]"
        return None;
    }
    let rest = line[close + 1..].strip_prefix(':')?;
    Some((&line[..=close], rest.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_line_splits_into_label_and_content() {
        let segments = segment_text("[系統]: 警告\n引擎過熱");

        assert_eq!(
            segments,
            vec![
                TextSegment::new("[系統]: ", ColorToken::System, false),
                TextSegment::new("警告", ColorToken::Neutral, true),
                TextSegment::new("引擎過熱", ColorToken::Neutral, true),
            ]
        );

        let lengths: Vec<usize> = segments.iter().map(TextSegment::char_len).collect();
        assert_eq!(lengths, vec![6, 2, 4]);
    }

    #[test]
    fn speaker_colors_follow_keyword_order() {
        assert_eq!(speaker_color("[系統]"), ColorToken::System);
        assert_eq!(speaker_color("[車載智能 KITT]"), ColorToken::VehicleAi);
        assert_eq!(speaker_color("[主角]"), ColorToken::Protagonist);
        assert_eq!(speaker_color("[神秘人]"), ColorToken::Mysterious);
        // contains both "未知聲音" and "聲音"; the earlier category wins
        assert_eq!(speaker_color("[未知聲音]"), ColorToken::Mysterious);
        assert_eq!(speaker_color("[音樂]"), ColorToken::Ambient);
        assert_eq!(speaker_color("[貓]"), ColorToken::Neutral);
    }

    #[test]
    fn whitespace_after_colon_is_normalised() {
        let segments = segment_text("[主角]:    好累");
        assert_eq!(segments[0].text, "[主角]: ");
        assert_eq!(segments[1].text, "好累");

        let segments = segment_text("[主角]:好累");
        assert_eq!(segments[0].text, "[主角]: ");
        assert_eq!(segments[1].text, "好累");
    }

    #[test]
    fn lines_without_a_tag_are_plain() {
        let segments = segment_text("no tag here\n[broken tag\n[]: empty\n [系統]: indented");
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| s.new_line));
        assert!(segments.iter().all(|s| s.color == ColorToken::Neutral));
        assert_eq!(segments[2].text, "[]: empty");
    }

    #[test]
    fn tag_without_colon_is_plain() {
        let segments = segment_text("[系統] 警告");
        assert_eq!(segments, vec![TextSegment::new("[系統] 警告", ColorToken::Neutral, true)]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        let segments = segment_text("");
        assert_eq!(segments, vec![TextSegment::new("", ColorToken::Neutral, true)]);
    }

    #[test]
    fn segmentation_is_deterministic() {
        let text = "[車載智能]: 前方 50 公分\n[動作]: 煞車聲\n結束";
        assert_eq!(segment_text(text), segment_text(text));
    }
}
