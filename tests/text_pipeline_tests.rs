//! Interpolation, segmentation and typewriter reveal working together

use oiia_parking::text::{interpolate, segment_text};
use oiia_parking::{
    ColorToken, NarrativeContext, Scheduler, Typewriter, TypewriterEvent,
    typewriter::{Phase, TypewriterTick},
};

#[cfg(test)]
mod text_pipeline_tests {
    use super::*;

    fn reveal_all(
        tw: &mut Typewriter,
        scheduler: &mut Scheduler<TypewriterTick>,
    ) -> Vec<TypewriterEvent> {
        let mut events = Vec::new();
        while let Some((handle, _)) = scheduler.pop_due(60_000) {
            events.extend(tw.on_tick(handle, scheduler));
        }
        events
    }

    #[test]
    fn warning_line_segments() {
        let input = "[系統]: 警告\n引擎過熱";
        let segments = segment_text(input);

        let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["[系統]: ", "警告", "引擎過熱"]);
        assert_eq!(segments[0].color, ColorToken::System);
        assert!(!segments[0].new_line);
        assert_eq!(segments[1].color, ColorToken::Neutral);
        assert!(segments[1].new_line && segments[2].new_line);

        // offsets 0, 6, 8 and a total of 12; the line break makes 13
        let lens: Vec<_> = segments.iter().map(|s| s.char_len()).collect();
        assert_eq!(lens, vec![6, 2, 4]);
        assert_eq!(lens.iter().sum::<usize>() + 1, input.chars().count());
    }

    #[test]
    fn context_variables_fill_dialogue() {
        let ctx = NarrativeContext {
            driving_distance: 42,
            ..NarrativeContext::default()
        };
        assert_eq!(
            interpolate("[車載智能]: 還有 {{ drivingDistance }} 公分 {{nope}}", &ctx),
            "[車載智能]: 還有 42 公分 {{nope}}"
        );
    }

    #[test]
    fn full_reveal_completes_once_and_matches_segments() {
        let ctx = NarrativeContext::default();
        let mut scheduler = Scheduler::new();
        let mut tw = Typewriter::new(30, "▮");

        tw.sync("[主角]: 終於下班了\n[動作]: 車門卡住了", &ctx, false, &mut scheduler);
        let events = reveal_all(&mut tw, &mut scheduler);

        let completions = events
            .iter()
            .filter(|e| **e == TypewriterEvent::Completed)
            .count();
        let updates = events.len() - completions;
        assert_eq!(completions, 1);
        assert_eq!(updates, tw.total());
        assert_eq!(tw.phase(), Phase::Complete);

        let rendered = tw.render();
        assert_eq!(rendered.segments.len(), tw.segments().len());
        assert_eq!(rendered.segments[2].color, ColorToken::Ambient);
    }

    #[test]
    fn no_stacked_ticks_across_rapid_text_changes() {
        let ctx = NarrativeContext::default();
        let mut scheduler = Scheduler::new();
        let mut tw = Typewriter::new(30, "▮");

        for text in ["一", "一二", "一二三", "一二三四"] {
            tw.sync(text, &ctx, false, &mut scheduler);
            assert!(scheduler.pending_count() <= 1);
        }
        reveal_all(&mut tw, &mut scheduler);
        assert_eq!(tw.index(), 4);
    }
}
