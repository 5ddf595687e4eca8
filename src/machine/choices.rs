//! Choices offered in each state

use crate::types::{
    context::NarrativeContext, event::Event, output::Choice, state::NarrativeState,
};

/// Choices available for `(state, ctx)`.
///
/// States driven by other inputs (the QTE pad, the countdown, the gate
/// timers, the email form) offer none.
pub fn choices(state: NarrativeState, ctx: &NarrativeContext) -> Vec<Choice> {
    use NarrativeState as S;
    match state {
        S::Start => vec![Choice::new("強行進入(物理)", Event::Next)],
        S::InCar => {
            let mut choices = vec![Choice::new("啟動引擎", Event::Next)];
            if ctx.game_cleared {
                choices.push(Choice::new("🤖 自動駕駛 (VIP)", Event::AutoPilot));
            }
            choices.push(Choice::new("原地發呆", Event::DoNothing));
            choices
        }
        S::EngineStall => vec![Choice::new("再試一次", Event::Retry)],
        S::Parked => vec![
            Choice::new("🐱 查看貓咪", Event::GoCat),
            Choice::new("🍝 查看義大利麵", Event::GoSpaghetti),
            Choice::new("🧱 走向邊界", Event::GoExit),
        ],
        S::InteractCat => {
            let mut choices = vec![Choice::new("✋ 摸摸貓咪", Event::TouchCat)];
            if ctx.has_spaghetti {
                choices.push(Choice::new("🍝 餵食義大利麵", Event::FeedCat));
            }
            choices.push(back());
            choices
        }
        S::InteractSpaghetti => {
            let mut choices = Vec::new();
            if !ctx.has_spaghetti {
                choices.push(Choice::new("🍴 吃掉它", Event::EatSpaghetti));
                choices.push(Choice::new("🎒 拿起義大利麵", Event::PickUp));
            }
            choices.push(back());
            choices
        }
        S::InteractExit => vec![Choice::new("💥 撞擊牆壁", Event::HitWall), back()],
        S::EndingBlackHole | S::EndingCatChaos | S::EndingSpaghettiDance | S::EndingAdmin => {
            vec![Choice::new("前往繳費", Event::Next)]
        }
        S::EndingBsod | S::Finished => vec![Choice::new("再來一把", Event::Restart)],
        S::PaymentNarrative => vec![Choice::new("前往繳費", Event::ProceedToPay)],
        S::QteSequence | S::Driving | S::AtGate | S::GateOpening | S::PaymentInput => Vec::new(),
    }
}

fn back() -> Choice {
    Choice::new("🔙 回到停車場", Event::Back)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(state: NarrativeState, ctx: &NarrativeContext) -> Vec<Event> {
        choices(state, ctx).into_iter().map(|c| c.action).collect()
    }

    #[test]
    fn auto_pilot_requires_cleared_game() {
        let mut ctx = NarrativeContext::default();
        assert_eq!(
            actions(NarrativeState::InCar, &ctx),
            vec![Event::Next, Event::DoNothing]
        );

        ctx.game_cleared = true;
        assert_eq!(
            actions(NarrativeState::InCar, &ctx),
            vec![Event::Next, Event::AutoPilot, Event::DoNothing]
        );
    }

    #[test]
    fn feeding_requires_spaghetti() {
        let mut ctx = NarrativeContext::default();
        assert!(!actions(NarrativeState::InteractCat, &ctx).contains(&Event::FeedCat));

        ctx.has_spaghetti = true;
        assert_eq!(
            actions(NarrativeState::InteractCat, &ctx),
            vec![Event::TouchCat, Event::FeedCat, Event::Back]
        );
    }

    #[test]
    fn spaghetti_choices_shrink_after_pick_up() {
        let mut ctx = NarrativeContext::default();
        assert_eq!(
            actions(NarrativeState::InteractSpaghetti, &ctx),
            vec![Event::EatSpaghetti, Event::PickUp, Event::Back]
        );

        ctx.has_spaghetti = true;
        assert_eq!(actions(NarrativeState::InteractSpaghetti, &ctx), vec![Event::Back]);
    }

    #[test]
    fn input_driven_states_offer_nothing() {
        let ctx = NarrativeContext::default();
        for state in [
            NarrativeState::QteSequence,
            NarrativeState::Driving,
            NarrativeState::AtGate,
            NarrativeState::GateOpening,
            NarrativeState::PaymentInput,
        ] {
            assert!(choices(state, &ctx).is_empty(), "{state} offered choices");
        }
    }

    #[test]
    fn endings_lead_to_payment_or_restart() {
        let ctx = NarrativeContext::default();
        for state in NarrativeState::ALL.into_iter().filter(|s| s.is_ending()) {
            let expected = if state == NarrativeState::EndingBsod {
                Event::Restart
            } else {
                Event::Next
            };
            assert_eq!(actions(state, &ctx), vec![expected]);
        }
    }
}
