//! End-to-end playthroughs through the actor and the session

use chrono::{TimeZone, Utc};
use oiia_parking::{
    EngineConfig, EngineError, Event, FixedClock, NarrativeActor, NarrativeMachine,
    NarrativeState, PlayerSession,
};
use std::sync::{Arc, Mutex};

fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.qte.seed = Some(99);
    config
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 12, 24, 23, 47, 0).unwrap()))
}

/// Play from `start` to `parked` through the session, letting the timers run
fn park(session: &mut PlayerSession) {
    session.choose(1).unwrap();
    session.choose(1).unwrap();
    let sequence = session.snapshot().context.qte_sequence.clone();
    for key in sequence {
        session.press(key);
    }
    session.set_distance(0);
    session.advance(5_000);
    assert_eq!(session.state(), NarrativeState::Parked);
}

#[cfg(test)]
mod playthrough_tests {
    use super::*;

    #[test]
    fn cat_chaos_route_to_finished() {
        let mut session = PlayerSession::with_clock(&config(), clock());
        park(&mut session);

        // 2 = spaghetti, then 2 = pick it up, then 1 = back
        session.choose(2).unwrap();
        session.choose(2).unwrap();
        assert!(session.snapshot().context.has_spaghetti);
        assert_eq!(session.choices().len(), 1);
        session.choose(1).unwrap();

        session.choose(1).unwrap();
        let labels: Vec<_> = session.choices().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["✋ 摸摸貓咪", "🍝 餵食義大利麵", "🔙 回到停車場"]);
        session.choose(2).unwrap();
        assert_eq!(session.state(), NarrativeState::EndingCatChaos);

        session.choose(1).unwrap();
        session.choose(1).unwrap();
        assert_eq!(session.state(), NarrativeState::PaymentInput);

        assert!(matches!(
            session.submit_email(""),
            Err(EngineError::EmptyEmail)
        ));
        session.submit_email("driver@oiia.dev").unwrap();
        assert_eq!(session.state(), NarrativeState::Finished);

        session.skip_typing();
        let text = session.rendered_text().plain();
        assert!(text.contains("driver@oiia.dev"), "{text}");
        assert!(!text.contains("{{"));
    }

    #[test]
    fn bsod_route_only_restarts() {
        let mut session = PlayerSession::with_clock(&config(), clock());
        session.choose(1).unwrap();
        session.choose(2).unwrap();
        assert_eq!(session.state(), NarrativeState::EndingBsod);
        assert_eq!(session.choices().len(), 1);

        session.choose(1).unwrap();
        assert_eq!(session.state(), NarrativeState::Start);
        assert!(session.snapshot().context.logs.is_empty());
    }

    #[test]
    fn dashboard_follows_the_story() {
        let mut session = PlayerSession::with_clock(&config(), clock());
        park(&mut session);

        let dashboard = session.dashboard();
        assert_eq!(dashboard.state_label, "已停車");
        assert_eq!(dashboard.status.label(), "🎉 已停車");
        assert_eq!(dashboard.logs[0], "[23:47:00] 停車完成");
        assert_eq!(dashboard.logs.len(), session.snapshot().context.logs.len());
    }

    #[test]
    fn driving_text_tracks_the_distance() {
        let mut session = PlayerSession::with_clock(&config(), clock());
        session.choose(1).unwrap();
        session.choose(1).unwrap();
        let sequence = session.snapshot().context.qte_sequence.clone();
        for key in sequence {
            session.press(key);
        }

        session.drive();
        let text = session.rendered_text().plain();
        assert!(text.contains("490"), "{text}");
        assert!(session.rendered_text().cursor.is_none());
    }

    #[test]
    fn actor_subscribers_see_the_whole_story() {
        let machine = NarrativeMachine::with_clock(&config(), clock());
        let mut actor = NarrativeActor::from_machine(machine);
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&states);
        actor.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.state));

        actor.send(Event::Next);
        actor.send(Event::DoNothing);
        actor.send(Event::Next);
        actor.send(Event::Restart);

        assert_eq!(
            *states.lock().unwrap(),
            vec![
                NarrativeState::InCar,
                NarrativeState::EndingBsod,
                NarrativeState::Start
            ]
        );
    }

    #[test]
    fn snapshots_serialize_with_wire_names() {
        let mut actor = NarrativeActor::from_machine(NarrativeMachine::with_clock(&config(), clock()));
        actor.send(Event::Next);
        let snapshot = actor.send(Event::DoNothing);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "endingBSOD");
        assert_eq!(json["context"]["drivingDistance"], 500);
        assert_eq!(json["context"]["hasSpaghetti"], false);
        assert_eq!(json["context"]["logs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn events_decode_from_json() {
        let event: Event = serde_json::from_str(r#"{"type":"SUBMIT_EMAIL","email":"a@b.c"}"#).unwrap();
        assert_eq!(
            event,
            Event::SubmitEmail {
                email: "a@b.c".to_string()
            }
        );

        let mut actor = NarrativeActor::from_machine(NarrativeMachine::with_clock(&config(), clock()));
        let next: Event = serde_json::from_str(r#"{"type":"NEXT"}"#).unwrap();
        assert_eq!(actor.send(next).state, NarrativeState::InCar);
    }
}
