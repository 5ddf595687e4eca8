//! Events that can be sent to the narrative machine

use crate::types::context::Direction;
use serde::{Deserialize, Serialize};

/// Everything the presentation layer (or a subsystem timer) may send to the
/// machine. Events that are not valid for the current state are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Next,
    DoNothing,
    /// Skip the ignition and drive; only honoured once the game is cleared
    AutoPilot,
    Retry,
    /// Mirror of the externally controlled driving distance
    UpdateDistance { distance: i64 },
    DistanceReached,
    KeyPress { key: Direction },
    QteSuccess,
    /// The QTE time limit ran out
    QteTimeout,
    GoCat,
    GoSpaghetti,
    GoExit,
    TouchCat,
    /// Only honoured while carrying the spaghetti
    FeedCat,
    Back,
    EatSpaghetti,
    PickUp,
    HitWall,
    ProceedToPay,
    SubmitEmail { email: String },
    Restart,
}

impl Event {
    /// Wire name of the event type
    pub fn name(&self) -> &'static str {
        match self {
            Event::Next => "NEXT",
            Event::DoNothing => "DO_NOTHING",
            Event::AutoPilot => "AUTO_PILOT",
            Event::Retry => "RETRY",
            Event::UpdateDistance { .. } => "UPDATE_DISTANCE",
            Event::DistanceReached => "DISTANCE_REACHED",
            Event::KeyPress { .. } => "KEY_PRESS",
            Event::QteSuccess => "QTE_SUCCESS",
            Event::QteTimeout => "QTE_TIMEOUT",
            Event::GoCat => "GO_CAT",
            Event::GoSpaghetti => "GO_SPAGHETTI",
            Event::GoExit => "GO_EXIT",
            Event::TouchCat => "TOUCH_CAT",
            Event::FeedCat => "FEED_CAT",
            Event::Back => "BACK",
            Event::EatSpaghetti => "EAT_SPAGHETTI",
            Event::PickUp => "PICK_UP",
            Event::HitWall => "HIT_WALL",
            Event::ProceedToPay => "PROCEED_TO_PAY",
            Event::SubmitEmail { .. } => "SUBMIT_EMAIL",
            Event::Restart => "RESTART",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(Event::KeyPress { key: Direction::Left }).unwrap();
        assert_eq!(json["type"], "KEY_PRESS");
        assert_eq!(json["key"], "ArrowLeft");

        let json = serde_json::to_value(Event::UpdateDistance { distance: 120 }).unwrap();
        assert_eq!(json["type"], "UPDATE_DISTANCE");
        assert_eq!(json["distance"], 120);
    }

    #[test]
    fn events_deserialize_from_presentation_payloads() {
        let event: Event =
            serde_json::from_str(r#"{"type":"SUBMIT_EMAIL","email":"me@example.com"}"#).unwrap();
        assert_eq!(
            event,
            Event::SubmitEmail {
                email: "me@example.com".to_string()
            }
        );

        let event: Event = serde_json::from_str(r#"{"type":"GO_SPAGHETTI"}"#).unwrap();
        assert_eq!(event, Event::GoSpaghetti);
    }

    #[test]
    fn name_matches_serialized_tag() {
        let samples = [
            Event::AutoPilot,
            Event::QteSuccess,
            Event::DistanceReached,
            Event::ProceedToPay,
            Event::Restart,
        ];
        for event in samples {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.name());
        }
    }
}
