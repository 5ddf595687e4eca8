//! Narrative state representation

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of story states. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum NarrativeState {
    /// Title beat before the player forces the car door
    #[default]
    Start,
    InCar,
    /// Ignition mini-game
    QteSequence,
    EngineStall,
    /// Countdown towards the parking gate
    Driving,
    AtGate,
    GateOpening,
    /// Parking-lot hub with three interactions
    Parked,
    InteractCat,
    InteractSpaghetti,
    InteractExit,
    EndingBlackHole,
    EndingCatChaos,
    EndingSpaghettiDance,
    EndingAdmin,
    #[serde(rename = "endingBSOD")]
    EndingBsod,
    PaymentNarrative,
    PaymentInput,
    Finished,
}

impl NarrativeState {
    pub const ALL: [NarrativeState; 19] = [
        NarrativeState::Start,
        NarrativeState::InCar,
        NarrativeState::QteSequence,
        NarrativeState::EngineStall,
        NarrativeState::Driving,
        NarrativeState::AtGate,
        NarrativeState::GateOpening,
        NarrativeState::Parked,
        NarrativeState::InteractCat,
        NarrativeState::InteractSpaghetti,
        NarrativeState::InteractExit,
        NarrativeState::EndingBlackHole,
        NarrativeState::EndingCatChaos,
        NarrativeState::EndingSpaghettiDance,
        NarrativeState::EndingAdmin,
        NarrativeState::EndingBsod,
        NarrativeState::PaymentNarrative,
        NarrativeState::PaymentInput,
        NarrativeState::Finished,
    ];

    /// Wire name of the state, as the presentation layer knows it
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativeState::Start => "start",
            NarrativeState::InCar => "inCar",
            NarrativeState::QteSequence => "qteSequence",
            NarrativeState::EngineStall => "engineStall",
            NarrativeState::Driving => "driving",
            NarrativeState::AtGate => "atGate",
            NarrativeState::GateOpening => "gateOpening",
            NarrativeState::Parked => "parked",
            NarrativeState::InteractCat => "interactCat",
            NarrativeState::InteractSpaghetti => "interactSpaghetti",
            NarrativeState::InteractExit => "interactExit",
            NarrativeState::EndingBlackHole => "endingBlackHole",
            NarrativeState::EndingCatChaos => "endingCatChaos",
            NarrativeState::EndingSpaghettiDance => "endingSpaghettiDance",
            NarrativeState::EndingAdmin => "endingAdmin",
            NarrativeState::EndingBsod => "endingBSOD",
            NarrativeState::PaymentNarrative => "paymentNarrative",
            NarrativeState::PaymentInput => "paymentInput",
            NarrativeState::Finished => "finished",
        }
    }

    /// Whether this is one of the five ending states
    pub fn is_ending(self) -> bool {
        matches!(
            self,
            NarrativeState::EndingBlackHole
                | NarrativeState::EndingCatChaos
                | NarrativeState::EndingSpaghettiDance
                | NarrativeState::EndingAdmin
                | NarrativeState::EndingBsod
        )
    }

    /// Parking-lot interaction states reachable from the hub
    pub fn is_interaction(self) -> bool {
        matches!(
            self,
            NarrativeState::InteractCat
                | NarrativeState::InteractSpaghetti
                | NarrativeState::InteractExit
        )
    }
}

impl fmt::Display for NarrativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NarrativeState {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NarrativeState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| EngineError::UnknownState(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for state in NarrativeState::ALL {
            assert_eq!(state.as_str().parse::<NarrativeState>().unwrap(), state);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&NarrativeState::EndingBsod).unwrap();
        assert_eq!(json, "\"endingBSOD\"");
        let json = serde_json::to_string(&NarrativeState::InteractSpaghetti).unwrap();
        assert_eq!(json, "\"interactSpaghetti\"");
    }

    #[test]
    fn legacy_names_are_rejected() {
        assert!("endingBlackhole".parse::<NarrativeState>().is_err());
        assert!("outcomeCat".parse::<NarrativeState>().is_err());
    }

    #[test]
    fn endings_are_classified() {
        let endings: Vec<_> = NarrativeState::ALL
            .into_iter()
            .filter(|s| s.is_ending())
            .collect();
        assert_eq!(endings.len(), 5);
        assert!(!NarrativeState::Finished.is_ending());
    }
}
