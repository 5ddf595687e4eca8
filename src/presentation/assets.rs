//! Scene resolution
//!
//! The machine only stores symbolic image keys. A front end resolves the
//! key to show with `resolve_scene` and looks it up in an `AssetTable` of
//! its own handles (paths, textures, terminal glyphs).

use crate::types::{context::NarrativeContext, state::NarrativeState};
use std::collections::HashMap;

/// Key a scene may declare that means "no picture of its own"
pub const NARRATOR: &str = "narrator";

/// Every picture the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    ParkingLot,
    Teach,
    CarInterior,
    BlueScreen,
    OiiaCat,
    /// Animated spinning cat
    OiiaCatSpin,
    Protagonist,
    MovingCar,
    StreetCat,
    Spaghetti,
    SpaghettiEaten,
    SpaghettiDance,
    HandTouching,
    MysteriousMan,
    StaticNoise,
    RailingClosed,
    RailingOpening,
}

impl SceneKey {
    /// Key as used in a background slot
    pub fn from_background(key: &str) -> Option<Self> {
        Some(match key {
            "parking-lot" => SceneKey::ParkingLot,
            "teach" => SceneKey::Teach,
            "car-interior" => SceneKey::CarInterior,
            "blue-screen" => SceneKey::BlueScreen,
            "oiia-cat" => SceneKey::OiiaCatSpin,
            "protagonist" => SceneKey::Protagonist,
            "moving-car" => SceneKey::MovingCar,
            "street-cat" => SceneKey::StreetCat,
            "spaghetti" => SceneKey::Spaghetti,
            "spaghetti-eaten" => SceneKey::SpaghettiEaten,
            "spaghetti-dance" => SceneKey::SpaghettiDance,
            "hand-touching" => SceneKey::HandTouching,
            "mysterious-man" => SceneKey::MysteriousMan,
            "static-noise" => SceneKey::StaticNoise,
            "railing-closed" => SceneKey::RailingClosed,
            "railing-opening" => SceneKey::RailingOpening,
            _ => return None,
        })
    }

    /// Key as used in a character slot
    pub fn from_character(key: &str) -> Option<Self> {
        Some(match key {
            "street-cat" | "oiia-cat" => SceneKey::OiiaCat,
            "oiia-cat-gif" => SceneKey::OiiaCatSpin,
            "spaghetti" => SceneKey::Spaghetti,
            "spaghetti-eaten" | "spaghetti_eaten" => SceneKey::SpaghettiEaten,
            "hand-touching" => SceneKey::HandTouching,
            "protagonist" => SceneKey::Protagonist,
            "mysterious-man" => SceneKey::MysteriousMan,
            "car" => SceneKey::CarInterior,
            "parking-lot" => SceneKey::ParkingLot,
            "teach" => SceneKey::Teach,
            _ => return None,
        })
    }

    /// Picture shown for `state` when the scene names nothing usable
    pub fn for_state(state: NarrativeState, ctx: &NarrativeContext) -> Self {
        use NarrativeState as S;
        match state {
            S::Start => SceneKey::Protagonist,
            S::InCar | S::QteSequence | S::EngineStall => SceneKey::CarInterior,
            S::Driving => SceneKey::MovingCar,
            S::AtGate => SceneKey::RailingClosed,
            S::GateOpening => SceneKey::RailingOpening,
            S::EndingBlackHole | S::EndingCatChaos => SceneKey::OiiaCatSpin,
            S::EndingSpaghettiDance => SceneKey::Spaghetti,
            S::EndingAdmin => SceneKey::MysteriousMan,
            S::EndingBsod => SceneKey::BlueScreen,
            S::InteractCat => SceneKey::OiiaCat,
            S::InteractSpaghetti if ctx.has_spaghetti => SceneKey::SpaghettiEaten,
            S::InteractSpaghetti => SceneKey::Spaghetti,
            S::InteractExit => SceneKey::HandTouching,
            S::Parked | S::PaymentNarrative | S::PaymentInput | S::Finished => {
                SceneKey::ParkingLot
            }
        }
    }
}

/// Pick the picture for a scene: the background key unless it is the
/// narrator, then the character key, then the state's own picture.
pub fn resolve_scene(state: NarrativeState, ctx: &NarrativeContext) -> SceneKey {
    usable(&ctx.background_image)
        .and_then(SceneKey::from_background)
        .or_else(|| usable(&ctx.character_image).and_then(SceneKey::from_character))
        .unwrap_or_else(|| SceneKey::for_state(state, ctx))
}

fn usable(key: &Option<String>) -> Option<&str> {
    key.as_deref().filter(|k| *k != NARRATOR)
}

/// Front-end handles by scene key, with a placeholder for anything missing
#[derive(Debug, Clone)]
pub struct AssetTable<H> {
    entries: HashMap<SceneKey, H>,
    placeholder: H,
}

impl<H> AssetTable<H> {
    pub fn new(placeholder: H) -> Self {
        Self {
            entries: HashMap::new(),
            placeholder,
        }
    }

    pub fn with(mut self, key: SceneKey, handle: H) -> Self {
        self.entries.insert(key, handle);
        self
    }

    pub fn insert(&mut self, key: SceneKey, handle: H) {
        self.entries.insert(key, handle);
    }

    pub fn get(&self, key: SceneKey) -> &H {
        self.entries.get(&key).unwrap_or(&self.placeholder)
    }

    /// Handle for the scene `(state, ctx)` currently shows
    pub fn scene(&self, state: NarrativeState, ctx: &NarrativeContext) -> &H {
        self.get(resolve_scene(state, ctx))
    }
}
