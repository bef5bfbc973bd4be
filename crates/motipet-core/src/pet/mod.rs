//! Pet state, the mock readiness service and the view-models built on them.

mod companion;
mod simulator;
mod status;
mod view_model;

pub use companion::CompanionSession;
pub use simulator::ReadinessSimulator;
pub use status::PetStatus;
pub use view_model::{FetchOutcome, GameViewModel, Reaction, ViewUpdate, FALLBACK_BANNER};

use serde::{Deserialize, Serialize};

use crate::progression::PetMood;

/// Base animations the pet can settle into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetAnimation {
    #[default]
    Idle,
    Happy,
    Tired,
    Sleep,
}

impl PetAnimation {
    pub const ALL: [PetAnimation; 4] = [
        PetAnimation::Idle,
        PetAnimation::Happy,
        PetAnimation::Tired,
        PetAnimation::Sleep,
    ];

    /// Frame tag in the sprite sheet.
    pub fn tag(&self) -> &'static str {
        match self {
            PetAnimation::Idle => "idle",
            PetAnimation::Happy => "Happy",
            PetAnimation::Tired => "tired",
            PetAnimation::Sleep => "sleep",
        }
    }

    pub fn is_loop(&self) -> bool {
        !matches!(self, PetAnimation::Happy)
    }

    pub fn for_mood(mood: PetMood) -> Self {
        match mood {
            PetMood::Energetic | PetMood::Normal => PetAnimation::Idle,
            PetMood::Tired => PetAnimation::Tired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessory {
    Sunglasses,
}

impl Accessory {
    pub const ALL: [Accessory; 1] = [Accessory::Sunglasses];

    /// Texture asset drawn over the pet.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Accessory::Sunglasses => "Accessory_Sunglasses",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Accessory::Sunglasses => "Sunglasses",
        }
    }
}

impl std::str::FromStr for Accessory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sunglasses" | "accessory_sunglasses" => Ok(Accessory::Sunglasses),
            _ => Err(format!("Unknown accessory: {s}")),
        }
    }
}
