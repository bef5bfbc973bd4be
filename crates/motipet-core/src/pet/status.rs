use serde::{Deserialize, Serialize};

use super::Accessory;
use crate::api::DailyStateResponse;
use crate::progression::{self, HappinessState, PetMood};

/// Everything the UI shows about the pet. Replaced wholesale on every reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetStatus {
    pub level: u32,
    pub total_xp: u32,
    pub xp_into_level: u32,
    pub xp_to_next_level: u32,
    pub readiness_score: u32,
    pub readiness_diagnosis: String,
    pub state_reason: String,
    pub pet_mood: PetMood,
    pub happiness_score: u32,
    pub happiness_state: HappinessState,
    pub leveled_up: bool,
    /// Seconds the happy animation is forced for; 0 when not forced.
    pub force_happy_seconds: u32,
    pub accessories: Vec<Accessory>,
}

impl Default for PetStatus {
    fn default() -> Self {
        Self {
            level: 1,
            total_xp: 0,
            xp_into_level: 0,
            xp_to_next_level: 100,
            readiness_score: 75,
            readiness_diagnosis: "Normal".to_string(),
            state_reason: String::new(),
            pet_mood: PetMood::Normal,
            happiness_score: 80,
            happiness_state: HappinessState::Content,
            leveled_up: false,
            force_happy_seconds: 0,
            accessories: Vec::new(),
        }
    }
}

impl PetStatus {
    /// XP span of the current level.
    pub fn xp_for_next_level(&self) -> u32 {
        self.xp_into_level.saturating_add(self.xp_to_next_level)
    }

    pub fn xp_progress(&self) -> f64 {
        let total = self.xp_for_next_level();
        if total == 0 {
            return 0.0;
        }
        (self.xp_into_level as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn xp_display_text(&self) -> String {
        format!("{}/{}", self.xp_into_level, self.xp_for_next_level())
    }

    pub fn update_progress(&mut self, total_xp: u32) {
        let p = progression::progress(total_xp);
        self.level = p.level;
        self.total_xp = total_xp;
        self.xp_into_level = p.xp_into_level;
        self.xp_to_next_level = p.xp_to_next_level;
    }

    /// Adopt a server-computed state. Unknown mood or happiness strings fall
    /// back to the defaults.
    pub fn apply_api_response(&mut self, resp: &DailyStateResponse, accessories: &[Accessory]) {
        self.level = non_negative(resp.level);
        self.total_xp = non_negative(resp.total_xp);
        self.xp_into_level = non_negative(resp.xp_into_level);
        self.xp_to_next_level = non_negative(resp.xp_to_next_level);
        self.readiness_score = non_negative(resp.readiness_score);
        self.readiness_diagnosis = resp.readiness_diagnosis.clone();
        self.state_reason = resp.state_reason.clone();
        self.pet_mood = PetMood::from_wire(&resp.pet_state).unwrap_or_default();
        self.happiness_score = non_negative(resp.happiness_score);
        self.happiness_state = HappinessState::from_wire(&resp.happiness_state).unwrap_or_default();
        self.leveled_up = resp.leveled_up;
        self.force_happy_seconds = non_negative(resp.force_happy_seconds);
        self.merge_accessories(accessories);
    }

    pub fn merge_accessories(&mut self, accessories: &[Accessory]) {
        self.accessories = accessories.to_vec();
    }
}

fn non_negative(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}
