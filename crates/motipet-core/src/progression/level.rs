use serde::{Deserialize, Serialize};

/// Cumulative XP needed to reach levels 1..=6.
pub const BASE_THRESHOLDS: [u32; 6] = [0, 100, 250, 450, 700, 1000];

/// XP per level once the base table is exhausted.
pub const EXTEND_STEP: u32 = 350;

/// Where a cumulative XP total sits on the level ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: u32,
    pub xp_to_next_level: u32,
    /// Cumulative XP at which the current level began.
    pub current_floor: u32,
    /// Cumulative XP at which the next level begins.
    pub next_threshold: u32,
}

impl LevelProgress {
    /// XP span of the current level.
    pub fn span(&self) -> u32 {
        self.next_threshold - self.current_floor
    }

    /// 0.0 ..= 1.0 progress within the current level.
    pub fn ratio(&self) -> f64 {
        let span = self.span();
        if span == 0 {
            return 0.0;
        }
        (self.xp_into_level as f64 / span as f64).clamp(0.0, 1.0)
    }
}

/// Map a cumulative XP total to its level.
pub fn progress(total_xp: u32) -> LevelProgress {
    let last_base = BASE_THRESHOLDS[BASE_THRESHOLDS.len() - 1];

    let (level, current_floor, next_threshold) = if total_xp < last_base {
        // First threshold above total_xp; index 0 is 0 so position is >= 1.
        let index = BASE_THRESHOLDS
            .iter()
            .position(|&t| total_xp < t)
            .unwrap_or(BASE_THRESHOLDS.len() - 1);
        (
            index as u32,
            BASE_THRESHOLDS[index - 1],
            BASE_THRESHOLDS[index],
        )
    } else {
        let steps = (total_xp - last_base) / EXTEND_STEP;
        let floor = last_base + steps * EXTEND_STEP;
        (
            BASE_THRESHOLDS.len() as u32 + steps,
            floor,
            floor.saturating_add(EXTEND_STEP),
        )
    };

    LevelProgress {
        level,
        xp_into_level: total_xp.saturating_sub(current_floor),
        xp_to_next_level: next_threshold.saturating_sub(total_xp),
        current_floor,
        next_threshold,
    }
}
