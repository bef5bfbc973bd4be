//! Local stand-in for the daily-state backend.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use tracing::debug;

use super::PetStatus;
use crate::progression::{self, EXTEND_STEP, MAX_SCORE};

/// Lowest and highest mock readiness score.
pub const MOCK_SCORE_RANGE: (f64, f64) = (70.0, 95.0);

/// Seconds the happy animation is forced for after a level-up.
const LEVEL_UP_HAPPY_SECONDS: u32 = 3;
const LEVEL_UP_HAPPINESS: u32 = 92;

/// Turns readiness scores into pet state, keeping a running XP total.
#[derive(Debug, Clone)]
pub struct ReadinessSimulator {
    status: PetStatus,
    total_xp: u32,
    rng: Mcg128Xsl64,
}

impl Default for ReadinessSimulator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ReadinessSimulator {
    /// Create a simulator. `seed` makes mock readings reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            status: PetStatus::default(),
            total_xp: 0,
            rng,
        }
    }

    pub fn current_status(&self) -> &PetStatus {
        &self.status
    }

    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    pub fn generate_mock_reading(&mut self) -> f64 {
        self.rng.gen_range(MOCK_SCORE_RANGE.0..=MOCK_SCORE_RANGE.1)
    }

    /// Fold one reading into the running state and return the new status.
    pub fn process_reading(&mut self, readiness_score: f64) -> PetStatus {
        let clamped = readiness_score.clamp(0.0, MAX_SCORE as f64);
        let score = clamped as u32;
        let xp_gain = (clamped - 60.0).max(0.0) as u32;
        self.total_xp = self.total_xp.saturating_add(xp_gain);

        let previous_level = self.status.level;
        self.status.update_progress(self.total_xp);
        let leveled_up = self.status.level > previous_level;

        let s = &mut self.status;
        s.readiness_score = score;
        s.readiness_diagnosis = progression::diagnosis(score).label().to_string();
        s.pet_mood = progression::mood(score);
        s.state_reason = progression::reason(score).to_string();
        s.happiness_score = progression::happiness(score, leveled_up);
        s.happiness_state = progression::happiness_state(s.happiness_score);
        s.leveled_up = leveled_up;
        s.force_happy_seconds = if leveled_up {
            s.force_happy_seconds.max(LEVEL_UP_HAPPY_SECONDS)
        } else {
            0
        };

        debug!(
            score,
            xp_gain,
            total_xp = self.total_xp,
            level = s.level,
            leveled_up,
            "reading processed"
        );
        self.status.clone()
    }

    /// Grant exactly the XP needed to reach the next level.
    pub fn force_level_up(&mut self, reason: Option<&str>) -> PetStatus {
        let mut needed = progression::progress(self.total_xp).xp_to_next_level;
        if needed == 0 {
            needed = EXTEND_STEP;
        }
        self.total_xp = self.total_xp.saturating_add(needed);

        let s = &mut self.status;
        s.update_progress(self.total_xp);
        s.leveled_up = true;
        s.force_happy_seconds = s.force_happy_seconds.max(LEVEL_UP_HAPPY_SECONDS);
        if let Some(reason) = reason {
            s.state_reason = reason.to_string();
        }
        s.happiness_score = s.happiness_score.max(LEVEL_UP_HAPPINESS);
        s.happiness_state = progression::happiness_state(s.happiness_score);

        debug!(level = s.level, total_xp = self.total_xp, "level forced");
        self.status.clone()
    }

    /// Adopt a status computed elsewhere, including its XP total.
    pub fn apply_external_status(&mut self, status: PetStatus) {
        self.total_xp = status.total_xp;
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{HappinessState, PetMood};

    #[test]
    fn mock_readings_stay_in_range() {
        let mut sim = ReadinessSimulator::new(Some(7));
        for _ in 0..500 {
            let r = sim.generate_mock_reading();
            assert!((70.0..=95.0).contains(&r), "{r}");
        }
    }

    #[test]
    fn seeded_readings_repeat() {
        let mut a = ReadinessSimulator::new(Some(42));
        let mut b = ReadinessSimulator::new(Some(42));
        for _ in 0..10 {
            assert_eq!(a.generate_mock_reading(), b.generate_mock_reading());
        }
    }

    #[test]
    fn reading_accumulates_xp() {
        let mut sim = ReadinessSimulator::new(Some(1));
        let s = sim.process_reading(85.7);
        assert_eq!(s.readiness_score, 85);
        assert_eq!(s.total_xp, 25);
        assert_eq!(s.level, 1);
        assert!(!s.leveled_up);
        assert_eq!(s.readiness_diagnosis, "Charged");
        assert_eq!(s.force_happy_seconds, 0);
        assert_eq!(s.happiness_state, HappinessState::Happy);
    }

    #[test]
    fn low_score_gains_nothing() {
        let mut sim = ReadinessSimulator::new(Some(1));
        let s = sim.process_reading(42.0);
        assert_eq!(s.total_xp, 0);
        assert_eq!(s.pet_mood, PetMood::Tired);
        assert_eq!(s.happiness_score, 42);
        assert_eq!(s.happiness_state, HappinessState::Low);
    }

    #[test]
    fn out_of_range_scores_clamp() {
        let mut sim = ReadinessSimulator::new(Some(1));
        assert_eq!(sim.process_reading(250.0).readiness_score, 100);
        assert_eq!(sim.total_xp(), 40);
        assert_eq!(sim.process_reading(-3.0).readiness_score, 0);
        assert_eq!(sim.total_xp(), 40);
    }

    #[test]
    fn crossing_a_threshold_levels_up() {
        let mut sim = ReadinessSimulator::new(Some(1));
        for _ in 0..2 {
            sim.process_reading(95.0);
        }
        assert_eq!(sim.total_xp(), 70);
        let s = sim.process_reading(95.0);
        assert_eq!(s.total_xp, 105);
        assert_eq!(s.level, 2);
        assert!(s.leveled_up);
        assert_eq!(s.force_happy_seconds, 3);
        assert!(s.happiness_score >= 90);

        let s = sim.process_reading(80.0);
        assert!(!s.leveled_up);
        assert_eq!(s.force_happy_seconds, 0);
    }

    #[test]
    fn force_level_up_adds_remaining_xp() {
        let mut sim = ReadinessSimulator::new(Some(1));
        sim.process_reading(90.0);
        let s = sim.force_level_up(Some("Debug boost"));
        assert_eq!(s.level, 2);
        assert_eq!(s.total_xp, 100);
        assert_eq!(s.xp_into_level, 0);
        assert!(s.leveled_up);
        assert_eq!(s.force_happy_seconds, 3);
        assert_eq!(s.happiness_score, 92);
        assert_eq!(s.state_reason, "Debug boost");

        let s = sim.force_level_up(None);
        assert_eq!(s.level, 3);
        assert_eq!(s.total_xp, 250);
        assert_eq!(s.state_reason, "Debug boost");
    }

    #[test]
    fn external_status_replaces_xp_total() {
        let mut sim = ReadinessSimulator::new(Some(1));
        let mut status = PetStatus::default();
        status.update_progress(460);
        sim.apply_external_status(status.clone());
        assert_eq!(sim.total_xp(), 460);
        assert_eq!(sim.current_status(), &status);
        let s = sim.process_reading(70.0);
        assert_eq!(s.total_xp, 470);
    }
}
