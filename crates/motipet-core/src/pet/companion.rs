//! Watch-side session: local readings only, with the level-up overlay.

use super::{PetStatus, ReadinessSimulator};
use crate::deadline::DeadlineSlot;

const LEVEL_UP_OVERLAY_MS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct CompanionSession {
    status: PetStatus,
    last_readiness_score: f64,
    show_level_up: bool,
    simulator: ReadinessSimulator,
    overlay: DeadlineSlot,
}

impl Default for CompanionSession {
    fn default() -> Self {
        Self::new(ReadinessSimulator::default())
    }
}

impl CompanionSession {
    pub fn new(simulator: ReadinessSimulator) -> Self {
        Self {
            status: PetStatus::default(),
            last_readiness_score: 80.0,
            show_level_up: false,
            simulator,
            overlay: DeadlineSlot::new(),
        }
    }

    pub fn status(&self) -> &PetStatus {
        &self.status
    }

    pub fn last_readiness_score(&self) -> f64 {
        self.last_readiness_score
    }

    pub fn show_level_up(&self) -> bool {
        self.show_level_up
    }

    /// Take one mock measurement, rounded to a whole score.
    pub fn start_measurement(&mut self, now_ms: u64) -> &PetStatus {
        let score = self.simulator.generate_mock_reading().round();
        let status = self.simulator.process_reading(score);
        self.last_readiness_score = status.readiness_score as f64;
        if status.leveled_up {
            self.show_level_up = true;
            let duration = LEVEL_UP_OVERLAY_MS.max(status.force_happy_seconds as u64 * 1000);
            self.overlay.arm_after(now_ms, duration);
        } else {
            self.show_level_up = false;
            self.overlay.cancel();
        }
        self.status = status;
        &self.status
    }

    /// Returns true when the overlay was hidden by this tick.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.overlay.poll(now_ms).is_some() {
            self.show_level_up = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurements_use_whole_scores() {
        let mut session = CompanionSession::new(ReadinessSimulator::new(Some(11)));
        for i in 0..20 {
            let score = session.start_measurement(i * 1_000).readiness_score;
            assert!((70..=95).contains(&score));
            assert_eq!(session.last_readiness_score(), score as f64);
        }
        assert!(session.status().total_xp > 0);
        assert!(session.status().accessories.is_empty());
    }

    #[test]
    fn overlay_follows_level_ups() {
        let mut session = CompanionSession::new(ReadinessSimulator::new(Some(5)));
        let mut now = 0;
        // At least 10 XP per reading, so level 2 arrives within 10 readings.
        while !session.start_measurement(now).leveled_up {
            assert!(!session.show_level_up());
            now += 100;
        }
        assert!(session.show_level_up());
        assert!(!session.tick(now + 2_999));
        assert!(session.tick(now + 3_000));
        assert!(!session.show_level_up());
        assert!(!session.tick(now + 10_000));
    }
}
