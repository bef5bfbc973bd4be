//! Game view-model: what the main screen shows and when it changes.
//!
//! Owns the simulator, the equipped accessories and two deadlines: the
//! revert from a forced happy animation back to the mood animation, and the
//! hiding of the level-up overlay.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::{Accessory, PetAnimation, PetStatus, ReadinessSimulator};
use crate::api::{DailyStateResponse, DailyStateSource};
use crate::deadline::DeadlineSlot;
use crate::error::ApiError;
use crate::events::{InteractionEvent, InteractionTarget};

/// Banner shown when the backend could not be reached.
pub const FALLBACK_BANNER: &str = "Could not reach the backend, using local mock data.";

/// Minimum time the level-up overlay stays up.
const LEVEL_UP_OVERLAY_MS: u64 = 3_000;

/// Rapid-tap runs of at least this many taps make the pet chase its tail.
const CHASE_TAIL_TAPS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The backend answered and its state was applied.
    Remote,
    /// The backend failed; a local reading was applied instead.
    Fallback { error: String },
}

/// Clip the scene should play in answer to an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reaction {
    Play { tag: String, looped: bool },
    /// Go back to the animation shown before the interaction.
    Restore { animation: PetAnimation },
}

impl Reaction {
    fn one_shot(tag: &str) -> Self {
        Reaction::Play {
            tag: tag.to_string(),
            looped: false,
        }
    }
}

/// State changes produced by [`GameViewModel::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewUpdate {
    AnimationChanged { animation: PetAnimation },
    LevelUpOverlayHidden,
}

#[derive(Debug, Clone)]
pub struct GameViewModel {
    status: PetStatus,
    current_animation: PetAnimation,
    base_animation: PetAnimation,
    show_level_up: bool,
    last_readiness_score: f64,
    is_loading: bool,
    error_message: Option<String>,
    simulator: ReadinessSimulator,
    accessories: BTreeSet<Accessory>,
    revert: DeadlineSlot,
    overlay: DeadlineSlot,
}

impl Default for GameViewModel {
    fn default() -> Self {
        Self::new(ReadinessSimulator::default())
    }
}

impl GameViewModel {
    pub fn new(simulator: ReadinessSimulator) -> Self {
        Self {
            status: PetStatus::default(),
            current_animation: PetAnimation::Idle,
            base_animation: PetAnimation::Idle,
            show_level_up: false,
            last_readiness_score: 80.0,
            is_loading: false,
            error_message: None,
            simulator,
            accessories: BTreeSet::new(),
            revert: DeadlineSlot::new(),
            overlay: DeadlineSlot::new(),
        }
    }

    pub fn status(&self) -> &PetStatus {
        &self.status
    }

    pub fn current_animation(&self) -> PetAnimation {
        self.current_animation
    }

    pub fn base_animation(&self) -> PetAnimation {
        self.base_animation
    }

    pub fn show_level_up(&self) -> bool {
        self.show_level_up
    }

    pub fn last_readiness_score(&self) -> f64 {
        self.last_readiness_score
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn simulator(&self) -> &ReadinessSimulator {
        &self.simulator
    }

    pub fn equipped_accessories(&self) -> Vec<Accessory> {
        self.accessories.iter().copied().collect()
    }

    /// Earliest pending deadline, for callers that sleep between ticks.
    pub fn next_deadline(&self) -> Option<u64> {
        [self.revert.due_at(), self.overlay.due_at()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Show the simulator's current state.
    pub fn initialize(&mut self, now_ms: u64) {
        let mut status = self.simulator.current_status().clone();
        status.merge_accessories(&self.equipped_accessories());
        self.apply_status(status, now_ms);
    }

    /// Generate a reading, ask `source` for the day's state and fall back to
    /// the local simulator if that fails.
    pub async fn fetch_latest<S: DailyStateSource>(
        &mut self,
        source: &S,
        now_ms: u64,
    ) -> FetchOutcome {
        self.is_loading = true;
        let score = self.simulator.generate_mock_reading();
        let result = source.fetch_daily_state(score).await;
        let outcome = self.apply_fetch_result(score, result, now_ms);
        self.is_loading = false;
        outcome
    }

    /// Apply the result of a daily-state request made for `score`.
    pub fn apply_fetch_result(
        &mut self,
        score: f64,
        result: Result<DailyStateResponse, ApiError>,
        now_ms: u64,
    ) -> FetchOutcome {
        let accessories = self.equipped_accessories();
        match result {
            Ok(resp) => {
                let mut status = self.status.clone();
                status.apply_api_response(&resp, &accessories);
                self.simulator.apply_external_status(status.clone());
                self.error_message = None;
                self.apply_status(status, now_ms);
                FetchOutcome::Remote
            }
            Err(e) => {
                warn!(error = %e, score, "daily state request failed, using mock reading");
                self.error_message = Some(format!("{FALLBACK_BANNER}\n{e}"));
                let mut status = self.simulator.process_reading(score);
                status.merge_accessories(&accessories);
                self.apply_status(status, now_ms);
                FetchOutcome::Fallback {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Process one local reading without touching the network.
    pub fn apply_reading(&mut self, score: f64, now_ms: u64) {
        let mut status = self.simulator.process_reading(score);
        status.merge_accessories(&self.equipped_accessories());
        self.apply_status(status, now_ms);
    }

    pub fn force_level_up(&mut self, reason: Option<&str>, now_ms: u64) {
        let mut status = self.simulator.force_level_up(reason);
        status.merge_accessories(&self.equipped_accessories());
        self.apply_status(status, now_ms);
    }

    /// Equip or remove `accessory`. Returns whether it is now equipped.
    pub fn toggle_accessory(&mut self, accessory: Accessory) -> bool {
        let equipped = if self.accessories.remove(&accessory) {
            false
        } else {
            self.accessories.insert(accessory);
            true
        };
        let list = self.equipped_accessories();
        self.status.merge_accessories(&list);
        equipped
    }

    /// Pick the clip answering an interaction, if any.
    pub fn handle_interaction(&self, event: &InteractionEvent) -> Option<Reaction> {
        match event {
            InteractionEvent::Tap {
                target: InteractionTarget::Head,
            } => Some(Reaction::one_shot("petjaw")),
            InteractionEvent::Tap {
                target: InteractionTarget::Body,
            } => Some(Reaction::one_shot("turn")),
            InteractionEvent::RapidTap {
                count,
                is_final: true,
                ..
            } => {
                if *count >= CHASE_TAIL_TAPS {
                    Some(Reaction::one_shot("chasetail"))
                } else {
                    Some(Reaction::one_shot("turn"))
                }
            }
            InteractionEvent::RapidTap { .. } => None,
            InteractionEvent::LongPressBegan { .. } => Some(Reaction::Play {
                tag: "petjaw".to_string(),
                looped: true,
            }),
            InteractionEvent::LongPressEnded { .. } => Some(Reaction::Restore {
                animation: self.current_animation,
            }),
        }
    }

    /// Fire due deadlines.
    pub fn tick(&mut self, now_ms: u64) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();
        if self.revert.poll(now_ms).is_some() {
            self.current_animation = self.base_animation;
            debug!(animation = ?self.base_animation, "forced happy ended");
            updates.push(ViewUpdate::AnimationChanged {
                animation: self.base_animation,
            });
        }
        if self.overlay.poll(now_ms).is_some() {
            self.show_level_up = false;
            updates.push(ViewUpdate::LevelUpOverlayHidden);
        }
        updates
    }

    fn apply_status(&mut self, status: PetStatus, now_ms: u64) {
        self.last_readiness_score = status.readiness_score as f64;
        self.update_animation(&status, now_ms);
        self.handle_level_up(&status, now_ms);
        self.status = status;
    }

    fn update_animation(&mut self, status: &PetStatus, now_ms: u64) {
        self.base_animation = PetAnimation::for_mood(status.pet_mood);
        if status.force_happy_seconds > 0 {
            self.current_animation = PetAnimation::Happy;
            self.revert
                .arm_after(now_ms, status.force_happy_seconds as u64 * 1000);
        } else {
            self.revert.cancel();
            self.current_animation = self.base_animation;
        }
        debug!(
            current = ?self.current_animation,
            base = ?self.base_animation,
            "animation selected"
        );
    }

    fn handle_level_up(&mut self, status: &PetStatus, now_ms: u64) {
        if !status.leveled_up {
            self.show_level_up = false;
            self.overlay.cancel();
            return;
        }
        self.show_level_up = true;
        let duration = LEVEL_UP_OVERLAY_MS.max(status.force_happy_seconds as u64 * 1000);
        self.overlay.arm_after(now_ms, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::PetMood;

    struct Offline;

    impl DailyStateSource for Offline {
        async fn fetch_daily_state(&self, _score: f64) -> Result<DailyStateResponse, ApiError> {
            Err(ApiError::BaseUrlNotConfigured)
        }
    }

    struct Canned(DailyStateResponse);

    impl DailyStateSource for Canned {
        async fn fetch_daily_state(&self, _score: f64) -> Result<DailyStateResponse, ApiError> {
            Ok(self.0.clone())
        }
    }

    fn response(pet_state: &str, leveled_up: bool, force_happy_seconds: i64) -> DailyStateResponse {
        DailyStateResponse {
            pet_state: pet_state.into(),
            state_reason: "from server".into(),
            xp_gain_base: 20,
            xp_gain_bonus: 0,
            xp_gain_total: 20,
            readiness_score: 64,
            readiness_diagnosis: "Stable".into(),
            happiness_score: 64,
            happiness_state: "content".into(),
            level: 3,
            leveled_up,
            total_xp: 300,
            xp_into_level: 50,
            xp_to_next_level: 150,
            level_progress_ratio: 0.25,
            force_happy_seconds,
        }
    }

    fn vm() -> GameViewModel {
        let mut vm = GameViewModel::new(ReadinessSimulator::new(Some(3)));
        vm.initialize(0);
        vm
    }

    #[test]
    fn initialize_shows_default_status() {
        let vm = vm();
        assert_eq!(vm.status().level, 1);
        assert_eq!(vm.current_animation(), PetAnimation::Idle);
        assert_eq!(vm.last_readiness_score(), 75.0);
        assert!(!vm.show_level_up());
        assert!(vm.next_deadline().is_none());
    }

    #[tokio::test]
    async fn offline_fetch_falls_back_with_banner() {
        let mut vm = vm();
        let outcome = vm.fetch_latest(&Offline, 1_000).await;
        assert!(matches!(outcome, FetchOutcome::Fallback { .. }));
        assert!(!vm.is_loading());
        let banner = vm.error_message().unwrap();
        assert!(banner.starts_with(FALLBACK_BANNER));
        assert!(vm.status().total_xp >= 10);
        assert!((70.0..=95.0).contains(&vm.last_readiness_score()));
    }

    #[tokio::test]
    async fn remote_fetch_applies_response_and_clears_banner() {
        let mut vm = vm();
        vm.fetch_latest(&Offline, 0).await;
        vm.toggle_accessory(Accessory::Sunglasses);
        let outcome = vm
            .fetch_latest(&Canned(response("tired", false, 0)), 10)
            .await;
        assert_eq!(outcome, FetchOutcome::Remote);
        assert!(vm.error_message().is_none());
        assert_eq!(vm.status().level, 3);
        assert_eq!(vm.status().pet_mood, PetMood::Tired);
        assert_eq!(vm.status().accessories, vec![Accessory::Sunglasses]);
        assert_eq!(vm.current_animation(), PetAnimation::Tired);
        assert_eq!(vm.simulator().total_xp(), 300);
    }

    #[test]
    fn forced_happy_reverts_to_mood_animation() {
        let mut vm = vm();
        vm.apply_fetch_result(80.0, Ok(response("tired", false, 4)), 1_000);
        assert_eq!(vm.current_animation(), PetAnimation::Happy);
        assert_eq!(vm.base_animation(), PetAnimation::Tired);
        assert!(vm.tick(4_999).is_empty());
        assert_eq!(
            vm.tick(5_000),
            vec![ViewUpdate::AnimationChanged {
                animation: PetAnimation::Tired
            }]
        );
        assert_eq!(vm.current_animation(), PetAnimation::Tired);
    }

    #[test]
    fn new_status_without_force_cancels_revert() {
        let mut vm = vm();
        vm.apply_fetch_result(80.0, Ok(response("normal", false, 4)), 0);
        vm.apply_fetch_result(80.0, Ok(response("tired", false, 0)), 1_000);
        assert_eq!(vm.current_animation(), PetAnimation::Tired);
        assert!(vm.tick(10_000).is_empty());
    }

    #[test]
    fn level_up_overlay_lasts_at_least_three_seconds() {
        let mut vm = vm();
        vm.force_level_up(None, 2_000);
        assert!(vm.show_level_up());
        assert_eq!(vm.current_animation(), PetAnimation::Happy);
        let updates = vm.tick(5_000);
        assert!(updates.contains(&ViewUpdate::LevelUpOverlayHidden));
        assert!(!vm.show_level_up());
    }

    #[test]
    fn long_force_happy_extends_overlay() {
        let mut vm = vm();
        vm.apply_fetch_result(90.0, Ok(response("energetic", true, 6)), 0);
        assert!(vm.tick(3_000).is_empty());
        assert!(vm.show_level_up());
        assert_eq!(vm.tick(6_000).len(), 2);
    }

    #[test]
    fn status_without_level_up_hides_overlay() {
        let mut vm = vm();
        vm.force_level_up(None, 0);
        vm.apply_reading(62.0, 500);
        assert!(!vm.show_level_up());
        assert_eq!(vm.next_deadline(), None);
    }

    #[test]
    fn accessories_toggle() {
        let mut vm = vm();
        assert!(vm.toggle_accessory(Accessory::Sunglasses));
        assert_eq!(vm.status().accessories, vec![Accessory::Sunglasses]);
        assert!(!vm.toggle_accessory(Accessory::Sunglasses));
        assert!(vm.status().accessories.is_empty());
    }

    #[test]
    fn interaction_reactions() {
        let vm = vm();
        let head = InteractionEvent::Tap {
            target: InteractionTarget::Head,
        };
        let body = InteractionEvent::Tap {
            target: InteractionTarget::Body,
        };
        assert_eq!(vm.handle_interaction(&head), Some(Reaction::one_shot("petjaw")));
        assert_eq!(vm.handle_interaction(&body), Some(Reaction::one_shot("turn")));

        let rapid = |count, is_final| InteractionEvent::RapidTap {
            count,
            duration_ms: 400,
            is_final,
        };
        assert_eq!(vm.handle_interaction(&rapid(3, false)), None);
        assert_eq!(
            vm.handle_interaction(&rapid(3, true)),
            Some(Reaction::one_shot("chasetail"))
        );
        assert_eq!(
            vm.handle_interaction(&rapid(2, true)),
            Some(Reaction::one_shot("turn"))
        );

        let began = InteractionEvent::LongPressBegan {
            target: InteractionTarget::Head,
        };
        assert_eq!(
            vm.handle_interaction(&began),
            Some(Reaction::Play {
                tag: "petjaw".into(),
                looped: true
            })
        );
        let ended = InteractionEvent::LongPressEnded {
            target: InteractionTarget::Head,
        };
        assert_eq!(
            vm.handle_interaction(&ended),
            Some(Reaction::Restore {
                animation: PetAnimation::Idle
            })
        );
    }
}
