//! The pet scene: touch routing, ground geometry and the pet's clip.
//!
//! Composes the gesture classifier, the ambient scheduler and the animator.
//! Like its parts it is driven entirely by the caller's clock.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ambient::{AmbientEvent, AmbientScheduler, Facing, PatrolBounds, WALK_TAG};
use crate::events::{InteractionEvent, InteractionTarget};
use crate::geometry::{Point, Rect, Size};
use crate::gesture::{GestureClassifier, PointerId};
use crate::pet::{Accessory, PetAnimation, Reaction};
use crate::sprite::{AnimationLibrary, Animator, CurrentFrame, OnFinish, PlaybackEvent};
use crate::storage::{Config, SceneConfig};

/// Share of the shorter scene edge the unscaled pet occupies.
const PET_EDGE_RATIO: f64 = 0.75;

/// Everything a scene step can report, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum SceneEvent {
    Interaction(InteractionEvent),
    Ambient(AmbientEvent),
    Playback(PlaybackEvent),
}

#[derive(Debug, Clone)]
pub struct PetScene {
    config: SceneConfig,
    head_boundary_ratio: f64,
    size: Size,
    pet_size: Size,
    position: Point,
    base_animation: PetAnimation,
    accessories: Vec<Accessory>,
    classifier: GestureClassifier,
    ambient: AmbientScheduler,
    animator: Animator,
}

impl PetScene {
    /// Lay out the scene, show idle and start the ambient loop.
    pub fn new(config: &Config, library: AnimationLibrary, size: Size, now_ms: u64) -> Self {
        let mut scene = Self {
            config: config.scene.clone(),
            head_boundary_ratio: config.gesture.head_boundary_ratio,
            size,
            pet_size: Size::default(),
            position: Point::default(),
            base_animation: PetAnimation::Idle,
            accessories: Vec::new(),
            classifier: GestureClassifier::new(&config.gesture),
            ambient: AmbientScheduler::new(&config.ambient),
            animator: Animator::new(library),
        };
        scene.layout_pet();
        scene.animator.play_animation(PetAnimation::Idle, now_ms);
        scene.ambient.start(now_ms);
        scene
    }

    // ── Geometry ─────────────────────────────────────────────────────

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn frame(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    /// Ground rectangle in scene coordinates.
    pub fn ground_area(&self) -> Rect {
        self.config.ground.denormalize(self.frame())
    }

    pub fn pet_size(&self) -> Size {
        self.pet_size
    }

    /// Pet center at `now_ms`, following an in-flight patrol.
    pub fn pet_position(&self, now_ms: u64) -> Point {
        self.ambient
            .patrol_position(now_ms)
            .unwrap_or(self.position)
    }

    pub fn facing(&self) -> Facing {
        self.ambient.facing()
    }

    pub fn patrol_bounds(&self) -> PatrolBounds {
        let ground = self.ground_area();
        let half_width = self.pet_size.width / 2.0;
        PatrolBounds {
            min_x: ground.min_x() + half_width,
            max_x: ground.max_x() - half_width,
            baseline_y: self.baseline_y(),
            scene_width: self.size.width,
        }
    }

    /// The scene changed size: rescale the pet and put it back at the
    /// middle of the ground.
    pub fn resize(&mut self, size: Size, now_ms: u64) {
        self.ambient.cancel_patrol(now_ms);
        self.size = size;
        self.layout_pet();
        debug!(width = size.width, height = size.height, "scene resized");
    }

    /// Which part of the pet sits under `point`, if any.
    pub fn hit_test(&self, point: Point, now_ms: u64) -> Option<InteractionTarget> {
        let center = self.pet_position(now_ms);
        let local = Point::new(point.x - center.x, point.y - center.y);
        let half_w = self.pet_size.width / 2.0;
        let half_h = self.pet_size.height / 2.0;
        if local.x.abs() > half_w || local.y.abs() > half_h {
            return None;
        }
        if local.y >= self.pet_size.height * self.head_boundary_ratio {
            Some(InteractionTarget::Head)
        } else {
            Some(InteractionTarget::Body)
        }
    }

    // ── Touch ────────────────────────────────────────────────────────

    /// A pointer went down. Touches outside the pet only advance the clock.
    pub fn touch_began(&mut self, pointer: PointerId, point: Point, now_ms: u64) -> Vec<SceneEvent> {
        let Some(target) = self.hit_test(point, now_ms) else {
            return self.tick(now_ms);
        };
        let events = self.classifier.press(pointer, target, now_ms);
        let mut out = self.route(events, now_ms);
        out.extend(self.tick(now_ms));
        out
    }

    pub fn touch_ended(&mut self, pointer: PointerId, now_ms: u64) -> Vec<SceneEvent> {
        let events = self.classifier.release(pointer, now_ms);
        let mut out = self.route(events, now_ms);
        out.extend(self.tick(now_ms));
        out
    }

    pub fn touch_cancelled(&mut self, pointer: PointerId, now_ms: u64) -> Vec<SceneEvent> {
        let events = self.classifier.cancel(pointer, now_ms);
        let mut out = self.route(events, now_ms);
        out.extend(self.tick(now_ms));
        out
    }

    // ── Animation ────────────────────────────────────────────────────

    /// Settle into a new base animation.
    pub fn update_pet_animation(&mut self, animation: PetAnimation, now_ms: u64) {
        self.base_animation = animation;
        if !self.ambient.is_patrolling() {
            self.animator.play_animation(animation, now_ms);
        }
    }

    pub fn update_accessories(&mut self, accessories: &[Accessory]) {
        self.accessories = accessories.to_vec();
    }

    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    /// Play the clip a view-model picked for an interaction.
    pub fn apply_reaction(&mut self, reaction: &Reaction, now_ms: u64) {
        match reaction {
            Reaction::Play { tag, looped } => {
                let on_finish = if *looped {
                    OnFinish::Hold
                } else {
                    OnFinish::RestoreIdle
                };
                if let Some(AmbientEvent::PatrolInterrupted { at }) =
                    self.ambient.cancel_patrol(now_ms)
                {
                    self.position = at;
                }
                self.animator.play(tag, *looped, on_finish, now_ms);
            }
            Reaction::Restore { animation } => self.update_pet_animation(*animation, now_ms),
        }
    }

    pub fn current_frame(&self, now_ms: u64) -> CurrentFrame {
        self.animator.current_frame(now_ms)
    }

    pub fn current_tag(&self, now_ms: u64) -> Option<String> {
        self.animator.current_tag(now_ms)
    }

    pub fn ambient(&self) -> &AmbientScheduler {
        &self.ambient
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Earliest time at which `tick()` has something to do.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.classifier.next_deadline(),
            self.ambient.next_tick_at(),
            self.ambient.patrol().map(|p| p.arrives_at()),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Fire everything due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<SceneEvent> {
        let gestures = self.classifier.tick(now_ms);
        let mut out = self.route(gestures, now_ms);

        let bounds = self.patrol_bounds();
        let position = self.pet_position(now_ms);
        for event in self.ambient.tick(now_ms, &bounds, position) {
            self.apply_ambient(&event, now_ms);
            out.push(SceneEvent::Ambient(event));
        }

        if let Some(event) = self.animator.tick(now_ms) {
            out.push(SceneEvent::Playback(event));
        }
        out
    }

    fn route(&mut self, events: Vec<InteractionEvent>, now_ms: u64) -> Vec<SceneEvent> {
        let mut out = Vec::new();
        for event in events {
            if let Some(ambient) = self.ambient.on_interaction(&event, now_ms) {
                self.apply_ambient(&ambient, now_ms);
                out.push(SceneEvent::Ambient(ambient));
            }
            out.push(SceneEvent::Interaction(event));
        }
        out
    }

    fn apply_ambient(&mut self, event: &AmbientEvent, now_ms: u64) {
        match event {
            AmbientEvent::Waited => {}
            AmbientEvent::IdleAnimation { tags } => {
                self.animator
                    .play_sequence(tags.as_slice(), false, OnFinish::RestoreIdle, now_ms);
            }
            AmbientEvent::PatrolStarted { .. } => {
                self.animator.play(WALK_TAG, true, OnFinish::Hold, now_ms);
            }
            AmbientEvent::PatrolArrived { at } | AmbientEvent::PatrolInterrupted { at } => {
                self.position = *at;
                self.animator.play_animation(self.base_animation, now_ms);
            }
        }
    }

    fn baseline_y(&self) -> f64 {
        self.ground_area().min_y() + self.pet_size.height / 2.0
    }

    fn layout_pet(&mut self) {
        let edge = self.size.width.min(self.size.height) * PET_EDGE_RATIO;
        self.pet_size = Size::new(edge, edge).scaled(self.config.pet_scale);
        self.position = Point::new(self.ground_area().mid_x(), self.baseline_y());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SpriteConfig;

    fn scene() -> PetScene {
        let mut config = Config::default();
        config.ambient.seed = Some(4);
        let library = AnimationLibrary::degraded(&SpriteConfig::default());
        PetScene::new(&config, library, Size::new(400.0, 800.0), 0)
    }

    #[test]
    fn lays_out_pet_on_ground() {
        let s = scene();
        // min(400, 800) * 0.75 * 0.6
        assert!((s.pet_size().width - 180.0).abs() < 1e-9);
        let ground = s.ground_area();
        assert!((ground.min_y() - 40.0).abs() < 1e-9);
        let pos = s.pet_position(0);
        assert!((pos.x - 200.0).abs() < 1e-9);
        assert!((pos.y - 130.0).abs() < 1e-9);

        let b = s.patrol_bounds();
        assert!((b.min_x - 90.0).abs() < 1e-9);
        assert!((b.max_x - 310.0).abs() < 1e-9);
    }

    #[test]
    fn hit_test_splits_head_and_body() {
        let s = scene();
        // Center (200, 130), half size 90, head boundary at +18.
        assert_eq!(s.hit_test(Point::new(200.0, 200.0), 0), Some(InteractionTarget::Head));
        assert_eq!(s.hit_test(Point::new(200.0, 148.0), 0), Some(InteractionTarget::Head));
        assert_eq!(s.hit_test(Point::new(200.0, 147.0), 0), Some(InteractionTarget::Body));
        assert_eq!(s.hit_test(Point::new(120.0, 50.0), 0), Some(InteractionTarget::Body));
        assert_eq!(s.hit_test(Point::new(10.0, 130.0), 0), None);
        assert_eq!(s.hit_test(Point::new(200.0, 400.0), 0), None);
    }

    #[test]
    fn touches_outside_pet_are_ignored() {
        let mut s = scene();
        let events = s.touch_began(PointerId(1), Point::new(5.0, 700.0), 10);
        assert!(events.is_empty());
        assert!(s.touch_ended(PointerId(1), 20).is_empty());
        assert!(s.tick(1_000).is_empty());
    }

    #[test]
    fn long_press_pauses_ambient_until_release() {
        let mut s = scene();
        s.touch_began(PointerId(1), Point::new(200.0, 200.0), 1_000);
        let events = s.tick(1_350);
        assert_eq!(
            events,
            vec![SceneEvent::Interaction(InteractionEvent::LongPressBegan {
                target: InteractionTarget::Head
            })]
        );
        assert!(s.ambient().is_paused());
        assert!(s.tick(200_000).is_empty());

        let events = s.touch_ended(PointerId(1), 200_000);
        assert_eq!(
            events,
            vec![SceneEvent::Interaction(InteractionEvent::LongPressEnded {
                target: InteractionTarget::Head
            })]
        );
        assert_eq!(s.ambient().next_tick_at(), Some(230_000));
    }

    #[test]
    fn cancelled_long_press_resumes_ambient() {
        let mut s = scene();
        s.touch_began(PointerId(1), Point::new(200.0, 100.0), 1_000);
        s.tick(1_350);
        assert!(s.ambient().is_paused());
        assert!(s.tick(90_000).is_empty());

        let events = s.touch_cancelled(PointerId(1), 90_000);
        assert_eq!(
            events,
            vec![SceneEvent::Interaction(InteractionEvent::LongPressEnded {
                target: InteractionTarget::Body
            })]
        );
        assert!(!s.ambient().is_paused());
        assert_eq!(s.ambient().next_tick_at(), Some(120_000));
        assert_eq!(s.classifier().pending_taps(), 0);
    }

    #[test]
    fn final_tap_pushes_ambient_out() {
        let mut s = scene();
        s.touch_began(PointerId(1), Point::new(200.0, 100.0), 1_000);
        s.touch_ended(PointerId(1), 1_050);
        let events = s.tick(1_350);
        assert_eq!(
            events,
            vec![SceneEvent::Interaction(InteractionEvent::Tap {
                target: InteractionTarget::Body
            })]
        );
        assert_eq!(s.ambient().next_tick_at(), Some(31_350));
    }

    #[test]
    fn resize_recenters_pet() {
        let mut s = scene();
        s.resize(Size::new(1000.0, 500.0), 0);
        let pos = s.pet_position(0);
        assert!((pos.x - 500.0).abs() < 1e-9);
        // 500 * 0.05 + 500 * 0.75 * 0.6 / 2
        assert!((pos.y - 137.5).abs() < 1e-9);
    }

    #[test]
    fn accessories_are_tracked() {
        let mut s = scene();
        s.update_accessories(&[Accessory::Sunglasses]);
        assert_eq!(s.accessories(), &[Accessory::Sunglasses]);
    }
}
