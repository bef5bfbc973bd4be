//! Idle loop.
//!
//! One deadline at a time: when it fires, a weighted branch is picked and the
//! next deadline is drawn from the configured delay range. Pausing drops the
//! deadline and any patrol in flight; resuming arms a fixed delay.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patrol::{Facing, Patrol, PatrolBounds};
use crate::deadline::DeadlineSlot;
use crate::events::InteractionEvent;
use crate::geometry::Point;
use crate::storage::AmbientConfig;

/// Shortest delay the loop will ever arm.
pub const MIN_TICK_DELAY_MS: u64 = 100;

/// Light idle clips; each entry plays as one sequence.
pub const IDLE_ANIMATIONS: [&[&str]; 4] = [
    &["relax"],
    &["lookleft", "lookright"],
    &["grooming"],
    &["sleep"],
];

/// Clip looped while patrolling.
pub const WALK_TAG: &str = "walk";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientBranch {
    Wait,
    IdleAnimation,
    Patrol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AmbientEvent {
    /// The loop fired and chose to do nothing.
    Waited,
    /// Play these tags once, then return to idle.
    IdleAnimation { tags: Vec<String> },
    PatrolStarted {
        to: Point,
        facing: Facing,
        duration_ms: u64,
    },
    PatrolArrived { at: Point },
    /// A pause stopped the pet mid-walk.
    PatrolInterrupted { at: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct AmbientScheduler {
    config: AmbientConfig,
    rng: Mcg128Xsl64,
    next_tick: DeadlineSlot,
    state: AmbientState,
    patrol: Option<Patrol>,
    facing: Facing,
}

impl AmbientScheduler {
    pub fn new(config: &AmbientConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            config: config.clone(),
            rng,
            next_tick: DeadlineSlot::new(),
            state: AmbientState::Stopped,
            patrol: None,
            facing: Facing::default(),
        }
    }

    pub fn state(&self) -> AmbientState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == AmbientState::Paused
    }

    pub fn next_tick_at(&self) -> Option<u64> {
        self.next_tick.due_at()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_patrolling(&self) -> bool {
        self.patrol.is_some()
    }

    pub fn patrol(&self) -> Option<&Patrol> {
        self.patrol.as_ref()
    }

    /// Pet position while a patrol is in flight.
    pub fn patrol_position(&self, now_ms: u64) -> Option<Point> {
        self.patrol.map(|p| p.position_at(now_ms))
    }

    /// Start the loop with a random first delay.
    pub fn start(&mut self, now_ms: u64) {
        self.state = AmbientState::Running;
        let delay = self.random_delay();
        self.arm(now_ms, delay);
    }

    /// Stop firing. Returns where an interrupted patrol left the pet.
    pub fn pause(&mut self, now_ms: u64) -> Option<AmbientEvent> {
        self.state = AmbientState::Paused;
        self.next_tick.cancel();
        debug!(now_ms, "ambient paused");
        self.cancel_patrol(now_ms)
    }

    /// Stop an in-flight patrol where it currently is.
    pub fn cancel_patrol(&mut self, now_ms: u64) -> Option<AmbientEvent> {
        self.patrol
            .take()
            .map(|p| AmbientEvent::PatrolInterrupted {
                at: p.position_at(now_ms),
            })
    }

    /// Resume after the range's lower bound.
    pub fn resume(&mut self, now_ms: u64) {
        self.resume_after(now_ms, self.config.min_delay_ms);
    }

    pub fn resume_after(&mut self, now_ms: u64, delay_ms: u64) {
        self.state = AmbientState::Running;
        self.arm(now_ms, delay_ms);
    }

    /// Push the next tick out to the range's lower bound. No-op unless running.
    pub fn reschedule(&mut self, now_ms: u64) {
        if self.state == AmbientState::Running {
            self.arm(now_ms, self.config.min_delay_ms);
        }
    }

    /// Follow the gesture classifier: long presses pause the loop, their end
    /// resumes it, and finished tap runs push the next tick out.
    pub fn on_interaction(&mut self, event: &InteractionEvent, now_ms: u64) -> Option<AmbientEvent> {
        match event {
            InteractionEvent::LongPressBegan { .. } => self.pause(now_ms),
            InteractionEvent::LongPressEnded { .. } => {
                self.resume(now_ms);
                None
            }
            e if e.is_terminal() => {
                self.reschedule(now_ms);
                None
            }
            _ => None,
        }
    }

    /// Fire the pending tick and finish an arrived patrol.
    pub fn tick(&mut self, now_ms: u64, bounds: &PatrolBounds, position: Point) -> Vec<AmbientEvent> {
        let mut events = Vec::new();

        if let Some(p) = self.patrol.filter(|p| now_ms >= p.arrives_at()) {
            self.patrol = None;
            debug!(x = p.to.x, "patrol arrived");
            events.push(AmbientEvent::PatrolArrived { at: p.to });
        }

        if self.state != AmbientState::Running || self.next_tick.poll(now_ms).is_none() {
            return events;
        }

        let branch = if self.patrol.is_some() {
            AmbientBranch::Wait
        } else {
            self.pick_branch()
        };
        debug!(?branch, now_ms, "ambient tick");

        let fired = match branch {
            AmbientBranch::Wait => AmbientEvent::Waited,
            AmbientBranch::IdleAnimation => {
                let choice = IDLE_ANIMATIONS[self.rng.gen_range(0..IDLE_ANIMATIONS.len())];
                AmbientEvent::IdleAnimation {
                    tags: choice.iter().map(|t| t.to_string()).collect(),
                }
            }
            AmbientBranch::Patrol => self.start_patrol(now_ms, bounds, position),
        };
        events.push(fired);

        let delay = self.random_delay();
        self.arm(now_ms, delay);
        events
    }

    fn start_patrol(&mut self, now_ms: u64, bounds: &PatrolBounds, from: Point) -> AmbientEvent {
        let x = if bounds.is_sampleable() {
            self.rng.gen_range(bounds.min_x..=bounds.max_x)
        } else {
            bounds.clamp_x(from.x)
        };
        let to = Point::new(x, bounds.baseline_y);
        let speed = self.config.patrol_speed_ratio * bounds.scene_width / 1000.0;
        let duration_ms = if speed > 0.0 {
            (from.distance_to(to) / speed).round() as u64
        } else {
            0
        };
        if duration_ms == 0 {
            return AmbientEvent::Waited;
        }

        self.facing = Facing::toward(from, to, self.facing);
        self.patrol = Some(Patrol {
            from,
            to,
            started_ms: now_ms,
            duration_ms,
            facing: self.facing,
        });
        AmbientEvent::PatrolStarted {
            to,
            facing: self.facing,
            duration_ms,
        }
    }

    fn pick_branch(&mut self) -> AmbientBranch {
        let weights = [
            (AmbientBranch::Wait, self.config.wait_weight.max(0.0)),
            (AmbientBranch::IdleAnimation, self.config.idle_animation_weight.max(0.0)),
            (AmbientBranch::Patrol, self.config.patrol_weight.max(0.0)),
        ];
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return AmbientBranch::Wait;
        }
        let mut roll = self.rng.gen::<f64>() * total;
        for (branch, weight) in weights {
            if roll < weight {
                return branch;
            }
            roll -= weight;
        }
        AmbientBranch::Wait
    }

    fn random_delay(&mut self) -> u64 {
        let lo = self.config.min_delay_ms.min(self.config.max_delay_ms);
        let hi = self.config.min_delay_ms.max(self.config.max_delay_ms);
        self.rng.gen_range(lo..=hi)
    }

    fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        let delay_ms = delay_ms.max(MIN_TICK_DELAY_MS);
        self.next_tick.arm_after(now_ms, delay_ms);
        debug!(now_ms, delay_ms, "ambient tick armed");
    }
}
