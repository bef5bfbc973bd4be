//! Touch gesture classifier.
//!
//! Disambiguates tap, rapid-tap and long-press for the single active pointer.
//! Like the rest of the engine it owns no threads: the caller feeds pointer
//! transitions and calls `tick()` periodically so pending deadlines can fire.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed -> LongPressActive -> Idle      (held past the threshold)
//! Idle -> Armed -> Idle + tap run pending       (released early)
//! ```
//!
//! A pending tap run closes when no new tap lands within the multi-tap
//! window, emitting either `Tap` (one tap) or a final `RapidTap`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deadline::DeadlineSlot;
use crate::events::{InteractionEvent, InteractionTarget};
use crate::storage::GestureConfig;

/// Identifies a pointer (finger) across press/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Idle,
    Armed,
    LongPressActive,
}

#[derive(Debug, Clone, Copy)]
struct ActivePress {
    pointer: PointerId,
    target: InteractionTarget,
}

#[derive(Debug, Clone, Copy)]
struct TapRun {
    count: u32,
    target: InteractionTarget,
    first_ms: u64,
    last_ms: u64,
}

impl TapRun {
    fn duration_ms(&self) -> u64 {
        self.last_ms.saturating_sub(self.first_ms)
    }
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    long_press_threshold_ms: u64,
    multi_tap_window_ms: u64,
    active: Option<ActivePress>,
    long_press_active: bool,
    long_press_deadline: DeadlineSlot,
    tap_run: Option<TapRun>,
    dispatch_deadline: DeadlineSlot,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

impl GestureClassifier {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            long_press_threshold_ms: config.long_press_threshold_ms,
            multi_tap_window_ms: config.multi_tap_window_ms,
            active: None,
            long_press_active: false,
            long_press_deadline: DeadlineSlot::new(),
            tap_run: None,
            dispatch_deadline: DeadlineSlot::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> GestureState {
        match (self.active, self.long_press_active) {
            (None, _) => GestureState::Idle,
            (Some(_), false) => GestureState::Armed,
            (Some(_), true) => GestureState::LongPressActive,
        }
    }

    /// Taps accumulated in the run awaiting final dispatch.
    pub fn pending_taps(&self) -> u32 {
        self.tap_run.map(|r| r.count).unwrap_or(0)
    }

    /// Earliest time at which `tick()` has something to do.
    pub fn next_deadline(&self) -> Option<u64> {
        match (
            self.long_press_deadline.due_at(),
            self.dispatch_deadline.due_at(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// A pointer went down on the pet. Ignored while another pointer is active.
    /// Returns events from deadlines that came due before `now_ms`.
    pub fn press(
        &mut self,
        pointer: PointerId,
        target: InteractionTarget,
        now_ms: u64,
    ) -> Vec<InteractionEvent> {
        let events = self.tick(now_ms);
        if self.active.is_some() {
            return events;
        }
        self.active = Some(ActivePress { pointer, target });
        self.long_press_active = false;
        self.long_press_deadline
            .arm_after(now_ms, self.long_press_threshold_ms);
        debug!(?pointer, ?target, now_ms, "gesture armed");
        events
    }

    /// The active pointer lifted.
    pub fn release(&mut self, pointer: PointerId, now_ms: u64) -> Vec<InteractionEvent> {
        let mut events = self.tick(now_ms);
        let Some(press) = self.take_active(pointer) else {
            return events;
        };

        if self.long_press_active {
            self.long_press_active = false;
            self.reset_tap_run();
            events.push(InteractionEvent::LongPressEnded {
                target: press.target,
            });
            return events;
        }

        let run = self.tap_run.get_or_insert(TapRun {
            count: 0,
            target: press.target,
            first_ms: now_ms,
            last_ms: now_ms,
        });
        run.count += 1;
        run.last_ms = now_ms;
        let run = *run;

        if run.count > 1 {
            events.push(InteractionEvent::RapidTap {
                count: run.count,
                duration_ms: run.duration_ms(),
                is_final: false,
            });
        }
        self.dispatch_deadline
            .arm_after(now_ms, self.multi_tap_window_ms);
        events
    }

    /// The system interrupted the active pointer (incoming call, gesture stolen).
    /// Any pending tap run is dropped without being delivered.
    pub fn cancel(&mut self, pointer: PointerId, now_ms: u64) -> Vec<InteractionEvent> {
        let mut events = self.tick(now_ms);
        let Some(press) = self.take_active(pointer) else {
            return events;
        };
        if self.long_press_active {
            events.push(InteractionEvent::LongPressEnded {
                target: press.target,
            });
        }
        self.long_press_active = false;
        self.dispatch_deadline.cancel();
        self.reset_tap_run();
        events
    }

    /// Call periodically. Fires due deadlines in chronological order.
    pub fn tick(&mut self, now_ms: u64) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        loop {
            let long_press_due = self.long_press_deadline.due_at().filter(|&t| t <= now_ms);
            let dispatch_due = self.dispatch_deadline.due_at().filter(|&t| t <= now_ms);
            match (long_press_due, dispatch_due) {
                (Some(lp), Some(d)) if d < lp => self.fire_dispatch(now_ms, &mut events),
                (Some(_), _) => self.fire_long_press(now_ms, &mut events),
                (None, Some(_)) => self.fire_dispatch(now_ms, &mut events),
                (None, None) => break,
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn take_active(&mut self, pointer: PointerId) -> Option<ActivePress> {
        match self.active {
            Some(press) if press.pointer == pointer => {
                self.active = None;
                self.long_press_deadline.cancel();
                Some(press)
            }
            _ => None,
        }
    }

    fn fire_long_press(&mut self, now_ms: u64, events: &mut Vec<InteractionEvent>) {
        self.long_press_deadline.poll(now_ms);
        let Some(press) = self.active else {
            return;
        };
        self.long_press_active = true;
        // A long press supersedes any tap run still waiting for its window.
        self.dispatch_deadline.cancel();
        self.reset_tap_run();
        debug!(target = ?press.target, now_ms, "long press began");
        events.push(InteractionEvent::LongPressBegan {
            target: press.target,
        });
    }

    fn fire_dispatch(&mut self, now_ms: u64, events: &mut Vec<InteractionEvent>) {
        self.dispatch_deadline.poll(now_ms);
        let Some(run) = self.tap_run.take() else {
            return;
        };
        debug!(count = run.count, "tap run closed");
        match run.count {
            0 => {}
            1 => events.push(InteractionEvent::Tap { target: run.target }),
            count => events.push(InteractionEvent::RapidTap {
                count,
                duration_ms: run.duration_ms(),
                is_final: true,
            }),
        }
    }

    fn reset_tap_run(&mut self) {
        self.tap_run = None;
    }
}
