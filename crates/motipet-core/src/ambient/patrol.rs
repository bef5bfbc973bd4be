use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Direction of travel from `from` to `to`; keeps `current` when there is no
    /// horizontal movement.
    pub fn toward(from: Point, to: Point, current: Facing) -> Facing {
        if to.x < from.x {
            Facing::Left
        } else if to.x > from.x {
            Facing::Right
        } else {
            current
        }
    }
}

/// Where a patrol may go: the ground rectangle shrunk by half the pet width,
/// at the pet's baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub baseline_y: f64,
    /// Scene width; patrol speed is a fraction of it per second.
    pub scene_width: f64,
}

impl PatrolBounds {
    /// Clamp `x` into the walkable span, or its middle when the pet is wider
    /// than the ground.
    /// True when `min_x..=max_x` is a finite, non-empty span.
    pub fn is_sampleable(&self) -> bool {
        self.min_x.is_finite() && self.max_x.is_finite() && self.min_x <= self.max_x
    }

    pub fn clamp_x(&self, x: f64) -> f64 {
        if self.min_x <= self.max_x {
            x.clamp(self.min_x, self.max_x)
        } else {
            let mid = (self.min_x + self.max_x) / 2.0;
            if mid.is_finite() {
                mid
            } else {
                x
            }
        }
    }
}

/// A linear move along the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub from: Point,
    pub to: Point,
    pub started_ms: u64,
    pub duration_ms: u64,
    pub facing: Facing,
}

impl Patrol {
    pub fn arrives_at(&self) -> u64 {
        self.started_ms.saturating_add(self.duration_ms)
    }

    pub fn position_at(&self, now_ms: u64) -> Point {
        if self.duration_ms == 0 {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms) as f64;
        self.from.lerp(self.to, elapsed / self.duration_ms as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_interpolates_and_clamps() {
        let p = Patrol {
            from: Point::new(0.0, 10.0),
            to: Point::new(100.0, 10.0),
            started_ms: 1_000,
            duration_ms: 2_000,
            facing: Facing::Right,
        };
        assert_eq!(p.position_at(0), Point::new(0.0, 10.0));
        assert_eq!(p.position_at(2_000), Point::new(50.0, 10.0));
        assert_eq!(p.position_at(9_000), Point::new(100.0, 10.0));
        assert_eq!(p.arrives_at(), 3_000);
    }

    #[test]
    fn facing_follows_travel() {
        let a = Point::new(10.0, 0.0);
        let b = Point::new(20.0, 0.0);
        assert_eq!(Facing::toward(a, b, Facing::Left), Facing::Right);
        assert_eq!(Facing::toward(b, a, Facing::Right), Facing::Left);
        assert_eq!(Facing::toward(a, a, Facing::Left), Facing::Left);
    }

    #[test]
    fn narrow_ground_centers() {
        let bounds = PatrolBounds {
            min_x: 60.0,
            max_x: 40.0,
            baseline_y: 0.0,
            scene_width: 100.0,
        };
        assert_eq!(bounds.clamp_x(0.0), 50.0);
        assert!(!bounds.is_sampleable());
    }

    #[test]
    fn nan_bounds_keep_position() {
        let bounds = PatrolBounds {
            min_x: f64::NAN,
            max_x: f64::NAN,
            baseline_y: 0.0,
            scene_width: 100.0,
        };
        assert!(!bounds.is_sampleable());
        assert_eq!(bounds.clamp_x(30.0), 30.0);
    }
}
