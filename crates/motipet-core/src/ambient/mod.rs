//! Idle/ambient behavior: random waits, light idle clips and ground patrols.

mod patrol;
mod scheduler;

pub use patrol::{Facing, Patrol, PatrolBounds};
pub use scheduler::{
    AmbientBranch, AmbientEvent, AmbientScheduler, AmbientState, IDLE_ANIMATIONS,
    MIN_TICK_DELAY_MS, WALK_TAG,
};
