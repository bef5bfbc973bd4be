//! Pure level and mood arithmetic.

pub mod level;
pub mod readiness;

pub use level::{progress, LevelProgress, BASE_THRESHOLDS, EXTEND_STEP};
pub use readiness::{
    diagnosis, happiness, happiness_state, mood, reason, HappinessState, PetMood,
    ReadinessDiagnosis, MAX_SCORE,
};
