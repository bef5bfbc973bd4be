//! # MotiPet Core Library
//!
//! Engine for a virtual cat that reacts to touch and levels up from daily
//! readiness scores. The `motipet-cli` binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Gesture classifier**: tap, rapid-tap and long-press from raw pointer
//!   transitions
//! - **Ambient scheduler**: randomized waits, idle clips and ground patrols
//! - **Sprite animator**: Aseprite frame-tag playback with a static fallback
//! - **Progression**: level, mood and happiness arithmetic
//! - **Pet**: status, mock readiness service and view-models
//! - **API**: the daily-state backend client
//!
//! Every time-based component is a caller-ticked state machine: pass a
//! monotonic `now_ms` and call `tick()` periodically. Nothing spawns threads.
//!
//! ## Key Components
//!
//! - [`PetScene`]: touch routing and pet layout
//! - [`GameViewModel`]: status, forced-happy and level-up timers
//! - [`ReadinessSimulator`]: local stand-in for the backend
//! - [`Config`]: tuning loaded from TOML

pub mod ambient;
pub mod api;
pub mod deadline;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod pet;
pub mod progression;
pub mod scene;
pub mod sprite;
pub mod storage;

pub use ambient::{AmbientEvent, AmbientScheduler, Facing};
pub use api::{ApiClient, DailyStateRequest, DailyStateResponse, DailyStateSource};
pub use error::{ApiError, ConfigError, CoreError, SpriteError, ValidationError};
pub use events::{InteractionEvent, InteractionTarget};
pub use geometry::{Point, Rect, Size};
pub use gesture::{GestureClassifier, GestureState, PointerId};
pub use pet::{
    Accessory, CompanionSession, FetchOutcome, GameViewModel, PetAnimation, PetStatus, Reaction,
    ReadinessSimulator,
};
pub use progression::{HappinessState, LevelProgress, PetMood, ReadinessDiagnosis};
pub use scene::{PetScene, SceneEvent};
pub use sprite::{AnimationLibrary, Animator, SpriteSheet};
pub use storage::Config;
