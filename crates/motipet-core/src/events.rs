use serde::{Deserialize, Serialize};

/// Which half of the pet a touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionTarget {
    Head,
    Body,
}

/// Every classified touch produces an InteractionEvent.
/// The view-model consumes each one exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    Tap {
        target: InteractionTarget,
    },
    LongPressBegan {
        target: InteractionTarget,
    },
    LongPressEnded {
        target: InteractionTarget,
    },
    /// A run of taps. Intermediate previews carry `is_final: false`; the run
    /// closes with exactly one `is_final: true` event.
    RapidTap {
        count: u32,
        /// Time between the first and the latest tap of the run.
        duration_ms: u64,
        is_final: bool,
    },
}

impl InteractionEvent {
    /// True for events that end an interaction (final taps and long-press release).
    pub fn is_terminal(&self) -> bool {
        match self {
            InteractionEvent::Tap { .. } | InteractionEvent::LongPressEnded { .. } => true,
            InteractionEvent::RapidTap { is_final, .. } => *is_final,
            InteractionEvent::LongPressBegan { .. } => false,
        }
    }
}
