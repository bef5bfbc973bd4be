//! Cancellable single-shot deadlines.
//!
//! Components never sleep or spawn threads. Each pending "timer" is a
//! [`DeadlineSlot`] the owner arms with an absolute time and polls from its
//! own `tick(now_ms)`. Re-arming replaces the previous deadline; every arm
//! bumps a generation token so a stale fire can be told apart from the
//! current one.

use serde::{Deserialize, Serialize};

/// Opaque token identifying one arming of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeadlineToken(u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Pending {
    at_ms: u64,
    token: DeadlineToken,
}

/// A slot holding at most one pending deadline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadlineSlot {
    pending: Option<Pending>,
    generation: u64,
}

impl DeadlineSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot to fire at `at_ms`, replacing any pending deadline.
    pub fn arm_at(&mut self, at_ms: u64) -> DeadlineToken {
        self.generation = self.generation.wrapping_add(1);
        let token = DeadlineToken(self.generation);
        self.pending = Some(Pending { at_ms, token });
        token
    }

    /// Arm the slot to fire `delay_ms` after `now_ms`.
    pub fn arm_after(&mut self, now_ms: u64, delay_ms: u64) -> DeadlineToken {
        self.arm_at(now_ms.saturating_add(delay_ms))
    }

    /// Drop the pending deadline. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.pending.map(|p| p.at_ms)
    }

    pub fn token(&self) -> Option<DeadlineToken> {
        self.pending.map(|p| p.token)
    }

    /// Fire the deadline if it is due. A fired slot is disarmed.
    pub fn poll(&mut self, now_ms: u64) -> Option<DeadlineToken> {
        match self.pending {
            Some(p) if now_ms >= p.at_ms => {
                self.pending = None;
                Some(p.token)
            }
            _ => None,
        }
    }
}
