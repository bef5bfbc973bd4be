//! Frame-tag playback.
//!
//! The animator holds at most one playback. Starting a new one replaces the
//! current one, so callers never have to stop anything first. Playback is a
//! pure function of `now_ms - started_ms`; `tick()` only handles the
//! restore-to-idle hand-off once a one-shot has finished.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::library::{AnimationClip, AnimationLibrary, TextureRegion};
use crate::pet::PetAnimation;

/// What happens when a non-looping playback runs out of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnFinish {
    /// Switch to the looping idle clip.
    RestoreIdle,
    /// Keep showing the last frame.
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentFrame {
    pub tag: Option<String>,
    pub index: usize,
    pub region: TextureRegion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A one-shot or sequence ran out of frames.
    Finished { tag: String, at_ms: u64 },
}

#[derive(Debug, Clone)]
struct Playback {
    segments: Vec<AnimationClip>,
    started_ms: u64,
    loop_last: bool,
    on_finish: OnFinish,
    reported: bool,
}

impl Playback {
    fn total_ms(&self) -> u64 {
        self.segments.iter().map(|c| c.duration_ms()).sum()
    }

    fn finishes_at(&self) -> Option<u64> {
        if self.loop_last {
            None
        } else {
            Some(self.started_ms.saturating_add(self.total_ms()))
        }
    }

    fn last_tag(&self) -> String {
        self.segments
            .last()
            .map(|c| c.tag.clone())
            .unwrap_or_default()
    }

    fn frame_at(&self, now_ms: u64) -> Option<(&AnimationClip, usize)> {
        let mut elapsed = now_ms.saturating_sub(self.started_ms);
        let count = self.segments.len();
        for (i, clip) in self.segments.iter().enumerate() {
            let tpf = clip.time_per_frame_ms.max(1);
            let len = clip.frames.len() as u64;
            let is_last = i + 1 == count;
            if is_last && self.loop_last {
                return Some((clip, ((elapsed / tpf) % len) as usize));
            }
            let span = tpf * len;
            if elapsed < span {
                return Some((clip, (elapsed / tpf) as usize));
            }
            if is_last {
                return Some((clip, clip.frames.len() - 1));
            }
            elapsed -= span;
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    library: AnimationLibrary,
    playback: Option<Playback>,
}

impl Animator {
    pub fn new(library: AnimationLibrary) -> Self {
        Self {
            library,
            playback: None,
        }
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    /// Lower-cased tag currently on screen.
    pub fn current_tag(&self, now_ms: u64) -> Option<String> {
        let playback = self.playback.as_ref()?;
        playback.frame_at(now_ms).map(|(clip, _)| clip.tag.clone())
    }

    pub fn is_looping(&self) -> bool {
        self.playback.as_ref().map(|p| p.loop_last).unwrap_or(false)
    }

    /// Frame to draw at `now_ms`; the whole sheet when nothing is playing.
    pub fn current_frame(&self, now_ms: u64) -> CurrentFrame {
        match self
            .playback
            .as_ref()
            .and_then(|p| p.frame_at(now_ms))
        {
            Some((clip, index)) => CurrentFrame {
                tag: Some(clip.tag.clone()),
                index,
                region: clip.frames[index],
            },
            None => CurrentFrame {
                tag: None,
                index: 0,
                region: TextureRegion::FULL,
            },
        }
    }

    /// Play one tag. Unknown tags leave the current playback untouched.
    pub fn play(&mut self, tag: &str, looped: bool, on_finish: OnFinish, now_ms: u64) -> bool {
        self.play_sequence(&[tag], looped, on_finish, now_ms)
    }

    /// Play tags back to back, optionally looping the last one. Tags that do
    /// not resolve are skipped; returns false if none did.
    pub fn play_sequence<S: AsRef<str>>(
        &mut self,
        tags: &[S],
        loop_last: bool,
        on_finish: OnFinish,
        now_ms: u64,
    ) -> bool {
        let segments: Vec<AnimationClip> = tags
            .iter()
            .filter_map(|t| self.library.clip(t.as_ref()).cloned())
            .collect();
        if segments.is_empty() {
            return false;
        }
        debug!(
            tags = ?segments.iter().map(|c| c.tag.as_str()).collect::<Vec<_>>(),
            loop_last,
            now_ms,
            "playback started"
        );
        self.playback = Some(Playback {
            segments,
            started_ms: now_ms,
            loop_last,
            on_finish,
            reported: false,
        });
        true
    }

    /// Play a named pet animation with its own loop/restore policy.
    pub fn play_animation(&mut self, animation: PetAnimation, now_ms: u64) -> bool {
        let on_finish = if animation == PetAnimation::Idle {
            OnFinish::Hold
        } else {
            OnFinish::RestoreIdle
        };
        self.play(animation.tag(), animation.is_loop(), on_finish, now_ms)
    }

    /// Call periodically. Hands finished one-shots back to idle and reports
    /// each finished playback once.
    pub fn tick(&mut self, now_ms: u64) -> Option<PlaybackEvent> {
        let playback = self.playback.as_mut()?;
        if playback.reported {
            return None;
        }
        let finished_at = playback.finishes_at().filter(|&t| now_ms >= t)?;
        playback.reported = true;
        let tag = playback.last_tag();
        // Without an idle clip the finished playback keeps its last frame.
        if playback.on_finish == OnFinish::RestoreIdle {
            self.play_animation(PetAnimation::Idle, finished_at);
        }
        Some(PlaybackEvent::Finished {
            tag,
            at_ms: finished_at,
        })
    }
}
