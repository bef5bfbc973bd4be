//! Clip construction and caching.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

use super::sheet::SpriteSheet;
use crate::error::SpriteError;
use crate::storage::SpriteConfig;

/// Sub-rectangle of the sheet texture in 0..1 units, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureRegion {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl TextureRegion {
    /// The whole sheet, used when no clip can be built.
    pub const FULL: TextureRegion = TextureRegion {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Lower-cased tag name.
    pub tag: String,
    pub frames: Vec<TextureRegion>,
    pub time_per_frame_ms: u64,
}

impl AnimationClip {
    pub fn duration_ms(&self) -> u64 {
        self.time_per_frame_ms * self.frames.len() as u64
    }
}

/// Builds clips from sheet metadata on first use and caches them by
/// lower-cased tag. Without a usable sheet every lookup misses and the
/// renderer falls back to the static texture.
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    sheet: Option<SpriteSheet>,
    cache: HashMap<String, AnimationClip>,
    overrides: BTreeMap<String, f64>,
    min_frame_ms: u64,
}

impl AnimationLibrary {
    pub fn new(sheet: SpriteSheet, config: &SpriteConfig) -> Self {
        Self {
            sheet: Some(sheet),
            cache: HashMap::new(),
            overrides: config
                .frame_overrides
                .iter()
                .map(|(k, v)| (k.to_lowercase(), *v))
                .collect(),
            min_frame_ms: config.min_frame_ms,
        }
    }

    /// A library with no sheet: every clip lookup misses.
    pub fn degraded(config: &SpriteConfig) -> Self {
        Self {
            sheet: None,
            cache: HashMap::new(),
            overrides: BTreeMap::new(),
            min_frame_ms: config.min_frame_ms,
        }
    }

    /// Parse `json`, degrading to the static texture on malformed data.
    pub fn from_json_or_static(json: &str, config: &SpriteConfig) -> Self {
        match SpriteSheet::from_json(json) {
            Ok(sheet) => Self::new(sheet, config),
            Err(e) => {
                warn!(error = %e, "sprite sheet unusable, using static texture");
                Self::degraded(config)
            }
        }
    }

    /// Load from disk, degrading to the static texture on any failure.
    pub fn load_or_static(path: &Path, config: &SpriteConfig) -> Self {
        match SpriteSheet::from_path(path) {
            Ok(sheet) => Self::new(sheet, config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "sprite sheet unusable, using static texture");
                Self::degraded(config)
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.sheet.is_none()
    }

    pub fn sheet(&self) -> Option<&SpriteSheet> {
        self.sheet.as_ref()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Look up (building on first use) the clip for `tag`, ignoring case.
    pub fn clip(&mut self, tag: &str) -> Option<&AnimationClip> {
        self.try_clip(tag).ok()
    }

    /// Like [`clip`](Self::clip) but reports why a lookup missed.
    pub fn try_clip(&mut self, tag: &str) -> Result<&AnimationClip, SpriteError> {
        let key = tag.to_lowercase();
        if !self.cache.contains_key(&key) {
            let clip = self.build_clip(&key)?;
            debug!(tag = %key, frames = clip.frames.len(), "clip cached");
            self.cache.insert(key.clone(), clip);
        }
        self.cache
            .get(&key)
            .ok_or_else(|| SpriteError::UnknownTag(key))
    }

    fn build_clip(&self, key: &str) -> Result<AnimationClip, SpriteError> {
        let sheet = self
            .sheet
            .as_ref()
            .ok_or_else(|| SpriteError::UnknownTag(key.to_string()))?;
        let tag = sheet
            .find_tag(key)
            .ok_or_else(|| SpriteError::UnknownTag(key.to_string()))?;

        let ordered = sheet.ordered_frames();
        let sheet_w = sheet.meta.size.w as f64;
        let sheet_h = sheet.meta.size.h as f64;

        let mut frames = Vec::new();
        let mut durations_ms = Vec::new();
        for index in tag.playback_indices(ordered.len()) {
            let Some(entry) = ordered.get(index) else {
                continue;
            };
            let f = entry.frame;
            frames.push(TextureRegion {
                x: f.x as f64 / sheet_w,
                // Sheet rows count from the top; regions from the bottom.
                y: (sheet_h - f.y as f64 - f.h as f64) / sheet_h,
                w: f.w as f64 / sheet_w,
                h: f.h as f64 / sheet_h,
            });
            durations_ms.push((entry.duration as u64).max(self.min_frame_ms));
        }

        if frames.is_empty() {
            return Err(SpriteError::EmptyClip {
                tag: key.to_string(),
            });
        }

        let time_per_frame_ms = match self.overrides.get(key) {
            Some(secs) => (secs * 1000.0).round().max(1.0) as u64,
            None => {
                let total: u64 = durations_ms.iter().sum();
                (total as f64 / durations_ms.len() as f64).round() as u64
            }
        };

        Ok(AnimationClip {
            tag: key.to_string(),
            frames,
            time_per_frame_ms,
        })
    }
}
