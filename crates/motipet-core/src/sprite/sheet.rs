//! Aseprite sprite-sheet metadata.
//!
//! Both export layouts are accepted: `frames` as an object keyed by frame
//! name ("hash") or as an array of entries carrying a `filename` ("array").

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SpriteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SheetSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData {
    pub frame: FrameRect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    #[serde(default)]
    pub sprite_source_size: Option<FrameRect>,
    #[serde(default)]
    pub source_size: Option<SheetSize>,
    /// Frame duration in milliseconds.
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedFrame {
    pub filename: String,
    #[serde(flatten)]
    pub data: FrameData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameCollection {
    Hash(BTreeMap<String, FrameData>),
    Array(Vec<NamedFrame>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagDirection {
    #[default]
    Forward,
    Reverse,
    Pingpong,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameTag {
    pub name: String,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub direction: TagDirection,
    #[serde(default)]
    pub color: Option<String>,
}

impl FrameTag {
    pub fn frame_count(&self) -> usize {
        self.to.saturating_add(1).saturating_sub(self.from)
    }

    /// Frame indices in playback order for this tag's direction, limited to
    /// the `available` frames the sheet actually has.
    pub fn playback_indices(&self, available: usize) -> Vec<usize> {
        let end = self.to.saturating_add(1).min(available);
        let forward: Vec<usize> = (self.from..end).collect();
        match self.direction {
            TagDirection::Forward | TagDirection::Unknown => forward,
            TagDirection::Reverse => forward.into_iter().rev().collect(),
            TagDirection::Pingpong => {
                let mut indices = forward.clone();
                if forward.len() > 2 {
                    indices.extend(forward[1..forward.len() - 1].iter().rev());
                }
                indices
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub opacity: Option<u32>,
    #[serde(default)]
    pub blend_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMeta {
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    pub size: SheetSize,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub frame_tags: Vec<FrameTag>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub slices: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub frames: FrameCollection,
    pub meta: SheetMeta,
}

impl SpriteSheet {
    pub fn from_json(json: &str) -> Result<Self, SpriteError> {
        let sheet: SpriteSheet = serde_json::from_str(json)?;
        if sheet.meta.size.w == 0 || sheet.meta.size.h == 0 {
            return Err(SpriteError::EmptySheet {
                w: sheet.meta.size.w,
                h: sheet.meta.size.h,
            });
        }
        Ok(sheet)
    }

    pub fn from_path(path: &Path) -> Result<Self, SpriteError> {
        let json = std::fs::read_to_string(path).map_err(|source| SpriteError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Frames in sheet order. Hash exports are ordered by the number that
    /// ends each frame name ("Cat 12.png" -> 12).
    pub fn ordered_frames(&self) -> Vec<&FrameData> {
        match &self.frames {
            FrameCollection::Array(frames) => frames.iter().map(|f| &f.data).collect(),
            FrameCollection::Hash(frames) => {
                let mut entries: Vec<(&String, &FrameData)> = frames.iter().collect();
                entries.sort_by_key(|(name, _)| frame_number(name));
                entries.into_iter().map(|(_, data)| data).collect()
            }
        }
    }

    pub fn frame_count(&self) -> usize {
        match &self.frames {
            FrameCollection::Array(frames) => frames.len(),
            FrameCollection::Hash(frames) => frames.len(),
        }
    }

    /// Case-insensitive tag lookup.
    pub fn find_tag(&self, name: &str) -> Option<&FrameTag> {
        let wanted = name.to_lowercase();
        self.meta
            .frame_tags
            .iter()
            .find(|t| t.name.to_lowercase() == wanted)
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.meta.frame_tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Trailing frame number of an Aseprite frame name; 0 when there is none.
fn frame_number(name: &str) -> u32 {
    let last = name.rsplit(' ').next().unwrap_or(name);
    let stem = last.split('.').next().unwrap_or(last);
    stem.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_SHEET: &str = r#"{
        "frames": {
            "Cat 10.png": { "frame": {"x": 0, "y": 32, "w": 32, "h": 32}, "duration": 100 },
            "Cat 2.png":  { "frame": {"x": 64, "y": 0, "w": 32, "h": 32}, "duration": 100 },
            "Cat 0.png":  { "frame": {"x": 0, "y": 0, "w": 32, "h": 32}, "duration": 100 },
            "Cat 1.png":  { "frame": {"x": 32, "y": 0, "w": 32, "h": 32}, "duration": 100 }
        },
        "meta": {
            "app": "https://www.aseprite.org/",
            "size": {"w": 128, "h": 64},
            "frameTags": [
                {"name": "Idle", "from": 0, "to": 1, "direction": "forward"},
                {"name": "wave", "from": 1, "to": 3, "direction": "pingpong"}
            ]
        }
    }"#;

    #[test]
    fn hash_frames_sort_numerically() {
        let sheet = SpriteSheet::from_json(HASH_SHEET).unwrap();
        let xs: Vec<u32> = sheet.ordered_frames().iter().map(|f| f.frame.x).collect();
        assert_eq!(xs, vec![0, 32, 64, 0]);
        assert_eq!(sheet.ordered_frames()[3].frame.y, 32);
    }

    #[test]
    fn tag_lookup_ignores_case() {
        let sheet = SpriteSheet::from_json(HASH_SHEET).unwrap();
        assert_eq!(sheet.find_tag("idle").unwrap().name, "Idle");
        assert_eq!(sheet.find_tag("WAVE").unwrap().frame_count(), 3);
        assert!(sheet.find_tag("jump").is_none());
    }

    #[test]
    fn array_export_keeps_order() {
        let json = r#"{
            "frames": [
                { "filename": "b", "frame": {"x": 16, "y": 0, "w": 16, "h": 16}, "duration": 80 },
                { "filename": "a", "frame": {"x": 0, "y": 0, "w": 16, "h": 16}, "duration": 80 }
            ],
            "meta": { "size": {"w": 32, "h": 16}, "frameTags": [] }
        }"#;
        let sheet = SpriteSheet::from_json(json).unwrap();
        let xs: Vec<u32> = sheet.ordered_frames().iter().map(|f| f.frame.x).collect();
        assert_eq!(xs, vec![16, 0]);
    }

    #[test]
    fn playback_directions() {
        let mut tag = FrameTag {
            name: "t".into(),
            from: 2,
            to: 5,
            direction: TagDirection::Forward,
            color: None,
        };
        assert_eq!(tag.playback_indices(8), vec![2, 3, 4, 5]);
        tag.direction = TagDirection::Reverse;
        assert_eq!(tag.playback_indices(8), vec![5, 4, 3, 2]);
        tag.direction = TagDirection::Pingpong;
        assert_eq!(tag.playback_indices(8), vec![2, 3, 4, 5, 4, 3]);
        assert_eq!(tag.playback_indices(4), vec![2, 3]);
    }

    #[test]
    fn huge_tag_range_is_bounded() {
        let tag = FrameTag {
            name: "t".into(),
            from: 0,
            to: usize::MAX,
            direction: TagDirection::Pingpong,
            color: None,
        };
        assert_eq!(tag.frame_count(), usize::MAX);
        assert_eq!(tag.playback_indices(1), vec![0]);
        assert!(tag.playback_indices(0).is_empty());
    }

    #[test]
    fn rejects_garbage_and_empty_size() {
        assert!(matches!(
            SpriteSheet::from_json("not json"),
            Err(SpriteError::Malformed(_))
        ));
        let empty = r#"{"frames": {}, "meta": {"size": {"w": 0, "h": 0}}}"#;
        assert!(matches!(
            SpriteSheet::from_json(empty),
            Err(SpriteError::EmptySheet { .. })
        ));
    }

    #[test]
    fn frame_numbers() {
        assert_eq!(frame_number("MotiPet_Cat 12.jpg"), 12);
        assert_eq!(frame_number("7.png"), 7);
        assert_eq!(frame_number("nonumber"), 0);
    }
}
