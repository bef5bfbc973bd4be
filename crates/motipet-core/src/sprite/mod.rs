//! Sprite-sheet metadata, clip cache and playback.

mod animator;
mod library;
mod sheet;

pub use animator::{Animator, CurrentFrame, OnFinish, PlaybackEvent};
pub use library::{AnimationClip, AnimationLibrary, TextureRegion};
pub use sheet::{
    FrameCollection, FrameData, FrameRect, FrameTag, Layer, NamedFrame, SheetMeta, SheetSize,
    SpriteSheet, TagDirection,
};
