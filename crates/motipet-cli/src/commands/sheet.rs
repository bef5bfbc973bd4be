use clap::Args;
use motipet_core::{AnimationLibrary, Config, SpriteSheet};
use serde_json::json;
use std::path::PathBuf;

use super::print_json;

#[derive(Args)]
pub struct SheetArgs {
    /// Aseprite JSON export; defaults to the configured sheet
    pub path: Option<PathBuf>,
    /// Print the clip built for this tag
    #[arg(long)]
    pub tag: Option<String>,
}

pub fn run(args: SheetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let path = match args.path {
        Some(p) => p,
        None => config
            .sprite
            .sheet_path
            .clone()
            .map(PathBuf::from)
            .ok_or("no sheet path given and sprite.sheet_path is not set")?,
    };

    let sheet = SpriteSheet::from_path(&path)?;
    let mut library = AnimationLibrary::new(sheet.clone(), &config.sprite);

    if let Some(tag) = args.tag {
        let clip = library.try_clip(&tag)?;
        return print_json(clip);
    }

    let mut tags = Vec::new();
    for tag in &sheet.meta.frame_tags {
        let (frames, time_per_frame_ms) = match library.clip(&tag.name) {
            Some(clip) => (clip.frames.len(), Some(clip.time_per_frame_ms)),
            None => (0, None),
        };
        tags.push(json!({
            "name": tag.name,
            "from": tag.from,
            "to": tag.to,
            "direction": tag.direction,
            "frames": frames,
            "time_per_frame_ms": time_per_frame_ms,
        }));
    }
    print_json(&json!({
        "path": path.display().to_string(),
        "size": sheet.meta.size,
        "frame_count": sheet.frame_count(),
        "tags": tags,
    }))
}
