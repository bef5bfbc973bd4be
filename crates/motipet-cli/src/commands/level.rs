use clap::Args;
use motipet_core::progression;
use serde_json::json;

use super::print_json;

#[derive(Args)]
pub struct LevelArgs {
    /// Cumulative XP
    pub total_xp: u32,
}

pub fn run(args: LevelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let p = progression::progress(args.total_xp);
    print_json(&json!({
        "total_xp": args.total_xp,
        "level": p.level,
        "xp_into_level": p.xp_into_level,
        "xp_to_next_level": p.xp_to_next_level,
        "current_floor": p.current_floor,
        "next_threshold": p.next_threshold,
        "level_progress_ratio": p.ratio(),
    }))
}
