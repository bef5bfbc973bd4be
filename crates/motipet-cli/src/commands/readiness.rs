use clap::Args;
use motipet_core::progression::{self, MAX_SCORE};
use serde_json::json;

use super::print_json;

#[derive(Args)]
pub struct ReadinessArgs {
    /// Readiness score (0-100)
    pub score: u32,
    /// Treat the reading as a level-up
    #[arg(long)]
    pub leveled_up: bool,
}

pub fn run(args: ReadinessArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.score > MAX_SCORE {
        return Err(format!("score must be between 0 and {MAX_SCORE}, got {}", args.score).into());
    }
    let happiness = progression::happiness(args.score, args.leveled_up);
    let state = progression::happiness_state(happiness);
    print_json(&json!({
        "readiness_score": args.score,
        "readiness_diagnosis": progression::diagnosis(args.score).label(),
        "pet_state": progression::mood(args.score),
        "state_reason": progression::reason(args.score),
        "happiness_score": happiness,
        "happiness_state": state,
        "happiness_label": state.display_name(),
    }))
}
