use clap::Args;
use motipet_core::{AmbientEvent, Config, PetScene, SceneEvent, Size};
use serde::Serialize;

use super::{load_library, print_json};

#[derive(Args)]
pub struct AmbientArgs {
    /// Simulated time to run, in seconds
    #[arg(long, default_value = "600")]
    pub duration_secs: u64,
    /// Seed for a reproducible loop (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, default_value = "390")]
    pub width: f64,
    #[arg(long, default_value = "844")]
    pub height: f64,
}

#[derive(Serialize)]
struct Step {
    at_ms: u64,
    #[serde(flatten)]
    event: AmbientEvent,
    x: f64,
}

pub fn run(args: AmbientArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if args.seed.is_some() {
        config.ambient.seed = args.seed;
    }
    let mut scene = PetScene::new(
        &config,
        load_library(&config),
        Size::new(args.width, args.height),
        0,
    );

    let end_ms = args.duration_secs.saturating_mul(1000);
    let mut steps = Vec::new();
    while let Some(due) = scene.next_deadline().filter(|&d| d <= end_ms) {
        for event in scene.tick(due) {
            if let SceneEvent::Ambient(event) = event {
                steps.push(Step {
                    at_ms: due,
                    event,
                    x: scene.pet_position(due).x,
                });
            }
        }
    }
    print_json(&steps)
}
