use clap::Args;
use motipet_core::ReadinessSimulator;

use super::print_json;

#[derive(Args)]
pub struct ReadingArgs {
    /// Scores to process in order; random mock scores when omitted
    #[arg(long = "score")]
    pub scores: Vec<f64>,
    /// Number of mock readings when no scores are given
    #[arg(long, default_value = "1")]
    pub count: usize,
    /// Seed for reproducible mock readings
    #[arg(long)]
    pub seed: Option<u64>,
    /// Force a level-up after the readings
    #[arg(long)]
    pub force_level_up: bool,
    /// Reason text for a forced level-up
    #[arg(long, requires = "force_level_up")]
    pub reason: Option<String>,
}

pub fn run(args: ReadingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = ReadinessSimulator::new(args.seed);
    let scores = if args.scores.is_empty() {
        (0..args.count).map(|_| sim.generate_mock_reading()).collect()
    } else {
        args.scores
    };

    let mut statuses: Vec<_> = scores.into_iter().map(|s| sim.process_reading(s)).collect();
    if args.force_level_up {
        statuses.push(sim.force_level_up(args.reason.as_deref()));
    }
    print_json(&statuses)
}
