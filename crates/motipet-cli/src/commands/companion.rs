use clap::Args;
use motipet_core::{CompanionSession, ReadinessSimulator};
use serde_json::json;

use super::print_json;

#[derive(Args)]
pub struct CompanionArgs {
    /// Number of measurements
    #[arg(long, default_value = "1")]
    pub count: usize,
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Simulated gap between measurements.
const MEASUREMENT_GAP_MS: u64 = 60_000;

pub fn run(args: CompanionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = CompanionSession::new(ReadinessSimulator::new(args.seed));
    let mut out = Vec::with_capacity(args.count);
    for i in 0..args.count as u64 {
        let now = i * MEASUREMENT_GAP_MS;
        session.tick(now);
        let status = session.start_measurement(now).clone();
        out.push(json!({
            "at_ms": now,
            "readiness_score": session.last_readiness_score(),
            "show_level_up": session.show_level_up(),
            "status": status,
        }));
    }
    print_json(&out)
}
