use clap::Args;
use motipet_core::{ApiClient, Config, GameViewModel, ReadinessSimulator};
use serde_json::json;
use tracing::debug;

use super::print_json;

#[derive(Args)]
pub struct SyncArgs {
    /// Override the configured backend base URL
    #[arg(long)]
    pub base_url: Option<String>,
    /// Seed for the mock reading sent to the backend
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: SyncArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(url) = args.base_url {
        config.api.base_url = Some(url);
    }
    let client = ApiClient::new(&config.api)?;

    let rt = tokio::runtime::Runtime::new()?;
    let mut vm = GameViewModel::new(ReadinessSimulator::new(args.seed));
    vm.initialize(0);
    let outcome = rt.block_on(vm.fetch_latest(&client, 0));
    debug!(?outcome, "sync finished");

    if let Some(banner) = vm.error_message() {
        eprintln!("{banner}");
    }
    print_json(&json!({
        "outcome": outcome,
        "status": vm.status(),
        "animation": vm.current_animation(),
        "show_level_up": vm.show_level_up(),
        "xp": vm.status().xp_display_text(),
    }))
}
