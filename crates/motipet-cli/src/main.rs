use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "motipet-cli", version, about = "MotiPet CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Level progress for a cumulative XP total
    Level(commands::level::LevelArgs),
    /// Diagnosis, mood and happiness for a readiness score
    Readiness(commands::readiness::ReadinessArgs),
    /// Run readings through the local simulator
    Reading(commands::reading::ReadingArgs),
    /// Fetch the day's state from the backend, falling back to mock data
    Sync(commands::sync::SyncArgs),
    /// Simulate a touch gesture on the pet
    Touch(commands::touch::TouchArgs),
    /// Run the idle loop on a simulated clock
    Ambient(commands::ambient::AmbientArgs),
    /// Inspect a sprite-sheet export
    Sheet(commands::sheet::SheetArgs),
    /// Take measurements on the companion session
    Companion(commands::companion::CompanionArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Level(args) => commands::level::run(args),
        Commands::Readiness(args) => commands::readiness::run(args),
        Commands::Reading(args) => commands::reading::run(args),
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Touch(args) => commands::touch::run(args),
        Commands::Ambient(args) => commands::ambient::run(args),
        Commands::Sheet(args) => commands::sheet::run(args),
        Commands::Companion(args) => commands::companion::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
