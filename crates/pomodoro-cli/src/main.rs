use clap::{CommandFactory, Parser, Subcommand};
use pomodoro_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;
mod sink;

#[derive(Parser)]
#[command(name = "pomodoro", version, about = "Pomodoro timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer in the foreground
    Run(commands::run::RunArgs),
    /// One-shot timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Timer settings (durations, cadence, theme)
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Host configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Quote rotation
    Quote {
        #[command(subcommand)]
        action: commands::quote::QuoteAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_env("POMODORO_LOG").unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, &config),
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Quote { action } => commands::quote::run(action, &config),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomodoro", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
