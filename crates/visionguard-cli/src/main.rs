use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod ipc;
mod platform;
#[cfg(test)]
mod testing;

#[derive(Parser)]
#[command(name = "visionguard", version, about = "20-20-20 eye-care break reminder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the break timer in the foreground
    Run {
        /// Launched by the OS login entry; obeys the startup mode
        #[arg(long)]
        startup: bool,
    },
    /// Print the current timer status
    Status,
    /// Follow status updates until interrupted
    Watch,
    /// End the current break early
    Skip,
    /// Start counting in a daemon that is waiting for confirmation
    Start,
    /// Stop the running daemon
    Quit,
    /// Settings management
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Screen time and break statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(match cli.command {
        Commands::Run { .. } => "info",
        _ => "warn",
    });

    let result = match cli.command {
        Commands::Run { startup } => commands::daemon::run(startup),
        Commands::Status => commands::control::status(),
        Commands::Watch => commands::control::watch(),
        Commands::Skip => commands::control::skip(),
        Commands::Start => commands::control::start(),
        Commands::Quit => commands::control::quit(),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "visionguard", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
