//! mnemos CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive chat or single-message mode
//! - `bots`    — Manage bot profiles
//! - `config`  — Show, initialize or validate the configuration
//! - `models`  — List the model catalogue

use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(
    name = "mnemos",
    about = "mnemos — a chat agent with self-editing memory",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the selected bot
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Use this bot profile instead of the selected one
        #[arg(short, long)]
        bot: Option<String>,

        /// Show inner monologue and function calls
        #[arg(long)]
        inner: bool,

        /// Start without the boot sequence
        #[arg(long)]
        no_boot: bool,
    },

    /// Manage bot profiles
    Bots {
        #[command(subcommand)]
        action: commands::bots::BotsAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config_cmd::ConfigAction,
    },

    /// List known chat models
    Models {
        /// Ask the configured endpoint instead of the built-in catalogue
        #[arg(long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the transcript
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            message,
            bot,
            inner,
            no_boot,
        } => {
            commands::chat::run(commands::chat::ChatOptions {
                message,
                bot,
                inner,
                no_boot,
            })
            .await?
        }
        Commands::Bots { action } => commands::bots::run(action)?,
        Commands::Config { action } => commands::config_cmd::run(action)?,
        Commands::Models { remote } => commands::models::run(remote).await?,
    }

    Ok(())
}
