//! `mnemos chat` — Interactive or single-message chat mode.

use mnemos_agent::{MemoryAgent, SharedAgent, TurnError};
use mnemos_config::{AppConfig, EmbedderKind};
use mnemos_core::error::ProviderError;
use mnemos_core::memory::Embedder;
use mnemos_core::provider::Provider;
use mnemos_memory::{FallbackEmbedder, HashEmbedder, ProviderEmbedder};
use mnemos_tools::SecondaryModel;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::terminal::TerminalSink;

pub struct ChatOptions {
    pub message: Option<String>,
    pub bot: Option<String>,
    pub inner: bool,
    pub no_boot: bool,
}

pub async fn run(options: ChatOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(bot) = &options.bot {
        config.bots.select(bot)?;
    }

    let provider = match mnemos_providers::build_from_config(&config) {
        Ok(provider) => provider,
        Err(ProviderError::NotConfigured(reason)) => {
            print_key_help();
            return Err(reason.into());
        }
        Err(e) => return Err(e.into()),
    };

    let bot_name = config
        .bots
        .selected()
        .map(|b| b.name.clone())
        .unwrap_or_else(|| "Assistant".into());

    let mut agent_config = config.agent_config();
    if options.no_boot {
        agent_config.boot_sequence = false;
    }

    let sink = Arc::new(TerminalSink::new(&bot_name, options.inner));
    let mut agent = MemoryAgent::new(agent_config, provider.clone(), sink)
        .with_embedder(build_embedder(&config, provider.clone()));
    if let Some(model) = &config.secondary_model {
        agent = agent.with_secondary(SecondaryModel {
            provider,
            model: model.clone(),
        });
    }
    let agent = SharedAgent::new(agent);

    if let Some(message) = options.message {
        // Single message mode
        return match agent.submit(&message).await {
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };
    }

    // Interactive mode
    println!();
    println!("  mnemos — chatting with {bot_name}");
    println!("  Model:   {}", config.model);
    println!("  Commands: /memory  /reset  /help  /quit");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "/quit" | "/exit" | "exit" | "quit" => break,
            "/help" => print_help(),
            "/memory" => {
                let agent = agent.lock().await;
                for block in agent.core_memory() {
                    println!("  <{}>", block.name);
                    for text in block.text.lines() {
                        println!("    {text}");
                    }
                    println!("  </{}>", block.name);
                }
                match agent.memory().archival_count().await {
                    Ok(count) => println!("  archival memory: {count} record(s)"),
                    Err(e) => eprintln!("  [error] {e}"),
                }
            }
            "/reset" => {
                agent.lock().await.clear_history();
                println!("  Conversation cleared. Core and archival memory are kept.");
            }
            _ => match agent.submit(line).await {
                Ok(_) | Err(TurnError::EmptyInput) => {}
                // The agent already printed a notice
                Err(e) if e.is_abandoned_turn() => tracing::debug!(error = %e, "Turn failed"),
                Err(e) => eprintln!("  [error] {e}"),
            },
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

fn build_embedder(config: &AppConfig, provider: Arc<dyn Provider>) -> Arc<dyn Embedder> {
    match config.memory.embedder {
        EmbedderKind::Provider => Arc::new(FallbackEmbedder::new(
            Arc::new(ProviderEmbedder::new(
                provider,
                config.embedding_model.as_str(),
            )),
            Arc::new(HashEmbedder::new(config.memory.hash_dimensions)),
        )),
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.memory.hash_dimensions)),
    }
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_help() {
    println!("  /memory  show the core memory blocks and the archival record count");
    println!("  /reset   start a new conversation (memory is kept)");
    println!("  /quit    leave");
}

fn print_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    MNEMOS_API_KEY = 'sk-...'");
    eprintln!("    OPENAI_API_KEY = 'sk-...'");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_path().display());
    eprintln!();
}
