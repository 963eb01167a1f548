//! `mnemos bots` — Manage bot profiles.

use clap::Subcommand;
use mnemos_config::{AppConfig, BotBook, BotProfile};

#[derive(Subcommand)]
pub enum BotsAction {
    /// List profiles
    List,

    /// Print one profile (the selected one by default)
    Show { id: Option<String> },

    /// Create a profile
    Create {
        name: String,
        #[arg(long, default_value = "")]
        persona: String,
        #[arg(long, default_value = "")]
        human: String,
        /// Replace the built-in system preamble
        #[arg(long)]
        system_prompt: Option<String>,
    },

    /// Copy a profile
    #[command(name = "clone")]
    Duplicate { id: String },

    /// Edit a profile; omitted fields are kept
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        human: Option<String>,
        #[arg(long)]
        system_prompt: Option<String>,
    },

    /// Delete a profile
    Delete { id: String },

    /// Make a profile the one `chat` uses
    Select { id: String },
}

pub fn run(action: BotsAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = AppConfig::config_path();
    let mut config = AppConfig::load_from(&path)?;

    let changed = apply(&mut config.bots, action)?;
    if changed {
        config.save_to(&path)?;
    }
    Ok(())
}

/// Run one action against the book. Returns whether it changed.
fn apply(book: &mut BotBook, action: BotsAction) -> Result<bool, Box<dyn std::error::Error>> {
    match action {
        BotsAction::List => {
            if book.is_empty() {
                println!("  No bots yet. Create one with `mnemos bots create <name>`.");
            }
            let selected = book.selected().map(|b| b.id.clone());
            for bot in &book.profiles {
                let marker = if Some(&bot.id) == selected.as_ref() { "*" } else { " " };
                println!("  {marker} {:<24} {}", bot.id, bot.name);
            }
            Ok(false)
        }
        BotsAction::Show { id } => {
            let bot = match id {
                Some(id) => book
                    .get(&id)
                    .ok_or(mnemos_config::ConfigError::UnknownBot(id))?,
                None => book.selected().ok_or("No bots yet")?,
            };
            println!("{}", toml::to_string_pretty(bot)?);
            Ok(false)
        }
        BotsAction::Create {
            name,
            persona,
            human,
            system_prompt,
        } => {
            let mut profile = BotProfile::named(name).with_persona(persona).with_human(human);
            profile.system_prompt = system_prompt;
            let id = book.create(profile);
            println!("  Created {id}");
            Ok(true)
        }
        BotsAction::Duplicate { id } => {
            let copy = book.clone_bot(&id)?;
            println!("  Created {copy}");
            Ok(true)
        }
        BotsAction::Update {
            id,
            name,
            persona,
            human,
            system_prompt,
        } => {
            let mut profile = book
                .get(&id)
                .cloned()
                .ok_or_else(|| mnemos_config::ConfigError::UnknownBot(id.clone()))?;
            if let Some(name) = name {
                profile.name = name;
            }
            if let Some(persona) = persona {
                profile.persona = persona;
            }
            if let Some(human) = human {
                profile.human = human;
            }
            if let Some(prompt) = system_prompt {
                profile.system_prompt = Some(prompt).filter(|p| !p.is_empty());
            }
            book.update(&id, profile)?;
            println!("  Updated {id}");
            Ok(true)
        }
        BotsAction::Delete { id } => {
            let removed = book.delete(&id)?;
            println!("  Deleted {} ({})", removed.id, removed.name);
            Ok(true)
        }
        BotsAction::Select { id } => {
            book.select(&id)?;
            println!("  Selected {id}");
            Ok(true)
        }
    }
}
