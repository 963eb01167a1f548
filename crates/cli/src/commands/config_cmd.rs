//! `mnemos config` — Configuration management commands.

use clap::Subcommand;
use mnemos_config::AppConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (API key omitted)
    Show,

    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file path
    Path,

    /// Check the configuration and report problems
    Validate,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => show(),
        ConfigAction::Init { force } => init(force),
        ConfigAction::Path => {
            println!("{}", AppConfig::config_path().display());
            Ok(())
        }
        ConfigAction::Validate => validate(),
    }
}

fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    config.api_key = None;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn init(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        println!("  Config already exists at: {}", path.display());
        println!("  Edit it manually or re-run with --force.");
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("  Created {}", path.display());
    println!();
    println!("  Next steps:");
    println!("    1. Add your API key to the file, or export MNEMOS_API_KEY");
    println!("    2. Run: mnemos chat");
    Ok(())
}

fn validate() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("  Config error: {e}");
            return Err(e.into());
        }
    };
    println!("  Config parsed successfully");

    let mut warnings = Vec::new();
    if !config.has_api_key() {
        warnings.push("No API key set (set MNEMOS_API_KEY or OPENAI_API_KEY)".to_string());
    }
    if !mnemos_config::is_known_model(&config.model) {
        warnings.push(format!("Model '{}' is not in the catalogue", config.model));
    }
    if config.bots.is_empty() {
        warnings.push("No bot profiles; the agent starts with empty memory".to_string());
    }

    if warnings.is_empty() {
        println!("  All checks passed");
    } else {
        for w in &warnings {
            println!("  warning: {w}");
        }
    }

    println!();
    println!("  Model:     {}", config.model);
    println!("  API URL:   {}", config.api_url);
    println!("  Embedder:  {:?}", config.memory.embedder);
    println!("  Bots:      {}", config.bots.profiles.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn config_path_is_valid() {
        let path = mnemos_config::AppConfig::config_path();
        assert!(path.to_str().unwrap().ends_with("config.toml"));
    }
}
