//! `mnemos models` — List the model catalogue, or ask the endpoint.

use mnemos_config::{AppConfig, MODEL_CATALOGUE};

pub async fn run(remote: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let lines = if remote {
        let provider = mnemos_providers::build_from_config(&config)?;
        let models = provider.list_models().await?;
        if models.is_empty() {
            println!("  {} reported no models.", config.api_url);
            return Ok(());
        }
        remote_lines(&models, &config.model)
    } else {
        catalogue_lines(&config.model)
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn marker(id: &str, current: &str) -> &'static str {
    if id == current { "*" } else { " " }
}

fn catalogue_lines(current: &str) -> Vec<String> {
    let mut lines: Vec<String> = MODEL_CATALOGUE
        .iter()
        .map(|(id, label)| format!("  {} {id:<22} {label}", marker(id, current)))
        .collect();
    if !mnemos_config::is_known_model(current) {
        lines.push(format!("  * {current:<22} (custom)"));
    }
    lines
}

fn remote_lines(models: &[String], current: &str) -> Vec<String> {
    models
        .iter()
        .map(|id| {
            let label = mnemos_config::model_label(id).unwrap_or("");
            format!("  {} {id:<22} {label}", marker(id, current))
                .trim_end()
                .to_string()
        })
        .collect()
}
