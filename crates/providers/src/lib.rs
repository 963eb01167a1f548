//! LLM provider implementations for mnemos.
//!
//! All providers implement the `mnemos_core::Provider` trait. The agent only
//! needs one: an endpoint that understands the `functions` dialect.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use mnemos_config::AppConfig;
use mnemos_core::error::ProviderError;
use mnemos_core::provider::Provider;
use std::sync::Arc;
use tracing::debug;

/// Build the provider described by the configuration.
///
/// Fails with `NotConfigured` when no API key is available from the file
/// or the environment.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::NotConfigured(
                "no API key; set api_key in config.toml or MNEMOS_API_KEY / OPENAI_API_KEY".into(),
            )
        })?;

    let name = provider_name(&config.api_url);
    debug!(provider = name, base_url = %config.api_url, "Building provider");
    Ok(Arc::new(OpenAiCompatProvider::new(
        name,
        &config.api_url,
        api_key,
    )))
}

/// "openai" for the hosted API, "custom" for anything else.
fn provider_name(api_url: &str) -> &'static str {
    if api_url.contains("api.openai.com") {
        "openai"
    } else {
        "custom"
    }
}
