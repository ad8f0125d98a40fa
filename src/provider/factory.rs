//! Provider Factory
//!
//! Builds the shared provider instance from configuration.

use super::{OpenAIProvider, Provider};
use crate::config::Config;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Create the provider used by every relay.
///
/// A missing API key does not fail here. The relays report it per request as
/// a configuration error so the server can still start and answer `/health`.
pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    let provider = OpenAIProvider::from_config(&config.provider)
        .context("Failed to create OpenAI HTTP client")?;

    if provider.has_credential() {
        tracing::info!("Using OpenAI-compatible API at: {}", config.provider.base_url);
    } else {
        tracing::warn!(
            "OpenAI API key not configured; chat, transcription and speech requests will fail"
        );
    }

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;

    #[test]
    fn test_create_provider_without_key() {
        let config = Config::default();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert!(!provider.has_credential());
    }

    #[test]
    fn test_create_provider_with_key() {
        let mut config = Config::default();
        config.provider.api_key = Some(SecretString::from("sk-test"));
        let provider = create_provider(&config).unwrap();
        assert!(provider.has_credential());
    }
}
