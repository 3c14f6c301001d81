use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use tripguide_provider::ProviderConfig as ClientConfig;

pub const PROVIDERS_FILE: &str = "providers.toml";

/// Service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Embed,
    Llm,
}

/// Service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub base_url: String,
    /// Required for embed services; chat models are picked per session
    #[serde(default)]
    pub model: String,
    #[serde(flatten)]
    pub extra: HashMap<String, toml::Value>,
}

/// Provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    /// Empty means: read `<PROVIDER>_API_KEY` from the environment
    #[serde(default)]
    pub api_key: String,
    #[serde(flatten)]
    pub services: HashMap<String, ServiceConfig>,
}

/// All provider configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(flatten)]
    providers: HashMap<String, ProviderConfig>,
}

impl ProvidersConfig {
    /// Load providers.toml from the given config directory
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(PROVIDERS_FILE);

        if !config_path.exists() {
            anyhow::bail!(
                "Providers configuration not found at: {}\nRun 'tripguide init' to create it",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read providers config: {}", config_path.display())
        })?;

        let config: Self = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse providers config: {}",
                config_path.display()
            )
        })?;

        tracing::debug!("Loaded providers config from: {}", config_path.display());
        tracing::debug!(
            "Available providers: {:?}",
            config.providers.keys().collect::<Vec<_>>()
        );

        Ok(config)
    }

    /// Resolve a service reference (e.g. "groq.llm") of the expected type
    pub fn get_service(&self, reference: &str, expected: ServiceType) -> Result<ResolvedService> {
        self.get_service_with_env(reference, expected, |key| std::env::var(key).ok())
    }

    fn get_service_with_env(
        &self,
        reference: &str,
        expected: ServiceType,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedService> {
        let Some((provider_name, service_name)) = reference.split_once('.') else {
            anyhow::bail!(
                "Invalid service reference: '{}'. Expected format: 'provider.service' (e.g., 'groq.llm')",
                reference
            );
        };

        let provider = self
            .providers
            .get(provider_name)
            .with_context(|| format!("Provider '{}' not found in providers.toml", provider_name))?;

        let service = provider.services.get(service_name).with_context(|| {
            format!(
                "Service '{}' not found in provider '{}'",
                service_name, provider_name
            )
        })?;

        if service.service_type != expected {
            anyhow::bail!(
                "Service '{}' has type {:?}, expected {:?}",
                reference,
                service.service_type,
                expected
            );
        }

        let api_key = if provider.api_key.is_empty() {
            env(&api_key_env_var(provider_name)).unwrap_or_default()
        } else {
            provider.api_key.clone()
        };

        Ok(ResolvedService {
            provider_name: provider_name.to_string(),
            api_key,
            base_url: service.base_url.clone(),
            model: service.model.clone(),
            extra: service.extra.clone(),
        })
    }
}

/// Environment variable consulted when a provider has no api_key, e.g. `GROQ_API_KEY`
pub fn api_key_env_var(provider_name: &str) -> String {
    format!(
        "{}_API_KEY",
        provider_name.to_ascii_uppercase().replace('-', "_")
    )
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ResolvedService {
    pub provider_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub extra: HashMap<String, toml::Value>,
}

impl ResolvedService {
    /// Integer extra parameter
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.extra.get(key).and_then(|v| v.as_integer())
    }

    pub fn to_provider_config(&self) -> ClientConfig {
        ClientConfig {
            provider_name: self.provider_name.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            dimension: self
                .get_int("dimension")
                .and_then(|d| usize::try_from(d).ok()),
        }
    }
}

/// providers.toml written by `tripguide init`
pub const PROVIDERS_TEMPLATE: &str = r#"# Providers used by tripguide.
# An empty api_key is read from <PROVIDER>_API_KEY (e.g. GROQ_API_KEY).

[groq]
name = "Groq"
api_key = ""

  [groq.llm]
  type = "llm"
  base_url = "https://api.groq.com/openai/v1"

[ollama]
name = "Ollama (local)"
api_key = ""

  [ollama.embed]
  type = "embed"
  base_url = "http://localhost:11434/v1"
  model = "nomic-embed-text"
  dimension = 768

[openai]
name = "OpenAI"
api_key = ""

  [openai.embed]
  type = "embed"
  base_url = "https://api.openai.com/v1"
  model = "text-embedding-3-small"
  dimension = 1536
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_providers_config() {
        let toml_str = r#"
[groq]
name = "Groq"
api_key = "gsk_test"

  [groq.llm]
  type = "llm"
  base_url = "https://api.groq.com/openai/v1"

[ollama]
name = "Ollama"

  [ollama.embed]
  type = "embed"
  base_url = "http://localhost:11434/v1"
  model = "nomic-embed-text"
  dimension = 768
        "#;

        let config: ProvidersConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.providers.len(), 2);

        let llm = config
            .get_service_with_env("groq.llm", ServiceType::Llm, no_env)
            .unwrap();
        assert_eq!(llm.api_key, "gsk_test");
        assert_eq!(llm.provider_name, "groq");
        assert!(llm.model.is_empty());

        let embed = config
            .get_service_with_env("ollama.embed", ServiceType::Embed, no_env)
            .unwrap();
        assert_eq!(embed.model, "nomic-embed-text");
        assert_eq!(embed.get_int("dimension"), Some(768));
        assert_eq!(embed.to_provider_config().dimension, Some(768));
    }

    #[test]
    fn test_template_parses() {
        let config: ProvidersConfig = toml::from_str(PROVIDERS_TEMPLATE).unwrap();
        assert!(config
            .get_service_with_env("groq.llm", ServiceType::Llm, no_env)
            .is_ok());
        assert!(config
            .get_service_with_env("ollama.embed", ServiceType::Embed, no_env)
            .is_ok());
    }

    #[test]
    fn test_empty_api_key_falls_back_to_env() {
        let config: ProvidersConfig = toml::from_str(PROVIDERS_TEMPLATE).unwrap();
        let resolved = config
            .get_service_with_env("groq.llm", ServiceType::Llm, |key| {
                (key == "GROQ_API_KEY").then(|| "gsk_from_env".to_string())
            })
            .unwrap();
        assert_eq!(resolved.api_key, "gsk_from_env");
    }

    #[test]
    fn test_invalid_references() {
        let config: ProvidersConfig = toml::from_str(PROVIDERS_TEMPLATE).unwrap();

        assert!(config
            .get_service_with_env("groq", ServiceType::Llm, no_env)
            .is_err());
        assert!(config
            .get_service_with_env("missing.llm", ServiceType::Llm, no_env)
            .is_err());
        assert!(config
            .get_service_with_env("groq.embed", ServiceType::Embed, no_env)
            .is_err());
        // Wrong service type
        assert!(config
            .get_service_with_env("ollama.embed", ServiceType::Llm, no_env)
            .is_err());
    }

    #[test]
    fn test_api_key_env_var_name() {
        assert_eq!(api_key_env_var("groq"), "GROQ_API_KEY");
        assert_eq!(api_key_env_var("my-proxy"), "MY_PROXY_API_KEY");
    }
}
