use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::providers::{ProvidersConfig, ResolvedService, ServiceType};
use crate::llm::ChatModel;

pub const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = ".tripguide";

/// Configuration scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Auto,
    Local,
    Global,
}

/// Retrieval configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Chunks placed into the prompt (default: 2)
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Chunks per embedding request while building the index (default: 32)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_top_k() -> usize {
    2
}

fn default_batch_size() -> usize {
    32
}

/// Sampling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    900
}

/// History listing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Conversations surfaced from the store (default: 20)
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Conversations shown at once (default: 10)
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            display_limit: default_display_limit(),
        }
    }
}

fn default_recent_limit() -> usize {
    20
}

fn default_display_limit() -> usize {
    10
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Directory holding the knowledge files (default: ./data)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    #[serde(default = "default_pdf_file")]
    pub pdf_file: String,

    /// Conversation history directory (optional, default: ~/.tripguide/history or ./.tripguide/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,

    /// Embedding service reference (e.g. "ollama.embed")
    #[serde(default = "default_embedding")]
    pub embedding: String,

    /// Chat service reference (e.g. "groq.llm")
    #[serde(default = "default_llm")]
    pub llm: String,

    /// Default chat model
    #[serde(default)]
    pub model: ChatModel,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_csv_file() -> String {
    "travel.csv".to_string()
}

fn default_pdf_file() -> String {
    "travel.pdf".to_string()
}

fn default_embedding() -> String {
    "ollama.embed".to_string()
}

fn default_llm() -> String {
    "groq.llm".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            csv_file: default_csv_file(),
            pdf_file: default_pdf_file(),
            history_dir: None,
            embedding: default_embedding(),
            llm: default_llm(),
            model: ChatModel::default(),
            retrieval: RetrievalConfig::default(),
            generation: GenerationConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Global directory: ~/.tripguide/
    pub fn global_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Local directory: ./.tripguide/
    pub fn local_dir() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Whether a local config exists
    /// The home directory itself never counts as local
    pub fn has_local_config() -> bool {
        let current_dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(_) => return false,
        };

        if let Some(home) = Self::global_dir().parent().map(Path::to_path_buf) {
            let current_canonical = current_dir.canonicalize().unwrap_or(current_dir.clone());
            let home_canonical = home.canonicalize().unwrap_or(home);

            if current_canonical == home_canonical {
                return false;
            }
        }

        Self::local_dir().join(CONFIG_FILE).exists()
    }

    /// --local and --global are mutually exclusive
    pub fn validate_scope_flags(local: bool, global: bool) -> Result<()> {
        if local && global {
            anyhow::bail!("Cannot specify both --local and --global, please choose one");
        }
        Ok(())
    }

    /// "local" or "global"
    pub fn get_scope_name(force_local: bool, force_global: bool) -> &'static str {
        if Self::resolves_local(force_local, force_global) {
            "local"
        } else {
            "global"
        }
    }

    /// Directory the given flags resolve to
    pub fn get_config_dir(force_local: bool, force_global: bool) -> PathBuf {
        if Self::resolves_local(force_local, force_global) {
            Self::local_dir()
        } else {
            Self::global_dir()
        }
    }

    fn resolves_local(force_local: bool, force_global: bool) -> bool {
        force_local || (!force_global && Self::has_local_config())
    }

    /// Load configuration honoring --local/--global
    /// - local = true: local config only
    /// - global = true: global config only
    /// - neither: local if present, otherwise global
    pub fn load_with_scope(force_local: bool, force_global: bool) -> Result<Self> {
        Self::validate_scope_flags(force_local, force_global)?;

        let scope = if force_local {
            ConfigScope::Local
        } else if force_global {
            ConfigScope::Global
        } else {
            ConfigScope::Auto
        };

        Self::load_with_scope_internal(scope)
    }

    fn load_with_scope_internal(scope: ConfigScope) -> Result<Self> {
        let is_local = match scope {
            ConfigScope::Auto => Self::has_local_config(),
            ConfigScope::Local => true,
            ConfigScope::Global => false,
        };

        let dir = if is_local {
            Self::local_dir()
        } else {
            Self::global_dir()
        };

        Self::load_from_dir(&dir)
    }

    /// Load `config.toml` from `dir`, falling back to defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;

            let config: Self = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;

            tracing::debug!("Loaded app config from: {}", path.display());
            config
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        // History lives next to the config unless configured explicitly
        if config.history_dir.is_none() {
            config.history_dir = Some(dir.join("history"));
        }

        tracing::debug!("Embedding: {}", config.embedding);
        tracing::debug!("LLM: {}", config.llm);

        Ok(config)
    }

    pub fn get_history_path(&self) -> PathBuf {
        self.history_dir
            .clone()
            .unwrap_or_else(|| Self::global_dir().join("history"))
    }

    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.csv_file)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.data_dir.join(&self.pdf_file)
    }

    /// Resolve the embedding service
    pub fn resolve_embedding(&self, providers: &ProvidersConfig) -> Result<ResolvedService> {
        providers
            .get_service(&self.embedding, ServiceType::Embed)
            .with_context(|| format!("Failed to resolve embedding service: {}", self.embedding))
    }

    /// Resolve the chat service
    pub fn resolve_llm(&self, providers: &ProvidersConfig) -> Result<ResolvedService> {
        providers
            .get_service(&self.llm, ServiceType::Llm)
            .with_context(|| format!("Failed to resolve LLM service: {}", self.llm))
    }

    /// Write this configuration as `config.toml` into `dir`
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let config_path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
data_dir = "/srv/travel"
csv_file = "cities.csv"
embedding = "openai.embed"
llm = "groq.llm"
model = "llama-3.1-70b-versatile"

[retrieval]
top_k = 4

[generation]
temperature = 0.2
max_tokens = 512

[history]
display_limit = 5
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.csv_path(), PathBuf::from("/srv/travel/cities.csv"));
        assert_eq!(config.pdf_path(), PathBuf::from("/srv/travel/travel.pdf"));
        assert_eq!(config.embedding, "openai.embed");
        assert_eq!(config.model, ChatModel::Advanced);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.retrieval.batch_size, 32);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_tokens, 512);
        assert_eq!(config.history.recent_limit, 20);
        assert_eq!(config.history.display_limit, 5);
    }

    #[test]
    fn test_default_values() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.csv_file, "travel.csv");
        assert_eq!(config.pdf_file, "travel.pdf");
        assert_eq!(config.embedding, "ollama.embed");
        assert_eq!(config.llm, "groq.llm");
        assert_eq!(config.model, ChatModel::Fast);
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.generation.temperature, 0.4);
        assert_eq!(config.generation.max_tokens, 900);
        assert_eq!(config.history.recent_limit, 20);
        assert_eq!(config.history.display_limit, 10);
    }

    #[test]
    fn test_load_from_dir_without_file_uses_defaults_and_scoped_history() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_dir(tmp.path()).unwrap();

        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.get_history_path(), tmp.path().join("history"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.model = ChatModel::Advanced;
        config.history_dir = Some(PathBuf::from("/var/tripguide/history"));

        let path = config.save_to(tmp.path()).unwrap();
        assert!(path.ends_with(CONFIG_FILE));

        let loaded = AppConfig::load_from_dir(tmp.path()).unwrap();
        assert_eq!(loaded.model, ChatModel::Advanced);
        assert_eq!(
            loaded.get_history_path(),
            PathBuf::from("/var/tripguide/history")
        );
    }

    #[test]
    fn test_scope_flags_conflict() {
        assert!(AppConfig::validate_scope_flags(true, true).is_err());
        assert!(AppConfig::validate_scope_flags(true, false).is_ok());
        assert!(AppConfig::validate_scope_flags(false, false).is_ok());
    }
}
